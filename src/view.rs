//! What the orchestrator is allowed to touch on the page.

/// Status line plus the two media slots.
pub trait SimulationView {
    fn set_status(&mut self, text: &str);
    fn show_status_panel(&mut self);
    fn show_3d(&mut self, url: &str);
    fn hide_3d(&mut self);
    fn show_2d(&mut self, url: &str);
    fn hide_2d(&mut self);

    fn hide_media(&mut self) {
        self.hide_3d();
        self.hide_2d();
    }
}

/// Source of the cache-busting nonce appended to artifact URLs.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(target_arch = "wasm32")]
    fn now_millis(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now_millis(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}
