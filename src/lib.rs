//! Browser client for the grounding-electrode field simulator.
//!
//! Reads electrode length, diameter, fault current and soil resistivity from
//! the page, asks the simulation service for a 3D animation and then a 2D top
//! view, and shows each one as soon as it is ready.

pub mod config;
pub mod error;
pub mod inputs;
pub mod orchestrator;
pub mod service;
pub mod view;

#[cfg(target_arch = "wasm32")]
mod dom;

pub use error::{SimulationError, ValidationError};
pub use inputs::{FormInputs, SimulationRequest};
pub use orchestrator::{Orchestrator, RunGuard, RunOutcome, RunPermit};
pub use service::{Artifact, SimulationResponse, SimulationService};
pub use view::{Clock, SimulationView, SystemClock};

// ── Web entry‑point ──
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Redirect `log` macros & panic messages to the browser console
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug)
        .map_err(|e| JsValue::from_str(&format!("failed to init logger: {e}")))?;

    dom::bind_button().map_err(|e| JsValue::from_str(&format!("{e:#}")))?;
    log::info!("Simulation client ready (service at {})", config::load().base_url);
    Ok(())
}

/// Called from the page's button handler.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn generar() {
    dom::trigger();
}
