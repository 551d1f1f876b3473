//! Where the simulation service lives.
//!
//! The default points at the local development server. A page can override it
//! with `<body data-service-url="...">`, and a user can persist an override in
//! `localStorage` under [`STORAGE_KEY`] as JSON (`{"base_url": "..."}`).

use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const STORAGE_KEY: &str = "electrodo.config";
pub const BODY_ATTRIBUTE: &str = "data-service-url";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl ServiceConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Parses a stored override. Anything unusable yields the defaults.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<ServiceConfig>(json) {
            Ok(cfg) if cfg.base().is_ok() => cfg,
            Ok(cfg) => {
                log::warn!("Ignoring stored service URL {:?} (not a valid URL)", cfg.base_url);
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to parse stored service config (using defaults): {e}");
                Self::default()
            }
        }
    }

    /// The base URL, normalised so relative joins keep any path prefix.
    pub fn base(&self) -> Result<Url, url::ParseError> {
        let mut base = Url::parse(&self.base_url)?;
        if base.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base)
    }
}

/// Picks the configuration from the page attribute and the stored JSON.
///
/// A usable page attribute wins; otherwise the stored override is parsed, and
/// with neither the defaults apply.
pub fn resolve(body_attr: Option<String>, stored: Option<String>) -> ServiceConfig {
    if let Some(url) = body_attr.filter(|v| !v.trim().is_empty()) {
        let cfg = ServiceConfig::with_base_url(url);
        if cfg.base().is_ok() {
            log::debug!("Service URL taken from <body {BODY_ATTRIBUTE}>: {}", cfg.base_url);
            return cfg;
        }
        log::warn!("Ignoring <body {BODY_ATTRIBUTE}={:?}> (not a valid URL)", cfg.base_url);
    }

    match stored {
        Some(json) => ServiceConfig::from_json(&json),
        None => ServiceConfig::default(),
    }
}

/// Resolves the configuration for the current page.
#[cfg(target_arch = "wasm32")]
pub fn load() -> ServiceConfig {
    resolve(body_attribute(), stored_override())
}

#[cfg(target_arch = "wasm32")]
fn body_attribute() -> Option<String> {
    web_sys::window()?
        .document()?
        .body()?
        .get_attribute(BODY_ATTRIBUTE)
}

#[cfg(target_arch = "wasm32")]
fn stored_override() -> Option<String> {
    let storage = web_sys::window()?.local_storage().ok().flatten()?;
    match storage.get_item(STORAGE_KEY) {
        Ok(item) => item,
        Err(_) => {
            log::warn!("Could not read {STORAGE_KEY} from localStorage (using defaults)");
            None
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load() -> ServiceConfig {
    resolve(None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_local_server() {
        let cfg = ServiceConfig::default();
        assert_eq!(cfg.base().unwrap().as_str(), "http://127.0.0.1:5000/");
    }

    #[test]
    fn stored_override_is_used() {
        let cfg = ServiceConfig::from_json(r#"{"base_url":"https://sim.example.org/api"}"#);
        assert_eq!(cfg.base_url, "https://sim.example.org/api");
        assert_eq!(cfg.base().unwrap().as_str(), "https://sim.example.org/api/");
    }

    #[test]
    fn missing_field_falls_back_to_default() {
        assert_eq!(ServiceConfig::from_json("{}"), ServiceConfig::default());
    }

    #[test]
    fn corrupt_or_invalid_entries_fall_back_to_default() {
        assert_eq!(ServiceConfig::from_json("not json"), ServiceConfig::default());
        assert_eq!(
            ServiceConfig::from_json(r#"{"base_url":"::nope"}"#),
            ServiceConfig::default()
        );
    }

    #[test]
    fn urls_that_cannot_be_a_base_are_rejected() {
        assert!(ServiceConfig::with_base_url("mailto:x").base().is_err());
        assert_eq!(
            ServiceConfig::from_json(r#"{"base_url":"mailto:x"}"#),
            ServiceConfig::default()
        );
    }

    #[test]
    fn page_attribute_wins_over_stored_override() {
        let cfg = resolve(
            Some("https://page.example/".into()),
            Some(r#"{"base_url":"https://stored.example"}"#.into()),
        );
        assert_eq!(cfg.base_url, "https://page.example/");
    }

    #[test]
    fn stored_override_used_when_page_attribute_is_blank_or_invalid() {
        let stored = Some(r#"{"base_url":"https://stored.example"}"#.to_string());
        for attr in [None, Some("  ".to_string()), Some("mailto:x".to_string())] {
            let cfg = resolve(attr.clone(), stored.clone());
            assert_eq!(cfg.base_url, "https://stored.example", "attr {attr:?}");
        }
    }

    #[test]
    fn nothing_configured_gives_defaults() {
        assert_eq!(resolve(None, None), ServiceConfig::default());
        assert_eq!(load(), ServiceConfig::default());
    }
}
