//! Client side of the simulation service contract.
//!
//! Two POST routes render an artifact from the same payload and reply with the
//! artifact's file name; two GET routes serve the rendered files back.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

#[cfg(target_arch = "wasm32")]
use gloo_net::http::Request;

use crate::error::SimulationError;
use crate::inputs::SimulationRequest;

/// The two things the service can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// Rotating 3D view, rendered as an animated GIF.
    Animated3d,
    /// Top-down 2D view, rendered as a PNG.
    Static2d,
}

impl Artifact {
    pub fn simulate_path(self) -> &'static str {
        match self {
            Artifact::Animated3d => "simular_3d",
            Artifact::Static2d => "simular_2d",
        }
    }

    pub fn fetch_path(self) -> &'static str {
        match self {
            Artifact::Animated3d => "get_gif",
            Artifact::Static2d => "get_png",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Artifact::Animated3d => "image/gif",
            Artifact::Static2d => "image/png",
        }
    }

    /// Whether `filename` carries the extension of this artifact's MIME type.
    pub fn accepts_file_name(self, filename: &str) -> bool {
        let expected = self.mime_type().trim_start_matches("image/");
        filename
            .rsplit_once('.')
            .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(expected))
    }

    pub fn label(self) -> &'static str {
        match self {
            Artifact::Animated3d => "3D",
            Artifact::Static2d => "2D",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationResponse {
    pub filename: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[async_trait(?Send)]
pub trait SimulationService {
    /// Base every route is resolved against. Must end with `/`.
    fn base(&self) -> &Url;

    /// Renders `artifact` and returns the file name the service stored it under.
    async fn simulate(
        &self,
        artifact: Artifact,
        request: &SimulationRequest,
    ) -> Result<SimulationResponse, SimulationError>;

    /// Download URL for a rendered artifact. `nonce` defeats browser caching.
    fn artifact_url(
        &self,
        artifact: Artifact,
        filename: &str,
        nonce: u64,
    ) -> Result<Url, SimulationError> {
        let mut url = self
            .base()
            .join(artifact.fetch_path())
            .map_err(SimulationError::transport)?;
        url.query_pairs_mut()
            .append_pair("name", filename)
            .append_pair("t", &nonce.to_string());
        Ok(url)
    }
}

/// Turns a raw reply into either the artifact file name or a tagged error.
pub fn interpret_reply(ok: bool, status: u16, body: &str) -> Result<SimulationResponse, SimulationError> {
    if ok {
        return serde_json::from_str(body).map_err(SimulationError::transport);
    }
    let err: ErrorBody = serde_json::from_str(body).map_err(SimulationError::transport)?;
    let message = match err.error {
        None | Some(serde_json::Value::Null) => format!("HTTP {status}"),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    };
    Err(SimulationError::Service { status, message })
}

/// `gloo-net` backed client used in the browser.
#[cfg(target_arch = "wasm32")]
pub struct HttpService {
    base: Url,
}

#[cfg(target_arch = "wasm32")]
impl HttpService {
    pub fn new(config: &crate::config::ServiceConfig) -> Result<Self, url::ParseError> {
        Ok(Self { base: config.base()? })
    }
}

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl SimulationService for HttpService {
    fn base(&self) -> &Url {
        &self.base
    }

    async fn simulate(
        &self,
        artifact: Artifact,
        request: &SimulationRequest,
    ) -> Result<SimulationResponse, SimulationError> {
        let url = self
            .base
            .join(artifact.simulate_path())
            .map_err(SimulationError::transport)?;
        log::debug!("POST {url}");

        let resp = Request::post(url.as_str())
            .json(request)
            .map_err(SimulationError::transport)?
            .send()
            .await
            .map_err(SimulationError::transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(SimulationError::transport)?;
        log::debug!("{} reply: HTTP {status}", artifact.label());

        interpret_reply(resp.ok(), status, &body)
    }
}
