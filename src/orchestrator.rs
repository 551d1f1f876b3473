//! Runs one simulation request from form values to rendered artifacts.
//!
//! The 3D render is requested first; the 2D render is only requested once the
//! 3D result is on screen. Any failure after validation clears both media
//! slots so a half-finished pair is never left visible.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::SimulationError;
use crate::inputs::{FormInputs, SimulationRequest};
use crate::service::{Artifact, SimulationService};
use crate::view::{Clock, SimulationView};

pub const STATUS_RUNNING: &str = "Generando simulación... Esto puede tomar varios segundos.";
pub const STATUS_3D_READY: &str = "Simulación 3D (GIF) generada. Generando vista 2D...";
pub const STATUS_DONE: &str = "Simulación completa. Resultados disponibles.";

/// Status line shown when a run fails after validation.
pub fn failure_message(err: &SimulationError) -> String {
    format!("Error al generar la simulación. Detalle: {err}")
}

/// URLs of both artifacts after a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub gif_url: String,
    pub png_url: String,
}

/// Allows at most one run at a time on the page.
#[derive(Debug, Clone, Default)]
pub struct RunGuard {
    running: Rc<Cell<bool>>,
}

/// Held for the lifetime of a run; dropping it frees the guard.
#[derive(Debug)]
pub struct RunPermit {
    running: Rc<Cell<bool>>,
}

impl RunGuard {
    /// `None` while another run still holds its permit.
    pub fn try_acquire(&self) -> Option<RunPermit> {
        if self.running.replace(true) {
            return None;
        }
        Some(RunPermit {
            running: Rc::clone(&self.running),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        self.running.set(false);
    }
}

pub struct Orchestrator<S, C> {
    service: S,
    clock: C,
}

impl<S: SimulationService, C: Clock> Orchestrator<S, C> {
    pub fn new(service: S, clock: C) -> Self {
        Self { service, clock }
    }

    /// Validates `inputs`, then drives both service calls while updating `view`.
    ///
    /// Nothing is retried; every call starts from scratch.
    pub async fn run<V: SimulationView>(
        &self,
        inputs: &FormInputs,
        view: &mut V,
    ) -> Result<RunOutcome, SimulationError> {
        let request = match inputs.to_request() {
            Ok(request) => request,
            Err(e) => {
                log::warn!("Rejected form: field {} ({e})", e.field());
                view.set_status(&e.to_string());
                return Err(e.into());
            }
        };

        view.show_status_panel();
        view.set_status(STATUS_RUNNING);
        view.hide_media();
        log::info!(
            "Starting simulation r_e={} h_e={} I_f={} rho={}",
            request.r_e,
            request.h_e,
            request.i_f,
            request.rho
        );

        match self.render_both(&request, view).await {
            Ok(outcome) => {
                log::info!("Simulation complete");
                Ok(outcome)
            }
            Err(e) => {
                view.set_status(&failure_message(&e));
                log::error!("Error de Fetch: {e:?}");
                view.hide_media();
                Err(e)
            }
        }
    }

    async fn render_both<V: SimulationView>(
        &self,
        request: &SimulationRequest,
        view: &mut V,
    ) -> Result<RunOutcome, SimulationError> {
        let gif_url = self.render(Artifact::Animated3d, request).await?;
        view.set_status(STATUS_3D_READY);
        view.show_3d(&gif_url);

        let png_url = self.render(Artifact::Static2d, request).await?;
        view.set_status(STATUS_DONE);
        view.show_2d(&png_url);

        Ok(RunOutcome { gif_url, png_url })
    }

    async fn render(
        &self,
        artifact: Artifact,
        request: &SimulationRequest,
    ) -> Result<String, SimulationError> {
        let resp = self.service.simulate(artifact, request).await?;
        log::debug!("{} artifact stored as {}", artifact.label(), resp.filename);
        if !artifact.accepts_file_name(&resp.filename) {
            log::warn!(
                "{} artifact {:?} does not look like {}",
                artifact.label(),
                resp.filename,
                artifact.mime_type()
            );
        }
        let url = self
            .service
            .artifact_url(artifact, &resp.filename, self.clock.now_millis())?;
        Ok(url.into())
    }
}
