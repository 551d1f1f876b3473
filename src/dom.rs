//! Browser binding: reads the form, drives the page elements.

use anyhow::{Context as _, anyhow};
use wasm_bindgen::{JsCast, prelude::*};
use web_sys::{Document, HtmlElement, HtmlImageElement, HtmlInputElement};

use crate::config;
use crate::inputs::FormInputs;
use crate::orchestrator::{Orchestrator, RunGuard, RunPermit};
use crate::service::HttpService;
use crate::view::{SimulationView, SystemClock};

const BUTTON_ID: &str = "generar";
const STATUS_ID: &str = "resultado";
const GIF_ID: &str = "gif3D";
const PNG_ID: &str = "img2D";

thread_local! {
    static RUNNING: RunGuard = RunGuard::default();
}

fn document() -> anyhow::Result<Document> {
    web_sys::window()
        .ok_or_else(|| anyhow!("no `window` in this context"))?
        .document()
        .ok_or_else(|| anyhow!("no `document` on window"))
}

fn element<T: JsCast>(doc: &Document, id: &str) -> anyhow::Result<T> {
    doc.get_element_by_id(id)
        .with_context(|| format!("element #{id} not found"))?
        .dyn_into::<T>()
        .map_err(|_| anyhow!("element #{id} has an unexpected type"))
}

pub fn read_form(doc: &Document) -> anyhow::Result<FormInputs> {
    let value = |id: &str| element::<HtmlInputElement>(doc, id).map(|e| e.value());
    Ok(FormInputs {
        h_e: value("h_e")?,
        d: value("D")?,
        i_f: value("I_f")?,
        rho: value("rho")?,
    })
}

/// The status `<div>` and the two `<img>` slots.
pub struct DomView {
    status: HtmlElement,
    gif: HtmlImageElement,
    png: HtmlImageElement,
}

impl DomView {
    pub fn from_document(doc: &Document) -> anyhow::Result<Self> {
        Ok(Self {
            status: element(doc, STATUS_ID)?,
            gif: element(doc, GIF_ID)?,
            png: element(doc, PNG_ID)?,
        })
    }
}

fn set_display(el: &HtmlElement, value: &str) {
    if el.style().set_property("display", value).is_err() {
        log::debug!("could not set display={value} on #{}", el.id());
    }
}

impl SimulationView for DomView {
    // Text, not HTML: the detail may come straight from the service.
    fn set_status(&mut self, text: &str) {
        self.status.set_text_content(Some(text));
    }

    fn show_status_panel(&mut self) {
        set_display(&self.status, "block");
    }

    fn show_3d(&mut self, url: &str) {
        self.gif.set_src(url);
        set_display(&self.gif, "block");
    }

    fn hide_3d(&mut self) {
        set_display(&self.gif, "none");
    }

    fn show_2d(&mut self, url: &str) {
        self.png.set_src(url);
        set_display(&self.png, "block");
    }

    fn hide_2d(&mut self) {
        set_display(&self.png, "none");
    }
}

/// Starts a run unless one is already in flight.
pub fn trigger() {
    let Some(permit) = RUNNING.with(RunGuard::try_acquire) else {
        log::warn!("Simulation already running; ignoring trigger");
        return;
    };
    if let Err(e) = spawn_run(permit) {
        log::error!("Could not start simulation: {e:#}");
    }
}

fn spawn_run(permit: RunPermit) -> anyhow::Result<()> {
    let doc = document()?;
    let inputs = read_form(&doc)?;
    let mut view = DomView::from_document(&doc)?;

    let cfg = config::load();
    let service = HttpService::new(&cfg)
        .with_context(|| format!("invalid service URL {:?}", cfg.base_url))?;
    let orchestrator = Orchestrator::new(service, SystemClock);

    wasm_bindgen_futures::spawn_local(async move {
        let _permit = permit;
        // Outcome is already on the page; the error was logged by the run.
        let _ = orchestrator.run(&inputs, &mut view).await;
    });
    Ok(())
}

/// Wires `#generar` (when present) to [`trigger`].
pub fn bind_button() -> anyhow::Result<()> {
    let doc = document()?;
    let Some(button) = doc.get_element_by_id(BUTTON_ID) else {
        log::debug!("no #{BUTTON_ID} button; expecting the page to call generar()");
        return Ok(());
    };

    let on_click = Closure::<dyn FnMut()>::new(trigger);
    button
        .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
        .map_err(|e| anyhow!("could not bind #{BUTTON_ID}: {e:?}"))?;
    on_click.forget();
    Ok(())
}
