//! Browser front end. The page produced by `render_page` loads this module,
//! which fetches the artifact, ticks the layout once per animation frame and
//! feeds canvas mouse events to the interaction state machine.

mod draw;

use std::cell::RefCell;
use std::rc::Rc;

use log::{error, info, Level};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, MouseEvent, XmlHttpRequest};

use crate::layout::SimulationParameters;
use crate::renderer::canvas::POINTER_EVENTS;
use crate::renderer::{
    pointer_event, RenderConfig, RenderState, Scene, Viewport, DEFAULT_DATA_URL,
};

const CANVAS_ID: &str = "graph-canvas";
const ERROR_ID: &str = "error-message";

fn init_logging() {
    let _ = console_log::init_with_level(Level::Info);
    console_error_panic_hook::set_once();
}

fn js_error(message: &str) -> JsValue {
    JsValue::from_str(message)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    init_logging();

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| js_error("no document"))?;
    let canvas: HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| js_error("no graph canvas on the page"))?
        .dyn_into()?;

    let url = canvas
        .get_attribute("data-src")
        .unwrap_or_else(|| DEFAULT_DATA_URL.to_string());
    let params = SimulationParameters {
        width: canvas.width() as f64,
        height: canvas.height() as f64,
        ..SimulationParameters::default()
    };
    let config = RenderConfig::default()
        .with_params(params)
        .with_data_url(&url);

    info!("Loading graph data from {}", url);
    let request_url = url.clone();
    fetch_text(&request_url, move |result| {
        let state = match result {
            Ok(text) => RenderState::from_bytes(text.as_bytes(), config),
            Err(reason) => RenderState::fetch_failed(&url, &reason),
        };
        let shown = match state {
            RenderState::Ready(scene) => animate(*scene, canvas),
            RenderState::Failed(message) => show_error(&document, &canvas, &message),
        };
        if let Err(e) = shown {
            error!("Could not display the graph: {:?}", e);
        }
    })
}

/// GET `url` and hand the body, or the reason there is none, to `on_done`.
fn fetch_text<F>(url: &str, on_done: F) -> Result<(), JsValue>
where
    F: FnOnce(Result<String, String>) + 'static,
{
    let xhr = Rc::new(XmlHttpRequest::new()?);
    xhr.open_with_async("GET", url, true)?;

    let done: Rc<RefCell<Option<F>>> = Rc::new(RefCell::new(Some(on_done)));
    let (xhr_load, done_load) = (xhr.clone(), done.clone());
    let onload = Closure::<dyn FnMut()>::new(move || {
        let result = match xhr_load.status() {
            Ok(status) if (200..300).contains(&status) => xhr_load
                .response_text()
                .ok()
                .flatten()
                .ok_or_else(|| "empty response".to_string()),
            Ok(status) => Err(format!("HTTP status {}", status)),
            Err(e) => Err(format!("{:?}", e)),
        };
        if let Some(done) = done_load.borrow_mut().take() {
            done(result);
        }
    });
    let onerror = Closure::<dyn FnMut()>::new(move || {
        if let Some(done) = done.borrow_mut().take() {
            done(Err("network error".to_string()));
        }
    });

    xhr.set_onload(Some(onload.as_ref().unchecked_ref()));
    xhr.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onload.forget();
    onerror.forget();

    xhr.send()
}

fn show_error(document: &Document, canvas: &HtmlCanvasElement, message: &str) -> Result<(), JsValue> {
    canvas.set_attribute("hidden", "")?;
    let target = document
        .get_element_by_id(ERROR_ID)
        .ok_or_else(|| js_error("no error element on the page"))?;
    target.set_text_content(Some(message));
    target.remove_attribute("hidden")
}

/// Start the animation loop and wire the canvas mouse events.
fn animate(scene: Scene, canvas: HtmlCanvasElement) -> Result<(), JsValue> {
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| js_error("no 2d context"))?
        .dyn_into()?;
    let scene = Rc::new(RefCell::new(scene));

    for kind in POINTER_EVENTS {
        let (scene_ev, canvas_ev) = (scene.clone(), canvas.clone());
        let listener = Closure::<dyn FnMut(MouseEvent)>::new(move |ev: MouseEvent| {
            let rect = canvas_ev.get_bounding_client_rect();
            let viewport = Viewport::new(
                (canvas_ev.width() as f64, canvas_ev.height() as f64),
                (rect.left(), rect.top(), rect.width(), rect.height()),
            );
            let (x, y) = viewport.to_layout(ev.client_x() as f64, ev.client_y() as f64);
            if let Some(event) = pointer_event(&ev.type_(), x, y) {
                scene_ev.borrow_mut().pointer(event);
            }
        });
        canvas.add_event_listener_with_callback(kind, listener.as_ref().unchecked_ref())?;
        listener.forget();
    }

    let frame_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let frame_inner = frame_cb.clone();
    *frame_cb.borrow_mut() = Some(Closure::new(move || {
        {
            let mut scene = scene.borrow_mut();
            scene.tick();
            draw::draw(&scene.frame(), &ctx);
        }
        if let (Some(window), Some(cb)) = (web_sys::window(), frame_inner.borrow().as_ref()) {
            let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }));

    let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
    if let Some(cb) = frame_cb.borrow().as_ref() {
        window.request_animation_frame(cb.as_ref().unchecked_ref())?;
    }
    info!("Graph animation started");
    Ok(())
}
