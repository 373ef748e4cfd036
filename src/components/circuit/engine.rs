use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use super::config::CircuitConfig;
use super::controller::Controller;
use super::error::CircuitError;

/// Imperative handle for pages that are not built with Leptos.
///
/// ```js
/// const background = new CircuitEngine("circuit-canvas");
/// layout.onChange(() => background.handleResize());
/// window.addEventListener("pagehide", () => background.destroy());
/// ```
///
/// A missing or unusable canvas leaves the engine inert instead of failing
/// the page; every method is then a no-op.
#[wasm_bindgen]
pub struct CircuitEngine {
	controller: Option<Controller>,
}

#[wasm_bindgen]
impl CircuitEngine {
	/// Starts the background on the canvas with the given element id using
	/// the 30 FPS preset.
	#[wasm_bindgen(constructor)]
	pub fn new(canvas_id: &str) -> CircuitEngine {
		Self::with_config(canvas_id, CircuitConfig::optimized())
	}

	/// Refits the canvas and regenerates the circuit immediately.
	#[wasm_bindgen(js_name = handleResize)]
	pub fn handle_resize(&self) {
		if let Some(controller) = &self.controller {
			controller.handle_resize();
		}
	}

	/// Stops the animation and releases every listener. Idempotent.
	pub fn destroy(&mut self) {
		if let Some(mut controller) = self.controller.take() {
			controller.destroy();
		}
	}

	/// Whether the frame loop is live.
	#[wasm_bindgen(js_name = isRunning)]
	pub fn is_running(&self) -> bool {
		self.controller.as_ref().is_some_and(Controller::is_running)
	}
}

impl CircuitEngine {
	/// Starts the background with an explicit configuration.
	pub fn with_config(canvas_id: &str, config: CircuitConfig) -> Self {
		let controller = find_canvas(canvas_id)
			.and_then(|canvas| Controller::attach(canvas, config))
			.inspect_err(|e| warn!("circuit background disabled: {e}"))
			.ok();
		Self { controller }
	}
}

fn find_canvas(id: &str) -> Result<HtmlCanvasElement, CircuitError> {
	let document = web_sys::window()
		.ok_or(CircuitError::WindowUnavailable)?
		.document()
		.ok_or(CircuitError::DocumentUnavailable)?;
	document
		.get_element_by_id(id)
		.ok_or_else(|| CircuitError::CanvasNotFound(id.to_owned()))?
		.dyn_into()
		.map_err(|_| CircuitError::NotACanvas(id.to_owned()))
}

#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod tests {
	use super::*;
	use wasm_bindgen_test::*;

	wasm_bindgen_test_configure!(run_in_browser);

	#[wasm_bindgen_test]
	fn missing_canvas_is_a_no_op() {
		let mut engine = CircuitEngine::new("no-such-canvas");
		assert!(!engine.is_running());
		engine.handle_resize();
		engine.destroy();
		engine.destroy();
	}

	#[wasm_bindgen_test]
	fn non_canvas_element_is_rejected() {
		let document = web_sys::window().and_then(|w| w.document());
		if let Some(div) = document.as_ref().and_then(|d| d.create_element("div").ok()) {
			div.set_id("not-a-canvas");
			if let Some(body) = document.and_then(|d| d.body()) {
				let _ = body.append_child(&div);
			}
		}
		assert!(matches!(
			find_canvas("not-a-canvas"),
			Err(CircuitError::NotACanvas(_))
		));
	}
}
