//! Ties a [`CircuitState`] to a live `<canvas>`: sizing, the frame loop,
//! visibility gating and debounced resize rebuilds.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{debug, info};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, IntersectionObserver, IntersectionObserverEntry,
	IntersectionObserverInit, Window,
};

use super::config::CircuitConfig;
use super::error::CircuitError;
use super::frame_loop::FrameLoop;
use super::state::CircuitState;

type SharedState = Rc<RefCell<CircuitState>>;

/// Device pixel ratio actually applied to the backing store.
pub fn clamp_pixel_ratio(reported: f64, max: f64) -> f64 {
	if reported.is_finite() && reported > 0.0 {
		reported.min(max)
	} else {
		1.0
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
	pub pixel_ratio: f64,
}

#[derive(Clone)]
struct Canvas {
	window: Window,
	element: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	max_pixel_ratio: f64,
}

impl Canvas {
	/// Matches the backing store to the element's laid-out size and resets
	/// the context transform so drawing stays in logical pixels.
	fn fit(&self) -> Viewport {
		let rect = self.element.get_bounding_client_rect();
		let (width, height) = (rect.width().max(0.0), rect.height().max(0.0));
		let pixel_ratio = clamp_pixel_ratio(self.window.device_pixel_ratio(), self.max_pixel_ratio);

		self.element.set_width((width * pixel_ratio) as u32);
		self.element.set_height((height * pixel_ratio) as u32);
		let _ = self.ctx.set_transform(pixel_ratio, 0.0, 0.0, pixel_ratio, 0.0, 0.0);
		self.ctx.set_image_smoothing_enabled(true);

		Viewport {
			width,
			height,
			pixel_ratio,
		}
	}

	fn refit(&self, state: &RefCell<CircuitState>) {
		let viewport = self.fit();
		debug!("circuit background: refit to {viewport:?}");
		state.borrow_mut().resize(viewport.width, viewport.height);
	}
}

/// Debounced window `resize` subscription. Dropping it removes the listener
/// and any pending rebuild.
struct ResizeListener {
	window: Window,
	callback: Closure<dyn FnMut()>,
	pending: Rc<RefCell<Option<Timeout>>>,
}

impl ResizeListener {
	fn listen(canvas: &Canvas, wait_ms: u32, state: SharedState) -> Result<Self, CircuitError> {
		let pending: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
		let (pending_cb, canvas_cb) = (pending.clone(), canvas.clone());

		let callback = Closure::<dyn FnMut()>::new(move || {
			let (canvas, state) = (canvas_cb.clone(), state.clone());
			// Replacing the previous timeout cancels it.
			*pending_cb.borrow_mut() = Some(Timeout::new(wait_ms, move || canvas.refit(&state)));
		});

		canvas
			.window
			.add_event_listener_with_callback("resize", callback.as_ref().unchecked_ref())
			.map_err(|e| CircuitError::Observer {
				what: "window resize",
				reason: format!("{e:?}"),
			})?;

		Ok(Self {
			window: canvas.window.clone(),
			callback,
			pending,
		})
	}
}

impl Drop for ResizeListener {
	fn drop(&mut self) {
		let _ = self
			.window
			.remove_event_listener_with_callback("resize", self.callback.as_ref().unchecked_ref());
		self.pending.borrow_mut().take();
	}
}

/// Intersection observer feeding the state's visibility flag.
struct VisibilityObserver {
	observer: IntersectionObserver,
	_callback: Closure<dyn FnMut(js_sys::Array)>,
}

impl VisibilityObserver {
	fn observe(element: &HtmlCanvasElement, threshold: f64, state: SharedState) -> Result<Self, CircuitError> {
		let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
			for entry in entries.iter() {
				if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
					state.borrow_mut().set_visible(entry.is_intersecting());
				}
			}
		});

		let options = IntersectionObserverInit::new();
		options.set_threshold(&JsValue::from_f64(threshold));
		let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
			.map_err(|e| CircuitError::Observer {
				what: "canvas visibility",
				reason: format!("{e:?}"),
			})?;
		observer.observe(element);

		Ok(Self {
			observer,
			_callback: callback,
		})
	}
}

impl Drop for VisibilityObserver {
	fn drop(&mut self) {
		self.observer.disconnect();
	}
}

/// Owns everything registered on behalf of one background canvas.
/// [`Controller::destroy`] (or dropping the controller) releases all of it.
pub struct Controller {
	canvas: Option<Canvas>,
	state: SharedState,
	frame_loop: Option<FrameLoop>,
	resize: Option<ResizeListener>,
	visibility: Option<VisibilityObserver>,
}

impl Controller {
	/// Sizes `element`, builds the first circuit, registers the observers
	/// and starts the frame loop.
	pub fn attach(element: HtmlCanvasElement, config: CircuitConfig) -> Result<Self, CircuitError> {
		config.validate()?;
		let window = web_sys::window().ok_or(CircuitError::WindowUnavailable)?;
		let ctx: CanvasRenderingContext2d = element
			.get_context("2d")
			.map_err(|e| CircuitError::ContextUnavailable(format!("{e:?}")))?
			.ok_or_else(|| CircuitError::ContextUnavailable("getContext returned null".into()))?
			.dyn_into()
			.map_err(|_| CircuitError::ContextUnavailable("not a 2d context".into()))?;

		let canvas = Canvas {
			window: window.clone(),
			element,
			ctx,
			max_pixel_ratio: config.host.max_pixel_ratio,
		};
		let viewport = canvas.fit();
		let state: SharedState = Rc::new(RefCell::new(CircuitState::new(
			viewport.width,
			viewport.height,
			config,
		)));

		let visibility = VisibilityObserver::observe(
			&canvas.element,
			config.host.visibility_threshold,
			state.clone(),
		)?;
		let resize = ResizeListener::listen(&canvas, config.host.resize_debounce_ms, state.clone())?;

		let (state_frame, mut ctx) = (state.clone(), canvas.ctx.clone());
		let frame_loop = FrameLoop::start(window, move |now| {
			state_frame.borrow_mut().tick(now, &mut ctx);
		})?;

		info!(
			"circuit background attached: {}x{} @{}x, {} fps target",
			viewport.width,
			viewport.height,
			viewport.pixel_ratio,
			state.borrow().governor().target_fps()
		);

		Ok(Self {
			canvas: Some(canvas),
			state,
			frame_loop: Some(frame_loop),
			resize: Some(resize),
			visibility: Some(visibility),
		})
	}

	/// Refits the canvas and rebuilds the circuit now, without waiting for
	/// a window resize.
	pub fn handle_resize(&self) {
		if let Some(canvas) = &self.canvas {
			canvas.refit(&self.state);
		}
	}

	pub fn is_running(&self) -> bool {
		self.frame_loop.as_ref().is_some_and(|f| !f.is_cancelled())
	}

	/// Cancels the pending frame, unregisters observers and releases the
	/// canvas. Calling it again does nothing.
	pub fn destroy(&mut self) {
		if let Some(frame_loop) = self.frame_loop.take() {
			frame_loop.cancel();
		}
		self.resize.take();
		self.visibility.take();
		if self.canvas.take().is_some() {
			let state = self.state.borrow();
			info!(
				"circuit background destroyed after {} rebuilds, last measured {:.1} fps",
				state.generation(),
				state.governor().measured_fps().unwrap_or(0.0)
			);
		}
	}
}

impl Drop for Controller {
	fn drop(&mut self) {
		self.destroy();
	}
}
