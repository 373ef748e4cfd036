//! Cancellable `requestAnimationFrame` loop.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use super::error::CircuitError;

type FrameClosure = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// A self-rescheduling per-frame callback. Ticks never overlap; the only
/// suspension point is between one frame request and the next callback.
pub struct FrameLoop {
	window: Window,
	cancelled: Rc<Cell<bool>>,
	request_id: Rc<Cell<Option<i32>>>,
	closure: FrameClosure,
}

impl FrameLoop {
	/// Starts calling `on_frame` with the frame timestamp (ms) once per
	/// display frame until [`FrameLoop::cancel`] is called.
	pub fn start<F>(window: Window, mut on_frame: F) -> Result<Self, CircuitError>
	where
		F: FnMut(f64) + 'static,
	{
		let cancelled = Rc::new(Cell::new(false));
		let request_id = Rc::new(Cell::new(None));
		let closure: FrameClosure = Rc::new(RefCell::new(None));

		let (cancelled_cb, request_id_cb, closure_cb, window_cb) =
			(cancelled.clone(), request_id.clone(), closure.clone(), window.clone());
		*closure.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			request_id_cb.set(None);
			if cancelled_cb.get() {
				return;
			}
			on_frame(timestamp);
			if cancelled_cb.get() {
				return;
			}
			match request_frame(&window_cb, &closure_cb) {
				Ok(id) => request_id_cb.set(Some(id)),
				Err(e) => log::warn!("circuit background: {e}"),
			}
		}));

		let first = request_frame(&window, &closure)?;
		request_id.set(Some(first));

		Ok(Self {
			window,
			cancelled,
			request_id,
			closure,
		})
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancelled.get()
	}

	/// Withdraws the pending frame and drops the callback. Safe to call
	/// more than once.
	pub fn cancel(&self) {
		self.cancelled.set(true);
		if let Some(id) = self.request_id.take() {
			let _ = self.window.cancel_animation_frame(id);
		}
		// The closure holds a handle to its own slot; emptying the slot
		// breaks the cycle.
		self.closure.borrow_mut().take();
	}
}

impl Drop for FrameLoop {
	fn drop(&mut self) {
		self.cancel();
	}
}

fn request_frame(window: &Window, closure: &FrameClosure) -> Result<i32, CircuitError> {
	let slot = closure.borrow();
	let cb = slot.as_ref().ok_or(CircuitError::LoopStopped)?;
	window
		.request_animation_frame(cb.as_ref().unchecked_ref())
		.map_err(|e| CircuitError::FrameRequest(format!("{e:?}")))
}
