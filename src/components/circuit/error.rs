use super::config::ConfigError;

/// Failures while attaching the background to a page. None of them are
/// fatal to the host: callers log and carry on without the animation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CircuitError {
	/// Not running in a browser window.
	#[error("window is not available")]
	WindowUnavailable,

	/// The window has no document.
	#[error("document is not available")]
	DocumentUnavailable,

	/// No element carries the requested id.
	#[error("no element with id `{0}`")]
	CanvasNotFound(String),

	/// The element exists but is not a `<canvas>`.
	#[error("element `{0}` is not a canvas")]
	NotACanvas(String),

	/// `getContext("2d")` failed or returned nothing.
	#[error("2d context unavailable: {0}")]
	ContextUnavailable(String),

	/// Registering the resize listener or visibility observer failed.
	#[error("failed to observe {what}: {reason}")]
	Observer {
		/// Which observation was being registered.
		what: &'static str,
		/// Browser-supplied reason.
		reason: String,
	},

	/// `requestAnimationFrame` rejected the callback.
	#[error("failed to request animation frame: {0}")]
	FrameRequest(String),

	/// The frame loop was asked to reschedule after being cancelled.
	#[error("frame loop already stopped")]
	LoopStopped,

	/// The supplied configuration was rejected.
	#[error("invalid configuration: {0}")]
	Config(#[from] ConfigError),
}
