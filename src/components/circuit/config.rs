//! Fixed configuration for the circuit background.
//!
//! Every numeric threshold the engine uses lives here. The two presets
//! reproduce the imperative page background (`optimized`) and the reactive
//! dashboard component (`fluid`).

/// Grid layout and connection parameters for the graph builder.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutConfig {
	/// Edge length of one grid cell in logical pixels.
	pub cell_size: f64,
	/// Probability that a grid cell receives a node.
	pub node_probability: f64,
	/// Maximum positional jitter on each axis, in pixels.
	pub jitter: f64,
	/// Fraction of nodes that become hubs.
	pub hub_ratio: f64,
	/// Candidates must be strictly farther than this.
	pub min_link_distance: f64,
	/// Candidates must be strictly closer than this.
	pub max_link_distance: f64,
	/// Connection cap of a normal node.
	pub normal_degree_cap: usize,
	/// Connection cap of a hub node.
	pub hub_degree_cap: usize,
	/// Probability that a kept candidate is actually connected.
	pub link_probability: f64,
	/// Probability that a fresh node starts active.
	pub initial_node_activity: f64,
	/// Probability that a fresh edge starts with a pulse in flight.
	pub initial_edge_activity: f64,
	/// Fraction of edges drawn as data lines instead of power lines.
	pub data_edge_ratio: f64,
	/// Upper bound of the random per-node pulse phase offset, in ms.
	pub max_pulse_delay_ms: f64,
}

/// Pulse and activity parameters for the render loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionConfig {
	/// Slowest pulse speed, in progress units per second.
	pub speed_min: f64,
	/// Fastest pulse speed, in progress units per second.
	pub speed_max: f64,
	/// Progress value past which a pulse wraps back to zero.
	pub wrap_threshold: f64,
	/// Minimum time between two progress advances of one edge.
	pub min_pulse_interval_ms: f64,
	/// Probability that an edge keeps pulsing after it wraps.
	pub reactivation_probability: f64,
	/// Per-tick probability of toggling one random node.
	pub node_flip_probability: f64,
	/// Per-tick probability of sparking one random idle edge.
	pub edge_spark_probability: f64,
	/// Largest frame delta fed into the simulation, in ms.
	pub max_frame_delta_ms: f64,
}

/// How often the render loop is allowed to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameBudget {
	/// Always target the same rate.
	Fixed {
		/// Target frames per second.
		fps: f64,
	},
	/// Start at the ceiling and fall back to the floor when the display
	/// cannot keep up.
	Adaptive {
		/// Initial target frames per second.
		ceiling_fps: f64,
		/// Target used after a downgrade.
		floor_fps: f64,
	},
}

impl FrameBudget {
	/// Target rate the governor starts with.
	pub fn initial_fps(self) -> f64 {
		match self {
			Self::Fixed { fps } => fps,
			Self::Adaptive { ceiling_fps, .. } => ceiling_fps,
		}
	}
}

/// Browser-facing parameters of the visibility and resize controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostConfig {
	/// Quiet period before a burst of resize events triggers a rebuild.
	pub resize_debounce_ms: u32,
	/// Upper bound of the device pixel ratio applied to the backing store.
	pub max_pixel_ratio: f64,
	/// Fraction of the canvas that must intersect the viewport.
	pub visibility_threshold: f64,
}

/// Complete engine configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircuitConfig {
	/// Graph builder parameters.
	pub layout: LayoutConfig,
	/// Pulse animation parameters.
	pub motion: MotionConfig,
	/// Frame rate policy.
	pub frame_budget: FrameBudget,
	/// Host integration parameters.
	pub host: HostConfig,
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
	/// A probability or ratio outside `[0, 1]`.
	#[error("{name} must be a probability in [0, 1], got {value}")]
	Probability {
		/// Offending field.
		name: &'static str,
		/// Rejected value.
		value: f64,
	},

	/// A size, rate or bound that must be strictly positive.
	#[error("{name} must be positive and finite, got {value}")]
	NotPositive {
		/// Offending field.
		name: &'static str,
		/// Rejected value.
		value: f64,
	},

	/// A `(min, max)` pair with `min > max`.
	#[error("{name} range is inverted: {min} > {max}")]
	InvertedRange {
		/// Range being checked.
		name: &'static str,
		/// Lower bound as configured.
		min: f64,
		/// Upper bound as configured.
		max: f64,
	},
}

impl CircuitConfig {
	/// Sparse 30 FPS background used behind the static dashboard page.
	pub const fn optimized() -> Self {
		Self {
			layout: LayoutConfig {
				cell_size: 100.0,
				node_probability: 0.3,
				jitter: 15.0,
				hub_ratio: 0.15,
				min_link_distance: 50.0,
				max_link_distance: 150.0,
				normal_degree_cap: 2,
				hub_degree_cap: 4,
				link_probability: 0.6,
				initial_node_activity: 0.2,
				initial_edge_activity: 0.3,
				data_edge_ratio: 0.1,
				max_pulse_delay_ms: 5000.0,
			},
			motion: MotionConfig {
				speed_min: 0.3,
				speed_max: 0.8,
				wrap_threshold: 1.2,
				min_pulse_interval_ms: 120.0,
				reactivation_probability: 0.5,
				node_flip_probability: 0.002,
				edge_spark_probability: 0.004,
				max_frame_delta_ms: 250.0,
			},
			frame_budget: FrameBudget::Fixed { fps: 30.0 },
			host: HostConfig {
				resize_debounce_ms: 300,
				max_pixel_ratio: 1.5,
				visibility_threshold: 0.1,
			},
		}
	}

	/// Denser background for the reactive dashboard. Targets the display
	/// rate and drops to 30 FPS when frames are missed.
	pub const fn fluid() -> Self {
		Self {
			layout: LayoutConfig {
				cell_size: 100.0,
				node_probability: 0.4,
				jitter: 15.0,
				hub_ratio: 0.0,
				min_link_distance: 50.0,
				max_link_distance: 150.0,
				normal_degree_cap: 3,
				hub_degree_cap: 3,
				link_probability: 0.6,
				initial_node_activity: 0.3,
				initial_edge_activity: 0.5,
				data_edge_ratio: 0.0,
				max_pulse_delay_ms: 3000.0,
			},
			motion: MotionConfig {
				speed_min: 0.3,
				speed_max: 1.0,
				wrap_threshold: 1.2,
				min_pulse_interval_ms: 100.0,
				reactivation_probability: 0.7,
				node_flip_probability: 0.002,
				edge_spark_probability: 0.005,
				max_frame_delta_ms: 250.0,
			},
			frame_budget: FrameBudget::Adaptive {
				ceiling_fps: 60.0,
				floor_fps: 30.0,
			},
			host: HostConfig {
				resize_debounce_ms: 200,
				max_pixel_ratio: 2.0,
				visibility_threshold: 0.1,
			},
		}
	}

	/// Checks every value the engine would otherwise have to guard at use.
	pub fn validate(&self) -> Result<(), ConfigError> {
		let l = &self.layout;
		let m = &self.motion;

		for (name, value) in [
			("node_probability", l.node_probability),
			("hub_ratio", l.hub_ratio),
			("link_probability", l.link_probability),
			("initial_node_activity", l.initial_node_activity),
			("initial_edge_activity", l.initial_edge_activity),
			("data_edge_ratio", l.data_edge_ratio),
			("reactivation_probability", m.reactivation_probability),
			("node_flip_probability", m.node_flip_probability),
			("edge_spark_probability", m.edge_spark_probability),
			("visibility_threshold", self.host.visibility_threshold),
		] {
			if !(0.0..=1.0).contains(&value) {
				return Err(ConfigError::Probability { name, value });
			}
		}

		let (floor_fps, ceiling_fps) = match self.frame_budget {
			FrameBudget::Fixed { fps } => (fps, fps),
			FrameBudget::Adaptive {
				ceiling_fps,
				floor_fps,
			} => (floor_fps, ceiling_fps),
		};

		for (name, value) in [
			("cell_size", l.cell_size),
			("wrap_threshold", m.wrap_threshold),
			("max_frame_delta_ms", m.max_frame_delta_ms),
			("max_pixel_ratio", self.host.max_pixel_ratio),
			("fps", floor_fps),
			("ceiling_fps", ceiling_fps),
		] {
			if !value.is_finite() || value <= 0.0 {
				return Err(ConfigError::NotPositive { name, value });
			}
		}

		for (name, min, max) in [
			("link distance", l.min_link_distance, l.max_link_distance),
			("speed", m.speed_min, m.speed_max),
			("frame budget", floor_fps, ceiling_fps),
		] {
			if min.is_nan() || max.is_nan() || min > max {
				return Err(ConfigError::InvertedRange { name, min, max });
			}
		}

		Ok(())
	}
}

impl Default for CircuitConfig {
	fn default() -> Self {
		Self::optimized()
	}
}
