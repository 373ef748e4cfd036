//! Frame governor: turns an unthrottled per-frame callback into a
//! fixed-rate tick and keeps a running FPS measurement.

use log::{debug, info};

use super::config::FrameBudget;

const STATS_WINDOW_MS: f64 = 1000.0;
/// A measured second below this share of the target counts as overloaded.
const DOWNGRADE_RATIO: f64 = 0.75;

#[derive(Clone, Debug, Default)]
struct FrameStats {
	frames: u32,
	window_start: Option<f64>,
	last_fps: Option<f64>,
}

impl FrameStats {
	/// Counts one admitted frame, returning the achieved rate whenever a
	/// full window has elapsed.
	fn record(&mut self, now: f64) -> Option<f64> {
		let start = *self.window_start.get_or_insert(now);
		self.frames += 1;

		let elapsed = now - start;
		if elapsed < STATS_WINDOW_MS {
			return None;
		}
		let fps = f64::from(self.frames) * 1000.0 / elapsed;
		self.frames = 0;
		self.window_start = Some(now);
		self.last_fps = Some(fps);
		Some(fps)
	}

	/// Starts a new window at `now`, dropping the partial count.
	fn restart(&mut self, now: f64) {
		self.frames = 0;
		self.window_start = Some(now);
	}
}

#[derive(Clone, Debug)]
pub struct FrameGovernor {
	budget: FrameBudget,
	target_fps: f64,
	max_delta_ms: f64,
	last_frame: Option<f64>,
	stats: FrameStats,
}

impl FrameGovernor {
	pub fn new(budget: FrameBudget, max_delta_ms: f64) -> Self {
		Self {
			budget,
			target_fps: budget.initial_fps(),
			max_delta_ms,
			last_frame: None,
			stats: FrameStats::default(),
		}
	}

	pub fn target_fps(&self) -> f64 {
		self.target_fps
	}

	pub fn frame_interval(&self) -> f64 {
		1000.0 / self.target_fps
	}

	/// Achieved rate over the last complete one-second window.
	pub fn measured_fps(&self) -> Option<f64> {
		self.stats.last_fps
	}

	/// Admits a tick at `now` (ms) if at least one frame interval has
	/// passed since the previous admitted tick, returning the clamped delta.
	/// The first call is always admitted with a zero delta. A gap longer
	/// than the delta clamp (a suspended tab) restarts the FPS window
	/// instead of counting as load.
	pub fn admit(&mut self, now: f64) -> Option<f64> {
		let delta = match self.last_frame {
			None => 0.0,
			Some(last) => {
				let delta = now - last;
				if delta < self.frame_interval() {
					return None;
				}
				delta
			}
		};
		self.last_frame = Some(now);

		if delta > self.max_delta_ms {
			debug!("circuit background: resumed after {delta:.0} ms gap");
			self.stats.restart(now);
		} else if let Some(fps) = self.stats.record(now) {
			debug!("circuit background: {fps:.1} fps (target {:.0})", self.target_fps);
			self.maybe_downgrade(fps);
		}

		Some(delta.min(self.max_delta_ms))
	}

	fn maybe_downgrade(&mut self, fps: f64) {
		let FrameBudget::Adaptive { floor_fps, .. } = self.budget else {
			return;
		};
		if self.target_fps > floor_fps && fps < self.target_fps * DOWNGRADE_RATIO {
			info!(
				"circuit background: {fps:.1} fps below {:.0} target, dropping to {floor_fps:.0}",
				self.target_fps
			);
			self.target_fps = floor_fps;
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn first_tick_is_admitted_with_zero_delta() {
		let mut governor = FrameGovernor::new(FrameBudget::Fixed { fps: 30.0 }, 250.0);
		assert_eq!(governor.admit(5000.0), Some(0.0));
		assert_eq!(governor.admit(5010.0), None);
	}

	#[test]
	fn at_most_target_ticks_per_simulated_second() {
		let mut governor = FrameGovernor::new(FrameBudget::Fixed { fps: 30.0 }, 250.0);
		let admitted = (0..1000).filter(|&ms| governor.admit(f64::from(ms)).is_some()).count();
		assert!(admitted <= 30, "{admitted} ticks admitted");
		assert!(admitted >= 25, "{admitted} ticks admitted");
	}

	#[test]
	fn sub_millisecond_callbacks_are_throttled_too() {
		let mut governor = FrameGovernor::new(FrameBudget::Fixed { fps: 30.0 }, 250.0);
		let admitted = (0..10_000)
			.filter(|&step| governor.admit(f64::from(step) * 0.1).is_some())
			.count();
		assert!(admitted <= 30);
	}

	#[test]
	fn delta_is_clamped_after_long_pause() {
		let mut governor = FrameGovernor::new(FrameBudget::Fixed { fps: 30.0 }, 250.0);
		governor.admit(0.0);
		assert_eq!(governor.admit(40.0), Some(40.0));
		assert_eq!(governor.admit(10_000.0), Some(250.0));
	}

	#[test]
	fn adaptive_budget_drops_to_floor_under_load() {
		let mut governor = FrameGovernor::new(
			FrameBudget::Adaptive {
				ceiling_fps: 60.0,
				floor_fps: 30.0,
			},
			250.0,
		);
		assert_eq!(governor.target_fps(), 60.0);

		// A display delivering only 25 frames a second.
		let mut now = 0.0;
		for _ in 0..30 {
			governor.admit(now);
			now += 40.0;
		}
		assert_eq!(governor.target_fps(), 30.0);
		assert!(governor.measured_fps().is_some_and(|fps| fps < 45.0));
	}

	#[test]
	fn adaptive_budget_holds_when_display_keeps_up() {
		let mut governor = FrameGovernor::new(
			FrameBudget::Adaptive {
				ceiling_fps: 60.0,
				floor_fps: 30.0,
			},
			250.0,
		);
		let mut now = 0.0;
		for _ in 0..130 {
			governor.admit(now);
			now += 17.0;
		}
		assert_eq!(governor.target_fps(), 60.0);
	}

	#[test]
	fn suspended_frames_do_not_trigger_downgrade() {
		let mut governor = FrameGovernor::new(
			FrameBudget::Adaptive {
				ceiling_fps: 60.0,
				floor_fps: 30.0,
			},
			250.0,
		);
		let mut now = 0.0;
		for _ in 0..30 {
			governor.admit(now);
			now += 17.0;
		}
		// Background tab: no animation frames for ten seconds.
		now += 10_000.0;
		for _ in 0..200 {
			governor.admit(now);
			now += 17.0;
		}
		assert_eq!(governor.target_fps(), 60.0);
		assert!(governor.measured_fps().is_some_and(|fps| fps > 55.0));
	}

	#[test]
	fn fixed_budget_never_changes() {
		let mut governor = FrameGovernor::new(FrameBudget::Fixed { fps: 30.0 }, 250.0);
		let mut now = 0.0;
		for _ in 0..20 {
			governor.admit(now);
			now += 200.0;
		}
		assert_eq!(governor.target_fps(), 30.0);
	}
}
