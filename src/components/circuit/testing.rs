//! Recording surface for exercising the render loop off the browser.

use super::render::{Point, Rgba, Surface};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
	Clear,
	Background,
	Trace,
	Glow,
	Circle,
	Ring,
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
	pub ops: Vec<Op>,
}

impl RecordingSurface {
	pub fn count(&self, op: Op) -> usize {
		self.ops.iter().filter(|&&o| o == op).count()
	}

	pub fn take(&mut self) -> Vec<Op> {
		std::mem::take(&mut self.ops)
	}
}

impl Surface for RecordingSurface {
	fn clear(&mut self, _: f64, _: f64) {
		self.ops.push(Op::Clear);
	}

	fn fill_radial_rect(&mut self, _: f64, _: f64, _: f64, _: f64, _: f64, _: &[(f64, Rgba)]) {
		self.ops.push(Op::Background);
	}

	fn stroke_polyline(&mut self, _: &[Point], _: Rgba, _: f64) {
		self.ops.push(Op::Trace);
	}

	fn fill_glow(&mut self, _: Point, _: f64, _: &[(f64, Rgba)]) {
		self.ops.push(Op::Glow);
	}

	fn fill_circle(&mut self, _: Point, _: f64, _: Rgba) {
		self.ops.push(Op::Circle);
	}

	fn stroke_circle(&mut self, _: Point, _: f64, _: Rgba, _: f64) {
		self.ops.push(Op::Ring);
	}
}
