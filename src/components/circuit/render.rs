use std::f64::consts::{PI, TAU};
use std::fmt;

use web_sys::CanvasRenderingContext2d;

use super::types::{EdgeKind, Node, NodeKind};

/// Share of the major axis travelled before a trace turns.
const TRACE_TURN: f64 = 0.7;

const POWER_RGB: (u8, u8, u8) = (0, 212, 255);
const DATA_RGB: (u8, u8, u8) = (77, 208, 225);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Rgba {
	pub const fn new((r, g, b): (u8, u8, u8), a: f64) -> Self {
		Self { r, g, b, a }
	}
}

impl fmt::Display for Rgba {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

/// The drawing primitives the render loop needs from a 2D surface.
/// Coordinates are logical pixels.
pub trait Surface {
	fn clear(&mut self, width: f64, height: f64);
	/// Fills the rectangle with a gradient centred on `(cx, cy)`.
	fn fill_radial_rect(&mut self, width: f64, height: f64, cx: f64, cy: f64, radius: f64, stops: &[(f64, Rgba)]);
	fn stroke_polyline(&mut self, points: &[Point], color: Rgba, line_width: f64);
	/// Fills a disc whose colour fades out along `stops`.
	fn fill_glow(&mut self, center: Point, radius: f64, stops: &[(f64, Rgba)]);
	fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba);
	fn stroke_circle(&mut self, center: Point, radius: f64, color: Rgba, line_width: f64);
}

/// An edge's orthogonal "L" path: along the major axis for 70 % of the
/// way, across, then the remaining stretch into the end node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Trace {
	pub points: [Point; 4],
}

impl Trace {
	pub fn between(start: &Node, end: &Node) -> Self {
		let (dx, dy) = (end.x - start.x, end.y - start.y);
		let a = Point { x: start.x, y: start.y };
		let d = Point { x: end.x, y: end.y };
		let (b, c) = if dx.abs() > dy.abs() {
			let mid_x = start.x + dx * TRACE_TURN;
			(Point { x: mid_x, y: start.y }, Point { x: mid_x, y: end.y })
		} else {
			let mid_y = start.y + dy * TRACE_TURN;
			(Point { x: start.x, y: mid_y }, Point { x: end.x, y: mid_y })
		};
		Self { points: [a, b, c, d] }
	}

	fn segment_lengths(&self) -> [f64; 3] {
		let p = &self.points;
		[0usize, 1, 2].map(|i| (p[i + 1].x - p[i].x).hypot(p[i + 1].y - p[i].y))
	}

	/// Point at fraction `t` of the trace's length, clamped to `[0, 1]`.
	pub fn at(&self, t: f64) -> Point {
		let lengths = self.segment_lengths();
		let total: f64 = lengths.iter().sum();
		if total <= f64::EPSILON {
			return self.points[0];
		}

		let mut remaining = t.clamp(0.0, 1.0) * total;
		for (i, len) in lengths.into_iter().enumerate() {
			if remaining <= len && len > 0.0 {
				let f = remaining / len;
				let (p, q) = (self.points[i], self.points[i + 1]);
				return Point {
					x: p.x + (q.x - p.x) * f,
					y: p.y + (q.y - p.y) * f,
				};
			}
			remaining -= len;
		}
		self.points[3]
	}
}

/// Pulse brightness: fades in from 0.2 and back out over the traversal.
pub fn pulse_intensity(progress: f64) -> f64 {
	(progress * PI).sin() * 0.8 + 0.2
}

fn edge_rgb(kind: EdgeKind) -> (u8, u8, u8) {
	match kind {
		EdgeKind::Power => POWER_RGB,
		EdgeKind::Data => DATA_RGB,
	}
}

pub fn draw_background<S: Surface + ?Sized>(surface: &mut S, width: f64, height: f64) {
	surface.clear(width, height);
	surface.fill_radial_rect(
		width,
		height,
		width / 2.0,
		height / 2.0,
		width.max(height) / 2.0,
		&[
			(0.0, Rgba::new((10, 14, 26), 0.95)),
			(0.5, Rgba::new((13, 20, 33), 0.98)),
			(1.0, Rgba::new((10, 14, 26), 1.0)),
		],
	);
}

pub fn draw_trace<S: Surface + ?Sized>(surface: &mut S, trace: &Trace, kind: EdgeKind, active: bool) {
	let opacity = if active { 0.4 } else { 0.2 };
	let width = match kind {
		EdgeKind::Power => 2.0,
		EdgeKind::Data => 1.5,
	};
	surface.stroke_polyline(&trace.points, Rgba::new(edge_rgb(kind), opacity), width);
}

pub fn draw_pulse<S: Surface + ?Sized>(surface: &mut S, at: Point, intensity: f64, kind: EdgeKind) {
	let max_radius = match kind {
		EdgeKind::Power => 10.0,
		EdgeKind::Data => 6.0,
	};
	let rgb = edge_rgb(kind);
	surface.fill_glow(
		at,
		max_radius * intensity,
		&[
			(0.0, Rgba::new(rgb, 0.8 * intensity)),
			(0.5, Rgba::new(rgb, 0.3 * intensity)),
			(1.0, Rgba::new(rgb, 0.0)),
		],
	);
}

pub fn draw_node<S: Surface + ?Sized>(surface: &mut S, node: &Node, now: f64) {
	let (base_radius, glow_radius) = match node.kind {
		NodeKind::Hub => (3.5, 15.0),
		NodeKind::Normal => (2.5, 12.0),
	};
	let center = Point { x: node.x, y: node.y };
	let fill = if node.active { 0.9 } else { 0.4 };
	surface.fill_circle(center, base_radius, Rgba::new(POWER_RGB, fill));

	if node.active {
		surface.fill_glow(
			center,
			glow_radius,
			&[(0.0, Rgba::new(POWER_RGB, 0.2)), (1.0, Rgba::new(POWER_RGB, 0.0))],
		);

		let phase = (now * 0.002 + node.pulse_delay * 0.001) % TAU;
		let ring_radius = base_radius + 3.0 + phase.sin() * 2.0;
		let ring_opacity = 0.4 + phase.sin() * 0.2;
		surface.stroke_circle(center, ring_radius, Rgba::new(POWER_RGB, ring_opacity), 1.5);
	}

	if !node.connections.is_empty() {
		surface.fill_circle(center, 1.0, Rgba::new((255, 255, 255), 0.8));
	}
}

impl Surface for CanvasRenderingContext2d {
	fn clear(&mut self, width: f64, height: f64) {
		self.clear_rect(0.0, 0.0, width, height);
	}

	fn fill_radial_rect(&mut self, width: f64, height: f64, cx: f64, cy: f64, radius: f64, stops: &[(f64, Rgba)]) {
		let Ok(gradient) = self.create_radial_gradient(cx, cy, 0.0, cx, cy, radius) else {
			return;
		};
		for (offset, color) in stops {
			let _ = gradient.add_color_stop(*offset as f32, &color.to_string());
		}
		#[allow(deprecated)]
		self.set_fill_style(&gradient);
		self.fill_rect(0.0, 0.0, width, height);
	}

	fn stroke_polyline(&mut self, points: &[Point], color: Rgba, line_width: f64) {
		let Some((first, rest)) = points.split_first() else {
			return;
		};
		self.set_stroke_style_str(&color.to_string());
		self.set_line_width(line_width);
		self.set_line_cap("round");
		self.set_line_join("round");
		self.begin_path();
		self.move_to(first.x, first.y);
		for p in rest {
			self.line_to(p.x, p.y);
		}
		self.stroke();
	}

	fn fill_glow(&mut self, center: Point, radius: f64, stops: &[(f64, Rgba)]) {
		if radius <= 0.0 {
			return;
		}
		let Ok(gradient) = self.create_radial_gradient(center.x, center.y, 0.0, center.x, center.y, radius) else {
			return;
		};
		for (offset, color) in stops {
			let _ = gradient.add_color_stop(*offset as f32, &color.to_string());
		}
		self.begin_path();
		let _ = self.arc(center.x, center.y, radius, 0.0, TAU);
		#[allow(deprecated)]
		self.set_fill_style(&gradient);
		self.fill();
	}

	fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
		self.begin_path();
		let _ = self.arc(center.x, center.y, radius, 0.0, TAU);
		self.set_fill_style_str(&color.to_string());
		self.fill();
	}

	fn stroke_circle(&mut self, center: Point, radius: f64, color: Rgba, line_width: f64) {
		self.begin_path();
		let _ = self.arc(center.x, center.y, radius, 0.0, TAU);
		self.set_stroke_style_str(&color.to_string());
		self.set_line_width(line_width);
		self.stroke();
	}
}
