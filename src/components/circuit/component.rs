use leptos::prelude::*;
use log::warn;
use web_sys::HtmlCanvasElement;

use super::config::CircuitConfig;
use super::controller::Controller;

/// Full-viewport animated circuit board meant to sit behind page content.
#[component]
pub fn CircuitBackground(
	/// Engine tuning; defaults to the adaptive-rate preset.
	#[prop(default = CircuitConfig::fluid())]
	config: CircuitConfig,
	/// CSS opacity of the canvas layer.
	#[prop(default = 0.9)]
	opacity: f64,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let controller = StoredValue::new_local(None::<Controller>);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		match Controller::attach(canvas, config) {
			Ok(attached) => {
				controller.update_value(|slot| {
					if let Some(mut previous) = slot.replace(attached) {
						previous.destroy();
					}
				});
			}
			Err(e) => warn!("circuit background disabled: {e}"),
		}
	});

	on_cleanup(move || {
		controller.try_update_value(|slot| {
			if let Some(mut c) = slot.take() {
				c.destroy();
			}
		});
	});

	view! {
		<div class="circuit-background" style="position: fixed; inset: 0; z-index: -10; overflow: hidden;">
			<canvas
				node_ref=canvas_ref
				style=format!(
					"position: absolute; inset: 0; width: 100%; height: 100%; display: block; opacity: {opacity};",
				)
			/>
			<div class="circuit-glow" />
		</div>
	}
}
