use leptos::prelude::*;

/// Dashboard shell: the panels themselves are rendered by the host page,
/// this only provides the title overlay.
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<div class="page-overlay">
				<h1>"Threat Monitor"</h1>
				<p class="subtitle">"Live circuit activity across the network fabric."</p>
			</div>
		</ErrorBoundary>
	}
}
