use leptos::prelude::*;

/// 404 page, drawn over the same circuit board.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="page-overlay">
			<h1>"Signal lost"</h1>
			<p class="subtitle">"Nothing is wired to this address."</p>
			<a href="/">"Back to the dashboard"</a>
		</div>
	}
}
