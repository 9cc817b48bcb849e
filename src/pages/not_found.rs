use leptos::prelude::*;

/// 404 page
#[component]
pub fn NotFound() -> impl IntoView {
	view! { <h1>"Error: Page not found"</h1> }
}
