use leptos::prelude::*;
use leptos_router::components::A;

use crate::components::sidebar::NavTarget;

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<div class="home">
			<h1>"Settlement dashboard"</h1>
			<p class="subtitle">
				"Compare recorded transactions with their netted settlement obligations."
			</p>
			<A href=NavTarget::Graph.path()>"Open the settlement graph"</A>
		</div>
	}
}
