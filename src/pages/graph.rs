use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, info};

use crate::api::{ApiClient, GraphKind};
use crate::components::force_graph::{ForceGraphSvg, GraphData, build_graph};
use crate::error::ApiError;
use crate::view_state::{RequestTicket, RequestTracker, Selection};

/// Fetch one graph and hand it to `target` unless the selection moved on meanwhile.
fn spawn_graph_fetch(
	client: ApiClient,
	tracker: Rc<RequestTracker>,
	ticket: RequestTicket,
	kind: GraphKind,
	target: RwSignal<Option<GraphData>>,
) {
	spawn_local(async move {
		match client.graph(kind, &ticket.selection).await {
			Ok(edges) if tracker.is_current(&ticket) => {
				target.set(Some(build_graph(&edges)));
			}
			Ok(_) => debug!(
				"dropping stale {} graph for {:?}",
				kind.as_str(),
				ticket.selection
			),
			Err(e) => error!("failed to load {} graph: {e}", kind.as_str()),
		}
	});
}

/// Load one lookup list into `target`, sorted for display.
fn spawn_lookup(
	name: &'static str,
	fetch: impl Future<Output = Result<Vec<String>, ApiError>> + 'static,
	target: RwSignal<Vec<String>>,
) {
	spawn_local(async move {
		match fetch.await {
			Ok(mut values) => {
				values.sort();
				info!("loaded {} {name}", values.len());
				target.set(values);
			}
			Err(e) => error!("failed to load {name}: {e}"),
		}
	});
}

#[component]
fn LookupSelect(
	id: &'static str,
	placeholder: &'static str,
	options: RwSignal<Vec<String>>,
	on_pick: Callback<String>,
) -> impl IntoView {
	view! {
		<select id=id on:change=move |ev| on_pick.run(event_target_value(&ev))>
			<option value="">{placeholder}</option>
			<For
				each=move || options.get()
				key=|value| value.clone()
				children=move |value: String| {
					view! { <option value=value.clone()>{value.clone()}</option> }
				}
			/>
		</select>
	}
}

/// Raw and normalized settlement graphs for the chosen entity and symbol.
#[component]
pub fn GraphPage() -> impl IntoView {
	let client = ApiClient::new("");
	let entities = RwSignal::new(Vec::<String>::new());
	let symbols = RwSignal::new(Vec::<String>::new());
	let selection = RwSignal::new(Selection::default());
	let before = RwSignal::new(None::<GraphData>);
	let after = RwSignal::new(None::<GraphData>);
	let tracker = Rc::new(RequestTracker::default());

	let lookup_client = client.clone();
	spawn_lookup("entities", async move { lookup_client.entities().await }, entities);
	let lookup_client = client.clone();
	spawn_lookup("symbols", async move { lookup_client.symbols().await }, symbols);

	Effect::new(move |_| {
		let current = selection.get();
		if !current.is_complete() {
			return;
		}
		debug!("requesting graphs for {current:?}");
		let ticket = tracker.begin(current);
		for (kind, target) in [(GraphKind::Raw, before), (GraphKind::Normalized, after)] {
			spawn_graph_fetch(client.clone(), tracker.clone(), ticket.clone(), kind, target);
		}
	});

	view! {
		<div class="graph-page">
			<div class="graph-controls">
				<LookupSelect
					id="entity-select"
					placeholder="Select entity"
					options=entities
					on_pick=Callback::new(move |entity: String| selection.update(|s| s.entity = entity))
				/>
				<LookupSelect
					id="symbol-select"
					placeholder="Select symbol"
					options=symbols
					on_pick=Callback::new(move |symbol: String| selection.update(|s| s.symbol = symbol))
				/>
			</div>
			<div class="graph-pair">
				<section>
					<h2>"Before normalization"</h2>
					<ForceGraphSvg id="before-graph" data=before directed=true />
				</section>
				<section>
					<h2>"After normalization"</h2>
					<ForceGraphSvg id="after-graph" data=after />
				</section>
			</div>
		</div>
	}
}
