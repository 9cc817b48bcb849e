use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_location;
use wasm_bindgen::prelude::*;

/// Below this width the sidebar cannot stay pinned; above it, it cannot stay collapsed.
const COMPACT_WIDTH: f64 = 768.0;

/// Pages reachable from the sidebar menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavTarget {
	Home,
	Graph,
}

impl NavTarget {
	pub const ALL: [NavTarget; 2] = [NavTarget::Home, NavTarget::Graph];

	pub fn path(self) -> &'static str {
		match self {
			NavTarget::Home => "/",
			NavTarget::Graph => "/graph",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			NavTarget::Home => "Home",
			NavTarget::Graph => "Settlement graph",
		}
	}

	pub fn from_path(path: &str) -> Option<Self> {
		let trimmed = path.trim_end_matches('/');
		let path = if trimmed.is_empty() { "/" } else { trimmed };
		Self::ALL.into_iter().find(|target| target.path() == path)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SidebarState {
	/// Collapsed to the icon rail.
	pub toggled: bool,
	pub pinned: bool,
	pub hovered: bool,
}

impl SidebarState {
	pub fn toggle(&mut self) {
		self.toggled = !self.toggled;
	}

	pub fn toggle_pin(&mut self) {
		self.pinned = !self.pinned;
		if !self.pinned {
			self.hovered = false;
		}
	}

	pub fn hover(&mut self, hovered: bool) {
		self.hovered = hovered;
	}

	pub fn on_resize(&mut self, width: f64) {
		if width <= COMPACT_WIDTH {
			self.pinned = false;
		}
		if width >= COMPACT_WIDTH {
			self.toggled = false;
		}
	}

	pub fn wrapper_class(&self) -> String {
		let mut class = String::from("page-wrapper");
		if self.toggled {
			class.push_str(" toggled");
		}
		if self.pinned {
			class.push_str(" pinned");
			if self.hovered {
				class.push_str(" sidebar-hovered");
			}
		}
		class
	}
}

/// Page chrome: sidebar menu around the routed content.
#[component]
pub fn Shell(children: Children) -> impl IntoView {
	let state = RwSignal::new(SidebarState::default());
	let location = use_location();
	let active = Memo::new(move |_| NavTarget::from_path(&location.pathname.get()));

	let on_resize = Closure::<dyn FnMut()>::new(move || {
		let width = web_sys::window()
			.and_then(|w| w.inner_width().ok())
			.and_then(|w| w.as_f64());
		if let Some(width) = width {
			state.update(|s| s.on_resize(width));
		}
	});
	if let Some(window) = web_sys::window() {
		let _ = window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref());
	}
	// the shell lives as long as the page
	on_resize.forget();

	view! {
		<div class=move || state.get().wrapper_class()>
			<nav
				id="sidebar"
				class="sidebar"
				on:mouseenter=move |_| state.update(|s| s.hover(true))
				on:mouseleave=move |_| state.update(|s| s.hover(false))
			>
				<div class="sidebar-buttons">
					<button id="toggle-sidebar" on:click=move |_| state.update(SidebarState::toggle)>
						"Menu"
					</button>
					<button id="pin-sidebar" on:click=move |_| state.update(SidebarState::toggle_pin)>
						"Pin"
					</button>
				</div>
				<ul class="sidebar-menu">
					{NavTarget::ALL
						.into_iter()
						.map(|target| {
							view! {
								<li class:active=move || active.get() == Some(target)>
									<A href=target.path()>{target.label()}</A>
								</li>
							}
						})
						.collect_view()}
				</ul>
			</nav>
			<div id="overlay" class="overlay" on:click=move |_| state.update(SidebarState::toggle) />
			<main id="app">{children()}</main>
		</div>
	}
}
