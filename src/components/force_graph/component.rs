use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info};
use wasm_bindgen::prelude::*;
use web_sys::{MouseEvent, Window};

use crate::config::{GraphConfig, Viewport};

use super::frame::FrameGate;
use super::state::{DragEvent, ForceGraphState};
use super::surface::SvgSurface;
use super::types::GraphData;

type FrameCallback = RefCell<Option<Closure<dyn FnMut()>>>;

/// What one mounted graph holds on to between frames.
#[derive(Default)]
struct Bindings {
	state: RefCell<Option<ForceGraphState<SvgSurface>>>,
	animate: FrameCallback,
	resize: FrameCallback,
	frame: FrameGate,
}

impl Bindings {
	/// Request the next layout frame unless one is already pending.
	fn schedule(&self) {
		self.frame.arm(|| {
			let animate = self.animate.borrow();
			let cb = animate.as_ref()?;
			web_sys::window()?
				.request_animation_frame(cb.as_ref().unchecked_ref())
				.ok()
		});
	}

	/// Detach from the window and drop the layout and both callbacks.
	fn teardown(&self) {
		if let Some(window) = web_sys::window() {
			if let Some(handle) = self.frame.disarm() {
				let _ = window.cancel_animation_frame(handle);
			}
			if let Some(cb) = self.resize.borrow().as_ref() {
				let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		self.resize.borrow_mut().take();
		self.animate.borrow_mut().take();
		self.state.borrow_mut().take();
	}
}

fn viewport(window: &Window) -> Viewport {
	Viewport::new(
		window.inner_width().ok().and_then(|w| w.as_f64()).unwrap_or(800.0),
		window.inner_height().ok().and_then(|h| h.as_f64()).unwrap_or(600.0),
	)
}

/// Force-directed SVG drawing of `data`, redrawn from scratch whenever it changes.
#[component]
pub fn ForceGraphSvg(
	#[prop(into)] id: String,
	#[prop(into)] data: Signal<Option<GraphData>>,
	#[prop(default = false)] directed: bool,
) -> impl IntoView {
	let bindings = Rc::new(Bindings::default());
	let selector = format!("#{id}");

	let owned = StoredValue::new_local(bindings.clone());
	on_cleanup(move || {
		let _ = owned.try_with_value(|b| b.teardown());
	});

	let b = bindings.clone();
	Effect::new(move |_| {
		let Some(graph) = data.get() else {
			return;
		};
		let window: Window = web_sys::window().expect("no global window");

		let rendered = ForceGraphState::render(
			SvgSurface::bind(&selector),
			&graph,
			directed,
			viewport(&window),
			GraphConfig::default(),
			&mut rand::thread_rng(),
		);
		info!(
			"rendered {selector}: {} nodes, {} links",
			rendered.node_count(),
			rendered.link_count()
		);
		*b.state.borrow_mut() = Some(rendered);

		if b.resize.borrow().is_none() {
			let on_resize = b.clone();
			let cb = Closure::<dyn FnMut()>::new(move || {
				let Some(win) = web_sys::window() else {
					return;
				};
				let resized = match *on_resize.state.borrow_mut() {
					Some(ref mut s) if s.surface().is_attached() => {
						s.resize(viewport(&win));
						true
					}
					_ => false,
				};
				if resized {
					on_resize.schedule();
				}
			});
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			*b.resize.borrow_mut() = Some(cb);
		}

		if b.animate.borrow().is_none() {
			let (on_frame, name) = (b.clone(), selector.clone());
			*b.animate.borrow_mut() = Some(Closure::new(move || {
				on_frame.frame.fired();
				let running = match *on_frame.state.borrow_mut() {
					Some(ref mut s) if s.surface().is_attached() => s.tick(),
					Some(_) => {
						debug!("{name} left the document; stopping layout");
						false
					}
					None => false,
				};
				// at rest: the next drag, resize or render re-arms
				if running {
					on_frame.schedule();
				}
			}));
		}
		b.schedule();
	});

	let b_md = bindings.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let started = match *b_md.state.borrow_mut() {
			Some(ref mut s) => {
				let (x, y) = s.surface().local_point(ev.client_x() as f64, ev.client_y() as f64);
				let hit = s.node_at_position(x, y);
				if let Some(idx) = hit {
					ev.prevent_default();
					s.drag(DragEvent::Start(idx));
				}
				hit.is_some()
			}
			None => false,
		};
		if started {
			b_md.schedule();
		}
	};

	let b_mm = bindings.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some(ref mut s) = *b_mm.state.borrow_mut() {
			if s.drag.node_idx.is_some() {
				let (x, y) = s.surface().local_point(ev.client_x() as f64, ev.client_y() as f64);
				s.drag(DragEvent::Move(x, y));
			}
		}
	};

	let b_mu = bindings.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *b_mu.state.borrow_mut() {
			s.drag(DragEvent::End);
		}
	};

	let b_ml = bindings;
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *b_ml.state.borrow_mut() {
			s.drag(DragEvent::End);
		}
	};

	view! {
		<svg
			id=id
			class="force-graph"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			style="display: block; cursor: grab;"
		/>
	}
}
