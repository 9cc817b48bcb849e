use std::collections::HashMap;

use log::{debug, warn};
use rand::Rng;

use crate::config::{GraphConfig, NODE_RADIUS, Viewport};

use super::simulation::Simulation;
use super::surface::Surface;
use super::types::GraphData;

struct BoundNode<H> {
	circle: H,
	label: H,
}

struct BoundLink<H> {
	line: H,
	weight: H,
	source: usize,
	target: usize,
}

/// Pointer gesture on a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragEvent {
	Start(usize),
	Move(f64, f64),
	End,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node_idx: Option<usize>,
	/// Whether this gesture raised the simulation's alpha target.
	raised_target: bool,
}

/// A rendered graph: its surface, layout and the shapes bound to them.
pub struct ForceGraphState<S: Surface> {
	surface: S,
	pub simulation: Simulation,
	pub drag: DragState,
	pub width: f64,
	pub height: f64,
	config: GraphConfig,
	nodes: Vec<BoundNode<S::Shape>>,
	links: Vec<BoundLink<S::Shape>>,
}

impl<S: Surface> ForceGraphState<S> {
	/// Clear `surface` and draw `data` on it, ready to be ticked.
	///
	/// Only `directed` graphs get arrowheads on their links.
	pub fn render(
		mut surface: S,
		data: &GraphData,
		directed: bool,
		viewport: Viewport,
		config: GraphConfig,
		rng: &mut impl Rng,
	) -> Self {
		surface.clear();
		let (width, height) = config.sizing.size_for(viewport);
		surface.set_size(width, height);
		surface.define_arrow_marker();

		let mut nodes = data.nodes.clone();
		for node in &mut nodes {
			node.x = rng.r#gen::<f64>() * width;
			node.y = rng.r#gen::<f64>() * height;
		}

		let id_to_idx: HashMap<&str, usize> = nodes
			.iter()
			.enumerate()
			.map(|(i, node)| (node.id.as_str(), i))
			.collect();
		let mut pairs = Vec::with_capacity(data.links.len());
		let mut bound_links = Vec::with_capacity(data.links.len());
		for link in &data.links {
			let (Some(&source), Some(&target)) = (
				id_to_idx.get(link.source.as_str()),
				id_to_idx.get(link.target.as_str()),
			) else {
				warn!("skipping link {} -> {}: unknown endpoint", link.source, link.target);
				continue;
			};
			pairs.push((source, target));
			bound_links.push(BoundLink {
				line: surface.add_link(directed),
				weight: surface.add_weight_label(&link.weight_label()),
				source,
				target,
			});
		}

		let bound_nodes = nodes
			.iter()
			.map(|node| BoundNode {
				circle: surface.add_node(),
				label: surface.add_node_label(&node.id),
			})
			.collect();

		let simulation = Simulation::new(
			nodes,
			&pairs,
			config.simulation.clone(),
			(width / 2.0, height / 2.0),
		);

		let mut state = Self {
			surface,
			simulation,
			drag: DragState::default(),
			width,
			height,
			config,
			nodes: bound_nodes,
			links: bound_links,
		};
		state.sync();
		state
	}

	pub fn surface(&self) -> &S {
		&self.surface
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn link_count(&self) -> usize {
		self.links.len()
	}

	/// Step the layout once and move every shape to match.
	pub fn tick(&mut self) -> bool {
		if !self.simulation.tick() {
			return false;
		}
		self.sync();
		true
	}

	/// Move shapes to the simulation's current coordinates.
	pub fn sync(&mut self) {
		for link in &self.links {
			let from = self.simulation.position(link.source);
			let to = self.simulation.position(link.target);
			self.surface.move_link(&link.line, from, to);
			let mid = ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
			self.surface.move_label(&link.weight, mid);
		}
		for (idx, node) in self.nodes.iter().enumerate() {
			let at = self.simulation.position(idx);
			self.surface.move_node(&node.circle, at);
			self.surface.move_label(&node.label, at);
		}
	}

	/// Topmost node under surface coordinates `(x, y)`.
	pub fn node_at_position(&self, x: f64, y: f64) -> Option<usize> {
		self.simulation
			.nodes()
			.iter()
			.enumerate()
			.rev()
			.find(|(_, node)| {
				let (dx, dy) = (node.x - x, node.y - y);
				(dx * dx + dy * dy).sqrt() <= NODE_RADIUS
			})
			.map(|(idx, _)| idx)
	}

	pub fn drag(&mut self, event: DragEvent) {
		match event {
			DragEvent::Start(idx) => {
				if self.drag.node_idx.is_some() {
					self.drag(DragEvent::End);
				}
				let Some(node) = self.simulation.node(idx) else {
					return;
				};
				let (x, y) = (node.x, node.y);
				self.drag.raised_target = self.simulation.alpha_target() < self.config.drag_alpha_target;
				if self.drag.raised_target {
					self.simulation.set_alpha_target(self.config.drag_alpha_target);
					self.simulation.restart();
				}
				self.simulation.pin(idx, x, y);
				self.drag.node_idx = Some(idx);
			}
			DragEvent::Move(x, y) => {
				if let Some(idx) = self.drag.node_idx {
					self.simulation.pin(idx, x, y);
				}
			}
			DragEvent::End => {
				let Some(idx) = self.drag.node_idx.take() else {
					return;
				};
				if std::mem::take(&mut self.drag.raised_target) {
					self.simulation.set_alpha_target(0.0);
				}
				self.simulation.unpin(idx);
			}
		}
	}

	/// Refit the surface to a new viewport and re-run the layout around its midpoint.
	pub fn resize(&mut self, viewport: Viewport) {
		let (width, height) = self.config.sizing.size_for(viewport);
		debug!("resizing graph surface to {width}x{height}");
		self.width = width;
		self.height = height;
		self.surface.set_size(width, height);
		self.simulation.set_center(width / 2.0, height / 2.0);
		self.simulation.set_alpha(1.0);
		self.simulation.restart();
		self.sync();
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;
	use crate::components::force_graph::builder::build_graph;
	use crate::components::force_graph::types::EdgeRecord;

	#[derive(Clone, Debug, PartialEq)]
	enum Shape {
		Line { directed: bool, from: (f64, f64), to: (f64, f64) },
		Circle { at: (f64, f64) },
		Text { text: String, at: (f64, f64) },
	}

	#[derive(Default)]
	struct RecordingSurface {
		shapes: Vec<Shape>,
		size: (f64, f64),
		markers: usize,
		clears: usize,
	}

	impl RecordingSurface {
		fn lines(&self) -> Vec<&Shape> {
			self.shapes.iter().filter(|s| matches!(s, Shape::Line { .. })).collect()
		}

		fn circles(&self) -> Vec<(f64, f64)> {
			self.shapes
				.iter()
				.filter_map(|s| match s {
					Shape::Circle { at } => Some(*at),
					_ => None,
				})
				.collect()
		}
	}

	impl Surface for RecordingSurface {
		type Shape = usize;

		fn clear(&mut self) {
			self.shapes.clear();
			self.markers = 0;
			self.clears += 1;
		}

		fn set_size(&mut self, width: f64, height: f64) {
			self.size = (width, height);
		}

		fn define_arrow_marker(&mut self) {
			self.markers += 1;
		}

		fn add_link(&mut self, directed: bool) -> usize {
			self.shapes.push(Shape::Line {
				directed,
				from: (0.0, 0.0),
				to: (0.0, 0.0),
			});
			self.shapes.len() - 1
		}

		fn add_node(&mut self) -> usize {
			self.shapes.push(Shape::Circle { at: (0.0, 0.0) });
			self.shapes.len() - 1
		}

		fn add_node_label(&mut self, text: &str) -> usize {
			self.shapes.push(Shape::Text {
				text: text.into(),
				at: (0.0, 0.0),
			});
			self.shapes.len() - 1
		}

		fn add_weight_label(&mut self, text: &str) -> usize {
			self.add_node_label(text)
		}

		fn move_link(&mut self, shape: &usize, from: (f64, f64), to: (f64, f64)) {
			if let Shape::Line {
				from: f, to: t, ..
			} = &mut self.shapes[*shape]
			{
				*f = from;
				*t = to;
			}
		}

		fn move_node(&mut self, shape: &usize, at: (f64, f64)) {
			if let Shape::Circle { at: a } = &mut self.shapes[*shape] {
				*a = at;
			}
		}

		fn move_label(&mut self, shape: &usize, at: (f64, f64)) {
			if let Shape::Text { at: a, .. } = &mut self.shapes[*shape] {
				*a = at;
			}
		}
	}

	fn edge(source: &str, target: &str, qty: Option<f64>) -> EdgeRecord {
		EdgeRecord {
			source: source.into(),
			target: target.into(),
			qty,
			rate: None,
		}
	}

	fn sample() -> GraphData {
		build_graph(&[
			edge("B", "A", Some(5.0)),
			edge("A", "C", Some(2.0)),
			edge("A", "C", Some(3.0)),
			edge("C", "C", None),
			edge("D", "B", Some(1.5)),
		])
	}

	fn render(directed: bool) -> ForceGraphState<RecordingSurface> {
		ForceGraphState::render(
			RecordingSurface::default(),
			&sample(),
			directed,
			Viewport::new(1000.0, 800.0),
			GraphConfig::default(),
			&mut StdRng::seed_from_u64(7),
		)
	}

	fn assert_links_follow_nodes(state: &ForceGraphState<RecordingSurface>) {
		for link in &state.links {
			let expected_from = state.simulation.position(link.source);
			let expected_to = state.simulation.position(link.target);
			match &state.surface.shapes[link.line] {
				Shape::Line { from, to, .. } => {
					assert_eq!(*from, expected_from);
					assert_eq!(*to, expected_to);
				}
				other => panic!("expected a line, got {other:?}"),
			}
		}
		let circles = state.surface.circles();
		for (idx, at) in circles.iter().enumerate() {
			assert_eq!(*at, state.simulation.position(idx));
		}
	}

	#[test]
	fn binds_one_shape_per_node_and_link() {
		let data = sample();
		let state = render(true);
		assert_eq!(state.surface().clears, 1);
		assert_eq!(state.surface().markers, 1);
		assert_eq!(state.link_count(), data.links.len());
		assert_eq!(state.node_count(), data.nodes.len());
		assert_eq!(state.surface().lines().len(), data.links.len());
		assert_eq!(state.surface().circles().len(), data.nodes.len());
		// one id label per node plus one weight label per link
		let texts = state.surface().shapes.len() - data.links.len() - data.nodes.len();
		assert_eq!(texts, data.nodes.len() + data.links.len());
	}

	#[test]
	fn initial_positions_fall_inside_surface() {
		let state = render(false);
		assert_eq!(state.surface().size, (450.0, 560.0));
		// the first sync happens before any tick
		for node in state.simulation.nodes() {
			assert!((0.0..450.0).contains(&node.x));
			assert!((0.0..560.0).contains(&node.y));
		}
		assert_links_follow_nodes(&state);
	}

	#[test]
	fn only_directed_graphs_use_arrowheads() {
		let directed = render(true);
		assert!(directed
			.surface()
			.lines()
			.iter()
			.all(|s| matches!(s, Shape::Line { directed: true, .. })));
		let undirected = render(false);
		assert!(undirected
			.surface()
			.lines()
			.iter()
			.all(|s| matches!(s, Shape::Line { directed: false, .. })));
	}

	#[test]
	fn labels_show_ids_and_quantities() {
		let state = render(true);
		let texts: Vec<&str> = state
			.surface()
			.shapes
			.iter()
			.filter_map(|s| match s {
				Shape::Text { text, .. } => Some(text.as_str()),
				_ => None,
			})
			.collect();
		for expected in ["A", "B", "C", "D", "5", "2", "3", "1.5"] {
			assert!(texts.contains(&expected), "missing label {expected}");
		}
		// the self-loop has no quantity
		assert!(texts.contains(&""));
	}

	#[test]
	fn ticks_keep_shapes_in_sync() {
		let mut state = render(true);
		for _ in 0..25 {
			assert!(state.tick());
			assert_links_follow_nodes(&state);
		}
		for link in &state.links {
			let (from, to) = (
				state.simulation.position(link.source),
				state.simulation.position(link.target),
			);
			match &state.surface.shapes[link.weight] {
				Shape::Text { at, .. } => {
					assert_eq!(*at, ((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0));
				}
				other => panic!("expected a label, got {other:?}"),
			}
		}
	}

	#[test]
	fn layout_runs_until_rest() {
		let mut state = render(false);
		let mut ticks = 0;
		while state.tick() {
			ticks += 1;
		}
		assert!(ticks > 0);
		assert!(!state.simulation.is_running());
		assert_links_follow_nodes(&state);
	}

	#[test]
	fn drag_pins_then_releases_node() {
		let mut state = render(true);
		while state.tick() {}

		let (x, y) = state.simulation.position(1);
		state.drag(DragEvent::Start(1));
		assert!(state.simulation.is_running());
		assert_eq!(state.simulation.alpha_target(), 0.3);
		let node = state.simulation.node(1).unwrap();
		assert_eq!((node.fx, node.fy), (Some(x), Some(y)));

		state.drag(DragEvent::Move(12.0, 34.0));
		state.tick();
		assert_eq!(state.simulation.position(1), (12.0, 34.0));
		assert_links_follow_nodes(&state);

		state.drag(DragEvent::End);
		assert_eq!(state.simulation.alpha_target(), 0.0);
		let node = state.simulation.node(1).unwrap();
		assert_eq!((node.fx, node.fy), (None, None));
		assert!(state.drag.node_idx.is_none());
	}

	#[test]
	fn move_without_drag_is_ignored() {
		let mut state = render(true);
		state.drag(DragEvent::Move(1.0, 1.0));
		state.drag(DragEvent::End);
		assert!(state.simulation.nodes().iter().all(|n| n.fx.is_none()));
		assert_eq!(state.simulation.alpha_target(), 0.0);
	}

	#[test]
	fn drag_leaves_target_it_did_not_raise() {
		let mut state = render(true);
		state.simulation.set_alpha_target(0.5);

		state.drag(DragEvent::Start(0));
		assert_eq!(state.simulation.alpha_target(), 0.5);
		state.drag(DragEvent::End);
		assert_eq!(state.simulation.alpha_target(), 0.5);
		assert!(state.simulation.node(0).unwrap().fx.is_none());
	}

	#[test]
	fn new_drag_closes_unfinished_one() {
		let mut state = render(true);
		while state.tick() {}

		state.drag(DragEvent::Start(0));
		state.drag(DragEvent::Start(1));
		let first = state.simulation.node(0).unwrap();
		assert_eq!((first.fx, first.fy), (None, None));
		assert!(state.simulation.node(1).unwrap().fx.is_some());
		assert_eq!(state.drag.node_idx, Some(1));
		assert_eq!(state.simulation.alpha_target(), 0.3);

		state.drag(DragEvent::End);
		assert_eq!(state.simulation.alpha_target(), 0.0);
		assert!(state.simulation.nodes().iter().all(|n| n.fx.is_none()));
	}

	#[test]
	fn hit_test_finds_node_under_pointer() {
		let state = render(true);
		let (x, y) = state.simulation.position(2);
		let hit = state.node_at_position(x + 1.0, y - 1.0).unwrap();
		let (hx, hy) = state.simulation.position(hit);
		assert!(((hx - x - 1.0).powi(2) + (hy - y + 1.0).powi(2)).sqrt() <= NODE_RADIUS);
		assert_eq!(state.node_at_position(-500.0, -500.0), None);
	}

	#[test]
	fn resize_refits_surface_and_recenters() {
		let mut state = render(true);
		while state.tick() {}

		state.resize(Viewport::new(1600.0, 1000.0));
		assert_eq!(state.surface().size, (720.0, 700.0));
		assert_eq!((state.width, state.height), (720.0, 700.0));
		assert_eq!(state.simulation.center(), (360.0, 350.0));
		assert_eq!(state.simulation.alpha(), 1.0);
		assert!(state.simulation.is_running());

		state.tick();
		let n = state.simulation.nodes().len() as f64;
		let (mx, my) = state
			.simulation
			.nodes()
			.iter()
			.fold((0.0, 0.0), |(x, y), node| (x + node.x / n, y + node.y / n));
		// centering runs before velocities are integrated
		assert!((mx - 360.0).abs() < 50.0);
		assert!((my - 350.0).abs() < 50.0);
		assert_links_follow_nodes(&state);
	}

	#[test]
	fn empty_graph_renders_blank_surface() {
		let state = ForceGraphState::render(
			RecordingSurface::default(),
			&GraphData::default(),
			false,
			Viewport::new(800.0, 600.0),
			GraphConfig::default(),
			&mut StdRng::seed_from_u64(1),
		);
		assert_eq!(state.node_count(), 0);
		assert!(state.surface().shapes.is_empty());
	}
}
