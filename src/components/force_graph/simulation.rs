//! Force-directed layout engine.
//!
//! Each [`Simulation::tick`] applies a spring force along links, pairwise
//! repulsion between all nodes and a centering translation, then integrates
//! velocities. Activity is governed by `alpha`, which decays toward
//! `alpha_target`; the simulation stops stepping once alpha falls below
//! `alpha_min` until it is restarted.

use crate::config::SimulationConfig;

use super::types::GraphNode;

/// A link resolved to node indices.
#[derive(Clone, Debug, PartialEq)]
pub struct ForceLink {
	pub source: usize,
	pub target: usize,
	strength: f64,
	bias: f64,
}

#[derive(Clone, Debug)]
pub struct Simulation {
	nodes: Vec<GraphNode>,
	links: Vec<ForceLink>,
	config: SimulationConfig,
	center: (f64, f64),
	alpha: f64,
	alpha_target: f64,
	running: bool,
}

impl Simulation {
	/// `links` are `(source, target)` indices into `nodes`.
	pub fn new(
		nodes: Vec<GraphNode>,
		links: &[(usize, usize)],
		config: SimulationConfig,
		center: (f64, f64),
	) -> Self {
		let mut degree = vec![0usize; nodes.len()];
		let springs: Vec<(usize, usize)> = links
			.iter()
			.copied()
			.filter(|&(s, t)| s != t && s < nodes.len() && t < nodes.len())
			.collect();
		for &(s, t) in &springs {
			degree[s] += 1;
			degree[t] += 1;
		}
		let links = springs
			.into_iter()
			.map(|(source, target)| {
				let (ds, dt) = (degree[source] as f64, degree[target] as f64);
				ForceLink {
					source,
					target,
					strength: 1.0 / ds.min(dt),
					bias: ds / (ds + dt),
				}
			})
			.collect();

		Self {
			nodes,
			links,
			config,
			center,
			alpha: 1.0,
			alpha_target: 0.0,
			running: true,
		}
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn node(&self, idx: usize) -> Option<&GraphNode> {
		self.nodes.get(idx)
	}

	pub fn position(&self, idx: usize) -> (f64, f64) {
		let node = &self.nodes[idx];
		(node.x, node.y)
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn set_alpha(&mut self, alpha: f64) {
		self.alpha = alpha;
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target;
	}

	pub fn center(&self) -> (f64, f64) {
		self.center
	}

	pub fn set_center(&mut self, x: f64, y: f64) {
		self.center = (x, y);
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Resume stepping after the simulation came to rest.
	pub fn restart(&mut self) {
		self.running = true;
	}

	/// Hold a node at the given coordinates.
	pub fn pin(&mut self, idx: usize, x: f64, y: f64) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.fx = Some(x);
			node.fy = Some(y);
		}
	}

	pub fn unpin(&mut self, idx: usize) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.fx = None;
			node.fy = None;
		}
	}

	/// Advance one step. Returns `false` when the simulation is at rest.
	pub fn tick(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

		self.apply_links();
		self.apply_charge();
		self.apply_center();

		let retain = 1.0 - self.config.velocity_decay;
		for node in &mut self.nodes {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= retain;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= retain;
					node.y += node.vy;
				}
			}
		}

		if self.alpha < self.config.alpha_min {
			self.running = false;
		}
		true
	}

	fn apply_links(&mut self) {
		let (distance, alpha) = (self.config.link_distance, self.alpha);
		for (i, link) in self.links.iter().enumerate() {
			let (s, t) = (&self.nodes[link.source], &self.nodes[link.target]);
			let mut dx = t.x + t.vx - s.x - s.vx;
			let mut dy = t.y + t.vy - s.y - s.vy;
			if dx == 0.0 {
				dx = jiggle(i);
			}
			if dy == 0.0 {
				dy = jiggle(i + 1);
			}
			let len = (dx * dx + dy * dy).sqrt();
			let k = (len - distance) / len * alpha * link.strength;
			let (dx, dy) = (dx * k, dy * k);

			let t = &mut self.nodes[link.target];
			t.vx -= dx * link.bias;
			t.vy -= dy * link.bias;
			let s = &mut self.nodes[link.source];
			s.vx += dx * (1.0 - link.bias);
			s.vy += dy * (1.0 - link.bias);
		}
	}

	fn apply_charge(&mut self) {
		let strength = self.config.charge_strength * self.alpha;
		let min2 = self.config.distance_min * self.config.distance_min;
		let n = self.nodes.len();
		for i in 0..n {
			for j in (i + 1)..n {
				let mut dx = self.nodes[j].x - self.nodes[i].x;
				let mut dy = self.nodes[j].y - self.nodes[i].y;
				if dx == 0.0 {
					dx = jiggle(i + j);
				}
				if dy == 0.0 {
					dy = jiggle(i * n + j);
				}
				let mut l2 = dx * dx + dy * dy;
				if l2 < min2 {
					l2 = (min2 * l2).sqrt();
				}
				let w = strength / l2;
				self.nodes[i].vx += dx * w;
				self.nodes[i].vy += dy * w;
				self.nodes[j].vx -= dx * w;
				self.nodes[j].vy -= dy * w;
			}
		}
	}

	fn apply_center(&mut self) {
		if self.nodes.is_empty() {
			return;
		}
		let n = self.nodes.len() as f64;
		let (sx, sy) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let (shift_x, shift_y) = (sx / n - self.center.0, sy / n - self.center.1);
		for node in &mut self.nodes {
			node.x -= shift_x;
			node.y -= shift_y;
		}
	}
}

/// Tiny deterministic offset that separates coincident points.
fn jiggle(seed: usize) -> f64 {
	let magnitude = ((seed % 7) as f64 + 1.0) * 1e-6;
	if seed % 2 == 0 { magnitude } else { -magnitude }
}
