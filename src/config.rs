//! Tunables for layout, sizing and drag behaviour.

/// Node circle radius in surface pixels.
pub const NODE_RADIUS: f64 = 20.0;

/// Offset of the arrowhead tip from the link end, in marker units.
pub const ARROW_REF_X: f64 = 38.0;

/// Window dimensions in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}
}

/// Fraction of the viewport each graph surface occupies.
///
/// The same policy applies on first render and on every resize, so two
/// graphs always fit side by side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSizing {
	pub width_fraction: f64,
	pub height_fraction: f64,
}

impl Default for SurfaceSizing {
	fn default() -> Self {
		Self {
			width_fraction: 0.45,
			height_fraction: 0.7,
		}
	}
}

impl SurfaceSizing {
	pub fn size_for(&self, viewport: Viewport) -> (f64, f64) {
		(
			viewport.width * self.width_fraction,
			viewport.height * self.height_fraction,
		)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
	/// Rest length of every link.
	pub link_distance: f64,
	/// Many-body strength; negative values repel.
	pub charge_strength: f64,
	/// Lower bound on squared distances in the many-body force.
	pub distance_min: f64,
	/// The simulation stops stepping once alpha drops below this.
	pub alpha_min: f64,
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		let alpha_min: f64 = 0.001;
		Self {
			link_distance: 100.0,
			charge_strength: -200.0,
			distance_min: 1.0,
			alpha_min,
			// reaches alpha_min from 1.0 in ~300 ticks
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphConfig {
	pub simulation: SimulationConfig,
	pub sizing: SurfaceSizing,
	/// Alpha target held while a node is dragged.
	pub drag_alpha_target: f64,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			simulation: SimulationConfig::default(),
			sizing: SurfaceSizing::default(),
			drag_alpha_target: 0.3,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sizing_uses_fractions_of_viewport() {
		let (w, h) = SurfaceSizing::default().size_for(Viewport::new(1000.0, 800.0));
		assert!((w - 450.0).abs() < 1e-9);
		assert!((h - 560.0).abs() < 1e-9);
	}

	#[test]
	fn alpha_decays_to_min_in_about_300_ticks() {
		let config = SimulationConfig::default();
		let mut alpha = 1.0;
		let mut ticks = 0;
		while alpha >= config.alpha_min {
			alpha -= alpha * config.alpha_decay;
			ticks += 1;
		}
		assert!((299..=301).contains(&ticks), "took {ticks} ticks");
	}
}
