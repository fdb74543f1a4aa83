//! Zoom-dependent scaling for graph visuals.
//!
//! Drawing happens in world space after the canvas transform is applied, so
//! anything that should keep a fixed pixel size has to be divided by the zoom
//! factor `k`. [`ScaleBehavior`] names the three ways a size can react to zoom.

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world-space size. Appears larger when zoomed in.
	World,
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space value for `base` at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Sizes for every drawn element.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Node radius in world units.
	pub node_radius: f64,
	pub node_behavior: ScaleBehavior,
	/// Hit detection radius in world units.
	pub hit_radius: f64,
	pub hit_behavior: ScaleBehavior,
	/// Hover label size in screen pixels.
	pub label_size: f64,
	/// Link width in screen pixels.
	pub edge_width: f64,
	/// Arrow head length in world units.
	pub arrow_size: f64,
	/// Flow particle radius in world units.
	pub particle_radius: f64,
	/// Hover ring stroke and offset in screen pixels.
	pub ring_width: f64,
	pub ring_offset: f64,
	/// Bounding box stroke in world units.
	pub chrome_line_width: f64,
	/// Event label size in world units.
	pub chrome_label_size: f64,
	pub font_family: &'static str,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node_radius: 4.0,
			node_behavior: ScaleBehavior::Clamped {
				min_screen: 3.0,
				max_screen: f64::INFINITY,
			},
			hit_radius: 10.0,
			hit_behavior: ScaleBehavior::Clamped {
				min_screen: 5.0,
				max_screen: f64::INFINITY,
			},
			label_size: 12.0,
			edge_width: 1.0,
			arrow_size: 4.0,
			particle_radius: 2.0,
			ring_width: 1.5,
			ring_offset: 2.0,
			chrome_line_width: 4.0,
			chrome_label_size: 16.0,
			font_family: "Iosevka, monospace",
		}
	}
}

/// Pre-computed world-space sizes for one zoom level. Build once per frame.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub k: f64,
	pub node_radius: f64,
	pub hit_radius: f64,
	pub label_font: String,
	pub edge_line_width: f64,
	pub arrow_size: f64,
	pub particle_radius: f64,
	pub ring_width: f64,
	pub ring_offset: f64,
	pub chrome_line_width: f64,
	pub chrome_font: String,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		Self {
			k,
			node_radius: config.node_behavior.apply(config.node_radius, k),
			hit_radius: config.hit_behavior.apply(config.hit_radius, k),
			label_font: format!("{}px {}", config.label_size / k, config.font_family),
			edge_line_width: ScaleBehavior::Screen.apply(config.edge_width, k),
			arrow_size: ScaleBehavior::World.apply(config.arrow_size, k),
			particle_radius: ScaleBehavior::World.apply(config.particle_radius, k),
			ring_width: ScaleBehavior::Screen.apply(config.ring_width, k),
			ring_offset: ScaleBehavior::Screen.apply(config.ring_offset, k),
			chrome_line_width: config.chrome_line_width,
			chrome_font: format!("{}px {}", config.chrome_label_size, config.font_family),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn screen_sizes_shrink_in_world_space_when_zoomed_in() {
		let config = ScaleConfig::default();
		let near = ScaledValues::new(&config, 2.0);
		let far = ScaledValues::new(&config, 0.5);
		assert_eq!(near.edge_line_width, 0.5);
		assert_eq!(far.edge_line_width, 2.0);
		assert_eq!(near.label_font, "6px Iosevka, monospace");
	}

	#[test]
	fn clamped_radius_keeps_minimum_screen_size() {
		let behavior = ScaleBehavior::Clamped {
			min_screen: 3.0,
			max_screen: f64::INFINITY,
		};
		assert_eq!(behavior.apply(4.0, 1.0), 4.0);
		// At k=0.25 a 4-unit node would be 1px; it is held at 3px.
		assert_eq!(behavior.apply(4.0, 0.25), 12.0);
	}
}
