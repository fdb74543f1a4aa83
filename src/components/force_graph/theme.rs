//! Visual theming for the force graph.

use crate::feed::NodeColor;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		let up = |c: u8| (c as f64 + (255.0 - c as f64) * f) as u8;
		Self {
			r: up(self.r),
			g: up(self.g),
			b: up(self.b),
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		let down = |c: u8| (c as f64 * f) as u8;
		Self {
			r: down(self.r),
			g: down(self.g),
			b: down(self.b),
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

impl From<NodeColor> for Color {
	fn from(color: NodeColor) -> Self {
		match color {
			NodeColor::Viewer => Color::rgb(0xff, 0xcc, 0x00),
			NodeColor::Organizer => Color::rgb(0xe6, 0x39, 0x46),
			NodeColor::Member => Color::rgb(0x45, 0x7b, 0x9d),
			NodeColor::Anchor => Color::rgb(0x8d, 0x99, 0xae),
		}
	}
}

/// Complete visual theme: black canvas, white chrome.
#[derive(Clone, Debug)]
pub struct Theme {
	pub background: Color,
	pub edge: Color,
	pub arrow: Color,
	pub particle: Color,
	/// Shade nodes with a radial highlight instead of a flat fill.
	pub node_gradient: bool,
	pub label: Color,
	pub ring: Color,
	/// Bounding box and event label.
	pub chrome: Color,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: Color::rgb(0, 0, 0),
			edge: Color::rgba(255, 255, 255, 0.35),
			arrow: Color::rgba(255, 255, 255, 0.6),
			particle: Color::rgba(255, 255, 255, 0.8),
			node_gradient: true,
			label: Color::rgb(255, 255, 255),
			ring: Color::rgb(255, 255, 255),
			chrome: Color::rgb(255, 255, 255),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_output() {
		let gold = Color::rgb(255, 204, 0);
		assert_eq!(gold.to_css(), "#ffcc00");
		assert_eq!(gold.with_alpha(0.5).to_css(), "rgba(255, 204, 0, 0.5)");
	}

	#[test]
	fn node_colors_match_their_css() {
		for color in [
			NodeColor::Viewer,
			NodeColor::Organizer,
			NodeColor::Member,
			NodeColor::Anchor,
		] {
			assert_eq!(Color::from(color).to_css(), color.to_css());
		}
	}

	#[test]
	fn lighten_and_darken_move_towards_extremes() {
		let c = Color::rgb(100, 100, 100);
		assert_eq!(c.lighten(1.0), Color::rgb(255, 255, 255));
		assert_eq!(c.darken(1.0), Color::rgb(0, 0, 0));
		assert_eq!(c.lighten(0.0), c);
	}
}
