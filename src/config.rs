//! Session and simulation configuration.
//!
//! The page may embed a `<script id="session-config" type="application/json">`
//! element; any field it omits keeps the default below.

use serde::Deserialize;

/// Identity of the viewing session and where to reach the feed.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
	/// Base WebSocket URL, e.g. `ws://localhost:8000`. Empty means "derive from the page".
	pub endpoint: String,
	/// Event whose participants are shown. Also the id of the anchor node.
	pub event_id: String,
	/// The locally logged-in participant; only affects highlight color.
	pub viewer_id: String,
	/// Label drawn above the participant bounding box.
	pub event_name: String,
	pub simulation: SimulationConfig,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			endpoint: String::new(),
			event_id: "5f40798c-ed95-4b11-bcc3-5ab6b4a4badb".into(),
			viewer_id: "73ae7869-7c57-40a7-b620-46bcad9f11b0".into(),
			event_name: "HackED".into(),
			simulation: SimulationConfig::default(),
		}
	}
}

impl SessionConfig {
	/// Full feed URL: `<endpoint>/ws/<event_id>/<viewer_id>`.
	pub fn socket_url(&self) -> String {
		format!(
			"{}/ws/{}/{}",
			self.endpoint.trim_end_matches('/'),
			self.event_id,
			self.viewer_id
		)
	}

	/// Fills in an empty endpoint from the page location.
	pub fn with_page_endpoint(mut self, protocol: &str, hostname: &str) -> Self {
		if self.endpoint.is_empty() {
			self.endpoint = page_endpoint(protocol, hostname);
		}
		self
	}
}

/// Feed endpoint on port 8000 of the serving host, `wss` for https pages.
pub fn page_endpoint(protocol: &str, hostname: &str) -> String {
	let scheme = if protocol == "https:" { "wss" } else { "ws" };
	let host = if hostname.is_empty() {
		"localhost"
	} else {
		hostname
	};
	format!("{scheme}://{host}:8000")
}

/// Layout parameters handed to the force simulation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Node-node repulsion.
	pub repulsion: f32,
	/// Link spring stiffness.
	pub spring: f32,
	/// Distance from the anchor at which newly-joined nodes are placed.
	pub link_distance: f64,
	/// Minimum center-to-center spacing is twice this radius.
	pub collide_radius: f64,
	/// Pull towards the x and y axes, per second.
	pub center_strength: f64,
	pub damping: f32,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			repulsion: 30.0,
			spring: 0.05,
			link_distance: 50.0,
			collide_radius: 20.0,
			center_strength: 0.1,
			damping: 0.9,
		}
	}
}
