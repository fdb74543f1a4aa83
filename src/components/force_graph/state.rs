//! Graph simulation state and interaction tracking.
//!
//! Wraps the `force_graph` physics simulation with per-node metadata, a
//! pan/zoom view transform and the hover fade. The simulation is kept in step
//! with the feed's [`GraphState`] incrementally: appended participants and
//! links join the running layout, anything else rebuilds it.

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::{debug, warn};

use super::scale::{ScaleConfig, ScaledValues};
use super::theme::Color;
use crate::config::SimulationConfig;
use crate::feed::{GraphState, Link, NodeColor, Participant};

/// Golden angle, spreads successive joins around the anchor.
const PLACEMENT_ANGLE: f64 = PI * (3.0 - 2.236_067_977);
/// Per-frame movement below which the layout counts as still.
const SETTLE_EPSILON: f32 = 0.05;
const SETTLE_FRAMES: u32 = 30;
/// Fit anyway once this long has passed since the last change (seconds).
const SETTLE_TIMEOUT: f64 = 4.0;
const FIT_PADDING: f64 = 40.0;

/// Per-node display metadata attached to each node in the simulation.
#[derive(Clone, Debug)]
pub struct NodeInfo {
	/// For the event anchor, a role-less stand-in from [`Participant::anchor`].
	pub participant: Participant,
	pub color: Color,
	/// Size multiplier (1.0 = normal).
	pub size: f64,
}

impl NodeInfo {
	fn new(participant: Participant) -> Self {
		let size = if participant.color == NodeColor::Anchor {
			1.5
		} else {
			1.0
		};
		Self {
			color: participant.color.into(),
			participant,
			size,
		}
	}

	pub fn label(&self) -> &str {
		&self.participant.name
	}

	pub fn has_role(&self) -> bool {
		self.participant.is_selectable()
	}
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

/// Tracks an in-progress node drag; a drag that never moves is a click.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Smoothed hover ring intensity per node.
///
/// Exponential smoothing: value += (target - value) * (1 - e^(-speed * dt)),
/// so rings ease in on hover and ease out after the pointer leaves.
#[derive(Clone, Debug, Default)]
pub struct HoverFade {
	hovered: Option<DefaultNodeIdx>,
	intensity: HashMap<DefaultNodeIdx, f64>,
}

impl HoverFade {
	pub fn hovered(&self) -> Option<DefaultNodeIdx> {
		self.hovered
	}

	pub fn set(&mut self, node: Option<DefaultNodeIdx>) {
		self.hovered = node;
	}

	pub fn tick(&mut self, dt: f64) {
		const FADE_IN_SPEED: f64 = 6.0;
		const FADE_OUT_SPEED: f64 = 4.0;

		if let Some(idx) = self.hovered {
			let v = self.intensity.entry(idx).or_insert(0.0);
			*v += (1.0 - *v) * (1.0 - (-FADE_IN_SPEED * dt).exp());
		}
		let decay = (-FADE_OUT_SPEED * dt).exp();
		let hovered = self.hovered;
		self.intensity.retain(|idx, v| {
			if hovered != Some(*idx) {
				*v *= decay;
			}
			*v > 0.005
		});
	}

	pub fn intensity(&self, idx: DefaultNodeIdx) -> f64 {
		self.intensity.get(&idx).copied().unwrap_or(0.0)
	}

	fn clear(&mut self) {
		self.hovered = None;
		self.intensity.clear();
	}
}

/// Decides when the layout has come to rest so the view can be fit once.
#[derive(Clone, Debug, Default)]
struct SettleTracker {
	quiet_frames: u32,
	since_change: f64,
	fitted: bool,
}

impl SettleTracker {
	fn reset(&mut self) {
		*self = Self::default();
	}

	/// Returns true exactly once per layout change.
	fn observe(&mut self, max_step: f32, dt: f64) -> bool {
		if self.fitted {
			return false;
		}
		self.since_change += dt;
		self.quiet_frames = if max_step < SETTLE_EPSILON {
			self.quiet_frames + 1
		} else {
			0
		};
		if self.quiet_frames >= SETTLE_FRAMES || self.since_change >= SETTLE_TIMEOUT {
			self.fitted = true;
			return true;
		}
		false
	}
}

fn new_simulation(sim: &SimulationConfig) -> ForceGraph<NodeInfo, ()> {
	ForceGraph::new(SimulationParameters {
		force_charge: sim.repulsion,
		force_spring: sim.spring,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: sim.damping,
	})
}

/// Core graph state combining physics simulation with interaction tracking.
///
/// Created once when the component mounts, then mutated each frame by the
/// animation loop and whenever the feed publishes a new graph.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverFade,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	sim: SimulationConfig,
	anchor_label: String,
	/// Hovered node id as last reported; survives layout rebuilds.
	hovered_id: Option<String>,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
	synced_nodes: Vec<Participant>,
	synced_links: usize,
	settle: SettleTracker,
}

impl ForceGraphState {
	pub fn new(width: f64, height: f64, sim: SimulationConfig, anchor_label: &str) -> Self {
		Self {
			graph: new_simulation(&sim),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverFade::default(),
			width,
			height,
			flow_time: 0.0,
			sim,
			anchor_label: anchor_label.to_string(),
			hovered_id: None,
			id_to_idx: HashMap::new(),
			edges: Vec::new(),
			synced_nodes: Vec::new(),
			synced_links: 0,
			settle: SettleTracker::default(),
		}
	}

	#[cfg(test)]
	pub fn node_count(&self) -> usize {
		self.id_to_idx.len()
	}

	#[cfg(test)]
	pub fn edges(&self) -> &[(DefaultNodeIdx, DefaultNodeIdx)] {
		&self.edges
	}

	pub fn index_of(&self, id: &str) -> Option<DefaultNodeIdx> {
		self.id_to_idx.get(id).copied()
	}

	/// Brings the simulation in line with `data`. Returns true if it was rebuilt.
	pub fn sync(&mut self, data: &GraphState) -> bool {
		let extends = data.nodes.len() >= self.synced_nodes.len()
			&& data.links.len() >= self.synced_links
			&& self.synced_nodes.iter().zip(&data.nodes).all(|(a, b)| a == b);
		if !extends {
			debug!("force_graph: rebuilding layout for snapshot");
			self.clear();
		}

		let new_nodes = &data.nodes[self.synced_nodes.len()..];
		let new_links = &data.links[self.synced_links..];
		if !new_nodes.is_empty() || !new_links.is_empty() {
			for participant in new_nodes {
				self.add_participant(participant);
			}
			for link in new_links {
				self.add_link(link);
			}
			self.synced_nodes.extend_from_slice(new_nodes);
			self.synced_links = data.links.len();
			self.settle.reset();
		}

		if !extends {
			// Node indices changed; point the hover back at the same participant.
			let hovered = self.hovered_id.take();
			self.set_hovered_id(hovered.as_deref());
		}
		!extends
	}

	fn clear(&mut self) {
		self.graph = new_simulation(&self.sim);
		self.id_to_idx.clear();
		self.edges.clear();
		self.synced_nodes.clear();
		self.synced_links = 0;
		self.hover.clear();
		self.drag = DragState::default();
	}

	fn add_node(&mut self, id: &str, x: f32, y: f32, info: NodeInfo) -> DefaultNodeIdx {
		let idx = self.graph.add_node(NodeData {
			x,
			y,
			mass: 10.0,
			is_anchor: false,
			user_data: info,
		});
		self.id_to_idx.insert(id.to_string(), idx);
		idx
	}

	fn add_participant(&mut self, participant: &Participant) {
		if self.id_to_idx.contains_key(&participant.id) {
			return;
		}
		let i = self.id_to_idx.len() as f64;
		let angle = i * PLACEMENT_ANGLE;
		let radius = self.sim.link_distance * (1.0 + 0.1 * i.sqrt());
		let (x, y) = ((radius * angle.cos()) as f32, (radius * angle.sin()) as f32);
		self.add_node(&participant.id, x, y, NodeInfo::new(participant.clone()));
	}

	fn add_link(&mut self, link: &Link) {
		let Some(&tgt) = self.id_to_idx.get(&link.target) else {
			warn!("force_graph: link to unknown node {}", link.target);
			return;
		};
		let src = match self.id_to_idx.get(&link.source) {
			Some(&src) => src,
			None => {
				let anchor = Participant::anchor(&link.source, &self.anchor_label);
				self.add_node(&link.source, 0.0, 0.0, NodeInfo::new(anchor))
			}
		};
		self.graph.add_edge(src, tgt, EdgeData::default());
		self.edges.push((src, tgt));
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(
		&self,
		sx: f64,
		sy: f64,
		config: &ScaleConfig,
	) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(config, self.transform.k);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let node_hit_radius = scale.hit_radius * node.data.user_data.size;
			if (dx * dx + dy * dy).sqrt() < node_hit_radius {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_info(&self, idx: DefaultNodeIdx) -> Option<NodeInfo> {
		let mut info = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				info = Some(node.data.user_data.clone());
			}
		});
		info
	}

	/// Highlights the node with the given id, if it is in the layout.
	pub fn set_hovered_id(&mut self, id: Option<&str>) {
		let idx = id.and_then(|id| self.index_of(id));
		self.hover.set(idx);
		self.hovered_id = id.map(str::to_owned);
	}

	/// Bounding box `(min_x, min_y, max_x, max_y)` of nodes that carry a role.
	pub fn participant_bounds(&self) -> Option<(f64, f64, f64, f64)> {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		self.graph.visit_nodes(|node| {
			if !node.data.user_data.has_role() {
				return;
			}
			let (x, y) = (node.x() as f64, node.y() as f64);
			bounds = Some(match bounds {
				None => (x, y, x, y),
				Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
			});
		});
		bounds
	}

	/// Zooms and pans so every node is visible.
	pub fn fit_to_view(&mut self) {
		let mut bounds: Option<(f64, f64, f64, f64)> = None;
		self.graph.visit_nodes(|node| {
			let (x, y) = (node.x() as f64, node.y() as f64);
			bounds = Some(match bounds {
				None => (x, y, x, y),
				Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
			});
		});
		let Some((x0, y0, x1, y1)) = bounds else {
			return;
		};
		let avail_w = (self.width - 2.0 * FIT_PADDING).max(1.0);
		let avail_h = (self.height - 2.0 * FIT_PADDING).max(1.0);
		let k = (avail_w / (x1 - x0).max(1.0))
			.min(avail_h / (y1 - y0).max(1.0))
			.clamp(0.1, 4.0);
		self.transform.k = k;
		self.transform.x = self.width / 2.0 - (x0 + x1) / 2.0 * k;
		self.transform.y = self.height / 2.0 - (y0 + y1) / 2.0 * k;
	}

	fn positions(&self) -> Vec<(f32, f32)> {
		let mut out = Vec::with_capacity(self.id_to_idx.len());
		self.graph.visit_nodes(|node| out.push((node.x(), node.y())));
		out
	}

	/// Pulls free nodes towards the axes.
	fn apply_centering(&mut self, dt: f32) {
		let pull = (self.sim.center_strength as f32 * dt).min(1.0);
		self.graph.visit_nodes_mut(|node| {
			if !node.data.is_anchor {
				node.data.x -= node.data.x * pull;
				node.data.y -= node.data.y * pull;
			}
		});
	}

	/// Pushes apart nodes closer than twice the collision radius.
	fn apply_collisions(&mut self) {
		let min_dist = (2.0 * self.sim.collide_radius) as f32;
		if min_dist <= 0.0 {
			return;
		}
		let mut nodes = Vec::with_capacity(self.id_to_idx.len());
		self.graph
			.visit_nodes(|node| nodes.push((node.index(), node.x(), node.y())));

		let mut shift: HashMap<DefaultNodeIdx, (f32, f32)> = HashMap::new();
		for (i, &(a, ax, ay)) in nodes.iter().enumerate() {
			for &(b, bx, by) in &nodes[i + 1..] {
				let (dx, dy) = (bx - ax, by - ay);
				let dist = (dx * dx + dy * dy).sqrt();
				if dist >= min_dist || dist < 1e-3 {
					continue;
				}
				let push = (min_dist - dist) * 0.25 / dist;
				let sa = shift.entry(a).or_default();
				sa.0 -= dx * push;
				sa.1 -= dy * push;
				let sb = shift.entry(b).or_default();
				sb.0 += dx * push;
				sb.1 += dy * push;
			}
		}
		if shift.is_empty() {
			return;
		}
		self.graph.visit_nodes_mut(|node| {
			if node.data.is_anchor {
				return;
			}
			if let Some(&(sx, sy)) = shift.get(&node.index()) {
				node.data.x += sx;
				node.data.y += sy;
			}
		});
	}

	pub fn tick(&mut self, dt: f32) {
		let before = self.positions();
		self.graph.update(dt);
		self.apply_centering(dt);
		self.apply_collisions();
		let max_step = before
			.iter()
			.zip(self.positions())
			.map(|(&(x0, y0), (x1, y1))| (x1 - x0).abs().max((y1 - y0).abs()))
			.fold(0.0_f32, f32::max);

		self.flow_time += dt as f64;
		self.hover.tick(dt as f64);
		if !self.drag.active && self.settle.observe(max_step, dt as f64) {
			self.fit_to_view();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::feed::Role;

	fn person(id: &str, role: Option<Role>) -> Participant {
		Participant::new(id.into(), None, role, None, "viewer")
	}

	fn link(target: &str) -> Link {
		Link {
			source: "event".into(),
			target: target.into(),
		}
	}

	fn state() -> ForceGraphState {
		ForceGraphState::new(800.0, 600.0, SimulationConfig::default(), "HackED")
	}

	#[test]
	fn appended_nodes_join_without_rebuild() {
		let mut s = state();
		let mut data = GraphState {
			nodes: vec![person("a", Some(Role::Organizer))],
			links: vec![],
		};
		s.sync(&data);
		let a = s.index_of("a").unwrap();

		data.nodes.push(person("c", Some(Role::Participant)));
		data.links.push(link("c"));
		assert!(!s.sync(&data));
		assert_eq!(s.index_of("a"), Some(a));
		// a, c and the event anchor
		assert_eq!(s.node_count(), 3);
		assert_eq!(s.edges().len(), 1);

		let anchor = s.node_info(s.index_of("event").unwrap()).unwrap();
		assert!(!anchor.has_role());
		assert_eq!(anchor.label(), "HackED");
		assert_eq!(anchor.color, Color::from(NodeColor::Anchor));
	}

	#[test]
	fn resync_of_same_graph_is_a_no_op() {
		let mut s = state();
		let data = GraphState {
			nodes: vec![person("c", None)],
			links: vec![link("c")],
		};
		s.sync(&data);
		assert!(!s.sync(&data));
		assert_eq!(s.node_count(), 2);
		assert_eq!(s.edges().len(), 1);
	}

	#[test]
	fn snapshot_that_drops_links_rebuilds() {
		let mut s = state();
		s.sync(&GraphState {
			nodes: vec![person("c", None)],
			links: vec![link("c")],
		});
		let rebuilt = s.sync(&GraphState {
			nodes: vec![person("c", None)],
			links: vec![],
		});
		assert!(rebuilt);
		assert_eq!(s.node_count(), 1);
		assert!(s.edges().is_empty());
	}

	#[test]
	fn bounds_cover_only_role_bearing_nodes() {
		let mut s = state();
		s.sync(&GraphState {
			nodes: vec![person("a", Some(Role::Participant)), person("b", None)],
			links: vec![link("a")],
		});
		let (x0, y0, x1, y1) = s.participant_bounds().unwrap();
		// Only "a" qualifies, so the box collapses to a point.
		assert_eq!((x0, y0), (x1, y1));

		let empty = state();
		assert!(empty.participant_bounds().is_none());
	}

	#[test]
	fn fit_to_view_centers_layout() {
		let mut s = state();
		s.sync(&GraphState {
			nodes: vec![
				person("a", Some(Role::Participant)),
				person("b", Some(Role::Participant)),
				person("c", Some(Role::Participant)),
			],
			links: vec![],
		});
		s.fit_to_view();
		assert!((0.1..=4.0).contains(&s.transform.k));

		let idx = s.index_of("a").unwrap();
		let mut pos = (0.0, 0.0);
		s.graph.visit_nodes(|n| {
			if n.index() == idx {
				pos = (n.x() as f64, n.y() as f64);
			}
		});
		let sx = pos.0 * s.transform.k + s.transform.x;
		let sy = pos.1 * s.transform.k + s.transform.y;
		assert!((0.0..=800.0).contains(&sx));
		assert!((0.0..=600.0).contains(&sy));
		assert_eq!(s.node_at_position(sx, sy, &ScaleConfig::default()), Some(idx));
	}

	#[test]
	fn hover_fade_eases_out_after_leave() {
		let mut s = state();
		s.sync(&GraphState {
			nodes: vec![person("a", Some(Role::Participant))],
			links: vec![],
		});
		let idx = s.index_of("a").unwrap();
		s.set_hovered_id(Some("a"));
		s.hover.tick(0.1);
		let lit = s.hover.intensity(idx);
		assert!(lit > 0.0);

		s.set_hovered_id(None);
		s.hover.tick(0.1);
		assert!(s.hover.intensity(idx) < lit);
	}

	#[test]
	fn hover_follows_participant_across_rebuild() {
		let mut s = state();
		s.sync(&GraphState {
			nodes: vec![person("a", Some(Role::Participant)), person("b", None)],
			links: vec![link("b")],
		});
		s.set_hovered_id(Some("a"));

		let rebuilt = s.sync(&GraphState {
			nodes: vec![person("z", None), person("a", Some(Role::Participant))],
			links: vec![],
		});
		assert!(rebuilt);
		assert_eq!(s.hover.hovered(), s.index_of("a"));
		assert!(s.hover.hovered().is_some());

		s.sync(&GraphState::default());
		assert_eq!(s.hover.hovered(), None);
	}
}
