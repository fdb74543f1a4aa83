//! Participant, link and graph-state types shared by the decoder, reducer
//! and render surface.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Deserializer};

/// Role a participant holds within the event.
///
/// Only `Organizer` changes how a node is colored; any role at all makes the
/// node selectable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Role {
	Organizer,
	Participant,
	Mentor,
	/// Any role string the client does not know about, kept verbatim.
	Other(String),
}

impl From<String> for Role {
	fn from(raw: String) -> Self {
		match raw.as_str() {
			"organizer" => Role::Organizer,
			"participant" => Role::Participant,
			"mentor" => Role::Mentor,
			_ => Role::Other(raw),
		}
	}
}

impl Role {
	/// Maps a raw role string; empty or blank strings carry no role.
	pub fn parse(raw: Option<String>) -> Option<Self> {
		raw.filter(|r| !r.trim().is_empty()).map(Role::from)
	}

	pub fn as_str(&self) -> &str {
		match self {
			Role::Organizer => "organizer",
			Role::Participant => "participant",
			Role::Mentor => "mentor",
			Role::Other(raw) => raw,
		}
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Optional profile details shown in the side panel.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Profile {
	#[serde(default)]
	pub github: Option<String>,
	#[serde(default, deserialize_with = "null_as_empty")]
	pub skills: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Display color of a node. Never transmitted; always derived.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeColor {
	/// The locally logged-in participant.
	Viewer,
	Organizer,
	Member,
	/// Synthetic event node that links originate from.
	Anchor,
}

impl NodeColor {
	pub fn to_css(self) -> &'static str {
		match self {
			NodeColor::Viewer => "#ffcc00",
			NodeColor::Organizer => "#e63946",
			NodeColor::Member => "#457b9d",
			NodeColor::Anchor => "#8d99ae",
		}
	}
}

/// The one place node color is decided.
pub fn node_color(id: &str, role: Option<&Role>, viewer_id: &str) -> NodeColor {
	if id == viewer_id {
		NodeColor::Viewer
	} else if role == Some(&Role::Organizer) {
		NodeColor::Organizer
	} else {
		NodeColor::Member
	}
}

/// Name shown for a participant whose record carries none.
pub fn default_name(id: &str) -> String {
	let prefix: String = id.chars().take(5).collect();
	format!("User {prefix}")
}

/// A participant node in the graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Participant {
	pub id: String,
	pub name: String,
	pub role: Option<Role>,
	pub profile: Option<Profile>,
	pub color: NodeColor,
}

impl Participant {
	/// Builds a participant, filling in the name and deriving the color.
	pub fn new(
		id: String,
		name: Option<String>,
		role: Option<Role>,
		profile: Option<Profile>,
		viewer_id: &str,
	) -> Self {
		let name = name
			.filter(|n| !n.is_empty())
			.unwrap_or_else(|| default_name(&id));
		let color = node_color(&id, role.as_ref(), viewer_id);
		Self {
			id,
			name,
			role,
			profile,
			color,
		}
	}

	/// Synthetic node for the event itself. It has no role, so it is never selectable.
	pub fn anchor(id: &str, name: &str) -> Self {
		Self {
			id: id.to_string(),
			name: name.to_string(),
			role: None,
			profile: None,
			color: NodeColor::Anchor,
		}
	}

	/// Nodes without a role (the event anchor, role-less records) cannot be selected.
	pub fn is_selectable(&self) -> bool {
		self.role.is_some()
	}
}

/// A directed edge from the event anchor to a participant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link {
	pub source: String,
	pub target: String,
}

/// Current graph: participants unique by id plus anchor links.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphState {
	pub nodes: Vec<Participant>,
	pub links: Vec<Link>,
}

impl GraphState {
	pub fn contains(&self, id: &str) -> bool {
		self.nodes.iter().any(|n| n.id == id)
	}

	pub fn node(&self, id: &str) -> Option<&Participant> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// True when node ids are unique and every link target is a known node.
	pub fn links_are_consistent(&self) -> bool {
		let mut ids = HashSet::with_capacity(self.nodes.len());
		if !self.nodes.iter().all(|n| ids.insert(n.id.as_str())) {
			return false;
		}
		self.links.iter().all(|l| ids.contains(l.target.as_str()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn color_prefers_viewer_over_organizer() {
		let organizer = Some(Role::Organizer);
		assert_eq!(node_color("me", organizer.as_ref(), "me"), NodeColor::Viewer);
		assert_eq!(
			node_color("them", organizer.as_ref(), "me"),
			NodeColor::Organizer
		);
		assert_eq!(
			node_color("them", Some(&Role::Mentor), "me"),
			NodeColor::Member
		);
		assert_eq!(node_color("them", None, "me"), NodeColor::Member);
	}

	#[test]
	fn color_is_independent_of_call_order() {
		let inputs = [
			("a", Some(Role::Organizer)),
			("b", Some(Role::Participant)),
			("c", None),
		];
		let forward: Vec<_> = inputs
			.iter()
			.map(|(id, role)| node_color(id, role.as_ref(), "b"))
			.collect();
		let mut backward: Vec<_> = inputs
			.iter()
			.rev()
			.map(|(id, role)| node_color(id, role.as_ref(), "b"))
			.collect();
		backward.reverse();
		assert_eq!(forward, backward);
	}

	#[test]
	fn missing_or_empty_name_uses_id_prefix() {
		let p = Participant::new("73ae7869-7c57".into(), None, None, None, "x");
		assert_eq!(p.name, "User 73ae7");

		let p = Participant::new("ab".into(), Some(String::new()), None, None, "x");
		assert_eq!(p.name, "User ab");

		let p = Participant::new("ab".into(), Some("  ".into()), None, None, "x");
		assert_eq!(p.name, "  ");

		let p = Participant::new("ab".into(), Some("Ada".into()), None, None, "x");
		assert_eq!(p.name, "Ada");
	}

	#[test]
	fn unknown_roles_are_kept_verbatim() {
		assert_eq!(Role::from("judge".to_string()), Role::Other("judge".into()));
		assert_eq!(Role::from("organizer".to_string()), Role::Organizer);
		assert_eq!(Role::Other("judge".into()).to_string(), "judge");
	}

	#[test]
	fn empty_or_blank_role_is_no_role() {
		assert_eq!(Role::parse(None), None);
		assert_eq!(Role::parse(Some(String::new())), None);
		assert_eq!(Role::parse(Some(" \t".into())), None);
		assert_eq!(Role::parse(Some("mentor".into())), Some(Role::Mentor));
	}

	#[test]
	fn dangling_link_breaks_consistency() {
		let mut state = GraphState {
			nodes: vec![Participant::new("a".into(), None, None, None, "x")],
			links: vec![Link {
				source: "event".into(),
				target: "a".into(),
			}],
		};
		assert!(state.links_are_consistent());

		state.links.push(Link {
			source: "event".into(),
			target: "ghost".into(),
		});
		assert!(!state.links_are_consistent());
	}
}
