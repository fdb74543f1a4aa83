//! Selection and hover state for the graph view.

use crate::feed::Participant;

/// Which node is selected (clicked) and which is under the pointer.
///
/// Purely presentational; never touches the graph itself.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
	selected: Option<Participant>,
	hovered: Option<Participant>,
}

impl ViewState {
	pub fn selected(&self) -> Option<&Participant> {
		self.selected.as_ref()
	}

	pub fn hovered(&self) -> Option<&Participant> {
		self.hovered.as_ref()
	}

	pub fn hovered_id(&self) -> Option<&str> {
		self.hovered.as_ref().map(|p| p.id.as_str())
	}

	/// Selects `node` if it has a role. Returns whether the selection changed.
	pub fn select_node(&mut self, node: Participant) -> bool {
		if !node.is_selectable() {
			return false;
		}
		self.selected = Some(node);
		true
	}

	pub fn clear_selection(&mut self) {
		self.selected = None;
	}

	pub fn set_hovered(&mut self, node: Option<Participant>) {
		self.hovered = node;
	}
}
