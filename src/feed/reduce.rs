//! Folds decoded feed events into the graph.

use std::collections::HashSet;

use crate::config::SessionConfig;

use super::decode::FeedEvent;
use super::participant::{GraphState, Link, Participant};

/// Returns the graph that results from applying `event` to `state`.
///
/// Snapshots replace everything and drop accumulated links. Joins append the
/// participant and a link from the event anchor, unless the id is already
/// present.
pub fn reduce(state: &GraphState, event: &FeedEvent, session: &SessionConfig) -> GraphState {
	let next = match event {
		FeedEvent::InitialState(participants) => GraphState {
			nodes: dedup_by_id(participants),
			links: Vec::new(),
		},
		FeedEvent::NewUser(participant) if state.contains(&participant.id) => state.clone(),
		FeedEvent::NewUser(participant) => {
			let mut nodes = state.nodes.clone();
			let mut links = state.links.clone();
			nodes.push(participant.clone());
			links.push(Link {
				source: session.event_id.clone(),
				target: participant.id.clone(),
			});
			GraphState { nodes, links }
		}
		FeedEvent::Ignored { .. } => state.clone(),
	};
	debug_assert!(next.links_are_consistent());
	next
}

// First occurrence wins.
fn dedup_by_id(participants: &[Participant]) -> Vec<Participant> {
	let mut seen = HashSet::with_capacity(participants.len());
	participants
		.iter()
		.filter(|p| seen.insert(p.id.as_str()))
		.cloned()
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::feed::participant::{NodeColor, Role};

	fn session() -> SessionConfig {
		SessionConfig {
			event_id: "event".into(),
			viewer_id: "b".into(),
			..SessionConfig::default()
		}
	}

	fn person(id: &str, role: Role) -> Participant {
		Participant::new(id.into(), None, Some(role), None, "b")
	}

	fn join(id: &str) -> FeedEvent {
		FeedEvent::NewUser(person(id, Role::Participant))
	}

	fn ids(state: &GraphState) -> Vec<&str> {
		state.nodes.iter().map(|n| n.id.as_str()).collect()
	}

	#[test]
	fn snapshot_colors_and_empty_links() {
		let snapshot = FeedEvent::InitialState(vec![
			person("a", Role::Organizer),
			person("b", Role::Participant),
		]);
		let state = reduce(&GraphState::default(), &snapshot, &session());
		assert_eq!(ids(&state), ["a", "b"]);
		let colors: Vec<_> = state.nodes.iter().map(|n| n.color).collect();
		assert_eq!(colors, [NodeColor::Organizer, NodeColor::Viewer]);
		assert!(state.links.is_empty());
	}

	#[test]
	fn join_appends_node_and_anchor_link() {
		let state = reduce(&GraphState::default(), &join("c"), &session());
		assert_eq!(ids(&state), ["c"]);
		assert_eq!(
			state.links,
			[Link {
				source: "event".into(),
				target: "c".into()
			}]
		);
	}

	#[test]
	fn repeated_join_is_idempotent() {
		let once = reduce(&GraphState::default(), &join("c"), &session());
		let twice = reduce(&once, &join("c"), &session());
		assert_eq!(once, twice);
	}

	#[test]
	fn joins_in_any_order_never_duplicate_ids() {
		let order = ["d", "c", "d", "e", "c", "c", "e", "f"];
		let state = order.iter().fold(GraphState::default(), |s, id| {
			let next = reduce(&s, &join(id), &session());
			assert!(next.links_are_consistent());
			next
		});
		assert_eq!(ids(&state), ["d", "c", "e", "f"]);
		assert_eq!(state.links.len(), 4);
	}

	#[test]
	fn snapshot_overrides_accumulated_joins() {
		let grown = [join("x"), join("y")]
			.iter()
			.fold(GraphState::default(), |s, e| reduce(&s, e, &session()));
		assert_eq!(grown.links.len(), 2);

		let snapshot = FeedEvent::InitialState(vec![person("a", Role::Organizer)]);
		let state = reduce(&grown, &snapshot, &session());
		assert_eq!(ids(&state), ["a"]);
		assert!(state.links.is_empty());
	}

	#[test]
	fn snapshot_with_repeated_ids_keeps_first() {
		let mut renamed = person("a", Role::Participant);
		renamed.name = "Second".into();
		let snapshot = FeedEvent::InitialState(vec![person("a", Role::Organizer), renamed]);
		let state = reduce(&GraphState::default(), &snapshot, &session());
		assert_eq!(state.nodes.len(), 1);
		assert_eq!(state.nodes[0].role, Some(Role::Organizer));
	}

	#[test]
	fn ignored_events_leave_state_alone() {
		let state = reduce(&GraphState::default(), &join("c"), &session());
		let after = reduce(
			&state,
			&FeedEvent::Ignored {
				kind: Some("node_left".into()),
			},
			&session(),
		);
		assert_eq!(state, after);
	}
}
