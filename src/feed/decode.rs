//! Text frame decoding.
//!
//! Frames are validated against a fixed schema per `type` and turned into a
//! [`FeedEvent`]. Anything that does not fit is reported as a [`DecodeError`]
//! and never reaches the reducer.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::participant::{Participant, Profile, Role};

const INITIAL_STATE: &str = "initial_state";
const NEW_USER: &str = "new_user";

/// A decoded inbound frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeedEvent {
	/// Snapshot: replaces the whole graph.
	InitialState(Vec<Participant>),
	/// Delta: a single participant joined.
	NewUser(Participant),
	/// Well-formed frame of a type this client does not act on.
	Ignored { kind: Option<String> },
}

/// Why a frame was dropped.
#[derive(Debug, Error)]
pub enum DecodeError {
	#[error("frame is not valid JSON: {0}")]
	Malformed(#[source] serde_json::Error),
	#[error("frame is not a JSON object")]
	NotAnObject,
	#[error("invalid `{kind}` frame: {source}")]
	Shape {
		kind: &'static str,
		#[source]
		source: serde_json::Error,
	},
	#[error("`{kind}` frame has a participant with an empty id")]
	EmptyId { kind: &'static str },
}

#[derive(Deserialize)]
struct ParticipantRecord {
	id: String,
	#[serde(default)]
	name: Option<String>,
	#[serde(default)]
	role: Option<String>,
	#[serde(default)]
	profile: Option<Profile>,
}

#[derive(Deserialize)]
struct InitialStateFrame {
	data: InitialStateData,
}

#[derive(Deserialize)]
struct InitialStateData {
	participants: Vec<ParticipantRecord>,
}

#[derive(Deserialize)]
struct NewUserFrame {
	user: ParticipantRecord,
}

fn into_participant(
	record: ParticipantRecord,
	kind: &'static str,
	viewer_id: &str,
) -> Result<Participant, DecodeError> {
	if record.id.is_empty() {
		return Err(DecodeError::EmptyId { kind });
	}
	Ok(Participant::new(
		record.id,
		record.name,
		Role::parse(record.role),
		record.profile,
		viewer_id,
	))
}

/// Decodes one text frame. Colors are computed against `viewer_id`.
pub fn decode_frame(text: &str, viewer_id: &str) -> Result<FeedEvent, DecodeError> {
	let value: Value = serde_json::from_str(text).map_err(DecodeError::Malformed)?;
	let kind = match &value {
		Value::Object(obj) => obj.get("type").and_then(Value::as_str).map(str::to_owned),
		_ => return Err(DecodeError::NotAnObject),
	};

	match kind.as_deref() {
		Some(INITIAL_STATE) => {
			let frame: InitialStateFrame =
				serde_json::from_value(value).map_err(|source| DecodeError::Shape {
					kind: INITIAL_STATE,
					source,
				})?;
			let participants = frame
				.data
				.participants
				.into_iter()
				.map(|record| into_participant(record, INITIAL_STATE, viewer_id))
				.collect::<Result<Vec<_>, _>>()?;
			Ok(FeedEvent::InitialState(participants))
		}
		Some(NEW_USER) => {
			let frame: NewUserFrame =
				serde_json::from_value(value).map_err(|source| DecodeError::Shape {
					kind: NEW_USER,
					source,
				})?;
			Ok(FeedEvent::NewUser(into_participant(
				frame.user, NEW_USER, viewer_id,
			)?))
		}
		_ => Ok(FeedEvent::Ignored { kind }),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::feed::participant::NodeColor;

	#[test]
	fn decodes_initial_state_snapshot() {
		let text = r#"{
			"type": "initial_state",
			"data": { "participants": [
				{ "id": "a", "name": "Ada", "role": "organizer" },
				{ "id": "b", "role": "participant",
				  "profile": { "github": "https://github.com/b", "skills": ["rust"] } }
			] }
		}"#;
		let FeedEvent::InitialState(nodes) = decode_frame(text, "b").unwrap() else {
			panic!("expected snapshot");
		};
		assert_eq!(nodes.len(), 2);
		assert_eq!(nodes[0].name, "Ada");
		assert_eq!(nodes[0].color, NodeColor::Organizer);
		assert_eq!(nodes[1].name, "User b");
		assert_eq!(nodes[1].color, NodeColor::Viewer);
		let profile = nodes[1].profile.as_ref().unwrap();
		assert_eq!(profile.github.as_deref(), Some("https://github.com/b"));
		assert_eq!(profile.skills, vec!["rust".to_string()]);
	}

	#[test]
	fn decodes_new_user_without_optional_fields() {
		let text = r#"{ "type": "new_user", "user": { "id": "c1d2e3f4" } }"#;
		let FeedEvent::NewUser(p) = decode_frame(text, "viewer").unwrap() else {
			panic!("expected new_user");
		};
		assert_eq!(p.id, "c1d2e3f4");
		assert_eq!(p.name, "User c1d2e");
		assert_eq!(p.role, None);
		assert_eq!(p.profile, None);
		assert_eq!(p.color, NodeColor::Member);
	}

	#[test]
	fn null_skills_decode_as_empty() {
		let text = r#"{ "type": "new_user",
			"user": { "id": "c", "role": "mentor", "profile": { "skills": null } } }"#;
		let FeedEvent::NewUser(p) = decode_frame(text, "viewer").unwrap() else {
			panic!("expected new_user");
		};
		assert_eq!(p.role, Some(Role::Mentor));
		assert!(p.profile.unwrap().skills.is_empty());
	}

	#[test]
	fn empty_role_decodes_as_no_role() {
		for role in [r#""""#, r#""   ""#, "null"] {
			let text = format!(r#"{{ "type": "new_user", "user": {{ "id": "e1", "role": {role} }} }}"#);
			let FeedEvent::NewUser(p) = decode_frame(&text, "v").unwrap() else {
				panic!("expected new_user");
			};
			assert_eq!(p.role, None, "role {role}");
			assert!(!p.is_selectable());
		}
	}

	#[test]
	fn unknown_and_missing_types_are_ignored() {
		let joined = r#"{ "type": "node_joined", "data": { "user_id": "x" } }"#;
		assert_eq!(
			decode_frame(joined, "v").unwrap(),
			FeedEvent::Ignored {
				kind: Some("node_joined".into())
			}
		);
		assert_eq!(
			decode_frame(r#"{ "data": 1 }"#, "v").unwrap(),
			FeedEvent::Ignored { kind: None }
		);
	}

	#[test]
	fn rejects_non_json_and_non_objects() {
		assert!(matches!(
			decode_frame("{not json", "v"),
			Err(DecodeError::Malformed(_))
		));
		assert!(matches!(
			decode_frame("[1, 2]", "v"),
			Err(DecodeError::NotAnObject)
		));
	}

	#[test]
	fn rejects_frames_missing_required_shape() {
		let no_user = r#"{ "type": "new_user" }"#;
		assert!(matches!(
			decode_frame(no_user, "v"),
			Err(DecodeError::Shape { kind: NEW_USER, .. })
		));

		let no_participants = r#"{ "type": "initial_state", "data": {} }"#;
		assert!(matches!(
			decode_frame(no_participants, "v"),
			Err(DecodeError::Shape {
				kind: INITIAL_STATE,
				..
			})
		));

		let numeric_id = r#"{ "type": "new_user", "user": { "id": 7 } }"#;
		assert!(matches!(
			decode_frame(numeric_id, "v"),
			Err(DecodeError::Shape { .. })
		));

		let empty_id = r#"{ "type": "new_user", "user": { "id": "" } }"#;
		assert!(matches!(
			decode_frame(empty_id, "v"),
			Err(DecodeError::EmptyId { kind: NEW_USER })
		));
	}
}
