//! Live participant feed: frame decoding, graph reduction and connection lifecycle.
//!
//! Frames arrive from a [`Transport`] as [`TransportEvent`]s, queue up in an
//! [`EventQueue`] and are drained by a [`FeedSession`], which decodes each
//! frame, folds it into the [`GraphState`] and tracks the
//! [`ConnectionStatus`].

mod connection;
mod decode;
mod participant;
mod reduce;
mod session;
mod socket;

pub use connection::{Connection, ConnectionStatus, Transport, TransportError, TransportEvent};
pub use decode::{DecodeError, FeedEvent, decode_frame};
pub use participant::{
	GraphState, Link, NodeColor, Participant, Profile, Role, default_name, node_color,
};
pub use reduce::reduce;
pub use session::{EventQueue, FeedSession, Transition};
pub use socket::WebSocketTransport;
