//! Drives decoder, reducer and status from a queue of transport events.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use log::{debug, info, warn};

use crate::config::SessionConfig;

use super::connection::{ConnectionStatus, TransportError, TransportEvent};
use super::decode::{FeedEvent, decode_frame};
use super::participant::GraphState;
use super::reduce::reduce;

/// FIFO shared between transport callbacks (producers) and the session (consumer).
#[derive(Clone, Debug, Default)]
pub struct EventQueue(Rc<RefCell<VecDeque<TransportEvent>>>);

impl EventQueue {
	pub fn push(&self, event: TransportEvent) {
		self.0.borrow_mut().push_back(event);
	}

	pub fn pop(&self) -> Option<TransportEvent> {
		self.0.borrow_mut().pop_front()
	}

	pub fn len(&self) -> usize {
		self.0.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.borrow().is_empty()
	}
}

/// What a batch of events changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Transition {
	pub graph_changed: bool,
	pub status_changed: bool,
}

impl Transition {
	/// Whether anything observers render from moved.
	pub fn changed(self) -> bool {
		self.graph_changed || self.status_changed
	}

	fn merge(self, other: Transition) -> Self {
		Self {
			graph_changed: self.graph_changed || other.graph_changed,
			status_changed: self.status_changed || other.status_changed,
		}
	}
}

/// Per-session feed state: the graph, the connection status and a record of
/// dropped frames.
#[derive(Clone, Debug)]
pub struct FeedSession {
	config: SessionConfig,
	graph: GraphState,
	status: ConnectionStatus,
	decode_failures: usize,
	last_decode_error: Option<String>,
}

impl FeedSession {
	pub fn new(config: SessionConfig) -> Self {
		Self {
			config,
			graph: GraphState::default(),
			status: ConnectionStatus::default(),
			decode_failures: 0,
			last_decode_error: None,
		}
	}

	pub fn config(&self) -> &SessionConfig {
		&self.config
	}

	pub fn graph(&self) -> &GraphState {
		&self.graph
	}

	pub fn status(&self) -> ConnectionStatus {
		self.status
	}

	pub fn decode_failures(&self) -> usize {
		self.decode_failures
	}

	pub fn last_decode_error(&self) -> Option<&str> {
		self.last_decode_error.as_deref()
	}

	/// Applies every queued event in order.
	pub fn drain(&mut self, queue: &EventQueue) -> Transition {
		let mut transition = Transition::default();
		while let Some(event) = queue.pop() {
			transition = transition.merge(self.handle(event));
		}
		transition
	}

	/// Applies a single transport event. Failures are logged and recorded, never returned.
	pub fn handle(&mut self, event: TransportEvent) -> Transition {
		let status = self.status.next(&event);
		let status_changed = status != self.status;
		self.status = status;

		let graph_changed = match event {
			TransportEvent::Opened => {
				info!("feed: connected to event {}", self.config.event_id);
				false
			}
			TransportEvent::Message(text) => self.apply_frame(&text),
			TransportEvent::Error(detail) => {
				warn!("feed: {}", TransportError::Socket(detail));
				false
			}
			TransportEvent::Closed => {
				info!("feed: socket closed");
				false
			}
		};

		Transition {
			graph_changed,
			status_changed,
		}
	}

	fn apply_frame(&mut self, text: &str) -> bool {
		let event = match decode_frame(text, &self.config.viewer_id) {
			Ok(event) => event,
			Err(err) => {
				warn!("feed: dropping frame: {err}");
				self.decode_failures += 1;
				self.last_decode_error = Some(err.to_string());
				return false;
			}
		};
		if let FeedEvent::Ignored { kind } = &event {
			debug!("feed: ignoring frame of type {kind:?}");
			return false;
		}

		let next = reduce(&self.graph, &event, &self.config);
		if next == self.graph {
			return false;
		}
		self.graph = next;
		info!(
			"feed: graph now has {} nodes, {} links",
			self.graph.nodes.len(),
			self.graph.links.len()
		);
		true
	}
}
