//! Connection status tracking and the transport release guard.

use std::fmt;

use thiserror::Error;

/// Everything a transport reports, in arrival order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
	Opened,
	Message(String),
	Error(String),
	Closed,
}

/// Coarse connection state shown to the viewer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
	#[default]
	Disconnected,
	Connected,
	Error,
}

impl ConnectionStatus {
	/// Status after `event`. Messages never change it.
	pub fn next(self, event: &TransportEvent) -> Self {
		match event {
			TransportEvent::Opened => ConnectionStatus::Connected,
			TransportEvent::Error(_) => ConnectionStatus::Error,
			TransportEvent::Closed => ConnectionStatus::Disconnected,
			TransportEvent::Message(_) => self,
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			ConnectionStatus::Disconnected => "⚪ Disconnected",
			ConnectionStatus::Connected => "🟢 Connected",
			ConnectionStatus::Error => "🔴 Error",
		}
	}
}

impl fmt::Display for ConnectionStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.label())
	}
}

/// Failures on the transport side of the feed.
#[derive(Debug, Error)]
pub enum TransportError {
	#[error("could not open socket to {url}: {detail}")]
	Open { url: String, detail: String },
	#[error("socket reported an error: {0}")]
	Socket(String),
}

/// A live feed transport. Implementations deliver [`TransportEvent`]s through
/// whatever sink they were opened with.
pub trait Transport {
	/// Detaches all callbacks and closes the underlying resource.
	fn close(&mut self);
}

/// Owns a transport and closes it exactly once, on [`Connection::close`] or on drop.
pub struct Connection<T: Transport> {
	transport: Option<T>,
}

impl<T: Transport> Connection<T> {
	pub fn new(transport: T) -> Self {
		Self {
			transport: Some(transport),
		}
	}

	pub fn is_open(&self) -> bool {
		self.transport.is_some()
	}

	/// Returns `true` if this call released the transport.
	pub fn close(&mut self) -> bool {
		match self.transport.take() {
			Some(mut transport) => {
				transport.close();
				true
			}
			None => false,
		}
	}
}

impl<T: Transport> Drop for Connection<T> {
	fn drop(&mut self) {
		self.close();
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;
	use std::rc::Rc;

	use super::*;

	struct CountingTransport(Rc<Cell<u32>>);

	impl Transport for CountingTransport {
		fn close(&mut self) {
			self.0.set(self.0.get() + 1);
		}
	}

	#[test]
	fn status_follows_transport_events() {
		let status = ConnectionStatus::default();
		assert_eq!(status, ConnectionStatus::Disconnected);

		let status = status.next(&TransportEvent::Opened);
		assert_eq!(status, ConnectionStatus::Connected);

		let status = status.next(&TransportEvent::Message("{}".into()));
		assert_eq!(status, ConnectionStatus::Connected);

		let status = status.next(&TransportEvent::Error("reset".into()));
		assert_eq!(status, ConnectionStatus::Error);

		let status = status.next(&TransportEvent::Closed);
		assert_eq!(status, ConnectionStatus::Disconnected);
	}

	#[test]
	fn explicit_close_then_drop_closes_once() {
		let closes = Rc::new(Cell::new(0));
		let mut conn = Connection::new(CountingTransport(closes.clone()));
		assert!(conn.is_open());
		assert!(conn.close());
		assert!(!conn.close());
		assert!(!conn.is_open());
		drop(conn);
		assert_eq!(closes.get(), 1);
	}

	#[test]
	fn drop_alone_closes_once() {
		let closes = Rc::new(Cell::new(0));
		drop(Connection::new(CountingTransport(closes.clone())));
		assert_eq!(closes.get(), 1);
	}

	#[test]
	fn labels_match_status_box_text() {
		assert_eq!(ConnectionStatus::Connected.to_string(), "🟢 Connected");
		assert_eq!(ConnectionStatus::Error.label(), "🔴 Error");
	}
}
