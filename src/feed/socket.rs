//! Browser `WebSocket` transport.

use std::rc::Rc;

use log::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use super::connection::{Transport, TransportError, TransportEvent};

/// A `WebSocket` whose callbacks forward into a [`TransportEvent`] sink.
///
/// The closures are kept alive here; [`Transport::close`] detaches them before
/// closing the socket, so nothing fires after teardown.
pub struct WebSocketTransport {
	ws: WebSocket,
	_on_open: Closure<dyn FnMut(Event)>,
	_on_message: Closure<dyn FnMut(MessageEvent)>,
	_on_error: Closure<dyn FnMut(Event)>,
	_on_close: Closure<dyn FnMut(CloseEvent)>,
}

impl WebSocketTransport {
	pub fn open(url: &str, sink: impl Fn(TransportEvent) + 'static) -> Result<Self, TransportError> {
		let ws = WebSocket::new(url).map_err(|err| TransportError::Open {
			url: url.to_string(),
			detail: format!("{err:?}"),
		})?;
		info!("feed: opening {url}");
		let sink = Rc::new(sink);

		let sink_open = sink.clone();
		let on_open: Closure<dyn FnMut(Event)> = Closure::new(move |_: Event| {
			sink_open(TransportEvent::Opened);
		});
		ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));

		let sink_message = sink.clone();
		let on_message: Closure<dyn FnMut(MessageEvent)> =
			Closure::new(move |ev: MessageEvent| match ev.data().as_string() {
				Some(text) => sink_message(TransportEvent::Message(text)),
				None => warn!("feed: ignoring non-text frame"),
			});
		ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

		let sink_error = sink.clone();
		let on_error: Closure<dyn FnMut(Event)> = Closure::new(move |ev: Event| {
			sink_error(TransportEvent::Error(format!("`{}` event", ev.type_())));
		});
		ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));

		let sink_close = sink;
		let on_close: Closure<dyn FnMut(CloseEvent)> = Closure::new(move |ev: CloseEvent| {
			info!("feed: close code {} {:?}", ev.code(), ev.reason());
			sink_close(TransportEvent::Closed);
		});
		ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

		Ok(Self {
			ws,
			_on_open: on_open,
			_on_message: on_message,
			_on_error: on_error,
			_on_close: on_close,
		})
	}
}

impl Transport for WebSocketTransport {
	fn close(&mut self) {
		self.ws.set_onopen(None);
		self.ws.set_onmessage(None);
		self.ws.set_onerror(None);
		self.ws.set_onclose(None);
		if let Err(err) = self.ws.close() {
			warn!("feed: close failed: {err:?}");
		}
	}
}
