//! nodiverse-graph: live force-directed graph of event participants.
//!
//! This crate connects to an event's participant feed over a WebSocket, keeps
//! a deduplicated node/link graph of everyone who has joined, and renders it
//! as an interactive force-directed graph with a profile side panel.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod config;
pub mod feed;
pub mod view;

pub use components::force_graph::ForceGraphCanvas;
pub use components::panel::{SidePanel, StatusBox};
pub use config::{SessionConfig, SimulationConfig};
pub use feed::{ConnectionStatus, FeedSession, GraphState, Participant};
pub use view::ViewState;

use feed::{Connection, EventQueue, TransportEvent, WebSocketTransport};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("nodiverse: logging initialized");
}

/// Read session overrides from a script element with id="session-config".
fn read_config_script(window: &Window) -> Option<SessionConfig> {
	let document = window.document()?;
	let element = document.get_element_by_id("session-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<SessionConfig>(&json_text) {
		Ok(config) => {
			info!(
				"nodiverse: session config for event {} as {}",
				config.event_id, config.viewer_id
			);
			Some(config)
		}
		Err(e) => {
			warn!("nodiverse: failed to parse session config: {}", e);
			None
		}
	}
}

/// Session configuration from the page, falling back to defaults.
fn load_session_config() -> SessionConfig {
	let Some(window) = web_sys::window() else {
		return SessionConfig::default();
	};
	let location = window.location();
	let protocol = location.protocol().unwrap_or_default();
	let hostname = location.hostname().unwrap_or_default();
	read_config_script(&window)
		.unwrap_or_default()
		.with_page_endpoint(&protocol, &hostname)
}

/// Main application component.
/// Opens the feed, folds it into graph state and renders graph, panel and status.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_session_config();
	let session = RwSignal::new(FeedSession::new(config.clone()));
	let view_state = RwSignal::new(ViewState::default());

	let graph = Memo::new(move |_| session.with(|s| s.graph().clone()));
	let status = Memo::new(move |_| session.with(|s| s.status()));
	let selected = Memo::new(move |_| view_state.with(|v| v.selected().cloned()));
	let hovered = Memo::new(move |_| view_state.with(|v| v.hovered_id().map(str::to_owned)));
	let event_name = config.event_name.clone();
	let event_label = Signal::derive(move || event_name.clone());

	let queue = EventQueue::default();
	let sink = move |event: TransportEvent| {
		queue.push(event);
		// Dropped frames and repeat joins leave the graph as is; skip notifying.
		session.maybe_update(|s| s.drain(&queue).changed());
	};
	let connection = match WebSocketTransport::open(&config.socket_url(), sink) {
		Ok(transport) => Some(Connection::new(transport)),
		Err(err) => {
			session.maybe_update(|s| {
				s.handle(TransportEvent::Error(err.to_string()))
					.changed()
			});
			None
		}
	};
	// Dropped with the owner; on_cleanup closes it first.
	let connection = StoredValue::new_local(connection);
	on_cleanup(move || {
		connection.try_update_value(|c| {
			if let Some(c) = c {
				c.close();
			}
		});
	});

	let on_node_click = Callback::new(move |p: Participant| {
		view_state.update(|v| {
			v.select_node(p);
		});
	});
	let on_node_hover =
		Callback::new(move |p: Option<Participant>| view_state.update(|v| v.set_hovered(p)));
	let on_close = Callback::new(move |_: ()| view_state.update(ViewState::clear_selection));

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Nodiverse" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="app">
			<header class="header">
				<h1 class="header-title">"Nodiverse"</h1>
			</header>
			<div class="main-content">
				<SidePanel selected=selected on_close=on_close />
				<div class="graph-area">
					<ForceGraphCanvas
						graph=graph
						hovered=hovered
						event_label=event_label
						on_node_click=on_node_click
						on_node_hover=on_node_hover
						simulation=config.simulation.clone()
					/>
				</div>
			</div>
			<StatusBox status=status />
			<footer class="footer">
				<p class="footer-text">"You're somehow connected ❤️"</p>
			</footer>
		</div>
	}
}
