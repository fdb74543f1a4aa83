//! Force-directed graph visualization component.
//!
//! Renders the live participant graph on an HTML canvas with:
//! - Physics-based node positioning via force simulation, updated in place as
//!   participants join
//! - Pan, zoom, and node dragging interactions
//! - Hover rings and a name label on the hovered node
//! - Directional arrows and flow particles on links
//! - A bounding box around participants labeled with the event name
//!
//! # Example
//!
//! ```ignore
//! use nodiverse_graph::components::force_graph::ForceGraphCanvas;
//!
//! view! {
//!     <ForceGraphCanvas
//!         graph=graph
//!         hovered=hovered_id
//!         event_label=event_name
//!         on_node_click=on_click
//!         on_node_hover=on_hover
//!     />
//! }
//! ```

mod component;
mod particles;
mod render;
pub mod scale;
mod state;
pub mod theme;

pub use component::ForceGraphCanvas;
pub use theme::Theme;
