//! UI components: the graph canvas and the surrounding chrome.

pub mod force_graph;
pub mod panel;
