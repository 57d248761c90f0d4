//! flow-highlight: selection highlighting for node/edge graphs.
//!
//! The [`highlight`] module is a set of pure functions that restyle a graph
//! around a selection: neighbourhood highlighting, multi-selection, directed
//! path tracing and reset. [`components`] hosts a WASM canvas that renders a
//! force-directed graph and drives its highlighting through those functions.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod highlight;

pub use components::flow_graph::{FlowGraphCanvas, Selection, Theme};
pub use highlight::{Edge, GraphData, HighlightConfig, HighlightedElements, Node, PathElements};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("flow-highlight: logging initialized");
}

/// Text content of `<script id="{id}">`, if present.
fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], edges: [...] }
fn load_graph_data() -> Option<GraphData> {
	let json_text = script_text("graph-data")?;
	match serde_json::from_str::<GraphData>(&json_text) {
		Ok(data) => {
			info!(
				"flow-highlight: loaded {} nodes, {} edges",
				data.nodes.len(),
				data.edges.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("flow-highlight: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Optional highlight settings from a script element with
/// id="highlight-config", e.g. `{ "highlightColor": "#f59e0b" }`.
fn load_highlight_config() -> HighlightConfig {
	let Some(json_text) = script_text("highlight-config") else {
		return HighlightConfig::default();
	};
	serde_json::from_str(&json_text).unwrap_or_else(|e| {
		warn!("flow-highlight: ignoring bad highlight config: {}", e);
		HighlightConfig::default()
	})
}

/// Main application component.
/// Loads graph data from DOM and renders the selectable graph.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_default();
	let graph_signal = Signal::derive(move || graph_data.clone());
	let config = load_highlight_config();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Flow Highlighting" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<FlowGraphCanvas data=graph_signal config=config fullscreen=true />
			<div class="graph-overlay">
				<h1>"Flow Highlighting"</h1>
				<p class="subtitle">
					"Click to select. Ctrl-click to multi-select. Shift-click to trace a path. Esc to reset."
				</p>
			</div>
		</div>
	}
}
