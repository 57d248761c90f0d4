//! Selection highlighting for node/edge graphs.
//!
//! Every function here is pure: it takes the caller's nodes and edges by
//! reference and returns restyled copies in the same order. Only `style` and
//! `class_name` ever change. Unknown ids simply match nothing.
//!
//! # Example
//!
//! ```
//! use flow_highlight::highlight::{Edge, HighlightConfig, Node, apply_node_highlighting};
//!
//! let nodes = vec![Node::new("a"), Node::new("b"), Node::new("c")];
//! let edges = vec![Edge::new("e1", "a", "b")];
//! let config = HighlightConfig::default().selecting("a");
//!
//! let out = apply_node_highlighting(&nodes, &edges, &config);
//! assert_eq!(out.nodes[1].style.opacity, Some(1.0));
//! assert_eq!(out.nodes[2].style.opacity, Some(0.3));
//! ```

pub mod class;
mod path;
mod types;

use std::collections::HashSet;

pub use path::{connected_node_ids, path_elements};
pub use types::{
	DEFAULT_DIMMED_OPACITY, DEFAULT_HIGHLIGHT_COLOR, DEFAULT_HIGHLIGHT_OPACITY, Edge, EdgeStyle,
	GraphData, HighlightConfig, HighlightedElements, Node, NodeStyle, PathElements,
};

/// Border width given to selected nodes and stroke width of highlighted edges.
const ACCENT_WIDTH: f64 = 2.0;

/// Translucent ring around a selected node; `40` is a 25% alpha suffix.
fn selection_ring(color: &str) -> String {
	format!("0 0 0 2px {color}40")
}

/// Node treatment shared by the single, multi and path variants.
struct NodeMark {
	highlighted: bool,
	selected: bool,
	ring: bool,
}

fn mark_node(node: &Node, mark: NodeMark, config: &HighlightConfig) -> Node {
	let mut style = node.style.clone();
	style.set_opacity(if mark.highlighted {
		config.highlight_opacity
	} else {
		config.dimmed_opacity
	});
	if mark.selected {
		style.set_border(&config.highlight_color, ACCENT_WIDTH);
		if mark.ring {
			style.set_box_shadow(Some(selection_ring(&config.highlight_color)));
		}
	}

	let mut tokens = Vec::with_capacity(2);
	if mark.selected {
		tokens.push(class::SELECTED_NODE);
	}
	tokens.push(if mark.highlighted {
		class::HIGHLIGHTED_NODE
	} else {
		class::DIMMED_NODE
	});

	Node {
		style,
		class_name: Some(class::append(node.class_name.as_deref(), &tokens)),
		..node.clone()
	}
}

/// Edge treatment. `widen` sets the accent stroke width on highlighted edges
/// and falls back to a width of 1 on the rest when none was given.
fn mark_edge(edge: &Edge, highlighted: bool, widen: bool, config: &HighlightConfig) -> Edge {
	let mut style = edge.style.clone();
	if highlighted {
		style.set_opacity(config.highlight_opacity);
		style.set_stroke(&config.highlight_color);
		if widen {
			style.set_stroke_width(ACCENT_WIDTH);
		}
	} else {
		style.set_opacity(config.dimmed_opacity);
		if widen && !style.has_stroke_width() {
			style.set_stroke_width(1.0);
		}
	}

	let token = if highlighted {
		class::HIGHLIGHTED_EDGE
	} else {
		class::DIMMED_EDGE
	};
	Edge {
		style,
		class_name: Some(class::append(edge.class_name.as_deref(), &[token])),
		..edge.clone()
	}
}

/// Highlights `config.selected_node_id` and its direct neighbours, dimming
/// everything else.
///
/// Without a selection (or with an empty id) every element just gets
/// `highlight_opacity`.
pub fn apply_node_highlighting(
	nodes: &[Node],
	edges: &[Edge],
	config: &HighlightConfig,
) -> HighlightedElements {
	let Some(selected) = config.selection() else {
		return HighlightedElements {
			nodes: nodes
				.iter()
				.map(|node| {
					let mut node = node.clone();
					node.style.set_opacity(config.highlight_opacity);
					node
				})
				.collect(),
			edges: edges
				.iter()
				.map(|edge| {
					let mut edge = edge.clone();
					edge.style.set_opacity(config.highlight_opacity);
					edge
				})
				.collect(),
		};
	};

	let connected = connected_node_ids(selected, edges);
	let highlighted: HashSet<&str> = connected
		.iter()
		.map(String::as_str)
		.chain([selected])
		.collect();

	HighlightedElements {
		nodes: nodes
			.iter()
			.map(|node| {
				let mark = NodeMark {
					highlighted: highlighted.contains(node.id.as_str()),
					selected: node.id == selected,
					ring: true,
				};
				mark_node(node, mark, config)
			})
			.collect(),
		edges: edges
			.iter()
			.map(|edge| mark_edge(edge, edge.touches(selected), true, config))
			.collect(),
	}
}

/// Highlights several selected nodes and the union of their neighbourhoods.
///
/// Selected nodes get the accent border but no ring. Highlighted edges take
/// the accent stroke color; stroke widths are left alone. An empty selection
/// behaves like [`reset_highlighting`].
pub fn apply_multi_node_highlighting<S: AsRef<str>>(
	nodes: &[Node],
	edges: &[Edge],
	selected_node_ids: &[S],
	config: &HighlightConfig,
) -> HighlightedElements {
	if selected_node_ids.is_empty() {
		return reset_highlighting(nodes, edges);
	}

	let selected: HashSet<&str> = selected_node_ids.iter().map(|id| id.as_ref()).collect();
	let mut highlighted: HashSet<String> = selected.iter().map(|id| id.to_string()).collect();
	for id in &selected {
		highlighted.extend(connected_node_ids(id, edges));
	}

	HighlightedElements {
		nodes: nodes
			.iter()
			.map(|node| {
				let mark = NodeMark {
					highlighted: highlighted.contains(&node.id),
					selected: selected.contains(node.id.as_str()),
					ring: false,
				};
				mark_node(node, mark, config)
			})
			.collect(),
		edges: edges
			.iter()
			.map(|edge| {
				let hit = selected.contains(edge.source.as_str())
					|| selected.contains(edge.target.as_str());
				mark_edge(edge, hit, false, config)
			})
			.collect(),
	}
}

/// Highlights the nodes and edges of `path`, with the selection border on
/// its two endpoints. An empty path behaves like [`reset_highlighting`].
pub fn apply_path_highlighting(
	nodes: &[Node],
	edges: &[Edge],
	path: &PathElements,
	config: &HighlightConfig,
) -> HighlightedElements {
	if path.is_empty() {
		return reset_highlighting(nodes, edges);
	}

	let endpoints = [path.node_ids.first(), path.node_ids.last()];
	HighlightedElements {
		nodes: nodes
			.iter()
			.map(|node| {
				let mark = NodeMark {
					highlighted: path.contains_node(&node.id),
					selected: endpoints.contains(&Some(&node.id)),
					ring: true,
				};
				mark_node(node, mark, config)
			})
			.collect(),
		edges: edges
			.iter()
			.map(|edge| mark_edge(edge, path.contains_edge(&edge.id), true, config))
			.collect(),
	}
}

/// Drops every trace of highlighting: opacity back to 1, no selection ring,
/// and the engine's class tokens removed. Other class tokens are kept.
pub fn reset_highlighting(nodes: &[Node], edges: &[Edge]) -> HighlightedElements {
	HighlightedElements {
		nodes: nodes
			.iter()
			.map(|node| {
				let mut style = node.style.clone();
				style.set_opacity(1.0);
				style.set_box_shadow(None);
				Node {
					style,
					class_name: class::strip(node.class_name.as_deref(), &class::NODE_TOKENS),
					..node.clone()
				}
			})
			.collect(),
		edges: edges
			.iter()
			.map(|edge| {
				let mut style = edge.style.clone();
				style.set_opacity(1.0);
				Edge {
					style,
					class_name: class::strip(edge.class_name.as_deref(), &class::EDGE_TOKENS),
					..edge.clone()
				}
			})
			.collect(),
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn graph() -> (Vec<Node>, Vec<Edge>) {
		let data: GraphData = serde_json::from_value(json!({
			"nodes": [
				{ "id": "a", "className": "node-box", "style": { "borderWidth": 3, "background": "#222" } },
				{ "id": "b" },
				{ "id": "c", "style": { "borderColor": "#999" } },
				{ "id": "d", "label": "Isolated" }
			],
			"edges": [
				{ "id": "ab", "source": "a", "target": "b" },
				{ "id": "cb", "source": "c", "target": "b", "style": { "strokeWidth": 4 } },
				{ "id": "bd", "source": "b", "target": "d", "className": "flow" }
			]
		}))
		.unwrap();
		(data.nodes, data.edges)
	}

	fn opacities(out: &HighlightedElements) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
		(
			out.nodes.iter().map(|n| n.style.opacity).collect(),
			out.edges.iter().map(|e| e.style.opacity).collect(),
		)
	}

	#[test]
	fn no_selection_only_sets_opacity() {
		let (nodes, edges) = graph();
		let config = HighlightConfig {
			highlight_opacity: 0.9,
			..HighlightConfig::default()
		};
		let out = apply_node_highlighting(&nodes, &edges, &config);

		for (before, after) in nodes.iter().zip(&out.nodes) {
			let mut expected = before.clone();
			expected.style.opacity = Some(0.9);
			assert_eq!(after, &expected);
		}
		for (before, after) in edges.iter().zip(&out.edges) {
			let mut expected = before.clone();
			expected.style.opacity = Some(0.9);
			assert_eq!(after, &expected);
		}
	}

	#[test]
	fn selection_highlights_neighbourhood() {
		let (nodes, edges) = graph();
		let out = apply_node_highlighting(&nodes, &edges, &HighlightConfig::default().selecting("c"));

		let (node_opacity, edge_opacity) = opacities(&out);
		assert_eq!(node_opacity, [Some(0.3), Some(1.0), Some(1.0), Some(0.3)]);
		assert_eq!(edge_opacity, [Some(0.3), Some(1.0), Some(0.3)]);

		let c = &out.nodes[2];
		assert_eq!(c.style.border_color.as_deref(), Some("#3b82f6"));
		assert_eq!(c.style.border_width, Some(2.0));
		assert_eq!(c.style.box_shadow.as_deref(), Some("0 0 0 2px #3b82f640"));
		assert_eq!(c.class_name.as_deref(), Some("selected-node highlighted-node"));

		let a = &out.nodes[0];
		assert_eq!(a.style.border_width, Some(3.0));
		assert_eq!(a.style.box_shadow, None);
		assert_eq!(a.style.extra.get("background"), Some(&json!("#222")));
		assert_eq!(a.class_name.as_deref(), Some("node-box dimmed-node"));

		assert_eq!(out.nodes[1].class_name.as_deref(), Some("highlighted-node"));
		assert_eq!(out.nodes[1].style.border_color, None);
	}

	#[test]
	fn selection_restyles_edges() {
		let (nodes, edges) = graph();
		let config = HighlightConfig {
			highlight_color: "#ff0000".into(),
			..HighlightConfig::default().selecting("c")
		};
		let out = apply_node_highlighting(&nodes, &edges, &config);

		let cb = &out.edges[1];
		assert_eq!(cb.style.stroke.as_deref(), Some("#ff0000"));
		assert_eq!(cb.style.stroke_width, Some(2.0));
		assert_eq!(cb.class_name.as_deref(), Some("highlighted-edge"));

		let ab = &out.edges[0];
		assert_eq!(ab.style.stroke, None);
		assert_eq!(ab.style.stroke_width, Some(1.0));
		assert_eq!(ab.class_name.as_deref(), Some("dimmed-edge"));
		assert_eq!(out.edges[2].class_name.as_deref(), Some("flow dimmed-edge"));
	}

	#[test]
	fn unknown_selection_dims_everything() {
		let (nodes, edges) = graph();
		let out = apply_node_highlighting(&nodes, &edges, &HighlightConfig::default().selecting("zzz"));
		let (node_opacity, edge_opacity) = opacities(&out);
		assert!(node_opacity.iter().all(|o| *o == Some(0.3)));
		assert!(edge_opacity.iter().all(|o| *o == Some(0.3)));
		assert_eq!(out.nodes.len(), nodes.len());
		assert!(out.nodes.iter().zip(&nodes).all(|(a, b)| a.id == b.id));
	}

	#[test]
	fn opacity_is_not_clamped() {
		let (nodes, edges) = graph();
		let config = HighlightConfig {
			dimmed_opacity: -0.5,
			highlight_opacity: 1.5,
			..HighlightConfig::default().selecting("a")
		};
		let out = apply_node_highlighting(&nodes, &edges, &config);
		assert_eq!(out.nodes[0].style.opacity, Some(1.5));
		assert_eq!(out.nodes[2].style.opacity, Some(-0.5));
	}

	#[test]
	fn input_is_not_mutated() {
		let (nodes, edges) = graph();
		let snapshot = (nodes.clone(), edges.clone());
		let _ = apply_node_highlighting(&nodes, &edges, &HighlightConfig::default().selecting("b"));
		let _ = apply_multi_node_highlighting(&nodes, &edges, &["a"], &HighlightConfig::default());
		let _ = reset_highlighting(&nodes, &edges);
		assert_eq!((nodes, edges), snapshot);
	}

	#[test]
	fn reset_clears_engine_state_only() {
		let (nodes, edges) = graph();
		let highlighted =
			apply_node_highlighting(&nodes, &edges, &HighlightConfig::default().selecting("a"));
		let out = reset_highlighting(&highlighted.nodes, &highlighted.edges);

		let (node_opacity, edge_opacity) = opacities(&out);
		assert!(node_opacity.iter().all(|o| *o == Some(1.0)));
		assert!(edge_opacity.iter().all(|o| *o == Some(1.0)));
		assert!(out.nodes.iter().all(|n| n.style.box_shadow.is_none()));

		assert_eq!(out.nodes[0].class_name.as_deref(), Some("node-box"));
		assert_eq!(out.nodes[1].class_name.as_deref(), Some(""));
		assert_eq!(out.edges[2].class_name.as_deref(), Some("flow"));
		// Border fields are not part of the reset.
		assert_eq!(out.nodes[0].style.border_color.as_deref(), Some("#3b82f6"));
	}

	#[test]
	fn reset_keeps_missing_classes_missing() {
		let (nodes, edges) = graph();
		let out = reset_highlighting(&nodes, &edges);
		assert_eq!(out.nodes[1].class_name, None);
		assert_eq!(out.edges[0].class_name, None);
	}

	#[test]
	fn reset_is_idempotent() {
		let (nodes, edges) = graph();
		let highlighted =
			apply_multi_node_highlighting(&nodes, &edges, &["a", "d"], &HighlightConfig::default());
		let once = reset_highlighting(&highlighted.nodes, &highlighted.edges);
		let twice = reset_highlighting(&once.nodes, &once.edges);
		assert_eq!(once, twice);
	}

	#[test]
	fn multi_with_empty_selection_is_reset() {
		let (nodes, edges) = graph();
		let none: [&str; 0] = [];
		assert_eq!(
			apply_multi_node_highlighting(&nodes, &edges, &none, &HighlightConfig::default()),
			reset_highlighting(&nodes, &edges)
		);
	}

	#[test]
	fn multi_selection_unions_neighbourhoods() {
		let (nodes, edges) = graph();
		let selected = vec!["a".to_string(), "d".to_string()];
		let out = apply_multi_node_highlighting(&nodes, &edges, selected.as_slice(), &HighlightConfig::default());

		// a -> b, b -> d: c is the only node outside both neighbourhoods.
		let (node_opacity, edge_opacity) = opacities(&out);
		assert_eq!(node_opacity, [Some(1.0), Some(1.0), Some(0.3), Some(1.0)]);
		assert_eq!(edge_opacity, [Some(1.0), Some(0.3), Some(1.0)]);

		let a = &out.nodes[0];
		assert_eq!(a.style.border_color.as_deref(), Some("#3b82f6"));
		assert_eq!(a.style.border_width, Some(2.0));
		assert_eq!(a.style.box_shadow, None);
		assert_eq!(a.class_name.as_deref(), Some("node-box selected-node highlighted-node"));
		assert_eq!(out.nodes[1].class_name.as_deref(), Some("highlighted-node"));

		assert_eq!(out.edges[0].style.stroke.as_deref(), Some("#3b82f6"));
		assert_eq!(out.edges[0].style.stroke_width, None);
		assert_eq!(out.edges[1].style.stroke_width, Some(4.0));
		assert_eq!(out.edges[1].class_name.as_deref(), Some("dimmed-edge"));
	}

	#[test]
	fn path_highlighting_marks_route() {
		let (nodes, edges) = graph();
		let path = path_elements("a", "d", &edges);
		assert_eq!(path.node_ids, ["a", "b", "d"]);

		let out = apply_path_highlighting(&nodes, &edges, &path, &HighlightConfig::default());
		let (node_opacity, edge_opacity) = opacities(&out);
		assert_eq!(node_opacity, [Some(1.0), Some(1.0), Some(0.3), Some(1.0)]);
		assert_eq!(edge_opacity, [Some(1.0), Some(0.3), Some(1.0)]);

		assert!(class::has(out.nodes[0].class_name.as_deref(), class::SELECTED_NODE));
		assert!(class::has(out.nodes[3].class_name.as_deref(), class::SELECTED_NODE));
		assert!(!class::has(out.nodes[1].class_name.as_deref(), class::SELECTED_NODE));
		assert_eq!(out.edges[2].style.stroke_width, Some(2.0));

		let cleared = reset_highlighting(&out.nodes, &out.edges);
		assert!(
			cleared
				.nodes
				.iter()
				.all(|n| !class::has(n.class_name.as_deref(), class::HIGHLIGHTED_NODE))
		);
	}

	#[test]
	fn empty_path_is_reset() {
		let (nodes, edges) = graph();
		let path = path_elements("d", "a", &edges);
		assert!(path.is_empty());
		assert_eq!(
			apply_path_highlighting(&nodes, &edges, &path, &HighlightConfig::default()),
			reset_highlighting(&nodes, &edges)
		);
	}

	#[test]
	fn empty_selected_id_behaves_like_no_selection() {
		let (nodes, edges) = graph();
		assert_eq!(
			apply_node_highlighting(&nodes, &edges, &HighlightConfig::default().selecting("")),
			apply_node_highlighting(&nodes, &edges, &HighlightConfig::default())
		);
	}

	#[test]
	fn raw_style_values_survive_dimming() {
		let data: GraphData = serde_json::from_value(json!({
			"nodes": [
				{ "id": "a", "style": { "borderWidth": "2px" } },
				{ "id": "b", "style": null },
				{ "id": "c", "style": { "borderWidth": "3px" } }
			],
			"edges": [
				{ "id": "ab", "source": "a", "target": "b", "style": { "strokeWidth": "3" } },
				{ "id": "bc", "source": "b", "target": "c", "style": { "strokeWidth": "3" } }
			]
		}))
		.unwrap();
		let out = apply_node_highlighting(
			&data.nodes,
			&data.edges,
			&HighlightConfig::default().selecting("a"),
		);
		let json = serde_json::to_value(&out).unwrap();

		assert_eq!(json["nodes"][0]["style"]["borderWidth"], json!(2.0));
		assert_eq!(json["nodes"][2]["style"]["borderWidth"], json!("3px"));
		assert_eq!(json["edges"][0]["style"]["strokeWidth"], json!(2.0));
		assert_eq!(json["edges"][1]["style"]["strokeWidth"], json!("3"));
		assert_eq!(json["edges"][1]["style"]["opacity"], json!(0.3));
	}
}
