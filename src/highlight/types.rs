//! Graph records consumed and produced by the highlight engine.
//!
//! Field names follow the JSON shape used by flow editors (`className`,
//! `borderColor`, `strokeWidth`, ...). Anything the engine does not know about
//! is kept in a flattened map so it survives a round trip untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Default accent used for selected nodes and connected edges.
pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#3b82f6";
/// Default opacity for elements outside the highlighted set.
pub const DEFAULT_DIMMED_OPACITY: f64 = 0.3;
/// Default opacity for elements inside the highlighted set.
pub const DEFAULT_HIGHLIGHT_OPACITY: f64 = 1.0;

/// Style keys owned by the engine. Values under these keys that do not have
/// the expected JSON type stay in `extra` untouched.
mod key {
	pub const OPACITY: &str = "opacity";
	pub const BORDER_COLOR: &str = "borderColor";
	pub const BORDER_WIDTH: &str = "borderWidth";
	pub const BOX_SHADOW: &str = "boxShadow";
	pub const STROKE: &str = "stroke";
	pub const STROKE_WIDTH: &str = "strokeWidth";
}

/// Moves `map[key]` out when `convert` accepts it.
fn take<T>(
	map: &mut Map<String, Value>,
	key: &str,
	convert: impl FnOnce(&Value) -> Option<T>,
) -> Option<T> {
	let value = map.get(key).and_then(convert)?;
	map.remove(key);
	Some(value)
}

fn as_string(value: &Value) -> Option<String> {
	value.as_str().map(str::to_string)
}

/// Writes a typed field back over the pass-through map.
fn put(map: &mut Map<String, Value>, key: &str, value: Option<Value>) {
	if let Some(value) = value {
		map.insert(key.to_string(), value);
	}
}

/// Presentation style of a node.
///
/// Deserializes from any JSON object. Engine-owned keys with an unexpected
/// type (`"borderWidth": "2px"`) are left in `extra` and serialized back as-is.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct NodeStyle {
	/// Numeric opacity.
	pub opacity: Option<f64>,
	/// CSS border color.
	pub border_color: Option<String>,
	/// Numeric border width in pixels.
	pub border_width: Option<f64>,
	/// CSS box shadow. The engine uses it for the selection ring.
	pub box_shadow: Option<String>,
	/// Every other style property, passed through as-is.
	pub extra: Map<String, Value>,
}

impl NodeStyle {
	/// Sets the opacity, replacing any raw value under the same key.
	pub fn set_opacity(&mut self, opacity: f64) {
		self.extra.remove(key::OPACITY);
		self.opacity = Some(opacity);
	}

	/// Sets border color and width.
	pub fn set_border(&mut self, color: &str, width: f64) {
		self.extra.remove(key::BORDER_COLOR);
		self.extra.remove(key::BORDER_WIDTH);
		self.border_color = Some(color.to_string());
		self.border_width = Some(width);
	}

	/// Sets or clears the box shadow, raw values included.
	pub fn set_box_shadow(&mut self, shadow: Option<String>) {
		self.extra.remove(key::BOX_SHADOW);
		self.box_shadow = shadow;
	}
}

impl From<Map<String, Value>> for NodeStyle {
	fn from(mut extra: Map<String, Value>) -> Self {
		Self {
			opacity: take(&mut extra, key::OPACITY, Value::as_f64),
			border_color: take(&mut extra, key::BORDER_COLOR, as_string),
			border_width: take(&mut extra, key::BORDER_WIDTH, Value::as_f64),
			box_shadow: take(&mut extra, key::BOX_SHADOW, as_string),
			extra,
		}
	}
}

impl From<NodeStyle> for Map<String, Value> {
	fn from(style: NodeStyle) -> Self {
		let mut map = style.extra;
		put(&mut map, key::OPACITY, style.opacity.map(Value::from));
		put(&mut map, key::BORDER_COLOR, style.border_color.map(Value::from));
		put(&mut map, key::BORDER_WIDTH, style.border_width.map(Value::from));
		put(&mut map, key::BOX_SHADOW, style.box_shadow.map(Value::from));
		map
	}
}

/// Presentation style of an edge. Same tolerance rules as [`NodeStyle`].
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct EdgeStyle {
	/// Numeric opacity.
	pub opacity: Option<f64>,
	/// CSS stroke color.
	pub stroke: Option<String>,
	/// Numeric stroke width in pixels.
	pub stroke_width: Option<f64>,
	/// Every other style property, passed through as-is.
	pub extra: Map<String, Value>,
}

impl EdgeStyle {
	/// Sets the opacity, replacing any raw value under the same key.
	pub fn set_opacity(&mut self, opacity: f64) {
		self.extra.remove(key::OPACITY);
		self.opacity = Some(opacity);
	}

	/// Sets the stroke color.
	pub fn set_stroke(&mut self, color: &str) {
		self.extra.remove(key::STROKE);
		self.stroke = Some(color.to_string());
	}

	/// Sets the stroke width.
	pub fn set_stroke_width(&mut self, width: f64) {
		self.extra.remove(key::STROKE_WIDTH);
		self.stroke_width = Some(width);
	}

	/// Whether the caller supplied any stroke width, numeric or not.
	pub fn has_stroke_width(&self) -> bool {
		self.stroke_width.is_some() || self.extra.contains_key(key::STROKE_WIDTH)
	}
}

impl From<Map<String, Value>> for EdgeStyle {
	fn from(mut extra: Map<String, Value>) -> Self {
		Self {
			opacity: take(&mut extra, key::OPACITY, Value::as_f64),
			stroke: take(&mut extra, key::STROKE, as_string),
			stroke_width: take(&mut extra, key::STROKE_WIDTH, Value::as_f64),
			extra,
		}
	}
}

impl From<EdgeStyle> for Map<String, Value> {
	fn from(style: EdgeStyle) -> Self {
		let mut map = style.extra;
		put(&mut map, key::OPACITY, style.opacity.map(Value::from));
		put(&mut map, key::STROKE, style.stroke.map(Value::from));
		put(&mut map, key::STROKE_WIDTH, style.stroke_width.map(Value::from));
		map
	}
}

/// `null` and missing both mean "no style".
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A node in the graph.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
	/// Unique identifier for this node. Edges reference nodes by this id.
	pub id: String,
	/// Optional display label. Labeled nodes are rendered larger.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	/// Optional CSS fill color override (e.g., "#ff0000").
	/// If not set, the canvas picks a palette color based on `group`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
	/// Optional group name for cluster-based coloring.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub group: Option<String>,
	/// Presentation style; `null` reads as empty.
	#[serde(default, deserialize_with = "null_as_default")]
	pub style: NodeStyle,
	/// Whitespace-separated class tokens.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub class_name: Option<String>,
	/// Presentation fields the engine does not interpret.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Node {
	/// Unstyled node with the given id.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			..Self::default()
		}
	}
}

/// A directed edge from `source` to `target`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
	/// Unique identifier; parallel edges are told apart by it.
	pub id: String,
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Presentation style; `null` reads as empty.
	#[serde(default, deserialize_with = "null_as_default")]
	pub style: EdgeStyle,
	/// Whitespace-separated class tokens.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub class_name: Option<String>,
	/// Presentation fields the engine does not interpret.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Edge {
	/// Unstyled edge from `source` to `target`.
	pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			source: source.into(),
			target: target.into(),
			..Self::default()
		}
	}

	/// Whether either endpoint is `node_id`.
	pub fn touches(&self, node_id: &str) -> bool {
		self.source == node_id || self.target == node_id
	}
}

/// Complete graph data: nodes and edges.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GraphData {
	/// All nodes, in drawing order.
	#[serde(default)]
	pub nodes: Vec<Node>,
	/// All edges. `links` is accepted as well.
	#[serde(default, alias = "links")]
	pub edges: Vec<Edge>,
}

/// Knobs for a highlighting pass. Every field has a default, so `{}` is a
/// valid JSON config.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HighlightConfig {
	/// Focused node. `None` and `""` both mean no selection.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub selected_node_id: Option<String>,
	/// Accent for selected borders and connected edges; not validated.
	pub highlight_color: String,
	/// Opacity of everything outside the highlighted set.
	/// Not clamped; values outside `0.0..=1.0` are the caller's business.
	pub dimmed_opacity: f64,
	/// Opacity of the highlighted set.
	pub highlight_opacity: f64,
}

impl Default for HighlightConfig {
	fn default() -> Self {
		Self {
			selected_node_id: None,
			highlight_color: DEFAULT_HIGHLIGHT_COLOR.to_string(),
			dimmed_opacity: DEFAULT_DIMMED_OPACITY,
			highlight_opacity: DEFAULT_HIGHLIGHT_OPACITY,
		}
	}
}

impl HighlightConfig {
	/// Same config with `node_id` as the selected node.
	pub fn selecting(&self, node_id: impl Into<String>) -> Self {
		Self {
			selected_node_id: Some(node_id.into()),
			..self.clone()
		}
	}

	/// The selected node id, treating an empty id as no selection.
	pub fn selection(&self) -> Option<&str> {
		self.selected_node_id.as_deref().filter(|id| !id.is_empty())
	}
}

/// Restyled copies of the input nodes and edges, in input order.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct HighlightedElements {
	/// Restyled nodes, parallel to the input nodes.
	pub nodes: Vec<Node>,
	/// Restyled edges, parallel to the input edges.
	pub edges: Vec<Edge>,
}

/// Node and edge ids along a directed path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathElements {
	/// Path nodes from start to end.
	pub node_ids: Vec<String>,
	/// Traversed edges, last edge first.
	pub edge_ids: Vec<String>,
}

impl PathElements {
	/// True when no path was found.
	pub fn is_empty(&self) -> bool {
		self.node_ids.is_empty()
	}

	/// Whether `node_id` lies on the path.
	pub fn contains_node(&self, node_id: &str) -> bool {
		self.node_ids.iter().any(|id| id == node_id)
	}

	/// Whether `edge_id` is traversed by the path.
	pub fn contains_edge(&self, edge_id: &str) -> bool {
		self.edge_ids.iter().any(|id| id == edge_id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn node_json_keeps_unknown_fields() {
		let raw = json!({
			"id": "a",
			"className": "node-box",
			"position": { "x": 10, "y": 20 },
			"style": { "opacity": 0.5, "background": "#fff", "borderWidth": 3 }
		});
		let node: Node = serde_json::from_value(raw.clone()).unwrap();
		assert_eq!(node.class_name.as_deref(), Some("node-box"));
		assert_eq!(node.style.opacity, Some(0.5));
		assert_eq!(node.style.border_width, Some(3.0));
		assert_eq!(node.style.extra.get("background"), Some(&json!("#fff")));
		assert_eq!(node.extra.get("position"), Some(&json!({ "x": 10, "y": 20 })));

		let back = serde_json::to_value(&node).unwrap();
		assert_eq!(back["position"], raw["position"]);
		assert_eq!(back["style"]["background"], json!("#fff"));
		assert_eq!(back["className"], json!("node-box"));
	}

	#[test]
	fn graph_accepts_links_alias() {
		let graph: GraphData = serde_json::from_value(json!({
			"nodes": [{ "id": "a" }, { "id": "b" }],
			"links": [{ "id": "e1", "source": "a", "target": "b" }]
		}))
		.unwrap();
		assert_eq!(graph.edges.len(), 1);
		assert_eq!(graph.edges[0].style, EdgeStyle::default());
	}

	#[test]
	fn config_defaults_from_empty_object() {
		let config: HighlightConfig = serde_json::from_value(json!({})).unwrap();
		assert_eq!(config, HighlightConfig::default());
		assert_eq!(config.highlight_color, "#3b82f6");
		assert_eq!(config.dimmed_opacity, 0.3);
		assert_eq!(config.highlight_opacity, 1.0);

		let config: HighlightConfig =
			serde_json::from_value(json!({ "selectedNodeId": "a", "dimmedOpacity": 0.1 })).unwrap();
		assert_eq!(config.selected_node_id.as_deref(), Some("a"));
		assert_eq!(config.dimmed_opacity, 0.1);
	}

	#[test]
	fn mistyped_style_values_pass_through() {
		let graph: GraphData = serde_json::from_value(json!({
			"nodes": [{ "id": "a", "style": { "borderWidth": "2px", "opacity": "0.5", "boxShadow": 0 } }],
			"edges": [{ "id": "e1", "source": "a", "target": "a", "style": { "strokeWidth": "3", "stroke": 7 } }]
		}))
		.unwrap();

		let node = &graph.nodes[0].style;
		assert_eq!(node.border_width, None);
		assert_eq!(node.opacity, None);
		assert_eq!(node.box_shadow, None);
		assert_eq!(node.extra.get("borderWidth"), Some(&json!("2px")));

		let edge = &graph.edges[0].style;
		assert_eq!(edge.stroke_width, None);
		assert!(edge.has_stroke_width());
		assert_eq!(edge.extra.get("stroke"), Some(&json!(7)));

		let back = serde_json::to_value(&graph).unwrap();
		assert_eq!(back["nodes"][0]["style"]["borderWidth"], json!("2px"));
		assert_eq!(back["nodes"][0]["style"]["opacity"], json!("0.5"));
		assert_eq!(back["edges"][0]["style"]["strokeWidth"], json!("3"));
	}

	#[test]
	fn setters_replace_raw_values() {
		let mut style: NodeStyle =
			serde_json::from_value(json!({ "opacity": "x", "borderWidth": "2px", "boxShadow": 1 })).unwrap();
		style.set_opacity(0.3);
		style.set_border("#fff", 2.0);
		style.set_box_shadow(None);
		assert!(style.extra.is_empty());

		let back = serde_json::to_value(&style).unwrap();
		assert_eq!(back, json!({ "opacity": 0.3, "borderColor": "#fff", "borderWidth": 2.0 }));
	}

	#[test]
	fn null_style_reads_as_empty() {
		let node: Node = serde_json::from_value(json!({ "id": "a", "style": null })).unwrap();
		assert_eq!(node.style, NodeStyle::default());
		let edge: Edge =
			serde_json::from_value(json!({ "id": "e", "source": "a", "target": "b", "style": null }))
				.unwrap();
		assert_eq!(edge.style, EdgeStyle::default());
	}

	#[test]
	fn empty_selection_id_is_no_selection() {
		assert_eq!(HighlightConfig::default().selecting("").selection(), None);
		assert_eq!(HighlightConfig::default().selecting("a").selection(), Some("a"));
	}
}
