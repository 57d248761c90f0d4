//! Graph simulation state, selection tracking and opacity easing.
//!
//! Wraps the `force_graph` physics simulation with per-node metadata, view
//! transforms for pan/zoom, and the current [`Selection`]. Every selection
//! change reruns the highlight engine; the renderer only ever reads the
//! engine's restyled nodes and edges.

use std::collections::HashMap;
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::{debug, warn};

use super::theme::Theme;
use crate::highlight::{self, GraphData, HighlightConfig, HighlightedElements, PathElements};

/// Per-node display metadata attached to each node in the simulation.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	/// Position of the node in [`GraphData::nodes`].
	pub index: usize,
	pub label: Option<String>,
	/// Fill color as CSS.
	pub color: String,
	/// Size multiplier (1.0 = normal, >1.0 = larger/more important)
	pub size: f64,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to `MIN_ZOOM..MAX_ZOOM`).
	pub k: f64,
}

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

/// Pointer travel (screen pixels) below which a press counts as a click.
pub const CLICK_SLOP: f64 = 4.0;

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
	/// Largest pointer distance from the press position so far.
	pub travel: f64,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	pub travel: f64,
}

/// What the user has picked on the canvas.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Selection {
	/// Nothing selected.
	#[default]
	None,
	/// One focused node.
	Single(String),
	/// Several nodes, in the order they were picked.
	Multi(Vec<String>),
	/// A traced directed path between two nodes.
	Path {
		/// Start node.
		from: String,
		/// End node.
		to: String,
		/// Nodes and edges along the path.
		path: PathElements,
	},
}

impl Selection {
	/// One-line summary for the status overlay.
	pub fn describe(&self) -> String {
		match self {
			Selection::None => String::new(),
			Selection::Single(id) => format!("Selected {id}"),
			Selection::Multi(ids) => format!("Selected {} nodes", ids.len()),
			Selection::Path { from, to, path } => {
				format!("Path {from} -> {to} ({} hops)", path.edge_ids.len())
			}
		}
	}
}

/// Displayed opacities, eased towards the engine's target values.
///
/// Uses exponential smoothing so fades slow down as they approach the target:
/// `value += (target - value) * (1 - e^(-speed * dt))`.
#[derive(Clone, Debug, Default)]
pub struct FadeState {
	nodes: Vec<f64>,
	edges: Vec<f64>,
}

/// Smoothing speed; ~95% of the way in roughly 200ms.
const FADE_SPEED: f64 = 15.0;

impl FadeState {
	fn new(node_count: usize, edge_count: usize) -> Self {
		Self {
			nodes: vec![1.0; node_count],
			edges: vec![1.0; edge_count],
		}
	}

	fn tick(&mut self, dt: f64, targets: &HighlightedElements) {
		let factor = 1.0 - (-FADE_SPEED * dt).exp();
		let ease = |current: &mut f64, target: Option<f64>| {
			let target = target.unwrap_or(1.0).clamp(0.0, 1.0);
			*current += (target - *current) * factor;
		};
		for (current, node) in self.nodes.iter_mut().zip(&targets.nodes) {
			ease(current, node.style.opacity);
		}
		for (current, edge) in self.edges.iter_mut().zip(&targets.edges) {
			ease(current, edge.style.opacity);
		}
	}

	pub fn node(&self, index: usize) -> f64 {
		self.nodes.get(index).copied().unwrap_or(1.0)
	}

	pub fn edge(&self, index: usize) -> f64 {
		self.edges.get(index).copied().unwrap_or(1.0)
	}
}

/// Where an edge is drawn: its endpoints in the simulation and its slot among
/// the edges joining the same pair of nodes (either direction).
#[derive(Clone, Copy, Debug)]
pub struct EdgeRoute {
	pub source: DefaultNodeIdx,
	pub target: DefaultNodeIdx,
	pub lane: usize,
}

/// Core graph state combining physics simulation, selection and styling.
///
/// Created once when the component mounts, then mutated by input handlers and
/// the animation loop.
pub struct FlowGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub selection: Selection,
	pub fade: FadeState,
	data: GraphData,
	config: HighlightConfig,
	styled: HighlightedElements,
	/// Position in `data.nodes` per simulation node.
	node_positions: HashMap<DefaultNodeIdx, usize>,
	/// Drawing route per edge, parallel to `data.edges`. `None` for edges that
	/// reference unknown nodes.
	routes: Vec<Option<EdgeRoute>>,
}

impl FlowGraphState {
	pub fn new(
		data: &GraphData,
		width: f64,
		height: f64,
		theme: &Theme,
		config: HighlightConfig,
	) -> Self {
		let mut graph = ForceGraph::new(SimulationParameters {
			force_charge: 150.0,
			force_spring: 0.05,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: 0.9,
		});

		// Degree per node for sizing
		let mut degree: HashMap<&str, usize> = HashMap::new();
		for edge in &data.edges {
			*degree.entry(&edge.source).or_insert(0) += 1;
			*degree.entry(&edge.target).or_insert(0) += 1;
		}
		let max_degree = degree.values().copied().max().unwrap_or(1).max(1);

		let mut group_slots: HashMap<&str, usize> = HashMap::new();
		let mut id_to_idx: HashMap<&str, DefaultNodeIdx> = HashMap::new();
		let mut node_positions = HashMap::with_capacity(data.nodes.len());

		for (i, node) in data.nodes.iter().enumerate() {
			// explicit color > group palette slot > position in palette
			let color = node.color.clone().unwrap_or_else(|| {
				let slot = match node.group.as_deref() {
					Some(group) => {
						let next = group_slots.len();
						*group_slots.entry(group).or_insert(next)
					}
					None => i,
				};
				theme.palette.get(slot).to_css()
			});

			let angle = (i as f64) * 2.0 * PI / data.nodes.len() as f64;
			let (x, y) = (
				(100.0 * angle.cos()) as f32,
				(100.0 * angle.sin()) as f32,
			);

			let edge_factor =
				(degree.get(node.id.as_str()).copied().unwrap_or(0) as f64 / max_degree as f64).sqrt();
			let size = if node.label.is_some() {
				1.3 + 0.6 * edge_factor
			} else {
				0.8 + 0.5 * edge_factor
			};

			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					index: i,
					label: node.label.clone(),
					color,
					size,
				},
			});
			if id_to_idx.insert(&node.id, idx).is_some() {
				warn!("flow-highlight: duplicate node id {:?}", node.id);
			}
			node_positions.insert(idx, i);
		}

		let mut lanes: HashMap<(DefaultNodeIdx, DefaultNodeIdx), usize> = HashMap::new();
		let routes = data
			.edges
			.iter()
			.map(|edge| {
				let (Some(&source), Some(&target)) = (
					id_to_idx.get(edge.source.as_str()),
					id_to_idx.get(edge.target.as_str()),
				) else {
					debug!("flow-highlight: edge {:?} has a dangling endpoint", edge.id);
					return None;
				};
				// a -> b and b -> a share lanes so they bow apart.
				let lane = lanes.entry((source.min(target), source.max(target))).or_insert(0);
				if *lane == 0 && source != target {
					graph.add_edge(source, target, EdgeData::default());
				}
				*lane += 1;
				Some(EdgeRoute {
					source,
					target,
					lane: *lane - 1,
				})
			})
			.collect();

		let styled = highlight::reset_highlighting(&data.nodes, &data.edges);

		Self {
			graph,
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
			animation_running: true,
			selection: Selection::None,
			fade: FadeState::new(data.nodes.len(), data.edges.len()),
			data: data.clone(),
			config,
			styled,
			node_positions,
			routes,
		}
	}

	/// Current restyled nodes and edges, parallel to the input graph.
	pub fn styled(&self) -> &HighlightedElements {
		&self.styled
	}

	pub fn routes(&self) -> &[Option<EdgeRoute>] {
		&self.routes
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<&str> {
		let index = *self.node_positions.get(&idx)?;
		self.data.nodes.get(index).map(|node| node.id.as_str())
	}

	/// Plain click: select one node, or clear when it is already the only
	/// selection.
	pub fn select(&mut self, node_id: &str) {
		self.selection = match &self.selection {
			Selection::Single(current) if current == node_id => Selection::None,
			_ => Selection::Single(node_id.to_string()),
		};
		self.restyle();
	}

	/// Ctrl/Cmd click: add or remove a node from the multi-selection.
	pub fn toggle(&mut self, node_id: &str) {
		let mut ids = match std::mem::take(&mut self.selection) {
			Selection::None => Vec::new(),
			Selection::Single(id) => vec![id],
			Selection::Multi(ids) => ids,
			Selection::Path { from, to, .. } => vec![from, to],
		};
		match ids.iter().position(|id| id == node_id) {
			Some(pos) => {
				ids.remove(pos);
			}
			None => ids.push(node_id.to_string()),
		}
		self.selection = match ids.len() {
			0 => Selection::None,
			_ => Selection::Multi(ids),
		};
		self.restyle();
	}

	/// Shift click: trace a directed path from the selected node to
	/// `node_id`. Returns `false` and keeps the selection when there is no
	/// single anchor node or no path.
	pub fn trace_to(&mut self, node_id: &str) -> bool {
		let from = match &self.selection {
			Selection::Single(id) => id.clone(),
			Selection::Path { to, .. } => to.clone(),
			_ => return false,
		};
		let path = highlight::path_elements(&from, node_id, &self.data.edges);
		if path.is_empty() {
			warn!("flow-highlight: no directed path from {from:?} to {node_id:?}");
			return false;
		}
		self.selection = Selection::Path {
			from,
			to: node_id.to_string(),
			path,
		};
		self.restyle();
		true
	}

	pub fn clear_selection(&mut self) {
		if self.selection != Selection::None {
			self.selection = Selection::None;
			self.restyle();
		}
	}

	/// Reruns the highlight engine for the current selection.
	fn restyle(&mut self) {
		let GraphData { nodes, edges } = &self.data;
		self.styled = match &self.selection {
			Selection::None => highlight::reset_highlighting(nodes, edges),
			Selection::Single(id) => {
				highlight::apply_node_highlighting(nodes, edges, &self.config.selecting(id.as_str()))
			}
			Selection::Multi(ids) => {
				highlight::apply_multi_node_highlighting(nodes, edges, ids.as_slice(), &self.config)
			}
			Selection::Path { path, .. } => {
				highlight::apply_path_highlighting(nodes, edges, path, &self.config)
			}
		};
		debug!("flow-highlight: {}", self.selection.describe());
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Radius of a node in world units.
	pub fn node_radius(&self, info: &NodeInfo, theme: &Theme) -> f64 {
		theme.node.radius * info.size
	}

	pub fn node_at_position(&self, sx: f64, sy: f64, theme: &Theme) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		// Keep small nodes clickable when zoomed out.
		let min_hit = 6.0 / self.transform.k;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let hit = self.node_radius(&node.data.user_data, theme).max(min_hit);
			if (dx * dx + dy * dy).sqrt() < hit {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn tick(&mut self, dt: f32) {
		if self.animation_running {
			self.graph.update(dt);
		}
		self.fade.tick(dt as f64, &self.styled);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
