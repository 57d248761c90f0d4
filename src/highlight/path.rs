//! Neighbourhood and path queries over an edge list.
//!
//! Adjacency is undirected for neighbourhoods and directed for paths: a path
//! only ever follows `source -> target`.

use std::collections::{HashMap, HashSet};

use super::types::{Edge, PathElements};

/// Ids of nodes one edge away from `node_id`, in either direction.
///
/// Deduplicated, in the order first seen while scanning `edges` (an edge's
/// target is considered before its source). `node_id` itself only shows up
/// when a self-loop exists.
pub fn connected_node_ids(node_id: &str, edges: &[Edge]) -> Vec<String> {
	let mut seen = HashSet::new();
	let mut connected = Vec::new();
	for edge in edges {
		if edge.source == node_id && seen.insert(edge.target.as_str()) {
			connected.push(edge.target.clone());
		}
		if edge.target == node_id && seen.insert(edge.source.as_str()) {
			connected.push(edge.source.clone());
		}
	}
	connected
}

/// One frame of the depth-first search.
struct Frame<'a> {
	node: &'a str,
	/// Edge that led here; `None` for the start node.
	via: Option<&'a str>,
	/// Position in this node's outgoing edge list.
	cursor: usize,
}

/// First directed path from `start` to `end` found by depth-first search.
///
/// Outgoing edges are explored in input order and every node is expanded at
/// most once, so the result is deterministic for a given edge order but is
/// neither the shortest nor the lexicographically smallest path. `edge_ids`
/// come out last edge first. Returns an empty [`PathElements`] when no
/// directed path exists.
pub fn path_elements(start: &str, end: &str, edges: &[Edge]) -> PathElements {
	if start == end {
		return PathElements {
			node_ids: vec![start.to_string()],
			edge_ids: Vec::new(),
		};
	}

	let mut outgoing: HashMap<&str, Vec<&Edge>> = HashMap::new();
	for edge in edges {
		outgoing.entry(edge.source.as_str()).or_default().push(edge);
	}

	let mut visited: HashSet<&str> = HashSet::from([start]);
	let mut stack = vec![Frame {
		node: start,
		via: None,
		cursor: 0,
	}];

	while let Some(frame) = stack.last_mut() {
		let Some(edge) = outgoing
			.get(frame.node)
			.and_then(|out| out.get(frame.cursor))
			.copied()
		else {
			stack.pop();
			continue;
		};
		frame.cursor += 1;

		let next = edge.target.as_str();
		if next == end {
			return collect_path(&stack, edge);
		}
		if visited.insert(next) {
			stack.push(Frame {
				node: next,
				via: Some(edge.id.as_str()),
				cursor: 0,
			});
		}
	}

	PathElements::default()
}

fn collect_path(stack: &[Frame<'_>], last: &Edge) -> PathElements {
	let mut node_ids: Vec<String> = Vec::with_capacity(stack.len() + 1);
	let mut seen = HashSet::new();
	for node in stack.iter().map(|f| f.node).chain([last.target.as_str()]) {
		if seen.insert(node) {
			node_ids.push(node.to_string());
		}
	}

	let mut edge_ids: Vec<String> = Vec::with_capacity(stack.len());
	let mut seen = HashSet::new();
	let vias = stack.iter().rev().filter_map(|f| f.via);
	for edge_id in [last.id.as_str()].into_iter().chain(vias) {
		if seen.insert(edge_id) {
			edge_ids.push(edge_id.to_string());
		}
	}

	PathElements { node_ids, edge_ids }
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use super::*;

	fn edges(list: &[(&str, &str, &str)]) -> Vec<Edge> {
		list.iter()
			.map(|&(id, source, target)| Edge::new(id, source, target))
			.collect()
	}

	fn set(ids: &[String]) -> BTreeSet<&str> {
		ids.iter().map(String::as_str).collect()
	}

	#[test]
	fn neighbours_in_both_directions_without_duplicates() {
		let edges = edges(&[
			("e1", "a", "b"),
			("e2", "c", "a"),
			("e3", "a", "b"),
			("e4", "b", "c"),
		]);
		assert_eq!(connected_node_ids("a", &edges), ["b", "c"]);
		assert_eq!(connected_node_ids("b", &edges), ["a", "c"]);
		assert!(connected_node_ids("zzz", &edges).is_empty());
	}

	#[test]
	fn self_loop_includes_node_once() {
		let edges = edges(&[("e1", "a", "a"), ("e2", "a", "b")]);
		assert_eq!(connected_node_ids("a", &edges), ["a", "b"]);
		assert!(!connected_node_ids("b", &edges).contains(&"b".to_string()));
	}

	#[test]
	fn simple_chain() {
		let edges = edges(&[("e1", "A", "B"), ("e2", "B", "C")]);
		let path = path_elements("A", "C", &edges);
		assert_eq!(path.node_ids, ["A", "B", "C"]);
		assert_eq!(set(&path.edge_ids), BTreeSet::from(["e1", "e2"]));
		assert_eq!(path.edge_ids, ["e2", "e1"]);
	}

	#[test]
	fn same_start_and_end() {
		let path = path_elements("A", "A", &[]);
		assert_eq!(path.node_ids, ["A"]);
		assert!(path.edge_ids.is_empty());
	}

	#[test]
	fn edges_are_not_walked_backwards() {
		let edges = edges(&[("e1", "A", "B"), ("e2", "B", "C")]);
		assert_eq!(path_elements("C", "A", &edges), PathElements::default());
		assert_eq!(path_elements("A", "missing", &edges), PathElements::default());
	}

	#[test]
	fn first_found_not_shortest() {
		// a -> b -> c -> d is explored before the direct a -> d edge.
		let edges = edges(&[
			("ab", "a", "b"),
			("bc", "b", "c"),
			("cd", "c", "d"),
			("ad", "a", "d"),
		]);
		let path = path_elements("a", "d", &edges);
		assert_eq!(path.node_ids, ["a", "b", "c", "d"]);
		assert_eq!(path.edge_ids, ["cd", "bc", "ab"]);
	}

	#[test]
	fn dead_ends_and_cycles_are_left_behind() {
		let edges = edges(&[
			("ab", "a", "b"),
			("ba", "b", "a"),
			("bx", "b", "x"),
			("ac", "a", "c"),
			("cd", "c", "d"),
		]);
		let path = path_elements("a", "d", &edges);
		assert_eq!(path.node_ids, ["a", "c", "d"]);
		assert_eq!(path.edge_ids, ["cd", "ac"]);
	}

	#[test]
	fn long_chain_does_not_recurse() {
		let chain: Vec<Edge> = (0..100_000)
			.map(|i| Edge::new(format!("e{i}"), format!("n{i}"), format!("n{}", i + 1)))
			.collect();
		let path = path_elements("n0", "n100000", &chain);
		assert_eq!(path.node_ids.len(), 100_001);
		assert_eq!(path.edge_ids.first().map(String::as_str), Some("e99999"));
	}
}
