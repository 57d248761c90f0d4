//! Whitespace-separated class lists.

/// Added to the node(s) the user picked.
pub const SELECTED_NODE: &str = "selected-node";
/// Added to nodes inside the highlighted set.
pub const HIGHLIGHTED_NODE: &str = "highlighted-node";
/// Added to nodes outside the highlighted set.
pub const DIMMED_NODE: &str = "dimmed-node";
/// Added to edges touching the selection or on the traced path.
pub const HIGHLIGHTED_EDGE: &str = "highlighted-edge";
/// Added to every other edge.
pub const DIMMED_EDGE: &str = "dimmed-edge";

/// Tokens the engine may add to a node class list.
pub const NODE_TOKENS: [&str; 3] = [SELECTED_NODE, HIGHLIGHTED_NODE, DIMMED_NODE];
/// Tokens the engine may add to an edge class list.
pub const EDGE_TOKENS: [&str; 2] = [HIGHLIGHTED_EDGE, DIMMED_EDGE];

/// Appends `tokens` to an existing class list. Never yields empty tokens.
pub fn append(existing: Option<&str>, tokens: &[&str]) -> String {
	existing
		.into_iter()
		.flat_map(str::split_whitespace)
		.chain(tokens.iter().copied())
		.collect::<Vec<_>>()
		.join(" ")
}

/// Drops every whole token found in `remove`. A missing list stays missing.
pub fn strip(existing: Option<&str>, remove: &[&str]) -> Option<String> {
	existing.map(|classes| {
		classes
			.split_whitespace()
			.filter(|token| !remove.contains(token))
			.collect::<Vec<_>>()
			.join(" ")
	})
}

/// Whether `token` appears as a whole token in the class list.
pub fn has(existing: Option<&str>, token: &str) -> bool {
	existing.is_some_and(|classes| classes.split_whitespace().any(|t| t == token))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn append_to_missing_and_existing() {
		assert_eq!(append(None, &[HIGHLIGHTED_NODE]), "highlighted-node");
		assert_eq!(
			append(Some("  node-box "), &[SELECTED_NODE, HIGHLIGHTED_NODE]),
			"node-box selected-node highlighted-node"
		);
	}

	#[test]
	fn strip_whole_tokens_only() {
		let stripped = strip(
			Some("node-box selected-node my-dimmed-node dimmed-node"),
			&NODE_TOKENS,
		);
		assert_eq!(stripped.as_deref(), Some("node-box my-dimmed-node"));
		assert_eq!(strip(None, &NODE_TOKENS), None);
		assert_eq!(strip(Some("dimmed-edge"), &EDGE_TOKENS).as_deref(), Some(""));
	}

	#[test]
	fn has_matches_tokens() {
		assert!(has(Some("a selected-node"), SELECTED_NODE));
		assert!(!has(Some("not-selected-node"), SELECTED_NODE));
		assert!(!has(None, SELECTED_NODE));
	}
}
