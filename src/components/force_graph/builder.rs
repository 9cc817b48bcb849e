use std::collections::HashSet;

use super::types::{EdgeRecord, GraphData, GraphLink, GraphNode};

/// Turn a flat edge list into one node per distinct id and one link per edge.
///
/// Nodes keep first-seen order. Parallel edges and self-loops are kept as
/// separate links.
pub fn build_graph(edges: &[EdgeRecord]) -> GraphData {
	let mut seen = HashSet::new();
	let mut nodes = Vec::new();
	let mut links = Vec::with_capacity(edges.len());

	for edge in edges {
		for id in [&edge.source, &edge.target] {
			if seen.insert(id.as_str()) {
				nodes.push(GraphNode::new(id.clone()));
			}
		}
		links.push(GraphLink {
			source: edge.source.clone(),
			target: edge.target.clone(),
			qty: edge.qty,
			rate: edge.rate,
		});
	}

	GraphData { nodes, links }
}
