use serde::{Deserialize, Deserializer};

/// Identifier of a buyer, seller or other party.
pub type EntityId = String;

/// One transaction between two parties as served by the graph endpoints.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct EdgeRecord {
	#[serde(deserialize_with = "entity_id")]
	pub source: EntityId,
	#[serde(deserialize_with = "entity_id")]
	pub target: EntityId,
	#[serde(default)]
	pub qty: Option<f64>,
	#[serde(default)]
	pub rate: Option<f64>,
}

/// Member ids arrive as JSON numbers, entity names as strings.
fn entity_id<'de, D>(deserializer: D) -> Result<EntityId, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum RawId {
		Text(String),
		Int(i64),
		Float(f64),
	}

	Ok(match RawId::deserialize(deserializer)? {
		RawId::Text(s) => s,
		RawId::Int(n) => n.to_string(),
		RawId::Float(f) => f.to_string(),
	})
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: EntityId,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	/// Pinned coordinates, set only while the node is held.
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

impl GraphNode {
	pub fn new(id: impl Into<EntityId>) -> Self {
		Self {
			id: id.into(),
			x: 0.0,
			y: 0.0,
			vx: 0.0,
			vy: 0.0,
			fx: None,
			fy: None,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	pub source: EntityId,
	pub target: EntityId,
	pub qty: Option<f64>,
	pub rate: Option<f64>,
}

impl GraphLink {
	/// Text shown at the link midpoint; empty when the quantity is missing.
	pub fn weight_label(&self) -> String {
		self.qty.map(|q| q.to_string()).unwrap_or_default()
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}
