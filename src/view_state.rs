//! Dashboard selection and request bookkeeping.

use std::cell::Cell;

/// The entity and symbol picked in the two selects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
	pub entity: String,
	pub symbol: String,
}

impl Selection {
	/// Both an entity and a symbol are chosen.
	pub fn is_complete(&self) -> bool {
		!self.entity.is_empty() && !self.symbol.is_empty()
	}
}

/// Identifies the selection a batch of graph requests was issued for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestTicket {
	generation: u64,
	pub selection: Selection,
}

/// Hands out tickets so responses for superseded selections can be dropped.
#[derive(Debug, Default)]
pub struct RequestTracker {
	generation: Cell<u64>,
}

impl RequestTracker {
	pub fn begin(&self, selection: Selection) -> RequestTicket {
		let generation = self.generation.get() + 1;
		self.generation.set(generation);
		RequestTicket {
			generation,
			selection,
		}
	}

	pub fn is_current(&self, ticket: &RequestTicket) -> bool {
		ticket.generation == self.generation.get()
	}
}
