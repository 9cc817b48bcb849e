//! At most one pending animation frame per graph.

use std::cell::Cell;

#[derive(Debug, Default)]
pub struct FrameGate {
	pending: Cell<Option<i32>>,
}

impl FrameGate {
	/// Call `request` unless a frame is already pending; it returns the
	/// request handle, or `None` when no frame could be scheduled.
	pub fn arm(&self, request: impl FnOnce() -> Option<i32>) {
		if self.pending.get().is_none() {
			self.pending.set(request());
		}
	}

	/// The pending frame has started running.
	pub fn fired(&self) {
		self.pending.set(None);
	}

	/// Forget the pending frame, returning its handle for cancellation.
	pub fn disarm(&self) -> Option<i32> {
		self.pending.take()
	}

	pub fn is_armed(&self) -> bool {
		self.pending.get().is_some()
	}
}
