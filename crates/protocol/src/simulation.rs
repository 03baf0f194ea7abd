//! Hand-off from network tasks to the simulation thread.
//!
//! # Role
//!
//! Remote frames are decoded where they arrive, on whatever task owns the
//! connection, and only the decoded [`ActionEnvelope`] crosses into the
//! simulation thread. The simulation thread drains the queue synchronously
//! between ticks, so container mutation never interleaves with other game
//! state changes.
//!
//! # Invariants
//!
//! - Envelopes are applied in the order they were accepted.
//!   - Enforced in: [`SimulationQueue::drain`]
//!   - Tested by: `simulation::tests::test_drain_applies_in_arrival_order`
//! - A frame that fails to decode never reaches the queue.
//!   - Enforced in: [`RemoteInbox::receive`]
//!   - Tested by: `simulation::tests::test_undecodable_frame_is_not_queued`

use std::sync::Arc;

use bytes::Bytes;
use satchel_primitives::ActorId;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::action::Action;
use crate::codecs::ActionCodecs;
use crate::wire::WireError;

/// A decoded action and the actor that sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEnvelope {
	pub actor: ActorId,
	pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InboxError {
	#[error(transparent)]
	Decode(#[from] WireError),
	#[error("simulation queue is full")]
	Full,
	#[error("simulation queue is closed")]
	Closed,
}

/// Creates a connected inbox and queue holding at most `capacity` envelopes.
pub fn channel(codecs: Arc<ActionCodecs>, capacity: usize) -> (RemoteInbox, SimulationQueue) {
	let (sender, receiver) = mpsc::channel(capacity.max(1));
	(RemoteInbox { codecs, sender }, SimulationQueue { receiver })
}

/// Network-side handle. Cheap to clone, one per connection task.
#[derive(Clone)]
pub struct RemoteInbox {
	codecs: Arc<ActionCodecs>,
	sender: mpsc::Sender<ActionEnvelope>,
}

impl RemoteInbox {
	/// Decodes `frame` and queues it, waiting for room when the queue is full.
	pub async fn receive(&self, actor: ActorId, frame: Bytes) -> Result<(), InboxError> {
		let envelope = self.decode(actor, frame)?;
		self.sender
			.send(envelope)
			.await
			.map_err(|_| InboxError::Closed)
	}

	/// Decodes `frame` and queues it without waiting.
	pub fn try_receive(&self, actor: ActorId, frame: Bytes) -> Result<(), InboxError> {
		let envelope = self.decode(actor, frame)?;
		self.sender.try_send(envelope).map_err(|error| match error {
			TrySendError::Full(envelope) => {
				tracing::warn!(actor = %envelope.actor, "simulation queue full, action dropped");
				InboxError::Full
			}
			TrySendError::Closed(_) => InboxError::Closed,
		})
	}

	pub fn is_closed(&self) -> bool {
		self.sender.is_closed()
	}

	fn decode(&self, actor: ActorId, frame: Bytes) -> Result<ActionEnvelope, InboxError> {
		let len = frame.len();
		match self.codecs.decode(frame) {
			Ok(action) => Ok(ActionEnvelope { actor, action }),
			Err(error) => {
				tracing::warn!(%actor, len, %error, "rejected undecodable action frame");
				Err(error.into())
			}
		}
	}
}

impl std::fmt::Debug for RemoteInbox {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RemoteInbox")
			.field("closed", &self.sender.is_closed())
			.field("capacity", &self.sender.capacity())
			.finish()
	}
}

/// Simulation-side end of the channel.
#[derive(Debug)]
pub struct SimulationQueue {
	receiver: mpsc::Receiver<ActionEnvelope>,
}

impl SimulationQueue {
	/// Applies every envelope queued right now, oldest first, without waiting.
	///
	/// Returns how many envelopes were applied.
	pub fn drain(&mut self, mut apply: impl FnMut(ActionEnvelope)) -> usize {
		let mut applied = 0;
		while let Ok(envelope) = self.receiver.try_recv() {
			apply(envelope);
			applied += 1;
		}
		if applied > 0 {
			tracing::trace!(applied, "drained simulation queue");
		}
		applied
	}

	/// Waits for the next envelope. `None` once every inbox is gone.
	pub async fn recv(&mut self) -> Option<ActionEnvelope> {
		self.receiver.recv().await
	}

	pub fn len(&self) -> usize {
		self.receiver.len()
	}

	pub fn is_empty(&self) -> bool {
		self.receiver.is_empty()
	}

	/// Stops accepting envelopes; already queued ones can still be drained.
	pub fn close(&mut self) {
		self.receiver.close();
	}
}
