//! Actions an actor can request against a container.

use satchel_engine::{SlotList, TransferOptions, TransferRequest};
use satchel_primitives::SlotRef;
use satchel_registry::CodecId;

use crate::codecs;

/// Intent carried by an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
	/// Open and present the view at each source slot.
	Default,
	/// Eject the whole stack at each source slot.
	Drop,
	/// Move stacks from the source slots into the destination slots.
	Transfer,
}

impl ActionKind {
	/// Codec id the kind is written under by default.
	pub const fn codec_id(self) -> CodecId {
		match self {
			Self::Default => codecs::DEFAULT,
			Self::Drop => codecs::DROP,
			Self::Transfer => codecs::TRANSFER,
		}
	}
}

/// One decoded request.
///
/// `destinations` and `options` only carry meaning for [`ActionKind::Transfer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
	pub kind: ActionKind,
	pub sources: SlotList,
	pub destinations: SlotList,
	pub options: TransferOptions,
}

impl Action {
	pub fn open(sources: impl IntoIterator<Item = SlotRef>) -> Self {
		Self::without_destinations(ActionKind::Default, sources)
	}

	pub fn drop_slots(sources: impl IntoIterator<Item = SlotRef>) -> Self {
		Self::without_destinations(ActionKind::Drop, sources)
	}

	pub fn transfer(request: TransferRequest) -> Self {
		Self {
			kind: ActionKind::Transfer,
			sources: request.sources,
			destinations: request.destinations,
			options: request.options,
		}
	}

	fn without_destinations(kind: ActionKind, sources: impl IntoIterator<Item = SlotRef>) -> Self {
		Self {
			kind,
			sources: sources.into_iter().collect(),
			destinations: SlotList::new(),
			options: TransferOptions::empty(),
		}
	}

	/// The transfer this action describes.
	pub fn transfer_request(&self) -> TransferRequest {
		TransferRequest {
			sources: self.sources.clone(),
			destinations: self.destinations.clone(),
			options: self.options,
		}
	}

	/// Slot failures of this action are attributed to when no better one exists.
	pub fn primary_slot(&self) -> SlotRef {
		self.sources.first().copied().unwrap_or(SlotRef::Held)
	}
}
