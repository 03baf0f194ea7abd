//! Read-only union of several containers addressed as one slot range.

use std::fmt;

use satchel_primitives::{Container, ContainerId, Stack};
use smallvec::SmallVec;

/// Concatenation of containers; slot `n` maps into the part that covers it.
///
/// Extended validators receive one of these as their combined view. Parts are
/// borrowed, so a combined container never outlives the views it spans.
pub struct CombinedContainer<'a> {
	id: ContainerId,
	parts: SmallVec<[&'a dyn Container; 8]>,
}

impl<'a> CombinedContainer<'a> {
	pub fn new(parts: impl IntoIterator<Item = &'a dyn Container>) -> Self {
		Self {
			id: ContainerId::mint(),
			parts: parts.into_iter().collect(),
		}
	}

	pub fn parts(&self) -> &[&'a dyn Container] {
		&self.parts
	}

	/// Maps a combined slot to its part and the slot within that part.
	pub fn locate(&self, slot: usize) -> Option<(&'a dyn Container, usize)> {
		let mut offset = slot;
		for part in &self.parts {
			let size = part.size();
			if offset < size {
				return Some((*part, offset));
			}
			offset -= size;
		}
		None
	}
}

impl Container for CombinedContainer<'_> {
	fn id(&self) -> ContainerId {
		self.id
	}

	fn size(&self) -> usize {
		self.parts.iter().map(|part| part.size()).sum()
	}

	fn stack(&self, slot: usize) -> &Stack {
		match self.locate(slot) {
			Some((part, local)) => part.stack(local),
			None => Stack::empty_ref(),
		}
	}

	fn slot_limit(&self, slot: usize) -> u32 {
		self.locate(slot)
			.map_or(0, |(part, local)| part.slot_limit(local))
	}

	fn can_insert(&self, _slot: usize, _stack: &Stack) -> bool {
		false
	}

	fn is_empty(&self) -> bool {
		self.parts.iter().all(|part| part.is_empty())
	}
}

impl fmt::Debug for CombinedContainer<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let ids: SmallVec<[u64; 8]> = self.parts.iter().map(|part| part.id().as_u64()).collect();
		f.debug_struct("CombinedContainer")
			.field("id", &self.id.as_u64())
			.field("parts", &ids)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use satchel_primitives::{Container, KindId, SlotContainer, Stack};

	use super::CombinedContainer;

	#[test]
	fn test_slots_span_parts_in_order() {
		let first = SlotContainer::from_stacks([Stack::new("stone", 1), Stack::EMPTY]);
		let second = SlotContainer::from_stacks([Stack::new("dirt", 4)]);
		let combined = CombinedContainer::new([&first as &dyn Container, &second]);

		assert_eq!(combined.size(), 3);
		assert!(combined.stack(0).is_kind(&KindId::from("stone")));
		assert!(combined.stack(1).is_empty());
		assert_eq!(combined.stack(2).count(), 4);
		assert!(combined.stack(3).is_empty());
		assert_eq!(combined.count_of(&KindId::from("dirt")), 4);
		assert!(!combined.can_insert(0, &Stack::new("stone", 1)));
	}

	#[test]
	fn test_empty_union() {
		let combined = CombinedContainer::new([]);
		assert_eq!(combined.size(), 0);
		assert!(combined.is_empty());
		assert!(combined.locate(0).is_none());
	}
}
