//! Fixed-size slot containers.
//!
//! # Role
//!
//! [`Container`] is the read contract every slot collection satisfies: dense
//! containers, nested views, the held pseudo-slot, and combined unions of those.
//! [`ContainerMut`] adds the write half used by the transfer engine.
//!
//! # Invariants
//!
//! - Valid slot indices are `0..size()`. Reads outside that range return the
//!   empty stack and writes outside it are ignored.

use crate::ids::ContainerId;
use crate::kind::KindId;
use crate::stack::Stack;

/// Per-slot count ceiling for containers that do not declare their own.
pub const DEFAULT_SLOT_LIMIT: u32 = 64;

/// Read access to a fixed-size sequence of slots.
pub trait Container {
	/// Identity of this container instance.
	fn id(&self) -> ContainerId;

	/// Number of addressable slots.
	fn size(&self) -> usize;

	/// Returns the stack at `slot`, or the empty stack when out of range.
	fn stack(&self, slot: usize) -> &Stack;

	/// Maximum count a single slot accepts.
	fn slot_limit(&self, _slot: usize) -> u32 {
		DEFAULT_SLOT_LIMIT
	}

	/// Returns whether `stack` may be placed into `slot`.
	fn can_insert(&self, slot: usize, _stack: &Stack) -> bool {
		slot < self.size()
	}

	/// Returns true when every slot is empty.
	fn is_empty(&self) -> bool {
		(0..self.size()).all(|slot| self.stack(slot).is_empty())
	}

	/// Total count of `kind` across all slots.
	fn count_of(&self, kind: &KindId) -> u64 {
		(0..self.size())
			.map(|slot| self.stack(slot))
			.filter(|stack| stack.is_kind(kind))
			.map(|stack| u64::from(stack.count()))
			.sum()
	}
}

/// Write access to a container.
pub trait ContainerMut: Container {
	/// Replaces the stack at `slot`. Out-of-range writes are ignored.
	fn set_stack(&mut self, slot: usize, stack: Stack);

	/// Removes up to `amount` from `slot`, returning what was removed.
	fn take(&mut self, slot: usize, amount: u32) -> Stack {
		let mut remaining = self.stack(slot).clone();
		let taken = remaining.split(amount);
		if !taken.is_empty() {
			self.set_stack(slot, remaining);
		}
		taken
	}
}

/// Dense container that allocates one stack per slot.
#[derive(Debug)]
pub struct SlotContainer {
	id: ContainerId,
	slots: Vec<Stack>,
	slot_limit: u32,
}

impl SlotContainer {
	/// Creates a container of `size` empty slots.
	pub fn new(size: usize) -> Self {
		Self {
			id: ContainerId::mint(),
			slots: vec![Stack::EMPTY; size],
			slot_limit: DEFAULT_SLOT_LIMIT,
		}
	}

	/// Creates a container holding `stacks` in order.
	pub fn from_stacks(stacks: impl IntoIterator<Item = Stack>) -> Self {
		Self {
			id: ContainerId::mint(),
			slots: stacks.into_iter().collect(),
			slot_limit: DEFAULT_SLOT_LIMIT,
		}
	}

	/// Overrides the per-slot count ceiling.
	#[must_use]
	pub fn with_slot_limit(mut self, limit: u32) -> Self {
		self.slot_limit = limit;
		self
	}

	pub fn stacks(&self) -> &[Stack] {
		&self.slots
	}
}

impl Container for SlotContainer {
	fn id(&self) -> ContainerId {
		self.id
	}

	fn size(&self) -> usize {
		self.slots.len()
	}

	fn stack(&self, slot: usize) -> &Stack {
		self.slots.get(slot).unwrap_or(Stack::empty_ref())
	}

	fn slot_limit(&self, _slot: usize) -> u32 {
		self.slot_limit
	}
}

impl ContainerMut for SlotContainer {
	fn set_stack(&mut self, slot: usize, stack: Stack) {
		if let Some(existing) = self.slots.get_mut(slot) {
			*existing = stack;
		}
	}
}

/// The actor's transient held stack, addressable as a one-slot container.
///
/// Treating the held stack as a container lets the same predicates and
/// validators that inspect real slots inspect it too, at slot 0.
#[derive(Debug)]
pub struct HeldStack {
	id: ContainerId,
	stack: Stack,
}

impl Default for HeldStack {
	fn default() -> Self {
		Self::new(Stack::EMPTY)
	}
}

impl HeldStack {
	pub fn new(stack: Stack) -> Self {
		Self {
			id: ContainerId::mint(),
			stack,
		}
	}

	pub fn get(&self) -> &Stack {
		&self.stack
	}

	/// Replaces the held stack, returning the previous one.
	pub fn replace(&mut self, stack: Stack) -> Stack {
		std::mem::replace(&mut self.stack, stack)
	}
}

impl Container for HeldStack {
	fn id(&self) -> ContainerId {
		self.id
	}

	fn size(&self) -> usize {
		1
	}

	fn stack(&self, slot: usize) -> &Stack {
		if slot == 0 {
			&self.stack
		} else {
			Stack::empty_ref()
		}
	}

	// The kind's own stack limit is the only ceiling on the held stack.
	fn slot_limit(&self, _slot: usize) -> u32 {
		u32::MAX
	}
}

impl ContainerMut for HeldStack {
	fn set_stack(&mut self, slot: usize, stack: Stack) {
		if slot == 0 {
			self.stack = stack;
		}
	}
}

/// Zero-slot container, used as the initially-empty combined view.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyContainer;

impl Container for EmptyContainer {
	fn id(&self) -> ContainerId {
		ContainerId::DETACHED
	}

	fn size(&self) -> usize {
		0
	}

	fn stack(&self, _slot: usize) -> &Stack {
		Stack::empty_ref()
	}
}

#[cfg(test)]
mod tests;
