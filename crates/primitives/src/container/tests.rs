use pretty_assertions::assert_eq;

use super::{Container, ContainerMut, EmptyContainer, HeldStack, SlotContainer};
use crate::kind::KindId;
use crate::stack::Stack;

#[test]
fn test_out_of_range_reads_are_empty() {
	let container = SlotContainer::new(2);
	assert!(container.stack(5).is_empty());
	assert_eq!(container.size(), 2);
}

#[test]
fn test_out_of_range_writes_are_ignored() {
	let mut container = SlotContainer::new(1);
	container.set_stack(3, Stack::new("stone", 1));
	assert!(container.is_empty());
}

#[test]
fn test_take_splits_slot() {
	let mut container = SlotContainer::from_stacks([Stack::new("stone", 5)]);
	let taken = container.take(0, 3);
	assert_eq!(taken.count(), 3);
	assert_eq!(container.stack(0).count(), 2);
}

#[test]
fn test_count_of_sums_matching_slots() {
	let container = SlotContainer::from_stacks([
		Stack::new("stone", 5),
		Stack::new("dirt", 2),
		Stack::new("stone", 7),
	]);
	assert_eq!(container.count_of(&KindId::new("stone")), 12);
}

#[test]
fn test_held_stack_is_single_slot() {
	let mut held = HeldStack::default();
	held.set_stack(0, Stack::new("stone", 1));
	held.set_stack(1, Stack::new("dirt", 1));
	assert_eq!(held.size(), 1);
	assert_eq!(held.get(), &Stack::new("stone", 1));
	assert!(held.stack(1).is_empty());
}

#[test]
fn test_identities_are_distinct() {
	let a = SlotContainer::new(1);
	let b = SlotContainer::new(1);
	assert_ne!(a.id(), b.id());
	assert_ne!(a.id(), EmptyContainer.id());
}
