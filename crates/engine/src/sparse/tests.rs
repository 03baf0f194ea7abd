use pretty_assertions::assert_eq;
use proptest::prelude::*;
use satchel_primitives::{Container, ContainerMut, DataValue, KindId, StaticCatalog, Stack};
use satchel_registry::{NestedContainer, Viewer};

use super::{Capacity, ITEMS_KEY, SLOT_KEY, STACK_KEY, SparseSlotContainer, SparseViewer};

fn pouch() -> Stack {
	Stack::new("pouch", 1)
}

fn seeded(entries: &[(usize, u32)]) -> SparseSlotContainer {
	let mut container = SparseSlotContainer::open(pouch(), None);
	for &(slot, count) in entries {
		container.set(slot, Stack::new("stone", count));
	}
	container
}

fn slots(container: &SparseSlotContainer) -> Vec<(usize, u32)> {
	container
		.entries()
		.iter()
		.map(|(slot, stack)| (*slot, stack.count()))
		.collect()
}

fn entry(slot: i64, stack: &Stack) -> DataValue {
	let mut node = DataValue::map();
	node.insert(SLOT_KEY, DataValue::Int(slot));
	node.insert(STACK_KEY, stack.to_data());
	node
}

#[test]
fn test_get_set_keep_sorted_sparse_entries() {
	let mut container = seeded(&[(2, 5), (5, 1)]);

	assert!(container.get(3).is_empty());
	assert_eq!(container.get(2).count(), 5);

	container.set(2, Stack::EMPTY);
	assert_eq!(slots(&container), vec![(5, 1)]);

	container.set(7, Stack::new("stone", 4));
	assert_eq!(slots(&container), vec![(5, 1), (7, 4)]);
}

#[test]
fn test_set_overwrites_existing_slot() {
	let mut container = seeded(&[(1, 3)]);
	container.set(1, Stack::new("dirt", 2));
	assert_eq!(container.entries().len(), 1);
	assert!(container.get(1).is_kind(&KindId::from("dirt")));
}

#[test]
fn test_remove_amount_deletes_only_at_zero() {
	let mut container = seeded(&[(4, 5)]);

	let taken = container.remove_amount(4, 2);
	assert_eq!(taken.count(), 2);
	assert_eq!(slots(&container), vec![(4, 3)]);

	let taken = container.remove_amount(4, 10);
	assert_eq!(taken.count(), 3);
	assert!(container.entries().is_empty());
	assert!(container.remove_amount(4, 1).is_empty());
}

#[test]
fn test_update_copies_and_writes_back() {
	let mut container = seeded(&[(0, 2)]);
	container.update(0, |stack| stack.grow(3));
	assert_eq!(container.get(0).count(), 5);

	container.update(0, |stack| stack.shrink(5));
	assert!(container.entries().is_empty());

	container.update(9, |stack| *stack = Stack::new("stone", 1));
	assert_eq!(slots(&container), vec![(9, 1)]);
}

#[test]
fn test_mutations_persist_into_host() {
	let mut container = seeded(&[(3, 2), (1, 6)]);
	container.set(8, Stack::new("dirt", 1));

	let host = container.host().clone();
	let reopened = SparseSlotContainer::open(host, None);
	assert_eq!(slots(&reopened), vec![(1, 6), (3, 2), (8, 1)]);
	assert!(reopened.get(8).is_kind(&KindId::from("dirt")));
}

#[test]
fn test_emptied_container_drops_items_key() {
	let mut container = seeded(&[(0, 1)]);
	container.remove(0);
	let host = container.host();
	assert_eq!(host.data(), None);
}

#[test]
fn test_open_cleans_malformed_empty_and_duplicate_entries() {
	let mut items = vec![
		entry(4, &Stack::new("stone", 1)),
		entry(2, &Stack::new("stone", 7)),
		entry(-1, &Stack::new("stone", 1)),
		entry(6, &Stack::EMPTY),
		entry(4, &Stack::new("dirt", 2)),
	];
	items.push(DataValue::from("garbage"));
	let mut data = DataValue::map();
	data.insert(ITEMS_KEY, DataValue::List(items));
	let host = pouch().with_data(data);

	let container = SparseSlotContainer::open(host, None);
	assert_eq!(slots(&container), vec![(2, 7), (4, 2)]);
	assert!(container.get(4).is_kind(&KindId::from("dirt")));

	let persisted = container
		.host()
		.data()
		.and_then(|d| d.get(ITEMS_KEY))
		.and_then(DataValue::as_list)
		.map(<[DataValue]>::len);
	assert_eq!(persisted, Some(2));
}

fn host_listing(items: Vec<DataValue>) -> Stack {
	let mut data = DataValue::map();
	data.insert(ITEMS_KEY, DataValue::List(items));
	pouch().with_data(data)
}

fn persisted_slots(container: &SparseSlotContainer) -> Vec<i64> {
	container
		.host()
		.data()
		.and_then(|d| d.get(ITEMS_KEY))
		.and_then(DataValue::as_list)
		.map(|items| {
			items
				.iter()
				.filter_map(|item| item.get(SLOT_KEY).and_then(DataValue::as_int))
				.collect()
		})
		.unwrap_or_default()
}

#[test]
fn test_open_drops_entries_past_declared_capacity() {
	let host = host_listing(vec![
		entry(1, &Stack::new("gem", 1)),
		entry(5, &Stack::new("stone", 2)),
	]);

	let container = SparseSlotContainer::open(host.clone(), Some(3));
	assert_eq!(slots(&container), vec![(1, 1)]);
	assert_eq!(Container::size(&container), 3);
	assert!(Container::stack(&container, 5).is_empty());
	assert_eq!(persisted_slots(&container), vec![1]);

	let beyond = host_listing(vec![entry(5, &Stack::new("stone", 2))]);
	let container = SparseSlotContainer::open(beyond, Some(3));
	assert!(Container::is_empty(&container));
	assert_eq!(container.host().data(), None);

	// Inferred capacity keeps everything.
	let container = SparseSlotContainer::open(host, None);
	assert_eq!(slots(&container), vec![(1, 1), (5, 2)]);
}

#[test]
fn test_open_rewrites_out_of_order_entries() {
	let host = host_listing(vec![
		entry(3, &Stack::new("stone", 1)),
		entry(0, &Stack::new("gem", 2)),
	]);

	let container = SparseSlotContainer::open(host, None);
	assert_eq!(slots(&container), vec![(0, 2), (3, 1)]);
	assert_eq!(persisted_slots(&container), vec![0, 3]);
}

#[test]
fn test_open_leaves_normalized_host_untouched() {
	let host = seeded(&[(0, 2), (3, 1)]);
	let host = Box::new(host).into_host();

	let container = SparseSlotContainer::open(host.clone(), None);
	assert_eq!(container.host(), &host);
}

#[test]
fn test_inferred_capacity_tracks_highest_slot() {
	let mut container = seeded(&[]);
	assert_eq!(container.capacity_kind(), Capacity::Inferred);
	assert_eq!(container.capacity(), 0);

	container.set(4, Stack::new("stone", 1));
	assert_eq!(container.capacity(), 5);
	assert_eq!(Container::size(&container), 5);
}

#[test]
fn test_declared_capacity_rejects_out_of_range_writes() {
	let mut container = SparseSlotContainer::open(pouch(), Some(3));
	container.set(5, Stack::new("stone", 1));
	assert!(container.entries().is_empty());

	ContainerMut::set_stack(&mut container, 2, Stack::new("stone", 1));
	assert_eq!(slots(&container), vec![(2, 1)]);
	assert_eq!(container.capacity(), 3);
}

#[test]
fn test_bound_stack_routes_through_container() {
	let mut container = seeded(&[(1, 2)]);
	{
		let mut bound = container.bind(1);
		bound.grow(4);
		assert_eq!(bound.count(), 6);
		let split = bound.split(1);
		assert_eq!(split.count(), 1);
	}
	assert_eq!(container.get(1).count(), 5);

	let detached = container.bind(1).unbind();
	container.set(1, Stack::EMPTY);
	assert_eq!(detached.count(), 5);
	assert!(container.entries().is_empty());
}

#[test]
fn test_viewer_applies_catalog_capacity_and_identity() {
	let mut identity = DataValue::map();
	identity.insert("Owner", DataValue::from("nobody"));
	let catalog = StaticCatalog::new()
		.with_capacity("pouch", 4)
		.with_identifying_data("pouch", identity.clone());

	let view = SparseViewer::new().open(pouch(), &catalog);
	assert_eq!(view.size(), 4);
	assert_eq!(view.host().data(), Some(&identity));

	let plain = SparseViewer::new().open(Stack::new("sack", 1), &catalog);
	assert_eq!(plain.size(), 0);
	assert_eq!(plain.host().data(), None);
}

#[derive(Debug, Clone)]
enum Op {
	Set(usize, u32),
	Remove(usize),
	RemoveAmount(usize, u32),
	Grow(usize, u32),
}

fn op() -> impl Strategy<Value = Op> {
	prop_oneof![
		(0usize..12, 0u32..5).prop_map(|(s, c)| Op::Set(s, c)),
		(0usize..12).prop_map(Op::Remove),
		(0usize..12, 0u32..5).prop_map(|(s, a)| Op::RemoveAmount(s, a)),
		(0usize..12, 0u32..5).prop_map(|(s, a)| Op::Grow(s, a)),
	]
}

proptest! {
	#[test]
	fn prop_entries_stay_sorted_unique_and_nonempty(ops in prop::collection::vec(op(), 0..40)) {
		let mut container = seeded(&[]);
		for op in ops {
			match op {
				Op::Set(slot, count) => container.set(slot, Stack::new("stone", count)),
				Op::Remove(slot) => {
					container.remove(slot);
				}
				Op::RemoveAmount(slot, amount) => {
					container.remove_amount(slot, amount);
				}
				Op::Grow(slot, amount) => container.update(slot, |stack| stack.grow(amount)),
			}
		}

		let entries = container.entries();
		prop_assert!(entries.windows(2).all(|pair| pair[0].0 < pair[1].0));
		prop_assert!(entries.iter().all(|(_, stack)| !stack.is_empty()));

		let host = container.host().clone();
		let reopened = SparseSlotContainer::open(host, None);
		prop_assert_eq!(reopened.entries(), entries);
	}
}
