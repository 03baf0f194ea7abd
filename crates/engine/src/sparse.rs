//! Sparse, slot-indexed container persisted inside its host stack.
//!
//! # Role
//!
//! Backs a nested container without allocating a stack per possible slot. The
//! entries live in the host stack's data under [`ITEMS_KEY`] as a list of
//! `{ Slot, Stack }` maps, rewritten after every mutation so the host is always
//! current.
//!
//! # Invariants
//!
//! - Entries are sorted ascending by slot and unique by slot.
//! - No entry holds an empty stack. Construction drops malformed and empty
//!   entries; every mutation that can zero a count removes the entry.
//! - Under a declared capacity every entry's slot is below it. Construction
//!   drops entries past the capacity and persists the cleanup.
//! - Reads never alias persisted storage mutably: [`SparseSlotContainer::update`]
//!   copies the stack out, mutates the copy, and writes it back.

use satchel_primitives::{
	Container, ContainerId, ContainerMut, DEFAULT_SLOT_LIMIT, DataError, DataValue, KindCatalog,
	Stack,
};
use satchel_registry::{NestedContainer, Viewer};

/// Host data key holding the persisted entry list.
pub const ITEMS_KEY: &str = "Items";
/// Entry key holding the slot index.
pub const SLOT_KEY: &str = "Slot";
/// Entry key holding the persisted stack.
pub const STACK_KEY: &str = "Stack";

/// Where a sparse container's size comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
	/// Looked up from the kind catalog.
	Declared(usize),
	/// `max(highest slot + 1, entry count)`.
	Inferred,
}

/// Sorted association list of `(slot, stack)` persisted in a host stack.
#[derive(Debug)]
pub struct SparseSlotContainer {
	id: ContainerId,
	host: Stack,
	entries: Vec<(usize, Stack)>,
	capacity: Capacity,
	slot_limit: u32,
}

impl SparseSlotContainer {
	/// Opens the entries persisted in `host`, with an optional declared capacity.
	pub fn open(host: Stack, declared: Option<usize>) -> Self {
		let (entries, cleaned) = read_entries(host.data(), declared);
		let mut container = Self {
			id: ContainerId::mint(),
			host,
			entries,
			capacity: declared.map_or(Capacity::Inferred, Capacity::Declared),
			slot_limit: DEFAULT_SLOT_LIMIT,
		};
		if cleaned {
			container.persist();
		}
		container
	}

	#[must_use]
	pub fn with_slot_limit(mut self, limit: u32) -> Self {
		self.slot_limit = limit;
		self
	}

	pub fn capacity_kind(&self) -> Capacity {
		self.capacity
	}

	/// Number of addressable slots.
	pub fn capacity(&self) -> usize {
		match self.capacity {
			Capacity::Declared(capacity) => capacity,
			Capacity::Inferred => {
				let past_last = self.entries.last().map_or(0, |(slot, _)| slot + 1);
				past_last.max(self.entries.len())
			}
		}
	}

	/// Persisted entries, ascending by slot.
	pub fn entries(&self) -> &[(usize, Stack)] {
		&self.entries
	}

	/// Returns the stack at `slot`, or the empty stack.
	pub fn get(&self, slot: usize) -> &Stack {
		match self.search(slot) {
			Ok(index) => &self.entries[index].1,
			Err(_) => Stack::empty_ref(),
		}
	}

	/// Stores `stack` at `slot`. An empty stack removes the entry.
	///
	/// Writes past a declared capacity are ignored; an inferred capacity grows.
	pub fn set(&mut self, slot: usize, stack: Stack) {
		if stack.is_empty() {
			self.remove(slot);
			return;
		}
		if let Capacity::Declared(capacity) = self.capacity
			&& slot >= capacity
		{
			tracing::debug!(slot, capacity, "ignoring write past declared capacity");
			return;
		}
		match self.search(slot) {
			Ok(index) => self.entries[index].1 = stack,
			Err(index) => self.entries.insert(index, (slot, stack)),
		}
		self.persist();
	}

	/// Removes and returns the whole stack at `slot`.
	pub fn remove(&mut self, slot: usize) -> Stack {
		match self.search(slot) {
			Ok(index) => {
				let (_, stack) = self.entries.remove(index);
				self.persist();
				stack
			}
			Err(_) => Stack::EMPTY,
		}
	}

	/// Removes up to `amount` from `slot`, deleting the entry only at zero.
	pub fn remove_amount(&mut self, slot: usize, amount: u32) -> Stack {
		let Ok(index) = self.search(slot) else {
			return Stack::EMPTY;
		};
		let taken = self.entries[index].1.split(amount);
		if self.entries[index].1.is_empty() {
			self.entries.remove(index);
		}
		if !taken.is_empty() {
			self.persist();
		}
		taken
	}

	/// Applies `mutator` to a copy of the stack at `slot` and writes the result back.
	pub fn update(&mut self, slot: usize, mutator: impl FnOnce(&mut Stack)) {
		let mut stack = self.get(slot).clone();
		mutator(&mut stack);
		self.set(slot, stack);
	}

	/// Binds a proxy stack to `slot`.
	pub fn bind(&mut self, slot: usize) -> BoundStack<'_> {
		BoundStack {
			container: self,
			slot,
		}
	}

	fn search(&self, slot: usize) -> Result<usize, usize> {
		self.entries.binary_search_by_key(&slot, |(s, _)| *s)
	}

	fn persist(&mut self) {
		let items: Vec<DataValue> = self
			.entries
			.iter()
			.map(|(slot, stack)| {
				let mut node = DataValue::map();
				node.insert(
					SLOT_KEY,
					DataValue::Int(i64::try_from(*slot).unwrap_or(i64::MAX)),
				);
				node.insert(STACK_KEY, stack.to_data());
				node
			})
			.collect();

		let data = self.host.data_mut();
		if items.is_empty() {
			if let Some(node) = data {
				node.remove(ITEMS_KEY);
				if node.is_empty_container() {
					*data = None;
				}
			}
		} else {
			data.get_or_insert_with(DataValue::map)
				.insert(ITEMS_KEY, DataValue::List(items));
		}
	}
}

/// Reads persisted entries, returning them normalized and whether the persisted
/// list needs rewriting.
fn read_entries(
	data: Option<&DataValue>,
	declared: Option<usize>,
) -> (Vec<(usize, Stack)>, bool) {
	let Some(items) = data
		.and_then(|d| d.get(ITEMS_KEY))
		.and_then(DataValue::as_list)
	else {
		return (Vec::new(), false);
	};

	let mut entries = Vec::with_capacity(items.len());
	for item in items {
		match read_entry(item) {
			Ok(Some((slot, _))) if declared.is_some_and(|capacity| slot >= capacity) => {
				tracing::warn!(slot, capacity = ?declared, "dropping nested entry past capacity");
			}
			Ok(Some(entry)) => entries.push(entry),
			Ok(None) => {}
			Err(err) => tracing::warn!(%err, "skipping malformed nested entry"),
		}
	}
	let ordered = entries.windows(2).all(|pair| pair[0].0 < pair[1].0);

	// Stable sort keeps persisted order within a slot; the last write wins.
	entries.sort_by_key(|(slot, _)| *slot);
	entries.reverse();
	entries.dedup_by_key(|(slot, _)| *slot);
	entries.reverse();

	let cleaned = !ordered || entries.len() != items.len();
	(entries, cleaned)
}

fn read_entry(item: &DataValue) -> Result<Option<(usize, Stack)>, DataError> {
	let slot = item
		.get(SLOT_KEY)
		.and_then(DataValue::as_int)
		.and_then(|n| usize::try_from(n).ok())
		.ok_or_else(|| DataError::shape(SLOT_KEY, "non-negative integer"))?;
	let stack = item
		.get(STACK_KEY)
		.ok_or_else(|| DataError::shape(STACK_KEY, "map"))
		.and_then(Stack::from_data)?;
	Ok((!stack.is_empty()).then_some((slot, stack)))
}

impl Container for SparseSlotContainer {
	fn id(&self) -> ContainerId {
		self.id
	}

	fn size(&self) -> usize {
		self.capacity()
	}

	fn stack(&self, slot: usize) -> &Stack {
		self.get(slot)
	}

	fn slot_limit(&self, _slot: usize) -> u32 {
		self.slot_limit
	}

	fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl ContainerMut for SparseSlotContainer {
	fn set_stack(&mut self, slot: usize, stack: Stack) {
		if slot < self.size() {
			self.set(slot, stack);
		}
	}

	fn take(&mut self, slot: usize, amount: u32) -> Stack {
		self.remove_amount(slot, amount)
	}
}

impl NestedContainer for SparseSlotContainer {
	fn host(&self) -> &Stack {
		&self.host
	}

	fn into_host(self: Box<Self>) -> Stack {
		self.host
	}
}

/// Proxy stack bound to one slot of a [`SparseSlotContainer`].
///
/// Reads and writes route to the container; [`BoundStack::unbind`] detaches a
/// free-standing copy.
#[derive(Debug)]
pub struct BoundStack<'a> {
	container: &'a mut SparseSlotContainer,
	slot: usize,
}

impl BoundStack<'_> {
	pub fn slot(&self) -> usize {
		self.slot
	}

	pub fn get(&self) -> &Stack {
		self.container.get(self.slot)
	}

	pub fn count(&self) -> u32 {
		self.get().count()
	}

	pub fn is_empty(&self) -> bool {
		self.get().is_empty()
	}

	pub fn set(&mut self, stack: Stack) {
		self.container.set(self.slot, stack);
	}

	pub fn update(&mut self, mutator: impl FnOnce(&mut Stack)) {
		self.container.update(self.slot, mutator);
	}

	pub fn grow(&mut self, amount: u32) {
		self.update(|stack| stack.grow(amount));
	}

	pub fn shrink(&mut self, amount: u32) {
		self.update(|stack| stack.shrink(amount));
	}

	/// Splits up to `amount` out of the bound slot.
	pub fn split(&mut self, amount: u32) -> Stack {
		self.container.remove_amount(self.slot, amount)
	}

	/// Detaches into a plain stack copy; later writes no longer reach the container.
	pub fn unbind(self) -> Stack {
		self.get().clone()
	}
}

/// Viewer that opens a host stack as a [`SparseSlotContainer`].
///
/// Capacity comes from the kind catalog. Hosts without data receive the kind's
/// identifying data on open.
#[derive(Debug, Default, Clone, Copy)]
pub struct SparseViewer {
	slot_limit: Option<u32>,
}

impl SparseViewer {
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with_slot_limit(mut self, limit: u32) -> Self {
		self.slot_limit = Some(limit);
		self
	}
}

impl Viewer for SparseViewer {
	fn open(&self, mut host: Stack, catalog: &dyn KindCatalog) -> Box<dyn NestedContainer> {
		let declared = host.kind().and_then(|kind| catalog.capacity_of(kind));
		let initial = match (host.data(), host.kind()) {
			(None, Some(kind)) => Some(catalog.identifying_data(kind)),
			_ => None,
		};
		if let Some(initial) = initial.filter(|data| !data.is_empty_container()) {
			host.set_data(Some(initial));
		}

		let mut container = SparseSlotContainer::open(host, declared);
		if let Some(limit) = self.slot_limit {
			container = container.with_slot_limit(limit);
		}
		Box::new(container)
	}
}

#[cfg(test)]
mod tests;
