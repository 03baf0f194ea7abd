//! Counted stacks of a single kind.
//!
//! # Invariants
//!
//! - An empty stack is always normalized: no kind, count 0, no data. Every
//!   mutation that can reach zero goes through [`Stack::clear`].
//! - Two stacks merge only if both are nonempty with equal kind and equal data.

use crate::data::{DataError, DataValue};
use crate::kind::KindId;

/// Key of the kind identifier in a persisted stack map.
pub const KIND_KEY: &str = "id";
/// Key of the count in a persisted stack map.
pub const COUNT_KEY: &str = "count";
/// Key of the structured data in a persisted stack map.
pub const DATA_KEY: &str = "tag";

static EMPTY_STACK: Stack = Stack::EMPTY;

/// A counted stack of one kind with optional structured data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stack {
	kind: Option<KindId>,
	count: u32,
	data: Option<DataValue>,
}

impl Stack {
	/// The normalized empty stack.
	pub const EMPTY: Stack = Stack {
		kind: None,
		count: 0,
		data: None,
	};

	/// Returns a shared reference to the empty stack, for lookups that miss.
	#[inline]
	pub fn empty_ref() -> &'static Stack {
		&EMPTY_STACK
	}

	/// Creates a stack of `count` items of `kind`. A zero count yields the empty stack.
	pub fn new(kind: impl Into<KindId>, count: u32) -> Self {
		if count == 0 {
			return Self::EMPTY;
		}
		Self {
			kind: Some(kind.into()),
			count,
			data: None,
		}
	}

	/// Attaches structured data. Ignored on the empty stack.
	#[must_use]
	pub fn with_data(mut self, data: DataValue) -> Self {
		if !self.is_empty() {
			self.data = Some(data);
		}
		self
	}

	/// Returns true when the stack holds nothing.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.kind.is_none() || self.count == 0
	}

	/// Returns the kind, or `None` when empty.
	#[inline]
	pub fn kind(&self) -> Option<&KindId> {
		self.kind.as_ref().filter(|_| self.count > 0)
	}

	/// Returns true when the stack is nonempty and of `kind`.
	pub fn is_kind(&self, kind: &KindId) -> bool {
		self.kind() == Some(kind)
	}

	#[inline]
	pub fn count(&self) -> u32 {
		self.count
	}

	/// Sets the count, normalizing to the empty stack at zero.
	pub fn set_count(&mut self, count: u32) {
		if self.kind.is_none() {
			return;
		}
		self.count = count;
		if count == 0 {
			self.clear();
		}
	}

	/// Adds `amount` to the count, saturating.
	pub fn grow(&mut self, amount: u32) {
		if !self.is_empty() {
			self.count = self.count.saturating_add(amount);
		}
	}

	/// Removes up to `amount` from the count.
	pub fn shrink(&mut self, amount: u32) {
		self.set_count(self.count.saturating_sub(amount));
	}

	/// Splits off up to `amount` items into a new stack, leaving the remainder here.
	pub fn split(&mut self, amount: u32) -> Stack {
		let taken = amount.min(self.count);
		if taken == 0 {
			return Self::EMPTY;
		}
		let out = self.copy_with_count(taken);
		self.shrink(taken);
		out
	}

	/// Moves the whole stack out, leaving the empty stack behind.
	pub fn take(&mut self) -> Stack {
		std::mem::take(self)
	}

	/// Resets to the empty stack.
	pub fn clear(&mut self) {
		*self = Self::EMPTY;
	}

	/// Returns a copy with a different count.
	pub fn copy_with_count(&self, count: u32) -> Stack {
		if self.is_empty() || count == 0 {
			return Self::EMPTY;
		}
		Self {
			kind: self.kind.clone(),
			count,
			data: self.data.clone(),
		}
	}

	pub fn data(&self) -> Option<&DataValue> {
		self.data.as_ref()
	}

	/// Mutable access to the structured data slot.
	pub fn data_mut(&mut self) -> &mut Option<DataValue> {
		&mut self.data
	}

	pub fn set_data(&mut self, data: Option<DataValue>) {
		if !self.is_empty() {
			self.data = data;
		}
	}

	/// Returns true when `other` can be merged into this stack.
	pub fn can_merge(&self, other: &Stack) -> bool {
		!self.is_empty() && !other.is_empty() && self.kind == other.kind && self.data == other.data
	}

	/// Persists the stack as a map node: `{ id, count, tag? }`.
	pub fn to_data(&self) -> DataValue {
		let mut node = DataValue::map();
		if let Some(kind) = self.kind() {
			node.insert(KIND_KEY, kind.as_str().into());
			node.insert(COUNT_KEY, DataValue::Int(i64::from(self.count)));
			if let Some(data) = &self.data {
				node.insert(DATA_KEY, data.clone());
			}
		}
		node
	}

	/// Reads a stack persisted by [`Stack::to_data`]. A map without a kind is the empty stack.
	pub fn from_data(node: &DataValue) -> Result<Stack, DataError> {
		let map = node
			.as_map()
			.ok_or_else(|| DataError::shape("stack", "map"))?;
		let Some(kind) = map.get(KIND_KEY) else {
			return Ok(Self::EMPTY);
		};
		let kind = kind
			.as_str()
			.ok_or_else(|| DataError::shape(KIND_KEY, "string"))?;
		let count = match map.get(COUNT_KEY) {
			Some(count) => count
				.as_int()
				.and_then(|n| u32::try_from(n).ok())
				.ok_or_else(|| DataError::shape(COUNT_KEY, "non-negative integer"))?,
			None => 1,
		};
		let mut stack = Stack::new(kind, count);
		stack.set_data(map.get(DATA_KEY).cloned());
		Ok(stack)
	}
}
