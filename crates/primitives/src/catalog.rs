use rustc_hash::FxHashMap;

use crate::container::DEFAULT_SLOT_LIMIT;
use crate::data::DataValue;
use crate::kind::KindId;

/// Host-provided facts about kinds.
///
/// The engine never decides these itself; a host wires its own item tables in.
pub trait KindCatalog: Send + Sync {
	/// Declared nested-container capacity for `kind`, if it has one.
	fn capacity_of(&self, kind: &KindId) -> Option<usize>;

	/// Structured data a freshly opened stack of `kind` starts with.
	fn identifying_data(&self, _kind: &KindId) -> DataValue {
		DataValue::map()
	}

	/// Maximum count of one stack of `kind`.
	fn stack_limit(&self, _kind: &KindId) -> u32 {
		DEFAULT_SLOT_LIMIT
	}
}

/// Table-backed [`KindCatalog`].
#[derive(Debug, Default, Clone)]
pub struct StaticCatalog {
	capacities: FxHashMap<KindId, usize>,
	stack_limits: FxHashMap<KindId, u32>,
	identifying: FxHashMap<KindId, DataValue>,
}

impl StaticCatalog {
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn with_capacity(mut self, kind: impl Into<KindId>, capacity: usize) -> Self {
		self.capacities.insert(kind.into(), capacity);
		self
	}

	#[must_use]
	pub fn with_stack_limit(mut self, kind: impl Into<KindId>, limit: u32) -> Self {
		self.stack_limits.insert(kind.into(), limit);
		self
	}

	#[must_use]
	pub fn with_identifying_data(mut self, kind: impl Into<KindId>, data: DataValue) -> Self {
		self.identifying.insert(kind.into(), data);
		self
	}
}

impl KindCatalog for StaticCatalog {
	fn capacity_of(&self, kind: &KindId) -> Option<usize> {
		self.capacities.get(kind).copied()
	}

	fn identifying_data(&self, kind: &KindId) -> DataValue {
		self.identifying
			.get(kind)
			.cloned()
			.unwrap_or_else(DataValue::map)
	}

	fn stack_limit(&self, kind: &KindId) -> u32 {
		self.stack_limits
			.get(kind)
			.copied()
			.unwrap_or(DEFAULT_SLOT_LIMIT)
	}
}
