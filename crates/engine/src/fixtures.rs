//! Shared builders for engine tests.

use std::sync::Arc;

use satchel_primitives::{Container, KindId, Stack, StaticCatalog};
use satchel_registry::{
	FailureReason, MatchPredicate, NestedContainer, RegistryEntry, RegistryService, Validator,
	Viewer,
};

use crate::sparse::{SparseSlotContainer, SparseViewer};

pub(crate) const POUCH: &str = "pouch";
pub(crate) const POUCH_CAPACITY: usize = 4;

/// Catalog declaring a capacity for [`POUCH`] and for each kind in `extra`.
pub(crate) fn catalog(extra: &[&str]) -> StaticCatalog {
	extra
		.iter()
		.fold(StaticCatalog::new().with_capacity(POUCH, POUCH_CAPACITY), |catalog, kind| {
			catalog.with_capacity(*kind, POUCH_CAPACITY)
		})
}

/// Host stack of `kind` whose sparse contents are `contents`.
pub(crate) fn host_with(kind: &str, contents: &[(usize, Stack)]) -> Stack {
	let mut container = SparseSlotContainer::open(Stack::new(kind, 1), None);
	for (slot, stack) in contents {
		container.set(*slot, stack.clone());
	}
	Box::new(container).into_host()
}

pub(crate) fn sparse_viewer() -> Arc<dyn Viewer> {
	Arc::new(SparseViewer::new())
}

/// Registers a sparse viewer for `kinds` without a validator.
pub(crate) fn register_open(registries: &mut RegistryService, kinds: &[&str]) {
	registries.viewers.register(RegistryEntry::new(
		sparse_viewer(),
		MatchPredicate::kinds(kinds.iter().map(|k| KindId::from(*k))),
	));
}

/// Registers a sparse viewer for `kind` that passes only once `needed` is visible
/// in the combined container.
pub(crate) fn register_needing(registries: &mut RegistryService, kind: &str, needed: &str) {
	let needed = KindId::from(needed);
	let validator = Validator::extended(move |_, _, _, combined: &dyn Container| {
		if combined.count_of(&needed) > 0 {
			Ok(())
		} else {
			Err(FailureReason::new("missing_token"))
		}
	});
	registries.viewers.register(
		RegistryEntry::new(sparse_viewer(), MatchPredicate::kinds([KindId::from(kind)]))
			.with_validator(validator),
	);
}
