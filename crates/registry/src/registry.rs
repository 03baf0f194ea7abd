//! Generic capability registry with kind-map, chain, and default dispatch.
//!
//! # Role
//!
//! A [`CapabilityRegistry`] answers "which entry applies at this slot?" for one
//! capability type. Entries with a kind-specific predicate are indexed by kind;
//! generic entries live on a chain scanned newest first.
//!
//! # Resolution order
//!
//! 1. Kind map: the entry indexed under the slot's stack kind, if its predicate
//!    still passes.
//! 2. Chain: the most recently registered generic entry whose predicate passes.
//! 3. Default: the registered fallback, if any.
//!
//! # Invariants
//!
//! - Kind-map registration is last-write-wins and silent.
//!   - Enforced in: [`CapabilityRegistry::register_shared`].
//!   - Tested by: `registry::tests::test_kind_registration_last_write_wins`.
//! - The chain holds each entry at most once, by entry identity.
//!   - Enforced in: [`CapabilityRegistry::register_shared`].
//!   - Tested by: `registry::tests::test_chain_deduplicates_by_identity`.
//! - Unregistration always scans the kind map, the chain, and the default.
//!   - Enforced in: [`CapabilityRegistry::unregister`].
//!   - Tested by: `registry::tests::test_unregister_clears_every_structure`.
//!   - Failure symptom: a capability keeps resolving through the chain after
//!     its kind-map removal reported success.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use satchel_primitives::{Actor, Container, KindId};

use crate::predicate::MatchPredicate;
use crate::validator::Validator;

/// One registration: a capability, the predicate selecting it, and an optional validator.
pub struct RegistryEntry<C: ?Sized> {
	capability: Arc<C>,
	predicate: MatchPredicate,
	validator: Option<Validator>,
}

impl<C: ?Sized> RegistryEntry<C> {
	pub fn new(capability: Arc<C>, predicate: MatchPredicate) -> Self {
		Self {
			capability,
			predicate,
			validator: None,
		}
	}

	#[must_use]
	pub fn with_validator(mut self, validator: Validator) -> Self {
		self.validator = Some(validator);
		self
	}

	pub fn capability(&self) -> &Arc<C> {
		&self.capability
	}

	pub fn predicate(&self) -> &MatchPredicate {
		&self.predicate
	}

	pub fn validator(&self) -> Option<&Validator> {
		self.validator.as_ref()
	}

	/// Returns true when this entry holds `capability` (pointer identity).
	pub fn holds(&self, capability: &Arc<C>) -> bool {
		Arc::ptr_eq(&self.capability, capability)
	}

	#[inline]
	pub fn matches(&self, container: &dyn Container, slot: usize, actor: &dyn Actor) -> bool {
		self.predicate.test(container, slot, actor)
	}
}

impl<C: ?Sized> fmt::Debug for RegistryEntry<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RegistryEntry")
			.field("predicate", &self.predicate)
			.field("validator", &self.validator)
			.finish_non_exhaustive()
	}
}

/// Dispatch table for one capability type.
pub struct CapabilityRegistry<C: ?Sized> {
	label: &'static str,
	by_kind: FxHashMap<KindId, Arc<RegistryEntry<C>>>,
	chain: Vec<Arc<RegistryEntry<C>>>,
	fallback: Option<Arc<RegistryEntry<C>>>,
}

impl<C: ?Sized> CapabilityRegistry<C> {
	pub fn new(label: &'static str) -> Self {
		Self {
			label,
			by_kind: FxHashMap::default(),
			chain: Vec::new(),
			fallback: None,
		}
	}

	pub fn label(&self) -> &'static str {
		self.label
	}

	/// Registers `entry`, returning the shared handle stored in the registry.
	pub fn register(&mut self, entry: RegistryEntry<C>) -> Arc<RegistryEntry<C>> {
		self.register_shared(Arc::new(entry))
	}

	/// Registers an already shared entry.
	///
	/// Kind-specific entries are indexed once per kind, replacing earlier entries
	/// for the same kind. Generic entries are pushed onto the chain unless the
	/// same entry is already there.
	pub fn register_shared(&mut self, entry: Arc<RegistryEntry<C>>) -> Arc<RegistryEntry<C>> {
		match entry.predicate.kind_set() {
			Some(kinds) => {
				for kind in kinds {
					if self
						.by_kind
						.insert(kind.clone(), Arc::clone(&entry))
						.is_some()
					{
						tracing::debug!(
							registry = self.label,
							kind = %kind,
							"kind registration replaced an earlier entry"
						);
					}
				}
			}
			None => {
				if !self.chain.iter().any(|e| Arc::ptr_eq(e, &entry)) {
					self.chain.push(Arc::clone(&entry));
				}
			}
		}
		entry
	}

	/// Installs the entry returned when nothing else matches.
	pub fn set_default(&mut self, entry: RegistryEntry<C>) -> Arc<RegistryEntry<C>> {
		let entry = Arc::new(entry);
		self.fallback = Some(Arc::clone(&entry));
		entry
	}

	/// Removes every entry holding `capability`. Returns true if anything was removed.
	pub fn unregister(&mut self, capability: &Arc<C>) -> bool {
		let kinds_before = self.by_kind.len();
		self.by_kind.retain(|_, entry| !entry.holds(capability));
		let from_kinds = self.by_kind.len() != kinds_before;

		let chain_before = self.chain.len();
		self.chain.retain(|entry| !entry.holds(capability));
		let from_chain = self.chain.len() != chain_before;

		let from_default = self
			.fallback
			.as_ref()
			.is_some_and(|entry| entry.holds(capability));
		if from_default {
			self.fallback = None;
		}

		from_kinds | from_chain | from_default
	}

	/// Resolves through the kind map and the chain only, ignoring the default.
	pub fn resolve_matching(
		&self,
		container: &dyn Container,
		slot: usize,
		actor: &dyn Actor,
	) -> Option<&Arc<RegistryEntry<C>>> {
		if let Some(kind) = container.stack(slot).kind()
			&& let Some(entry) = self.by_kind.get(kind)
			&& entry.matches(container, slot, actor)
		{
			tracing::trace!(registry = self.label, slot, kind = %kind, "kind entry matched");
			return Some(entry);
		}
		self.chain
			.iter()
			.rev()
			.find(|entry| entry.matches(container, slot, actor))
	}

	/// Resolves the entry for `(container, slot, actor)`, falling back to the default.
	pub fn resolve(
		&self,
		container: &dyn Container,
		slot: usize,
		actor: &dyn Actor,
	) -> Option<&Arc<RegistryEntry<C>>> {
		self.resolve_matching(container, slot, actor)
			.or(self.fallback.as_ref())
	}

	/// Number of kinds with an indexed entry.
	pub fn kind_count(&self) -> usize {
		self.by_kind.len()
	}

	pub fn chain_len(&self) -> usize {
		self.chain.len()
	}

	pub fn has_default(&self) -> bool {
		self.fallback.is_some()
	}

	/// Returns true when nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.by_kind.is_empty() && self.chain.is_empty() && self.fallback.is_none()
	}

	/// Kinds with an indexed entry, in unspecified order.
	pub fn kinds(&self) -> impl Iterator<Item = &KindId> {
		self.by_kind.keys()
	}
}

impl<C: ?Sized> fmt::Debug for CapabilityRegistry<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CapabilityRegistry")
			.field("label", &self.label)
			.field("kinds", &self.by_kind.len())
			.field("chain", &self.chain.len())
			.field("default", &self.fallback.is_some())
			.finish()
	}
}
