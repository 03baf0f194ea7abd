//! View resolution with dependent (fixpoint) validation.
//!
//! # Role
//!
//! Turns `(container, slot, actor)` into a [`View`], a [`FailureReason`], or
//! nothing. Plain validators decide alone. Extended validators that fail against
//! an empty combined container get a second chance: sibling views are promoted
//! into a ready set by [`crate::fixpoint::promote`] and the target is re-checked
//! against their union.
//!
//! # Invariants
//!
//! - The failure reason returned is always the target's, never a sibling's.
//!   - Enforced in: [`ViewResolver::resolve_view`].
//!   - Tested by: `resolve::tests::test_failed_promotion_reports_target_reason`.
//! - [`ViewResolver::force_view`] never runs a validator.
//!   - Tested by: `resolve::tests::test_force_view_skips_validation`.
//! - A view only opens on a host stack of count 1. Copies of a stacked host
//!   would share one persisted entry list.
//!   - Enforced in: [`ViewResolver::resolve_view`], [`ViewResolver::force_view`].
//!   - Tested by: `resolve::tests::test_stacked_host_never_opens`.
//!   - Failure symptom: splitting the host after a transfer duplicates its contents.

use std::sync::Arc;

use satchel_primitives::{Actor, Container, KindCatalog, SlotRef};
use satchel_registry::{
	Failure, FailureReason, RegistryEntry, RegistryService, Validator, View, Viewer,
};
use smallvec::SmallVec;

use crate::combined::CombinedContainer;
use crate::config::EngineConfig;
use crate::fixpoint;

/// Outcome of [`ViewResolver::resolve_view`].
#[derive(Debug)]
pub enum ViewResolution {
	/// No viewer matches the slot.
	Absent,
	/// A viewer matches but its validator declined.
	Failed(FailureReason),
	/// The materialized view.
	Resolved(View),
}

impl ViewResolution {
	pub fn is_resolved(&self) -> bool {
		matches!(self, Self::Resolved(_))
	}

	pub fn view(&self) -> Option<&View> {
		match self {
			Self::Resolved(view) => Some(view),
			_ => None,
		}
	}

	pub fn into_view(self) -> Option<View> {
		match self {
			Self::Resolved(view) => Some(view),
			_ => None,
		}
	}

	/// Converts into the failure taxonomy, attributing failures to `slot`.
	pub fn into_result(self, slot: SlotRef) -> Result<View, Failure> {
		match self {
			Self::Resolved(view) => Ok(view),
			Self::Absent => Err(Failure::NoViewerFound { slot }),
			Self::Failed(reason) => Err(Failure::ValidationFailed { slot, reason }),
		}
	}
}

/// Reason token for a view refused because its host stack holds more than one item.
pub const STACKED_HOST: &str = "stacked_host";

type Candidate = (Arc<RegistryEntry<dyn Viewer>>, usize);

/// Resolves views against one [`RegistryService`].
#[derive(Clone, Copy)]
pub struct ViewResolver<'r> {
	registries: &'r RegistryService,
	catalog: &'r dyn KindCatalog,
	config: &'r EngineConfig,
}

impl<'r> ViewResolver<'r> {
	pub fn new(
		registries: &'r RegistryService,
		catalog: &'r dyn KindCatalog,
		config: &'r EngineConfig,
	) -> Self {
		Self {
			registries,
			catalog,
			config,
		}
	}

	pub fn registries(&self) -> &'r RegistryService {
		self.registries
	}

	pub fn catalog(&self) -> &'r dyn KindCatalog {
		self.catalog
	}

	pub fn config(&self) -> &'r EngineConfig {
		self.config
	}

	/// Resolves the view at `slot`, running its validator.
	pub fn resolve_view(
		&self,
		container: &dyn Container,
		slot: usize,
		actor: &dyn Actor,
	) -> ViewResolution {
		let Some(entry) = self.registries.viewers.resolve(container, slot, actor) else {
			return ViewResolution::Absent;
		};
		if !is_single(container, slot) {
			tracing::debug!(slot, count = container.stack(slot).count(), "view host is stacked");
			return ViewResolution::Failed(FailureReason::new(STACKED_HOST));
		}
		let Some(validator) = entry.validator() else {
			return ViewResolution::Resolved(self.open(entry, container, slot));
		};

		let reason = match validator.check(container, slot, actor) {
			Ok(()) => return ViewResolution::Resolved(self.open(entry, container, slot)),
			Err(reason) => reason,
		};
		if !validator.is_extended() {
			tracing::debug!(slot, reason = %reason, "view validation failed");
			return ViewResolution::Failed(reason);
		}

		match self.promote_siblings(container, slot, actor, validator) {
			Ok(()) => ViewResolution::Resolved(self.open(entry, container, slot)),
			Err(reason) => {
				tracing::debug!(slot, reason = %reason, "dependent view validation failed");
				ViewResolution::Failed(reason)
			}
		}
	}

	/// Opens the view at `slot` whenever a viewer matches, skipping validation.
	pub fn force_view(
		&self,
		container: &dyn Container,
		slot: usize,
		actor: &dyn Actor,
	) -> Option<View> {
		if !is_single(container, slot) {
			return None;
		}
		self.registries
			.viewers
			.resolve(container, slot, actor)
			.map(|entry| self.open(entry, container, slot))
	}

	/// Returns true when the stack at `slot` carries nonempty nested contents.
	///
	/// Stacked hosts are inspected too; they cannot be opened but can still hold items.
	pub fn holds_contents(
		&self,
		container: &dyn Container,
		slot: usize,
		actor: &dyn Actor,
	) -> bool {
		self.registries
			.viewers
			.resolve(container, slot, actor)
			.is_some_and(|entry| !self.open(entry, container, slot).is_empty())
	}

	fn open(
		&self,
		entry: &RegistryEntry<dyn Viewer>,
		container: &dyn Container,
		slot: usize,
	) -> View {
		View::open(entry.capability().as_ref(), container, slot, self.catalog)
	}

	fn promote_siblings(
		&self,
		container: &dyn Container,
		slot: usize,
		actor: &dyn Actor,
		validator: &Validator,
	) -> Result<(), FailureReason> {
		let mut base: SmallVec<[&dyn Container; 2]> = SmallVec::new();
		base.push(container);
		if self.config.include_personal_container
			&& let Some(personal) = actor.personal()
			&& personal.id() != container.id()
		{
			base.push(personal);
		}

		let mut ready: Vec<View> = Vec::new();
		let mut pending: Vec<Candidate> = Vec::new();
		for sibling in (0..container.size()).filter(|&i| i != slot && is_single(container, i)) {
			let Some(entry) = self.registries.viewers.resolve(container, sibling, actor) else {
				continue;
			};
			match entry.validator() {
				Some(check) if check.is_extended() => pending.push((Arc::clone(entry), sibling)),
				Some(check) => {
					if check.check(container, sibling, actor).is_ok() {
						ready.push(self.open(entry, container, sibling));
					}
				}
				None => ready.push(self.open(entry, container, sibling)),
			}
		}

		let promotion = fixpoint::promote(
			&mut ready,
			pending,
			|views: &[View]| validator.check_with(container, slot, actor, &union(&base, views)),
			|(entry, sibling): &Candidate, views: &[View]| {
				let check = entry.validator()?;
				check
					.check_with(container, *sibling, actor, &union(&base, views))
					.ok()?;
				Some(self.open(entry, container, *sibling))
			},
		);
		tracing::trace!(
			slot,
			passes = promotion.passes,
			ready = ready.len(),
			passed = promotion.outcome.is_ok(),
			"dependent validation finished"
		);
		promotion.outcome
	}
}

fn is_single(container: &dyn Container, slot: usize) -> bool {
	container.stack(slot).count() == 1
}

fn union<'a>(base: &[&'a dyn Container], views: &'a [View]) -> CombinedContainer<'a> {
	CombinedContainer::new(
		base.iter()
			.copied()
			.chain(views.iter().map(View::as_container)),
	)
}

impl std::fmt::Debug for ViewResolver<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ViewResolver")
			.field("registries", self.registries)
			.field("config", self.config)
			.finish_non_exhaustive()
	}
}
