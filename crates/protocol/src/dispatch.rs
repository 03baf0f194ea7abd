//! Applies decoded actions on the simulation thread.
//!
//! # Role
//!
//! The [`Dispatcher`] is the only place an [`Action`] turns into container
//! mutation. It resolves views through [`ViewResolver`], moves stacks through
//! [`TransferEngine`], and hands every [`Failure`] to the failure-handler
//! registry. One failing slot never aborts the rest of the action.
//!
//! # Mental Model
//!
//! | Kind | Effect |
//! |------|--------|
//! | `Default` | Resolve and present the view at each source slot, recording a [`ViewSession`]. |
//! | `Drop` | Empty each source slot into [`DispatchReport::dropped`]. |
//! | `Transfer` | Run the transfer engine over the action's slot lists. |

use std::sync::Arc;

use satchel_engine::{
	AttachmentStore, AttachmentToken, EngineConfig, Interaction, TransferEngine, TransferOutcome,
	ViewResolver,
};
use satchel_primitives::{ActorId, Container, ContainerId, KindCatalog, SlotRef, Stack};
use satchel_registry::{Failure, RegistryService};

use crate::action::{Action, ActionKind};

/// A view presented to an actor by a `Default` action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSession {
	pub container: ContainerId,
	pub slot: SlotRef,
	pub actor: ActorId,
}

/// Everything one dispatched action produced.
#[derive(Debug, Default)]
pub struct DispatchReport {
	/// Sessions opened by a `Default` action, in source order.
	pub sessions: Vec<AttachmentToken>,
	/// Stacks ejected by a `Drop` action; the host decides where they land.
	pub dropped: Vec<Stack>,
	pub transfer: Option<TransferOutcome>,
	/// Failures, already routed to the failure-handler registry.
	pub failures: Vec<Failure>,
}

impl DispatchReport {
	pub fn is_clean(&self) -> bool {
		self.failures.is_empty()
	}
}

/// Routes actions against shared registries and records presented views.
pub struct Dispatcher {
	registries: Arc<RegistryService>,
	catalog: Arc<dyn KindCatalog>,
	config: EngineConfig,
	sessions: AttachmentStore<ViewSession>,
}

impl Dispatcher {
	pub fn new(
		registries: Arc<RegistryService>,
		catalog: Arc<dyn KindCatalog>,
		config: EngineConfig,
	) -> Self {
		let sessions = AttachmentStore::new(config.attachment_capacity());
		Self {
			registries,
			catalog,
			config,
			sessions,
		}
	}

	pub fn registries(&self) -> &RegistryService {
		&self.registries
	}

	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	pub fn resolver(&self) -> ViewResolver<'_> {
		ViewResolver::new(&self.registries, &*self.catalog, &self.config)
	}

	/// Session recorded under `token`, refreshing its recency.
	pub fn session(&mut self, token: AttachmentToken) -> Option<&ViewSession> {
		self.sessions.get(token)
	}

	/// Forgets a session, typically when the actor closes the view.
	pub fn close(&mut self, token: AttachmentToken) -> Option<ViewSession> {
		self.sessions.remove(token)
	}

	pub fn sessions(&self) -> &AttachmentStore<ViewSession> {
		&self.sessions
	}

	pub fn dispatch(
		&mut self,
		interaction: &mut Interaction<'_>,
		action: &Action,
	) -> DispatchReport {
		tracing::debug!(
			kind = ?action.kind,
			actor = %interaction.actor.id(),
			sources = action.sources.len(),
			destinations = action.destinations.len(),
			"dispatching action"
		);
		let resolver = ViewResolver::new(&self.registries, &*self.catalog, &self.config);
		let mut report = DispatchReport::default();

		match action.kind {
			ActionKind::Default => {
				present_views(resolver, &mut self.sessions, interaction, action, &mut report);
			}
			ActionKind::Drop => drop_stacks(interaction, action, &mut report),
			ActionKind::Transfer => {
				let outcome =
					TransferEngine::new(resolver).transfer(interaction, &action.transfer_request());
				if let Err(failure) = outcome.into_result(action.primary_slot()) {
					report.failures.push(failure);
				}
				report.transfer = Some(outcome);
			}
		}

		for failure in &report.failures {
			report_failure(&self.registries, interaction, failure);
		}
		report
	}
}

impl std::fmt::Debug for Dispatcher {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Dispatcher")
			.field("config", &self.config)
			.field("sessions", &self.sessions)
			.finish_non_exhaustive()
	}
}

fn present_views(
	resolver: ViewResolver<'_>,
	sessions: &mut AttachmentStore<ViewSession>,
	interaction: &Interaction<'_>,
	action: &Action,
	report: &mut DispatchReport,
) {
	let actor = interaction.actor;
	for &slot in &action.sources {
		let Some((container, index)) = interaction.locate(slot) else {
			report.failures.push(Failure::NoViewerFound { slot });
			continue;
		};
		let view = match resolver.resolve_view(container, index, actor).into_result(slot) {
			Ok(view) => view,
			Err(failure) => {
				report.failures.push(failure);
				continue;
			}
		};
		let Some(handler) = resolver.registries().view_handlers.resolve(container, index, actor)
		else {
			report.failures.push(Failure::NoHandlerFound { slot });
			continue;
		};

		handler.capability().present(&view, container, slot, actor);
		let (token, _) = sessions.insert(ViewSession {
			container: container.id(),
			slot,
			actor: actor.id(),
		});
		report.sessions.push(token);
	}
}

fn drop_stacks(interaction: &mut Interaction<'_>, action: &Action, report: &mut DispatchReport) {
	for &slot in &action.sources {
		if interaction.locate(slot).is_none() {
			tracing::debug!(%slot, "drop names a missing slot");
			continue;
		}
		let stack = interaction.stack(slot).clone();
		if stack.is_empty() {
			continue;
		}
		interaction.set(slot, Stack::EMPTY);
		report.dropped.push(stack);
	}
}

fn report_failure(registries: &RegistryService, interaction: &Interaction<'_>, failure: &Failure) {
	let slot = failure.slot();
	let fallback: &dyn Container = &*interaction.container;
	let (container, index) = interaction
		.locate(slot)
		.unwrap_or((fallback, slot.index().unwrap_or(0)));
	match registries.failure_handlers.resolve(container, index, interaction.actor) {
		Some(handler) => handler.capability().report(failure, container, interaction.actor),
		None => tracing::warn!(%slot, %failure, "no failure handler registered"),
	}
}
