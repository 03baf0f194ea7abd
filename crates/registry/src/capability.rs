//! Capability objects stored in the registries.
//!
//! A capability is the thing a registry entry hands out once its predicate
//! matches: a [`Viewer`] that interprets a stack as a nested container, a
//! [`ViewHandler`] that presents a resolved [`View`], or a [`FailureHandler`]
//! that reports a [`Failure`]. Capabilities are compared by identity
//! (`Arc` pointer) when unregistering.

use std::fmt;

use satchel_primitives::{Actor, Container, ContainerMut, KindCatalog, SlotRef, Stack};

use crate::failure::Failure;

/// A container backed by the data of a host stack.
///
/// Mutations persist into the host stack; [`NestedContainer::into_host`]
/// returns the updated host so the caller can write it back to its slot.
pub trait NestedContainer: ContainerMut {
	/// The host stack as currently persisted.
	fn host(&self) -> &Stack;

	/// Consumes the container, yielding the updated host stack.
	fn into_host(self: Box<Self>) -> Stack;
}

/// Interprets a host stack as a nested container.
pub trait Viewer: Send + Sync {
	/// Materializes the nested container carried by `host`.
	fn open(&self, host: Stack, catalog: &dyn KindCatalog) -> Box<dyn NestedContainer>;
}

/// Presents a resolved view to an actor. Rendering lives outside the core.
pub trait ViewHandler: Send + Sync {
	fn present(&self, view: &View, parent: &dyn Container, slot: SlotRef, actor: &dyn Actor);
}

/// Reports a failure to the actor that caused it.
pub trait FailureHandler: Send + Sync {
	fn report(&self, failure: &Failure, container: &dyn Container, actor: &dyn Actor);
}

/// Failure handler that writes failures to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFailureHandler;

impl FailureHandler for LogFailureHandler {
	fn report(&self, failure: &Failure, container: &dyn Container, actor: &dyn Actor) {
		tracing::info!(
			actor = %actor.id(),
			container = container.id().as_u64(),
			slot = %failure.slot(),
			%failure,
			"interaction failed"
		);
	}
}

/// A nested container materialized from the stack at one slot.
///
/// Views are ephemeral: they are recomputed per request and only their backing
/// data persists, through the host stack.
pub struct View {
	slot: usize,
	contents: Box<dyn NestedContainer>,
}

impl View {
	/// Opens the stack at `slot` of `container` with `viewer`.
	pub fn open(
		viewer: &dyn Viewer,
		container: &dyn Container,
		slot: usize,
		catalog: &dyn KindCatalog,
	) -> Self {
		let host = container.stack(slot).clone();
		Self {
			slot,
			contents: viewer.open(host, catalog),
		}
	}

	/// Slot of the host stack within the container it was resolved from.
	pub fn slot(&self) -> usize {
		self.slot
	}

	pub fn contents(&self) -> &dyn NestedContainer {
		&*self.contents
	}

	pub fn contents_mut(&mut self) -> &mut dyn NestedContainer {
		&mut *self.contents
	}

	pub fn as_container(&self) -> &dyn Container {
		&*self.contents
	}

	pub fn is_empty(&self) -> bool {
		self.contents.is_empty()
	}

	pub fn host(&self) -> &Stack {
		self.contents.host()
	}

	/// Consumes the view, yielding the updated host stack.
	pub fn into_host(self) -> Stack {
		self.contents.into_host()
	}
}

impl fmt::Debug for View {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("View")
			.field("slot", &self.slot)
			.field("size", &self.contents.size())
			.field("host", self.contents.host())
			.finish()
	}
}
