//! Registries and hosts shared by protocol tests.

use std::sync::{Arc, Mutex};

use satchel_engine::{EngineConfig, SparseSlotContainer, SparseViewer};
use satchel_primitives::{Actor, Container, KindId, SlotRef, Stack, StaticCatalog};
use satchel_registry::{
	Failure, FailureHandler, MatchPredicate, NestedContainer, RegistryEntry, RegistryService, View,
	ViewHandler, Viewer,
};

use crate::dispatch::Dispatcher;

pub(crate) const POUCH: &str = "pouch";

/// Records every view presented to it as `(slot, view size)`.
#[derive(Default)]
pub(crate) struct RecordingViews(pub Mutex<Vec<(SlotRef, usize)>>);

impl ViewHandler for RecordingViews {
	fn present(&self, view: &View, _parent: &dyn Container, slot: SlotRef, _actor: &dyn Actor) {
		if let Ok(mut seen) = self.0.lock() {
			seen.push((slot, view.as_container().size()));
		}
	}
}

#[derive(Default)]
pub(crate) struct RecordingFailures(pub Mutex<Vec<Failure>>);

impl FailureHandler for RecordingFailures {
	fn report(&self, failure: &Failure, _container: &dyn Container, _actor: &dyn Actor) {
		if let Ok(mut seen) = self.0.lock() {
			seen.push(failure.clone());
		}
	}
}

pub(crate) struct World {
	pub views: Arc<RecordingViews>,
	pub failures: Arc<RecordingFailures>,
	pub registries: RegistryService,
}

impl World {
	/// Pouch viewer and view handler, recording failure handler as the default.
	pub(crate) fn new() -> Self {
		let views = Arc::new(RecordingViews::default());
		let failures = Arc::new(RecordingFailures::default());
		let mut registries = RegistryService::new();
		registries.viewers.register(RegistryEntry::new(
			Arc::new(SparseViewer::new()) as Arc<dyn Viewer>,
			MatchPredicate::kinds([KindId::from(POUCH)]),
		));
		registries.view_handlers.register(RegistryEntry::new(
			Arc::clone(&views) as Arc<dyn ViewHandler>,
			MatchPredicate::kinds([KindId::from(POUCH)]),
		));
		registries.failure_handlers.set_default(RegistryEntry::new(
			Arc::clone(&failures) as Arc<dyn FailureHandler>,
			MatchPredicate::always(),
		));
		Self {
			views,
			failures,
			registries,
		}
	}

	pub(crate) fn dispatcher(self, config: EngineConfig) -> (Dispatcher, Recorders) {
		let recorders = Recorders {
			views: self.views,
			failures: self.failures,
		};
		let catalog = StaticCatalog::new().with_capacity(POUCH, 4);
		let dispatcher = Dispatcher::new(Arc::new(self.registries), Arc::new(catalog), config);
		(dispatcher, recorders)
	}
}

pub(crate) struct Recorders {
	pub views: Arc<RecordingViews>,
	pub failures: Arc<RecordingFailures>,
}

impl Recorders {
	pub(crate) fn presented(&self) -> Vec<(SlotRef, usize)> {
		self.views.0.lock().map(|seen| seen.clone()).unwrap_or_default()
	}

	pub(crate) fn failures(&self) -> Vec<Failure> {
		self.failures.0.lock().map(|seen| seen.clone()).unwrap_or_default()
	}
}

/// Pouch host holding `contents` at the given nested slots.
pub(crate) fn pouch(contents: &[(usize, Stack)]) -> Stack {
	let mut container = SparseSlotContainer::open(Stack::new(POUCH, 1), None);
	for (slot, stack) in contents {
		container.set(*slot, stack.clone());
	}
	Box::new(container).into_host()
}
