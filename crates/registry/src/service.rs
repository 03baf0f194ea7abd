use std::sync::Arc;

use crate::capability::{FailureHandler, LogFailureHandler, ViewHandler, Viewer};
use crate::predicate::MatchPredicate;
use crate::registry::{CapabilityRegistry, RegistryEntry};

/// Viewer dispatch. Never carries a default: no match means no view.
pub type ViewerRegistry = CapabilityRegistry<dyn Viewer>;
/// View-handler dispatch.
pub type ViewHandlerRegistry = CapabilityRegistry<dyn ViewHandler>;
/// Failure-handler dispatch.
pub type FailureHandlerRegistry = CapabilityRegistry<dyn FailureHandler>;

/// The registries of one process, built during startup and threaded to call sites.
///
/// Registration takes `&mut self`; once built, share the service behind an
/// `Arc` so steady-state dispatch only reads it.
#[derive(Debug)]
pub struct RegistryService {
	pub viewers: ViewerRegistry,
	pub view_handlers: ViewHandlerRegistry,
	pub failure_handlers: FailureHandlerRegistry,
}

impl Default for RegistryService {
	fn default() -> Self {
		Self::new()
	}
}

impl RegistryService {
	/// Creates the registries with [`LogFailureHandler`] as the failure default.
	pub fn new() -> Self {
		let mut service = Self::empty();
		service.failure_handlers.set_default(RegistryEntry::new(
			Arc::new(LogFailureHandler) as Arc<dyn FailureHandler>,
			MatchPredicate::always(),
		));
		service
	}

	/// Creates the registries with nothing registered.
	pub fn empty() -> Self {
		Self {
			viewers: CapabilityRegistry::new("viewers"),
			view_handlers: CapabilityRegistry::new("view_handlers"),
			failure_handlers: CapabilityRegistry::new("failure_handlers"),
		}
	}
}
