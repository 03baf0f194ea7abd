use crate::container::Container;
use crate::ids::ActorId;

/// Whoever drives an interaction with a container.
pub trait Actor {
	fn id(&self) -> ActorId;

	/// The actor's personal container, when it is not the container under interaction.
	///
	/// Hosts operating directly on the actor's own container return `None` here;
	/// that container is already part of every resolution.
	fn personal(&self) -> Option<&dyn Container> {
		None
	}
}

/// Borrowed actor handle for hosts that keep actor state elsewhere.
#[derive(Clone, Copy)]
pub struct ActorRef<'a> {
	pub id: ActorId,
	pub personal: Option<&'a dyn Container>,
}

impl<'a> ActorRef<'a> {
	/// Creates a handle with no personal container.
	pub fn new(id: ActorId) -> Self {
		Self { id, personal: None }
	}

	/// Attaches the actor's personal container.
	#[must_use]
	pub fn with_personal(mut self, personal: &'a dyn Container) -> Self {
		self.personal = Some(personal);
		self
	}
}

impl Actor for ActorRef<'_> {
	fn id(&self) -> ActorId {
		self.id
	}

	fn personal(&self) -> Option<&dyn Container> {
		self.personal
	}
}

impl std::fmt::Debug for ActorRef<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ActorRef")
			.field("id", &self.id)
			.field("personal", &self.personal.map(|c| c.id()))
			.finish()
	}
}
