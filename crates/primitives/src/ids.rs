use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one container instance.
///
/// Two containers compare equal only if they are the same instance; identity is
/// what the view engine uses to decide whether the actor's personal container
/// is distinct from the container under interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContainerId(u64);

impl ContainerId {
	/// Identity shared by containers that never take part in identity checks,
	/// such as [`crate::EmptyContainer`].
	pub const DETACHED: Self = Self(0);

	/// Mints a fresh identity.
	pub fn mint() -> Self {
		Self(NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed))
	}

	/// Returns the raw identity value.
	#[inline]
	pub const fn as_u64(self) -> u64 {
		self.0
	}
}

/// Identity of the actor driving an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActorId(pub u64);

impl std::fmt::Display for ActorId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "actor#{}", self.0)
	}
}
