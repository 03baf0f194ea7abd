//! Core types for nested slot containers: kinds, stacks, containers, and data trees.

/// Actor identity and personal-container access.
pub mod actor;
/// Host lookups for per-kind capacity, identifying data, and stack limits.
pub mod catalog;
/// Fixed-size slot containers and the held pseudo-slot.
pub mod container;
/// Structured data tree persisted alongside stacks.
pub mod data;
/// Identity tokens for containers and actors.
pub mod ids;
/// Namespaced kind identifiers.
pub mod kind;
/// Slot addressing, including the held-stack sentinel.
pub mod slot;
/// Counted stacks of a single kind.
pub mod stack;

pub use actor::{Actor, ActorRef};
pub use catalog::{KindCatalog, StaticCatalog};
pub use container::{
	Container, ContainerMut, DEFAULT_SLOT_LIMIT, EmptyContainer, HeldStack, SlotContainer,
};
pub use data::{DataError, DataMap, DataValue};
pub use ids::{ActorId, ContainerId};
pub use kind::KindId;
pub use slot::{HELD_SLOT, SlotRef};
pub use stack::Stack;
