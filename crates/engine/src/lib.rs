//! Nested-container engine: sparse storage, view resolution, and transfers.
//!
//! # Purpose
//!
//! Everything that runs on the simulation thread once registries are built:
//! interpreting a slot's stack as a nested container, deciding whether it may
//! open (including validators that depend on sibling views), and moving stacks
//! between real slots, nested slots, and the held stack.
//!
//! # Mental Model
//!
//! 1. **Storage:** [`SparseSlotContainer`] keeps a sorted `(slot, stack)` list
//!    inside the host stack's data. [`SparseViewer`] opens one from a host.
//! 2. **Resolution:** [`ViewResolver::resolve_view`] picks a viewer, validates, and
//!    falls back to [`fixpoint::promote`] for extended validators.
//! 3. **Transfer:** [`TransferEngine`] drives moves through an [`Interaction`],
//!    opening views via the resolver and committing hosts back on change.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`SparseSlotContainer`] | Persisted sparse nested storage. |
//! | [`CombinedContainer`] | Read-only union handed to extended validators. |
//! | [`ViewResolver`] | `resolve_view` / `force_view`. |
//! | [`TransferEngine`] | Direct, drain, and fill transfers. |
//! | [`AttachmentStore`] | LRU map keyed by minted tokens. |
//! | [`EngineConfig`] | TOML-loaded tuning. |

pub mod attachment;
pub mod combined;
pub mod config;
pub mod fixpoint;
pub mod resolve;
pub mod sparse;
pub mod transfer;

#[cfg(test)]
mod fixtures;

pub use attachment::{AttachmentStore, AttachmentToken};
pub use combined::CombinedContainer;
pub use config::{ConfigError, EngineConfig};
pub use resolve::{STACKED_HOST, ViewResolution, ViewResolver};
pub use satchel_registry::Failure;
pub use sparse::{BoundStack, Capacity, SparseSlotContainer, SparseViewer};
pub use transfer::{
	Interaction, SlotList, TransferEngine, TransferOptions, TransferOutcome, TransferPlan,
	TransferRequest,
};
