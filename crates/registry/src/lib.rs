//! Capability registries for nested slot containers.
//!
//! # Purpose
//!
//! Decides, per `(container, slot, actor)`, which viewer interprets a stack as a
//! nested container, which handler presents the resulting view, and which
//! handler reports failures. Also hosts the namespaced codec registry used to
//! add new action kinds.
//!
//! # Mental Model
//!
//! 1. **Predicates:** [`MatchPredicate`] values are generic tests or kind-specific
//!    tests. Composition with [`MatchPredicate::and`] / [`MatchPredicate::or`]
//!    keeps the kind set as a routing hint only.
//! 2. **Registration:** [`CapabilityRegistry::register`] indexes kind-specific
//!    entries by kind and pushes generic ones onto a chain.
//! 3. **Resolution:** kind map, then chain newest first, then default.
//! 4. **Service:** [`RegistryService`] bundles one registry per capability and is
//!    built once at startup, then shared read-only.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`MatchPredicate`] | Tagged `Generic` / `KindSpecific` test. |
//! | [`Validator`] | Plain or extended gate run before a view opens. |
//! | [`CapabilityRegistry`] | Kind map + chain + default dispatch. |
//! | [`View`] | Ephemeral nested container materialized from a slot. |
//! | [`Failure`] | Value-level failure taxonomy. |
//! | [`CodecRegistry`] | Namespaced id to decode/encode pair. |

pub mod capability;
pub mod codec;
pub mod failure;
pub mod predicate;
pub mod registry;
pub mod service;
pub mod validator;

pub use capability::{FailureHandler, LogFailureHandler, NestedContainer, View, ViewHandler, Viewer};
pub use codec::{Codec, CodecId, CodecRegistry, DecodeFn, EncodeFn};
pub use failure::{Failure, FailureReason};
pub use predicate::{KindSet, MatchPredicate, TestFn};
pub use registry::{CapabilityRegistry, RegistryEntry};
pub use service::{FailureHandlerRegistry, RegistryService, ViewHandlerRegistry, ViewerRegistry};
pub use validator::{ExtendedCheck, PlainCheck, Validator};
