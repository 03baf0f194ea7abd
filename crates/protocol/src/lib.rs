//! Action protocol: wire codecs, dispatch, and simulation-thread scheduling.
//!
//! # Purpose
//!
//! The outer layer a host talks to. Frames arrive from the network, are decoded
//! into [`Action`]s by [`ActionCodecs`], cross into the simulation thread
//! through [`SimulationQueue`], and are applied by [`Dispatcher`] against the
//! engine.
//!
//! # Mental Model
//!
//! ```text
//! frame ─▶ RemoteInbox::receive     decode on the network task
//!       ─▶ SimulationQueue::drain   FIFO on the simulation thread
//!       ─▶ Dispatcher::dispatch     views, drops, transfers
//! ```
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`Action`] | Decoded request: kind, slot lists, transfer options. |
//! | [`ActionCodecs`] | Namespaced codec registry plus framing. |
//! | [`Dispatcher`] | Applies actions and routes failures. |
//! | [`RemoteInbox`] / [`SimulationQueue`] | Async-to-simulation hand-off. |

pub mod action;
pub mod codecs;
pub mod dispatch;
pub mod simulation;
pub mod telemetry;
pub mod wire;

#[cfg(test)]
mod fixtures;

pub use action::{Action, ActionKind};
pub use codecs::{ActionCodec, ActionCodecs};
pub use dispatch::{DispatchReport, Dispatcher, ViewSession};
pub use satchel_engine::TransferOptions;
pub use simulation::{ActionEnvelope, InboxError, RemoteInbox, SimulationQueue, channel};
pub use wire::WireError;
