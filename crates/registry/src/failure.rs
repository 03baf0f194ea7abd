use std::borrow::Cow;
use std::fmt;

use satchel_primitives::SlotRef;

/// Why a validator declined to open a view.
///
/// Only presence or absence matters to control flow; the token and description
/// are carried for reporting.
#[derive(Debug, Clone)]
pub struct FailureReason {
	token: &'static str,
	description: Option<Cow<'static, str>>,
}

impl FailureReason {
	pub const fn new(token: &'static str) -> Self {
		Self {
			token,
			description: None,
		}
	}

	#[must_use]
	pub fn with_description(mut self, description: impl Into<Cow<'static, str>>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn token(&self) -> &'static str {
		self.token
	}

	pub fn description(&self) -> Option<&str> {
		self.description.as_deref()
	}
}

impl fmt::Display for FailureReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.description {
			Some(description) => write!(f, "{}: {description}", self.token),
			None => f.write_str(self.token),
		}
	}
}

/// Failure taxonomy for view resolution, presentation, and transfer.
///
/// Failures are values routed to the failure-handler registry; nothing in the
/// core aborts a whole request because one slot failed.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Failure {
	/// No viewer entry matches the slot.
	#[error("no viewer matches slot {slot}")]
	NoViewerFound { slot: SlotRef },
	/// A viewer matched but its validator declined.
	#[error("view at slot {slot} failed validation: {reason}")]
	ValidationFailed { slot: SlotRef, reason: FailureReason },
	/// A view resolved but no handler claims it.
	#[error("no handler for view at slot {slot}")]
	NoHandlerFound { slot: SlotRef },
	/// A transfer only partially completed; the remainder stayed in place.
	#[error("transfer incomplete after moving {moved} item(s)")]
	TransferIncomplete { slot: SlotRef, moved: u32 },
}

impl Failure {
	/// Slot the failure is reported against.
	pub fn slot(&self) -> SlotRef {
		match self {
			Self::NoViewerFound { slot }
			| Self::ValidationFailed { slot, .. }
			| Self::NoHandlerFound { slot }
			| Self::TransferIncomplete { slot, .. } => *slot,
		}
	}

	/// Validation reason, when the failure carries one.
	pub fn reason(&self) -> Option<&FailureReason> {
		match self {
			Self::ValidationFailed { reason, .. } => Some(reason),
			_ => None,
		}
	}
}
