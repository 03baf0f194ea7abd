use std::fmt;
use std::sync::Arc;

use satchel_primitives::{Actor, Container, EmptyContainer};

use crate::failure::FailureReason;

/// Plain validator contract.
pub type PlainCheck =
	dyn Fn(&dyn Container, usize, &dyn Actor) -> Result<(), FailureReason> + Send + Sync;

/// Extended validator contract: also receives the union of resolvable sibling views.
pub type ExtendedCheck =
	dyn Fn(&dyn Container, usize, &dyn Actor, &dyn Container) -> Result<(), FailureReason>
		+ Send
		+ Sync;

/// Gate evaluated before a view is materialized.
#[derive(Clone)]
pub enum Validator {
	Plain(Arc<PlainCheck>),
	Extended(Arc<ExtendedCheck>),
}

impl Validator {
	pub fn plain<F>(check: F) -> Self
	where
		F: Fn(&dyn Container, usize, &dyn Actor) -> Result<(), FailureReason>
			+ Send
			+ Sync
			+ 'static,
	{
		Self::Plain(Arc::new(check))
	}

	pub fn extended<F>(check: F) -> Self
	where
		F: Fn(&dyn Container, usize, &dyn Actor, &dyn Container) -> Result<(), FailureReason>
			+ Send
			+ Sync
			+ 'static,
	{
		Self::Extended(Arc::new(check))
	}

	#[inline]
	pub fn is_extended(&self) -> bool {
		matches!(self, Self::Extended(_))
	}

	/// Evaluates through the plain contract. Extended validators see an empty
	/// combined container.
	pub fn check(
		&self,
		container: &dyn Container,
		slot: usize,
		actor: &dyn Actor,
	) -> Result<(), FailureReason> {
		self.check_with(container, slot, actor, &EmptyContainer)
	}

	/// Evaluates against `combined`. Plain validators ignore it.
	pub fn check_with(
		&self,
		container: &dyn Container,
		slot: usize,
		actor: &dyn Actor,
		combined: &dyn Container,
	) -> Result<(), FailureReason> {
		match self {
			Self::Plain(check) => check(container, slot, actor),
			Self::Extended(check) => check(container, slot, actor, combined),
		}
	}
}

impl fmt::Debug for Validator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Plain(_) => f.write_str("Validator::Plain"),
			Self::Extended(_) => f.write_str("Validator::Extended"),
		}
	}
}

#[cfg(test)]
mod tests;
