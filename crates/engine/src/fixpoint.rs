//! Monotone worklist fixpoint used by dependent validation.
//!
//! # Mental Model
//!
//! `ready` holds resolved values and only grows. `pending` holds candidates and
//! only shrinks. Each pass first asks the goal whether `ready` suffices, then
//! offers every pending candidate a snapshot of `ready`. A pass that admits
//! nothing ends the loop, so the loop runs at most `pending.len()` passes.
//!
//! # Invariants
//!
//! - Candidates admitted in a pass are appended only after the pass completes.
//!   The set of values a candidate sees never depends on its position in
//!   `pending`.
//!   - Enforced in: [`promote`].
//!   - Tested by: `fixpoint::tests::prop_outcome_independent_of_pending_order`.
//! - Termination without a fuel counter.
//!   - Enforced in: [`promote`] (stops on the first pass with no admission).
//!   - Tested by: `fixpoint::tests::test_unsatisfiable_cycle_terminates`.

/// Result of a [`promote`] run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion<E> {
	/// The goal's final verdict: `Ok` on success, else its last error.
	pub outcome: Result<(), E>,
	/// Promotion passes that admitted at least one candidate.
	pub passes: usize,
}

/// Grows `ready` from `pending` until `goal` passes or no candidate is admitted.
///
/// `admit` inspects a candidate against the current `ready` snapshot and returns
/// the value to add when the candidate now qualifies.
pub fn promote<R, P, E>(
	ready: &mut Vec<R>,
	mut pending: Vec<P>,
	mut goal: impl FnMut(&[R]) -> Result<(), E>,
	mut admit: impl FnMut(&P, &[R]) -> Option<R>,
) -> Promotion<E> {
	let mut passes = 0;
	loop {
		let failure = match goal(ready.as_slice()) {
			Ok(()) => {
				return Promotion {
					outcome: Ok(()),
					passes,
				};
			}
			Err(failure) => failure,
		};

		let snapshot = ready.as_slice();
		let mut admitted = Vec::new();
		pending.retain(|candidate| match admit(candidate, snapshot) {
			Some(value) => {
				admitted.push(value);
				false
			}
			None => true,
		});

		if admitted.is_empty() {
			return Promotion {
				outcome: Err(failure),
				passes,
			};
		}

		passes += 1;
		tracing::trace!(
			pass = passes,
			admitted = admitted.len(),
			pending = pending.len(),
			"fixpoint promotion pass"
		);
		ready.extend(admitted);
	}
}
