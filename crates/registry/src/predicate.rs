//! Match predicates and their composition algebra.
//!
//! # Role
//!
//! A [`MatchPredicate`] decides whether a registry entry applies to a
//! `(container, slot, actor)` triple. Predicates come in two shapes:
//!
//! - [`MatchPredicate::Generic`]: an arbitrary test.
//! - [`MatchPredicate::KindSpecific`]: a test whose truth implies the stack kind at
//!   the slot belongs to a finite [`KindSet`]. Registries route these through their
//!   kind map instead of the generic chain.
//!
//! # Invariants
//!
//! - The kind set is a routing hint only. Evaluation always calls the underlying
//!   test functions of both operands of a composition, even when the input lies
//!   outside the computed kind set.
//!   - Enforced in: [`MatchPredicate::and`], [`MatchPredicate::or`].
//!   - Tested by: `predicate::tests::prop_and_truth_matches_operands`,
//!     `predicate::tests::prop_or_truth_matches_operands`.
//!   - Failure symptom: composed entries silently match fewer or more slots than
//!     their operands would.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;
use satchel_primitives::{Actor, Container, KindId};

/// Finite set of kinds carried by a kind-specific predicate.
pub type KindSet = FxHashSet<KindId>;

/// Shared predicate test function.
pub type TestFn = Arc<dyn Fn(&dyn Container, usize, &dyn Actor) -> bool + Send + Sync>;

/// Boolean test over `(container, slot, actor)` with an optional kind-set hint.
#[derive(Clone)]
pub enum MatchPredicate {
	/// Arbitrary test with no kind classification.
	Generic(TestFn),
	/// Test whose truth implies the slot's stack kind is in the set.
	KindSpecific(Arc<KindSet>, TestFn),
}

impl MatchPredicate {
	/// Wraps an arbitrary test as a generic predicate.
	pub fn new<F>(test: F) -> Self
	where
		F: Fn(&dyn Container, usize, &dyn Actor) -> bool + Send + Sync + 'static,
	{
		Self::Generic(Arc::new(test))
	}

	/// Generic predicate that matches every slot.
	pub fn always() -> Self {
		Self::new(|_, _, _| true)
	}

	/// Kind-specific predicate that matches slots holding any of `kinds`.
	pub fn kinds<I, K>(kinds: I) -> Self
	where
		I: IntoIterator<Item = K>,
		K: Into<KindId>,
	{
		let set: Arc<KindSet> = Arc::new(kinds.into_iter().map(Into::into).collect());
		let lookup = Arc::clone(&set);
		Self::KindSpecific(
			set,
			Arc::new(move |container, slot, _| {
				container
					.stack(slot)
					.kind()
					.is_some_and(|kind| lookup.contains(kind))
			}),
		)
	}

	/// Kind-specific predicate that matches `kinds` and additionally requires `test`.
	pub fn kinds_where<I, K, F>(kinds: I, test: F) -> Self
	where
		I: IntoIterator<Item = K>,
		K: Into<KindId>,
		F: Fn(&dyn Container, usize, &dyn Actor) -> bool + Send + Sync + 'static,
	{
		Self::kinds(kinds).and(Self::new(test))
	}

	/// Evaluates the predicate.
	#[inline]
	pub fn test(&self, container: &dyn Container, slot: usize, actor: &dyn Actor) -> bool {
		(self.test_fn())(container, slot, actor)
	}

	/// Returns the routing kind set, if this predicate is kind-specific.
	pub fn kind_set(&self) -> Option<&KindSet> {
		match self {
			Self::Generic(_) => None,
			Self::KindSpecific(kinds, _) => Some(kinds),
		}
	}

	#[inline]
	pub fn is_kind_specific(&self) -> bool {
		matches!(self, Self::KindSpecific(..))
	}

	/// Conjunction. The kind set is the intersection when both sides carry one,
	/// otherwise whichever side carries one.
	#[must_use]
	pub fn and(self, other: Self) -> Self {
		let kinds = match (self.kinds_arc(), other.kinds_arc()) {
			(Some(a), Some(b)) => Some(Arc::new(a.intersection(&b).cloned().collect())),
			(Some(one), None) | (None, Some(one)) => Some(one),
			(None, None) => None,
		};
		let (lhs, rhs) = (self.into_test_fn(), other.into_test_fn());
		Self::compose(
			kinds,
			Arc::new(move |container, slot, actor| {
				lhs(container, slot, actor) && rhs(container, slot, actor)
			}),
		)
	}

	/// Disjunction. The kind set is the union when both sides carry one,
	/// otherwise whichever side carries one.
	#[must_use]
	pub fn or(self, other: Self) -> Self {
		let kinds = match (self.kinds_arc(), other.kinds_arc()) {
			(Some(a), Some(b)) => Some(Arc::new(a.union(&b).cloned().collect())),
			(Some(one), None) | (None, Some(one)) => Some(one),
			(None, None) => None,
		};
		let (lhs, rhs) = (self.into_test_fn(), other.into_test_fn());
		Self::compose(
			kinds,
			Arc::new(move |container, slot, actor| {
				lhs(container, slot, actor) || rhs(container, slot, actor)
			}),
		)
	}

	fn compose(kinds: Option<Arc<KindSet>>, test: TestFn) -> Self {
		match kinds {
			Some(kinds) => Self::KindSpecific(kinds, test),
			None => Self::Generic(test),
		}
	}

	fn test_fn(&self) -> &TestFn {
		match self {
			Self::Generic(test) | Self::KindSpecific(_, test) => test,
		}
	}

	fn into_test_fn(self) -> TestFn {
		match self {
			Self::Generic(test) | Self::KindSpecific(_, test) => test,
		}
	}

	fn kinds_arc(&self) -> Option<Arc<KindSet>> {
		match self {
			Self::Generic(_) => None,
			Self::KindSpecific(kinds, _) => Some(Arc::clone(kinds)),
		}
	}
}

impl fmt::Debug for MatchPredicate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Generic(_) => f.write_str("Generic"),
			Self::KindSpecific(kinds, _) => {
				let mut kinds: Vec<_> = kinds.iter().map(KindId::as_str).collect();
				kinds.sort_unstable();
				f.debug_tuple("KindSpecific").field(&kinds).finish()
			}
		}
	}
}
