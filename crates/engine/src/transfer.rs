//! Slot-to-slot transfer across real slots, nested views, and the held stack.
//!
//! # Role
//!
//! Executes one transfer request against an [`Interaction`]: the container the
//! actor is looking at, the stack the actor holds, and the actor itself. Slot
//! lists address container slots by index and the held stack by
//! [`SlotRef::Held`].
//!
//! # Mental Model
//!
//! - **No direction hint:** sources move into destinations pairwise, in list
//!   order, one whole stack at a time.
//! - **With a hint:** [`TransferEngine::plan`] decides whether to swap the lists,
//!   then [`TransferEngine::transfer_views`] first drains source views into the
//!   destinations and, failing that, fills destination views from the sources.
//!   When the planned orientation moves nothing, the opposite orientation runs.
//! - **Single moves:** a move fills an empty slot or merges into a same-kind
//!   stack up to the slot's limit. Whole-stack moves onto a different kind swap
//!   the two stacks; view transfers never swap.
//!
//! # Invariants
//!
//! - Nothing is dropped: a partial move leaves the remainder in its source slot.
//!   - Enforced in: [`exchange`].
//!   - Tested by: `transfer::tests::test_partial_amount_leaves_remainder`.
//! - View hosts are written back only when something moved through them.
//!   - Enforced in: [`TransferEngine::transfer_views`].
//! - Unless `allow_nested_contents` is set, a stack whose own view is nonempty
//!   is never inserted into a view.
//!   - Enforced in: [`TransferEngine::transfer_views`].
//!   - Tested by: `transfer::tests::test_nonempty_container_is_not_nested`.

use bitflags::bitflags;
use satchel_primitives::{Actor, Container, ContainerMut, HeldStack, SlotRef, Stack};
use satchel_registry::{Failure, View};
use smallvec::SmallVec;

use crate::resolve::ViewResolver;

bitflags! {
	/// Direction hints for a transfer request.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct TransferOptions: u8 {
		/// Prefer moving stacks into a held container.
		const PREFER_INSERTION = 1 << 0;
		/// Prefer moving stacks out of a held container.
		const PREFER_EXTRACTION = 1 << 1;
	}
}

/// Inline slot list; requests rarely name more than a handful of slots.
pub type SlotList = SmallVec<[SlotRef; 4]>;

/// Source and destination slots plus direction hints.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransferRequest {
	pub sources: SlotList,
	pub destinations: SlotList,
	pub options: TransferOptions,
}

impl TransferRequest {
	pub fn new(
		sources: impl IntoIterator<Item = SlotRef>,
		destinations: impl IntoIterator<Item = SlotRef>,
	) -> Self {
		Self {
			sources: sources.into_iter().collect(),
			destinations: destinations.into_iter().collect(),
			options: TransferOptions::empty(),
		}
	}

	#[must_use]
	pub fn with_options(mut self, options: TransferOptions) -> Self {
		self.options = options;
		self
	}
}

/// The mutable state one request operates on.
pub struct Interaction<'a> {
	pub container: &'a mut dyn ContainerMut,
	pub held: &'a mut HeldStack,
	pub actor: &'a dyn Actor,
}

impl<'a> Interaction<'a> {
	pub fn new(
		container: &'a mut dyn ContainerMut,
		held: &'a mut HeldStack,
		actor: &'a dyn Actor,
	) -> Self {
		Self {
			container,
			held,
			actor,
		}
	}

	/// Container and local slot addressed by `slot`, if it exists.
	pub fn locate(&self, slot: SlotRef) -> Option<(&dyn Container, usize)> {
		match slot {
			SlotRef::Held => Some((&*self.held as &dyn Container, 0)),
			SlotRef::Index(index) => {
				let container: &dyn Container = &*self.container;
				(index < container.size()).then_some((container, index))
			}
		}
	}

	/// Stack at `slot`, or the empty stack when the slot does not exist.
	pub fn stack(&self, slot: SlotRef) -> &Stack {
		match self.locate(slot) {
			Some((container, index)) => container.stack(index),
			None => Stack::empty_ref(),
		}
	}

	pub fn set(&mut self, slot: SlotRef, stack: Stack) {
		match slot {
			SlotRef::Held => self.held.set_stack(0, stack),
			SlotRef::Index(index) => self.container.set_stack(index, stack),
		}
	}
}

impl std::fmt::Debug for Interaction<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Interaction")
			.field("container", &self.container.id())
			.field("held", self.held.get())
			.field("actor", &self.actor.id())
			.finish()
	}
}

/// Result of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransferOutcome {
	/// Items moved, counted once per move.
	pub moved: u32,
	/// Whether every list involved was exhausted.
	pub complete: bool,
}

impl TransferOutcome {
	/// Maps an incomplete transfer to [`Failure::TransferIncomplete`] attributed to `slot`.
	pub fn into_result(self, slot: SlotRef) -> Result<u32, Failure> {
		if self.complete {
			Ok(self.moved)
		} else {
			Err(Failure::TransferIncomplete {
				slot,
				moved: self.moved,
			})
		}
	}
}

/// Orientation chosen for a hinted transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
	pub sources: SlotList,
	pub destinations: SlotList,
	/// Whether the request's lists were swapped.
	pub swapped: bool,
}

/// Result of one slot-to-slot move, computed on copies before anything is written.
#[derive(Debug)]
struct Exchange {
	source: Stack,
	dest: Stack,
	moved: u32,
}

/// Moves up to `amount` of `source` onto `dest` when `dest` is empty or mergeable.
fn exchange(source: &Stack, dest: &Stack, amount: u32, limit: u32) -> Option<Exchange> {
	if source.is_empty() || amount == 0 {
		return None;
	}
	if dest.is_empty() {
		let moved = amount.min(source.count()).min(limit);
		if moved == 0 {
			return None;
		}
		let mut remainder = source.clone();
		let placed = remainder.split(moved);
		return Some(Exchange {
			source: remainder,
			dest: placed,
			moved,
		});
	}
	if !dest.can_merge(source) {
		return None;
	}
	let room = limit.saturating_sub(dest.count());
	let moved = amount.min(source.count()).min(room);
	if moved == 0 {
		return None;
	}
	let mut remainder = source.clone();
	remainder.shrink(moved);
	let mut merged = dest.clone();
	merged.grow(moved);
	Some(Exchange {
		source: remainder,
		dest: merged,
		moved,
	})
}

/// Executes transfer requests using one [`ViewResolver`].
#[derive(Debug, Clone, Copy)]
pub struct TransferEngine<'r> {
	resolver: ViewResolver<'r>,
}

impl<'r> TransferEngine<'r> {
	pub fn new(resolver: ViewResolver<'r>) -> Self {
		Self { resolver }
	}

	pub fn resolver(&self) -> &ViewResolver<'r> {
		&self.resolver
	}

	/// Runs `request` against `interaction`.
	pub fn transfer(
		&self,
		interaction: &mut Interaction<'_>,
		request: &TransferRequest,
	) -> TransferOutcome {
		let hinted = request
			.options
			.intersects(TransferOptions::PREFER_INSERTION | TransferOptions::PREFER_EXTRACTION);
		let outcome = if hinted {
			let plan = self.plan(interaction, request);
			tracing::trace!(swapped = plan.swapped, options = ?request.options, "transfer planned");
			let first = self.transfer_views(interaction, &plan.sources, &plan.destinations);
			if first.moved > 0 {
				first
			} else {
				self.transfer_views(interaction, &plan.destinations, &plan.sources)
			}
		} else {
			self.transfer_direct(interaction, &request.sources, &request.destinations)
		};

		if !outcome.complete {
			tracing::debug!(
				moved = outcome.moved,
				sources = request.sources.len(),
				destinations = request.destinations.len(),
				"transfer incomplete"
			);
		}
		outcome
	}

	/// Chooses the orientation of a hinted request.
	///
	/// With [`TransferOptions::PREFER_INSERTION`] the lists swap when any held
	/// slot among the destinations does not resolve to a nonempty view.
	/// [`TransferOptions::PREFER_EXTRACTION`] applies the same test to the
	/// sources. Insertion wins when both are set.
	pub fn plan(&self, interaction: &Interaction<'_>, request: &TransferRequest) -> TransferPlan {
		let options = request.options;
		let swapped = if options.contains(TransferOptions::PREFER_INSERTION) {
			self.any_fresh_held(interaction, &request.destinations)
		} else if options.contains(TransferOptions::PREFER_EXTRACTION) {
			self.any_fresh_held(interaction, &request.sources)
		} else {
			false
		};

		let (sources, destinations) = if swapped {
			(request.destinations.clone(), request.sources.clone())
		} else {
			(request.sources.clone(), request.destinations.clone())
		};
		TransferPlan {
			sources,
			destinations,
			swapped,
		}
	}

	/// Drains source views into destinations, or failing that fills destination
	/// views from sources.
	pub fn transfer_views(
		&self,
		interaction: &mut Interaction<'_>,
		sources: &[SlotRef],
		destinations: &[SlotRef],
	) -> TransferOutcome {
		let (drained, drain_complete) = self.drain_from_views(interaction, sources, destinations);
		if drain_complete && drained > 0 {
			return TransferOutcome {
				moved: drained,
				complete: true,
			};
		}
		let (filled, fill_complete) = self.fill_into_views(interaction, sources, destinations);
		TransferOutcome {
			moved: drained + filled,
			complete: fill_complete,
		}
	}

	/// Moves whole stacks pairwise from `sources` into `destinations`.
	pub fn transfer_direct(
		&self,
		interaction: &mut Interaction<'_>,
		sources: &[SlotRef],
		destinations: &[SlotRef],
	) -> TransferOutcome {
		let mut moved = 0;
		let mut complete = sources.len() == destinations.len();
		for (&from, &to) in sources.iter().zip(destinations) {
			let wanted = interaction.stack(from).count();
			let count = self.move_stack(interaction, from, to);
			moved += count;
			complete &= count == wanted;
		}
		TransferOutcome { moved, complete }
	}

	/// Moves the whole stack at `from` onto `to`.
	pub fn move_stack(
		&self,
		interaction: &mut Interaction<'_>,
		from: SlotRef,
		to: SlotRef,
	) -> u32 {
		self.move_amount(interaction, from, to, u32::MAX)
	}

	/// Moves up to `amount` from `from` onto `to`, returning how many moved.
	///
	/// Fills an empty destination or merges into a matching stack up to the
	/// destination limit. When `amount` covers the whole source and the
	/// destination holds a different kind, the two stacks swap.
	pub fn move_amount(
		&self,
		interaction: &mut Interaction<'_>,
		from: SlotRef,
		to: SlotRef,
		amount: u32,
	) -> u32 {
		if from == to {
			return 0;
		}
		let (Some((source_container, source_slot)), Some((dest_container, dest_slot))) =
			(interaction.locate(from), interaction.locate(to))
		else {
			return 0;
		};
		let source = source_container.stack(source_slot).clone();
		let dest = dest_container.stack(dest_slot).clone();
		if source.is_empty() || !dest_container.can_insert(dest_slot, &source) {
			return 0;
		}

		let limit = self.limit_for(dest_container, dest_slot, &source);
		let swappable = !dest.is_empty()
			&& !dest.can_merge(&source)
			&& amount >= source.count()
			&& source.count() <= limit
			&& source_container.can_insert(source_slot, &dest)
			&& dest.count() <= self.limit_for(source_container, source_slot, &dest);

		let result = match exchange(&source, &dest, amount, limit) {
			Some(result) => result,
			None if swappable => Exchange {
				moved: source.count(),
				source: dest,
				dest: source,
			},
			None => return 0,
		};
		interaction.set(from, result.source);
		interaction.set(to, result.dest);
		result.moved
	}

	fn limit_for(&self, container: &dyn Container, slot: usize, stack: &Stack) -> u32 {
		let kind_limit = stack
			.kind()
			.map_or(u32::MAX, |kind| self.resolver.catalog().stack_limit(kind));
		container
			.slot_limit(slot)
			.min(kind_limit)
			.min(self.resolver.config().slot_limit)
	}

	fn open_view(&self, interaction: &Interaction<'_>, slot: SlotRef) -> Option<View> {
		let (container, index) = interaction.locate(slot)?;
		self.resolver
			.resolve_view(container, index, interaction.actor)
			.into_view()
	}

	fn any_fresh_held(&self, interaction: &Interaction<'_>, slots: &[SlotRef]) -> bool {
		slots.iter().any(|&slot| {
			slot.is_held()
				&& !self
					.open_view(interaction, slot)
					.is_some_and(|view| !view.is_empty())
		})
	}

	fn is_guarded(&self, interaction: &Interaction<'_>, slot: SlotRef) -> bool {
		if self.resolver.config().allow_nested_contents {
			return false;
		}
		interaction.locate(slot).is_some_and(|(container, index)| {
			self.resolver
				.holds_contents(container, index, interaction.actor)
		})
	}

	/// Moves nested stacks out of each source view into the remaining destinations.
	///
	/// A destination leaves consideration once it receives anything. Complete when
	/// every destination received something.
	fn drain_from_views(
		&self,
		interaction: &mut Interaction<'_>,
		sources: &[SlotRef],
		destinations: &[SlotRef],
	) -> (u32, bool) {
		let mut remaining: SlotList = destinations.iter().copied().collect();
		let mut moved = 0;
		for &source in sources {
			if remaining.is_empty() {
				break;
			}
			let Some(mut view) = self.open_view(interaction, source) else {
				continue;
			};

			let mut drained = 0;
			for nested in 0..view.as_container().size() {
				let mut index = 0;
				while index < remaining.len() && !view.as_container().stack(nested).is_empty() {
					let dest = remaining[index];
					let count = if dest == source {
						0
					} else {
						self.extract(&mut view, nested, interaction, dest)
					};
					if count > 0 {
						drained += count;
						remaining.remove(index);
					} else {
						index += 1;
					}
				}
			}

			if drained > 0 {
				interaction.set(source, view.into_host());
				moved += drained;
			}
		}
		(moved, remaining.is_empty())
	}

	/// Moves source stacks into each destination view.
	///
	/// A source leaves consideration once emptied. Complete when every source is empty.
	fn fill_into_views(
		&self,
		interaction: &mut Interaction<'_>,
		sources: &[SlotRef],
		destinations: &[SlotRef],
	) -> (u32, bool) {
		let mut remaining: SlotList = sources.iter().copied().collect();
		let mut moved = 0;
		for &dest in destinations {
			if remaining.is_empty() {
				break;
			}
			let Some(mut view) = self.open_view(interaction, dest) else {
				continue;
			};

			let mut filled = 0;
			let mut index = 0;
			while index < remaining.len() {
				let source = remaining[index];
				if source == dest || self.is_guarded(interaction, source) {
					index += 1;
					continue;
				}
				filled += self.insert(&mut view, interaction, source);
				if interaction.stack(source).is_empty() {
					remaining.remove(index);
				} else {
					index += 1;
				}
			}

			if filled > 0 {
				interaction.set(dest, view.into_host());
				moved += filled;
			}
		}
		(moved, remaining.is_empty())
	}

	/// Moves the nested stack at `nested` onto `dest`. Never swaps.
	fn extract(
		&self,
		view: &mut View,
		nested: usize,
		interaction: &mut Interaction<'_>,
		dest: SlotRef,
	) -> u32 {
		let source = view.as_container().stack(nested).clone();
		let Some((dest_container, dest_slot)) = interaction.locate(dest) else {
			return 0;
		};
		if !dest_container.can_insert(dest_slot, &source) {
			return 0;
		}
		let limit = self.limit_for(dest_container, dest_slot, &source);
		let Some(result) = exchange(&source, dest_container.stack(dest_slot), source.count(), limit)
		else {
			return 0;
		};
		view.contents_mut().set_stack(nested, result.source);
		interaction.set(dest, result.dest);
		result.moved
	}

	/// Moves the stack at `source` into `view`: matching stacks first, then empty slots.
	fn insert(&self, view: &mut View, interaction: &mut Interaction<'_>, source: SlotRef) -> u32 {
		let mut moved = 0;
		let size = view.as_container().size();
		for into_empty in [false, true] {
			for nested in 0..size {
				let stack = interaction.stack(source).clone();
				if stack.is_empty() {
					return moved;
				}
				let contents = view.as_container();
				let target = contents.stack(nested);
				if target.is_empty() != into_empty || !contents.can_insert(nested, &stack) {
					continue;
				}
				let limit = self.limit_for(contents, nested, &stack);
				let Some(result) = exchange(&stack, target, stack.count(), limit) else {
					continue;
				};
				view.contents_mut().set_stack(nested, result.dest);
				interaction.set(source, result.source);
				moved += result.moved;
			}
		}
		moved
	}
}
