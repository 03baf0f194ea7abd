use satchel_primitives::{ActorId, ActorRef, Container, SlotContainer, Stack};

use super::Validator;
use crate::failure::FailureReason;

fn needs_two(container: &dyn Container) -> Result<(), FailureReason> {
	if container.size() >= 2 {
		Ok(())
	} else {
		Err(FailureReason::new("too_small"))
	}
}

#[test]
fn test_plain_ignores_combined_container() {
	let validator = Validator::plain(|container, slot, _| {
		if container.stack(slot).is_empty() {
			Err(FailureReason::new("empty"))
		} else {
			Ok(())
		}
	});
	let container = SlotContainer::from_stacks([Stack::new("pouch", 1)]);
	let wide = SlotContainer::new(8);
	let actor = ActorRef::new(ActorId(1));

	assert!(!validator.is_extended());
	assert!(validator.check(&container, 0, &actor).is_ok());
	assert!(validator.check_with(&container, 0, &actor, &wide).is_ok());
}

#[test]
fn test_extended_sees_empty_union_through_plain_contract() {
	let validator = Validator::extended(|_, _, _, combined| needs_two(combined));
	let container = SlotContainer::from_stacks([Stack::new("pouch", 1)]);
	let actor = ActorRef::new(ActorId(1));

	assert!(validator.is_extended());
	let reason = validator.check(&container, 0, &actor).unwrap_err();
	assert_eq!(reason.token(), "too_small");
	assert!(
		validator
			.check_with(&container, 0, &actor, &SlotContainer::new(2))
			.is_ok()
	);
}
