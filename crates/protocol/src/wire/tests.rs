use bytes::{Bytes, BytesMut};
use pretty_assertions::assert_eq;
use rstest::rstest;
use satchel_engine::TransferOptions;
use satchel_primitives::SlotRef;

use super::*;

fn written(write: impl FnOnce(&mut BytesMut)) -> Vec<u8> {
	let mut buf = BytesMut::new();
	write(&mut buf);
	buf.to_vec()
}

#[rstest]
#[case(0, &[0x00])]
#[case(127, &[0x7f])]
#[case(300, &[0xac, 0x02])]
#[case(u64::MAX, &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01])]
fn test_varint_layout(#[case] value: u64, #[case] expected: &[u8]) {
	assert_eq!(written(|buf| put_varint(buf, value)), expected);
	let mut bytes = Bytes::copy_from_slice(expected);
	assert_eq!(get_varint(&mut bytes), Ok(value));
	assert!(bytes.is_empty());
}

#[test]
fn test_varint_rejects_truncation_and_overflow() {
	let mut truncated = Bytes::from_static(&[0x80, 0x80]);
	assert_eq!(get_varint(&mut truncated), Err(WireError::Truncated));

	let mut overlong = Bytes::from_static(&[0xff; 11]);
	assert_eq!(get_varint(&mut overlong), Err(WireError::VarintOverflow));

	let mut wide_tail =
		Bytes::from_static(&[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x02]);
	assert_eq!(get_varint(&mut wide_tail), Err(WireError::VarintOverflow));
}

#[rstest]
#[case(SlotRef::Held, &[0x01])]
#[case(SlotRef::Index(0), &[0x00])]
#[case(SlotRef::Index(2), &[0x04])]
#[case(SlotRef::Index(64), &[0x80, 0x01])]
fn test_slot_zigzag_layout(#[case] slot: SlotRef, #[case] expected: &[u8]) {
	assert_eq!(written(|buf| put_slot(buf, slot)), expected);
	assert_eq!(get_slot(&mut Bytes::copy_from_slice(expected)), Ok(slot));
}

#[test]
fn test_negative_slots_other_than_held_are_rejected() {
	// zigzag(-2) == 3
	assert_eq!(get_slot(&mut Bytes::from_static(&[0x03])), Err(WireError::InvalidSlot(-2)));
	assert!(matches!(
		get_slot(&mut Bytes::from_static(&[0xff, 0xff, 0xff, 0xff, 0x7f])),
		Err(WireError::OutOfRange(_))
	));
}

#[test]
fn test_slot_list_bounds() {
	let mut too_many = BytesMut::new();
	put_len(&mut too_many, MAX_SLOTS + 1);
	assert_eq!(
		get_slots(&mut too_many.freeze()),
		Err(WireError::TooLong {
			len: MAX_SLOTS + 1,
			limit: MAX_SLOTS
		})
	);

	// Claims three slots, carries one.
	let mut short = Bytes::from_static(&[0x03, 0x00]);
	assert_eq!(get_slots(&mut short), Err(WireError::Truncated));
}

#[test]
fn test_slot_list_keeps_order() {
	let slots = [SlotRef::Index(3), SlotRef::Held, SlotRef::Index(0)];
	let mut bytes = Bytes::from(written(|buf| put_slots(buf, &slots)));
	assert_eq!(get_slots(&mut bytes).unwrap().as_slice(), &slots);
}

#[test]
fn test_strings_are_length_prefixed_utf8() {
	assert_eq!(written(|buf| put_str(buf, "a:b")), b"\x03a:b");
	assert_eq!(get_str(&mut Bytes::from_static(b"\x02\xff\xfe"), 8), Err(WireError::InvalidUtf8));
	assert_eq!(
		get_str(&mut Bytes::from_static(b"\x09satchel:x"), 4),
		Err(WireError::TooLong { len: 9, limit: 4 })
	);
}

#[test]
fn test_unknown_option_bits_are_rejected() {
	let bits = TransferOptions::PREFER_INSERTION | TransferOptions::PREFER_EXTRACTION;
	assert_eq!(get_options(&mut Bytes::from(written(|buf| put_options(buf, bits)))), Ok(bits));
	assert_eq!(get_options(&mut Bytes::from_static(&[0x80])), Err(WireError::UnknownOptions(0x80)));
	assert_eq!(get_options(&mut Bytes::new()), Err(WireError::Truncated));
}
