use bytes::{BufMut, Bytes, BytesMut};
use pretty_assertions::assert_eq;
use satchel_engine::{TransferOptions, TransferRequest};
use satchel_primitives::SlotRef;
use satchel_registry::{Codec, CodecId};

use super::*;
use crate::action::{Action, ActionKind};
use crate::wire::{self, WireError};

fn frame(id: &str, payload: &[u8]) -> Bytes {
	let mut buf = BytesMut::new();
	wire::put_str(&mut buf, id);
	buf.put_slice(payload);
	buf.freeze()
}

#[test]
fn test_builtin_ids() {
	let codecs = ActionCodecs::builtin();
	let ids: Vec<_> = codecs.registry().ids().iter().map(|id| id.as_str()).collect();
	assert_eq!(
		ids,
		vec!["satchel:default", "satchel:drop", "satchel:quick_move", "satchel:transfer"]
	);
}

#[test]
fn test_transfer_frame_layout() {
	let codecs = ActionCodecs::builtin();
	let action = Action::transfer(
		TransferRequest::new([SlotRef::Index(0)], [SlotRef::Held])
			.with_options(TransferOptions::PREFER_INSERTION),
	);

	let encoded = codecs.encode(&action).unwrap();
	assert_eq!(encoded, frame("satchel:transfer", &[0x01, 0x00, 0x01, 0x01, 0x01]));
	assert_eq!(codecs.decode(encoded).unwrap(), action);
}

#[test]
fn test_sources_only_kinds_decode_to_their_kind() {
	let codecs = ActionCodecs::builtin();
	let open = codecs.decode(frame("satchel:default", &[0x02, 0x00, 0x01])).unwrap();
	assert_eq!(open, Action::open([SlotRef::Index(0), SlotRef::Held]));

	let dropped = codecs.decode(frame("satchel:drop", &[0x01, 0x06])).unwrap();
	assert_eq!(dropped.kind, ActionKind::Drop);
	assert_eq!(dropped.sources.as_slice(), &[SlotRef::Index(3)]);
}

#[test]
fn test_quick_move_expands_to_held_insertion() {
	let codecs = ActionCodecs::builtin();
	let action = codecs.decode(frame("satchel:quick_move", &[0x06])).unwrap();
	assert_eq!(action.kind, ActionKind::Transfer);
	assert_eq!(action.sources.as_slice(), &[SlotRef::Index(3)]);
	assert_eq!(action.destinations.as_slice(), &[SlotRef::Held]);
	assert_eq!(action.options, TransferOptions::PREFER_INSERTION);

	// The same action round-trips through either codec.
	assert_eq!(codecs.encode_as(&QUICK_MOVE, &action).unwrap().len(), 20);
	assert_eq!(codecs.decode(codecs.encode(&action).unwrap()).unwrap(), action);
}

#[test]
fn test_encoders_reject_lossy_shapes() {
	let codecs = ActionCodecs::builtin();
	let transfer = Action::transfer(TransferRequest::new([SlotRef::Index(1)], [SlotRef::Index(2)]));

	assert!(matches!(
		codecs.encode_as(&DEFAULT, &transfer),
		Err(WireError::Unrepresentable { .. })
	));
	assert!(matches!(
		codecs.encode_as(&QUICK_MOVE, &transfer),
		Err(WireError::Unrepresentable { .. })
	));
	assert!(matches!(
		codecs.encode_as(&TRANSFER, &Action::drop_slots([SlotRef::Held])),
		Err(WireError::Unrepresentable { .. })
	));
}

#[test]
fn test_unknown_and_malformed_ids() {
	let codecs = ActionCodecs::builtin();
	assert_eq!(
		codecs.decode(frame("satchel:sort", &[])),
		Err(WireError::UnknownCodec("satchel:sort".to_owned()))
	);
	assert_eq!(
		codecs.decode(frame("transfer", &[])),
		Err(WireError::MalformedId("transfer".to_owned()))
	);
	assert_eq!(
		codecs.encode_as(&CodecId::from_static("satchel:sort"), &Action::open([])),
		Err(WireError::UnknownCodec("satchel:sort".to_owned()))
	);
}

#[test]
fn test_trailing_bytes_are_rejected() {
	let codecs = ActionCodecs::builtin();
	assert_eq!(
		codecs.decode(frame("satchel:drop", &[0x01, 0x00, 0xff, 0xff])),
		Err(WireError::Trailing(2))
	);
	assert_eq!(codecs.decode(frame("satchel:transfer", &[0x00, 0x00])), Err(WireError::Truncated));
}

fn decode_take_all(buf: &mut Bytes) -> Result<Action, WireError> {
	let slot = wire::get_slot(buf)?;
	Ok(Action::transfer(
		TransferRequest::new([slot], [SlotRef::Held])
			.with_options(TransferOptions::PREFER_EXTRACTION),
	))
}

fn encode_take_all(action: &Action, buf: &mut BytesMut) -> Result<(), WireError> {
	wire::put_slot(buf, action.primary_slot());
	Ok(())
}

#[test]
fn test_registering_an_id_extends_the_wire() {
	let mut codecs = ActionCodecs::builtin();
	let id = CodecId::parse("mymod:take_all").unwrap();
	let previous = codecs.register(
		id.clone(),
		Codec {
			decode: decode_take_all,
			encode: encode_take_all,
		},
	);
	assert!(previous.is_none());

	let action = codecs.decode(frame("mymod:take_all", &[0x02])).unwrap();
	assert_eq!(action.options, TransferOptions::PREFER_EXTRACTION);
	assert_eq!(codecs.encode_as(&id, &action).unwrap(), frame("mymod:take_all", &[0x02]));
}
