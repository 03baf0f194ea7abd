//! Action codecs keyed by namespaced id.
//!
//! # Purpose
//!
//! A frame on the wire is `id` (length-prefixed string) followed by the payload
//! of the codec registered under that id. Adding an action shape means
//! registering a new id; [`crate::Dispatcher`] only ever sees decoded [`Action`]s.
//!
//! # Built-in Codecs
//!
//! | Id | Payload |
//! |----|---------|
//! | `satchel:default` | source slots |
//! | `satchel:drop` | source slots |
//! | `satchel:transfer` | source slots, destination slots, option byte |
//! | `satchel:quick_move` | one source slot, moved into the held stack with prefer-insertion |
//!
//! # Invariants
//!
//! - A frame decodes only if its payload is consumed exactly.
//!   - Enforced in: [`ActionCodecs::decode`]
//!   - Tested by: `codecs::tests::test_trailing_bytes_are_rejected`
//!   - Failure symptom: two frames concatenated by a buggy sender decode as the first one.
//! - An encoder never drops fields the action carries.
//!   - Enforced in: `expect_shape`
//!   - Tested by: `codecs::tests::test_encoders_reject_lossy_shapes`
//!   - Failure symptom: a transfer encoded under `satchel:default` loses its destinations.

use bytes::{Buf, Bytes, BytesMut};
use satchel_engine::{TransferOptions, TransferRequest};
use satchel_primitives::SlotRef;
use satchel_registry::{Codec, CodecId, CodecRegistry};

use crate::action::{Action, ActionKind};
use crate::wire::{self, WireError};

pub const DEFAULT: CodecId = CodecId::from_static("satchel:default");
pub const DROP: CodecId = CodecId::from_static("satchel:drop");
pub const TRANSFER: CodecId = CodecId::from_static("satchel:transfer");
pub const QUICK_MOVE: CodecId = CodecId::from_static("satchel:quick_move");

pub type ActionCodec = Codec<Action, WireError>;

/// Registry of action codecs plus framing.
#[derive(Debug)]
pub struct ActionCodecs {
	registry: CodecRegistry<Action, WireError>,
}

impl Default for ActionCodecs {
	fn default() -> Self {
		Self::builtin()
	}
}

impl ActionCodecs {
	/// A registry with no codecs.
	pub fn empty() -> Self {
		Self {
			registry: CodecRegistry::new(),
		}
	}

	/// A registry holding the `satchel:*` codecs.
	pub fn builtin() -> Self {
		let mut codecs = Self::empty();
		codecs.register(
			DEFAULT,
			Codec {
				decode: decode_default,
				encode: encode_default,
			},
		);
		codecs.register(
			DROP,
			Codec {
				decode: decode_drop,
				encode: encode_drop,
			},
		);
		codecs.register(
			TRANSFER,
			Codec {
				decode: decode_transfer,
				encode: encode_transfer,
			},
		);
		codecs.register(
			QUICK_MOVE,
			Codec {
				decode: decode_quick_move,
				encode: encode_quick_move,
			},
		);
		codecs
	}

	pub fn register(&mut self, id: CodecId, codec: ActionCodec) -> Option<ActionCodec> {
		self.registry.register(id, codec)
	}

	pub fn registry(&self) -> &CodecRegistry<Action, WireError> {
		&self.registry
	}

	/// Frames `action` under the default id for its kind.
	pub fn encode(&self, action: &Action) -> Result<Bytes, WireError> {
		self.encode_as(&action.kind.codec_id(), action)
	}

	/// Frames `action` under `id`.
	pub fn encode_as(&self, id: &CodecId, action: &Action) -> Result<Bytes, WireError> {
		let codec = self
			.registry
			.get(id.as_str())
			.ok_or_else(|| WireError::UnknownCodec(id.to_string()))?;
		let mut buf = BytesMut::new();
		wire::put_str(&mut buf, id.as_str());
		(codec.encode)(action, &mut buf)?;
		Ok(buf.freeze())
	}

	/// Decodes one complete frame.
	pub fn decode(&self, mut frame: Bytes) -> Result<Action, WireError> {
		let id = wire::get_str(&mut frame, wire::MAX_ID_LEN)?;
		if CodecId::parse(&id).is_none() {
			return Err(WireError::MalformedId(id));
		}
		let Some(codec) = self.registry.get(&id) else {
			return Err(WireError::UnknownCodec(id));
		};
		let action = (codec.decode)(&mut frame)?;
		if frame.has_remaining() {
			return Err(WireError::Trailing(frame.remaining()));
		}
		Ok(action)
	}
}

fn expect_shape(codec: &CodecId, valid: bool, reason: &'static str) -> Result<(), WireError> {
	if valid {
		Ok(())
	} else {
		Err(WireError::Unrepresentable {
			codec: codec.to_string(),
			reason,
		})
	}
}

fn expect_sources_only(
	codec: &CodecId,
	action: &Action,
	kind: ActionKind,
) -> Result<(), WireError> {
	expect_shape(codec, action.kind == kind, "action kind differs")?;
	expect_shape(
		codec,
		action.destinations.is_empty() && action.options.is_empty(),
		"action carries transfer fields",
	)
}

fn decode_default(buf: &mut Bytes) -> Result<Action, WireError> {
	Ok(Action::open(wire::get_slots(buf)?))
}

fn encode_default(action: &Action, buf: &mut BytesMut) -> Result<(), WireError> {
	expect_sources_only(&DEFAULT, action, ActionKind::Default)?;
	wire::put_slots(buf, &action.sources);
	Ok(())
}

fn decode_drop(buf: &mut Bytes) -> Result<Action, WireError> {
	Ok(Action::drop_slots(wire::get_slots(buf)?))
}

fn encode_drop(action: &Action, buf: &mut BytesMut) -> Result<(), WireError> {
	expect_sources_only(&DROP, action, ActionKind::Drop)?;
	wire::put_slots(buf, &action.sources);
	Ok(())
}

fn decode_transfer(buf: &mut Bytes) -> Result<Action, WireError> {
	let sources = wire::get_slots(buf)?;
	let destinations = wire::get_slots(buf)?;
	let options = wire::get_options(buf)?;
	Ok(Action::transfer(TransferRequest {
		sources,
		destinations,
		options,
	}))
}

fn encode_transfer(action: &Action, buf: &mut BytesMut) -> Result<(), WireError> {
	expect_shape(&TRANSFER, action.kind == ActionKind::Transfer, "action kind differs")?;
	wire::put_slots(buf, &action.sources);
	wire::put_slots(buf, &action.destinations);
	wire::put_options(buf, action.options);
	Ok(())
}

fn quick_move(slot: SlotRef) -> Action {
	let request = TransferRequest::new([slot], [SlotRef::Held]);
	Action::transfer(request.with_options(TransferOptions::PREFER_INSERTION))
}

fn decode_quick_move(buf: &mut Bytes) -> Result<Action, WireError> {
	Ok(quick_move(wire::get_slot(buf)?))
}

fn encode_quick_move(action: &Action, buf: &mut BytesMut) -> Result<(), WireError> {
	let [slot] = action.sources.as_slice() else {
		return Err(WireError::Unrepresentable {
			codec: QUICK_MOVE.to_string(),
			reason: "expects exactly one source slot",
		});
	};
	expect_shape(
		&QUICK_MOVE,
		*action == quick_move(*slot),
		"not a prefer-insertion transfer into the held stack",
	)?;
	wire::put_slot(buf, *slot);
	Ok(())
}

#[cfg(test)]
mod tests;
