//! Byte-level primitives shared by every action codec.
//!
//! Integers are LEB128 varints. Slot references are zigzag-encoded signed
//! varints of their wire value, so the held sentinel (`-1`) costs one byte.
//! Strings and slot lists carry a varint length prefix and are bounded so a
//! hostile payload cannot request an unbounded allocation.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use satchel_engine::{SlotList, TransferOptions};
use satchel_primitives::SlotRef;

/// Most slots one list may carry.
pub const MAX_SLOTS: usize = 256;
/// Longest codec id accepted on the wire.
pub const MAX_ID_LEN: usize = 128;

const VARINT_MAX_BYTES: usize = 10;

/// Errors raised while reading or writing action payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
	#[error("payload ended early")]
	Truncated,
	#[error("varint does not fit in 64 bits")]
	VarintOverflow,
	#[error("value {0} does not fit the target integer")]
	OutOfRange(u64),
	#[error("slot reference {0} is not a slot index or the held sentinel")]
	InvalidSlot(i32),
	#[error("length {len} exceeds limit {limit}")]
	TooLong { len: usize, limit: usize },
	#[error("codec id is not valid UTF-8")]
	InvalidUtf8,
	#[error("malformed codec id `{0}`")]
	MalformedId(String),
	#[error("no codec registered for `{0}`")]
	UnknownCodec(String),
	#[error("unknown transfer option bits {0:#04x}")]
	UnknownOptions(u8),
	#[error("{0} trailing byte(s) after payload")]
	Trailing(usize),
	#[error("codec `{codec}` cannot encode this action: {reason}")]
	Unrepresentable { codec: String, reason: &'static str },
}

pub fn put_varint(buf: &mut BytesMut, mut value: u64) {
	while value >= 0x80 {
		buf.put_u8((value as u8 & 0x7f) | 0x80);
		value >>= 7;
	}
	buf.put_u8(value as u8);
}

pub fn get_varint(buf: &mut Bytes) -> Result<u64, WireError> {
	let mut value = 0u64;
	for index in 0..VARINT_MAX_BYTES {
		if !buf.has_remaining() {
			return Err(WireError::Truncated);
		}
		let byte = buf.get_u8();
		let shift = 7 * index as u32;
		let bits = u64::from(byte & 0x7f);
		// The tenth byte may only contribute the single remaining bit.
		if index == VARINT_MAX_BYTES - 1 && bits > 1 {
			return Err(WireError::VarintOverflow);
		}
		value |= bits << shift;
		if byte & 0x80 == 0 {
			return Ok(value);
		}
	}
	Err(WireError::VarintOverflow)
}

fn zigzag(value: i32) -> u32 {
	((value << 1) ^ (value >> 31)) as u32
}

fn unzigzag(value: u32) -> i32 {
	((value >> 1) as i32) ^ -((value & 1) as i32)
}

pub fn put_slot(buf: &mut BytesMut, slot: SlotRef) {
	put_varint(buf, u64::from(zigzag(slot.to_wire())));
}

pub fn get_slot(buf: &mut Bytes) -> Result<SlotRef, WireError> {
	let raw = get_varint(buf)?;
	let encoded = u32::try_from(raw).map_err(|_| WireError::OutOfRange(raw))?;
	let wire = unzigzag(encoded);
	SlotRef::from_wire(wire).ok_or(WireError::InvalidSlot(wire))
}

pub fn put_len(buf: &mut BytesMut, len: usize) {
	put_varint(buf, len as u64);
}

/// Reads a length prefix and checks it against `limit` and the bytes left.
pub fn get_len(buf: &mut Bytes, limit: usize) -> Result<usize, WireError> {
	let raw = get_varint(buf)?;
	let len = usize::try_from(raw).map_err(|_| WireError::OutOfRange(raw))?;
	if len > limit {
		return Err(WireError::TooLong { len, limit });
	}
	Ok(len)
}

pub fn put_slots(buf: &mut BytesMut, slots: &[SlotRef]) {
	put_len(buf, slots.len());
	for &slot in slots {
		put_slot(buf, slot);
	}
}

pub fn get_slots(buf: &mut Bytes) -> Result<SlotList, WireError> {
	let len = get_len(buf, MAX_SLOTS)?;
	// Every slot costs at least one byte.
	if len > buf.remaining() {
		return Err(WireError::Truncated);
	}
	(0..len).map(|_| get_slot(buf)).collect()
}

pub fn put_str(buf: &mut BytesMut, value: &str) {
	put_len(buf, value.len());
	buf.put_slice(value.as_bytes());
}

pub fn get_str(buf: &mut Bytes, limit: usize) -> Result<String, WireError> {
	let len = get_len(buf, limit)?;
	if len > buf.remaining() {
		return Err(WireError::Truncated);
	}
	let bytes = buf.split_to(len);
	String::from_utf8(bytes.to_vec()).map_err(|_| WireError::InvalidUtf8)
}

pub fn put_options(buf: &mut BytesMut, options: TransferOptions) {
	buf.put_u8(options.bits());
}

pub fn get_options(buf: &mut Bytes) -> Result<TransferOptions, WireError> {
	if !buf.has_remaining() {
		return Err(WireError::Truncated);
	}
	let bits = buf.get_u8();
	TransferOptions::from_bits(bits).ok_or(WireError::UnknownOptions(bits))
}

#[cfg(test)]
mod tests;
