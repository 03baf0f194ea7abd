//! Namespaced codec registry.
//!
//! Maps a namespaced string id (`satchel:transfer`) to a decode/encode pair.
//! New message kinds are added by registering a new id; the dispatch core that
//! consumes decoded values never changes.

use std::borrow::{Borrow, Cow};
use std::fmt;

use bytes::{Bytes, BytesMut};
use rustc_hash::FxHashMap;

/// Namespaced codec identifier of the form `namespace:path`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodecId(Cow<'static, str>);

impl CodecId {
	/// Wraps a static identifier. The caller guarantees the `namespace:path` form.
	pub const fn from_static(id: &'static str) -> Self {
		Self(Cow::Borrowed(id))
	}

	/// Parses an identifier, rejecting text without a non-empty namespace and path.
	pub fn parse(id: &str) -> Option<Self> {
		let (namespace, path) = id.split_once(':')?;
		if namespace.is_empty() || path.is_empty() {
			return None;
		}
		Some(Self(Cow::Owned(id.to_owned())))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Borrow<str> for CodecId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for CodecId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Decoder function: consumes a payload (without its leading id).
pub type DecodeFn<T, E> = fn(&mut Bytes) -> Result<T, E>;
/// Encoder function: appends a payload (without its leading id).
pub type EncodeFn<T, E> = fn(&T, &mut BytesMut) -> Result<(), E>;

/// Decode/encode pair for one message kind.
pub struct Codec<T, E> {
	pub decode: DecodeFn<T, E>,
	pub encode: EncodeFn<T, E>,
}

impl<T, E> Clone for Codec<T, E> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T, E> Copy for Codec<T, E> {}

impl<T, E> fmt::Debug for Codec<T, E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Codec").finish_non_exhaustive()
	}
}

/// Registry of codecs keyed by namespaced id.
pub struct CodecRegistry<T, E> {
	by_id: FxHashMap<CodecId, Codec<T, E>>,
}

impl<T, E> Default for CodecRegistry<T, E> {
	fn default() -> Self {
		Self {
			by_id: FxHashMap::default(),
		}
	}
}

impl<T, E> CodecRegistry<T, E> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `codec` under `id`, returning the codec it replaced.
	pub fn register(&mut self, id: CodecId, codec: Codec<T, E>) -> Option<Codec<T, E>> {
		let replaced = self.by_id.insert(id.clone(), codec);
		if replaced.is_some() {
			tracing::debug!(codec = %id, "codec registration replaced an earlier codec");
		}
		replaced
	}

	pub fn unregister(&mut self, id: &str) -> bool {
		self.by_id.remove(id).is_some()
	}

	pub fn get(&self, id: &str) -> Option<&Codec<T, E>> {
		self.by_id.get(id)
	}

	pub fn contains(&self, id: &str) -> bool {
		self.by_id.contains_key(id)
	}

	pub fn len(&self) -> usize {
		self.by_id.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_id.is_empty()
	}

	/// Registered ids, sorted.
	pub fn ids(&self) -> Vec<&CodecId> {
		let mut ids: Vec<_> = self.by_id.keys().collect();
		ids.sort_by(|a, b| a.as_str().cmp(b.as_str()));
		ids
	}
}

impl<T, E> fmt::Debug for CodecRegistry<T, E> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CodecRegistry")
			.field("ids", &self.ids())
			.finish()
	}
}
