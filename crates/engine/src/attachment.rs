//! Count-bounded storage for transient per-interaction data.
//!
//! Values are keyed by minted [`AttachmentToken`]s instead of by the stacks or
//! containers they describe. Inserting past capacity evicts the least recently
//! used value and hands it back to the caller.

use std::num::NonZeroUsize;

use lru::LruCache;

/// Stable identity of one attached value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttachmentToken(u64);

impl AttachmentToken {
	pub fn as_u64(self) -> u64 {
		self.0
	}

	pub fn from_raw(raw: u64) -> Self {
		Self(raw)
	}
}

impl std::fmt::Display for AttachmentToken {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "attachment#{}", self.0)
	}
}

/// LRU map from [`AttachmentToken`] to `T`.
pub struct AttachmentStore<T> {
	next: u64,
	entries: LruCache<AttachmentToken, T>,
}

impl<T> AttachmentStore<T> {
	pub fn new(capacity: NonZeroUsize) -> Self {
		Self {
			next: 1,
			entries: LruCache::new(capacity),
		}
	}

	/// Stores `value` under a fresh token, returning the token and any evicted entry.
	pub fn insert(&mut self, value: T) -> (AttachmentToken, Option<(AttachmentToken, T)>) {
		let token = AttachmentToken(self.next);
		self.next += 1;
		let evicted = self.entries.push(token, value);
		if let Some((old, _)) = &evicted {
			tracing::debug!(evicted = %old, inserted = %token, "attachment store evicted entry");
		}
		(token, evicted)
	}

	/// Returns the value and marks it most recently used.
	pub fn get(&mut self, token: AttachmentToken) -> Option<&T> {
		self.entries.get(&token)
	}

	pub fn get_mut(&mut self, token: AttachmentToken) -> Option<&mut T> {
		self.entries.get_mut(&token)
	}

	/// Returns the value without touching recency.
	pub fn peek(&self, token: AttachmentToken) -> Option<&T> {
		self.entries.peek(&token)
	}

	pub fn remove(&mut self, token: AttachmentToken) -> Option<T> {
		self.entries.pop(&token)
	}

	pub fn contains(&self, token: AttachmentToken) -> bool {
		self.entries.contains(&token)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn capacity(&self) -> NonZeroUsize {
		self.entries.cap()
	}

	pub fn clear(&mut self) {
		self.entries.clear();
	}
}

impl<T> std::fmt::Debug for AttachmentStore<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AttachmentStore")
			.field("len", &self.entries.len())
			.field("capacity", &self.entries.cap())
			.field("next", &self.next)
			.finish()
	}
}

#[cfg(test)]
mod tests;
