use std::num::NonZeroUsize;

use pretty_assertions::assert_eq;

use super::AttachmentStore;

fn store(capacity: usize) -> AttachmentStore<&'static str> {
	AttachmentStore::new(NonZeroUsize::new(capacity).unwrap())
}

#[test]
fn test_tokens_are_unique_and_monotonic() {
	let mut store = store(4);
	let (a, _) = store.insert("a");
	let (b, _) = store.insert("b");
	assert!(a < b);
	assert_eq!(store.peek(a), Some(&"a"));
	assert_eq!(store.len(), 2);
}

#[test]
fn test_insert_past_capacity_evicts_least_recently_used() {
	let mut store = store(2);
	let (a, _) = store.insert("a");
	let (b, _) = store.insert("b");

	// Touch `a` so `b` becomes the eviction candidate.
	assert_eq!(store.get(a), Some(&"a"));
	let (c, evicted) = store.insert("c");

	assert_eq!(evicted, Some((b, "b")));
	assert!(store.contains(a));
	assert!(store.contains(c));
	assert!(!store.contains(b));
}

#[test]
fn test_peek_does_not_refresh_recency() {
	let mut store = store(2);
	let (a, _) = store.insert("a");
	let (_, _) = store.insert("b");
	assert_eq!(store.peek(a), Some(&"a"));

	let (_, evicted) = store.insert("c");
	assert_eq!(evicted.map(|(token, _)| token), Some(a));
}

#[test]
fn test_removed_tokens_are_not_reused() {
	let mut store = store(1);
	let (a, _) = store.insert("a");
	assert_eq!(store.remove(a), Some("a"));
	assert!(store.is_empty());

	let (b, evicted) = store.insert("b");
	assert_ne!(a, b);
	assert_eq!(evicted, None);
	assert_eq!(store.capacity().get(), 1);
}
