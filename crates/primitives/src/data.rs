//! Structured data tree carried by stacks.
//!
//! # Role
//!
//! [`DataValue`] is the persistence format for everything a stack carries beyond
//! its kind and count, including the entries of a nested container. The tree is
//! a tagged union of scalars, lists, and string-keyed maps.
//!
//! # Encoding contract
//!
//! - Binary: [`DataValue::to_bytes`] / [`DataValue::from_bytes`] (postcard). Compact,
//!   not self-describing across schema changes of this enum.
//! - Text: [`DataValue::to_json`] / [`DataValue::from_json`] (serde_json), externally
//!   tagged by variant name.
//!
//! Both encodings round-trip every value except non-finite floats in the text form.
//! Maps are ordered by key so equal trees always encode to equal bytes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// String-keyed, key-ordered map node.
pub type DataMap = BTreeMap<String, DataValue>;

/// Errors raised while encoding, decoding, or interpreting a [`DataValue`].
#[derive(Debug, thiserror::Error)]
pub enum DataError {
	#[error("binary data encoding failed: {0}")]
	Binary(#[from] postcard::Error),
	#[error("text data encoding failed: {0}")]
	Text(#[from] serde_json::Error),
	#[error("expected {expected} at `{key}`")]
	Shape { key: String, expected: &'static str },
}

impl DataError {
	pub fn shape(key: impl Into<String>, expected: &'static str) -> Self {
		Self::Shape {
			key: key.into(),
			expected,
		}
	}
}

/// Node of the structured data tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
	Bytes(Vec<u8>),
	List(Vec<DataValue>),
	Map(DataMap),
}

impl Default for DataValue {
	fn default() -> Self {
		Self::map()
	}
}

impl DataValue {
	/// Creates an empty map node.
	pub fn map() -> Self {
		Self::Map(DataMap::new())
	}

	pub fn as_map(&self) -> Option<&DataMap> {
		match self {
			Self::Map(map) => Some(map),
			_ => None,
		}
	}

	pub fn as_map_mut(&mut self) -> Option<&mut DataMap> {
		match self {
			Self::Map(map) => Some(map),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[DataValue]> {
		match self {
			Self::List(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(n) => Some(*n),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(s) => Some(s),
			_ => None,
		}
	}

	/// Looks up `key` when this node is a map.
	pub fn get(&self, key: &str) -> Option<&DataValue> {
		self.as_map()?.get(key)
	}

	/// Inserts `key` into this node, converting it to a map first if it is not one.
	///
	/// Returns the previous value stored under `key`.
	pub fn insert(&mut self, key: impl Into<String>, value: DataValue) -> Option<DataValue> {
		match self {
			Self::Map(map) => map.insert(key.into(), value),
			other => {
				let mut map = DataMap::new();
				map.insert(key.into(), value);
				*other = Self::Map(map);
				None
			}
		}
	}

	/// Removes `key` when this node is a map.
	pub fn remove(&mut self, key: &str) -> Option<DataValue> {
		self.as_map_mut()?.remove(key)
	}

	/// Returns true for an empty map or empty list.
	pub fn is_empty_container(&self) -> bool {
		match self {
			Self::Map(map) => map.is_empty(),
			Self::List(items) => items.is_empty(),
			_ => false,
		}
	}

	/// Encodes the tree in the binary form.
	pub fn to_bytes(&self) -> Result<Vec<u8>, DataError> {
		Ok(postcard::to_stdvec(self)?)
	}

	/// Decodes a tree from the binary form.
	pub fn from_bytes(bytes: &[u8]) -> Result<Self, DataError> {
		Ok(postcard::from_bytes(bytes)?)
	}

	/// Encodes the tree in the text form.
	pub fn to_json(&self) -> Result<String, DataError> {
		Ok(serde_json::to_string(self)?)
	}

	/// Decodes a tree from the text form.
	pub fn from_json(text: &str) -> Result<Self, DataError> {
		Ok(serde_json::from_str(text)?)
	}
}

impl From<bool> for DataValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for DataValue {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<&str> for DataValue {
	fn from(value: &str) -> Self {
		Self::String(value.to_owned())
	}
}

impl From<String> for DataValue {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}

impl From<Vec<DataValue>> for DataValue {
	fn from(items: Vec<DataValue>) -> Self {
		Self::List(items)
	}
}

impl From<DataMap> for DataValue {
	fn from(map: DataMap) -> Self {
		Self::Map(map)
	}
}
