use std::fmt;
use std::sync::Arc;

/// Namespaced kind identifier such as `satchel:pouch`.
///
/// Identifiers without a namespace are placed in [`KindId::DEFAULT_NAMESPACE`].
/// Cloning is cheap; the text is shared.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KindId(Arc<str>);

impl KindId {
	/// Namespace assumed when an identifier has no `namespace:` prefix.
	pub const DEFAULT_NAMESPACE: &'static str = "satchel";

	/// Creates an identifier, prefixing the default namespace when absent.
	pub fn new(id: impl AsRef<str>) -> Self {
		let id = id.as_ref();
		if id.contains(':') {
			Self(Arc::from(id))
		} else {
			Self(Arc::from(format!("{}:{id}", Self::DEFAULT_NAMESPACE)))
		}
	}

	/// Returns the full `namespace:path` text.
	#[inline]
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns the namespace part.
	pub fn namespace(&self) -> &str {
		self.0.split_once(':').map_or("", |(ns, _)| ns)
	}

	/// Returns the path part.
	pub fn path(&self) -> &str {
		self.0.split_once(':').map_or(&self.0, |(_, path)| path)
	}
}

impl fmt::Debug for KindId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "KindId({})", self.0)
	}
}

impl fmt::Display for KindId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for KindId {
	fn from(id: &str) -> Self {
		Self::new(id)
	}
}

impl From<String> for KindId {
	fn from(id: String) -> Self {
		Self::new(id)
	}
}

impl From<&KindId> for KindId {
	fn from(id: &KindId) -> Self {
		id.clone()
	}
}
