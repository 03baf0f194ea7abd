/// Wire value that denotes the actor's held stack instead of a container slot.
pub const HELD_SLOT: i32 = -1;

/// Address of one slot taking part in an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotRef {
	/// The actor's transient held stack.
	Held,
	/// A slot of the container under interaction.
	Index(usize),
}

impl SlotRef {
	/// Decodes a wire slot value. Negative values other than [`HELD_SLOT`] are invalid.
	pub fn from_wire(raw: i32) -> Option<Self> {
		match raw {
			HELD_SLOT => Some(Self::Held),
			n => usize::try_from(n).ok().map(Self::Index),
		}
	}

	/// Encodes to the wire value. Indices beyond `i32::MAX` saturate.
	pub fn to_wire(self) -> i32 {
		match self {
			Self::Held => HELD_SLOT,
			Self::Index(index) => i32::try_from(index).unwrap_or(i32::MAX),
		}
	}

	#[inline]
	pub fn is_held(self) -> bool {
		matches!(self, Self::Held)
	}

	#[inline]
	pub fn index(self) -> Option<usize> {
		match self {
			Self::Held => None,
			Self::Index(index) => Some(index),
		}
	}
}

impl From<usize> for SlotRef {
	fn from(index: usize) -> Self {
		Self::Index(index)
	}
}

impl std::fmt::Display for SlotRef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Held => f.write_str("held"),
			Self::Index(index) => write!(f, "#{index}"),
		}
	}
}
