//! Engine tuning loaded from TOML.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use satchel_primitives::DEFAULT_SLOT_LIMIT;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML syntax or field types.
	#[error("TOML parse error: {0}")]
	Parse(#[from] toml::de::Error),

	/// A field parsed but holds an unusable value.
	#[error("invalid value for `{field}`: {reason}")]
	Invalid {
		field: &'static str,
		reason: &'static str,
	},
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Engine settings. Every field has a default, so an empty document is valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
	/// Global per-slot count ceiling applied on top of container and kind limits.
	pub slot_limit: u32,
	/// Adds the actor's personal container to the dependent-validation base set.
	pub include_personal_container: bool,
	/// Permits inserting a stack whose own view is nonempty into another view.
	pub allow_nested_contents: bool,
	/// Bound of the attachment store.
	pub attachment_capacity: usize,
	/// `tracing-subscriber` filter directive used when no env override is set.
	pub log_filter: String,
}

impl Default for EngineConfig {
	fn default() -> Self {
		Self {
			slot_limit: DEFAULT_SLOT_LIMIT,
			include_personal_container: true,
			allow_nested_contents: false,
			attachment_capacity: 256,
			log_filter: "info".to_owned(),
		}
	}
}

impl EngineConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Load configuration from a file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		Self::from_toml_str(&content)
	}

	pub fn validate(&self) -> Result<()> {
		if self.slot_limit == 0 {
			return Err(ConfigError::Invalid {
				field: "slot_limit",
				reason: "must be at least 1",
			});
		}
		if self.attachment_capacity == 0 {
			return Err(ConfigError::Invalid {
				field: "attachment_capacity",
				reason: "must be at least 1",
			});
		}
		Ok(())
	}

	/// Attachment store bound, clamped to one.
	pub fn attachment_capacity(&self) -> NonZeroUsize {
		NonZeroUsize::new(self.attachment_capacity).unwrap_or(NonZeroUsize::MIN)
	}
}
