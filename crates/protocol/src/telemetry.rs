//! Tracing subscriber setup for hosts embedding the engine.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::prelude::*;

/// Environment variable whose directives override the configured filter.
pub const LOG_ENV: &str = "SATCHEL_LOG";

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
	#[error("invalid log filter: {0}")]
	Filter(#[from] ParseError),
	#[error("a global tracing subscriber is already installed")]
	AlreadyInstalled(#[source] tracing_subscriber::util::TryInitError),
}

/// Parses `directives` into a filter.
pub fn parse_filter(directives: &str) -> Result<EnvFilter, TelemetryError> {
	Ok(EnvFilter::try_new(directives)?)
}

/// The filter from [`LOG_ENV`] when set, otherwise `configured`.
pub fn resolve_filter(configured: &str) -> Result<EnvFilter, TelemetryError> {
	match std::env::var(LOG_ENV) {
		Ok(directives) if !directives.trim().is_empty() => parse_filter(&directives),
		_ => parse_filter(configured),
	}
}

/// Installs a stderr fmt subscriber as the global default.
pub fn init(configured: &str) -> Result<(), TelemetryError> {
	let filter = resolve_filter(configured)?;
	let layer = tracing_subscriber::fmt::layer()
		.with_writer(std::io::stderr)
		.with_target(true);
	tracing_subscriber::registry()
		.with(filter)
		.with(layer)
		.try_init()
		.map_err(TelemetryError::AlreadyInstalled)?;
	tracing::debug!(env = LOG_ENV, "tracing initialized");
	Ok(())
}
