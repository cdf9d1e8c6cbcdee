use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("failed to load config {path}: {source}")]
	Config {
		path: PathBuf,
		#[source]
		source: anyhow::Error,
	},

	#[error("session start is disabled in the settings")]
	SessionsDisabled,

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Session(#[from] wd::Error),
}
