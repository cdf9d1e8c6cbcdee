use std::fs;
use std::path::Path;

use anyhow::Context;
use wd::SessionSettings;

use crate::error::{CliError, Result};

/// Loads session settings from a JSON file, or defaults when no path is
/// given. Missing fields in the file fall back to their defaults.
pub fn load_settings(path: Option<&Path>) -> Result<SessionSettings> {
	let Some(path) = path else {
		return Ok(SessionSettings::default());
	};

	let load = || -> anyhow::Result<SessionSettings> {
		let raw = fs::read_to_string(path).context("reading settings file")?;
		let settings = serde_json::from_str(&raw).context("parsing settings JSON")?;
		Ok(settings)
	};

	load().map_err(|source| CliError::Config {
		path: path.to_path_buf(),
		source,
	})
}
