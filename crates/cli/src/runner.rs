use std::sync::Arc;
use std::time::Instant;

use colored::Colorize;
use wd::{Endpoint, HttpTransport, LaunchOptions, Session};

use crate::cli::Cli;
use crate::config;
use crate::error::{CliError, Result};

/// Opens a session, reports the negotiated identity, and closes it.
pub async fn run(cli: Cli) -> Result<()> {
	let settings = cli.apply(config::load_settings(cli.config.as_deref())?);

	// The session never gates itself on this flag; the caller does.
	if !settings.start_session {
		return Err(CliError::SessionsDisabled);
	}

	let endpoint = settings.endpoint();
	let transport = Arc::new(HttpTransport::new(endpoint.clone()));
	let mut session = Session::new(settings, transport);

	let started = Instant::now();
	let data = session
		.create(LaunchOptions::default().headless(cli.headless))
		.await?;

	if session.output_enabled() {
		print_connected(&endpoint, started.elapsed().as_millis(), &data.describe());
	}

	session.close("session complete").await?;
	Ok(())
}

fn print_connected(endpoint: &Endpoint, elapsed_ms: u128, using: &str) {
	println!(
		"Connected to {} on port {} {}.",
		endpoint.host.cyan(),
		endpoint.port.to_string().cyan(),
		format!("({elapsed_ms}ms)").dimmed(),
	);
	println!("  Using: {}.", using.bright_blue());
}
