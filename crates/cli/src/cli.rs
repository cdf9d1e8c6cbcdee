use std::path::PathBuf;

use clap::Parser;
use serde_json::json;
use wd::SessionSettings;

/// Open a WebDriver session against a driver endpoint, report the
/// negotiated identity, and close it again.
#[derive(Debug, Parser)]
#[command(name = "wd", version, about)]
pub struct Cli {
	/// Webdriver endpoint host (overrides the config file).
	#[arg(long)]
	pub host: Option<String>,

	/// Webdriver endpoint port (overrides the config file).
	#[arg(long)]
	pub port: Option<u16>,

	/// Browser name requested in the desired capabilities.
	#[arg(long)]
	pub browser: Option<String>,

	/// Launch the browser headless.
	#[arg(long)]
	pub headless: bool,

	/// Suppress the connect/using diagnostic lines.
	#[arg(long)]
	pub silent: bool,

	/// Path to a JSON settings file.
	#[arg(long, short = 'c')]
	pub config: Option<PathBuf>,

	/// Increase log verbosity (-v, -vv).
	#[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
	pub verbose: u8,
}

impl Cli {
	/// Overlays command-line flags onto loaded settings. Flags win.
	pub fn apply(&self, mut settings: SessionSettings) -> SessionSettings {
		if let Some(host) = &self.host {
			settings.webdriver_host = host.clone();
		}
		if let Some(port) = self.port {
			settings.webdriver_port = port;
		}
		if let Some(browser) = &self.browser {
			settings
				.desired_capabilities
				.insert("browserName", json!(browser));
		}
		if self.silent {
			settings.output = false;
		}
		settings
	}
}
