//! CLI for opening and closing WebDriver automation sessions.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod runner;
