//! Command-line front end

pub mod args;
pub mod logging;
pub mod progress;
pub mod prompts;
