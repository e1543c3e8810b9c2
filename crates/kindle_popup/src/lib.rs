//! Command-line stand-in for the Kindle Sender browser extension: drives the
//! popup and settings controllers and executes their effects.
pub mod app;
pub mod cli;
pub mod logging;
pub mod render;
pub mod runner;

pub use app::{execute, run, Outcome};
pub use cli::{Cli, Command, Plan};
pub use runner::EffectRunner;
