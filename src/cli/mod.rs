//! Command-line interface: argument parsing and interrupt handling.

pub mod args;
pub mod interrupt;

pub use args::{ActionArg, Args, ProgressModeArg};
pub use interrupt::spawn_interrupt_handler;
