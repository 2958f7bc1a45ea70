pub mod terminal;
pub mod views;
pub mod vm;

pub use terminal::{TerminalError, TerminalUi};
