//! kumo-vt - VT escape sequence interpreter and terminal state model
//!
//! This crate implements the core of a terminal emulator: a streaming
//! parser that turns an output byte stream into typed actions, and a
//! dispatcher that applies those actions to an in-memory terminal state.
//! It does not render, manage windows, or talk back to the host program;
//! actions that would require a response are accepted and ignored so the
//! stream stays parseable end to end.
//!
//! The model is deterministic: the same byte stream always produces the
//! same terminal state.
//!
//! ```
//! use kumo_vt::{Parser, Performer, Terminal};
//!
//! let mut term = Terminal::new(80, 24);
//! let mut parser = Parser::new();
//! for action in parser.feed(b"\x1b[1mhello\x1b[0m") {
//!     Performer::new(&mut term).perform(action).unwrap();
//! }
//! assert_eq!(term.to_text(), "hello");
//! ```

pub mod action;
pub mod core;
mod error;
mod parser;
mod performer;
mod terminal;

pub use action::Action;
pub use error::{Error, Result};
pub use parser::{Parser, ParserState};
pub use performer::Performer;
pub use terminal::{
    AltScreenKind, MouseEvents, MouseFormat, MouseShiftCapture, Terminal, TerminalFlags,
};
