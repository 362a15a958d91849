//! Escape sequence parser
//!
//! A VT500-model state machine that turns an output byte stream into
//! semantic [`Action`](crate::action::Action) values. The parser is
//! streaming: sequences and multi-byte characters may arrive split
//! across arbitrary chunk boundaries.

mod decode;
mod params;
mod state;
mod utf8;

pub use params::Params;
pub use state::{Parser, ParserState};
