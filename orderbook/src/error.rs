//! The one error this crate's decode path actually raises.
//!
//! Everything else in the error taxonomy (unknown order id, unknown
//! symbol, duplicate id, capacity exceeded, non-positive quantity) is a
//! silent drop by design (spec-level policy: process what you can, advance
//! the cursor) and is represented as `bool`/`()` returns, not `Result`.

use thiserror::Error;

/// Raised only by [`crate::parser::Itch41Parser`], which (unlike ITCH 5.0
/// and PITCH) treats an unrecognized message type tag as a hard decode
/// error rather than skipping it.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unrecognized ITCH 4.1 message type {0:#04x}")]
    UnknownMessageType(u8),
}
