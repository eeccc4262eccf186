//! Market-data decoders and a limit-order-book reconstructor.
//!
//! Three components, leaves first: [`book::OrderBook`] tracks one
//! instrument's resting liquidity, [`feed::Feed`] owns a session's books and
//! order table and turns protocol-neutral operations into callbacks on a
//! caller-supplied [`feed::Handler`], and [`parser`] decodes NASDAQ ITCH 4.1,
//! ITCH 5.0 and CBOE PITCH bytes into those operations.
//!
//! This crate reconstructs book state from an already-framed, in-order
//! message stream; it does not read from a socket or file, match orders
//! against each other beyond the cross-resolution `OrderBook::uncross`
//! performs, or persist anything.

pub mod book;
mod error;
mod hash;
pub mod feed;
pub mod parser;
pub mod types;

pub use book::{BestPrice, OrderBook};
pub use error::DecodeError;
pub use feed::{Feed, Handler, MAX_BOOKS};
pub use parser::{Itch41Parser, Itch50Parser, PitchParser};
pub use types::{encode_symbol, BookId, Id, Price, Qty, Seqno, Side, Symbol};
