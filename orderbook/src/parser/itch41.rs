//! NASDAQ ITCH 4.1 decoder.
//!
//! Shares every byte offset with ITCH 5.0 (see
//! [`super::itch_shared`]); differs only in that `C` is a plain Executed
//! (the price field 4.1 would otherwise carry is never read) and that an
//! unrecognized type tag is a hard [`DecodeError`] rather than a skip.

use tracing::warn;

use crate::error::DecodeError;
use crate::feed::{Feed, Handler};
use crate::parser::itch_shared::{decode_one, frame_len, ITCH_41};
use crate::types::Seqno;

/// Stateless ITCH 4.1 decoder. Every method is generic over the `Feed` it
/// drives rather than holding one, so a single `Itch41Parser` value (in
/// practice, none at all — its methods take `&self` only for a uniform
/// calling convention across all three parser variants) can be reused
/// across any number of sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct Itch41Parser;

impl Itch41Parser {
    /// Decodes and applies exactly one message from `buf[0]`, attributing it
    /// to `seqno`. `buf` must contain the full message (the caller is
    /// responsible for framing); returns the number of bytes consumed.
    pub fn parse_message<H: Handler>(
        &self,
        seqno: Seqno,
        buf: &[u8],
        feed: &mut Feed<H>,
    ) -> Result<usize, DecodeError> {
        decode_one(seqno, buf, feed, ITCH_41)
    }

    /// Repeatedly frames (`u16` big-endian length prefix) and decodes
    /// messages from `buf` until it is exhausted, assigning sequence
    /// numbers `0, 1, 2, ...` in stream order. A message that fails to
    /// decode is logged via `tracing::warn!` and skipped; framing always
    /// advances past it using the just-read length prefix, so one bad
    /// message never desynchronizes the rest of the stream.
    pub fn parse_many<H: Handler>(&self, mut buf: &[u8], feed: &mut Feed<H>) {
        let mut seqno = 0;
        while let Some(len) = frame_len(buf) {
            let body = &buf[2..2 + len];
            if let Err(err) = self.parse_message(seqno, body, feed) {
                warn!(error = %err, "dropping undecodable ITCH 4.1 message");
            }
            buf = &buf[2 + len..];
            seqno += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::OrderBook;
    use crate::types::Qty;

    #[derive(Default)]
    struct Counter {
        quotes: u32,
    }
    impl Handler for Counter {
        fn on_quote(&mut self, _book: &OrderBook, _top_changed: bool) {
            self.quotes += 1;
        }
        fn on_trade(&mut self, _book: &OrderBook, _qty: Qty, _price: i64, _top_changed: bool) {}
    }

    fn add_message(id: u64, side: u8, qty: u32, symbol: &[u8; 8], price: u32) -> Vec<u8> {
        let mut m = vec![0u8; 36];
        m[0] = b'A';
        m[11..19].copy_from_slice(&id.to_be_bytes());
        m[19] = side;
        m[20..24].copy_from_slice(&qty.to_be_bytes());
        m[24..32].copy_from_slice(symbol);
        m[32..36].copy_from_slice(&price.to_be_bytes());
        m
    }

    #[test]
    fn decodes_add_and_reports_consumed_length() {
        let parser = Itch41Parser;
        let mut feed = Feed::new(Counter::default(), 16, true, true);
        let msg = add_message(1, b'B', 100, b"AAPL    ", 10);
        let consumed = parser.parse_message(0, &msg, &mut feed).unwrap();
        assert_eq!(consumed, 36);
        assert_eq!(feed.size(), 1);
    }

    #[test]
    fn c_message_is_plain_executed_ignoring_any_trailing_price_field() {
        let parser = Itch41Parser;
        let mut feed = Feed::new(Counter::default(), 16, true, true);
        let add = add_message(1, b'B', 100, b"AAPL    ", 10);
        parser.parse_message(0, &add, &mut feed).unwrap();

        let mut c = vec![0u8; 23];
        c[0] = b'C';
        c[11..19].copy_from_slice(&1u64.to_be_bytes());
        c[19..23].copy_from_slice(&40u32.to_be_bytes());
        let consumed = parser.parse_message(1, &c, &mut feed).unwrap();
        assert_eq!(consumed, 23);

        let book_id = feed.subscribe("AAPL", 0);
        assert_eq!(feed.book(book_id).best_price().bidqty, 60);
    }

    #[test]
    fn unknown_type_is_a_hard_error() {
        let parser = Itch41Parser;
        let mut feed = Feed::new(Counter::default(), 16, true, true);
        let msg = [b'Z'; 1];
        let err = parser.parse_message(0, &msg, &mut feed).unwrap_err();
        assert_eq!(err, DecodeError::UnknownMessageType(b'Z'));
    }

    #[test]
    fn parse_many_skips_bad_message_and_keeps_decoding() {
        let parser = Itch41Parser;
        let mut feed = Feed::new(Counter::default(), 16, true, true);

        let good = add_message(1, b'B', 100, b"AAPL    ", 10);
        let mut bad = vec![0u8; 1];
        bad[0] = b'Z';
        let good2 = add_message(2, b'S', 50, b"AAPL    ", 11);

        let mut stream = Vec::new();
        for body in [good, bad, good2] {
            stream.extend_from_slice(&(body.len() as u16).to_be_bytes());
            stream.extend_from_slice(&body);
        }

        parser.parse_many(&stream, &mut feed);
        assert_eq!(feed.size(), 2);
    }
}
