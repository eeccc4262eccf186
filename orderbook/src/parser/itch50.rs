//! NASDAQ ITCH 5.0 decoder.
//!
//! Shares every byte offset with ITCH 4.1 (see [`super::itch_shared`]);
//! differs only in that `C` carries a trade price (ExecutedAtPrice) and an
//! unrecognized type tag is silently skipped rather than raising an error.

use crate::feed::{Feed, Handler};
use crate::parser::itch_shared::{decode_one, frame_len, ITCH_50};
use crate::types::Seqno;

/// Stateless ITCH 5.0 decoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct Itch50Parser;

impl Itch50Parser {
    /// Decodes and applies exactly one message from `buf[0]`, attributing it
    /// to `seqno`. Unlike ITCH 4.1, this never fails: an unrecognized type
    /// is treated as an opaque no-op. Returns the number of bytes consumed.
    pub fn parse_message<H: Handler>(&self, seqno: Seqno, buf: &[u8], feed: &mut Feed<H>) -> usize {
        match decode_one(seqno, buf, feed, ITCH_50) {
            Ok(len) => len,
            Err(_) => unreachable!("ITCH 5.0 decode never errors"),
        }
    }

    /// Repeatedly frames (`u16` big-endian length prefix) and decodes
    /// messages from `buf` until it is exhausted, assigning sequence
    /// numbers `0, 1, 2, ...` in stream order.
    pub fn parse_many<H: Handler>(&self, mut buf: &[u8], feed: &mut Feed<H>) {
        let mut seqno = 0;
        while let Some(len) = frame_len(buf) {
            let body = &buf[2..2 + len];
            self.parse_message(seqno, body, feed);
            buf = &buf[2 + len..];
            seqno += 1;
        }
    }
}
