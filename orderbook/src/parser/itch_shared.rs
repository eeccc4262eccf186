//! Decode logic shared by [`super::itch41::Itch41Parser`] and
//! [`super::itch50::Itch50Parser`].
//!
//! The two variants share every byte offset; they differ only in what `C`
//! means (plain Executed in 4.1, ExecutedAtPrice in 5.0) and in how an
//! unrecognized type tag is handled (4.1 raises an error, 5.0 ignores it).
//! Keeping the shared shape here means that difference is the only place
//! the two parsers' code actually diverges.

use crate::error::DecodeError;
use crate::feed::{Feed, Handler};
use crate::parser::wire::{be_u16, be_u32, be_u64, symbol8};
use crate::types::{Seqno, Side};

/// `true` selects ITCH 5.0's interpretation of `C` (ExecutedAtPrice);
/// `false` selects ITCH 4.1's (plain Executed, ignoring the price field).
pub(super) const ITCH_50: bool = true;
pub(super) const ITCH_41: bool = false;

/// Decodes and applies exactly one message starting at `buf[0]`, attributing
/// it to `seqno` (the caller assigns these; `parse_many` counts up from
/// zero, matching how a realistic single-stream feed has no explicit
/// sequence field of its own to borrow).
///
/// Returns the number of bytes consumed. `Ok` even for a recognized
/// informational type that carries no book-relevant payload (a true no-op,
/// zero operations on `feed`).
pub(super) fn decode_one<H: Handler>(
    seqno: Seqno,
    buf: &[u8],
    feed: &mut Feed<H>,
    variant_is_50: bool,
) -> Result<usize, DecodeError> {
    let msg_type = buf[0];
    match msg_type {
        b'A' | b'F' => {
            let id = be_u64(buf, 11);
            let side = if buf[19] == b'B' { Side::Buy } else { Side::Sell };
            let qty = be_u32(buf, 20) as i64;
            let symbol = symbol8(buf, 24);
            let price = be_u32(buf, 32) as i64;
            feed.add(seqno, id, side, qty, symbol, price);
            Ok(36)
        }
        b'E' => {
            let id = be_u64(buf, 11);
            let qty = be_u32(buf, 19) as i64;
            feed.executed(seqno, id, qty);
            Ok(23)
        }
        b'C' if variant_is_50 => {
            let id = be_u64(buf, 11);
            let qty = be_u32(buf, 19) as i64;
            let price = be_u32(buf, 32) as i64;
            feed.executed_at_price(seqno, id, qty, price);
            Ok(36)
        }
        b'C' => {
            // ITCH 4.1: `C` is a plain Executed, no price field consumed.
            let id = be_u64(buf, 11);
            let qty = be_u32(buf, 19) as i64;
            feed.executed(seqno, id, qty);
            Ok(23)
        }
        b'X' => {
            let id = be_u64(buf, 11);
            let qty = be_u32(buf, 19) as i64;
            feed.reduce(seqno, id, qty);
            Ok(23)
        }
        b'D' => {
            let id = be_u64(buf, 11);
            feed.delete(seqno, id);
            Ok(19)
        }
        b'U' => {
            let old_id = be_u64(buf, 11);
            let new_id = be_u64(buf, 19);
            let qty = be_u32(buf, 27) as i64;
            let price = be_u32(buf, 31) as i64;
            feed.replace(seqno, old_id, new_id, qty, price);
            Ok(35)
        }
        b'T' | b'S' | b'R' | b'H' | b'Y' | b'L' | b'P' | b'Q' | b'B' | b'I' => {
            // Informational types neither variant's Feed acts on.
            Ok(message_len(msg_type))
        }
        other => {
            if variant_is_50 {
                Ok(message_len(other).max(1))
            } else {
                Err(DecodeError::UnknownMessageType(other))
            }
        }
    }
}

/// Length of an informational message this crate does not decode further.
/// ITCH 5.0 still needs to skip over it to keep the framing cursor aligned
/// even though it carries no fields this crate reads; this crate only
/// tracks the handful of informational types spec.md names, using the
/// shortest legal ITCH message length as a conservative skip when a 5.0
/// stream carries something else entirely unrecognized.
fn message_len(msg_type: u8) -> usize {
    match msg_type {
        b'S' => 12,
        b'R' => 39,
        b'H' => 25,
        b'Y' => 20,
        b'L' => 26,
        b'P' => 44,
        b'Q' => 40,
        b'B' => 19,
        b'I' => 50,
        b'T' => 21,
        _ => 19,
    }
}

/// ITCH framing: a big-endian `u16` length prefix precedes each message
/// body. Returns the decoded body length (excluding the 2-byte prefix) so
/// callers can advance past `2 + body_len`.
pub(super) fn frame_len(buf: &[u8]) -> Option<usize> {
    if buf.len() < 2 {
        return None;
    }
    let len = be_u16(buf, 0) as usize;
    if buf.len() < 2 + len {
        return None;
    }
    Some(len)
}
