//! CBOE PITCH decoder.
//!
//! Every multi-byte integer on the wire is native/little-endian except the
//! symbol fields, which are byte-order-normalized to the same big-endian
//! numeric form used everywhere else in this crate (see
//! [`super::wire::symbol6`]). Messages are self-delimited by a leading
//! length byte; [`PitchParser::parse_packet`] additionally strips an 8-byte
//! packet header ahead of the per-message loop.

use crate::feed::{Feed, Handler};
use crate::parser::wire::{le_u16, le_u32, le_u64, symbol6, symbol8};
use crate::types::{Seqno, Side};

/// Stateless PITCH decoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct PitchParser;

impl PitchParser {
    /// Decodes and applies exactly one message starting at `buf[0]`
    /// (the length byte) attributing it to `seqno`. Returns the number of
    /// bytes consumed, which is always `buf[0]` — PITCH's own length byte,
    /// not a value this crate computes from the payload.
    pub fn parse_message<H: Handler>(&self, seqno: Seqno, buf: &[u8], feed: &mut Feed<H>) -> usize {
        let len = buf[0] as usize;
        let msg_type = buf[1];
        match msg_type {
            0x21 => {
                // AddOrderLong
                let id = le_u64(buf, 6);
                let side = side_of(buf[14]);
                let qty = le_u32(buf, 15) as i64;
                let symbol = symbol6(buf, 19);
                let price = le_u64(buf, 25) as i64;
                feed.add(seqno, id, side, qty, symbol, price);
            }
            0x22 => {
                // AddOrderShort
                let id = le_u64(buf, 6);
                let side = side_of(buf[14]);
                let qty = le_u16(buf, 15) as i64;
                let symbol = symbol6(buf, 17);
                let price = le_u16(buf, 23) as i64 * 100;
                feed.add(seqno, id, side, qty, symbol, price);
            }
            0x2f => {
                // AddOrderExpanded
                let id = le_u64(buf, 6);
                let side = side_of(buf[14]);
                let qty = le_u32(buf, 15) as i64;
                let symbol = symbol8(buf, 19);
                let price = le_u64(buf, 27) as i64;
                feed.add(seqno, id, side, qty, symbol, price);
            }
            0x23 => {
                // OrderExecuted
                let id = le_u64(buf, 6);
                let qty = le_u32(buf, 14) as i64;
                feed.executed(seqno, id, qty);
            }
            0x24 => {
                // OrderExecutedAtPriceSize
                let id = le_u64(buf, 6);
                let qty = le_u32(buf, 14) as i64;
                let leaves_qty = le_u32(buf, 18) as i64;
                let price = le_u64(buf, 30) as i64;
                feed.executed_at_price_size(seqno, id, qty, leaves_qty, price);
            }
            0x25 => {
                // OrderReduceLong
                let id = le_u64(buf, 6);
                let qty = le_u32(buf, 14) as i64;
                feed.reduce(seqno, id, qty);
            }
            0x26 => {
                // OrderReduceShort
                let id = le_u64(buf, 6);
                let qty = le_u16(buf, 14) as i64;
                feed.reduce(seqno, id, qty);
            }
            0x27 => {
                // OrderModifyLong
                let id = le_u64(buf, 6);
                let qty = le_u32(buf, 14) as i64;
                let price = le_u64(buf, 18) as i64;
                feed.modify(seqno, id, qty, price);
            }
            0x28 => {
                // OrderModifyShort
                let id = le_u64(buf, 6);
                let qty = le_u16(buf, 14) as i64;
                let price = le_u16(buf, 16) as i64 * 100;
                feed.modify(seqno, id, qty, price);
            }
            0x29 => {
                // OrderDelete
                let id = le_u64(buf, 6);
                feed.delete(seqno, id);
            }
            0x2a => {
                // TradeLong
                let qty = le_u32(buf, 15) as i64;
                let symbol = symbol6(buf, 19);
                let price = le_u64(buf, 25) as i64;
                feed.trade(seqno, qty, symbol, price);
            }
            0x2b => {
                // TradeShort
                let qty = le_u16(buf, 15) as i64;
                let symbol = symbol6(buf, 17);
                let price = le_u16(buf, 23) as i64 * 100;
                feed.trade(seqno, qty, symbol, price);
            }
            0x30 => {
                // TradeExpanded
                let qty = le_u32(buf, 15) as i64;
                let symbol = symbol8(buf, 19);
                let price = le_u64(buf, 27) as i64;
                feed.trade(seqno, qty, symbol, price);
            }
            _ => {
                // Unrecognized message type: skip, same policy as ITCH 5.0.
            }
        }
        len
    }

    /// Decodes every self-delimited message in `buf`, assigning sequence
    /// numbers `0, 1, 2, ...` in stream order. Mirrors the original's
    /// `ParseStream`, which has no packet-level sequence counter to draw
    /// from.
    pub fn parse_many<H: Handler>(&self, mut buf: &[u8], feed: &mut Feed<H>) {
        let mut seqno = 0;
        while !buf.is_empty() {
            let len = buf[0] as usize;
            if buf.len() < len {
                break;
            }
            self.parse_message(seqno, &buf[..len], feed);
            buf = &buf[len..];
            seqno += 1;
        }
    }

    /// Decodes one PITCH packet: an 8-byte header (`len: u16`, `count: u8`,
    /// one reserved byte, `seqno: u32`, native/little-endian like every other
    /// field in this file — the original's `read32` never byte-swaps)
    /// followed by `count` self-delimited messages, the i-th of which is
    /// attributed sequence number `base_seqno + i`.
    pub fn parse_packet<H: Handler>(&self, buf: &[u8], feed: &mut Feed<H>) {
        if buf.len() < 8 {
            return;
        }
        let base_seqno = le_u32(buf, 4) as Seqno;
        let mut rest = &buf[8..];
        let mut i = 0;
        while !rest.is_empty() {
            let len = rest[0] as usize;
            if rest.len() < len {
                break;
            }
            self.parse_message(base_seqno + i, &rest[..len], feed);
            rest = &rest[len..];
            i += 1;
        }
    }
}

#[inline]
fn side_of(byte: u8) -> Side {
    if byte == b'B' {
        Side::Buy
    } else {
        Side::Sell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::OrderBook;
    use crate::types::{encode_symbol, Qty};

    #[derive(Default)]
    struct Counter {
        quotes: u32,
        trades: u32,
    }
    impl Handler for Counter {
        fn on_quote(&mut self, _book: &OrderBook, _top_changed: bool) {
            self.quotes += 1;
        }
        fn on_trade(&mut self, _book: &OrderBook, _qty: Qty, _price: i64, _top_changed: bool) {
            self.trades += 1;
        }
    }

    // Byte-exact fixtures mirror pitch_test.cpp's literal arrays.
    fn add_long(id: u64, side: u8, qty: u32, symbol: &[u8; 6], price: u64) -> Vec<u8> {
        let mut m = vec![0u8; 33];
        m[0] = 33;
        m[1] = 0x21;
        m[6..14].copy_from_slice(&id.to_le_bytes());
        m[14] = side;
        m[15..19].copy_from_slice(&qty.to_le_bytes());
        m[19..25].copy_from_slice(symbol);
        m[25..33].copy_from_slice(&price.to_le_bytes());
        m
    }

    #[test]
    fn add_long_message_is_little_endian_except_symbol() {
        let parser = PitchParser;
        let mut feed = Feed::new(Counter::default(), 16, true, true);
        let msg = add_long(1, b'B', 100, b"AAPL  ", 1);
        let consumed = parser.parse_message(0, &msg, &mut feed);
        assert_eq!(consumed, 33);
        assert_eq!(feed.size(), 1);

        let book_id = feed.subscribe("AAPL", 0);
        assert_eq!(feed.book(book_id).best_price(), crate::book::BestPrice {
            bidqty: 100,
            bid: 1,
            ask: 0,
            askqty: 0,
        });
    }

    #[test]
    fn add_short_price_is_scaled_by_100() {
        let parser = PitchParser;
        let mut feed = Feed::new(Counter::default(), 16, true, true);
        let mut m = vec![0u8; 25];
        m[0] = 25;
        m[1] = 0x22;
        m[6..14].copy_from_slice(&1u64.to_le_bytes());
        m[14] = b'B';
        m[15..17].copy_from_slice(&10u16.to_le_bytes());
        m[17..23].copy_from_slice(b"AAPL  ");
        m[23..25].copy_from_slice(&5u16.to_le_bytes());
        parser.parse_message(0, &m, &mut feed);

        let book_id = feed.subscribe("AAPL", 0);
        assert_eq!(feed.book(book_id).best_price().bid, 500);
    }

    #[test]
    fn executed_at_price_size_reduces_by_delta_and_reports_new_price() {
        let parser = PitchParser;
        let mut feed = Feed::new(Counter::default(), 16, true, true);
        let add = add_long(1, b'B', 100, b"AAPL  ", 1);
        parser.parse_message(0, &add, &mut feed);

        let mut m = vec![0u8; 38];
        m[0] = 38;
        m[1] = 0x24;
        m[6..14].copy_from_slice(&1u64.to_le_bytes());
        m[14..18].copy_from_slice(&30u32.to_le_bytes()); // qty traded
        m[18..22].copy_from_slice(&70u32.to_le_bytes()); // leaves_qty
        m[30..38].copy_from_slice(&2u64.to_le_bytes()); // trade price
        parser.parse_message(1, &m, &mut feed);

        let book_id = feed.subscribe("AAPL", 0);
        assert_eq!(feed.book(book_id).best_price().bidqty, 70);
        assert_eq!(feed.book(book_id).best_price().bid, 1); // resting price unchanged
    }

    #[test]
    fn unknown_message_type_is_skipped_using_its_own_length_byte() {
        let parser = PitchParser;
        let mut feed = Feed::new(Counter::default(), 16, true, true);
        let m = [5u8, 0xee, 0, 0, 0];
        let consumed = parser.parse_message(0, &m, &mut feed);
        assert_eq!(consumed, 5);
    }

    #[test]
    fn trade_expanded_does_not_touch_resting_orders() {
        let parser = PitchParser;
        let mut feed = Feed::new(Counter::default(), 16, true, true);
        feed.subscribe("AAPL", 0);
        let symbol = encode_symbol("AAPL");
        let mut m = vec![0u8; 35];
        m[0] = 35;
        m[1] = 0x30;
        m[15..19].copy_from_slice(&50u32.to_le_bytes());
        m[19..27].copy_from_slice(&symbol.to_be_bytes());
        m[27..35].copy_from_slice(&3u64.to_le_bytes());
        parser.parse_message(0, &m, &mut feed);
        assert_eq!(feed.size(), 0);
    }

    #[test]
    fn parse_packet_assigns_base_seqno_plus_index() {
        let parser = PitchParser;
        let mut feed = Feed::new(Counter::default(), 16, true, true);
        let m1 = add_long(1, b'B', 100, b"AAPL  ", 1);
        let m2 = add_long(2, b'S', 50, b"AAPL  ", 2);

        let mut packet = vec![0u8; 8];
        let total_len = (8 + m1.len() + m2.len()) as u16;
        packet[0..2].copy_from_slice(&total_len.to_le_bytes());
        packet[2] = 2; // count
        packet[4..8].copy_from_slice(&100u32.to_le_bytes()); // base seqno
        packet.extend_from_slice(&m1);
        packet.extend_from_slice(&m2);

        parser.parse_packet(&packet, &mut feed);
        assert_eq!(feed.size(), 2);
    }

    #[test]
    fn parse_packet_decodes_base_seqno_as_little_endian() {
        let parser = PitchParser;
        let mut feed = Feed::new(Counter::default(), 16, true, true);
        let book_id = feed.subscribe("AAPL", 0);

        // A resting ask stamped with a large, known seqno.
        feed.add(1000, 100, Side::Sell, 50, encode_symbol("AAPL"), 5);

        // A crossing bid delivered in a packet whose base_seqno field is
        // `5` under the correct little-endian decoding, but a much larger
        // value (0x0500_0000) if the field were mistakenly byte-swapped.
        let m = add_long(1, b'B', 10, b"AAPL  ", 10);
        let mut packet = vec![0u8; 8];
        let total_len = (8 + m.len()) as u16;
        packet[0..2].copy_from_slice(&total_len.to_le_bytes());
        packet[2] = 1; // count
        packet[4..8].copy_from_slice(&5u32.to_le_bytes()); // base seqno
        packet.extend_from_slice(&m);

        parser.parse_packet(&packet, &mut feed);
        assert!(feed.book(book_id).is_crossed());

        feed.book_mut(book_id).uncross();
        // Correctly decoded, the new bid's seqno (5) is staler than the
        // resting ask's (1000), so uncross discards the bid and the ask
        // survives. A byte-swapped decode would invert which side wins.
        assert_eq!(feed.book(book_id).best_price().ask, 5);
        assert_eq!(feed.book(book_id).best_price().askqty, 50);
        assert_eq!(feed.book(book_id).best_price().bid, 0);
    }

    #[test]
    fn parse_many_walks_self_delimited_messages() {
        let parser = PitchParser;
        let mut feed = Feed::new(Counter::default(), 16, true, true);
        let mut stream = Vec::new();
        stream.extend_from_slice(&add_long(1, b'B', 100, b"AAPL  ", 1));
        stream.extend_from_slice(&add_long(2, b'S', 50, b"AAPL  ", 2));
        parser.parse_many(&stream, &mut feed);
        assert_eq!(feed.size(), 2);
    }
}
