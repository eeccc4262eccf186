//! Shared scalar types and the symbol-encoding rule used by every component.

/// Signed price. 64-bit everywhere internally, even where a wire format
/// only carries 32 bits, to avoid overflow when levels aggregate quantity.
pub type Price = i64;
/// Signed quantity (shares/lots).
pub type Qty = i64;
/// Exchange-assigned order id ("ref"), unique within a session.
pub type Id = u64;
/// Big-endian-packed, space-padded 8-byte ticker.
pub type Symbol = u64;
/// Monotonically increasing event sequence number.
pub type Seqno = u64;

/// Buy or sell, for both a resting order and a book side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

/// Stable handle into `Feed`'s book table.
///
/// Replaces the raw pointer the original C++ `Order` stores: `Feed` owns a
/// `Vec<OrderBook>` that only ever grows, so an index is just as stable and
/// safe to hold onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookId(pub(crate) u32);

impl BookId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A live resting order tracked by `Feed`.
///
/// `book_id` is absent when the order belongs to an instrument the session
/// isn't tracking (see `Feed::add`'s `all_books`/`all_orders` policy); such
/// orders still occupy a slot in the order table so later executions and
/// cancels against the same id resolve without error.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Order {
    pub price: Price,
    pub qty: Qty,
    pub side: Side,
    pub book_id: Option<BookId>,
}

/// Encodes an ASCII ticker (1-8 bytes) as the big-endian numeric symbol used
/// to key `Feed`'s symbol table.
///
/// Shorter tickers are right-padded with spaces to 8 bytes before being
/// read as a big-endian `u64`, so `encode_symbol("A") == encode_symbol("A
/// ")` and `encode_symbol("AAPL")` treats the first `A` as the most
/// significant byte. Tickers longer than 8 bytes are truncated to their
/// first 8 bytes, matching the wire decoders' fixed-width symbol fields.
pub fn encode_symbol(ticker: &str) -> Symbol {
    encode_symbol_bytes(ticker.as_bytes())
}

pub(crate) fn encode_symbol_bytes(bytes: &[u8]) -> Symbol {
    let mut buf = [b' '; 8];
    let n = bytes.len().min(8);
    buf[..n].copy_from_slice(&bytes[..n]);
    u64::from_be_bytes(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_ticker_pads_with_spaces() {
        assert_eq!(encode_symbol("A"), encode_symbol("A       "));
        assert_eq!(encode_symbol(""), encode_symbol("        "));
    }

    #[test]
    fn big_endian_packing() {
        // 'A' (0x41) must land in the most significant byte.
        let expect = 0x4141504C_20202020u64; // "AAPL    "
        assert_eq!(encode_symbol("AAPL"), expect);
    }

    #[test]
    fn distinct_tickers_differ() {
        assert_ne!(encode_symbol("AAPL"), encode_symbol("MSFT"));
    }
}
