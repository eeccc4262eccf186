//! Per-instrument order book: two price-indexed sides, top-of-book queries,
//! and crossed-book resolution.

use crate::types::{Price, Qty, Seqno, Side};

/// Aggregate resting quantity at one price on one side.
///
/// `qty` stays `> 0` for as long as the level exists; `seqno` is the
/// sequence number of the most recent event that touched it, used only by
/// [`OrderBook::uncross`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    pub price: Price,
    pub qty: Qty,
    pub seqno: Seqno,
}

/// Top-of-book summary. A missing side reports a zero price and quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BestPrice {
    pub bidqty: Qty,
    pub bid: Price,
    pub ask: Price,
    pub askqty: Qty,
}

/// One side of a book: a flat, contiguous, price-sorted `Vec<Level>`.
///
/// A node-based tree loses to this at the depths real order books reach
/// (tens of levels) because top-of-book reads and near-top inserts
/// dominate; both are O(1)/O(log n) + a small memmove here instead of
/// pointer-chasing. Levels are kept sorted ascending by a signed priority
/// key (`-price` for the buy side, `price` for the sell side) so index 0 is
/// always top-of-book regardless of which side this is.
#[derive(Debug, Clone)]
struct BookSide {
    is_buy: bool,
    levels: Vec<Level>,
}

impl BookSide {
    fn new(is_buy: bool) -> Self {
        Self {
            is_buy,
            levels: Vec::new(),
        }
    }

    #[inline]
    fn key(&self, price: Price) -> i64 {
        if self.is_buy {
            -price
        } else {
            price
        }
    }

    fn locate(&self, price: Price) -> Result<usize, usize> {
        let target = self.key(price);
        self.levels
            .binary_search_by_key(&target, |l| self.key(l.price))
    }

    fn top(&self) -> Option<&Level> {
        self.levels.first()
    }

    fn pop_top(&mut self) {
        if !self.levels.is_empty() {
            self.levels.remove(0);
        }
    }

    /// Returns true iff this insertion is now at top of book.
    fn add(&mut self, seqno: Seqno, price: Price, qty: Qty) -> bool {
        if qty <= 0 {
            return false;
        }
        match self.locate(price) {
            Ok(idx) => {
                self.levels[idx].qty += qty;
                self.levels[idx].seqno = seqno;
                idx == 0
            }
            Err(idx) => {
                self.levels.insert(idx, Level { price, qty, seqno });
                idx == 0
            }
        }
    }

    /// Returns true iff the reduced level is at top of book.
    fn reduce(&mut self, seqno: Seqno, price: Price, qty: Qty) -> bool {
        let idx = match self.locate(price) {
            Ok(idx) => idx,
            Err(_) => return false,
        };
        let is_top = idx == 0;
        self.levels[idx].qty -= qty;
        self.levels[idx].seqno = seqno;
        if self.levels[idx].qty <= 0 {
            self.levels.remove(idx);
        }
        is_top
    }
}

/// Resting orders for a single instrument: a buy side and a sell side plus
/// an opaque caller-owned handle.
///
/// No invariant ties an `OrderBook` to a symbol once created; that mapping
/// lives entirely in `Feed`.
#[derive(Debug, Clone)]
pub struct OrderBook {
    buy: BookSide,
    sell: BookSide,
    /// Opaque handle the owner associated with this book at `subscribe`
    /// time (or `0` for books `Feed` created on the fly). Returned verbatim.
    pub user_data: u64,
}

impl OrderBook {
    pub(crate) fn new(user_data: u64) -> Self {
        Self {
            buy: BookSide::new(true),
            sell: BookSide::new(false),
            user_data,
        }
    }

    /// `qty <= 0` is a no-op returning false. Otherwise creates the level if
    /// absent or augments it, stamps `seqno`, and returns whether the
    /// (possibly new) level is now top of book for its side.
    pub fn add(&mut self, seqno: Seqno, side: Side, price: Price, qty: Qty) -> bool {
        match side {
            Side::Buy => self.buy.add(seqno, price, qty),
            Side::Sell => self.sell.add(seqno, price, qty),
        }
    }

    /// No-op returning false if no level exists at `price`. Otherwise
    /// decrements quantity, stamps `seqno`, deletes the level if it empties,
    /// and returns whether the affected level was top of book.
    pub fn reduce(&mut self, seqno: Seqno, side: Side, price: Price, qty: Qty) -> bool {
        match side {
            Side::Buy => self.buy.reduce(seqno, price, qty),
            Side::Sell => self.sell.reduce(seqno, price, qty),
        }
    }

    pub fn best_price(&self) -> BestPrice {
        let mut bp = BestPrice::default();
        if let Some(bid) = self.buy.top() {
            bp.bid = bid.price;
            bp.bidqty = bid.qty;
        }
        if let Some(ask) = self.sell.top() {
            bp.ask = ask.price;
            bp.askqty = ask.qty;
        }
        bp
    }

    /// True iff both sides are non-empty and the best bid is at or above
    /// the best ask.
    pub fn is_crossed(&self) -> bool {
        match (self.buy.top(), self.sell.top()) {
            (Some(bid), Some(ask)) => bid.price >= ask.price,
            _ => false,
        }
    }

    /// Repeatedly deletes the stale top level until the book is no longer
    /// crossed or a side empties.
    ///
    /// The level with the *smaller* stamped `seqno` is assumed stale and
    /// discarded (ties favor deleting the buy side) — the more recent
    /// message is assumed to reflect reality. Not on the hot path: a
    /// correctly-ordered gap-free stream should never cross.
    pub fn uncross(&mut self) {
        while let (Some(bid), Some(ask)) = (self.buy.top(), self.sell.top()) {
            if bid.price < ask.price {
                break;
            }
            if bid.seqno <= ask.seqno {
                self.buy.pop_top();
            } else {
                self.sell.pop_top();
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn bid_level_count(&self) -> usize {
        self.buy.levels.len()
    }

    #[cfg(test)]
    pub(crate) fn ask_level_count(&self) -> usize {
        self.sell.levels.len()
    }
}
