//! `Feed`: the session object owning the universe of books and the global
//! order-id table, exposing protocol-neutral operations that Parsers call
//! into.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::book::OrderBook;
use crate::hash::MixBuildHasher;
use crate::types::{encode_symbol_bytes, BookId, Id, Order, Price, Qty, Seqno, Side, Symbol};

/// Upper bound on the number of books a `Feed` will create on the fly when
/// `all_books` is set. Matches the `int16_t` book-index range the original
/// C++ feed used (`NOBOOK == MAXBOOK == i16::MAX`-sized).
pub const MAX_BOOKS: usize = 1 << 16;

/// The sole output of a `Feed`: synchronous callbacks for book-modifying and
/// trade events.
///
/// Callbacks run on the decoder thread and must not reenter the `Feed` that
/// invoked them.
pub trait Handler {
    /// A book-modifying event occurred. `top_changed` is true iff the event
    /// altered top-of-book on either side.
    fn on_quote(&mut self, book: &OrderBook, top_changed: bool);
    /// A trade occurred, possibly alongside a book modification.
    fn on_trade(&mut self, book: &OrderBook, qty: Qty, price: Price, top_changed: bool);
}

/// Owns every book and order for one decoding session.
///
/// Not safe for concurrent mutation: all parser callbacks, book mutations
/// and handler invocations run synchronously on the caller's thread.
/// Disjoint `Feed`s on disjoint inputs may run in parallel with no
/// coordination.
pub struct Feed<H: Handler> {
    handler: H,
    books: Vec<OrderBook>,
    symbols: HashMap<Symbol, BookId, MixBuildHasher>,
    orders: HashMap<Id, Order, MixBuildHasher>,
    all_orders: bool,
    all_books: bool,
    size_hint: usize,
    hint_exceeded: bool,
}

impl<H: Handler> Feed<H> {
    /// `size_hint` preallocates the order table to avoid rehashing on the
    /// hot path; exceeding it degrades latency rather than correctness and
    /// is logged once via `tracing::warn!`.
    pub fn new(handler: H, size_hint: usize, all_orders: bool, all_books: bool) -> Self {
        Self {
            handler,
            books: Vec::new(),
            symbols: HashMap::with_capacity_and_hasher(4096, MixBuildHasher::default()),
            orders: HashMap::with_capacity_and_hasher(size_hint, MixBuildHasher::default()),
            all_orders,
            all_books,
            size_hint,
            hint_exceeded: false,
        }
    }

    /// Current number of live resting orders.
    pub fn size(&self) -> usize {
        self.orders.len()
    }

    /// Read-only access to a book by handle.
    pub fn book(&self, id: BookId) -> &OrderBook {
        &self.books[id.index()]
    }

    /// Mutable access to a book by handle, for tests that need to drive
    /// `OrderBook::uncross` directly (not part of any `Feed` operation —
    /// see spec's note that cross resolution isn't invoked on the hot path).
    #[cfg(test)]
    pub(crate) fn book_mut(&mut self, id: BookId) -> &mut OrderBook {
        &mut self.books[id.index()]
    }

    /// Borrows the handler, mirroring the original C++ feed holding its
    /// handler by reference rather than by value — callers that want to
    /// inspect accumulated handler state (a test recorder, a metrics
    /// counter) can do so without `Feed` needing to know its shape.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutable access to the handler, e.g. to reset accumulated state
    /// between logical sections of a single decoding session.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Registers (or looks up) the book for an instrument.
    ///
    /// If the symbol is already known, returns the existing book's handle
    /// and ignores `user_data` — the second `subscribe` of the same
    /// instrument does not reset it.
    pub fn subscribe(&mut self, instrument: &str, user_data: u64) -> BookId {
        let symbol = encode_symbol_bytes(instrument.as_bytes());
        if let Some(&id) = self.symbols.get(&symbol) {
            return id;
        }
        let id = self.push_book(symbol, user_data);
        id
    }

    fn push_book(&mut self, symbol: Symbol, user_data: u64) -> BookId {
        let id = BookId(self.books.len() as u32);
        self.books.push(OrderBook::new(user_data));
        self.symbols.insert(symbol, id);
        id
    }

    fn note_size(&mut self) {
        if !self.hint_exceeded && self.orders.len() > self.size_hint {
            self.hint_exceeded = true;
            tracing::warn!(
                size_hint = self.size_hint,
                actual = self.orders.len(),
                "order table exceeded size_hint; increase it to avoid rehashing on the hot path"
            );
        }
    }

    /// Inserts a new resting order and, if it lands on a tracked book,
    /// applies it and fires `on_quote`.
    ///
    /// An unknown symbol is handled per the `all_books`/`all_orders` flags
    /// (see module docs); a duplicate `id` is dropped without touching any
    /// book; `qty <= 0` reaches `OrderBook::add`, which itself no-ops.
    pub fn add(&mut self, seqno: Seqno, id: Id, side: Side, qty: Qty, symbol: Symbol, price: Price) {
        let book_id = match self.symbols.get(&symbol).copied() {
            Some(book_id) => book_id,
            None => {
                if !self.all_books {
                    if self.all_orders {
                        self.orders.entry(id).or_insert(Order {
                            price,
                            qty,
                            side,
                            book_id: None,
                        });
                        self.note_size();
                    }
                    return;
                }
                if self.books.len() >= MAX_BOOKS {
                    return;
                }
                self.push_book(symbol, 0)
            }
        };

        match self.orders.entry(id) {
            Entry::Occupied(_) => {
                // Duplicate order id: drop the event, don't touch the book.
            }
            Entry::Vacant(slot) => {
                slot.insert(Order {
                    price,
                    qty,
                    side,
                    book_id: Some(book_id),
                });
                let book = &mut self.books[book_id.index()];
                let top = book.add(seqno, side, price, qty);
                self.handler.on_quote(book, top);
            }
        }
        self.note_size();
    }

    /// Reduces the resting order's level by `qty` at its own resting price
    /// and fires `on_trade` with that price.
    pub fn executed(&mut self, seqno: Seqno, id: Id, qty: Qty) {
        let Some(order) = self.orders.get_mut(&id) else {
            return;
        };
        if let Some(book_id) = order.book_id {
            let price = order.price;
            let side = order.side;
            let book = &mut self.books[book_id.index()];
            let top = book.reduce(seqno, side, price, qty);
            self.handler.on_trade(book, qty, price, top);
        }
        order.qty -= qty;
        if order.qty <= 0 {
            self.orders.remove(&id);
        }
    }

    /// Like `executed`, but the trade's printed `price` (reported to the
    /// handler) may differ from the order's resting price (used to reduce
    /// the level).
    pub fn executed_at_price(&mut self, seqno: Seqno, id: Id, qty: Qty, price: Price) {
        let Some(order) = self.orders.get_mut(&id) else {
            return;
        };
        if let Some(book_id) = order.book_id {
            let resting_price = order.price;
            let side = order.side;
            let book = &mut self.books[book_id.index()];
            let top = book.reduce(seqno, side, resting_price, qty);
            self.handler.on_trade(book, qty, price, top);
        }
        order.qty -= qty;
        if order.qty <= 0 {
            self.orders.remove(&id);
        }
    }

    /// The exchange reports a trade of `qty` and the order's surviving
    /// `leaves_qty`. If the implied `delta = old_qty - leaves_qty` is
    /// positive, the level is reduced by it; if negative, the level is
    /// *increased* by `-delta` at the resting price to reconcile with the
    /// exchange's corrected `leaves_qty`.
    ///
    /// This upward correction is unusual (see spec's open question on this
    /// message) but is exactly what the original feed does, under the same
    /// `seqno`, and is reproduced here rather than guessing an alternate
    /// intent.
    pub fn executed_at_price_size(
        &mut self,
        seqno: Seqno,
        id: Id,
        qty: Qty,
        leaves_qty: Qty,
        price: Price,
    ) {
        let Some(order) = self.orders.get_mut(&id) else {
            return;
        };
        let delta = order.qty - leaves_qty;
        if let Some(book_id) = order.book_id {
            let resting_price = order.price;
            let side = order.side;
            let book = &mut self.books[book_id.index()];
            let top = if delta > 0 {
                book.reduce(seqno, side, resting_price, delta)
            } else {
                book.add(seqno, side, resting_price, -delta)
            };
            self.handler.on_trade(book, qty, price, top);
        }
        order.qty = leaves_qty;
        if order.qty <= 0 {
            self.orders.remove(&id);
        }
    }

    /// Reduces the resting order (and its book level, if any) by `qty` and
    /// fires `on_quote`.
    pub fn reduce(&mut self, seqno: Seqno, id: Id, qty: Qty) {
        let Some(order) = self.orders.get_mut(&id) else {
            return;
        };
        if let Some(book_id) = order.book_id {
            let price = order.price;
            let side = order.side;
            let book = &mut self.books[book_id.index()];
            let top = book.reduce(seqno, side, price, qty);
            self.handler.on_quote(book, top);
        }
        order.qty -= qty;
        if order.qty <= 0 {
            self.orders.remove(&id);
        }
    }

    /// Removes the resting order entirely (and its full remaining quantity
    /// from its book, if any), firing `on_quote` unconditionally.
    pub fn delete(&mut self, seqno: Seqno, id: Id) {
        let Some(order) = self.orders.get(&id) else {
            return;
        };
        let (book_id, price, side, qty) = (order.book_id, order.price, order.side, order.qty);
        if let Some(book_id) = book_id {
            let book = &mut self.books[book_id.index()];
            let top = book.reduce(seqno, side, price, qty);
            self.handler.on_quote(book, top);
        }
        self.orders.remove(&id);
    }

    /// Renames an order: removes the level at its old price, adds a level
    /// at the new price/qty on the same book and side, and re-homes it
    /// under `new_id`. Fires a single `on_quote` whose `top_changed` flag is
    /// the OR of the two mutations — the book mutates reduce-then-add, so a
    /// transient top-of-book empty is possible mid-event; callers should
    /// treat the composite flag as authoritative rather than diffing
    /// before/after themselves.
    ///
    /// If `new_id` already names a live order, that entry is left untouched
    /// (no overwrite) rather than replaced.
    pub fn replace(&mut self, seqno: Seqno, id: Id, new_id: Id, qty: Qty, price: Price) {
        let Some(order) = self.orders.remove(&id) else {
            return;
        };
        if let Some(book_id) = order.book_id {
            let book = &mut self.books[book_id.index()];
            let top1 = book.reduce(seqno, order.side, order.price, order.qty);
            let top2 = book.add(seqno, order.side, price, qty);
            self.handler.on_quote(book, top1 || top2);
        }
        self.orders.entry(new_id).or_insert(Order {
            price,
            qty,
            side: order.side,
            book_id: order.book_id,
        });
        self.note_size();
    }

    /// Like `replace` but keeps the same id: reduces the old level, adds
    /// the new one, and erases the order if the new `qty <= 0`.
    pub fn modify(&mut self, seqno: Seqno, id: Id, qty: Qty, price: Price) {
        let Some(order) = self.orders.get_mut(&id) else {
            return;
        };
        if let Some(book_id) = order.book_id {
            let old_price = order.price;
            let old_qty = order.qty;
            let side = order.side;
            let book = &mut self.books[book_id.index()];
            let top1 = book.reduce(seqno, side, old_price, old_qty);
            let top2 = book.add(seqno, side, price, qty);
            self.handler.on_quote(book, top1 || top2);
        }
        order.price = price;
        order.qty = qty;
        if order.qty <= 0 {
            self.orders.remove(&id);
        }
    }

    /// Symbol-addressed trade print, not order-addressed: the book is never
    /// touched, so `top_changed` is always false.
    pub fn trade(&mut self, _seqno: Seqno, qty: Qty, symbol: Symbol, price: Price) {
        if let Some(&book_id) = self.symbols.get(&symbol) {
            let book = &self.books[book_id.index()];
            self.handler.on_trade(book, qty, price, false);
        }
    }
}
