//! Direct test of the unresolved corner of PITCH's ExecutedAtPriceSize: a
//! `leaves_qty` larger than the order's current resting quantity (the
//! exchange correcting the size upward) grows the book level rather than
//! erroring or being clamped to zero.

use orderbook::{BestPrice, Feed, Handler, OrderBook, PitchParser, Price, Qty};

#[derive(Default)]
struct Recorder {
    bp: BestPrice,
}

impl Handler for Recorder {
    fn on_quote(&mut self, book: &OrderBook, _top_changed: bool) {
        self.bp = book.best_price();
    }
    fn on_trade(&mut self, book: &OrderBook, _qty: Qty, _price: Price, _top_changed: bool) {
        self.bp = book.best_price();
    }
}

#[test]
fn leaves_qty_above_resting_qty_grows_the_level() {
    let parser = PitchParser;
    let mut feed = Feed::new(Recorder::default(), 16, false, false);
    feed.subscribe("A", 0);

    let addl: [u8; 34] = [
        34, 0x21, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, b'B', 25, 0, 0, 0, b'A', b' ', b' ', b' ',
        b' ', b' ', 1, 0, 0, 0, 0, 0, 0, 0, 0,
    ];
    parser.parse_message(0, &addl, &mut feed);
    assert_eq!(feed.handler().bp.bidqty, 25);

    // qty traded = 1, leaves_qty = 30 (> the 25 resting): corrected upward.
    let execps: [u8; 38] = [
        38, 0x24, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 30, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 1, 0, 0, 0, 0, 0, 0, 0,
    ];
    parser.parse_message(1, &execps, &mut feed);

    assert_eq!(feed.handler().bp.bidqty, 30);
    assert_eq!(feed.handler().bp.bid, 1);
}
