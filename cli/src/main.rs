use std::fs::File;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use memmap2::Mmap;
use orderbook::{Feed, Handler, Itch41Parser, Itch50Parser, OrderBook, PitchParser, Price, Qty};
use tracing::info;

#[derive(Parser)]
#[command(name = "orderbook-cli")]
#[command(about = "Replay a market-data file through the book reconstructor")]
struct Cli {
    /// Wire protocol the file is encoded in.
    #[arg(long, value_enum)]
    protocol: Protocol,
    /// Path to the market-data file, mapped read-only.
    file: PathBuf,
    /// Print a running best-bid/offer line for every quote event.
    #[arg(long)]
    print_quotes: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Protocol {
    Itch41,
    Itch50,
    Pitch,
}

struct Summary {
    quotes: u64,
    trades: u64,
    print_quotes: bool,
}

impl Handler for Summary {
    fn on_quote(&mut self, book: &OrderBook, top_changed: bool) {
        self.quotes += 1;
        if self.print_quotes && top_changed {
            let bp = book.best_price();
            println!("quote  bid={}@{} ask={}@{}", bp.bidqty, bp.bid, bp.askqty, bp.ask);
        }
    }

    fn on_trade(&mut self, _book: &OrderBook, qty: Qty, price: Price, _top_changed: bool) {
        self.trades += 1;
        if self.print_quotes {
            println!("trade  {qty}@{price}");
        }
    }
}

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let file = File::open(&cli.file)?;
    let mmap = unsafe { Mmap::map(&file)? };

    let summary = Summary {
        quotes: 0,
        trades: 0,
        print_quotes: cli.print_quotes,
    };
    let mut feed = Feed::new(summary, 1 << 16, true, true);

    match cli.protocol {
        Protocol::Itch41 => Itch41Parser.parse_many(&mmap, &mut feed),
        Protocol::Itch50 => Itch50Parser.parse_many(&mmap, &mut feed),
        Protocol::Pitch => PitchParser.parse_many(&mmap, &mut feed),
    }

    info!(orders = feed.size(), "replay complete");
    Ok(())
}
