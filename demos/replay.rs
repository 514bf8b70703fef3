//! Command-replay driver: reads a script of `action,id,type,size,price`
//! lines and drives an `OrderBook`, printing the book after each line.
//!
//! The idiomatic-Rust analogue of `BuildOrderBookFromFile` +
//! `OrderBook::Print()` in `examples/original_source/orderbook_test.cpp`.
//! Lives outside the library crate's public API (spec.md §1: the driver
//! is an external collaborator, not a core concern) and only reaches the
//! core through `OrderBook`'s public operations.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use orderbook_core::orderbook::replay::{apply, parse_script};
use orderbook_core::{BookConfig, OrderBook, OrderIdComparator};
use tracing::{error, info};

#[derive(Parser)]
#[command(about = "Replay a command file against an order book")]
struct Args {
    /// Path to a command-replay file. Reads from stdin if omitted.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Initial tick price.
    #[arg(short, long, default_value_t = 1)]
    tick_price: i32,

    /// Order-id comparator: "string" or "int".
    #[arg(short, long, default_value = "int")]
    comparator: String,

    /// Initial ring-buffer size per side.
    #[arg(long, default_value_t = 10)]
    initial_size: usize,

    /// Growth step size per side.
    #[arg(long, default_value_t = 10)]
    step_size: usize,
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let comparator = match args.comparator.as_str() {
        "int" => OrderIdComparator::LexInteger,
        _ => OrderIdComparator::LexString,
    };

    let mut book = OrderBook::new(BookConfig {
        tick_price: args.tick_price,
        comparator,
        initial_size: args.initial_size,
        step_size: args.step_size,
    });

    let script = match &args.file {
        Some(path) => fs::read_to_string(path).unwrap_or_else(|err| {
            error!(path = %path.display(), %err, "failed to read replay file");
            std::process::exit(1);
        }),
        None => std::io::read_to_string(std::io::stdin()).unwrap_or_default(),
    };

    for parsed in parse_script(&script) {
        let op = match parsed {
            Ok(op) => op,
            Err(err) => {
                error!(%err, "skipping malformed line");
                continue;
            }
        };
        info!(?op, "running");
        if let Err(err) = apply(&mut book, op) {
            error!(%err, "operation rejected");
        }
        print!("{}", book.print());
    }
}
