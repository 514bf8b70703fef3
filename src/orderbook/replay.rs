//! Parser for the command-replay format described in spec.md §6.
//!
//! This is test tooling, not a core dependency: `OrderBook` never imports
//! this module's types. It exists so the textual scenarios from
//! spec.md §8 and `examples/original_source/orderbook_test.cpp`'s
//! `BuildOrderBookFromFile` can be expressed as data (one line per
//! operation) instead of hand-written call sequences, and so the demo
//! binary (`demos/replay.rs`) can drive a book from a file the same way
//! the original C++ driver did.
//!
//! Format: one operation per line, comma-separated fields
//! `action,id,type,size,price` where `action` is `A` (add), `X` (cancel),
//! or `T` (retick — ignores `id`/`type`/`size`, uses `price` as the new
//! tick). `type` is `S` (ask) or `B` (bid). Lines starting with `#`, and
//! blank lines, are ignored.

use std::fmt;

use super::book::OrderBook;
use super::error::OrderBookError;
use super::types::{Order, OrderId, OrderSide};

/// One parsed command-replay line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayOp {
    /// `A,id,type,size,price` — add an order.
    Add(Order),
    /// `X,id,type,size,price` — cancel by id and side (`size`/`price` unused).
    Cancel {
        /// The id to cancel.
        id: OrderId,
        /// The side it rests on.
        side: OrderSide,
    },
    /// `T,id,type,size,price` — set a new tick price (only `price` is used).
    Retick {
        /// The requested new tick price.
        new_tick: i32,
    },
}

/// A line that could not be parsed as a replay command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayParseError {
    /// The offending line, verbatim.
    pub line: String,
    /// Human-readable description of the problem.
    pub reason: String,
}

impl fmt::Display for ReplayParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed replay line {:?}: {}", self.line, self.reason)
    }
}

impl std::error::Error for ReplayParseError {}

fn parse_side(raw: &str) -> Result<OrderSide, String> {
    match raw {
        "S" => Ok(OrderSide::Ask),
        "B" => Ok(OrderSide::Bid),
        other => Err(format!("invalid order type {other:?}, expected S or B")),
    }
}

/// Parse a single line, or `None` if it should be ignored (blank, or
/// starting with `#`).
pub fn parse_line(raw: &str) -> Option<Result<ReplayOp, ReplayParseError>> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    Some(parse_fields(line).map_err(|reason| ReplayParseError {
        line: raw.to_string(),
        reason,
    }))
}

fn parse_fields(line: &str) -> Result<ReplayOp, String> {
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() != 5 {
        return Err(format!("expected 5 comma-separated fields, got {}", parts.len()));
    }
    let [action, id, side, size, price] = [parts[0], parts[1], parts[2], parts[3], parts[4]];

    let price: i32 = price
        .parse()
        .map_err(|_| format!("invalid price {price:?}"))?;

    match action {
        "A" => {
            let side = parse_side(side)?;
            let size: i32 = size.parse().map_err(|_| format!("invalid size {size:?}"))?;
            Ok(ReplayOp::Add(Order::new(id, side, price, size)))
        }
        "X" => {
            let side = parse_side(side)?;
            Ok(ReplayOp::Cancel {
                id: OrderId::from(id),
                side,
            })
        }
        "T" => Ok(ReplayOp::Retick { new_tick: price }),
        other => Err(format!("invalid action {other:?}, expected A, X, or T")),
    }
}

/// Parse every non-ignored line of a multi-line script.
pub fn parse_script(script: &str) -> Vec<Result<ReplayOp, ReplayParseError>> {
    script.lines().filter_map(parse_line).collect()
}

/// Apply one parsed operation to `book`.
pub fn apply(book: &mut OrderBook, op: ReplayOp) -> Result<(), OrderBookError> {
    match op {
        ReplayOp::Add(order) => book.add_order(order),
        ReplayOp::Cancel { id, side } => book.delete_order(&id, side),
        ReplayOp::Retick { new_tick } => book.reset_tick_price(new_tick),
    }
}
