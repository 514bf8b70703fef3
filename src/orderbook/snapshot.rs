//! Serializable point-in-time view of an [`OrderBook`](super::book::OrderBook).
//!
//! Grounded on the teacher crate's `snapshot.rs` / `serde_json` dependency:
//! a plain serde-derived struct that mirrors `print`'s textual contract
//! (spec.md §6) but in a machine-readable shape, useful for tests (P9) and
//! for callers that want to render the book themselves.

use serde::{Deserialize, Serialize};

use super::book::OrderBook;
use super::types::OrderSide;

/// One non-empty price level: its price and its FIFO as `(size, id)` pairs,
/// head first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    /// Price of this level.
    pub price: i32,
    /// Resting orders at this price, in match order.
    pub orders: Vec<(i32, String)>,
}

/// One side's ring-buffer state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideSnapshot {
    /// Index of the best (most aggressive) slot, or `None` if empty.
    pub top: Option<usize>,
    /// Index of the worst resting slot, or `None` if empty.
    pub bottom: Option<usize>,
    /// Current ring-buffer length.
    pub current_size: usize,
    /// Every non-empty level, in `top`-to-`bottom` order.
    pub levels: Vec<LevelSnapshot>,
}

/// Snapshot of both sides plus the shared tick price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    /// Tick price in effect when the snapshot was taken.
    pub tick_price: i32,
    /// Ask (sell) side.
    pub ask: SideSnapshot,
    /// Bid (buy) side.
    pub bid: SideSnapshot,
}

impl OrderBook {
    /// Capture a serializable snapshot of the current book state.
    pub fn snapshot(&self) -> OrderBookSnapshot {
        OrderBookSnapshot {
            tick_price: self.tick_price(),
            ask: self.side_snapshot(OrderSide::Ask),
            bid: self.side_snapshot(OrderSide::Bid),
        }
    }

    fn side_snapshot(&self, side: OrderSide) -> SideSnapshot {
        let depth = self.depth(side);
        let (top, bottom) = depth.top_bottom();
        let levels = depth
            .iter_levels()
            .map(|(price, level)| LevelSnapshot {
                price,
                orders: level
                    .iter()
                    .map(|o| (o.size, o.id.as_str().to_string()))
                    .collect(),
            })
            .collect();
        SideSnapshot {
            top,
            bottom,
            current_size: depth.current_size(),
            levels,
        }
    }
}
