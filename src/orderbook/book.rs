//! Core `OrderBook` implementation composing the ask and bid `Depth` ladders.

use tracing::{debug, trace, warn};

use super::depth::Depth;
use super::error::OrderBookError;
use super::types::{Order, OrderId, OrderIdComparator, OrderSide};

/// Configuration bundle for [`OrderBook::new`], mirroring the constructor
/// arguments of spec.md §6's `new_book`.
#[derive(Debug, Clone, Copy)]
pub struct BookConfig {
    /// The price quantum; every order's price must be a multiple of this.
    pub tick_price: i32,
    /// Tie-break rule used within each price level.
    pub comparator: OrderIdComparator,
    /// Initial number of slots in each side's ring buffer.
    pub initial_size: usize,
    /// Granularity (in slots) of buffer growth.
    pub step_size: usize,
}

impl Default for BookConfig {
    fn default() -> Self {
        BookConfig {
            tick_price: 1,
            comparator: OrderIdComparator::LexString,
            initial_size: 1000,
            step_size: 1000,
        }
    }
}

/// A limit-order-book matching engine: one `Depth` per side plus the
/// shared tick price (spec.md §3).
///
/// Single-threaded and synchronous (spec.md §5) — wrap in an external
/// mutex to share across threads.
pub struct OrderBook {
    tick_price: i32,
    comparator: OrderIdComparator,
    ask: Depth,
    bid: Depth,
}

impl OrderBook {
    /// Build a new, empty order book.
    pub fn new(config: BookConfig) -> Self {
        OrderBook {
            tick_price: config.tick_price,
            comparator: config.comparator,
            ask: Depth::new(
                OrderSide::Ask,
                config.tick_price,
                config.initial_size,
                config.step_size,
            ),
            bid: Depth::new(
                OrderSide::Bid,
                config.tick_price,
                config.initial_size,
                config.step_size,
            ),
        }
    }

    /// The side matching a book-wide instance with all-default configuration.
    pub fn with_tick_price(tick_price: i32) -> Self {
        OrderBook::new(BookConfig {
            tick_price,
            ..BookConfig::default()
        })
    }

    pub(crate) fn depth(&self, side: OrderSide) -> &Depth {
        match side {
            OrderSide::Ask => &self.ask,
            OrderSide::Bid => &self.bid,
        }
    }

    fn depth_mut(&mut self, side: OrderSide) -> &mut Depth {
        match side {
            OrderSide::Ask => &mut self.ask,
            OrderSide::Bid => &mut self.bid,
        }
    }

    /// Best (most aggressive) resting price on `side`, if any.
    pub fn best_price(&self, side: OrderSide) -> Option<i32> {
        self.depth(side).best_price()
    }

    /// Whether `side`'s ladder holds zero orders.
    pub fn is_empty(&self, side: OrderSide) -> bool {
        self.depth(side).is_empty()
    }

    /// Current tick price shared by both ladders.
    pub fn tick_price(&self) -> i32 {
        self.tick_price
    }

    fn validate(&self, order: &Order) -> Result<(), OrderBookError> {
        if order.size <= 0 {
            return Err(OrderBookError::MalformedOrder {
                reason: format!("non-positive size {}", order.size),
            });
        }
        if order.id.as_str().is_empty() {
            return Err(OrderBookError::MalformedOrder {
                reason: "empty order id".to_string(),
            });
        }
        if order.price <= 0 || order.price % self.tick_price != 0 {
            return Err(OrderBookError::MalformedOrder {
                reason: format!(
                    "price {} is not a positive multiple of tick price {}",
                    order.price, self.tick_price
                ),
            });
        }
        Ok(())
    }

    /// Add an order to the book (spec.md §4.3). Matches against the
    /// opposite side first; any unfilled remainder rests on `order.side`.
    ///
    /// Boundary validation (non-positive size, empty id, misaligned
    /// price) rejects the order before it reaches either `Depth`
    /// (spec.md §7 `MalformedOrder`). A duplicate id resting on the same
    /// side is silently dropped by `Depth::add` and surfaced only as
    /// `Err(OrderBookError::DuplicateOrderId)` — the order book's state
    /// does not change.
    pub fn add_order(&mut self, mut order: Order) -> Result<(), OrderBookError> {
        if let Err(err) = self.validate(&order) {
            warn!(%err, "rejecting malformed order");
            return Err(err);
        }

        trace!(id = %order.id, side = %order.side, price = order.price, size = order.size, "adding order");

        let opposite = order.side.opposite();
        let consumed = self.depth_mut(opposite).match_against(&mut order);
        if consumed > 0 {
            debug!(id = %order.id, side = %order.side, consumed, "matched against opposite side");
        }

        if order.size > 0 {
            let side = order.side;
            let result = self.depth_mut(side).add(order, self.comparator);
            if let Err(ref err) = result {
                warn!(%err, "add rejected");
            }
            result
        } else {
            trace!("order fully consumed by matching");
            Ok(())
        }
    }

    /// Cancel a resting order, identified by `id` and `side`.
    ///
    /// Routes to the *same* side the order rests on — note that this is
    /// the opposite routing rule from `add_order`'s match step, which
    /// looks at the *opposite* side. This asymmetry is intentional
    /// (spec.md §9) and must not be "fixed" into symmetry with add.
    pub fn delete_order(&mut self, id: &OrderId, side: OrderSide) -> Result<(), OrderBookError> {
        let result = self.depth_mut(side).delete_order(id);
        if let Err(ref err) = result {
            warn!(%err, "delete rejected");
        } else {
            trace!(%id, %side, "order deleted");
        }
        result
    }

    /// Empty both ladders.
    pub fn clear(&mut self) {
        debug!("clearing order book");
        self.ask.clear();
        self.bid.clear();
    }

    /// Refine the tick price downward across both ladders (spec.md §4.3).
    /// Validated against the book's own tick price before being forwarded,
    /// mirroring the original source's belt-and-braces re-check inside
    /// each `Depth` as well.
    pub fn reset_tick_price(&mut self, new_tick: i32) -> Result<(), OrderBookError> {
        if new_tick >= self.tick_price || self.tick_price % new_tick != 0 {
            let err = OrderBookError::InvalidRetick {
                new_tick,
                current_tick: self.tick_price,
            };
            warn!(%err, "rejected retick");
            return Err(err);
        }

        self.ask.reset_tick_price(new_tick)?;
        self.bid.reset_tick_price(new_tick)?;
        self.tick_price = new_tick;
        debug!(new_tick, "retick applied");
        Ok(())
    }

    /// Render the book for observation (spec.md §6): per side, `top`,
    /// `bottom`, `current_size`, and for each non-empty slot the price
    /// and the FIFO as `(size, id)` pairs.
    pub fn print(&self) -> String {
        use std::fmt::Write;
        let mut out = String::new();
        for side in [OrderSide::Ask, OrderSide::Bid] {
            let depth = self.depth(side);
            let (top, bottom) = depth.top_bottom();
            let _ = writeln!(
                out,
                "{side} top:{top:?} bottom:{bottom:?} current_size:{}",
                depth.current_size()
            );
            for (price, level) in depth.iter_levels() {
                let _ = write!(out, "{price}: ");
                for order in level.iter() {
                    let _ = write!(out, "({}, {}) ", order.size, order.id);
                }
                let _ = writeln!(out);
            }
        }
        out
    }
}
