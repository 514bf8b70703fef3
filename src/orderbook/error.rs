//! Order book error types

use crate::orderbook::types::{OrderId, OrderSide};
use std::fmt;

/// Errors that can occur within the `OrderBook`.
///
/// None of these abort the process (spec.md §7): every operation that can
/// produce one of these still runs to completion, logs the event via
/// `tracing`, and leaves the book in a well-defined state (usually
/// unchanged). The `Result` returned from public operations is an
/// additional, optional signal layered on top of that historical
/// log-and-ignore contract, not a replacement for it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OrderBookError {
    /// `add_order` was called with an id already resting on the same side.
    /// The new order is silently dropped.
    DuplicateOrderId {
        /// The id that was already resting.
        id: OrderId,
        /// The side it was resting on.
        side: OrderSide,
    },

    /// `delete_order` was called for an id that isn't resting on the given
    /// side. No state change occurs.
    UnknownOrderId {
        /// The id that could not be found.
        id: OrderId,
        /// The side that was searched.
        side: OrderSide,
    },

    /// `reset_tick_price` was rejected: either the new tick is not
    /// strictly smaller than the current one, or the current tick does
    /// not evenly divide it (spec.md §4.2.6).
    InvalidRetick {
        /// The requested new tick price.
        new_tick: i32,
        /// The tick price in effect before the request.
        current_tick: i32,
    },

    /// An order failed boundary validation in `add_order`: non-positive
    /// size, an empty id, or a price that isn't a multiple of the book's
    /// tick price.
    MalformedOrder {
        /// Human-readable description of what failed validation.
        reason: String,
    },
}

impl fmt::Display for OrderBookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBookError::DuplicateOrderId { id, side } => {
                write!(f, "duplicate order id {id} on {side} side, dropped")
            }
            OrderBookError::UnknownOrderId { id, side } => {
                write!(f, "unknown order id {id} on {side} side")
            }
            OrderBookError::InvalidRetick {
                new_tick,
                current_tick,
            } => write!(
                f,
                "invalid retick: new tick {new_tick} against current {current_tick}"
            ),
            OrderBookError::MalformedOrder { reason } => {
                write!(f, "malformed order: {reason}")
            }
        }
    }
}

impl std::error::Error for OrderBookError {}
