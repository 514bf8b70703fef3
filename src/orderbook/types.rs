//! Core value types shared by every layer of the order book.

use std::fmt;

/// Which ladder an order belongs to.
///
/// `Ask` resting orders sell; `Bid` resting orders buy. An incoming order's
/// side determines which `Depth` it matches against (the opposite side)
/// and which `Depth` it rests on (its own side) — see
/// [`crate::orderbook::book::OrderBook::add_order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum OrderSide {
    /// Sell side. Top of the ladder is the *lowest* resting price.
    Ask,
    /// Buy side. Top of the ladder is the *highest* resting price.
    Bid,
}

impl OrderSide {
    /// The index step used by a `Depth` for this side: `+1` for `Ask`,
    /// `-1` for `Bid` (spec.md §4.2.1).
    pub(crate) fn index_step(self) -> i64 {
        match self {
            OrderSide::Ask => 1,
            OrderSide::Bid => -1,
        }
    }

    /// The opposite side, used to route matching (spec.md §4.3).
    pub fn opposite(self) -> OrderSide {
        match self {
            OrderSide::Ask => OrderSide::Bid,
            OrderSide::Bid => OrderSide::Ask,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Ask => write!(f, "ask"),
            OrderSide::Bid => write!(f, "bid"),
        }
    }
}

/// Opaque order identifier, unique per live order within the book.
///
/// Wraps a `String` rather than generating UUIDs: the spec treats ids as
/// caller-supplied strings and is explicitly agnostic to whether they
/// encode timestamps (spec.md §4.1).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct OrderId(pub String);

impl OrderId {
    /// Build an `OrderId` from anything that converts to a `String`.
    pub fn new(id: impl Into<String>) -> Self {
        OrderId(id.into())
    }

    /// Borrow the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        OrderId(value.to_string())
    }
}

impl From<String> for OrderId {
    fn from(value: String) -> Self {
        OrderId(value)
    }
}

/// Selects the tie-break rule used inside one price level.
///
/// Bound into a `Depth` at construction (spec.md §4.1, §9): "bake the
/// choice into the Depth at construction; do not indirect per-call". Being
/// a plain `Copy` enum rather than a boxed function pointer lets every
/// call site monomorphise instead of indirecting through a vtable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum OrderIdComparator {
    /// Pure lexicographic ordering of the id string.
    #[default]
    LexString,
    /// Parse the id as an integer and compare numerically; falls back to
    /// lexicographic ordering if either id fails to parse (a malformed id
    /// is not rejected here — only `OrderBook::add_order`'s own input
    /// validation rejects malformed input).
    LexInteger,
}

impl OrderIdComparator {
    /// `true` if `a` should sort strictly before `b` within a price level.
    pub(crate) fn less(self, a: &OrderId, b: &OrderId) -> bool {
        match self {
            OrderIdComparator::LexString => a.0 < b.0,
            OrderIdComparator::LexInteger => {
                match (a.0.parse::<i64>(), b.0.parse::<i64>()) {
                    (Ok(x), Ok(y)) => x < y,
                    _ => a.0 < b.0,
                }
            }
        }
    }
}

/// A resting or incoming order.
///
/// Immutable after acceptance except for `size`, which matching decrements
/// in place (spec.md §3). `price` is an integer tick multiple; the crate
/// never represents prices as floats (Non-goal: decimal/floating prices).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Order {
    /// Price in whole ticks.
    pub price: i32,
    /// Unique identifier within the book.
    pub id: OrderId,
    /// Remaining quantity. Strictly positive while resting.
    pub size: i32,
    /// Which ladder this order belongs to.
    pub side: OrderSide,
}

impl Order {
    /// Build a new order. Does not validate `price`/`size`; validation is
    /// the responsibility of `OrderBook::add_order` (spec.md §6).
    pub fn new(id: impl Into<OrderId>, side: OrderSide, price: i32, size: i32) -> Self {
        Order {
            price,
            id: id.into(),
            size,
            side,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}@{})", self.id, self.size, self.price)
    }
}
