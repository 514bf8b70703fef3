//! # Ring-Buffered Limit Order Book
//!
//! A single-threaded limit-order-book (LOB) matching engine built around a
//! price-indexed ring buffer rather than a balanced tree or skip list.
//! Each side of the book (`Depth`) keeps a circular array of price-level
//! heads bracketed by `top`/`bottom` indices, so insertion and lookup over
//! a contiguous price range is amortised O(1); only growing past the
//! buffer's current span, or refining the tick price, costs more than
//! that.
//!
//! ## Design
//!
//! - **Ring-buffer price ladder.** `top` is always the most aggressive
//!   resting price for a side (lowest ask, highest bid); the live range
//!   wraps modularly from `top` to `bottom`.
//! - **Per-level FIFO.** Orders at the same price match head-first; ties
//!   are broken by a configurable [`OrderIdComparator`] chosen once at
//!   construction (pure lexicographic, or numeric-lexicographic).
//! - **O(1) cancellation.** An id→node index lets `delete_order` unlink a
//!   resting order without walking its level.
//! - **In-place growth and retick.** Adding an order far outside the
//!   current buffer span reallocates and re-lays existing levels at their
//!   new relative offsets; refining the tick price (never coarsening)
//!   does the same at a finer resolution.
//!
//! ## Non-goals
//!
//! Persistence, network transport, multi-instrument books, self-trade
//! prevention, cross-level time priority, decimal/floating prices,
//! market orders without a limit price, and iceberg/hidden quantity are
//! all out of scope — see `SPEC_FULL.md` in the repository root.
//!
//! ## Example
//!
//! ```
//! use orderbook_core::{BookConfig, Order, OrderBook, OrderIdComparator, OrderSide};
//!
//! let mut book = OrderBook::new(BookConfig {
//!     tick_price: 1,
//!     comparator: OrderIdComparator::LexInteger,
//!     initial_size: 10,
//!     step_size: 10,
//! });
//!
//! book.add_order(Order::new("1", OrderSide::Bid, 100, 5)).unwrap();
//! book.add_order(Order::new("2", OrderSide::Ask, 100, 3)).unwrap();
//!
//! assert_eq!(book.best_price(OrderSide::Bid), Some(100));
//! ```

pub mod orderbook;

pub use orderbook::{
    BookConfig, LevelSnapshot, Order, OrderBook, OrderBookError, OrderBookSnapshot, OrderId,
    OrderIdComparator, OrderSide, SideSnapshot,
};
