//! One side of the order book: a price-indexed ring buffer of FIFO levels.
//!
//! Grounded on the `Depth` class of the C++ source this crate's algorithm
//! is derived from (`examples/original_source/orderbook.cpp`): a circular
//! array of price-level heads (`price_nodes_`), `top_`/`bottom_` indices
//! bracketing the live range, and a `map_link_nodes_` secondary index for
//! O(1) cancellation. This module is a line-by-line translation of that
//! algorithm into safe Rust over the slab-backed [`OrderList`] instead of
//! raw linked-list pointers.

use std::collections::HashMap;

use super::error::OrderBookError;
use super::list::{NodeId, OrderList};
use super::types::{Order, OrderId, OrderIdComparator, OrderSide};

/// One ladder (ask or bid) of the order book.
///
/// See spec.md §3 and §4.2 for the full contract. `top` is the best
/// (most aggressive) resting price for this side; `bottom` is the worst.
/// Both are `None` exactly when the ladder holds zero orders.
pub(crate) struct Depth {
    side: OrderSide,
    top: Option<usize>,
    bottom: Option<usize>,
    current_size: usize,
    step_size: usize,
    tick_price: i32,
    price_nodes: Vec<Option<OrderList>>,
    /// Maps a live order id to the price its level sits at and the handle
    /// of its node within that level's `OrderList`. Storing the price
    /// (rather than the level's current ring-buffer slot) means growth and
    /// retick, which move levels between slots, never have to touch this
    /// index — only `index_for_price` needs to be recomputed, and it's
    /// cheap.
    id_index: HashMap<OrderId, (i32, NodeId)>,
}

impl Depth {
    pub(crate) fn new(side: OrderSide, tick_price: i32, initial_size: usize, step_size: usize) -> Self {
        Depth {
            side,
            top: None,
            bottom: None,
            current_size: initial_size.max(1),
            step_size: step_size.max(1),
            tick_price,
            price_nodes: (0..initial_size.max(1)).map(|_| None).collect(),
            id_index: HashMap::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.top.is_none()
    }

    pub(crate) fn current_size(&self) -> usize {
        self.current_size
    }

    pub(crate) fn top_bottom(&self) -> (Option<usize>, Option<usize>) {
        (self.top, self.bottom)
    }

    pub(crate) fn best_price(&self) -> Option<i32> {
        self.top.map(|t| self.price_at(t))
    }

    pub(crate) fn contains(&self, id: &OrderId) -> bool {
        self.id_index.contains_key(id)
    }

    fn price_at(&self, idx: usize) -> i32 {
        self.price_nodes[idx]
            .as_ref()
            .and_then(|l| l.front())
            .map(|o| o.price)
            .expect("slot must be non-empty")
    }

    fn live_len(&self) -> usize {
        match (self.top, self.bottom) {
            (Some(t), Some(b)) => {
                (((b as i64 - t as i64 + self.current_size as i64) % self.current_size as i64) + 1)
                    as usize
            }
            _ => 0,
        }
    }

    /// Slot index for `price`, given the ladder is non-empty. Precondition
    /// (caller's responsibility, spec.md §4.2.1): `(price - price_at_top)`
    /// must be a multiple of `tick_price`.
    fn index_for_price(&self, price: i32) -> usize {
        let top = self.top.expect("index_for_price requires a non-empty ladder");
        let top_price = self.price_at(top);
        let offset = (price as i64 - top_price as i64) / self.tick_price as i64;
        let idx = (top as i64 + offset * self.side.index_step()).rem_euclid(self.current_size as i64);
        idx as usize
    }

    /// Iterate non-empty levels from `top` to `bottom`, yielding each
    /// level's price and its order list. Used by `print`/snapshots.
    pub(crate) fn iter_levels(&self) -> impl Iterator<Item = (i32, &OrderList)> + '_ {
        let total = self.live_len();
        let current_size = self.current_size;
        let price_nodes = &self.price_nodes;
        let mut idx = self.top;
        let mut seen = 0usize;
        std::iter::from_fn(move || {
            while seen < total {
                let i = idx?;
                seen += 1;
                idx = Some((i + 1) % current_size);
                if let Some(level) = &price_nodes[i] {
                    return Some((level.front().unwrap().price, level));
                }
            }
            None
        })
    }

    /// Insert a resting order. Precondition: `order.size > 0` and
    /// `order.side` matches this depth (spec.md §4.2.2).
    pub(crate) fn add(&mut self, order: Order, comparator: OrderIdComparator) -> Result<(), OrderBookError> {
        let Some(top) = self.top else {
            self.top = Some(0);
            self.bottom = Some(0);
            return self.insert_into_slot(0, order, comparator);
        };

        let top_price = self.price_at(top);
        let bottom_price = self.price_at(self.bottom.unwrap());

        let required: i64 = match self.side {
            OrderSide::Ask => {
                if order.price >= top_price {
                    (order.price as i64 - top_price as i64) / self.tick_price as i64
                } else {
                    (bottom_price as i64 - order.price as i64) / self.tick_price as i64
                }
            }
            OrderSide::Bid => {
                if order.price <= top_price {
                    (top_price as i64 - order.price as i64) / self.tick_price as i64
                } else {
                    (order.price as i64 - bottom_price as i64) / self.tick_price as i64
                }
            }
        };

        if required >= self.current_size as i64 {
            self.grow(required as usize);
            return self.add(order, comparator);
        }

        let idx = self.index_for_price(order.price);
        let price = order.price;
        let result = self.insert_into_slot(idx, order, comparator);
        if result.is_ok() {
            match self.side {
                OrderSide::Ask => {
                    if price < top_price {
                        self.top = Some(idx);
                    }
                    if price > bottom_price {
                        self.bottom = Some(idx);
                    }
                }
                OrderSide::Bid => {
                    if price > top_price {
                        self.top = Some(idx);
                    }
                    if price < bottom_price {
                        self.bottom = Some(idx);
                    }
                }
            }
        }
        result
    }

    /// Duplicate ids are rejected side-wide (spec.md §7: "an id already
    /// resting on the same side"), not just within the target price
    /// level's own `OrderList` — an id resting at one price must block an
    /// add at any other price on the same side, or `id_index` would be
    /// silently repointed at a second, un-cancellable node.
    fn insert_into_slot(
        &mut self,
        idx: usize,
        order: Order,
        comparator: OrderIdComparator,
    ) -> Result<(), OrderBookError> {
        if self.contains(&order.id) {
            return Err(OrderBookError::DuplicateOrderId {
                id: order.id,
                side: self.side,
            });
        }

        let id = order.id.clone();
        let price = order.price;
        let level = self.price_nodes[idx].get_or_insert_with(OrderList::new);
        let (inserted, node_id) = level.insert_sorted(order, true, comparator);
        debug_assert!(inserted, "id_index already guards against duplicate ids");
        self.id_index.insert(id, (price, node_id.expect("inserted node has a handle")));
        Ok(())
    }

    fn grow(&mut self, required: usize) {
        let enlarge = (required / self.step_size) * self.step_size + self.step_size - self.current_size;
        let new_size = self.current_size + enlarge;
        let mut new_slots: Vec<Option<OrderList>> = (0..new_size).map(|_| None).collect();

        let top = self.top.expect("grow is only called on a non-empty ladder");
        let new_top_price = self.price_at(top);
        let total = self.live_len();
        let mut idx = top;
        let mut new_bottom = 0usize;

        for _ in 0..total {
            let level_price = self.price_nodes[idx].as_ref().and_then(|l| l.front()).map(|o| o.price);
            if let Some(level_price) = level_price {
                let new_index = ((level_price as i64 - new_top_price as i64) * self.side.index_step()
                    / self.tick_price as i64) as usize;
                new_slots[new_index] = self.price_nodes[idx].take();
                new_bottom = new_index;
            }
            idx = (idx + 1) % self.current_size;
        }

        self.price_nodes = new_slots;
        self.top = Some(0);
        self.bottom = Some(new_bottom);
        self.current_size = new_size;
    }

    /// Match `incoming` against this (opposite) side's resting orders,
    /// consuming FIFO and decrementing `incoming.size` in place
    /// (spec.md §4.2.3). Returns the total size consumed.
    pub(crate) fn match_against(&mut self, incoming: &mut Order) -> i32 {
        let Some(_) = self.top else { return 0 };

        let mut consumed = 0i32;
        let total = self.live_len();
        let mut idx = self.top.unwrap();
        let mut seen = 0usize;

        'walk: while seen < total && incoming.size > 0 {
            seen += 1;
            let current = idx;
            idx = (idx + 1) % self.current_size;

            let Some(level) = &mut self.price_nodes[current] else {
                continue;
            };
            let level_price = level.front().unwrap().price;
            let aggressive = match self.side {
                OrderSide::Ask => level_price <= incoming.price,
                OrderSide::Bid => level_price >= incoming.price,
            };
            if !aggressive {
                break 'walk;
            }

            while !level.is_empty() && incoming.size > 0 {
                let head = level.front_mut().unwrap();
                if head.size > incoming.size {
                    head.size -= incoming.size;
                    consumed += incoming.size;
                    incoming.size = 0;
                } else {
                    let head_size = head.size;
                    incoming.size -= head_size;
                    consumed += head_size;
                    let popped = level.pop_front().expect("level was non-empty");
                    self.id_index.remove(&popped.id);
                }
            }

            if level.is_empty() {
                self.price_nodes[current] = None;
            }
        }

        self.reset_top();
        consumed
    }

    /// Remove a resting order by id (spec.md §4.2.4).
    pub(crate) fn delete_order(&mut self, id: &OrderId) -> Result<(), OrderBookError> {
        let Some((price, node_id)) = self.id_index.remove(id) else {
            return Err(OrderBookError::UnknownOrderId {
                id: id.clone(),
                side: self.side,
            });
        };

        let idx = self.index_for_price(price);
        let was_top = self.top == Some(idx);
        let was_bottom = self.bottom == Some(idx);

        let level = self.price_nodes[idx]
            .as_mut()
            .expect("id_index points at a live level");
        level.unlink(node_id);
        if level.is_empty() {
            self.price_nodes[idx] = None;
        }

        if was_top {
            self.reset_top();
        } else if was_bottom {
            self.reset_bottom();
        }

        Ok(())
    }

    fn reset_top(&mut self) {
        let (Some(top), Some(_)) = (self.top, self.bottom) else {
            return;
        };
        let total = self.live_len();
        let mut idx = top;
        let mut found = None;
        for _ in 0..total {
            if self.price_nodes[idx].is_some() {
                found = Some(idx);
                break;
            }
            idx = (idx + 1) % self.current_size;
        }
        match found {
            Some(idx) => self.top = Some(idx),
            None => {
                self.top = None;
                self.bottom = None;
            }
        }
    }

    fn reset_bottom(&mut self) {
        let (Some(_), Some(bottom)) = (self.top, self.bottom) else {
            return;
        };
        let total = self.live_len();
        let mut idx = bottom;
        let mut found = None;
        for _ in 0..total {
            if self.price_nodes[idx].is_some() {
                found = Some(idx);
                break;
            }
            idx = (idx + self.current_size - 1) % self.current_size;
        }
        match found {
            Some(idx) => self.bottom = idx.into(),
            None => {
                self.top = None;
                self.bottom = None;
            }
        }
    }

    /// Refine the tick price downward (spec.md §4.2.6). Rejects
    /// coarsening and non-dividing ticks.
    pub(crate) fn reset_tick_price(&mut self, new_tick: i32) -> Result<(), OrderBookError> {
        if self.top.is_none() {
            self.tick_price = new_tick;
            return Ok(());
        }

        if new_tick >= self.tick_price || self.tick_price % new_tick != 0 {
            return Err(OrderBookError::InvalidRetick {
                new_tick,
                current_tick: self.tick_price,
            });
        }

        let mult = (self.tick_price / new_tick) as usize;
        let new_size = self.current_size * mult;
        let mut new_slots: Vec<Option<OrderList>> = (0..new_size).map(|_| None).collect();

        let total = self.live_len();
        let mut idx = self.top.unwrap();
        for _ in 0..total {
            if self.price_nodes[idx].is_some() {
                new_slots[idx * mult] = self.price_nodes[idx].take();
            }
            idx = (idx + 1) % self.current_size;
        }

        self.price_nodes = new_slots;
        self.top = self.top.map(|t| t * mult);
        self.bottom = self.bottom.map(|b| b * mult);
        self.current_size = new_size;
        self.tick_price = new_tick;
        Ok(())
    }

    /// Destroy every resting order (spec.md §4.2.7). The backing array
    /// keeps its current length.
    pub(crate) fn clear(&mut self) {
        if let Some(top) = self.top {
            let total = self.live_len();
            let mut idx = top;
            for _ in 0..total {
                if let Some(level) = &mut self.price_nodes[idx] {
                    level.clear();
                }
                self.price_nodes[idx] = None;
                idx = (idx + 1) % self.current_size;
            }
        }
        self.id_index.clear();
        self.top = None;
        self.bottom = None;
    }
}
