//! Identifier generator

use super::OrderIdStore;
use crate::error::PersistenceError;
use fixgate_core::{MdRequestId, OrderId};
use log::{debug, info};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

struct OrderCounter {
    last: u64,
    store: Box<dyn OrderIdStore>,
}

/// Produces order ids (durable, strictly increasing across restarts) and
/// market data request ids (process lifetime only).
///
/// Shared by handle (`Arc<IdGenerator>`); the order counter and its store
/// form one lock domain held for a single allocate-and-persist.
pub struct IdGenerator {
    order: Mutex<OrderCounter>,
    md_request: AtomicU64,
}

impl IdGenerator {
    /// Open the generator, resuming one past the last persisted order id
    pub fn open(store: impl OrderIdStore + 'static) -> Result<Self, PersistenceError> {
        let last = store.load()?.unwrap_or(0);
        info!("Order ids resume after {}", last);

        Ok(Self {
            order: Mutex::new(OrderCounter {
                last,
                store: Box::new(store),
            }),
            md_request: AtomicU64::new(0),
        })
    }

    /// Allocate the next order id.
    ///
    /// The new value is persisted before it is returned. If the store write
    /// fails the counter does not move and no id is handed out.
    pub fn allocate_order_id(&self) -> Result<OrderId, PersistenceError> {
        let mut counter = self.order.lock();
        let next = counter
            .last
            .checked_add(1)
            .ok_or(PersistenceError::Exhausted)?;
        counter.store.save(next)?;
        counter.last = next;

        debug!("Allocated order id {}", next);
        Ok(OrderId(next))
    }

    /// Allocate the next market data request id (not persisted)
    pub fn allocate_md_request_id(&self) -> MdRequestId {
        MdRequestId(self.md_request.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Read the persisted high-water mark from the store (0 if none)
    pub fn load_last_order_id(&self) -> Result<u64, PersistenceError> {
        let counter = self.order.lock();
        Ok(counter.store.load()?.unwrap_or(0))
    }

    /// Last order id allocated or resumed from, without allocating
    pub fn current_order_id(&self) -> OrderId {
        OrderId(self.order.lock().last)
    }
}
