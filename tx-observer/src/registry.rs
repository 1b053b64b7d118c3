//! Address subscription registry.
//!
//! Holds the set of addresses the observer is watching. The registry is an
//! owned value handed to whoever needs it (usually as
//! `Arc<dyn SubscriptionRegistry>`); there is no global instance.

use std::{
    collections::BTreeSet,
    sync::{PoisonError, RwLock},
};

use crate::transaction::Address;

/// A deduplicated set of subscribed addresses.
///
/// Implementations must be safe to call from several threads at once, and a
/// reader must never see a partially applied update.
pub trait SubscriptionRegistry: Send + Sync {
    /// Add `address`. Returns `true` if it was not already subscribed.
    fn subscribe(&self, address: Address) -> bool;

    /// Remove `address`. Returns `true` if it was subscribed.
    fn unsubscribe(&self, address: &Address) -> bool;

    /// Check if `address` is subscribed.
    fn is_subscribed(&self, address: &Address) -> bool;

    /// List every subscribed address exactly once.
    fn list_subscribed(&self) -> Vec<Address>;

    /// Number of subscribed addresses.
    fn len(&self) -> usize;

    /// Check if nothing is subscribed.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory registry guarded by a read/write lock.
///
/// Addresses are listed in sorted order.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    addresses: RwLock<BTreeSet<Address>>,
}

impl MemoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }
}

// A panicking writer cannot leave a BTreeSet half-inserted, so a poisoned
// lock still guards a consistent set.
impl SubscriptionRegistry for MemoryRegistry {
    fn subscribe(&self, address: Address) -> bool {
        let mut addresses = self
            .addresses
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let added = addresses.insert(address);
        if added {
            tracing::debug!("{} address(es) subscribed", addresses.len());
        }
        added
    }

    fn unsubscribe(&self, address: &Address) -> bool {
        self.addresses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(address)
    }

    fn is_subscribed(&self, address: &Address) -> bool {
        self.addresses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(address)
    }

    fn list_subscribed(&self) -> Vec<Address> {
        self.addresses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    fn len(&self) -> usize {
        self.addresses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::Arc, thread};

    const ADDRESS: &str = "0x0000000000000000000000000000000000000011";

    #[test]
    fn test_subscribe_twice() {
        let registry = MemoryRegistry::new();

        assert!(registry.subscribe(ADDRESS.into()));
        assert!(!registry.subscribe(ADDRESS.into()));

        assert_eq!(registry.list_subscribed(), vec![Address::from(ADDRESS)]);
    }

    #[test]
    fn test_list_subscribed() {
        let registry = MemoryRegistry::new();
        let addresses = [
            "0x0000000000000000000000000000000000000012",
            "0x0000000000000000000000000000000000000011",
        ];

        for address in addresses {
            registry.subscribe(address.into());
        }

        assert_eq!(
            registry.list_subscribed(),
            vec![Address::from(addresses[1]), Address::from(addresses[0])]
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_case_distinct_addresses() {
        let registry = MemoryRegistry::new();

        assert!(registry.subscribe("0xAbC".into()));
        assert!(registry.subscribe("0xabc".into()));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unsubscribe() {
        let registry = MemoryRegistry::new();
        registry.subscribe(ADDRESS.into());

        assert!(registry.is_subscribed(&ADDRESS.into()));
        assert!(registry.unsubscribe(&ADDRESS.into()));
        assert!(!registry.unsubscribe(&ADDRESS.into()));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_subscribe() {
        let registry = Arc::new(MemoryRegistry::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || {
                    (0..100)
                        .filter(|i| registry.subscribe(Address::new(format!("0x{:02x}", i))))
                        .count()
                })
            })
            .collect();

        let added: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        // Each address is reported as new by exactly one thread
        assert_eq!(added, 100);
        assert_eq!(registry.len(), 100);
        assert_eq!(registry.list_subscribed().len(), 100);
    }

    #[test]
    fn test_recovers_from_poisoned_lock() {
        let registry = Arc::new(MemoryRegistry::new());
        registry.subscribe(ADDRESS.into());

        let poisoner = registry.clone();
        let _ = thread::spawn(move || {
            let _guard = poisoner.addresses.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert!(registry.is_subscribed(&ADDRESS.into()));
        assert!(registry.subscribe("0x12".into()));
        assert_eq!(registry.len(), 2);
    }
}
