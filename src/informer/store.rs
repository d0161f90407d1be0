//! In-memory object mirror
//!
//! `Indexer` holds the latest copy of every object of one kind, keyed by
//! `namespace/name`. It reports synced once the first full listing has been
//! applied with `replace`; incremental `upsert`/`delete` events never flip
//! that flag on their own.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use crate::apis::{ObjectMeta, Pizza, Topping};

use super::{PizzaLister, ReadyFunc, SharedInformerFactory, ToppingLister};

/// Objects an `Indexer` can key
pub trait Keyed {
    fn metadata(&self) -> &ObjectMeta;

    fn key(&self) -> String {
        self.metadata().key()
    }
}

impl Keyed for Pizza {
    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }
}

impl Keyed for Topping {
    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }
}

/// Thread-safe mirror of one kind
#[derive(Debug)]
pub struct Indexer<T> {
    items: RwLock<BTreeMap<String, Arc<T>>>,
    synced: AtomicBool,
}

impl<T> Default for Indexer<T> {
    fn default() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
            synced: AtomicBool::new(false),
        }
    }
}

impl<T: Keyed> Indexer<T> {
    /// Creates an empty, unsynced indexer
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole contents with a full listing and marks synced
    pub fn replace(&self, items: impl IntoIterator<Item = T>) {
        let fresh: BTreeMap<String, Arc<T>> = items
            .into_iter()
            .map(|item| (item.key(), Arc::new(item)))
            .collect();
        *self.items.write().unwrap_or_else(|e| e.into_inner()) = fresh;
        self.synced.store(true, Ordering::Release);
    }

    /// Adds or replaces one object
    pub fn upsert(&self, item: T) {
        let key = item.key();
        self.items
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, Arc::new(item));
    }

    /// Removes one object by key, returning it if present
    pub fn delete(&self, key: &str) -> Option<Arc<T>> {
        self.items
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key)
    }

    /// Snapshot of every object, in key order
    pub fn list(&self) -> Vec<Arc<T>> {
        self.items
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect()
    }

    /// Looks up one object by key
    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        self.items
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    /// Number of mirrored objects
    pub fn len(&self) -> usize {
        self.items.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the initial full listing has been applied
    pub fn has_synced(&self) -> bool {
        self.synced.load(Ordering::Acquire)
    }
}

impl PizzaLister for Indexer<Pizza> {
    fn list(&self) -> Vec<Arc<Pizza>> {
        Indexer::list(self)
    }

    fn get(&self, key: &str) -> Option<Arc<Pizza>> {
        Indexer::get(self, key)
    }
}

impl ToppingLister for Indexer<Topping> {
    fn list(&self) -> Vec<Arc<Topping>> {
        Indexer::list(self)
    }

    fn get(&self, key: &str) -> Option<Arc<Topping>> {
        Indexer::get(self, key)
    }
}

/// Mirrors for every restaurant kind, shared by all plugins
#[derive(Debug, Default, Clone)]
pub struct SharedInformers {
    pizzas: Arc<Indexer<Pizza>>,
    toppings: Arc<Indexer<Topping>>,
}

impl SharedInformers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pizzas(&self) -> &Arc<Indexer<Pizza>> {
        &self.pizzas
    }

    pub fn toppings(&self) -> &Arc<Indexer<Topping>> {
        &self.toppings
    }
}

impl SharedInformerFactory for SharedInformers {
    fn pizza_lister(&self) -> Arc<dyn PizzaLister> {
        self.pizzas.clone()
    }

    fn pizzas_synced(&self) -> ReadyFunc {
        let pizzas = Arc::clone(&self.pizzas);
        Arc::new(move || pizzas.has_synced())
    }

    fn topping_lister(&self) -> Arc<dyn ToppingLister> {
        self.toppings.clone()
    }

    fn toppings_synced(&self) -> ReadyFunc {
        let toppings = Arc::clone(&self.toppings);
        Arc::new(move || toppings.has_synced())
    }
}
