//! Single-slot cache in front of a resolver
//!
//! The slot starts empty and dirty. A successful `get` fills it and marks it
//! clean; `refresh` marks it dirty again so the next `get` re-resolves.
//! The lock is held across the resolver call, so at most one resolution is
//! in flight per cache and concurrent callers all see the same result.

use async_trait::async_trait;
use ocean_core::Resolvable;
use tokio::sync::Mutex;

use crate::chain::Resolver;
use crate::error::Result;

struct Slot<V> {
    value: Option<V>,
    dirty: bool,
}

/// Memoizes the last successful result of a resolver
pub struct Cache<V, R> {
    resolver: R,
    slot: Mutex<Slot<V>>,
}

impl<V: Resolvable, R: Resolver<V>> Cache<V, R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            slot: Mutex::new(Slot {
                value: None,
                dirty: true,
            }),
        }
    }

    /// Return the cached value, resolving first if the slot is dirty
    ///
    /// Failures are never cached; a failed resolution also drops any
    /// previously stored value.
    pub async fn get(&self) -> Result<V> {
        let mut slot = self.slot.lock().await;

        if !slot.dirty {
            if let Some(value) = &slot.value {
                tracing::trace!(kind = V::KIND, "cache hit");
                return Ok(value.clone());
            }
        }

        tracing::debug!(kind = V::KIND, "resolving");
        match self.resolver.resolve().await {
            Ok(value) => {
                slot.value = Some(value.clone());
                slot.dirty = false;
                Ok(value)
            }
            Err(e) => {
                slot.value = None;
                slot.dirty = true;
                Err(e)
            }
        }
    }

    /// Force the next `get` to resolve again
    pub async fn refresh(&self) -> &Self {
        self.slot.lock().await.dirty = true;
        tracing::debug!(kind = V::KIND, "cache marked dirty");
        self
    }
}

#[async_trait]
impl<V: Resolvable, R: Resolver<V>> Resolver<V> for Cache<V, R> {
    async fn resolve(&self) -> Result<V> {
        self.get().await
    }
}
