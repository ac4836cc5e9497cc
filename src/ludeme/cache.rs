//! Write-once per-node caches.
//!
//! Every ludeme carries a [`NodeCache`]. It is filled during preprocessing
//! and only read afterwards, so a shared rule tree can be evaluated from many
//! threads without locking. Each slot is a [`OnceLock`]: a second fill is
//! rejected, which makes "preprocess runs once" a property of the type
//! rather than a convention.

use std::sync::OnceLock;

use crate::context::RegisterEffects;

/// Cached facts about one ludeme.
#[derive(Clone, Debug)]
pub struct NodeCache<T> {
    /// Value of a static node, computed once during preprocessing.
    value: OnceLock<T>,
    /// Whether the subtree is static.
    is_static: OnceLock<bool>,
    /// Register effects of the subtree.
    effects: OnceLock<RegisterEffects>,
}

impl<T> Default for NodeCache<T> {
    fn default() -> Self {
        Self {
            value: OnceLock::new(),
            is_static: OnceLock::new(),
            effects: OnceLock::new(),
        }
    }
}

impl<T> NodeCache<T> {
    /// Empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value, if the node is static and was preprocessed.
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        self.value.get()
    }

    /// Store the value. Returns `false` and drops `value` if already filled.
    pub fn fill(&self, value: T) -> bool {
        self.value.set(value).is_ok()
    }

    /// Whether a value has been stored.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.value.get().is_some()
    }

    /// Static flag, computed on first request.
    #[inline]
    pub fn is_static(&self, compute: impl FnOnce() -> bool) -> bool {
        *self.is_static.get_or_init(compute)
    }

    /// Register effects, computed on first request.
    #[inline]
    pub fn effects(&self, compute: impl FnOnce() -> RegisterEffects) -> RegisterEffects {
        *self.effects.get_or_init(compute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Register;

    #[test]
    fn test_fill_is_write_once() {
        let cache = NodeCache::new();
        assert!(!cache.is_filled());
        assert!(cache.fill(3));
        assert!(!cache.fill(4));
        assert_eq!(cache.value(), Some(&3));
    }

    #[test]
    fn test_lazy_flags_computed_once() {
        let cache: NodeCache<i32> = NodeCache::new();
        assert!(cache.is_static(|| true));
        // Later computations are ignored once initialised.
        assert!(cache.is_static(|| false));

        let effects = RegisterEffects::writing(Register::Site);
        assert_eq!(cache.effects(|| effects), effects);
        assert_eq!(cache.effects(|| RegisterEffects::NONE), effects);
    }

    #[test]
    fn test_clone_keeps_contents() {
        let cache = NodeCache::new();
        cache.fill(vec![1, 2]);
        let cloned = cache.clone();
        assert_eq!(cloned.value(), Some(&vec![1, 2]));
    }
}
