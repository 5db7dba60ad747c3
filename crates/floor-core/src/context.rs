//! Resolution of the active station for remote polling.
use std::sync::{PoisonError, RwLock};

use floor_model::ContextId;

/// Supplies the station every polling task operates against.
///
/// Tasks call [`ActiveContextProvider::resolve`] before every run and treat the result as
/// read-only input. [`ContextId::NONE`] means "no station selected": skip remote work.
pub trait ActiveContextProvider: Send + Sync {
    fn resolve(&self) -> ContextId;
}

/// Context provider with three layered sources, highest priority first:
/// 1. explicit override (e.g. pinned from configuration);
/// 2. ambient station variable set by the current view;
/// 3. id embedded in the richer station object of the current view.
///
/// A source holding `0` or nothing falls through to the next one.
#[derive(Debug, Default)]
pub struct ScopedContext {
    explicit: RwLock<Option<u64>>,
    ambient: RwLock<Option<u64>>,
    scope: RwLock<Option<u64>>,
}

impl ScopedContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the context regardless of what the view reports.
    pub fn with_override(self, id: Option<u64>) -> Self {
        self.set_override(id);
        self
    }

    pub fn set_override(&self, id: Option<u64>) {
        write(&self.explicit, id);
    }

    pub fn set_ambient(&self, id: Option<u64>) {
        write(&self.ambient, id);
    }

    pub fn set_scope(&self, id: Option<u64>) {
        write(&self.scope, id);
    }
}

impl ActiveContextProvider for ScopedContext {
    fn resolve(&self) -> ContextId {
        [&self.explicit, &self.ambient, &self.scope]
            .into_iter()
            .filter_map(read)
            .find(|id| *id != 0)
            .map(ContextId::new)
            .unwrap_or(ContextId::NONE)
    }
}

/// Provider that always returns the same context.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedContext(pub ContextId);

impl ActiveContextProvider for FixedContext {
    fn resolve(&self) -> ContextId {
        self.0
    }
}

fn read(slot: &RwLock<Option<u64>>) -> Option<u64> {
    *slot.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(slot: &RwLock<Option<u64>>, id: Option<u64>) {
    *slot.write().unwrap_or_else(PoisonError::into_inner) = id;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_sentinel() {
        assert_eq!(ScopedContext::new().resolve(), ContextId::NONE);
    }

    #[test]
    fn priority_order_is_override_ambient_scope() {
        let ctx = ScopedContext::new();
        ctx.set_scope(Some(3));
        assert_eq!(ctx.resolve(), ContextId::new(3));

        ctx.set_ambient(Some(2));
        assert_eq!(ctx.resolve(), ContextId::new(2));

        ctx.set_override(Some(1));
        assert_eq!(ctx.resolve(), ContextId::new(1));

        ctx.set_override(None);
        assert_eq!(ctx.resolve(), ContextId::new(2));
    }

    #[test]
    fn zero_falls_through() {
        let ctx = ScopedContext::new().with_override(Some(0));
        ctx.set_ambient(Some(0));
        ctx.set_scope(Some(7));
        assert_eq!(ctx.resolve(), ContextId::new(7));

        ctx.set_scope(Some(0));
        assert!(ctx.resolve().is_none());
    }

    #[test]
    fn fixed_context_is_constant() {
        let ctx = FixedContext(ContextId::new(4));
        assert_eq!(ctx.resolve(), ContextId::new(4));
        assert!(FixedContext::default().resolve().is_none());
    }
}
