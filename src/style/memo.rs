//! Single memoized cell with a manual invalidation flag.

/// A cached value that is rebuilt only after being invalidated.
///
/// Starts invalidated so the first read always builds.
#[derive(Debug, Clone)]
pub struct Memoized<T> {
    invalidated: bool,
    value: T,
}

impl<T: Default> Default for Memoized<T> {
    fn default() -> Self {
        Self {
            invalidated: true,
            value: T::default(),
        }
    }
}

impl<T> Memoized<T> {
    /// Mark the cached value stale.
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    /// Mark stale when `changed` is true. Returns `changed`.
    pub fn invalidate_if(&mut self, changed: bool) -> bool {
        if changed {
            self.invalidated = true;
        }
        changed
    }

    /// Whether the next read rebuilds.
    pub fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    /// Return the cached value, rebuilding it with `build` first if stale.
    pub fn get_or_rebuild(&mut self, build: impl FnOnce() -> T) -> &T {
        if self.invalidated {
            self.value = build();
            self.invalidated = false;
        }
        &self.value
    }
}
