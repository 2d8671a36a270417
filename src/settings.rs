//! Runtime settings for [`ByteMap`](crate::ByteMap).

use core::fmt::Debug;

/// Who is responsible for keys and values once they are handed to a map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ownership {
    /// The caller keeps ownership. Keys are borrowed, and values displaced by
    /// an overwrite or delete are handed back instead of released.
    #[default]
    Caller,
    /// The map releases displaced values through its [`Release`] policy.
    /// Keys stay borrowed.
    Value,
    /// The map releases values and stores its own copy of every key.
    KeyAndValue,
}

impl Ownership {
    /// Whether the map releases values it displaces.
    pub fn owns_values(self) -> bool {
        !matches!(self, Ownership::Caller)
    }

    /// Whether the map copies key bytes on insert.
    pub fn owns_keys(self) -> bool {
        matches!(self, Ownership::KeyAndValue)
    }
}

/// When the table adjusts its capacity on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizePolicy {
    /// Never resize automatically. Inserts fail with
    /// [`Error::Capacity`](crate::Error::Capacity) once every slot is taken.
    Disabled,
    /// Grow at the high-water mark, never shrink because of emptiness.
    #[default]
    GrowOnly,
    /// Grow at the high-water mark and halve on delete at the low-water mark.
    GrowAndShrink,
}

impl ResizePolicy {
    pub(crate) fn grows(self) -> bool {
        !matches!(self, ResizePolicy::Disabled)
    }

    pub(crate) fn shrinks(self) -> bool {
        matches!(self, ResizePolicy::GrowAndShrink)
    }
}

/// Table settings.
///
/// ```rust
/// use robin_hash::Ownership;
/// use robin_hash::ResizePolicy;
/// use robin_hash::Settings;
///
/// let settings = Settings::default()
///     .with_ignore_case(true)
///     .with_ownership(Ownership::KeyAndValue)
///     .with_resize(ResizePolicy::GrowAndShrink);
/// assert!(settings.ignore_case);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    /// Hash and compare keys with ASCII case folded.
    ///
    /// Keys are folded before they reach the hash function. Comparison
    /// ignores case unless a custom comparison function is installed.
    /// Toggling it on a non-empty table leaves existing entries hashed under
    /// the old rule.
    pub ignore_case: bool,
    /// Key and value ownership.
    pub ownership: Ownership,
    /// Automatic resize policy.
    pub resize: ResizePolicy,
}

impl Settings {
    /// Sets [`Settings::ignore_case`].
    pub fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Sets [`Settings::ownership`].
    pub fn with_ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = ownership;
        self
    }

    /// Sets [`Settings::resize`].
    pub fn with_resize(mut self, resize: ResizePolicy) -> Self {
        self.resize = resize;
        self
    }
}

/// How a map releases values it owns.
pub enum Release<V> {
    /// Drop the value.
    Drop,
    /// Hand the value to a custom function.
    With(Box<dyn Fn(V) + Send + Sync>),
}

impl<V> Release<V> {
    pub(crate) fn release(&self, value: V) {
        match self {
            Release::Drop => drop(value),
            Release::With(f) => f(value),
        }
    }
}

impl<V> Default for Release<V> {
    fn default() -> Self {
        Release::Drop
    }
}

impl<V> Debug for Release<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Release::Drop => f.write_str("Drop"),
            Release::With(_) => f.write_str("With(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert!(!settings.ignore_case);
        assert_eq!(settings.ownership, Ownership::Caller);
        assert_eq!(settings.resize, ResizePolicy::GrowOnly);
        assert!(settings.resize.grows());
        assert!(!settings.resize.shrinks());
    }

    #[test]
    fn ownership_capabilities() {
        assert!(!Ownership::Caller.owns_values());
        assert!(!Ownership::Caller.owns_keys());
        assert!(Ownership::Value.owns_values());
        assert!(!Ownership::Value.owns_keys());
        assert!(Ownership::KeyAndValue.owns_values());
        assert!(Ownership::KeyAndValue.owns_keys());
    }

    #[test]
    fn release_with_counts() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = released.clone();
        let release: Release<u32> = Release::With(Box::new(move |v| {
            counter.fetch_add(v as usize, Ordering::Relaxed);
        }));
        release.release(3);
        release.release(4);
        assert_eq!(released.load(Ordering::Relaxed), 7);
        assert_eq!(format!("{release:?}"), "With(..)");
    }
}
