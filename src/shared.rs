//! A [`ByteMap`] behind a lock, for use from several threads.

use alloc::sync::Arc;

use parking_lot::Mutex;
use parking_lot::MutexGuard;

use crate::byte_map::ByteMap;
use crate::byte_map::Key;
use crate::error::Result;
use crate::hash_table::TableStatus;
use crate::hasher::HashFn;
use crate::hasher::KeyEqualFn;
use crate::hasher::KeySizeFn;
use crate::settings::Settings;

/// A [`ByteMap`] whose every operation, lookups included, runs under one
/// mutex.
///
/// Keys are always copied on insert. Whether the map releases displaced
/// values still follows [`Settings::ownership`].
///
/// ```rust
/// use std::thread;
///
/// use robin_hash::SharedByteMap;
///
/// let map = SharedByteMap::new();
/// thread::scope(|s| {
///     for t in 0..4u32 {
///         let map = &map;
///         s.spawn(move || {
///             for i in 0..100u32 {
///                 map.insert(format!("{t}/{i}").as_bytes(), i).unwrap();
///             }
///         });
///     }
/// });
/// assert_eq!(map.len(), 400);
/// assert_eq!(map.get(b"3/99"), Some(99));
/// ```
pub struct SharedByteMap<V> {
    inner: Mutex<ByteMap<'static, V>>,
    status: Arc<TableStatus>,
}

impl<V> Default for SharedByteMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> core::fmt::Debug for SharedByteMap<V>
where
    V: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedByteMap")
            .field("inner", &*self.inner.lock())
            .finish()
    }
}

impl<V> From<ByteMap<'static, V>> for SharedByteMap<V> {
    fn from(map: ByteMap<'static, V>) -> Self {
        Self {
            status: map.status(),
            inner: Mutex::new(map),
        }
    }
}

impl<V> SharedByteMap<V> {
    /// Creates an empty map with default settings.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Creates an empty map with the given settings.
    pub fn with_settings(settings: Settings) -> Self {
        ByteMap::with_settings(settings).into()
    }

    /// Locks the map for a sequence of operations that must not interleave
    /// with other threads.
    ///
    /// ```rust
    /// use robin_hash::SharedByteMap;
    ///
    /// let map = SharedByteMap::new();
    /// {
    ///     let mut map = map.lock();
    ///     if !map.contains_key(b"counter") {
    ///         map.insert_key(robin_hash::Key::Owned(Box::from(&b"counter"[..])), 0).unwrap();
    ///     }
    ///     *map.get_mut(b"counter").unwrap() += 1;
    /// }
    /// assert_eq!(map.get(b"counter"), Some(1));
    /// ```
    pub fn lock(&self) -> MutexGuard<'_, ByteMap<'static, V>> {
        self.inner.lock()
    }

    /// Returns `true` while a resize is in progress.
    ///
    /// Reads a flag without taking the lock.
    pub fn is_resizing(&self) -> bool {
        self.status.is_resizing()
    }

    /// Inserts a copy of `key` with `value`. See [`ByteMap::insert`].
    pub fn insert(&self, key: &[u8], value: V) -> Result<Option<V>> {
        self.inner.lock().insert_key(Key::Owned(key.into()), value)
    }

    /// Returns a clone of the value stored for `key`.
    pub fn get(&self, key: &[u8]) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Runs `f` on the value stored for `key` while holding the lock.
    pub fn with_value<R>(&self, key: &[u8], f: impl FnOnce(&V) -> R) -> Option<R> {
        self.inner.lock().get(key).map(f)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.inner.lock().contains_key(key)
    }

    /// See [`ByteMap::delete`].
    pub fn delete(&self, key: &[u8]) -> Result<Option<V>> {
        self.inner.lock().delete(key)
    }

    /// See [`ByteMap::remove`].
    pub fn remove(&self, key: &[u8]) -> Result<V> {
        self.inner.lock().remove(key)
    }

    /// See [`ByteMap::set_hash_fn`].
    pub fn set_hash_fn(&self, hash_fn: HashFn) -> Result<()> {
        self.inner.lock().set_hash_fn(hash_fn)
    }

    /// See [`ByteMap::set_key_size_fn`].
    pub fn set_key_size_fn(&self, key_size_fn: KeySizeFn) -> Result<()> {
        self.inner.lock().set_key_size_fn(key_size_fn)
    }

    /// See [`ByteMap::set_key_equal_fn`].
    pub fn set_key_equal_fn(&self, key_equal_fn: KeyEqualFn) -> Result<()> {
        self.inner.lock().set_key_equal_fn(key_equal_fn)
    }

    /// See [`ByteMap::set_release_fn`].
    pub fn set_release_fn(&self, release: impl Fn(V) + Send + Sync + 'static) {
        self.inner.lock().set_release_fn(release);
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns the number of slots.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Removes every entry, releasing values the map owns.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Consumes the lock and returns the map.
    pub fn into_inner(self) -> ByteMap<'static, V> {
        self.inner.into_inner()
    }
}
