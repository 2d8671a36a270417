use alloc::boxed::Box;
use alloc::sync::Arc;
use core::fmt::Debug;

use tracing::debug;

use crate::error::Error;
use crate::error::Result;
use crate::hash_table::HashTable;
use crate::hash_table::TableStatus;
use crate::hasher;
use crate::hasher::HashFn;
use crate::hasher::KeyEqualFn;
use crate::hasher::KeySizeFn;
use crate::settings::Release;
use crate::settings::Settings;

/// Key bytes stored in a [`ByteMap`], either borrowed from the caller or
/// owned by the map.
#[derive(Clone, PartialEq, Eq)]
pub enum Key<'k> {
    /// Bytes the caller keeps alive for the lifetime of the map.
    Borrowed(&'k [u8]),
    /// A copy owned by the map.
    Owned(Box<[u8]>),
}

impl Key<'_> {
    /// The full key bytes as given on insert.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Key::Borrowed(bytes) => bytes,
            Key::Owned(bytes) => bytes,
        }
    }

    /// Returns `true` if the map owns the key bytes.
    pub fn is_owned(&self) -> bool {
        matches!(self, Key::Owned(_))
    }
}

impl Debug for Key<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        DebugBytes(self.as_bytes()).fmt(f)
    }
}

struct DebugBytes<'a>(&'a [u8]);

impl Debug for DebugBytes<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("b\"")?;
        for &b in self.0 {
            write!(f, "{}", core::ascii::escape_default(b))?;
        }
        f.write_str("\"")
    }
}

#[derive(Clone)]
struct Entry<'k, V> {
    key: Key<'k>,
    value: V,
}

/// A borrowed view of one entry, as returned by [`ByteMap::get_entry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryRef<'a, V> {
    /// The stored key bytes.
    pub key: &'a [u8],
    /// The stored value.
    pub value: &'a V,
    /// The key's hash.
    pub hash: u32,
}

/// Key hashing and comparison in effect for a map, copied out so it can be
/// used while the table is borrowed mutably.
#[derive(Clone, Copy)]
struct KeyOps {
    hash: HashFn,
    size: KeySizeFn,
    equal: Option<KeyEqualFn>,
    ignore_case: bool,
}

impl KeyOps {
    fn sized<'a>(&self, key: &'a [u8]) -> &'a [u8] {
        &key[..(self.size)(key).min(key.len())]
    }

    fn hash(&self, key: &[u8]) -> u32 {
        let key = self.sized(key);
        if self.ignore_case {
            hasher::hash_ignore_case(self.hash, key)
        } else {
            (self.hash)(key)
        }
    }

    fn equal(&self, a: &[u8], b: &[u8]) -> bool {
        let (a, b) = (self.sized(a), self.sized(b));
        match self.equal {
            Some(equal) => equal(a, b),
            None if self.ignore_case => hasher::bytes_equal_ignore_case(a, b),
            None => hasher::bytes_equal(a, b),
        }
    }
}

/// A hash map from byte-string keys to values, backed by a robin-hood
/// [`HashTable`].
///
/// Keys are measured, hashed and compared by pluggable functions. The
/// defaults treat keys as C strings (see [`hasher`](crate::hasher)). Who
/// releases keys and values is chosen by [`Settings::ownership`].
///
/// ```rust
/// use robin_hash::ByteMap;
/// use robin_hash::Error;
///
/// let mut map = ByteMap::new();
/// map.insert(b"a", 1).unwrap();
/// map.insert(b"b", 2).unwrap();
/// map.insert(b"c", 3).unwrap();
/// assert_eq!(map.capacity(), 8);
///
/// assert_eq!(map.get(b"b"), Some(&2));
/// map.delete(b"a").unwrap();
/// assert_eq!(map.get_entry(b"a").unwrap_err(), Error::NotFound);
/// assert_eq!(map.len(), 2);
/// ```
pub struct ByteMap<'k, V> {
    table: HashTable<Entry<'k, V>>,
    hash_fn: HashFn,
    key_size_fn: KeySizeFn,
    key_equal_fn: Option<KeyEqualFn>,
    release: Release<V>,
    settings: Settings,
}

impl<'k, V> Debug for ByteMap<'k, V>
where
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(&DebugBytes(k), v);
        }
        map.finish()
    }
}

impl<'k, V> Default for ByteMap<'k, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'k, V> Clone for ByteMap<'k, V>
where
    V: Clone,
{
    /// Clones entries and key functions. The clone releases values by
    /// dropping them; install a release function again if needed.
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            hash_fn: self.hash_fn,
            key_size_fn: self.key_size_fn,
            key_equal_fn: self.key_equal_fn,
            release: Release::Drop,
            settings: self.settings,
        }
    }
}

impl<'k, V> Drop for ByteMap<'k, V> {
    fn drop(&mut self) {
        if self.settings.ownership.owns_values() && matches!(self.release, Release::With(_)) {
            for entry in self.table.drain() {
                self.release.release(entry.value);
            }
        }
    }
}

impl<'k, V> ByteMap<'k, V> {
    /// Creates an empty map with default key functions and settings.
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    /// Creates an empty map with the given settings.
    ///
    /// ```rust
    /// use robin_hash::ByteMap;
    /// use robin_hash::Settings;
    ///
    /// let mut map = ByteMap::with_settings(Settings::default().with_ignore_case(true));
    /// map.insert(b"Content-Type", "text/plain").unwrap();
    /// assert_eq!(map.get(b"content-type"), Some(&"text/plain"));
    /// ```
    pub fn with_settings(settings: Settings) -> Self {
        Self::from_table(HashTable::new(), settings)
    }

    /// Creates an empty map with room for at least `capacity` slots.
    ///
    /// # Errors
    ///
    /// [`Error::Allocation`] if the slot array cannot be allocated.
    pub fn try_with_capacity(capacity: usize, settings: Settings) -> Result<Self> {
        Ok(Self::from_table(HashTable::try_with_capacity(capacity)?, settings))
    }

    fn from_table(table: HashTable<Entry<'k, V>>, settings: Settings) -> Self {
        Self {
            table,
            hash_fn: hasher::default_hash,
            key_size_fn: hasher::strlen_key_size,
            key_equal_fn: None,
            release: Release::Drop,
            settings,
        }
    }

    fn ops(&self) -> KeyOps {
        KeyOps {
            hash: self.hash_fn,
            size: self.key_size_fn,
            equal: self.key_equal_fn,
            ignore_case: self.settings.ignore_case,
        }
    }

    /// Returns the current settings.
    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Replaces the settings.
    ///
    /// Accepted at any time. Switching [`Settings::ignore_case`] on a
    /// non-empty map leaves existing entries hashed under the previous rule,
    /// so some may no longer be found.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Replaces the hash function.
    ///
    /// # Errors
    ///
    /// [`Error::Generic`] if the map holds any entry.
    ///
    /// ```rust
    /// use robin_hash::ByteMap;
    ///
    /// let mut map = ByteMap::new();
    /// map.set_hash_fn(|key| key.len() as u32).unwrap();
    /// map.insert(b"abc", 1).unwrap();
    /// assert!(map.set_hash_fn(|_| 0).is_err());
    /// ```
    pub fn set_hash_fn(&mut self, hash_fn: HashFn) -> Result<()> {
        self.ensure_empty("hash function")?;
        self.hash_fn = hash_fn;
        Ok(())
    }

    /// Replaces the key size function.
    ///
    /// # Errors
    ///
    /// [`Error::Generic`] if the map holds any entry.
    pub fn set_key_size_fn(&mut self, key_size_fn: KeySizeFn) -> Result<()> {
        self.ensure_empty("key size function")?;
        self.key_size_fn = key_size_fn;
        Ok(())
    }

    /// Replaces the key comparison function.
    ///
    /// A custom comparison is used as is, also when
    /// [`Settings::ignore_case`] is set.
    ///
    /// # Errors
    ///
    /// [`Error::Generic`] if the map holds any entry.
    pub fn set_key_equal_fn(&mut self, key_equal_fn: KeyEqualFn) -> Result<()> {
        self.ensure_empty("key comparison function")?;
        self.key_equal_fn = Some(key_equal_fn);
        Ok(())
    }

    fn ensure_empty(&self, what: &str) -> Result<()> {
        if self.table.is_empty() {
            return Ok(());
        }
        debug!(len = self.table.len(), what, "rejected key function change");
        Error::generic(alloc::format!(
            "cannot replace the {what} of a map holding {} entries",
            self.table.len()
        ))
    }

    /// Installs a function that receives every value the map releases.
    ///
    /// Only consulted when [`Settings::ownership`] gives the map ownership of
    /// values.
    pub fn set_release_fn(&mut self, release: impl Fn(V) + Send + Sync + 'static) {
        self.release = Release::With(Box::new(release));
    }

    /// Sets how released values are disposed of.
    pub fn set_release(&mut self, release: Release<V>) {
        self.release = release;
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the number of slots.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns a handle to the table's status flags.
    pub fn status(&self) -> Arc<TableStatus> {
        self.table.status()
    }

    /// Computes a histogram of probe distances, see
    /// [`HashTable::probe_histogram`].
    #[cfg(feature = "stats")]
    pub fn probe_histogram(&self) -> alloc::vec::Vec<usize> {
        self.table.probe_histogram()
    }

    /// Returns utilization statistics, see [`HashTable::debug_stats`].
    #[cfg(feature = "stats")]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }

    /// Computes the hash the map uses for `key`.
    pub fn hash_key(&self, key: &[u8]) -> u32 {
        self.ops().hash(key)
    }

    /// Inserts a key-value pair.
    ///
    /// The key is copied if the map owns keys, otherwise borrowed. If an
    /// equal key is present its entry is replaced in place: the old value is
    /// released when the map owns values, or returned when the caller does.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] for an empty key.
    /// - [`Error::Allocation`] if the table had to grow and could not.
    /// - [`Error::Capacity`] if the table is full and may not grow.
    ///
    /// ```rust
    /// use robin_hash::ByteMap;
    ///
    /// let mut map = ByteMap::new();
    /// assert_eq!(map.insert(b"k", 1), Ok(None));
    /// assert_eq!(map.insert(b"k", 2), Ok(Some(1)));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: &'k [u8], value: V) -> Result<Option<V>> {
        let key = if self.settings.ownership.owns_keys() {
            Key::Owned(key.into())
        } else {
            Key::Borrowed(key)
        };
        self.insert_key(key, value)
    }

    /// Inserts a key-value pair with explicitly chosen key storage.
    ///
    /// Otherwise behaves like [`ByteMap::insert`].
    pub fn insert_key(&mut self, key: Key<'k>, value: V) -> Result<Option<V>> {
        if key.as_bytes().is_empty() {
            return Err(Error::InvalidInput("empty key"));
        }

        let ops = self.ops();
        let hash = ops.hash(key.as_bytes());
        let existing = self
            .table
            .find_mut(hash, |e| ops.equal(e.key.as_bytes(), key.as_bytes()));

        if let Some(existing) = existing {
            let old = core::mem::replace(existing, Entry { key, value });
            return Ok(self.displaced(old.value));
        }

        self.table
            .insert_unique(hash, Entry { key, value }, self.settings.resize)?;
        Ok(None)
    }

    fn displaced(&self, value: V) -> Option<V> {
        if self.settings.ownership.owns_values() {
            self.release.release(value);
            None
        } else {
            Some(value)
        }
    }

    /// Returns a reference to the value stored for `key`.
    pub fn get(&self, key: &[u8]) -> Option<&V> {
        let ops = self.ops();
        self.table
            .find(ops.hash(key), |e| ops.equal(e.key.as_bytes(), key))
            .map(|e| &e.value)
    }

    /// Returns a mutable reference to the value stored for `key`.
    pub fn get_mut(&mut self, key: &[u8]) -> Option<&mut V> {
        let ops = self.ops();
        self.table
            .find_mut(ops.hash(key), |e| ops.equal(e.key.as_bytes(), key))
            .map(|e| &mut e.value)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Looks up the entry stored for `key`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] for an empty key.
    /// - [`Error::NotFound`] if the key is absent.
    ///
    /// ```rust
    /// use robin_hash::ByteMap;
    ///
    /// let mut map = ByteMap::new();
    /// map.insert(b"name\0padding", 7).unwrap();
    ///
    /// // The default key size stops at the first NUL.
    /// let entry = map.get_entry(b"name").unwrap();
    /// assert_eq!(entry.key, b"name\0padding");
    /// assert_eq!(entry.value, &7);
    /// ```
    pub fn get_entry(&self, key: &[u8]) -> Result<EntryRef<'_, V>> {
        if key.is_empty() {
            return Err(Error::InvalidInput("empty key"));
        }

        let ops = self.ops();
        let hash = ops.hash(key);
        self.table
            .find(hash, |e| ops.equal(e.key.as_bytes(), key))
            .map(|e| EntryRef {
                key: e.key.as_bytes(),
                value: &e.value,
                hash,
            })
            .ok_or(Error::NotFound)
    }

    /// Deletes the entry stored for `key`.
    ///
    /// The value is released when the map owns values and returned when the
    /// caller does.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] for an empty key.
    /// - [`Error::NotFound`] if the key is absent.
    pub fn delete(&mut self, key: &[u8]) -> Result<Option<V>> {
        let value = self.remove(key)?;
        Ok(self.displaced(value))
    }

    /// Removes the entry stored for `key` and returns its value, whatever the
    /// ownership settings.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] for an empty key.
    /// - [`Error::NotFound`] if the key is absent.
    pub fn remove(&mut self, key: &[u8]) -> Result<V> {
        if key.is_empty() {
            return Err(Error::InvalidInput("empty key"));
        }

        let ops = self.ops();
        let entry = self.table.remove(
            ops.hash(key),
            |e| ops.equal(e.key.as_bytes(), key),
            self.settings.resize,
        )?;
        Ok(entry.value)
    }

    /// Grows the map so that `additional` more entries fit without a resize.
    ///
    /// # Errors
    ///
    /// [`Error::Allocation`] if the capacity cannot be allocated. The map is
    /// unchanged.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.table.reserve(additional)
    }

    /// Shrinks the capacity as far as the entries allow.
    pub fn shrink_to_fit(&mut self) {
        self.table.shrink_to_fit();
    }

    /// Removes every entry, releasing values the map owns.
    pub fn clear(&mut self) {
        if self.settings.ownership.owns_values() {
            for entry in self.table.drain() {
                self.release.release(entry.value);
            }
        } else {
            self.table.clear();
        }
    }

    /// Keeps only the entries for which `keep` returns `true`, releasing the
    /// values of the others when the map owns values.
    ///
    /// ```rust
    /// use robin_hash::ByteMap;
    ///
    /// let mut map = ByteMap::new();
    /// map.try_extend([(&b"a"[..], 1), (&b"b"[..], 2), (&b"c"[..], 3)])
    ///     .unwrap();
    /// map.retain(|_, v| *v % 2 == 1);
    /// assert_eq!(map.len(), 2);
    /// assert!(!map.contains_key(b"b"));
    /// ```
    pub fn retain(&mut self, mut keep: impl FnMut(&[u8], &mut V) -> bool) {
        let owns_values = self.settings.ownership.owns_values();
        let release = &self.release;
        self.table.retain_with(
            |e| keep(e.key.as_bytes(), &mut e.value),
            |e| {
                if owns_values {
                    release.release(e.value);
                }
            },
        );
    }

    /// Inserts every pair from `iter`, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// The first error returned by [`ByteMap::insert`]. Pairs before it stay
    /// inserted.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'k [u8], V)>,
    {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        self.reserve(lower)?;
        for (key, value) in iter {
            self.insert(key, value)?;
        }
        Ok(())
    }

    /// Returns an iterator over key-value pairs in an unspecified order.
    pub fn iter(&self) -> Iter<'_, 'k, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Returns an iterator over the values.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Returns an iterator over mutable references to the values.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        self.table.iter_mut().map(|e| &mut e.value)
    }

    /// Removes every entry and hands keys and values to the caller.
    ///
    /// No value is released, whatever the ownership settings.
    pub fn drain(&mut self) -> impl Iterator<Item = (Key<'k>, V)> + '_ {
        self.table.drain().map(|e| (e.key, e.value))
    }
}

/// An iterator over the entries of a [`ByteMap`].
pub struct Iter<'a, 'k, V> {
    inner: crate::hash_table::Iter<'a, Entry<'k, V>>,
}

impl<'a, 'k, V> Iterator for Iter<'a, 'k, V> {
    type Item = (&'a [u8], &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|e| (e.key.as_bytes(), &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Iter<'_, '_, V> {}

impl<'a, 'k, V> IntoIterator for &'a ByteMap<'k, V> {
    type Item = (&'a [u8], &'a V);
    type IntoIter = Iter<'a, 'k, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec::Vec;
    use core::hash::Hasher;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use siphasher::sip::SipHasher;

    use super::*;
    use crate::settings::Ownership;
    use crate::settings::ResizePolicy;

    fn counting_release(map: &mut ByteMap<'_, u32>) -> Arc<AtomicUsize> {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = released.clone();
        map.set_release_fn(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        released
    }

    #[test]
    fn end_to_end() {
        let mut map = ByteMap::new();
        assert_eq!(map.capacity(), 4);

        map.insert(b"a", 1).unwrap();
        map.insert(b"b", 2).unwrap();
        assert_eq!(map.capacity(), 4);
        map.insert(b"c", 3).unwrap();
        assert_eq!(map.capacity(), 8);
        assert_eq!(map.len(), 3);

        assert_eq!(map.get(b"b"), Some(&2));
        map.delete(b"a").unwrap();
        assert_eq!(map.get_entry(b"a").unwrap_err(), Error::NotFound);
        assert_eq!(map.get(b"b"), Some(&2));
        assert_eq!(map.get(b"c"), Some(&3));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn empty_key_is_invalid() {
        let mut map: ByteMap<'_, u32> = ByteMap::new();
        assert_eq!(map.insert(b"", 1), Err(Error::InvalidInput("empty key")));
        assert_eq!(map.delete(b""), Err(Error::InvalidInput("empty key")));
        assert_eq!(
            map.get_entry(b"").unwrap_err(),
            Error::InvalidInput("empty key")
        );
        assert_eq!(map.get(b""), None);
        assert!(map.is_empty());
    }

    #[test]
    fn delete_missing_key() {
        let mut map = ByteMap::new();
        map.insert(b"present", 1).unwrap();
        assert_eq!(map.delete(b"absent"), Err(Error::NotFound));
        assert_eq!(map.remove(b"absent"), Err(Error::NotFound));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn caller_owned_values_are_handed_back() {
        let mut map = ByteMap::new();
        let released = counting_release(&mut map);

        assert_eq!(map.insert(b"k", 1), Ok(None));
        assert_eq!(map.insert(b"k", 2), Ok(Some(1)));
        assert_eq!(map.delete(b"k"), Ok(Some(2)));
        assert_eq!(released.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn owned_values_are_released_once() {
        let mut map = ByteMap::with_settings(Settings::default().with_ownership(Ownership::Value));
        let released = counting_release(&mut map);

        assert_eq!(map.insert(b"k", 1), Ok(None));
        assert_eq!(map.insert(b"k", 2), Ok(None));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(b"k"), Some(&2));
        assert_eq!(released.load(Ordering::Relaxed), 1);

        assert_eq!(map.delete(b"k"), Ok(None));
        assert_eq!(released.load(Ordering::Relaxed), 2);

        map.insert(b"x", 3).unwrap();
        map.insert(b"y", 4).unwrap();
        map.clear();
        assert_eq!(released.load(Ordering::Relaxed), 4);
        assert!(map.is_empty());

        map.insert(b"z", 5).unwrap();
        drop(map);
        assert_eq!(released.load(Ordering::Relaxed), 5);
    }

    #[test]
    fn remove_bypasses_release() {
        let mut map = ByteMap::with_settings(Settings::default().with_ownership(Ownership::Value));
        let released = counting_release(&mut map);
        map.insert(b"k", 9).unwrap();
        assert_eq!(map.remove(b"k"), Ok(9));
        assert_eq!(released.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn released_values_are_the_displaced_ones() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut map = ByteMap::with_settings(Settings::default().with_ownership(Ownership::Value));
        map.set_release_fn(move |v: String| sink.lock().unwrap().push(v));

        map.insert(b"k", "first".to_string()).unwrap();
        map.insert(b"k", "second".to_string()).unwrap();
        map.delete(b"k").unwrap();
        assert_eq!(*seen.lock().unwrap(), ["first", "second"]);
    }

    #[test]
    fn key_storage_follows_ownership() {
        let key = b"borrowed".to_vec();
        let mut map = ByteMap::new();
        map.insert(&key, 1).unwrap();
        let (stored, _) = map.drain().next().unwrap();
        assert!(!stored.is_owned());

        let mut map =
            ByteMap::with_settings(Settings::default().with_ownership(Ownership::KeyAndValue));
        map.insert(&key, 1).unwrap();
        let (stored, _) = map.drain().next().unwrap();
        assert!(stored.is_owned());
        assert_eq!(stored.as_bytes(), b"borrowed");
    }

    #[test]
    fn owned_keys_outlive_their_source() {
        let mut map: ByteMap<'static, u32> =
            ByteMap::with_settings(Settings::default().with_ownership(Ownership::KeyAndValue));
        for i in 0..10u32 {
            let key = format!("key-{i}");
            map.insert_key(Key::Owned(key.as_bytes().into()), i).unwrap();
        }
        for i in 0..10u32 {
            assert_eq!(map.get(format!("key-{i}").as_bytes()), Some(&i));
        }
    }

    #[test]
    fn strlen_sizing() {
        let mut map = ByteMap::new();
        map.insert(b"abc\0one", 1).unwrap();
        assert_eq!(map.insert(b"abc\0two", 2), Ok(Some(1)));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(b"abc"), Some(&2));
        assert_eq!(map.get(b"ab"), None);
    }

    #[test]
    fn custom_key_size() {
        let mut map = ByteMap::new();
        map.set_key_size_fn(|key| key.len()).unwrap();
        map.insert(b"abc\0one", 1).unwrap();
        map.insert(b"abc\0two", 2).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(b"abc"), None);
        assert_eq!(map.get(b"abc\0one"), Some(&1));
    }

    #[test]
    fn ignore_case() {
        let mut map = ByteMap::with_settings(Settings::default().with_ignore_case(true));
        map.insert(b"Host", 1).unwrap();
        assert_eq!(map.insert(b"HOST", 2), Ok(Some(1)));
        assert_eq!(map.get(b"host"), Some(&2));
        assert_eq!(map.len(), 1);

        let mut strict = ByteMap::new();
        strict.insert(b"Host", 1).unwrap();
        strict.insert(b"HOST", 2).unwrap();
        assert_eq!(strict.len(), 2);
    }

    #[test]
    fn custom_hash_fn() {
        fn sip(key: &[u8]) -> u32 {
            let mut h = SipHasher::new_with_keys(7, 11);
            h.write(key);
            h.finish() as u32
        }

        let mut map = ByteMap::new();
        map.set_hash_fn(sip).unwrap();
        for i in 0..200u32 {
            let key = format!("sip-{i}");
            map.insert_key(Key::Owned(key.as_bytes().into()), i).unwrap();
        }
        assert_eq!(map.hash_key(b"sip-3"), sip(b"sip-3"));
        for i in 0..200u32 {
            assert_eq!(map.get(format!("sip-{i}").as_bytes()), Some(&i));
        }
    }

    #[test]
    fn constant_hash_still_works() {
        let keys: Vec<String> = (0..50).map(|i| format!("k{i}")).collect();
        let mut map = ByteMap::new();
        map.set_hash_fn(|_| 42).unwrap();
        for (i, key) in keys.iter().enumerate() {
            map.insert(key.as_bytes(), i).unwrap();
        }
        for (i, key) in keys.iter().enumerate().step_by(3) {
            assert_eq!(map.delete(key.as_bytes()), Ok(Some(i)));
        }
        for (i, key) in keys.iter().enumerate() {
            let expected = if i % 3 == 0 { None } else { Some(&i) };
            assert_eq!(map.get(key.as_bytes()), expected);
        }
    }

    #[test]
    fn key_functions_locked_once_populated() {
        let mut map = ByteMap::new();
        map.insert(b"k", 1).unwrap();

        assert!(matches!(map.set_hash_fn(|_| 0), Err(Error::Generic(_))));
        assert!(matches!(
            map.set_key_size_fn(|k| k.len()),
            Err(Error::Generic(_))
        ));
        assert!(matches!(
            map.set_key_equal_fn(|a, b| a == b),
            Err(Error::Generic(_))
        ));
        assert_eq!(map.get(b"k"), Some(&1));

        map.delete(b"k").unwrap();
        assert!(map.set_hash_fn(|_| 0).is_ok());
    }

    #[test]
    fn custom_equality() {
        let mut map = ByteMap::new();
        map.set_hash_fn(|key| key.len() as u32).unwrap();
        map.set_key_equal_fn(|a, b| a.len() == b.len()).unwrap();
        map.insert(b"abc", 1).unwrap();
        assert_eq!(map.get(b"xyz"), Some(&1));
        assert_eq!(map.get(b"wxyz"), None);
    }

    #[test]
    fn disabled_resize_reports_capacity() {
        let mut map = ByteMap::with_settings(
            Settings::default().with_resize(ResizePolicy::Disabled),
        );
        for key in [b"a", b"b", b"c", b"d"] {
            map.insert(key, 0).unwrap();
        }
        assert_eq!(map.capacity(), 4);
        assert_eq!(map.insert(b"e", 0), Err(Error::Capacity { capacity: 4 }));
        // Overwrites still succeed on a full table.
        assert_eq!(map.insert(b"a", 1), Ok(Some(0)));
    }

    #[test]
    fn capacity_floor_under_deletes() {
        let keys: Vec<String> = (0..100).map(|i| format!("key{i}")).collect();
        for settings in [
            Settings::default(),
            Settings::default().with_resize(ResizePolicy::GrowAndShrink),
        ] {
            let mut map = ByteMap::with_settings(settings);
            for key in &keys {
                map.insert(key.as_bytes(), ()).unwrap();
            }
            for key in &keys {
                map.delete(key.as_bytes()).unwrap();
                assert!(map.capacity() >= 4);
            }
            assert!(map.is_empty());
        }
    }

    #[test]
    fn grow_and_shrink_preserves_values() {
        let keys: Vec<String> = (0..300).map(|i| format!("entry/{i}")).collect();
        let mut map = ByteMap::with_settings(
            Settings::default().with_resize(ResizePolicy::GrowAndShrink),
        );
        for (i, key) in keys.iter().enumerate() {
            map.insert(key.as_bytes(), i).unwrap();
        }
        let grown = map.capacity();

        for key in &keys[..280] {
            map.delete(key.as_bytes()).unwrap();
        }
        assert!(map.capacity() < grown);
        for (i, key) in keys.iter().enumerate().skip(280) {
            assert_eq!(map.get(key.as_bytes()), Some(&i));
        }
    }

    #[test]
    fn retain_releases_dropped_values() {
        let keys: Vec<String> = (0..30).map(|i| format!("r{i}")).collect();
        let mut map = ByteMap::with_settings(Settings::default().with_ownership(Ownership::Value));
        let released = counting_release(&mut map);
        for (i, key) in keys.iter().enumerate() {
            map.insert(key.as_bytes(), i as u32).unwrap();
        }

        map.retain(|key, value| {
            *value += 100;
            key.ends_with(b"0")
        });

        assert_eq!(map.len(), 3);
        assert_eq!(released.load(Ordering::Relaxed), 27);
        assert_eq!(map.get(b"r20"), Some(&120));
        assert_eq!(map.get(b"r21"), None);
    }

    #[test]
    fn try_extend_stops_at_first_error() {
        let mut map = ByteMap::new();
        let pairs: [(&[u8], u32); 3] = [(b"x", 1), (b"", 2), (b"y", 3)];
        assert_eq!(
            map.try_extend(pairs),
            Err(Error::InvalidInput("empty key"))
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(b"x"), Some(&1));
        assert!(!map.contains_key(b"y"));
    }

    #[test]
    fn get_mut_and_values_mut() {
        let mut map = ByteMap::new();
        map.insert(b"x", 1).unwrap();
        map.insert(b"y", 2).unwrap();
        *map.get_mut(b"x").unwrap() += 10;
        for v in map.values_mut() {
            *v *= 2;
        }
        assert_eq!(map.get(b"x"), Some(&22));
        assert_eq!(map.get(b"y"), Some(&4));
        assert!(map.get_mut(b"z").is_none());
    }

    #[test]
    fn iteration_is_complete() {
        let keys: Vec<String> = (0..40).map(|i| format!("it{i}")).collect();
        let mut map = ByteMap::new();
        for (i, key) in keys.iter().enumerate() {
            map.insert(key.as_bytes(), i).unwrap();
        }

        assert_eq!(map.iter().len(), 40);
        let mut seen: Vec<usize> = map.values().copied().collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..40).collect::<Vec<_>>());
        let mut names: Vec<&[u8]> = map.keys().collect();
        names.sort_unstable();
        let mut expected: Vec<&[u8]> = keys.iter().map(|k| k.as_bytes()).collect();
        expected.sort_unstable();
        assert_eq!(names, expected);
        assert_eq!((&map).into_iter().count(), 40);
    }

    #[test]
    fn reserve_and_shrink_to_fit() {
        let mut map: ByteMap<'_, u8> = ByteMap::new();
        map.reserve(100).unwrap();
        assert_eq!(map.capacity(), 256);
        assert!(matches!(
            map.reserve(usize::MAX),
            Err(Error::Allocation { .. })
        ));
        assert_eq!(map.capacity(), 256);

        map.insert(b"one", 1).unwrap();
        map.shrink_to_fit();
        assert_eq!(map.capacity(), 4);
        assert_eq!(map.get(b"one"), Some(&1));
    }

    #[test]
    fn try_with_capacity_reports_allocation_failure() {
        assert!(matches!(
            ByteMap::<u64>::try_with_capacity(usize::MAX / 2, Settings::default()),
            Err(Error::Allocation { .. })
        ));
        let map = ByteMap::<u64>::try_with_capacity(20, Settings::default()).unwrap();
        assert_eq!(map.capacity(), 32);
    }

    #[test]
    fn clone_drops_custom_release() {
        let mut map = ByteMap::with_settings(Settings::default().with_ownership(Ownership::Value));
        let released = counting_release(&mut map);
        map.insert(b"k", 1).unwrap();

        let mut copy = map.clone();
        copy.insert(b"k", 2).unwrap();
        assert_eq!(released.load(Ordering::Relaxed), 0);
        assert_eq!(map.get(b"k"), Some(&1));
        assert_eq!(copy.get(b"k"), Some(&2));
    }

    #[test]
    fn debug_output() {
        let mut map = ByteMap::new();
        map.insert(b"k\n", 1).unwrap();
        assert_eq!(format!("{map:?}"), "{b\"k\\n\": 1}");
        assert_eq!(
            format!("{:?}", Key::Borrowed(b"\x00a")),
            "b\"\\x00a\""
        );
    }

    #[test]
    fn entry_ref_reports_hash() {
        let mut map = ByteMap::new();
        map.insert(b"k", 1).unwrap();
        let entry = map.get_entry(b"k").unwrap();
        assert_eq!(entry.hash, hasher::default_hash(b"k"));
        assert_eq!(entry.hash, map.hash_key(b"k"));
    }
}
