//! A raw open-addressing hash table using robin-hood linear probing.
//!
//! The table stores values of type `V` together with their 32-bit hash and
//! leaves hashing and equality to the caller, in the same way as
//! [`ByteMap`](crate::ByteMap) drives it.
//!
//! Collisions are resolved by linear probing with robin-hood displacement:
//! an entry being inserted takes the slot of any occupant that sits closer to
//! its home bucket than the incoming entry would. Deletion uses backward
//! shifting instead of tombstones, so every present slot is a live entry.
//!
//! Distance from the home bucket (DIB) is never stored. It is recomputed
//! from the entry's hash and its current index whenever it is needed.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::sync::atomic::AtomicBool;
use core::sync::atomic::Ordering;

use tracing::debug;
use tracing::trace;

use crate::error::Error;
use crate::error::Result;
use crate::settings::ResizePolicy;

/// Smallest capacity a table ever has.
pub const MIN_CAPACITY: usize = 4;

/// Distance of `index` from the home bucket of `hash` in a table of
/// `capacity` slots, wrapping at the end of the slot array.
///
/// `capacity` must be a power of two.
///
/// ```rust
/// use robin_hash::hash_table::dib;
///
/// assert_eq!(dib(5, 5, 8), 0);
/// assert_eq!(dib(5, 7, 8), 2);
/// // Wrapped past the end: home bucket 6, now at index 1.
/// assert_eq!(dib(6, 1, 8), 3);
/// ```
#[inline(always)]
pub fn dib(hash: u32, index: usize, capacity: usize) -> usize {
    debug_assert!(capacity.is_power_of_two());
    let mask = capacity - 1;
    let home = hash as usize & mask;
    (index + capacity - home) & mask
}

/// The result of a load factor check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeDirection {
    /// Double the capacity.
    Grow,
    /// Halve the capacity.
    Shrink,
    /// Leave the capacity alone.
    None,
}

/// Observable table status, shared with anyone holding
/// [`HashTable::status`].
#[derive(Debug, Default)]
pub struct TableStatus {
    resizing: AtomicBool,
}

impl TableStatus {
    /// Returns `true` while a resize is rehashing entries.
    pub fn is_resizing(&self) -> bool {
        self.resizing.load(Ordering::Acquire)
    }
}

struct Resizing(Arc<TableStatus>);

impl Resizing {
    fn engage(status: &Arc<TableStatus>) -> Self {
        status.resizing.store(true, Ordering::Release);
        Resizing(status.clone())
    }
}

impl Drop for Resizing {
    fn drop(&mut self) {
        self.0.resizing.store(false, Ordering::Release);
    }
}

#[derive(Clone)]
struct Slot<V> {
    hash: u32,
    item: V,
}

type Slots<V> = Box<[Option<Slot<V>>]>;

/// Debug statistics for hash table analysis.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of entries currently in the table.
    pub populated: usize,
    /// Number of slots allocated.
    pub capacity: usize,
    /// Load factor (populated / capacity).
    pub load_factor: f64,
    /// Largest DIB of any entry.
    pub max_probe_length: usize,
    /// Mean DIB over all entries.
    pub mean_probe_length: f64,
    /// Bytes used by the slot array.
    pub total_bytes: usize,
}

/// A robin-hood hash table.
///
/// `HashTable<V>` stores values of type `V`. Every operation takes the value's
/// 32-bit hash and an equality predicate; the table never hashes anything
/// itself.
///
/// The capacity is always a power of two and at least [`MIN_CAPACITY`].
/// Under [`ResizePolicy::GrowOnly`] and [`ResizePolicy::GrowAndShrink`] the
/// table doubles before an insert would bring the load factor to 0.75.
///
/// ## Example
///
/// ```rust
/// # use robin_hash::ResizePolicy;
/// # use robin_hash::hash_table::HashTable;
/// # use robin_hash::hasher::default_hash;
/// #
/// let mut table: HashTable<(&str, u32)> = HashTable::new();
///
/// let hash = default_hash(b"alice");
/// table
///     .insert(hash, ("alice", 30), |(k, _)| *k == "alice", ResizePolicy::GrowOnly)
///     .unwrap();
///
/// assert_eq!(table.find(hash, |(k, _)| *k == "alice"), Some(&("alice", 30)));
/// ```
pub struct HashTable<V> {
    slots: Slots<V>,
    populated: usize,
    status: Arc<TableStatus>,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use alloc::format;
        use alloc::string::String;

        let capacity = self.capacity();
        f.debug_struct("HashTable")
            .field(
                "slots",
                &self
                    .slots
                    .iter()
                    .enumerate()
                    .map(|(index, slot)| match slot {
                        Some(slot) => {
                            format!("{:08x}+{}", slot.hash, dib(slot.hash, index, capacity))
                        }
                        None => String::from(".."),
                    })
                    .collect::<Vec<_>>(),
            )
            .field("populated", &self.populated)
            .field("capacity", &capacity)
            .finish()
    }
}

impl<V> Clone for HashTable<V>
where
    V: Clone,
{
    fn clone(&self) -> Self {
        Self {
            slots: self.slots.clone(),
            populated: self.populated,
            status: Arc::default(),
        }
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with [`MIN_CAPACITY`] slots.
    pub fn new() -> Self {
        Self {
            slots: empty_slots(MIN_CAPACITY),
            populated: 0,
            status: Arc::default(),
        }
    }

    /// Creates an empty table that holds at least `capacity` slots.
    ///
    /// The capacity is rounded up to a power of two no smaller than
    /// [`MIN_CAPACITY`].
    ///
    /// # Errors
    ///
    /// [`Error::Allocation`] if the slot array cannot be allocated.
    ///
    /// ```rust
    /// # use robin_hash::Error;
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<u64> = HashTable::try_with_capacity(100).unwrap();
    /// assert_eq!(table.capacity(), 128);
    ///
    /// let err = HashTable::<u64>::try_with_capacity(usize::MAX / 2).unwrap_err();
    /// assert!(matches!(err, Error::Allocation { .. }));
    /// ```
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        let capacity = capacity
            .max(MIN_CAPACITY)
            .checked_next_power_of_two()
            .ok_or(Error::Allocation { capacity })?;

        Ok(Self {
            slots: try_allocate(capacity)?,
            populated: 0,
            status: Arc::default(),
        })
    }

    /// Returns the number of entries in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table contains no entries.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.populated as f64 / self.capacity() as f64
    }

    /// Returns a handle to this table's status flags.
    pub fn status(&self) -> Arc<TableStatus> {
        self.status.clone()
    }

    /// Decides whether a table holding `projected` entries should change
    /// size under `policy`.
    ///
    /// Grows at a load factor of 0.75 or more. Shrinks at 0.20 or less when
    /// the policy allows it and the table is above [`MIN_CAPACITY`].
    ///
    /// ```rust
    /// # use robin_hash::ResizePolicy;
    /// # use robin_hash::hash_table::HashTable;
    /// # use robin_hash::hash_table::ResizeDirection;
    /// #
    /// let table: HashTable<u64> = HashTable::new();
    /// assert_eq!(
    ///     table.resize_direction(3, ResizePolicy::GrowOnly),
    ///     ResizeDirection::Grow
    /// );
    /// assert_eq!(
    ///     table.resize_direction(2, ResizePolicy::GrowOnly),
    ///     ResizeDirection::None
    /// );
    /// ```
    pub fn resize_direction(&self, projected: usize, policy: ResizePolicy) -> ResizeDirection {
        if !policy.grows() {
            return ResizeDirection::None;
        }

        let capacity = self.capacity();
        if projected.saturating_mul(4) >= capacity.saturating_mul(3) {
            ResizeDirection::Grow
        } else if policy.shrinks()
            && capacity > MIN_CAPACITY
            && projected.saturating_mul(5) <= capacity
        {
            ResizeDirection::Shrink
        } else {
            ResizeDirection::None
        }
    }

    /// Finds the slot index of the entry matching `hash` and `eq`.
    ///
    /// The probe gives up at an empty slot, or at an occupant closer to its
    /// own home than the number of steps taken: robin-hood placement would
    /// have put the searched entry before it.
    fn find_index(&self, hash: u32, eq: impl Fn(&V) -> bool) -> Option<usize> {
        let capacity = self.capacity();
        let mask = capacity - 1;
        let mut index = hash as usize & mask;

        for steps in 0..capacity {
            let slot = self.slots[index].as_ref()?;
            if dib(slot.hash, index, capacity) < steps {
                return None;
            }
            if slot.hash == hash && eq(&slot.item) {
                return Some(index);
            }
            index = (index + 1) & mask;
        }

        None
    }

    /// Returns a reference to the entry matching `hash` and `eq`.
    pub fn find(&self, hash: u32, eq: impl Fn(&V) -> bool) -> Option<&V> {
        let index = self.find_index(hash, eq)?;
        self.slots[index].as_ref().map(|slot| &slot.item)
    }

    /// Returns a mutable reference to the entry matching `hash` and `eq`.
    ///
    /// The part of the entry that determines its hash must not change.
    pub fn find_mut(&mut self, hash: u32, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let index = self.find_index(hash, eq)?;
        self.slots[index].as_mut().map(|slot| &mut slot.item)
    }

    /// Inserts `item`, replacing and returning an equal entry if one exists.
    ///
    /// A replaced entry keeps its slot; the table does not resize. A new entry
    /// first grows the table if `policy` asks for it at `len + 1`, then is
    /// placed by robin-hood probing.
    ///
    /// # Errors
    ///
    /// - [`Error::Allocation`] if growing failed. The table is unchanged.
    /// - [`Error::Capacity`] if every slot is taken and the policy does not
    ///   allow growing.
    ///
    /// ```rust
    /// # use robin_hash::ResizePolicy;
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<(u32, &str)> = HashTable::new();
    /// let policy = ResizePolicy::GrowOnly;
    ///
    /// assert_eq!(table.insert(7, (7, "a"), |e| e.0 == 7, policy), Ok(None));
    /// assert_eq!(
    ///     table.insert(7, (7, "b"), |e| e.0 == 7, policy),
    ///     Ok(Some((7, "a")))
    /// );
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn insert(
        &mut self,
        hash: u32,
        item: V,
        eq: impl Fn(&V) -> bool,
        policy: ResizePolicy,
    ) -> Result<Option<V>> {
        if let Some(index) = self.find_index(hash, eq) {
            if let Some(slot) = self.slots[index].as_mut() {
                return Ok(Some(core::mem::replace(&mut slot.item, item)));
            }
        }

        self.insert_unique(hash, item, policy)?;
        Ok(None)
    }

    /// Inserts an entry known not to be present and returns its final slot
    /// index.
    pub(crate) fn insert_unique(
        &mut self,
        hash: u32,
        item: V,
        policy: ResizePolicy,
    ) -> Result<usize> {
        while self.resize_direction(self.populated + 1, policy) == ResizeDirection::Grow {
            self.resize(ResizeDirection::Grow)?;
        }

        let capacity = self.capacity();
        if self.populated + 1 > capacity {
            return Err(Error::Capacity { capacity });
        }

        let home = hash as usize & (capacity - 1);
        let index = probe(&mut self.slots, Slot { hash, item }, home)?;
        self.populated += 1;
        Ok(index)
    }

    /// Removes and returns the entry matching `hash` and `eq`.
    ///
    /// Entries following the removed one on its probe run are shifted back by
    /// one slot until an empty slot or an entry at its home bucket is reached.
    /// Under [`ResizePolicy::GrowAndShrink`] the table halves afterwards if the
    /// remaining entries fall to the low-water mark.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if no entry matches.
    pub fn remove(
        &mut self,
        hash: u32,
        eq: impl Fn(&V) -> bool,
        policy: ResizePolicy,
    ) -> Result<V> {
        let index = self.find_index(hash, eq).ok_or(Error::NotFound)?;
        let direction = self.resize_direction(self.populated - 1, policy);

        let item = self.remove_at(index).ok_or(Error::NotFound)?;

        if direction == ResizeDirection::Shrink {
            if let Err(err) = self.resize(ResizeDirection::Shrink) {
                debug!(%err, capacity = self.capacity(), "skipping shrink");
            }
        }

        Ok(item)
    }

    fn remove_at(&mut self, index: usize) -> Option<V> {
        let capacity = self.capacity();
        let mask = capacity - 1;
        let removed = self.slots[index].take()?;

        let mut hole = index;
        for _ in 1..capacity {
            let next = (hole + 1) & mask;
            match &self.slots[next] {
                Some(slot) if dib(slot.hash, next, capacity) > 0 => {
                    self.slots[hole] = self.slots[next].take();
                    hole = next;
                }
                _ => break,
            }
        }

        self.populated -= 1;
        Some(removed.item)
    }

    /// Doubles or halves the capacity and rehashes every entry.
    ///
    /// Never shrinks below [`MIN_CAPACITY`].
    ///
    /// # Errors
    ///
    /// - [`Error::Allocation`] if the new slot array cannot be allocated.
    /// - [`Error::Capacity`] if the entries would not fit after shrinking.
    ///
    /// Either way the table is left exactly as it was.
    pub fn resize(&mut self, direction: ResizeDirection) -> Result<()> {
        let capacity = self.capacity();
        let new_capacity = match direction {
            ResizeDirection::Grow => capacity
                .checked_mul(2)
                .ok_or(Error::Allocation { capacity: usize::MAX })?,
            ResizeDirection::Shrink => (capacity / 2).max(MIN_CAPACITY),
            ResizeDirection::None => return Ok(()),
        };

        self.resize_to(new_capacity)
    }

    /// Grows the table so that `additional` more entries fit without
    /// triggering a resize.
    ///
    /// # Errors
    ///
    /// [`Error::Allocation`] if the capacity overflows or cannot be
    /// allocated. The table is unchanged.
    ///
    /// ```rust
    /// # use robin_hash::Error;
    /// # use robin_hash::hash_table::HashTable;
    /// #
    /// let mut table: HashTable<u64> = HashTable::new();
    /// table.reserve(100).unwrap();
    /// assert_eq!(table.capacity(), 256);
    ///
    /// assert!(matches!(
    ///     table.reserve(usize::MAX / 2),
    ///     Err(Error::Allocation { .. })
    /// ));
    /// assert_eq!(table.capacity(), 256);
    /// ```
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let required = self
            .populated
            .checked_add(additional)
            .ok_or(Error::Allocation { capacity: usize::MAX })?;
        let capacity = capacity_for(required).ok_or(Error::Allocation { capacity: usize::MAX })?;

        if capacity > self.capacity() {
            self.resize_to(capacity)?;
        }
        Ok(())
    }

    /// Shrinks the table to the smallest capacity that holds its entries
    /// below the growth threshold.
    pub fn shrink_to_fit(&mut self) {
        if let Some(capacity) = capacity_for(self.populated) {
            if capacity < self.capacity() {
                if let Err(err) = self.resize_to(capacity) {
                    debug!(%err, "skipping shrink_to_fit");
                }
            }
        }
    }

    fn resize_to(&mut self, new_capacity: usize) -> Result<()> {
        debug_assert!(new_capacity.is_power_of_two());

        let capacity = self.capacity();
        if new_capacity == capacity {
            return Ok(());
        }
        if new_capacity < MIN_CAPACITY || new_capacity <= self.populated {
            return Err(Error::Capacity {
                capacity: new_capacity,
            });
        }

        let _resizing = Resizing::engage(&self.status);
        let new_slots = try_allocate(new_capacity)?;

        debug!(
            from = capacity,
            to = new_capacity,
            len = self.populated,
            "resizing table"
        );

        let old_slots = core::mem::replace(&mut self.slots, new_slots);
        let moved = self.populated;
        self.populated = 0;

        // The new array has more slots than entries, so every probe finds a
        // free one.
        for slot in old_slots.into_vec().into_iter().flatten() {
            let home = slot.hash as usize & (new_capacity - 1);
            probe(&mut self.slots, slot, home)?;
            self.populated += 1;
        }

        debug_assert_eq!(self.populated, moved);
        trace!(capacity = new_capacity, "resize complete");
        Ok(())
    }

    /// Removes every entry, keeping the capacity.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.populated = 0;
    }

    /// Keeps only the entries for which `keep` returns `true`.
    ///
    /// `keep` is called exactly once per entry. The capacity is unchanged.
    pub fn retain(&mut self, keep: impl FnMut(&mut V) -> bool) {
        self.retain_with(keep, drop);
    }

    /// Like [`HashTable::retain`], handing every removed entry to `removed`.
    pub(crate) fn retain_with(
        &mut self,
        mut keep: impl FnMut(&mut V) -> bool,
        mut removed: impl FnMut(V),
    ) {
        let capacity = self.capacity();
        let mask = capacity - 1;

        // Backward shifts never fill an empty slot, so scanning from one
        // visits every entry once even though removals move entries.
        let Some(start) = self.slots.iter().position(Option::is_none) else {
            self.retain_full(keep, removed);
            return;
        };

        let mut index = (start + 1) & mask;
        for _ in 1..capacity {
            loop {
                let remove = match self.slots[index].as_mut() {
                    Some(slot) => !keep(&mut slot.item),
                    None => false,
                };
                if !remove {
                    break;
                }
                if let Some(item) = self.remove_at(index) {
                    removed(item);
                }
            }
            index = (index + 1) & mask;
        }
    }

    fn retain_full(&mut self, mut keep: impl FnMut(&mut V) -> bool, mut removed: impl FnMut(V)) {
        let capacity = self.capacity();
        let old = core::mem::replace(&mut self.slots, empty_slots(capacity));
        self.populated = 0;

        for mut slot in old.into_vec().into_iter().flatten() {
            if keep(&mut slot.item) {
                let home = slot.hash as usize & (capacity - 1);
                if probe(&mut self.slots, slot, home).is_ok() {
                    self.populated += 1;
                }
            } else {
                removed(slot.item);
            }
        }
    }

    /// Returns an iterator over all entries in an unspecified order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.slots.iter(),
            remaining: self.populated,
        }
    }

    /// Returns an iterator over mutable references to all entries.
    ///
    /// The part of an entry that determines its hash must not change.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            remaining: self.populated,
            inner: self.slots.iter_mut(),
        }
    }

    /// Removes and yields every entry, keeping the capacity.
    ///
    /// The table is empty as soon as `drain` returns, even if the iterator is
    /// not consumed.
    pub fn drain(&mut self) -> Drain<'_, V> {
        let capacity = self.capacity();
        let slots = core::mem::replace(&mut self.slots, empty_slots(capacity));
        let remaining = core::mem::replace(&mut self.populated, 0);

        Drain {
            inner: slots.into_vec().into_iter(),
            remaining,
            _table: core::marker::PhantomData,
        }
    }

    /// Computes a histogram of DIBs: index `d` counts the entries sitting
    /// `d` slots past their home bucket.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> Vec<usize> {
        let capacity = self.capacity();
        let mut hist = Vec::new();

        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(slot) = slot {
                let d = dib(slot.hash, index, capacity);
                if hist.len() <= d {
                    hist.resize(d + 1, 0);
                }
                hist[d] += 1;
            }
        }

        hist
    }

    /// Returns detailed utilization statistics for debugging.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let hist = self.probe_histogram();
        let total: usize = hist.iter().enumerate().map(|(d, n)| d * n).sum();

        DebugStats {
            populated: self.populated,
            capacity: self.capacity(),
            load_factor: self.load_factor(),
            max_probe_length: hist.len().saturating_sub(1),
            mean_probe_length: if self.populated == 0 {
                0.0
            } else {
                total as f64 / self.populated as f64
            },
            total_bytes: self.capacity() * core::mem::size_of::<Option<Slot<V>>>(),
        }
    }

    /// DIB of every slot, `None` for empty ones.
    #[cfg(test)]
    fn slot_dibs(&self) -> Vec<Option<usize>> {
        let capacity = self.capacity();
        self.slots
            .iter()
            .enumerate()
            .map(|(index, slot)| slot.as_ref().map(|s| dib(s.hash, index, capacity)))
            .collect()
    }
}

/// Places `incoming` by robin-hood probing from `initial_index` and returns
/// the index it ended up at.
///
/// At each occupied slot the incoming entry and the occupant are compared by
/// DIB. If the occupant is strictly closer to home it is evicted, takes over
/// as the incoming entry, and probing continues. Ties keep the occupant.
fn probe<V>(slots: &mut [Option<Slot<V>>], mut incoming: Slot<V>, initial_index: usize) -> Result<usize> {
    let capacity = slots.len();
    let mask = capacity - 1;
    let mut index = initial_index;
    let mut placed = None;

    for _ in 0..capacity {
        match slots[index].as_mut() {
            None => {
                slots[index] = Some(incoming);
                return Ok(placed.unwrap_or(index));
            }
            Some(occupant) => {
                if dib(occupant.hash, index, capacity) < dib(incoming.hash, index, capacity) {
                    core::mem::swap(occupant, &mut incoming);
                    placed.get_or_insert(index);
                }
            }
        }
        index = (index + 1) & mask;
    }

    Err(Error::Capacity { capacity })
}

/// Smallest valid capacity that keeps `count` entries below the growth
/// threshold.
fn capacity_for(count: usize) -> Option<usize> {
    let minimum = count.checked_mul(4)? / 3 + 1;
    Some(minimum.checked_next_power_of_two()?.max(MIN_CAPACITY))
}

fn empty_slots<V>(capacity: usize) -> Slots<V> {
    (0..capacity).map(|_| None).collect()
}

fn try_allocate<V>(capacity: usize) -> Result<Slots<V>> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(capacity)
        .map_err(|_| Error::Allocation { capacity })?;
    slots.resize_with(capacity, || None);
    Ok(slots.into_boxed_slice())
}

/// An iterator over the entries of a [`HashTable`].
pub struct Iter<'a, V> {
    inner: core::slice::Iter<'a, Option<Slot<V>>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.by_ref().flatten().next().map(|slot| &slot.item)?;
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

/// A mutable iterator over the entries of a [`HashTable`].
pub struct IterMut<'a, V> {
    inner: core::slice::IterMut<'a, Option<Slot<V>>>,
    remaining: usize,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self
            .inner
            .by_ref()
            .flatten()
            .next()
            .map(|slot| &mut slot.item)?;
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IterMut<'_, V> {}

/// A draining iterator over the entries of a [`HashTable`].
pub struct Drain<'a, V> {
    inner: alloc::vec::IntoIter<Option<Slot<V>>>,
    remaining: usize,
    _table: core::marker::PhantomData<&'a mut HashTable<V>>,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.by_ref().flatten().next().map(|slot| slot.item)?;
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Drain<'_, V> {}
