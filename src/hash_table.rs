use alloc::alloc::handle_alloc_error;
use alloc::collections::TryReserveError;
use alloc::vec::Vec;
use core::alloc::Layout;
use core::fmt::Debug;
use core::iter::Flatten;

/// Number of buckets a freshly constructed table starts with.
pub const INITIAL_CAPACITY: usize = 16;

/// Load factor above which an insertion doubles the bucket array.
pub const UPPER_THRESHOLD: f64 = 0.75;

/// Load factor below which a removal halves the bucket array.
pub const LOWER_THRESHOLD: f64 = 0.25;

/// `populated / capacity > 3/4`, without going through floating point.
#[inline(always)]
fn exceeds_upper_threshold(populated: usize, capacity: usize) -> bool {
    populated as u128 * 4 > capacity as u128 * 3
}

/// `populated / capacity < 1/4`, without going through floating point.
#[inline(always)]
fn below_lower_threshold(populated: usize, capacity: usize) -> bool {
    (populated as u128 * 4) < capacity as u128
}

/// A chain of `(hash, value)` pairs sharing one masked bucket index, kept in
/// insertion order.
type Bucket<V> = Vec<(u64, V)>;

#[derive(Clone, Copy)]
enum Fallibility {
    Fallible,
    Infallible,
}

impl Fallibility {
    /// Turns a failed reservation of `len` items of `T` into either an error
    /// for the caller or an allocation-failure abort.
    #[cold]
    #[inline(never)]
    fn alloc_err<T>(self, len: usize, err: TryReserveError) -> TryReserveError {
        match self {
            Fallibility::Fallible => err,
            Fallibility::Infallible => match Layout::array::<T>(len) {
                Ok(layout) => handle_alloc_error(layout),
                Err(_) => panic!("capacity overflow"),
            },
        }
    }
}

#[inline(always)]
fn infallible<T>(result: Result<T, TryReserveError>) -> T {
    match result {
        Ok(value) => value,
        Err(_) => unreachable!("infallible allocation reported an error"),
    }
}

fn alloc_buckets<V>(
    capacity: usize,
    fallibility: Fallibility,
) -> Result<Vec<Bucket<V>>, TryReserveError> {
    debug_assert!(capacity.is_power_of_two());

    let mut buckets = Vec::new();
    if let Err(err) = buckets.try_reserve_exact(capacity) {
        return Err(fallibility.alloc_err::<Bucket<V>>(capacity, err));
    }
    buckets.resize_with(capacity, Vec::new);
    Ok(buckets)
}

/// Summary of the table layout for debugging and tuning.
///
/// Available in tests and with the `stats` feature.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of elements currently in the table
    pub populated: usize,
    /// Number of buckets
    pub capacity: usize,
    /// Buckets holding at least one element
    pub occupied_buckets: usize,
    /// Length of the longest collision chain
    pub longest_chain: usize,
    /// Load factor (populated / capacity)
    pub load_factor: f64,
    /// Bucket utilization (occupied_buckets / capacity)
    pub bucket_utilization: f64,
    /// Total memory in bytes held by the bucket array and the chains
    pub total_bytes: usize,
    /// Bytes held by empty buckets and unused chain slots
    pub wasted_bytes: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!(
            "Bucket Usage: {}/{} ({:.2}% utilization)",
            self.occupied_buckets,
            self.capacity,
            self.bucket_utilization * 100.0
        );
        println!("Longest chain: {} entries", self.longest_chain);
        println!("Total Allocated: {} bytes", self.total_bytes);
        println!(
            "Memory: {} bytes wasted ({:.02}%)",
            self.wasted_bytes,
            if self.total_bytes == 0 {
                0.0
            } else {
                (self.wasted_bytes as f64 / self.total_bytes as f64) * 100.0
            }
        );
    }
}

/// A resizable hash table using separate chaining.
///
/// `HashTable<V>` stores values of type `V` in a power-of-two array of
/// buckets. A value lives in the bucket selected by masking its hash with
/// `capacity - 1`; colliding values share the bucket in insertion order.
/// Like other raw tables, every operation takes the hash and an equality
/// predicate, so keyed wrappers such as [`HashMap`](crate::HashMap) decide
/// how values are hashed and compared.
///
/// The table starts with [`INITIAL_CAPACITY`] buckets. An insertion that
/// pushes the load factor above [`UPPER_THRESHOLD`] doubles the bucket count;
/// a removal that drops it below [`LOWER_THRESHOLD`] halves it (never below
/// one bucket). Either way every entry is rehashed into the new array at
/// once.
///
/// ## Example
///
/// ```rust
/// use chain_hash::hash_table::Entry;
/// use chain_hash::hash_table::HashTable;
///
/// let mut table = HashTable::new();
///
/// match table.entry(17, |&(id, _): &(u64, &str)| id == 17) {
///     Entry::Vacant(entry) => {
///         entry.insert((17, "Alice"));
///     }
///     Entry::Occupied(_) => unreachable!(),
/// }
///
/// assert_eq!(table.find(17, |&(id, _)| id == 17), Some(&(17, "Alice")));
/// assert_eq!(table.bucket_index(17, |&(id, _)| id == 17), Some(1));
/// ```
pub struct HashTable<V> {
    buckets: Vec<Bucket<V>>,
    populated: usize,
    mask: usize,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field(
                "chains",
                &self.buckets.iter().map(Vec::len).collect::<Vec<_>>(),
            )
            .field("populated", &self.populated)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<V> Clone for HashTable<V>
where
    V: Clone,
{
    fn clone(&self) -> Self {
        infallible(self.clone_with(Fallibility::Infallible))
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with [`INITIAL_CAPACITY`] buckets.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<String> = HashTable::new();
    /// assert_eq!(table.capacity(), 16);
    /// assert!(table.is_empty());
    /// ```
    pub fn new() -> Self {
        infallible(Self::with_buckets(INITIAL_CAPACITY, Fallibility::Infallible))
    }

    /// Creates an empty table, reporting allocation failure instead of
    /// aborting.
    pub fn try_new() -> Result<Self, TryReserveError> {
        Self::with_buckets(INITIAL_CAPACITY, Fallibility::Fallible)
    }

    fn with_buckets(capacity: usize, fallibility: Fallibility) -> Result<Self, TryReserveError> {
        Ok(Self {
            buckets: alloc_buckets(capacity, fallibility)?,
            populated: 0,
            mask: capacity - 1,
        })
    }

    /// Deep copy; the clone has the same capacity and the same bucket
    /// contents in the same order.
    fn clone_with(&self, fallibility: Fallibility) -> Result<Self, TryReserveError>
    where
        V: Clone,
    {
        let mut buckets = alloc_buckets::<V>(self.capacity(), fallibility)?;
        for (dst, src) in buckets.iter_mut().zip(&self.buckets) {
            if src.is_empty() {
                continue;
            }
            if let Err(err) = dst.try_reserve_exact(src.len()) {
                return Err(fallibility.alloc_err::<(u64, V)>(src.len(), err));
            }
            dst.extend(src.iter().cloned());
        }

        Ok(Self {
            buckets,
            populated: self.populated,
            mask: self.mask,
        })
    }

    /// Clones the table, reporting allocation failure instead of aborting.
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(3, |&v: &u64| v == 3).or_insert(3);
    ///
    /// let copy = table.try_clone().unwrap();
    /// assert_eq!(copy.len(), 1);
    /// assert_eq!(copy.capacity(), table.capacity());
    /// ```
    pub fn try_clone(&self) -> Result<Self, TryReserveError>
    where
        V: Clone,
    {
        self.clone_with(Fallibility::Fallible)
    }

    #[inline(always)]
    fn bucket_of(&self, hash: u64) -> usize {
        hash as usize & self.mask
    }

    fn position(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<(usize, usize)> {
        let index = self.bucket_of(hash);
        self.buckets[index]
            .iter()
            .position(|(h, v)| *h == hash && eq(v))
            .map(|offset| (index, offset))
    }

    /// Returns a cursor over all values, in ascending bucket order and
    /// insertion order within a bucket.
    ///
    /// The cursor borrows the table, so the table cannot be mutated while it
    /// is alive.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// for hash in [33u64, 2, 1] {
    ///     table.entry(hash, |&v| v == hash).or_insert(hash);
    /// }
    ///
    /// // Buckets 1, 1, 2: 33 and 1 collide and keep their insertion order.
    /// let values: Vec<u64> = table.iter().copied().collect();
    /// assert_eq!(values, [33, 1, 2]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self)
    }

    /// Returns the terminal cursor position of this table.
    ///
    /// Any cursor from [`iter`](Self::iter) compares equal to it once
    /// exhausted; for an empty table it compares equal immediately.
    pub fn iter_end(&self) -> Iter<'_, V> {
        Iter {
            table: self,
            bucket_index: self.buckets.len(),
            offset: 0,
        }
    }

    /// Returns an iterator that removes and yields all values from the table.
    ///
    /// After calling `drain()`, the table is empty and keeps its capacity.
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(5, |&v: &u64| v == 5).or_insert(5);
    ///
    /// let values: Vec<u64> = table.drain().collect();
    /// assert!(table.is_empty());
    /// assert_eq!(values, [5]);
    /// ```
    pub fn drain(&mut self) -> Drain<'_, V> {
        Drain {
            table: self,
            bucket_index: 0,
            current: Vec::new().into_iter(),
        }
    }

    /// Returns `true` if the table contains no elements.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the number of elements in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns the number of buckets. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Returns `len() / capacity()`.
    pub fn load_factor(&self) -> f64 {
        self.populated as f64 / self.capacity() as f64
    }

    /// Removes all elements from the table.
    ///
    /// The bucket count is unchanged; no resize is triggered.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.populated = 0;
    }

    /// Returns a reference to the value matching `hash` and `eq`.
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        let (index, offset) = self.position(hash, eq)?;
        Some(&self.buckets[index][offset].1)
    }

    /// Returns a mutable reference to the value matching `hash` and `eq`.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let (index, offset) = self.position(hash, eq)?;
        Some(&mut self.buckets[index][offset].1)
    }

    /// Returns the index of the bucket holding the value matching `hash`
    /// and `eq`, or `None` if no such value is stored.
    pub fn bucket_index(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<usize> {
        self.position(hash, eq).map(|(index, _)| index)
    }

    /// Returns the number of values in bucket `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity()`.
    pub fn bucket_len(&self, index: usize) -> usize {
        self.buckets[index].len()
    }

    /// Removes and returns the value matching `hash` and `eq`.
    ///
    /// May halve the bucket array, see [`HashTable`].
    ///
    /// ```rust
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    /// table.entry(42, |&n: &u64| n == 42).or_insert(42);
    ///
    /// assert_eq!(table.remove(42, |&n| n == 42), Some(42));
    /// assert!(table.is_empty());
    /// assert_eq!(table.remove(99, |&n| n == 99), None);
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        let (index, offset) = self.position(hash, eq)?;
        Some(self.remove_at(index, offset))
    }

    fn remove_at(&mut self, index: usize, offset: usize) -> V {
        let (_, value) = self.buckets[index].remove(offset);
        self.populated -= 1;

        let capacity = self.capacity();
        if capacity > 1 && below_lower_threshold(self.populated, capacity) {
            infallible(self.resize(capacity / 2, Fallibility::Infallible));
        }

        value
    }

    /// Returns the entry for `hash`/`eq` for in-place inspection or
    /// insertion.
    ///
    /// ```rust
    /// # use chain_hash::hash_table::Entry;
    /// # use chain_hash::hash_table::HashTable;
    /// #
    /// let mut table = HashTable::new();
    ///
    /// match table.entry(7, |&n: &u64| n == 7) {
    ///     Entry::Vacant(entry) => {
    ///         entry.insert(7);
    ///     }
    ///     Entry::Occupied(_) => unreachable!(),
    /// }
    ///
    /// assert!(matches!(table.entry(7, |&n| n == 7), Entry::Occupied(_)));
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        match self.position(hash, eq) {
            Some((index, offset)) => Entry::Occupied(OccupiedEntry {
                table: self,
                index,
                offset,
            }),
            None => Entry::Vacant(VacantEntry { table: self, hash }),
        }
    }

    /// Appends a value to its bucket, doubling the array first if the new
    /// element would push the load factor past [`UPPER_THRESHOLD`].
    ///
    /// On error the table is left as it was, possibly already grown.
    fn insert_hashed(
        &mut self,
        hash: u64,
        value: V,
        fallibility: Fallibility,
    ) -> Result<(usize, usize), TryReserveError> {
        if exceeds_upper_threshold(self.populated + 1, self.capacity()) {
            self.resize(self.capacity() * 2, fallibility)?;
        }

        let index = self.bucket_of(hash);
        let bucket = &mut self.buckets[index];
        if let Err(err) = bucket.try_reserve(1) {
            return Err(fallibility.alloc_err::<(u64, V)>(bucket.len() + 1, err));
        }
        bucket.push((hash, value));
        self.populated += 1;

        Ok((index, bucket.len() - 1))
    }

    /// Rehashes every entry into a fresh array of `new_capacity` buckets.
    ///
    /// Old buckets are walked in ascending order and each entry is appended
    /// to its destination, so entries that collide keep their relative
    /// order. All destination chains are reserved before anything moves.
    fn resize(&mut self, new_capacity: usize, fallibility: Fallibility) -> Result<(), TryReserveError> {
        debug_assert!(new_capacity.is_power_of_two());
        let new_mask = new_capacity - 1;

        let mut chain_lengths: Vec<usize> = Vec::new();
        if let Err(err) = chain_lengths.try_reserve_exact(new_capacity) {
            return Err(fallibility.alloc_err::<usize>(new_capacity, err));
        }
        chain_lengths.resize(new_capacity, 0);
        for (hash, _) in self.buckets.iter().flatten() {
            chain_lengths[*hash as usize & new_mask] += 1;
        }

        let mut buckets = alloc_buckets::<V>(new_capacity, fallibility)?;
        for (bucket, &len) in buckets.iter_mut().zip(&chain_lengths) {
            if len == 0 {
                continue;
            }
            if let Err(err) = bucket.try_reserve_exact(len) {
                return Err(fallibility.alloc_err::<(u64, V)>(len, err));
            }
        }

        let old = core::mem::replace(&mut self.buckets, buckets);
        for (hash, value) in old.into_iter().flatten() {
            self.buckets[hash as usize & new_mask].push((hash, value));
        }
        self.mask = new_mask;

        Ok(())
    }

    /// Compares two tables bucket by bucket.
    ///
    /// The tables are equal when they have the same length and capacity and
    /// every bucket holds the same values, regardless of their order inside
    /// the bucket. Values are assumed unique under `eq` within a table.
    pub fn structural_eq(&self, other: &Self, eq: impl Fn(&V, &V) -> bool) -> bool {
        if self.populated != other.populated || self.capacity() != other.capacity() {
            return false;
        }

        self.buckets.iter().zip(&other.buckets).all(|(lhs, rhs)| {
            lhs.len() == rhs.len()
                && lhs
                    .iter()
                    .all(|(lh, lv)| rhs.iter().any(|(rh, rv)| lh == rh && eq(lv, rv)))
        })
    }

    /// Histogram of chain lengths: entry `n` counts the buckets holding
    /// exactly `n` values.
    ///
    /// Available in tests and with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn chain_histogram(&self) -> Vec<usize> {
        let longest = self.buckets.iter().map(Vec::len).max().unwrap_or(0);
        let mut hist = alloc::vec![0usize; longest + 1];
        for bucket in &self.buckets {
            hist[bucket.len()] += 1;
        }
        hist
    }

    /// Returns occupancy and memory statistics for debugging.
    ///
    /// Available in tests and with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let occupied_buckets = self.buckets.iter().filter(|b| !b.is_empty()).count();
        let longest_chain = self.buckets.iter().map(Vec::len).max().unwrap_or(0);

        let header = core::mem::size_of::<Bucket<V>>();
        let slot = core::mem::size_of::<(u64, V)>();
        let chain_slots: usize = self.buckets.iter().map(Vec::capacity).sum();
        let total_bytes = self.buckets.capacity() * header + chain_slots * slot;
        let wasted_bytes = (self.capacity() - occupied_buckets) * header
            + (chain_slots - self.populated) * slot;

        DebugStats {
            populated: self.populated,
            capacity: self.capacity(),
            occupied_buckets,
            longest_chain,
            load_factor: self.load_factor(),
            bucket_utilization: occupied_buckets as f64 / self.capacity() as f64,
            total_bytes,
            wasted_bytes,
        }
    }

    /// Pretty-prints the chain-length histogram horizontally using stdout.
    ///
    /// Requires the `std` feature and either tests or the `stats` feature.
    #[cfg(all(any(test, feature = "stats"), feature = "std"))]
    pub fn print_chain_histogram(&self) {
        let hist = self.chain_histogram();
        let max = *hist.iter().max().unwrap_or(&0);
        if max == 0 {
            println!("chain histogram: empty");
            return;
        }

        let max_bar = 60usize;
        let total_units = max_bar * 8;
        println!(
            "chain histogram ({} entries, {} buckets):",
            self.populated,
            self.capacity()
        );

        let make_bar = |count: usize| -> alloc::string::String {
            if count == 0 {
                return alloc::string::String::new();
            }
            let units = ((count as u128 * total_units as u128).div_ceil(max as u128)) as usize;
            let full = units / 8;
            let rem = units % 8;
            let mut bar = "█".repeat(full);
            if rem > 0 {
                let ch = match rem {
                    1 => '▏',
                    2 => '▎',
                    3 => '▍',
                    4 => '▌',
                    5 => '▋',
                    6 => '▊',
                    7 => '▉',
                    _ => unreachable!(),
                };
                bar.push(ch);
            }
            bar
        };

        for (len, &count) in hist.iter().enumerate() {
            println!("{:>2} | {} ({})", len, make_bar(count), count);
        }
    }
}

impl<V> IntoIterator for HashTable<V> {
    type Item = V;
    type IntoIter = IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.buckets.into_iter().flatten(),
        }
    }
}

/// A view into a single entry in the hash table, which may be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashTable`].
///
/// [`entry`]: HashTable::entry
pub enum Entry<'a, V> {
    /// A vacant entry - no matching value is stored
    Vacant(VacantEntry<'a, V>),
    /// An occupied entry - a matching value is stored
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the stored value.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the value computed by `default` if the entry is vacant and
    /// returns a mutable reference to the stored value.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Inserts `V::default()` if the entry is vacant and returns a mutable
    /// reference to the stored value.
    pub fn or_default(self) -> &'a mut V
    where
        V: Default,
    {
        self.or_insert_with(V::default)
    }
}

/// A view into a vacant entry in the hash table.
///
/// Created by [`HashTable::entry`] when no matching value is stored.
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Returns the hash this entry was looked up with.
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Inserts the value and returns a mutable reference to it.
    ///
    /// The table may double its bucket array as part of the insertion.
    pub fn insert(self, value: V) -> &'a mut V {
        let table = self.table;
        let (index, offset) =
            infallible(table.insert_hashed(self.hash, value, Fallibility::Infallible));
        &mut table.buckets[index][offset].1
    }

    /// Like [`insert`](Self::insert), but reports allocation failure instead
    /// of aborting. The value is dropped on failure.
    pub fn try_insert(self, value: V) -> Result<&'a mut V, TryReserveError> {
        let table = self.table;
        let (index, offset) = table.insert_hashed(self.hash, value, Fallibility::Fallible)?;
        Ok(&mut table.buckets[index][offset].1)
    }
}

/// A view into an occupied entry in the hash table.
///
/// Created by [`HashTable::entry`] when a matching value is stored.
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
    offset: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.table.buckets[self.index][self.offset].1
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.table.buckets[self.index][self.offset].1
    }

    /// Converts the entry into a mutable reference with the lifetime of the
    /// table borrow.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.table.buckets[self.index][self.offset].1
    }

    /// Index of the bucket holding this entry.
    pub fn bucket_index(&self) -> usize {
        self.index
    }

    /// Removes the entry from the table and returns the value.
    ///
    /// The table may halve its bucket array as part of the removal.
    pub fn remove(self) -> V {
        self.table.remove_at(self.index, self.offset)
    }
}

/// A cursor over the values in a [`HashTable`].
///
/// This struct is created by the [`iter`] method on [`HashTable`]. It walks
/// buckets in ascending index order and each bucket in insertion order,
/// skipping empty buckets. Its position always rests on a live value or on
/// the terminal position returned by [`iter_end`].
///
/// Two cursors compare equal when they belong to the same table and rest on
/// the same position.
///
/// [`iter`]: HashTable::iter
/// [`iter_end`]: HashTable::iter_end
pub struct Iter<'a, V> {
    table: &'a HashTable<V>,
    bucket_index: usize,
    offset: usize,
}

impl<'a, V> Iter<'a, V> {
    fn new(table: &'a HashTable<V>) -> Self {
        let mut iter = Iter {
            table,
            bucket_index: 0,
            offset: 0,
        };
        iter.skip_exhausted();
        iter
    }

    fn skip_exhausted(&mut self) {
        let buckets = &self.table.buckets;
        while self.bucket_index < buckets.len() && self.offset >= buckets[self.bucket_index].len() {
            self.bucket_index += 1;
            self.offset = 0;
        }
    }

    /// Returns the value at the current position without advancing.
    pub fn peek(&self) -> Option<&'a V> {
        let table = self.table;
        table
            .buckets
            .get(self.bucket_index)
            .and_then(|bucket| bucket.get(self.offset))
            .map(|(_, value)| value)
    }

    /// Returns `true` once the cursor has moved past the last value.
    pub fn is_end(&self) -> bool {
        self.bucket_index >= self.table.buckets.len()
    }

    /// Index of the bucket the cursor currently rests in, or `None` at the
    /// end.
    pub fn bucket_index(&self) -> Option<usize> {
        (!self.is_end()).then_some(self.bucket_index)
    }
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Iter {
            table: self.table,
            bucket_index: self.bucket_index,
            offset: self.offset,
        }
    }
}

impl<V> PartialEq for Iter<'_, V> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.table, other.table)
            && self.bucket_index == other.bucket_index
            && self.offset == other.offset
    }
}

impl<V> Eq for Iter<'_, V> {}

impl<V> Debug for Iter<'_, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Iter")
            .field("bucket_index", &self.bucket_index)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.peek()?;
        self.offset += 1;
        self.skip_exhausted();
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.is_end() {
            (0, Some(0))
        } else {
            (1, Some(self.table.populated))
        }
    }
}

impl<V> core::iter::FusedIterator for Iter<'_, V> {}

/// A draining iterator over the values in a [`HashTable`].
///
/// This struct is created by the [`drain`] method on [`HashTable`]. Buckets
/// are emptied one at a time as the iterator advances; dropping it early
/// drops the remaining values. The bucket array itself is kept.
///
/// [`drain`]: HashTable::drain
pub struct Drain<'a, V> {
    table: &'a mut HashTable<V>,
    bucket_index: usize,
    current: alloc::vec::IntoIter<(u64, V)>,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((_, value)) = self.current.next() {
                return Some(value);
            }
            let bucket = self.table.buckets.get_mut(self.bucket_index)?;
            self.bucket_index += 1;
            let chain = core::mem::take(bucket);
            self.table.populated -= chain.len();
            self.current = chain.into_iter();
        }
    }
}

impl<V> Drop for Drain<'_, V> {
    fn drop(&mut self) {
        for bucket in &mut self.table.buckets[self.bucket_index..] {
            bucket.clear();
        }
        self.table.populated = 0;
    }
}

/// An owning iterator over the values of a [`HashTable`], in cursor order.
pub struct IntoIter<V> {
    inner: Flatten<alloc::vec::IntoIter<Bucket<V>>>,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }
}
