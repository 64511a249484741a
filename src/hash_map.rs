use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::DefaultHashBuilder;
use crate::Error;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;

/// A hash map implemented using the chained [`HashTable`] as the underlying
/// storage.
///
/// `HashMap<K, V, S>` stores key-value pairs with unique keys, where keys
/// implement `Hash + Eq`, and uses a hasher builder `S` to hash keys. The map
/// starts with 16 buckets, doubles when the load factor would exceed 0.75 and
/// halves when it drops below 0.25.
///
/// Two maps compare equal when they have the same size and capacity and
/// every bucket holds the same key-value pairs, in any order. Maps compared
/// this way must use hashers that agree; the default hasher is
/// deterministic.
///
/// # Examples
///
/// ```rust
/// use chain_hash::HashMap;
///
/// let mut map = HashMap::new();
/// assert!(map.insert('a', 'b'));
/// assert!(!map.insert('a', 'z'));
///
/// assert_eq!(map.at(&'a'), Ok(&'b'));
/// assert!(map.at(&'q').is_err());
/// assert_eq!(map.capacity(), 16);
/// ```
#[derive(Clone)]
pub struct HashMap<K, V, S = DefaultHashBuilder> {
    table: HashTable<(K, V)>,
    hash_builder: S,
}

impl<K, V, S> Debug for HashMap<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(self.table.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl<K, V, S> PartialEq for HashMap<K, V, S>
where
    K: Eq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.table
            .structural_eq(&other.table, |(lk, lv), (rk, rv)| lk == rk && lv == rv)
    }
}

impl<K, V, S> Eq for HashMap<K, V, S>
where
    K: Eq,
    V: Eq,
{
}

impl<K, V, S> HashMap<K, V, S> {
    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the current number of buckets. Always a power of two.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the average number of elements per bucket.
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Returns a reference to the map's hasher builder.
    pub fn hasher(&self) -> &S {
        &self.hash_builder
    }

    /// Removes all elements from the map.
    ///
    /// The capacity is unchanged.
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// for i in 0..20 {
    ///     map.insert(i, i);
    /// }
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 32);
    /// ```
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns a cursor over the key-value pairs of the map.
    ///
    /// Pairs are yielded in ascending bucket order, and in insertion order
    /// within a bucket. Every call starts a fresh traversal. The map cannot
    /// be mutated while the cursor is alive.
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    ///
    /// let mut pairs: Vec<_> = map.iter().collect();
    /// pairs.sort();
    /// assert_eq!(pairs, [(&1, &"a"), (&2, &"b")]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns the terminal cursor position of this map.
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// #
    /// let map: HashMap<u8, u8> = HashMap::new();
    /// assert_eq!(map.iter(), map.iter_end());
    /// ```
    pub fn iter_end(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.table.iter_end(),
        }
    }

    /// Returns an iterator over the keys of the map, in cursor order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values of the map, in cursor order.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator that removes and yields all key-value pairs from
    /// the map.
    ///
    /// After calling `drain()`, the map is empty and keeps its capacity.
    pub fn drain(&mut self) -> Drain<'_, K, V> {
        Drain {
            inner: self.table.drain(),
        }
    }

    /// Returns bucket occupancy statistics for the map.
    ///
    /// Available in tests and with the `stats` feature.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }

    /// Prints the chain-length histogram of the map to stdout.
    ///
    /// Requires the `std` feature and either tests or the `stats` feature.
    #[cfg(all(any(test, feature = "stats"), feature = "std"))]
    pub fn print_chain_histogram(&self) {
        self.table.print_chain_histogram();
    }
}

impl<K, V, S> HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates an empty map with the given hasher builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// # use siphasher::sip::SipHasher;
    /// #
    /// # use chain_hash::HashMap;
    /// #
    /// # struct SimpleHasher;
    /// # impl BuildHasher for SimpleHasher {
    /// #     type Hasher = SipHasher;
    /// #
    /// #     fn build_hasher(&self) -> Self::Hasher {
    /// #         SipHasher::new()
    /// #     }
    /// # }
    /// #
    /// let map: HashMap<i32, String, _> = HashMap::with_hasher(SimpleHasher);
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 16);
    /// ```
    pub fn with_hasher(hash_builder: S) -> Self {
        Self {
            table: HashTable::new(),
            hash_builder,
        }
    }

    /// Creates an empty map with the given hasher builder, reporting
    /// allocation failure instead of aborting.
    pub fn try_with_hasher(hash_builder: S) -> Result<Self, Error> {
        Ok(Self {
            table: HashTable::try_new()?,
            hash_builder,
        })
    }

    /// Builds a map from parallel sequences of keys and values, using the
    /// given hasher builder.
    ///
    /// Pairs are applied in order with assignment semantics: a key repeated
    /// later in `keys` overwrites the value stored for it earlier. Fails
    /// with [`Error::LengthMismatch`] if the sequences differ in length, in
    /// which case no map is produced.
    pub fn from_keys_and_values_with_hasher<I, J>(
        keys: I,
        values: J,
        hash_builder: S,
    ) -> Result<Self, Error>
    where
        I: IntoIterator<Item = K>,
        J: IntoIterator<Item = V>,
    {
        let mut map = Self::try_with_hasher(hash_builder)?;
        let mut keys = keys.into_iter();
        let mut values = values.into_iter();

        let mut paired = 0;
        loop {
            match (keys.next(), values.next()) {
                (Some(key), Some(value)) => {
                    map.try_insert_or_assign(key, value)?;
                    paired += 1;
                }
                (None, None) => return Ok(map),
                (Some(_), None) => {
                    return Err(Error::LengthMismatch {
                        keys: paired + 1 + keys.count(),
                        values: paired,
                    });
                }
                (None, Some(_)) => {
                    return Err(Error::LengthMismatch {
                        keys: paired,
                        values: paired + 1 + values.count(),
                    });
                }
            }
        }
    }

    fn hash_key(&self, key: &K) -> u64 {
        self.hash_builder.hash_one(key)
    }

    /// Returns `true` if the map contains a value for the specified key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Inserts a key-value pair if the key is not already present.
    ///
    /// Returns `false` and leaves the map untouched if the key exists; the
    /// stored value is not overwritten. Use
    /// [`insert_or_assign`](Self::insert_or_assign) to overwrite.
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// assert!(map.insert(37, "a"));
    /// assert!(!map.insert(37, "b"));
    /// assert_eq!(map.get(&37), Some(&"a"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let hash = self.hash_key(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(_) => false,
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
                true
            }
        }
    }

    /// Like [`insert`](Self::insert), but reports allocation failure instead
    /// of aborting. On failure the pair is dropped and the map keeps its
    /// previous contents.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<bool, Error> {
        let hash = self.hash_key(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(_) => Ok(false),
            TableEntry::Vacant(entry) => {
                entry.try_insert((key, value))?;
                Ok(true)
            }
        }
    }

    /// Inserts a key-value pair, overwriting the value of an existing key.
    ///
    /// Returns the previous value if the key was present.
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// assert_eq!(map.insert_or_assign(37, "a"), None);
    /// assert_eq!(map.insert_or_assign(37, "b"), Some("a"));
    /// assert_eq!(map.get(&37), Some(&"b"));
    /// ```
    pub fn insert_or_assign(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hash_key(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(mut entry) => {
                Some(core::mem::replace(&mut entry.get_mut().1, value))
            }
            TableEntry::Vacant(entry) => {
                entry.insert((key, value));
                None
            }
        }
    }

    fn try_insert_or_assign(&mut self, key: K, value: V) -> Result<Option<V>, Error> {
        let hash = self.hash_key(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(mut entry) => {
                Ok(Some(core::mem::replace(&mut entry.get_mut().1, value)))
            }
            TableEntry::Vacant(entry) => {
                entry.try_insert((key, value))?;
                Ok(None)
            }
        }
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get(&self, key: &K) -> Option<&V> {
        let hash = self.hash_key(key);
        self.table.find(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let hash = self.hash_key(key);
        self.table.find_mut(hash, |(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns a reference to the value mapped to `key`, or
    /// [`Error::NotFound`].
    pub fn at(&self, key: &K) -> Result<&V, Error> {
        self.get(key).ok_or(Error::NotFound)
    }

    /// Returns a mutable reference to the value mapped to `key`, or
    /// [`Error::NotFound`].
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert("x", 1);
    /// *map.at_mut(&"x").unwrap() += 1;
    /// assert_eq!(map.at(&"x"), Ok(&2));
    /// ```
    pub fn at_mut(&mut self, key: &K) -> Result<&mut V, Error> {
        self.get_mut(key).ok_or(Error::NotFound)
    }

    /// Returns a mutable reference to the value mapped to `key`, first
    /// inserting `V::default()` if the key is absent.
    ///
    /// The insertion follows the usual growth rule, so this can resize the
    /// map.
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map: HashMap<char, u32> = HashMap::new();
    /// for c in "hello".chars() {
    ///     *map.get_or_insert_default(c) += 1;
    /// }
    /// assert_eq!(map.at(&'l'), Ok(&2));
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.entry(key).or_default()
    }

    /// Returns a copy of the value mapped to `key`, or `V::default()` if the
    /// key is absent. The map is never modified.
    pub fn get_or_default(&self, key: &K) -> V
    where
        V: Clone + Default,
    {
        self.get(key).cloned().unwrap_or_default()
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// May halve the capacity.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the
    /// key was previously in the map.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.hash_key(key);
        self.table.remove(hash, |(k, _)| k == key)
    }

    /// Removes a key from the map. Returns `false` if the key was absent.
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    /// map.insert(1, "a");
    /// assert!(map.erase(&1));
    /// assert!(!map.erase(&1));
    /// ```
    pub fn erase(&mut self, key: &K) -> bool {
        self.remove_entry(key).is_some()
    }

    /// Returns the number of entries sharing the bucket of `key`, or
    /// [`Error::NotFound`] if the key is absent.
    pub fn bucket_size(&self, key: &K) -> Result<usize, Error> {
        let index = self.bucket_index(key)?;
        Ok(self.table.bucket_len(index))
    }

    /// Returns the index of the bucket holding `key`, or
    /// [`Error::NotFound`] if the key is absent.
    pub fn bucket_index(&self, key: &K) -> Result<usize, Error> {
        let hash = self.hash_key(key);
        self.table
            .bucket_index(hash, |(k, _)| k == key)
            .ok_or(Error::NotFound)
    }

    /// Gets the given key's corresponding entry in the map for in-place
    /// manipulation.
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// #
    /// let mut map = HashMap::new();
    ///
    /// map.entry(1).or_insert("a");
    /// map.entry(2).or_insert("b");
    /// map.entry(1).or_insert("c");
    ///
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), Some(&"b"));
    /// ```
    pub fn entry(&mut self, key: K) -> Entry<'_, K, V> {
        let hash = self.hash_key(&key);
        match self.table.entry(hash, |(k, _)| k == &key) {
            TableEntry::Occupied(entry) => Entry::Occupied(OccupiedEntry { entry }),
            TableEntry::Vacant(entry) => Entry::Vacant(VacantEntry { entry, key }),
        }
    }

    /// Clones the map, reporting allocation failure instead of aborting.
    pub fn try_clone(&self) -> Result<Self, Error>
    where
        K: Clone,
        V: Clone,
        S: Clone,
    {
        Ok(Self {
            table: self.table.try_clone()?,
            hash_builder: self.hash_builder.clone(),
        })
    }
}

impl<K, V> HashMap<K, V, DefaultHashBuilder>
where
    K: Hash + Eq,
{
    /// Creates an empty map with 16 buckets using the default hasher
    /// builder.
    ///
    /// ```rust
    /// # use chain_hash::HashMap;
    /// #
    /// let map: HashMap<i32, String> = HashMap::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.capacity(), 16);
    /// ```
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }

    /// Builds a map from parallel sequences of keys and values.
    ///
    /// See
    /// [`from_keys_and_values_with_hasher`](Self::from_keys_and_values_with_hasher).
    ///
    /// ```rust
    /// # use chain_hash::Error;
    /// # use chain_hash::HashMap;
    /// #
    /// let map: HashMap<i32, i32> = HashMap::from_keys_and_values([1, 2, 1], [10, 20, 30]).unwrap();
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.at(&1), Ok(&30));
    ///
    /// let err = HashMap::<i32, i32>::from_keys_and_values([1, 2, 3], [10, 20]).unwrap_err();
    /// assert_eq!(err, Error::LengthMismatch { keys: 3, values: 2 });
    /// ```
    pub fn from_keys_and_values<I, J>(keys: I, values: J) -> Result<Self, Error>
    where
        I: IntoIterator<Item = K>,
        J: IntoIterator<Item = V>,
    {
        Self::from_keys_and_values_with_hasher(keys, values, DefaultHashBuilder::default())
    }
}

impl<K, V, S> Default for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, V, S> Extend<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Inserts every pair with assignment semantics; later values win.
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert_or_assign(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for HashMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, S> IntoIterator for &'a HashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> IntoIterator for HashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

/// A view into a single entry in the map, which may either be vacant or
/// occupied.
///
/// This enum is constructed from the [`entry`] method on [`HashMap`].
///
/// [`entry`]: HashMap::entry
pub enum Entry<'a, K, V> {
    /// A vacant entry.
    Vacant(VacantEntry<'a, K, V>),
    /// An occupied entry.
    Occupied(OccupiedEntry<'a, K, V>),
}

impl<'a, K, V> Entry<'a, K, V> {
    /// Inserts a default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts a value computed from a closure if the entry is vacant and
    /// returns a mutable reference.
    pub fn or_insert_with<F>(self, default: F) -> &'a mut V
    where
        F: FnOnce() -> V,
    {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Provides in-place mutable access to an occupied entry before any
    /// potential inserts.
    pub fn and_modify<F>(self, f: F) -> Self
    where
        F: FnOnce(&mut V),
    {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }

    /// Returns a reference to this entry's key.
    pub fn key(&self) -> &K {
        match self {
            Entry::Occupied(entry) => entry.key(),
            Entry::Vacant(entry) => entry.key(),
        }
    }
}

impl<'a, K, V> Entry<'a, K, V>
where
    V: Default,
{
    /// Inserts the default value if the entry is vacant and returns a mutable
    /// reference.
    pub fn or_default(self) -> &'a mut V {
        self.or_insert_with(Default::default)
    }
}

/// A view into a vacant entry in the map.
pub struct VacantEntry<'a, K, V> {
    entry: crate::hash_table::VacantEntry<'a, (K, V)>,
    key: K,
}

impl<'a, K, V> VacantEntry<'a, K, V> {
    /// Gets a reference to the key that would be used when inserting a value.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Take ownership of the key.
    pub fn into_key(self) -> K {
        self.key
    }

    /// Inserts the value into the map and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        &mut self.entry.insert((self.key, value)).1
    }
}

/// A view into an occupied entry in the map.
pub struct OccupiedEntry<'a, K, V> {
    entry: crate::hash_table::OccupiedEntry<'a, (K, V)>,
}

impl<'a, K, V> OccupiedEntry<'a, K, V> {
    /// Gets a reference to the key in the entry.
    pub fn key(&self) -> &K {
        &self.entry.get().0
    }

    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        &self.entry.get().1
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.entry.get_mut().1
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        &mut self.entry.into_mut().1
    }

    /// Inserts a value into the entry and returns the old value.
    pub fn insert(&mut self, value: V) -> V {
        core::mem::replace(&mut self.entry.get_mut().1, value)
    }

    /// Removes the entry from the map and returns the value.
    pub fn remove(self) -> V {
        self.entry.remove().1
    }

    /// Removes the entry from the map and returns the key and value.
    pub fn remove_entry(self) -> (K, V) {
        self.entry.remove()
    }
}

/// A cursor over the key-value pairs of a `HashMap`.
///
/// Pairs are handed out as shared references, so keys cannot be changed in
/// place. Cursors compare equal when they belong to the same map and rest on
/// the same position; an exhausted cursor equals
/// [`HashMap::iter_end`].
pub struct Iter<'a, K, V> {
    inner: crate::hash_table::Iter<'a, (K, V)>,
}

impl<'a, K, V> Iter<'a, K, V> {
    /// Returns the pair at the current position without advancing.
    pub fn peek(&self) -> Option<(&'a K, &'a V)> {
        self.inner.peek().map(|(k, v)| (k, v))
    }

    /// Returns `true` once every pair has been yielded.
    pub fn is_end(&self) -> bool {
        self.inner.is_end()
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> PartialEq for Iter<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<K, V> Eq for Iter<'_, K, V> {}

impl<K, V> Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.inner.fmt(f)
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k, v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> core::iter::FusedIterator for Iter<'_, K, V> {}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }
}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }
}

/// A draining iterator over the key-value pairs of a `HashMap`.
pub struct Drain<'a, K, V> {
    inner: crate::hash_table::Drain<'a, (K, V)>,
}

impl<K, V> Iterator for Drain<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// An owning iterator over the key-value pairs of a `HashMap`.
pub struct IntoIter<K, V> {
    inner: crate::hash_table::IntoIter<(K, V)>,
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::format;
    use alloc::string::String;
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::hash::BuildHasher;
    use core::hash::BuildHasherDefault;
    use core::hash::Hasher;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use rand::rngs::SmallRng;
    use siphasher::sip::SipHasher;

    use super::*;

    #[derive(Clone)]
    struct SipHashBuilder {
        k1: u64,
        k2: u64,
    }

    impl BuildHasher for SipHashBuilder {
        type Hasher = SipHasher;

        fn build_hasher(&self) -> Self::Hasher {
            SipHasher::new_with_keys(self.k1, self.k2)
        }
    }

    impl Default for SipHashBuilder {
        fn default() -> Self {
            let mut rng = OsRng;
            Self {
                k1: rng.try_next_u64().unwrap_or(0),
                k2: rng.try_next_u64().unwrap_or(0),
            }
        }
    }

    /// Hashes a `u64` to itself so bucket placement is `key & (capacity - 1)`.
    #[derive(Default, Clone)]
    struct IdentityHasher(u64);

    impl Hasher for IdentityHasher {
        fn finish(&self) -> u64 {
            self.0
        }

        fn write(&mut self, bytes: &[u8]) {
            for byte in bytes {
                self.0 = (self.0 << 8) | u64::from(*byte);
            }
        }

        fn write_u64(&mut self, n: u64) {
            self.0 = n;
        }
    }

    type IdentityState = BuildHasherDefault<IdentityHasher>;

    fn identity_map(keys: impl IntoIterator<Item = u64>) -> HashMap<u64, u64, IdentityState> {
        let mut map = HashMap::default();
        for key in keys {
            assert!(map.insert(key, key * 10));
        }
        map
    }

    #[test]
    fn test_new_and_with_hasher() {
        let map: HashMap<i32, String> = HashMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
        assert_eq!(map.capacity(), 16);

        let map2 = HashMap::<i32, String, _>::with_hasher(SipHashBuilder::default());
        assert!(map2.is_empty());
        assert_eq!(map2.capacity(), 16);

        let map3 = HashMap::<i32, String, _>::try_with_hasher(SipHashBuilder::default()).unwrap();
        assert_eq!(map3.load_factor(), 0.0);
    }

    #[test]
    fn test_insert_and_get() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());

        assert!(map.insert(1, "hello".to_string()));
        assert_eq!(map.len(), 1);
        assert!(!map.is_empty());
        assert_eq!(map.get(&1), Some(&"hello".to_string()));
        assert_eq!(map.get(&2), None);

        assert!(!map.insert(1, "world".to_string()));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&"hello".to_string()));
    }

    #[test]
    fn test_try_insert() {
        let mut map: HashMap<u32, u32> = HashMap::new();
        assert_eq!(map.try_insert(1, 1), Ok(true));
        assert_eq!(map.try_insert(1, 2), Ok(false));
        assert_eq!(map.at(&1), Ok(&1));
    }

    #[test]
    fn test_insert_or_assign() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        assert_eq!(map.insert_or_assign(1, "a"), None);
        assert_eq!(map.insert_or_assign(1, "b"), Some("a"));
        assert_eq!(map.len(), 1);
        assert_eq!(map.at(&1), Ok(&"b"));
    }

    #[test]
    fn test_at_and_at_mut() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert("k".to_string(), 5);

        assert_eq!(map.at(&"k".to_string()), Ok(&5));
        *map.at_mut(&"k".to_string()).unwrap() = 6;
        assert_eq!(map.at(&"k".to_string()), Ok(&6));

        assert_eq!(map.at(&"missing".to_string()), Err(Error::NotFound));
        assert_eq!(map.at_mut(&"missing".to_string()), Err(Error::NotFound));
    }

    #[test]
    fn test_get_mut() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());

        if let Some(value) = map.get_mut(&1) {
            value.push_str(" world");
        }

        assert_eq!(map.get(&1), Some(&"hello world".to_string()));
        assert_eq!(map.get_mut(&2), None);
    }

    #[test]
    fn test_contains_key() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        assert!(!map.contains_key(&1));

        map.insert(1, "value".to_string());
        assert!(map.contains_key(&1));
        assert!(!map.contains_key(&2));
    }

    #[test]
    fn test_distinct_inserts_are_all_present() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        for i in 0..1000 {
            assert!(map.insert(i, i * 2));
            assert_eq!(map.len(), i as usize + 1);
        }
        for i in 0..1000 {
            assert!(map.contains_key(&i));
            assert_eq!(map.get(&i), Some(&(i * 2)));
        }
    }

    #[test]
    fn test_remove_and_erase() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());
        map.insert(2, "world".to_string());

        assert_eq!(map.remove(&1), Some("hello".to_string()));
        assert_eq!(map.len(), 1);
        assert!(!map.contains_key(&1));
        assert!(map.contains_key(&2));
        assert_eq!(map.remove(&1), None);

        let capacity = map.capacity();
        assert!(!map.erase(&3));
        assert_eq!(map.len(), 1);
        assert_eq!(map.capacity(), capacity);

        assert!(map.erase(&2));
        assert!(map.is_empty());
        assert!(!map.contains_key(&2));
    }

    #[test]
    fn test_remove_entry() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());

        assert_eq!(map.remove_entry(&1), Some((1, "hello".to_string())));
        assert_eq!(map.len(), 0);
        assert_eq!(map.remove_entry(&1), None);
    }

    #[test]
    fn test_growth_preserves_values() {
        let mut map = identity_map(0..12);
        assert_eq!(map.capacity(), 16);
        assert_eq!(map.load_factor(), 0.75);
        let before: Vec<u64> = (0..12).map(|k| *map.at(&k).unwrap()).collect();

        assert!(map.insert(12, 120));
        assert_eq!(map.capacity(), 32);
        let after: Vec<u64> = (0..12).map(|k| *map.at(&k).unwrap()).collect();
        assert_eq!(before, after);
        assert_eq!(map.at(&12), Ok(&120));
    }

    #[test]
    fn test_shrink_preserves_values() {
        let mut map = identity_map(0..13);
        assert_eq!(map.capacity(), 32);

        for key in 0..5 {
            assert!(map.erase(&key));
            assert_eq!(map.capacity(), 32);
        }
        assert!(map.erase(&5));
        assert_eq!(map.len(), 7);
        assert_eq!(map.capacity(), 16);
        for key in 6..13 {
            assert_eq!(map.at(&key), Ok(&(key * 10)));
        }
    }

    #[test]
    fn test_single_erase_halves_capacity_once() {
        let mut map = identity_map([1, 2]);
        assert_eq!(map.capacity(), 16);
        assert!(map.erase(&1));
        assert_eq!(map.capacity(), 8);
        assert_eq!(map.at(&2), Ok(&20));

        let mut map = identity_map([7]);
        assert!(map.erase(&7));
        assert_eq!(map.capacity(), 8);
        assert!(map.is_empty());
    }

    #[test]
    fn test_resource_exhausted_error() {
        let err = Vec::<u64>::new().try_reserve(usize::MAX).unwrap_err();
        let err = Error::from(err);
        assert!(matches!(err, Error::ResourceExhausted(_)));
        assert_eq!(err.to_string(), "could not allocate hash table storage");
    }

    #[test]
    fn test_bucket_introspection() {
        let map = identity_map([1, 17, 33, 2, 3, 4, 5, 6]);
        assert_eq!(map.capacity(), 16);

        assert_eq!(map.bucket_index(&17), Ok(1));
        assert_eq!(map.bucket_size(&17), Ok(3));
        assert_eq!(map.bucket_index(&2), Ok(2));
        assert_eq!(map.bucket_size(&2), Ok(1));

        assert_eq!(map.bucket_index(&49), Err(Error::NotFound));
        assert_eq!(map.bucket_size(&49), Err(Error::NotFound));
    }

    #[test]
    fn test_bucket_index_matches_masked_hash() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        for i in 0..100u32 {
            map.insert(i, i);
        }
        for i in 0..100u32 {
            let expected = map.hasher().hash_one(i) as usize & (map.capacity() - 1);
            assert_eq!(map.bucket_index(&i), Ok(expected));
            assert!(map.bucket_size(&i).unwrap() >= 1);
        }
    }

    #[test]
    fn test_get_or_insert_default_can_grow() {
        let mut map = identity_map(0..12);
        assert_eq!(map.capacity(), 16);

        *map.get_or_insert_default(99) += 5;
        assert_eq!(map.capacity(), 32);
        assert_eq!(map.len(), 13);
        assert_eq!(map.at(&99), Ok(&5));

        *map.get_or_insert_default(3) += 1;
        assert_eq!(map.at(&3), Ok(&31));
        assert_eq!(map.len(), 13);
    }

    #[test]
    fn test_get_or_default_does_not_insert() {
        let map = identity_map(0..3);
        assert_eq!(map.get_or_default(&1), 10);
        assert_eq!(map.get_or_default(&50), 0);
        assert_eq!(map.len(), 3);
        assert!(!map.contains_key(&50));
    }

    #[test]
    fn test_clear() {
        let mut map = identity_map(0..20);
        let capacity = map.capacity();

        map.clear();
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert_eq!(map.capacity(), capacity);
        assert!(!map.contains_key(&1));
        assert_eq!(map.iter(), map.iter_end());
    }

    #[test]
    fn test_from_keys_and_values_overwrites_duplicates() {
        let map: HashMap<i32, i32> = HashMap::from_keys_and_values([1, 2, 1], [10, 20, 30]).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.at(&1), Ok(&30));
        assert_eq!(map.at(&2), Ok(&20));
    }

    #[test]
    fn test_from_keys_and_values_length_mismatch() {
        let err = HashMap::<i32, i32>::from_keys_and_values([1, 2, 3], [10, 20]).unwrap_err();
        assert_eq!(err, Error::LengthMismatch { keys: 3, values: 2 });

        let err = HashMap::<i32, i32>::from_keys_and_values(vec![1], vec![10, 20, 30]).unwrap_err();
        assert_eq!(err, Error::LengthMismatch { keys: 1, values: 3 });

        let empty = HashMap::<i32, i32>::from_keys_and_values(Vec::new(), Vec::new()).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_from_keys_and_values_with_hasher_grows() {
        let keys: Vec<u64> = (0..40).collect();
        let values: Vec<u64> = keys.iter().map(|k| k + 1).collect();
        let map =
            HashMap::from_keys_and_values_with_hasher(keys, values, IdentityState::default())
                .unwrap();
        assert_eq!(map.len(), 40);
        assert_eq!(map.capacity(), 64);
        assert!(map.load_factor() <= 0.75);
        assert_eq!(map.at(&39), Ok(&40));
    }

    #[test]
    fn test_equality_is_order_independent() {
        let forward = identity_map(0..20);
        let backward = identity_map((0..20).rev());
        assert_eq!(forward, backward);

        let colliding_a = identity_map([1, 17, 33]);
        let colliding_b = identity_map([33, 1, 17]);
        assert_eq!(colliding_a, colliding_b);
    }

    #[test]
    fn test_equality_after_different_resize_paths() {
        let direct = identity_map(0..20);

        let mut detour = identity_map(0..24);
        for key in 20..24 {
            assert!(detour.erase(&key));
        }
        assert_eq!(direct.capacity(), detour.capacity());
        assert_eq!(direct, detour);
    }

    #[test]
    fn test_inequality() {
        let base = identity_map(0..5);

        let mut different_value = identity_map(0..5);
        *different_value.at_mut(&3).unwrap() = 0;
        assert_ne!(base, different_value);

        let mut different_key = identity_map(0..4);
        different_key.insert(21, 50);
        assert_ne!(base, different_key);

        let mut different_capacity = identity_map(0..4);
        different_capacity.erase(&3);
        assert_eq!(different_capacity.capacity(), 8);
        different_capacity.insert(3, 30);
        different_capacity.insert(4, 40);
        assert_eq!(different_capacity.len(), 5);
        assert_ne!(base.capacity(), different_capacity.capacity());
        assert_ne!(base, different_capacity);
    }

    #[test]
    fn test_cursor_yields_every_entry_once() {
        let map = identity_map(0..20);
        assert_eq!(map.capacity(), 32);

        let keys: Vec<u64> = map.keys().copied().collect();
        assert_eq!(keys, (0..20).collect::<Vec<_>>());

        let mut seen = Vec::new();
        for (k, v) in &map {
            assert!(!seen.contains(k));
            assert_eq!(*v, k * 10);
            seen.push(*k);
        }
        assert_eq!(seen.len(), map.len());
    }

    #[test]
    fn test_cursor_with_random_hasher() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        for i in 0..20 {
            map.insert(i, i);
        }
        let mut keys: Vec<i32> = map.keys().copied().collect();
        keys.sort();
        assert_eq!(keys, (0..20).collect::<Vec<_>>());
        assert_eq!(map.values().count(), 20);
    }

    #[test]
    fn test_cursor_positions() {
        let empty: HashMap<u64, u64, IdentityState> = HashMap::default();
        assert_eq!(empty.iter(), empty.iter_end());
        assert!(empty.iter().is_end());

        let map = identity_map([7, 3]);
        let mut cursor = map.iter();
        assert_eq!(cursor.peek(), Some((&3, &30)));
        assert_eq!(cursor.next(), Some((&3, &30)));
        assert_eq!(cursor.peek(), Some((&7, &70)));
        let restart = map.iter();
        assert_eq!(restart.peek(), Some((&3, &30)));
        assert_eq!(cursor.next(), Some((&7, &70)));
        assert_eq!(cursor, map.iter_end());
        assert_eq!(cursor.next(), None);
    }

    #[test]
    fn test_clone_is_deep() {
        let original = identity_map(0..20);
        let mut cloned = original.clone();
        assert_eq!(original, cloned);
        assert_eq!(original.capacity(), cloned.capacity());

        *cloned.at_mut(&4).unwrap() = 0;
        cloned.erase(&5);
        assert_eq!(original.at(&4), Ok(&40));
        assert!(original.contains_key(&5));
        assert_ne!(original, cloned);

        let tried = original.try_clone().unwrap();
        assert_eq!(tried, original);
    }

    #[test]
    fn test_clone_from_replaces_contents() {
        let source = identity_map(0..30);
        let mut target = identity_map([100, 200]);
        target.clone_from(&source);
        assert_eq!(target, source);
        assert_eq!(target.capacity(), 64);
    }

    #[test]
    fn test_entry_api() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());

        let value = map.entry(1).or_insert("hello".to_string());
        assert_eq!(value, &"hello".to_string());
        assert_eq!(map.len(), 1);

        let value = map.entry(1).or_insert("world".to_string());
        assert_eq!(value, &"hello".to_string());
        assert_eq!(map.len(), 1);

        map.entry(2).or_insert_with(|| "computed".to_string());
        assert_eq!(map.get(&2), Some(&"computed".to_string()));

        map.entry(1)
            .and_modify(|v| v.push_str(" world"))
            .or_insert("default".to_string());
        assert_eq!(map.get(&1), Some(&"hello world".to_string()));

        assert_eq!(map.entry(3).key(), &3);
    }

    #[test]
    fn test_occupied_entry() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        map.insert(1, "hello".to_string());

        match map.entry(1) {
            Entry::Occupied(mut entry) => {
                assert_eq!(entry.key(), &1);
                assert_eq!(entry.get(), &"hello".to_string());

                let old_value = entry.insert("new".to_string());
                assert_eq!(old_value, "hello".to_string());

                let (key, value) = entry.remove_entry();
                assert_eq!(key, 1);
                assert_eq!(value, "new".to_string());
            }
            Entry::Vacant(_) => panic!("Expected occupied entry"),
        }

        assert!(map.is_empty());
    }

    #[test]
    fn test_vacant_entry() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());

        match map.entry(1) {
            Entry::Vacant(entry) => {
                assert_eq!(entry.key(), &1);
                let value = entry.insert("hello".to_string());
                assert_eq!(value, &"hello".to_string());
            }
            Entry::Occupied(_) => panic!("Expected vacant entry"),
        }

        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&1), Some(&"hello".to_string()));
    }

    #[test]
    fn test_drain_and_into_iter() {
        let mut map = identity_map(0..20);
        let drained: Vec<(u64, u64)> = map.drain().collect();
        assert_eq!(drained.len(), 20);
        assert!(map.is_empty());
        assert_eq!(map.capacity(), 32);

        let map = identity_map([9, 2]);
        let pairs: Vec<(u64, u64)> = map.into_iter().collect();
        assert_eq!(pairs, [(2, 20), (9, 90)]);
    }

    #[test]
    fn test_extend_and_collect_assign() {
        let mut map: HashMap<&str, i32> = [("a", 1), ("b", 2), ("a", 3)].into_iter().collect();
        assert_eq!(map.len(), 2);
        assert_eq!(map.at(&"a"), Ok(&3));

        map.extend([("b", 20), ("c", 30)]);
        assert_eq!(map.at(&"b"), Ok(&20));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_debug_output() {
        let map = identity_map([1]);
        assert_eq!(format!("{map:?}"), "{1: 10}");
    }

    #[test]
    fn test_random_operations_match_model() {
        let mut rng = SmallRng::seed_from_u64(42);
        let mut map = HashMap::with_hasher(SipHashBuilder::default());
        let mut model = BTreeMap::new();

        for _ in 0..10_000 {
            let key = rng.random_range(0..300u32);
            match rng.random_range(0..4u8) {
                0 => {
                    let value = rng.random::<u32>();
                    let inserted = map.insert(key, value);
                    assert_eq!(inserted, !model.contains_key(&key));
                    model.entry(key).or_insert(value);
                    if inserted {
                        assert!(map.load_factor() <= 0.75);
                    }
                }
                1 => {
                    let capacity = map.capacity();
                    let erased = map.erase(&key);
                    assert_eq!(erased, model.remove(&key).is_some());
                    if erased && capacity > 1 && map.len() * 4 < capacity {
                        assert_eq!(map.capacity(), capacity / 2);
                    } else {
                        assert_eq!(map.capacity(), capacity);
                    }
                }
                2 => assert_eq!(map.get(&key), model.get(&key)),
                _ => {
                    let value = rng.random::<u32>();
                    assert_eq!(map.insert_or_assign(key, value), model.insert(key, value));
                }
            }
            assert_eq!(map.len(), model.len());
            assert!(map.capacity().is_power_of_two());
        }

        let stats = map.debug_stats();
        assert_eq!(stats.populated, model.len());
        assert_eq!(stats.capacity, map.capacity());
    }

    #[test]
    fn test_string_keys() {
        let mut map = HashMap::with_hasher(SipHashBuilder::default());

        map.insert("hello".to_string(), 1);
        map.insert("world".to_string(), 2);
        map.insert("rust".to_string(), 3);

        assert_eq!(map.get(&"hello".to_string()), Some(&1));
        assert_eq!(map.get(&"world".to_string()), Some(&2));
        assert_eq!(map.get(&"rust".to_string()), Some(&3));
        assert_eq!(map.get(&"missing".to_string()), None);
    }
}
