use core::fmt;

use sc_utils::hash::HashTable;

use super::entry_hash;
use crate::Data;
use crate::data::impl_data_type_fn;

// -----------------------------------------------------------------------------
// DynamicMap

/// An insertion-ordered map with arbitrary keys, compared by [`Data::data_eq`].
///
/// Keys do not need to be strings: a schema stores each key's text form and
/// encodes the key itself in a side table.
///
/// Entries live in a vector in insertion order, and a hash table keyed by
/// [`Data::data_hash`] maps keys to their position.
///
/// # Examples
///
/// ```
/// use sc_codec::ops::{DynamicMap, DynamicTuple};
///
/// let mut key = DynamicTuple::new();
/// key.push(1_i64);
/// key.push(2_i64);
///
/// let mut map = DynamicMap::new();
/// map.insert(String::from("a"), 1_i64);
/// map.insert(key, true);
/// assert_eq!(map.len(), 2);
///
/// let old = map.insert(String::from("a"), 2_i64);
/// assert_eq!(old.and_then(|v| v.take::<i64>().ok()), Some(1));
/// assert_eq!(map.len(), 2);
/// ```
#[derive(Default, Clone)]
pub struct DynamicMap {
    entries: Vec<(Box<dyn Data>, Box<dyn Data>)>,
    // `(hash, position in entries)`
    indices: HashTable<(u64, usize)>,
}

crate::impl_type_path!(DynamicMap => "sc_codec::ops" :: "DynamicMap");

impl DynamicMap {
    /// Creates an empty map.
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            indices: HashTable::new(),
        }
    }

    /// Creates an empty map with space for at least `capacity` entries.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            indices: HashTable::with_capacity(capacity),
        }
    }

    /// Inserts a boxed entry, returning the previous value of an equal key.
    pub fn insert_boxed(
        &mut self,
        key: Box<dyn Data>,
        value: Box<dyn Data>,
    ) -> Option<Box<dyn Data>> {
        let hash = entry_hash(&*key);
        match self.index_of(&*key, hash) {
            Some(index) => Some(core::mem::replace(&mut self.entries[index].1, value)),
            None => {
                let index = self.entries.len();
                self.indices.insert_unique(hash, (hash, index), |&(hash, _)| hash);
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Inserts an entry, returning the previous value of an equal key.
    #[inline]
    pub fn insert<K: Data, V: Data>(&mut self, key: K, value: V) -> Option<Box<dyn Data>> {
        self.insert_boxed(Box::new(key), Box::new(value))
    }

    /// Returns the value of an equal key.
    pub fn get(&self, key: &dyn Data) -> Option<&dyn Data> {
        self.index_of(key, entry_hash(key)).map(|index| &*self.entries[index].1)
    }

    /// Returns `true` if the map holds an equal key.
    #[inline]
    pub fn contains_key(&self, key: &dyn Data) -> bool {
        self.index_of(key, entry_hash(key)).is_some()
    }

    fn index_of(&self, key: &dyn Data, hash: u64) -> Option<usize> {
        self.indices
            .find(hash, |&(_, index)| self.entries[index].0.data_eq(key))
            .map(|&(_, index)| index)
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&dyn Data, &dyn Data)> + DoubleEndedIterator {
        self.entries.iter().map(|(k, v)| (&**k, &**v))
    }
}

impl Data for DynamicMap {
    impl_data_type_fn!();

    fn clone_data(&self) -> Box<dyn Data> {
        Box::new(self.clone())
    }

    /// Maps are equal when they hold equal entries, regardless of order.
    fn data_eq(&self, other: &dyn Data) -> bool {
        other.downcast_ref::<Self>().is_some_and(|other| {
            self.len() == other.len()
                && self
                    .iter()
                    .all(|(k, v)| other.get(k).is_some_and(|o| v.data_eq(o)))
        })
    }

    fn data_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl fmt::Debug for DynamicMap {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.data_fmt(f)
    }
}

impl FromIterator<(Box<dyn Data>, Box<dyn Data>)> for DynamicMap {
    fn from_iter<I: IntoIterator<Item = (Box<dyn Data>, Box<dyn Data>)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = Self::with_capacity(iter.size_hint().0);
        for (key, value) in iter {
            map.insert_boxed(key, value);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::DynamicMap;
    use crate::Data;
    use crate::ops::{DynamicSet, DynamicTuple};

    #[test]
    fn keys_are_type_strict() {
        let mut map = DynamicMap::new();
        map.insert(1_i64, String::from("int"));
        map.insert(String::from("1"), String::from("str"));

        assert_eq!(map.len(), 2);
        assert_eq!(
            map.get(&1_i64).and_then(|v| v.downcast_ref::<String>()).map(String::as_str),
            Some("int")
        );
        assert_eq!(format!("{map:?}"), r#"{1: "int", "1": "str"}"#);
    }

    #[test]
    fn unordered_equality() {
        let mut a = DynamicMap::new();
        a.insert(1_i64, true);
        a.insert(2_i64, false);

        let mut b = DynamicMap::new();
        b.insert(2_i64, false);
        b.insert(1_i64, true);

        assert!(a.data_eq(&b));
        b.insert(1_i64, false);
        assert!(!a.data_eq(&b));
    }

    #[test]
    fn large_maps_keep_insertion_order() {
        const LEN: i64 = 20_000;

        let mut map = DynamicMap::new();
        for i in 0..LEN {
            assert!(map.insert(i, i * 2).is_none());
        }
        assert_eq!(map.len(), LEN as usize);
        assert!(map.insert(7_i64, 0_i64).is_some());
        assert_eq!(map.len(), LEN as usize);

        assert_eq!(map.get(&7_i64).and_then(|v| v.downcast_ref::<i64>()), Some(&0));
        let last = map.get(&(LEN - 1)).and_then(|v| v.downcast_ref::<i64>());
        assert_eq!(last, Some(&(2 * LEN - 2)));
        assert!(!map.contains_key(&LEN));
        assert!(!map.contains_key(&7_i32));

        let keys = map.iter().filter_map(|(k, _)| k.downcast_ref::<i64>().copied());
        assert!(keys.eq(0..LEN));

        let mut entries: Vec<_> = map
            .iter()
            .map(|(k, v)| (k.clone_data(), v.clone_data()))
            .collect();
        entries.reverse();
        let reversed: DynamicMap = entries.into_iter().collect();
        assert!(reversed.data_eq(&map));
    }

    #[test]
    fn tuple_and_unhashable_keys() {
        let mut key = DynamicTuple::new();
        key.push(1_i64);
        key.push(2_i64);

        let mut set = DynamicSet::new();
        set.insert(String::from("x"));

        let mut map = DynamicMap::new();
        map.insert(key.clone(), 1_i64);
        map.insert(set.clone(), 2_i64);
        map.insert(DynamicSet::new(), 3_i64);
        assert_eq!(map.len(), 3);

        assert!(map.insert(key.clone(), 4_i64).is_some());
        assert!(map.insert(set.clone(), 5_i64).is_some());
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(&set).and_then(|v| v.downcast_ref::<i64>()), Some(&5));
        assert_eq!(map.get(&key).and_then(|v| v.downcast_ref::<i64>()), Some(&4));
    }
}
