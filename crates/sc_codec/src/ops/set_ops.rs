use core::fmt;

use sc_utils::hash::HashTable;

use super::entry_hash;
use crate::Data;
use crate::data::impl_data_type_fn;
use crate::ops::Sequence;

// -----------------------------------------------------------------------------
// DynamicSet

/// An insertion-ordered set of values, deduplicated by [`Data::data_eq`].
///
/// Values are looked up through a hash table keyed by [`Data::data_hash`].
///
/// # Examples
///
/// ```
/// use sc_codec::ops::DynamicSet;
///
/// let mut set = DynamicSet::new();
/// assert!(set.insert(1_i64));
/// assert!(set.insert(2_i64));
/// assert!(!set.insert(1_i64));
///
/// assert_eq!(set.len(), 2);
/// assert!(set.contains(&2_i64));
/// ```
#[derive(Default, Clone)]
pub struct DynamicSet {
    values: Vec<Box<dyn Data>>,
    // `(hash, position in values)`
    indices: HashTable<(u64, usize)>,
}

crate::impl_type_path!(DynamicSet => "sc_codec::ops" :: "DynamicSet");

impl DynamicSet {
    /// Creates an empty set.
    #[inline]
    pub const fn new() -> Self {
        Self {
            values: Vec::new(),
            indices: HashTable::new(),
        }
    }

    /// Creates an empty set with space for at least `capacity` values.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            indices: HashTable::with_capacity(capacity),
        }
    }

    /// Inserts a boxed value, returns `false` if an equal value is present.
    pub fn insert_boxed(&mut self, value: Box<dyn Data>) -> bool {
        let hash = entry_hash(&*value);
        if self.index_of(&*value, hash).is_some() {
            return false;
        }
        let index = self.values.len();
        self.indices.insert_unique(hash, (hash, index), |&(hash, _)| hash);
        self.values.push(value);
        true
    }

    /// Inserts a value, returns `false` if an equal value is present.
    #[inline]
    pub fn insert<T: Data>(&mut self, value: T) -> bool {
        self.insert_boxed(Box::new(value))
    }

    /// Returns `true` if an equal value is present.
    #[inline]
    pub fn contains(&self, value: &dyn Data) -> bool {
        self.index_of(value, entry_hash(value)).is_some()
    }

    fn index_of(&self, value: &dyn Data, hash: u64) -> Option<usize> {
        self.indices
            .find(hash, |&(_, index)| self.values[index].data_eq(value))
            .map(|&(_, index)| index)
    }

    /// Returns the number of values.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the set has no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the values in insertion order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &dyn Data> {
        self.values.iter().map(|value| &**value)
    }
}

impl Sequence for DynamicSet {
    #[inline]
    fn items(&self) -> &[Box<dyn Data>] {
        &self.values
    }

    fn from_items(items: Vec<Box<dyn Data>>) -> Self {
        let mut set = Self::with_capacity(items.len());
        for item in items {
            set.insert_boxed(item);
        }
        set
    }
}

impl Data for DynamicSet {
    impl_data_type_fn!();

    fn clone_data(&self) -> Box<dyn Data> {
        Box::new(self.clone())
    }

    /// Sets are equal when they hold equal values, regardless of order.
    fn data_eq(&self, other: &dyn Data) -> bool {
        other.downcast_ref::<Self>().is_some_and(|other| {
            self.len() == other.len() && self.iter().all(|value| other.contains(value))
        })
    }

    fn data_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Debug for DynamicSet {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.data_fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::DynamicSet;
    use crate::Data;
    use crate::ops::{DynamicList, DynamicRecord, Sequence};
    use crate::serializer::Serializer;

    #[test]
    fn unordered_equality() {
        let mut a = DynamicSet::new();
        a.insert(1_i64);
        a.insert(String::from("x"));

        let mut b = DynamicSet::new();
        b.insert(String::from("x"));
        b.insert(1_i64);

        assert!(a.data_eq(&b));
        assert_eq!(format!("{a:?}"), r#"{1, "x"}"#);
    }

    #[test]
    fn from_items_dedups() {
        let set = DynamicSet::from_items(vec![
            Box::new(1_i64) as Box<dyn Data>,
            Box::new(1_i64),
            Box::new(2_i64),
        ]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn large_set_round_trip() {
        const LEN: i64 = 20_000;

        let items: Vec<Box<dyn Data>> = (0..LEN)
            .chain(0..LEN)
            .map(|i| Box::new(i) as Box<dyn Data>)
            .collect();
        let set = DynamicSet::from_items(items);
        assert_eq!(set.len(), LEN as usize);
        assert!(set.contains(&(LEN - 1)));
        assert!(!set.contains(&LEN));

        let mut serializer = Serializer::new();
        let (schema, arrays) = serializer.encode(&set).unwrap();
        let back = serializer.decode(schema, arrays).unwrap();
        assert!(back.data_eq(&set));

        let order = back
            .downcast_ref::<DynamicSet>()
            .into_iter()
            .flat_map(DynamicSet::iter)
            .filter_map(|value| value.downcast_ref::<i64>().copied());
        assert!(order.eq(0..LEN));
    }

    #[test]
    fn unhashable_values_are_deduplicated() {
        let mut record = DynamicRecord::new();
        record.insert("a", 1_i64);

        let mut set = DynamicSet::new();
        assert!(set.insert(record.clone()));
        assert!(set.insert(DynamicRecord::new()));
        assert!(set.insert(DynamicList::new()));
        assert!(!set.insert(record));
        assert!(!set.insert(DynamicList::new()));
        assert_eq!(set.len(), 3);
    }
}
