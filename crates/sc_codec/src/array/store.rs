use std::collections::BTreeMap;

use super::HostArray;

// -----------------------------------------------------------------------------
// ArrayStore

/// A flat mapping from array id to [`HostArray`].
///
/// During a save pass ids are assigned as the decimal text of the store size
/// at insertion time, so the first array is `"0"`, the next `"1"`, and so on.
///
/// # Examples
///
/// ```
/// use sc_codec::array::{ArrayStore, HostArray};
///
/// let mut store = ArrayStore::new();
/// let id = store.push(HostArray::from_vec(vec![2], vec![1_u8, 2]).unwrap());
///
/// assert_eq!(id, "0");
/// assert_eq!(store.get("0").map(HostArray::len), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayStore {
    arrays: BTreeMap<String, HostArray>,
}

impl ArrayStore {
    /// Creates an empty store.
    #[inline]
    pub const fn new() -> Self {
        Self {
            arrays: BTreeMap::new(),
        }
    }

    /// Inserts `array` under the next sequential id and returns that id.
    pub fn push(&mut self, array: HostArray) -> String {
        let id = self.arrays.len().to_string();
        self.arrays.insert(id.clone(), array);
        id
    }

    /// Inserts `array` under an explicit id, returning the array it replaces.
    #[inline]
    pub fn insert(&mut self, id: impl Into<String>, array: HostArray) -> Option<HostArray> {
        self.arrays.insert(id.into(), array)
    }

    /// Returns the array stored under `id`.
    #[inline]
    pub fn get(&self, id: &str) -> Option<&HostArray> {
        self.arrays.get(id)
    }

    /// Removes and returns the array stored under `id`.
    #[inline]
    pub fn remove(&mut self, id: &str) -> Option<HostArray> {
        self.arrays.remove(id)
    }

    /// Returns `true` if an array is stored under `id`.
    #[inline]
    pub fn contains(&self, id: &str) -> bool {
        self.arrays.contains_key(id)
    }

    /// Returns the number of arrays.
    #[inline]
    pub fn len(&self) -> usize {
        self.arrays.len()
    }

    /// Returns `true` if the store holds no arrays.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arrays.is_empty()
    }

    /// Removes every array.
    #[inline]
    pub fn clear(&mut self) {
        self.arrays.clear();
    }

    /// Iterates over `(id, array)` pairs, ordered by id text.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &HostArray)> {
        self.arrays.iter().map(|(id, array)| (id.as_str(), array))
    }
}

impl IntoIterator for ArrayStore {
    type Item = (String, HostArray);
    type IntoIter = std::collections::btree_map::IntoIter<String, HostArray>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.arrays.into_iter()
    }
}

impl FromIterator<(String, HostArray)> for ArrayStore {
    #[inline]
    fn from_iter<I: IntoIterator<Item = (String, HostArray)>>(iter: I) -> Self {
        Self {
            arrays: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ArrayStore;
    use crate::array::HostArray;

    #[test]
    fn ids_are_sequential() {
        let mut store = ArrayStore::new();
        let ids: Vec<String> = (0..12)
            .map(|i| store.push(HostArray::from_vec(vec![1], vec![i as f32]).unwrap()))
            .collect();

        assert_eq!(ids[0], "0");
        assert_eq!(ids[11], "11");
        assert_eq!(store.len(), 12);

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.push(HostArray::from_vec(vec![], vec![true]).unwrap()), "0");
    }
}
