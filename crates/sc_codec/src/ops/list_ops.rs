use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::Data;
use crate::data::impl_data_type_fn;

// -----------------------------------------------------------------------------
// Sequence

/// A container whose items are encoded as an ordered JSON list.
///
/// Implemented by [`DynamicList`], [`DynamicTuple`] and [`DynamicSet`],
/// all handled by [`ListLikeProcessor`](crate::processors::ListLikeProcessor).
pub trait Sequence: Data + Sized {
    /// Returns the items in order.
    fn items(&self) -> &[Box<dyn Data>];

    /// Rebuilds the container from decoded items.
    fn from_items(items: Vec<Box<dyn Data>>) -> Self;
}

/// Compares two item slices element-wise with [`Data::data_eq`].
pub(crate) fn items_eq(a: &[Box<dyn Data>], b: &[Box<dyn Data>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.data_eq(&**y))
}

/// Combines the [`Data::data_hash`] of every item with the container type.
///
/// Returns `None` if any item is not hashable.
pub(crate) fn items_hash(ty_id: TypeId, items: &[Box<dyn Data>]) -> Option<u64> {
    let mut hasher = crate::data_hasher();
    for item in items {
        hasher.write_u64(item.data_hash()?);
    }
    ty_id.hash(&mut hasher);
    items.len().hash(&mut hasher);
    Some(hasher.finish())
}

// -----------------------------------------------------------------------------
// DynamicList

/// A growable, heterogeneous list, similar to `Vec<Box<dyn Data>>`.
///
/// # Examples
///
/// ```
/// use sc_codec::ops::DynamicList;
///
/// let mut list = DynamicList::new();
/// list.push(1_i64);
/// list.push(String::from("a"));
///
/// assert_eq!(list.len(), 2);
/// assert_eq!(format!("{list:?}"), r#"[1, "a"]"#);
/// ```
#[derive(Default, Clone)]
pub struct DynamicList {
    values: Vec<Box<dyn Data>>,
}

crate::impl_type_path!(DynamicList => "sc_codec::ops" :: "DynamicList");

impl DynamicList {
    /// Creates an empty list.
    #[inline]
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Creates an empty list with at least the specified capacity.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    /// Appends a boxed value.
    #[inline]
    pub fn push_boxed(&mut self, value: Box<dyn Data>) {
        self.values.push(value);
    }

    /// Appends a value.
    #[inline]
    pub fn push<T: Data>(&mut self, value: T) {
        self.values.push(Box::new(value));
    }

    /// Returns the item at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&dyn Data> {
        self.values.get(index).map(|value| &**value)
    }

    /// Returns the number of items.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the list has no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the items.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &dyn Data> {
        self.values.iter().map(|value| &**value)
    }

    /// Consumes the list, returning its items.
    #[inline]
    pub fn into_values(self) -> Vec<Box<dyn Data>> {
        self.values
    }
}

impl Sequence for DynamicList {
    #[inline]
    fn items(&self) -> &[Box<dyn Data>] {
        &self.values
    }

    #[inline]
    fn from_items(items: Vec<Box<dyn Data>>) -> Self {
        Self { values: items }
    }
}

impl Data for DynamicList {
    impl_data_type_fn!();

    fn clone_data(&self) -> Box<dyn Data> {
        Box::new(self.clone())
    }

    fn data_eq(&self, other: &dyn Data) -> bool {
        other
            .downcast_ref::<Self>()
            .is_some_and(|other| items_eq(&self.values, &other.values))
    }

    #[inline]
    fn data_hash(&self) -> Option<u64> {
        items_hash(TypeId::of::<Self>(), &self.values)
    }

    fn data_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl fmt::Debug for DynamicList {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.data_fmt(f)
    }
}

impl From<Vec<Box<dyn Data>>> for DynamicList {
    #[inline]
    fn from(values: Vec<Box<dyn Data>>) -> Self {
        Self { values }
    }
}

impl FromIterator<Box<dyn Data>> for DynamicList {
    #[inline]
    fn from_iter<I: IntoIterator<Item = Box<dyn Data>>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for DynamicList {
    type Item = Box<dyn Data>;
    type IntoIter = std::vec::IntoIter<Box<dyn Data>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::DynamicList;
    use crate::Data;

    #[test]
    fn equality_is_ordered() {
        let a: DynamicList = [Box::new(1_i64) as Box<dyn Data>, Box::new(true)]
            .into_iter()
            .collect();
        let b: DynamicList = [Box::new(true) as Box<dyn Data>, Box::new(1_i64)]
            .into_iter()
            .collect();

        assert!(a.data_eq(&a.clone()));
        assert!(!a.data_eq(&b));
        assert_eq!(a.get(1).and_then(|v| v.downcast_ref::<bool>()), Some(&true));
    }
}
