use core::any::TypeId;
use core::fmt;

use crate::Data;
use crate::data::impl_data_type_fn;
use crate::ops::Sequence;
use crate::ops::list_ops::{items_eq, items_hash};

// -----------------------------------------------------------------------------
// DynamicTuple

/// A fixed, heterogeneous sequence of values.
///
/// Formats like a Rust tuple, which is also its key text inside a map:
///
/// ```
/// use sc_codec::Data;
/// use sc_codec::ops::DynamicTuple;
///
/// let pair = DynamicTuple::from_values([
///     Box::new(1_i64) as Box<dyn Data>,
///     Box::new(2_i64) as Box<dyn Data>,
/// ]);
/// assert_eq!(format!("{pair:?}"), "(1, 2)");
///
/// let single = DynamicTuple::from_values([Box::new(1_i64) as Box<dyn Data>]);
/// assert_eq!(format!("{single:?}"), "(1,)");
/// ```
#[derive(Default, Clone)]
pub struct DynamicTuple {
    fields: Vec<Box<dyn Data>>,
}

crate::impl_type_path!(DynamicTuple => "sc_codec::ops" :: "DynamicTuple");

impl DynamicTuple {
    /// Creates an empty tuple.
    #[inline]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Creates a tuple from boxed values.
    #[inline]
    pub fn from_values(values: impl IntoIterator<Item = Box<dyn Data>>) -> Self {
        Self {
            fields: values.into_iter().collect(),
        }
    }

    /// Appends a field.
    #[inline]
    pub fn push<T: Data>(&mut self, value: T) {
        self.fields.push(Box::new(value));
    }

    /// Appends a boxed field.
    #[inline]
    pub fn push_boxed(&mut self, value: Box<dyn Data>) {
        self.fields.push(value);
    }

    /// Returns the field at `index`.
    #[inline]
    pub fn field(&self, index: usize) -> Option<&dyn Data> {
        self.fields.get(index).map(|value| &**value)
    }

    /// Returns the number of fields.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the tuple is `()`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the fields.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &dyn Data> {
        self.fields.iter().map(|value| &**value)
    }
}

impl Sequence for DynamicTuple {
    #[inline]
    fn items(&self) -> &[Box<dyn Data>] {
        &self.fields
    }

    #[inline]
    fn from_items(items: Vec<Box<dyn Data>>) -> Self {
        Self { fields: items }
    }
}

impl Data for DynamicTuple {
    impl_data_type_fn!();

    fn clone_data(&self) -> Box<dyn Data> {
        Box::new(self.clone())
    }

    fn data_eq(&self, other: &dyn Data) -> bool {
        other
            .downcast_ref::<Self>()
            .is_some_and(|other| items_eq(&self.fields, &other.fields))
    }

    #[inline]
    fn data_hash(&self) -> Option<u64> {
        items_hash(TypeId::of::<Self>(), &self.fields)
    }

    fn data_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            return f.write_str("()");
        }
        let mut debug = f.debug_tuple("");
        for field in self.iter() {
            debug.field(&field);
        }
        debug.finish()
    }
}

impl fmt::Debug for DynamicTuple {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.data_fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::DynamicTuple;
    use crate::Data;
    use crate::ops::DynamicList;

    #[test]
    fn tuple_is_not_a_list() {
        let mut tuple = DynamicTuple::new();
        tuple.push(1_i64);
        let mut list = DynamicList::new();
        list.push(1_i64);

        assert!(!tuple.data_eq(&list));
        assert_eq!(format!("{:?}", DynamicTuple::new()), "()");
        assert_ne!(tuple.data_hash(), list.data_hash());
    }

    #[test]
    fn hash_follows_items() {
        let pair = |a: i64, b: i64| {
            let mut tuple = DynamicTuple::new();
            tuple.push(a);
            tuple.push(b);
            tuple
        };
        assert_eq!(pair(1, 2).data_hash(), pair(1, 2).data_hash());
        assert_ne!(pair(1, 2).data_hash(), pair(2, 1).data_hash());

        let mut nested = DynamicTuple::new();
        nested.push(DynamicList::new());
        assert!(nested.data_hash().is_some());
        nested.push(crate::ops::DynamicMap::new());
        assert!(nested.data_hash().is_none());
    }
}
