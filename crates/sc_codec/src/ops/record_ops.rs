use core::fmt;

use crate::data::impl_data_type_fn;
use crate::{CodecError, Data, Result};

// -----------------------------------------------------------------------------
// Record

/// A value made of named fields, such as a struct.
///
/// Any type implementing `Record` that has no dedicated processor is encoded
/// under the `Record` marker and decoded as a [`DynamicRecord`]. Register a
/// [`TypedRecordProcessor`] to get the original type back instead.
///
/// Usually implemented through [`#[derive(Record)]`](crate::derive::Record).
///
/// # Examples
///
/// ```
/// use sc_codec::ops::{DynamicRecord, Record};
///
/// let mut record = DynamicRecord::new();
/// record.insert("a", 1_i64);
/// record.insert("b", true);
///
/// assert_eq!(record.field_len(), 2);
/// assert_eq!(record.name_at(1), Some("b"));
/// assert_eq!(record.field("a").and_then(|v| v.downcast_ref::<i64>()), Some(&1));
/// ```
///
/// [`TypedRecordProcessor`]: crate::processors::TypedRecordProcessor
pub trait Record: Data {
    /// Returns the number of fields.
    fn field_len(&self) -> usize;

    /// Returns the name of the field at `index`.
    fn name_at(&self, index: usize) -> Option<&str>;

    /// Returns the value of the field at `index`.
    fn field_at(&self, index: usize) -> Option<&dyn Data>;

    /// Returns the value of the field named `name`.
    fn field(&self, name: &str) -> Option<&dyn Data> {
        (0..self.field_len())
            .find(|&index| self.name_at(index) == Some(name))
            .and_then(|index| self.field_at(index))
    }

    /// Returns an iterator over `(name, value)` pairs in declaration order.
    fn iter_fields(&self) -> RecordFieldIter<'_>;
}

/// Rebuilds a concrete record type from a [`DynamicRecord`].
///
/// Generated by [`#[derive(Record)]`](crate::derive::Record), each field is
/// taken with [`DynamicRecord::take_field`].
pub trait FromRecord: Record + Sized {
    /// Constructs `Self` by consuming the fields of `record`.
    fn from_record(record: DynamicRecord) -> Result<Self>;
}

// -----------------------------------------------------------------------------
// RecordFieldIter

/// An iterator over the fields of a [`Record`].
pub struct RecordFieldIter<'a> {
    record: &'a dyn Record,
    index: usize,
}

impl<'a> RecordFieldIter<'a> {
    /// Creates a new iterator for the given record.
    #[inline(always)]
    pub const fn new(record: &'a dyn Record) -> Self {
        Self { record, index: 0 }
    }
}

impl<'a> Iterator for RecordFieldIter<'a> {
    type Item = (&'a str, &'a dyn Data);

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.record.name_at(self.index)?;
        let value = self.record.field_at(self.index)?;
        self.index += 1;
        Some((name, value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.record.field_len() - self.index;
        (size, Some(size))
    }
}

impl<'a> ExactSizeIterator for RecordFieldIter<'a> {}

// -----------------------------------------------------------------------------
// Helper functions

/// Compares a record against any value by field names and field values.
///
/// Field order is ignored, so a derived record equals the
/// [`DynamicRecord`] it decodes to.
pub fn record_eq(record: &dyn Record, other: &dyn Data) -> bool {
    let Some(other) = other.as_record() else {
        return false;
    };
    if record.field_len() != other.field_len() {
        return false;
    }
    record
        .iter_fields()
        .all(|(name, value)| other.field(name).is_some_and(|o| value.data_eq(o)))
}

/// Formats a record as `Name { field: value, .. }`.
pub fn record_fmt(record: &dyn Record, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut debug = f.debug_struct(record.data_type().name());
    for (name, value) in record.iter_fields() {
        debug.field(name, &value);
    }
    debug.finish()
}

// -----------------------------------------------------------------------------
// DynamicRecord

/// A record whose fields are decided at runtime.
///
/// This is what a `Record` node decodes to when no typed processor claims it.
/// Field order follows insertion order.
#[derive(Default)]
pub struct DynamicRecord {
    names: Vec<String>,
    fields: Vec<Box<dyn Data>>,
}

crate::impl_type_path!(DynamicRecord => "sc_codec::ops" :: "DynamicRecord");

impl DynamicRecord {
    /// Creates an empty record.
    #[inline]
    pub const fn new() -> Self {
        Self {
            names: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Creates an empty record with room for `capacity` fields.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            names: Vec::with_capacity(capacity),
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Appends a boxed field, overwriting the value if the name already exists.
    pub fn insert_boxed(&mut self, name: impl Into<String>, value: Box<dyn Data>) {
        let name: String = name.into();
        match self.index_of(&name) {
            Some(index) => self.fields[index] = value,
            None => {
                self.names.push(name);
                self.fields.push(value);
            }
        }
    }

    /// Appends a field, overwriting the value if the name already exists.
    #[inline]
    pub fn insert<T: Data>(&mut self, name: impl Into<String>, value: T) {
        self.insert_boxed(name, Box::new(value));
    }

    /// Gets the index of the field with the given name.
    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Removes the field named `name` and returns its value.
    pub fn remove(&mut self, name: &str) -> Option<Box<dyn Data>> {
        let index = self.index_of(name)?;
        self.names.remove(index);
        Some(self.fields.remove(index))
    }

    /// Removes the field named `name` and downcasts it to `T`.
    ///
    /// # Errors
    ///
    /// - [`CodecError::Malformed`] if the field is absent.
    /// - [`CodecError::TypeMismatch`] if the field holds another type.
    pub fn take_field<T: Data + crate::info::TypePath>(&mut self, name: &str) -> Result<T> {
        let value = self.remove(name).ok_or_else(|| {
            CodecError::malformed("Record", format!("missing field `{name}`"))
        })?;
        value.take::<T>().map_err(|value| CodecError::TypeMismatch {
            expected: T::type_path(),
            found: value.data_type().path(),
        })
    }

    /// Iterates over the field names.
    #[inline]
    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Record for DynamicRecord {
    #[inline]
    fn field_len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    #[inline]
    fn field_at(&self, index: usize) -> Option<&dyn Data> {
        self.fields.get(index).map(|value| &**value)
    }

    #[inline]
    fn iter_fields(&self) -> RecordFieldIter<'_> {
        RecordFieldIter::new(self)
    }
}

impl Data for DynamicRecord {
    impl_data_type_fn!();

    #[inline]
    fn as_record(&self) -> Option<&dyn Record> {
        Some(self)
    }

    fn clone_data(&self) -> Box<dyn Data> {
        Box::new(self.clone())
    }

    #[inline]
    fn data_eq(&self, other: &dyn Data) -> bool {
        record_eq(self, other)
    }

    fn data_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Record");
        for (name, value) in self.iter_fields() {
            debug.field(name, &value);
        }
        debug.finish()
    }
}

impl Clone for DynamicRecord {
    fn clone(&self) -> Self {
        Self {
            names: self.names.clone(),
            fields: self.fields.clone(),
        }
    }
}

impl fmt::Debug for DynamicRecord {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.data_fmt(f)
    }
}

impl<N: Into<String>> FromIterator<(N, Box<dyn Data>)> for DynamicRecord {
    fn from_iter<I: IntoIterator<Item = (N, Box<dyn Data>)>>(iter: I) -> Self {
        let mut record = DynamicRecord::new();
        for (name, value) in iter {
            record.insert_boxed(name, value);
        }
        record
    }
}

impl IntoIterator for DynamicRecord {
    type Item = (String, Box<dyn Data>);
    type IntoIter = core::iter::Zip<std::vec::IntoIter<String>, std::vec::IntoIter<Box<dyn Data>>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.names.into_iter().zip(self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::{DynamicRecord, Record};
    use crate::{CodecError, Data};

    #[test]
    fn insert_overwrites_in_place() {
        let mut record = DynamicRecord::new();
        record.insert("a", 1_i64);
        record.insert("b", 2_i64);
        record.insert("a", 3_i64);

        assert_eq!(record.names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(record.field("a").and_then(|v| v.downcast_ref::<i64>()), Some(&3));
    }

    #[test]
    fn equality_ignores_field_order() {
        let mut a = DynamicRecord::new();
        a.insert("x", 1_i64);
        a.insert("y", String::from("s"));

        let mut b = DynamicRecord::new();
        b.insert("y", String::from("s"));
        b.insert("x", 1_i64);

        assert!(a.data_eq(&b));

        b.insert("x", 2_i64);
        assert!(!a.data_eq(&b));
        assert!(!a.data_eq(&1_i64));
    }

    #[test]
    fn take_field_errors() {
        let mut record = DynamicRecord::new();
        record.insert("a", 1_i64);

        assert!(matches!(
            record.take_field::<bool>("a"),
            Err(CodecError::TypeMismatch { expected: "bool", found: "i64" })
        ));
        assert!(matches!(
            record.take_field::<i64>("a"),
            Err(CodecError::Malformed { .. })
        ));
    }

    #[test]
    fn debug_form() {
        let mut record = DynamicRecord::new();
        record.insert("a", 1_i64);
        assert_eq!(format!("{record:?}"), "Record { a: 1 }");
    }
}
