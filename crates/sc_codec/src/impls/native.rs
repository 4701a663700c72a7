use core::fmt;
use core::hash::{Hash, Hasher};

use crate::Data;
use crate::data::impl_data_type_fn;

crate::impl_data_opaque!(hash: bool, char, String);
crate::impl_data_opaque!(hash: i8, i16, i32, i64, i128, isize);
crate::impl_data_opaque!(hash: u8, u16, u32, u64, u128, usize);

macro_rules! impl_data_float {
    ($($ty:ty),*) => {
        $(
            crate::impl_data_opaque!(@impl $ty {
                #[inline]
                fn data_hash(&self) -> Option<u64> {
                    let mut hasher = crate::data_hasher();
                    hasher.write_u64(super::float_bits(f64::from(*self)));
                    Some(hasher.finish())
                }
            });
        )*
    };
}

impl_data_float!(f32, f64);

/// `()` is the null value.
impl Data for () {
    impl_data_type_fn!();

    #[inline]
    fn clone_data(&self) -> Box<dyn Data> {
        Box::new(())
    }

    #[inline]
    fn data_eq(&self, other: &dyn Data) -> bool {
        other.is::<()>()
    }

    #[inline]
    fn data_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("None")
    }

    #[inline]
    fn data_hash(&self) -> Option<u64> {
        let mut hasher = crate::data_hasher();
        ().hash(&mut hasher);
        Some(hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use crate::Data;

    #[test]
    fn scalar_debug_text() {
        assert_eq!(format!("{:?}", &1_i64 as &dyn Data), "1");
        assert_eq!(format!("{:?}", &String::from("a") as &dyn Data), "\"a\"");
        assert_eq!(format!("{:?}", &() as &dyn Data), "None");
        assert_eq!(format!("{:?}", &1.5_f64 as &dyn Data), "1.5");
    }

    #[test]
    fn scalar_equality_is_type_strict() {
        assert!(1_i64.data_eq(&1_i64));
        assert!(!1_i64.data_eq(&2_i64));
        assert!(!1_i64.data_eq(&1_u64));
        assert!(().data_eq(&()));
        assert!(!().data_eq(&false));
    }

    #[test]
    fn equal_scalars_hash_equal() {
        assert_eq!(1_i64.data_hash(), 1_i64.data_hash());
        assert_ne!(1_i64.data_hash(), 2_i64.data_hash());
        assert_eq!(String::from("k").data_hash(), String::from("k").data_hash());
        assert!(().data_hash().is_some());

        assert!(0.0_f64.data_eq(&-0.0_f64));
        assert_eq!(0.0_f64.data_hash(), (-0.0_f64).data_hash());
        assert_eq!(1.5_f32.data_hash(), 1.5_f32.data_hash());
    }
}
