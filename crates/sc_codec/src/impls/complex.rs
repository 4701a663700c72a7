use core::fmt;
use core::hash::Hasher;

use num_complex::Complex;

use crate::Data;
use crate::data::impl_data_type_fn;

macro_rules! impl_data_complex {
    ($($ty:ty),*) => {
        $(
            impl Data for Complex<$ty> {
                impl_data_type_fn!();

                #[inline]
                fn clone_data(&self) -> Box<dyn Data> {
                    Box::new(*self)
                }

                #[inline]
                fn data_eq(&self, other: &dyn Data) -> bool {
                    other.downcast_ref::<Self>().is_some_and(|other| self == other)
                }

                /// Formats as `re+imi`, the text accepted by `Complex::from_str`.
                #[inline]
                fn data_fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    fmt::Display::fmt(self, f)
                }

                fn data_hash(&self) -> Option<u64> {
                    let mut hasher = crate::data_hasher();
                    hasher.write_u64(super::float_bits(f64::from(self.re)));
                    hasher.write_u64(super::float_bits(f64::from(self.im)));
                    Some(hasher.finish())
                }
            }
        )*
    };
}

impl_data_complex!(f32, f64);

#[cfg(test)]
mod tests {
    use num_complex::Complex;

    use crate::Data;

    #[test]
    fn complex_text_form() {
        let z = Complex::new(1.0_f64, -2.0);
        assert_eq!(format!("{:?}", &z as &dyn Data), "1-2i");
        assert!(z.data_eq(&Complex::new(1.0_f64, -2.0)));
        assert!(!z.data_eq(&Complex::new(1.0_f32, -2.0)));
        assert_eq!(z.data_hash(), Complex::new(1.0_f64, -2.0).data_hash());
    }
}
