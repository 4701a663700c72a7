//! Compile-time configuration helpers.
//!
//! Crates in this workspace express optional functionality through Cargo
//! features. Instead of scattering `#[cfg(...)]` attributes, each crate declares
//! a `cfg` module with [`define_alias!`] and then writes:
//!
//! ```ignore
//! crate::cfg::ndarray! {
//!     mod ndarray_backend;
//! }
//!
//! let linked = crate::cfg::ndarray! { if { true } else { false } };
//! ```
//!
//! An alias bound to an active configuration behaves like [`enabled!`],
//! otherwise like [`disabled!`].
#![no_std]

/// Passes its input through unchanged.
///
/// - `enabled!()` evaluates to `true`.
/// - `enabled! { if { A } else { B } }` expands to `{ A }`.
/// - Any other input is emitted verbatim.
#[doc(hidden)]
#[macro_export]
macro_rules! enabled {
    () => { true };
    (if { $($p:tt)* } else { $($n:tt)* }) => { { $($p)* } };
    ($($p:tt)*) => { $($p)* };
}

/// Discards its input.
///
/// - `disabled!()` evaluates to `false`.
/// - `disabled! { if { A } else { B } }` expands to `{ B }`.
/// - Any other input is removed.
#[doc(hidden)]
#[macro_export]
macro_rules! disabled {
    () => { false };
    (if { $($p:tt)* } else { $($n:tt)* }) => { { $($n)* } };
    ($($p:tt)*) => {};
}

/// Declares named aliases for `cfg` predicates.
///
/// ```ignore
/// pub mod cfg {
///     sc_cfg::define_alias! {
///         #[cfg(feature = "std")] => std,
///         #[cfg(feature = "ndarray")] => ndarray,
///     }
/// }
/// ```
///
/// The predicate is evaluated in the crate that invokes this macro, so
/// `feature = "..."` refers to that crate's own features.
#[macro_export]
macro_rules! define_alias {
    (@alias [$meta:meta] $name:ident) => {
        #[cfg($meta)]
        #[doc = concat!("Keeps its input: `#[cfg(", stringify!($meta), ")]` is active.")]
        pub use $crate::enabled as $name;

        #[cfg(not($meta))]
        #[doc = concat!("Drops its input: `#[cfg(", stringify!($meta), ")]` is inactive.")]
        pub use $crate::disabled as $name;
    };
    ($( #[cfg($meta:meta)] => $name:ident ),* $(,)?) => {
        $(
            $crate::define_alias!(@alias [$meta] $name);
        )*
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn enabled_keeps_branch() {
        assert!(crate::enabled!());
        let v = crate::enabled! { if { 1 } else { 2 } };
        assert_eq!(v, 1);
    }

    #[test]
    fn disabled_drops_branch() {
        assert!(!crate::disabled!());
        let v = crate::disabled! { if { 1 } else { 2 } };
        assert_eq!(v, 2);
    }
}
