//! Items used by exported macros and `#[derive(Record)]` output.

crate::cfg::auto_register! {
    pub use ::inventory;
}
