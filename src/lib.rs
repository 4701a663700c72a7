#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use sc_cfg as cfg;
pub use sc_codec as codec;
pub use sc_utils as utils;
