#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]

pub mod block_grid;
pub mod bytes;
pub mod capability;
pub mod color_565;
pub mod color_8888;
pub mod texture_format;
