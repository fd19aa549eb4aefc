#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

pub mod convert;
pub mod error;
pub mod util;

pub use convert::{convert_blocks, convert_dxt1_to_rgba32, validate_buffers};
pub use error::ConvertError;
