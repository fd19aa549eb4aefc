#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

pub mod convert;
pub mod util;

pub use convert::{convert_dxt5_to_rgba32, convert_dxt5_to_rgba32_with_order};
pub use dxt_frame_decoder_bc1::ConvertError;
pub use util::Dxt5DecodeOrder;
