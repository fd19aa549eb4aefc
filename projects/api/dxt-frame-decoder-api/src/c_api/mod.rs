//! # C API (FFI) Documentation
//!
//! *Note: The C API is only available when the `c-exports` feature is enabled.*
//!
//! The `c-exports` feature exports a frame decoder over raw DXT block frames for use from C,
//! C++, or any language with a C FFI. Frames handed to it are expected to already be raw block
//! data; the decoder converts them to RGBA32 where required and guards the buffer with a lock.
//!
//! ## Example Usage
//!
//! ```c
//! DfdFrameDecoder* decoder = NULL;
//! DfdResult result = dfd_frame_decoder_create(1920, 1080, 0xb, DFD_CONVERSION_POLICY_DETECT, &decoder);
//! if (result.error_code != DFD_SUCCESS) {
//!     printf("%s\n", dfd_error_message(result.error_code));
//!     return;
//! }
//!
//! // Decode thread
//! dfd_frame_decoder_decode_frame(decoder, frame, dfd_frame_decoder_frame_size(decoder));
//!
//! // Render thread
//! const uint8_t* pixels;
//! size_t len;
//! if (dfd_frame_decoder_lock_buffer(decoder, &pixels, &len).error_code == DFD_SUCCESS) {
//!     upload_texture(pixels, len);
//!     dfd_frame_decoder_unlock_buffer(decoder);
//! }
//!
//! dfd_frame_decoder_free(decoder);
//! ```
//!
//! ## Functions
//!
//! - **`dfd_frame_decoder_create(width, height, type_id, policy, out_decoder)`** - Create a decoder
//! - **`dfd_frame_decoder_free(decoder)`** - Free a decoder (required to avoid memory leaks)
//! - **`dfd_frame_decoder_decode_frame(decoder, input, input_len)`** - Decode one frame
//! - **`dfd_frame_decoder_lock_buffer(decoder, out_data, out_len)`** - Lock the buffer for reading
//! - **`dfd_frame_decoder_unlock_buffer(decoder)`** - Release the lock
//! - **`dfd_frame_decoder_buffer_size(decoder)`** - Size of the decoded buffer
//! - **`dfd_frame_decoder_frame_size(decoder)`** - Size of one input frame
//!
//! ## Error Handling
//!
//! Functions return `DfdResult`, whose `error_code` is `DFD_SUCCESS` (0) on success.
//! `dfd_error_message` turns a code into a static, null-terminated description.
//!
//! A lock that is never unlocked blocks every later decode on that decoder.

pub mod error;
pub mod frame_decoder;
