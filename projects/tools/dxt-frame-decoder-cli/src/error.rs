use dxt_frame_decoder_api::FrameDecoderError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Decode(#[from] FrameDecoderError),
    #[error("{}: {len} bytes is not a whole number of {frame_size} byte frames", .path.display())]
    PartialFrame {
        path: PathBuf,
        len: usize,
        frame_size: usize,
    },
    #[error("A {width}x{height} frame holds no blocks")]
    EmptyFrame { width: usize, height: usize },
}
