use crate::error::CliError;
use crate::util::*;
use argh::FromArgs;
use dxt_frame_decoder_api::{
    ConversionPolicy, FrameDecoder, FrameDecoderBuilder, RawBlockSource, TextureFormat,
};
#[cfg(feature = "multithreaded")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::info;

#[derive(FromArgs, Debug)]
/// Decode raw DXT frame dumps from input directory to output directory
#[argh(subcommand, name = "convert")]
pub struct ConvertCmd {
    /// input directory path
    #[argh(option, from_str_fn(crate::util::canonicalize_cli_path))]
    pub input: PathBuf,

    /// output directory path
    #[argh(option, from_str_fn(crate::util::canonicalize_cli_path))]
    pub output: PathBuf,

    /// frame width in pixels
    #[argh(option)]
    pub width: usize,

    /// frame height in pixels
    #[argh(option)]
    pub height: usize,

    /// stream type id, hex (0xb) or decimal; the low nibble selects the format
    #[argh(option, from_str_fn(crate::util::parse_type_id))]
    pub type_id: u32,

    /// conversion policy (rgba32, native, detect) [default: rgba32]
    #[argh(option, from_str_fn(crate::util::parse_policy))]
    pub policy: Option<ConversionPolicy>,
}

pub fn handle_convert_command(cmd: ConvertCmd) -> Result<(), CliError> {
    let format = TextureFormat::from_type_id(cmd.type_id)
        .map_err(dxt_frame_decoder_api::FrameDecoderError::from)?;
    let policy = cmd.policy.unwrap_or(ConversionPolicy::SoftwareRgba32);

    // Fail on bad parameters before touching any file.
    let probe = build_decoder(&cmd, format, policy)?;
    let extension = match probe.upload_format() {
        dxt_frame_decoder_api::UploadFormat::Rgba32 => "rgba",
        dxt_frame_decoder_api::UploadFormat::Compressed(_) => "blocks",
    };

    let mut entries = Vec::new();
    find_all_files(&cmd.input, &mut entries)?;
    info!("Found {} files to convert", entries.len());

    let start = Instant::now();
    let frames = AtomicUsize::new(0);

    let process = |path: &PathBuf| {
        let result = build_decoder(&cmd, format, policy).and_then(|decoder| {
            let output = output_path(path, &cmd.input, &cmd.output, extension);
            decode_file(&decoder, path, &output)
        });
        if let Ok(count) = result {
            frames.fetch_add(count, Ordering::Relaxed);
        }
        handle_process_entry_error(path, result);
    };

    #[cfg(feature = "multithreaded")]
    entries.par_iter().for_each(process);
    #[cfg(not(feature = "multithreaded"))]
    entries.iter().for_each(process);

    info!(
        "Converted {} frames in {:.2?}",
        frames.load(Ordering::Relaxed),
        start.elapsed()
    );
    Ok(())
}

fn build_decoder(
    cmd: &ConvertCmd,
    format: TextureFormat,
    policy: ConversionPolicy,
) -> Result<FrameDecoder<RawBlockSource>, CliError> {
    Ok(FrameDecoderBuilder::new()
        .width(cmd.width)
        .height(cmd.height)
        .type_id(cmd.type_id)
        .policy(policy)
        .build(RawBlockSource::new(format))?)
}

/// Mirrors `path` from under `input` to under `output`, replacing its extension.
fn output_path(path: &Path, input: &Path, output: &Path, extension: &str) -> PathBuf {
    let relative = path.strip_prefix(input).unwrap_or(path);
    output.join(relative).with_extension(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_mirrors_input_tree() {
        let path = output_path(
            Path::new("/in/clips/a.dxt"),
            Path::new("/in"),
            Path::new("/out"),
            "rgba",
        );
        assert_eq!(path, PathBuf::from("/out/clips/a.rgba"));
    }
}
