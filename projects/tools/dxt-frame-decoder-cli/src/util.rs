use crate::error::CliError;
use dxt_frame_decoder_api::{ConversionPolicy, FrameDecoder, RawBlockSource};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Recursively visits directories and collects file paths.
///
/// Directories or entries that cannot be read are skipped.
///
/// # Arguments
///
/// * `dir`: The directory to start the traversal from.
/// * `entries`: The vector of file paths to populate.
pub fn find_all_files(dir: &Path, entries: &mut Vec<PathBuf>) -> std::io::Result<()> {
    // Gracefully handle cases where the directory cannot be read
    let dir_entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Ok(()),
    };

    for entry in dir_entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue, // Skip problematic entries, e.g. those without access.
        };

        let path = entry.path();
        if path.is_dir() {
            find_all_files(&path, entries)?;
        } else {
            entries.push(path);
        }
    }
    Ok(())
}

/// Canonicalizes a CLI path argument, creating the directory if it doesn't exist.
pub fn canonicalize_cli_path(value: &str) -> Result<PathBuf, String> {
    let path = Path::new(value);

    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| format!("Failed to create directory: {e}"))?;
    }

    fs::canonicalize(path).map_err(|e| format!("Invalid path: {e}"))
}

/// Parses a stream type id given either in hex (`0xb`) or decimal (`11`).
pub fn parse_type_id(value: &str) -> Result<u32, String> {
    let parsed = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| format!("Invalid type id '{value}': {e}"))
}

/// Parses a conversion policy name.
pub fn parse_policy(value: &str) -> Result<ConversionPolicy, String> {
    match value.to_lowercase().as_str() {
        "rgba32" => Ok(ConversionPolicy::SoftwareRgba32),
        "native" => Ok(ConversionPolicy::Native),
        "detect" => Ok(ConversionPolicy::detect()),
        _ => Err(format!(
            "Invalid policy: {value}. Valid policies are: rgba32, native, detect"
        )),
    }
}

/// Decodes every frame of a raw block dump and writes the decoded frames back to back.
///
/// # Arguments
///
/// * `decoder` - The decoder; its frame size splits the input into frames
/// * `input` - Path of the raw block dump
/// * `output` - Path the decoded frames are written to
///
/// # Returns
///
/// The number of frames decoded.
pub fn decode_file(
    decoder: &FrameDecoder<RawBlockSource>,
    input: &Path,
    output: &Path,
) -> Result<usize, CliError> {
    let frame_size = decoder.compressed_frame_size();
    if frame_size == 0 {
        return Err(CliError::EmptyFrame {
            width: decoder.width(),
            height: decoder.height(),
        });
    }

    let data = fs::read(input)?;
    if data.len() % frame_size != 0 {
        return Err(CliError::PartialFrame {
            path: input.to_path_buf(),
            len: data.len(),
            frame_size,
        });
    }

    let mut decoded = Vec::with_capacity(data.len() / frame_size * decoder.buffer_size());
    for frame in data.chunks_exact(frame_size) {
        decoder.decode_frame(frame)?;
        decoder.with_buffer(|buffer| decoded.extend_from_slice(buffer))?;
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, &decoded)?;

    let frames = data.len() / frame_size;
    debug!(input = %input.display(), output = %output.display(), frames, "decoded file");
    Ok(frames)
}

/// Handles the result of processing a file, logging any error.
pub fn handle_process_entry_error(path: &Path, result: Result<usize, CliError>) {
    if let Err(e) = result {
        tracing::error!(path = %path.display(), "{e}");
    }
}
