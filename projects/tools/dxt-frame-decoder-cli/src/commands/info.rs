use crate::error::CliError;
use argh::FromArgs;
use bytesize::ByteSize;
use dxt_frame_decoder_api::{
    has_converter, rgba32_buffer_size, CodecType, ConversionPolicy, TextureFormat, UploadFormat,
};
use dxt_frame_decoder_common::block_grid::BlockGrid;

#[derive(FromArgs, Debug)]
/// Print the format and buffer sizes for a stream type id and resolution
#[argh(subcommand, name = "info")]
pub struct InfoCmd {
    /// stream type id, hex (0xb) or decimal
    #[argh(option, from_str_fn(crate::util::parse_type_id))]
    pub type_id: u32,

    /// frame width in pixels
    #[argh(option)]
    pub width: usize,

    /// frame height in pixels
    #[argh(option)]
    pub height: usize,
}

pub fn handle_info_command(cmd: InfoCmd) -> Result<(), CliError> {
    let format = TextureFormat::from_type_id(cmd.type_id)
        .map_err(dxt_frame_decoder_api::FrameDecoderError::from)?;
    let grid = BlockGrid::new(cmd.width, cmd.height);
    let policy = ConversionPolicy::detect();
    let codec = CodecType::from_type_id(cmd.type_id);
    let bpp = format.bits_per_pixel();

    println!("Type id:          0x{:x}", cmd.type_id);
    println!("Codec:            {codec:?}");
    println!("Format:           {format:?} ({bpp} bpp)");
    println!("Blocks:           {}x{}", grid.blocks_x, grid.blocks_y);
    println!(
        "Compressed frame: {}",
        ByteSize::b(grid.compressed_len_for(format) as u64)
    );
    println!(
        "RGBA32 frame:     {}",
        ByteSize::b(rgba32_buffer_size(cmd.width, cmd.height) as u64)
    );
    println!("Convertible:      {}", has_converter(format));
    println!("This platform:    {policy:?}");
    match policy.upload_format(format) {
        UploadFormat::Rgba32 => println!("Uploads as:       RGBA32"),
        UploadFormat::Compressed(format) => println!("Uploads as:       {format:?}"),
    }
    Ok(())
}
