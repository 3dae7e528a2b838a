use image::RgbaImage;
use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

use super::error::IconError;

/// Encodes an RGBA image as an 8-bit PNG.  The output depends only on the
/// pixel data, so identical images always produce identical bytes.
pub fn write_png<W: Write>(image: &RgbaImage, output: W) -> Result<(), IconError> {
    let (width, height) = image.dimensions();
    let mut encoder = png::Encoder::new(output, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())?;
    writer.finish()?;
    Ok(())
}

/// Encodes an RGBA image into an in-memory PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, IconError> {
    let mut data = Vec::new();
    write_png(image, &mut data)?;
    Ok(data)
}

/// Writes an RGBA image to a PNG file, replacing any existing file.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), IconError> {
    let mut file = BufWriter::new(File::create(path)?);
    write_png(image, &mut file)?;
    file.flush()?;
    Ok(())
}

/// Reads the dimensions from the header of an encoded PNG.
pub fn png_dimensions(data: &[u8]) -> Result<(u32, u32), IconError> {
    let mut decoder = png::Decoder::new(Cursor::new(data));
    let info = decoder.read_header_info().map_err(|err| {
        IconError::InvalidContainer(format!("malformed PNG payload: {}", err))
    })?;
    Ok((info.width, info.height))
}
