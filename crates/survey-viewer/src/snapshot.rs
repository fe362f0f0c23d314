//! Equirectangular PNG snapshots of the published color buffer.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use survey_mesh::SphereGrid;
use survey_overlay::ColorFrame;

use crate::ViewerError;

/// RGBA pixels with one column per longitude and one row per ring, north up.
/// The seam column is dropped.
pub fn equirect_pixels(frame: &ColorFrame<'_>, grid: SphereGrid) -> Vec<u8> {
    let width = grid.nb_long as usize;
    let mut pixels = Vec::with_capacity(width * grid.nb_lat as usize * 4);
    for row in 0..grid.nb_lat {
        let ring = &frame.colors[grid.row_range(row)];
        for color in &ring[..width] {
            pixels.extend_from_slice(&color.to_array());
        }
    }
    pixels
}

/// Write the frame to `path` as an 8-bit RGBA PNG.
pub fn write_png(path: &Path, frame: &ColorFrame<'_>, grid: SphereGrid) -> Result<(), ViewerError> {
    let pixels = equirect_pixels(frame, grid);
    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), grid.nb_long, grid.nb_lat);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&pixels)?;
    Ok(())
}
