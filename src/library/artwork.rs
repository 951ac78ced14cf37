//! Album art decoding into a half-block pixel grid.
//!
//! Art is decoded only when a track is loaded, never while scanning.

use std::path::Path;

use image::imageops::FilterType;

use super::metadata::TagReader;

/// Pixel grid: rows of (R, G, B), two pixel rows per terminal row.
pub type ArtPixels = Vec<Vec<(u8, u8, u8)>>;

/// Decode encoded image bytes and resize to `cols` x `rows * 2` pixels.
pub fn decode_art(bytes: &[u8], cols: u16, rows: u16) -> Option<ArtPixels> {
    if cols == 0 || rows == 0 {
        return None;
    }
    let img = match image::load_from_memory(bytes) {
        Ok(img) => img,
        Err(e) => {
            tracing::debug!(error = %e, "embedded picture could not be decoded");
            return None;
        }
    };

    let px_w = cols as u32;
    let px_h = rows as u32 * 2;
    let rgb = img.resize_exact(px_w, px_h, FilterType::Triangle).to_rgb8();

    Some(
        (0..px_h)
            .map(|y| {
                (0..px_w)
                    .map(|x| {
                        let p = rgb.get_pixel(x, y);
                        (p[0], p[1], p[2])
                    })
                    .collect()
            })
            .collect(),
    )
}

/// Read and decode the cover of `path`. Any failure yields `None`.
pub fn load_album_art(reader: &dyn TagReader, path: &Path, cols: u16, rows: u16) -> Option<ArtPixels> {
    match reader.read_picture(path) {
        Ok(Some(bytes)) => decode_art(&bytes, cols, rows),
        Ok(None) => None,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no album art");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32, color: [u8; 3]) -> Vec<u8> {
        let img = image::RgbImage::from_pixel(w, h, image::Rgb(color));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn decode_art_resizes_to_half_block_grid() {
        let pixels = decode_art(&png_bytes(40, 40, [10, 20, 30]), 8, 4).unwrap();
        assert_eq!(pixels.len(), 8);
        assert!(pixels.iter().all(|row| row.len() == 8));
        let (r, g, b) = pixels[3][5];
        assert!(r.abs_diff(10) <= 1 && g.abs_diff(20) <= 1 && b.abs_diff(30) <= 1);
    }

    #[test]
    fn corrupt_bytes_fall_back_to_none() {
        assert!(decode_art(b"definitely not an image", 8, 4).is_none());
        assert!(decode_art(&png_bytes(4, 4, [0, 0, 0]), 0, 4).is_none());
    }
}
