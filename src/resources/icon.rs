//! The `.ico` container.
//!
//! Frames smaller than 256 pixels are stored as 32-bit bitmaps with an
//! AND mask; larger frames are stored as PNG.

use std::io;

use crate::resources::png;
use crate::resources::provider::Image;

const HEADER_LEN: usize = 6;
const DIRECTORY_ENTRY_LEN: usize = 16;
const BITMAP_HEADER_LEN: u32 = 40;

/// Frames at or above this size are PNG compressed.
pub const PNG_THRESHOLD: u32 = 256;

/// Pixels with alpha at or below this are fully transparent.
pub const ALPHA_THRESHOLD: u8 = 5;

/// One entry of the container's directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub width: u32,
    pub height: u32,
    pub len: u32,
    /// Offset from the start of the file
    pub offset: u32,
}

/// Encode `images` into an icon container, in the order given.
pub fn encode_icon(images: &[Image]) -> io::Result<Vec<u8>> {
    let data_start = HEADER_LEN + images.len() * DIRECTORY_ENTRY_LEN;

    let mut out = Vec::new();
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&(images.len() as u16).to_le_bytes());

    let mut blocks = Vec::new();

    for image in images {
        let block_offset = blocks.len();

        if image.width() >= PNG_THRESHOLD || image.height() >= PNG_THRESHOLD {
            blocks.extend_from_slice(&png::encode(image)?);
        } else {
            write_bitmap(image, &mut blocks);
        }

        out.push(image.width() as u8);
        out.push(image.height() as u8);
        out.push(0); // palette size
        out.push(0); // reserved
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&32u16.to_le_bytes());
        out.extend_from_slice(&((blocks.len() - block_offset) as u32).to_le_bytes());
        out.extend_from_slice(&((data_start + block_offset) as u32).to_le_bytes());
    }

    debug_assert_eq!(out.len(), data_start);
    out.extend_from_slice(&blocks);
    Ok(out)
}

/// Bytes per AND mask row: one bit per pixel, padded to four bytes.
fn mask_stride(width: u32) -> u32 {
    width.div_ceil(32) * 4
}

fn write_bitmap(image: &Image, out: &mut Vec<u8>) {
    let (w, h) = (image.width(), image.height());
    let stride = mask_stride(w);

    for value in [BITMAP_HEADER_LEN, w, h * 2] {
        out.extend_from_slice(&value.to_le_bytes());
    }
    out.extend_from_slice(&1u16.to_le_bytes()); // planes
    out.extend_from_slice(&32u16.to_le_bytes()); // bits per pixel
    out.extend_from_slice(&0u32.to_le_bytes()); // compression
    out.extend_from_slice(&(h * w * 4 + h * stride).to_le_bytes());
    for _ in 0..4 {
        out.extend_from_slice(&0u32.to_le_bytes());
    }

    for y in (0..h).rev() {
        for x in 0..w {
            let [r, g, b, a] = image.pixel(x, y);
            if a <= ALPHA_THRESHOLD {
                out.extend_from_slice(&[0, 0, 0, 0]);
            } else {
                out.extend_from_slice(&[b, g, r, a]);
            }
        }
    }

    for y in (0..h).rev() {
        let mut row = vec![0u8; stride as usize];
        for x in 0..w {
            if image.pixel(x, y)[3] <= ALPHA_THRESHOLD {
                row[(x / 8) as usize] |= 0x80 >> (x % 8);
            }
        }
        out.extend_from_slice(&row);
    }
}

/// Read back the directory of an icon container.
pub fn read_directory(bytes: &[u8]) -> Option<Vec<DirectoryEntry>> {
    let u16_at = |i: usize| Some(u16::from_le_bytes([*bytes.get(i)?, *bytes.get(i + 1)?]));
    let u32_at = |i: usize| {
        Some(u32::from_le_bytes([
            *bytes.get(i)?,
            *bytes.get(i + 1)?,
            *bytes.get(i + 2)?,
            *bytes.get(i + 3)?,
        ]))
    };

    if u16_at(0)? != 0 || u16_at(2)? != 1 {
        return None;
    }
    let count = u16_at(4)? as usize;

    (0..count)
        .map(|i| {
            let base = HEADER_LEN + i * DIRECTORY_ENTRY_LEN;
            let size = |b: u8| if b == 0 { 256 } else { b as u32 };
            Some(DirectoryEntry {
                width: size(*bytes.get(base)?),
                height: size(*bytes.get(base + 1)?),
                len: u32_at(base + 8)?,
                offset: u32_at(base + 12)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_stride() {
        assert_eq!(mask_stride(16), 4);
        assert_eq!(mask_stride(32), 4);
        assert_eq!(mask_stride(48), 8);
        assert_eq!(mask_stride(20), 4);
        assert_eq!(mask_stride(100), 16);
    }

    #[test]
    fn test_odd_width_keeps_last_mask_bits() {
        let mut image = Image::filled(100, [1, 2, 3, 255]);
        image.set_pixel(99, 0, [1, 2, 3, 0]);

        let ico = encode_icon(&[image]).unwrap();
        let entries = read_directory(&ico).unwrap();
        assert_eq!(entries[0].len, 40 + 100 * 100 * 4 + 100 * 16);

        // the top row is the last mask row; x = 99 is bit 3 of byte 12
        let mask_start = 22 + 40 + 100 * 100 * 4;
        let last_row = &ico[mask_start + 99 * 16..mask_start + 100 * 16];
        assert_eq!(last_row[12], 0x80 >> 3);
        assert!(last_row[..12].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_directory_matches_blocks() {
        let images = [
            Image::filled(16, [255, 0, 0, 255]),
            Image::filled(48, [0, 255, 0, 128]),
            Image::filled(256, [0, 0, 255, 255]),
        ];
        let ico = encode_icon(&images).unwrap();
        let entries = read_directory(&ico).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].offset as usize, 6 + 3 * 16);
        assert_eq!(entries[2].width, 256);

        for pair in entries.windows(2) {
            assert_eq!(pair[0].offset + pair[0].len, pair[1].offset);
        }
        let last = entries[2];
        assert_eq!((last.offset + last.len) as usize, ico.len());

        // 16px bitmap: header, colour plane and mask
        assert_eq!(entries[0].len, 40 + 16 * 16 * 4 + 16 * 4);
        let png_start = last.offset as usize;
        assert_eq!(&ico[png_start + 1..png_start + 4], b"PNG");
    }

    #[test]
    fn test_transparent_pixels_are_masked() {
        let mut image = Image::filled(16, [10, 20, 30, 255]);
        image.set_pixel(0, 15, [10, 20, 30, 5]);
        image.set_pixel(1, 0, [10, 20, 30, 6]);

        let ico = encode_icon(&[image]).unwrap();
        let bitmap = &ico[22..];

        // first colour row is the bottom image row
        assert_eq!(&bitmap[40..44], &[0, 0, 0, 0]);
        assert_eq!(&bitmap[44..48], &[30, 20, 10, 255]);

        let mask = &bitmap[40 + 16 * 16 * 4..];
        assert_eq!(mask[0], 0x80);
        // top image row is the last mask row; alpha 6 stays opaque
        assert_eq!(mask[15 * 4], 0);
        assert_eq!(mask.len(), 16 * 4);
    }
}
