//! Minimal PNG codec for icon artwork.
//!
//! Decoding handles non-interlaced 8-bit greyscale, RGB and RGBA images,
//! which covers what icon editors export. Encoding always writes 8-bit
//! RGBA with no row filtering.

use std::io::{self, Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::{Compression, Crc};
use thiserror::Error;

use crate::resources::provider::Image;

const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Largest width or height accepted when decoding.
pub const MAX_DIMENSION: u32 = 4096;

#[derive(Debug, Error)]
pub enum PngError {
    #[error("not a PNG file")]
    Signature,

    #[error("unsupported PNG: {0}")]
    Unsupported(String),

    #[error("corrupt PNG: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Encode `image` as an 8-bit RGBA PNG.
pub fn encode(image: &Image) -> io::Result<Vec<u8>> {
    let mut out = SIGNATURE.to_vec();

    let mut header = Vec::with_capacity(13);
    header.extend_from_slice(&image.width().to_be_bytes());
    header.extend_from_slice(&image.height().to_be_bytes());
    // bit depth 8, colour type RGBA, default compression, filter and interlace
    header.extend_from_slice(&[8, 6, 0, 0, 0]);
    write_chunk(&mut out, b"IHDR", &header);

    let stride = image.width() as usize * 4;
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    for row in image.rgba().chunks(stride) {
        encoder.write_all(&[0])?;
        encoder.write_all(row)?;
    }
    write_chunk(&mut out, b"IDAT", &encoder.finish()?);
    write_chunk(&mut out, b"IEND", &[]);

    Ok(out)
}

fn write_chunk(out: &mut Vec<u8>, kind: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(data);

    let mut crc = Crc::new();
    crc.update(kind);
    crc.update(data);
    out.extend_from_slice(&crc.sum().to_be_bytes());
}

struct Header {
    width: u32,
    height: u32,
    channels: usize,
}

/// Decode a PNG into RGBA pixels.
pub fn decode(bytes: &[u8]) -> Result<Image, PngError> {
    if bytes.len() < SIGNATURE.len() || bytes[..SIGNATURE.len()] != SIGNATURE {
        return Err(PngError::Signature);
    }

    let mut header = None;
    let mut compressed = Vec::new();
    let mut rest = &bytes[SIGNATURE.len()..];

    while rest.len() >= 12 {
        let len = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]) as usize;
        let kind = &rest[4..8];
        if len > rest.len() - 12 {
            return Err(PngError::Corrupt("truncated chunk".to_string()));
        }
        let data = &rest[8..8 + len];

        match kind {
            b"IHDR" => header = Some(parse_header(data)?),
            b"IDAT" => compressed.extend_from_slice(data),
            b"IEND" => break,
            _ => {}
        }

        rest = &rest[12 + len..];
    }

    let header = header.ok_or_else(|| PngError::Corrupt("missing IHDR".to_string()))?;

    let stride = header.width as usize * header.channels;
    let expected = (stride + 1)
        .checked_mul(header.height as usize)
        .ok_or_else(|| PngError::Unsupported("image too large".to_string()))?;

    // never inflate past the image size the header promises
    let mut raw = Vec::with_capacity(expected);
    ZlibDecoder::new(compressed.as_slice())
        .take(expected as u64)
        .read_to_end(&mut raw)?;
    if raw.len() < expected {
        return Err(PngError::Corrupt(format!(
            "expected {} bytes of image data, found {}",
            expected,
            raw.len()
        )));
    }

    let pixels = unfilter(&raw, stride, header.channels, header.height as usize)?;
    let rgba = to_rgba(&pixels, header.channels);

    Image::new(header.width, header.height, rgba)
        .ok_or_else(|| PngError::Corrupt("pixel data does not match dimensions".to_string()))
}

fn parse_header(data: &[u8]) -> Result<Header, PngError> {
    if data.len() != 13 {
        return Err(PngError::Corrupt("bad IHDR length".to_string()));
    }

    let width = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
    let height = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
    let (bit_depth, colour_type, interlace) = (data[8], data[9], data[12]);

    if bit_depth != 8 {
        return Err(PngError::Unsupported(format!("bit depth {}", bit_depth)));
    }
    if width == 0 || height == 0 {
        return Err(PngError::Corrupt("zero-sized image".to_string()));
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(PngError::Unsupported(format!("{}x{} image", width, height)));
    }
    if interlace != 0 {
        return Err(PngError::Unsupported("interlaced image".to_string()));
    }

    let channels = match colour_type {
        0 => 1,
        2 => 3,
        4 => 2,
        6 => 4,
        other => return Err(PngError::Unsupported(format!("colour type {}", other))),
    };

    Ok(Header {
        width,
        height,
        channels,
    })
}

fn unfilter(raw: &[u8], stride: usize, bpp: usize, height: usize) -> Result<Vec<u8>, PngError> {
    let mut out = vec![0u8; stride * height];
    let zero_row = vec![0u8; stride];

    for y in 0..height {
        let line = &raw[y * (stride + 1)..(y + 1) * (stride + 1)];
        let filter = line[0];
        let src = &line[1..];

        let (done, current) = out.split_at_mut(y * stride);
        let prior = if y == 0 {
            zero_row.as_slice()
        } else {
            &done[(y - 1) * stride..]
        };
        let row = &mut current[..stride];

        for x in 0..stride {
            let a = if x >= bpp { row[x - bpp] } else { 0 };
            let b = prior[x];
            let c = if x >= bpp { prior[x - bpp] } else { 0 };

            let predicted = match filter {
                0 => 0,
                1 => a,
                2 => b,
                3 => ((a as u16 + b as u16) / 2) as u8,
                4 => paeth(a, b, c),
                other => return Err(PngError::Corrupt(format!("unknown filter {}", other))),
            };
            row[x] = src[x].wrapping_add(predicted);
        }
    }

    Ok(out)
}

fn paeth(a: u8, b: u8, c: u8) -> u8 {
    let p = a as i16 + b as i16 - c as i16;
    let pa = (p - a as i16).abs();
    let pb = (p - b as i16).abs();
    let pc = (p - c as i16).abs();

    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

fn to_rgba(pixels: &[u8], channels: usize) -> Vec<u8> {
    match channels {
        4 => pixels.to_vec(),
        3 => pixels
            .chunks(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        2 => pixels
            .chunks(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        _ => pixels.iter().flat_map(|&g| [g, g, g, 255]).collect(),
    }
}
