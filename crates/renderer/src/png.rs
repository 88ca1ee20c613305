//! PNG encoding for RGBA canvases.
//!
//! Two encoding modes:
//! - **Indexed PNG (color type 3)** when the image has at most 256 unique
//!   colors. Block designs are mostly flat color plus anti-aliased edges,
//!   so small canvases often fit and encode much smaller.
//! - **RGBA PNG (color type 6)** as the fallback.
//!
//! `encode_auto` picks the mode. Palette order is the sorted packed color
//! value in both the sequential and parallel paths, so the same pixels
//! always produce byte-identical files.

use std::collections::HashMap;
use std::io::Write;

use blocks_common::{DesignError, DesignResult};
use rayon::prelude::*;

/// Maximum colors for indexed PNG (PNG8).
const MAX_PALETTE_SIZE: usize = 256;

/// Minimum pixels before parallel palette extraction pays off.
const PARALLEL_THRESHOLD: usize = 1 << 16; // 256x256

/// Encode RGBA pixels, choosing indexed or full RGBA automatically.
pub fn encode_auto(pixels: &[u8], width: usize, height: usize) -> DesignResult<Vec<u8>> {
    match extract_palette(pixels) {
        Some((palette, indices)) => encode_indexed(width, height, &palette, &indices),
        None => encode_rgba(pixels, width, height),
    }
}

/// Encode RGBA pixels as a color type 6 PNG.
pub fn encode_rgba(pixels: &[u8], width: usize, height: usize) -> DesignResult<Vec<u8>> {
    if pixels.len() != width * height * 4 {
        return Err(DesignError::Render(format!(
            "pixel buffer is {} bytes, expected {} for {}x{}",
            pixels.len(),
            width * height * 4,
            width,
            height
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr.push(8); // bit depth
    ihdr.push(6); // color type: RGBA
    ihdr.push(0); // compression method
    ihdr.push(0); // filter method
    ihdr.push(0); // interlace method
    write_chunk(&mut png, b"IHDR", &ihdr);

    let idat = deflate_scanlines(pixels, width * 4, height)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Encode a palettized image as a color type 3 PNG with PLTE (and tRNS when
/// any palette entry is translucent).
pub fn encode_indexed(
    width: usize,
    height: usize,
    palette: &[(u8, u8, u8, u8)],
    indices: &[u8],
) -> DesignResult<Vec<u8>> {
    if indices.len() != width * height {
        return Err(DesignError::Render(format!(
            "index buffer is {} entries, expected {} for {}x{}",
            indices.len(),
            width * height,
            width,
            height
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);

    let mut ihdr = Vec::with_capacity(13);
    ihdr.extend_from_slice(&(width as u32).to_be_bytes());
    ihdr.extend_from_slice(&(height as u32).to_be_bytes());
    ihdr.push(8); // bit depth: 8 bits per palette index
    ihdr.push(3); // color type: indexed
    ihdr.push(0);
    ihdr.push(0);
    ihdr.push(0);
    write_chunk(&mut png, b"IHDR", &ihdr);

    let mut plte = Vec::with_capacity(palette.len() * 3);
    for (r, g, b, _) in palette {
        plte.extend_from_slice(&[*r, *g, *b]);
    }
    write_chunk(&mut png, b"PLTE", &plte);

    if palette.iter().any(|(_, _, _, a)| *a < 255) {
        let trns: Vec<u8> = palette.iter().map(|(_, _, _, a)| *a).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    let idat = deflate_scanlines(indices, width, height)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Pack RGBA bytes into a u32 for hashing and ordering.
#[inline(always)]
fn pack_color(px: &[u8]) -> u32 {
    (px[0] as u32) | ((px[1] as u32) << 8) | ((px[2] as u32) << 16) | ((px[3] as u32) << 24)
}

#[inline(always)]
fn unpack_color(packed: u32) -> (u8, u8, u8, u8) {
    (
        packed as u8,
        (packed >> 8) as u8,
        (packed >> 16) as u8,
        (packed >> 24) as u8,
    )
}

/// Extract a palette of at most 256 colors plus per-pixel indices.
///
/// Returns `None` when the image has too many colors. The palette is sorted
/// by packed value so extraction is order-independent and deterministic.
fn extract_palette(pixels: &[u8]) -> Option<(Vec<(u8, u8, u8, u8)>, Vec<u8>)> {
    let num_pixels = pixels.len() / 4;

    // Pass 1: unique colors
    let unique: Vec<u32> = if num_pixels >= PARALLEL_THRESHOLD {
        let chunk_size = (num_pixels / rayon::current_num_threads()).max(256) * 4;
        let partials: Vec<Option<Vec<u32>>> = pixels
            .par_chunks(chunk_size)
            .map(|chunk| {
                let mut local: HashMap<u32, ()> = HashMap::with_capacity(MAX_PALETTE_SIZE + 1);
                for px in chunk.chunks_exact(4) {
                    local.insert(pack_color(px), ());
                    if local.len() > MAX_PALETTE_SIZE {
                        return None; // provably too many colors
                    }
                }
                Some(local.into_keys().collect())
            })
            .collect();

        let mut merged: Vec<u32> = Vec::new();
        for partial in partials {
            merged.extend(partial?);
        }
        merged.sort_unstable();
        merged.dedup();
        merged
    } else {
        let mut seen: HashMap<u32, ()> = HashMap::with_capacity(MAX_PALETTE_SIZE + 1);
        for px in pixels.chunks_exact(4) {
            seen.insert(pack_color(px), ());
            if seen.len() > MAX_PALETTE_SIZE {
                return None;
            }
        }
        let mut colors: Vec<u32> = seen.into_keys().collect();
        colors.sort_unstable();
        colors
    };

    if unique.len() > MAX_PALETTE_SIZE {
        return None;
    }

    let color_to_index: HashMap<u32, u8> = unique
        .iter()
        .enumerate()
        .map(|(i, &c)| (c, i as u8))
        .collect();
    let palette: Vec<(u8, u8, u8, u8)> = unique.iter().map(|&c| unpack_color(c)).collect();

    // Pass 2: map pixels to indices
    let mut indices = vec![0u8; num_pixels];
    if num_pixels >= PARALLEL_THRESHOLD {
        indices
            .par_chunks_mut(4096)
            .enumerate()
            .for_each(|(chunk_idx, out)| {
                let base = chunk_idx * 4096;
                for (i, idx) in out.iter_mut().enumerate() {
                    let off = (base + i) * 4;
                    let packed = pack_color(&pixels[off..off + 4]);
                    *idx = *color_to_index.get(&packed).unwrap_or(&0);
                }
            });
    } else {
        for (i, px) in pixels.chunks_exact(4).enumerate() {
            indices[i] = *color_to_index.get(&pack_color(px)).unwrap_or(&0);
        }
    }

    Some((palette, indices))
}

/// Write a PNG chunk: length, type, data, CRC.
fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}

/// Prepend a filter-0 byte to each scanline and zlib-compress the result.
fn deflate_scanlines(data: &[u8], bytes_per_row: usize, height: usize) -> DesignResult<Vec<u8>> {
    let mut raw = Vec::with_capacity(height * (1 + bytes_per_row));
    for row in data.chunks_exact(bytes_per_row) {
        raw.push(0); // filter type: none
        raw.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder
        .write_all(&raw)
        .map_err(|e| DesignError::Render(format!("IDAT compression failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| DesignError::Render(format!("IDAT compression failed: {}", e)))
}
