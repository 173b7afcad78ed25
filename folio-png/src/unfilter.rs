//! Scanline reconstruction for the filter method 0 family.
//!
//! Each inflated scanline starts with a one-byte filter type tag followed by
//! the filtered bytes. Reconstruction reverses the per-byte delta encoding,
//! using already reconstructed neighbor bytes. All arithmetic is modulo 256.

use crate::error::{DecodeError, Result};

/// Reconstruct `height` scanlines of `width * bytes_per_pixel` bytes each.
///
/// `data` must hold exactly `height * (1 + width * bytes_per_pixel)` bytes,
/// which the caller has already verified.
pub(crate) fn unfilter(
    data: &[u8],
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
) -> Result<Vec<u8>> {
    let row_len = width * bytes_per_pixel;
    let mut out = vec![0; height * row_len];

    for (i, in_row) in data.chunks_exact(row_len + 1).enumerate() {
        let filter_type = in_row[0];
        let in_data = &in_row[1..];

        let row_start = row_len * i;
        let row_end = row_len * (i + 1);

        let (prev_row, out_row) = if i == 0 {
            (None, &mut out[row_start..row_end])
        } else {
            let prev_row_start = row_len * (i - 1);
            let range = &mut out[prev_row_start..row_end];
            let (prev_row, out_row) = range.split_at_mut(row_len);
            (Some(&*prev_row), out_row)
        };

        match filter_type {
            0 => out_row.copy_from_slice(in_data),
            1 => reconstruct_sub(in_data, out_row, bytes_per_pixel),
            2 => reconstruct_up(prev_row, in_data, out_row),
            3 => reconstruct_average(prev_row, in_data, out_row, bytes_per_pixel),
            4 => reconstruct_paeth(prev_row, in_data, out_row, bytes_per_pixel),
            tag => return Err(DecodeError::UnsupportedFilterType(tag)),
        }
    }

    Ok(out)
}

fn reconstruct_sub(in_data: &[u8], out: &mut [u8], bpp: usize) {
    for i in 0..out.len() {
        let left = if i >= bpp { out[i - bpp] } else { 0 };
        out[i] = in_data[i].wrapping_add(left);
    }
}

fn reconstruct_up(prev_row: Option<&[u8]>, in_data: &[u8], out: &mut [u8]) {
    for i in 0..out.len() {
        let up = prev_row.map(|p| p[i]).unwrap_or(0);
        out[i] = in_data[i].wrapping_add(up);
    }
}

fn reconstruct_average(prev_row: Option<&[u8]>, in_data: &[u8], out: &mut [u8], bpp: usize) {
    for i in 0..out.len() {
        let left = if i >= bpp { out[i - bpp] } else { 0 };
        let up = prev_row.map(|p| p[i]).unwrap_or(0);
        let average = ((left as u16 + up as u16) / 2) as u8;
        out[i] = in_data[i].wrapping_add(average);
    }
}

fn reconstruct_paeth(prev_row: Option<&[u8]>, in_data: &[u8], out: &mut [u8], bpp: usize) {
    for i in 0..out.len() {
        let left = if i >= bpp { out[i - bpp] } else { 0 };
        let up = prev_row.map(|p| p[i]).unwrap_or(0);
        let upper_left = if i >= bpp {
            prev_row.map(|p| p[i - bpp]).unwrap_or(0)
        } else {
            0
        };

        out[i] = in_data[i].wrapping_add(paeth_predict(left, up, upper_left));
    }
}

/// Pick whichever of left/up/upper-left is closest to `left + up - upper_left`,
/// tie-broken left, then up, then upper-left.
fn paeth_predict(left: u8, up: u8, upper_left: u8) -> u8 {
    let p = left as i16 + up as i16 - upper_left as i16;
    let pa = (p - left as i16).abs();
    let pb = (p - up as i16).abs();
    let pc = (p - upper_left as i16).abs();

    if pa <= pb && pa <= pc {
        left
    } else if pb <= pc {
        up
    } else {
        upper_left
    }
}
