/*!
A decoder for the restricted PNG subset used for embedded logo artwork.

`folio-png` decodes 8-bit truecolor PNG images, with or without an alpha
channel, into plane buffers laid out for direct re-compression into document
streams. Interlacing, palettes, and bit depths other than 8 are rejected
rather than decoded on a best-effort basis.

# Example
```rust,no_run
let data = std::fs::read("logo.png").unwrap();
let image = folio_png::decode(&data).unwrap();

println!("{}x{} image", image.width, image.height);
```
*/

#![forbid(unsafe_code)]

mod error;
mod reader;
mod unfilter;

pub use error::{DecodeError, Result};

use log::warn;
use reader::Reader;
use unfilter::unfilter;

/// A decoded image, separated into planes.
///
/// Every row of a plane starts with a single zero byte in front of the pixel
/// bytes, so that a compressed plane can be embedded with a per-row predictor
/// tag without reshuffling. A plane therefore holds
/// `height * (1 + width * components)` bytes, with 3 components for the color
/// plane and 1 for the alpha plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// The width of the image in pixels.
    pub width: u32,
    /// The height of the image in pixels.
    pub height: u32,
    /// The color plane, 3 bytes per pixel, row-major order.
    pub rgb: Vec<u8>,
    /// The alpha plane, 1 byte per pixel, row-major order. `None` for images
    /// without an alpha channel.
    pub alpha: Option<Vec<u8>>,
}

/// "The first eight bytes of a PNG datastream always contain the following
/// (decimal) values: 137 80 78 71 13 10 26 10." (PNG spec, 5.2)
const SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Parsed header chunk, reduced to the supported subset.
struct Header {
    width: u32,
    height: u32,
    /// 3 for truecolor, 4 for truecolor with alpha.
    bytes_per_pixel: usize,
}

/// Decode a PNG image from the given data.
///
/// Walks the chunk sequence until the end marker (or input exhaustion),
/// inflates the accumulated image data, reverses the per-scanline filters and
/// separates the result into a color plane and an optional alpha plane.
pub fn decode(data: &[u8]) -> Result<Image> {
    let mut reader = Reader::new(data);

    let signature = reader.read_bytes(8).ok_or(DecodeError::BadSignature)?;
    if signature != SIGNATURE {
        return Err(DecodeError::BadSignature);
    }

    let mut header: Option<Header> = None;
    let mut compressed = Vec::new();

    while !reader.at_end() {
        let length = reader.read_u32().ok_or(DecodeError::UnexpectedEof)?;
        let chunk_type = reader.read_tag().ok_or(DecodeError::UnexpectedEof)?;

        if &chunk_type == b"IEND" {
            break;
        }

        let payload = reader
            .read_bytes(length as usize)
            .ok_or(DecodeError::UnexpectedEof)?;
        // The CRC is skipped, not validated.
        reader.skip_bytes(4).ok_or(DecodeError::UnexpectedEof)?;

        match &chunk_type {
            b"IHDR" => header = Some(parse_header(payload)?),
            b"IDAT" => {
                if header.is_none() {
                    return Err(DecodeError::IncompleteHeader);
                }

                // Data chunks may be split; the fragments concatenate before
                // inflation.
                compressed.extend_from_slice(payload);
            }
            other => {
                // Bit 5 of the first type byte distinguishes ancillary chunks,
                // which are safe to skip.
                if other[0] & 0x20 == 0 {
                    warn!(
                        "ignoring unsupported critical chunk: {}",
                        String::from_utf8_lossy(other)
                    );
                }
            }
        }
    }

    let header = header.ok_or(DecodeError::IncompleteHeader)?;

    let inflated = miniz_oxide::inflate::decompress_to_vec_zlib(&compressed)
        .map_err(|err| DecodeError::Inflate(err.status))?;

    let width = header.width as usize;
    let height = header.height as usize;
    let bytes_per_pixel = header.bytes_per_pixel;

    // One filter type tag per scanline.
    if inflated.len() != height * (1 + width * bytes_per_pixel) {
        return Err(DecodeError::LengthMismatch);
    }

    let pixels = unfilter(&inflated, width, height, bytes_per_pixel)?;
    let (rgb, alpha) = split_planes(&pixels, width, height, bytes_per_pixel);

    Ok(Image {
        width: header.width,
        height: header.height,
        rgb,
        alpha,
    })
}

fn parse_header(data: &[u8]) -> Result<Header> {
    let mut r = Reader::new(data);

    let width = r.read_u32().ok_or(DecodeError::IncompleteHeader)?;
    let height = r.read_u32().ok_or(DecodeError::IncompleteHeader)?;
    let bit_depth = r.read_byte().ok_or(DecodeError::IncompleteHeader)?;
    let color_type = r.read_byte().ok_or(DecodeError::IncompleteHeader)?;
    let compression = r.read_byte().ok_or(DecodeError::IncompleteHeader)?;
    let filter = r.read_byte().ok_or(DecodeError::IncompleteHeader)?;
    let interlace = r.read_byte().ok_or(DecodeError::IncompleteHeader)?;

    if compression != 0 || filter != 0 {
        return Err(DecodeError::UnsupportedCompression);
    }

    if interlace != 0 {
        return Err(DecodeError::UnsupportedInterlace);
    }

    if bit_depth != 8 {
        return Err(DecodeError::UnsupportedBitDepth(bit_depth));
    }

    // Color type 2 is truecolor, 6 is truecolor with alpha.
    let bytes_per_pixel = match color_type {
        2 => 3,
        6 => 4,
        other => return Err(DecodeError::UnsupportedColorMode(other)),
    };

    Ok(Header {
        width,
        height,
        bytes_per_pixel,
    })
}

/// Re-emit the interleaved pixel buffer as independent planes, each row
/// prefixed with a zero padding byte.
fn split_planes(
    pixels: &[u8],
    width: usize,
    height: usize,
    bytes_per_pixel: usize,
) -> (Vec<u8>, Option<Vec<u8>>) {
    let mut rgb = Vec::with_capacity(height * (1 + width * 3));
    let mut alpha = (bytes_per_pixel == 4).then(|| Vec::with_capacity(height * (1 + width)));

    for row in pixels.chunks_exact(width * bytes_per_pixel) {
        rgb.push(0);
        if let Some(alpha) = alpha.as_mut() {
            alpha.push(0);
        }

        for pixel in row.chunks_exact(bytes_per_pixel) {
            rgb.extend_from_slice(&pixel[..3]);
            if let Some(alpha) = alpha.as_mut() {
                alpha.push(pixel[3]);
            }
        }
    }

    (rgb, alpha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use miniz_oxide::deflate::compress_to_vec_zlib;

    fn chunk(chunk_type: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        out.extend_from_slice(chunk_type);
        out.extend_from_slice(payload);
        // The CRC is never validated.
        out.extend_from_slice(&[0; 4]);

        out
    }

    fn ihdr(width: u32, height: u32, bit_depth: u8, color_type: u8, interlace: u8) -> Vec<u8> {
        let mut payload = Vec::new();
        payload.extend_from_slice(&width.to_be_bytes());
        payload.extend_from_slice(&height.to_be_bytes());
        payload.extend_from_slice(&[bit_depth, color_type, 0, 0, interlace]);

        chunk(b"IHDR", &payload)
    }

    /// Assemble a PNG from already-filtered scanlines (tag byte included).
    fn png(width: u32, height: u32, color_type: u8, scanlines: &[u8]) -> Vec<u8> {
        let mut out = SIGNATURE.to_vec();
        out.extend_from_slice(&ihdr(width, height, 8, color_type, 0));
        out.extend_from_slice(&chunk(b"IDAT", &compress_to_vec_zlib(scanlines, 6)));
        out.extend_from_slice(&chunk(b"IEND", &[]));

        out
    }

    #[test]
    fn decode_truecolor() {
        // 2x2 RGB, all rows unfiltered.
        let scanlines = [
            0, 1, 2, 3, 4, 5, 6, //
            0, 7, 8, 9, 10, 11, 12,
        ];
        let image = decode(&png(2, 2, 2, &scanlines)).unwrap();

        assert_eq!(image.width, 2);
        assert_eq!(image.height, 2);
        assert_eq!(image.rgb, scanlines);
        assert_eq!(image.alpha, None);
    }

    #[test]
    fn decode_truecolor_alpha_separates_planes() {
        // 2x2 RGBA pixels: (1,2,3,40) (4,5,6,50) / (7,8,9,60) (10,11,12,70).
        let scanlines = [
            0, 1, 2, 3, 40, 4, 5, 6, 50, //
            0, 7, 8, 9, 60, 10, 11, 12, 70,
        ];
        let image = decode(&png(2, 2, 6, &scanlines)).unwrap();

        assert_eq!(image.rgb, vec![0, 1, 2, 3, 4, 5, 6, 0, 7, 8, 9, 10, 11, 12]);
        assert_eq!(image.alpha, Some(vec![0, 40, 50, 0, 60, 70]));
    }

    #[test]
    fn decode_filtered_scanlines() {
        // 1x2 RGB with a sub-filtered first row and an up-filtered second row.
        let scanlines = [
            1, 10, 20, 30, //
            2, 5, 5, 5,
        ];
        let image = decode(&png(1, 2, 2, &scanlines)).unwrap();

        assert_eq!(image.rgb, vec![0, 10, 20, 30, 0, 15, 25, 35]);
    }

    #[test]
    fn data_chunks_concatenate() {
        let scanlines = [0u8, 1, 2, 3, 4, 5, 6];
        let compressed = compress_to_vec_zlib(&scanlines, 6);
        let (first, second) = compressed.split_at(3);

        let mut data = SIGNATURE.to_vec();
        data.extend_from_slice(&ihdr(2, 1, 8, 2, 0));
        data.extend_from_slice(&chunk(b"IDAT", first));
        data.extend_from_slice(&chunk(b"IDAT", second));
        data.extend_from_slice(&chunk(b"IEND", &[]));

        let image = decode(&data).unwrap();
        assert_eq!(image.rgb, scanlines);
    }

    #[test]
    fn ancillary_chunks_are_skipped() {
        let scanlines = [0u8, 1, 2, 3];
        let mut data = SIGNATURE.to_vec();
        data.extend_from_slice(&ihdr(1, 1, 8, 2, 0));
        data.extend_from_slice(&chunk(b"tEXt", b"Comment\0hello"));
        data.extend_from_slice(&chunk(b"IDAT", &compress_to_vec_zlib(&scanlines, 6)));
        data.extend_from_slice(&chunk(b"IEND", &[]));

        let image = decode(&data).unwrap();
        assert_eq!(image.rgb, scanlines);
    }

    #[test]
    fn rejects_bad_signature() {
        let mut data = png(1, 1, 2, &[0, 1, 2, 3]);
        data[0] = 0x88;

        assert_eq!(decode(&data), Err(DecodeError::BadSignature));
        assert_eq!(decode(&data[..4]), Err(DecodeError::BadSignature));
    }

    #[test]
    fn rejects_unsupported_header_fields() {
        let base = |ihdr_chunk: Vec<u8>| {
            let mut data = SIGNATURE.to_vec();
            data.extend_from_slice(&ihdr_chunk);
            data.extend_from_slice(&chunk(b"IEND", &[]));
            data
        };

        assert_eq!(
            decode(&base(ihdr(1, 1, 4, 2, 0))),
            Err(DecodeError::UnsupportedBitDepth(4))
        );
        assert_eq!(
            decode(&base(ihdr(1, 1, 8, 2, 1))),
            Err(DecodeError::UnsupportedInterlace)
        );
        assert_eq!(
            decode(&base(ihdr(1, 1, 8, 3, 0))),
            Err(DecodeError::UnsupportedColorMode(3))
        );

        // Nonzero compression method byte.
        let mut payload = Vec::new();
        payload.extend_from_slice(&1u32.to_be_bytes());
        payload.extend_from_slice(&1u32.to_be_bytes());
        payload.extend_from_slice(&[8, 2, 1, 0, 0]);
        assert_eq!(
            decode(&base(chunk(b"IHDR", &payload))),
            Err(DecodeError::UnsupportedCompression)
        );
    }

    #[test]
    fn rejects_unsupported_filter_type() {
        let scanlines = [5u8, 1, 2, 3];

        assert_eq!(
            decode(&png(1, 1, 2, &scanlines)),
            Err(DecodeError::UnsupportedFilterType(5))
        );
    }

    #[test]
    fn rejects_data_before_header() {
        let mut data = SIGNATURE.to_vec();
        data.extend_from_slice(&chunk(b"IDAT", &[0; 4]));

        assert_eq!(decode(&data), Err(DecodeError::IncompleteHeader));
    }

    #[test]
    fn rejects_missing_header() {
        assert_eq!(decode(&SIGNATURE), Err(DecodeError::IncompleteHeader));
    }

    #[test]
    fn rejects_wrong_data_length() {
        // Header claims 2x2 but the scanlines hold a single 1x1 row.
        let scanlines = [0u8, 1, 2, 3];
        let mut data = SIGNATURE.to_vec();
        data.extend_from_slice(&ihdr(2, 2, 8, 2, 0));
        data.extend_from_slice(&chunk(b"IDAT", &compress_to_vec_zlib(&scanlines, 6)));
        data.extend_from_slice(&chunk(b"IEND", &[]));

        assert_eq!(decode(&data), Err(DecodeError::LengthMismatch));
    }

    #[test]
    fn rejects_truncated_chunk() {
        let mut data = SIGNATURE.to_vec();
        data.extend_from_slice(&ihdr(1, 1, 8, 2, 0));
        // A chunk that claims more payload than remains.
        data.extend_from_slice(&64u32.to_be_bytes());
        data.extend_from_slice(b"IDAT");
        data.extend_from_slice(&[0; 8]);

        assert_eq!(decode(&data), Err(DecodeError::UnexpectedEof));
    }

    #[test]
    fn rejects_corrupt_compressed_data() {
        let mut data = SIGNATURE.to_vec();
        data.extend_from_slice(&ihdr(1, 1, 8, 2, 0));
        data.extend_from_slice(&chunk(b"IDAT", &[0xFF, 0xFF, 0xFF, 0xFF]));
        data.extend_from_slice(&chunk(b"IEND", &[]));

        assert!(matches!(decode(&data), Err(DecodeError::Inflate(_))));
    }
}
