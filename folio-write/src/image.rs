//! Embedding decoded raster images as image XObjects.
//!
//! The planes produced by `folio-png` carry one padding byte per row, which
//! doubles as the per-row predictor tag once the plane is Flate-compressed.
//! The stream dictionaries therefore declare `/Predictor 15` so a reader
//! reverses the (identity) prediction and strips the tag bytes again.

use crate::{DocumentBuilder, ObjectId};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use folio_png::Image;

/// Register a decoded image with the builder.
///
/// The alpha plane, when present, is added first as a `/DeviceGray` soft-mask
/// object. Returns the identifier of the RGB image XObject; content streams
/// reference it by that identifier through the page resources.
pub fn embed(builder: &mut DocumentBuilder, image: &Image) -> ObjectId {
    let smask = image
        .alpha
        .as_ref()
        .map(|plane| builder.add(xobject(image, "/DeviceGray", 1, None, plane)));

    builder.add(xobject(image, "/DeviceRGB", 3, smask, &image.rgb))
}

fn xobject(
    image: &Image,
    color_space: &str,
    colors: u8,
    smask: Option<ObjectId>,
    plane: &[u8],
) -> Vec<u8> {
    let data = deflate_encode(plane);
    let smask_entry = smask
        .map(|id| format!(" /SMask {} 0 R", id.get()))
        .unwrap_or_default();

    let mut out = format!(
        "<< /Type /XObject /Subtype /Image /Width {width} /Height {height} \
         /ColorSpace {color_space} /BitsPerComponent 8 /Filter /FlateDecode \
         /DecodeParms << /Predictor 15 /Colors {colors} /BitsPerComponent 8 \
         /Columns {width} >>{smask_entry} /Length {length} >>\nstream\n",
        width = image.width,
        height = image.height,
        length = data.len(),
    )
    .into_bytes();
    out.extend_from_slice(&data);
    out.extend_from_slice(b"\nendstream\n");

    out
}

pub(crate) fn deflate_encode(data: &[u8]) -> Vec<u8> {
    use std::io::Write;

    const COMPRESSION_LEVEL: u8 = 6;
    let mut e = ZlibEncoder::new(Vec::new(), Compression::new(COMPRESSION_LEVEL as u32));
    e.write_all(data).unwrap();
    e.finish().unwrap()
}
