//! WASM bindings for the image crate.

use crate::{annotate, read_tags, rotate_tagged, write_tags, InspectionRecord, OverlayStyle};
use crate::{RotationAngle, TaggedImage, DEFAULT_JPEG_QUALITY};
use wasm_bindgen::prelude::*;

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Read the tag block as JSON, or `null` when the image carries none.
#[wasm_bindgen]
pub fn read_tags_json(image: &[u8]) -> Result<String, JsValue> {
    serde_json::to_string(&read_tags(image)).map_err(js_err)
}

/// Embed a JSON inspection record into JPEG bytes.
#[wasm_bindgen]
pub fn write_tags_json(image: &[u8], record_json: &str) -> Result<Vec<u8>, JsValue> {
    let record: InspectionRecord = serde_json::from_str(record_json).map_err(js_err)?;
    Ok(write_tags(image, &record).map_err(js_err)?.into_bytes())
}

/// Rotate a tagged JPEG by a multiple of 90 degrees.
#[wasm_bindgen]
pub fn rotate(image: &[u8], degrees: i32) -> Result<Vec<u8>, JsValue> {
    let tagged = TaggedImage::from_bytes(image.to_vec()).map_err(js_err)?;
    let angle = RotationAngle::new(degrees).map_err(js_err)?;
    Ok(rotate_tagged(&tagged, angle, DEFAULT_JPEG_QUALITY).map_err(js_err)?.into_bytes())
}

/// Burn the default overlay into a tagged JPEG.
#[wasm_bindgen]
pub fn annotate_default(image: &[u8]) -> Result<Vec<u8>, JsValue> {
    let tagged = TaggedImage::from_bytes(image.to_vec()).map_err(js_err)?;
    Ok(annotate(&tagged, &OverlayStyle::default(), DEFAULT_JPEG_QUALITY)
        .map_err(js_err)?
        .into_bytes())
}
