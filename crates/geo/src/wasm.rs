//! WASM bindings for the geo crate.
//!
//! These bindings let the browser shell reuse best-fix selection and DMS
//! conversion instead of re-implementing them in JavaScript.

use crate::{format_location, BestFix, DmsTriple, GpsAxis, Hemisphere, LocationFix};
use wasm_bindgen::prelude::*;

/// Convert a decimal coordinate into its stored DMS form.
///
/// # Arguments
/// * `value` - Signed decimal degrees
/// * `is_latitude` - true for latitude, false for longitude
///
/// # Returns
/// JSON string `{"ref": "S", "dms": [[33,1],[27,1],[24840000,1000000]]}`
#[wasm_bindgen]
pub fn to_dms(value: f64, is_latitude: bool) -> String {
    let axis = if is_latitude { GpsAxis::Latitude } else { GpsAxis::Longitude };
    let dms = DmsTriple::from_decimal(value);
    let parts: Vec<[u32; 2]> = dms.as_array().iter().map(|r| [r.num, r.denom]).collect();
    serde_json::json!({
        "ref": Hemisphere::for_value(axis, value).as_str(),
        "dms": parts,
    })
    .to_string()
}

/// Pick the most accurate fix from a JSON array of fixes.
///
/// # Returns
/// JSON string of the best fix, or `null` for an empty array
#[wasm_bindgen]
pub fn select_best_fix(fixes_json: &str) -> Result<String, JsValue> {
    let fixes: Vec<LocationFix> = serde_json::from_str(fixes_json)
        .map_err(|e| JsValue::from_str(&format!("JSON parse error: {}", e)))?;

    let best: BestFix = fixes.into_iter().collect();

    serde_json::to_string(&best.get())
        .map_err(|e| JsValue::from_str(&format!("JSON serialize error: {}", e)))
}

/// Label shown in the GPS field and burned into the overlay.
#[wasm_bindgen]
pub fn location_label(latitude: f64, longitude: f64, accuracy: Option<f64>) -> String {
    format_location(latitude, longitude, accuracy)
}
