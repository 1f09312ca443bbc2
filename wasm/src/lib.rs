//! WebAssembly module for FishSpot
//!
//! Provides client-side computation for:
//! - Fish activity index previews on the map
//! - Fishability blend of a cached static score with a fresh activity index
//! - Activity labels and colors
//! - Moon phase for the date picker

use chrono::DateTime;
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::scoring::*;
pub use shared::types::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Calculate the fish activity index from a JSON `ActivityInput`.
///
/// Returns the `FishActivityResult` serialized as JSON.
#[wasm_bindgen]
pub fn calculate_fish_activity_json(input_json: &str) -> Result<String, JsValue> {
    activity_json(input_json).map_err(|message| JsValue::from_str(&message))
}

fn activity_json(input_json: &str) -> Result<String, String> {
    let input: ActivityInput = serde_json::from_str(input_json)
        .map_err(|e| format!("Invalid activity input JSON: {}", e))?;
    let result = calculate_fish_activity(&input).map_err(|e| e.to_string())?;
    serde_json::to_string(&result).map_err(|e| e.to_string())
}

/// Blend a static and a dynamic score into the displayed fishability score
#[wasm_bindgen]
pub fn fishability_score(static_score: f64, dynamic_score: f64) -> u8 {
    compute_fishability_score(static_score, dynamic_score)
}

/// Human-readable label for an activity score
#[wasm_bindgen]
pub fn activity_label(score: u8) -> String {
    ActivityLevel::from_score(score).label().to_string()
}

/// Hex color for an activity score
#[wasm_bindgen]
pub fn activity_color(score: u8) -> String {
    ActivityLevel::from_score(score).color().to_string()
}

/// Moon phase (snake_case name) at a JavaScript timestamp in milliseconds
#[wasm_bindgen]
pub fn moon_phase_at(epoch_ms: f64) -> Result<String, JsValue> {
    let at = DateTime::from_timestamp((epoch_ms / 1000.0).floor() as i64, 0)
        .ok_or_else(|| JsValue::from_str("Timestamp out of range"))?;
    Ok(MoonPhase::from_datetime(at).as_str().to_string())
}

/// Moon phase right now, according to the browser clock
#[wasm_bindgen]
pub fn current_moon_phase() -> Result<String, JsValue> {
    moon_phase_at(js_sys::Date::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fishability_score() {
        assert_eq!(fishability_score(50.0, 50.0), 50);
        assert_eq!(fishability_score(100.0, 0.0), 45);
        assert_eq!(fishability_score(0.0, 100.0), 55);
    }

    #[test]
    fn test_activity_label() {
        assert_eq!(activity_label(92), "Excellent");
        assert_eq!(activity_label(65), "Good");
        assert_eq!(activity_label(45), "Average");
        assert_eq!(activity_label(25), "Poor");
        assert_eq!(activity_label(5), "Bad");
    }

    #[test]
    fn test_activity_color_matches_level() {
        assert_eq!(activity_color(92), ActivityLevel::Excellent.color());
        assert_eq!(activity_color(5), ActivityLevel::Bad.color());
    }

    #[test]
    fn test_moon_phase_at_reference_new_moon() {
        // 2000-01-06 18:14 UTC
        assert_eq!(moon_phase_at(947_182_440_000.0).unwrap(), "new");
    }

    #[test]
    fn test_calculate_fish_activity_json() {
        let input = r#"{
            "pressure_hpa": 1008.0,
            "pressure_trend": "falling",
            "temperature_celsius": 17.0,
            "water_temperature_celsius": 16.0,
            "wind_speed_kmh": 10.0,
            "cloud_cover_percent": 70.0,
            "moon_phase": "full",
            "hour_of_day": 7,
            "month": 5
        }"#;
        let output = activity_json(input).unwrap();
        let result: FishActivityResult = serde_json::from_str(&output).unwrap();
        assert_eq!(result.score, 100);
        assert_eq!(result.label, "Excellent");
    }

    #[test]
    fn test_activity_json_rejects_out_of_range_hour() {
        let input = r#"{
            "pressure_hpa": 1008.0,
            "pressure_trend": "stable",
            "temperature_celsius": 17.0,
            "wind_speed_kmh": 10.0,
            "cloud_cover_percent": 70.0,
            "moon_phase": "full",
            "hour_of_day": 24,
            "month": 5
        }"#;
        let err = activity_json(input).unwrap_err();
        assert!(err.contains("hour"));
    }

    #[test]
    fn test_activity_json_rejects_malformed_input() {
        let err = activity_json("{").unwrap_err();
        assert!(err.starts_with("Invalid activity input JSON"));
    }
}
