//! Input validation for scan requests
//!
//! Coarse sanity gates only: pixel data is never decoded.

use serde_json::Value;

use crate::models::CropType;

pub const IMAGE_DATA_PREFIX: &str = "data:image/";
pub const MIN_IMAGE_DATA_LEN: usize = 100;
pub const MAX_IMAGE_DATA_LEN: usize = 10_000_000;

/// Returns the payload when it is present and non-empty.
///
/// `null`, `false`, `0` and `""` all count as missing.
pub fn image_payload(data: Option<&Value>) -> Option<&Value> {
    match data? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other),
    }
}

/// Validate an image data-URI by type, length and prefix.
///
/// Length is counted in UTF-16 code units, the unit browsers report for
/// `string.length`.
pub fn validate_image_data(data: &Value) -> bool {
    let Some(s) = data.as_str() else {
        return false;
    };

    // Code units never exceed bytes
    if s.len() < MIN_IMAGE_DATA_LEN || !s.starts_with(IMAGE_DATA_PREFIX) {
        return false;
    }

    (MIN_IMAGE_DATA_LEN..=MAX_IMAGE_DATA_LEN).contains(&s.encode_utf16().count())
}

/// Map a raw crop tag onto the crop enum. Unknown values become `Other`.
pub fn sanitize_crop_type(raw: &str) -> CropType {
    raw.trim().parse().unwrap_or_default()
}

/// Same as `sanitize_crop_type` for an untyped JSON value
pub fn sanitize_crop_value(raw: Option<&Value>) -> CropType {
    raw.and_then(Value::as_str)
        .map(sanitize_crop_type)
        .unwrap_or_default()
}

/// First `limit` characters of the payload, kept for audit
pub fn image_audit_prefix(data: &str, limit: usize) -> String {
    match data.char_indices().nth(limit) {
        Some((idx, _)) => data[..idx].to_string(),
        None => data.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data_uri(len: usize) -> String {
        let mut s = String::from("data:image/png;base64,");
        while s.len() < len {
            s.push('A');
        }
        s
    }

    #[test]
    fn test_accepts_well_formed_payload() {
        assert!(validate_image_data(&json!(data_uri(100))));
        assert!(validate_image_data(&json!(data_uri(5_000))));
    }

    #[test]
    fn test_rejects_short_payload() {
        assert!(!validate_image_data(&json!(data_uri(99))));
    }

    #[test]
    fn test_length_bounds() {
        assert!(validate_image_data(&json!(data_uri(MAX_IMAGE_DATA_LEN))));
        assert!(!validate_image_data(&json!(data_uri(MAX_IMAGE_DATA_LEN + 1))));
    }

    #[test]
    fn test_length_counts_code_units_not_bytes() {
        // 71 code units, 131 bytes
        let short = format!("{}{}", IMAGE_DATA_PREFIX, "é".repeat(60));
        assert!(!validate_image_data(&json!(short)));

        // 100 code units, 150 bytes
        let exact = format!("{}{}", IMAGE_DATA_PREFIX, "é".repeat(89));
        assert!(validate_image_data(&json!(exact)));
    }

    #[test]
    fn test_rejects_missing_prefix() {
        let payload = "A".repeat(500);
        assert!(!validate_image_data(&json!(payload)));

        let wrong = format!("data:text/plain;base64,{}", "A".repeat(500));
        assert!(!validate_image_data(&json!(wrong)));
    }

    #[test]
    fn test_rejects_non_string() {
        assert!(!validate_image_data(&json!(12345)));
        assert!(!validate_image_data(&json!({ "data": data_uri(200) })));
        assert!(!validate_image_data(&json!([data_uri(200)])));
    }

    #[test]
    fn test_image_payload_missing_values() {
        assert!(image_payload(None).is_none());
        assert!(image_payload(Some(&json!(null))).is_none());
        assert!(image_payload(Some(&json!(""))).is_none());
        assert!(image_payload(Some(&json!(false))).is_none());
        assert!(image_payload(Some(&json!(0))).is_none());
        assert!(image_payload(Some(&json!(7))).is_some());
        assert!(image_payload(Some(&json!("x"))).is_some());
    }

    #[test]
    fn test_sanitize_known_crops() {
        for crop in CropType::ALL {
            assert_eq!(sanitize_crop_type(crop.as_str()), crop);
            assert_eq!(sanitize_crop_type(&format!("  {}\t", crop.as_str())), crop);
        }
    }

    #[test]
    fn test_sanitize_unknown_is_other() {
        assert_eq!(sanitize_crop_type("Banana"), CropType::Other);
        assert_eq!(sanitize_crop_type(""), CropType::Other);
        assert_eq!(sanitize_crop_type("   "), CropType::Other);
        assert_eq!(sanitize_crop_type("tomato"), CropType::Other);
        assert_eq!(sanitize_crop_value(Some(&json!(3))), CropType::Other);
        assert_eq!(sanitize_crop_value(None), CropType::Other);
        assert_eq!(sanitize_crop_value(Some(&json!(" Corn "))), CropType::Corn);
    }

    #[test]
    fn test_audit_prefix_truncates() {
        let payload = data_uri(5_000);
        let prefix = image_audit_prefix(&payload, 1_000);
        assert_eq!(prefix.len(), 1_000);
        assert!(payload.starts_with(&prefix));

        assert_eq!(image_audit_prefix("data:image/", 1_000), "data:image/");
        assert_eq!(image_audit_prefix("ééé", 2), "éé");
    }
}
