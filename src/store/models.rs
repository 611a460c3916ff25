use serde::{Deserialize, Serialize};

use crate::layout::Section;

/// The persisted unit: one card configuration per form id.
///
/// `form_data` is an opaque snapshot of the form definition the sections
/// were built against; the store never interprets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub form_id: String,
    pub form_data: serde_json::Value,
    pub layout_selections: Vec<Section>,
    pub created_at: String,
    pub updated_at: String,
}

/// Body of `PUT /configurations/{formId}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCardRequest {
    pub form_id: String,
    pub form_data: serde_json::Value,
    pub layout_selections: Vec<Section>,
}

/// Response body of a successful save.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReceipt {
    pub message: String,
    pub card_id: i64,
    pub form_id: String,
}

/// Response body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;

    #[test]
    fn save_request_uses_camel_case_wire_names() {
        let req = SaveCardRequest {
            form_id: "form-1".into(),
            form_data: serde_json::json!({"id": "form-1"}),
            layout_selections: vec![Section::new(Layout::Vertical, vec!["f1".into()])],
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("formId").is_some());
        assert!(json.get("formData").is_some());
        assert_eq!(json["layoutSelections"][0]["layout"], "vertical");
    }

    #[test]
    fn configuration_round_trips() {
        let config = Configuration {
            form_id: "form-1".into(),
            form_data: serde_json::json!({"elements": []}),
            layout_selections: vec![],
            created_at: "2026-01-01 00:00:00".into(),
            updated_at: "2026-01-02 00:00:00".into(),
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: Configuration = serde_json::from_str(&json).unwrap();
        assert_eq!(back.form_id, "form-1");
        assert_eq!(back.updated_at, "2026-01-02 00:00:00");
    }
}
