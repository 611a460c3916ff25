//! Form schema boundary.
//!
//! The form-schema host hands back a loosely shaped payload; everything that
//! crosses into the core goes through [`validate`] first, which rejects
//! malformed payloads and filters out elements without a label. The core
//! only ever sees the strict [`FormSchema`]/[`Field`] value types.

mod client;

pub use client::SchemaClient;

use serde::{Deserialize, Serialize};

use crate::errors::SchemaError;

/// A selectable form field: identifier plus display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    pub label: String,
}

/// A validated form definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub fields: Vec<Field>,
}

impl FormSchema {
    pub fn field_ids(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.id.clone()).collect()
    }

    pub fn label_of(&self, id: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.label.as_str())
    }
}

// ── Raw host payload ──────────────────────────────────────────────────

/// Top-level payload from `GET {host}/api/form/load?slug=…`.
#[derive(Debug, Deserialize)]
pub struct RawFormPayload {
    pub slug: Option<String>,
    pub schema: Option<Vec<RawSchemaEntry>>,
}

#[derive(Debug, Deserialize)]
pub struct RawSchemaEntry {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub elements: Vec<RawElement>,
}

#[derive(Debug, Deserialize)]
pub struct RawElement {
    pub id: Option<String>,
    #[serde(rename = "_id")]
    pub doc_id: Option<String>,
    pub properties: Option<RawProperties>,
}

#[derive(Debug, Deserialize)]
pub struct RawProperties {
    pub label: Option<String>,
}

/// Validate the host payload into a strict [`FormSchema`].
///
/// The first schema entry is authoritative. Elements without a non-empty
/// `properties.label` are dropped; element ids fall back from `id` to `_id`
/// to a positional `element_{index}` name.
pub fn validate(payload: RawFormPayload) -> Result<FormSchema, SchemaError> {
    let slug = payload.slug.unwrap_or_else(|| "unknown".to_string());

    let entry = payload
        .schema
        .and_then(|mut entries| {
            if entries.is_empty() {
                None
            } else {
                Some(entries.remove(0))
            }
        })
        .ok_or(SchemaError::MissingElements)?;

    if entry.elements.is_empty() {
        return Err(SchemaError::MissingElements);
    }

    let mut fields = Vec::new();
    for (index, element) in entry.elements.into_iter().enumerate() {
        let label = element
            .properties
            .and_then(|p| p.label)
            .filter(|l| !l.is_empty());
        let Some(label) = label else { continue };
        let id = element
            .id
            .or(element.doc_id)
            .unwrap_or_else(|| format!("element_{}", index));
        fields.push(Field { id, label });
    }

    if fields.is_empty() {
        return Err(SchemaError::NoLabeledElements);
    }

    Ok(FormSchema {
        id: entry.id.unwrap_or_else(|| "schema-1".to_string()),
        name: entry.name.unwrap_or_else(|| slug.clone()),
        slug,
        fields,
    })
}
