use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::domain::AttributeEvidence;
use crate::error::AppError;
use crate::keys::EvidenceKey;
use crate::store::EvidenceStore;
use crate::validate::piece_is_complete;

/// One exported record: rendered key, structured key parts, payload, and
/// advisory completeness flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportedEntry {
    pub key: String,
    pub key_parts: EvidenceKey,
    pub piece_count: usize,
    /// Indexes of pieces missing required fields.
    pub incomplete_pieces: Vec<usize>,
    pub value: AttributeEvidence,
}

/// Deterministic snapshot of the whole store. Equal store contents always
/// produce byte-identical exports, digest included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportedStore {
    pub exported_entries: usize,
    pub content_sha256: String,
    pub entries: Vec<ExportedEntry>,
}

/// Rebuilds a JSON value with object keys sorted at every level.
fn canonicalize_json_value(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(canonicalize_json_value).collect()),
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut out = serde_json::Map::new();
            for (k, v) in entries {
                out.insert(k.clone(), canonicalize_json_value(v));
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

/// Compact JSON text with sorted object keys, the digest input format.
pub fn canonical_json_string(value: &Value) -> String {
    canonicalize_json_value(value).to_string()
}

pub fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Snapshots the store in rendered-key order and stamps a content digest
/// over the canonical JSON of the entry list.
pub fn export_store(store: &EvidenceStore) -> Result<ExportedStore, AppError> {
    let mut entries = Vec::new();
    for entry in store.snapshot() {
        let incomplete_pieces: Vec<usize> = entry
            .value
            .evidence_pieces
            .iter()
            .enumerate()
            .filter(|(_, piece)| !piece_is_complete(piece))
            .map(|(index, _)| index)
            .collect();
        entries.push(ExportedEntry {
            key: entry.key.render(),
            key_parts: entry.key,
            piece_count: entry.value.evidence_pieces.len(),
            incomplete_pieces,
            value: entry.value,
        });
    }

    let entries_value = serde_json::to_value(&entries).map_err(|e| {
        AppError::new("EXPORT_SERIALIZE_FAILED", "Failed to serialize store entries")
            .with_details(e.to_string())
    })?;
    let content_sha256 = sha256_hex(&canonical_json_string(&entries_value));

    Ok(ExportedStore {
        exported_entries: entries.len(),
        content_sha256,
        entries,
    })
}
