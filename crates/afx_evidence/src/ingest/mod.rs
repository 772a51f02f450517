use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    AttributeEvidence, EvidencePiece, EvidenceType, NamedAttributeEvidence, QualityRating,
    SourceType, SubjectEvidenceBundle, ThemeDataset, ValidationWarning, RESERVED_BUNDLE_KEYS,
};
use crate::error::AppError;
use crate::normalize::normalize_timestamp;
use crate::store::{EvidenceStore, InitializeSummary};

/// Shape probe for a dataset document; does not build bundles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatasetPreview {
    pub detected_shape: String,
    pub subject_count: usize,
    pub warnings: Vec<ValidationWarning>,
}

/// Two accepted document shapes:
/// - wrapped: `{ "theme_evidence": { "<subject>": { ...bundle... } } }`, the
///   collector export envelope (sibling keys are ignored);
/// - bare: `{ "<subject>": { ...bundle... } }`, the subject map directly.
fn detect_shape(root: &Value) -> (&'static str, Option<&serde_json::Map<String, Value>>) {
    let Some(obj) = root.as_object() else {
        return ("non_object", None);
    };
    match obj.get("theme_evidence") {
        Some(Value::Object(map)) => ("wrapped_theme_evidence", Some(map)),
        Some(_) => ("wrapped_invalid", None),
        None => ("subject_map", Some(obj)),
    }
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Probes a dataset document and reports its shape and subject count.
pub fn preview_theme_dataset_text(text: &str) -> Result<DatasetPreview, AppError> {
    let root: Value = serde_json::from_str(text).map_err(|e| {
        AppError::new("INGEST_PARSE_FAILED", "Failed to parse dataset JSON")
            .with_details(e.to_string())
    })?;

    let mut warnings = Vec::new();
    let (detected_shape, subjects) = detect_shape(&root);
    if subjects.is_none() {
        warnings.push(
            ValidationWarning::new(
                "INGEST_DATASET_SHAPE_UNKNOWN",
                "Dataset is not a subject map; nothing to load",
            )
            .with_details(format!("root={}", json_type_name(&root))),
        );
    }

    Ok(DatasetPreview {
        detected_shape: detected_shape.to_string(),
        subject_count: subjects.map(|m| m.len()).unwrap_or(0),
        warnings,
    })
}

fn parse_piece(obj: &serde_json::Map<String, Value>) -> EvidencePiece {
    let mut piece = EvidencePiece::default();
    let mut extra = BTreeMap::new();
    for (k, v) in obj {
        // Mistyped known fields degrade to absent; completeness checks flag
        // them downstream instead of failing the whole piece.
        match k.as_str() {
            "text_content" => piece.text_content = v.as_str().map(|s| s.to_string()),
            "source_url" => piece.source_url = v.as_str().map(|s| s.to_string()),
            "source_title" => piece.source_title = v.as_str().map(|s| s.to_string()),
            "evidence_type" => piece.evidence_type = v.as_str().map(EvidenceType::parse),
            "source_type" => piece.source_type = v.as_str().map(SourceType::parse),
            "relevance_score" => piece.relevance_score = v.as_f64(),
            "authority_score" => piece.authority_score = v.as_f64(),
            "quality_rating" => piece.quality_rating = v.as_str().map(QualityRating::parse),
            _ => {
                extra.insert(k.clone(), v.clone());
            }
        }
    }
    piece.extra = extra;
    piece
}

fn parse_attribute_evidence(
    obj: &serde_json::Map<String, Value>,
    name_hint: Option<&str>,
    context: &str,
    warnings: &mut Vec<ValidationWarning>,
) -> AttributeEvidence {
    let mut value = AttributeEvidence::default();
    let mut extra = BTreeMap::new();
    for (k, v) in obj {
        match k.as_str() {
            "attribute_name" => value.attribute_name = v.as_str().map(|s| s.to_string()),
            "evidence_pieces" => match v {
                Value::Array(items) => {
                    for (idx, item) in items.iter().enumerate() {
                        match item.as_object() {
                            Some(p) => value.evidence_pieces.push(parse_piece(p)),
                            None => warnings.push(
                                ValidationWarning::new(
                                    "INGEST_PIECE_NOT_OBJECT",
                                    "Skipped non-object evidence piece",
                                )
                                .with_details(format!("{context}; index={idx}")),
                            ),
                        }
                    }
                }
                _ => warnings.push(
                    ValidationWarning::new(
                        "INGEST_PIECES_NOT_ARRAY",
                        "evidence_pieces is not an array; treated as empty",
                    )
                    .with_details(context.to_string()),
                ),
            },
            "search_hits" => value.search_hits = v.as_i64(),
            "uniqueness_ratio" => value.uniqueness_ratio = v.as_f64(),
            _ => {
                extra.insert(k.clone(), v.clone());
            }
        }
    }
    // An explicit attribute_name on the object wins over the map key.
    if value.attribute_name.is_none() {
        value.attribute_name = name_hint.map(|s| s.to_string());
    }
    value.extra = extra;
    value
}

fn parse_bundle(
    subject: &str,
    value: &Value,
    warnings: &mut Vec<ValidationWarning>,
) -> Option<SubjectEvidenceBundle> {
    let obj = match value.as_object() {
        Some(o) => o,
        None => {
            warnings.push(
                ValidationWarning::new(
                    "INGEST_BUNDLE_NOT_OBJECT",
                    "Skipped subject whose bundle is not an object",
                )
                .with_details(format!("subject={subject}; got={}", json_type_name(value))),
            );
            return None;
        }
    };

    let mut bundle = SubjectEvidenceBundle {
        subject: subject.to_string(),
        ..Default::default()
    };

    bundle.metadata.destination = obj
        .get("destination")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());
    bundle.metadata.theme_name = obj
        .get("theme_name")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());
    bundle.metadata.evidence_summary = obj
        .get("evidence_summary")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());
    bundle.metadata.total_sources_analyzed = obj.get("total_sources_analyzed").and_then(|v| v.as_i64());
    if let Some(urls) = obj.get("source_urls").and_then(|v| v.as_array()) {
        bundle.metadata.source_urls = urls
            .iter()
            .filter_map(|u| u.as_str().map(|s| s.to_string()))
            .collect();
    }

    match obj.get("collection_timestamp") {
        None | Some(Value::Null) => {}
        Some(ts) => {
            let raw = match ts {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                other => {
                    warnings.push(
                        ValidationWarning::new(
                            "INGEST_TS_UNPARSEABLE",
                            "collection_timestamp is not a string or number; dropped",
                        )
                        .with_details(format!("subject={subject}; got={}", json_type_name(other))),
                    );
                    None
                }
            };
            if let Some(raw) = raw {
                let normalized = normalize_timestamp("collection_timestamp", &raw, warnings);
                bundle.metadata.collection_ts = normalized.canonical_rfc3339_utc;
                bundle.metadata.collection_ts_raw = normalized.raw;
            }
        }
    }

    match obj.get("main_theme") {
        None | Some(Value::Null) => {}
        Some(Value::Object(main)) => {
            bundle.main = Some(parse_attribute_evidence(
                main,
                None,
                &format!("subject={subject}; main_theme"),
                warnings,
            ));
        }
        Some(other) => warnings.push(
            ValidationWarning::new(
                "INGEST_MAIN_NOT_OBJECT",
                "Skipped main evidence that is not an object",
            )
            .with_details(format!("subject={subject}; got={}", json_type_name(other))),
        ),
    }

    for (key, v) in obj {
        if RESERVED_BUNDLE_KEYS.contains(&key.as_str()) {
            continue;
        }
        match v.as_object() {
            Some(attr) => bundle.attributes.push(NamedAttributeEvidence {
                name: key.clone(),
                evidence: parse_attribute_evidence(
                    attr,
                    Some(key),
                    &format!("subject={subject}; attribute={key}"),
                    warnings,
                ),
            }),
            None => {
                warnings.push(
                    ValidationWarning::new(
                        "INGEST_ATTRIBUTE_NOT_OBJECT",
                        "Attribute value is not an object; stored with no pieces",
                    )
                    .with_details(format!("subject={subject}; attribute={key}; got={}", json_type_name(v))),
                );
                bundle.attributes.push(NamedAttributeEvidence {
                    name: key.clone(),
                    evidence: AttributeEvidence {
                        attribute_name: Some(key.clone()),
                        ..Default::default()
                    },
                });
            }
        }
    }

    Some(bundle)
}

/// Parses a dataset document into typed bundles.
///
/// Only text that is not JSON at all is an error. Shape drift inside the
/// document degrades per record: the offending subject, attribute, or piece
/// is skipped (or carried empty) with a warning, and parsing continues.
pub fn parse_theme_dataset_text(text: &str) -> Result<ThemeDataset, AppError> {
    let root: Value = serde_json::from_str(text).map_err(|e| {
        AppError::new("INGEST_PARSE_FAILED", "Failed to parse dataset JSON")
            .with_details(e.to_string())
    })?;

    let mut dataset = ThemeDataset::default();

    let (_, subjects) = detect_shape(&root);
    let subjects = match subjects {
        Some(map) => map,
        None => {
            dataset.warnings.push(
                ValidationWarning::new(
                    "INGEST_DATASET_SHAPE_UNKNOWN",
                    "Dataset is not a subject map; nothing to load",
                )
                .with_details(format!("root={}", json_type_name(&root))),
            );
            return Ok(dataset);
        }
    };

    for (subject, bundle_value) in subjects {
        if subject.trim().is_empty() {
            dataset.warnings.push(ValidationWarning::new(
                "INGEST_SUBJECT_EMPTY",
                "Subject name is empty; keys will carry an empty subject segment",
            ));
        }
        if let Some(bundle) = parse_bundle(subject, bundle_value, &mut dataset.warnings) {
            dataset.bundles.push(bundle);
        }
    }

    Ok(dataset)
}

/// Parses a dataset document and loads it into the store in one step.
pub fn load_theme_dataset_text(
    store: &EvidenceStore,
    text: &str,
) -> Result<InitializeSummary, AppError> {
    let dataset = parse_theme_dataset_text(text)?;
    Ok(store.initialize(&dataset))
}
