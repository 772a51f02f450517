use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attribute name a subject's main evidence is stored under. Callers retrieve
/// main evidence through this literal rather than enumerating attributes.
pub const MAIN_EVIDENCE_ATTRIBUTE: &str = "theme_evidence";

/// Bundle keys that carry subject metadata rather than attribute collections.
/// Ingest never turns these into store entries.
pub const RESERVED_BUNDLE_KEYS: [&str; 7] = [
    "main_theme",
    "collection_timestamp",
    "destination",
    "theme_name",
    "total_sources_analyzed",
    "source_urls",
    "evidence_summary",
];

/// Caller-assigned quality tag for an evidence piece.
///
/// Known values are closed variants; anything else round-trips through
/// `Other` so unanticipated tags survive ingest and export unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualityRating {
    Excellent,
    Good,
    Fair,
    Poor,
    Unknown,
    Other(String),
}

impl QualityRating {
    pub fn as_str(&self) -> &str {
        match self {
            QualityRating::Excellent => "excellent",
            QualityRating::Good => "good",
            QualityRating::Fair => "fair",
            QualityRating::Poor => "poor",
            QualityRating::Unknown => "unknown",
            QualityRating::Other(s) => s.as_str(),
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "excellent" => QualityRating::Excellent,
            "good" => QualityRating::Good,
            "fair" => QualityRating::Fair,
            "poor" => QualityRating::Poor,
            "unknown" => QualityRating::Unknown,
            _ => QualityRating::Other(s.to_string()),
        }
    }
}

impl Serialize for QualityRating {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for QualityRating {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(QualityRating::parse(&s))
    }
}

/// Kind of observation an evidence piece records. Open vocabulary upstream;
/// the variants below are the ones the research pipeline emits today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvidenceType {
    CulturalObservation,
    BehavioralStudy,
    Other(String),
}

impl EvidenceType {
    pub fn as_str(&self) -> &str {
        match self {
            EvidenceType::CulturalObservation => "cultural_observation",
            EvidenceType::BehavioralStudy => "behavioral_study",
            EvidenceType::Other(s) => s.as_str(),
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "cultural_observation" => EvidenceType::CulturalObservation,
            "behavioral_study" => EvidenceType::BehavioralStudy,
            _ => EvidenceType::Other(s.to_string()),
        }
    }
}

impl Serialize for EvidenceType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EvidenceType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(EvidenceType::parse(&s))
    }
}

/// Provenance classification for an evidence source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceType {
    TravelGuide,
    TourismBoard,
    ReviewAnalysis,
    AcademicResearch,
    Other(String),
}

impl SourceType {
    pub fn as_str(&self) -> &str {
        match self {
            SourceType::TravelGuide => "travel_guide",
            SourceType::TourismBoard => "tourism_board",
            SourceType::ReviewAnalysis => "review_analysis",
            SourceType::AcademicResearch => "academic_research",
            SourceType::Other(s) => s.as_str(),
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "travel_guide" => SourceType::TravelGuide,
            "tourism_board" => SourceType::TourismBoard,
            "review_analysis" => SourceType::ReviewAnalysis,
            "academic_research" => SourceType::AcademicResearch,
            _ => SourceType::Other(s.to_string()),
        }
    }
}

impl Serialize for SourceType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SourceType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SourceType::parse(&s))
    }
}

/// One citation supporting a claim about a subject.
///
/// Notes:
/// - Every field is optional at the type level: upstream collectors emit
///   partial records and the store carries them rather than dropping data.
/// - A piece is well-formed when `text_content`, `source_url`,
///   `relevance_score`, and `authority_score` are all present; incomplete
///   pieces are flagged by `validate` and on export, never rejected.
/// - `relevance_score` here is caller-supplied input data, distinct from the
///   relevance the search module computes per query.
/// - Fields the engine does not model are preserved in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EvidencePiece {
    pub text_content: Option<String>,
    pub source_url: Option<String>,
    pub source_title: Option<String>,
    pub evidence_type: Option<EvidenceType>,
    pub source_type: Option<SourceType>,
    pub relevance_score: Option<f64>,
    pub authority_score: Option<f64>,
    pub quality_rating: Option<QualityRating>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A named collection of evidence pieces for one `(subject, attribute)` pair.
/// Main evidence is an `AttributeEvidence` like any other, stored under
/// [`MAIN_EVIDENCE_ATTRIBUTE`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AttributeEvidence {
    pub attribute_name: Option<String>,
    #[serde(default)]
    pub evidence_pieces: Vec<EvidencePiece>,
    pub search_hits: Option<i64>,
    pub uniqueness_ratio: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Subject-level metadata carried on a bundle's reserved keys. Kept on the
/// parsed dataset for hosts and reports; never stored as attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BundleMetadata {
    pub destination: Option<String>,
    pub theme_name: Option<String>,
    /// Canonical RFC3339 UTC collection time, when deterministically parseable.
    pub collection_ts: Option<String>,
    /// Raw collection time preserved for non-RFC3339 or unparseable inputs.
    pub collection_ts_raw: Option<String>,
    pub total_sources_analyzed: Option<i64>,
    pub source_urls: Vec<String>,
    pub evidence_summary: Option<String>,
}

/// An attribute collection together with the dataset map key it appeared
/// under. Store keys derive from `name`; the payload's own `attribute_name`
/// is data and may disagree with it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NamedAttributeEvidence {
    pub name: String,
    pub evidence: AttributeEvidence,
}

/// Everything one subject contributed to a dataset: optional main evidence,
/// named attribute collections, and bundle metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SubjectEvidenceBundle {
    pub subject: String,
    pub main: Option<AttributeEvidence>,
    pub attributes: Vec<NamedAttributeEvidence>,
    pub metadata: BundleMetadata,
}

/// Parsed ingest input: the bundles plus the warnings parsing produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ThemeDataset {
    pub bundles: Vec<SubjectEvidenceBundle>,
    pub warnings: Vec<ValidationWarning>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationWarning {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}
