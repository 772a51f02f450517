use serde::{Deserialize, Serialize};

/// Structured composite key for one `(subject, attribute)` pair.
///
/// `render()` produces the flat `{subject}_{attribute}_{hash8}` form used as
/// the store map key and accepted by key-compatibility lookups. The structured
/// components stay alongside so subject-wide retrieval never has to parse
/// names back out of the flat string, which is ambiguous once a subject or
/// attribute contains underscores.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvidenceKey {
    pub subject_raw: String,
    pub attribute_raw: String,
    pub subject_norm: String,
    pub attribute_norm: String,
    pub hash8: String,
}

impl EvidenceKey {
    /// Flat key string: `{subject_norm}_{attribute_norm}_{hash8}`.
    pub fn render(&self) -> String {
        format!(
            "{}_{}_{}",
            self.subject_norm, self.attribute_norm, self.hash8
        )
    }
}

/// 32-bit signed rolling hash, rendered as unpadded lowercase hex.
///
/// The recurrence is `h = h*31 + unit` over the UTF-16 code units of `text`,
/// seeded at 0, with two's-complement wraparound. The rendered digest is the
/// hex of the absolute value truncated to at most 8 characters; small hashes
/// keep their natural shorter length. Empty input hashes to `"0"`.
///
/// This digest is part of every persisted key, so the recurrence and the
/// truncation must not change.
pub fn generate_hash(text: &str) -> String {
    let mut h: i32 = 0;
    for unit in text.encode_utf16() {
        h = h.wrapping_mul(31).wrapping_add(i32::from(unit));
    }
    let mut hex = format!("{:x}", h.unsigned_abs());
    hex.truncate(8);
    hex
}

/// Collapses each whitespace run to a single `_`, then drops every character
/// outside `[A-Za-z0-9_]`. Case is preserved.
pub fn normalize_component(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_whitespace = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
                in_whitespace = true;
            }
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        }
    }
    out
}

/// Derives the stable key for a `(subject, attribute)` pair.
///
/// The hash runs over the un-normalized concatenation `subject + attribute`,
/// so pairs whose normalized forms coincide (e.g. `"a b"` vs `"a  b"`, both
/// normalizing to `a_b`) still get distinct keys.
pub fn generate_key(subject: &str, attribute: &str) -> EvidenceKey {
    EvidenceKey {
        subject_raw: subject.to_string(),
        attribute_raw: attribute.to_string(),
        subject_norm: normalize_component(subject),
        attribute_norm: normalize_component(attribute),
        hash8: generate_hash(&format!("{subject}{attribute}")),
    }
}
