use time::format_description::well_known::Rfc3339;
use time::{format_description, Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::domain::ValidationWarning;

/// Canonicalized timestamp with the raw input preserved when it was not
/// already canonical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTimestamp {
    /// Canonical RFC3339 UTC string, if deterministically parseable.
    pub canonical_rfc3339_utc: Option<String>,
    /// Raw input preserved for non-RFC3339 (or unparseable) inputs.
    pub raw: Option<String>,
}

fn canonicalize_rfc3339_utc(dt: OffsetDateTime) -> Option<String> {
    let utc = dt.to_offset(UtcOffset::UTC);
    utc.format(&Rfc3339).ok()
}

/// Epoch interpretation for all-digit inputs. Collector pipelines emit both
/// `Date.now()` milliseconds and second-precision stamps; magnitude picks the
/// unit deterministically (>= 1e11 means milliseconds).
fn parse_epoch_digits(raw: &str, field: &str, warnings: &mut Vec<ValidationWarning>) -> Option<String> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: i64 = raw.parse().ok()?;

    let dt = if n >= 100_000_000_000 {
        let base = OffsetDateTime::from_unix_timestamp(n / 1000).ok()?;
        base + Duration::milliseconds(n % 1000)
    } else {
        OffsetDateTime::from_unix_timestamp(n).ok()?
    };
    let unit = if n >= 100_000_000_000 { "ms" } else { "s" };

    let canon = canonicalize_rfc3339_utc(dt)?;
    warnings.push(
        ValidationWarning::new(
            "INGEST_TS_EPOCH_ASSUMED",
            format!("Interpreted numeric timestamp for {field} as Unix epoch"),
        )
        .with_details(format!("value={raw}; unit={unit}")),
    );
    Some(canon)
}

fn parse_primitive_assume_utc(
    raw: &str,
    fmt: &str,
    field: &str,
    warnings: &mut Vec<ValidationWarning>,
) -> Option<String> {
    let items = match format_description::parse(fmt) {
        Ok(i) => i,
        Err(e) => {
            warnings.push(
                ValidationWarning::new(
                    "INGEST_TS_FORMAT_CONFIG_FAILED",
                    format!("Timestamp format config error for {field}"),
                )
                .with_details(format!("fmt={fmt}; err={e}")),
            );
            return None;
        }
    };

    let pdt = match PrimitiveDateTime::parse(raw, &items) {
        Ok(p) => p,
        Err(_) => return None,
    };

    // Format carries no timezone; assumed UTC must be called out explicitly.
    warnings.push(
        ValidationWarning::new(
            "INGEST_TS_TZ_ASSUMED_UTC",
            format!("Assumed UTC timezone for {field}"),
        )
        .with_details(format!("value={raw}; fmt={fmt}")),
    );

    canonicalize_rfc3339_utc(pdt.assume_utc())
}

fn parse_allowlist(raw: &str, field: &str, warnings: &mut Vec<ValidationWarning>) -> Option<String> {
    // Deterministic allowlist only, no fuzzy parsing.
    if let Some(canon) = parse_epoch_digits(raw, field, warnings) {
        return Some(canon);
    }

    for fmt in [
        "[year]-[month]-[day] [hour]:[minute]:[second]",
        "[year]-[month]-[day] [hour]:[minute]",
        "[year]-[month]-[day]T[hour]:[minute]:[second]",
        "[year]-[month]-[day]T[hour]:[minute]",
    ] {
        if let Some(canon) = parse_primitive_assume_utc(raw, fmt, field, warnings) {
            return Some(canon);
        }
    }

    None
}

/// Normalize a collector-provided timestamp into canonical RFC3339 UTC while
/// preserving raw inputs.
///
/// Contract:
/// - RFC3339 input: canonical only, `raw` stays `None`.
/// - Non-RFC3339 but allowlisted (naive ISO-like, epoch digits): canonical
///   plus preserved `raw`, with an explicit warning.
/// - Unparseable: `raw` preserved, canonical `None`, explicit warning.
pub fn normalize_timestamp(
    field: &str,
    raw_input: &str,
    warnings: &mut Vec<ValidationWarning>,
) -> NormalizedTimestamp {
    let trimmed = raw_input.trim();
    if trimmed.is_empty() {
        return NormalizedTimestamp {
            canonical_rfc3339_utc: None,
            raw: None,
        };
    }

    if let Ok(dt) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return NormalizedTimestamp {
            canonical_rfc3339_utc: canonicalize_rfc3339_utc(dt),
            raw: None,
        };
    }

    if let Some(canon) = parse_allowlist(trimmed, field, warnings) {
        warnings.push(
            ValidationWarning::new(
                "INGEST_TS_NORMALIZED",
                format!("Normalized non-RFC3339 timestamp for {field}"),
            )
            .with_details(format!("raw={trimmed}; canonical={canon}")),
        );
        return NormalizedTimestamp {
            canonical_rfc3339_utc: Some(canon),
            raw: Some(trimmed.to_string()),
        };
    }

    warnings.push(
        ValidationWarning::new(
            "INGEST_TS_UNPARSEABLE",
            format!("Unparseable timestamp for {field}; preserved raw"),
        )
        .with_details(format!("raw={trimmed}")),
    );

    NormalizedTimestamp {
        canonical_rfc3339_utc: None,
        raw: Some(trimmed.to_string()),
    }
}
