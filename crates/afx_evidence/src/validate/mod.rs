use crate::domain::{AttributeEvidence, EvidencePiece, ValidationWarning};

/// Fields a well-formed evidence piece must carry.
pub const REQUIRED_PIECE_FIELDS: [&str; 4] = [
    "text_content",
    "source_url",
    "relevance_score",
    "authority_score",
];

/// Names the required fields a piece is missing, in `REQUIRED_PIECE_FIELDS`
/// order.
pub fn missing_required_fields(piece: &EvidencePiece) -> Vec<&'static str> {
    let present = [
        piece.text_content.is_some(),
        piece.source_url.is_some(),
        piece.relevance_score.is_some(),
        piece.authority_score.is_some(),
    ];
    REQUIRED_PIECE_FIELDS
        .into_iter()
        .zip(present)
        .filter(|&(_, is_present)| !is_present)
        .map(|(field, _)| field)
        .collect()
}

pub fn piece_is_complete(piece: &EvidencePiece) -> bool {
    missing_required_fields(piece).is_empty()
}

fn check_score_range(
    context: &str,
    field: &str,
    value: Option<f64>,
    warnings: &mut Vec<ValidationWarning>,
) {
    if let Some(v) = value {
        // NaN fails the range check and is flagged like any other bad score.
        if !(0.0..=1.0).contains(&v) {
            warnings.push(
                ValidationWarning::new(
                    "VALIDATION_SCORE_OUT_OF_RANGE",
                    "Score outside [0.0, 1.0]; stored as-is",
                )
                .with_details(format!("{context}; field={field}; value={v}")),
            );
        }
    }
}

/// Advisory checks for one piece. Incomplete or out-of-range pieces are
/// never rejected; callers surface these warnings and keep the data.
pub fn validate_piece(context: &str, index: usize, piece: &EvidencePiece) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let missing = missing_required_fields(piece);
    if !missing.is_empty() {
        warnings.push(
            ValidationWarning::new(
                "VALIDATION_PIECE_INCOMPLETE",
                "Evidence piece is missing required fields",
            )
            .with_details(format!(
                "{context}; piece={index}; missing={}",
                missing.join(",")
            )),
        );
    }
    check_score_range(
        &format!("{context}; piece={index}"),
        "relevance_score",
        piece.relevance_score,
        &mut warnings,
    );
    check_score_range(
        &format!("{context}; piece={index}"),
        "authority_score",
        piece.authority_score,
        &mut warnings,
    );
    warnings
}

/// Advisory checks for a whole attribute record.
pub fn validate_attribute_evidence(
    context: &str,
    value: &AttributeEvidence,
) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    for (index, piece) in value.evidence_pieces.iter().enumerate() {
        warnings.extend(validate_piece(context, index, piece));
    }
    warnings
}
