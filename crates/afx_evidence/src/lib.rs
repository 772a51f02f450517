pub mod analytics;
pub mod demo;
pub mod domain;
pub mod error;
pub mod export;
pub mod ingest;
pub mod keys;
pub mod normalize;
pub mod report;
pub mod search;
pub mod store;
pub mod validate;

#[cfg(test)]
mod tests {
    use super::error::AppError;

    #[test]
    fn app_error_is_structured() {
        let err = AppError::new("INGEST_PARSE_FAILED", "dataset unreadable")
            .with_details("expected value at line 1 column 1");
        assert_eq!(err.code, "INGEST_PARSE_FAILED");
        assert_eq!(err.message, "dataset unreadable");
        assert_eq!(err.details.as_deref(), Some("expected value at line 1 column 1"));
        assert!(!err.retryable);
        assert_eq!(err.to_string(), "[INGEST_PARSE_FAILED] dataset unreadable");
    }
}
