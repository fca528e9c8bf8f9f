//! Error types for TVDB client operations.
use thiserror::Error;

/// Errors that can occur while talking to the TVDB api.
#[derive(Debug, Error)]
pub enum TvdbError {
    /// The HTTP request could not be performed (connection, DNS, TLS, ...)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The api answered with a non-200 status code
    #[error("Got a response with status code {0}")]
    Status(u16),

    /// Failed to parse the api's JSON response
    #[error("Failed to parse API response: {0}")]
    Parse(#[from] serde_json::Error),

    /// A search yielded no candidates to choose from
    #[error("Series not found: {0}")]
    NotFound(String),

    /// The record passed to a fetch method has no identity yet
    #[error("The {0} is empty")]
    Empty(&'static str),
}

impl TvdbError {
    /// Returns true if this error is a status error carrying the given code.
    ///
    /// Any other error kind (transport, parse, ...) answers false, so callers
    /// can branch on status semantics without inspecting the variant:
    ///
    /// ```
    /// use tvdb::TvdbError;
    ///
    /// let err = TvdbError::Status(404);
    /// assert!(err.is_code(404));
    /// assert!(!err.is_code(401));
    /// ```
    pub fn is_code(&self, code: u16) -> bool {
        matches!(self, TvdbError::Status(c) if *c == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_code_matches_status_errors() {
        assert!(TvdbError::Status(404).is_code(404));
        assert!(TvdbError::Status(401).is_code(401));
        assert!(!TvdbError::Status(404).is_code(401));
    }

    #[test]
    fn is_code_is_false_for_other_kinds() {
        assert!(!TvdbError::NotFound("nope".to_string()).is_code(404));
        assert!(!TvdbError::Empty("series").is_code(404));
        let parse = serde_json::from_str::<u32>("not json").unwrap_err();
        assert!(!TvdbError::Parse(parse).is_code(404));
    }

    #[test]
    fn display_carries_the_status_code() {
        assert_eq!(
            TvdbError::Status(502).to_string(),
            "Got a response with status code 502"
        );
    }
}
