//! Request DTOs

use serde::Deserialize;

/// Body of a reaction request. The kind stays a raw string so that
/// unsupported values surface as `InvalidReaction` rather than a body error.
#[derive(Debug, Clone, Deserialize)]
pub struct ReactionRequest {
    pub reaction: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_string_deserializes() {
        let req: ReactionRequest = serde_json::from_str(r#"{"reaction":"star"}"#).unwrap();
        assert_eq!(req.reaction, "star");
    }

    #[test]
    fn test_missing_field_rejected() {
        assert!(serde_json::from_str::<ReactionRequest>("{}").is_err());
    }
}
