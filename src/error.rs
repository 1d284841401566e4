use thiserror::Error;

/// Client input problems. The `Display` text is what the client sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required")]
    TitleRequired,
    #[error("URL is required")]
    UrlRequired,
    #[error("Description is required")]
    DescriptionRequired,
    #[error("Rating is required")]
    RatingRequired,
    #[error("Rating must be a number")]
    RatingNotNumeric(String),
    #[error("Please provide a valid URL")]
    InvalidUrl(String),
    #[error("{0} must be text")]
    NotText(&'static str),
    #[error("Must provide field to update")]
    NoFieldsToUpdate,
}

impl ValidationError {
    /// Extra detail for logs; never sent to the client.
    pub fn received(&self) -> Option<&str> {
        use ValidationError::*;
        match self {
            RatingNotNumeric(s) | InvalidUrl(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_client_facing() {
        assert_eq!(ValidationError::TitleRequired.to_string(), "Title is required");
        assert_eq!(ValidationError::UrlRequired.to_string(), "URL is required");
        assert_eq!(
            ValidationError::RatingNotNumeric("abc".into()).to_string(),
            "Rating must be a number"
        );
        assert_eq!(
            ValidationError::InvalidUrl("nope".into()).to_string(),
            "Please provide a valid URL"
        );
        assert_eq!(ValidationError::NotText("Title").to_string(), "Title must be text");
        assert_eq!(
            ValidationError::NoFieldsToUpdate.to_string(),
            "Must provide field to update"
        );
    }

    #[test]
    fn received_value_is_kept_for_logging() {
        assert_eq!(ValidationError::InvalidUrl("ftp:x".into()).received(), Some("ftp:x"));
        assert_eq!(ValidationError::RatingRequired.received(), None);
    }
}
