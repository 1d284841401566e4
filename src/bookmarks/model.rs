use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::ValidationError;
use crate::sanitize::sanitize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub description: String,
    pub rating: Number,
}

/// A fully validated bookmark that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub description: String,
    pub rating: Number,
}

impl NewBookmark {
    pub fn sanitized(self) -> Self {
        NewBookmark {
            title: sanitize(&self.title),
            url: sanitize(&self.url),
            description: sanitize(&self.description),
            rating: self.rating,
        }
    }
}

/// Fields to change on an existing bookmark. `None` leaves the column untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookmarkUpdate {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub rating: Option<Number>,
}

impl BookmarkUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.url.is_none() && self.description.is_none() && self.rating.is_none()
    }

    pub fn sanitized(self) -> Self {
        BookmarkUpdate {
            title: self.title.as_deref().map(sanitize),
            url: self.url.as_deref().map(sanitize),
            description: self.description.as_deref().map(sanitize),
            rating: self.rating,
        }
    }
}

/// A raw request field. Any JSON value is accepted here so that falsy values
/// (`false`, `0`, `""`) reach validation instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldInput {
    Number(Number),
    Text(String),
    Other(Value),
}

impl FieldInput {
    /// JavaScript truthiness: `""`, `0`, `false` and `null` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldInput::Number(n) => n.as_f64() != Some(0.0),
            FieldInput::Text(s) => !s.is_empty(),
            FieldInput::Other(Value::Bool(b)) => *b,
            FieldInput::Other(Value::Null) => false,
            FieldInput::Other(_) => true,
        }
    }

    fn into_text(self, field: &'static str) -> Result<String, ValidationError> {
        match self {
            FieldInput::Text(s) => Ok(s),
            FieldInput::Number(n) => Ok(n.to_string()),
            FieldInput::Other(_) => Err(ValidationError::NotText(field)),
        }
    }

    fn into_number(self) -> Result<Number, ValidationError> {
        match self {
            FieldInput::Number(n) => Ok(n),
            FieldInput::Text(s) => {
                let trimmed = s.trim();
                if let Ok(n) = trimmed.parse::<i64>() {
                    return Ok(Number::from(n));
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .ok_or(ValidationError::RatingNotNumeric(s))
            }
            FieldInput::Other(v) => Err(ValidationError::RatingNotNumeric(v.to_string())),
        }
    }
}

fn truthy(value: Option<FieldInput>) -> Option<FieldInput> {
    value.filter(FieldInput::is_truthy)
}

/// Absolute `http`/`https` URL with a host.
pub fn is_valid_url(input: &str) -> bool {
    match url::Url::parse(input) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some_and(|h| !h.is_empty()),
        Err(_) => false,
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBookmarkRequest {
    pub title: Option<FieldInput>,
    pub url: Option<FieldInput>,
    pub description: Option<FieldInput>,
    pub rating: Option<FieldInput>,
}

impl CreateBookmarkRequest {
    /// Checks fields in a fixed order and reports the first failure.
    pub fn validate(self) -> Result<NewBookmark, ValidationError> {
        let title = truthy(self.title).ok_or(ValidationError::TitleRequired)?.into_text("Title")?;
        let url = truthy(self.url).ok_or(ValidationError::UrlRequired)?.into_text("URL")?;
        let description = truthy(self.description)
            .ok_or(ValidationError::DescriptionRequired)?
            .into_text("Description")?;
        let rating = truthy(self.rating).ok_or(ValidationError::RatingRequired)?.into_number()?;

        if !is_valid_url(&url) {
            return Err(ValidationError::InvalidUrl(url));
        }

        Ok(NewBookmark {
            title,
            url,
            description,
            rating,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBookmarkRequest {
    pub title: Option<FieldInput>,
    pub url: Option<FieldInput>,
    pub description: Option<FieldInput>,
    pub rating: Option<FieldInput>,
}

impl UpdateBookmarkRequest {
    /// Falsy fields count as "not supplied"; at least one field must remain.
    pub fn validate(self) -> Result<BookmarkUpdate, ValidationError> {
        let title = truthy(self.title);
        let url = truthy(self.url);
        let description = truthy(self.description);
        let rating = truthy(self.rating);

        if title.is_none() && url.is_none() && description.is_none() && rating.is_none() {
            return Err(ValidationError::NoFieldsToUpdate);
        }

        let title = title.map(|t| t.into_text("Title")).transpose()?;
        let url = url.map(|u| u.into_text("URL")).transpose()?;
        let description = description.map(|d| d.into_text("Description")).transpose()?;
        let rating = rating.map(FieldInput::into_number).transpose()?;

        if let Some(url) = &url {
            if !is_valid_url(url) {
                return Err(ValidationError::InvalidUrl(url.clone()));
            }
        }

        Ok(BookmarkUpdate {
            title,
            url,
            description,
            rating,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create(value: serde_json::Value) -> Result<NewBookmark, ValidationError> {
        serde_json::from_value::<CreateBookmarkRequest>(value).unwrap().validate()
    }

    fn update(value: serde_json::Value) -> Result<BookmarkUpdate, ValidationError> {
        serde_json::from_value::<UpdateBookmarkRequest>(value).unwrap().validate()
    }

    #[test]
    fn valid_create_request() {
        let bookmark = create(json!({
            "title": "Google",
            "url": "http://www.google.com",
            "description": "search engine",
            "rating": 4
        }))
        .unwrap();
        assert_eq!(bookmark.title, "Google");
        assert_eq!(bookmark.rating, Number::from(4));
    }

    #[test]
    fn numeric_string_rating_is_accepted() {
        let bookmark = create(json!({
            "title": "t", "url": "https://a.io", "description": "d", "rating": " 4.5 "
        }))
        .unwrap();
        assert_eq!(bookmark.rating.as_f64(), Some(4.5));

        let bookmark = create(json!({
            "title": "t", "url": "https://a.io", "description": "d", "rating": "3"
        }))
        .unwrap();
        assert_eq!(bookmark.rating, Number::from(3));
    }

    #[test]
    fn first_failing_check_wins() {
        assert_eq!(create(json!({})), Err(ValidationError::TitleRequired));
        assert_eq!(
            create(json!({"title": "t", "url": "", "rating": "x"})),
            Err(ValidationError::UrlRequired)
        );
        assert_eq!(
            create(json!({"title": "t", "url": "not a url", "rating": "x"})),
            Err(ValidationError::DescriptionRequired)
        );
        assert_eq!(
            create(json!({"title": "t", "url": "not a url", "description": "d"})),
            Err(ValidationError::RatingRequired)
        );
        // rating is checked before the url format
        assert_eq!(
            create(json!({"title": "t", "url": "not a url", "description": "d", "rating": "x"})),
            Err(ValidationError::RatingNotNumeric("x".into()))
        );
        assert_eq!(
            create(json!({"title": "t", "url": "not a url", "description": "d", "rating": 1})),
            Err(ValidationError::InvalidUrl("not a url".into()))
        );
    }

    #[test]
    fn null_and_empty_fields_are_missing() {
        assert_eq!(
            create(json!({"title": null, "url": "https://a.io", "description": "d", "rating": 1})),
            Err(ValidationError::TitleRequired)
        );
        assert_eq!(
            create(json!({"title": "t", "url": "https://a.io", "description": "d", "rating": ""})),
            Err(ValidationError::RatingRequired)
        );
    }

    #[test]
    fn non_finite_and_hex_ratings_are_rejected() {
        for rating in ["NaN", "inf", "Infinity", "-Infinity", "0x10"] {
            assert!(matches!(
                create(json!({"title": "t", "url": "https://a.io", "description": "d", "rating": rating})),
                Err(ValidationError::RatingNotNumeric(_))
            ));
        }
    }

    #[test]
    fn url_checker() {
        assert!(is_valid_url("http://www.google.com"));
        assert!(is_valid_url("https://example.com/path?q=1"));
        assert!(!is_valid_url("www.google.com"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("javascript:alert(1)"));
        assert!(!is_valid_url("http://"));
    }

    #[test]
    fn create_sanitizes_text_but_not_rating() {
        let bookmark = create(json!({
            "title": "<script>x</script>",
            "url": "https://a.io",
            "description": "<b onclick=\"x()\">d</b>",
            "rating": 2
        }))
        .unwrap()
        .sanitized();
        assert_eq!(bookmark.title, "&lt;script&gt;x&lt;/script&gt;");
        assert_eq!(bookmark.description, "<b>d</b>");
        assert_eq!(bookmark.rating, Number::from(2));
    }

    #[test]
    fn empty_update_is_rejected() {
        assert_eq!(update(json!({})), Err(ValidationError::NoFieldsToUpdate));
        assert_eq!(
            update(json!({"title": "", "url": ""})),
            Err(ValidationError::NoFieldsToUpdate)
        );
        assert_eq!(
            update(json!({"unrelated": "field"})),
            Err(ValidationError::NoFieldsToUpdate)
        );
    }

    #[test]
    fn partial_update_keeps_only_supplied_fields() {
        let changes = update(json!({"title": "new", "description": "", "rating": "5"})).unwrap();
        assert_eq!(
            changes,
            BookmarkUpdate {
                title: Some("new".into()),
                url: None,
                description: None,
                rating: Some(Number::from(5)),
            }
        );
        assert!(!changes.is_empty());
        assert!(BookmarkUpdate::default().is_empty());
    }

    #[test]
    fn update_rejects_bad_url_and_rating() {
        assert!(matches!(
            update(json!({"url": "nope"})),
            Err(ValidationError::InvalidUrl(_))
        ));
        assert!(matches!(
            update(json!({"rating": "five"})),
            Err(ValidationError::RatingNotNumeric(_))
        ));
    }

    #[test]
    fn zero_and_false_ratings_are_missing() {
        for rating in [json!(0), json!(0.0), json!(false), json!(null)] {
            assert_eq!(
                create(json!({"title": "t", "url": "https://a.io", "description": "d", "rating": rating})),
                Err(ValidationError::RatingRequired)
            );
        }
    }

    #[test]
    fn falsy_text_fields_are_missing() {
        assert_eq!(
            create(json!({"title": false, "url": "https://a.io", "description": "d", "rating": 1})),
            Err(ValidationError::TitleRequired)
        );
        assert_eq!(
            create(json!({"title": "t", "url": 0, "description": "d", "rating": 1})),
            Err(ValidationError::UrlRequired)
        );
    }

    #[test]
    fn non_text_values_are_rejected_or_coerced() {
        assert_eq!(
            create(json!({"title": true, "url": "https://a.io", "description": "d", "rating": 1})),
            Err(ValidationError::NotText("Title"))
        );
        assert_eq!(
            create(json!({"title": "t", "url": "https://a.io", "description": ["d"], "rating": 1})),
            Err(ValidationError::NotText("Description"))
        );
        let bookmark = create(json!({"title": 42, "url": "https://a.io", "description": "d", "rating": 1})).unwrap();
        assert_eq!(bookmark.title, "42");
        assert!(matches!(
            create(json!({"title": "t", "url": "https://a.io", "description": "d", "rating": true})),
            Err(ValidationError::RatingNotNumeric(_))
        ));
    }

    #[test]
    fn all_falsy_update_is_rejected() {
        for body in [
            json!({"rating": 0}),
            json!({"title": null, "url": "", "rating": 0}),
            json!({"title": "", "rating": false}),
            json!({"title": false, "url": null, "description": 0, "rating": ""}),
        ] {
            assert_eq!(update(body), Err(ValidationError::NoFieldsToUpdate));
        }
    }

    #[test]
    fn falsy_fields_are_dropped_from_update() {
        let changes = update(json!({"title": "new", "rating": 0, "url": false})).unwrap();
        assert_eq!(
            changes,
            BookmarkUpdate {
                title: Some("new".into()),
                ..Default::default()
            }
        );
    }
}
