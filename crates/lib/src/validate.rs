use serde_json::Value;

pub const REQUIRED_TEXT_FIELDS: [&str; 4] = ["id", "title", "description", "content"];

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{file}: record must be a JSON object")]
    NotAnObject { file: String },
    #[error("{file}: missing required field \"{field}\"")]
    MissingField { file: String, field: &'static str },
    #[error("{file}: \"tags\" must be a non-empty array")]
    TagsNotNonEmptyArray { file: String },
    #[error("{file}: \"tags\" must contain only non-empty strings")]
    InvalidTag { file: String, index: usize },
}

pub(crate) fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

/// Checks the required-field contract of one raw record. `lang` and the
/// date fields are left to the builder's own defaults and fallbacks.
pub fn validate(raw: &Value, file: &str) -> Result<(), ValidationError> {
    let Value::Object(record) = raw else {
        return Err(ValidationError::NotAnObject {
            file: file.to_owned(),
        });
    };

    for field in REQUIRED_TEXT_FIELDS {
        if non_empty_str(record.get(field)).is_none() {
            return Err(ValidationError::MissingField {
                file: file.to_owned(),
                field,
            });
        }
    }

    let tags = match record.get("tags") {
        Some(Value::Array(tags)) if !tags.is_empty() => tags,
        _ => {
            return Err(ValidationError::TagsNotNonEmptyArray {
                file: file.to_owned(),
            })
        }
    };

    if let Some(index) = tags.iter().position(|tag| non_empty_str(Some(tag)).is_none()) {
        return Err(ValidationError::InvalidTag {
            file: file.to_owned(),
            index,
        });
    }

    Ok(())
}
