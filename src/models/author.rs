//! Author value object, embedded in every book

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::validation::validate_birth_date;

/// Author as stored inline in a book document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub name: String,
    pub country: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub birth_date: DateTime<Utc>,
}

/// Birth date as accepted on input: a date or date-time string, or epoch milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BirthDateInput {
    Timestamp(i64),
    Text(String),
}

impl BirthDateInput {
    /// Parse into a UTC date-time. Plain dates (`YYYY-MM-DD`) map to midnight UTC.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            BirthDateInput::Timestamp(millis) => DateTime::from_timestamp_millis(*millis),
            BirthDateInput::Text(text) => {
                let text = text.trim();
                if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
                    return Some(dt.with_timezone(&Utc));
                }
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|dt| dt.and_utc())
            }
        }
    }
}

/// Author payload in create and update requests
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorInput {
    #[validate(length(min = 1, message = "Author name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
    #[validate(custom(function = "validate_birth_date"))]
    #[schema(value_type = String, example = "1970-01-01")]
    pub birth_date: BirthDateInput,
}

impl AuthorInput {
    /// Convert into the stored value. Returns `None` when the birth date does not parse.
    pub fn into_author(self) -> Option<Author> {
        let birth_date = self.birth_date.to_datetime()?;
        Some(Author {
            name: self.name,
            country: self.country,
            birth_date,
        })
    }
}
