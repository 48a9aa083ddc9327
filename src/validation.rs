//! Field validators and conversion of `validator` reports into field errors

use std::borrow::Cow;

use bson::oid::ObjectId;
use once_cell::sync::Lazy;
use regex::Regex;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::{error::FieldError, models::author::BirthDateInput};

static ISBN_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ISBN(?:-1[03])?:? ").unwrap());
static ISBN_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:97[89][- ]?)?[0-9]{1,5}[- ]?[0-9]+[- ]?[0-9]+[- ]?[0-9X]$").unwrap()
});
static ISBN13_COMPACT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^97[89][0-9]{10}$").unwrap());
static THREE_GROUPS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[0-9]+[- ]){3}").unwrap());
static FOUR_GROUPS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[0-9]+[- ]){4}").unwrap());

fn error_with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn consists_of(s: &str, extra: &[char]) -> bool {
    s.chars().all(|c| c.is_ascii_digit() || extra.contains(&c))
}

/// Check an ISBN-10 or ISBN-13, compact or with hyphen/space separators,
/// optionally prefixed by `ISBN`, `ISBN-10:` or `ISBN-13:`.
pub fn is_valid_isbn(value: &str) -> bool {
    let body = match ISBN_PREFIX.find(value) {
        Some(m) => &value[m.end()..],
        None => value,
    };

    let len = body.chars().count();

    let length_ok = (len == 10 && consists_of(body, &['X']))
        || (len == 13 && consists_of(body, &['X', '-', ' ']) && THREE_GROUPS.is_match(body))
        || ISBN13_COMPACT.is_match(body)
        || (len == 17 && consists_of(body, &['-', ' ']) && FOUR_GROUPS.is_match(body));

    length_ok && ISBN_SHAPE.is_match(body)
}

pub fn validate_isbn(value: &str) -> Result<(), ValidationError> {
    if is_valid_isbn(value) {
        Ok(())
    } else {
        Err(error_with_message("isbn", "Invalid ISBN format"))
    }
}

pub fn validate_object_id(value: &str) -> Result<(), ValidationError> {
    ObjectId::parse_str(value)
        .map(|_| ())
        .map_err(|_| error_with_message("object_id", "Invalid ObjectId format"))
}

pub fn validate_birth_date(value: &BirthDateInput) -> Result<(), ValidationError> {
    value
        .to_datetime()
        .map(|_| ())
        .ok_or_else(|| error_with_message("birth_date", "Invalid birth date"))
}

/// Flatten a (possibly nested) validation report into dotted-path field errors,
/// sorted by field for stable output.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out = Vec::new();
    collect(errors, "", &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

/// Request payloads use camelCase on the wire
fn wire_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let name = wire_name(&field.to_string());
        let path = if prefix.is_empty() {
            name
        } else {
            format!("{}.{}", prefix, name)
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", err.code));
                    out.push(FieldError::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}
