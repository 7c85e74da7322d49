//! Request validation from per-field rules.

use crate::error::AppError;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Number,
    Integer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Email,
    /// `YYYY-MM-DD`.
    Date,
    /// `YYYY-MM-DD`, today or earlier.
    PastDate,
}

#[derive(Clone, Copy, Debug)]
pub struct ValidationRule {
    pub required: bool,
    /// Column is NOT NULL: an explicit null is rejected even when the field is optional.
    pub not_null: bool,
    pub kind: Option<ValueKind>,
    pub format: Option<Format>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub allowed: Option<&'static [&'static str]>,
}

impl ValidationRule {
    pub const NONE: ValidationRule = ValidationRule {
        required: false,
        not_null: false,
        kind: None,
        format: None,
        min_length: None,
        max_length: None,
        minimum: None,
        maximum: None,
        allowed: None,
    };
}

pub type Rules = &'static [(&'static str, ValidationRule)];

const NAME: ValidationRule = ValidationRule {
    required: true,
    kind: Some(ValueKind::String),
    min_length: Some(2),
    max_length: Some(100),
    ..ValidationRule::NONE
};

const LAT: ValidationRule = ValidationRule {
    required: true,
    kind: Some(ValueKind::Number),
    minimum: Some(-90.0),
    maximum: Some(90.0),
    ..ValidationRule::NONE
};

const LNG: ValidationRule = ValidationRule {
    required: true,
    kind: Some(ValueKind::Number),
    minimum: Some(-180.0),
    maximum: Some(180.0),
    ..ValidationRule::NONE
};

/// Id of a referenced row.
const REFERENCE: ValidationRule = ValidationRule {
    required: true,
    kind: Some(ValueKind::Integer),
    minimum: Some(1.0),
    ..ValidationRule::NONE
};

const EMAIL: ValidationRule = ValidationRule {
    required: true,
    kind: Some(ValueKind::String),
    format: Some(Format::Email),
    max_length: Some(255),
    ..ValidationRule::NONE
};

pub const CAT_RULES: Rules = &[
    ("cat_name", NAME),
    (
        "weight",
        ValidationRule {
            required: true,
            kind: Some(ValueKind::Number),
            minimum: Some(0.0),
            ..ValidationRule::NONE
        },
    ),
    (
        "filename",
        ValidationRule {
            required: true,
            kind: Some(ValueKind::String),
            min_length: Some(1),
            max_length: Some(255),
            ..ValidationRule::NONE
        },
    ),
    (
        "birthdate",
        ValidationRule {
            required: true,
            kind: Some(ValueKind::String),
            format: Some(Format::Date),
            ..ValidationRule::NONE
        },
    ),
    ("lat", LAT),
    ("lng", LNG),
    (
        "owner",
        ValidationRule {
            required: false,
            not_null: true,
            ..REFERENCE
        },
    ),
];

pub const USER_RULES: Rules = &[
    ("user_name", NAME),
    ("email", EMAIL),
    (
        "role",
        ValidationRule {
            not_null: true,
            kind: Some(ValueKind::String),
            allowed: Some(&["user", "admin"]),
            ..ValidationRule::NONE
        },
    ),
];

/// Body of `POST /users`. The role is never taken from the body.
pub const NEW_USER_RULES: Rules = &[
    ("user_name", NAME),
    ("email", EMAIL),
    (
        "password",
        ValidationRule {
            required: true,
            kind: Some(ValueKind::String),
            min_length: Some(5),
            max_length: Some(200),
            ..ValidationRule::NONE
        },
    ),
];

pub const CATEGORY_RULES: Rules = &[("category_name", NAME)];

pub const SPECIES_RULES: Rules = &[
    ("species_name", NAME),
    ("category", REFERENCE),
    (
        "image",
        ValidationRule {
            not_null: true,
            kind: Some(ValueKind::String),
            min_length: Some(1),
            max_length: Some(2048),
            ..ValidationRule::NONE
        },
    ),
    ("lat", LAT),
    ("lng", LNG),
];

pub const ANIMAL_RULES: Rules = &[
    ("animal_name", NAME),
    ("species", REFERENCE),
    (
        "birthdate",
        ValidationRule {
            required: true,
            kind: Some(ValueKind::String),
            format: Some(Format::PastDate),
            ..ValidationRule::NONE
        },
    ),
    (
        "gender",
        ValidationRule {
            required: true,
            kind: Some(ValueKind::String),
            allowed: Some(&["Male", "Female"]),
            ..ValidationRule::NONE
        },
    ),
];

pub struct RequestValidator;

impl RequestValidator {
    /// Validate body against per-field rules. All required fields must be present.
    pub fn validate(body: &Map<String, Value>, rules: Rules) -> Result<(), AppError> {
        for (field, rule) in rules {
            let val = body.get(*field);
            if rule.required && (val.is_none() || val == Some(&Value::Null)) {
                return Err(AppError::Validation(format!("{} is required", field)));
            }
            if rule.not_null && val == Some(&Value::Null) {
                return Err(AppError::Validation(format!("{} cannot be null", field)));
            }
            if let Some(v) = val {
                validate_field(field, v, rule)?;
            }
        }
        Ok(())
    }

    /// Validate only the fields present in body (for PUT). Required is not enforced for missing fields,
    /// but a required or NOT NULL field cannot be cleared with null.
    pub fn validate_partial(body: &Map<String, Value>, rules: Rules) -> Result<(), AppError> {
        for (field, rule) in rules {
            let Some(v) = body.get(*field) else { continue };
            if (rule.required || rule.not_null) && v.is_null() {
                return Err(AppError::Validation(format!("{} cannot be null", field)));
            }
            validate_field(field, v, rule)?;
        }
        Ok(())
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static email pattern"))
}

fn validate_field(field: &str, v: &Value, rule: &ValidationRule) -> Result<(), AppError> {
    if v.is_null() {
        return Ok(());
    }
    if let Some(kind) = rule.kind {
        let ok = match kind {
            ValueKind::String => v.is_string(),
            ValueKind::Number => v.is_number(),
            ValueKind::Integer => v.is_i64(),
        };
        if !ok {
            let expected = match kind {
                ValueKind::String => "a string",
                ValueKind::Number => "a number",
                ValueKind::Integer => "an integer",
            };
            return Err(AppError::Validation(format!("{} must be {}", field, expected)));
        }
    }
    if let Some(format) = rule.format {
        validate_format(field, v, format)?;
    }
    if let Some(s) = v.as_str() {
        let len = s.chars().count();
        if let Some(max) = rule.max_length {
            if len > max {
                return Err(AppError::Validation(format!(
                    "{} must be at most {} characters",
                    field, max
                )));
            }
        }
        if let Some(min) = rule.min_length {
            if len < min {
                return Err(AppError::Validation(format!(
                    "{} must be at least {} characters",
                    field, min
                )));
            }
        }
        if let Some(allowed) = rule.allowed {
            if !allowed.contains(&s) {
                return Err(AppError::Validation(format!("{} must be one of: {:?}", field, allowed)));
            }
        }
    }
    if let Some(n) = v.as_f64() {
        if let Some(min) = rule.minimum {
            if n < min {
                return Err(AppError::Validation(format!("{} must be at least {}", field, min)));
            }
        }
        if let Some(max) = rule.maximum {
            if n > max {
                return Err(AppError::Validation(format!("{} must be at most {}", field, max)));
            }
        }
    }
    Ok(())
}

fn validate_format(field: &str, v: &Value, format: Format) -> Result<(), AppError> {
    let Some(s) = v.as_str() else { return Ok(()) };
    match format {
        Format::Email => {
            if !email_regex().is_match(s) {
                return Err(AppError::Validation(format!("{} must be a valid email", field)));
            }
        }
        Format::Date | Format::PastDate => {
            let Ok(date) = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") else {
                return Err(AppError::Validation(format!("{} must be a date (YYYY-MM-DD)", field)));
            };
            if format == Format::PastDate && date > chrono::Utc::now().date_naive() {
                return Err(AppError::Validation(format!("{} cannot be in the future", field)));
            }
        }
    }
    Ok(())
}
