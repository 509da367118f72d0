//! Structural validation of booking requests. No calendar access happens here.

use chrono::NaiveDate;
use std::fmt;

use crate::models::{BookingRequest, StayDates};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    StartDate,
    EndDate,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::StartDate => "startDate",
            Field::EndDate => "endDate",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingField(Field),
    InvalidDate(Field),
    /// Start day is after the end day.
    InvalidRange,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingField(field) => write!(f, "{field} is required"),
            ValidationError::InvalidDate(field) => {
                write!(f, "{field} must be a date in YYYY-MM-DD format")
            }
            ValidationError::InvalidRange => f.write_str("start date must not be after end date"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Checks a booking request and returns the parsed stay.
///
/// All rules run; every violation ends up in the error list.
pub fn validate(request: &BookingRequest) -> Result<StayDates, Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (field, value) in [(Field::Name, &request.name), (Field::Email, &request.email)] {
        if value.trim().is_empty() {
            errors.push(ValidationError::MissingField(field));
        }
    }

    let start = parse_day(Field::StartDate, &request.start_date, &mut errors);
    let end = parse_day(Field::EndDate, &request.end_date, &mut errors);

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            errors.push(ValidationError::InvalidRange);
        }
        if errors.is_empty() {
            return Ok(StayDates { start, end });
        }
    }

    Err(errors)
}

fn parse_day(field: Field, raw: &str, errors: &mut Vec<ValidationError>) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        errors.push(ValidationError::MissingField(field));
        return None;
    }
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(day) => Some(day),
        Err(_) => {
            errors.push(ValidationError::InvalidDate(field));
            None
        }
    }
}
