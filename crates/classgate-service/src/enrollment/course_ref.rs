//! Caller-supplied course reference.

use std::fmt;

use classgate_core::error::AppError;
use classgate_core::result::AppResult;
use classgate_core::types::CourseId;

const SLUG_MAX_LEN: usize = 128;

/// A course addressed by id or by slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseRef {
    /// By primary key.
    Id(CourseId),
    /// By URL slug.
    Slug(String),
}

impl CourseRef {
    /// Build a reference from the two optional request fields.
    ///
    /// Exactly one must be present.
    pub fn from_parts(course_id: Option<&str>, course_slug: Option<&str>) -> AppResult<Self> {
        match (course_id, course_slug) {
            (Some(id), None) => Ok(Self::Id(CourseId::parse(id)?)),
            (None, Some(slug)) => Self::slug(slug),
            (Some(_), Some(_)) => Err(AppError::invalid_input(
                "Provide either courseId or courseSlug, not both",
            )),
            (None, None) => Err(AppError::invalid_input("courseId or courseSlug is required")),
        }
    }

    /// Validate a slug reference.
    pub fn slug(raw: &str) -> AppResult<Self> {
        let valid = !raw.is_empty()
            && raw.len() <= SLUG_MAX_LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
        if valid {
            Ok(Self::Slug(raw.to_string()))
        } else {
            Err(AppError::invalid_input(format!("Invalid course slug: '{raw}'")))
        }
    }
}

impl fmt::Display for CourseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Slug(slug) => f.write_str(slug),
        }
    }
}
