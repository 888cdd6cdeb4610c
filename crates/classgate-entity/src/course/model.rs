//! Course entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use classgate_core::types::{CourseId, UserId};

/// Price of a course, in integer minor units of `currency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in minor units (4900 = 49.00).
    pub amount: i64,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// A course learners can enroll in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique course identifier.
    pub id: CourseId,
    /// URL slug, unique across courses.
    pub slug: String,
    /// Course title.
    pub title: String,
    /// Instructor who owns the course.
    pub instructor_id: UserId,
    /// Price; absent for free courses.
    pub price: Option<Price>,
    /// When the course was created.
    pub created_at: DateTime<Utc>,
}

impl Course {
    /// A course is free when it has no price or a zero amount.
    pub fn is_free(&self) -> bool {
        self.price.as_ref().is_none_or(|p| p.amount == 0)
    }
}

/// Record that a learner finished a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseCompletion {
    /// The learner.
    pub user_id: UserId,
    /// The finished course.
    pub course_id: CourseId,
    /// When the course was completed.
    pub completed_at: DateTime<Utc>,
}
