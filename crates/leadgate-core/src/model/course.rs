// ── Course reference types ──
//
// Courses are owned elsewhere (the catalog/admin side). The guard only
// needs to know whether one can be enrolled in and what it costs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Course primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub u64);

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CourseId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<u64> for CourseId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// The slice of a course the guard consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRef {
    pub id: CourseId,
    pub price: Decimal,
    pub is_active: bool,
}

/// A catalog course as stored.
///
/// `students_enrolled` is a denormalized counter; stores bump it with an
/// atomic increment, never by writing back a value read earlier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    #[serde(default)]
    pub title: String,
    pub price: Decimal,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub students_enrolled: u64,
}

fn default_active() -> bool {
    true
}

impl Course {
    pub fn course_ref(&self) -> CourseRef {
        CourseRef {
            id: self.id,
            price: self.price,
            is_active: self.is_active,
        }
    }
}

/// Aggregate counters shown on the catalog page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseStat {
    pub total_courses: u64,
    pub total_students: u64,
}
