// ── Project request domain types ──
//
// Custom-build requests against the project catalog. A request may point
// at a catalog project or leave it blank and describe something new.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{Display, EnumString};

use super::contact::EmailAddress;

/// Catalog project primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProjectId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectRequestId(pub u64);

impl fmt::Display for ProjectRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProjectCategory {
    Web,
    Mobile,
    Desktop,
    Ai,
    Iot,
    Data,
    #[default]
    Other,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProjectRequestStatus {
    #[default]
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

/// The slice of a project the guard consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: ProjectId,
    pub is_available: bool,
}

/// A catalog project as stored. Prices are list prices for the full
/// build and for the documentation and coding parts sold separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: ProjectCategory,
    #[serde(default = "default_price")]
    pub price: Decimal,
    #[serde(default = "default_documentation_price")]
    pub documentation_price: Decimal,
    #[serde(default = "default_coding_price")]
    pub coding_price: Decimal,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_price() -> Decimal {
    Decimal::new(150_000, 2)
}

fn default_documentation_price() -> Decimal {
    Decimal::new(50_000, 2)
}

fn default_coding_price() -> Decimal {
    Decimal::new(100_000, 2)
}

fn default_available() -> bool {
    true
}

impl Project {
    pub fn project_ref(&self) -> ProjectRef {
        ProjectRef {
            id: self.id,
            is_available: self.is_available,
        }
    }
}

// ── Submission ──────────────────────────────────────────────────────

/// A project-request form as submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRequestSubmission {
    /// Blank for a custom project.
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    #[serde(default)]
    pub custom_title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
}

// ── Records ─────────────────────────────────────────────────────────

/// An accepted request, ready to insert. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProjectRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
    pub custom_title: String,
    pub description: String,
    /// Compacted digits, checked by `normalize_project_phone`.
    pub phone_number: String,
    pub email: EmailAddress,
    #[serde(default)]
    pub status: ProjectRequestStatus,
    pub created_at: DateTime<Utc>,
}

impl NewProjectRequest {
    pub fn with_id(self, id: ProjectRequestId) -> ProjectRequest {
        ProjectRequest { id, request: self }
    }
}

/// A project request as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRequest {
    pub id: ProjectRequestId,
    #[serde(flatten)]
    pub request: NewProjectRequest,
}
