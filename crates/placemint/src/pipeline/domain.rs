use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::lifecycle::{deadline_status, Urgency, ValidationError};

/// Store-assigned identifier for a tracked application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque, already-authenticated identity of the user owning a record.
///
/// Construction trims the raw value and refuses blank identifiers, so a held `OwnerId` always
/// names somebody.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);

impl OwnerId {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for OwnerId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or(ValidationError::MissingOwner)
    }
}

impl From<OwnerId> for String {
    fn from(value: OwnerId) -> Self {
        value.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pipeline stage an application currently occupies.
///
/// Stages form an unordered graph: any stage may move to any other, including back out of
/// `Rejected`, because users routinely correct a status after the fact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Stage {
    #[default]
    ToApply,
    Applied,
    Interviewing,
    Offered,
    Rejected,
}

impl Stage {
    /// Board order, left to right.
    pub const fn ordered() -> [Self; 5] {
        [
            Self::ToApply,
            Self::Applied,
            Self::Interviewing,
            Self::Offered,
            Self::Rejected,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToApply => "ToApply",
            Self::Applied => "Applied",
            Self::Interviewing => "Interviewing",
            Self::Offered => "Offered",
            Self::Rejected => "Rejected",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ToApply => "To Apply",
            Self::Applied => "Applied",
            Self::Interviewing => "Interviewing",
            Self::Offered => "Offered",
            Self::Rejected => "Rejected",
        }
    }

    pub const fn can_transition_to(self, _next: Stage) -> bool {
        true
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = ValidationError;

    /// Accepts variant names, display labels and snake_case, ignoring case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "toapply" => Ok(Self::ToApply),
            "applied" => Ok(Self::Applied),
            "interviewing" => Ok(Self::Interviewing),
            "offered" => Ok(Self::Offered),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ValidationError::InvalidStage {
                value: value.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Stage {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A tracked job or internship application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: JobId,
    #[serde(alias = "userId")]
    pub owner_id: OwnerId,
    pub company: String,
    pub role: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(alias = "status")]
    pub stage: Stage,
    pub created_at: DateTime<Utc>,
}

impl JobApplication {
    pub fn is_owned_by(&self, owner: &OwnerId) -> bool {
        &self.owner_id == owner
    }

    pub fn view(&self, now: DateTime<Utc>) -> JobView {
        let status = deadline_status(self.deadline, now);
        JobView {
            job: self.clone(),
            days_remaining: status.days_remaining,
            urgency: status.urgency,
        }
    }
}

/// Validated application that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDraft {
    pub owner_id: OwnerId,
    pub company: String,
    pub role: String,
    pub notes: String,
    pub deadline: Option<DateTime<Utc>>,
    pub stage: Stage,
    pub created_at: DateTime<Utc>,
}

impl JobDraft {
    pub fn into_record(self, id: JobId) -> JobApplication {
        JobApplication {
            id,
            owner_id: self.owner_id,
            company: self.company,
            role: self.role,
            notes: self.notes,
            deadline: self.deadline,
            stage: self.stage,
            created_at: self.created_at,
        }
    }
}

/// Raw creation input as supplied by a caller. Nothing here is trusted until the lifecycle
/// engine has validated it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCandidate {
    #[serde(default, alias = "userId", skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, alias = "status", skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

impl JobCandidate {
    pub fn new(company: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            role: role.into(),
            ..Self::default()
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline.to_rfc3339());
        self
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = Some(stage.as_str().to_string());
        self
    }
}

/// Partial update. Absent fields are left untouched; `deadline: null` clears the deadline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, alias = "userId")]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable")]
    pub deadline: Option<Option<String>>,
    #[serde(default, alias = "status")]
    pub stage: Option<String>,
}

impl JobPatch {
    pub fn stage(stage: Stage) -> Self {
        Self {
            stage: Some(stage.as_str().to_string()),
            ..Self::default()
        }
    }

    pub fn clear_deadline(mut self) -> Self {
        self.deadline = Some(None);
        self
    }
}

fn deserialize_nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Record as exposed to readers, carrying the deadline figures computed at read time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    #[serde(flatten)]
    pub job: JobApplication,
    pub days_remaining: Option<i64>,
    pub urgency: Urgency,
}
