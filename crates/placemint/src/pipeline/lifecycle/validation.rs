use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::super::domain::{
    JobApplication, JobCandidate, JobDraft, JobPatch, OwnerId, Stage,
};

/// Rejections raised while validating caller input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    #[error("ownerId is required")]
    MissingOwner,
    #[error(
        "unknown stage '{value}' (expected one of ToApply, Applied, Interviewing, Offered, Rejected)"
    )]
    InvalidStage { value: String },
    #[error("{field} cannot be changed after creation")]
    ImmutableField { field: &'static str },
    #[error("deadline '{value}' is not a valid date (expected YYYY-MM-DD or RFC 3339)")]
    InvalidDeadline { value: String },
}

const LOCAL_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse a deadline supplied by a client. Blank input means "no deadline"; bare dates are
/// taken as midnight UTC.
pub fn parse_deadline(raw: &str) -> Result<Option<DateTime<Utc>>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(timestamp.with_timezone(&Utc)));
    }

    for format in LOCAL_DATETIME_FORMATS {
        if let Ok(local) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(Some(local.and_utc()));
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Some(midnight.and_utc()))
        .ok_or_else(|| ValidationError::InvalidDeadline {
            value: raw.to_string(),
        })
}

fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyField { field })
    } else {
        Ok(trimmed.to_string())
    }
}

fn parse_stage(raw: &str) -> Result<Stage, ValidationError> {
    raw.trim().parse::<Stage>().map_err(|_| ValidationError::InvalidStage {
        value: raw.to_string(),
    })
}

pub(super) fn validate_candidate(
    candidate: JobCandidate,
    now: DateTime<Utc>,
) -> Result<JobDraft, ValidationError> {
    let company = require_text("company", &candidate.company)?;
    let role = require_text("role", &candidate.role)?;
    let owner_id = candidate
        .owner_id
        .as_deref()
        .and_then(OwnerId::parse)
        .ok_or(ValidationError::MissingOwner)?;

    let stage = match candidate.stage.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => parse_stage(raw)?,
        _ => Stage::default(),
    };

    let deadline = match candidate.deadline.as_deref() {
        Some(raw) => parse_deadline(raw)?,
        None => None,
    };

    Ok(JobDraft {
        owner_id,
        company,
        role,
        notes: candidate.notes.unwrap_or_default(),
        deadline,
        stage,
        created_at: now,
    })
}

pub(super) fn merge_patch(
    existing: &JobApplication,
    patch: JobPatch,
) -> Result<JobApplication, ValidationError> {
    if let Some(id) = patch.id.as_deref() {
        if id.trim() != existing.id.0 {
            return Err(ValidationError::ImmutableField { field: "id" });
        }
    }

    if let Some(owner) = patch.owner_id.as_deref() {
        if owner.trim() != existing.owner_id.as_str() {
            return Err(ValidationError::ImmutableField { field: "ownerId" });
        }
    }

    if let Some(created_at) = patch.created_at.as_deref() {
        let unchanged = DateTime::parse_from_rfc3339(created_at.trim())
            .map(|timestamp| timestamp.with_timezone(&Utc) == existing.created_at)
            .unwrap_or(false);
        if !unchanged {
            return Err(ValidationError::ImmutableField { field: "createdAt" });
        }
    }

    let mut merged = existing.clone();

    if let Some(company) = patch.company.as_deref() {
        merged.company = require_text("company", company)?;
    }
    if let Some(role) = patch.role.as_deref() {
        merged.role = require_text("role", role)?;
    }
    if let Some(notes) = patch.notes {
        merged.notes = notes;
    }
    match patch.deadline {
        Some(Some(raw)) => merged.deadline = parse_deadline(&raw)?,
        Some(None) => merged.deadline = None,
        None => {}
    }
    if let Some(raw) = patch.stage.as_deref() {
        let next = parse_stage(raw)?;
        if !existing.stage.can_transition_to(next) {
            return Err(ValidationError::InvalidStage {
                value: raw.to_string(),
            });
        }
        merged.stage = next;
    }

    Ok(merged)
}
