use chrono::{DateTime, Utc};
use serde::Serialize;

use super::super::domain::{JobApplication, JobView, Stage};

/// Aggregate figures for one owner's pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStats {
    pub total: usize,
    pub interview_count: usize,
    pub offer_count: usize,
    /// Offers as a percentage of all tracked applications, one decimal place.
    pub success_rate: f64,
    pub stage_counts: Vec<StageCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageCount {
    pub stage: Stage,
    pub label: &'static str,
    pub count: usize,
}

pub fn compute_stats(records: &[JobApplication]) -> PipelineStats {
    let stage_counts: Vec<StageCount> = Stage::ordered()
        .into_iter()
        .map(|stage| StageCount {
            stage,
            label: stage.label(),
            count: records.iter().filter(|record| record.stage == stage).count(),
        })
        .collect();

    let count_of = |stage: Stage| {
        stage_counts
            .iter()
            .find(|entry| entry.stage == stage)
            .map(|entry| entry.count)
            .unwrap_or(0)
    };

    let total = records.len();
    let offer_count = count_of(Stage::Offered);

    PipelineStats {
        total,
        interview_count: count_of(Stage::Interviewing),
        offer_count,
        success_rate: success_rate(offer_count, total),
        stage_counts,
    }
}

fn success_rate(offers: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = offers as f64 / total as f64 * 100.0;
    (percent * 10.0).round() / 10.0
}

/// Case-insensitive match of `term` against company or role. Blank terms match everything.
pub fn matches_search(record: &JobApplication, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    record.company.to_lowercase().contains(&needle) || record.role.to_lowercase().contains(&needle)
}

/// One Kanban column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardColumn {
    pub stage: Stage,
    pub label: &'static str,
    pub jobs: Vec<JobView>,
}

/// Group records into one column per stage, in board order, keeping the input order inside each
/// column.
pub fn board(records: &[JobApplication], now: DateTime<Utc>) -> Vec<BoardColumn> {
    Stage::ordered()
        .into_iter()
        .map(|stage| BoardColumn {
            stage,
            label: stage.label(),
            jobs: records
                .iter()
                .filter(|record| record.stage == stage)
                .map(|record| record.view(now))
                .collect(),
        })
        .collect()
}
