use crate::infra::parse_timestamp;
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use placemint::error::AppError;
use placemint::pipeline::{
    deadline_status, lifecycle::parse_deadline, InMemoryJobStore, JobCandidate, JobPatch,
    JobStore, OwnerId, PipelineService, PipelineStats, Stage, Urgency,
};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Identity the sample jobs are created for.
    #[arg(long, default_value = "demo-user")]
    pub(crate) owner: String,
}

#[derive(Args, Debug)]
pub(crate) struct DeadlineArgs {
    /// Deadline as YYYY-MM-DD or an RFC 3339 timestamp.
    #[arg(long)]
    pub(crate) deadline: String,
    /// Reference instant (defaults to now).
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let owner = OwnerId::parse(&args.owner)
        .ok_or_else(|| AppError::Input("--owner must not be blank".to_string()))?;
    let service = PipelineService::new(Arc::new(InMemoryJobStore::new()));
    let stats = seed_pipeline(&service, &owner)?;
    let now = service.now();

    println!("Placemint pipeline demo for {owner}");
    for job in service.list_jobs(&owner, None)? {
        let view = job.view(now);
        println!(
            "  {:<10} {:<24} {:<12} {}",
            job.company,
            job.role,
            job.stage.label(),
            describe_deadline(view.days_remaining, view.urgency)
        );
    }

    println!(
        "\nTotal: {}  Interviewing: {}  Offers: {}  Success rate: {:.1}%",
        stats.total, stats.interview_count, stats.offer_count, stats.success_rate
    );

    println!("\nBoard:");
    for column in service.job_board(&owner, None)? {
        let companies: Vec<&str> = column
            .jobs
            .iter()
            .map(|view| view.job.company.as_str())
            .collect();
        println!("  {:<12} {}", column.label, companies.join(", "));
    }

    match serde_json::to_string_pretty(&stats) {
        Ok(json) => println!("\nStats payload:\n{json}"),
        Err(err) => println!("\nStats payload unavailable: {err}"),
    }

    Ok(())
}

fn seed_pipeline<S>(
    service: &PipelineService<S>,
    owner: &OwnerId,
) -> Result<PipelineStats, AppError>
where
    S: JobStore + 'static,
{
    let now = service.now();
    let samples = [
        ("Acme", "SWE Intern", Some(now + Duration::hours(12)), Stage::Offered),
        ("Globex", "Data Intern", Some(now + Duration::days(9)), Stage::Interviewing),
        ("Initech", "QA Intern", Some(now - Duration::days(2)), Stage::Rejected),
        ("Umbrella", "Platform Intern", None, Stage::ToApply),
    ];

    for (company, role, deadline, stage) in samples {
        let mut candidate = JobCandidate::new(company, role);
        if let Some(deadline) = deadline {
            candidate = candidate.with_deadline(deadline);
        }
        let job = service.create_job(owner, candidate)?;
        if stage != Stage::ToApply {
            service.update_job_stage(owner, &job.id, JobPatch::stage(stage))?;
        }
    }

    Ok(service.job_stats(owner)?)
}

pub(crate) fn run_deadline(args: DeadlineArgs) -> Result<(), AppError> {
    let deadline = parse_deadline(&args.deadline)?;
    let now = args.now.unwrap_or_else(Utc::now);
    let status = deadline_status(deadline, now);

    println!("Reference time: {}", now.to_rfc3339());
    println!(
        "Deadline: {}",
        describe_deadline(status.days_remaining, status.urgency)
    );
    Ok(())
}

fn describe_deadline(days_remaining: Option<i64>, urgency: Urgency) -> String {
    match days_remaining {
        None => "no deadline".to_string(),
        Some(days) if days <= 0 => format!("passed ({})", urgency.label()),
        Some(1) => format!("1 day left ({})", urgency.label()),
        Some(days) => format!("{days} days left ({})", urgency.label()),
    }
}
