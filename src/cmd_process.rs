//! Process and job command handlers.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use s2gos_jobs::LocalService;
use s2gos_protocols::{ExecuteRequest, JobStatus, ProcessService};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) async fn handle_info(service: &LocalService) -> Result<(), Box<dyn std::error::Error>> {
    print_json(&service.landing_page().await)
}

pub(crate) async fn handle_conformance(
    service: &LocalService,
) -> Result<(), Box<dyn std::error::Error>> {
    print_json(&service.conformance().await)
}

pub(crate) async fn handle_processes(
    service: &LocalService,
) -> Result<(), Box<dyn std::error::Error>> {
    let processes = service.list_processes().await;
    if processes.is_empty() {
        println!("No processes registered.");
        return Ok(());
    }

    println!("{:<20} {:<10} {:<20} {}", "ID", "VERSION", "TITLE", "DESCRIPTION");
    println!("{}", "-".repeat(80));
    for process in processes {
        let description = process
            .description
            .as_deref()
            .and_then(|d| d.lines().next())
            .unwrap_or("");
        println!(
            "{:<20} {:<10} {:<20} {}",
            process.id,
            process.version,
            process.title.as_deref().unwrap_or("-"),
            description
        );
    }
    Ok(())
}

pub(crate) async fn handle_describe(
    service: &LocalService,
    process_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    print_json(&service.describe_process(process_id).await?)
}

/// Execute a process, follow its progress on stderr and print its results.
///
/// Ctrl-C dismisses the job.
pub(crate) async fn handle_run(
    service: &LocalService,
    process_id: &str,
    inputs: Vec<(String, Value)>,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = inputs
        .into_iter()
        .fold(ExecuteRequest::new(), |request, (name, value)| {
            request.with_input(name, value)
        });
    let job_id = service.execute(process_id, request).await?.job_id;
    eprintln!("Job {} accepted", job_id);

    let mut last_report = (None, None);
    let status = loop {
        let status = service.get_status(&job_id).await?;
        let report = (status.progress, status.message.clone());
        if report != last_report && !status.status.is_terminal() {
            match (&report.0, &report.1) {
                (Some(progress), Some(message)) => eprintln!("[{:>3}%] {}", progress, message),
                (Some(progress), None) => eprintln!("[{:>3}%]", progress),
                (None, Some(message)) => eprintln!("       {}", message),
                (None, None) => {}
            }
            last_report = report;
        }
        if status.status.is_terminal() {
            break status;
        }

        tokio::select! {
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
            _ = tokio::signal::ctrl_c() => {
                warn!(job_id = %job_id, "Interrupted, dismissing job");
                service.dismiss(&job_id).await?;
            }
        }
    };

    match status.status {
        JobStatus::Successful => print_json(&service.get_result(&job_id).await?),
        JobStatus::Failed => Err(format!(
            "Job {} failed: {}",
            job_id,
            status.message.unwrap_or_default()
        )
        .into()),
        _ => Err(format!("Job {} was dismissed", job_id).into()),
    }
}
