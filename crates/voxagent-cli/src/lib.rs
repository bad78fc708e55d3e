use anyhow::Context;
use std::collections::HashMap;
use std::path::Path;

use voxagent_core::constants::PHONE_NUMBER_REQUIRED_MESSAGE;
use voxagent_core::{
    file_extension, mime_type_for_extension, CandidateFile, JobId, JobStatus, JobView,
    TestCallData,
};
use voxagent_services::UploadOrchestrator;

/// Truncate to `max_chars` characters, appending "..." if truncated.
pub fn truncate_name(name: &str, max_chars: usize) -> String {
    if name.chars().count() <= max_chars {
        name.to_string()
    } else {
        let kept: String = name.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// One status line for an upload job.
pub fn progress_line(view: &JobView) -> String {
    let name = truncate_name(&view.name, 32);
    match view.status {
        JobStatus::Pending => format!("{:<32}  pending", name),
        JobStatus::Uploading => format!(
            "{:<32}  uploading {:>3}%",
            name,
            view.progress.unwrap_or_default()
        ),
        JobStatus::Completed => format!(
            "{:<32}  completed ({})",
            name,
            view.remote_id.as_deref().unwrap_or_default()
        ),
        JobStatus::Failed => format!(
            "{:<32}  failed: {}",
            name,
            view.error.as_deref().unwrap_or_default()
        ),
    }
}

/// Read a local file as an upload candidate, typed by its extension.
pub async fn read_candidate(path: &Path) -> anyhow::Result<CandidateFile> {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file path: {}", path.display()))?;
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let candidate = CandidateFile::new(name.clone(), data);
    Ok(
        match file_extension(&name).and_then(|ext| mime_type_for_extension(&ext)) {
            Some(mime_type) => candidate.with_mime_type(mime_type),
            None => candidate,
        },
    )
}

/// Upload `paths`, printing a line to stderr whenever a job's status changes,
/// and return the final job views.
pub async fn upload_paths<P: AsRef<Path>>(
    orchestrator: &UploadOrchestrator,
    paths: &[P],
) -> anyhow::Result<Vec<JobView>> {
    let mut candidates = Vec::with_capacity(paths.len());
    for path in paths {
        candidates.push(read_candidate(path.as_ref()).await?);
    }

    let offered = candidates.len();
    let ids = orchestrator.submit_files(candidates).await;
    if ids.len() < offered {
        tracing::warn!(
            skipped = offered - ids.len(),
            accepted = ?UploadOrchestrator::accepted_extensions(),
            "Skipped files with unsupported extensions"
        );
    }

    follow_uploads(orchestrator).await;
    Ok(orchestrator.jobs().await)
}

async fn follow_uploads(orchestrator: &UploadOrchestrator) {
    let mut views = orchestrator.subscribe();
    let mut printed: HashMap<JobId, String> = HashMap::new();
    let mut report = |snapshot: &[JobView]| {
        for view in snapshot {
            let line = progress_line(view);
            if printed.get(&view.id) != Some(&line) {
                eprintln!("{}", line);
                printed.insert(view.id, line);
            }
        }
    };

    let idle = orchestrator.wait_idle();
    tokio::pin!(idle);
    loop {
        tokio::select! {
            _ = &mut idle => break,
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = views.borrow_and_update().clone();
                report(&snapshot);
            }
        }
    }
    let snapshot = views.borrow().clone();
    report(&snapshot);
}

/// Test-call recipient from command-line arguments. The phone number is required.
pub fn test_call_data(
    phone_number: String,
    first_name: String,
    last_name: String,
    gender: String,
) -> anyhow::Result<TestCallData> {
    if phone_number.trim().is_empty() {
        anyhow::bail!(PHONE_NUMBER_REQUIRED_MESSAGE);
    }
    Ok(TestCallData {
        first_name,
        last_name,
        gender,
        phone_number,
    })
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}
