//! Upload orchestration
//!
//! Admits candidate files as upload jobs and drives each job through its
//! three remote exchanges (allocate slot, transfer bytes, register) as an
//! independent task. Every state change is applied to the shared collection
//! under its write lock and addressed by [`JobId`], so jobs completing out of
//! order, or being removed mid-flight, never corrupt each other. A sequence
//! whose job has left the collection finishes its network work and then
//! discards its result.

pub mod collection;
pub mod progress;

pub use collection::JobCollection;

use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::{mpsc, watch, RwLock};

use voxagent_core::constants::ACCEPTED_EXTENSIONS;
use voxagent_core::{
    check_file_name, AttachmentService, CandidateFile, JobId, JobStatus, JobView,
    RegisterAttachmentRequest, UploadError, UploadJob, UploadStep,
};

use self::progress::forwarding_progress;

/// Inputs of one job's upload sequence, copied out at admission.
struct JobLaunch {
    id: JobId,
    name: String,
    size: u64,
    mime_type: String,
    payload: Bytes,
}

impl JobLaunch {
    fn from_job(job: &UploadJob) -> Self {
        Self {
            id: job.id(),
            name: job.name().to_string(),
            size: job.size_bytes(),
            mime_type: job.effective_mime_type().to_string(),
            payload: job.payload().cloned().unwrap_or_default(),
        }
    }
}

struct Inner {
    service: Arc<dyn AttachmentService>,
    jobs: RwLock<JobCollection>,
    /// Latest snapshot, republished after every mutation.
    views: watch::Sender<Vec<JobView>>,
    /// Number of upload sequences still running.
    in_flight: watch::Sender<usize>,
}

/// Decrements the in-flight count when a sequence ends, including by panic.
struct InFlightGuard(Arc<Inner>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0
            .in_flight
            .send_modify(|count| *count = count.saturating_sub(1));
    }
}

/// Manages the attachment upload jobs of one agent form.
#[derive(Clone)]
pub struct UploadOrchestrator {
    inner: Arc<Inner>,
}

impl UploadOrchestrator {
    pub fn new(service: Arc<dyn AttachmentService>) -> Self {
        let (views, _) = watch::channel(Vec::new());
        let (in_flight, _) = watch::channel(0);

        Self {
            inner: Arc::new(Inner {
                service,
                jobs: RwLock::new(JobCollection::new()),
                views,
                in_flight,
            }),
        }
    }

    /// Extensions (lowercase, without the dot) admitted by [`Self::submit_files`].
    pub fn accepted_extensions() -> &'static [&'static str] {
        ACCEPTED_EXTENSIONS
    }

    /// Admit candidates with an accepted extension as new jobs and start
    /// their uploads in the background.
    ///
    /// Other candidates are dropped without error. Admitted jobs are appended
    /// after existing ones in submission order. Returns the new job ids.
    /// Must be called from within a Tokio runtime.
    pub async fn submit_files<I>(&self, candidates: I) -> Vec<JobId>
    where
        I: IntoIterator<Item = CandidateFile>,
    {
        let admitted: Vec<UploadJob> = candidates
            .into_iter()
            .filter_map(|candidate| match check_file_name(&candidate.name) {
                Ok(()) => Some(UploadJob::new(candidate)),
                Err(err) => {
                    tracing::debug!(error = %err, "Skipping attachment candidate");
                    None
                }
            })
            .collect();

        if admitted.is_empty() {
            return Vec::new();
        }

        let launches: Vec<JobLaunch> = admitted.iter().map(JobLaunch::from_job).collect();
        {
            let mut jobs = self.inner.jobs.write().await;
            for job in admitted {
                jobs.push(job);
            }
            self.inner.views.send_replace(jobs.views());
        }

        let ids = launches.iter().map(|launch| launch.id).collect();
        for launch in launches {
            self.inner.in_flight.send_modify(|count| *count += 1);
            let guard = InFlightGuard(self.inner.clone());
            let orchestrator = self.clone();
            tokio::spawn(async move {
                let _guard = guard;
                orchestrator.run_job(launch).await;
            });
        }

        ids
    }

    /// Whether the job at `position` may be removed (exists and is not uploading).
    pub async fn can_remove(&self, position: usize) -> bool {
        let jobs = self.inner.jobs.read().await;
        jobs.at(position)
            .map(|job| job.status() != JobStatus::Uploading)
            .unwrap_or(false)
    }

    /// Remove the job at `position` and return its last view.
    ///
    /// Callers should check [`Self::can_remove`] first. An uploading job
    /// removed anyway keeps transferring; its outcome is discarded.
    pub async fn remove_job(&self, position: usize) -> Option<JobView> {
        let mut jobs = self.inner.jobs.write().await;
        let removed = jobs.remove_at(position)?;

        if removed.status() == JobStatus::Uploading {
            tracing::warn!(
                job_id = %removed.id(),
                file = removed.name(),
                "Removed an upload job while its transfer is in flight"
            );
        } else {
            tracing::debug!(job_id = %removed.id(), file = removed.name(), "Removed upload job");
        }

        self.inner.views.send_replace(jobs.views());
        Some(removed.view())
    }

    /// Discard every job. Sequences still running resolve as no-ops.
    pub async fn clear(&self) {
        let mut jobs = self.inner.jobs.write().await;
        jobs.clear();
        self.inner.views.send_replace(Vec::new());
    }

    /// Remote ids of completed jobs, in collection order.
    pub async fn confirmed_remote_ids(&self) -> Vec<String> {
        self.inner.jobs.read().await.confirmed_remote_ids()
    }

    /// Current job views in display order.
    pub async fn jobs(&self) -> Vec<JobView> {
        self.inner.jobs.read().await.views()
    }

    pub async fn job(&self, id: JobId) -> Option<JobView> {
        self.inner.jobs.read().await.get(id).map(UploadJob::view)
    }

    pub async fn len(&self) -> usize {
        self.inner.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.jobs.read().await.is_empty()
    }

    /// Any job still pending or uploading.
    pub async fn has_pending_uploads(&self) -> bool {
        let jobs = self.inner.jobs.read().await;
        jobs.count_with_status(JobStatus::Pending) + jobs.count_with_status(JobStatus::Uploading)
            > 0
    }

    pub async fn has_failed_uploads(&self) -> bool {
        self.inner
            .jobs
            .read()
            .await
            .count_with_status(JobStatus::Failed)
            > 0
    }

    /// Receive a fresh snapshot after every change to the collection.
    pub fn subscribe(&self) -> watch::Receiver<Vec<JobView>> {
        self.inner.views.subscribe()
    }

    /// Wait until every upload sequence started so far has finished.
    pub async fn wait_idle(&self) {
        let mut in_flight = self.inner.in_flight.subscribe();
        // The sender lives in `inner`, which `self` keeps alive.
        let _ = in_flight.wait_for(|count| *count == 0).await;
    }

    async fn run_job(self, launch: JobLaunch) {
        let id = launch.id;
        if self.update_job(id, UploadJob::start).await.is_none() {
            return;
        }
        tracing::info!(job_id = %id, file = %launch.name, size = launch.size, "Upload started");

        match self.upload_sequence(&launch).await {
            Ok(remote_id) => {
                if self
                    .update_job(id, |job| job.complete(remote_id.clone()))
                    .await
                    .is_some()
                {
                    tracing::info!(job_id = %id, remote_id = %remote_id, "Upload completed");
                }
            }
            Err(err) => {
                tracing::warn!(
                    job_id = %id,
                    file = %launch.name,
                    step = %err.step().map(|step| step.to_string()).unwrap_or_default(),
                    error = %err,
                    "Upload failed"
                );
                self.update_job(id, |job| job.fail(err.to_string())).await;
            }
        }
    }

    async fn upload_sequence(&self, launch: &JobLaunch) -> Result<String, UploadError> {
        let service = &self.inner.service;

        let slot = service
            .allocate_upload_slot()
            .await
            .map_err(|e| UploadError::at_step(UploadStep::Allocate, &e))?;
        self.update_job(launch.id, |job| job.assign_storage_key(slot.key.clone()))
            .await;

        let (sender, mut receiver) = mpsc::unbounded_channel();
        let transfer = service.transfer(
            &slot.signed_url,
            launch.payload.clone(),
            Some(forwarding_progress(sender)),
        );
        tokio::pin!(transfer);

        let transferred = loop {
            tokio::select! {
                biased;
                Some(percent) = receiver.recv() => {
                    self.update_job(launch.id, |job| job.record_progress(percent)).await;
                }
                result = &mut transfer => break result,
            }
        };
        while let Ok(percent) = receiver.try_recv() {
            self.update_job(launch.id, |job| job.record_progress(percent))
                .await;
        }
        transferred.map_err(|e| UploadError::at_step(UploadStep::Transfer, &e))?;
        self.update_job(launch.id, |job| job.record_progress(100))
            .await;

        let request = RegisterAttachmentRequest {
            key: slot.key.clone(),
            file_name: launch.name.clone(),
            file_size: launch.size,
            mime_type: launch.mime_type.clone(),
        };
        let attachment = service
            .register_attachment(&request)
            .await
            .map_err(|e| UploadError::at_step(UploadStep::Register, &e))?;

        Ok(attachment.id)
    }

    /// Apply `mutate` to the job with this id and publish a new snapshot.
    ///
    /// Returns `None` when the job is no longer in the collection or the
    /// change was rejected as an illegal transition.
    async fn update_job<F, T>(&self, id: JobId, mutate: F) -> Option<T>
    where
        F: FnOnce(&mut UploadJob) -> Result<T, UploadError>,
    {
        let mut jobs = self.inner.jobs.write().await;
        let Some(job) = jobs.get_mut(id) else {
            tracing::debug!(job_id = %id, "Upload job no longer tracked, discarding update");
            return None;
        };

        match mutate(job) {
            Ok(value) => {
                self.inner.views.send_replace(jobs.views());
                Some(value)
            }
            Err(err) => {
                tracing::error!(job_id = %id, error = %err, "Rejected upload job update");
                debug_assert!(false, "rejected upload job update: {}", err);
                None
            }
        }
    }
}
