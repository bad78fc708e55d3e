//! Ordered upload job collection keyed by job identity.

use voxagent_core::{JobId, JobStatus, JobView, UploadJob};

/// Jobs in display order. Positions shift on removal; identities never do,
/// so asynchronous updates always address jobs by [`JobId`].
#[derive(Debug, Default)]
pub struct JobCollection {
    jobs: Vec<UploadJob>,
}

impl JobCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Append after every existing job.
    pub fn push(&mut self, job: UploadJob) {
        self.jobs.push(job);
    }

    pub fn get(&self, id: JobId) -> Option<&UploadJob> {
        self.jobs.iter().find(|job| job.id() == id)
    }

    pub fn get_mut(&mut self, id: JobId) -> Option<&mut UploadJob> {
        self.jobs.iter_mut().find(|job| job.id() == id)
    }

    pub fn at(&self, position: usize) -> Option<&UploadJob> {
        self.jobs.get(position)
    }

    pub fn position_of(&self, id: JobId) -> Option<usize> {
        self.jobs.iter().position(|job| job.id() == id)
    }

    /// Remove the job at `position`, keeping the relative order of the rest.
    pub fn remove_at(&mut self, position: usize) -> Option<UploadJob> {
        if position < self.jobs.len() {
            Some(self.jobs.remove(position))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &UploadJob> {
        self.jobs.iter()
    }

    pub fn views(&self) -> Vec<JobView> {
        self.jobs.iter().map(UploadJob::view).collect()
    }

    /// Remote ids of completed jobs, in collection order.
    pub fn confirmed_remote_ids(&self) -> Vec<String> {
        self.jobs
            .iter()
            .filter_map(|job| job.remote_id().map(str::to_string))
            .collect()
    }

    pub fn count_with_status(&self, status: JobStatus) -> usize {
        self.jobs.iter().filter(|job| job.status() == status).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxagent_core::CandidateFile;

    fn collection_of(names: &[&str]) -> JobCollection {
        let mut jobs = JobCollection::new();
        for name in names {
            jobs.push(UploadJob::new(CandidateFile::new(name.to_string(), "x")));
        }
        jobs
    }

    fn names(jobs: &JobCollection) -> Vec<String> {
        jobs.iter().map(|job| job.name().to_string()).collect()
    }

    #[test]
    fn test_remove_keeps_relative_order() {
        let mut jobs = collection_of(&["a.pdf", "b.pdf", "c.pdf", "d.pdf"]);
        let b = jobs.at(1).unwrap().id();
        let d = jobs.at(3).unwrap().id();

        let removed = jobs.remove_at(2).unwrap();
        assert_eq!(removed.name(), "c.pdf");
        assert_eq!(names(&jobs), vec!["a.pdf", "b.pdf", "d.pdf"]);
        assert_eq!(jobs.position_of(b), Some(1));
        assert_eq!(jobs.position_of(d), Some(2));
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut jobs = collection_of(&["a.pdf"]);
        assert!(jobs.remove_at(1).is_none());
        assert_eq!(jobs.len(), 1);
    }

    #[test]
    fn test_keyed_lookup_survives_removal() {
        let mut jobs = collection_of(&["a.pdf", "b.pdf"]);
        let a = jobs.at(0).unwrap().id();
        let b = jobs.at(1).unwrap().id();

        jobs.remove_at(0);
        assert!(jobs.get(a).is_none());
        assert!(jobs.get_mut(a).is_none());
        assert_eq!(jobs.get(b).unwrap().name(), "b.pdf");
    }

    #[test]
    fn test_confirmed_remote_ids_in_order() {
        let mut jobs = collection_of(&["a.pdf", "b.pdf", "c.pdf"]);
        let ids: Vec<_> = jobs.iter().map(UploadJob::id).collect();

        for id in &ids {
            jobs.get_mut(*id).unwrap().start().unwrap();
        }
        jobs.get_mut(ids[2]).unwrap().complete("att-c".to_string()).unwrap();
        jobs.get_mut(ids[1]).unwrap().fail("boom".to_string()).unwrap();
        jobs.get_mut(ids[0]).unwrap().complete("att-a".to_string()).unwrap();

        assert_eq!(jobs.confirmed_remote_ids(), vec!["att-a", "att-c"]);
        assert_eq!(jobs.count_with_status(JobStatus::Completed), 2);
        assert_eq!(jobs.count_with_status(JobStatus::Failed), 1);
    }
}
