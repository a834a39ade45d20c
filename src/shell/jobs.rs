use crate::log::user_warn;
use crate::system::{self, interface::ProcessId, signal::consts::SIGTERM};

/// A tracked background child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Job {
    pid: ProcessId,
}

impl Job {
    pub(crate) fn new(pid: ProcessId) -> Self {
        Self { pid }
    }

    pub(crate) fn pid(&self) -> ProcessId {
        self.pid
    }
}

/// Insertion-ordered registry of live background jobs.
///
/// Owned and mutated by the dispatch loop only; there is no thread-level
/// concurrency in the shell, so no locking is needed.
#[derive(Debug, Default)]
pub(crate) struct JobList {
    jobs: Vec<Job>,
}

impl JobList {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert a job at the tail.
    pub(crate) fn push(&mut self, job: Job) {
        debug_assert!(!self.jobs.contains(&job), "duplicate live PID");
        self.jobs.push(job);
    }

    /// Remove the job with the given PID; a no-op when it is not present.
    pub(crate) fn remove(&mut self, pid: ProcessId) {
        if let Some(index) = self.jobs.iter().position(|job| job.pid() == pid) {
            self.jobs.remove(index);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Send SIGTERM to every remaining job, in insertion order, without
    /// waiting for any of them to actually exit.
    pub(crate) fn terminate_all(&self) {
        for job in &self.jobs {
            if let Err(err) = system::kill(job.pid(), SIGTERM) {
                user_warn!("cannot terminate background PID {}: {err}", job.pid());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Job, JobList};
    use crate::system::interface::ProcessId;
    use pretty_assertions::assert_eq;

    fn job(pid: i32) -> Job {
        Job::new(ProcessId::new(pid))
    }

    #[test]
    fn push_and_remove_by_exact_match() {
        let mut jobs = JobList::new();
        assert!(jobs.is_empty());

        jobs.push(job(100));
        jobs.push(job(200));
        jobs.push(job(300));
        assert_eq!(jobs.len(), 3);

        jobs.remove(ProcessId::new(200));
        assert_eq!(jobs.len(), 2);

        // removing an absent PID is a no-op
        jobs.remove(ProcessId::new(200));
        assert_eq!(jobs.len(), 2);

        jobs.remove(ProcessId::new(100));
        jobs.remove(ProcessId::new(300));
        assert!(jobs.is_empty());
    }

    #[test]
    fn preserves_insertion_order() {
        let mut jobs = JobList::new();
        jobs.push(job(3));
        jobs.push(job(1));
        jobs.push(job(2));

        let pids: Vec<i32> = jobs.jobs.iter().map(|job| job.pid().get()).collect();
        assert_eq!(pids, vec![3, 1, 2]);
    }
}
