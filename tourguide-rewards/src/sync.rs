//! Counting barrier shared by fire-and-forget jobs and the callers that
//! eventually wait for them.

use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// Tracks outstanding jobs; waiters block until the count drops to zero.
#[derive(Debug, Default)]
pub(crate) struct WaitGroup {
    outstanding: Mutex<usize>,
    idle: Condvar,
}

impl WaitGroup {
    pub(crate) fn new(outstanding: usize) -> Self {
        Self {
            outstanding: Mutex::new(outstanding),
            idle: Condvar::new(),
        }
    }

    /// Mark one job as finished, waking waiters when none remain.
    pub(crate) fn done(&self) {
        let mut outstanding = self.outstanding.lock();
        *outstanding = outstanding.saturating_sub(1);
        if *outstanding == 0 {
            self.idle.notify_all();
        }
    }

    pub(crate) fn outstanding(&self) -> usize {
        *self.outstanding.lock()
    }

    /// Block until every job has finished.
    pub(crate) fn wait(&self) {
        let mut outstanding = self.outstanding.lock();
        while *outstanding > 0 {
            self.idle.wait(&mut outstanding);
        }
    }

    /// Block until every job has finished or `timeout` elapses. Returns
    /// whether the group is idle.
    pub(crate) fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut outstanding = self.outstanding.lock();
        if *outstanding > 0 {
            self.idle
                .wait_while_for(&mut outstanding, |remaining| *remaining > 0, timeout)
                .timed_out();
        }
        *outstanding == 0
    }
}

/// Marks its job done when dropped, so a panicking job still releases the
/// barrier.
pub(crate) struct DoneGuard<'a>(pub(crate) &'a WaitGroup);

impl Drop for DoneGuard<'_> {
    fn drop(&mut self) {
        self.0.done();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use std::thread;

    #[rstest]
    fn empty_group_does_not_block() {
        let group = WaitGroup::new(0);
        group.wait();
        assert!(group.wait_timeout(Duration::ZERO));
    }

    #[rstest]
    fn waits_for_every_job() {
        let group = Arc::new(WaitGroup::new(3));
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let group = Arc::clone(&group);
                thread::spawn(move || {
                    let _done = DoneGuard(&group);
                })
            })
            .collect();
        group.wait();
        assert_eq!(group.outstanding(), 0);
        for handle in handles {
            handle.join().expect("job thread");
        }
    }

    #[rstest]
    fn timeout_reports_outstanding_jobs() {
        let group = WaitGroup::new(1);
        assert!(!group.wait_timeout(Duration::from_millis(10)));
        group.done();
        assert!(group.wait_timeout(Duration::from_millis(10)));
    }
}
