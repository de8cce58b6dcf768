//! Progress reporting with cooperative cancellation

use enough::StopReason;

/// Caller-owned progress counters and callback
///
/// The callback receives `(done, total)` and returns `false` to cancel.
/// Cancellation is only observed at [`report`](Self::report) points, which
/// happen before any conversion or codec work.
pub struct ProgressContext<'a> {
    done: u32,
    total: u32,
    callback: &'a mut dyn FnMut(u32, u32) -> bool,
}

impl<'a> ProgressContext<'a> {
    pub fn new(total: u32, callback: &'a mut dyn FnMut(u32, u32) -> bool) -> Self {
        Self {
            done: 0,
            total,
            callback,
        }
    }

    /// Start from a non-zero count, for callers tracking several images
    pub fn with_done(mut self, done: u32) -> Self {
        self.done = done;
        self
    }

    pub fn done(&self) -> u32 {
        self.done
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Advance by one step and ask the callback whether to continue
    pub fn report(&mut self) -> Result<(), StopReason> {
        self.done = self.done.saturating_add(1);
        log::trace!("progress {}/{}", self.done, self.total);
        if (self.callback)(self.done, self.total) {
            Ok(())
        } else {
            Err(StopReason::Cancelled)
        }
    }
}

impl core::fmt::Debug for ProgressContext<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProgressContext")
            .field("done", &self.done)
            .field("total", &self.total)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_increments_before_callback() {
        let mut seen = Vec::new();
        let mut callback = |done: u32, total: u32| {
            seen.push((done, total));
            true
        };
        let mut progress = ProgressContext::new(3, &mut callback).with_done(1);
        progress.report().unwrap();
        assert_eq!(progress.done(), 2);
        drop(progress);
        assert_eq!(seen, [(2, 3)]);
    }

    #[test]
    fn false_means_cancelled() {
        let mut callback = |_: u32, _: u32| false;
        let mut progress = ProgressContext::new(1, &mut callback);
        assert!(matches!(progress.report(), Err(StopReason::Cancelled)));
        assert_eq!(progress.done(), 1);
    }
}
