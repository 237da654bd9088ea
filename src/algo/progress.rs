//! Progress reporting for mesh generation.
//!
//! Generation runs in four stages, one per entity dimension. Each stage
//! reports once per entity it meshes, so a caller can drive a progress bar
//! without knowing how many entities of each kind the geometry holds.
//!
//! # Example
//!
//! ```
//! use blockmesh::algo::progress::Progress;
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//! progress.report(Progress::stage_step(1, 0, 4), Progress::STAGE_TOTAL, "Meshing edges");
//! ```

/// A progress callback that receives updates during generation.
///
/// The callback receives the current step, the total number of steps and a
/// description of the stage being worked on.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Number of steps per generation stage.
    pub const STAGE_SCALE: usize = 1000;

    /// Total step count across the four stages.
    pub const STAGE_TOTAL: usize = 4 * Self::STAGE_SCALE;

    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Step reached after `done` of `count` entities in stage `stage`
    /// (0 = points, 3 = volumes).
    pub fn stage_step(stage: usize, done: usize, count: usize) -> usize {
        let fraction = if count == 0 {
            Self::STAGE_SCALE
        } else {
            done * Self::STAGE_SCALE / count
        };
        stage * Self::STAGE_SCALE + fraction
    }

    /// Report `done` of `count` entities finished within `stage`.
    #[inline]
    pub fn report_stage(&self, stage: usize, done: usize, count: usize, message: &str) {
        self.report(Self::stage_step(stage, done, count), Self::STAGE_TOTAL, message);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_stage_steps() {
        assert_eq!(Progress::stage_step(0, 0, 10), 0);
        assert_eq!(Progress::stage_step(1, 5, 10), 1500);
        assert_eq!(Progress::stage_step(3, 0, 0), Progress::STAGE_TOTAL);
    }

    #[test]
    fn test_callback_receives_reports() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = Progress::new(move |c, t, m| sink.lock().unwrap().push((c, t, m.to_string())));
        progress.report_stage(2, 1, 2, "Meshing faces");
        let seen = seen.lock().unwrap();
        assert_eq!(seen.as_slice(), &[(2500, 4000, "Meshing faces".to_string())]);
    }
}
