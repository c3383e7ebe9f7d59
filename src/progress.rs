//! Progress-callback trait for stage-level pipeline events.
//!
//! Inject an [`Arc<dyn PipelineProgressCallback>`] via
//! [`crate::config::PodcastConfigBuilder::progress_callback`] to receive
//! events as the pipeline moves through its four stages.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdf2podcast::{PipelineProgressCallback, PodcastConfig, Stage};
//! use std::sync::Arc;
//!
//! struct Printer;
//!
//! impl PipelineProgressCallback for Printer {
//!     fn on_stage_start(&self, stage: Stage) {
//!         eprintln!("Step {}: {}...", stage.number(), stage.description());
//!     }
//! }
//!
//! let config = PodcastConfig::builder()
//!     .progress_callback(Arc::new(Printer) as Arc<dyn PipelineProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::state::Stage;
use std::sync::Arc;

/// Called by the pipeline as it runs each stage.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events arrive strictly in pipeline order from a
/// single task; the `Send + Sync` bound only allows the callback to live
/// inside a shared config.
pub trait PipelineProgressCallback: Send + Sync {
    /// Called once before the first stage.
    ///
    /// # Arguments
    /// * `source_chars`: length of the source text in characters
    fn on_pipeline_start(&self, source_chars: usize) {
        let _ = source_chars;
    }

    /// Called just before a stage issues its first upstream call.
    fn on_stage_start(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called when a stage finishes successfully.
    fn on_stage_complete(&self, stage: Stage) {
        let _ = stage;
    }

    /// Called when a stage fails.
    ///
    /// # Arguments
    /// * `error`: the stage-prefixed error message
    fn on_stage_error(&self, stage: Stage, error: &str) {
        let _ = (stage, error);
    }

    /// Called after each speech chunk has been synthesised.
    ///
    /// # Arguments
    /// * `segment`: 1-indexed segment number
    /// * `total`:   number of chunks the script was split into
    /// * `bytes`:   size of the returned audio
    fn on_segment_complete(&self, segment: usize, total: usize, bytes: usize) {
        let _ = (segment, total, bytes);
    }

    /// Called once after the last stage ran (or the run halted).
    ///
    /// # Arguments
    /// * `failed_stages`: stages that failed during the run
    fn on_pipeline_complete(&self, failed_stages: usize) {
        let _ = failed_stages;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl PipelineProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::PodcastConfig`].
pub type ProgressCallback = Arc<dyn PipelineProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl PipelineProgressCallback for Recorder {
        fn on_stage_start(&self, stage: Stage) {
            self.events.lock().unwrap().push(format!("start:{stage}"));
        }

        fn on_stage_error(&self, stage: Stage, error: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("error:{stage}:{error}"));
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_pipeline_start(1000);
        cb.on_stage_start(Stage::Summarize);
        cb.on_stage_complete(Stage::Summarize);
        cb.on_stage_error(Stage::Audio, "boom");
        cb.on_segment_complete(1, 2, 512);
        cb.on_pipeline_complete(1);
    }

    #[test]
    fn overridden_methods_receive_events() {
        let rec = Recorder::default();
        rec.on_stage_start(Stage::Script);
        rec.on_stage_complete(Stage::Script); // default no-op
        rec.on_stage_error(Stage::Audio, "quota");
        let events = rec.events.lock().unwrap();
        assert_eq!(*events, vec!["start:script", "error:audio:quota"]);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_pipeline_start(10);
        cb.on_segment_complete(1, 1, 64);
    }
}
