//! Presentation sink for pipeline progress

/// Receives step events; nothing it returns is consumed by the pipeline
pub trait Reporter {
    fn step_starting(&self, title: &str);

    fn step_succeeded(&self, detail: &str);

    fn step_failed(&self, detail: &str);

    /// A failed non-blocking step; the pipeline keeps going
    fn step_warned(&self, detail: &str) {
        self.step_failed(detail);
    }

    fn step_skipped(&self, _title: &str, _reason: &str) {}

    /// Free-form notice such as "No files changed" or the success message
    fn notice(&self, message: &str);
}
