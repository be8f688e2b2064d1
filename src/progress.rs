// src/progress.rs
/// Progress hooks for the pipeline.
/// The per-token loops (resync, metadata, marketplace, scrape) report through
/// this so a frontend can show where a long batch is.
pub trait Progress {
    /// A pipeline stage is starting.
    fn stage(&mut self, _name: &str) {}

    /// A per-token batch is starting with `total` tokens.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One token of the current batch has been handled.
    fn item_done(&mut self, _token_id: &str) {}

    /// The current batch ended, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
