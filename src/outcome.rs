// src/outcome.rs
use tracing::warn;

/// Result of a best-effort step: the data it produced plus the non-fatal
/// problems it ran into (schema drift, missing columns, skipped rows).
#[derive(Clone, Debug, PartialEq)]
pub struct StageOutcome<T> {
    pub data: T,
    pub warnings: Vec<String>,
}

impl<T> StageOutcome<T> {
    pub fn new(data: T, warnings: Vec<String>) -> Self {
        Self { data, warnings }
    }

    /// Move this outcome's warnings into `sink` and hand back the data.
    pub fn collect_into(self, sink: &mut Vec<String>) -> T {
        sink.extend(self.warnings);
        self.data
    }

    /// Log every warning once and hand back the data.
    pub fn logged(self) -> T {
        for w in &self.warnings {
            warn!("{w}");
        }
        self.data
    }
}
