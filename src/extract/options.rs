/// What to do when a single blob cannot be decompressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// End the extraction with the error
    #[default]
    Abort,
    /// Log the error and continue with the next blob
    Skip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Stop after this many matches. `None` reads the whole file.
    pub limit: Option<usize>,
    pub on_decompression_error: ErrorPolicy,
    /// Refuse files which do not begin with an `OSMHeader` blob.
    pub require_header: bool,
}

impl ExtractOptions {
    pub fn with_limit(mut self, limit: impl Into<Option<usize>>) -> Self {
        self.limit = limit.into();
        self
    }

    pub fn with_decompression_policy(mut self, policy: ErrorPolicy) -> Self {
        self.on_decompression_error = policy;
        self
    }

    pub fn with_required_header(mut self, require_header: bool) -> Self {
        self.require_header = require_header;
        self
    }
}
