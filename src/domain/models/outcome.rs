/// Result of one flush, reported back to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// The batch is durably stored
    Success,
    /// The batch was not stored; the host should flush it again later
    Retry,
    /// Unrecoverable; the route should be shut down
    Fatal,
}

impl FlushOutcome {
    /// Status code in the host plugin convention
    pub fn code(&self) -> i32 {
        match self {
            FlushOutcome::Fatal => 0,
            FlushOutcome::Success => 1,
            FlushOutcome::Retry => 2,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FlushOutcome::Success)
    }
}

impl std::fmt::Display for FlushOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlushOutcome::Success => write!(f, "success"),
            FlushOutcome::Retry => write!(f, "retry"),
            FlushOutcome::Fatal => write!(f, "fatal"),
        }
    }
}
