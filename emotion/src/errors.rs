use tract_core::prelude::TractError;

/// Failure of one of the classification stages.
///
/// Travels inside a `TractError`: the stage that failed can be recovered by
/// downcasting.
#[derive(Debug)]
pub enum ClassifyError {
    /// Model file missing, unreadable, corrupt or not shaped for this task.
    Load(TractError),
    /// Image file missing or not decodable.
    Decode(TractError),
    /// Forward pass failed or produced unusable scores.
    Runtime(TractError),
}

impl ClassifyError {
    pub fn stage(&self) -> &'static str {
        match self {
            ClassifyError::Load(_) => "load",
            ClassifyError::Decode(_) => "decode",
            ClassifyError::Runtime(_) => "runtime",
        }
    }

    fn inner(&self) -> &TractError {
        match self {
            ClassifyError::Load(e) | ClassifyError::Decode(e) | ClassifyError::Runtime(e) => e,
        }
    }
}

impl std::fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassifyError::Load(_) => write!(f, "Failed to load model"),
            ClassifyError::Decode(_) => write!(f, "Failed to decode image"),
            ClassifyError::Runtime(_) => write!(f, "Inference failed"),
        }
    }
}

impl std::error::Error for ClassifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let inner: &(dyn std::error::Error + 'static) = self.inner().as_ref();
        Some(inner)
    }
}

/// Stage lookup on a pipeline result.
pub fn stage_of(error: &TractError) -> Option<&'static str> {
    error.downcast_ref::<ClassifyError>().map(|e| e.stage())
}
