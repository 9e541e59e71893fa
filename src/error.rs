use serde::Serialize;

/// The only ways a funnel can fail to render. Everything past normalization
/// is total, so these are detected before any geometry is computed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FunnelError {
    #[error("schema error: expected at least 1 dimension and 1 measure, got {dimensions} and {measures}")]
    Schema { dimensions: usize, measures: usize },
    #[error("empty data: the query returned no rows")]
    EmptyData,
}

impl FunnelError {
    pub fn group(&self) -> &'static str {
        match self {
            FunnelError::Schema { .. } => "req",
            FunnelError::EmptyData => "empty",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            FunnelError::Schema { .. } => "Add fields",
            FunnelError::EmptyData => "No data",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            FunnelError::Schema { .. } => {
                "This viz expects 1 dimension (stage) and 1 measure (value)."
            }
            FunnelError::EmptyData => "Your query returned no rows.",
        }
    }

    pub fn to_host_error(&self) -> HostError {
        HostError {
            group: self.group().to_string(),
            title: self.title().to_string(),
            message: self.message().to_string(),
        }
    }
}

/// Structured error payload for the host's error-display channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostError {
    pub group: String,
    pub title: String,
    pub message: String,
}

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.group, self.title, self.message)
    }
}

impl From<&FunnelError> for HostError {
    fn from(err: &FunnelError) -> Self {
        err.to_host_error()
    }
}

pub type Result<T> = std::result::Result<T, FunnelError>;
