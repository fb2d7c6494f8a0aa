use thiserror::Error;

/// Server-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] kennel_core::ValidationError),

    #[error("invalid CORS origin '{origin}'")]
    CorsOrigin { origin: String },

    #[error("logging setup failed: {0}")]
    Telemetry(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ServerError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::CorsOrigin { .. } => 2,
            Self::Telemetry(_) => 3,
            Self::Bind { .. } => 4,
            Self::Io(_) => 10,
        }
    }
}
