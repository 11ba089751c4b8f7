use crate::error::ConfigError;
use derivative::Derivative;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";
pub const DEFAULT_BATCH_WIDTH: usize = 3;

/// Runtime settings for the uploader, normally built from CLI arguments.
#[derive(Debug, Clone, Derivative)]
#[derivative(Default)]
pub struct UploaderConfig {
    /// Base URL of the processing service. Upload path and returned image
    /// paths are both resolved against it.
    #[derivative(Default(value = "DEFAULT_ENDPOINT.to_string()"))]
    pub endpoint: String,
    /// Maximum number of uploads in flight at once.
    #[derivative(Default(value = "DEFAULT_BATCH_WIDTH"))]
    pub batch_width: usize,
    /// How long the progress window lingers after the last batch settles.
    #[derivative(Default(value = "Duration::from_millis(500)"))]
    pub progress_hide_delay: Duration,
    /// Window in which repeated picker activations are ignored.
    #[derivative(Default(value = "Duration::from_millis(100)"))]
    pub picker_cooldown: Duration,
}

impl UploaderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_width == 0 {
            return Err(ConfigError::ZeroBatchWidth);
        }
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ConfigError::InvalidEndpoint(self.endpoint.clone()));
        }
        Ok(())
    }

    pub fn base_url(&self) -> &str {
        self.endpoint.trim().trim_end_matches('/')
    }
}
