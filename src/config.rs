//! Pipeline configuration
//!
//! Every field has a default, so a TOML file only needs to name what it
//! changes:
//!
//! ```
//! use ring_telemetry::{Algorithm, PipelineConfig};
//!
//! let config = PipelineConfig::from_toml_str(
//!     r#"
//!     capacity = 2000
//!
//!     [attitude]
//!     algorithm = "mahony"
//!     kp = 1.0
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.capacity, 2000);
//! assert_eq!(config.attitude.algorithm, Algorithm::Mahony);
//! assert_eq!(config.attitude.beta, 0.4);
//! assert_eq!(config.codec.scale, 938.0);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::store::DEFAULT_CAPACITY;
use crate::types::{AttitudeSettings, CodecSettings, KalmanSettings};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Slots per stream in the sample stores
    pub capacity: usize,
    pub codec: CodecSettings,
    pub kalman: KalmanSettings,
    pub attitude: AttitudeSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            codec: CodecSettings::default(),
            kalman: KalmanSettings::default(),
            attitude: AttitudeSettings::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Read a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::info!(?path, "Loaded config");
        Ok(config)
    }
}
