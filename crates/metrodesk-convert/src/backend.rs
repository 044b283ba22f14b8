//! Conversion backend seam and its simulated implementation.
//!
//! The queue only ever talks to [`ConversionBackend`], so the randomized
//! stand-in can be swapped for a real converter without touching the queue's
//! state-machine logic.

use async_trait::async_trait;
use rand::Rng;
use tokio::time::{sleep, Duration};
use tracing::debug;
use uuid::Uuid;

use metrodesk_core::{defaults, FileUpload, Quality, SourceFormat, TargetFormat};

/// Everything a backend needs to convert one document.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub document_id: Uuid,
    pub file: FileUpload,
    pub source_format: SourceFormat,
    pub target_format: TargetFormat,
    pub quality: Quality,
    pub ocr_enabled: bool,
}

/// Result of one conversion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// Conversion produced the requested target format.
    Converted,
    /// Conversion failed with a reason for the document's failure surface.
    Failed(String),
}

/// Trait for conversion backends.
#[async_trait]
pub trait ConversionBackend: Send + Sync {
    /// Convert one document, returning when the (possibly long) conversion
    /// resolves. Implementations must never panic on unreadable input; they
    /// report it as a `Failed` outcome.
    async fn convert(&self, request: ConversionRequest) -> ConversionOutcome;
}

/// Tunables for the simulated backend.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Probability in [0, 1] that a conversion succeeds.
    pub success_rate: f64,
    /// Lower bound of the simulated conversion delay.
    pub min_delay_ms: u64,
    /// Upper bound of the simulated conversion delay.
    pub max_delay_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            success_rate: defaults::CONVERT_SUCCESS_RATE,
            min_delay_ms: defaults::CONVERT_DELAY_MIN_MS,
            max_delay_ms: defaults::CONVERT_DELAY_MAX_MS,
        }
    }
}

impl SimulationConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `CONVERT_SUCCESS_RATE` | `0.9` | Simulated success probability |
    /// | `CONVERT_DELAY_MIN_MS` | `2000` | Minimum simulated delay |
    /// | `CONVERT_DELAY_MAX_MS` | `5000` | Maximum simulated delay |
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("CONVERT_SUCCESS_RATE") {
            if let Ok(rate) = val.parse::<f64>() {
                config.success_rate = rate.clamp(0.0, 1.0);
            }
        }
        if let Ok(val) = std::env::var("CONVERT_DELAY_MIN_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                config.min_delay_ms = ms;
            }
        }
        if let Ok(val) = std::env::var("CONVERT_DELAY_MAX_MS") {
            if let Ok(ms) = val.parse::<u64>() {
                config.max_delay_ms = ms;
            }
        }
        if config.max_delay_ms < config.min_delay_ms {
            config.max_delay_ms = config.min_delay_ms;
        }
        config
    }

    /// Set the success probability (clamped to [0, 1]).
    pub fn with_success_rate(mut self, rate: f64) -> Self {
        self.success_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Set the simulated delay window.
    pub fn with_delay_window(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.min_delay_ms = min_ms;
        self.max_delay_ms = max_ms.max(min_ms);
        self
    }
}

/// Randomized stand-in for a real conversion service.
///
/// Each conversion resolves independently after a uniform random delay inside
/// the configured window, succeeding with the configured probability.
/// Zero-byte uploads always fail; they still wait out the delay so failures
/// surface through the same path as everything else.
pub struct SimulatedBackend {
    config: SimulationConfig,
}

impl SimulatedBackend {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

#[async_trait]
impl ConversionBackend for SimulatedBackend {
    async fn convert(&self, request: ConversionRequest) -> ConversionOutcome {
        // Draw before the await so the RNG never crosses a suspension point.
        let (delay_ms, success) = {
            let mut rng = rand::thread_rng();
            let delay = rng.gen_range(self.config.min_delay_ms..=self.config.max_delay_ms);
            let success = rng.gen_bool(self.config.success_rate);
            (delay, success)
        };

        debug!(
            document_id = %request.document_id,
            delay_ms,
            target = %request.target_format,
            ocr = request.ocr_enabled,
            "simulated conversion scheduled"
        );
        sleep(Duration::from_millis(delay_ms)).await;

        if request.file.size_bytes == 0 {
            return ConversionOutcome::Failed(format!("{} is empty", request.file.name));
        }
        if success {
            ConversionOutcome::Converted
        } else {
            ConversionOutcome::Failed(format!("conversion of {} failed", request.file.name))
        }
    }
}

/// Backend that resolves immediately with a fixed outcome. For tests.
pub struct InstantBackend {
    outcome: ConversionOutcome,
}

impl InstantBackend {
    /// Backend that converts everything instantly.
    pub fn converted() -> Self {
        Self {
            outcome: ConversionOutcome::Converted,
        }
    }

    /// Backend that fails everything instantly with the given reason.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            outcome: ConversionOutcome::Failed(reason.into()),
        }
    }
}

#[async_trait]
impl ConversionBackend for InstantBackend {
    async fn convert(&self, _request: ConversionRequest) -> ConversionOutcome {
        self.outcome.clone()
    }
}
