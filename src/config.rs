use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub budget: BudgetConfig,
    #[serde(default)]
    pub reconstruction: ReconstructionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Speech-to-text endpoint settings
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionConfig {
    /// URL of the speech-to-text HTTP endpoint
    pub endpoint: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Per-request timeout in seconds; this client never retries, the
    /// caller decides what to do with a timed-out call
    pub timeout_secs: u64,
}

/// AI scoring backend settings
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Chat-completion endpoint URL
    pub endpoint: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Model for behavioral/leadership categories (STAR-method capable,
    /// cheaper tier)
    pub star_model: String,

    /// Model for technical/custom categories (structured technical
    /// assessment)
    pub technical_model: String,

    /// Cost per 1K tokens in cents, per tier
    pub star_input_cents_per_1k: f64,
    pub star_output_cents_per_1k: f64,
    pub technical_input_cents_per_1k: f64,
    pub technical_output_cents_per_1k: f64,

    #[serde(default)]
    pub retry: RetryConfig,

    /// How many responses may be scored concurrently
    pub max_concurrent_scoring: usize,
}

/// Retry policy for transient AI-backend failures
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Maximum retries after the initial attempt
    pub max_retries: u32,

    /// First backoff delay in milliseconds
    pub base_delay_ms: u64,

    /// Backoff multiplier applied per retry
    pub multiplier: f64,

    /// Backoff ceiling in milliseconds
    pub max_delay_ms: u64,
}

/// Cost ceilings and alert thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct BudgetConfig {
    /// Per-session spend limits in cents
    pub session_daily_limit_cents: f64,
    pub session_monthly_limit_cents: f64,

    /// Per-user spend limits in cents
    pub user_daily_limit_cents: f64,
    pub user_monthly_limit_cents: f64,

    /// Fraction of a limit at which check_limit reports Warning
    pub warning_ratio: f64,

    /// Fraction of a limit at which check_limit reports Critical
    pub critical_ratio: f64,
}

/// Tuning knobs for transcript-to-segment reconstruction.
///
/// The thresholds have no derivation beyond "short recordings make
/// proportional timing unreliable"; treat them as tunable, not load-bearing.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconstructionConfig {
    /// Below this total recording duration, use the equal-split fallback
    pub min_total_seconds: f64,

    /// Any single segment shorter than this also triggers the fallback
    pub min_segment_seconds: f64,

    /// Words of slack added on each side of interior window boundaries
    pub boundary_buffer_words: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: "prepdeck".to_string(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8090,
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.speechscribe.example/v1/transcribe".to_string(),
            api_key_env: "PREPDECK_STT_API_KEY".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key_env: "PREPDECK_AI_API_KEY".to_string(),
            timeout_secs: 30,
            star_model: "gpt-4o-mini".to_string(),
            technical_model: "gpt-4o".to_string(),
            star_input_cents_per_1k: 0.015,
            star_output_cents_per_1k: 0.06,
            technical_input_cents_per_1k: 0.25,
            technical_output_cents_per_1k: 1.0,
            retry: RetryConfig::default(),
            max_concurrent_scoring: 3,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            multiplier: 2.0,
            max_delay_ms: 30_000,
        }
    }
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            session_daily_limit_cents: 100.0,
            session_monthly_limit_cents: 500.0,
            user_daily_limit_cents: 200.0,
            user_monthly_limit_cents: 2000.0,
            warning_ratio: 0.8,
            critical_ratio: 0.95,
        }
    }
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            min_total_seconds: 30.0,
            min_segment_seconds: 5.0,
            boundary_buffer_words: 3,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
