use serde::Deserialize;
use std::env;

/// Application configuration for embeddings of the check-in flow.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub checkin: CheckinConfig,
    #[serde(default)]
    pub mock: MockConfig,
    #[serde(default)]
    pub branding: BrandingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CheckinConfig {
    /// Phone country code seeded into empty detail drafts.
    #[serde(default = "default_country_code")]
    pub default_country_code: String,
    /// Minutes before departure that boarding is shown to start.
    #[serde(default = "default_boarding_lead")]
    pub boarding_lead_minutes: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MockConfig {
    /// Simulated network latency of the in-memory booking service.
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BrandingConfig {
    /// Carrier name shown on boarding passes.
    #[serde(default = "default_carrier_name")]
    pub carrier_name: String,
}

fn default_country_code() -> String {
    jetway_core::DEFAULT_COUNTRY_CODE.to_string()
}

fn default_boarding_lead() -> i64 {
    40
}

fn default_latency_ms() -> u64 {
    300
}

fn default_carrier_name() -> String {
    "Qoomlee".to_string()
}

impl Default for CheckinConfig {
    fn default() -> Self {
        Self {
            default_country_code: default_country_code(),
            boarding_lead_minutes: default_boarding_lead(),
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_latency_ms(),
        }
    }
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            carrier_name: default_carrier_name(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            checkin: CheckinConfig::default(),
            mock: MockConfig::default(),
            branding: BrandingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Layered load: optional config files, then `JETWAY__`-prefixed
    /// environment overrides (e.g. `JETWAY__CHECKIN__DEFAULT_COUNTRY_CODE`).
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("JETWAY").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
