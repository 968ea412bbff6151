use std::str::FromStr;
use std::time::Duration;

use shuttle_runtime::SecretStore;

const DEFAULT_SOURCE_URL: &str = "https://api.coinbase.com/v2/exchange-rates?currency=USD";

/// Настройки сервиса из Secrets.toml
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub rates_source_url: String,
    pub rates_refresh_hours: u64,
    pub rates_retry_hours: u64,
    pub rates_sync_enabled: bool,
    pub request_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rates_source_url: DEFAULT_SOURCE_URL.to_string(),
            rates_refresh_hours: 4,
            rates_retry_hours: 1,
            rates_sync_enabled: true,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl Settings {
    pub fn from_secrets(secrets: &SecretStore) -> Self {
        Self::from_lookup(|key| secrets.get(key))
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        Self {
            rates_source_url: lookup("RATES_SOURCE_URL").unwrap_or(default.rates_source_url),
            rates_refresh_hours: parse_or(&lookup, "RATES_REFRESH_HOURS", default.rates_refresh_hours),
            rates_retry_hours: parse_or(&lookup, "RATES_RETRY_HOURS", default.rates_retry_hours),
            rates_sync_enabled: parse_or(&lookup, "RATES_SYNC_ENABLED", default.rates_sync_enabled),
            request_timeout: Duration::from_secs(parse_positive_or(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                default.request_timeout.as_secs(),
            )),
        }
    }
}

fn parse_or<T: FromStr + std::fmt::Debug>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Не удалось разобрать {key}='{raw}', использую {default:?}");
            default
        }),
        None => default,
    }
}

/// Ноль для таймаута означает мгновенный отказ, поэтому он тоже заменяется значением по умолчанию
fn parse_positive_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    match parse_or(lookup, key, default) {
        0 => {
            tracing::warn!("{key}=0 недопустим, использую {default}");
            default
        }
        value => value,
    }
}
