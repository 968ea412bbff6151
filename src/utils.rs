pub async fn pause(hours: u64) {
    tokio::time::sleep(hours_to_duration(hours)).await;
}

fn hours_to_duration(hours: u64) -> tokio::time::Duration {
    tokio::time::Duration::from_secs(hours.saturating_mul(60 * 60))
}

/// Округление до двух знаков, половина к четному
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
