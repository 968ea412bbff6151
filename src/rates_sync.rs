use std::{
    collections::{btree_map::Entry, BTreeMap},
    sync::Arc,
};

use anyhow::Context;
use serde::Deserialize;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::{
    config::Settings,
    models::{normalize_code, positive, CurrencyRow},
    storage::{CustomRates, ReferenceRates},
    utils::pause,
};

#[derive(Deserialize)]
struct ExchangeRatesResponse {
    data: ExchangeRates,
}

#[derive(Deserialize)]
struct ExchangeRates {
    currency: String,
    rates: BTreeMap<String, serde_json::Value>,
}

/// Периодически загружает внешние курсы и сохраняет их в таблицу внешних курсов
pub async fn run(
    settings: Settings,
    reference: Arc<dyn ReferenceRates>,
    custom: Arc<dyn CustomRates>,
) {
    let (tx, rx) = unbounded_channel::<Vec<CurrencyRow>>();
    tokio::spawn(async move {
        generator(tx, settings).await;
    });
    saver(rx, reference, custom).await;
}

async fn generator(tx: UnboundedSender<Vec<CurrencyRow>>, settings: Settings) {
    let client = match reqwest::Client::builder().gzip(true).build() {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Не удалось создать http клиент для курсов валют: {e:?}");
            return;
        }
    };
    loop {
        tracing::info!("Начинаю запрос курсов валют");
        match fetch(&client, &settings.rates_source_url).await {
            Ok(rates) if !rates.is_empty() => {
                let quantity = rates.len();
                if tx.send(rates).is_err() {
                    tracing::error!("Не удалось отправить данные о курсах валют в канал");
                    return;
                }
                tracing::info!(
                    "Получено {quantity} курсов валют, пауза на {} ч",
                    settings.rates_refresh_hours
                );
                pause(settings.rates_refresh_hours).await;
            }
            Ok(_) => {
                tracing::error!(
                    "Получен пустой ответ на запрос курсов валют, повтор через {} ч",
                    settings.rates_retry_hours
                );
                pause(settings.rates_retry_hours).await;
            }
            Err(e) => {
                tracing::error!(
                    "Ошибка получения курсов валют: {e:?}\n Пауза на {} ч",
                    settings.rates_retry_hours
                );
                pause(settings.rates_retry_hours).await;
            }
        }
    }
}

/// Запрашивает курсы у источника, все курсы выражены в его базовой валюте
pub async fn fetch(client: &reqwest::Client, url: &str) -> anyhow::Result<Vec<CurrencyRow>> {
    let response = client
        .get(url)
        .send()
        .await
        .context("request to rates source failed")?
        .error_for_status()
        .context("rates source returned an error status")?
        .json::<ExchangeRatesResponse>()
        .await
        .context("unexpected rates payload")?;
    let base = normalize_code(&response.data.currency);
    let updated_at = chrono::Utc::now();
    // ключи упорядочены, поэтому "BRL" встретится раньше "brl" и победит
    let mut rates = BTreeMap::new();
    for (code, value) in response.data.rates {
        let rate = match &value {
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            serde_json::Value::Number(n) => n.as_f64(),
            _ => None,
        };
        let Some(rate) = rate.and_then(|r| positive("rate", r).ok()) else {
            tracing::warn!("Пропускаю курс {code}: {value}");
            continue;
        };
        match rates.entry(normalize_code(&code)) {
            Entry::Occupied(entry) => {
                tracing::warn!("Повторный код {}, курс {code}: {value} пропущен", entry.key());
            }
            Entry::Vacant(entry) => {
                let currency_code = entry.key().clone();
                entry.insert(CurrencyRow {
                    currency_code,
                    rate,
                    backed_by: base.clone(),
                    updated_at,
                });
            }
        }
    }
    if !rates.is_empty() {
        rates.entry(base.clone()).or_insert_with(|| CurrencyRow {
            currency_code: base.clone(),
            rate: 1.0,
            backed_by: base.clone(),
            updated_at,
        });
    }
    let rates = rates.into_values().collect();
    Ok(rates)
}

async fn saver(
    mut rx: UnboundedReceiver<Vec<CurrencyRow>>,
    reference: Arc<dyn ReferenceRates>,
    custom: Arc<dyn CustomRates>,
) {
    while let Some(rates) = rx.recv().await {
        match save(rates, reference.as_ref(), custom.as_ref()).await {
            Ok(updated) => {
                tracing::info!("Обновлено {updated} курсов валют");
            }
            Err(e) => {
                tracing::error!("Ошибка сохранения курсов валют: {e:?}");
            }
        }
    }
}

/// Сохраняет внешние курсы, пропуская коды, занятые пользовательскими валютами
pub async fn save(
    rates: Vec<CurrencyRow>,
    reference: &dyn ReferenceRates,
    custom: &dyn CustomRates,
) -> crate::Result<u64> {
    let mut accepted = Vec::with_capacity(rates.len());
    for row in rates {
        if custom.find_custom(&row.currency_code).await?.is_some() {
            tracing::warn!(
                "Код {} занят пользовательской валютой, внешний курс пропущен",
                row.currency_code
            );
            continue;
        }
        accepted.push(row);
    }
    reference.upsert_reference(accepted).await
}
