mod error;
use std::sync::Arc;

pub use error::{AppError, Result};
use config::Settings;
use models::AppState;
use storage::{CustomRates, PgStorage, ReferenceRates};
pub mod config;
pub mod convert_service;
pub mod currency_service;
pub mod models;
pub mod rates_sync;
pub mod routes;
pub mod storage;
pub mod utils;

/// Собирает роутер поверх любого хранилища с обеими таблицами курсов
pub fn app<S>(storage: Arc<S>, settings: &Settings) -> axum::Router
where
    S: ReferenceRates + CustomRates + 'static,
{
    let currency_service = Arc::new(currency_service::CurrencyService::new(
        storage.clone(),
        storage,
    ));
    routes::init(AppState::new(currency_service), settings.request_timeout)
}

pub struct ExchangeService {
    pool: sqlx::PgPool,
    settings: Settings,
}
impl ExchangeService {
    pub fn new(pool: sqlx::PgPool, settings: Settings) -> Self {
        Self { pool, settings }
    }
    /// Применяет миграции, запускает синхронизацию курсов и возвращает роутер
    pub async fn run(self) -> Result<axum::Router> {
        let storage = PgStorage::new(self.pool).await?;
        if self.settings.rates_sync_enabled {
            tokio::spawn(rates_sync::run(
                self.settings.clone(),
                storage.clone(),
                storage.clone(),
            ));
            tracing::info!(
                "Синхронизация курсов запущена, источник: {}",
                self.settings.rates_source_url
            );
        } else {
            tracing::info!("Синхронизация курсов отключена");
        }
        Ok(app(storage, &self.settings))
    }
}
