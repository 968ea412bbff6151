mod currency;
mod memory;
use std::sync::Arc;

pub use memory::MemoryStorage;

use crate::{
    models::{Currency, CurrencyRow, CustomCurrency},
    Result,
};

/// Курсы из внешнего источника. Через API только читаются,
/// пишет их синхронизатор курсов
#[async_trait::async_trait]
pub trait ReferenceRates: Send + Sync {
    async fn find_reference(&self, code: &str) -> Result<Option<Currency>>;
    async fn list_reference(&self) -> Result<Vec<Currency>>;
    async fn upsert_reference(&self, rates: Vec<CurrencyRow>) -> Result<u64>;
}

/// Пользовательские валюты
#[async_trait::async_trait]
pub trait CustomRates: Send + Sync {
    async fn find_custom(&self, code: &str) -> Result<Option<Currency>>;
    async fn list_custom(&self) -> Result<Vec<Currency>>;
    async fn insert_custom(&self, currency: CustomCurrency) -> Result<Currency>;
    /// Возвращает `None`, если строки с `original_code` нет
    async fn update_custom(
        &self,
        original_code: &str,
        currency: CustomCurrency,
    ) -> Result<Option<Currency>>;
    async fn delete_custom(&self, code: &str) -> Result<u64>;
}

#[derive(Clone)]
pub struct PgStorage {
    pool: sqlx::PgPool,
}
impl PgStorage {
    pub async fn new(pool: sqlx::PgPool) -> Result<Arc<Self>> {
        sqlx::migrate!().run(&pool).await?;
        tracing::info!("Миграции базы данных применены");
        Ok(Arc::new(Self { pool }))
    }
}
