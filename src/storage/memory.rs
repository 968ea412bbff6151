use std::collections::BTreeMap;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    models::{Currency, CurrencyRow, CurrencyType, CustomCurrency},
    AppError, Result,
};

use super::{CustomRates, ReferenceRates};

/// Хранилище курсов в памяти, для тестов и запуска без базы данных
#[derive(Default)]
pub struct MemoryStorage {
    reference: RwLock<BTreeMap<String, CurrencyRow>>,
    custom: RwLock<BTreeMap<String, CurrencyRow>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn collect(rows: &BTreeMap<String, CurrencyRow>, currency_type: CurrencyType) -> Vec<Currency> {
    rows.values()
        .cloned()
        .map(|r| r.into_currency(currency_type))
        .collect()
}

#[async_trait::async_trait]
impl ReferenceRates for MemoryStorage {
    async fn find_reference(&self, code: &str) -> Result<Option<Currency>> {
        let rows = self.reference.read().await;
        Ok(rows
            .get(code)
            .cloned()
            .map(|r| r.into_currency(CurrencyType::Coinbase)))
    }
    async fn list_reference(&self) -> Result<Vec<Currency>> {
        Ok(collect(&*self.reference.read().await, CurrencyType::Coinbase))
    }
    async fn upsert_reference(&self, rates: Vec<CurrencyRow>) -> Result<u64> {
        let mut rows = self.reference.write().await;
        let mut affected = 0;
        for row in rates {
            rows.insert(row.currency_code.clone(), row);
            affected += 1;
        }
        Ok(affected)
    }
}

#[async_trait::async_trait]
impl CustomRates for MemoryStorage {
    async fn find_custom(&self, code: &str) -> Result<Option<Currency>> {
        let rows = self.custom.read().await;
        Ok(rows
            .get(code)
            .cloned()
            .map(|r| r.into_currency(CurrencyType::Fictitious)))
    }
    async fn list_custom(&self) -> Result<Vec<Currency>> {
        Ok(collect(&*self.custom.read().await, CurrencyType::Fictitious))
    }
    async fn insert_custom(&self, currency: CustomCurrency) -> Result<Currency> {
        let mut rows = self.custom.write().await;
        if rows.contains_key(&currency.currency_code) {
            return Err(AppError::DbError(format!(
                "duplicate custom currency {}",
                currency.currency_code
            )));
        }
        let row = CurrencyRow {
            currency_code: currency.currency_code,
            rate: currency.rate,
            backed_by: currency.backed_by,
            updated_at: Utc::now(),
        };
        rows.insert(row.currency_code.clone(), row.clone());
        Ok(row.into_currency(CurrencyType::Fictitious))
    }
    async fn update_custom(
        &self,
        original_code: &str,
        currency: CustomCurrency,
    ) -> Result<Option<Currency>> {
        let mut rows = self.custom.write().await;
        if original_code != currency.currency_code && rows.contains_key(&currency.currency_code) {
            return Err(AppError::DbError(format!(
                "duplicate custom currency {}",
                currency.currency_code
            )));
        }
        if rows.remove(original_code).is_none() {
            return Ok(None);
        }
        let row = CurrencyRow {
            currency_code: currency.currency_code,
            rate: currency.rate,
            backed_by: currency.backed_by,
            updated_at: Utc::now(),
        };
        rows.insert(row.currency_code.clone(), row.clone());
        Ok(Some(row.into_currency(CurrencyType::Fictitious)))
    }
    async fn delete_custom(&self, code: &str) -> Result<u64> {
        let mut rows = self.custom.write().await;
        Ok(rows.remove(code).map_or(0, |_| 1))
    }
}
