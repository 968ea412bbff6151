use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    models::{normalize_code, Currency, CurrencyInput, CustomCurrency},
    storage::{CustomRates, ReferenceRates},
    AppError, Result,
};

/// Поиск валют по обеим таблицам и изменение пользовательских валют
pub struct CurrencyService {
    reference: Arc<dyn ReferenceRates>,
    custom: Arc<dyn CustomRates>,
}

impl CurrencyService {
    pub fn new(reference: Arc<dyn ReferenceRates>, custom: Arc<dyn CustomRates>) -> Self {
        Self { reference, custom }
    }

    /// Ищет валюту сначала среди внешних курсов, затем среди пользовательских
    async fn find(&self, code: &str) -> Result<Option<Currency>> {
        if let Some(currency) = self.reference.find_reference(code).await? {
            return Ok(Some(currency));
        }
        self.custom.find_custom(code).await
    }

    pub async fn resolve(&self, code: &str) -> Result<Currency> {
        let code = normalize_code(code);
        self.find(&code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Currency code {code} not found")))
    }

    /// Все валюты обеих таблиц, по возрастанию кода
    pub async fn list_all(&self) -> Result<Vec<Currency>> {
        let mut all = self.reference.list_reference().await?;
        all.extend(self.custom.list_custom().await?);
        all.sort_by(|a, b| a.currency_code.cmp(&b.currency_code));
        Ok(all)
    }

    pub async fn create(&self, input: CurrencyInput) -> Result<Currency> {
        let currency = CustomCurrency::try_from(input)?;
        if self.find(&currency.currency_code).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Currency code {} already exists",
                currency.currency_code
            )));
        }
        // при создании валюта-основа должна быть внешней
        if self
            .reference
            .find_reference(&currency.backed_by)
            .await?
            .is_none()
        {
            return Err(AppError::Conflict(format!(
                "Backed currency code {} is not valid",
                currency.backed_by
            )));
        }
        let created = self.custom.insert_custom(currency).await?;
        info!(
            "Создана валюта {code} с курсом {rate} к {backed_by}",
            code = created.currency_code,
            rate = created.rate,
            backed_by = created.backed_by
        );
        Ok(created)
    }

    pub async fn update(&self, original_code: &str, input: CurrencyInput) -> Result<Currency> {
        let currency = CustomCurrency::try_from(input)?;
        let original_code = normalize_code(original_code);
        if self
            .reference
            .find_reference(&original_code)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Currency code {original_code} is a coinbase currency and cannot be changed"
            )));
        }
        if original_code != currency.currency_code {
            if self.custom.find_custom(&original_code).await?.is_none() {
                return Err(AppError::NotFound(format!(
                    "Original currency code {original_code} not found"
                )));
            }
            if self.find(&currency.currency_code).await?.is_some() {
                return Err(AppError::Conflict(format!(
                    "New currency code {} already exists",
                    currency.currency_code
                )));
            }
        } else if self.find(&currency.currency_code).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Currency code {} not found",
                currency.currency_code
            )));
        }
        if self
            .reference
            .find_reference(&currency.backed_by)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "Backed currency code {} not found",
                currency.backed_by
            )));
        }
        let updated = self
            .custom
            .update_custom(&original_code, currency)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Currency code {original_code} not found"))
            })?;
        info!(
            "Валюта {original_code} обновлена: {code} с курсом {rate} к {backed_by}",
            code = updated.currency_code,
            rate = updated.rate,
            backed_by = updated.backed_by
        );
        Ok(updated)
    }

    pub async fn delete(&self, code: &str) -> Result<String> {
        let code = normalize_code(code);
        let currency = self
            .find(&code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Currency code {code} not found")))?;
        if currency.is_reference() {
            warn!("Попытка удалить внешнюю валюту {code}");
            return Err(AppError::Conflict(format!(
                "Currency code {code} is a coinbase currency and cannot be deleted"
            )));
        }
        let deleted = self.custom.delete_custom(&code).await?;
        info!("Удалено {deleted} пользовательских валют с кодом {code}");
        Ok(format!("Currency code {code} deleted"))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{CurrencyRow, CurrencyType};
    use crate::storage::MemoryStorage;

    pub(crate) async fn seeded_service() -> CurrencyService {
        let storage = Arc::new(MemoryStorage::new());
        let rates = [
            ("BRL", 5.12),
            ("BTC", 0.00005),
            ("ETH", 0.0006),
            ("EUR", 1.01),
            ("USD", 1.0),
        ]
        .into_iter()
        .map(|(code, rate)| CurrencyRow {
            currency_code: code.to_string(),
            rate,
            backed_by: "USD".to_string(),
            updated_at: Utc::now(),
        })
        .collect();
        storage.upsert_reference(rates).await.unwrap();
        CurrencyService::new(storage.clone(), storage)
    }

    pub(crate) fn hurb(rate: f64) -> CurrencyInput {
        CurrencyInput {
            currency_code: "HURB".to_string(),
            backed_by: "BRL".to_string(),
            rate: Some(rate),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn resolve_is_case_insensitive() {
        let service = seeded_service().await;
        let upper = service.resolve("BRL").await.unwrap();
        let lower = service.resolve("brl").await.unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.currency_type, CurrencyType::Coinbase);
    }

    #[tokio::test]
    async fn resolve_unknown_code_is_not_found() {
        let service = seeded_service().await;
        let err = service.resolve("hurb").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), "Currency code HURB not found");
    }

    #[tokio::test]
    async fn list_all_merges_tables_sorted() {
        let service = seeded_service().await;
        service.create(hurb(4.0)).await.unwrap();
        let mut aaa = hurb(2.0);
        aaa.currency_code = "aaa".to_string();
        service.create(aaa).await.unwrap();
        let codes = service
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.currency_code)
            .collect::<Vec<_>>();
        assert_eq!(codes, ["AAA", "BRL", "BTC", "ETH", "EUR", "HURB", "USD"]);
    }

    #[tokio::test]
    async fn create_then_resolve_returns_rate() {
        let service = seeded_service().await;
        let created = service.create(hurb(4.0)).await.unwrap();
        assert_eq!(created.currency_type, CurrencyType::Fictitious);
        let resolved = service.resolve("hurb").await.unwrap();
        assert_eq!(resolved.rate, 4.0);
        assert_eq!(resolved.backed_by, "BRL");
    }

    #[tokio::test]
    async fn create_with_amount_pair_derives_rate() {
        let service = seeded_service().await;
        let input = CurrencyInput {
            currency_code: "HURB".to_string(),
            backed_by: "BRL".to_string(),
            amount: Some(12.0),
            backed_currency_amount: Some(3.0),
            ..Default::default()
        };
        service.create(input).await.unwrap();
        assert_eq!(service.resolve("HURB").await.unwrap().rate, 4.0);
    }

    #[tokio::test]
    async fn create_existing_code_conflicts() {
        let service = seeded_service().await;
        let mut brl = hurb(5.59);
        brl.currency_code = "BRL".to_string();
        brl.backed_by = "USD".to_string();
        let err = service.create(brl).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.to_string(), "Currency code BRL already exists");
    }

    #[tokio::test]
    async fn create_requires_reference_backing() {
        let service = seeded_service().await;
        service.create(hurb(4.0)).await.unwrap();
        let input = CurrencyInput {
            currency_code: "TEST".to_string(),
            backed_by: "HURB".to_string(),
            rate: Some(1.0),
            ..Default::default()
        };
        let err = service.create(input).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(err.to_string(), "Backed currency code HURB is not valid");
    }

    #[tokio::test]
    async fn update_in_place_changes_rate() {
        let service = seeded_service().await;
        service.create(hurb(4.0)).await.unwrap();
        let updated = service.update("hurb", hurb(50.41)).await.unwrap();
        assert_eq!(updated.rate, 50.41);
        assert_eq!(service.resolve("HURB").await.unwrap().rate, 50.41);
    }

    #[tokio::test]
    async fn update_rename_moves_code() {
        let service = seeded_service().await;
        service.create(hurb(4.0)).await.unwrap();
        let mut renamed = hurb(7.5);
        renamed.currency_code = "HRB2".to_string();
        let updated = service.update("HURB", renamed).await.unwrap();
        assert_eq!(updated.currency_code, "HRB2");
        assert!(matches!(
            service.resolve("HURB").await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(service.resolve("HRB2").await.unwrap().rate, 7.5);
    }

    #[tokio::test]
    async fn update_reference_currency_conflicts() {
        let service = seeded_service().await;
        let mut brl = hurb(1.0);
        brl.currency_code = "BRL".to_string();
        let err = service.update("BRL", brl).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_missing_currency_is_not_found() {
        let service = seeded_service().await;
        let err = service.update("HURB", hurb(50.41)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let mut renamed = hurb(1.0);
        renamed.currency_code = "NEW".to_string();
        let err = service.update("HURB", renamed).await.unwrap_err();
        assert_eq!(err.to_string(), "Original currency code HURB not found");
    }

    #[tokio::test]
    async fn update_rename_onto_existing_code_conflicts() {
        let service = seeded_service().await;
        service.create(hurb(4.0)).await.unwrap();
        let mut renamed = hurb(1.0);
        renamed.currency_code = "EUR".to_string();
        let err = service.update("HURB", renamed).await.unwrap_err();
        assert_eq!(err.to_string(), "New currency code EUR already exists");
    }

    #[tokio::test]
    async fn update_with_unknown_backing_is_not_found() {
        let service = seeded_service().await;
        service.create(hurb(4.0)).await.unwrap();
        let mut input = hurb(4.0);
        input.backed_by = "XYZ".to_string();
        let err = service.update("HURB", input).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), "Backed currency code XYZ not found");
    }

    #[tokio::test]
    async fn delete_custom_currency() {
        let service = seeded_service().await;
        service.create(hurb(4.0)).await.unwrap();
        let message = service.delete("hurb").await.unwrap();
        assert_eq!(message, "Currency code HURB deleted");
        assert!(service.resolve("HURB").await.is_err());
    }

    #[tokio::test]
    async fn delete_reference_currency_conflicts() {
        let service = seeded_service().await;
        let err = service.delete("BRL").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(service.resolve("BRL").await.is_ok());
    }

    #[tokio::test]
    async fn delete_unknown_currency_is_not_found() {
        let service = seeded_service().await;
        let err = service.delete("HURB").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
