use chrono::Utc;

use crate::{
    models::{Currency, CurrencyRow, CurrencyType, CustomCurrency},
    Result,
};

use super::{CustomRates, PgStorage, ReferenceRates};

#[async_trait::async_trait]
impl ReferenceRates for PgStorage {
    async fn find_reference(&self, code: &str) -> Result<Option<Currency>> {
        let query = "SELECT currency_code, rate, backed_by, updated_at FROM reference_currencies WHERE currency_code = $1";
        let row = sqlx::query_as::<_, CurrencyRow>(query)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.into_currency(CurrencyType::Coinbase)))
    }
    async fn list_reference(&self) -> Result<Vec<Currency>> {
        let query = "SELECT currency_code, rate, backed_by, updated_at FROM reference_currencies ORDER BY currency_code";
        let rows = sqlx::query_as::<_, CurrencyRow>(query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| r.into_currency(CurrencyType::Coinbase))
            .collect())
    }
    async fn upsert_reference(&self, rates: Vec<CurrencyRow>) -> Result<u64> {
        if rates.is_empty() {
            return Ok(0);
        }
        let query_string =
            "INSERT INTO reference_currencies(currency_code, rate, backed_by, updated_at) ";
        let mut query_builder = sqlx::QueryBuilder::new(query_string);
        query_builder.push_values(rates, |mut b, row| {
            b.push_bind(row.currency_code)
                .push_bind(row.rate)
                .push_bind(row.backed_by)
                .push_bind(row.updated_at);
        });
        query_builder.push(
            " ON CONFLICT (currency_code) DO UPDATE SET rate = EXCLUDED.rate, \
             backed_by = EXCLUDED.backed_by, updated_at = EXCLUDED.updated_at",
        );
        let results = query_builder.build().execute(&self.pool).await?;
        Ok(results.rows_affected())
    }
}

#[async_trait::async_trait]
impl CustomRates for PgStorage {
    async fn find_custom(&self, code: &str) -> Result<Option<Currency>> {
        let query = "SELECT currency_code, rate, backed_by, updated_at FROM custom_currencies WHERE currency_code = $1";
        let row = sqlx::query_as::<_, CurrencyRow>(query)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.into_currency(CurrencyType::Fictitious)))
    }
    async fn list_custom(&self) -> Result<Vec<Currency>> {
        let query = "SELECT currency_code, rate, backed_by, updated_at FROM custom_currencies ORDER BY currency_code";
        let rows = sqlx::query_as::<_, CurrencyRow>(query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| r.into_currency(CurrencyType::Fictitious))
            .collect())
    }
    async fn insert_custom(&self, currency: CustomCurrency) -> Result<Currency> {
        let query = "INSERT INTO custom_currencies(id, currency_code, rate, backed_by, updated_at) \
                     VALUES ($1, $2, $3, $4, $5) \
                     RETURNING currency_code, rate, backed_by, updated_at";
        let row = sqlx::query_as::<_, CurrencyRow>(query)
            .bind(uuid::Uuid::new_v4())
            .bind(currency.currency_code)
            .bind(currency.rate)
            .bind(currency.backed_by)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into_currency(CurrencyType::Fictitious))
    }
    async fn update_custom(
        &self,
        original_code: &str,
        currency: CustomCurrency,
    ) -> Result<Option<Currency>> {
        let query = "UPDATE custom_currencies \
                     SET currency_code = $1, rate = $2, backed_by = $3, updated_at = $4 \
                     WHERE currency_code = $5 \
                     RETURNING currency_code, rate, backed_by, updated_at";
        let row = sqlx::query_as::<_, CurrencyRow>(query)
            .bind(currency.currency_code)
            .bind(currency.rate)
            .bind(currency.backed_by)
            .bind(Utc::now())
            .bind(original_code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.into_currency(CurrencyType::Fictitious)))
    }
    async fn delete_custom(&self, code: &str) -> Result<u64> {
        let query = "DELETE FROM custom_currencies WHERE currency_code = $1";
        let results = sqlx::query(query).bind(code).execute(&self.pool).await?;
        Ok(results.rows_affected())
    }
}
