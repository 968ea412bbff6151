use std::sync::Arc;

use crate::{
    currency_service::CurrencyService,
    models::{positive, Conversion, Currency, USD},
    utils::round_to_cents,
    AppError, Result,
};

/// Конвертация сумм между валютами
pub struct ConvertService {
    currencies: Arc<CurrencyService>,
}

impl ConvertService {
    pub fn new(currencies: Arc<CurrencyService>) -> Self {
        Self { currencies }
    }

    pub async fn convert(&self, from_this: &str, to: &str, amount: f64) -> Result<Conversion> {
        let amount = positive("amount", amount)?;
        let mut from = self.currencies.resolve(from_this).await?;
        let mut to = self.currencies.resolve(to).await?;
        if from.backed_by != to.backed_by {
            self.convert_to_usd(&mut from).await?;
            self.convert_to_usd(&mut to).await?;
        }
        let amount_in_usd = amount / from.rate;
        let converted_value = round_to_cents(amount_in_usd * to.rate);
        if !converted_value.is_finite() {
            tracing::warn!(
                "Конвертация {amount} {from} в {to} вышла за пределы f64",
                from = from.currency_code,
                to = to.currency_code
            );
            return Err(AppError::Validation(format!(
                "Converted value of {amount} {} to {} is out of range",
                from.currency_code, to.currency_code
            )));
        }
        tracing::debug!(
            "{amount} {from} -> {converted_value} {to}",
            from = from.currency_code,
            to = to.currency_code
        );
        Ok(Conversion {
            from_this: from.currency_code,
            to: to.currency_code,
            amount,
            converted_value,
            updated_at: from.updated_at,
        })
    }

    /// Переводит курс в долларовый через одну ступень основы
    async fn convert_to_usd(&self, currency: &mut Currency) -> Result<()> {
        if currency.backed_by != USD {
            let backing = self.currencies.resolve(&currency.backed_by).await?;
            currency.rate *= backing.rate;
            currency.backed_by = USD.to_string();
        }
        Ok(())
    }
}
