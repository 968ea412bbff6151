use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{AppError, Result};

/// Базовая валюта, к которой сводятся курсы при конвертации
pub const USD: &str = "USD";

/// Происхождение записи о валюте
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyType {
    /// курс из внешнего источника, только для чтения
    Coinbase,
    /// пользовательская валюта
    Fictitious,
}

/// Ответ на API запрос /currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub currency_code: String,
    pub rate: f64,
    pub backed_by: String,
    pub currency_type: CurrencyType,
    pub updated_at: DateTime<Utc>,
}
impl Currency {
    pub fn is_reference(&self) -> bool {
        self.currency_type == CurrencyType::Coinbase
    }
}

/// Строка таблицы курсов; тип проставляет хранилище
#[derive(Debug, Clone, FromRow)]
pub struct CurrencyRow {
    pub currency_code: String,
    pub rate: f64,
    pub backed_by: String,
    pub updated_at: DateTime<Utc>,
}
impl CurrencyRow {
    pub fn into_currency(self, currency_type: CurrencyType) -> Currency {
        Currency {
            currency_code: self.currency_code,
            rate: self.rate,
            backed_by: self.backed_by,
            currency_type,
            updated_at: self.updated_at,
        }
    }
}

/// Тело запроса на создание или изменение пользовательской валюты
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrencyInput {
    pub currency_code: String,
    pub backed_by: String,
    pub rate: Option<f64>,
    pub amount: Option<f64>,
    pub backed_currency_amount: Option<f64>,
}

/// Проверенные данные пользовательской валюты, готовые к записи
#[derive(Debug, Clone, PartialEq)]
pub struct CustomCurrency {
    pub currency_code: String,
    pub rate: f64,
    pub backed_by: String,
}

const NEITHER_RATE_FORM: &str =
    "You should provide whether a rate field or an amount and backed_currency_amount fields";
const BOTH_RATE_FORMS: &str =
    "You should provide only a rate field or an amount and backed_currency_amount fields";

impl TryFrom<CurrencyInput> for CustomCurrency {
    type Error = AppError;

    fn try_from(input: CurrencyInput) -> Result<Self> {
        let rate = match (input.rate, input.amount, input.backed_currency_amount) {
            (Some(rate), None, None) => positive("rate", rate)?,
            (None, Some(amount), Some(backed_amount)) => {
                let amount = positive("amount", amount)?;
                let backed_amount = positive("backed_currency_amount", backed_amount)?;
                positive("rate", amount / backed_amount)?
            }
            (None, _, _) => return Err(AppError::Validation(NEITHER_RATE_FORM.to_string())),
            (Some(_), _, _) => return Err(AppError::Validation(BOTH_RATE_FORMS.to_string())),
        };
        let currency_code = normalize_code(&input.currency_code);
        let backed_by = normalize_code(&input.backed_by);
        if currency_code.is_empty() {
            return Err(AppError::Validation(
                "currency_code must not be empty".to_string(),
            ));
        }
        if backed_by.is_empty() {
            return Err(AppError::Validation(
                "backed_by must not be empty".to_string(),
            ));
        }
        Ok(Self {
            currency_code,
            rate,
            backed_by,
        })
    }
}

/// Коды валют регистронезависимы и хранятся в верхнем регистре
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Отбрасывает нулевые, отрицательные и нечисловые значения
pub fn positive(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(AppError::Validation(format!(
            "{field} must be a positive number"
        )))
    }
}
