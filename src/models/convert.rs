use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Параметры запроса /convert
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertQuery {
    pub from_this: String,
    pub to: String,
    pub amount: f64,
}

/// Результат конвертации
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversion {
    pub from_this: String,
    pub to: String,
    pub amount: f64,
    pub converted_value: f64,
    /// время обновления курса исходной валюты
    pub updated_at: DateTime<Utc>,
}
