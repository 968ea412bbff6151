mod convert;
mod currency;
use std::sync::Arc;

pub use convert::*;
pub use currency::*;
use serde::Serialize;

use crate::convert_service::ConvertService;
use crate::currency_service::CurrencyService;

/// Обертка ответа API
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}
impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Общие данные для обработчиков
#[derive(Clone)]
pub struct AppState {
    pub currency_service: Arc<CurrencyService>,
    pub convert_service: Arc<ConvertService>,
}
impl AppState {
    /// Создать новый экземпляр общих данных
    pub fn new(currency_service: Arc<CurrencyService>) -> Self {
        let convert_service = Arc::new(ConvertService::new(currency_service.clone()));
        Self {
            currency_service,
            convert_service,
        }
    }
}
