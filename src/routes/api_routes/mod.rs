use crate::models::AppState;
use axum::routing::get;
use axum::Router;

mod convert;
mod currency;

pub fn init(state: AppState) -> Router {
    Router::new()
        .route(
            "/currency",
            get(currency::currencies).post(currency::create_currency),
        )
        .route(
            "/currency/{currency_code}",
            get(currency::currency)
                .put(currency::update_currency)
                .delete(currency::delete_currency),
        )
        .route("/convert", get(convert::convert))
        .with_state(state)
}
