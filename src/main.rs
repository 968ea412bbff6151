use exchange_api::{config::Settings, ExchangeService};
use tracing::info;

#[shuttle_runtime::main]
async fn main(
    #[shuttle_shared_db::Postgres] pool: sqlx::PgPool,
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    let settings = Settings::from_secrets(&secrets);
    info!("Настройки прочитаны: {settings:?}");
    let router = ExchangeService::new(pool, settings).run().await?;
    info!("Сервис курсов валют готов к работе");
    Ok(router.into())
}
