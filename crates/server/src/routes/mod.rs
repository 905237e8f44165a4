pub mod accounts;
pub mod assets;
pub mod calculator;
pub mod clients;
pub mod companies;
pub mod dashboard;
pub mod estimates;
pub mod financial_profile;
pub mod images;
pub mod invoices;
pub mod production_rates;
pub mod projects;
pub mod properties;
pub mod receipts;
pub mod vendors;

use axum::Router;

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/api",
        Router::new()
            .merge(accounts::router())
            .merge(assets::router())
            .merge(calculator::router())
            .merge(clients::router())
            .merge(companies::router())
            .merge(dashboard::router())
            .merge(estimates::router())
            .merge(financial_profile::router())
            .merge(images::router())
            .merge(invoices::router())
            .merge(production_rates::router())
            .merge(projects::router())
            .merge(properties::router())
            .merge(receipts::router())
            .merge(vendors::router()),
    )
}
