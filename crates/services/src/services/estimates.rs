//! Estimate recomputation: derive stored totals from the lines.

use db::models::estimate::{Estimate, EstimateLine};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use utils::format::format_currency;
use uuid::Uuid;

use super::pricing::{self, Discount, PricingConstants};

#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("estimate not found: {0}")]
    NotFound(Uuid),
}

pub struct EstimateService;

impl EstimateService {
    /// Recompute an estimate's totals from its current lines and the owning
    /// company's financial profile, persist them, and return the updated row.
    ///
    /// Called after every line mutation and exposed as its own endpoint.
    pub async fn recompute(pool: &SqlitePool, estimate_id: Uuid) -> Result<Estimate, EstimateError> {
        let estimate = Estimate::find_by_id(pool, estimate_id)
            .await?
            .ok_or(EstimateError::NotFound(estimate_id))?;

        let lines = EstimateLine::find_by_estimate_id(pool, estimate_id).await?;
        let line_costs: Vec<f64> = lines.iter().map(|l| l.total).collect();

        let constants = PricingConstants::load(pool, estimate.company_id).await?;
        let discount = Discount::from_stored(
            estimate.discount_kind.as_ref(),
            estimate.discount_value,
        );

        let breakdown = pricing::price_lines(&line_costs, discount, &constants);
        let updated = Estimate::update_totals(pool, estimate_id, &breakdown.totals()).await?;

        info!(
            estimate_id = %estimate_id,
            lines = lines.len(),
            grand_total = %format_currency(updated.grand_total),
            "Recomputed estimate totals"
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use db::{
        DBService,
        models::{
            client::{Client, CreateClient},
            company::{Company, CreateCompany},
            estimate::{CreateEstimate, CreateEstimateLine, DiscountKind, EstimateLine},
            financial_profile::FinancialProfile,
            project::{CreateProject, Project},
        },
    };

    use super::*;
    use crate::services::pricing::{price_lines, Discount};

    async fn setup_estimate(discount: Option<(DiscountKind, f64)>) -> (DBService, Uuid, Uuid) {
        let db = DBService::new_in_memory().await.expect("db");
        let company = Company::create(
            &db.pool,
            &CreateCompany {
                name: "Cascade Drywall".to_string(),
            },
        )
        .await
        .expect("company");
        let client = Client::create(
            &db.pool,
            &CreateClient {
                company_id: company.id,
                name: "Pat Lee".to_string(),
                email: None,
                phone: None,
                notes: None,
            },
        )
        .await
        .expect("client");
        let project = Project::create(
            &db.pool,
            &CreateProject {
                company_id: company.id,
                client_id: client.id,
                property_id: None,
                name: "Garage repair".to_string(),
                status: None,
            },
        )
        .await
        .expect("project");

        let (kind, value) = match discount {
            Some((kind, value)) => (Some(kind), Some(value)),
            None => (None, None),
        };
        let estimate = db::models::estimate::Estimate::create(
            &db.pool,
            &CreateEstimate {
                company_id: company.id,
                project_id: project.id,
                discount_kind: kind,
                discount_value: value,
            },
        )
        .await
        .expect("estimate");
        (db, company.id, estimate.id)
    }

    #[tokio::test]
    async fn recompute_matches_pure_calculator() {
        let (db, company_id, estimate_id) =
            setup_estimate(Some((DiscountKind::Percent, 10.0))).await;

        for (desc, qty, price) in [("Walls", 10.0, 60.0), ("Trim", 4.0, 100.0)] {
            EstimateLine::create(
                &db.pool,
                estimate_id,
                &CreateEstimateLine {
                    kind: None,
                    description: desc.to_string(),
                    quantity: qty,
                    unit_price: price,
                },
            )
            .await
            .expect("line");
        }

        let updated = EstimateService::recompute(&db.pool, estimate_id)
            .await
            .expect("recompute");

        let constants = PricingConstants::load(&db.pool, company_id)
            .await
            .expect("constants");
        let expected = price_lines(&[600.0, 400.0], Discount::Percent(10.0), &constants);

        assert_eq!(updated.subtotal, expected.subtotal);
        assert_eq!(updated.discount_amount, expected.discount_amount);
        assert_eq!(updated.profit, expected.profit);
        assert_eq!(updated.tax, expected.tax);
        assert_eq!(updated.processing_fee, expected.processing_fee);
        assert_eq!(updated.grand_total, expected.grand_total);
        assert_eq!(updated.discount_amount, 100.0);
    }

    #[tokio::test]
    async fn recompute_missing_estimate_is_not_found() {
        let db = DBService::new_in_memory().await.expect("db");
        let err = EstimateService::recompute(&db.pool, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, EstimateError::NotFound(_)));
    }

    #[tokio::test]
    async fn recompute_with_no_lines_zeroes_subtotal() {
        let (db, company_id, estimate_id) = setup_estimate(None).await;
        // Touch the profile so defaults exist before recompute.
        FinancialProfile::find_or_create(&db.pool, company_id)
            .await
            .expect("profile");

        let updated = EstimateService::recompute(&db.pool, estimate_id)
            .await
            .expect("recompute");
        assert_eq!(updated.subtotal, 0.0);
        assert_eq!(updated.discount_amount, 0.0);
    }
}
