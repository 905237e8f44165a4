//! Receipt recording with the invoice-ownership invariant.

use db::models::{
    invoice::Invoice,
    receipt::{CreateReceipt, Receipt},
};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invoice not found: {0}")]
    InvoiceNotFound(Uuid),
    #[error("receipt company does not match invoice company")]
    CompanyMismatch,
    #[error("receipt amount must be positive")]
    NonPositiveAmount,
}

pub struct ReceiptService;

impl ReceiptService {
    /// Record a payment. When the receipt references an invoice, the invoice
    /// must exist and belong to the same company as the receipt.
    pub async fn record(pool: &SqlitePool, data: &CreateReceipt) -> Result<Receipt, ReceiptError> {
        if data.amount <= 0.0 {
            return Err(ReceiptError::NonPositiveAmount);
        }

        if let Some(invoice_id) = data.invoice_id {
            let invoice = Invoice::find_by_id(pool, invoice_id)
                .await?
                .ok_or(ReceiptError::InvoiceNotFound(invoice_id))?;
            if invoice.company_id != data.company_id {
                return Err(ReceiptError::CompanyMismatch);
            }
        }

        let receipt = Receipt::create(pool, data).await?;
        info!(
            receipt_id = %receipt.id,
            company_id = %receipt.company_id,
            amount = receipt.amount,
            "Recorded receipt"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use db::{
        DBService,
        models::{
            client::{Client, CreateClient},
            company::{Company, CreateCompany},
            invoice::CreateInvoice,
            project::{CreateProject, Project},
        },
    };

    use super::*;

    async fn company_with_invoice(db: &DBService, name: &str) -> (Uuid, Uuid) {
        let company = Company::create(
            &db.pool,
            &CreateCompany {
                name: name.to_string(),
            },
        )
        .await
        .expect("company");
        let client = Client::create(
            &db.pool,
            &CreateClient {
                company_id: company.id,
                name: "Client".to_string(),
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
                name: "Job".to_string(),
                status: None,
            },
        )
        .await
        .expect("project");
        let invoice = Invoice::create(
            &db.pool,
            &CreateInvoice {
                company_id: company.id,
                project_id: project.id,
                number: format!("{name}-1"),
                amount: 1000.0,
                due_date: None,
            },
        )
        .await
        .expect("invoice");
        (company.id, invoice.id)
    }

    fn receipt_for(company_id: Uuid, invoice_id: Option<Uuid>, amount: f64) -> CreateReceipt {
        CreateReceipt {
            company_id,
            invoice_id,
            project_id: None,
            amount,
            method: None,
            memo: None,
            received_at: None,
        }
    }

    #[tokio::test]
    async fn records_receipt_against_own_invoice() {
        let db = DBService::new_in_memory().await.expect("db");
        let (company_id, invoice_id) = company_with_invoice(&db, "A").await;

        let receipt = ReceiptService::record(
            &db.pool,
            &receipt_for(company_id, Some(invoice_id), 250.0),
        )
        .await
        .expect("record");
        assert_eq!(receipt.amount, 250.0);
        assert_eq!(receipt.invoice_id, Some(invoice_id));
    }

    #[tokio::test]
    async fn rejects_cross_company_receipt() {
        let db = DBService::new_in_memory().await.expect("db");
        let (_company_a, invoice_a) = company_with_invoice(&db, "A").await;
        let (company_b, _invoice_b) = company_with_invoice(&db, "B").await;

        let err = ReceiptService::record(
            &db.pool,
            &receipt_for(company_b, Some(invoice_a), 250.0),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ReceiptError::CompanyMismatch));
    }

    #[tokio::test]
    async fn rejects_missing_invoice_and_bad_amount() {
        let db = DBService::new_in_memory().await.expect("db");
        let (company_id, _invoice) = company_with_invoice(&db, "A").await;

        let err = ReceiptService::record(
            &db.pool,
            &receipt_for(company_id, Some(Uuid::new_v4()), 10.0),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ReceiptError::InvoiceNotFound(_)));

        let err = ReceiptService::record(&db.pool, &receipt_for(company_id, None, 0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ReceiptError::NonPositiveAmount));
    }
}
