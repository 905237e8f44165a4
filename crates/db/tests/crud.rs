use chrono::{TimeZone, Utc};
use db::{
    DBService,
    models::{
        account::{Account, CreateAccount, CreateLedgerEntry, LedgerEntry},
        client::{Client, CreateClient, UpdateClient},
        company::{Company, CreateCompany},
        estimate::{CreateEstimate, CreateEstimateLine, DiscountKind, Estimate, EstimateLine, UpdateEstimate},
        financial_profile::{CreateOperatingFee, FinancialProfile, OperatingFee},
        invoice::{CreateInvoice, Invoice},
        project::{CreateProject, Project, ProjectStatus, UpdateProject},
        property::{CreateProperty, Property},
        receipt::{CreateReceipt, Receipt},
    },
    query::ListParams,
};
use uuid::Uuid;

async fn setup() -> (DBService, Uuid) {
    let db = DBService::new_in_memory().await.expect("in-memory db");
    let company = Company::create(
        &db.pool,
        &CreateCompany {
            name: "Evergreen Painting".to_string(),
        },
    )
    .await
    .expect("create company");
    (db, company.id)
}

async fn make_project(db: &DBService, company_id: Uuid) -> Project {
    let client = Client::create(
        &db.pool,
        &CreateClient {
            company_id,
            name: "Dana Alvarez".to_string(),
            email: None,
            phone: None,
            notes: None,
        },
    )
    .await
    .expect("create client");
    Project::create(
        &db.pool,
        &CreateProject {
            company_id,
            client_id: client.id,
            property_id: None,
            name: "Exterior repaint".to_string(),
            status: None,
        },
    )
    .await
    .expect("create project")
}

#[tokio::test]
async fn client_crud_round_trip() {
    let (db, company_id) = setup().await;

    let client = Client::create(
        &db.pool,
        &CreateClient {
            company_id,
            name: "Dana Alvarez".to_string(),
            email: Some("dana@example.com".to_string()),
            phone: Some("5035551234".to_string()),
            notes: None,
        },
    )
    .await
    .expect("create");

    // Ten-digit phone numbers are normalized on write.
    assert_eq!(client.phone.as_deref(), Some("(503) 555-1234"));

    let found = Client::find_by_id(&db.pool, client.id)
        .await
        .expect("find")
        .expect("present");
    assert_eq!(found.name, "Dana Alvarez");

    let updated = Client::update(
        &db.pool,
        client.id,
        &UpdateClient {
            name: None,
            email: None,
            phone: Some("5035559999".to_string()),
            notes: Some("repeat customer".to_string()),
        },
    )
    .await
    .expect("update");
    assert_eq!(updated.phone.as_deref(), Some("(503) 555-9999"));
    assert_eq!(updated.name, "Dana Alvarez");

    let listed = Client::find_by_company_id(&db.pool, company_id, &ListParams::default())
        .await
        .expect("list");
    assert_eq!(listed.len(), 1);

    let deleted = Client::delete(&db.pool, client.id).await.expect("delete");
    assert_eq!(deleted, 1);
    assert!(
        Client::find_by_id(&db.pool, client.id)
            .await
            .expect("find after delete")
            .is_none()
    );
}

#[tokio::test]
async fn project_defaults_to_lead_and_counts_by_status() {
    let (db, company_id) = setup().await;
    let project = make_project(&db, company_id).await;
    assert_eq!(project.status, ProjectStatus::Lead);

    let counts = Project::count_by_status(&db.pool, company_id)
        .await
        .expect("counts");
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].status, ProjectStatus::Lead);
    assert_eq!(counts[0].count, 1);
}

#[tokio::test]
async fn estimate_lines_persist_computed_totals() {
    let (db, company_id) = setup().await;
    let project = make_project(&db, company_id).await;

    let estimate = Estimate::create(
        &db.pool,
        &CreateEstimate {
            company_id,
            project_id: project.id,
            discount_kind: None,
            discount_value: None,
        },
    )
    .await
    .expect("create estimate");
    assert_eq!(estimate.subtotal, 0.0);

    let line = EstimateLine::create(
        &db.pool,
        estimate.id,
        &CreateEstimateLine {
            kind: None,
            description: "Prep and mask".to_string(),
            quantity: 4.0,
            unit_price: 65.0,
        },
    )
    .await
    .expect("create line");
    assert_eq!(line.total, 260.0);

    let lines = EstimateLine::find_by_estimate_id(&db.pool, estimate.id)
        .await
        .expect("lines");
    assert_eq!(lines.len(), 1);
}

#[tokio::test]
async fn estimate_discount_can_be_cleared() {
    let (db, company_id) = setup().await;
    let project = make_project(&db, company_id).await;

    let estimate = Estimate::create(
        &db.pool,
        &CreateEstimate {
            company_id,
            project_id: project.id,
            discount_kind: Some(DiscountKind::Percent),
            discount_value: Some(10.0),
        },
    )
    .await
    .expect("create estimate");
    assert_eq!(estimate.discount_kind, Some(DiscountKind::Percent));

    let cleared = Estimate::update(
        &db.pool,
        estimate.id,
        &UpdateEstimate {
            status: None,
            discount_kind: None,
            discount_value: None,
            clear_discount: true,
        },
    )
    .await
    .expect("clear discount");
    assert_eq!(cleared.discount_kind, None);
    assert_eq!(cleared.discount_value, 0.0);

    // A plain partial update leaves an existing discount alone.
    let estimate = Estimate::update(
        &db.pool,
        estimate.id,
        &UpdateEstimate {
            status: None,
            discount_kind: Some(DiscountKind::Fixed),
            discount_value: Some(50.0),
            clear_discount: false,
        },
    )
    .await
    .expect("set fixed discount");
    let untouched = Estimate::update(
        &db.pool,
        estimate.id,
        &UpdateEstimate {
            status: None,
            discount_kind: None,
            discount_value: None,
            clear_discount: false,
        },
    )
    .await
    .expect("no-op update");
    assert_eq!(untouched.discount_kind, Some(DiscountKind::Fixed));
    assert_eq!(untouched.discount_value, 50.0);
}

#[tokio::test]
async fn project_property_can_be_detached() {
    let (db, company_id) = setup().await;
    let project = make_project(&db, company_id).await;

    let property = Property::create(
        &db.pool,
        &CreateProperty {
            company_id,
            client_id: project.client_id,
            address1: "418 SE Pine St".to_string(),
            address2: None,
            city: "Portland".to_string(),
            state: "OR".to_string(),
            zip: "97214".to_string(),
            stories: Some(2),
            square_feet: None,
        },
    )
    .await
    .expect("create property");

    let attached = Project::update(
        &db.pool,
        project.id,
        &UpdateProject {
            name: None,
            status: None,
            property_id: Some(property.id),
            scheduled_start: None,
            scheduled_end: None,
            detach_property: false,
        },
    )
    .await
    .expect("attach property");
    assert_eq!(attached.property_id, Some(property.id));

    let detached = Project::update(
        &db.pool,
        project.id,
        &UpdateProject {
            name: None,
            status: None,
            property_id: None,
            scheduled_start: None,
            scheduled_end: None,
            detach_property: true,
        },
    )
    .await
    .expect("detach property");
    assert_eq!(detached.property_id, None);
    assert_eq!(detached.name, project.name);
}

#[tokio::test]
async fn receipts_bucket_into_months() {
    let (db, company_id) = setup().await;
    let project = make_project(&db, company_id).await;
    let invoice = Invoice::create(
        &db.pool,
        &CreateInvoice {
            company_id,
            project_id: project.id,
            number: "INV-1001".to_string(),
            amount: 5000.0,
            due_date: None,
        },
    )
    .await
    .expect("create invoice");

    for (month, amount) in [(1, 1000.0), (1, 500.0), (3, 2000.0)] {
        Receipt::create(
            &db.pool,
            &CreateReceipt {
                company_id,
                invoice_id: Some(invoice.id),
                project_id: Some(project.id),
                amount,
                method: None,
                memo: None,
                received_at: Some(Utc.with_ymd_and_hms(2025, month, 15, 12, 0, 0).unwrap()),
            },
        )
        .await
        .expect("create receipt");
    }

    let monthly = Receipt::monthly_totals_for_year(&db.pool, company_id, 2025)
        .await
        .expect("monthly totals");
    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly[0].month, 1);
    assert_eq!(monthly[0].total, 1500.0);
    assert_eq!(monthly[1].month, 3);
    assert_eq!(monthly[1].total, 2000.0);

    let year_total = Receipt::received_total_for_year(&db.pool, company_id, 2025)
        .await
        .expect("year total");
    assert_eq!(year_total, 3500.0);

    // Different year sees nothing.
    let other = Receipt::received_total_for_year(&db.pool, company_id, 2024)
        .await
        .expect("other year");
    assert_eq!(other, 0.0);
}

#[tokio::test]
async fn account_balance_tracks_ledger_entries() {
    let (db, company_id) = setup().await;
    let account = Account::create(
        &db.pool,
        &CreateAccount {
            company_id,
            name: "Materials".to_string(),
            kind: None,
        },
    )
    .await
    .expect("create account");
    assert_eq!(account.balance, 0.0);

    let entry = LedgerEntry::create(
        &db.pool,
        company_id,
        account.id,
        &CreateLedgerEntry {
            amount: -250.0,
            memo: Some("paint order".to_string()),
            entry_date: None,
        },
    )
    .await
    .expect("create entry");

    LedgerEntry::create(
        &db.pool,
        company_id,
        account.id,
        &CreateLedgerEntry {
            amount: -100.0,
            memo: None,
            entry_date: None,
        },
    )
    .await
    .expect("second entry");

    let account = Account::find_by_id(&db.pool, account.id)
        .await
        .expect("find")
        .expect("present");
    assert_eq!(account.balance, -350.0);

    LedgerEntry::delete(&db.pool, entry.id).await.expect("delete entry");
    let account = Account::find_by_id(&db.pool, account.id)
        .await
        .expect("find")
        .expect("present");
    assert_eq!(account.balance, -100.0);
}

#[tokio::test]
async fn financial_profile_created_on_demand_with_fees() {
    let (db, company_id) = setup().await;

    let profile = FinancialProfile::find_or_create(&db.pool, company_id)
        .await
        .expect("profile");
    assert!(profile.tax_rate > 0.0);

    // No fees yet; the sum must still decode as a float zero.
    let empty_total = profile
        .operating_fees_total(&db.pool)
        .await
        .expect("empty fees total");
    assert_eq!(empty_total, 0.0);

    // Second call returns the same row.
    let again = FinancialProfile::find_or_create(&db.pool, company_id)
        .await
        .expect("profile again");
    assert_eq!(again.id, profile.id);

    OperatingFee::create(
        &db.pool,
        profile.id,
        &CreateOperatingFee {
            label: "Insurance".to_string(),
            amount: 120.0,
        },
    )
    .await
    .expect("fee");
    OperatingFee::create(
        &db.pool,
        profile.id,
        &CreateOperatingFee {
            label: "Software".to_string(),
            amount: 30.0,
        },
    )
    .await
    .expect("fee 2");

    let total = profile
        .operating_fees_total(&db.pool)
        .await
        .expect("fees total");
    assert_eq!(total, 150.0);
}
