pub mod dashboard;
pub mod estimates;
pub mod labor;
pub mod pricing;
pub mod receipts;
pub mod storage;
