pub mod format;
pub mod response;
pub mod sku;
