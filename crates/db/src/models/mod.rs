pub mod account;
pub mod asset;
pub mod client;
pub mod company;
pub mod estimate;
pub mod financial_profile;
pub mod invoice;
pub mod production_rate;
pub mod project;
pub mod project_image;
pub mod property;
pub mod receipt;
pub mod vendor;
