pub mod bank;
pub mod kyc;
pub mod notification;
pub mod portfolio;
pub mod project;
pub mod transaction;
pub mod user;
