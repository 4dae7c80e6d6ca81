pub mod prelude;

pub mod banks;
pub mod kyc_documents;
pub mod notifications;
pub mod portfolios;
pub mod projects;
pub mod transactions;
pub mod users;
