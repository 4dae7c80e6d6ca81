pub use super::banks::Entity as Banks;
pub use super::kyc_documents::Entity as KycDocuments;
pub use super::notifications::Entity as Notifications;
pub use super::portfolios::Entity as Portfolios;
pub use super::projects::Entity as Projects;
pub use super::transactions::Entity as Transactions;
pub use super::users::Entity as Users;
