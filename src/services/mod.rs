pub mod documents;
pub mod ledger;
