pub mod fx;
pub mod oauth;
