//! Database entities module
//!
//! Only the credential store is modelled as an entity; the dataset tables are
//! read through raw statements (see `dataset`).

pub mod api_key;

pub use api_key::Entity as ApiKey;
