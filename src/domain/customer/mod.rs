//! Customer domain - identifiers, raw table and the read-only store

mod entity;
mod store;

pub use entity::{CustomerId, CustomerRef, FeatureTable};
pub use store::{CustomerStore, FeatureMap};
