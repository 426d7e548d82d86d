//! Infrastructure layer - Artifact loading, services and observability

pub mod dataset;
pub mod explain;
pub mod model;
pub mod observability;
pub mod services;
