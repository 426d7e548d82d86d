//! Infrastructure services

mod scoring_service;

pub use scoring_service::{CustomerData, ScoringService};

#[cfg(test)]
pub(crate) use scoring_service::tests as fixtures;
