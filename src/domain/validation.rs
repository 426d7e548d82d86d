//! Request validation
//!
//! Turns the untyped pieces of an incoming request (path identifier and
//! query parameters) into typed values, classifying every failure into the
//! request-time error taxonomy.

use std::collections::HashMap;
use std::num::{IntErrorKind, NonZeroUsize};
use std::str::FromStr;

use super::{CustomerRef, DomainError};

/// Query parameters as received, before validation
pub type QueryParams = HashMap<String, String>;

pub const THRESHOLD_PARAM: &str = "threshold";
pub const SAMPLE_SIZE_PARAM: &str = "n_customers";
pub const VIEW_PARAM: &str = "view";

/// Parse the path identifier.
///
/// Any parse failure is reported as an internal error carrying the parser
/// message, not as a client error.
pub fn parse_customer_ref(raw: &str) -> Result<CustomerRef, DomainError> {
    raw.parse::<i64>()
        .map(CustomerRef::from)
        .map_err(|e| DomainError::internal(e.to_string()))
}

/// Fetch and parse a required query parameter
pub fn required_param<T>(params: &QueryParams, name: &str) -> Result<T, DomainError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = params
        .get(name)
        .ok_or_else(|| DomainError::missing_parameter(name))?;

    raw.trim()
        .parse::<T>()
        .map_err(|e| DomainError::invalid_parameter(name, format!("'{}' ({})", raw, e)))
}

/// Probability cutoff for the loan decision; must be a finite number
pub fn parse_threshold(params: &QueryParams) -> Result<f64, DomainError> {
    let threshold: f64 = required_param(params, THRESHOLD_PARAM)?;

    if !threshold.is_finite() {
        return Err(DomainError::invalid_parameter(
            THRESHOLD_PARAM,
            format!("'{}' is not a finite number", threshold),
        ));
    }

    Ok(threshold)
}

/// Global explanation sample size; must be a positive integer.
///
/// A well-formed count too large for `usize` can never fit the population,
/// so it fails the same way an oversized sample does.
pub fn parse_sample_size(params: &QueryParams) -> Result<NonZeroUsize, DomainError> {
    let raw = params
        .get(SAMPLE_SIZE_PARAM)
        .ok_or_else(|| DomainError::missing_parameter(SAMPLE_SIZE_PARAM))?;

    raw.trim().parse::<NonZeroUsize>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => DomainError::internal(format!(
            "cannot take a larger sample than population: requested {} customers",
            raw.trim()
        )),
        _ => DomainError::invalid_parameter(SAMPLE_SIZE_PARAM, format!("'{}' ({})", raw, e)),
    })
}

/// Which feature vector the customer endpoint returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeatureView {
    #[default]
    Scaled,
    Raw,
}

impl FromStr for FeatureView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scaled" => Ok(Self::Scaled),
            "raw" => Ok(Self::Raw),
            other => Err(format!("unknown view '{}', expected 'scaled' or 'raw'", other)),
        }
    }
}

/// Optional `view` parameter, defaulting to the scaled vector
pub fn parse_view(params: &QueryParams) -> Result<FeatureView, DomainError> {
    if !params.contains_key(VIEW_PARAM) {
        return Ok(FeatureView::default());
    }

    required_param(params, VIEW_PARAM)
}
