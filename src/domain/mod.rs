//! Domain layer - Core business logic and entities

pub mod classifier;
pub mod customer;
pub mod error;
pub mod explain;
pub mod scaling;
pub mod validation;

pub use classifier::{decide, sigmoid, Classifier, Decision, Prediction};
pub use customer::{CustomerId, CustomerRef, CustomerStore, FeatureMap, FeatureTable};
pub use error::DomainError;
pub use explain::{sample_positions, Additivity, Explainer, Explanation, DEFAULT_SAMPLE_SEED};
pub use scaling::{FittedRobustScaler, RobustScaler};
pub use validation::{
    parse_customer_ref, parse_sample_size, parse_threshold, parse_view, required_param,
    FeatureView, QueryParams,
};
