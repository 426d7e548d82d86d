//! Wire types shared by the scoring endpoints

pub mod envelope;
pub mod error;
pub mod path;
pub mod query;

pub use envelope::ApiResponse;
pub use error::{ApiError, ApiErrorResponse};
pub use path::Path;
pub use query::{Params, Query};
