pub mod error;
pub mod routes;

pub use error::{ApiError, SummaryEndpoint};
pub use routes::{routes, AppState};
