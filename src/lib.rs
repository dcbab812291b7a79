// Expense Gateway - Core Library
// Exposes all modules for use in the server binary and tests

pub mod aggregate;
pub mod config;
pub mod error;
pub mod gateway;
pub mod model;
pub mod upstream;

// Re-export commonly used types
pub use aggregate::{parse_calendar_date, total_for_category, total_in_date_range, DateRange};
pub use config::GatewayConfig;
pub use error::{ErrorBody, FailureCause, GatewayError};
pub use gateway::{router, AppState, DateRangeQuery};
pub use model::{Expense, ExpenseDraft, TotalResponse};
pub use upstream::{UpstreamClient, UpstreamError, UpstreamResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
