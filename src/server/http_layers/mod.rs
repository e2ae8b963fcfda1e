mod rate_limit;
mod requests_logging;

pub use rate_limit::*;
pub use requests_logging::*;
