/// Configuration types for helium
///
/// This module contains the JSON store description: initial state,
/// middleware list, declarative reducer rules and action schemas.

mod error;
mod middleware;
mod reducer;
mod root;

pub use error::ConfigError;
pub use middleware::MiddlewareKind;
pub use reducer::{ReducerRule, RuleReducer};
pub use root::StoreConfig;
