pub use reql_core::*;
