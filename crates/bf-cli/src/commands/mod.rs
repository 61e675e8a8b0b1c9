//! CLI command implementations

pub(crate) mod check_staging;
pub(crate) mod clean;
pub(crate) mod common;
pub(crate) mod extract_api;
pub(crate) mod extract_sql;
pub(crate) mod load;
pub(crate) mod run;
pub(crate) mod transform;
