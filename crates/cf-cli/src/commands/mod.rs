//! CLI command implementations

pub(crate) mod common;
pub(crate) mod daily;
#[cfg(feature = "serve")]
pub(crate) mod serve;
pub(crate) mod weekly;
