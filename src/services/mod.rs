//! Service layer for business logic
//!
//! Thin orchestration over the storage layer, shared by all HTTP handlers.

mod campaigns;
mod catalog;
mod links;
mod metrics;
mod redirect;
mod source_resolver;

pub use campaigns::*;
pub use catalog::*;
pub use links::*;
pub use metrics::*;
pub use redirect::*;
pub use source_resolver::*;
