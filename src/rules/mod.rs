mod builtin;
mod catalog;

pub use builtin::default_catalog;
pub use catalog::{AdaptationRule, RuleCatalog};
