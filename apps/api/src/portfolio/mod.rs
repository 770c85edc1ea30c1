//! Portfolio configuration — the owner's profile and the keyword taxonomy job
//! descriptions are scanned against. Loaded once at startup, read-only after.

pub mod loader;
pub mod models;

pub use loader::load_portfolio;
pub use models::{KeywordTaxonomy, PortfolioConfig, PortfolioProfile};
