pub mod models;
pub mod db;
pub mod portfolio;
pub mod store;

pub use db::PortfolioDb;
pub use models::*;
pub use portfolio::{compute_pnl, summarize, validate_holding, Portfolio};
pub use store::HoldingStore;
