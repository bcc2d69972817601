mod rate_limit;

pub mod news;
pub mod simulated;
pub mod twelve_data;

pub use news::{CannedNewsFeed, GNewsClient};
pub use simulated::SimulatedMarket;
pub use twelve_data::TwelveDataClient;
