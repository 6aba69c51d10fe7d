//! Domain types: quotes, the market snapshot, the simulated book, weights.

pub mod market;
pub mod portfolio;
pub mod position;
pub mod quote;
pub mod valuation;
pub mod weights;

pub use market::MarketSnapshot;
pub use portfolio::{NavPoint, Portfolio, TradeLogEntry, TradeRejection};
pub use position::Position;
pub use quote::Quote;
pub use valuation::{Spot, Valuation};
pub use weights::WeightVector;
