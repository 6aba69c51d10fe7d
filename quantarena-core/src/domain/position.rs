//! Position — quantity of one instrument, owned exclusively by a portfolio.

use super::market::MarketSnapshot;
use super::valuation::Valuation;

/// An open position. Quantity is signed (negative = short).
pub struct Position {
    pub product: Box<dyn Valuation>,
    pub quantity: f64,
    /// Average entry price per unit.
    pub cost_basis: f64,
}

impl Position {
    pub fn new(product: Box<dyn Valuation>, quantity: f64, cost_basis: f64) -> Self {
        Self {
            product,
            quantity,
            cost_basis,
        }
    }

    pub fn instrument_id(&self) -> &str {
        self.product.instrument_id()
    }

    /// Mark-to-market value: quantity × present value.
    ///
    /// When the market cannot price the instrument, falls back to the entry
    /// price so equity carries forward instead of vanishing.
    pub fn mark_to_market(&self, market: &MarketSnapshot) -> f64 {
        let unit = self
            .product
            .present_value(market)
            .unwrap_or(self.cost_basis);
        self.quantity * unit
    }

    /// Merge an additional fill into this position, averaging the cost basis.
    pub fn rebalance(&mut self, price: f64, quantity: f64) {
        let total = self.quantity + quantity;
        if total.abs() > f64::EPSILON {
            self.cost_basis =
                (self.cost_basis * self.quantity + price * quantity) / total;
        }
        self.quantity = total;
    }

    pub fn is_flat(&self) -> bool {
        self.quantity.abs() < f64::EPSILON
    }
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Position")
            .field("instrument", &self.instrument_id())
            .field("quantity", &self.quantity)
            .field("cost_basis", &self.cost_basis)
            .finish()
    }
}
