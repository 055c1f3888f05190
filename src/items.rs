//! Line Items

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Canonical product identifier.
///
/// Upstream callers (and the backend itself) pass product ids as strings or
/// numbers interchangeably. Every id is coerced to its string form at this
/// boundary, so identity comparisons are always string-on-string. The
/// coercion is a contract, not an incidental behavior: two ids are the same
/// product exactly when their string forms are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawProductId")]
pub struct ProductId(String);

/// Wire form of a product id: the backend serves both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawProductId {
    Text(String),
    Number(i64),
}

impl From<RawProductId> for ProductId {
    fn from(raw: RawProductId) -> Self {
        match raw {
            RawProductId::Text(id) => ProductId(id),
            RawProductId::Number(id) => ProductId(id.to_string()),
        }
    }
}

impl ProductId {
    /// Returns the canonical string form of the id.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty id is never a valid product reference.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        ProductId(id)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        ProductId(id.to_string())
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        ProductId(id.to_string())
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        ProductId(id.to_string())
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single cart line: one product at one quantity.
///
/// Field names serialize in camelCase so the snapshot payload matches the
/// shape the storefront has always persisted. `image`, `discount_price` and
/// `pv` are genuinely optional in the wild; absent values deserialize to
/// `None` rather than failing the whole payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Uniqueness key within the cart.
    pub product_id: ProductId,

    /// Display name; not used in any calculation.
    pub name: String,

    /// Display image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Original unit price.
    pub price: Decimal,

    /// Discounted unit price, effective only when positive and below `price`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Decimal>,

    /// Units of this product in the cart. Invariant: always >= 1 while the
    /// line exists; a transition to zero removes the line instead.
    pub quantity: u32,

    /// Point value per unit, summed for downstream commission display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pv: Option<Decimal>,

    /// Advisory stock flag; enforcement is a cart policy decision.
    #[serde(default)]
    pub in_stock: bool,
}

impl LineItem {
    /// The effective unit price: the discount price when it is positive and
    /// strictly below the original price, the original price otherwise.
    pub fn unit_price(&self) -> Decimal {
        match self.discount_price {
            Some(discounted) if discounted > Decimal::ZERO && discounted < self.price => {
                discounted
            }
            _ => self.price,
        }
    }

    /// The line's contribution to the cart amount.
    pub fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity)
    }

    /// The line's contribution to the cart PV; missing PV counts as zero.
    pub fn line_pv(&self) -> Decimal {
        self.pv.unwrap_or(Decimal::ZERO) * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn item(price: i64, discount: Option<i64>, quantity: u32) -> LineItem {
        LineItem {
            product_id: ProductId::from("p1"),
            name: "Olive Oil".to_string(),
            image: None,
            price: Decimal::from(price),
            discount_price: discount.map(Decimal::from),
            quantity,
            pv: None,
            in_stock: true,
        }
    }

    #[test]
    fn product_id_coerces_numbers_to_strings() {
        assert_eq!(ProductId::from(42_i64), ProductId::from("42"));
        assert_eq!(ProductId::from(42_u64).as_str(), "42");
    }

    #[test]
    fn product_id_deserializes_from_string_or_number() -> TestResult {
        let from_text: ProductId = serde_json::from_str("\"p7\"")?;
        let from_number: ProductId = serde_json::from_str("7")?;

        assert_eq!(from_text.as_str(), "p7");
        assert_eq!(from_number.as_str(), "7");

        Ok(())
    }

    #[test]
    fn unit_price_prefers_effective_discount() {
        assert_eq!(item(200, Some(150), 1).unit_price(), Decimal::from(150));
    }

    #[test]
    fn unit_price_ignores_zero_discount() {
        assert_eq!(item(200, Some(0), 1).unit_price(), Decimal::from(200));
    }

    #[test]
    fn unit_price_ignores_discount_above_price() {
        assert_eq!(item(200, Some(250), 1).unit_price(), Decimal::from(200));
    }

    #[test]
    fn line_total_multiplies_by_quantity() {
        assert_eq!(item(100, None, 3).line_total(), Decimal::from(300));
    }

    #[test]
    fn line_pv_defaults_missing_pv_to_zero() {
        let mut line = item(100, None, 4);

        assert_eq!(line.line_pv(), Decimal::ZERO);

        line.pv = Some(Decimal::from(10));
        assert_eq!(line.line_pv(), Decimal::from(40));
    }

    #[test]
    fn snapshot_shape_round_trips() -> TestResult {
        let line = item(200, Some(150), 2);

        let payload = serde_json::to_string(&line)?;
        let parsed: LineItem = serde_json::from_str(&payload)?;

        assert!(
            payload.contains("\"productId\""),
            "snapshot keys should be camelCase, got {payload}"
        );
        assert_eq!(parsed, line);

        Ok(())
    }
}
