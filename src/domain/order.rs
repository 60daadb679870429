use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::product::Product;

pub const MAX_LINE_QUANTITY: i32 = 1000;

/// Totals must stay below the ledger's `NUMERIC(12, 2)` range.
const ORDER_TOTAL_LIMIT: i64 = 10_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Paid,
    Confirmed,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// True once a payment has been applied to the order.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            OrderStatus::Paid | OrderStatus::Confirmed | OrderStatus::Completed
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::Validation(format!(
                "Unknown order status '{}'",
                other
            ))),
        }
    }
}

/// A line as submitted by the shopper. Only the product reference, quantity
/// and variant are taken from the client.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub product_id: i32,
    pub quantity: Option<i32>,
    pub variant: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub customer_name: String,
    pub customer_email: String,
    pub lines: Vec<CartLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: i32,
    pub name: String,
    pub price: BigDecimal,
    pub variant: Option<String>,
    pub quantity: i32,
}

/// A fully priced order ready to be written to the ledger.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_initials: String,
    pub items: Vec<OrderLine>,
    pub total: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_initials: String,
    pub items: Vec<OrderLine>,
    pub total: BigDecimal,
    pub payment_provider: Option<String>,
    pub payment_id: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<Order>,
    pub total: i64,
}

/// Uppercase first letters of the whitespace separated name parts, at most two.
pub fn customer_initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

fn required(value: &str, field: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Price a draft against the authoritative catalog rows.
///
/// Lines referring to products missing from `catalog` are dropped. The total
/// is always recomputed from catalog prices.
pub fn build_order(draft: OrderDraft, catalog: &[Product]) -> Result<NewOrder, DomainError> {
    let customer_name = required(&draft.customer_name, "customer_name")?;
    let customer_email = required(&draft.customer_email, "customer_email")?;
    if draft.lines.is_empty() {
        return Err(DomainError::validation("items[] must not be empty"));
    }

    let mut items = Vec::with_capacity(draft.lines.len());
    for line in draft.lines {
        let quantity = line.quantity.unwrap_or(1);
        if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
            return Err(DomainError::Validation(format!(
                "Quantity for product {} must be between 1 and {}",
                line.product_id, MAX_LINE_QUANTITY
            )));
        }
        let Some(product) = catalog.iter().find(|p| p.id == line.product_id) else {
            continue;
        };
        items.push(OrderLine {
            product_id: product.id,
            name: product.name_en.clone(),
            price: product.price.clone(),
            variant: line
                .variant
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            quantity,
        });
    }

    if items.is_empty() {
        return Err(DomainError::validation("No valid products in order"));
    }

    let total = items
        .iter()
        .fold(BigDecimal::from(0), |acc, item| {
            acc + &item.price * BigDecimal::from(item.quantity)
        });
    if total >= BigDecimal::from(ORDER_TOTAL_LIMIT) {
        return Err(DomainError::validation("Order total is too large"));
    }

    Ok(NewOrder {
        customer_initials: customer_initials(&customer_name),
        customer_name,
        customer_email,
        items,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::tests::product;

    fn draft(lines: Vec<CartLine>) -> OrderDraft {
        OrderDraft {
            customer_name: "Ahmed Ali".to_string(),
            customer_email: "ahmed@example.com".to_string(),
            lines,
        }
    }

    fn line(product_id: i32, quantity: i32) -> CartLine {
        CartLine {
            product_id,
            quantity: Some(quantity),
            variant: None,
        }
    }

    #[test]
    fn initials_take_first_letter_of_each_word() {
        assert_eq!(customer_initials("Ahmed Ali"), "AA");
        assert_eq!(customer_initials("john doe"), "JD");
        assert_eq!(customer_initials("Zed"), "Z");
    }

    #[test]
    fn initials_are_truncated_to_two_letters() {
        assert_eq!(customer_initials("Mary Jane Watson"), "MJ");
        assert_eq!(customer_initials("  spaced   out  "), "SO");
        assert_eq!(customer_initials(""), "");
    }

    #[test]
    fn total_uses_catalog_prices() {
        let catalog = vec![product(1, "49.99"), product(2, "10.00")];
        let order = build_order(draft(vec![line(1, 2), line(2, 3)]), &catalog).unwrap();

        assert_eq!(order.total, BigDecimal::from_str("129.98").unwrap());
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].name, "Product 1");
        assert_eq!(order.customer_initials, "AA");
    }

    #[test]
    fn unknown_products_are_dropped() {
        let catalog = vec![product(1, "5.00")];
        let order = build_order(draft(vec![line(1, 1), line(99, 4)]), &catalog).unwrap();

        assert_eq!(order.items.len(), 1);
        assert_eq!(order.total, BigDecimal::from_str("5.00").unwrap());
    }

    #[test]
    fn all_unknown_products_is_a_validation_error() {
        let catalog = vec![product(1, "5.00")];
        let err = build_order(draft(vec![line(7, 1)]), &catalog).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn empty_cart_is_a_validation_error() {
        let err = build_order(draft(vec![]), &[]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn blank_customer_fields_are_rejected() {
        let catalog = vec![product(1, "5.00")];
        let mut d = draft(vec![line(1, 1)]);
        d.customer_email = "   ".to_string();
        let err = build_order(d, &catalog).unwrap_err();
        assert_eq!(err.to_string(), "customer_email is required");
    }

    #[test]
    fn missing_quantity_defaults_to_one_and_negative_is_rejected() {
        let catalog = vec![product(1, "5.00")];
        let order = build_order(
            draft(vec![CartLine {
                product_id: 1,
                quantity: None,
                variant: Some(" Large ".to_string()),
            }]),
            &catalog,
        )
        .unwrap();
        assert_eq!(order.items[0].quantity, 1);
        assert_eq!(order.items[0].variant.as_deref(), Some("Large"));

        let err = build_order(draft(vec![line(1, -2)]), &catalog).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn oversized_quantity_is_rejected() {
        let catalog = vec![product(1, "49.99")];
        let err = build_order(draft(vec![line(1, i32::MAX)]), &catalog).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let order = build_order(draft(vec![line(1, MAX_LINE_QUANTITY)]), &catalog).unwrap();
        assert_eq!(order.total, BigDecimal::from_str("49990.00").unwrap());
    }

    #[test]
    fn total_beyond_ledger_range_is_rejected() {
        let catalog = vec![product(1, "99999999.99")];
        let err = build_order(draft(vec![line(1, 200)]), &catalog).unwrap_err();
        assert_eq!(err.to_string(), "Order total is too large");
    }

    #[test]
    fn status_parses_lowercase_names_only() {
        assert_eq!("paid".parse::<OrderStatus>().unwrap(), OrderStatus::Paid);
        assert!("PAID".parse::<OrderStatus>().is_err());
        assert!(OrderStatus::Completed.is_settled());
        assert!(!OrderStatus::Cancelled.is_settled());
    }
}
