use bigdecimal::BigDecimal;

use super::errors::DomainError;

pub const PRICE_REFERENCE_PREFIX: &str = "pri_";
pub const MAX_VARIANTS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i32,
    pub name_ar: String,
    pub name_en: String,
    pub emoji: String,
    pub category: String,
    pub price: BigDecimal,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub sort_order: i32,
    pub payment_price_reference: Option<String>,
    pub preview_links: Option<String>,
    pub images: Vec<String>,
    pub variants: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name_ar: String,
    pub name_en: String,
    pub emoji: String,
    pub category: String,
    pub price: BigDecimal,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub sort_order: i32,
    pub payment_price_reference: Option<String>,
    pub preview_links: Option<String>,
    pub images: Vec<String>,
    pub variants: Vec<String>,
}

/// Partial product update. `None` keeps the stored value; for the nullable
/// text columns `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name_ar: Option<String>,
    pub name_en: Option<String>,
    pub emoji: Option<String>,
    pub category: Option<String>,
    pub price: Option<BigDecimal>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
    pub payment_price_reference: Option<String>,
    pub image_url: Option<Option<String>>,
    pub preview_links: Option<Option<String>>,
    pub images: Option<Vec<String>>,
    pub variants: Option<Vec<String>>,
}

/// Split a newline separated admin text field into trimmed, non-blank entries.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn cap_variants(mut variants: Vec<String>) -> Vec<String> {
    variants.truncate(MAX_VARIANTS);
    variants
}

/// Normalise a submitted price reference: blank means "not provided".
pub fn normalize_price_reference(raw: Option<&str>) -> Result<Option<String>, DomainError> {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if !value.starts_with(PRICE_REFERENCE_PREFIX) {
        return Err(DomainError::validation("Invalid Paddle price ID format"));
    }
    Ok(Some(value.to_string()))
}

/// Decide the price reference to store on update.
///
/// Returns `Some(reference)` when the column should be written. A stored
/// reference can never be replaced by a different one.
pub fn resolve_price_reference(
    current: Option<&str>,
    requested: Option<&str>,
) -> Result<Option<String>, DomainError> {
    let Some(requested) = normalize_price_reference(requested)? else {
        return Ok(None);
    };
    match current.map(str::trim).filter(|c| !c.is_empty()) {
        Some(current) if current != requested => Err(DomainError::validation(
            "Paddle price ID is locked and cannot be changed from admin edits",
        )),
        _ => Ok(Some(requested)),
    }
}

pub fn validate_price(price: &BigDecimal) -> Result<(), DomainError> {
    if price < &BigDecimal::from(0) {
        return Err(DomainError::validation("price must not be negative"));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use std::str::FromStr;

    use super::*;

    pub(crate) fn product(id: i32, price: &str) -> Product {
        Product {
            id,
            name_ar: format!("منتج {}", id),
            name_en: format!("Product {}", id),
            emoji: "*".to_string(),
            category: "general".to_string(),
            price: BigDecimal::from_str(price).expect("valid decimal"),
            description: None,
            image_url: None,
            sort_order: id,
            payment_price_reference: Some(format!("pri_{}", id)),
            preview_links: None,
            images: vec![],
            variants: vec![],
        }
    }

    #[test]
    fn split_lines_drops_blank_entries() {
        assert_eq!(
            split_lines("a.png\r\n\n  b.png  \n"),
            vec!["a.png".to_string(), "b.png".to_string()]
        );
    }

    #[test]
    fn variants_are_capped() {
        let many: Vec<String> = (0..8).map(|i| i.to_string()).collect();
        assert_eq!(cap_variants(many).len(), MAX_VARIANTS);
    }

    #[test]
    fn price_reference_must_carry_prefix() {
        assert!(normalize_price_reference(Some("abc")).is_err());
        assert_eq!(normalize_price_reference(Some("  ")).unwrap(), None);
        assert_eq!(
            normalize_price_reference(Some(" pri_1 ")).unwrap().as_deref(),
            Some("pri_1")
        );
    }

    #[test]
    fn price_reference_is_write_once() {
        assert_eq!(
            resolve_price_reference(None, Some("pri_a")).unwrap().as_deref(),
            Some("pri_a")
        );
        assert_eq!(
            resolve_price_reference(Some("pri_a"), Some("pri_a"))
                .unwrap()
                .as_deref(),
            Some("pri_a")
        );
        assert_eq!(resolve_price_reference(Some("pri_a"), Some("")).unwrap(), None);
        assert!(matches!(
            resolve_price_reference(Some("pri_a"), Some("pri_b")),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn negative_price_is_rejected() {
        assert!(validate_price(&BigDecimal::from(-1)).is_err());
        assert!(validate_price(&BigDecimal::from(0)).is_ok());
    }
}
