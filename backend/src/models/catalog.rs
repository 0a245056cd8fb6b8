//! Models for categories and products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
/// Binary availability flag, not an inventory count.
pub enum StockStatus {
    Available,
    NotAvailable,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: StockStatus,
    pub category_id: i64,
    pub image_url: Option<String>,
}

/// Flattened join row used by list/detail queries so callers need no
/// follow-up category lookup.
#[derive(Debug, Clone, FromRow)]
pub struct ProductWithCategory {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: StockStatus,
    pub image_url: Option<String>,
    pub category_id: i64,
    pub category_name: String,
    pub category_description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Product detail including its category.
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: StockStatus,
    pub image_url: Option<String>,
    pub category: Category,
}

impl From<ProductWithCategory> for ProductResponse {
    fn from(row: ProductWithCategory) -> Self {
        ProductResponse {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            stock: row.stock,
            image_url: row.image_url,
            category: Category {
                id: row.category_id,
                name: row.category_name,
                description: row.category_description,
            },
        }
    }
}

/// Prices carry monetary precision: strictly positive, at most two
/// fractional digits after normalization.
pub fn normalize_price(price: Decimal) -> Result<Decimal, AppError> {
    if price <= Decimal::ZERO {
        return Err(AppError::Validation(vec![
            "price: must be greater than 0".to_string(),
        ]));
    }
    let mut normalized = price.round_dp(2);
    normalized.rescale(2);
    Ok(normalized)
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryCreate {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CategoryUpdate {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
}

impl Category {
    /// Explicit merge of the permitted mutable fields; absent fields keep
    /// their current values.
    pub fn apply_update(&mut self, update: CategoryUpdate) -> Result<(), AppError> {
        update.validate().map_err(AppError::from)?;
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProductCreate {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub name: String,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: StockStatus,
    pub category_id: i64,
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub image_url: Option<String>,
}

impl ProductCreate {
    /// Product names are case-normalized to uppercase at the boundary.
    pub fn normalized_name(&self) -> String {
        self.name.trim().to_uppercase()
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProductUpdate {
    #[validate(length(min = 1, max = 255, message = "must be 1-255 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<StockStatus>,
    pub category_id: Option<i64>,
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub image_url: Option<String>,
}

impl ProductUpdate {
    pub fn normalized_name(&self) -> Option<String> {
        self.name.as_ref().map(|n| n.trim().to_uppercase())
    }
}

impl Product {
    /// Explicit merge enumerating the permitted mutable fields, validating
    /// each before assignment.
    pub fn apply_update(&mut self, update: ProductUpdate) -> Result<(), AppError> {
        update.validate().map_err(AppError::from)?;
        if let Some(name) = update.normalized_name() {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(price) = update.price {
            self.price = normalize_price(price)?;
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }
        if let Some(image_url) = update.image_url {
            self.image_url = Some(image_url);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn sample_product() -> Product {
        Product {
            id: 1,
            name: "WIDGET".to_string(),
            description: None,
            price: dec("9.99"),
            stock: StockStatus::Available,
            category_id: 1,
            image_url: None,
        }
    }

    #[test]
    fn stock_status_serde_uses_snake_case() {
        assert_eq!(
            serde_json::to_string(&StockStatus::NotAvailable).unwrap(),
            "\"not_available\""
        );
        let parsed: StockStatus = serde_json::from_str("\"available\"").unwrap();
        assert_eq!(parsed, StockStatus::Available);
    }

    #[test]
    fn normalize_price_rejects_non_positive() {
        assert!(normalize_price(Decimal::ZERO).is_err());
        assert!(normalize_price(dec("-1.00")).is_err());
    }

    #[test]
    fn normalize_price_fixes_two_fractional_digits() {
        assert_eq!(normalize_price(dec("10.999")).unwrap(), dec("11.00"));
        assert_eq!(normalize_price(dec("10.5")).unwrap(), dec("10.50"));
        assert_eq!(normalize_price(dec("10.5")).unwrap().scale(), 2);
    }

    #[test]
    fn product_create_normalizes_name_to_uppercase() {
        let payload = ProductCreate {
            name: " widget pro ".to_string(),
            description: None,
            price: dec("1.00"),
            stock: StockStatus::Available,
            category_id: 1,
            image_url: None,
        };
        assert_eq!(payload.normalized_name(), "WIDGET PRO");
    }

    #[test]
    fn product_apply_update_merges_only_provided_fields() {
        let mut product = sample_product();
        let update = ProductUpdate {
            name: Some("gadget".to_string()),
            description: None,
            price: Some(dec("12.5")),
            stock: None,
            category_id: None,
            image_url: None,
        };
        product.apply_update(update).unwrap();
        assert_eq!(product.name, "GADGET");
        assert_eq!(product.price, dec("12.50"));
        assert_eq!(product.stock, StockStatus::Available);
        assert_eq!(product.category_id, 1);
    }

    #[test]
    fn product_apply_update_rejects_bad_price() {
        let mut product = sample_product();
        let update = ProductUpdate {
            name: None,
            description: None,
            price: Some(dec("0")),
            stock: None,
            category_id: None,
            image_url: None,
        };
        assert!(product.apply_update(update).is_err());
    }
}
