//! String catalog and inventory models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// String product from string_products
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StringProduct {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub gauge: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub stock_quantity: i32,
    pub reorder_threshold: i32,
    pub active: bool,
}

impl StringProduct {
    /// Stock at or below the reorder threshold warrants a low-stock alert.
    pub fn needs_reorder(&self) -> bool {
        self.stock_quantity <= self.reorder_threshold
    }
}

/// Customer-facing catalog entry (no stock or threshold data)
#[derive(Debug, Clone, Serialize)]
pub struct StringCatalogEntry {
    pub id: Uuid,
    pub name: String,
    pub brand: String,
    pub gauge: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub in_stock: bool,
}

impl StringCatalogEntry {
    pub fn from_product(product: &StringProduct) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            brand: product.brand.clone(),
            gauge: product.gauge.clone(),
            price: product.price,
            in_stock: product.stock_quantity > 0,
        }
    }
}

/// Low-stock alert from inventory_alerts
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryAlert {
    pub id: Uuid,
    pub string_product_id: Uuid,
    pub stock_at_alert: i32,
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(stock: i32, threshold: i32) -> StringProduct {
        StringProduct {
            id: Uuid::new_v4(),
            name: "ALU Power".to_string(),
            brand: "Luxilon".to_string(),
            gauge: "16L".to_string(),
            price: dec!(25),
            stock_quantity: stock,
            reorder_threshold: threshold,
            active: true,
        }
    }

    #[test]
    fn test_needs_reorder_at_and_below_threshold() {
        assert!(product(3, 3).needs_reorder());
        assert!(product(0, 3).needs_reorder());
        assert!(!product(4, 3).needs_reorder());
    }

    #[test]
    fn test_catalog_entry_hides_stock_numbers() {
        let entry = StringCatalogEntry::from_product(&product(2, 3));
        assert!(entry.in_stock);
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("stock_quantity").is_none());
        assert_eq!(json["price"], "25");
    }
}
