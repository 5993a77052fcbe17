use crate::report::euros;
use crate::table::{cell, TableRow};
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Serialize, Serializer};
use sqlx::FromRow;

/// Emits a `NUMERIC` amount as a JSON number.
pub fn decimal_as_f64<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
    match value.to_f64() {
        Some(v) => serializer.serialize_f64(v),
        None => serializer.serialize_none(),
    }
}

// ============ Demo shop (PostgreSQL) ============

/// A registered shop user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl TableRow for User {
    const HEADERS: &'static [&'static str] = &["ID", "Username", "Email", "Full name"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.username.clone(),
            self.email.clone(),
            cell(&self.full_name),
        ]
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

impl TableRow for Category {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Description"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            cell(&self.description),
        ]
    }
}

/// A product joined with its category name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    #[serde(serialize_with = "decimal_as_f64")]
    pub price: BigDecimal,
    pub stock: i32,
    pub category: String,
}

impl TableRow for Product {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Price", "Stock", "Category"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            euros(&self.price),
            self.stock.to_string(),
            self.category.clone(),
        ]
    }
}

/// One order with its customer, as listed by the report tool.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderSummary {
    pub id: i32,
    pub username: String,
    #[serde(serialize_with = "decimal_as_f64")]
    pub total_amount: BigDecimal,
    pub status: Option<String>,
    pub created_on: Option<NaiveDate>,
}

impl TableRow for OrderSummary {
    const HEADERS: &'static [&'static str] = &["ID", "Customer", "Amount", "Status", "Date"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.username.clone(),
            euros(&self.total_amount),
            cell(&self.status),
            cell(&self.created_on),
        ]
    }
}

/// One line item of an order.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderLine {
    pub order_id: i32,
    pub product: String,
    pub quantity: i32,
    #[serde(serialize_with = "decimal_as_f64")]
    pub price: BigDecimal,
}

impl TableRow for OrderLine {
    const HEADERS: &'static [&'static str] = &["Order", "Product", "Qty", "Price"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.order_id.to_string(),
            self.product.clone(),
            self.quantity.to_string(),
            euros(&self.price),
        ]
    }
}

/// A row of the `order_details` view served by `/api/orders`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderDetail {
    pub order_id: i32,
    pub username: String,
    pub full_name: Option<String>,
    pub status: Option<String>,
    #[serde(serialize_with = "decimal_as_f64")]
    pub total_amount: BigDecimal,
    pub item_count: i64,
    pub created_at: Option<DateTime<Utc>>,
}

/// Headline counters of the shop.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ShopStats {
    pub users: i64,
    pub products: i64,
    pub orders: i64,
    pub categories: i64,
    #[serde(serialize_with = "decimal_as_f64")]
    pub total_sales: BigDecimal,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TopProduct {
    pub name: String,
    pub total_sold: i64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TopCustomer {
    pub username: String,
    #[serde(serialize_with = "decimal_as_f64")]
    pub total_spent: BigDecimal,
}

// ============ Entity versions (SQL Server) ============

/// One row of `[data].[EntityVersion]` with its JSON properties unpacked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityVersion {
    pub id: i64,
    pub logical_id: String,
    pub version: i32,
    pub entity_type: Option<String>,
    pub title: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub modified_by: Option<String>,
    pub modified_utc: Option<NaiveDateTime>,
    pub latest: bool,
}

impl EntityVersion {
    fn common_cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.logical_id.clone(),
            self.version.to_string(),
            cell(&self.entity_type),
            cell(&self.title),
            cell(&self.status),
            cell(&self.priority),
            cell(&self.modified_by),
            cell(&self.modified_utc),
        ]
    }
}

impl TableRow for EntityVersion {
    const HEADERS: &'static [&'static str] = &[
        "ID",
        "LogicalId",
        "Ver",
        "Type",
        "Title",
        "Status",
        "Priority",
        "Modified by",
        "Date",
        "Latest",
    ];

    fn cells(&self) -> Vec<String> {
        let mut cells = self.common_cells();
        cells.push(flag(self.latest));
        cells
    }
}

/// A current version, listed without the redundant `Latest` column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LatestVersion(pub EntityVersion);

impl TableRow for LatestVersion {
    const HEADERS: &'static [&'static str] = &[
        "ID",
        "LogicalId",
        "Ver",
        "Type",
        "Title",
        "Status",
        "Priority",
        "Modified by",
        "Date",
    ];

    fn cells(&self) -> Vec<String> {
        self.0.common_cells()
    }
}

/// One step in the history of a single logical entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionHistoryEntry {
    pub version: i32,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub modified_by: Option<String>,
    pub modified_utc: Option<NaiveDateTime>,
    pub latest: bool,
    pub extensions: Option<String>,
}

impl TableRow for VersionHistoryEntry {
    const HEADERS: &'static [&'static str] = &[
        "Ver",
        "Status",
        "Priority",
        "Modified by",
        "Date",
        "Latest",
        "Extensions",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.version.to_string(),
            cell(&self.status),
            cell(&self.priority),
            cell(&self.modified_by),
            cell(&self.modified_utc),
            flag(self.latest),
            cell(&self.extensions),
        ]
    }
}

/// Aggregates over the whole version table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VersionStats {
    pub total_rows: i64,
    pub distinct_entities: i64,
    pub latest_rows: i64,
    /// Mean version number of the current rows; `None` when the table is empty.
    pub average_version: Option<f64>,
    pub by_status: Vec<(Option<String>, i64)>,
    pub by_type: Vec<(Option<String>, i64)>,
    pub by_priority: Vec<(Option<String>, i64)>,
    pub top_contributors: Vec<(Option<String>, i64)>,
}

/// `Latest` is a SQL Server `BIT`; shown as 1/0 like the database does.
fn flag(value: bool) -> String {
    let bit = if value { "1" } else { "0" };
    bit.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_product_serializes_price_as_number() {
        let product = Product {
            id: 1,
            name: "Laptop".to_string(),
            price: BigDecimal::from_str("999.99").unwrap(),
            stock: 10,
            category: "Electronics".to_string(),
        };
        let value = serde_json::to_value(&product).unwrap();

        let price = value["price"].as_f64().unwrap();
        assert!((price - 999.99).abs() < 1e-9);
        assert_eq!(value["category"], "Electronics");
    }

    #[test]
    fn test_product_cells_show_currency() {
        let product = Product {
            id: 2,
            name: "Mouse".to_string(),
            price: BigDecimal::from_str("25.00").unwrap(),
            stock: 3,
            category: "Accessories".to_string(),
        };
        assert_eq!(
            product.cells(),
            vec!["2", "Mouse", "25.00€", "3", "Accessories"]
        );
        assert_eq!(product.cells().len(), Product::HEADERS.len());
    }

    #[test]
    fn test_missing_values_render_as_null() {
        let user = User {
            id: 1,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            full_name: None,
            created_at: None,
        };
        assert_eq!(user.cells()[3], "NULL");
    }

    #[test]
    fn test_latest_version_drops_latest_column() {
        let version = EntityVersion {
            id: 7,
            logical_id: "REQ-001".to_string(),
            version: 3,
            entity_type: Some("request".to_string()),
            title: Some("Laptop".to_string()),
            status: Some("approved".to_string()),
            priority: None,
            modified_by: Some("bob".to_string()),
            modified_utc: None,
            latest: true,
        };

        let full = version.cells();
        assert_eq!(full.len(), EntityVersion::HEADERS.len());
        assert_eq!(full.last().map(String::as_str), Some("1"));

        let latest = LatestVersion(version).cells();
        assert_eq!(latest.len(), LatestVersion::HEADERS.len());
        assert_eq!(latest[6], "NULL");
    }

    #[test]
    fn test_history_cells_match_headers() {
        let entry = VersionHistoryEntry {
            version: 1,
            status: Some("draft".to_string()),
            priority: Some("high".to_string()),
            modified_by: None,
            modified_utc: None,
            latest: false,
            extensions: Some("{}".to_string()),
        };
        let cells = entry.cells();
        assert_eq!(cells.len(), VersionHistoryEntry::HEADERS.len());
        assert_eq!(cells[5], "0");
    }
}
