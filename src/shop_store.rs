use crate::models::{
    Category, OrderDetail, OrderLine, OrderSummary, Product, ShopStats, TopCustomer, TopProduct,
    User,
};
use sqlx::PgPool;

/// Number of entries in the "top" rankings.
pub const TOP_LIMIT: i64 = 3;

/// Read-only queries against the demo shop schema.
///
/// Expected tables: `users`, `categories`, `products`, `orders`,
/// `order_items`, and the `order_details` view (one row per order with
/// `order_id, username, full_name, status, total_amount, item_count,
/// created_at`).
#[derive(Clone)]
pub struct ShopStore {
    pool: PgPool,
}

impl ShopStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn users(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, full_name, created_at::timestamptz AS created_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn categories(&self) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT id, name, description FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn products(&self) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.price, p.stock, c.name AS category
            FROM products p
            JOIN categories c ON p.category_id = c.id
            ORDER BY p.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn orders(&self) -> Result<Vec<OrderSummary>, sqlx::Error> {
        sqlx::query_as::<_, OrderSummary>(
            r#"
            SELECT o.id, u.username, o.total_amount, o.status, o.created_at::date AS created_on
            FROM orders o
            JOIN users u ON o.user_id = u.id
            ORDER BY o.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn order_lines(&self) -> Result<Vec<OrderLine>, sqlx::Error> {
        sqlx::query_as::<_, OrderLine>(
            r#"
            SELECT oi.order_id, p.name AS product, oi.quantity, oi.price
            FROM order_items oi
            JOIN products p ON oi.product_id = p.id
            ORDER BY oi.order_id, oi.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Newest orders first.
    pub async fn order_details(&self) -> Result<Vec<OrderDetail>, sqlx::Error> {
        sqlx::query_as::<_, OrderDetail>(
            r#"
            SELECT order_id, username, full_name, status, total_amount,
                   item_count::bigint AS item_count,
                   created_at::timestamptz AS created_at
            FROM order_details
            ORDER BY order_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn stats(&self) -> Result<ShopStats, sqlx::Error> {
        sqlx::query_as::<_, ShopStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM users) AS users,
                (SELECT COUNT(*) FROM products) AS products,
                (SELECT COUNT(*) FROM orders) AS orders,
                (SELECT COUNT(*) FROM categories) AS categories,
                (SELECT COALESCE(SUM(total_amount), 0)::numeric FROM orders) AS total_sales
            "#,
        )
        .fetch_one(&self.pool)
        .await
    }

    pub async fn top_products(&self) -> Result<Vec<TopProduct>, sqlx::Error> {
        sqlx::query_as::<_, TopProduct>(
            r#"
            SELECT p.name, SUM(oi.quantity)::bigint AS total_sold
            FROM products p
            JOIN order_items oi ON p.id = oi.product_id
            GROUP BY p.name
            ORDER BY total_sold DESC
            LIMIT $1
            "#,
        )
        .bind(TOP_LIMIT)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn top_customers(&self) -> Result<Vec<TopCustomer>, sqlx::Error> {
        sqlx::query_as::<_, TopCustomer>(
            r#"
            SELECT u.username, SUM(o.total_amount)::numeric AS total_spent
            FROM users u
            JOIN orders o ON u.id = o.user_id
            GROUP BY u.username
            ORDER BY total_spent DESC
            LIMIT $1
            "#,
        )
        .bind(TOP_LIMIT)
        .fetch_all(&self.pool)
        .await
    }

    /// Tables in the `public` schema.
    pub async fn public_tables(&self) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT table_name::text
            FROM information_schema.tables
            WHERE table_schema = 'public'
            ORDER BY table_name
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Non-template databases on the server.
    pub async fn databases(&self) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT datname::text FROM pg_database WHERE datistemplate = false ORDER BY datname",
        )
        .fetch_all(&self.pool)
        .await
    }
}
