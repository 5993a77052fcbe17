//! Terminal reports over the demo shop database.

use crate::errors::ReportError;
use crate::models::{ShopStats, TopCustomer, TopProduct};
use crate::report::{euros, Summary};
use crate::shop_store::ShopStore;
use crate::table::{Table, TableStyle};
use clap::ValueEnum;
use std::io::Write;

pub const STYLE: TableStyle = TableStyle::SHOP;

/// Which part of the shop to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ShopView {
    Users,
    Categories,
    Products,
    Orders,
    /// Order line items
    Details,
    Stats,
    /// Statistics followed by every table
    #[default]
    All,
}

/// One printable block of the shop report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Stats,
    Users,
    Categories,
    Products,
    Orders,
    Details,
}

impl ShopView {
    /// Sections to print, in order.
    pub fn sections(self) -> Vec<Section> {
        match self {
            ShopView::Users => vec![Section::Users],
            ShopView::Categories => vec![Section::Categories],
            ShopView::Products => vec![Section::Products],
            ShopView::Orders => vec![Section::Orders],
            ShopView::Details => vec![Section::Details],
            ShopView::Stats => vec![Section::Stats],
            ShopView::All => vec![
                Section::Stats,
                Section::Users,
                Section::Categories,
                Section::Products,
                Section::Orders,
                Section::Details,
            ],
        }
    }
}

/// Runs the queries behind `view` and writes each rendered section to `out`.
pub async fn write_view<W: Write>(
    store: &ShopStore,
    view: ShopView,
    out: &mut W,
) -> Result<(), ReportError> {
    for section in view.sections() {
        let text = render_section(store, section).await?;
        write!(out, "{}", text)?;
        out.flush()?;
    }
    Ok(())
}

async fn render_section(store: &ShopStore, section: Section) -> Result<String, ReportError> {
    let text = match section {
        Section::Stats => {
            let stats = store.stats().await?;
            let top_products = store.top_products().await?;
            let top_customers = store.top_customers().await?;
            stats_summary(&stats, &top_products, &top_customers).render(&STYLE)
        }
        Section::Users => Table::from_records("USERS", &store.users().await?)?.render(&STYLE),
        Section::Categories => {
            Table::from_records("CATEGORIES", &store.categories().await?)?.render(&STYLE)
        }
        Section::Products => {
            Table::from_records("PRODUCTS", &store.products().await?)?.render(&STYLE)
        }
        Section::Orders => Table::from_records("ORDERS", &store.orders().await?)?.render(&STYLE),
        Section::Details => {
            Table::from_records("ORDER DETAILS", &store.order_lines().await?)?.render(&STYLE)
        }
    };
    Ok(text)
}

pub fn stats_summary(
    stats: &ShopStats,
    top_products: &[TopProduct],
    top_customers: &[TopCustomer],
) -> Summary {
    Summary::new("STATISTICS")
        .field("Users", stats.users)
        .field("Categories", stats.categories)
        .field("Products", stats.products)
        .field("Orders", stats.orders)
        .field("Total sales", euros(&stats.total_sales))
        .ranking(
            format!("Top {} products sold", top_products.len()),
            top_products
                .iter()
                .map(|p| (&p.name, format!("{} sold", p.total_sold))),
        )
        .ranking(
            format!("Top {} customers", top_customers.len()),
            top_customers
                .iter()
                .map(|c| (&c.username, euros(&c.total_spent))),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    #[test]
    fn test_all_prints_stats_then_every_table() {
        let all = ShopView::All.sections();
        assert_eq!(all[0], Section::Stats);
        for view in ShopView::value_variants() {
            if *view != ShopView::All {
                let single = view.sections();
                assert_eq!(single.len(), 1);
                assert!(all.contains(&single[0]), "{:?} missing from all", view);
            }
        }
        assert_eq!(all.len(), ShopView::value_variants().len() - 1);
    }

    #[test]
    fn test_view_names_match_cli_values() {
        assert_eq!(ShopView::from_str("details", true).unwrap(), ShopView::Details);
        assert_eq!(ShopView::default(), ShopView::All);
        assert!(ShopView::from_str("payments", true).is_err());
    }

    #[test]
    fn test_stats_summary() {
        let stats = ShopStats {
            users: 4,
            products: 6,
            orders: 5,
            categories: 3,
            total_sales: BigDecimal::from_str("1234.50").unwrap(),
        };
        let products = vec![TopProduct {
            name: "Laptop".to_string(),
            total_sold: 7,
        }];
        let customers = vec![TopCustomer {
            username: "alice".to_string(),
            total_spent: BigDecimal::from_str("999.99").unwrap(),
        }];

        let out = stats_summary(&stats, &products, &customers).render(&STYLE);

        assert!(out.contains("  Users       : 4\n"));
        assert!(out.contains("  Total sales : 1234.50€\n"));
        assert!(out.contains("  Top 1 products sold:\n     1. Laptop (7 sold)\n"));
        assert!(out.contains("  Top 1 customers:\n     1. alice (999.99€)\n"));
    }
}
