//! Demo shop application library
//!
//! This library backs the demo HTTP service and the terminal report tools:
//! database gateways for PostgreSQL and SQL Server, typed row models, the
//! text table renderer, and the HTTP handlers.
//!
//! # Modules
//!
//! - `cli`: Connection flags shared by the report tools.
//! - `config`: Service configuration and connection parameters.
//! - `db`: PostgreSQL connection pool.
//! - `errors`: HTTP and report error types.
//! - `handlers`: HTTP router and request handlers.
//! - `models`: Typed rows for both databases.
//! - `report`: Statistics blocks and run banners.
//! - `shop_report`: Shop report views.
//! - `shop_store`: Fixed queries against the shop schema.
//! - `table`: Aligned text table renderer.
//! - `version_report`: Entity version report views.
//! - `version_store`: Fixed queries against `[data].[EntityVersion]`.

pub mod cli;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod report;
pub mod shop_report;
pub mod shop_store;
pub mod table;
pub mod version_report;
pub mod version_store;
