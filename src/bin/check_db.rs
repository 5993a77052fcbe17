//! Quick connectivity check: lists the public tables and the databases of a PostgreSQL server.

use clap::Parser;
use demo_app::cli::{init_tracing, ConnectionArgs};
use demo_app::db::Database;
use demo_app::errors::ReportError;
use demo_app::report::connecting_line;
use demo_app::shop_store::ShopStore;
use demo_app::table::{render_table, TableStyle};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(version, about = "Lists the tables and databases of a PostgreSQL server")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ReportError> {
    let params = cli.connection.into_params(30432, "demo");
    println!(
        "{}",
        connecting_line("PostgreSQL", &params.host, params.port, &params.database)
    );

    let db = Database::connect(&params)
        .await
        .map_err(|e| ReportError::Connection(e.to_string()))?;
    let store = ShopStore::new(db.pool.clone());

    let tables = store.public_tables().await;
    let databases = store.databases().await;
    db.close().await;

    let style = TableStyle::SHOP;
    print!(
        "{}",
        render_table(
            "TABLES (public schema)",
            &["Table"],
            tables?.into_iter().map(|t| [t]),
            &style
        )?
    );
    print!(
        "{}",
        render_table(
            "DATABASES",
            &["Database"],
            databases?.into_iter().map(|d| [d]),
            &style
        )?
    );

    Ok(())
}
