//! Prints the tables and statistics of the PostgreSQL demo shop.

use clap::Parser;
use demo_app::cli::{init_tracing, ConnectionArgs};
use demo_app::db::Database;
use demo_app::errors::ReportError;
use demo_app::report::{closing_banner, connecting_line};
use demo_app::shop_report::{self, ShopView, STYLE};
use demo_app::shop_store::ShopStore;
use std::process::ExitCode;

const DEFAULT_PORT: u16 = 30432;
const DEFAULT_DATABASE: &str = "demo";

#[derive(Parser, Debug)]
#[command(version, about = "Shows the data of the PostgreSQL demo database")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Table to show
    #[arg(long, value_enum, default_value_t = ShopView::All)]
    table: ShopView,
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
    let params = cli.connection.into_params(DEFAULT_PORT, DEFAULT_DATABASE);
    println!(
        "{}",
        connecting_line("PostgreSQL", &params.host, params.port, &params.database)
    );

    let db = Database::connect(&params)
        .await
        .map_err(|e| ReportError::Connection(e.to_string()))?;
    println!("Connected!");
    tracing::info!("Connected to PostgreSQL {}", params.describe());

    let store = ShopStore::new(db.pool.clone());
    let mut stdout = std::io::stdout().lock();
    let result = shop_report::write_view(&store, cli.table, &mut stdout).await;

    db.close().await;
    result?;

    print!("{}", closing_banner(&STYLE));
    Ok(())
}
