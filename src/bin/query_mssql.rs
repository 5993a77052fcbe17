//! Prints the entity versions stored in the SQL Server `Requests` database.

use clap::{error::ErrorKind, CommandFactory, Parser};
use demo_app::cli::{init_tracing, ConnectionArgs};
use demo_app::errors::ReportError;
use demo_app::report::{closing_banner, connecting_line};
use demo_app::version_report::{self, VersionView, ViewArg, STYLE};
use demo_app::version_store::EntityVersionStore;
use std::process::ExitCode;

const DEFAULT_PORT: u16 = 31433;
const DEFAULT_DATABASE: &str = "Requests";

#[derive(Parser, Debug)]
#[command(version, about = "Shows the data of the SQL Server Requests database")]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// View to show
    #[arg(long, value_enum, default_value_t = ViewArg::All)]
    view: ViewArg,

    /// LogicalId for the history view (e.g. REQ-001)
    #[arg(long)]
    id: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let view = match VersionView::from_args(cli.view, cli.id.clone()) {
        Ok(view) => view,
        Err(e) => Cli::command()
            .error(ErrorKind::MissingRequiredArgument, e)
            .exit(),
    };

    match run(cli.connection, view).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(connection: ConnectionArgs, view: VersionView) -> Result<(), ReportError> {
    let params = connection.into_params(DEFAULT_PORT, DEFAULT_DATABASE);
    println!(
        "{}",
        connecting_line("SQL Server", &params.host, params.port, &params.database)
    );

    let mut store = EntityVersionStore::connect(&params)
        .await
        .map_err(|e| ReportError::Connection(e.to_string()))?;
    println!("Connected!");

    let mut stdout = std::io::stdout().lock();
    let result = version_report::write_view(&mut store, &view, &mut stdout).await;

    if let Err(e) = store.close().await {
        tracing::warn!("Failed to close SQL Server connection: {}", e);
    }
    result?;

    print!("{}", closing_banner(&STYLE));
    Ok(())
}
