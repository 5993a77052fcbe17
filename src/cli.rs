//! Command-line pieces shared by the report tools.

use crate::config::ConnectionParams;
use clap::Args;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Connection flags accepted by every report tool.
///
/// Each flag falls back to the matching `DB_*` environment variable. Port and
/// database defaults differ per tool, so they are resolved in
/// [`ConnectionArgs::into_params`].
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Database server host
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub host: String,

    /// Database server port
    #[arg(long, env = "DB_PORT")]
    pub port: Option<u16>,

    /// Login user
    #[arg(long, env = "DB_USER")]
    pub user: String,

    /// Login password
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Database name
    #[arg(long, env = "DB_NAME")]
    pub database: Option<String>,
}

impl ConnectionArgs {
    pub fn into_params(self, default_port: u16, default_database: &str) -> ConnectionParams {
        ConnectionParams {
            host: self.host,
            port: self.port.unwrap_or(default_port),
            database: self
                .database
                .unwrap_or_else(|| default_database.to_string()),
            user: self.user,
            password: self.password,
        }
    }
}

/// Logs go to stderr so they never interleave with report output.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        connection: ConnectionArgs,
    }

    #[test]
    fn test_tool_defaults_fill_missing_flags() {
        let cli = TestCli::try_parse_from([
            "tool",
            "--host",
            "db",
            "--user",
            "sa",
            "--password",
            "pw",
        ])
        .unwrap();
        let params = cli.connection.into_params(31433, "Requests");

        assert_eq!(params.describe(), "db:31433/Requests");
        assert_eq!(params.user, "sa");
    }

    #[test]
    fn test_explicit_flags_win() {
        let cli = TestCli::try_parse_from([
            "tool",
            "--port",
            "1234",
            "--database",
            "other",
            "--user",
            "u",
            "--password",
            "p",
        ])
        .unwrap();
        let params = cli.connection.into_params(30432, "demo");

        assert_eq!(params.port, 1234);
        assert_eq!(params.database, "other");
    }
}
