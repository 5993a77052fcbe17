use crate::config::{Config, ConnectionParams};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};

pub struct Database {
    pub pool: PgPool,
}

impl Database {
    /// Pool for the HTTP service. Connections are opened on first use, so the
    /// service starts even while the database is down.
    pub fn connect_lazy(config: &Config) -> Self {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .connect_lazy_with(connect_options(&config.database));

        Self { pool }
    }

    /// Single-connection pool for the report tools; fails if the server is unreachable.
    pub async fn connect(params: &ConnectionParams) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_with(connect_options(params))
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Round-trip check used by `/health`.
    pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

pub fn connect_options(params: &ConnectionParams) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&params.host)
        .port(params.port)
        .database(&params.database)
        .username(&params.user)
        .password(&params.password)
}
