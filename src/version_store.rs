//! SQL Server access to the append-only `[data].[EntityVersion]` table.
//!
//! Each logical entity (`LogicalId`, e.g. `REQ-001`) is stored as a series of
//! rows with increasing `Version`; exactly one of them carries `Latest = 1`.
//! Business fields live in the `Properties` JSON column and are unpacked with
//! `JSON_VALUE`.

use crate::config::ConnectionParams;
use crate::models::{EntityVersion, LatestVersion, VersionHistoryEntry, VersionStats};
use tiberius::{AuthMethod, Client, Config, Query, Row};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

pub type SqlServerClient = Client<Compat<TcpStream>>;

pub const TOP_CONTRIBUTORS: i32 = 3;

const SELECT_VERSION_COLUMNS: &str = r#"
    SELECT CAST(Id AS BIGINT) AS Id,
           LogicalId,
           CAST(Version AS INT) AS Version,
           JSON_VALUE(Properties, '$.type') AS Type,
           JSON_VALUE(Properties, '$.title') AS Title,
           JSON_VALUE(Properties, '$.status') AS Status,
           JSON_VALUE(Properties, '$.priority') AS Priority,
           ModifiedBy,
           CAST(ModifiedUtc AS DATETIME2) AS ModifiedUtc,
           CAST(Latest AS BIT) AS Latest
    FROM [data].[EntityVersion]
"#;

pub fn client_config(params: &ConnectionParams) -> Config {
    let mut config = Config::new();
    config.host(&params.host);
    config.port(params.port);
    config.database(&params.database);
    config.authentication(AuthMethod::sql_server(&params.user, &params.password));
    // Demo servers run with self-signed certificates.
    config.trust_cert();
    config
}

pub struct EntityVersionStore {
    client: SqlServerClient,
}

impl EntityVersionStore {
    pub async fn connect(params: &ConnectionParams) -> Result<Self, tiberius::error::Error> {
        let config = client_config(params);
        let tcp = TcpStream::connect(config.get_addr()).await?;
        tcp.set_nodelay(true)?;

        let client = Client::connect(config, tcp.compat_write()).await?;
        tracing::debug!("Connected to SQL Server {}", params.describe());

        Ok(Self { client })
    }

    pub async fn all_versions(&mut self) -> Result<Vec<EntityVersion>, tiberius::error::Error> {
        let sql = format!("{SELECT_VERSION_COLUMNS} ORDER BY Id, Version");
        let rows = self.fetch(Query::new(sql)).await?;
        rows.iter().map(entity_version_from_row).collect()
    }

    pub async fn latest_versions(&mut self) -> Result<Vec<LatestVersion>, tiberius::error::Error> {
        let sql = format!("{SELECT_VERSION_COLUMNS} WHERE Latest = 1 ORDER BY Id");
        let rows = self.fetch(Query::new(sql)).await?;
        rows.iter()
            .map(|row| entity_version_from_row(row).map(LatestVersion))
            .collect()
    }

    pub async fn history(
        &mut self,
        logical_id: &str,
    ) -> Result<Vec<VersionHistoryEntry>, tiberius::error::Error> {
        let mut query = Query::new(
            r#"
            SELECT CAST(Version AS INT) AS Version,
                   JSON_VALUE(Properties, '$.status') AS Status,
                   JSON_VALUE(Properties, '$.priority') AS Priority,
                   ModifiedBy,
                   CAST(ModifiedUtc AS DATETIME2) AS ModifiedUtc,
                   CAST(Latest AS BIT) AS Latest,
                   CAST(ExtensionsData AS NVARCHAR(MAX)) AS ExtensionsData
            FROM [data].[EntityVersion]
            WHERE LogicalId = @P1
            ORDER BY Version
            "#,
        );
        query.bind(logical_id.to_string());

        let rows = self.fetch(query).await?;
        rows.iter().map(history_entry_from_row).collect()
    }

    pub async fn stats(&mut self) -> Result<VersionStats, tiberius::error::Error> {
        let total_rows = self
            .count("SELECT CAST(COUNT(*) AS BIGINT) FROM [data].[EntityVersion]")
            .await?;
        let distinct_entities = self
            .count("SELECT CAST(COUNT(DISTINCT LogicalId) AS BIGINT) FROM [data].[EntityVersion]")
            .await?;
        let latest_rows = self
            .count("SELECT CAST(COUNT(*) AS BIGINT) FROM [data].[EntityVersion] WHERE Latest = 1")
            .await?;

        let rows = self
            .fetch(Query::new(
                "SELECT CAST(AVG(Version * 1.0) AS FLOAT) FROM [data].[EntityVersion] WHERE Latest = 1",
            ))
            .await?;
        let average_version = match rows.first() {
            Some(row) => row.try_get::<f64, _>(0usize)?,
            None => None,
        };

        Ok(VersionStats {
            total_rows,
            distinct_entities,
            latest_rows,
            average_version,
            by_status: self.latest_breakdown("$.status").await?,
            by_type: self.latest_breakdown("$.type").await?,
            by_priority: self.latest_breakdown("$.priority").await?,
            top_contributors: self.top_contributors().await?,
        })
    }

    /// Current-version counts grouped by one JSON property, most frequent first.
    async fn latest_breakdown(
        &mut self,
        json_path: &'static str,
    ) -> Result<Vec<(Option<String>, i64)>, tiberius::error::Error> {
        let sql = format!(
            r#"
            SELECT JSON_VALUE(Properties, '{json_path}') AS Name, CAST(COUNT(*) AS BIGINT) AS Cnt
            FROM [data].[EntityVersion]
            WHERE Latest = 1
            GROUP BY JSON_VALUE(Properties, '{json_path}')
            ORDER BY Cnt DESC
            "#
        );
        let rows = self.fetch(Query::new(sql)).await?;
        rows.iter().map(name_count_from_row).collect()
    }

    async fn top_contributors(
        &mut self,
    ) -> Result<Vec<(Option<String>, i64)>, tiberius::error::Error> {
        let sql = format!(
            r#"
            SELECT TOP {TOP_CONTRIBUTORS} ModifiedBy AS Name, CAST(COUNT(*) AS BIGINT) AS Cnt
            FROM [data].[EntityVersion]
            GROUP BY ModifiedBy
            ORDER BY Cnt DESC
            "#
        );
        let rows = self.fetch(Query::new(sql)).await?;
        rows.iter().map(name_count_from_row).collect()
    }

    async fn count(&mut self, sql: &'static str) -> Result<i64, tiberius::error::Error> {
        let rows = self.fetch(Query::new(sql)).await?;
        Ok(rows
            .first()
            .map(|row| row.try_get::<i64, _>(0usize))
            .transpose()?
            .flatten()
            .unwrap_or(0))
    }

    async fn fetch(&mut self, query: Query<'_>) -> Result<Vec<Row>, tiberius::error::Error> {
        query.query(&mut self.client).await?.into_first_result().await
    }

    pub async fn close(self) -> Result<(), tiberius::error::Error> {
        self.client.close().await
    }
}

fn owned(row: &Row, column: &str) -> Result<Option<String>, tiberius::error::Error> {
    Ok(row.try_get::<&str, _>(column)?.map(str::to_string))
}

fn entity_version_from_row(row: &Row) -> Result<EntityVersion, tiberius::error::Error> {
    Ok(EntityVersion {
        id: row.try_get::<i64, _>("Id")?.unwrap_or_default(),
        logical_id: owned(row, "LogicalId")?.unwrap_or_default(),
        version: row.try_get::<i32, _>("Version")?.unwrap_or_default(),
        entity_type: owned(row, "Type")?,
        title: owned(row, "Title")?,
        status: owned(row, "Status")?,
        priority: owned(row, "Priority")?,
        modified_by: owned(row, "ModifiedBy")?,
        modified_utc: row.try_get::<chrono::NaiveDateTime, _>("ModifiedUtc")?,
        latest: row.try_get::<bool, _>("Latest")?.unwrap_or(false),
    })
}

fn history_entry_from_row(row: &Row) -> Result<VersionHistoryEntry, tiberius::error::Error> {
    Ok(VersionHistoryEntry {
        version: row.try_get::<i32, _>("Version")?.unwrap_or_default(),
        status: owned(row, "Status")?,
        priority: owned(row, "Priority")?,
        modified_by: owned(row, "ModifiedBy")?,
        modified_utc: row.try_get::<chrono::NaiveDateTime, _>("ModifiedUtc")?,
        latest: row.try_get::<bool, _>("Latest")?.unwrap_or(false),
        extensions: owned(row, "ExtensionsData")?,
    })
}

fn name_count_from_row(row: &Row) -> Result<(Option<String>, i64), tiberius::error::Error> {
    Ok((owned(row, "Name")?, row.try_get::<i64, _>("Cnt")?.unwrap_or(0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_targets_requested_server() {
        let params = ConnectionParams {
            host: "mssql.local".to_string(),
            port: 31433,
            database: "Requests".to_string(),
            user: "sa".to_string(),
            password: "pw".to_string(),
        };
        let config = client_config(&params);
        assert_eq!(config.get_addr(), "mssql.local:31433");
    }
}
