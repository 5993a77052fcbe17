//! Terminal reports over the SQL Server entity version table.

use crate::errors::ReportError;
use crate::models::VersionStats;
use crate::report::Summary;
use crate::table::{Table, TableStyle, NULL_CELL};
use crate::version_store::EntityVersionStore;
use clap::ValueEnum;
use std::io::Write;

pub const STYLE: TableStyle = TableStyle::VERSIONS;

/// `--view` values as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ViewArg {
    /// Statistics, latest versions, then every version
    #[default]
    All,
    /// Only rows flagged `Latest = 1`
    Latest,
    Stats,
    /// Version history of one entity (requires --id)
    History,
}

/// A fully specified version report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionView {
    All,
    Latest,
    Stats,
    History(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("--id is required for the history view (e.g. --id REQ-001)")]
pub struct MissingLogicalId;

impl VersionView {
    pub fn from_args(view: ViewArg, id: Option<String>) -> Result<Self, MissingLogicalId> {
        match view {
            ViewArg::All => Ok(VersionView::All),
            ViewArg::Latest => Ok(VersionView::Latest),
            ViewArg::Stats => Ok(VersionView::Stats),
            ViewArg::History => id
                .filter(|id| !id.trim().is_empty())
                .map(VersionView::History)
                .ok_or(MissingLogicalId),
        }
    }
}

pub async fn write_view<W: Write>(
    store: &mut EntityVersionStore,
    view: &VersionView,
    out: &mut W,
) -> Result<(), ReportError> {
    match view {
        VersionView::All => {
            write_stats(store, out).await?;
            write_latest(store, out).await?;
            write_all_versions(store, out).await?;
        }
        VersionView::Latest => write_latest(store, out).await?,
        VersionView::Stats => write_stats(store, out).await?,
        VersionView::History(logical_id) => {
            let history = store.history(logical_id).await?;
            let title = format!("HISTORY OF {logical_id}");
            write!(out, "{}", Table::from_records(title, &history)?.render(&STYLE))?;
        }
    }
    out.flush()?;
    Ok(())
}

async fn write_stats<W: Write>(
    store: &mut EntityVersionStore,
    out: &mut W,
) -> Result<(), ReportError> {
    let stats = store.stats().await?;
    write!(out, "{}", stats_summary(&stats).render(&STYLE))?;
    Ok(())
}

async fn write_latest<W: Write>(
    store: &mut EntityVersionStore,
    out: &mut W,
) -> Result<(), ReportError> {
    let latest = store.latest_versions().await?;
    write!(
        out,
        "{}",
        Table::from_records("LATEST VERSIONS (Latest = 1)", &latest)?.render(&STYLE)
    )?;
    Ok(())
}

async fn write_all_versions<W: Write>(
    store: &mut EntityVersionStore,
    out: &mut W,
) -> Result<(), ReportError> {
    let versions = store.all_versions().await?;
    write!(
        out,
        "{}",
        Table::from_records("ALL ENTITY VERSIONS", &versions)?.render(&STYLE)
    )?;
    Ok(())
}

pub fn stats_summary(stats: &VersionStats) -> Summary {
    let average = stats
        .average_version
        .map(|avg| format!("{avg:.1}"))
        .unwrap_or_else(|| NULL_CELL.to_string());

    Summary::new("STATISTICS - [data].[EntityVersion]")
        .field("Total records", stats.total_rows)
        .field("Distinct entities", stats.distinct_entities)
        .field("Latest versions", stats.latest_rows)
        .field("Average versions/entity", average)
        .breakdown("Current statuses (latest versions)", named(&stats.by_status))
        .breakdown("Entity types", named(&stats.by_type))
        .breakdown("Priorities", named(&stats.by_priority))
        .ranking(
            "Top contributors",
            named(&stats.top_contributors)
                .into_iter()
                .map(|(name, count)| (name, format!("{count} modifications"))),
        )
}

fn named(counts: &[(Option<String>, i64)]) -> Vec<(String, i64)> {
    counts
        .iter()
        .map(|(name, count)| {
            (
                name.clone().unwrap_or_else(|| NULL_CELL.to_string()),
                *count,
            )
        })
        .collect()
}
