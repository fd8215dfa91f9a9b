// src/pipeline.rs
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

use crate::collect::twitter::TwitterSession;
use crate::collect::types::RawRecord;
use crate::config::Credentials;
use crate::error::Result;
use crate::normalize::normalize;
use crate::table::{ResultTable, TableWriter};

/// Normalize every record and stream it into `output`, returning the row count.
///
/// The file is opened when the first row is ready, so a run that fails before producing
/// anything leaves an existing `output` untouched. A run that succeeds with no rows writes
/// the header alone.
///
/// Not atomic: when a record fails (source error or malformed record) the run stops and
/// the rows already written stay in the file. Use [`collect_table`] first if you need
/// all-or-nothing output.
pub fn run_collection<I>(records: I, output: &Path) -> Result<usize>
where
    I: IntoIterator<Item = Result<RawRecord>>,
{
    let mut writer: Option<TableWriter<File>> = None;
    for item in records {
        let row = match item.and_then(|record| normalize(&record)) {
            Ok(row) => row,
            Err(e) => {
                warn!(
                    target: "collect",
                    error = %e,
                    rows_written = writer.as_ref().map_or(0, |w| w.rows()),
                    output = %output.display(),
                    "collection aborted, partial output kept"
                );
                return Err(e);
            }
        };
        if writer.is_none() {
            writer = Some(TableWriter::create(output)?);
        }
        if let Some(sink) = writer.as_mut() {
            sink.write_row(&row)?;
        }
    }
    let rows = match writer {
        Some(sink) => sink.finish()?,
        None => TableWriter::create(output)?.finish()?,
    };
    info!(target: "collect", rows, output = %output.display(), "table written");
    Ok(rows)
}

/// Buffer the whole run in memory; nothing is returned unless every record normalizes.
pub fn collect_table<I>(records: I) -> Result<ResultTable>
where
    I: IntoIterator<Item = Result<RawRecord>>,
{
    records
        .into_iter()
        .map(|item| item.and_then(|record| normalize(&record)))
        .collect()
}

/// Search the live source for `query` and write up to `limit` rows to `output`.
pub fn scrape_to_csv(
    credentials: Credentials,
    query: &str,
    limit: usize,
    output: &Path,
) -> Result<usize> {
    let session = TwitterSession::new(credentials)?;
    info!(target: "collect", query, limit, "starting collection");
    run_collection(crate::collect::collect(query, limit, session), output)
}
