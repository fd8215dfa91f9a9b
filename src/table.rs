// src/table.rs
//! CSV sink for normalized rows.
//!
//! Hashtag lists are written as Python-style list literals (`['covid', 'news']`) so files
//! stay readable by the notebooks that consumed the earlier pandas exports.

use std::io;
use std::path::Path;

use crate::error::{CollectError, Result};
use crate::normalize::NormalizedRow;

pub const COLUMNS: [&str; 9] = [
    "username",
    "description",
    "location",
    "following",
    "followers",
    "totaltweets",
    "retweetcount",
    "text",
    "hashtags",
];

pub fn format_tag_list(tags: &[String]) -> String {
    let items: Vec<String> = tags
        .iter()
        .map(|t| format!("'{}'", t.replace('\\', "\\\\").replace('\'', "\\'")))
        .collect();
    format!("[{}]", items.join(", "))
}

/// Inverse of [`format_tag_list`]; accepts single- or double-quoted items.
pub fn parse_tag_list(s: &str) -> Option<Vec<String>> {
    let inner = s.trim().strip_prefix('[')?.strip_suffix(']')?;
    let mut out = Vec::new();
    let mut chars = inner.chars().peekable();

    loop {
        while matches!(chars.peek(), Some(c) if c.is_whitespace() || *c == ',') {
            chars.next();
        }
        let quote = match chars.next() {
            None => return Some(out),
            Some(q @ ('\'' | '"')) => q,
            Some(_) => return None,
        };
        let mut item = String::new();
        loop {
            match chars.next()? {
                '\\' => item.push(chars.next()?),
                c if c == quote => break,
                c => item.push(c),
            }
        }
        out.push(item);
    }
}

fn to_record(row: &NormalizedRow) -> [String; 9] {
    [
        row.username.clone(),
        row.description.clone(),
        row.location.clone(),
        row.following.to_string(),
        row.followers.to_string(),
        row.totaltweets.to_string(),
        row.retweetcount.to_string(),
        row.text.clone(),
        format_tag_list(&row.hashtags),
    ]
}

fn invalid(msg: String) -> CollectError {
    CollectError::Io(io::Error::new(io::ErrorKind::InvalidData, msg))
}

fn from_record(record: &csv::StringRecord, line: usize) -> Result<NormalizedRow> {
    if record.len() != COLUMNS.len() {
        return Err(invalid(format!(
            "row {line}: expected {} fields, found {}",
            COLUMNS.len(),
            record.len()
        )));
    }
    let num = |i: usize| -> Result<u64> {
        record[i]
            .parse::<u64>()
            .map_err(|e| invalid(format!("row {line}, column {}: {e}", COLUMNS[i])))
    };
    let hashtags = parse_tag_list(&record[8])
        .ok_or_else(|| invalid(format!("row {line}: unreadable hashtag list")))?;

    Ok(NormalizedRow {
        username: record[0].to_string(),
        description: record[1].to_string(),
        location: record[2].to_string(),
        following: num(3)?,
        followers: num(4)?,
        totaltweets: num(5)?,
        retweetcount: num(6)?,
        text: record[7].to_string(),
        hashtags,
    })
}

/// Streaming writer. Each row is flushed as soon as it is written, so an aborted run
/// leaves every row written so far on disk. Output is therefore not atomic.
pub struct TableWriter<W: io::Write> {
    inner: csv::Writer<W>,
    rows: usize,
}

impl TableWriter<std::fs::File> {
    /// Create (or truncate) `path` and write the header.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_csv(csv::Writer::from_path(path)?)
    }
}

impl<W: io::Write> TableWriter<W> {
    pub fn from_writer(w: W) -> Result<Self> {
        Self::from_csv(csv::Writer::from_writer(w))
    }

    fn from_csv(mut inner: csv::Writer<W>) -> Result<Self> {
        inner.write_record(COLUMNS)?;
        inner.flush()?;
        Ok(Self { inner, rows: 0 })
    }

    pub fn write_row(&mut self, row: &NormalizedRow) -> Result<()> {
        self.inner.write_record(to_record(row))?;
        self.inner.flush()?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and hand back the number of data rows written.
    pub fn finish(mut self) -> Result<usize> {
        self.inner.flush()?;
        Ok(self.rows)
    }
}

/// Ordered rows in retrieval order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    rows: Vec<NormalizedRow>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: NormalizedRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[NormalizedRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<NormalizedRow> {
        self.rows
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        write_table(&self.rows, path)
    }
}

impl FromIterator<NormalizedRow> for ResultTable {
    fn from_iter<I: IntoIterator<Item = NormalizedRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Write all rows to `path`, overwriting any existing file.
pub fn write_table<'a, I>(rows: I, path: impl AsRef<Path>) -> Result<()>
where
    I: IntoIterator<Item = &'a NormalizedRow>,
{
    let mut w = TableWriter::create(path)?;
    for row in rows {
        w.write_row(row)?;
    }
    w.finish().map(|_| ())
}

/// Read back a file produced by the sink. The header must match [`COLUMNS`].
pub fn read_table(path: impl AsRef<Path>) -> Result<ResultTable> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    if !headers.iter().eq(COLUMNS.iter().copied()) {
        return Err(invalid(format!("unexpected header: {headers:?}")));
    }

    let mut table = ResultTable::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        table.push(from_record(&record, i + 1)?);
    }
    Ok(table)
}
