//! CSV ingestion into a [`Catalog`].
//!
//! The dataset is read by column position after a header row:
//!
//! | # | column     | parsed as                         |
//! |---|------------|-----------------------------------|
//! | 0 | id         | `u32`                             |
//! | 1 | name       | text                              |
//! | 2 | categories | comma-separated labels            |
//! | 3 | type       | text                              |
//! | 4 | episodes   | integer, or the literal `Unknown` |
//! | 5 | rating     | decimal                           |
//! | 6 | popularity | integer                           |
//!
//! Incomplete rows are skipped and listed in the [`LoadReport`]. A numeric
//! field that cannot be parsed at all aborts the load with
//! [`IngestError::MalformedField`].

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use kizuna_core::{Catalog, Item};

use crate::error::{IngestError, IngestResult};

const COLUMNS: [&str; 7] = [
    "id",
    "name",
    "categories",
    "type",
    "episodes",
    "rating",
    "popularity",
];

const UNKNOWN_EPISODES: &str = "Unknown";

/// Knobs for [`load_catalog`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Rows with a popularity below this are skipped.
    pub min_popularity: u64,
}

impl LoadOptions {
    #[must_use]
    pub fn with_min_popularity(mut self, min_popularity: u64) -> Self {
        self.min_popularity = min_popularity;
        self
    }
}

/// Why a row was left out of the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    EmptyCategories,
    EmptyKind,
    UnknownEpisodes,
    NegativeEpisodes(i64),
    MissingRating,
    InvalidRating(String),
    BelowPopularity { popularity: u64, minimum: u64 },
    DuplicateName,
}

impl SkipReason {
    /// Short stable label, used to group reasons in summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::EmptyCategories => "empty categories",
            Self::EmptyKind => "empty type",
            Self::UnknownEpisodes => "unknown episodes",
            Self::NegativeEpisodes(_) => "negative episodes",
            Self::MissingRating => "missing rating",
            Self::InvalidRating(_) => "invalid rating",
            Self::BelowPopularity { .. } => "below popularity floor",
            Self::DuplicateName => "duplicate name",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeEpisodes(n) => write!(f, "negative episodes ({n})"),
            Self::InvalidRating(raw) => write!(f, "invalid rating {raw:?}"),
            Self::BelowPopularity {
                popularity,
                minimum,
            } => write!(f, "popularity {popularity} below {minimum}"),
            other => f.write_str(other.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line in the source, header included.
    pub line: u64,
    pub name: String,
    pub reason: SkipReason,
}

/// What happened to each data row during a load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub rows_read: usize,
    pub loaded: usize,
    pub skipped: Vec<SkippedRow>,
}

impl LoadReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// Skipped rows grouped by [`SkipReason::label`].
    pub fn skips_by_reason(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for row in &self.skipped {
            *counts.entry(row.reason.label()).or_insert(0) += 1;
        }
        counts
    }
}

/// Load the dataset at `path`.
pub fn load_catalog(path: &Path, options: &LoadOptions) -> IngestResult<(Catalog, LoadReport)> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("loading catalog from {}", path.display());
    load_catalog_from_reader(file, options)
}

/// Load a dataset from any byte source.
pub fn load_catalog_from_reader<R: Read>(
    reader: R,
    options: &LoadOptions,
) -> IngestResult<(Catalog, LoadReport)> {
    let mut csv = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut catalog = Catalog::new();
    let mut report = LoadReport::default();
    let mut record = StringRecord::new();

    while csv.read_record(&mut record)? {
        report.rows_read += 1;
        let line = record.position().map_or(0, csv::Position::line);
        let row = Row::new(&record, line)?;

        match row.parse(options)? {
            Ok(item) => {
                let name = item.name().to_string();
                if catalog.index_of(&name).is_some() {
                    skip(&mut report, line, name, SkipReason::DuplicateName);
                } else {
                    catalog.insert(item);
                    report.loaded += 1;
                }
            }
            Err(reason) => skip(&mut report, line, row.field(1).to_string(), reason),
        }
    }

    log::info!(
        "loaded {} of {} rows ({} skipped)",
        report.loaded,
        report.rows_read,
        report.skipped_count()
    );
    Ok((catalog, report))
}

fn skip(report: &mut LoadReport, line: u64, name: String, reason: SkipReason) {
    log::debug!("line {line}: skipping {name:?}: {reason}");
    report.skipped.push(SkippedRow { line, name, reason });
}

/// One data row with every column present.
struct Row<'r> {
    record: &'r StringRecord,
    line: u64,
}

impl<'r> Row<'r> {
    fn new(record: &'r StringRecord, line: u64) -> IngestResult<Self> {
        if let Some(column) = COLUMNS.get(record.len()) {
            return Err(IngestError::MissingColumn { line, column });
        }
        Ok(Self { record, line })
    }

    fn field(&self, index: usize) -> &'r str {
        self.record.get(index).unwrap_or_default().trim()
    }

    fn malformed(&self, index: usize) -> IngestError {
        IngestError::MalformedField {
            line: self.line,
            field: COLUMNS[index],
            value: self.field(index).to_string(),
        }
    }

    /// The outer result aborts the load; the inner one skips the row.
    fn parse(&self, options: &LoadOptions) -> IngestResult<Result<Item, SkipReason>> {
        let id: u32 = self.field(0).parse().map_err(|_| self.malformed(0))?;

        let categories = self.field(2);
        if categories.is_empty() {
            return Ok(Err(SkipReason::EmptyCategories));
        }
        let kind = self.field(3);
        if kind.is_empty() {
            return Ok(Err(SkipReason::EmptyKind));
        }

        let episodes = match self.field(4) {
            UNKNOWN_EPISODES => return Ok(Err(SkipReason::UnknownEpisodes)),
            raw => raw.parse::<i64>().map_err(|_| self.malformed(4))?,
        };
        if episodes < 0 {
            return Ok(Err(SkipReason::NegativeEpisodes(episodes)));
        }
        let episodes = u32::try_from(episodes).map_err(|_| self.malformed(4))?;

        let rating = match self.field(5) {
            "" => return Ok(Err(SkipReason::MissingRating)),
            raw => match raw.parse::<f32>() {
                Ok(r) if r.is_finite() && r >= 0.0 => r,
                _ => return Ok(Err(SkipReason::InvalidRating(raw.to_string()))),
            },
        };

        let popularity: u64 = self.field(6).parse().map_err(|_| self.malformed(6))?;
        if popularity < options.min_popularity {
            return Ok(Err(SkipReason::BelowPopularity {
                popularity,
                minimum: options.min_popularity,
            }));
        }

        Ok(Ok(Item::new(id, self.field(1))
            .with_categories(categories.split(','))
            .with_kind(kind)
            .with_episodes(episodes)
            .with_rating(rating)
            .with_popularity(popularity)))
    }
}
