#![forbid(unsafe_code)]

use std::fs::File;
use std::io;
use std::path::Path;

use csv::ReaderBuilder;
use thiserror::Error;
use tq_table::{Row, Table};

#[derive(Debug, Error)]
pub enum IoError {
    #[error("file not found: {path}")]
    NotFound { path: String },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Load a comma-separated file into a [`Table`].
///
/// The first line is the header; every subsequent line is aligned to it
/// positionally, with short records padded by empty text. No type
/// coercion happens here. An empty file yields an empty header list and
/// zero rows, not an error.
pub fn read_table(path: impl AsRef<Path>) -> Result<Table, IoError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| {
        if err.kind() == io::ErrorKind::NotFound {
            IoError::NotFound {
                path: path.display().to_string(),
            }
        } else {
            IoError::Io(err)
        }
    })?;

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = Row::new();
        for (idx, header) in headers.iter().enumerate() {
            let field = record.get(idx).unwrap_or_default();
            row.insert(header.clone(), field.to_owned());
        }
        rows.push(row);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        path = %path.display(),
        columns = headers.len(),
        rows = rows.len(),
        "loaded table"
    );

    Ok(Table::new(headers, rows))
}
