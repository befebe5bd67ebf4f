//! Source reading: memory-mapped or buffered bytes, then CSV parsing
//! into the normalizer's `RawTable` input shape.
//!
//! Per-cell problems never fail a read; cells are recovered lossily.
//! Only an unreadable file or an unparsable header row is fatal.

use std::fs::File;

use camino::Utf8Path;
use memmap2::Mmap;

use crate::core::normalize::{DataError, RawTable};

const MMAP_THRESHOLD: u64 = 1024 * 1024; // 1 MiB

/// Raw source bytes, memory-mapped above the threshold.
pub enum SourceBytes {
    Mapped(Mmap),
    Buffered(Vec<u8>),
}

impl AsRef<[u8]> for SourceBytes {
    fn as_ref(&self) -> &[u8] {
        match self {
            SourceBytes::Mapped(mmap) => mmap,
            SourceBytes::Buffered(buf) => buf.as_slice(),
        }
    }
}

/// Read a source file, mapping it when large enough to matter.
pub fn read_source(path: &Utf8Path) -> Result<SourceBytes, DataError> {
    let unreadable =
        |source| DataError::Unreadable { path: path.to_string(), source };

    let metadata = std::fs::metadata(path).map_err(unreadable)?;

    if metadata.len() > MMAP_THRESHOLD {
        let file = File::open(path).map_err(unreadable)?;

        // Safety: the file is only read, never modified through the map.
        let mmap = unsafe { Mmap::map(&file) }.map_err(unreadable)?;

        Ok(SourceBytes::Mapped(mmap))
    } else {
        let content = std::fs::read(path).map_err(unreadable)?;

        Ok(SourceBytes::Buffered(content))
    }
}

/// Parse CSV bytes into a `RawTable`. `label` names the source in
/// error messages (normally the path).
pub fn parse_table(label: &str, bytes: &[u8]) -> Result<RawTable, DataError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);

    let headers = reader
        .byte_headers()
        .map_err(|e| DataError::Malformed { path: label.to_string(), detail: e.to_string() })?
        .iter()
        .map(|h| {
            // Lossy per-cell recovery; a stray invalid byte is not fatal.
            String::from_utf8_lossy(h)
                .trim_start_matches('\u{feff}')
                .to_string()
        })
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in reader.byte_records() {
        let record = record
            .map_err(|e| DataError::Malformed { path: label.to_string(), detail: e.to_string() })?;
        rows.push(
            record
                .iter()
                .map(|cell| String::from_utf8_lossy(cell).into_owned())
                .collect(),
        );
    }

    Ok(RawTable::new(label, headers, rows))
}

/// Read and parse one CSV source in a single step.
pub fn read_table(path: &Utf8Path) -> Result<RawTable, DataError> {
    let bytes = read_source(path)?;
    parse_table(path.as_str(), bytes.as_ref())
}
