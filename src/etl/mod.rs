//! The four batch stages: crawl → normalize → load → aggregate.
//!
//! Each stage is a plain function over its inputs (run files, a store, a
//! trend source) and can be re-run: files are fully rewritten and database
//! writes are keyed upserts.
//!
//! Submodules:
//! - `crawl`: catalog + trend API → raw CSV.
//! - `normalize`: raw CSV → normalized detail CSV.
//! - `load`: normalized CSV → detail table.
//! - `aggregate`: detail table → monthly summary table.

pub mod aggregate;
pub mod crawl;
pub mod load;
pub mod normalize;

pub use aggregate::{AggregateSummary, run_aggregate};
pub use crawl::{CrawlOptions, CrawlSummary, run_crawl};
pub use load::{LoadSummary, load_run};
pub use normalize::{NormalizeSummary, normalize_run};

use std::fs::{self, File};
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

use crate::error::EtlError;

/// Written at the start of every CSV so spreadsheet tools detect UTF-8.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub(crate) type CsvWriter = csv::Writer<BufWriter<File>>;
pub(crate) type CsvReader = csv::Reader<Cursor<Vec<u8>>>;

/// Create (or truncate) `path`, write the BOM and `header`. Rows are then
/// added with `serialize`; the header is present even if none follow.
pub(crate) fn create_csv(path: &Path, header: &[&str]) -> Result<CsvWriter, EtlError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(header)?;
    Ok(writer)
}

/// Open a headed CSV, accepting input with or without a leading BOM.
/// Short rows are tolerated; absent columns deserialize as empty.
pub(crate) fn open_csv(path: &Path) -> Result<CsvReader, EtlError> {
    if !path.exists() {
        return Err(EtlError::InputNotFound(path.to_path_buf()));
    }
    let mut bytes = fs::read(path)?;
    if bytes.starts_with(UTF8_BOM) {
        bytes = bytes.split_off(UTF8_BOM.len());
    }
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(Cursor::new(bytes)))
}
