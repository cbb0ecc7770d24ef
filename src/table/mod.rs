//! Tabular representation of annotations and metrics
//!
//! Every derived dataset is a table with a fixed header. Tables are written
//! as tab separated values and compressed with gzip ([`write_gz`], [`read_gz`]).
//! [`TableStore`] keeps all tables of one `init` run in a cache directory and
//! [`Tables`] holds them in memory.
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::debug;

use crate::{EdamError, EdamResult};

mod records;
mod store;

pub use records::{
    AnnotationRow, AnnotationTable, RedundancyTable, RedundantAnnotation, ToolCount,
    ToolCountTable, ToolList, ToolRow, ToolTable, UndeclaredTable,
};
pub use store::{TableName, TableStore, Tables};

/// A table that can be written to and parsed from tab separated values
pub trait TsvTable {
    /// The column names
    fn header(&self) -> Vec<&'static str>;

    /// All rows, each with one field per column
    fn records(&self) -> Vec<Vec<String>>;

    /// Creates the table from a parsed header and its rows
    ///
    /// # Errors
    ///
    /// [`EdamError::ParseTableError`] if the header or a field does not match
    /// the table layout
    fn from_records(header: &[&str], records: &[Vec<&str>]) -> EdamResult<Self>
    where
        Self: Sized;

    /// Writes the header and all rows
    ///
    /// Tabs and line breaks inside of fields are replaced by spaces.
    ///
    /// # Errors
    ///
    /// [`EdamError::CannotOpenFile`] if writing fails
    fn write_tsv(&self, writer: &mut dyn Write) -> EdamResult<()> {
        let write_err = |err: std::io::Error| EdamError::CannotOpenFile(err.to_string());
        writeln!(writer, "{}", self.header().join("\t")).map_err(write_err)?;
        for record in self.records() {
            let fields: Vec<String> = record.iter().map(|field| sanitize(field)).collect();
            writeln!(writer, "{}", fields.join("\t")).map_err(write_err)?;
        }
        Ok(())
    }

    /// Returns the table as tab separated values
    fn to_tsv_string(&self) -> String {
        let mut buffer: Vec<u8> = Vec::new();
        // writing into a Vec can't fail
        let _ = self.write_tsv(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Parses the table from tab separated values
    ///
    /// # Errors
    ///
    /// [`EdamError::ParseTableError`] if the input is empty or a row
    /// has a different number of fields than the header
    fn read_tsv<R: BufRead>(reader: R) -> EdamResult<Self>
    where
        Self: Sized,
    {
        let mut lines = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(|err| EdamError::ParseTableError(err.to_string()))?;
            if !line.is_empty() {
                lines.push(line);
            }
        }
        let Some((header, rows)) = lines.split_first() else {
            return Err(EdamError::ParseTableError("missing header".to_string()));
        };
        let header: Vec<&str> = header.split('\t').collect();
        let mut records = Vec::with_capacity(rows.len());
        for line in rows {
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != header.len() {
                return Err(EdamError::ParseTableError(line.to_string()));
            }
            records.push(fields);
        }
        Self::from_records(&header, &records)
    }
}

fn sanitize(field: &str) -> String {
    field.replace(['\t', '\n', '\r'], " ")
}

/// Checks that the parsed header equals the expected one
pub(crate) fn expect_header(found: &[&str], expected: &[&str]) -> EdamResult<()> {
    if found == expected {
        Ok(())
    } else {
        Err(EdamError::ParseTableError(format!(
            "unexpected header `{}`, expected `{}`",
            found.join("\t"),
            expected.join("\t")
        )))
    }
}

/// Every record must have one field per column
pub(crate) fn expect_fields(header: &[&str], records: &[Vec<&str>]) -> EdamResult<()> {
    match records.iter().find(|record| record.len() != header.len()) {
        Some(record) => Err(EdamError::ParseTableError(format!(
            "expected {} fields, found `{}`",
            header.len(),
            record.join("\t")
        ))),
        None => Ok(()),
    }
}

/// Writes the table as gzip compressed TSV file
///
/// An existing file is overwritten.
///
/// # Errors
///
/// [`EdamError::CannotOpenFile`] if the file can't be created or written
pub fn write_gz<T: TsvTable + ?Sized>(path: &Path, table: &T) -> EdamResult<()> {
    let file = File::create(path)
        .map_err(|err| EdamError::CannotOpenFile(format!("{}: {err}", path.display())))?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    table.write_tsv(&mut encoder)?;
    let mut writer = encoder
        .finish()
        .map_err(|err| EdamError::CannotOpenFile(format!("{}: {err}", path.display())))?;
    writer
        .flush()
        .map_err(|err| EdamError::CannotOpenFile(format!("{}: {err}", path.display())))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

/// Reads a table from a gzip compressed TSV file
///
/// # Errors
///
/// - [`EdamError::CannotOpenFile`] if the file does not exist
/// - [`EdamError::ParseTableError`] if the content is not a valid table
pub fn read_gz<T: TsvTable>(path: &Path) -> EdamResult<T> {
    let file = File::open(path)
        .map_err(|err| EdamError::CannotOpenFile(format!("{}: {err}", path.display())))?;
    let reader = BufReader::new(GzDecoder::new(file));
    T::read_tsv(reader)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ToolId;

    fn tools() -> ToolTable {
        let mut table = ToolTable::default();
        table.push(ToolId::from_name("star"), "STAR\taligner");
        table.push(ToolId::from_name("bowtie"), "Bowtie");
        table
    }

    #[test]
    fn tsv_string() {
        let tsv = tools().to_tsv_string();
        assert_eq!(
            tsv,
            "tool\ttoolLabel\nhttps://bio.tools/star\tSTAR aligner\nhttps://bio.tools/bowtie\tBowtie\n"
        );
    }

    #[test]
    fn short_records() {
        let short = [vec!["https://bio.tools/star"]];
        let err = ToolTable::from_records(&["tool", "toolLabel"], &short).unwrap_err();
        assert!(matches!(err, EdamError::ParseTableError(_)));

        let header = ["tool", "toolLabel", "nbTopics", "nbOperations"];
        let err = ToolCountTable::from_records(&header, &[vec!["https://bio.tools/star", "STAR", "2"]])
            .unwrap_err();
        assert!(matches!(err, EdamError::ParseTableError(_)));

        let err = ToolList::from_records(&["tool"], &[vec![]]).unwrap_err();
        assert!(matches!(err, EdamError::ParseTableError(_)));
    }

    #[test]
    fn read_tsv() {
        let tsv = "tool\ttoolLabel\nhttps://bio.tools/star\tSTAR\n\n";
        let table = ToolTable::read_tsv(tsv.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].label, "STAR");
    }

    #[test]
    fn read_invalid_tsv() {
        assert!(ToolTable::read_tsv("".as_bytes()).is_err());
        assert!(ToolTable::read_tsv("tool\ttoolLabel\nstar\n".as_bytes()).is_err());
        assert!(ToolTable::read_tsv("tool\tlabel\nstar\tSTAR\n".as_bytes()).is_err());
    }

    #[test]
    fn gzip_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dfTool.tsv.gz");
        write_gz(&path, &tools()).unwrap();
        let table: ToolTable = read_gz(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].label, "STAR aligner");
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_gz::<ToolTable>(&dir.path().join("missing.tsv.gz")).unwrap_err();
        assert!(matches!(err, EdamError::CannotOpenFile(_)));
    }
}
