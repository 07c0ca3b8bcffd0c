//! Minimal CSV output.
//!
//! Cells are quoted only when they contain a comma, a double quote, CR or LF;
//! embedded quotes are doubled. Rows end with `\r\n`.

use std::borrow::Cow;
use std::io::Write;

use crate::netsh::RuleRecord;
use crate::Result;

const LINE_END: &[u8] = b"\r\n";

/// Quote a cell if needed.
pub fn escape_cell(cell: &str) -> Cow<'_, str> {
    if cell.contains(&[',', '"', '\r', '\n'][..]) {
        Cow::Owned(format!("\"{}\"", cell.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(cell)
    }
}

/// Writes rows of cells.
pub struct CsvWriter<W: Write> {
    inner: W,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write one row.
    pub fn write_row<I, S>(&mut self, cells: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (i, cell) in cells.into_iter().enumerate() {
            if i > 0 {
                self.inner.write_all(b",")?;
            }
            self.inner.write_all(escape_cell(cell.as_ref()).as_bytes())?;
        }
        self.inner.write_all(LINE_END)?;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Writes records under a fixed header.
///
/// Fields missing from a record become empty cells; fields not named in the
/// header are dropped.
pub struct DictWriter<'c, W: Write> {
    columns: &'c [&'c str],
    writer: CsvWriter<W>,
}

impl<'c, W: Write> DictWriter<'c, W> {
    pub fn new(inner: W, columns: &'c [&'c str]) -> Self {
        Self {
            columns,
            writer: CsvWriter::new(inner),
        }
    }

    /// Write the header row.
    pub fn write_header(&mut self) -> Result<()> {
        self.writer.write_row(self.columns.iter())
    }

    /// Write one row, looking each column up with `field`.
    pub fn write_with<'a, F>(&mut self, field: F) -> Result<()>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let cells: Vec<&str> = self
            .columns
            .iter()
            .map(|c| field(*c).unwrap_or(""))
            .collect();
        self.writer.write_row(cells)
    }

    /// Write one rule record.
    pub fn write_record(&mut self, record: &RuleRecord) -> Result<()> {
        self.write_with(|c| record.get(c))
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("plain"), "plain");
        assert_eq!(escape_cell("Domain,Private"), "\"Domain,Private\"");
        assert_eq!(escape_cell("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_cell("two\nlines"), "\"two\nlines\"");
        assert_eq!(escape_cell(""), "");
    }

    #[test]
    fn test_write_rows() {
        let mut writer = CsvWriter::new(Vec::new());
        writer.write_row(["Type", "Indicator"]).unwrap();
        writer.write_row(["domain", "evil.example"]).unwrap();
        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(out, "Type,Indicator\r\ndomain,evil.example\r\n");
    }

    #[test]
    fn test_dict_writer_missing_and_extra_fields() {
        let columns = ["Rule Name", "Direction", "Action"];
        let mut writer = DictWriter::new(Vec::new(), &columns);
        writer.write_header().unwrap();

        let record: RuleRecord = [("Rule Name", "A"), ("Action", "Block"), ("Extra", "x")]
            .into_iter()
            .collect();
        writer.write_record(&record).unwrap();

        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(out, "Rule Name,Direction,Action\r\nA,,Block\r\n");
    }
}
