//! CSV report encoding
//!
//! Management responses are delimiter-separated rows. A row whose first
//! column is empty is dropped instead of written.

use csv::WriterBuilder;

use crate::errors::{Result, ShortkeyError};

/// Encode `rows` as CSV.
pub fn render_report<I, R, F>(rows: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = F>,
    F: AsRef<[u8]>,
{
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(vec![]);

    for row in rows {
        let mut fields = row.into_iter().peekable();
        match fields.peek() {
            Some(first) if !first.as_ref().is_empty() => {}
            _ => continue,
        }
        writer.write_record(fields)?;
    }

    writer
        .into_inner()
        .map_err(|e| ShortkeyError::serialization(e.error().to_string()))
}
