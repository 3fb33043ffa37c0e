//! Loading a [`RuleSet`] from a comma-separated rules file.
//!
//! Each row is `property,pattern,replacement`. Fields follow the usual CSV
//! quoting rules, so a pattern containing commas is written in double
//! quotes. Blank lines are skipped; there is no header row.
//!
//! ```text
//! svn:author,^jdoe$,john.doe
//! svn:log,"(?i)bug #(\d+)","issue ${1}"
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::{RewriteRule, RuleSet};
use crate::{Error, Result};

/// Number of fields every row must have.
const FIELDS_PER_ROW: usize = 3;

impl RuleSet {
    /// Loads rules from the CSV file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RuleFileUnreadable`] if the file cannot be opened,
    /// and [`Error::RuleFile`] naming the file and line for a CSV syntax
    /// error, a row without exactly three fields, or a pattern that does
    /// not compile.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let file = File::open(path).map_err(|source| Error::RuleFileUnreadable {
            path: name.clone(),
            source,
        })?;
        Self::from_csv_reader(file, &name)
    }

    /// Loads rules from CSV data; `source` names the data in errors.
    pub fn from_csv_reader<R: Read>(reader: R, source: &str) -> Result<Self> {
        let mut rows = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rules = RuleSet::new();
        for record in rows.byte_records() {
            let record = record.map_err(|e| {
                let line = e.position().map_or(0, |p| p.line());
                Error::rule_file(source, line, csv_reason(&e))
            })?;
            let line = record.position().map_or(0, |p| p.line());

            if record.len() == 1 && record[0].is_empty() {
                continue;
            }
            if record.len() != FIELDS_PER_ROW {
                return Err(Error::rule_file(
                    source,
                    line,
                    format!(
                        "expected {} fields, found {}",
                        FIELDS_PER_ROW,
                        record.len()
                    ),
                ));
            }

            let property = utf8_field(&record, 0, source, line)?;
            let pattern = utf8_field(&record, 1, source, line)?;
            let replacement = utf8_field(&record, 2, source, line)?;

            let rule = RewriteRule::new(property, pattern, replacement)
                .map_err(|e| Error::rule_file(source, line, e.to_string()))?;
            rules.push(property, rule);
        }

        log::debug!(
            "loaded {} rewrite rules for {} properties from {}",
            rules.len(),
            rules.properties().count(),
            source
        );
        Ok(rules)
    }
}

fn utf8_field<'r>(
    record: &'r csv::ByteRecord,
    index: usize,
    source: &str,
    line: u64,
) -> Result<&'r str> {
    std::str::from_utf8(&record[index]).map_err(|_| {
        Error::rule_file(source, line, format!("field {} is not UTF-8", index + 1))
    })
}

fn csv_reason(e: &csv::Error) -> String {
    match e.kind() {
        csv::ErrorKind::Io(io) => io.to_string(),
        _ => e.to_string(),
    }
}
