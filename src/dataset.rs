// Copyright 2026 Sweep Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use anyhow::Result;

use crate::model::StructuredRecord;

/// Records of a CSV file with a header row. Indices start at 1 with the
/// first data row. Short rows leave their trailing fields absent.
pub fn read_records(path: &Path) -> Result<Vec<StructuredRecord>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("open dataset {}", path.display()))?;
    parse_records(file).with_context(|| format!("read dataset {}", path.display()))
}

pub fn parse_records(input: impl Read) -> Result<Vec<StructuredRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(input);
    let header: Vec<String> = reader
        .headers()
        .context("read header row")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut records = Vec::new();
    for (position, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("read row {}", position + 1))?;
        let fields = header
            .iter()
            .zip(row.iter())
            .map(|(name, value)| (name.clone(), value.to_string()))
            .collect();
        records.push(StructuredRecord::new(position as u64 + 1, fields));
    }
    Ok(records)
}

/// Keeps the records named in `only`, or all of them when `only` is empty.
pub fn select(records: Vec<StructuredRecord>, only: &[u64]) -> Vec<StructuredRecord> {
    if only.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| only.contains(&r.index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_numbered_from_one() {
        let csv = "\u{feff}Date,Winner\nJan 15 1967,Green Bay\n\"Jan 14, 1968\",Green Bay\n";
        let records = parse_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].index, 1);
        assert_eq!(records[0].get("Date"), Some("Jan 15 1967"));
        assert_eq!(records[1].get("Date"), Some("Jan 14, 1968"));
    }

    #[test]
    fn short_rows_leave_fields_absent() {
        let records = parse_records("a,b,c\n1,2\n".as_bytes()).unwrap();
        assert_eq!(records[0].get("b"), Some("2"));
        assert_eq!(records[0].get("c"), None);
    }

    #[test]
    fn selection_by_index() {
        let records = parse_records("a\n1\n2\n3\n".as_bytes()).unwrap();
        let picked = select(records.clone(), &[3, 1]);
        assert_eq!(picked.iter().map(|r| r.index).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(select(records, &[]).len(), 3);
    }
}
