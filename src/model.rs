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

//! Shared domain types used across synthesis, reconciliation, and the ledger.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;
use time::Date;

use crate::error::RecordError;

/// One row of the input dataset. Field order follows the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredRecord {
    pub index: u64,
    fields: Vec<(String, String)>,
}

impl StructuredRecord {
    pub fn new(index: u64, fields: Vec<(String, String)>) -> Self {
        Self { index, fields }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Blank when the column is absent, for facets that tolerate gaps.
    pub fn field_or_blank(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    pub fn require(&self, name: &str) -> Result<&str, RecordError> {
        self.get(name).ok_or_else(|| RecordError::MissingField {
            record: self.index,
            field: name.to_string(),
        })
    }
}

/// Archive geometry: results per page and the most pages it will ever serve
/// for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paging {
    pub page_size: u64,
    pub cap_pages: u64,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            page_size: 100,
            cap_pages: 100,
        }
    }
}

impl Paging {
    /// Results one sub-search can expose before the display cap.
    pub fn display_cap(&self) -> u64 {
        self.cap_pages * self.page_size
    }

    pub fn generation_offset(&self, generation: u32) -> u64 {
        u64::from(generation) * self.display_cap()
    }

    pub fn global_index(&self, local: u64, generation: u32) -> u64 {
        local + self.generation_offset(generation)
    }
}

/// Result positions a lineage still needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Missing {
    /// Nothing has been captured for the lineage yet.
    AllOutstanding,
    /// Never empty; see [`Missing::specific`].
    Specific(BTreeSet<u64>),
}

impl Missing {
    /// `None` when nothing is left to fetch.
    pub fn specific(set: BTreeSet<u64>) -> Option<Self> {
        if set.is_empty() {
            None
        } else {
            Some(Self::Specific(set))
        }
    }

    pub fn contains(&self, global_index: u64) -> bool {
        match self {
            Self::AllOutstanding => true,
            Self::Specific(set) => set.contains(&global_index),
        }
    }

    pub fn intersects(&self, first: u64, last: u64) -> bool {
        match self {
            Self::AllOutstanding => true,
            Self::Specific(set) => first <= last && set.range(first..=last).next().is_some(),
        }
    }

    pub fn any_beyond(&self, bound: u64) -> bool {
        match self {
            Self::AllOutstanding => false,
            Self::Specific(set) => set.range(bound + 1..).next().is_some(),
        }
    }

    pub fn len(&self) -> Option<usize> {
        match self {
            Self::AllOutstanding => None,
            Self::Specific(set) => Some(set.len()),
        }
    }
}

/// State of one lineage: an original search and its continuations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchContext {
    pub record_index: u64,
    pub original_query: String,
    pub query: String,
    pub original_start: Date,
    pub original_end: Date,
    pub query_start: Date,
    pub query_end: Date,
    pub generation: u32,
    pub missing: Missing,
}

impl SearchContext {
    pub fn new(record_index: u64, query: String, start: Date, end: Date, missing: Missing) -> Self {
        Self {
            record_index,
            original_query: query.clone(),
            query,
            original_start: start,
            original_end: end,
            query_start: start,
            query_end: end,
            generation: 0,
            missing,
        }
    }
}

/// One result as extracted from a page, before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub global_index: u64,
    pub title: String,
    pub citation_text: String,
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedArticle {
    pub record_index: u64,
    pub result_count: u64,
    pub original_query: String,
    pub query: String,
    pub original_start: Date,
    pub original_end: Date,
    pub query_start: Date,
    pub query_end: Date,
    pub generation: u32,
    pub global_index: u64,
    pub title: String,
    pub citation_text: String,
    pub link: String,
    pub days_from: Option<Date>,
}

impl PersistedArticle {
    pub fn from_row(
        ctx: &SearchContext,
        paging: &Paging,
        reported_count: u64,
        row: ResultRow,
        days_from: Option<Date>,
    ) -> Self {
        Self {
            record_index: ctx.record_index,
            result_count: reported_count + paging.generation_offset(ctx.generation),
            original_query: ctx.original_query.clone(),
            query: ctx.query.clone(),
            original_start: ctx.original_start,
            original_end: ctx.original_end,
            query_start: ctx.query_start,
            query_end: ctx.query_end,
            generation: ctx.generation,
            global_index: row.global_index,
            title: row.title,
            citation_text: row.citation_text,
            link: row.link,
            days_from,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_indices_never_overlap_across_generations() {
        let paging = Paging::default();
        let last_of_gen0 = paging.global_index(paging.display_cap(), 0);
        let first_of_gen1 = paging.global_index(1, 1);
        assert!(last_of_gen0 < first_of_gen1);
        for generation in 0..5u32 {
            let lo = paging.global_index(1, generation);
            let hi = paging.global_index(paging.display_cap(), generation);
            let next_lo = paging.global_index(1, generation + 1);
            assert!(hi < next_lo);
            assert_eq!(hi - lo + 1, paging.display_cap());
        }
    }

    #[test]
    fn specific_missing_is_never_empty() {
        assert_eq!(Missing::specific(BTreeSet::new()), None);
        let missing = Missing::specific([3, 7].into_iter().collect()).unwrap();
        assert!(missing.contains(7));
        assert!(!missing.contains(4));
        assert!(missing.intersects(4, 8));
        assert!(!missing.intersects(4, 6));
        assert!(missing.any_beyond(5));
        assert!(!missing.any_beyond(7));
    }

    #[test]
    fn all_outstanding_matches_everything_but_nothing_beyond() {
        let missing = Missing::AllOutstanding;
        assert!(missing.contains(123_456));
        assert!(missing.intersects(1, 100));
        assert!(!missing.any_beyond(0));
        assert_eq!(missing.len(), None);
    }

    #[test]
    fn record_lookup_by_header_name() {
        let record = StructuredRecord::new(
            4,
            vec![
                ("city".to_string(), "Boston".to_string()),
                ("iyear".to_string(), "2013".to_string()),
            ],
        );
        assert_eq!(record.get("city"), Some("Boston"));
        assert_eq!(record.field_or_blank("corp1"), "");
        let err = record.require("imonth").unwrap_err();
        assert_eq!(
            err,
            RecordError::MissingField {
                record: 4,
                field: "imonth".to_string()
            }
        );
    }
}
