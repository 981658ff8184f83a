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

//! Pagination bookkeeping for one lineage: what is still missing, which
//! pages can hold it, and how a capped search continues in a later window.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use time::Date;

use crate::error::ArchiveError;
use crate::error::RecordError;
use crate::model::Missing;
use crate::model::Paging;
use crate::model::PersistedArticle;
use crate::model::SearchContext;
use crate::model::StructuredRecord;
use crate::synth::QuerySynthesizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "stage", content = "page")]
pub enum Stage {
    NotStarted,
    FormLoad,
    FormSubmit,
    PageFetch(u64),
    RowExtract,
    Continue,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::NotStarted => f.write_str("not_started"),
            Stage::FormLoad => f.write_str("form_load"),
            Stage::FormSubmit => f.write_str("form_submit"),
            Stage::PageFetch(page) => write!(f, "page_fetch({page})"),
            Stage::RowExtract => f.write_str("row_extract"),
            Stage::Continue => f.write_str("continue"),
            Stage::Done => f.write_str("done"),
        }
    }
}

/// Starting `missing` for a lineage from what the ledger already holds.
/// `None` means the lineage is complete and nothing should be fetched.
///
/// The expected total is the smallest generation-0 result count on record,
/// since the archive's count for the same query drifts between runs.
pub fn seed_missing(articles: &[PersistedArticle]) -> Option<Missing> {
    if articles.is_empty() {
        return Some(Missing::AllOutstanding);
    }
    let first_generation = articles
        .iter()
        .filter(|a| a.generation == 0)
        .map(|a| a.result_count)
        .min();
    let expected = first_generation
        .or_else(|| articles.iter().map(|a| a.result_count).min())
        .unwrap_or(0);
    let captured: BTreeSet<u64> = articles.iter().map(|a| a.global_index).collect();
    Missing::specific((1..=expected).filter(|i| !captured.contains(i)).collect())
}

/// `missing` after some indices were captured, or `None` once nothing is left.
pub fn remaining(missing: &Missing, captured: &[u64]) -> Option<Missing> {
    match missing {
        Missing::AllOutstanding => Some(Missing::AllOutstanding),
        Missing::Specific(set) => {
            let mut set = set.clone();
            for index in captured {
                set.remove(index);
            }
            Missing::specific(set)
        }
    }
}

/// Pages the archive will serve for a sub-search reporting `result_count`.
pub fn page_count(result_count: u64, paging: &Paging) -> u64 {
    (result_count / paging.page_size + 1).min(paging.cap_pages)
}

/// Inclusive global index range page `page` can hold. Empty ranges have
/// `first > last`.
pub fn page_range(page: u64, result_count: u64, generation: u32, paging: &Paging) -> (u64, u64) {
    let offset = paging.generation_offset(generation);
    let first = page * paging.page_size + 1 + offset;
    let last = ((page + 1) * paging.page_size).min(result_count) + offset;
    (first, last)
}

/// Page indices worth fetching in this generation. The last page is also
/// fetched when anything missing lies past this generation, since only it
/// carries the limit message that leads to a continuation.
pub fn page_plan(
    result_count: u64,
    generation: u32,
    missing: &Missing,
    paging: &Paging,
) -> Vec<u64> {
    let beyond = paging.generation_offset(generation) + paging.display_cap();
    (0..page_count(result_count, paging))
        .filter(|&page| {
            let (first, last) = page_range(page, result_count, generation, paging);
            missing.intersects(first, last)
                || (page + 1 == paging.cap_pages && missing.any_beyond(beyond))
        })
        .collect()
}

/// Leading number of a label such as `1,234 results`.
pub fn parse_result_count(record: u64, text: &str) -> Result<u64, ArchiveError> {
    let digits: String = text
        .split_whitespace()
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| *c != ',')
        .collect();
    digits.parse().map_err(|_| ArchiveError::BadResultCount {
        record,
        text: text.to_string(),
    })
}

pub fn is_limit_reached(message: Option<&str>, limit_message: &str) -> bool {
    message.is_some_and(|m| m.contains(limit_message.trim()))
}

/// Next generation of a capped lineage. The window restarts at `anchor`,
/// the latest date seen on the capped page, and keeps its end.
pub fn continuation(
    ctx: &SearchContext,
    anchor: Option<Date>,
    synth: &QuerySynthesizer,
    record: &StructuredRecord,
) -> Result<SearchContext, RecordError> {
    let query_start = anchor.unwrap_or(ctx.query_start);
    let next = synth.synthesize(record, Some((query_start, ctx.query_end)))?;
    Ok(SearchContext {
        query: next.query,
        query_start,
        generation: ctx.generation + 1,
        ..ctx.clone()
    })
}
