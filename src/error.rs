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

//! Error taxonomy for a sweep. Archive rejections and malformed pages are
//! local to one request; record errors are local to one record; ledger errors
//! end the run.

use thiserror::Error;

/// The archive refused to serve a request. The lineage stays resumable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    #[error("session expired while serving record {record}")]
    SessionExpired { record: u64 },

    #[error("no result count on response for record {record}")]
    ResultsAbsent { record: u64 },

    #[error("unreadable result count {text:?} for record {record}")]
    BadResultCount { record: u64, text: String },

    #[error("transport failure for record {record}: {message}")]
    Transport { record: u64, message: String },
}

/// A fetched page whose row fields cannot be trusted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error(
        "row fields disagree: {indices} indices, {titles} titles, {links} links, {citations} citations"
    )]
    Mismatch {
        indices: usize,
        titles: usize,
        links: usize,
        citations: usize,
    },

    #[error("index label {0:?} is not a result position")]
    BadIndex(String),
}

/// A structured record that cannot be turned into a query.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("record {record} has no field {field:?}")]
    MissingField { record: u64, field: String },

    #[error("record {record} has an unusable date in {field:?}: {value:?}")]
    InvalidDate {
        record: u64,
        field: String,
        value: String,
    },

    #[error("record {record} has an unknown day of month")]
    UnknownDay { record: u64 },
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger io: {0}")]
    Io(#[from] std::io::Error),

    #[error("ledger encode: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("ledger at {0} is locked by another sweep")]
    Locked(String),
}
