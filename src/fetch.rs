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

//! Archive capabilities: the transport that serves search pages and the
//! authenticator that opens a session before the sweep starts.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use tracing::warn;

use crate::config::ArchiveConfig;
use crate::error::ArchiveError;
use crate::error::ExtractionError;
use crate::model::Paging;
use crate::model::ResultRow;
use crate::reconcile::Stage;

pub const SESSION_ENV: &str = "SWEEP_SESSION_COOKIE";

/// Opaque session material, sent as a cookie header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session(Option<String>);

impl Session {
    pub fn cookie(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub record: u64,
    pub stage: Stage,
    pub url: String,
    pub query: String,
    pub form: Vec<(String, String)>,
    pub session: Session,
}

impl RequestDescriptor {
    pub fn form_load(record: u64, archive: &ArchiveConfig, query: &str, session: &Session) -> Self {
        Self {
            record,
            stage: Stage::FormLoad,
            url: archive.form_url.clone(),
            query: query.to_string(),
            form: Vec::new(),
            session: session.clone(),
        }
    }

    pub fn form_submit(
        record: u64,
        archive: &ArchiveConfig,
        query: &str,
        session: &Session,
    ) -> Self {
        let form = [
            ("queryTermField", query),
            ("fullTextLimit", "on"),
            ("sortType", "DateAsc"),
            ("includeDuplicate", "on"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self {
            record,
            stage: Stage::FormSubmit,
            url: archive.search_url.clone(),
            query: query.to_string(),
            form,
            session: session.clone(),
        }
    }

    pub fn page(record: u64, submit_url: &str, page: u64, query: &str, session: &Session) -> Self {
        Self {
            record,
            stage: Stage::PageFetch(page),
            url: page_url(submit_url, page),
            query: query.to_string(),
            form: Vec::new(),
            session: session.clone(),
        }
    }
}

/// Per-row fields as rendered, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRows {
    pub indices: Vec<String>,
    pub titles: Vec<String>,
    pub links: Vec<String>,
    pub citations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveResponse {
    #[serde(default = "ok_status")]
    pub status: u16,
    pub url: String,
    #[serde(default)]
    pub result_count_text: Option<String>,
    #[serde(default)]
    pub rows: Option<RawRows>,
    #[serde(default)]
    pub limit_message: Option<String>,
}

fn ok_status() -> u16 {
    200
}

impl ArchiveResponse {
    /// Rejects responses the archive served in place of results.
    pub fn check(&self, record: u64) -> Result<&str, ArchiveError> {
        if self.url.contains("sessionexpired") {
            return Err(ArchiveError::SessionExpired { record });
        }
        self.result_count_text
            .as_deref()
            .ok_or(ArchiveError::ResultsAbsent { record })
    }
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &RequestDescriptor) -> Result<ArchiveResponse, ArchiveError>;
}

#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self) -> Result<Session>;
}

/// Page `page` (0-based) of the result set the submit landed on. Result
/// URLs carry the 1-based page number as the path segment before `?`.
pub fn page_url(submit_url: &str, page: u64) -> String {
    match submit_url.find("/1?") {
        Some(at) => format!("{}/{}{}", &submit_url[..at], page + 1, &submit_url[at + 2..]),
        None => submit_url.to_string(),
    }
}

/// Rows of one page in global index space.
pub fn extract_rows(
    rows: &RawRows,
    generation: u32,
    paging: &Paging,
) -> Result<Vec<ResultRow>, ExtractionError> {
    let n = rows.indices.len();
    if rows.titles.len() != n || rows.links.len() != n || rows.citations.len() != n {
        return Err(ExtractionError::Mismatch {
            indices: n,
            titles: rows.titles.len(),
            links: rows.links.len(),
            citations: rows.citations.len(),
        });
    }
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let label = rows.indices[i].trim().trim_end_matches('.');
        let local: u64 = label
            .parse()
            .map_err(|_| ExtractionError::BadIndex(rows.indices[i].clone()))?;
        out.push(ResultRow {
            global_index: paging.global_index(local, generation),
            title: rows.titles[i].clone(),
            citation_text: rows.citations[i].replace('\n', ""),
            link: rows.links[i].clone(),
        });
    }
    Ok(out)
}

/// Cookie from the configuration, else from `SWEEP_SESSION_COOKIE`.
pub struct CookieAuthenticator {
    configured: Option<String>,
}

impl CookieAuthenticator {
    pub fn new(configured: Option<String>) -> Self {
        Self { configured }
    }
}

#[async_trait]
impl Authenticator for CookieAuthenticator {
    async fn authenticate(&self) -> Result<Session> {
        let cookie = self
            .configured
            .clone()
            .filter(|c| !c.trim().is_empty())
            .or_else(|| std::env::var(SESSION_ENV).ok())
            .filter(|c| !c.trim().is_empty());
        if cookie.is_none() {
            warn!("no session cookie configured; requests go out anonymous");
        }
        Ok(Session(cookie))
    }
}

/// One captured exchange. `page` is absent for the form submit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturedResponse {
    pub query: String,
    #[serde(default)]
    pub page: Option<u64>,
    pub response: ArchiveResponse,
}

/// Serves a sweep from a JSON-lines capture keyed by query and page.
pub struct ReplayFetcher {
    responses: HashMap<(String, Option<u64>), ArchiveResponse>,
}

impl ReplayFetcher {
    pub fn open(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read capture {}", path.display()))?;
        let mut captured = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry: CapturedResponse = serde_json::from_str(line)
                .with_context(|| format!("parse capture line {}", line_no + 1))?;
            captured.push(entry);
        }
        Ok(Self::from_captures(captured))
    }

    pub fn from_captures(captured: impl IntoIterator<Item = CapturedResponse>) -> Self {
        let responses = captured
            .into_iter()
            .map(|c| ((c.query, c.page), c.response))
            .collect();
        Self { responses }
    }
}

#[async_trait]
impl Fetcher for ReplayFetcher {
    async fn fetch(&self, request: &RequestDescriptor) -> Result<ArchiveResponse, ArchiveError> {
        let key = match request.stage {
            Stage::FormLoad => {
                return Ok(ArchiveResponse {
                    status: 200,
                    url: request.url.clone(),
                    result_count_text: None,
                    rows: None,
                    limit_message: None,
                });
            }
            Stage::FormSubmit => (request.query.clone(), None),
            Stage::PageFetch(page) => (request.query.clone(), Some(page)),
            stage => {
                return Err(ArchiveError::Transport {
                    record: request.record,
                    message: format!("nothing to fetch at stage {stage}"),
                });
            }
        };
        self.responses
            .get(&key)
            .cloned()
            .ok_or_else(|| ArchiveError::Transport {
                record: request.record,
                message: format!("no captured response for {} page {:?}", key.0, key.1),
            })
    }
}
