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

use std::collections::HashMap;
use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::thread::sleep;
use std::time::Duration;
use std::time::Instant;

use async_trait::async_trait;
use fs2::FileExt;
use tokio::sync::Mutex;
use tracing::warn;

use crate::error::LedgerError;
use crate::model::PersistedArticle;

/// Append-only record of captured articles, read per lineage.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn lineage(&self, record_index: u64) -> Result<Vec<PersistedArticle>, LedgerError>;
    async fn append(&self, article: &PersistedArticle) -> Result<(), LedgerError>;
}

/// JSON-lines ledger. The file is locked exclusively for as long as the
/// ledger is open; every append is flushed before it returns.
pub struct JsonlLedger {
    path: PathBuf,
    inner: Mutex<Inner>,
}

struct Inner {
    file: File,
    by_record: HashMap<u64, Vec<PersistedArticle>>,
}

const LOCK_WAIT: Duration = Duration::from_millis(5000);

impl JsonlLedger {
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        lock_with_deadline(&file, path)?;

        let mut by_record: HashMap<u64, Vec<PersistedArticle>> = HashMap::new();
        for article in read_articles(path)? {
            by_record.entry(article.record_index).or_default().push(article);
        }
        Ok(Self {
            path: path.to_path_buf(),
            inner: Mutex::new(Inner { file, by_record }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn lock_with_deadline(file: &File, path: &Path) -> Result<(), LedgerError> {
    let deadline = Instant::now() + LOCK_WAIT;
    loop {
        match file.try_lock_exclusive() {
            Ok(()) => return Ok(()),
            Err(_) if Instant::now() >= deadline => {
                return Err(LedgerError::Locked(path.display().to_string()));
            }
            Err(_) => sleep(Duration::from_millis(50)),
        }
    }
}

/// Every article in a ledger file, skipping lines that do not decode.
/// A missing file reads as empty.
pub fn read_articles(path: &Path) -> Result<Vec<PersistedArticle>, LedgerError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };
    let mut articles = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<PersistedArticle>(line) {
            Ok(article) => articles.push(article),
            Err(err) => warn!(
                path = %path.display(),
                line = line_no + 1,
                error = %err,
                "skipping malformed ledger line"
            ),
        }
    }
    Ok(articles)
}

#[async_trait]
impl Ledger for JsonlLedger {
    async fn lineage(&self, record_index: u64) -> Result<Vec<PersistedArticle>, LedgerError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .by_record
            .get(&record_index)
            .cloned()
            .unwrap_or_default())
    }

    async fn append(&self, article: &PersistedArticle) -> Result<(), LedgerError> {
        let mut line = serde_json::to_string(article)?;
        line.push('\n');
        let mut inner = self.inner.lock().await;
        inner.file.write_all(line.as_bytes())?;
        inner.file.flush()?;
        inner
            .by_record
            .entry(article.record_index)
            .or_default()
            .push(article.clone());
        Ok(())
    }
}

#[cfg(test)]
pub struct MemoryLedger {
    articles: Mutex<Vec<PersistedArticle>>,
}

#[cfg(test)]
impl MemoryLedger {
    pub fn new(articles: Vec<PersistedArticle>) -> Self {
        Self {
            articles: Mutex::new(articles),
        }
    }

    pub async fn snapshot(&self) -> Vec<PersistedArticle> {
        self.articles.lock().await.clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Ledger for MemoryLedger {
    async fn lineage(&self, record_index: u64) -> Result<Vec<PersistedArticle>, LedgerError> {
        let articles = self.articles.lock().await;
        Ok(articles
            .iter()
            .filter(|a| a.record_index == record_index)
            .cloned()
            .collect())
    }

    async fn append(&self, article: &PersistedArticle) -> Result<(), LedgerError> {
        self.articles.lock().await.push(article.clone());
        Ok(())
    }
}
