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

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use serde::Deserialize;
use serde::Serialize;

use crate::keywords::Facet;
use crate::model::Paging;
use crate::synth::DayZeroPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub event: String,
    /// Defaults to `<data_dir>/<event>/data/<event>s.csv`.
    pub dataset: Option<PathBuf>,
    pub scrape_window_days: i64,
    pub proximity: u32,
    pub required_facets: usize,
    pub facets: Vec<Facet>,
    pub catch_all: String,
    pub location_fields: Vec<String>,
    /// Phrases for event types without a preset.
    pub topic_phrases: Vec<String>,
    pub date_field: String,
    pub day_zero_policy: DayZeroPolicy,
    pub max_generations: u32,
    pub max_concurrent_lineages: usize,
    pub download_delay_ms: u64,
    pub session_cookie: Option<String>,
    pub paging: Paging,
    pub archive: ArchiveConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            event: "terroristattack".to_string(),
            dataset: None,
            scrape_window_days: 50,
            proximity: 200,
            required_facets: 2,
            facets: vec![
                Facet::Attack,
                Facet::Target,
                Facet::Perpetrator,
                Facet::CatchAll,
            ],
            catch_all: "terroris*".to_string(),
            location_fields: vec!["city".to_string(), "provstate".to_string()],
            topic_phrases: Vec::new(),
            date_field: "date".to_string(),
            day_zero_policy: DayZeroPolicy::FirstOfMonth,
            paging: Paging::default(),
            max_generations: 50,
            max_concurrent_lineages: 4,
            download_delay_ms: 250,
            archive: ArchiveConfig::default(),
            session_cookie: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub form_url: String,
    pub search_url: String,
    pub limit_message: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            form_url: "https://search.proquest.com/advanced.showresultpageoptions?site=news"
                .to_string(),
            search_url: "https://search.proquest.com/news/advanced".to_string(),
            limit_message:
                "You have reached the maximum number of search results that are displayed."
                    .to_string(),
        }
    }
}

/// Settings one sweep runs under. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub paging: Paging,
    pub max_generations: u32,
    pub max_concurrent_lineages: usize,
    pub download_delay: Duration,
    /// Citation dates must fall within this many days of the original start.
    pub max_offset_days: i64,
    pub archive: ArchiveConfig,
}

impl Config {
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            paging: self.paging,
            max_generations: self.max_generations,
            max_concurrent_lineages: self.max_concurrent_lineages.max(1),
            download_delay: Duration::from_millis(self.download_delay_ms),
            max_offset_days: self.scrape_window_days + 1,
            archive: self.archive.clone(),
        }
    }

    pub fn event_dir(&self, name: &str) -> PathBuf {
        self.data_dir.join(name).join("data")
    }

    pub fn ledger_path(&self, name: &str) -> PathBuf {
        self.event_dir(name).join("articles.jsonl")
    }

    pub fn dataset_path(&self) -> PathBuf {
        match &self.dataset {
            Some(path) => path.clone(),
            None => self
                .event_dir(&self.event)
                .join(format!("{}s.csv", self.event)),
        }
    }
}

fn config_dir() -> Option<PathBuf> {
    if cfg!(target_os = "windows") {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return Some(PathBuf::from(appdata));
        }
        if let Ok(profile) = std::env::var("USERPROFILE") {
            return Some(PathBuf::from(profile).join("AppData").join("Roaming"));
        }
        return None;
    }

    if cfg!(target_os = "macos") {
        let home = std::env::var("HOME").ok()?;
        return Some(
            PathBuf::from(home)
                .join("Library")
                .join("Application Support"),
        );
    }

    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg));
    }
    let home = std::env::var("HOME").ok()?;
    Some(PathBuf::from(home).join(".config"))
}

pub fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("sweep").join("sweep.toml"))
}

/// `explicit` must exist; the global file is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    match global_config_path() {
        Some(path) if path.exists() => read_config(&path),
        _ => Ok(Config::default()),
    }
}

pub fn read_config(path: &Path) -> Result<Config> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let config: Config =
        toml::from_str(&text).with_context(|| format!("parse {}", path.display()))?;
    if config.paging.page_size == 0 || config.paging.cap_pages == 0 {
        anyhow::bail!("paging.page_size and paging.cap_pages must be positive");
    }
    if config.scrape_window_days < 0 {
        anyhow::bail!("scrape_window_days must not be negative");
    }
    Ok(config)
}

pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir).with_context(|| format!("create dir {}", dir.display()))?;
    }
    let text = toml::to_string_pretty(config).context("encode config")?;
    std::fs::write(path, text).with_context(|| format!("write {}", path.display()))
}
