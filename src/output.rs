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

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::orchestrator::Outcome;
use crate::orchestrator::RunReport;

#[derive(Debug, Clone, Serialize, Default)]
pub struct StatsOut {
    pub took_ms: i64,
    pub records: usize,
    pub captured: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abandoned: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<usize>,
}

impl StatsOut {
    pub fn from_report(report: &RunReport, took_ms: i64) -> Self {
        let complete = report.count(Outcome::Complete) + report.count(Outcome::AlreadyComplete);
        // Generation-capped lineages still have gaps, same as partial ones.
        let partial = report.count(Outcome::Partial) + report.count(Outcome::GenerationLimit);
        Self {
            took_ms,
            records: report.lineages.len(),
            captured: report.captured(),
            complete: Some(complete),
            partial: Some(partial),
            abandoned: Some(report.count(Outcome::Abandoned)),
            skipped: Some(report.count(Outcome::Skipped)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorOut {
    pub code: String,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct JsonResponse {
    pub ok: bool,
    pub schema_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsOut>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorOut>,
}

impl JsonResponse {
    pub fn ok() -> Self {
        Self {
            ok: true,
            schema_version: "1".to_string(),
            ..Default::default()
        }
    }

    pub fn error(code: &str, message: &str) -> Self {
        Self {
            ok: false,
            schema_version: "1".to_string(),
            error: Some(ErrorOut {
                code: code.to_string(),
                message: message.to_string(),
                hint: None,
            }),
            ..Default::default()
        }
    }

    pub fn with_event(mut self, event: &str) -> Self {
        self.event = Some(event.to_string());
        self
    }

    pub fn with_results(mut self, results: Vec<Value>) -> Self {
        self.results = Some(results);
        self
    }

    pub fn with_stats(mut self, stats: StatsOut) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_actions(mut self, actions: Vec<String>) -> Self {
        if actions.is_empty() {
            return self;
        }
        self.actions = Some(actions);
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}

pub fn print_json(resp: &JsonResponse) -> Result<()> {
    let text = serde_json::to_string_pretty(resp)?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_shape() {
        let resp = JsonResponse::error("config", "bad paging");
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["ok"], false);
        assert_eq!(value["error"]["code"], "config");
        assert_eq!(value["error"]["message"], "bad paging");
        assert!(value["error"]["hint"].is_null());
        assert!(value.get("results").is_none());
        assert!(value.get("warnings").is_none());
    }

    #[test]
    fn empty_actions_are_omitted() {
        let value = serde_json::to_value(JsonResponse::ok().with_actions(Vec::new())).unwrap();
        assert!(value.get("actions").is_none());
        assert_eq!(value["schema_version"], "1");
    }
}
