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

//! Drives lineages against the archive. Lineages run concurrently up to a
//! bound; requests inside one lineage are strictly sequential.

use futures::StreamExt;
use futures::stream;
use serde::Serialize;
use time::Date;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::config::RunConfig;
use crate::dates::DateExtractor;
use crate::error::ArchiveError;
use crate::error::LedgerError;
use crate::fetch::ArchiveResponse;
use crate::fetch::Fetcher;
use crate::fetch::RequestDescriptor;
use crate::fetch::Session;
use crate::fetch::extract_rows;
use crate::ledger::Ledger;
use crate::model::PersistedArticle;
use crate::model::ResultRow;
use crate::model::SearchContext;
use crate::model::StructuredRecord;
use crate::reconcile::Stage;
use crate::reconcile::continuation;
use crate::reconcile::is_limit_reached;
use crate::reconcile::page_plan;
use crate::reconcile::parse_result_count;
use crate::reconcile::remaining;
use crate::reconcile::seed_missing;
use crate::synth::QuerySynthesizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The ledger already held every result; nothing was fetched.
    AlreadyComplete,
    Complete,
    /// Finished, but some pages failed and remain missing.
    Partial,
    /// The archive rejected a form request; resumable on the next run.
    Abandoned,
    /// The record could not be turned into a query.
    Skipped,
    GenerationLimit,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineageOutcome {
    pub record: u64,
    pub outcome: Outcome,
    pub generations: u32,
    pub pages_fetched: usize,
    pub page_failures: usize,
    pub captured: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl LineageOutcome {
    fn new(record: u64) -> Self {
        Self {
            record,
            outcome: Outcome::Complete,
            generations: 0,
            pages_fetched: 0,
            page_failures: 0,
            captured: 0,
            detail: None,
        }
    }

    fn finish(mut self, outcome: Outcome, detail: Option<String>) -> Self {
        self.outcome = match outcome {
            Outcome::Complete if self.page_failures > 0 => Outcome::Partial,
            other => other,
        };
        self.detail = detail;
        debug!(record = self.record, stage = %Stage::Done, outcome = ?self.outcome);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub lineages: Vec<LineageOutcome>,
}

impl RunReport {
    pub fn captured(&self) -> usize {
        self.lineages.iter().map(|l| l.captured).sum()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.lineages.iter().filter(|l| l.outcome == outcome).count()
    }
}

pub struct Orchestrator<'a> {
    config: &'a RunConfig,
    synth: &'a QuerySynthesizer,
    fetcher: &'a dyn Fetcher,
    ledger: &'a dyn Ledger,
    session: Session,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        config: &'a RunConfig,
        synth: &'a QuerySynthesizer,
        fetcher: &'a dyn Fetcher,
        ledger: &'a dyn Ledger,
        session: Session,
    ) -> Self {
        Self {
            config,
            synth,
            fetcher,
            ledger,
            session,
        }
    }

    /// Sweeps every record. A ledger failure stops the run; every other
    /// failure stays local to its lineage or page.
    pub async fn run(&self, records: &[StructuredRecord]) -> Result<RunReport, LedgerError> {
        let results: Vec<Result<LineageOutcome, LedgerError>> = stream::iter(records)
            .map(|record| self.run_lineage(record))
            .buffer_unordered(self.config.max_concurrent_lineages)
            .collect()
            .await;
        let mut lineages = results.into_iter().collect::<Result<Vec<_>, _>>()?;
        lineages.sort_by_key(|l| l.record);
        Ok(RunReport { lineages })
    }

    pub async fn run_lineage(
        &self,
        record: &StructuredRecord,
    ) -> Result<LineageOutcome, LedgerError> {
        let mut outcome = LineageOutcome::new(record.index);
        debug!(record = record.index, stage = %Stage::NotStarted);
        let prior = self.ledger.lineage(record.index).await?;
        let Some(missing) = seed_missing(&prior) else {
            debug!(record = record.index, "lineage already complete");
            return Ok(outcome.finish(Outcome::AlreadyComplete, None));
        };
        let first = match self.synth.synthesize(record, None) {
            Ok(first) => first,
            Err(err) => {
                warn!(record = record.index, error = %err, "skipping record");
                return Ok(outcome.finish(Outcome::Skipped, Some(err.to_string())));
            }
        };
        info!(
            record = record.index,
            missing = ?missing.len(),
            start = %first.start,
            end = %first.end,
            "starting lineage"
        );
        let mut ctx =
            SearchContext::new(record.index, first.query, first.start, first.end, missing);
        let extractor = DateExtractor::new(ctx.original_start, self.config.max_offset_days);

        loop {
            outcome.generations = ctx.generation + 1;
            let submit = match self.submit(&ctx).await {
                Ok(submit) => submit,
                Err(err) => {
                    warn!(
                        record = record.index,
                        generation = ctx.generation,
                        error = %err,
                        "search rejected"
                    );
                    return Ok(outcome.finish(Outcome::Abandoned, Some(err.to_string())));
                }
            };

            let mut captured = Vec::new();
            let mut limit_anchor: Option<Option<Date>> = None;
            let plan = page_plan(
                submit.count,
                ctx.generation,
                &ctx.missing,
                &self.config.paging,
            );
            for page in plan {
                let request = RequestDescriptor::page(
                    record.index,
                    &submit.url,
                    page,
                    &ctx.query,
                    &self.session,
                );
                let fetched = match self
                    .fetch_page(&request, &ctx, &extractor, submit.count)
                    .await
                {
                    Ok(fetched) => fetched,
                    Err(err) => {
                        warn!(
                            record = record.index,
                            generation = ctx.generation,
                            page,
                            error = %err,
                            "page skipped"
                        );
                        outcome.page_failures += 1;
                        continue;
                    }
                };
                outcome.pages_fetched += 1;

                debug!(
                    record = record.index,
                    page,
                    stage = %Stage::RowExtract,
                    rows = fetched.rows.len()
                );
                // The anchor looks at every row on the page, captured or not.
                let latest = fetched.rows.iter().filter_map(|(_, date)| *date).max();
                for (row, date) in fetched.rows {
                    if !ctx.missing.contains(row.global_index) {
                        continue;
                    }
                    let index = row.global_index;
                    let article = PersistedArticle::from_row(
                        &ctx,
                        &self.config.paging,
                        fetched.count,
                        row,
                        date,
                    );
                    self.ledger.append(&article).await?;
                    captured.push(index);
                }
                if fetched.limit_reached {
                    limit_anchor = Some(latest);
                }
            }
            outcome.captured += captured.len();

            let Some(left) = remaining(&ctx.missing, &captured) else {
                info!(record = record.index, generations = outcome.generations, "lineage complete");
                return Ok(outcome.finish(Outcome::Complete, None));
            };
            ctx.missing = left;

            let Some(anchor) = limit_anchor else {
                info!(record = record.index, generations = outcome.generations, "lineage finished");
                return Ok(outcome.finish(Outcome::Complete, None));
            };
            if ctx.generation + 1 >= self.config.max_generations {
                warn!(record = record.index, generation = ctx.generation, "generation limit reached");
                return Ok(outcome.finish(
                    Outcome::GenerationLimit,
                    Some(format!("stopped after {} generations", ctx.generation + 1)),
                ));
            }
            ctx = match continuation(&ctx, anchor, self.synth, record) {
                Ok(next) => next,
                Err(err) => {
                    warn!(record = record.index, error = %err, "continuation failed");
                    return Ok(outcome.finish(Outcome::Skipped, Some(err.to_string())));
                }
            };
            info!(
                record = record.index,
                generation = ctx.generation,
                stage = %Stage::Continue,
                query_start = %ctx.query_start,
                "continuing past the display cap"
            );
        }
    }

    async fn send(&self, request: &RequestDescriptor) -> Result<ArchiveResponse, ArchiveError> {
        if !self.config.download_delay.is_zero() {
            tokio::time::sleep(self.config.download_delay).await;
        }
        debug!(
            record = request.record,
            stage = %request.stage,
            url = %request.url,
            authenticated = request.session.cookie().is_some(),
            "fetch"
        );
        self.fetcher.fetch(request).await
    }

    /// Form load then form submit; yields the landing URL and result count.
    async fn submit(&self, ctx: &SearchContext) -> Result<Submitted, ArchiveError> {
        let archive = &self.config.archive;
        self.send(&RequestDescriptor::form_load(
            ctx.record_index,
            archive,
            &ctx.query,
            &self.session,
        ))
        .await?;
        let response = self
            .send(&RequestDescriptor::form_submit(
                ctx.record_index,
                archive,
                &ctx.query,
                &self.session,
            ))
            .await?;
        let count = parse_result_count(ctx.record_index, response.check(ctx.record_index)?)?;
        Ok(Submitted {
            url: response.url,
            count,
        })
    }

    async fn fetch_page(
        &self,
        request: &RequestDescriptor,
        ctx: &SearchContext,
        extractor: &DateExtractor,
        submitted_count: u64,
    ) -> anyhow::Result<FetchedPage> {
        let response = self.send(request).await?;
        let count_text = response.check(ctx.record_index)?;
        let count = parse_result_count(ctx.record_index, count_text).unwrap_or(submitted_count);
        let rows = match &response.rows {
            Some(raw) => extract_rows(raw, ctx.generation, &self.config.paging)?,
            None => Vec::new(),
        };
        Ok(FetchedPage {
            count,
            rows: rows
                .into_iter()
                .map(|row| {
                    let date = extractor.extract(&row.citation_text);
                    (row, date)
                })
                .collect(),
            limit_reached: is_limit_reached(
                response.limit_message.as_deref(),
                &self.config.archive.limit_message,
            ),
        })
    }
}

struct Submitted {
    url: String,
    count: u64,
}

struct FetchedPage {
    count: u64,
    rows: Vec<(ResultRow, Option<Date>)>,
    limit_reached: bool,
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use async_trait::async_trait;
    use time::Duration as Days;
    use time::macros::date;
    use time::macros::format_description;

    use super::*;
    use crate::config::ArchiveConfig;
    use crate::fetch::RawRows;
    use crate::ledger::MemoryLedger;
    use crate::model::Missing;
    use crate::model::Paging;

    const LIMIT: &str = "You have reached the maximum number of search results that are displayed.";

    fn run_config(paging: Paging) -> RunConfig {
        RunConfig {
            paging,
            max_generations: 50,
            max_concurrent_lineages: 2,
            download_delay: Duration::ZERO,
            max_offset_days: 51,
            archive: ArchiveConfig::default(),
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum PageFault {
        Transport,
        /// One link short of the other row fields.
        Mismatch,
        Expired,
    }

    /// Archive stand-in holding `docs` dated articles, three per day from
    /// 2021-01-01, sorted oldest first. Queries are answered by their
    /// `PD(start-end)` window, capped at `paging.display_cap()` results.
    struct SimArchive {
        docs: usize,
        paging: Paging,
        faults: Mutex<HashMap<(Date, u64), PageFault>>,
        fetches: AtomicUsize,
        rejected: Option<ArchiveError>,
    }

    impl SimArchive {
        fn new(docs: usize, paging: Paging) -> Self {
            Self {
                docs,
                paging,
                faults: Mutex::new(HashMap::new()),
                fetches: AtomicUsize::new(0),
                rejected: None,
            }
        }

        fn failing(self, pages: &[(Date, u64)]) -> Self {
            let faults = pages.iter().map(|&page| (page, PageFault::Transport));
            self.faults.lock().unwrap().extend(faults);
            self
        }

        fn fault(self, start: Date, page: u64, fault: PageFault) -> Self {
            self.faults.lock().unwrap().insert((start, page), fault);
            self
        }

        fn date_of(doc: usize) -> Date {
            date!(2021 - 01 - 01) + Days::days(doc as i64 / 3)
        }

        fn window(query: &str) -> (Date, Date) {
            let fmt = format_description!("[year][month][day]");
            let start = Date::parse(&query[3..11], &fmt).unwrap();
            let end = Date::parse(&query[12..20], &fmt).unwrap();
            (start, end)
        }

        fn matching(&self, query: &str) -> Vec<usize> {
            let (start, end) = Self::window(query);
            (0..self.docs)
                .filter(|&d| (start..=end).contains(&Self::date_of(d)))
                .collect()
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Fetcher for SimArchive {
        async fn fetch(&self, request: &RequestDescriptor) -> Result<ArchiveResponse, ArchiveError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let docs = self.matching(&request.query);
            let count_text = Some(format!("{} results", docs.len()));
            let base = ArchiveResponse {
                status: 200,
                url: "https://sim.example/results/Q/1?acct=1".to_string(),
                result_count_text: count_text,
                rows: None,
                limit_message: None,
            };
            match request.stage {
                Stage::FormLoad => Ok(base),
                Stage::FormSubmit => match &self.rejected {
                    Some(err) => Err(err.clone()),
                    None => Ok(base),
                },
                Stage::PageFetch(page) => {
                    let (start, _) = Self::window(&request.query);
                    let fault = self.faults.lock().unwrap().get(&(start, page)).copied();
                    if fault == Some(PageFault::Transport) {
                        return Err(ArchiveError::Transport {
                            record: request.record,
                            message: "connection reset".to_string(),
                        });
                    }
                    if fault == Some(PageFault::Expired) {
                        return Ok(ArchiveResponse {
                            url: "https://sim.example/sessionexpired".to_string(),
                            ..base
                        });
                    }
                    let size = self.paging.page_size as usize;
                    let first = page as usize * size;
                    let visible = docs.len().min(self.paging.display_cap() as usize);
                    let mut rows = RawRows::default();
                    for local in first..visible.min(first + size) {
                        let doc = docs[local];
                        let day = Self::date_of(doc);
                        rows.indices.push(format!("{}", local + 1));
                        rows.titles.push(format!("doc {doc}"));
                        rows.links.push(format!("/doc/{doc}"));
                        rows.citations.push(format!(
                            "Daily Sim, {} {} {}. Staff Writer",
                            &format!("{}", day.month())[..3],
                            day.day(),
                            day.year()
                        ));
                    }
                    if fault == Some(PageFault::Mismatch) {
                        rows.links.pop();
                    }
                    let last_page = page + 1 == self.paging.cap_pages;
                    let capped = docs.len() as u64 > self.paging.display_cap();
                    Ok(ArchiveResponse {
                        url: request.url.clone(),
                        rows: Some(rows),
                        limit_message: (last_page && capped).then(|| LIMIT.to_string()),
                        ..base
                    })
                }
                stage => panic!("unexpected stage {stage}"),
            }
        }
    }

    fn sim_synth() -> QuerySynthesizer {
        QuerySynthesizer::topic(vec!["sim".to_string()], date!(2021 - 01 - 01), 50)
    }

    fn one_record() -> Vec<StructuredRecord> {
        vec![StructuredRecord::new(1, Vec::new())]
    }

    fn global_indices(articles: &[PersistedArticle]) -> HashSet<u64> {
        articles.iter().map(|a| a.global_index).collect()
    }

    const SMALL: Paging = Paging {
        page_size: 5,
        cap_pages: 3,
    };

    #[tokio::test]
    async fn capped_search_continues_until_every_position_is_captured() {
        let config = run_config(SMALL);
        let synth = sim_synth();
        let archive = SimArchive::new(32, SMALL);
        let ledger = MemoryLedger::new(Vec::new());
        let orchestrator =
            Orchestrator::new(&config, &synth, &archive, &ledger, Session::default());

        let report = orchestrator.run(&one_record()).await.unwrap();
        assert_eq!(report.lineages[0].outcome, Outcome::Complete);
        assert_eq!(report.lineages[0].generations, 3);

        let articles = ledger.snapshot().await;
        // Positions are contiguous up to the last generation's count, with
        // no duplicates.
        let last_count = articles.iter().map(|a| a.result_count).max().unwrap();
        assert_eq!(last_count, 38);
        assert_eq!(global_indices(&articles), (1..=last_count).collect::<HashSet<u64>>());
        assert_eq!(articles.len(), 38);

        let second = articles.iter().find(|a| a.generation == 1).unwrap();
        assert_eq!(second.query_start, date!(2021 - 01 - 05));
        assert_eq!(second.query_end, date!(2021 - 02 - 20));
        assert_eq!(second.original_start, date!(2021 - 01 - 01));
        assert!(second.query.starts_with("PD(20210105-20210220)"));
        assert_eq!(second.result_count, 20 + 15);
        assert!(articles.iter().all(|a| a.days_from.is_some()));
    }

    #[tokio::test]
    async fn failed_pages_are_recovered_on_the_next_run() {
        let config = run_config(SMALL);
        let synth = sim_synth();
        let ledger = MemoryLedger::new(Vec::new());

        let flaky = SimArchive::new(32, SMALL)
            .failing(&[(date!(2021 - 01 - 01), 1), (date!(2021 - 01 - 05), 0)]);
        let report = Orchestrator::new(&config, &synth, &flaky, &ledger, Session::default())
            .run(&one_record())
            .await
            .unwrap();
        assert_eq!(report.lineages[0].outcome, Outcome::Partial);
        assert_eq!(report.lineages[0].page_failures, 2);
        let captured = global_indices(&ledger.snapshot().await);
        assert!(!captured.contains(&7));
        assert!(!captured.contains(&17));

        let healthy = SimArchive::new(32, SMALL);
        let report = Orchestrator::new(&config, &synth, &healthy, &ledger, Session::default())
            .run(&one_record())
            .await
            .unwrap();
        assert_eq!(report.lineages[0].outcome, Outcome::Complete);
        assert_eq!(report.lineages[0].captured, 10);
        let articles = ledger.snapshot().await;
        let captured = global_indices(&articles);
        assert_eq!(captured, (1..=38).collect::<HashSet<u64>>());
        assert_eq!(articles.len(), 38);

        let idle = SimArchive::new(32, SMALL);
        let report = Orchestrator::new(&config, &synth, &idle, &ledger, Session::default())
            .run(&one_record())
            .await
            .unwrap();
        assert_eq!(report.lineages[0].outcome, Outcome::AlreadyComplete);
        assert_eq!(idle.fetch_count(), 0);
    }

    #[tokio::test]
    async fn uncapped_search_visits_every_page_once() {
        let config = run_config(Paging::default());
        let synth = sim_synth();
        let archive = SimArchive::new(150, Paging::default());
        let ledger = MemoryLedger::new(Vec::new());
        let report = Orchestrator::new(&config, &synth, &archive, &ledger, Session::default())
            .run(&one_record())
            .await
            .unwrap();
        assert_eq!(report.lineages[0].outcome, Outcome::Complete);
        assert_eq!(report.lineages[0].generations, 1);
        assert_eq!(report.lineages[0].pages_fetched, 2);
        assert_eq!(report.captured(), 150);
        // form load, form submit, two pages
        assert_eq!(archive.fetch_count(), 4);
    }

    #[tokio::test]
    async fn malformed_and_expired_pages_are_skipped_alone() {
        let paging = Paging {
            page_size: 50,
            cap_pages: 100,
        };
        let config = run_config(paging);
        let synth = sim_synth();
        let ledger = MemoryLedger::new(Vec::new());
        let start = date!(2021 - 01 - 01);
        let broken = SimArchive::new(140, paging)
            .fault(start, 0, PageFault::Mismatch)
            .fault(start, 1, PageFault::Expired);
        let report = Orchestrator::new(&config, &synth, &broken, &ledger, Session::default())
            .run(&one_record())
            .await
            .unwrap();
        let lineage = &report.lineages[0];
        assert_eq!(lineage.outcome, Outcome::Partial);
        assert_eq!(lineage.page_failures, 2);
        assert_eq!(lineage.pages_fetched, 1);
        assert_eq!(
            global_indices(&ledger.snapshot().await),
            (101..=140).collect::<HashSet<u64>>()
        );

        let healthy = SimArchive::new(140, paging);
        let report = Orchestrator::new(&config, &synth, &healthy, &ledger, Session::default())
            .run(&one_record())
            .await
            .unwrap();
        assert_eq!(report.lineages[0].outcome, Outcome::Complete);
        assert_eq!(report.lineages[0].captured, 100);
        let articles = ledger.snapshot().await;
        assert_eq!(articles.len(), 140);
        assert_eq!(
            global_indices(&articles),
            (1..=140).collect::<HashSet<u64>>()
        );
    }

    #[tokio::test]
    async fn rejected_submit_abandons_only_that_lineage() {
        let config = run_config(SMALL);
        let synth = sim_synth();
        let mut archive = SimArchive::new(4, SMALL);
        archive.rejected = Some(ArchiveError::SessionExpired { record: 1 });
        let ledger = MemoryLedger::new(Vec::new());
        let records = vec![
            StructuredRecord::new(1, Vec::new()),
            StructuredRecord::new(2, Vec::new()),
        ];
        let report = Orchestrator::new(&config, &synth, &archive, &ledger, Session::default())
            .run(&records)
            .await
            .unwrap();
        assert_eq!(report.count(Outcome::Abandoned), 2);
        assert!(ledger.snapshot().await.is_empty());
    }

    #[tokio::test]
    async fn unusable_records_are_skipped() {
        let config = run_config(SMALL);
        let synth = QuerySynthesizer::for_event("oscar", &crate::config::Config::default()).unwrap();
        let archive = SimArchive::new(4, SMALL);
        let ledger = MemoryLedger::new(Vec::new());
        let records = vec![StructuredRecord::new(
            3,
            vec![("date".to_string(), "sometime".to_string())],
        )];
        let report = Orchestrator::new(&config, &synth, &archive, &ledger, Session::default())
            .run(&records)
            .await
            .unwrap();
        assert_eq!(report.lineages[0].outcome, Outcome::Skipped);
        assert_eq!(archive.fetch_count(), 0);
    }

    #[tokio::test]
    async fn generation_guard_stops_runaway_lineages() {
        let mut config = run_config(SMALL);
        config.max_generations = 2;
        let synth = sim_synth();
        let archive = SimArchive::new(32, SMALL);
        let ledger = MemoryLedger::new(Vec::new());
        let report = Orchestrator::new(&config, &synth, &archive, &ledger, Session::default())
            .run(&one_record())
            .await
            .unwrap();
        assert_eq!(report.lineages[0].outcome, Outcome::GenerationLimit);
        assert_eq!(report.lineages[0].generations, 2);
    }

    #[tokio::test]
    async fn resumed_lineage_fetches_only_pages_with_gaps() {
        let config = run_config(Paging::default());
        let synth = sim_synth();
        let archive = SimArchive::new(250, Paging::default());
        let ledger = MemoryLedger::new(Vec::new());
        Orchestrator::new(&config, &synth, &archive, &ledger, Session::default())
            .run(&one_record())
            .await
            .unwrap();
        let kept: Vec<PersistedArticle> = ledger
            .snapshot()
            .await
            .into_iter()
            .filter(|a| a.global_index != 120)
            .collect();
        assert_eq!(
            seed_missing(&kept),
            Missing::specific([120].into_iter().collect())
        );

        let ledger = MemoryLedger::new(kept);
        let archive = SimArchive::new(250, Paging::default());
        let report = Orchestrator::new(&config, &synth, &archive, &ledger, Session::default())
            .run(&one_record())
            .await
            .unwrap();
        assert_eq!(report.lineages[0].pages_fetched, 1);
        assert_eq!(report.lineages[0].captured, 1);
        assert_eq!(archive.fetch_count(), 3);
    }
}
