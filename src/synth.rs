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
use serde::Deserialize;
use serde::Serialize;
use time::Date;
use time::Duration;
use time::Month;
use time::macros::format_description;

use crate::config::Config;
use crate::constraint::x_of;
use crate::dates::parse_full_date;
use crate::error::RecordError;
use crate::keywords::Facet;
use crate::keywords::phrase;
use crate::model::StructuredRecord;

/// What to do with records whose day of month is recorded as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayZeroPolicy {
    /// Search from the first of the month. Known to start some windows early.
    FirstOfMonth,
    SkipRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateSource {
    /// One column holding a full date such as `Jan 15 1967`.
    Field(String),
    /// Separate year, month, and day columns.
    Components {
        year: String,
        month: String,
        day: String,
    },
    /// Fixed start, for single-topic runs without a dataset.
    Fixed(Date),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryBody {
    Topic(Vec<String>),
    Facets {
        facets: Vec<Facet>,
        required: usize,
        proximity: u32,
        catch_all: String,
        location_fields: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesized {
    pub query: String,
    pub start: Date,
    pub end: Date,
}

#[derive(Debug, Clone)]
pub struct QuerySynthesizer {
    pub date_source: DateSource,
    pub body: QueryBody,
    pub window_days: i64,
    pub day_zero: DayZeroPolicy,
}

impl QuerySynthesizer {
    /// Builds the synthesizer for a named event type. Names are compared
    /// lower-cased with spaces removed, so `World Series` is `worldseries`.
    pub fn for_event(event: &str, config: &Config) -> Result<Self> {
        let key = event.replace(' ', "").to_lowercase();
        let field = |name: &str| DateSource::Field(name.to_string());
        let (date_source, body) = match key.as_str() {
            "terroristattack" => (
                DateSource::Components {
                    year: "iyear".to_string(),
                    month: "imonth".to_string(),
                    day: "iday".to_string(),
                },
                QueryBody::Facets {
                    facets: config.facets.clone(),
                    required: config.required_facets,
                    proximity: config.proximity,
                    catch_all: config.catch_all.clone(),
                    location_fields: config.location_fields.clone(),
                },
            ),
            "superbowl" => (field("Date"), topic(&["superbowl", "super bowl"])),
            "sotu" => (field("date"), topic(&["state of the union"])),
            "worldseries" => (field("date"), topic(&["world series"])),
            "oscar" => (field("date"), topic(&["oscars", "academy awards"])),
            _ if !config.topic_phrases.is_empty() => (
                field(&config.date_field),
                QueryBody::Topic(config.topic_phrases.clone()),
            ),
            _ => anyhow::bail!(
                "unknown event '{event}'; set topic_phrases or use one of \
                 terroristattack, superbowl, sotu, worldseries, oscar"
            ),
        };
        Ok(Self {
            date_source,
            body,
            window_days: config.scrape_window_days,
            day_zero: config.day_zero_policy,
        })
    }

    /// Single fixed-window topic search.
    pub fn topic(phrases: Vec<String>, start: Date, window_days: i64) -> Self {
        Self {
            date_source: DateSource::Fixed(start),
            body: QueryBody::Topic(phrases),
            window_days,
            day_zero: DayZeroPolicy::FirstOfMonth,
        }
    }

    pub fn base_date(&self, record: &StructuredRecord) -> Result<Date, RecordError> {
        match &self.date_source {
            DateSource::Fixed(date) => Ok(*date),
            DateSource::Field(name) => {
                let raw = record.require(name)?;
                parse_full_date(raw).ok_or_else(|| invalid(record, name, raw))
            }
            DateSource::Components { year, month, day } => {
                let raw_year = record.require(year)?;
                let raw_month = record.require(month)?;
                let raw_day = record.require(day)?;
                let y: i32 = raw_year
                    .trim()
                    .parse()
                    .map_err(|_| invalid(record, year, raw_year))?;
                let m = raw_month
                    .trim()
                    .parse::<u8>()
                    .ok()
                    .and_then(|m| Month::try_from(m).ok())
                    .ok_or_else(|| invalid(record, month, raw_month))?;
                let d: u8 = raw_day
                    .trim()
                    .parse()
                    .map_err(|_| invalid(record, day, raw_day))?;
                let d = match (d, self.day_zero) {
                    (0, DayZeroPolicy::FirstOfMonth) => 1,
                    (0, DayZeroPolicy::SkipRecord) => {
                        return Err(RecordError::UnknownDay {
                            record: record.index,
                        });
                    }
                    (d, _) => d,
                };
                Date::from_calendar_date(y, m, d).map_err(|_| invalid(record, day, raw_day))
            }
        }
    }

    /// Query for `record`. `window` pins both ends, as continuations do;
    /// otherwise the window starts at the record's date.
    pub fn synthesize(
        &self,
        record: &StructuredRecord,
        window: Option<(Date, Date)>,
    ) -> Result<Synthesized, RecordError> {
        let (start, end) = match window {
            Some(window) => window,
            None => {
                let start = self.base_date(record)?;
                let end = start
                    .checked_add(Duration::days(self.window_days))
                    .ok_or_else(|| invalid(record, "window_end", &start.to_string()))?;
                (start, end)
            }
        };
        let body = match &self.body {
            QueryBody::Topic(phrases) => topic_clause(phrases),
            QueryBody::Facets {
                facets,
                required,
                proximity,
                catch_all,
                location_fields,
            } => {
                let location = location_clause(record, location_fields)?;
                let rendered: Vec<String> = facets
                    .iter()
                    .map(|facet| facet.render(record, catch_all))
                    .collect();
                x_of(*required, &rendered, &location, *proximity)
            }
        };
        Ok(Synthesized {
            query: format!("{} AND {body}", date_clause(start, end)),
            start,
            end,
        })
    }
}

fn topic(phrases: &[&str]) -> QueryBody {
    QueryBody::Topic(phrases.iter().map(|p| p.to_string()).collect())
}

fn invalid(record: &StructuredRecord, field: &str, value: &str) -> RecordError {
    RecordError::InvalidDate {
        record: record.index,
        field: field.to_string(),
        value: value.to_string(),
    }
}

/// Archive publication-date range, `PD(yyyymmdd-yyyymmdd)`.
pub fn date_clause(start: Date, end: Date) -> String {
    let fmt = format_description!("[year][month][day]");
    // Formatting a calendar date with this description cannot fail.
    let start = start.format(&fmt).unwrap_or_default();
    let end = end.format(&fmt).unwrap_or_default();
    format!("PD({start}-{end})")
}

fn topic_clause(phrases: &[String]) -> String {
    let quoted: Vec<String> = phrases.iter().map(|p| phrase(p)).collect();
    format!("({})", quoted.join(" OR "))
}

fn location_clause(record: &StructuredRecord, fields: &[String]) -> Result<String, RecordError> {
    let names: Vec<String> = fields
        .iter()
        .map(|f| record.field_or_blank(f).trim())
        .filter(|v| !v.is_empty())
        .map(phrase)
        .collect();
    if names.is_empty() {
        return Err(RecordError::MissingField {
            record: record.index,
            field: fields.join("|"),
        });
    }
    Ok(format!("({})", names.join(" OR ")))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    fn record(fields: &[(&str, &str)]) -> StructuredRecord {
        StructuredRecord::new(
            7,
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn attack() -> StructuredRecord {
        record(&[
            ("iyear", "2013"),
            ("imonth", "4"),
            ("iday", "15"),
            ("city", "Boston"),
            ("provstate", "Massachusetts"),
            ("attacktype1", "3"),
            ("targtype1", "14"),
            ("targsubtype1_txt", "Marathon"),
            ("corp1", ""),
            ("target1", ""),
            ("gname", "Unknown"),
        ])
    }

    #[test]
    fn event_query_uses_x_of_facets_and_date_range() {
        let synth = QuerySynthesizer::for_event("terroristattack", &Config::default()).unwrap();
        let out = synth.synthesize(&attack(), None).unwrap();
        assert_eq!(out.start, date!(2013 - 04 - 15));
        assert_eq!(out.end, date!(2013 - 06 - 04));

        let attack = "((bomb*) OR (explo*))";
        let target = "((\"Marathon\"))";
        let stem = "(terroris*)";
        let location = "(\"Boston\" OR \"Massachusetts\")";
        let clause = |a: &str, b: &str| {
            format!("{a} NEAR/200 {b} AND {a} NEAR/200 {location} AND {b} NEAR/200 {location}")
        };
        let expected = format!(
            "PD(20130415-20130604) AND (({}) OR ({}) OR ({}))",
            clause(attack, target),
            clause(attack, stem),
            clause(target, stem),
        );
        assert_eq!(out.query, expected);
    }

    #[test]
    fn day_zero_falls_back_to_first_of_month() {
        let rec = record(&[("iyear", "2013"), ("imonth", "4"), ("iday", "0")]);
        let synth = QuerySynthesizer::for_event("terroristattack", &Config::default()).unwrap();
        assert_eq!(synth.base_date(&rec).unwrap(), date!(2013 - 04 - 01));

        let strict = QuerySynthesizer {
            day_zero: DayZeroPolicy::SkipRecord,
            ..synth
        };
        assert_eq!(
            strict.base_date(&rec),
            Err(RecordError::UnknownDay { record: 7 })
        );
    }

    #[test]
    fn blank_location_is_a_record_error() {
        let rec = record(&[("iyear", "2013"), ("imonth", "4"), ("iday", "2")]);
        let synth = QuerySynthesizer::for_event("terroristattack", &Config::default()).unwrap();
        assert!(matches!(
            synth.synthesize(&rec, None),
            Err(RecordError::MissingField { record: 7, .. })
        ));
    }

    #[test]
    fn malformed_dates_are_record_errors() {
        let synth = QuerySynthesizer::for_event("terroristattack", &Config::default()).unwrap();
        let rec = record(&[("iyear", "2013"), ("imonth", "13"), ("iday", "2")]);
        assert!(matches!(
            synth.base_date(&rec),
            Err(RecordError::InvalidDate { ref field, .. }) if field == "imonth"
        ));
        let rec = record(&[("iyear", "20x3"), ("imonth", "1"), ("iday", "2")]);
        assert!(synth.base_date(&rec).is_err());
    }

    #[test]
    fn topic_presets_template_the_window() {
        let synth = QuerySynthesizer::for_event("Super Bowl", &Config::default()).unwrap();
        let rec = record(&[("Date", "Jan 15 1967")]);
        let out = synth.synthesize(&rec, None).unwrap();
        assert_eq!(
            out.query,
            "PD(19670115-19670306) AND (\"superbowl\" OR \"super bowl\")"
        );
    }

    #[test]
    fn explicit_window_overrides_record_date() {
        let synth = QuerySynthesizer::for_event("oscar", &Config::default()).unwrap();
        let rec = record(&[("date", "not a date")]);
        let out = synth
            .synthesize(&rec, Some((date!(2021 - 01 - 03), date!(2021 - 01 - 10))))
            .unwrap();
        assert_eq!(
            out.query,
            "PD(20210103-20210110) AND (\"oscars\" OR \"academy awards\")"
        );
    }

    #[test]
    fn fixed_topic_needs_no_record_fields() {
        let synth = QuerySynthesizer::topic(vec!["biden".to_string()], date!(2020 - 05 - 01), 1);
        let out = synth.synthesize(&record(&[]), None).unwrap();
        assert_eq!(out.query, "PD(20200501-20200502) AND (\"biden\")");
    }

    #[test]
    fn window_past_the_calendar_is_an_invalid_date() {
        let synth = QuerySynthesizer::topic(vec!["y10k".to_string()], date!(9999 - 12 - 31), 50);
        assert!(matches!(
            synth.synthesize(&record(&[]), None),
            Err(RecordError::InvalidDate { record: 7, .. })
        ));

        let superbowl = QuerySynthesizer::for_event("superbowl", &Config::default()).unwrap();
        let rec = record(&[("Date", "Dec 1 9999")]);
        assert!(matches!(
            superbowl.synthesize(&rec, None),
            Err(RecordError::InvalidDate { .. })
        ));
    }

    #[test]
    fn unknown_event_without_phrases_is_rejected() {
        assert!(QuerySynthesizer::for_event("eclipse", &Config::default()).is_err());
    }
}
