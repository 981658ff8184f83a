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

//! Publication dates from citation blobs such as
//! `New York Times, Late Edition; New York, N.Y. [New York, N.Y]05 Jan 2021: A.3.`
//!
//! Candidate substrings are tried in a fixed order; the first one that parses
//! to a date inside `[anchor, anchor + max_offset)` wins.

use std::sync::LazyLock;

use regex::Regex;
use time::Date;
use time::Month;

static CLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\d{1,2}:\d{2}(?::\d{2})?\s*(?:am|pm)?\b").expect("clock regex")
});
static ISO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b").expect("iso regex"));
static SLASHED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{2}|\d{4})\b").expect("slash regex"));
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+|\d+").expect("token regex"));

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

const DUPLICATE_MARKER: &str = " [Duplicate]";

type Strategy = fn(&str) -> Option<String>;

/// Candidate selectors in the order they are tried.
const STRATEGIES: &[(&str, Strategy)] = &[
    ("period_segment", period_segment),
    ("bracket_to_colon", bracket_to_colon),
    ("after_bracket", after_bracket),
    ("before_colon", before_colon),
    ("whole_text", whole_text),
];

#[derive(Debug, Clone, Copy)]
pub struct DateExtractor {
    anchor: Date,
    max_offset_days: i64,
}

impl DateExtractor {
    pub fn new(anchor: Date, max_offset_days: i64) -> Self {
        Self {
            anchor,
            max_offset_days,
        }
    }

    pub fn extract(&self, citation: &str) -> Option<Date> {
        self.extract_explained(citation).map(|(date, _)| date)
    }

    /// Like [`DateExtractor::extract`], also naming the strategy that won.
    pub fn extract_explained(&self, citation: &str) -> Option<(Date, &'static str)> {
        let mut original = citation;
        loop {
            let trimmed = trim_citation(original);
            for (name, strategy) in STRATEGIES {
                if let Some(date) = strategy(&trimmed).and_then(|text| self.plausible(&text)) {
                    return Some((date, name));
                }
            }
            // Retry without the trailing `: ...` section of the untrimmed text.
            let (head, _) = original.rsplit_once(':')?;
            original = head;
        }
    }

    pub fn is_plausible(&self, date: Date) -> bool {
        let days = (date - self.anchor).whole_days();
        (0..self.max_offset_days).contains(&days)
    }

    fn plausible(&self, text: &str) -> Option<Date> {
        fuzzy_parse(text, self.anchor).filter(|date| self.is_plausible(*date))
    }
}

fn trim_citation(text: &str) -> String {
    let text = text.replace(DUPLICATE_MARKER, "");
    let segments: Vec<&str> = text.split(", ").collect();
    let text = if segments.len() >= 2 {
        segments[segments.len() - 2..].join(", ")
    } else {
        text
    };
    match text.find('(') {
        Some(pos) => text[pos + 1..].to_string(),
        None => text,
    }
}

fn period_segment(text: &str) -> Option<String> {
    let segments: Vec<&str> = text.split(". ").collect();
    if segments.len() < 2 {
        return None;
    }
    Some(segments[segments.len() - 2].to_string())
}

fn bracket_to_colon(text: &str) -> Option<String> {
    let tail = after_last_bracket(text);
    let head = tail.rsplit_once(':').map_or(tail, |(head, _)| head);
    let candidate = head.replace(')', "");
    candidate
        .chars()
        .any(|c| c.is_ascii_digit())
        .then_some(candidate)
}

fn after_bracket(text: &str) -> Option<String> {
    Some(after_last_bracket(text).to_string())
}

fn before_colon(text: &str) -> Option<String> {
    text.rsplit_once(':').map(|(head, _)| head.to_string())
}

fn whole_text(text: &str) -> Option<String> {
    Some(text.to_string())
}

fn after_last_bracket(text: &str) -> &str {
    text.rsplit_once(']').map_or(text, |(_, tail)| tail)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Parts {
    year: Option<i32>,
    month: Option<u8>,
    day: Option<u8>,
    /// The month came from a word such as `Jan`, not a bare number.
    month_named: bool,
}

impl Parts {
    fn is_empty(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.day.is_none()
    }

    /// A candidate needs a day and a month. A numeric month only counts
    /// alongside a year, so page and section numbers never read as dates.
    fn resolve(self, default: Date) -> Option<Date> {
        let (month, day) = (self.month?, self.day?);
        if !self.month_named && self.year.is_none() {
            return None;
        }
        let year = self.year.unwrap_or(default.year());
        Date::from_calendar_date(year, Month::try_from(month).ok()?, day).ok()
    }
}

/// Lenient date parse: skips words it does not know and takes a missing
/// year from `default`. Fragments without both a month and a day give up.
pub fn fuzzy_parse(text: &str, default: Date) -> Option<Date> {
    fuzzy_parts(text)?.resolve(default)
}

/// Parses a date that must carry its year, month, and day.
pub fn parse_full_date(text: &str) -> Option<Date> {
    let parts = fuzzy_parts(text)?;
    let (year, month, day) = (parts.year?, parts.month?, parts.day?);
    Date::from_calendar_date(year, Month::try_from(month).ok()?, day).ok()
}

fn fuzzy_parts(text: &str) -> Option<Parts> {
    let text = CLOCK.replace_all(text, " ");

    if let Some(caps) = ISO.captures(&text) {
        return Some(Parts {
            year: caps[1].parse().ok(),
            month: caps[2].parse().ok(),
            day: caps[3].parse().ok(),
            ..Parts::default()
        });
    }
    if let Some(caps) = SLASHED.captures(&text) {
        return Some(Parts {
            year: caps[3].parse().ok().map(widen_year),
            month: caps[1].parse().ok(),
            day: caps[2].parse().ok(),
            ..Parts::default()
        });
    }

    let mut parts = Parts::default();
    let mut small = Vec::new();
    for token in TOKEN.find_iter(&text).map(|m| m.as_str()) {
        if token.starts_with(|c: char| c.is_ascii_alphabetic()) {
            if parts.month.is_none() {
                parts.month = month_number(token);
                parts.month_named = parts.month.is_some();
            }
            continue;
        }
        match token.len() {
            1 | 2 => small.push(token.parse::<u8>().ok()?),
            4 if parts.year.is_none() => parts.year = token.parse().ok(),
            8 if parts.year.is_none() => {
                parts.year = token[..4].parse().ok();
                parts.month = token[4..6].parse().ok();
                parts.day = token[6..].parse().ok();
            }
            _ => {}
        }
    }

    let mut small = small.into_iter();
    if parts.month.is_none() && small.len() >= 2 {
        parts.month = small.next().filter(|m| (1..=12).contains(m));
    }
    if parts.day.is_none() {
        parts.day = small.next().filter(|d| (1..=31).contains(d));
    }
    if parts.year.is_none() {
        parts.year = small.next().map(|y| widen_year(i32::from(y)));
    }

    (!parts.is_empty()).then_some(parts)
}

fn month_number(word: &str) -> Option<u8> {
    let word = word.to_ascii_lowercase();
    if word.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|&name| {
            name == word || &name[..3] == word || (word == "sept" && name == "september")
        })
        .map(|idx| idx as u8 + 1)
}

fn widen_year(year: i32) -> i32 {
    match year {
        0..=49 => 2000 + year,
        50..=99 => 1900 + year,
        _ => year,
    }
}
