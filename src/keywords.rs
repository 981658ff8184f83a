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

//! Keyword tables for event records. Codes follow the Global Terrorism
//! Database codebook; each facet maps a record's categorical fields to
//! archive search terms.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

use crate::model::StructuredRecord;

static PARENTHETICAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^()]*)\)").expect("parenthetical regex"));

const SUBTYPE_SUFFIXES: &[&str] = &["/Other Personnel", "/Facility", "/Ethnicity Identified"];

const VEHICLE: &[&str] = &["vehicle", "car", "bus", "truck", "van", "automobile"];
const EXPLOSIVE: &[&str] = &["bomb*", "explo*"];
const INCENDIARY: &[&str] = &[
    "incendiary",
    "arson",
    "combustible",
    "flammable",
    "inflammable",
    "fire",
];
const FIREARM: &[&str] = &["firearm", "gun"];
const MAIL_BOMB: &[&str] = &[
    "\"parcel bomb\"",
    "\"mail bomb\"",
    "\"package bomb\"",
    "\"note bomb\"",
    "\"message bomb\"",
    "\"gift bomb\"",
    "\"present bomb\"",
    "\"delivery bomb\"",
    "\"surprise bomb\"",
    "\"postal bomb\"",
    "\"post bomb\"",
];

/// A semantic facet of an event record that can contribute search terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Attack,
    Target,
    Perpetrator,
    Weapon,
    Misc,
    /// The literal stem term, present in every event query.
    CatchAll,
}

impl Facet {
    /// Joined `(kw1) OR (kw2)` form, or empty when the facet has nothing.
    pub fn render(&self, record: &StructuredRecord, catch_all: &str) -> String {
        let f = |name: &str| record.field_or_blank(name);
        let keywords = match self {
            Facet::Attack => attack_keywords(f("attacktype1")),
            Facet::Target => target_keywords(
                f("targtype1"),
                f("targsubtype1_txt"),
                f("corp1"),
                f("target1"),
            ),
            Facet::Perpetrator => perpetrator_keywords(f("gname")),
            Facet::Weapon => weapon_keywords(
                f("suicide"),
                f("attacktype1"),
                f("weaptype1"),
                f("weapsubtype1"),
            ),
            Facet::Misc => misc_keywords(
                f("attacktype1"),
                f("ishostkid"),
                f("ransom"),
                f("suicide"),
            ),
            Facet::CatchAll => return catch_all.to_string(),
        };
        join_facet(&keywords)
    }
}

pub fn phrase(text: &str) -> String {
    format!("\"{text}\"")
}

/// Drops degenerate keywords and joins the rest as a disjunction.
pub fn join_facet(keywords: &[String]) -> String {
    let kept: Vec<&str> = keywords
        .iter()
        .map(|k| k.as_str())
        .filter(|k| k.chars().count() > 1)
        .collect();
    if kept.is_empty() {
        return String::new();
    }
    format!("({})", kept.join(") OR ("))
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

pub fn attack_keywords(attack_type: &str) -> Vec<String> {
    let list: &[&str] = match attack_type.trim() {
        "1" => &["assassin*"],
        "2" => &["assault*", "armed"],
        "3" => EXPLOSIVE,
        "4" => &["hijack*"],
        "5" => &["hostage", "barricade*"],
        "6" => &["hostage*", "kidnap*"],
        "7" => &["facility", "infrastructure", "sabotage"],
        "8" => &["assault*", "unarmed"],
        _ => &[],
    };
    words(list)
}

pub fn target_keywords(
    target_type: &str,
    subtype_label: &str,
    corp: &str,
    target: &str,
) -> Vec<String> {
    let list: &[&str] = match target_type.trim() {
        "1" => &["business"],
        "2" | "22" => &["government", "political"],
        "3" => &["police"],
        "4" => &["military"],
        "5" => &["abortion"],
        "6" => &["airport", "aircraft"],
        "7" => &["government", "embass*", "consul*"],
        "8" => &[
            "school",
            "\"educational institution\"",
            "university",
            "teach*",
            "professor",
        ],
        "9" => &["supplies"],
        "10" => &["journalist", "reporter", "media"],
        "11" => &["maritime", "fishing", "\"oil tanker\"", "ferr*", "yacht"],
        "12" => &["NGO", "\"non-governmental organization\""],
        "15" => &[
            "religious",
            "church",
            "mosque",
            "synagogue",
            "imam",
            "priest",
            "bishop",
        ],
        "16" => &["telecom*", "transmitter", "tower"],
        "18" => &["tourist", "\"tour bus*\"", "tour"],
        "19" => &["\"public transport*\""],
        "21" => &[
            "utilit*",
            "\"power line\"",
            "pipeline",
            "transformer",
            "\"high tension line\"",
            "substation",
            "lamppost",
            "\"street light\"",
        ],
        _ => &[],
    };
    let mut keywords = words(list);
    keywords.extend(subtype_phrases(subtype_label).iter().map(|p| phrase(p)));
    if !corp.is_empty() {
        keywords.push(phrase(corp));
    }
    if !target.is_empty() {
        keywords.push(phrase(target));
    }
    keywords
}

/// Normalises a free-text target subtype into bare phrases.
pub fn subtype_phrases(label: &str) -> Vec<String> {
    let mut label = label.to_string();
    for suffix in SUBTYPE_SUFFIXES {
        label = label.replace(suffix, "");
    }
    label = label.replace("Religion Identified", "Religious");
    let label = match label.as_str() {
        "Labor Union Related" => "Labor Union/Union".to_string(),
        "Clinics" => "Abortion Clinics".to_string(),
        "Personnel" => "Abortion Personnel".to_string(),
        "Affiliated Institution"
        | "Named Citizen"
        | "Other (including online news agencies)"
        | "Other Personnel" => String::new(),
        _ => label,
    };
    let label = match PARENTHETICAL.find_iter(&label).last() {
        Some(group) => label[..group.start()].to_string(),
        None => label,
    };
    label
        .split('/')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

pub fn perpetrator_keywords(group: &str) -> Vec<String> {
    if group.chars().count() > 2 && group != "Unknown" {
        vec![phrase(group)]
    } else {
        Vec::new()
    }
}

pub fn weapon_keywords(
    suicide: &str,
    attack_type: &str,
    weapon_type: &str,
    weapon_subtype: &str,
) -> Vec<String> {
    let weapon_type = weapon_type.trim();
    let attack_type = attack_type.trim();
    let mut keywords = Vec::new();

    let primary: &[&str] = match weapon_type {
        "1" => &["biological"],
        "2" => &["chemical"],
        "3" => &["radiological", "radioactive", "radiation"],
        "4" => &["nuclear"],
        "5" => FIREARM,
        "6" if attack_type != "3" => EXPLOSIVE,
        "7" => &["fake"],
        "8" => INCENDIARY,
        "9" => &["melee"],
        "10" => VEHICLE,
        "11" if attack_type != "7" => &["sabotage"],
        _ => &[],
    };
    keywords.extend(words(primary));

    let secondary: &[&str] = match weapon_subtype.trim() {
        "1" => &["poison*"],
        "30" => &["explo*"],
        "2" => &["automatic", "semi-automatic"],
        "3" => &["handgun"],
        "4" => &["rifle", "shotgun"],
        "5" | "6" if weapon_type != "5" => FIREARM,
        "7" => &["grenade"],
        "8" => &["mine"],
        "9" => MAIL_BOMB,
        "10" => &["\"pressure trigger\""],
        "11" => &["projectile", "rocket", "mortar", "RPG", "missile"],
        "12" => &["\"remote device\"", "trigger", "detonate"],
        "13" if suicide.trim() != "1" => &["suicide"],
        "14" => &["\"time fuse\""],
        "15" if weapon_type != "10" => VEHICLE,
        "16" | "17" if weapon_type != "6" && attack_type != "3" => EXPLOSIVE,
        "28" => &["dynamite", "tnt"],
        "29" => &["\"sticky bomb\""],
        "18" if weapon_type != "8" => INCENDIARY,
        "19" => &["molotov", "\"petrol bomb\""],
        "20" => &["gasoline", "alcohol"],
        "21" => &["blunt"],
        "22" => &["fist", "punch*", "beat*", "kick*"],
        "23" => &["knife", "sword", "stab"],
        "24" => &["rope", "strangl*"],
        "26" => &["suffocat*"],
        _ => &[],
    };
    keywords.extend(words(secondary));
    keywords
}

pub fn misc_keywords(attack_type: &str, hostage: &str, ransom: &str, suicide: &str) -> Vec<String> {
    let mut keywords = Vec::new();
    if suicide.trim() == "1" {
        keywords.push("suicide".to_string());
    }
    if ransom.trim() == "1" {
        keywords.push("ransom".to_string());
    }
    let attack_type = attack_type.trim();
    if hostage.trim() == "1" && attack_type != "5" && attack_type != "6" {
        keywords.extend(words(&["hostage*", "kidnap*"]));
    }
    keywords
}
