use chrono_tz::{TZ_VARIANTS, Tz};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use lazy_static::lazy_static;
use std::collections::HashMap;

const MAX_RESULTS: usize = 10;

/// A zone offered in the settings picker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneEntry {
    pub id: &'static str,
    pub label: &'static str,
}

const fn zone(id: &'static str, label: &'static str) -> ZoneEntry {
    ZoneEntry { id, label }
}

/// Common zones, grouped by region
pub const COMMON_ZONES: [ZoneEntry; 27] = [
    zone("Asia/Tokyo", "Asia/Tokyo (JST)"),
    zone("Asia/Seoul", "Asia/Seoul (KST)"),
    zone("Asia/Shanghai", "Asia/Shanghai (CST)"),
    zone("Asia/Hong_Kong", "Asia/Hong Kong (HKT)"),
    zone("Asia/Singapore", "Asia/Singapore (SGT)"),
    zone("Asia/Bangkok", "Asia/Bangkok (ICT)"),
    zone("Asia/Dubai", "Asia/Dubai (GST)"),
    zone("Asia/Kolkata", "Asia/Kolkata (IST)"),
    zone("Europe/London", "Europe/London (GMT/BST)"),
    zone("Europe/Paris", "Europe/Paris (CET/CEST)"),
    zone("Europe/Berlin", "Europe/Berlin (CET/CEST)"),
    zone("Europe/Rome", "Europe/Rome (CET/CEST)"),
    zone("Europe/Madrid", "Europe/Madrid (CET/CEST)"),
    zone("Europe/Moscow", "Europe/Moscow (MSK)"),
    zone("America/New_York", "America/New York (EST/EDT)"),
    zone("America/Chicago", "America/Chicago (CST/CDT)"),
    zone("America/Denver", "America/Denver (MST/MDT)"),
    zone("America/Los_Angeles", "America/Los Angeles (PST/PDT)"),
    zone("America/Toronto", "America/Toronto (EST/EDT)"),
    zone("America/Sao_Paulo", "America/São Paulo (BRT)"),
    zone("America/Mexico_City", "America/Mexico City (CST)"),
    zone("Australia/Sydney", "Australia/Sydney (AEDT/AEST)"),
    zone("Australia/Melbourne", "Australia/Melbourne (AEDT/AEST)"),
    zone("Pacific/Auckland", "Pacific/Auckland (NZDT/NZST)"),
    zone("Africa/Cairo", "Africa/Cairo (EET)"),
    zone("Africa/Johannesburg", "Africa/Johannesburg (SAST)"),
    zone("UTC", "UTC"),
];

lazy_static! {
    /// lowercase city name -> every zone id ending in that city
    static ref CITY_TO_ZONES: HashMap<String, Vec<&'static str>> = {
        let mut m: HashMap<String, Vec<&'static str>> = HashMap::new();
        for tz in TZ_VARIANTS.iter() {
            if let Some(city) = city_name(tz.name()) {
                m.entry(city.to_lowercase()).or_default().push(tz.name());
            }
        }
        m
    };
}

/// Display label for a zone id; ids outside the common list label themselves
pub fn label_for(id: &str) -> &str {
    COMMON_ZONES
        .iter()
        .find(|entry| entry.id == id)
        .map_or(id, |entry| entry.label)
}

/// Zone configured for this machine via `TZ`, or UTC
pub fn system_time_zone() -> String {
    std::env::var("TZ")
        .ok()
        .map(|tz| tz.trim_start_matches(':').to_string())
        .filter(|tz| tz.parse::<Tz>().is_ok())
        .unwrap_or_else(|| "UTC".to_string())
}

/// Extracts the city from a zone id (ex: "America/New_York" => "New York")
fn city_name(id: &str) -> Option<String> {
    let (_, city) = id.rsplit_once('/')?;
    Some(city.replace('_', " "))
}

/// Search time zones by city or id, using fuzzy matching.
///
/// An exact city name returns just the zones for that city. Otherwise the
/// common zones are scored together with the full tz database and the best
/// matches are returned.
pub fn search(query: &str) -> Vec<ZoneEntry> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return COMMON_ZONES.to_vec();
    }

    if let Some(ids) = CITY_TO_ZONES.get(&query) {
        return ids.iter().map(|&id| zone(id, label_for(id))).collect();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored: Vec<(i64, ZoneEntry)> = Vec::new();

    for entry in COMMON_ZONES.iter() {
        if let Some(score) = matcher.fuzzy_match(&entry.label.to_lowercase(), &query) {
            scored.push((score, *entry));
        }
    }

    for tz in TZ_VARIANTS.iter() {
        let id = tz.name();
        if let Some(score) = matcher.fuzzy_match(&id.to_lowercase(), &query) {
            scored.push((score, zone(id, label_for(id))));
        }
    }

    // sort by score (highest first) and remove duplicates
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let mut results: Vec<ZoneEntry> = Vec::new();
    for (_, entry) in scored {
        if !results.iter().any(|seen| seen.id == entry.id) {
            results.push(entry);
            if results.len() >= MAX_RESULTS {
                break;
            }
        }
    }
    results
}
