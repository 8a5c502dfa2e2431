//! Distribution computations over the stored actors
//!
//! Pure functions; callers pass the current time so results are testable.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDateTime};
use serde::Serialize;

use crate::db::Actor;

/// Share of one category value, in percent
#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub label: String,
    pub percent: f64,
}

/// Age summary reported in json form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeSummary {
    pub max_age: i32,
    pub min_age: i32,
    pub average_age: f64,
    pub median_age: f64,
}

/// Alive / dead split, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LifeStatus {
    pub alive: f64,
    pub dead: f64,
}

/// Cumulative share after which the country chart merges the tail
pub const COUNTRY_CHART_CUTOFF: f64 = 85.0;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Actors whose last update is less than one day old
pub fn updated_within_day(actors: &[Actor], now: NaiveDateTime) -> usize {
    actors
        .iter()
        .filter(|a| now.signed_duration_since(a.last_update) < Duration::days(1))
        .count()
}

/// Percentage share per distinct non-null value, largest first
fn shares<'a>(values: impl Iterator<Item = &'a str>) -> Vec<Share> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let total: usize = counts.values().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut out: Vec<Share> = counts
        .into_iter()
        .map(|(label, count)| Share {
            label: label.to_string(),
            percent: round2(count as f64 / total as f64 * 100.0),
        })
        .collect();

    // Stable sort keeps labels alphabetical within equal shares
    out.sort_by(|a, b| b.percent.partial_cmp(&a.percent).unwrap_or(Ordering::Equal));
    out
}

pub fn country_shares(actors: &[Actor]) -> Vec<Share> {
    shares(actors.iter().filter_map(|a| a.country.as_deref()))
}

pub fn gender_shares(actors: &[Actor]) -> Vec<Share> {
    shares(actors.iter().filter_map(|a| a.gender.as_deref()))
}

/// Country slices for the chart: largest shares until the cutoff, then "Others"
pub fn country_chart_slices(shares: &[Share]) -> Vec<Share> {
    let mut slices = Vec::new();
    let mut cumulative = 0.0;

    for share in shares {
        if cumulative < COUNTRY_CHART_CUTOFF {
            cumulative += share.percent;
            slices.push(share.clone());
        }
    }

    let rest = round2(100.0 - cumulative);
    if rest > 0.0 {
        slices.push(Share {
            label: "Others".to_string(),
            percent: rest,
        });
    }

    slices
}

/// Age of one actor from year components
///
/// Missing years count as 0. A positive difference below 120 is the age.
/// A negative difference means the deathday is missing and is read as years
/// since birth; it is kept only when that lands in [0, 120).
pub fn age_of(actor: &Actor, current_year: i32) -> Option<i32> {
    let birth_year = actor.birthday.map_or(0, |d| d.year());
    let death_year = actor.deathday.map_or(0, |d| d.year());
    let diff = death_year - birth_year;

    if diff > 0 && diff < 120 {
        Some(diff)
    } else if diff < 0 {
        let since_birth = current_year + diff;
        (0..120).contains(&since_birth).then_some(since_birth)
    } else {
        None
    }
}

pub fn ages(actors: &[Actor], current_year: i32) -> Vec<i32> {
    actors.iter().filter_map(|a| age_of(a, current_year)).collect()
}

pub fn age_summary(ages: &[i32]) -> Option<AgeSummary> {
    let max_age = *ages.iter().max()?;
    let min_age = *ages.iter().min()?;

    let mean = ages.iter().map(|&a| f64::from(a)).sum::<f64>() / ages.len() as f64;

    let mut sorted = ages.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (f64::from(sorted[mid - 1]) + f64::from(sorted[mid])) / 2.0
    } else {
        f64::from(sorted[mid])
    };

    Some(AgeSummary {
        max_age,
        min_age,
        average_age: round2(mean),
        median_age: median,
    })
}

/// Chart bin of an age: its leading decimal digit times ten
pub fn decade_bin(age: i32) -> u32 {
    age.unsigned_abs()
        .to_string()
        .chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .unwrap_or(0)
        * 10
}

/// Count of ages per bin, ascending by bin
pub fn decade_bins(ages: &[i32]) -> Vec<(u32, u32)> {
    let mut bins: BTreeMap<u32, u32> = BTreeMap::new();
    for &age in ages {
        *bins.entry(decade_bin(age)).or_default() += 1;
    }
    bins.into_iter().collect()
}

/// Alive vs dead split; `None` when no actors are stored
pub fn life_status(actors: &[Actor]) -> Option<LifeStatus> {
    if actors.is_empty() {
        return None;
    }

    let dead = actors.iter().filter(|a| a.deathday.is_some()).count();
    let alive_pct = round2((actors.len() - dead) as f64 / actors.len() as f64 * 100.0);

    Some(LifeStatus {
        alive: alive_pct,
        dead: round2(100.0 - alive_pct),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn actor(country: Option<&str>, birth: Option<i32>, death: Option<i32>) -> Actor {
        Actor {
            id: 1,
            tvmaze_id: 1,
            name: "X".to_string(),
            country: country.map(str::to_string),
            birthday: birth.and_then(|y| NaiveDate::from_ymd_opt(y, 6, 1)),
            deathday: death.and_then(|y| NaiveDate::from_ymd_opt(y, 6, 1)),
            gender: None,
            last_update: ts(1, 12),
            shows: None,
        }
    }

    #[test]
    fn test_country_shares_sum_to_100_and_skip_null() {
        let actors = vec![
            actor(Some("Canada"), None, None),
            actor(Some("United States"), None, None),
            actor(Some("United States"), None, None),
            actor(None, None, None),
        ];

        let shares = country_shares(&actors);
        assert_eq!(shares[0].label, "United States");
        assert_eq!(shares[0].percent, 66.67);
        assert_eq!(shares[1].percent, 33.33);
        let sum: f64 = shares.iter().map(|s| s.percent).sum();
        assert!((sum - 100.0).abs() < 0.05);
    }

    #[test]
    fn test_country_chart_merges_tail() {
        let shares: Vec<Share> = [("A", 50.0), ("B", 30.0), ("C", 10.0), ("D", 6.0), ("E", 4.0)]
            .iter()
            .map(|(l, p)| Share { label: l.to_string(), percent: *p })
            .collect();

        let slices = country_chart_slices(&shares);
        let labels: Vec<&str> = slices.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "B", "C", "Others"]);
        assert_eq!(slices[3].percent, 10.0);
    }

    #[test]
    fn test_country_chart_without_tail() {
        let shares = vec![Share { label: "A".to_string(), percent: 100.0 }];
        assert_eq!(country_chart_slices(&shares), shares);
    }

    #[test]
    fn test_age_rules() {
        // Dead: death year minus birth year
        assert_eq!(age_of(&actor(None, Some(1900), Some(1980)), 2026), Some(80));
        // Alive: years since birth
        assert_eq!(age_of(&actor(None, Some(1990), None), 2026), Some(36));
        // No dates at all
        assert_eq!(age_of(&actor(None, None, None), 2026), None);
        // Deathday without birthday
        assert_eq!(age_of(&actor(None, None, Some(1990)), 2026), None);
        // Died in birth year
        assert_eq!(age_of(&actor(None, Some(1990), Some(1990)), 2026), None);
        // Implausible
        assert_eq!(age_of(&actor(None, Some(1800), Some(1950)), 2026), None);
        assert_eq!(age_of(&actor(None, Some(1850), None), 2026), None);
    }

    #[test]
    fn test_age_summary() {
        let summary = age_summary(&[30, 40, 41, 80]).unwrap();
        assert_eq!(summary.max_age, 80);
        assert_eq!(summary.min_age, 30);
        assert_eq!(summary.average_age, 47.75);
        assert_eq!(summary.median_age, 40.5);
        assert!(age_summary(&[]).is_none());
    }

    #[test]
    fn test_decade_bins_use_leading_digit() {
        assert_eq!(decade_bin(45), 40);
        assert_eq!(decade_bin(7), 70);
        assert_eq!(decade_bin(105), 10);
        assert_eq!(decade_bins(&[45, 41, 62, 7]), vec![(40, 2), (60, 1), (70, 1)]);
    }

    #[test]
    fn test_life_status_is_complementary() {
        let actors = vec![
            actor(None, Some(1900), Some(1980)),
            actor(None, Some(1950), None),
            actor(None, Some(1960), None),
        ];
        let status = life_status(&actors).unwrap();
        assert_eq!(status.alive, 66.67);
        assert_eq!(status.dead, 33.33);
        assert!((status.alive + status.dead - 100.0).abs() < 1e-9);
        assert!(life_status(&[]).is_none());
    }

    #[test]
    fn test_updated_within_day() {
        let mut fresh = actor(None, None, None);
        fresh.last_update = ts(2, 6);
        let stale = actor(None, None, None); // 2026-10-01 12:00
        assert_eq!(updated_within_day(&[fresh, stale], ts(2, 13)), 1);
    }
}
