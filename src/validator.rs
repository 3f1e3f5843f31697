//! Heuristic checks over scraped showtime listings.
//!
//! Films are analysed per (cinema, day) group. Each group is evaluated by a
//! pure function that returns its own [`Findings`]; the report is the fold of
//! every group's findings plus the dataset-wide film ceiling.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use crate::model::{
    Cinema, CinemaStats, Dataset, Film, OrderedMap, ReportSummary, ValidationReport,
};
use crate::policy::ValidationPolicy;
use crate::store::{StoreError, load_dataset};
use crate::util::now_utc_string;

/// Hard issues and soft warnings in evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Findings {
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
}

impl Findings {
    fn extend(&mut self, other: Findings) {
        self.issues.extend(other.issues);
        self.warnings.extend(other.warnings);
    }
}

/// Films of one cinema on one day, in source order.
#[derive(Debug)]
pub struct DayGroup<'a> {
    pub cinema: &'a str,
    pub day: &'a str,
    pub films: Vec<&'a Film>,
}

pub fn validate_file(
    path: &Path,
    policy: &ValidationPolicy,
) -> Result<ValidationReport, StoreError> {
    let loaded = load_dataset(path)?;
    Ok(validate(&loaded.dataset, policy))
}

pub fn validate(dataset: &Dataset, policy: &ValidationPolicy) -> ValidationReport {
    let mut findings = Findings::default();
    let mut stats = OrderedMap::default();

    for cinema in dataset.cinemas() {
        let groups = group_by_day(cinema);
        stats.upsert(cinema.name(), cinema_stats(cinema, &groups));

        for group in &groups {
            let group_findings = check_day_group(group, policy);
            debug!(
                cinema = %group.cinema,
                day = %group.day,
                films = group.films.len(),
                issues = group_findings.issues.len(),
                warnings = group_findings.warnings.len(),
                "checked day group"
            );
            findings.extend(group_findings);
        }
    }

    let total_films = dataset.total_films();
    findings.extend(check_total_films(total_films, policy));

    ValidationReport {
        valid: findings.issues.is_empty(),
        timestamp: now_utc_string(),
        stats,
        summary: ReportSummary {
            total_issues: findings.issues.len(),
            total_warnings: findings.warnings.len(),
            total_films,
        },
        issues: findings.issues,
        warnings: findings.warnings,
    }
}

/// Splits a cinema's films by day, ordering groups by first appearance.
pub fn group_by_day(cinema: &Cinema) -> Vec<DayGroup<'_>> {
    let mut groups: Vec<DayGroup<'_>> = Vec::new();

    for film in cinema.films() {
        let day = film.day();
        match groups.iter_mut().find(|group| group.day == day) {
            Some(group) => group.films.push(film),
            None => groups.push(DayGroup {
                cinema: cinema.name(),
                day,
                films: vec![film],
            }),
        }
    }

    groups
}

fn cinema_stats(cinema: &Cinema, groups: &[DayGroup<'_>]) -> CinemaStats {
    let mut films_by_day = OrderedMap::default();
    for group in groups {
        films_by_day.upsert(group.day, group.films.len());
    }

    CinemaStats {
        total_films: cinema.films().len(),
        days: groups.len(),
        films_by_day,
    }
}

pub fn check_day_group(group: &DayGroup<'_>, policy: &ValidationPolicy) -> Findings {
    let prefix = format!("{} - {}", group.cinema, group.day);
    let mut findings = Findings::default();

    for film in &group.films {
        findings.issues.extend(check_film_showtimes(&prefix, film, policy));
    }

    for film in &group.films {
        if film.showtimes().is_empty() {
            findings
                .warnings
                .push(format!("{prefix}: '{}' has no showtimes", film.title()));
        }
    }

    let film_count = group.films.len();
    if film_count > policy.day_film_limit {
        findings
            .issues
            .push(format!("{prefix}: {film_count} films (too many for one day)"));
    } else if film_count > policy.day_film_warning {
        findings
            .warnings
            .push(format!("{prefix}: {film_count} films (high but possible)"));
    }

    let duplicates = duplicate_titles(&group.films);
    if !duplicates.is_empty() {
        let listing = duplicates
            .iter()
            .map(|(title, count)| format!("'{title}' x{count}"))
            .collect::<Vec<String>>()
            .join(", ");
        findings
            .issues
            .push(format!("{prefix}: Duplicate films: {listing}"));
    }

    findings
}

fn check_film_showtimes(prefix: &str, film: &Film, policy: &ValidationPolicy) -> Vec<String> {
    let showtimes = film.showtimes();
    let title = film.title();
    let mut issues = Vec::new();

    if showtimes.len() > policy.max_showtimes_per_film {
        issues.push(format!(
            "{prefix}: '{title}' has {} showtimes (unrealistic)",
            showtimes.len()
        ));
    }

    if has_repeats(&showtimes) {
        issues.push(format!("{prefix}: '{title}' has duplicate showtimes"));
    }

    issues
}

fn has_repeats(showtimes: &[String]) -> bool {
    let mut seen = HashSet::with_capacity(showtimes.len());
    showtimes.iter().any(|showtime| !seen.insert(showtime.as_str()))
}

/// Titles seen more than once, with their counts, in first-appearance order.
fn duplicate_titles(films: &[&Film]) -> Vec<(String, usize)> {
    let mut counts = OrderedMap::default();
    for film in films {
        match counts.get_mut(film.title()) {
            Some(count) => *count += 1,
            None => counts.upsert(film.title(), 1_usize),
        }
    }

    counts
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(title, count)| (title.to_string(), *count))
        .collect()
}

pub fn check_total_films(total_films: usize, policy: &ValidationPolicy) -> Findings {
    let mut findings = Findings::default();
    if total_films > policy.total_film_limit {
        findings.issues.push(format!(
            "Total films across all cinemas: {total_films} (unrealistically high)"
        ));
    }
    findings
}
