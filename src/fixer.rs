//! Deterministic repairs for scraped showtime listings.
//!
//! Every film goes through dedup, cap and drop-empty in that order. The
//! output of [`fix`] is a fixed point: fixing it again only repeats the
//! per-cinema summary lines.

use std::path::Path;

use tracing::{debug, info};

use crate::model::{Cinema, Dataset, Film, FixOutcome};
use crate::policy::ShowtimeCapPolicy;
use crate::store::{StoreError, load_dataset, save_dataset, write_backup};
use crate::util::sha256_bytes;

#[derive(Debug, Clone)]
pub struct FixOptions {
    pub caps: ShowtimeCapPolicy,
    pub backup: bool,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            caps: ShowtimeCapPolicy::default(),
            backup: true,
        }
    }
}

/// What happened to one film.
#[derive(Debug)]
enum FilmFix {
    Kept(Film),
    Dropped,
}

/// Reads `path`, optionally backs up the original bytes, repairs the
/// dataset and writes it back over `path`.
pub fn fix_file(path: &Path, options: &FixOptions) -> Result<FixOutcome, StoreError> {
    let loaded = load_dataset(path)?;
    let source_sha256 = sha256_bytes(&loaded.raw);

    let backup_path = if options.backup {
        let target = write_backup(path, &loaded.raw)?;
        info!(path = %target.display(), sha256 = %source_sha256, "backed up original data");
        Some(target.display().to_string())
    } else {
        None
    };

    let mut dataset = loaded.dataset;
    let fixes = fix(&mut dataset, &options.caps);
    save_dataset(path, &dataset)?;

    Ok(FixOutcome {
        data_path: path.display().to_string(),
        backup_path,
        source_sha256,
        fixes,
    })
}

/// Repairs every cinema in place and returns the change log.
pub fn fix(dataset: &mut Dataset, caps: &ShowtimeCapPolicy) -> Vec<String> {
    let mut log = Vec::new();
    for cinema in dataset.cinemas_mut() {
        fix_cinema(cinema, caps, &mut log);
    }
    log
}

fn fix_cinema(cinema: &mut Cinema, caps: &ShowtimeCapPolicy, log: &mut Vec<String>) {
    let name = cinema.name().to_string();
    let cap = caps.cap_for(&name);
    let films = std::mem::take(cinema.films_mut());
    let original_count = films.len();

    let kept = films
        .into_iter()
        .filter_map(|film| match fix_film(film, cap, log) {
            FilmFix::Kept(film) => Some(film),
            FilmFix::Dropped => None,
        })
        .collect::<Vec<Film>>();

    debug!(cinema = %name, cap, original = original_count, kept = kept.len(), "fixed cinema");
    log.push(format!("{name}: {original_count} → {} films", kept.len()));
    cinema.set_films(kept);
}

fn fix_film(mut film: Film, cap: usize, log: &mut Vec<String>) -> FilmFix {
    let title = film.title().to_string();
    let original = film.showtimes();

    let mut showtimes = original.clone();
    showtimes.sort();
    showtimes.dedup();
    if showtimes.len() < original.len() {
        log.push(format!("Removed duplicate showtimes from '{title}'"));
    }

    if showtimes.len() > cap {
        log.push(format!(
            "Limited '{title}' from {} to {cap} showtimes",
            showtimes.len()
        ));
        showtimes.truncate(cap);
    }

    if showtimes.is_empty() {
        log.push(format!("Removed '{title}' (no showtimes)"));
        return FilmFix::Dropped;
    }

    film.set_showtimes(showtimes);
    FilmFix::Kept(film)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{FixOptions, fix, fix_file};
    use crate::model::{Cinema, Dataset, Film};
    use crate::policy::{ShowtimeCapPolicy, ValidationPolicy};
    use crate::store::{StoreError, backup_path};
    use crate::validator::validate;

    fn caps() -> ShowtimeCapPolicy {
        ShowtimeCapPolicy::default()
    }

    #[test]
    fn dedups_without_truncating_under_cap() {
        let mut dataset = Dataset::new(vec![Cinema::new(
            "Regular Cinema",
            vec![Film::new(
                "Dune",
                "Monday",
                &["19:00", "19:00", "21:00", "21:00", "23:00"],
            )],
        )]);

        let log = fix(&mut dataset, &caps());

        assert_eq!(
            log,
            vec![
                "Removed duplicate showtimes from 'Dune'",
                "Regular Cinema: 1 → 1 films",
            ]
        );
        let film = &dataset.cinemas()[0].films()[0];
        assert_eq!(film.showtimes(), vec!["19:00", "21:00", "23:00"]);
        assert_eq!(film.showtime_count(), Some(3));
    }

    #[test]
    fn truncates_to_first_showtimes_in_ascending_order() {
        let mut dataset = Dataset::new(vec![Cinema::new(
            "IMAX Regular Screen 1",
            vec![Film::new(
                "Oppenheimer",
                "Friday",
                &["22:00", "12:00", "18:00", "10:00", "20:00", "15:00"],
            )],
        )]);

        let log = fix(&mut dataset, &caps());

        assert_eq!(
            log,
            vec![
                "Limited 'Oppenheimer' from 6 to 3 showtimes",
                "IMAX Regular Screen 1: 1 → 1 films",
            ]
        );
        let film = &dataset.cinemas()[0].films()[0];
        assert_eq!(film.showtimes(), vec!["10:00", "12:00", "15:00"]);
        assert_eq!(film.showtime_count(), Some(3));
    }

    #[test]
    fn unmarked_cinema_uses_larger_cap() {
        let mut dataset = Dataset::new(vec![Cinema::new(
            "Picturehouse",
            vec![Film::new(
                "Heat",
                "Friday",
                &["10:00", "12:00", "14:00", "16:00", "18:00", "20:00"],
            )],
        )]);

        let log = fix(&mut dataset, &caps());

        assert_eq!(log[0], "Limited 'Heat' from 6 to 5 showtimes");
        assert_eq!(dataset.cinemas()[0].films()[0].showtimes().len(), 5);
    }

    #[test]
    fn drops_films_without_showtimes() {
        let mut dataset = Dataset::new(vec![Cinema::new(
            "Odeon",
            vec![
                Film::new("Alien", "Monday", &["19:00"]),
                Film::new("Brazil", "Monday", &[]),
                Film::new("Casablanca", "Monday", &["20:00"]),
            ],
        )]);

        let log = fix(&mut dataset, &caps());

        assert_eq!(
            log,
            vec!["Removed 'Brazil' (no showtimes)", "Odeon: 3 → 2 films"]
        );
        let titles = dataset.cinemas()[0]
            .films()
            .iter()
            .map(|film| film.title().to_string())
            .collect::<Vec<String>>();
        assert_eq!(titles, vec!["Alien", "Casablanca"]);
    }

    #[test]
    fn summary_is_logged_for_every_cinema() {
        let mut dataset: Dataset = serde_json::from_value(json!({
            "cinemas": [
                { "name": "Odeon", "films": [{ "title": "Alien", "showtimes": ["19:00"] }] },
                { "name": "Empty" }
            ]
        }))
        .expect("should deserialize");

        let log = fix(&mut dataset, &caps());

        assert_eq!(log, vec!["Odeon: 1 → 1 films", "Empty: 0 → 0 films"]);
        let value = serde_json::to_value(&dataset).expect("should serialize");
        assert_eq!(value["cinemas"][1], json!({ "name": "Empty", "films": [] }));
    }

    #[test]
    fn fixed_output_is_a_fixed_point() {
        let mut dataset = Dataset::new(vec![
            Cinema::new(
                "Regular Cinema",
                vec![
                    Film::new("Dune", "Monday", &["21:00", "19:00", "19:00", "23:00", "17:00"]),
                    Film::new("Alien", "Monday", &[]),
                ],
            ),
            Cinema::new(
                "Grand",
                vec![Film::new(
                    "Heat",
                    "Tuesday",
                    &["10:00", "10:00", "12:00", "14:00", "16:00", "18:00", "20:00"],
                )],
            ),
        ]);

        let first = fix(&mut dataset, &caps());
        assert!(first.len() > 2);
        let after_first = dataset.clone();

        let second = fix(&mut dataset, &caps());
        assert_eq!(
            second,
            vec!["Regular Cinema: 1 → 1 films", "Grand: 1 → 1 films"]
        );
        assert_eq!(dataset, after_first);

        for cinema in dataset.cinemas() {
            let cap = caps().cap_for(cinema.name());
            for film in cinema.films() {
                let showtimes = film.showtimes();
                assert!(showtimes.len() <= cap);
                assert!(showtimes.windows(2).all(|pair| pair[0] < pair[1]));
            }
        }
    }

    #[test]
    fn fixed_dataset_passes_showtime_rules() {
        let mut dataset = Dataset::new(vec![Cinema::new(
            "Grand",
            vec![Film::new(
                "Heat",
                "Tuesday",
                &["10:00", "10:00", "12:00", "14:00", "16:00", "18:00", "20:00"],
            )],
        )]);
        let before = validate(&dataset, &ValidationPolicy::default());
        assert!(!before.valid);

        let policy = ShowtimeCapPolicy {
            unmarked_cap: 4,
            ..ShowtimeCapPolicy::default()
        };
        fix(&mut dataset, &policy);

        let after = validate(&dataset, &ValidationPolicy::default());
        assert!(after.valid, "unexpected issues: {:?}", after.issues);
    }

    #[test]
    fn fix_file_backs_up_and_overwrites_source() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("website_data_by_cinema.json");
        let raw = r#"{"cinemas":[{"name":"Regular Cinema","films":[{"title":"Dune","day":"Monday","showtimes":["21:00","19:00","19:00"],"poster":"dune.jpg"}]}]}"#;
        std::fs::write(&path, raw).expect("write fixture");

        let outcome = fix_file(&path, &FixOptions::default()).expect("fix should succeed");

        let backup = backup_path(&path);
        assert_eq!(outcome.backup_path, Some(backup.display().to_string()));
        assert_eq!(std::fs::read_to_string(&backup).expect("read backup"), raw);
        assert_eq!(
            outcome.fixes,
            vec![
                "Removed duplicate showtimes from 'Dune'",
                "Regular Cinema: 1 → 1 films",
            ]
        );

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).expect("read fixed"))
                .expect("fixed file should be json");
        assert_eq!(
            written,
            json!({
                "cinemas": [{
                    "name": "Regular Cinema",
                    "films": [{
                        "title": "Dune",
                        "day": "Monday",
                        "showtimes": ["19:00", "21:00"],
                        "poster": "dune.jpg",
                        "showtime_count": 2
                    }]
                }]
            })
        );
    }

    #[test]
    fn fix_file_without_backup_leaves_no_sibling() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("listings.json");
        std::fs::write(&path, r#"{"cinemas":[]}"#).expect("write fixture");

        let outcome = fix_file(
            &path,
            &FixOptions {
                backup: false,
                ..FixOptions::default()
            },
        )
        .expect("fix should succeed");

        assert!(outcome.backup_path.is_none());
        assert!(outcome.fixes.is_empty());
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn fix_file_reports_unreadable_source_without_writing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("listings.json");
        std::fs::write(&path, "not json").expect("write fixture");

        let error =
            fix_file(&path, &FixOptions::default()).expect_err("invalid json should fail");

        assert!(matches!(error, StoreError::SourceUnreadable { .. }));
        assert!(!backup_path(&path).exists());
        assert_eq!(
            std::fs::read_to_string(&path).expect("read back"),
            "not json"
        );
    }
}
