use crate::cli::{CapArgs, ThresholdArgs};

pub const DEFAULT_MAX_SHOWTIMES_PER_FILM: usize = 4;
pub const DEFAULT_DAY_FILM_WARNING: usize = 20;
pub const DEFAULT_DAY_FILM_LIMIT: usize = 30;
pub const DEFAULT_TOTAL_FILM_LIMIT: usize = 500;

pub const DEFAULT_CAP_MARKER: &str = "Regular";
pub const DEFAULT_MARKED_CAP: usize = 3;
pub const DEFAULT_UNMARKED_CAP: usize = 5;

/// Thresholds behind the validation heuristics. Every comparison is strict
/// (`count > limit`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub max_showtimes_per_film: usize,
    pub day_film_warning: usize,
    pub day_film_limit: usize,
    pub total_film_limit: usize,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            max_showtimes_per_film: DEFAULT_MAX_SHOWTIMES_PER_FILM,
            day_film_warning: DEFAULT_DAY_FILM_WARNING,
            day_film_limit: DEFAULT_DAY_FILM_LIMIT,
            total_film_limit: DEFAULT_TOTAL_FILM_LIMIT,
        }
    }
}

impl From<&ThresholdArgs> for ValidationPolicy {
    fn from(args: &ThresholdArgs) -> Self {
        Self {
            max_showtimes_per_film: args.max_showtimes_per_film,
            day_film_warning: args.day_film_warning,
            day_film_limit: args.day_film_limit,
            total_film_limit: args.total_film_limit,
        }
    }
}

/// Per-cinema showtime cap used by the fixer.
///
/// The cap keys off a substring of the cinema's display name rather than a
/// structured venue type. A name such as "IMAX Regular Screen 1" therefore
/// gets the marked cap even though it reads like a premium screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowtimeCapPolicy {
    pub marker: String,
    pub marked_cap: usize,
    pub unmarked_cap: usize,
}

impl Default for ShowtimeCapPolicy {
    fn default() -> Self {
        Self {
            marker: DEFAULT_CAP_MARKER.to_string(),
            marked_cap: DEFAULT_MARKED_CAP,
            unmarked_cap: DEFAULT_UNMARKED_CAP,
        }
    }
}

impl ShowtimeCapPolicy {
    /// Case-sensitive substring match on the cinema name.
    pub fn cap_for(&self, cinema_name: &str) -> usize {
        if cinema_name.contains(self.marker.as_str()) {
            self.marked_cap
        } else {
            self.unmarked_cap
        }
    }
}

impl From<&CapArgs> for ShowtimeCapPolicy {
    fn from(args: &CapArgs) -> Self {
        Self {
            marker: args.cap_marker.clone(),
            marked_cap: args.marked_cap,
            unmarked_cap: args.default_cap,
        }
    }
}
