use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::policy::{
    DEFAULT_CAP_MARKER, DEFAULT_DAY_FILM_LIMIT, DEFAULT_DAY_FILM_WARNING, DEFAULT_MARKED_CAP,
    DEFAULT_MAX_SHOWTIMES_PER_FILM, DEFAULT_TOTAL_FILM_LIMIT, DEFAULT_UNMARKED_CAP,
};

pub const DEFAULT_DATA_PATH: &str = "website_data_by_cinema.json";

#[derive(Parser, Debug)]
#[command(
    name = "cinema-audit",
    version,
    about = "Validate and repair scraped cinema showtime listings"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Validate(ValidateArgs),
    Fix(FixArgs),
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    pub data_path: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ThresholdArgs {
    #[arg(long, default_value_t = DEFAULT_MAX_SHOWTIMES_PER_FILM)]
    pub max_showtimes_per_film: usize,

    #[arg(long, default_value_t = DEFAULT_DAY_FILM_WARNING)]
    pub day_film_warning: usize,

    #[arg(long, default_value_t = DEFAULT_DAY_FILM_LIMIT)]
    pub day_film_limit: usize,

    #[arg(long, default_value_t = DEFAULT_TOTAL_FILM_LIMIT)]
    pub total_film_limit: usize,
}

#[derive(Args, Debug, Clone)]
pub struct CapArgs {
    #[arg(long, default_value = DEFAULT_CAP_MARKER)]
    pub cap_marker: String,

    #[arg(long, default_value_t = DEFAULT_MARKED_CAP)]
    pub marked_cap: usize,

    #[arg(long, default_value_t = DEFAULT_UNMARKED_CAP)]
    pub default_cap: usize,

    #[arg(long, default_value_t = false)]
    pub no_backup: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,

    #[arg(long)]
    pub report_path: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct FixArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub caps: CapArgs,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,

    #[command(flatten)]
    pub caps: CapArgs,

    #[arg(long)]
    pub report_path: Option<PathBuf>,
}
