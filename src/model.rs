use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

pub const DEFAULT_CINEMA_NAME: &str = "Unknown";
pub const DEFAULT_DAY: &str = "unknown";
pub const DEFAULT_TITLE: &str = "Unknown";

const CINEMAS_KEY: &str = "cinemas";
const FILMS_KEY: &str = "films";
const NAME_KEY: &str = "name";
const DAY_KEY: &str = "day";
const TITLE_KEY: &str = "title";
const SHOWTIMES_KEY: &str = "showtimes";
const SHOWTIME_COUNT_KEY: &str = "showtime_count";

/// Top-level listing document.
///
/// Every record keeps its raw JSON fields so unknown keys and their order
/// survive a load/fix/write cycle. Nested collections are lifted out into
/// typed vectors while their key stays in place as a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Dataset {
    fields: Map<String, Value>,
    cinemas: Vec<Cinema>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Cinema {
    fields: Map<String, Value>,
    films: Vec<Film>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Film {
    fields: Map<String, Value>,
}

impl Dataset {
    pub fn new(cinemas: Vec<Cinema>) -> Self {
        let mut fields = Map::new();
        fields.insert(CINEMAS_KEY.to_string(), Value::Null);
        Self { fields, cinemas }
    }

    pub fn cinemas(&self) -> &[Cinema] {
        &self.cinemas
    }

    pub fn cinemas_mut(&mut self) -> &mut [Cinema] {
        &mut self.cinemas
    }

    pub fn total_films(&self) -> usize {
        self.cinemas.iter().map(|cinema| cinema.films().len()).sum()
    }
}

impl Cinema {
    pub fn new(name: &str, films: Vec<Film>) -> Self {
        let mut fields = Map::new();
        fields.insert(NAME_KEY.to_string(), Value::String(name.to_string()));
        fields.insert(FILMS_KEY.to_string(), Value::Null);
        Self { fields, films }
    }

    pub fn name(&self) -> &str {
        string_field(&self.fields, NAME_KEY).unwrap_or(DEFAULT_CINEMA_NAME)
    }

    pub fn films(&self) -> &[Film] {
        &self.films
    }

    pub fn films_mut(&mut self) -> &mut Vec<Film> {
        &mut self.films
    }

    /// Replaces the film list. A cinema that had no `films` key gains one at
    /// the end of its fields.
    pub fn set_films(&mut self, films: Vec<Film>) {
        if !self.fields.contains_key(FILMS_KEY) {
            self.fields.insert(FILMS_KEY.to_string(), Value::Null);
        }
        self.films = films;
    }
}

impl Film {
    pub fn new(title: &str, day: &str, showtimes: &[&str]) -> Self {
        let mut fields = Map::new();
        fields.insert(TITLE_KEY.to_string(), Value::String(title.to_string()));
        fields.insert(DAY_KEY.to_string(), Value::String(day.to_string()));
        fields.insert(
            SHOWTIMES_KEY.to_string(),
            Value::Array(
                showtimes
                    .iter()
                    .map(|showtime| Value::String((*showtime).to_string()))
                    .collect(),
            ),
        );
        Self { fields }
    }

    pub fn title(&self) -> &str {
        string_field(&self.fields, TITLE_KEY).unwrap_or(DEFAULT_TITLE)
    }

    pub fn day(&self) -> &str {
        string_field(&self.fields, DAY_KEY).unwrap_or(DEFAULT_DAY)
    }

    /// Showtime tokens in stored order. Entries that are not strings are
    /// compared by their compact JSON text; a missing or non-array field is
    /// an empty list.
    pub fn showtimes(&self) -> Vec<String> {
        match self.fields.get(SHOWTIMES_KEY) {
            Some(Value::Array(values)) => values
                .iter()
                .map(|value| match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn showtime_count(&self) -> Option<u64> {
        self.fields.get(SHOWTIME_COUNT_KEY).and_then(Value::as_u64)
    }

    /// Writes the showtime list back and refreshes the `showtime_count`
    /// annotation.
    pub fn set_showtimes(&mut self, showtimes: Vec<String>) {
        let count = showtimes.len();
        self.fields.insert(
            SHOWTIMES_KEY.to_string(),
            Value::Array(showtimes.into_iter().map(Value::String).collect()),
        );
        self.fields
            .insert(SHOWTIME_COUNT_KEY.to_string(), Value::from(count));
    }
}

fn string_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}

/// Lifts an array-valued key out of `fields`, leaving a null placeholder so
/// the key keeps its position. Null or absent means empty.
fn take_records<T: DeserializeOwned>(
    fields: &mut Map<String, Value>,
    key: &str,
) -> Result<Vec<T>, serde_json::Error> {
    let Some(slot) = fields.get_mut(key) else {
        return Ok(Vec::new());
    };

    match slot.take() {
        Value::Null => Ok(Vec::new()),
        value @ Value::Array(_) => serde_json::from_value(value),
        other => Err(serde::de::Error::custom(format!(
            "`{key}` must be an array, found {}",
            value_kind(&other)
        ))),
    }
}

fn put_records<T: Serialize>(fields: &mut Map<String, Value>, key: &str, records: Vec<T>) {
    if let Some(slot) = fields.get_mut(key) {
        *slot = Value::Array(
            records
                .into_iter()
                .filter_map(|record| serde_json::to_value(record).ok())
                .collect(),
        );
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl TryFrom<Map<String, Value>> for Dataset {
    type Error = serde_json::Error;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let cinemas = take_records(&mut fields, CINEMAS_KEY)?;
        Ok(Self { fields, cinemas })
    }
}

impl From<Dataset> for Map<String, Value> {
    fn from(dataset: Dataset) -> Self {
        let Dataset {
            mut fields,
            cinemas,
        } = dataset;
        put_records(&mut fields, CINEMAS_KEY, cinemas);
        fields
    }
}

impl TryFrom<Map<String, Value>> for Cinema {
    type Error = serde_json::Error;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let films = take_records(&mut fields, FILMS_KEY)?;
        Ok(Self { fields, films })
    }
}

impl From<Cinema> for Map<String, Value> {
    fn from(cinema: Cinema) -> Self {
        let Cinema { mut fields, films } = cinema;
        put_records(&mut fields, FILMS_KEY, films);
        fields
    }
}

/// String-keyed map that serializes in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    /// Inserts or replaces; a replaced key keeps its original position.
    pub fn upsert(&mut self, key: &str, value: V) {
        match self.entries.iter_mut().find(|(existing, _)| existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(key, value)| (key, value)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CinemaStats {
    pub total_films: usize,
    pub days: usize,
    pub films_by_day: OrderedMap<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total_issues: usize,
    pub total_warnings: usize,
    pub total_films: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub timestamp: String,
    pub stats: OrderedMap<CinemaStats>,
    pub issues: Vec<String>,
    pub warnings: Vec<String>,
    pub summary: ReportSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct FixOutcome {
    pub data_path: String,
    pub backup_path: Option<String>,
    pub source_sha256: String,
    pub fixes: Vec<String>,
}
