use serde::{Deserialize, Serialize};

/// Number of months tracked per record
pub const MONTH_COUNT: usize = 12;

/// Literal used by the dataset for creatures catchable at any hour
pub const ALL_DAY: &str = "All day";

/// Placeholder the wiki uses for unknown cells
pub const UNKNOWN_CELL: &str = "?";

pub const MONTH_NAMES: [&str; MONTH_COUNT] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Creature family a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Species {
    #[default]
    #[serde(rename = "fish")]
    Fish,
    #[serde(rename = "bug")]
    Bug,
}

impl Species {
    pub const ALL: [Species; 2] = [Species::Fish, Species::Bug];

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Fish => "fish",
            Species::Bug => "bug",
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Species {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fish" | "fishes" => Ok(Species::Fish),
            "bug" | "bugs" | "insect" | "insects" => Ok(Species::Bug),
            _ => Err(format!("Unknown species: {}", s)),
        }
    }
}

/// One creature entry of the bundled dataset.
///
/// Field names on the wire follow the prepared JSON files (`shadow`, `time`,
/// `months`), which in turn mirror the wiki table headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,

    #[serde(default)]
    pub image: Option<String>,

    /// Sell price in bells, `None` when the wiki lists none
    #[serde(default)]
    pub price: Option<u32>,

    pub location: String,

    /// Fish only
    #[serde(default, rename = "shadow")]
    pub shadow_size: Option<String>,

    /// "All day", "9 AM - 4 PM", ... or anything the wiki happened to contain
    #[serde(rename = "time")]
    pub time_range: String,

    /// Northern hemisphere baseline, index 0 is January
    #[serde(rename = "months")]
    pub months_available: [bool; MONTH_COUNT],

    #[serde(default)]
    pub species: Species,

    #[serde(default)]
    pub url: Option<String>,
}

impl Record {
    pub fn new(name: impl Into<String>, species: Species) -> Self {
        Self {
            name: name.into(),
            image: None,
            price: None,
            location: String::new(),
            shadow_size: None,
            time_range: ALL_DAY.to_string(),
            months_available: [true; MONTH_COUNT],
            species,
            url: None,
        }
    }

    /// Whether the record can be caught in `month` (0-based, northern baseline)
    pub fn is_in_month(&self, month: usize) -> bool {
        self.months_available.get(month).copied().unwrap_or(false)
    }
}

/// Parse a month given as 1-based number or (prefix of) an English name.
/// Returns the 0-based index.
pub fn parse_month(s: &str) -> Option<usize> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(n) = s.parse::<usize>() {
        return (1..=MONTH_COUNT).contains(&n).then(|| n - 1);
    }

    let lower = s.to_lowercase();
    if lower.len() < 3 {
        return None;
    }
    MONTH_NAMES
        .iter()
        .position(|name| name.to_lowercase().starts_with(&lower))
}
