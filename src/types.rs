use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub plex: PlexConfig,
    pub tmdb: TmdbConfig,
    pub mdblist: MdblistConfig,
    #[serde(default)]
    pub libraries: BTreeMap<String, LibraryRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlexConfig {
    pub url: String,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    pub api_key: String,
    /// v4 read access token, used to start the user approval handshake.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// v4 user access token obtained from an approved request token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticated_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MdblistConfig {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryRule {
    /// Kept as written so the document survives a rewrite untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    pub starting_year: i32,
    pub tmdb_list_id: ListId,
    pub imdb_min_rating: f64,
    pub imdb_min_votes: u64,
    #[serde(default, skip_serializing_if = "PublishMode::is_default")]
    pub publish: PublishMode,
}

impl LibraryRule {
    pub fn window_kind(&self) -> WindowKind {
        self.range
            .as_deref()
            .and_then(WindowKind::parse)
            .unwrap_or_default()
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            min_rating: self.imdb_min_rating,
            min_votes: self.imdb_min_votes,
        }
    }
}

/// TMDb list ids are numeric, but YAML authors write them either way.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListId {
    Number(u64),
    Text(String),
}

impl ListId {
    pub fn is_empty(&self) -> bool {
        match self {
            ListId::Number(_) => false,
            ListId::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListId::Number(n) => write!(f, "{}", n),
            ListId::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishMode {
    /// Clear once, then append after every searched window.
    #[default]
    PerWindow,
    /// Clear once, then add everything in a single call after the last window.
    Once,
}

impl PublishMode {
    fn is_default(&self) -> bool {
        *self == PublishMode::PerWindow
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WindowKind {
    #[default]
    Day,
    Week,
    Month,
}

impl WindowKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "day" => Some(WindowKind::Day),
            "week" => Some(WindowKind::Week),
            "month" => Some(WindowKind::Month),
            _ => None,
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WindowKind::Day => "day",
            WindowKind::Week => "week",
            WindowKind::Month => "month",
        };
        write!(f, "{}", s)
    }
}

/// Inclusive calendar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} and {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MediaKind {
    Movie,
    Show,
}

impl MediaKind {
    /// Plex reports `movie`, `show`, `artist` or `photo`; everything that is
    /// not a show is looked up as a movie.
    pub fn from_plex(section_type: &str) -> Self {
        if section_type == "show" {
            MediaKind::Show
        } else {
            MediaKind::Movie
        }
    }

    pub fn plex_type(&self) -> u8 {
        match self {
            MediaKind::Movie => 1,
            MediaKind::Show => 2,
        }
    }

    pub fn mdblist_segment(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Show => "show",
        }
    }

    pub fn tmdb_media_type(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Show => "tv",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mdblist_segment())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySection {
    pub key: String,
    pub title: String,
    pub kind: MediaKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guid {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub title: String,
    pub guids: Vec<Guid>,
    pub originally_available_at: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub min_rating: f64,
    pub min_votes: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RatingRecord {
    #[serde(default, deserialize_with = "lenient_ratings")]
    pub ratings: Vec<Rating>,
}

// Entries that are not rating objects are dropped instead of failing the record
fn lenient_ratings<'de, D>(deserializer: D) -> Result<Vec<Rating>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect())
}

/// One source's rating. MDBList fills `score` and `votes` with whatever the
/// source reported; anything that is not a number reads as missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    #[serde(default)]
    pub source: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub votes: Option<f64>,
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| v.as_f64()))
}

/// One entry of a remote list: a TMDb id and the kind it refers to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListEntry {
    pub id: String,
    pub kind: MediaKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlexResponse<T> {
    #[serde(rename = "MediaContainer")]
    pub media_container: T,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionsContainer {
    #[serde(rename = "Directory", default)]
    pub directory: Vec<PlexDirectory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlexDirectory {
    pub key: String,
    pub title: String,
    #[serde(rename = "type")]
    pub section_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataContainer {
    #[serde(rename = "Metadata", default)]
    pub metadata: Vec<PlexMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlexMetadata {
    pub title: String,
    #[serde(rename = "Guid", default)]
    pub guids: Vec<Guid>,
    #[serde(rename = "originallyAvailableAt", default)]
    pub originally_available_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestTokenRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestTokenResponse {
    pub request_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenRequest {
    pub request_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub account_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddListItemsRequest {
    pub items: Vec<TmdbListItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbListItem {
    pub media_type: String,
    pub media_id: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LibraryReport {
    pub library: String,
    pub kind: MediaKind,
    pub list_id: ListId,
    pub windows: usize,
    pub scanned: usize,
    pub added: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub libraries: Vec<LibraryReport>,
}

#[derive(Tabled)]
pub struct ReportTableRow {
    pub library: String,
    pub kind: String,
    pub windows: usize,
    pub scanned: usize,
    pub added: usize,
    pub list: String,
}

impl From<&LibraryReport> for ReportTableRow {
    fn from(report: &LibraryReport) -> Self {
        ReportTableRow {
            library: report.library.clone(),
            kind: report.kind.to_string(),
            windows: report.windows,
            scanned: report.scanned,
            added: report.added,
            list: report.list_id.to_string(),
        }
    }
}
