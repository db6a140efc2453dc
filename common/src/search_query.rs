//! Shared search facet models.

use serde::{Deserialize, Serialize};

use crate::college::{College, college_or_all};


/// Facets selected in the search UI. Every field has a default, so a
/// request with no parameters at all is still a valid search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchFacets {
    #[serde(with = "college_or_all")]
    pub college: Option<College>,
    pub search_area: SearchArea,
    pub query_text: String,
    pub department: String,
    pub sort_option: String,
    pub term_id: Option<String>,
}

impl SearchFacets {
    /// `Some(term)` only for a non-blank term identifier.
    pub fn term(&self) -> Option<&str> {
        self.term_id.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    pub fn sort(&self) -> Option<SortOption> {
        SortOption::parse(&self.sort_option)
    }
}


/// Which course fields the free-text query is matched against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SearchArea {
    #[default]
    All,
    Name,
    Code,
    Section,
    Instructor,
    /// A value the UI does not know about, kept verbatim.
    Other(String),
}

impl From<String> for SearchArea {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "all" => SearchArea::All,
            "name" => SearchArea::Name,
            "code" => SearchArea::Code,
            "section" => SearchArea::Section,
            "instructor" => SearchArea::Instructor,
            _ => SearchArea::Other(value),
        }
    }
}

impl From<&str> for SearchArea {
    fn from(value: &str) -> Self {
        SearchArea::from(value.to_string())
    }
}

impl From<SearchArea> for String {
    fn from(value: SearchArea) -> Self {
        match value {
            SearchArea::All => "all".to_string(),
            SearchArea::Name => "name".to_string(),
            SearchArea::Code => "code".to_string(),
            SearchArea::Section => "section".to_string(),
            SearchArea::Instructor => "instructor".to_string(),
            SearchArea::Other(s) => s,
        }
    }
}


pub const DESCENDING_SUFFIX: &str = ".descending";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOption {
    pub field: String,
    pub descending: bool,
}

impl SortOption {
    pub fn parse(option: &str) -> Option<Self> {
        let option = option.trim();
        if option.is_empty() {
            return None;
        }
        match option.strip_suffix(DESCENDING_SUFFIX) {
            Some(field) => Some(SortOption { field: field.to_string(), descending: true }),
            None => Some(SortOption { field: option.to_string(), descending: false }),
        }
    }
}
