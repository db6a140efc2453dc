use serde::{Deserialize, Serialize};

use crate::{campus::Campus, search_query::SearchFacets};


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSearchResults {
    pub query: SearchFacets,
    pub cql: String,
    pub results: Vec<CourseSummary>,
    pub total_records: u64,
    pub page_number: u64,
    pub has_next_page: bool,
}

/// One course section as shown in the result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CourseSummary {
    pub id: String,
    pub name: String,
    pub course_number: Option<String>,
    pub section_name: Option<String>,
    pub department: Option<String>,
    pub term: Option<String>,
    pub instructors: Vec<String>,
    pub registrar_id: Option<String>,
    pub result_index_in_page: u64,
}


/// How the campus in a [`CampusDetection`] was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampusSource {
    /// Explicit `college` parameter.
    Override,
    /// Address the server already knew.
    ClientIp,
    /// Public IP lookup service.
    Lookup,
    /// Lookup failed; the caller's current campus was kept.
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampusDetection {
    pub college: Campus,
    pub source: CampusSource,
}
