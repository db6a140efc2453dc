//! Search endpoint for course result lists.

use anyhow::Context;
use common::{
    query_builder::build_query,
    search_const::PAGE_SIZE,
    search_query::SearchFacets,
    search_result::{CourseSearchResults, CourseSummary},
};

use crate::http_utils::folio_utils::{FolioClient, RawCourse};

pub async fn search_courses(
    folio: &FolioClient,
    query: SearchFacets,
    current_search_result_page: u64,
) -> anyhow::Result<CourseSearchResults> {
    let cql = build_query(&query).to_string();
    let offset = current_search_result_page
        .checked_mul(PAGE_SIZE)
        .context("Page number out of range")?;
    // one extra record tells us whether a next page exists
    let limit = PAGE_SIZE + 1;

    let response = folio.search_courses(&cql, limit, offset).await?;

    let mut search_results = response
        .courses
        .into_iter()
        .map(to_course_summary)
        .collect::<Vec<_>>();

    let has_next_page = search_results.len() > PAGE_SIZE as usize;
    search_results.truncate(PAGE_SIZE as usize);

    for (i, result) in search_results.iter_mut().enumerate() {
        result.result_index_in_page = i as u64;
    }

    Ok(CourseSearchResults {
        query,
        cql,
        results: search_results,
        total_records: response.total_records,
        page_number: current_search_result_page,
        has_next_page,
    })
}

pub fn to_course_summary(course: RawCourse) -> CourseSummary {
    let listing = course.course_listing_object.unwrap_or_default();
    CourseSummary {
        id: course.id,
        name: course.name,
        course_number: course.course_number,
        section_name: course.section_name,
        department: course.department_object.map(|d| d.name),
        term: listing.term_object.map(|t| t.name),
        instructors: listing.instructor_objects.into_iter().map(|i| i.name).collect(),
        registrar_id: listing.registrar_id,
        result_index_in_page: 0_u64,
    }
}
