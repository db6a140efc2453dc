//! Builds the CQL query sent to the course search endpoint.

use crate::{
    cql::{CqlClause, CqlExpr, CqlQuery},
    search_query::{SearchArea, SearchFacets},
};

pub const DEPARTMENT_INDEX: &str = "department.name";
pub const TERM_INDEX: &str = "courseListing.termId";

/// Indexes searched when the free-text query applies to every field.
const ALL_FIELDS_INDEXES: [&str; 5] = [
    "name",
    "courseNumber",
    "sectionName",
    "courseListing.instructorObjects",
    "courseListing.registrarId",
];


pub fn build_query(facets: &SearchFacets) -> CqlQuery {
    let text = wildcard_query_text(&facets.query_text);
    let prefix = facets.college.map(|college| college.department_prefix());

    let mut parts: Vec<CqlExpr> = Vec::new();
    match (prefix, text) {
        (Some(prefix), Some(text)) => {
            parts.push(CqlClause::exact(DEPARTMENT_INDEX, format!("{prefix}*")).into());
            // unknown areas search every field here
            parts.push(area_match(&facets.search_area, &text).unwrap_or_else(|| all_fields_match(&text)));
        }
        (Some(prefix), None) => {
            parts.push(CqlClause::exact(DEPARTMENT_INDEX, format!("{prefix}*")).into());
        }
        (None, Some(text)) => {
            // ...but match everything when no college narrows the search
            parts.push(area_match(&facets.search_area, &text).unwrap_or(CqlExpr::AllRecords));
        }
        (None, None) => {
            parts.push(CqlExpr::AllRecords);
        }
    }
    if let Some(term) = facets.term() {
        parts.push(CqlClause::exact(TERM_INDEX, term).into());
    }
    let mut expr = CqlExpr::and(parts);

    let department = facets.department.trim();
    if !department.is_empty() {
        expr = expr.conjoin(CqlClause::exact(DEPARTMENT_INDEX, department));
    }

    let query = CqlQuery { expr, sort: facets.sort() };
    tracing::debug!(cql = %query, "built course query");
    query
}

/// Trimmed query text with a trailing `*` for prefix matching, or `None`
/// when there is nothing to search for.
fn wildcard_query_text(query_text: &str) -> Option<String> {
    let text = query_text.trim();
    if text.is_empty() {
        None
    } else {
        Some(format!("{text}*"))
    }
}

fn area_match(area: &SearchArea, text: &str) -> Option<CqlExpr> {
    let index = match area {
        SearchArea::All => return Some(all_fields_match(text)),
        SearchArea::Name => "name",
        SearchArea::Code => "courseNumber",
        SearchArea::Section => "sectionName",
        SearchArea::Instructor => "courseListing.instructorObjects",
        SearchArea::Other(_) => return None,
    };
    Some(CqlClause::matches(index, text).into())
}

fn all_fields_match(text: &str) -> CqlExpr {
    CqlExpr::or(
        ALL_FIELDS_INDEXES
            .iter()
            .map(|index| CqlExpr::from(CqlClause::matches(*index, text)))
            .collect(),
    )
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::college::College;

    fn facets(
        college: &str,
        search_area: &str,
        query_text: &str,
        department: &str,
        sort_option: &str,
        term_id: Option<&str>,
    ) -> SearchFacets {
        SearchFacets {
            college: college.parse().ok(),
            search_area: search_area.into(),
            query_text: query_text.to_string(),
            department: department.to_string(),
            sort_option: sort_option.to_string(),
            term_id: term_id.map(str::to_string),
        }
    }

    fn build(
        college: &str,
        search_area: &str,
        query_text: &str,
        department: &str,
        sort_option: &str,
        term_id: Option<&str>,
    ) -> String {
        build_query(&facets(college, search_area, query_text, department, sort_option, term_id)).to_string()
    }

    #[test]
    fn empty_facets_match_everything_or_the_college() {
        for area in ["all", "name", "code", "section", "instructor", "bogus"] {
            assert_eq!(build("all", area, "", "", "", None), "(cql.allRecords=1)");
            assert_eq!(build("  ", area, "   ", "  ", " ", None), "(cql.allRecords=1)");
        }
        for college in College::ALL {
            let expected = format!(r#"(department.name=="{}*")"#, college.department_prefix());
            assert_eq!(build(college.as_str(), "all", "", "", "", None), expected);
        }
        assert_eq!(build_query(&SearchFacets::default()).to_string(), "(cql.allRecords=1)");
    }

    #[test]
    fn college_with_single_field() {
        assert_eq!(
            build("smith", "name", "Intro to Biology", "", "", None),
            r#"(department.name=="SC*" and name="Intro to Biology*")"#
        );
        assert_eq!(
            build("umass", "code", " BIO 101 ", "", "", None),
            r#"(department.name=="UM*" and courseNumber="BIO 101*")"#
        );
        assert_eq!(
            build("hampshire", "section", "02", "", "", None),
            r#"(department.name=="HC*" and sectionName="02*")"#
        );
        assert_eq!(
            build("amherst", "instructor", "Jones", "", "", None),
            r#"(department.name=="AC*" and courseListing.instructorObjects="Jones*")"#
        );
    }

    #[test]
    fn college_with_all_or_unknown_area_searches_every_field() {
        let expected = r#"(department.name=="MH*" and (name="chem*" or courseNumber="chem*" or sectionName="chem*" or courseListing.instructorObjects="chem*" or courseListing.registrarId="chem*"))"#;
        assert_eq!(build("mtholyoke", "all", "chem", "", "", None), expected);
        assert_eq!(build("mtholyoke", "isbn", "chem", "", "", None), expected);
    }

    #[test]
    fn no_college_all_fields() {
        assert_eq!(
            build("all", "all", "chem", "", "", None),
            r#"(name="chem*" or courseNumber="chem*" or sectionName="chem*" or courseListing.instructorObjects="chem*" or courseListing.registrarId="chem*")"#
        );
    }

    #[test]
    fn no_college_single_field_and_unknown_area() {
        assert_eq!(build("all", "name", "chem", "", "", None), r#"(name="chem*")"#);
        assert_eq!(build("all", "isbn", "chem", "", "", None), "(cql.allRecords=1)");
    }

    #[test]
    fn department_wraps_base_without_department_clause() {
        assert_eq!(
            build("all", "all", "", "Biology", "", None),
            r#"((cql.allRecords=1) and department.name=="Biology")"#
        );
        assert_eq!(
            build("all", "name", "cell", " Biology ", "", None),
            r#"((name="cell*") and department.name=="Biology")"#
        );
    }

    #[test]
    fn department_joins_existing_college_clause() {
        assert_eq!(
            build("smith", "name", "bio", "Biology", "", None),
            r#"(department.name=="SC*" and department.name=="Biology" and name="bio*")"#
        );
        assert_eq!(
            build("smith", "all", "", "SC Biology", "", None),
            r#"(department.name=="SC*" and department.name=="SC Biology")"#
        );
    }

    #[test]
    fn department_is_never_wildcarded() {
        let query = build("all", "all", "", "Bio", "", None);
        assert!(query.contains(r#"department.name=="Bio""#));
        assert!(!query.contains("Bio*"));
    }

    #[test]
    fn sort_options() {
        assert!(build("all", "all", "", "", "name.descending", None).ends_with(" sortby name/sort.descending"));
        assert_eq!(
            build("all", "all", "", "", "courseNumber", None),
            "(cql.allRecords=1) sortby courseNumber"
        );
    }

    #[test]
    fn term_restriction_is_opt_in() {
        let query = build("smith", "all", "", "", "", Some("term-2025-fall"));
        assert!(query.contains(r#"courseListing.termId=="term-2025-fall""#));
        assert_eq!(query, r#"(department.name=="SC*" and courseListing.termId=="term-2025-fall")"#);

        assert_eq!(
            build("all", "all", "", "", "", Some("t1")),
            r#"(cql.allRecords=1 and courseListing.termId=="t1")"#
        );
        assert_eq!(
            build("all", "all", "chem", "", "", Some("t1")),
            r#"((name="chem*" or courseNumber="chem*" or sectionName="chem*" or courseListing.instructorObjects="chem*" or courseListing.registrarId="chem*") and courseListing.termId=="t1")"#
        );
        assert!(!build("all", "all", "", "", "", Some("")).contains("termId"));
        assert!(!build("all", "all", "", "", "", None).contains("termId"));
    }

    #[test]
    fn every_facet_together() {
        assert_eq!(
            build("amherst", "name", "Intro", "AC History", "name.descending", Some("t9")),
            r#"(department.name=="AC*" and department.name=="AC History" and name="Intro*" and courseListing.termId=="t9") sortby name/sort.descending"#
        );
    }

    #[test]
    fn quotes_in_user_input_stay_well_formed() {
        assert_eq!(
            build("all", "name", r#"the "best" course"#, "", "", None),
            r#"(name="the \"best\" course*")"#
        );
    }

    #[test]
    fn builder_is_pure() {
        let input = facets("smith", "all", "chem", "Chemistry", "name", Some("t1"));
        assert_eq!(build_query(&input).to_string(), build_query(&input).to_string());
    }
}
