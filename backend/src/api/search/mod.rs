//! Course search API.

mod search_courses;
pub use search_courses::{search_courses, to_course_summary};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageParams {
    pub page: u64,
}

impl PageParams {
    /// Record offset of the first course on this page, `None` past `u64`.
    pub fn offset(&self) -> Option<u64> {
        self.page.checked_mul(common::search_const::PAGE_SIZE)
    }
}
