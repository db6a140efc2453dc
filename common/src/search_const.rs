//! Constants shared by the search API and its clients.

pub const PAGE_SIZE: u64 = 25;
