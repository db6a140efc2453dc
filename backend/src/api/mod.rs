pub mod campus;
pub mod search;
