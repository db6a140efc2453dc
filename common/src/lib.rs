//! Common library exports shared by the course reserves service and its clients.

extern crate serde;


pub mod college;
pub mod search_query;
pub mod search_result;
pub mod search_const;
pub mod cql;
pub mod query_builder;
pub mod campus;
