//! Clients for the HTTP services the backend talks to.

pub mod folio_utils;
pub mod ip_lookup;
