//! Request and response bodies, grouped by API version.

pub mod v1;
