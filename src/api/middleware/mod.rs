//! Request middleware.
//!
//! One layer today: the access log. Applied outside the routes so it also
//! sees 404s for unknown paths.

pub mod audit;
