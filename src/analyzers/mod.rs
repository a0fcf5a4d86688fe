//! Order aggregation over a date-filtered transaction table.
//!
//! [`window`] selects rows by approval date; [`daily`], [`categories`] and
//! [`reviews`] each derive one summary table from that selection,
//! independently of one another.

pub mod categories;
pub mod daily;
pub mod reviews;
pub mod types;
pub mod window;
