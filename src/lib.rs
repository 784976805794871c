//! Hierarchical task timeline: a pure layout/viewport engine plus a thin
//! egui viewer shell.
//!
//! The engine ([`engine`]) maps calendar dates to a day-indexed grid,
//! assigns tasks to lanes by grouping and hierarchy, indexes parent/child
//! relationships, and owns pan/zoom state per view. The shell ([`app`],
//! [`ui`]) only draws what the engine computed.

pub mod app;
pub mod engine;
pub mod model;
pub mod ui;
