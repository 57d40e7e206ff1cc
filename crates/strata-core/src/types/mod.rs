//! Core types for strata.

mod block;
mod connector;
mod fields;

pub use block::{BlockStatus, HtmlBlock};
pub use connector::{ConnectTo, Connector};
pub use fields::BlockFields;
