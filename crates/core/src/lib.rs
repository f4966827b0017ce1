//! Domain types and pure logic shared by every CMS screen.
//!
//! Nothing in this crate performs I/O. It describes list queries and
//! upsert commands for the generic master-data API, derives paging
//! figures, patches cached rows, and validates entity drafts.

pub mod error;
pub mod forms;
pub mod mutation;
pub mod paging;
pub mod patch;
pub mod query;
pub mod types;
pub mod validation;
