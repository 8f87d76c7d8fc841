//! Core types and trait definitions for the Classbook student portal.
//!
//! No HTTP or database dependencies live here. Form input is validated and
//! derived metrics (attendance percentage, average marks, health) are
//! computed in this crate; storage backends implement [`store::StudentStore`].

// Trait methods spell out `impl Future + Send`; implementors write `async fn`.
#![allow(async_fn_in_trait)]

pub mod attendance;
pub mod error;
pub mod marks;
pub mod report;
pub mod store;
pub mod student;

mod input;

pub use error::{Result, ValidationError};
