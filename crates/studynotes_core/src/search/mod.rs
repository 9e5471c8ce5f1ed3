//! Note search entry points.
//!
//! # Responsibility
//! - Match cached notes against a user-typed term.
//! - Keep matching rules inside core so every view filters the same way.
//!
//! # See also
//! - `model::projection` for the text a note body is matched against.

pub mod filter;
