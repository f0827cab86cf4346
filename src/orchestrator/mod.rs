//! Update orchestration.
//!
//! Owns the submit lifecycle for one edit session: validation pre-checks,
//! the ordered remote sub-updates, and the single terminal outcome. CLI
//! layers call into this module to keep responsibilities separated.

mod submit;

pub(crate) use submit::submit;
