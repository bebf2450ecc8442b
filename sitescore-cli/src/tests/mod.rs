//! Shared test harness modules for the sitescore CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]
#![expect(
    clippy::expect_used,
    reason = "Tests fail fast when fixtures or CLI output are malformed"
)]

use super::*;

mod helpers;
mod rank_unit;
