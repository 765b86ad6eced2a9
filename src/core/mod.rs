//! Core data types shared by every module.
//!
//! - [`types`]: [`types::MetricValue`] and the `sample -> metric -> value` maps,
//!   display groups and spec limits
//! - [`sample`]: lab sample identifiers, file name cleaning and sample filters
//!
//! ## Value inference
//!
//! Raw text is typed in a fixed order so the same input always yields the
//! same variant:
//!
//! | Text | Value |
//! |------|-------|
//! | `0.987`, `1.2e-05` | `Float` |
//! | `10`, `-3` | `Integer` |
//! | `NA`, `v0.3.14` | `Text` |

pub mod sample;
pub mod types;
