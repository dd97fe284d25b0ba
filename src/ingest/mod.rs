//! External data sources.
//!
//! Submodules:
//! - `naver`: Naver DataLab search trend API.

pub mod naver;

pub use naver::{NaverDatalabClient, TrendQuery, TrendSource};
