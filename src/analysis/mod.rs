//! The niche analysis steps, each a pure function over matched records.
//!
//! # Submodules
//!
//! - [`filter`]: selects the niche subset by keyword match
//! - [`frequency`]: order-stable term counting shared by every ranking
//! - [`terms`]: hashtag and caption keyword rankings
//! - [`aggregates`]: sound ranking, duration mean and the engagement leaderboard

pub mod aggregates;
pub mod filter;
pub mod frequency;
pub mod terms;
