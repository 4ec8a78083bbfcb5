//! Engagement analytics for security scorecard distribution.
//!
//! Rolls per-contact engagement records up into per-company and global
//! statistics, and renders them as Markdown or JSON reports.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod models;
pub mod report;
