//! # ClauseEase
//!
//! Readability scoring and per-word complexity annotation for typed text,
//! plain-text uploads, and PDFs.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────┐   ┌──────────────────────┐
//! │ Text / file │──▶│ Acquire  │──▶│ Clean ─▶ Annotate ─▶ │
//! │ upload/PDF  │   │ (extract)│   │ Classify + Score     │
//! └─────────────┘   └──────────┘   └──────────┬───────────┘
//!                                             │
//!                      ┌──────────────────────┤
//!                      ▼                      ▼
//!                 ┌──────────┐       ┌─────────────────┐
//!                 │   CLI    │       │ HTTP + SQLite   │
//!                 │(analyze) │       │ accounts/history│
//!                 └──────────┘       └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`extract`] | Text acquisition (plain bytes, PDF) |
//! | [`clean`] | Text denoising pipeline |
//! | [`annotate`] | Sentence/word segmentation and part-of-speech tagging |
//! | [`syllables`] | Syllable counting |
//! | [`lexicon`] | Easy-word vocabulary |
//! | [`complexity`] | Per-word complexity rule |
//! | [`readability`] | Readability formulas and grade label |
//! | [`analyze`] | The end-to-end analysis pipeline |
//! | [`accounts`] | Registration and login |
//! | [`history`] | Per-user analysis history |
//! | [`uploads`] | Upload storage |
//! | [`report`] | PDF report rendering |
//! | [`server`] | HTTP API server |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod accounts;
pub mod analyze;
pub mod annotate;
pub mod clean;
pub mod complexity;
pub mod config;
pub mod db;
pub mod extract;
pub mod history;
pub mod lexicon;
pub mod migrate;
pub mod models;
pub mod readability;
pub mod report;
pub mod server;
pub mod syllables;
pub mod uploads;
