// Headline topics: scrape news summaries and fit a topic model over them.
//
// This is the library root. Each module is one stage of the pipeline, in
// dependency order: scrape → text → corpus → model → report.

pub mod config;
pub mod corpus;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod scrape;
pub mod text;
