// Fantasy football stat pipeline: ingest five category exports, merge them
// into one table keyed by player, then score and compare players.

pub mod config;
pub mod ingest;
pub mod merge;
pub mod pipeline;
pub mod query;
pub mod scoring;
