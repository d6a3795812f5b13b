pub mod pipeline;

pub use pipeline::aggregate::{aggregate, aggregate_records};
pub use pipeline::metrics::RunMetrics;
pub use pipeline::ranking::{average_rank, normalize_ranks, RankOrder};
pub use pipeline::segment::segment;
pub use pipeline::summary::{
    leaderboard, LeaderboardKey, MetricAverages, SegmentCount, SegmentDistribution,
};
pub use pipeline::{Pipeline, PipelineOutput};
