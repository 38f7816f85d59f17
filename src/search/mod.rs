pub mod fulltext;
pub mod normalize;
pub mod orchestrator;
pub mod remote_vector;
pub mod rerank;
pub mod resilient;
pub mod vector;
