pub mod connections;
pub mod recommendations;

pub use connections::{ConnectionError, ConnectionService};
pub use recommendations::{Recommendation, RecommendationService};
