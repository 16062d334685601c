pub mod profile;
pub mod relationship;

pub use profile::{Profile, ProfileRow, ProfileUpdate, Role};
pub use relationship::{pair_key, Relationship, RelationshipRow, RelationshipStatus};
