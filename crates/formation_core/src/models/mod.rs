// Formation board data model

pub mod ids;
pub mod lineup;
pub mod persisted;
pub mod player;

pub use ids::{PlayerId, PositionId, TeamId};
pub use lineup::{Lineup, Location};
pub use persisted::PersistedFormation;
pub use player::PlayerRef;
