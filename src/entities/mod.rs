mod coordinates;
mod participant;
mod snapshot;
mod suggestion;

pub use coordinates::Coordinates;
pub use participant::{Participant, TravelMode};
pub use snapshot::{EtaBlock, ParticipantEta, RoomSnapshot, StoredResults};
pub use suggestion::SuggestionItem;
