//! Entity definitions (database row mappings).

pub mod event_setting;
pub mod message;
pub mod profile;
pub mod rsvp;

pub use event_setting::EventSettingEntity;
pub use message::MessageEntity;
pub use profile::{AdminAccountEntity, ProfileEntity};
pub use rsvp::RsvpEntity;
