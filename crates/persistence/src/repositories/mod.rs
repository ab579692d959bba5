//! Repository implementations.

pub mod event_setting;
pub mod message;
pub mod profile;
pub mod rsvp;

pub use event_setting::EventSettingRepository;
pub use message::MessageRepository;
pub use profile::ProfileRepository;
pub use rsvp::RsvpRepository;
