//! Domain model definitions.

pub mod event_setting;
pub mod message;
pub mod profile;
pub mod rsvp;

pub use event_setting::{EventSetting, UpsertSettingRequest};
pub use message::{
    ChangeAction, Message, MessageChange, MessageChangeNotice, MessageEvent, SubmitMessageRequest,
};
pub use profile::{AdminAccount, CreateAdminRequest, Profile};
pub use rsvp::{NewRsvp, Rsvp, SubmitRsvpRequest};
