pub mod client;
pub mod datetime;
pub mod draft;
pub mod event;

pub use client::{EventBackend, EventClient};
pub use draft::{Draft, DraftField, DraftTarget, FormErrors};
pub use event::{CalendarEvent, EventFields, EventId, EventRecord};
