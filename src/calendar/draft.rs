use chrono::{DateTime, Utc};

use super::datetime::{format_minutes, parse_datetime};
use super::event::{CalendarEvent, EventFields, EventId, EventRecord};

/// The four editable inputs of the event form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Description,
    StartDate,
    EndDate,
}

impl DraftField {
    pub const ALL: [DraftField; 4] = [
        DraftField::Title,
        DraftField::Description,
        DraftField::StartDate,
        DraftField::EndDate,
    ];

    pub fn next(&self) -> Self {
        match self {
            DraftField::Title => DraftField::Description,
            DraftField::Description => DraftField::StartDate,
            DraftField::StartDate => DraftField::EndDate,
            DraftField::EndDate => DraftField::Title,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            DraftField::Title => DraftField::EndDate,
            DraftField::Description => DraftField::Title,
            DraftField::StartDate => DraftField::Description,
            DraftField::EndDate => DraftField::StartDate,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DraftField::Title => "Title:",
            DraftField::Description => "Desc:",
            DraftField::StartDate => "Start:",
            DraftField::EndDate => "End:",
        }
    }

    pub fn required_message(&self) -> &'static str {
        match self {
            DraftField::Title => "Title is required",
            DraftField::Description => "Description is required",
            DraftField::StartDate => "Start date and time are required",
            DraftField::EndDate => "End date and time are required",
        }
    }

    pub fn is_date(&self) -> bool {
        matches!(self, DraftField::StartDate | DraftField::EndDate)
    }

    pub fn malformed_message(&self) -> &'static str {
        match self {
            DraftField::StartDate => "Start must be YYYY-MM-DDTHH:MM",
            DraftField::EndDate => "End must be YYYY-MM-DDTHH:MM",
            _ => "",
        }
    }
}

/// Whether saving the draft creates a new event or updates an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftTarget {
    New,
    Existing(EventId),
}

/// An event being edited in the form, not yet confirmed by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub target: DraftTarget,
    pub fields: EventFields,
}

impl Draft {
    /// Fresh draft covering an empty calendar slot.
    pub fn for_slot(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            target: DraftTarget::New,
            fields: EventFields {
                title: String::new(),
                description: String::new(),
                start_date: format_minutes(start),
                end_date: format_minutes(end),
            },
        }
    }

    /// Draft copied from an existing event, dates re-rendered from its instants.
    pub fn for_event(event: &CalendarEvent) -> Self {
        Self {
            target: DraftTarget::Existing(event.id().clone()),
            fields: EventFields {
                start_date: format_minutes(event.start),
                end_date: format_minutes(event.end),
                ..event.record.fields.clone()
            },
        }
    }

    pub fn id(&self) -> Option<&EventId> {
        match &self.target {
            DraftTarget::New => None,
            DraftTarget::Existing(id) => Some(id),
        }
    }

    pub fn is_new(&self) -> bool {
        self.id().is_none()
    }

    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::Title => &self.fields.title,
            DraftField::Description => &self.fields.description,
            DraftField::StartDate => &self.fields.start_date,
            DraftField::EndDate => &self.fields.end_date,
        }
    }

    pub fn set_field(&mut self, field: DraftField, value: String) {
        let slot = match field {
            DraftField::Title => &mut self.fields.title,
            DraftField::Description => &mut self.fields.description,
            DraftField::StartDate => &mut self.fields.start_date,
            DraftField::EndDate => &mut self.fields.end_date,
        };
        *slot = value;
    }

    /// Full record for an update call, `None` for a new draft.
    pub fn to_record(&self) -> Option<EventRecord> {
        self.id().map(|id| EventRecord {
            id: id.clone(),
            fields: self.fields.clone(),
        })
    }
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Per-field "required" flags shown under the form inputs, plus flags for
/// date fields holding something that is not a date-time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub title: bool,
    pub description: bool,
    pub start_date: bool,
    pub end_date: bool,
    pub bad_start_date: bool,
    pub bad_end_date: bool,
}

impl FormErrors {
    /// Recompute every flag from the draft.
    pub fn check(draft: &Draft) -> Self {
        let mut errors = Self::default();
        for field in DraftField::ALL {
            let value = draft.field(field);
            let blank = is_blank(value);
            errors.set(field, blank);
            if field.is_date() && !blank {
                errors.set_malformed(field, parse_datetime(value).is_none());
            }
        }
        errors
    }

    pub fn get(&self, field: DraftField) -> bool {
        match field {
            DraftField::Title => self.title,
            DraftField::Description => self.description,
            DraftField::StartDate => self.start_date,
            DraftField::EndDate => self.end_date,
        }
    }

    pub fn set(&mut self, field: DraftField, invalid: bool) {
        match field {
            DraftField::Title => self.title = invalid,
            DraftField::Description => self.description = invalid,
            DraftField::StartDate => self.start_date = invalid,
            DraftField::EndDate => self.end_date = invalid,
        }
    }

    pub fn malformed(&self, field: DraftField) -> bool {
        match field {
            DraftField::StartDate => self.bad_start_date,
            DraftField::EndDate => self.bad_end_date,
            _ => false,
        }
    }

    /// Only date fields carry the flag; others ignore it.
    pub fn set_malformed(&mut self, field: DraftField, malformed: bool) {
        match field {
            DraftField::StartDate => self.bad_start_date = malformed,
            DraftField::EndDate => self.bad_end_date = malformed,
            _ => {}
        }
    }

    pub fn any(&self) -> bool {
        DraftField::ALL
            .iter()
            .any(|f| self.get(*f) || self.malformed(*f))
    }
}
