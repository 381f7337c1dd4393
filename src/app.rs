use std::collections::HashSet;

use chrono::{DateTime, Datelike, Duration, Local, Months, NaiveDate, TimeZone, Utc};
use tracing::{error, info, warn};

use crate::calendar::draft::is_blank;
use crate::calendar::{CalendarEvent, Draft, DraftField, EventBackend, FormErrors};
use crate::error::TransportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Month,
    Week,
    Day,
}

/// Where a new event lands when created from the selected date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotConfig {
    pub start_hour: u32,
    pub minutes: u32,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            start_hour: 9,
            minutes: 60,
        }
    }
}

/// Everything that can change the event list or the form.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Load,
    SelectSlot {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    /// Index into [`App::events`].
    SelectEvent(usize),
    EditField(DraftField, String),
    Save,
    Delete,
    Dismiss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Loaded(usize),
    Opened,
    Edited,
    /// Save was blocked by blank or unparseable fields.
    Invalid,
    Saved,
    Deleted,
    Dismissed,
    /// The action did not apply to the current state.
    Ignored,
}

/// The open event form: the draft plus its field flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Editor {
    pub draft: Draft,
    pub errors: FormErrors,
    pub active_field: DraftField,
}

impl Editor {
    fn open(draft: Draft) -> Self {
        Self {
            draft,
            errors: FormErrors::default(),
            active_field: DraftField::Title,
        }
    }

    fn edit(&mut self, field: DraftField, value: String) {
        self.errors.set(field, is_blank(&value));
        // Re-checked on save; a half-typed date is not an error yet.
        self.errors.set_malformed(field, false);
        self.draft.set_field(field, value);
    }

    fn validate(&mut self) -> bool {
        self.errors = FormErrors::check(&self.draft);
        !self.errors.any()
    }
}

pub struct App<B> {
    pub running: bool,
    pub view_mode: ViewMode,
    pub selected_date: NaiveDate,
    pub today: NaiveDate,
    pub events: Vec<CalendarEvent>,
    /// Indices into `events` for the selected date, ordered by start.
    pub day_events: Vec<usize>,
    pub days_with_events: HashSet<u32>,
    pub day_cursor: usize,
    pub editor: Option<Editor>,
    pub status_message: Option<String>,
    pub show_help: bool,
    slot: SlotConfig,
    backend: B,
}

impl<B: EventBackend> App<B> {
    pub fn new(backend: B, slot: SlotConfig) -> Self {
        let today = Local::now().date_naive();
        Self {
            running: true,
            view_mode: ViewMode::Month,
            selected_date: today,
            today,
            events: Vec::new(),
            day_events: Vec::new(),
            days_with_events: HashSet::new(),
            day_cursor: 0,
            editor: None,
            status_message: None,
            show_help: false,
            slot,
            backend,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Apply one action. Transport failures are logged, leave the state as
    /// it was before the attempt, and are returned to the caller.
    pub async fn dispatch(&mut self, action: Action) -> Result<Outcome, TransportError> {
        match action {
            Action::Load => self.load().await,
            Action::SelectSlot { start, end } => {
                self.editor = Some(Editor::open(Draft::for_slot(start, end)));
                Ok(Outcome::Opened)
            }
            Action::SelectEvent(index) => match self.events.get(index) {
                Some(event) => {
                    self.editor = Some(Editor::open(Draft::for_event(event)));
                    Ok(Outcome::Opened)
                }
                None => Ok(Outcome::Ignored),
            },
            Action::EditField(field, value) => match self.editor.as_mut() {
                Some(editor) => {
                    editor.edit(field, value);
                    Ok(Outcome::Edited)
                }
                None => Ok(Outcome::Ignored),
            },
            Action::Save => self.save().await,
            Action::Delete => self.delete().await,
            Action::Dismiss => Ok(match self.editor.take() {
                Some(_) => Outcome::Dismissed,
                None => Outcome::Ignored,
            }),
        }
    }

    async fn load(&mut self) -> Result<Outcome, TransportError> {
        let records = self
            .backend
            .list_events()
            .await
            .inspect_err(|err| error!(error = %err, "Error fetching events"))?;

        let total = records.len();
        let events: Vec<CalendarEvent> = records
            .into_iter()
            .filter_map(|record| {
                let id = record.id.clone();
                let event = CalendarEvent::from_record(record);
                if event.is_none() {
                    warn!(%id, "Skipping event with unparseable dates");
                }
                event
            })
            .collect();

        info!(total, shown = events.len(), "Loaded events");
        self.events = events;
        self.refresh_events();
        Ok(Outcome::Loaded(self.events.len()))
    }

    async fn save(&mut self) -> Result<Outcome, TransportError> {
        let Some(editor) = self.editor.as_mut() else {
            return Ok(Outcome::Ignored);
        };
        if !editor.validate() {
            info!(errors = ?editor.errors, "Event form has blank or malformed fields");
            return Ok(Outcome::Invalid);
        }

        let draft = editor.draft.clone();
        let result = match draft.to_record() {
            Some(record) => self.backend.update_event(&record.id, &record).await,
            None => self.backend.create_event(&draft.fields).await,
        };
        let saved = result.inspect_err(|err| error!(error = %err, "Error saving event"))?;
        info!(id = %saved.id, "Saved event");

        self.reload_after_change().await;
        self.editor = None;
        Ok(Outcome::Saved)
    }

    async fn delete(&mut self) -> Result<Outcome, TransportError> {
        let Some(id) = self.editor.as_ref().and_then(|e| e.draft.id()).cloned() else {
            return Ok(Outcome::Ignored);
        };

        self.backend
            .delete_event(&id)
            .await
            .inspect_err(|err| error!(error = %err, "Error deleting event"))?;
        info!(%id, "Deleted event");

        self.reload_after_change().await;
        self.editor = None;
        Ok(Outcome::Deleted)
    }

    async fn reload_after_change(&mut self) {
        if self.load().await.is_err() {
            warn!("Event list may be stale until the next reload");
        }
    }

    /// Rebuild the per-day index and the month markers from `events`.
    pub fn refresh_events(&mut self) {
        let date = self.selected_date;
        let mut day: Vec<usize> = (0..self.events.len())
            .filter(|&i| self.events[i].occurs_on(date))
            .collect();
        day.sort_by_key(|&i| self.events[i].start);
        self.day_events = day;
        self.day_cursor = self.day_cursor.min(self.day_events.len().saturating_sub(1));

        let month_start = date - Duration::days(i64::from(date.day0()));
        let month_end = month_start
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX);

        self.days_with_events.clear();
        for ev in &self.events {
            let start = ev.local_start().date_naive();
            let first = start.max(month_start);
            let last = ev.local_end().date_naive().max(start).min(month_end);
            for day in first.iter_days().take_while(|d| *d <= last) {
                self.days_with_events.insert(day.day());
            }
        }
    }

    /// The event under the day cursor, as an index into `events`.
    pub fn highlighted_event(&self) -> Option<usize> {
        self.day_events.get(self.day_cursor).copied()
    }

    /// The default slot on the selected date.
    pub fn selected_slot(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let naive = self
            .selected_date
            .and_hms_opt(self.slot.start_hour.min(23), 0, 0)?;
        let start = Local
            .from_local_datetime(&naive)
            .earliest()?
            .with_timezone(&Utc);
        let end = start + Duration::minutes(i64::from(self.slot.minutes.max(1)));
        Some((start, end))
    }

    /// Build an edit of the focused form field from its current value.
    pub fn edit_active_field(&self, change: impl FnOnce(&mut String)) -> Option<Action> {
        let editor = self.editor.as_ref()?;
        let field = editor.active_field;
        let mut value = editor.draft.field(field).to_string();
        change(&mut value);
        Some(Action::EditField(field, value))
    }

    pub fn focus_next_field(&mut self) {
        if let Some(editor) = self.editor.as_mut() {
            editor.active_field = editor.active_field.next();
        }
    }

    pub fn focus_prev_field(&mut self) {
        if let Some(editor) = self.editor.as_mut() {
            editor.active_field = editor.active_field.prev();
        }
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        if date != self.selected_date {
            self.selected_date = date;
            self.day_cursor = 0;
        }
        self.refresh_events();
    }

    pub fn next_day(&mut self) {
        self.select_date(self.selected_date.succ_opt().unwrap_or(self.selected_date));
    }

    pub fn prev_day(&mut self) {
        self.select_date(self.selected_date.pred_opt().unwrap_or(self.selected_date));
    }

    pub fn next_week(&mut self) {
        let date = self.selected_date.checked_add_signed(Duration::weeks(1));
        self.select_date(date.unwrap_or(self.selected_date));
    }

    pub fn prev_week(&mut self) {
        let date = self.selected_date.checked_sub_signed(Duration::weeks(1));
        self.select_date(date.unwrap_or(self.selected_date));
    }

    pub fn next_month(&mut self) {
        let date = self.selected_date.checked_add_months(Months::new(1));
        self.select_date(date.unwrap_or(self.selected_date));
    }

    pub fn prev_month(&mut self) {
        let date = self.selected_date.checked_sub_months(Months::new(1));
        self.select_date(date.unwrap_or(self.selected_date));
    }

    pub fn go_to_today(&mut self) {
        self.today = Local::now().date_naive();
        self.select_date(self.today);
    }

    /// Sunday of the selected week.
    pub fn week_start(&self) -> NaiveDate {
        let offset = self.selected_date.weekday().num_days_from_sunday();
        self.selected_date - Duration::days(i64::from(offset))
    }

    pub fn cursor_up(&mut self) {
        self.day_cursor = self.day_cursor.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        if self.day_cursor + 1 < self.day_events.len() {
            self.day_cursor += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Timelike;
    use reqwest::StatusCode;

    use super::*;
    use crate::calendar::datetime::parse_datetime;
    use crate::calendar::{DraftTarget, EventFields, EventId, EventRecord};
    use crate::error::Operation;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        List,
        Create(EventFields),
        Update(EventId, EventRecord),
        Delete(EventId),
    }

    #[derive(Default)]
    struct FakeBackend {
        records: Mutex<Vec<EventRecord>>,
        calls: Mutex<Vec<Call>>,
        next_id: AtomicI64,
        failing: AtomicBool,
    }

    impl FakeBackend {
        fn with_records(records: Vec<EventRecord>) -> Self {
            Self {
                next_id: AtomicI64::new(100),
                records: Mutex::new(records),
                ..Default::default()
            }
        }

        fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call, op: Operation) -> Result<(), TransportError> {
            self.calls.lock().unwrap().push(call);
            if self.failing.load(Ordering::SeqCst) {
                return Err(TransportError::Status {
                    op,
                    status: StatusCode::SERVICE_UNAVAILABLE,
                    body: "backend down".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl EventBackend for FakeBackend {
        async fn list_events(&self) -> Result<Vec<EventRecord>, TransportError> {
            self.record(Call::List, Operation::List)?;
            Ok(self.records.lock().unwrap().clone())
        }

        async fn create_event(&self, draft: &EventFields) -> Result<EventRecord, TransportError> {
            self.record(Call::Create(draft.clone()), Operation::Create)?;
            let record = EventRecord {
                id: EventId::Number(self.next_id.fetch_add(1, Ordering::SeqCst)),
                fields: draft.clone(),
            };
            self.records.lock().unwrap().push(record.clone());
            Ok(record)
        }

        async fn update_event(
            &self,
            id: &EventId,
            record: &EventRecord,
        ) -> Result<EventRecord, TransportError> {
            self.record(Call::Update(id.clone(), record.clone()), Operation::Update)?;
            let mut records = self.records.lock().unwrap();
            if let Some(existing) = records.iter_mut().find(|r| &r.id == id) {
                *existing = record.clone();
            }
            Ok(record.clone())
        }

        async fn delete_event(&self, id: &EventId) -> Result<(), TransportError> {
            self.record(Call::Delete(id.clone()), Operation::Delete)?;
            self.records.lock().unwrap().retain(|r| &r.id != id);
            Ok(())
        }
    }

    fn local(d: u32, h: u32, m: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, d, h, m, 0).unwrap()
    }

    fn record(id: i64, title: &str, start: DateTime<Local>, end: DateTime<Local>) -> EventRecord {
        EventRecord {
            id: EventId::Number(id),
            fields: EventFields {
                title: title.to_string(),
                description: format!("{title} notes"),
                start_date: start.to_rfc3339(),
                end_date: end.to_rfc3339(),
            },
        }
    }

    fn seeded() -> Vec<EventRecord> {
        vec![
            record(2, "Lunch", local(1, 12, 0), local(1, 13, 0)),
            record(1, "Standup", local(1, 9, 0), local(1, 9, 15)),
            record(3, "Offsite", local(3, 9, 0), local(3, 17, 0)),
        ]
    }

    async fn loaded_app() -> App<FakeBackend> {
        let mut app = App::new(FakeBackend::with_records(seeded()), SlotConfig::default());
        app.select_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(app.dispatch(Action::Load).await.unwrap(), Outcome::Loaded(3));
        app
    }

    fn index_of(app: &App<FakeBackend>, title: &str) -> usize {
        app.events.iter().position(|e| e.title() == title).unwrap()
    }

    async fn fill(app: &mut App<FakeBackend>) {
        let values = [
            (DraftField::Title, "Retro"),
            (DraftField::Description, "Sprint 12"),
        ];
        for (field, value) in values {
            app.dispatch(Action::EditField(field, value.to_string()))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn load_keeps_backend_order_and_derives_instants() {
        let app = loaded_app().await;

        let titles: Vec<&str> = app.events.iter().map(|e| e.title()).collect();
        assert_eq!(titles, ["Lunch", "Standup", "Offsite"]);
        assert_eq!(app.events[1].start, local(1, 9, 0).with_timezone(&Utc));

        let day_titles: Vec<&str> = app.day_events.iter().map(|&i| app.events[i].title()).collect();
        assert_eq!(day_titles, ["Standup", "Lunch"]);
        assert!(app.days_with_events.contains(&1));
        assert!(app.days_with_events.contains(&3));
        assert!(!app.days_with_events.contains(&2));
    }

    #[tokio::test]
    async fn load_skips_records_with_bad_dates() {
        let mut records = seeded();
        records[0].fields.start_date = "whenever".to_string();
        let mut app = App::new(FakeBackend::with_records(records), SlotConfig::default());

        assert_eq!(app.dispatch(Action::Load).await.unwrap(), Outcome::Loaded(2));
        assert!(app.events.iter().all(|e| e.title() != "Lunch"));
    }

    #[tokio::test]
    async fn failed_load_leaves_list_unchanged() {
        let mut app = loaded_app().await;
        let before = app.events.clone();

        app.backend().set_failing(true);
        let err = app.dispatch(Action::Load).await.unwrap_err();

        assert_eq!(err.operation(), Operation::List);
        assert_eq!(app.events, before);
    }

    #[tokio::test]
    async fn failed_first_load_leaves_list_empty() {
        let backend = FakeBackend::with_records(seeded());
        backend.set_failing(true);
        let mut app = App::new(backend, SlotConfig::default());

        assert!(app.dispatch(Action::Load).await.is_err());
        assert!(app.events.is_empty());
        assert!(app.day_events.is_empty());
    }

    #[tokio::test]
    async fn selecting_slot_opens_blank_new_draft() {
        let mut app = loaded_app().await;
        let start = Utc.with_ymd_and_hms(2024, 5, 2, 14, 0, 42).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 5, 2, 15, 30, 0).unwrap();

        let outcome = app.dispatch(Action::SelectSlot { start, end }).await.unwrap();

        assert_eq!(outcome, Outcome::Opened);
        let editor = app.editor.as_ref().unwrap();
        assert_eq!(editor.draft.target, DraftTarget::New);
        assert_eq!(editor.draft.fields.title, "");
        assert_eq!(editor.draft.fields.description, "");
        assert_eq!(editor.draft.fields.start_date, "2024-05-02T14:00");
        assert_eq!(editor.draft.fields.end_date, "2024-05-02T15:30");
        assert!(!editor.errors.any());
    }

    #[tokio::test]
    async fn selecting_event_copies_its_fields() {
        let mut app = loaded_app().await;
        let idx = index_of(&app, "Standup");
        let event = app.events[idx].clone();

        app.dispatch(Action::SelectEvent(idx)).await.unwrap();

        let draft = &app.editor.as_ref().unwrap().draft;
        assert_eq!(draft.id(), Some(&EventId::Number(1)));
        assert_eq!(draft.fields.title, "Standup");
        assert_eq!(draft.fields.description, "Standup notes");
        assert_eq!(parse_datetime(&draft.fields.start_date), Some(event.start));
        assert_eq!(parse_datetime(&draft.fields.end_date), Some(event.end));
    }

    #[tokio::test]
    async fn selecting_out_of_range_event_is_ignored() {
        let mut app = loaded_app().await;
        assert_eq!(app.dispatch(Action::SelectEvent(99)).await.unwrap(), Outcome::Ignored);
        assert!(app.editor.is_none());
    }

    #[tokio::test]
    async fn selection_replaces_previous_draft() {
        let mut app = loaded_app().await;
        app.dispatch(Action::SelectEvent(index_of(&app, "Lunch")))
            .await
            .unwrap();
        app.dispatch(Action::EditField(DraftField::Title, " ".to_string()))
            .await
            .unwrap();

        let (start, end) = app.selected_slot().unwrap();
        app.dispatch(Action::SelectSlot { start, end }).await.unwrap();

        let editor = app.editor.as_ref().unwrap();
        assert!(editor.draft.is_new());
        assert!(!editor.errors.title);
    }

    #[tokio::test]
    async fn editing_recomputes_only_that_flag() {
        let mut app = loaded_app().await;
        let (start, end) = app.selected_slot().unwrap();
        app.dispatch(Action::SelectSlot { start, end }).await.unwrap();

        app.dispatch(Action::EditField(DraftField::Title, "  ".to_string()))
            .await
            .unwrap();
        let errors = app.editor.as_ref().unwrap().errors;
        assert!(errors.title);
        assert!(!errors.description);

        app.dispatch(Action::EditField(DraftField::Title, "x".to_string()))
            .await
            .unwrap();
        let editor = app.editor.as_ref().unwrap();
        assert!(!editor.errors.title);
        assert_eq!(editor.draft.fields.title, "x");
    }

    #[tokio::test]
    async fn editing_without_form_is_ignored() {
        let mut app = loaded_app().await;
        let outcome = app
            .dispatch(Action::EditField(DraftField::Title, "x".to_string()))
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Ignored);
    }

    #[tokio::test]
    async fn blank_field_blocks_save_without_backend_call() {
        for field in DraftField::ALL {
            let mut app = loaded_app().await;
            app.dispatch(Action::SelectEvent(index_of(&app, "Lunch")))
                .await
                .unwrap();
            app.dispatch(Action::EditField(field, " \t".to_string()))
                .await
                .unwrap();
            // Clear the eager flag so only the save-time check can set it.
            app.editor.as_mut().unwrap().errors = FormErrors::default();

            let outcome = app.dispatch(Action::Save).await.unwrap();

            assert_eq!(outcome, Outcome::Invalid, "{field:?}");
            let editor = app.editor.as_ref().unwrap();
            assert!(editor.errors.get(field), "{field:?}");
            assert_eq!(app.backend().calls(), [Call::List], "{field:?}");
        }
    }

    #[tokio::test]
    async fn blank_new_draft_reports_every_missing_field() {
        let mut app = loaded_app().await;
        let (start, end) = app.selected_slot().unwrap();
        app.dispatch(Action::SelectSlot { start, end }).await.unwrap();

        assert_eq!(app.dispatch(Action::Save).await.unwrap(), Outcome::Invalid);
        let errors = app.editor.as_ref().unwrap().errors;
        assert!(errors.title && errors.description);
        assert!(!errors.start_date && !errors.end_date);
    }

    #[tokio::test]
    async fn saving_new_draft_creates_and_refetches() {
        let mut app = loaded_app().await;
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 15, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 5, 1, 16, 0, 0).unwrap();
        app.dispatch(Action::SelectSlot { start, end }).await.unwrap();
        fill(&mut app).await;

        assert_eq!(app.dispatch(Action::Save).await.unwrap(), Outcome::Saved);

        let calls = app.backend().calls();
        assert!(matches!(calls[1], Call::Create(ref f) if f.title == "Retro"));
        assert_eq!(calls[2], Call::List);
        assert!(app.editor.is_none());

        let created = &app.events[index_of(&app, "Retro")];
        assert_eq!(created.description(), "Sprint 12");
        assert_eq!(created.start, start);
        assert_eq!(created.end, end);
        assert_eq!(created.id(), &EventId::Number(100));
    }

    #[tokio::test]
    async fn saving_existing_draft_updates() {
        let mut app = loaded_app().await;
        app.dispatch(Action::SelectEvent(index_of(&app, "Offsite")))
            .await
            .unwrap();
        app.dispatch(Action::EditField(DraftField::Title, "Team offsite".to_string()))
            .await
            .unwrap();

        assert_eq!(app.dispatch(Action::Save).await.unwrap(), Outcome::Saved);

        let calls = app.backend().calls();
        match &calls[1] {
            Call::Update(id, record) => {
                assert_eq!(id, &EventId::Number(3));
                assert_eq!(record.id, EventId::Number(3));
                assert_eq!(record.fields.title, "Team offsite");
            }
            other => panic!("expected update, got {other:?}"),
        }
        assert!(!calls.iter().any(|c| matches!(c, Call::Create(_))));
        assert!(app.events.iter().any(|e| e.title() == "Team offsite"));
        assert!(app.events.iter().all(|e| e.title() != "Offsite"));
    }

    #[tokio::test]
    async fn end_before_start_is_accepted() {
        let mut app = loaded_app().await;
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 16, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 5, 1, 15, 0, 0).unwrap();
        app.dispatch(Action::SelectSlot { start, end }).await.unwrap();
        fill(&mut app).await;

        assert_eq!(app.dispatch(Action::Save).await.unwrap(), Outcome::Saved);
    }

    #[tokio::test]
    async fn inverted_event_is_marked_on_its_start_day() {
        let records = vec![record(7, "Backwards", local(2, 9, 0), local(1, 9, 0))];
        let mut app = App::new(FakeBackend::with_records(records), SlotConfig::default());
        app.select_date(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());

        app.dispatch(Action::Load).await.unwrap();

        assert_eq!(app.day_events, [0]);
        assert!(app.days_with_events.contains(&2));
        assert!(!app.days_with_events.contains(&1));
    }

    #[tokio::test]
    async fn unparseable_date_blocks_save() {
        let mut app = loaded_app().await;
        let (start, end) = app.selected_slot().unwrap();
        app.dispatch(Action::SelectSlot { start, end }).await.unwrap();
        fill(&mut app).await;
        app.dispatch(Action::EditField(DraftField::StartDate, "soon".to_string()))
            .await
            .unwrap();
        assert!(!app.editor.as_ref().unwrap().errors.any());

        assert_eq!(app.dispatch(Action::Save).await.unwrap(), Outcome::Invalid);

        let errors = app.editor.as_ref().unwrap().errors;
        assert!(errors.malformed(DraftField::StartDate));
        assert!(!errors.start_date);
        assert!(!errors.malformed(DraftField::EndDate));
        assert_eq!(app.backend().calls(), [Call::List]);

        app.dispatch(Action::EditField(DraftField::StartDate, "2024-05-01T15:00".to_string()))
            .await
            .unwrap();
        assert!(!app.editor.as_ref().unwrap().errors.any());
        assert_eq!(app.dispatch(Action::Save).await.unwrap(), Outcome::Saved);
        assert!(app.events.iter().any(|e| e.title() == "Retro"));
    }

    #[tokio::test]
    async fn failed_save_keeps_form_open() {
        let mut app = loaded_app().await;
        let (start, end) = app.selected_slot().unwrap();
        app.dispatch(Action::SelectSlot { start, end }).await.unwrap();
        fill(&mut app).await;
        let before = app.editor.clone();
        let events_before = app.events.clone();

        app.backend().set_failing(true);
        let err = app.dispatch(Action::Save).await.unwrap_err();

        assert_eq!(err.operation(), Operation::Create);
        assert_eq!(app.editor, before);
        assert_eq!(app.events, events_before);
    }

    #[tokio::test]
    async fn deleting_removes_event_from_next_fetch() {
        let mut app = loaded_app().await;
        app.dispatch(Action::SelectEvent(index_of(&app, "Lunch")))
            .await
            .unwrap();

        assert_eq!(app.dispatch(Action::Delete).await.unwrap(), Outcome::Deleted);

        assert_eq!(app.backend().calls()[1], Call::Delete(EventId::Number(2)));
        assert!(app.editor.is_none());
        assert!(app.events.iter().all(|e| e.title() != "Lunch"));
        assert_eq!(app.events.len(), 2);
    }

    #[tokio::test]
    async fn deleting_new_draft_is_ignored() {
        let mut app = loaded_app().await;
        let (start, end) = app.selected_slot().unwrap();
        app.dispatch(Action::SelectSlot { start, end }).await.unwrap();

        assert_eq!(app.dispatch(Action::Delete).await.unwrap(), Outcome::Ignored);
        assert_eq!(app.backend().calls(), [Call::List]);
        assert!(app.editor.is_some());
    }

    #[tokio::test]
    async fn failed_delete_keeps_form_open() {
        let mut app = loaded_app().await;
        app.dispatch(Action::SelectEvent(index_of(&app, "Lunch")))
            .await
            .unwrap();
        app.backend().set_failing(true);

        assert!(app.dispatch(Action::Delete).await.is_err());
        assert!(app.editor.is_some());
        assert_eq!(app.events.len(), 3);
    }

    #[tokio::test]
    async fn dismiss_discards_draft_without_backend_call() {
        let mut app = loaded_app().await;
        app.dispatch(Action::SelectEvent(index_of(&app, "Lunch")))
            .await
            .unwrap();
        app.dispatch(Action::EditField(DraftField::Title, "Brunch".to_string()))
            .await
            .unwrap();

        assert_eq!(app.dispatch(Action::Dismiss).await.unwrap(), Outcome::Dismissed);
        assert!(app.editor.is_none());
        assert_eq!(app.backend().calls(), [Call::List]);
        assert!(app.events.iter().any(|e| e.title() == "Lunch"));
        assert_eq!(app.dispatch(Action::Dismiss).await.unwrap(), Outcome::Ignored);
    }

    #[tokio::test]
    async fn edit_active_field_builds_whole_value() {
        let mut app = loaded_app().await;
        assert_eq!(app.edit_active_field(|v| v.push('x')), None);

        app.dispatch(Action::SelectEvent(index_of(&app, "Lunch")))
            .await
            .unwrap();
        app.focus_next_field();
        let action = app.edit_active_field(|v| {
            v.pop();
        });
        assert_eq!(
            action,
            Some(Action::EditField(DraftField::Description, "Lunch note".to_string()))
        );
        app.focus_prev_field();
        app.focus_prev_field();
        assert_eq!(app.editor.as_ref().unwrap().active_field, DraftField::EndDate);
    }

    #[tokio::test]
    async fn day_cursor_follows_selected_date() {
        let mut app = loaded_app().await;
        app.cursor_down();
        app.cursor_down();
        assert_eq!(app.day_cursor, 1);
        assert_eq!(app.highlighted_event(), Some(index_of(&app, "Lunch")));

        app.next_day();
        assert_eq!(app.day_cursor, 0);
        assert_eq!(app.highlighted_event(), None);

        app.next_day();
        assert_eq!(app.highlighted_event(), Some(index_of(&app, "Offsite")));
        app.cursor_up();
        assert_eq!(app.day_cursor, 0);
    }

    #[test]
    fn month_navigation_clamps_day() {
        let mut app = App::new(FakeBackend::default(), SlotConfig::default());
        app.select_date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());

        app.next_month();
        assert_eq!(app.selected_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        app.prev_month();
        assert_eq!(app.selected_date, NaiveDate::from_ymd_opt(2024, 1, 29).unwrap());
        app.prev_week();
        assert_eq!(app.selected_date, NaiveDate::from_ymd_opt(2024, 1, 22).unwrap());
        app.next_week();
        app.prev_day();
        assert_eq!(app.selected_date, NaiveDate::from_ymd_opt(2024, 1, 28).unwrap());
    }

    #[test]
    fn week_starts_on_sunday() {
        let mut app = App::new(FakeBackend::default(), SlotConfig::default());
        app.select_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(app.week_start(), NaiveDate::from_ymd_opt(2024, 4, 28).unwrap());
    }

    #[test]
    fn selected_slot_uses_configured_hour_and_length() {
        let slot = SlotConfig {
            start_hour: 14,
            minutes: 45,
        };
        let mut app = App::new(FakeBackend::default(), slot);
        app.select_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());

        let (start, end) = app.selected_slot().unwrap();
        let local_start = start.with_timezone(&Local);
        assert_eq!(local_start.date_naive(), app.selected_date);
        assert_eq!((local_start.hour(), local_start.minute()), (14, 0));
        assert_eq!(end - start, Duration::minutes(45));
    }
}
