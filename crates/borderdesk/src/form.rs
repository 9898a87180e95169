//! Flight entry form controller.
//!
//! The controller owns one in-progress draft and moves it between two states:
//!
//! - **Editing**: the draft may be changed and submitted.
//! - **Saved**: the draft was just persisted. From here the agent continues
//!   editing the same record, archives it (closes it out and starts a new
//!   blank draft), or deletes it.
//!
//! [`FormController::cancel_edit`] drops any in-memory changes from either
//! state without touching storage.

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::record::{Classification, FlightRecord, FlightStatus, FlightType, Leg};
use crate::store::RecordStore;
use crate::validation::{validate_flight, ValidationErrors};

/// Values every new blank draft starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftDefaults {
    /// Code of the airport the desk operates at.
    pub home_station: String,
    /// Name of the agent on duty.
    pub agent_name: String,
    /// Category of the agent on duty.
    pub agent_category: String,
}

impl Default for DraftDefaults {
    fn default() -> Self {
        Self {
            home_station: crate::config::DEFAULT_HOME_STATION.to_string(),
            agent_name: String::new(),
            agent_category: String::new(),
        }
    }
}

impl From<&Config> for DraftDefaults {
    fn from(config: &Config) -> Self {
        Self {
            home_station: config.station.home_code.clone(),
            agent_name: config.agent.name.clone(),
            agent_category: config.agent.category.clone(),
        }
    }
}

impl DraftDefaults {
    /// A blank draft attributed to the agent on duty.
    #[must_use]
    pub fn blank(&self) -> FlightRecord {
        FlightRecord::draft(&self.agent_name, &self.agent_category)
    }
}

/// State of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    /// The draft is being edited.
    Editing,
    /// The draft has just been saved.
    Saved,
}

impl FormState {
    fn as_str(self) -> &'static str {
        match self {
            Self::Editing => "editing",
            Self::Saved => "saved",
        }
    }
}

/// Result of [`FormController::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The draft was persisted under this id.
    Saved(String),
    /// The draft failed validation; nothing was written.
    Invalid(ValidationErrors),
}

/// Drives a single flight draft through validation and persistence.
#[derive(Debug)]
pub struct FormController<S> {
    store: S,
    defaults: DraftDefaults,
    draft: FlightRecord,
    state: FormState,
    errors: ValidationErrors,
}

impl<S: RecordStore> FormController<S> {
    /// Start with a blank draft in the Editing state.
    #[must_use]
    pub fn new(store: S, defaults: DraftDefaults) -> Self {
        let draft = defaults.blank();
        Self {
            store,
            defaults,
            draft,
            state: FormState::Editing,
            errors: ValidationErrors::new(),
        }
    }

    /// The store this form saves to.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> FormState {
        self.state
    }

    /// The current draft.
    #[must_use]
    pub fn draft(&self) -> &FlightRecord {
        &self.draft
    }

    /// Errors from the last failed submit. Cleared by a successful submit or
    /// a reset.
    #[must_use]
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    fn require(&self, expected: FormState, action: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                action,
                state: self.state.as_str(),
            })
        }
    }

    fn reset(&mut self) {
        self.draft = self.defaults.blank();
        self.errors = ValidationErrors::new();
        self.state = FormState::Editing;
    }

    /// Mutable access to the draft.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] unless the form is Editing.
    pub fn draft_mut(&mut self) -> Result<&mut FlightRecord> {
        self.require(FormState::Editing, "edit the draft")?;
        Ok(&mut self.draft)
    }

    /// Load an existing record for editing, discarding the current draft.
    pub fn edit(&mut self, record: FlightRecord) {
        self.draft = record;
        self.errors = ValidationErrors::new();
        self.state = FormState::Editing;
    }

    /// Change the movement type, resetting the fixed endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] unless the form is Editing.
    pub fn set_flight_type(&mut self, flight_type: FlightType) -> Result<()> {
        self.require(FormState::Editing, "change the flight type")?;
        self.draft
            .set_flight_type(flight_type, &self.defaults.home_station);
        Ok(())
    }

    /// Classify a leg as Schengen or non-Schengen.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] unless the form is Editing.
    pub fn classify(&mut self, leg: Leg, classification: Classification) -> Result<()> {
        self.require(FormState::Editing, "classify a leg")?;
        self.draft.checklist.classify(leg, classification);
        Ok(())
    }

    /// Tick or untick a checklist item.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] unless the form is Editing, or
    /// [`Error::UnknownChecklistItem`] for ids outside the leg's catalog.
    pub fn set_checklist_item(&mut self, leg: Leg, item: &str, done: bool) -> Result<()> {
        self.require(FormState::Editing, "update the checklist")?;
        self.draft.checklist.set_item(leg, item, done)
    }

    /// Validate the draft and save it if valid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] unless the form is Editing, or the
    /// store's error if saving fails. Validation failures are reported as
    /// [`SubmitOutcome::Invalid`], not as errors.
    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        self.require(FormState::Editing, "submit")?;

        let errors = validate_flight(&self.draft);
        if !errors.is_empty() {
            debug!("Draft rejected with {} validation errors", errors.len());
            self.errors = errors.clone();
            return Ok(SubmitOutcome::Invalid(errors));
        }

        let id = self.store.save_flight(self.draft.clone()).await?;
        self.draft.id = Some(id.clone());
        self.errors = ValidationErrors::new();
        self.state = FormState::Saved;
        info!("Saved flight {} ({})", self.draft.flight_number, id);
        Ok(SubmitOutcome::Saved(id))
    }

    /// Go back to editing the record that was just saved.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] unless the form is Saved.
    pub fn continue_editing(&mut self) -> Result<()> {
        self.require(FormState::Saved, "continue editing")?;
        self.state = FormState::Editing;
        Ok(())
    }

    /// Close out the saved record and start a new blank draft.
    ///
    /// The saved record is left exactly as stored; its status is not changed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] unless the form is Saved.
    pub fn archive(&mut self) -> Result<()> {
        self.require(FormState::Saved, "archive")?;
        self.reset();
        Ok(())
    }

    /// Delete the saved record and start a new blank draft.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTransition`] unless the form is Saved, or the
    /// store's error if deleting fails (the form then stays Saved).
    pub async fn delete(&mut self) -> Result<()> {
        self.require(FormState::Saved, "delete")?;
        if let Some(id) = self.draft.id.clone() {
            self.store.delete_flight(&id).await?;
            info!("Deleted flight {}", id);
        }
        self.reset();
        Ok(())
    }

    /// Discard the draft and start a new blank one. Storage is not touched.
    pub fn cancel_edit(&mut self) {
        self.reset();
    }
}

/// Set an existing record's status to archived and save it.
///
/// This is the list-level action, distinct from [`FormController::archive`].
/// Returns `false` if no record has that id.
///
/// # Errors
///
/// Returns the store's error if loading or saving fails.
pub async fn mark_archived<S>(store: &S, id: &str) -> Result<bool>
where
    S: RecordStore + ?Sized,
{
    let Some(mut record) = store.get_flight(id).await? else {
        return Ok(false);
    };
    record.status = FlightStatus::Archived;
    store.save_flight(record).await?;
    info!("Marked flight {} as archived", id);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FlightNature;
    use crate::store::FlightStore;

    fn controller() -> FormController<FlightStore> {
        let defaults = DraftDefaults {
            home_station: "LPPS".to_string(),
            agent_name: "Ana".to_string(),
            agent_category: "inspector".to_string(),
        };
        FormController::new(FlightStore::in_memory(), defaults)
    }

    fn fill_arrival(form: &mut FormController<FlightStore>) {
        form.set_flight_type(FlightType::Arrival).unwrap();
        form.classify(Leg::Arrival, Classification::Schengen).unwrap();
        let draft = form.draft_mut().unwrap();
        draft.flight_number = "TP1699".to_string();
        draft.aircraft_type = "A320".to_string();
        draft.operator = "TAP".to_string();
        draft.flight_nature = Some(FlightNature::Private);
        draft.arrival.airport = "LIS".to_string();
        draft.arrival.reg_vp = "A-001".to_string();
    }

    #[tokio::test]
    async fn test_new_form_is_blank() {
        let form = controller();
        assert_eq!(form.state(), FormState::Editing);
        assert!(form.draft().is_new());
        assert_eq!(form.draft().created_by, "Ana");
        assert_eq!(form.draft().status, FlightStatus::Scheduled);
    }

    #[tokio::test]
    async fn test_set_flight_type_uses_home_station() {
        let mut form = controller();
        form.set_flight_type(FlightType::Departure).unwrap();
        assert_eq!(form.draft().origin(), "LPPS");
        assert_eq!(form.draft().destination(), "");
    }

    #[tokio::test]
    async fn test_invalid_submit_stays_editing() {
        let mut form = controller();
        fill_arrival(&mut form);
        form.draft_mut().unwrap().arrival.airport.clear();

        let outcome = form.submit().await.unwrap();
        let SubmitOutcome::Invalid(errors) = outcome else {
            panic!("expected validation failure");
        };
        assert!(errors.contains("origin"));
        assert_eq!(form.state(), FormState::Editing);
        assert!(form.errors().contains("origin"));
        assert!(form.store().get_flights().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_submit_then_continue_updates_same_record() {
        let mut form = controller();
        fill_arrival(&mut form);

        let SubmitOutcome::Saved(id) = form.submit().await.unwrap() else {
            panic!("expected save");
        };
        assert_eq!(form.state(), FormState::Saved);
        assert!(form.errors().is_empty());
        assert_eq!(form.draft().id.as_deref(), Some(id.as_str()));

        form.continue_editing().unwrap();
        form.draft_mut().unwrap().status = FlightStatus::Confirmed;
        let SubmitOutcome::Saved(second) = form.submit().await.unwrap() else {
            panic!("expected save");
        };

        assert_eq!(id, second);
        let flights = form.store().get_flights().await.unwrap();
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].status, FlightStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_archive_starts_new_draft_without_touching_status() {
        let mut form = controller();
        fill_arrival(&mut form);
        form.submit().await.unwrap();

        form.archive().unwrap();
        assert_eq!(form.state(), FormState::Editing);
        assert!(form.draft().is_new());
        assert!(form.draft().flight_number.is_empty());

        let flights = form.store().get_flights().await.unwrap();
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].status, FlightStatus::Scheduled);
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let mut form = controller();
        fill_arrival(&mut form);
        form.submit().await.unwrap();

        form.delete().await.unwrap();
        assert_eq!(form.state(), FormState::Editing);
        assert!(form.draft().is_new());
        assert!(form.store().get_flights().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_edit_discards_without_storage() {
        let mut form = controller();
        fill_arrival(&mut form);
        form.cancel_edit();

        assert!(form.draft().flight_number.is_empty());
        assert!(form.store().get_flights().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_edit_after_save_keeps_record() {
        let mut form = controller();
        fill_arrival(&mut form);
        form.submit().await.unwrap();
        form.cancel_edit();

        assert_eq!(form.state(), FormState::Editing);
        assert_eq!(form.store().get_flights().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_wrong_state_transitions_rejected() {
        let mut form = controller();
        assert!(form.archive().unwrap_err().is_invalid_transition());
        assert!(form.continue_editing().unwrap_err().is_invalid_transition());
        assert!(form.delete().await.unwrap_err().is_invalid_transition());

        fill_arrival(&mut form);
        form.submit().await.unwrap();
        assert!(form.submit().await.unwrap_err().is_invalid_transition());
        assert!(form.draft_mut().unwrap_err().is_invalid_transition());
        assert!(form
            .set_flight_type(FlightType::Departure)
            .unwrap_err()
            .is_invalid_transition());
    }

    #[tokio::test]
    async fn test_checklist_item_through_form() {
        let mut form = controller();
        form.set_checklist_item(Leg::Arrival, "sis_consulted", true)
            .unwrap();
        assert!(form.draft().checklist.is_checked(Leg::Arrival, "sis_consulted"));
        assert!(form
            .set_checklist_item(Leg::Arrival, "not_an_item", true)
            .is_err());
    }

    #[tokio::test]
    async fn test_edit_loads_existing_record() {
        let mut form = controller();
        fill_arrival(&mut form);
        let SubmitOutcome::Saved(id) = form.submit().await.unwrap() else {
            panic!("expected save");
        };
        form.archive().unwrap();

        let stored = form.store().get_flight(&id).await.unwrap().unwrap();
        form.edit(stored);
        form.draft_mut().unwrap().operator = "SATA".to_string();
        form.submit().await.unwrap();

        let flights = form.store().get_flights().await.unwrap();
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].operator, "SATA");
    }

    #[tokio::test]
    async fn test_mark_archived() {
        let mut form = controller();
        fill_arrival(&mut form);
        let SubmitOutcome::Saved(id) = form.submit().await.unwrap() else {
            panic!("expected save");
        };
        let before = form.store().get_flight(&id).await.unwrap().unwrap();

        assert!(mark_archived(form.store(), &id).await.unwrap());
        let after = form.store().get_flight(&id).await.unwrap().unwrap();
        assert_eq!(after.status, FlightStatus::Archived);
        assert_eq!(after.created_at, before.created_at);

        assert!(!mark_archived(form.store(), "missing").await.unwrap());
    }

    #[test]
    fn test_defaults_from_config() {
        let mut config = Config::default();
        config.agent.name = "Rui".to_string();
        let defaults = DraftDefaults::from(&config);
        assert_eq!(defaults.home_station, "LPPS");
        assert_eq!(defaults.blank().created_by, "Rui");
    }
}
