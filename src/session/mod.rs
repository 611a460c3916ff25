//! Builder session — the controller the presentation layer drives.
//!
//! A [`BuilderSession`] owns one [`SelectionBoard`] built against a fetched
//! form schema and talks to a [`CardStore`] for persistence. The
//! presentation layer forwards user intents (toggle, create, edit, done,
//! save, load, refresh, clear) and re-renders from the returned state; every
//! failure is a typed, local outcome — nothing here crashes the process.

use crate::errors::{SelectionError, SessionError};
use crate::layout::{Section, SelectionBoard};
use crate::schema::{FormSchema, SchemaClient};
use crate::store::{CardStore, SaveCardRequest};

/// Outcome of a save attempt that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { sections: usize },
    /// No section with fields existed; storage was never contacted.
    NothingToSave,
}

/// Outcome of a load attempt that did not fail. Not-found and
/// found-but-empty are informational, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { sections: usize },
    NotFound,
    EmptySelections,
}

pub struct BuilderSession<S: CardStore> {
    schema: FormSchema,
    board: SelectionBoard,
    store: S,
    in_flight: bool,
}

impl<S: CardStore> BuilderSession<S> {
    pub fn new(schema: FormSchema, store: S) -> Self {
        let board = SelectionBoard::new(schema.field_ids());
        Self {
            schema,
            board,
            store,
            in_flight: false,
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn form_id(&self) -> &str {
        &self.schema.id
    }

    pub fn board(&self) -> &SelectionBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut SelectionBoard {
        &mut self.board
    }

    /// Snapshot of the form definition in the shape the store expects
    /// alongside the layout selections.
    fn form_snapshot(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.schema.id,
            "name": self.schema.name,
            "slug": self.schema.slug,
            "elements": self
                .schema
                .fields
                .iter()
                .map(|f| serde_json::json!({
                    "id": f.id,
                    "properties": {"label": f.label},
                }))
                .collect::<Vec<_>>(),
        })
    }

    /// Persist the current selections.
    ///
    /// Idle only; the valid (non-empty) sections are frozen at call time.
    /// With zero valid sections this reports `NothingToSave` without
    /// contacting storage. State is never mutated before the store confirms,
    /// so a failed save can simply be retried.
    pub async fn save(&mut self) -> Result<SaveOutcome, SessionError> {
        if self.in_flight {
            return Err(SessionError::OperationInFlight);
        }
        if let Some(index) = self.board.editing_index() {
            return Err(SelectionError::EditInProgress { index }.into());
        }

        let valid: Vec<Section> = self.board.valid_sections().cloned().collect();
        if valid.is_empty() {
            tracing::debug!("No sections with fields to save");
            return Ok(SaveOutcome::NothingToSave);
        }

        let sections = valid.len();
        let req = SaveCardRequest {
            form_id: self.schema.id.clone(),
            form_data: self.form_snapshot(),
            layout_selections: valid,
        };

        self.in_flight = true;
        let result = self.store.save_card(&req).await;
        self.in_flight = false;

        result?;
        tracing::info!(form_id = %self.schema.id, sections, "Saved card configuration");
        Ok(SaveOutcome::Saved { sections })
    }

    /// Fetch the stored configuration for this form and, when present and
    /// non-empty, replace the section sequence wholesale. Leaves the board
    /// idle.
    pub async fn load(&mut self) -> Result<LoadOutcome, SessionError> {
        if self.in_flight {
            return Err(SessionError::OperationInFlight);
        }

        self.in_flight = true;
        let result = self.store.load_card(&self.schema.id).await;
        self.in_flight = false;

        match result? {
            None => {
                tracing::debug!(form_id = %self.schema.id, "No saved configuration");
                Ok(LoadOutcome::NotFound)
            }
            Some(config) if config.layout_selections.is_empty() => {
                Ok(LoadOutcome::EmptySelections)
            }
            Some(config) => {
                let sections = config.layout_selections.len();
                self.board.replace_sections(config.layout_selections);
                tracing::info!(form_id = %self.schema.id, sections, "Loaded card configuration");
                Ok(LoadOutcome::Loaded { sections })
            }
        }
    }

    /// Local reset of the board; stored data is untouched.
    pub fn clear(&mut self) {
        self.board.clear();
    }

    /// Rebuild the board against a freshly validated schema. Selections
    /// reset, since the field universe may have changed.
    pub fn reset_with_schema(&mut self, schema: FormSchema) {
        self.board = SelectionBoard::new(schema.field_ids());
        self.schema = schema;
    }

    /// Refetch the form definition and rebuild the board against it.
    pub async fn refresh(
        &mut self,
        client: &SchemaClient,
        slug: &str,
    ) -> Result<(), SessionError> {
        if self.in_flight {
            return Err(SessionError::OperationInFlight);
        }
        let schema = client.fetch(slug).await?;
        self.reset_with_schema(schema);
        Ok(())
    }
}
