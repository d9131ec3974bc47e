//! TUI application state and key handling.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::oneshot::{self, error::TryRecvError};

use smartfit_core::export::{self, ExportFormat};
use smartfit_core::onboarding::{Step, Wizard};
use smartfit_core::plan::{DashboardView, PlanError, alternative_exercises};
use smartfit_core::session::{Screen, Session};
use smartfit_store::models::{
    DAYS_OF_WEEK, Exercise, ExperienceLevel, Gender, Goal, Location, MUSCLE_GROUPS, WorkoutPlan,
};

/// One selectable row of a wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardField {
    Gender(Gender),
    Weight,
    Height,
    Goal(Goal),
    Experience(ExperienceLevel),
    Duration,
    Day(&'static str),
    Location(Location),
    Muscle(&'static str),
}

/// Rows shown on `step`, top to bottom.
pub fn fields_for(step: Step) -> Vec<WizardField> {
    match step {
        Step::Basics => Gender::ALL
            .iter()
            .map(|g| WizardField::Gender(*g))
            .chain([WizardField::Weight, WizardField::Height])
            .chain(Goal::ALL.iter().map(|g| WizardField::Goal(*g)))
            .collect(),
        Step::Experience => ExperienceLevel::ALL
            .iter()
            .map(|e| WizardField::Experience(*e))
            .collect(),
        Step::Logistics => std::iter::once(WizardField::Duration)
            .chain(DAYS_OF_WEEK.iter().map(|d| WizardField::Day(*d)))
            .chain(Location::ALL.iter().map(|l| WizardField::Location(*l)))
            .collect(),
        Step::Preferences => MUSCLE_GROUPS
            .iter()
            .map(|m| WizardField::Muscle(*m))
            .collect(),
    }
}

/// One row of the dashboard list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashRow {
    Day(usize),
    Exercise { day: usize, index: usize },
}

/// State of the alternatives popup.
#[derive(Debug, Clone, PartialEq)]
pub enum AltState {
    Loading,
    Ready { options: Vec<Exercise>, selected: usize },
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AltPopup {
    pub day: usize,
    pub exercise_id: String,
    pub exercise_name: String,
    pub state: AltState,
}

/// Modal content drawn over the current screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Help,
    Alternatives(AltPopup),
    ConfirmReset,
}

/// Application state for the TUI.
pub struct App {
    pub session: Session,
    pub wizard: Wizard,
    pub field_cursor: usize,
    pub dashboard: DashboardView,
    pub dash_cursor: usize,
    pub overlay: Option<Overlay>,
    pub export_dir: PathBuf,
    pub tick_rate: Duration,
    pub ticks: u64,
    pub should_quit: bool,
    pub status_message: Option<String>,
    pending_plan: Option<oneshot::Receiver<Result<WorkoutPlan, PlanError>>>,
    pending_alternatives: Option<oneshot::Receiver<Vec<Exercise>>>,
}

impl App {
    pub fn new(session: Session, export_dir: PathBuf) -> Self {
        Self {
            session,
            wizard: Wizard::new(),
            field_cursor: 0,
            dashboard: DashboardView::new(),
            dash_cursor: 0,
            overlay: None,
            export_dir,
            tick_rate: Duration::from_millis(250),
            ticks: 0,
            should_quit: false,
            status_message: None,
            pending_plan: None,
            pending_alternatives: None,
        }
    }

    pub fn current_fields(&self) -> Vec<WizardField> {
        fields_for(self.wizard.step())
    }

    pub fn selected_field(&self) -> Option<WizardField> {
        self.current_fields().get(self.field_cursor).copied()
    }

    /// Rows of the dashboard list: every day, plus the exercises of the
    /// expanded one.
    pub fn dashboard_rows(&self) -> Vec<DashRow> {
        let Some(plan) = self.session.plan() else {
            return Vec::new();
        };
        let mut rows = Vec::new();
        for (i, day) in plan.days().iter().enumerate() {
            rows.push(DashRow::Day(i));
            if self.dashboard.is_expanded(i) {
                rows.extend((0..day.exercises.len()).map(|index| DashRow::Exercise { day: i, index }));
            }
        }
        rows
    }

    pub fn selected_row(&self) -> Option<DashRow> {
        self.dashboard_rows().get(self.dash_cursor).copied()
    }

    // -- Background work --

    /// Collect finished background requests. Called on every tick.
    pub fn on_tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);

        if let Some(rx) = self.pending_plan.as_mut() {
            let outcome = match rx.try_recv() {
                Ok(result) => Some(result),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Closed) => {
                    tracing::error!("plan generation task ended without a result");
                    Some(Err(PlanError::Interrupted))
                }
            };
            if let Some(result) = outcome {
                self.pending_plan = None;
                if let Err(e) = self.session.finish_submit(result) {
                    self.status_message = Some(format!("Plano não salvo: {e}"));
                }
                self.dashboard = DashboardView::new();
                self.dash_cursor = 0;
            }
        }

        if let Some(rx) = self.pending_alternatives.as_mut() {
            let found = match rx.try_recv() {
                Ok(found) => Some(found),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Closed) => Some(Vec::new()),
            };
            if let Some(found) = found {
                self.pending_alternatives = None;
                if let Some(Overlay::Alternatives(popup)) = self.overlay.as_mut() {
                    popup.state = if found.is_empty() {
                        AltState::Empty
                    } else {
                        AltState::Ready {
                            options: found,
                            selected: 0,
                        }
                    };
                }
            }
        }
    }

    pub fn is_generating(&self) -> bool {
        self.pending_plan.is_some()
    }

    // -- Key dispatch --

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        // Clear status message on any keypress.
        self.status_message = None;

        if let Some(overlay) = self.overlay.take() {
            return self.handle_overlay_key(overlay, key);
        }

        match self.session.screen() {
            Screen::Onboarding => self.handle_wizard_key(key),
            Screen::Generating { .. } => {
                if key.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
                Ok(())
            }
            Screen::Failed { .. } => {
                match key.code {
                    KeyCode::Enter | KeyCode::Char('r') => {
                        self.session.dismiss_error();
                        self.wizard = Wizard::new();
                        self.field_cursor = 0;
                    }
                    KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
                    _ => {}
                }
                Ok(())
            }
            Screen::Dashboard { .. } => self.handle_dashboard_key(key),
        }
    }

    fn handle_overlay_key(&mut self, overlay: Overlay, key: KeyEvent) -> Result<()> {
        match overlay {
            Overlay::Help => {}
            Overlay::ConfirmReset => {
                if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                    self.session.reset()?;
                    self.wizard = Wizard::new();
                    self.field_cursor = 0;
                    self.status_message = Some("Plano apagado".to_string());
                }
            }
            Overlay::Alternatives(mut popup) => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => {
                    self.pending_alternatives = None;
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    if let AltState::Ready { selected, .. } = &mut popup.state {
                        *selected = selected.saturating_sub(1);
                    }
                    self.overlay = Some(Overlay::Alternatives(popup));
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if let AltState::Ready { options, selected } = &mut popup.state {
                        if *selected + 1 < options.len() {
                            *selected += 1;
                        }
                    }
                    self.overlay = Some(Overlay::Alternatives(popup));
                }
                KeyCode::Enter => match popup.state {
                    AltState::Ready {
                        mut options,
                        selected,
                    } if selected < options.len() => {
                        let replacement = options.swap_remove(selected);
                        let new_name = replacement.name.clone();
                        let old = self
                            .session
                            .substitute(popup.day, &popup.exercise_id, replacement)?;
                        self.status_message = Some(format!("{} -> {new_name}", old.name));
                    }
                    AltState::Loading => self.overlay = Some(Overlay::Alternatives(popup)),
                    _ => {}
                },
                _ => self.overlay = Some(Overlay::Alternatives(popup)),
            },
        }
        Ok(())
    }

    fn handle_wizard_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.overlay = Some(Overlay::Help),
            KeyCode::Up | KeyCode::Char('k') => {
                self.field_cursor = self.field_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.field_cursor + 1 < self.current_fields().len() {
                    self.field_cursor += 1;
                }
            }
            KeyCode::Left | KeyCode::Char('h') => self.adjust_field(-1),
            KeyCode::Right | KeyCode::Char('l') => self.adjust_field(1),
            KeyCode::PageDown => self.adjust_field(-10),
            KeyCode::PageUp => self.adjust_field(10),
            KeyCode::Char(' ') => self.activate_field(),
            KeyCode::Char('f') => self.mark_focus(),
            KeyCode::Enter => self.advance_wizard()?,
            KeyCode::Esc | KeyCode::Backspace => {
                if self.wizard.back().is_ok() {
                    self.field_cursor = 0;
                } else if key.code == KeyCode::Esc {
                    self.should_quit = true;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn activate_field(&mut self) {
        let Some(field) = self.selected_field() else {
            return;
        };
        let result = match field {
            WizardField::Gender(g) => {
                self.wizard.set_gender(g);
                Ok(())
            }
            WizardField::Goal(g) => {
                self.wizard.set_goal(g);
                Ok(())
            }
            WizardField::Experience(e) => {
                self.wizard.set_experience(e);
                Ok(())
            }
            WizardField::Location(l) => {
                self.wizard.set_location(l);
                Ok(())
            }
            WizardField::Day(d) => self.wizard.toggle_day(d),
            WizardField::Muscle(m) => self.wizard.toggle_muscle(m),
            WizardField::Weight | WizardField::Height | WizardField::Duration => Ok(()),
        };
        if let Err(e) = result {
            self.status_message = Some(e.to_string());
        }
    }

    fn adjust_field(&mut self, delta: i32) {
        let draft = self.wizard.draft();
        match self.selected_field() {
            Some(WizardField::Weight) => {
                let value = bump(draft.weight, delta);
                self.wizard.set_weight(value);
            }
            Some(WizardField::Height) => {
                let value = bump(draft.height, delta);
                self.wizard.set_height(value);
            }
            Some(WizardField::Duration) => self.wizard.nudge_duration(delta.signum()),
            _ => {}
        }
    }

    fn mark_focus(&mut self) {
        if let Some(WizardField::Muscle(m)) = self.selected_field() {
            if let Err(e) = self.wizard.set_focus_muscle(m) {
                self.status_message = Some(format!("{e} (selecione o músculo primeiro)"));
            }
        }
    }

    fn advance_wizard(&mut self) -> Result<()> {
        if !self.wizard.is_last_step() {
            match self.wizard.next() {
                Ok(_) => self.field_cursor = 0,
                Err(e) => self.status_message = Some(e.to_string()),
            }
            return Ok(());
        }

        let user = match self.wizard.submit() {
            Ok(user) => user,
            Err(e) => {
                self.status_message = Some(e.to_string());
                return Ok(());
            }
        };

        let pending = self.session.begin_submit(user)?;
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let _ = tx.send(pending.run().await);
        });
        self.pending_plan = Some(rx);
        Ok(())
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') => self.overlay = Some(Overlay::Help),
            KeyCode::Up | KeyCode::Char('k') => {
                self.dash_cursor = self.dash_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.dash_cursor + 1 < self.dashboard_rows().len() {
                    self.dash_cursor += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => match self.selected_row() {
                Some(DashRow::Day(i)) => self.toggle_day(i),
                Some(DashRow::Exercise { day, index }) => self.open_alternatives(day, index),
                None => {}
            },
            KeyCode::Char('s') => {
                if let Some(DashRow::Exercise { day, index }) = self.selected_row() {
                    self.open_alternatives(day, index);
                }
            }
            KeyCode::Char('x') => self.export_markdown()?,
            KeyCode::Char('R') => self.overlay = Some(Overlay::ConfirmReset),
            _ => {}
        }
        Ok(())
    }

    fn toggle_day(&mut self, day: usize) {
        self.dashboard.toggle(day);
        if let Some(pos) = self.dashboard_rows().iter().position(|r| *r == DashRow::Day(day)) {
            self.dash_cursor = pos;
        }
    }

    fn open_alternatives(&mut self, day: usize, index: usize) {
        let (Some(plan), Some(user)) = (self.session.plan(), self.session.user()) else {
            return;
        };
        let Some(exercise) = plan.days().get(day).and_then(|d| d.exercises.get(index)) else {
            return;
        };

        let name = exercise.name.clone();
        let muscle = exercise.muscle.clone();
        let location = user.location;
        self.overlay = Some(Overlay::Alternatives(AltPopup {
            day,
            exercise_id: exercise.id.clone(),
            exercise_name: name.clone(),
            state: AltState::Loading,
        }));

        let generator = self.session.generator();
        let settings = self.session.settings().clone();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let found =
                alternative_exercises(generator.as_ref(), &name, &muscle, location, &settings).await;
            let _ = tx.send(found);
        });
        self.pending_alternatives = Some(rx);
    }

    fn export_markdown(&mut self) -> Result<()> {
        let (Some(plan), Some(user)) = (self.session.plan(), self.session.user()) else {
            return Ok(());
        };
        let format = ExportFormat::Markdown;
        let path = self
            .export_dir
            .join(export::file_name(format, chrono::Local::now().date_naive()));
        std::fs::create_dir_all(&self.export_dir)
            .with_context(|| format!("failed to create {}", self.export_dir.display()))?;
        std::fs::write(&path, export::render(format, plan, user))
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "plan exported");
        self.status_message = Some(format!("Exportado para {}", path.display()));
        Ok(())
    }
}

fn bump(value: u32, delta: i32) -> u32 {
    (i64::from(value) + i64::from(delta)).clamp(1, 400) as u32
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
