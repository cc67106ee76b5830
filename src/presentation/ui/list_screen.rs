//! Generic list tab: stats, filters, table and CRUD modals for one resource.

use std::path::PathBuf;

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Paragraph, StatefulWidget, TableState, Widget},
};
use tracing::{error, warn};

use super::console_tab::{ConsoleTab, KeyOutcome, TabEffect, TabEvent, erase};
use crate::application::services::{ListController, ListEvent, LoadState, Mutation};
use crate::domain::crud::CrudState;
use crate::domain::filter::DateRange;
use crate::domain::resource::Resource;
use crate::infrastructure::export::export_csv;
use crate::presentation::widgets::{
    ConfirmDialog, DataTable, FilterBar, FormModal, KeyHint, StatsBar, StatusBar, StatusLevel,
    TextInput,
};

const HINTS: &[KeyHint] = &[
    ("↑↓", "Select"),
    ("/", "Search"),
    ("f", "Facet"),
    ("F", "Next facet"),
    ("d", "Dates"),
    ("n", "New"),
    ("e", "Edit"),
    ("x", "Delete"),
    ("c", "Export"),
    ("r", "Reload"),
];

const MODAL_HINTS: &[KeyHint] = &[("Enter", "Save"), ("Esc", "Cancel")];
const CONFIRM_HINTS: &[KeyHint] = &[("y", "Delete"), ("n", "Keep")];
const PROMPT_HINTS: &[KeyHint] = &[("Enter", "Apply"), ("Esc", "Clear")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptKind {
    Search,
    Dates,
}

struct Prompt {
    kind: PromptKind,
    input: TextInput,
}

/// List tab over one collection.
pub struct ListScreen<R: Resource> {
    controller: ListController<R>,
    table: TableState,
    prompt: Option<Prompt>,
    facet: usize,
    notice: Option<(StatusLevel, String)>,
    export_dir: PathBuf,
}

impl<R: Resource> ListScreen<R> {
    /// Creates a tab exporting into `export_dir`.
    #[must_use]
    pub fn new(controller: ListController<R>, export_dir: PathBuf) -> Self {
        Self {
            controller,
            table: TableState::default(),
            prompt: None,
            facet: 0,
            notice: None,
            export_dir,
        }
    }

    /// Underlying controller.
    #[must_use]
    pub const fn controller(&self) -> &ListController<R> {
        &self.controller
    }

    fn selected(&self) -> Option<R> {
        let index = self.table.selected().unwrap_or(0);
        self.controller.visible().get(index).map(|r| (*r).clone())
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.controller.visible().len();
        if len == 0 {
            self.table.select(None);
            return;
        }
        let current = self.table.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(len - 1);
        self.table.select(Some(next));
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.code == KeyCode::Esc {
            self.controller.cancel();
            return KeyOutcome::Consumed;
        }
        if key.code == KeyCode::Enter {
            return self
                .controller
                .submit()
                .map_or(KeyOutcome::Consumed, |effect| KeyOutcome::Spawn(erase(effect)));
        }
        if self.controller.is_mutating() {
            return KeyOutcome::Consumed;
        }
        let Some(form) = self.controller.crud_mut().form_mut() else {
            return KeyOutcome::Consumed;
        };
        match key.code {
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Left => form.cycle_choice(false),
            KeyCode::Right => form.cycle_choice(true),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                form.input_char(c);
            }
            _ => {}
        }
        KeyOutcome::Consumed
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Char('y' | 'Y') => self
                .controller
                .confirm_delete()
                .map_or(KeyOutcome::Consumed, |effect| KeyOutcome::Spawn(erase(effect))),
            KeyCode::Char('n' | 'N') | KeyCode::Esc if !self.controller.is_mutating() => {
                self.controller.cancel();
                KeyOutcome::Consumed
            }
            _ => KeyOutcome::Consumed,
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let Some(prompt) = self.prompt.as_mut() else {
            return KeyOutcome::Ignored;
        };
        match key.code {
            KeyCode::Esc => {
                match prompt.kind {
                    PromptKind::Search => self.controller.filter_mut().set_search(""),
                    PromptKind::Dates => self.controller.filter_mut().set_dates(None),
                }
                self.prompt = None;
            }
            KeyCode::Enter => {
                let kind = prompt.kind;
                let text = prompt.input.take();
                self.prompt = None;
                if kind == PromptKind::Dates {
                    self.apply_dates(&text);
                }
            }
            code => {
                match code {
                    KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                        prompt.input.input_char(c);
                    }
                    KeyCode::Backspace => prompt.input.backspace(),
                    KeyCode::Left => prompt.input.move_left(),
                    KeyCode::Right => prompt.input.move_right(),
                    KeyCode::Home => prompt.input.move_start(),
                    KeyCode::End => prompt.input.move_end(),
                    KeyCode::Delete => prompt.input.delete(),
                    _ => {}
                }
                if prompt.kind == PromptKind::Search {
                    let search = prompt.input.value().to_string();
                    self.controller.filter_mut().set_search(search);
                    self.table.select(Some(0));
                }
            }
        }
        KeyOutcome::Consumed
    }

    fn apply_dates(&mut self, text: &str) {
        if text.trim().is_empty() {
            self.controller.filter_mut().set_dates(None);
            return;
        }
        match DateRange::parse(text) {
            Ok(range) => {
                self.controller.filter_mut().set_dates(Some(range));
                self.table.select(Some(0));
            }
            Err(e) => self.notice = Some((StatusLevel::Warning, e.to_string())),
        }
    }

    fn open_prompt(&mut self, kind: PromptKind) {
        let (label, current) = match kind {
            PromptKind::Search => ("Search", self.controller.filter().search().to_string()),
            PromptKind::Dates => (
                "Dates (YYYY-MM-DD..YYYY-MM-DD)",
                self.controller
                    .filter()
                    .dates()
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
            ),
        };
        let mut input = TextInput::new(label);
        input.set_value(current);
        input.set_focused(true);
        self.prompt = Some(Prompt { kind, input });
    }

    fn export(&mut self) {
        let visible = self.controller.visible();
        self.notice = Some(match export_csv(&visible, &self.export_dir, Local::now()) {
            Ok(path) => (
                StatusLevel::Success,
                format!("Exported {} rows to {}", visible.len(), path.display()),
            ),
            Err(e) => {
                error!(collection = R::KIND.collection(), error = %e, "Export failed");
                (StatusLevel::Error, format!("Export failed: {e}"))
            }
        });
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> KeyOutcome {
        self.notice = None;
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Home => self.table.select(Some(0)),
            KeyCode::End => self.move_selection(isize::MAX),
            KeyCode::Char('/') => self.open_prompt(PromptKind::Search),
            KeyCode::Char('d') => self.open_prompt(PromptKind::Dates),
            KeyCode::Char('f') => {
                if let Some(facet) = R::facets().get(self.facet) {
                    self.controller.filter_mut().cycle_facet(facet);
                    self.table.select(Some(0));
                }
            }
            KeyCode::Char('F') => {
                if !R::facets().is_empty() {
                    self.facet = (self.facet + 1) % R::facets().len();
                }
            }
            KeyCode::Esc if self.controller.filter().is_active() => {
                self.controller.filter_mut().clear();
            }
            KeyCode::Char('n') => {
                if !self.controller.open_create() {
                    self.notice = Some(not_offered("Creating"));
                }
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(target) = self.selected()
                    && !self.controller.open_edit(target)
                {
                    self.notice = Some(not_offered("Editing"));
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(target) = self.selected()
                    && !self.controller.request_delete(target)
                {
                    self.notice = Some(not_offered("Deleting"));
                }
            }
            KeyCode::Char('c') => self.export(),
            KeyCode::Char('r') => return KeyOutcome::Spawn(erase(self.controller.load())),
            _ => return KeyOutcome::Ignored,
        }
        KeyOutcome::Consumed
    }

    fn placeholder(&self) -> String {
        match self.controller.state() {
            LoadState::Idle | LoadState::Loading => "Loading...".to_string(),
            LoadState::Failed(message) => format!("Failed to load: {message}  (r to retry)"),
            LoadState::Loaded if self.controller.filter().is_active() => {
                "No records match the filter".to_string()
            }
            LoadState::Loaded => "No records".to_string(),
        }
    }

    fn status_bar(&self) -> StatusBar {
        if let Some(alert) = self.controller.alert()
            && !self.controller.crud().is_open()
        {
            return StatusBar::error(alert);
        }
        let right = if self.controller.is_mutating() {
            "Saving..."
        } else if *self.controller.state() == LoadState::Loading {
            "Loading..."
        } else {
            ""
        };
        let bar = StatusBar::new().right(right);
        match &self.notice {
            Some((level, message)) => bar.center(message.as_str()).level(*level),
            None => bar,
        }
    }

    fn render_modal(&self, area: Rect, buf: &mut Buffer) {
        let alert = self.controller.alert();
        match self.controller.crud() {
            CrudState::Closed => {}
            CrudState::Creating { form } => {
                FormModal::new(format!("{}: new record", R::KIND.title()), form)
                    .alert(alert)
                    .busy(self.controller.is_mutating())
                    .render(area, buf);
            }
            CrudState::Editing { target, form } => {
                FormModal::new(format!("{}: edit {}", R::KIND.title(), target.label()), form)
                    .alert(alert)
                    .busy(self.controller.is_mutating())
                    .render(area, buf);
            }
            CrudState::ConfirmingDelete { target } => {
                ConfirmDialog::new(
                    "Delete",
                    format!("Delete {}? This cannot be undone.", target.label()),
                )
                .alert(alert)
                .render(area, buf);
            }
        }
    }
}

fn not_offered(action: &str) -> (StatusLevel, String) {
    (
        StatusLevel::Warning,
        format!("{action} is not available in this tab"),
    )
}

impl<R: Resource> ConsoleTab for ListScreen<R> {
    fn title(&self) -> &'static str {
        R::KIND.title()
    }

    fn start(&mut self) -> Option<TabEffect> {
        Some(erase(self.controller.load()))
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if self.controller.crud().form().is_some() {
            return self.handle_form_key(key);
        }
        if self.controller.crud().pending_delete().is_some() {
            return self.handle_confirm_key(key);
        }
        if self.prompt.is_some() {
            return self.handle_prompt_key(key);
        }
        self.handle_list_key(key)
    }

    fn apply(&mut self, event: TabEvent) -> Option<TabEffect> {
        let event = match event.downcast::<ListEvent<R>>() {
            Ok(event) => *event,
            Err(_) => {
                warn!(collection = R::KIND.collection(), "Dropped event for another tab");
                return None;
            }
        };
        if let ListEvent::Mutated(kind, Ok(())) = &event {
            let verb = match kind {
                Mutation::Created => "created",
                Mutation::Updated => "updated",
                Mutation::Deleted => "deleted",
            };
            self.notice = Some((StatusLevel::Success, format!("Record {verb}")));
        }
        self.controller.apply(event).map(erase)
    }

    fn captures_input(&self) -> bool {
        self.prompt.is_some() || self.controller.crud().is_open()
    }

    fn key_hints(&self) -> &'static [KeyHint] {
        match self.controller.crud() {
            CrudState::Creating { .. } | CrudState::Editing { .. } => MODAL_HINTS,
            CrudState::ConfirmingDelete { .. } => CONFIRM_HINTS,
            CrudState::Closed if self.prompt.is_some() => PROMPT_HINTS,
            CrudState::Closed => HINTS,
        }
    }

    fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let figures: Vec<(String, String)> = self
            .controller
            .stats()
            .into_iter()
            .map(|s| (s.label, s.value.to_string()))
            .collect();

        let [stats_area, filter_area, table_area, status_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        StatsBar::new(&figures).render(stats_area, buf);

        let visible = self.controller.visible();
        let shown = visible.len();
        let rows: Vec<Vec<String>> = visible.iter().map(|r| r.cells()).collect();
        let prompt = self
            .prompt
            .as_ref()
            .map(|p| (p.input.label(), p.input.value()));
        FilterBar::new(self.controller.filter(), R::facets())
            .prompt(prompt)
            .counts(shown, self.controller.items().len())
            .render(filter_area, buf);

        let placeholder = self.placeholder();
        let mut table = DataTable::new(R::KIND.title(), R::columns(), rows).placeholder(&placeholder);
        if matches!(self.controller.state(), LoadState::Failed(_)) {
            table = table.failed();
        }
        StatefulWidget::render(table, table_area, buf, &mut self.table);

        (&self.status_bar()).render(status_area, buf);

        if R::capabilities().is_empty() && !self.controller.crud().is_open() {
            Paragraph::new("read-only")
                .style(Style::default().fg(Color::DarkGray))
                .right_aligned()
                .render(filter_area, buf);
        }

        self.render_modal(area, buf);
    }
}
