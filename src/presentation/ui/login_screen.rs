//! Login and registration screen.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};
use serde_json::{Map, Value};

use crate::application::dto::{LoginRequest, RegisterRequest};
use crate::domain::{ApiError, Namespace};
use crate::presentation::ui::utils::stacked_height;
use crate::presentation::widgets::TextInput;

const LOGIN_FAILED: &str = "Login failed. Please try again.";
const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";

/// Which form the screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// Submission state of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Input,
    Submitting,
    Error,
    Success,
}

/// What the app should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginAction {
    None,
    Submit,
    Quit,
}

/// Registration payload key of each extra field, per namespace.
fn register_keys(namespace: Namespace) -> &'static [(&'static str, &'static str)] {
    match namespace {
        Namespace::Company => &[
            ("nom", "Company name"),
            ("telephone", "Phone"),
            ("adresse", "Address"),
        ],
        Namespace::Platform => &[("nom", "Name")],
    }
}

/// Message shown for a failed submission: the backend's own text when it
/// sent one, otherwise a generic line.
#[must_use]
pub fn failure_message(mode: AuthMode, err: &ApiError) -> String {
    err.backend_message().map_or_else(
        || match mode {
            AuthMode::Login => LOGIN_FAILED.to_string(),
            AuthMode::Register => REGISTRATION_FAILED.to_string(),
        },
        ToString::to_string,
    )
}

/// Login screen UI.
pub struct LoginScreen {
    namespace: Namespace,
    mode: AuthMode,
    email: TextInput,
    password: TextInput,
    extra: Vec<(&'static str, TextInput)>,
    focus: usize,
    state: LoginState,
    message: Option<String>,
}

impl LoginScreen {
    /// Creates the login form for a namespace.
    #[must_use]
    pub fn new(namespace: Namespace) -> Self {
        let mut screen = Self {
            namespace,
            mode: AuthMode::Login,
            email: TextInput::new("Email").placeholder("admin@example.com"),
            password: TextInput::new("Password").password(),
            extra: Vec::new(),
            focus: 0,
            state: LoginState::Input,
            message: None,
        };
        screen.sync_focus();
        screen
    }

    /// Submission state.
    #[must_use]
    pub const fn state(&self) -> LoginState {
        self.state
    }

    /// Login or registration.
    #[must_use]
    pub const fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Target namespace.
    #[must_use]
    pub const fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Success or error message shown under the form.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Switches between the company and platform consoles.
    pub fn set_namespace(&mut self, namespace: Namespace) {
        self.namespace = namespace;
        if self.mode == AuthMode::Register {
            self.build_register_fields();
        }
        self.sync_focus();
    }

    /// Switches between login and registration.
    pub fn set_mode(&mut self, mode: AuthMode) {
        self.mode = mode;
        match mode {
            AuthMode::Login => self.extra.clear(),
            AuthMode::Register => self.build_register_fields(),
        }
        self.focus = 0;
        self.sync_focus();
    }

    fn build_register_fields(&mut self) {
        self.extra = register_keys(self.namespace)
            .iter()
            .map(|(key, label)| (*key, TextInput::new(*label)))
            .collect();
    }

    fn field_count(&self) -> usize {
        self.extra.len() + 2
    }

    /// Inputs in display order: registration extras, email, password.
    fn input_mut(&mut self, index: usize) -> Option<&mut TextInput> {
        let extras = self.extra.len();
        match index {
            i if i < extras => self.extra.get_mut(i).map(|(_, input)| input),
            i if i == extras => Some(&mut self.email),
            i if i == extras + 1 => Some(&mut self.password),
            _ => None,
        }
    }

    fn inputs(&self) -> impl Iterator<Item = &TextInput> {
        self.extra
            .iter()
            .map(|(_, input)| input)
            .chain([&self.email, &self.password])
    }

    fn sync_focus(&mut self) {
        let focus = self.focus;
        for i in 0..self.field_count() {
            if let Some(input) = self.input_mut(i) {
                input.set_focused(i == focus);
            }
        }
    }

    fn move_focus(&mut self, forward: bool) {
        let count = self.field_count();
        self.focus = if forward {
            (self.focus + 1) % count
        } else {
            (self.focus + count - 1) % count
        };
        self.sync_focus();
    }

    fn is_complete(&self) -> bool {
        self.inputs().all(|input| !input.value().trim().is_empty())
    }

    /// Credentials for a login submission.
    #[must_use]
    pub fn login_request(&self) -> LoginRequest {
        LoginRequest::new(
            self.namespace,
            self.email.value(),
            self.password.value().to_string(),
        )
    }

    /// Payload for a registration submission.
    #[must_use]
    pub fn register_request(&self) -> RegisterRequest {
        let mut fields = Map::new();
        for (key, input) in &self.extra {
            fields.insert(
                (*key).to_string(),
                Value::String(input.value().trim().to_string()),
            );
        }
        fields.insert(
            "email".to_string(),
            Value::String(self.email.value().trim().to_string()),
        );
        RegisterRequest::new(self.namespace, fields, self.password.value().to_string())
    }

    /// Marks a request in flight.
    pub fn set_submitting(&mut self) {
        self.state = LoginState::Submitting;
        self.message = None;
    }

    /// Shows a success message and clears the password.
    pub fn set_success(&mut self, message: impl Into<String>) {
        self.state = LoginState::Success;
        self.message = Some(message.into());
        self.password.clear();
    }

    /// Shows an error; any key returns to input.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.state = LoginState::Error;
        self.message = Some(message.into());
    }

    /// Registration created an account without signing in.
    pub fn registration_created(&mut self, message: Option<String>) {
        self.set_mode(AuthMode::Login);
        self.password.clear();
        self.state = LoginState::Input;
        self.message = Some(
            message.unwrap_or_else(|| "Account created. You can now log in.".to_string()),
        );
    }

    /// Returns to input, keeping what was typed.
    pub fn reset(&mut self) {
        self.state = LoginState::Input;
        self.message = None;
    }

    /// Handles key event, returns action.
    pub fn handle_key(&mut self, key: KeyEvent) -> LoginAction {
        if matches!(self.state, LoginState::Submitting | LoginState::Success) {
            return LoginAction::None;
        }

        if self.state == LoginState::Error {
            self.reset();
            return LoginAction::None;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return LoginAction::Quit,
            KeyCode::Enter => {
                if self.is_complete() {
                    return LoginAction::Submit;
                }
                self.move_focus(true);
            }
            KeyCode::Char('n') if ctrl => self.set_namespace(self.namespace.toggled()),
            KeyCode::Char('r') if ctrl => {
                let next = match self.mode {
                    AuthMode::Login => AuthMode::Register,
                    AuthMode::Register => AuthMode::Login,
                };
                self.message = None;
                self.set_mode(next);
            }
            KeyCode::Tab | KeyCode::Down => self.move_focus(true),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(false),
            code => {
                let focus = self.focus;
                if let Some(input) = self.input_mut(focus) {
                    match code {
                        KeyCode::Char(c) if !ctrl => input.input_char(c),
                        KeyCode::Backspace => input.backspace(),
                        KeyCode::Delete => input.delete(),
                        KeyCode::Left => input.move_left(),
                        KeyCode::Right => input.move_right(),
                        KeyCode::Home => input.move_start(),
                        KeyCode::End => input.move_end(),
                        _ => {}
                    }
                }
            }
        }

        LoginAction::None
    }

    fn status_line(&self) -> Line<'_> {
        let hint = Style::default().fg(Color::DarkGray);
        match self.state {
            LoginState::Input => match &self.message {
                Some(msg) => Line::from(Span::styled(msg.as_str(), Style::default().fg(Color::Green))),
                None => Line::from(vec![
                    Span::styled("Enter: submit", hint),
                    Span::raw(" | "),
                    Span::styled("Ctrl+N: console", hint),
                    Span::raw(" | "),
                    Span::styled("Ctrl+R: login/register", hint),
                    Span::raw(" | "),
                    Span::styled("Esc: quit", hint),
                ]),
            },
            LoginState::Submitting => Line::from(Span::styled(
                match self.mode {
                    AuthMode::Login => "Signing in...",
                    AuthMode::Register => "Creating account...",
                },
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )),
            LoginState::Error => Line::from(Span::styled(
                format!("Error: {}", self.message.as_deref().unwrap_or(LOGIN_FAILED)),
                Style::default().fg(Color::Red),
            )),
            LoginState::Success => Line::from(Span::styled(
                self.message.as_deref().unwrap_or("Signed in"),
                Style::default().fg(Color::Green),
            )),
        }
    }

    fn render_inner(&self, area: Rect, buf: &mut Buffer) {
        let inputs: Vec<&TextInput> = self.inputs().collect();
        let form_height = stacked_height(inputs.len()) + 6;

        let [_, center, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(form_height),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [_, content_area, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(60),
            Constraint::Fill(1),
        ])
        .areas(center);

        Clear.render(content_area, buf);

        let title = match self.mode {
            AuthMode::Login => format!(" {} login ", self.namespace.title()),
            AuthMode::Register => format!(" {} registration ", self.namespace.title()),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title);
        let inner = block.inner(content_area);
        block.render(content_area, buf);

        let [intro_area, _, fields_area, _, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(stacked_height(inputs.len())),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .areas(inner);

        let intro = match self.mode {
            AuthMode::Login => "Sign in with your administrator account",
            AuthMode::Register => "Create an administrator account",
        };
        Paragraph::new(intro)
            .style(Style::default().fg(Color::White))
            .render(intro_area, buf);

        let rows = Layout::vertical(inputs.iter().map(|_| Constraint::Length(3))).split(fields_area);
        for (input, row) in inputs.iter().zip(rows.iter()) {
            (*input).render(*row, buf);
        }

        Paragraph::new(self.status_line())
            .wrap(Wrap { trim: true })
            .render(status_area, buf);
    }
}

impl Widget for &LoginScreen {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_inner(area, buf);
    }
}
