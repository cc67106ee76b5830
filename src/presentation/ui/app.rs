//! Main application orchestrator.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent};
use futures_util::StreamExt;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
};
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, error, info, warn};

use super::console_tab::{ConsoleTab, KeyOutcome, TabEffect, TabEvent};
use super::dashboard_screen::DashboardScreen;
use super::list_screen::ListScreen;
use super::login_screen::{AuthMode, LoginAction, LoginScreen, failure_message};
use crate::application::dto::{LoginResponse, RegisterResponse};
use crate::application::services::{DashboardController, ListController};
use crate::application::use_cases::{
    LoginUseCase, LogoutUseCase, RegisterUseCase, ResolveSessionUseCase,
};
use crate::domain::entities::{Bus, Company, ETicket, Payment, Review, Trip, User};
use crate::domain::ports::{ResourcePort, SessionStorePort};
use crate::domain::{ApiError, ListScope, Namespace, Resource};
use crate::infrastructure::{ApiClient, AppConfig, SessionEvent};
use crate::presentation::events::{EventHandler, EventResult};
use crate::presentation::widgets::{FooterBar, HeaderBar};

const REDRAW_INTERVAL: Duration = Duration::from_millis(250);
const GLOBAL_KEYS: &str = "Tab/1-5: switch  L: logout  q: quit";

#[derive(Debug)]
enum Action {
    LoginFinished(Result<LoginResponse, ApiError>),
    RegisterFinished(Result<RegisterResponse, ApiError>),
    OpenConsole {
        generation: u64,
        namespace: Namespace,
    },
    Tab {
        generation: u64,
        index: usize,
        event: TabEvent,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AppState {
    Login,
    Console,
    Exiting,
}

struct Console {
    namespace: Namespace,
    tabs: Vec<Box<dyn ConsoleTab>>,
    titles: Vec<&'static str>,
    active: usize,
}

enum CurrentScreen {
    Login(LoginScreen),
    Console(Console),
}

/// Terminal application: login screen and the consoles.
pub struct App {
    state: AppState,
    screen: CurrentScreen,
    config: AppConfig,
    api: Arc<ApiClient>,
    login_use_case: Arc<LoginUseCase>,
    register_use_case: Arc<RegisterUseCase>,
    logout_use_case: LogoutUseCase,
    resolve_session_use_case: ResolveSessionUseCase,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    session_rx: mpsc::UnboundedReceiver<SessionEvent>,
    generation: u64,
}

impl App {
    /// Creates the application on the login screen.
    #[must_use]
    pub fn new(
        config: AppConfig,
        api: Arc<ApiClient>,
        session_store: Arc<dyn SessionStorePort>,
        session_rx: mpsc::UnboundedReceiver<SessionEvent>,
    ) -> Self {
        let login_use_case = LoginUseCase::new(api.clone(), Arc::clone(&session_store));
        let register_use_case = RegisterUseCase::new(api.clone(), Arc::clone(&session_store));
        let logout_use_case = LogoutUseCase::new(Arc::clone(&session_store));
        let resolve_session_use_case = ResolveSessionUseCase::new(session_store);
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let namespace = config.namespace.unwrap_or(config.ui.default_namespace);

        Self {
            state: AppState::Login,
            screen: CurrentScreen::Login(LoginScreen::new(namespace)),
            config,
            api,
            login_use_case: Arc::new(login_use_case),
            register_use_case: Arc::new(register_use_case),
            logout_use_case,
            resolve_session_use_case,
            action_tx,
            action_rx,
            session_rx,
            generation: 0,
        }
    }

    /// # Errors
    /// Returns error if drawing to the terminal fails.
    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        match self
            .resolve_session_use_case
            .execute(self.config.namespace, Utc::now())
            .await
        {
            Ok(Some(token)) => self.enter_console(token.namespace()).await,
            Ok(None) => debug!("No stored session, showing login"),
            Err(e) => warn!(error = %e, "Could not read stored session"),
        }

        self.run_event_loop(terminal).await?;

        info!("Application exiting normally");
        Ok(())
    }

    async fn run_event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mut terminal_events = EventStream::new();
        let mut redraw = interval(REDRAW_INTERVAL);

        terminal.draw(|frame| self.render(frame))?;

        while self.state != AppState::Exiting {
            tokio::select! {
                biased;

                Some(event) = self.session_rx.recv() => {
                    self.handle_session_event(event);
                }

                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action).await;
                }

                Some(Ok(event)) = terminal_events.next() => {
                    if self.handle_terminal_event(event).await == EventResult::Exit {
                        self.state = AppState::Exiting;
                    }
                }

                _ = redraw.tick() => {}
            }
            terminal.draw(|frame| self.render(frame))?;
        }

        Ok(())
    }

    async fn handle_terminal_event(&mut self, event: Event) -> EventResult {
        match event {
            Event::Key(key) if EventHandler::is_press(&key) => self.handle_key(key).await,
            _ => EventResult::Continue,
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        match &mut self.screen {
            CurrentScreen::Login(screen) => {
                frame.render_widget(&*screen, frame.area());
            }
            CurrentScreen::Console(console) => {
                let [header, body, footer] = Layout::vertical([
                    Constraint::Length(1),
                    Constraint::Fill(1),
                    Constraint::Length(1),
                ])
                .areas(frame.area());

                frame.render_widget(
                    HeaderBar::new(crate::NAME, crate::VERSION, console.namespace)
                        .tabs(&console.titles, console.active),
                    header,
                );
                if let Some(tab) = console.tabs.get_mut(console.active) {
                    let hints = tab.key_hints();
                    tab.render(body, frame.buffer_mut());
                    frame.render_widget(
                        FooterBar::new(hints).right_info(Some(GLOBAL_KEYS)),
                        footer,
                    );
                }
            }
        }
    }

    async fn handle_key(&mut self, key: KeyEvent) -> EventResult {
        if EventHandler::is_force_quit(&key) {
            return EventResult::Exit;
        }

        match &mut self.screen {
            CurrentScreen::Login(screen) => match screen.handle_key(key) {
                LoginAction::Quit => EventResult::Exit,
                LoginAction::Submit => {
                    self.submit_login();
                    EventResult::Consumed
                }
                LoginAction::None => EventResult::Consumed,
            },
            CurrentScreen::Console(console) => {
                let Some(tab) = console.tabs.get_mut(console.active) else {
                    return EventResult::Continue;
                };
                if tab.captures_input() {
                    if let KeyOutcome::Spawn(effect) = tab.handle_key(key) {
                        let index = console.active;
                        self.spawn_tab_effect(index, effect);
                    }
                    return EventResult::Consumed;
                }

                if EventHandler::is_quit_event(&key) {
                    return EventResult::Exit;
                }
                if let Some(index) = EventHandler::tab_index(&key) {
                    if index < console.tabs.len() {
                        console.active = index;
                    }
                    return EventResult::Consumed;
                }
                match key.code {
                    KeyCode::Tab => {
                        console.active = (console.active + 1) % console.tabs.len();
                        return EventResult::Consumed;
                    }
                    KeyCode::BackTab => {
                        let count = console.tabs.len();
                        console.active = (console.active + count - 1) % count;
                        return EventResult::Consumed;
                    }
                    KeyCode::Char('L') => {
                        let namespace = console.namespace;
                        self.logout(namespace).await;
                        return EventResult::Consumed;
                    }
                    _ => {}
                }

                match tab.handle_key(key) {
                    KeyOutcome::Spawn(effect) => {
                        let index = console.active;
                        self.spawn_tab_effect(index, effect);
                        EventResult::Consumed
                    }
                    KeyOutcome::Consumed => EventResult::Consumed,
                    KeyOutcome::Ignored => EventResult::Continue,
                }
            }
        }
    }

    fn submit_login(&mut self) {
        let CurrentScreen::Login(screen) = &mut self.screen else {
            return;
        };
        let tx = self.action_tx.clone();

        match screen.mode() {
            AuthMode::Login => {
                let request = screen.login_request();
                let use_case = Arc::clone(&self.login_use_case);
                tokio::spawn(async move {
                    let _ = tx.send(Action::LoginFinished(use_case.execute(request).await));
                });
            }
            AuthMode::Register => {
                let request = screen.register_request();
                let use_case = Arc::clone(&self.register_use_case);
                tokio::spawn(async move {
                    let _ = tx.send(Action::RegisterFinished(use_case.execute(request).await));
                });
            }
        }
        screen.set_submitting();
    }

    fn spawn_tab_effect(&self, index: usize, effect: TabEffect) {
        let tx = self.action_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let event = effect.await;
            let _ = tx.send(Action::Tab {
                generation,
                index,
                event,
            });
        });
    }

    fn schedule_console(&self, namespace: Namespace) {
        let tx = self.action_tx.clone();
        let generation = self.generation;
        let delay = self.config.ui.login_redirect_delay();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Action::OpenConsole {
                generation,
                namespace,
            });
        });
    }

    async fn handle_action(&mut self, action: Action) {
        match action {
            Action::LoginFinished(result) => {
                let CurrentScreen::Login(screen) = &mut self.screen else {
                    return;
                };
                match result {
                    Ok(response) => {
                        info!(namespace = %response.namespace, "Login successful");
                        screen.set_success("Login successful. Opening console...");
                        self.schedule_console(response.namespace);
                    }
                    Err(e) => {
                        error!(error = %e, "Login failed");
                        screen.set_error(failure_message(AuthMode::Login, &e));
                    }
                }
            }
            Action::RegisterFinished(result) => {
                let CurrentScreen::Login(screen) = &mut self.screen else {
                    return;
                };
                match result {
                    Ok(RegisterResponse::SignedIn(response)) => {
                        info!(namespace = %response.namespace, "Registered and signed in");
                        screen.set_success("Account created. Opening console...");
                        self.schedule_console(response.namespace);
                    }
                    Ok(RegisterResponse::Created { message }) => {
                        info!("Registered without session");
                        screen.registration_created(message);
                    }
                    Err(e) => {
                        error!(error = %e, "Registration failed");
                        screen.set_error(failure_message(AuthMode::Register, &e));
                    }
                }
            }
            Action::OpenConsole {
                generation,
                namespace,
            } => {
                if generation == self.generation && self.state == AppState::Login {
                    self.enter_console(namespace).await;
                }
            }
            Action::Tab {
                generation,
                index,
                event,
            } => {
                if generation != self.generation {
                    debug!(generation, current = self.generation, "Dropped stale tab result");
                    return;
                }
                let CurrentScreen::Console(console) = &mut self.screen else {
                    return;
                };
                let follow_up = console.tabs.get_mut(index).and_then(|tab| tab.apply(event));
                if let Some(effect) = follow_up {
                    self.spawn_tab_effect(index, effect);
                }
            }
        }
    }

    fn handle_session_event(&mut self, event: SessionEvent) {
        let SessionEvent::Expired(namespace) = event;
        let affected = match &self.screen {
            CurrentScreen::Console(console) => console.namespace == namespace,
            CurrentScreen::Login(_) => false,
        };
        if affected {
            warn!(%namespace, "Session expired");
            self.transition_to_login(namespace, Some("Session expired. Please log in again."));
        }
    }

    async fn enter_console(&mut self, namespace: Namespace) {
        self.generation += 1;
        self.api.set_namespace(namespace);

        let scope = match self.resolve_session_use_case.list_scope(namespace).await {
            Ok(scope) => scope,
            Err(e) => {
                error!(%namespace, error = %e, "Cannot open console");
                self.transition_to_login(namespace, Some(&e.to_string()));
                return;
            }
        };

        info!(%namespace, ?scope, "Entering console");
        let tabs = build_tabs(&self.api, &scope, &self.config.effective_export_dir());
        let titles = tabs.iter().map(|t| t.title()).collect();
        self.state = AppState::Console;
        self.screen = CurrentScreen::Console(Console {
            namespace,
            tabs,
            titles,
            active: 0,
        });

        if let CurrentScreen::Console(console) = &mut self.screen {
            let starts: Vec<(usize, TabEffect)> = console
                .tabs
                .iter_mut()
                .enumerate()
                .filter_map(|(i, tab)| tab.start().map(|effect| (i, effect)))
                .collect();
            for (index, effect) in starts {
                self.spawn_tab_effect(index, effect);
            }
        }
    }

    async fn logout(&mut self, namespace: Namespace) {
        if let Err(e) = self.logout_use_case.execute(namespace).await {
            error!(%namespace, error = %e, "Logout failed to clear the session");
        }
        info!(%namespace, "Logged out");
        self.transition_to_login(namespace, None);
    }

    fn transition_to_login(&mut self, namespace: Namespace, error: Option<&str>) {
        self.generation += 1;
        self.state = AppState::Login;
        let mut screen = LoginScreen::new(namespace);
        if let Some(message) = error {
            screen.set_error(message);
        }
        self.screen = CurrentScreen::Login(screen);
    }
}

fn list_tab<R: Resource>(
    api: &Arc<ApiClient>,
    scope: &ListScope,
    export_dir: &Path,
) -> Box<dyn ConsoleTab> {
    let port: Arc<dyn ResourcePort<R>> = api.clone();
    Box::new(ListScreen::new(
        ListController::new(port, scope.clone()),
        export_dir.to_path_buf(),
    ))
}

/// Tabs of the console for a scope: the company console with its dashboard,
/// or the platform console.
fn build_tabs(api: &Arc<ApiClient>, scope: &ListScope, export_dir: &Path) -> Vec<Box<dyn ConsoleTab>> {
    match scope {
        ListScope::Company(company_id) => vec![
            Box::new(DashboardScreen::new(DashboardController::new(
                api.clone(),
                company_id.clone(),
            ))),
            list_tab::<Bus>(api, scope, export_dir),
            list_tab::<Trip>(api, scope, export_dir),
            list_tab::<ETicket>(api, scope, export_dir),
            list_tab::<Payment>(api, scope, export_dir),
        ],
        ListScope::All => vec![
            list_tab::<Company>(api, scope, export_dir),
            list_tab::<User>(api, scope, export_dir),
            list_tab::<Review>(api, scope, export_dir),
            list_tab::<Payment>(api, scope, export_dir),
            list_tab::<ETicket>(api, scope, export_dir),
        ],
    }
}
