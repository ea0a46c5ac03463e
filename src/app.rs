use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::api::Category;
use crate::config::AppConfig;
use crate::editor::{CategoryListEditor, Job, Notice, Outcome};
use crate::theme::Theme;

/// How long a status toast stays on the info line
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Help,
    ConfirmDelete,
}

pub struct App {
    pub editor: CategoryListEditor,
    pub focus: Focus,
    pub popup: Popup,
    pub selected: usize,

    // Status toast (shown in info line, auto-clears after timeout)
    pub status: Option<Notice>,
    pub status_time: Option<Instant>,

    pub notifications: bool,
    pub theme: Theme,

    // Requests run on their own tasks and report back here
    pending: usize,
    outcome_tx: mpsc::UnboundedSender<Outcome>,
    outcome_rx: mpsc::UnboundedReceiver<Outcome>,
}

impl App {
    pub fn new(editor: CategoryListEditor, config: &AppConfig) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            editor,
            focus: Focus::List,
            popup: Popup::None,
            selected: 0,
            status: None,
            status_time: None,
            notifications: config.notifications,
            theme: Theme::from_config(&config.theme),
            pending: 0,
            outcome_tx,
            outcome_rx,
        }
    }

    /// Initial fetch, the equivalent of mounting the list view
    pub fn load(&mut self) {
        self.dispatch(Job::Refresh);
    }

    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.editor.categories().get(self.selected)
    }

    /// `q` quits only from the list; in the input it is just a letter
    pub fn is_quit_key(&self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
            KeyCode::Char('q') => self.popup == Popup::None && self.focus == Focus::List,
            _ => false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.popup {
            Popup::None => match self.focus {
                Focus::List => self.handle_list_key(key),
                Focus::Input => self.handle_input_key(key),
            },
            Popup::Help => {
                if matches!(
                    key.code,
                    KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::Enter | KeyCode::Char('q')
                ) {
                    self.popup = Popup::None;
                }
            }
            Popup::ConfirmDelete => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    self.popup = Popup::None;
                    self.delete_selected();
                }
                KeyCode::Char('n') | KeyCode::Esc => self.popup = Popup::None,
                _ => {}
            },
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),

            // New category: any edit in progress is dropped
            KeyCode::Char('a') | KeyCode::Char('i') | KeyCode::Char('/') => {
                self.editor.cancel_edit();
                self.focus = Focus::Input;
            }

            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(category) = self.selected_category().cloned() {
                    self.editor.begin_edit(&category);
                    self.focus = Focus::Input;
                }
            }

            KeyCode::Char('d') | KeyCode::Delete => {
                if self.selected_category().is_some() {
                    self.popup = Popup::ConfirmDelete;
                }
            }

            KeyCode::Char('R') => self.dispatch(Job::Refresh),

            KeyCode::Esc => self.editor.cancel_edit(),

            KeyCode::Char('?') | KeyCode::Char('h') => self.popup = Popup::Help,

            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.editor.cancel_edit();
                self.focus = Focus::List;
            }
            KeyCode::Enter => {
                let job = if self.editor.editing().is_some() {
                    self.editor.prepare_save()
                } else {
                    let name = self.editor.new_name.clone();
                    self.editor.prepare_add(&name)
                };
                match job {
                    Some(job) => self.dispatch(job),
                    None => self.show_notice(),
                }
            }
            KeyCode::Backspace => {
                self.editor.input_mut().pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.editor.input_mut().push(c);
            }
            _ => {}
        }
    }

    fn delete_selected(&mut self) {
        let Some(category) = self.selected_category().cloned() else {
            return;
        };
        self.dispatch(Job::delete(&category.id, &category.name));
    }

    /// Run `job` in the background; its outcome is picked up by `tick`
    fn dispatch(&mut self, job: Job) {
        tracing::debug!(?job, "dispatching request");
        self.pending += 1;

        let api = self.editor.api();
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let outcome = job.run(api.as_ref()).await;
            // The receiver is gone only once the app has quit
            let _ = tx.send(outcome);
        });
    }

    fn finish(&mut self, outcome: Outcome) {
        self.pending = self.pending.saturating_sub(1);

        let was_editing = self.editor.editing().is_some();
        self.editor.apply(outcome);
        if was_editing && self.editor.editing().is_none() && self.focus == Focus::Input {
            self.focus = Focus::List;
        }

        self.clamp_selection();
        self.show_notice();
    }

    fn move_down(&mut self) {
        let len = self.editor.categories().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    fn move_up(&mut self) {
        let len = self.editor.categories().len();
        if len > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(len - 1);
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.editor.categories().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Move the editor's latest notice onto the info line
    fn show_notice(&mut self) {
        let Some(notice) = self.editor.take_notice() else {
            return;
        };
        if self.notifications {
            crate::notify::notify(&notice);
        }
        self.status = Some(notice);
        self.status_time = Some(Instant::now());
    }

    /// Periodic housekeeping from the main loop: apply finished requests and
    /// expire the status toast
    pub fn tick(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.finish(outcome);
        }

        if let Some(shown_at) = self.status_time {
            if shown_at.elapsed() >= STATUS_TIMEOUT {
                self.status = None;
                self.status_time = None;
            }
        }
    }

    /// Wait for every request in flight to finish
    #[cfg(test)]
    pub async fn settle(&mut self) {
        while self.pending > 0 {
            match self.outcome_rx.recv().await {
                Some(outcome) => self.finish(outcome),
                None => break,
            }
        }
    }
}
