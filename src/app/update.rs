use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::time::Duration;

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ModalState, Settings};
use crate::source::{self, HttpUserSource, Loader};
use crate::ui;

/// What the loop should do after a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, settings: &Settings) -> Result<()> {
    let mut app = AppState::from_settings(settings);

    let mut rng = rand::thread_rng();

    let mut loader: Option<Loader> = None;
    if settings.variant.is_remote() {
        tracing::info!(url = %settings.url, "fetching initial records");
        match HttpUserSource::new(settings.url.clone()) {
            Ok(src) => loader = Some(source::spawn_load(src)),
            Err(e) => app.apply_loaded(Err(e), &mut rng),
        }
    }

    loop {
        terminal.draw(|f| {
            ui::render(f, &app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(&mut app, key) == Flow::Quit {
                    break;
                }
            }
        }

        if let Some(result) = loader.as_ref().and_then(Loader::poll) {
            app.apply_loaded(result, &mut rng);
            loader = None;
        }
    }

    tracing::info!(uptime = ?app.started_at.elapsed(), "exiting");
    Ok(())
}

/// Apply one key press to the state.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Flow {
    match app.input_mode {
        InputMode::Normal => return handle_normal_key(app, key),
        InputMode::Modal => handle_modal_key(app, key.code),
        InputMode::Search => match key.code {
            KeyCode::Enter => app.input_mode = InputMode::Normal,
            KeyCode::Esc => {
                app.set_search(String::new());
                app.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => app.pop_search(),
            KeyCode::Char(c) => app.push_search(c),
            _ => {}
        },
        InputMode::Form(field) => match key.code {
            KeyCode::Esc => app.input_mode = InputMode::Normal,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                app.input_mode = InputMode::Form(field.next());
            }
            KeyCode::Enter => {
                app.submit_form();
            }
            KeyCode::Backspace => app.store.pop_char(field),
            KeyCode::Char(c) => app.store.push_char(field, c),
            _ => {}
        },
    }
    Flow::Continue
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) -> Flow {
    if let KeyCode::Char(c @ '1'..='9') = key.code {
        if app.pager.is_some() {
            app.go_to_page(c as usize - '0' as usize);
            return Flow::Continue;
        }
    }
    let Some(action) = app.keymap.resolve(&key) else {
        return Flow::Continue;
    };
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::StartSearch => app.input_mode = InputMode::Search,
        KeyAction::FocusForm => app.start_add(),
        KeyAction::EditSelection => {
            app.edit_selected();
        }
        KeyAction::DeleteSelection => app.request_delete_selected(),
        KeyAction::ClearForm => app.clear_form(),
        KeyAction::SubmitForm => {
            app.submit_form();
        }
        KeyAction::OpenHelp => app.open_modal(ModalState::Help),
        KeyAction::MoveUp => app.move_up(),
        KeyAction::MoveDown => app.move_down(),
        KeyAction::PreviousPage => {
            app.previous_page();
        }
        KeyAction::NextPage => {
            app.next_page();
        }
        KeyAction::Ignore => {}
    }
    Flow::Continue
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    match &mut app.modal {
        Some(ModalState::Info { .. }) | Some(ModalState::Help) => match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.close_modal(),
            _ => {}
        },
        Some(ModalState::DeleteConfirm { id, selected }) => match code {
            KeyCode::Esc | KeyCode::Char('n') => app.close_modal(),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                *selected = 1 - *selected;
            }
            KeyCode::Char('y') => {
                let id = *id;
                app.close_modal();
                app.delete(id);
            }
            KeyCode::Enter => {
                let (id, confirmed) = (*id, *selected == 0);
                app.close_modal();
                if confirmed {
                    app.delete(id);
                }
            }
            _ => {}
        },
        None => app.close_modal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Variant;
    use crate::table::{FormField, Record};
    use crossterm::event::KeyModifiers;

    fn press(app: &mut AppState, code: KeyCode) -> Flow {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut AppState, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn add_through_form_keys() {
        let mut app = AppState::new(Variant::Static);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.input_mode, InputMode::Form(FormField::Name));
        type_str(&mut app, "Dana");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "41");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.store.records.last(), Some(&Record::new(4, "Dana", 41)));
    }

    #[test]
    fn empty_form_opens_blocking_alert() {
        let mut app = AppState::new(Variant::Static);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.input_mode, InputMode::Modal);
        assert_eq!(
            app.modal,
            Some(ModalState::Info { message: "Please fill in all fields.".to_string() })
        );
        // keys other than dismiss are swallowed
        press(&mut app, KeyCode::Char('x'));
        assert!(app.modal.is_some());
        press(&mut app, KeyCode::Esc);
        assert!(app.modal.is_none());
        assert_eq!(app.store.records.len(), 3);
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut app = AppState::new(Variant::Static);
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.store.records.len(), 3);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.store.records.len(), 2);
        assert_eq!(app.store.records[0].id, 2);
    }

    #[test]
    fn search_mode_filters_as_you_type() {
        let mut app = AppState::new(Variant::Static);
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "CH");
        assert_eq!(app.visible().len(), 1);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.search_query, "C");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.search_query, "");
        assert_eq!(app.visible().len(), 3);
    }

    #[test]
    fn alert_from_form_returns_to_form() {
        let mut app = AppState::new(Variant::Static);
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "Dana");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Modal);
        press(&mut app, KeyCode::Enter);
        assert!(app.modal.is_none());
        assert_eq!(app.input_mode, InputMode::Form(FormField::Name));
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "41");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.store.records.last(), Some(&Record::new(4, "Dana", 41)));
    }

    #[test]
    fn add_key_leaves_edit_mode() {
        let mut app = AppState::new(Variant::Static);
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.store.form.id, Some(1));
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('a'));
        assert!(!app.store.form.is_edit());
        assert_eq!(app.store.form.name, "");
        type_str(&mut app, "Zoe");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "22");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.store.records.len(), 4);
        assert_eq!(app.store.records[0], Record::new(1, "Alice", 25));
        assert_eq!(app.store.records[3], Record::new(4, "Zoe", 22));
    }

    #[test]
    fn quit_only_from_normal_mode() {
        let mut app = AppState::new(Variant::Static);
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Continue);
        press(&mut app, KeyCode::Enter);
        assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Quit);
    }
}
