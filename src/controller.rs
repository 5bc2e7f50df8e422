use std::time::Duration;
use tracing::trace;

use crate::domain::{EdaConfig, EdaError, Message};
use crate::model::Model;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyModifiers};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &EdaConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, EdaError> {
        if event::poll(Duration::from_millis(self.event_poll_time))? {
            match event::read()? {
                Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                    if model.raw_keyevents() {
                        return Ok(Some(Message::RawKey(key)));
                    }
                    return Ok(self.handle_key(key, model.page_size()));
                }
                Event::Resize(width, height) => {
                    return Ok(Some(Message::Resize(width as usize, height as usize)));
                }
                _ => {}
            }
        }
        Ok(None)
    }

    fn handle_key(&self, key: event::KeyEvent, page_size: usize) -> Option<Message> {
        let message = match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) => Some(Message::Quit),
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Message::Quit),
            (KeyCode::Esc, _) => Some(Message::Exit),
            (KeyCode::Tab, _) => Some(Message::NextTab),
            (KeyCode::BackTab, _) => Some(Message::PreviousTab),
            (KeyCode::Char(c @ '1'..='9'), _) => {
                Some(Message::SelectTab(c as usize - '1' as usize))
            }
            (KeyCode::Right, _) | (KeyCode::Char('l'), _) => Some(Message::NextField),
            (KeyCode::Left, _) | (KeyCode::Char('h'), _) => Some(Message::PreviousField),
            (KeyCode::Char(']'), _) => Some(Message::NextFieldY),
            (KeyCode::Char('['), _) => Some(Message::PreviousFieldY),
            (KeyCode::Char(' '), _) => Some(Message::ToggleField),
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => Some(Message::MoveUp(1)),
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => Some(Message::MoveDown(1)),
            (KeyCode::PageUp, _) => Some(Message::MoveUp(page_size)),
            (KeyCode::PageDown, _) => Some(Message::MoveDown(page_size)),
            (KeyCode::Char('g'), _) | (KeyCode::Home, _) => Some(Message::MoveBeginning),
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => Some(Message::MoveEnd),
            (KeyCode::Char('y'), _) => Some(Message::Copy),
            (KeyCode::Char('o'), _) => Some(Message::Open),
            (KeyCode::Char('?'), _) => Some(Message::Help),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}
