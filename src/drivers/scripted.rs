use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};

use super::InputDriver;

/// Replays a fixed sequence of events. Used by headless runs and tests.
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    queue: VecDeque<Event>,
}

impl ScriptedDriver {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            queue: events.into_iter().collect(),
        }
    }

    /// One plain key press per character.
    pub fn from_keys(keys: &str) -> Self {
        Self::new(
            keys.chars()
                .map(|c| Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))),
        )
    }

    pub fn push(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl InputDriver for ScriptedDriver {
    fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
        Ok(!self.queue.is_empty())
    }

    fn read(&mut self) -> io::Result<Event> {
        self.queue
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_in_order_then_reports_empty() {
        let mut d = ScriptedDriver::from_keys("rb");
        assert!(d.poll(Duration::ZERO).unwrap());
        match d.read().unwrap() {
            Event::Key(k) => assert_eq!(k.code, KeyCode::Char('r')),
            other => panic!("expected key, got {other:?}"),
        }
        assert_eq!(d.remaining(), 1);
        d.read().unwrap();
        assert!(!d.poll(Duration::ZERO).unwrap());
        assert!(d.read().is_err());
    }
}
