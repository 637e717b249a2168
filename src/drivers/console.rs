use std::io;
use std::time::Duration;

use crossterm::event::{Event, KeyEventKind};

use super::InputDriver;

/// Reads from the controlling terminal.
///
/// Key releases and repeats are dropped so each press maps to exactly one
/// navigation action on every platform.
#[derive(Debug, Default)]
pub struct ConsoleDriver;

impl ConsoleDriver {
    pub fn new() -> Self {
        Self
    }
}

pub(crate) fn keep_event(evt: &Event) -> bool {
    match evt {
        Event::Key(key) => key.kind == KeyEventKind::Press,
        _ => true,
    }
}

impl InputDriver for ConsoleDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        loop {
            let evt = crossterm::event::read()?;
            if keep_event(&evt) {
                return Ok(evt);
            }
        }
    }
}
