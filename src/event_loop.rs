use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Quit,
}

/// Single-threaded pump that feeds input to the window managers.
///
/// Every pass calls the handler once with `None` (the tick where delayed
/// shows fire and animations advance) and then once per queued event.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if let ControlFlow::Quit = handler(&mut self.driver, None)? {
                break;
            }

            if self.driver.poll(self.poll_interval)? {
                // Drain bursts in one pass so input does not lag behind the tick.
                loop {
                    let event = self.driver.read()?;
                    if let ControlFlow::Quit = handler(&mut self.driver, Some(event))? {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::ScriptedDriver;

    #[test]
    fn ticks_before_events_and_stops_on_quit() {
        let mut lp = EventLoop::new(ScriptedDriver::from_keys("ab"), Duration::ZERO);
        let mut seen = Vec::new();
        lp.run(|driver, event| {
            seen.push(event.is_some());
            if event.is_none() && driver.remaining() == 0 {
                return Ok(ControlFlow::Quit);
            }
            Ok(ControlFlow::Continue)
        })
        .unwrap();
        assert_eq!(seen, vec![false, true, true, false]);
    }

    #[test]
    fn quit_from_event_returns_immediately() {
        let mut lp = EventLoop::new(ScriptedDriver::from_keys("abc"), Duration::ZERO);
        let mut events = 0;
        lp.run(|_, event| {
            if event.is_some() {
                events += 1;
                return Ok(ControlFlow::Quit);
            }
            Ok(ControlFlow::Continue)
        })
        .unwrap();
        assert_eq!(events, 1);
        assert_eq!(lp.driver().remaining(), 2);
    }
}
