use std::io;
use std::time::Duration;

use crossterm::event::Event;

use crate::drivers::InputDriver;

pub enum ControlFlow {
    Continue,
    Quit,
}

/// A centralized event loop that drives the main UI thread.
///
/// This struct implements the "Message Pump" or "Game Loop" pattern. It is responsible for:
/// 1. Owning the main execution thread.
/// 2. Polling the input driver for user events (keyboard, mouse, resize).
/// 3. Dispatching those events to a provided handler closure.
///
/// Note: This loop controls the synchronous UI flow. Background work (like the
/// startup fetch of the window limit) runs on its own thread and is polled from
/// the handler's tick, so nothing here ever blocks on the backend.
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

    /// Runs the application loop, taking control of the current thread.
    ///
    /// This is the only place in the app that calls `driver.poll()` or
    /// `driver.read()`. The handler is responsible for routing each event to
    /// the appropriate component or window (e.g. via `WindowManager`).
    ///
    /// The `handler` is called with:
    /// - `Some(event)` when an input event occurs.
    /// - `None` when the poll interval elapses without an event (useful for drawing/animations).
    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            if let ControlFlow::Quit = handler(&mut self.driver, None)? {
                break;
            }

            if self.driver.poll(self.poll_interval)? {
                // Drain the event queue to prevent input lag during high-frequency event bursts
                // (e.g. mouse drags, scrolling). If we only processed one event per poll,
                // the rendering loop would fall behind the input stream.
                loop {
                    let event = self.driver.read()?;
                    if let ControlFlow::Quit = handler(&mut self.driver, Some(event))? {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::from_millis(0))? {
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
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::collections::VecDeque;

    struct Scripted {
        events: VecDeque<Event>,
    }

    impl InputDriver for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<bool> {
            Ok(!self.events.is_empty())
        }

        fn read(&mut self) -> io::Result<Event> {
            self.events
                .pop_front()
                .ok_or_else(|| io::Error::other("script exhausted"))
        }
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn delivers_events_in_order_and_stops_on_quit() {
        let driver = Scripted {
            events: VecDeque::from([key('a'), key('b'), key('q'), key('x')]),
        };
        let mut seen = Vec::new();
        let mut event_loop = EventLoop::new(driver, Duration::from_millis(0));
        event_loop
            .run(|_, event| {
                if let Some(Event::Key(k)) = event {
                    seen.push(k.code);
                    if k.code == KeyCode::Char('q') {
                        return Ok(ControlFlow::Quit);
                    }
                }
                Ok(ControlFlow::Continue)
            })
            .unwrap();
        assert_eq!(
            seen,
            vec![KeyCode::Char('a'), KeyCode::Char('b'), KeyCode::Char('q')]
        );
    }

    #[test]
    fn ticks_with_none_between_event_batches() {
        let driver = Scripted {
            events: VecDeque::from([key('a')]),
        };
        let mut ticks = 0;
        let mut event_loop = EventLoop::new(driver, Duration::from_millis(0));
        event_loop
            .run(|_, event| match event {
                None => {
                    ticks += 1;
                    if ticks == 3 {
                        Ok(ControlFlow::Quit)
                    } else {
                        Ok(ControlFlow::Continue)
                    }
                }
                Some(_) => Ok(ControlFlow::Continue),
            })
            .unwrap();
        assert_eq!(ticks, 3);
    }
}
