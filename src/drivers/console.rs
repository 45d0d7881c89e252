use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{DisableMouseCapture, Event};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::keyboard::KeyboardNormalizer;
use super::{InputDriver, OutputDriver};
use crate::ui::UiFrame;

pub struct ConsoleInputDriver {
    normalizer: KeyboardNormalizer,
}

impl Default for ConsoleInputDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleInputDriver {
    pub fn new() -> Self {
        Self {
            normalizer: KeyboardNormalizer::new(),
        }
    }
}

impl InputDriver for ConsoleInputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<Event> {
        // The normalizer swallows events it deems spurious (key releases,
        // repeats), so keep reading until one survives.
        loop {
            let evt = crossterm::event::read()?;
            if let Some(normalized) = self.normalizer.normalize(evt) {
                return Ok(normalized);
            }
        }
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        if enabled {
            crossterm::execute!(std::io::stdout(), crossterm::event::EnableMouseCapture)
        } else {
            crossterm::execute!(std::io::stdout(), crossterm::event::DisableMouseCapture)
        }
    }
}

pub struct ConsoleOutputDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    entered: bool,
}

impl ConsoleOutputDriver {
    pub fn new() -> io::Result<Self> {
        let stdout = io::stdout();
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            entered: false,
        })
    }
}

impl OutputDriver for ConsoleOutputDriver {
    type Backend = CrosstermBackend<Stdout>;

    fn enter(&mut self) -> io::Result<()> {
        if self.entered {
            return Ok(());
        }
        execute!(self.terminal.backend_mut(), EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        self.terminal.hide_cursor()?;
        self.entered = true;
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()?;
        self.entered = false;
        Ok(())
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(UiFrame<'_>),
    {
        self.terminal
            .draw(move |frame| {
                let wrapper = UiFrame::new(frame);
                f(wrapper);
            })
            .map(|_| ())
            .map_err(|err| io::Error::other(err.to_string()))
    }
}

impl Drop for ConsoleOutputDriver {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}
