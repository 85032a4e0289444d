use std::io::{self, Stdout};

use crossterm::event::{self, Event};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use tracing::debug;

use super::keyboard::KeyboardNormalizer;
use super::{InputDriver, OutputDriver};
use crate::keybindings::{Key, KeyBindings};

pub struct ConsoleInputDriver {
    normalizer: KeyboardNormalizer,
    bindings: KeyBindings,
}

impl Default for ConsoleInputDriver {
    fn default() -> Self {
        Self::new(KeyBindings::default())
    }
}

impl ConsoleInputDriver {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            normalizer: KeyboardNormalizer::new(),
            bindings,
        }
    }

    /// Decode one terminal event, if it is a bound key press.
    fn decode(&mut self, evt: Event) -> Option<Key> {
        let key = self.normalizer.normalize(evt)?;
        let decoded = self.bindings.key_for(&key);
        if decoded.is_none() {
            debug!(?key, "unbound key");
        }
        decoded
    }
}

impl InputDriver for ConsoleInputDriver {
    fn read_key(&mut self) -> io::Result<Key> {
        loop {
            let evt = event::read()?;
            if let Some(key) = self.decode(evt) {
                return Ok(key);
            }
        }
    }
}

pub struct ConsoleOutputDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    entered: bool,
}

impl ConsoleOutputDriver {
    pub fn new() -> io::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            entered: false,
        })
    }

    /// Terminal size in cells as `(cols, rows)`.
    pub fn size(&self) -> io::Result<(u16, u16)> {
        let size = self.terminal.size()?;
        Ok((size.width, size.height))
    }

    pub fn enter(&mut self) -> io::Result<()> {
        if self.entered {
            return Ok(());
        }
        execute!(self.terminal.backend_mut(), EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        self.terminal.hide_cursor()?;
        self.terminal.clear()?;
        self.entered = true;
        Ok(())
    }

    pub fn exit(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        terminal::disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        self.entered = false;
        Ok(())
    }
}

impl OutputDriver for ConsoleOutputDriver {
    fn present(&mut self, screen: &Buffer) -> io::Result<()> {
        self.terminal
            .draw(|frame| {
                let area = frame.area().intersection(screen.area);
                let buf = frame.buffer_mut();
                for y in area.top()..area.bottom() {
                    for x in area.left()..area.right() {
                        if let Some(src) = screen.cell((x, y))
                            && let Some(dst) = buf.cell_mut((x, y))
                        {
                            *dst = src.clone();
                        }
                    }
                }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

    #[test]
    fn decode_maps_bound_keys() {
        let mut d = ConsoleInputDriver::default();
        let evt = Event::Key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(d.decode(evt), Some(Key::Focus));
        let evt = Event::Key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert_eq!(d.decode(evt), Some(Key::Save));
    }

    #[test]
    fn decode_skips_releases_and_resizes() {
        let mut d = ConsoleInputDriver::default();
        let mut key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(d.decode(Event::Key(key)), None);
        assert_eq!(d.decode(Event::Resize(3, 3)), None);
        let evt = Event::Key(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        assert_eq!(d.decode(evt), Some(Key::Char('a')));
    }
}
