use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Reduces raw terminal events to one key press per physical keystroke.
///
/// Release events are dropped everywhere. On Windows repeats are dropped
/// too, and a held Esc is reported once.
#[derive(Debug, Default)]
pub struct KeyboardNormalizer {
    esc_down: bool,
}

impl KeyboardNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(&mut self, evt: Event) -> Option<KeyEvent> {
        let Event::Key(mut key) = evt else {
            return None;
        };
        if key.code == KeyCode::BackTab {
            key.code = KeyCode::Tab;
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
        if cfg!(windows) {
            match key.kind {
                KeyEventKind::Release => {
                    if key.code == KeyCode::Esc {
                        self.esc_down = false;
                    }
                    return None;
                }
                KeyEventKind::Repeat => return None,
                KeyEventKind::Press => {}
            }
            if key.code == KeyCode::Esc {
                if self.esc_down {
                    return None;
                }
                self.esc_down = true;
            } else {
                self.esc_down = false;
            }
        } else if key.kind == KeyEventKind::Release {
            return None;
        }
        // shifted letters arrive with SHIFT set; the char already carries it
        if let KeyCode::Char(_) = key.code {
            key.modifiers.remove(KeyModifiers::SHIFT);
        }
        Some(key)
    }
}
