pub mod console;
pub mod keyboard;

use std::collections::VecDeque;
use std::io;

use ratatui::buffer::Buffer;

use crate::keybindings::Key;

/// Blocking source of decoded keys.
pub trait InputDriver {
    fn read_key(&mut self) -> io::Result<Key>;
}

/// Puts the persistent screen in front of the user.
pub trait OutputDriver {
    fn present(&mut self, screen: &Buffer) -> io::Result<()>;
}

impl<T: InputDriver + ?Sized> InputDriver for &mut T {
    fn read_key(&mut self) -> io::Result<Key> {
        (**self).read_key()
    }
}

impl<T: OutputDriver + ?Sized> OutputDriver for &mut T {
    fn present(&mut self, screen: &Buffer) -> io::Result<()> {
        (**self).present(screen)
    }
}

/// Replays a fixed key sequence, then reports `Key::Quit` forever.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    keys: VecDeque<Key>,
}

impl ScriptedInput {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Queue every char of `text` as a `Key::Char`.
    pub fn typed(mut self, text: &str) -> Self {
        self.keys.extend(text.chars().map(Key::Char));
        self
    }

    pub fn then(mut self, key: Key) -> Self {
        self.keys.push_back(key);
        self
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl InputDriver for ScriptedInput {
    fn read_key(&mut self) -> io::Result<Key> {
        Ok(self.keys.pop_front().unwrap_or(Key::Quit))
    }
}

/// Output driver that only counts frames.
#[derive(Debug, Clone, Default)]
pub struct Headless {
    frames: usize,
}

impl Headless {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl OutputDriver for Headless {
    fn present(&mut self, _screen: &Buffer) -> io::Result<()> {
        self.frames += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;

    #[test]
    fn scripted_input_ends_with_quit() {
        let mut input = ScriptedInput::new([Key::Down]).typed("ab").then(Key::Enter);
        assert_eq!(input.remaining(), 4);
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(input.read_key().unwrap());
        }
        assert_eq!(
            seen,
            vec![Key::Down, Key::Char('a'), Key::Char('b'), Key::Enter, Key::Quit]
        );
    }

    #[test]
    fn blanket_impl_for_mut_ref_works() {
        fn present_twice<O: OutputDriver>(mut out: O) {
            let buffer = Buffer::empty(Rect::new(0, 0, 1, 1));
            out.present(&buffer).unwrap();
            out.present(&buffer).unwrap();
        }
        let mut out = Headless::new();
        present_twice(&mut out);
        assert_eq!(out.frames(), 2);
    }
}
