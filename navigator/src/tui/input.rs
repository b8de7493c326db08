use crossterm::event::{KeyCode, KeyModifiers};
use tui::{
    style::{Style, Modifier},
    text::{Spans, Span},
};

/// Outcome of feeding a key to a [StringInput].
#[derive(Debug, PartialEq, Eq)]
pub enum Edit {
    /// The text changed.
    Changed,
    /// Only the caret moved.
    Moved,
    /// The key is not handled by the input.
    Ignored,
}

/// Single line text input, e.g. for filtering tables.
#[derive(Default)]
pub struct StringInput {
    /// Contains the entered text. Not defined as `String` to allow easier index-based operations.
    value: Vec<char>,
    /// Specifies the position of the caret.
    caret: usize,
}

impl StringInput {
    pub fn key_down(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Edit {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);

        match (key, ctrl) {
            (KeyCode::Left, false) => self.move_to(self.caret.saturating_sub(1)),
            (KeyCode::Left, true) => self.move_to(self.jump_point(true)),
            (KeyCode::Right, false) => self.move_to((self.caret + 1).min(self.value.len())),
            (KeyCode::Right, true) => self.move_to(self.jump_point(false)),
            (KeyCode::Home, _) => self.move_to(0),
            (KeyCode::End, _) => self.move_to(self.value.len()),
            (KeyCode::Backspace, false) if self.caret > 0 => {
                self.caret -= 1;
                self.value.remove(self.caret);
                Edit::Changed
            }
            (KeyCode::Backspace, true) if self.caret > 0 => {
                let end = self.jump_point(true);
                self.value.drain(end..self.caret);
                self.caret = end;
                Edit::Changed
            }
            (KeyCode::Delete, false) if self.caret < self.value.len() => {
                self.value.remove(self.caret);
                Edit::Changed
            }
            (KeyCode::Delete, true) if self.caret < self.value.len() => {
                let end = self.jump_point(false);
                self.value.drain(self.caret..end);
                Edit::Changed
            }
            (KeyCode::Char('u'), true) if !self.value.is_empty() => {
                self.clear();
                Edit::Changed
            }
            (KeyCode::Char(char), false) => {
                self.value.insert(self.caret, char);
                self.caret += 1;
                Edit::Changed
            }
            _ => Edit::Ignored,
        }
    }

    pub fn value(&self) -> String {
        self.value.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.caret = 0;
    }

    /// Formats the text with the caret underlined.
    pub fn format(&self) -> Spans {
        let (pre, rest) = self.value.split_at(self.caret);
        let (caret, post) = match rest.split_first() {
            Some((&c, post)) => (c.to_string(), post.iter().collect()),
            None => (" ".to_owned(), String::new()),
        };

        Spans::from(vec![
            Span::raw(pre.iter().collect::<String>()),
            Span::styled(caret, Style::default().add_modifier(Modifier::UNDERLINED)),
            Span::raw(post),
        ])
    }

    fn move_to(&mut self, caret: usize) -> Edit {
        if caret == self.caret {
            Edit::Ignored
        } else {
            self.caret = caret;
            Edit::Moved
        }
    }

    /// Determines the index to jump to in specified direction e.g. when `CTRL + ←/→` is pressed.
    fn jump_point(&self, left: bool) -> usize {
        let (dir, stop): (isize, usize) = if left {
            (-1, 0)
        } else {
            (1, self.value.len())
        };

        if self.caret == stop {
            return stop;
        }

        // a jump point starts a word or a run of symbols
        let is_jump_point = |i: usize| {
            let current = self.value[i];
            let left = self.value[i - 1];
            let is_symbol = |c: char| !c.is_whitespace() && !c.is_alphanumeric();

            is_symbol(current) && !is_symbol(left) ||
            current.is_alphanumeric() && !left.is_alphanumeric()
        };

        let mut i = self.caret;
        loop {
            i = ((i as isize) + dir) as usize;

            if i == stop || is_jump_point(i) {
                break i;
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> StringInput {
        let mut input = StringInput::default();
        for c in text.chars() {
            input.key_down(KeyCode::Char(c), KeyModifiers::NONE);
        }
        input
    }

    #[test]
    fn editing() {
        let mut input = typed("pytest-cov");
        assert_eq!(input.value(), "pytest-cov");

        assert_eq!(input.key_down(KeyCode::Backspace, KeyModifiers::CONTROL), Edit::Changed);
        assert_eq!(input.value(), "pytest-");

        assert_eq!(input.key_down(KeyCode::Home, KeyModifiers::NONE), Edit::Moved);
        assert_eq!(input.key_down(KeyCode::Left, KeyModifiers::NONE), Edit::Ignored);
        assert_eq!(input.key_down(KeyCode::Delete, KeyModifiers::NONE), Edit::Changed);
        assert_eq!(input.value(), "ytest-");

        assert_eq!(input.key_down(KeyCode::Char('u'), KeyModifiers::CONTROL), Edit::Changed);
        assert!(input.is_empty());
        assert_eq!(input.key_down(KeyCode::Backspace, KeyModifiers::NONE), Edit::Ignored);
    }

    #[test]
    fn word_jumps() {
        let mut input = typed("pip install numpy");

        input.key_down(KeyCode::Left, KeyModifiers::CONTROL);
        assert_eq!(input.caret, 12);
        input.key_down(KeyCode::Left, KeyModifiers::CONTROL);
        assert_eq!(input.caret, 4);
        input.key_down(KeyCode::Right, KeyModifiers::CONTROL);
        assert_eq!(input.caret, 12);
    }

    #[test]
    fn caret_is_underlined() {
        let mut input = typed("ab");
        input.key_down(KeyCode::Left, KeyModifiers::NONE);

        let spans = input.format().0;
        let content: Vec<&str> = spans.iter().map(|span| span.content.as_ref()).collect();
        assert_eq!(content, ["a", "b", ""]);
        assert!(spans[1].style.add_modifier.contains(Modifier::UNDERLINED));
    }
}
