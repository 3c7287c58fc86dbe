use crate::util::unicode;

/// Inline text editor state for one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    pub node_id: String,
    pub text: String,
    /// Byte offset, always on a grapheme boundary
    pub cursor: usize,
}

impl EditBuffer {
    /// Start editing `text` with the cursor at the end
    pub fn new(node_id: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        EditBuffer {
            node_id: node_id.into(),
            text,
            cursor,
        }
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = unicode::prev_boundary(&self.text, self.cursor) {
            self.text.replace_range(prev..self.cursor, "");
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if let Some(next) = unicode::next_boundary(&self.text, self.cursor) {
            self.text.replace_range(self.cursor..next, "");
        }
    }

    pub fn left(&mut self) {
        if let Some(prev) = unicode::prev_boundary(&self.text, self.cursor) {
            self.cursor = prev;
        }
    }

    pub fn right(&mut self) {
        if let Some(next) = unicode::next_boundary(&self.text, self.cursor) {
            self.cursor = next;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Clear everything before the cursor
    pub fn kill_to_start(&mut self) {
        self.text.replace_range(..self.cursor, "");
        self.cursor = 0;
    }

    /// Cursor position in terminal cells
    pub fn cursor_col(&self) -> usize {
        unicode::display_width(&self.text[..self.cursor])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn typing_and_deleting() {
        let mut buf = EditBuffer::new("n1", "Helo");
        buf.left();
        buf.insert('l');
        assert_eq!(buf.text, "Hello");
        assert_eq!(buf.cursor, 4);
        buf.end();
        buf.backspace();
        assert_eq!(buf.text, "Hell");
        buf.home();
        buf.delete();
        assert_eq!(buf.text, "ell");
        assert_eq!(buf.cursor, 0);
    }

    #[test]
    fn cursor_moves_by_grapheme() {
        let mut buf = EditBuffer::new("n1", "日e\u{301}");
        assert_eq!(buf.cursor_col(), 3);
        buf.left();
        assert_eq!(buf.cursor, 3);
        assert_eq!(buf.cursor_col(), 2);
        buf.backspace();
        assert_eq!(buf.text, "e\u{301}");
        assert_eq!(buf.cursor, 0);
        buf.right();
        assert_eq!(buf.cursor, 3);
        buf.right();
        assert_eq!(buf.cursor, 3);
    }

    #[test]
    fn kill_to_start_keeps_tail() {
        let mut buf = EditBuffer::new("n1", "abc def");
        buf.left();
        buf.left();
        buf.left();
        buf.kill_to_start();
        assert_eq!(buf.text, "def");
        assert_eq!(buf.cursor, 0);
    }
}
