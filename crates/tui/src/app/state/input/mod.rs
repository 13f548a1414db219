/// Editable multi-line text field backing the composer and the path prompt.
#[derive(Default)]
pub struct InputState {
    pub buffer: Vec<char>,
    pub cursor: usize,
    history: Vec<String>,
    history_index: Option<usize>,
    history_saved: Option<String>,
    preferred_column: Option<usize>,
}

impl InputState {
    pub fn current(&self) -> String {
        self.buffer.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn set_from(&mut self, value: &str) {
        self.buffer = value.chars().collect();
        self.cursor = self.buffer.len();
        self.preferred_column = None;
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
        self.history_index = None;
        self.history_saved = None;
        self.preferred_column = None;
    }

    pub fn insert_char(&mut self, ch: char) {
        self.buffer.insert(self.cursor, ch);
        self.cursor += 1;
        self.after_edit();
    }

    pub fn insert_str(&mut self, value: &str) {
        for ch in value.chars() {
            self.buffer.insert(self.cursor, ch);
            self.cursor += 1;
        }
        self.after_edit();
    }

    /// Appends at the end of the buffer regardless of the cursor, leaving the cursor at the end.
    pub fn append_str(&mut self, value: &str) {
        self.buffer.extend(value.chars());
        self.cursor = self.buffer.len();
        self.after_edit();
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        self.buffer.remove(self.cursor);
        self.after_edit();
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.buffer.len() {
            return;
        }
        self.buffer.remove(self.cursor);
        self.after_edit();
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.preferred_column = None;
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.buffer.len());
        self.preferred_column = None;
    }

    pub fn move_home(&mut self) {
        self.cursor = self.line_start(self.cursor.min(self.buffer.len()));
        self.preferred_column = None;
    }

    pub fn move_end(&mut self) {
        let start = self.cursor.min(self.buffer.len());
        self.cursor = self.find_next_newline(start).unwrap_or(self.buffer.len());
        self.preferred_column = None;
    }

    /// Moves to the previous visual line; returns false when already on the first line.
    pub fn move_up(&mut self) -> bool {
        let cursor = self.cursor.min(self.buffer.len());
        let current_start = self.line_start(cursor);
        if current_start == 0 {
            self.preferred_column = None;
            return false;
        }

        let column = self
            .preferred_column
            .unwrap_or(cursor.saturating_sub(current_start));
        let prev_end = current_start - 1;
        let prev_start = self.line_start(prev_end);
        self.cursor = prev_start + column.min(prev_end - prev_start);
        self.preferred_column = Some(column);
        true
    }

    /// Moves to the next visual line; returns false when already on the last line.
    pub fn move_down(&mut self) -> bool {
        let len = self.buffer.len();
        let cursor = self.cursor.min(len);
        let current_start = self.line_start(cursor);
        let Some(current_end) = self.find_next_newline(current_start) else {
            self.preferred_column = None;
            return false;
        };

        let column = self
            .preferred_column
            .unwrap_or(cursor.saturating_sub(current_start));
        let next_start = current_end + 1;
        let next_end = self.find_next_newline(next_start).unwrap_or(len);
        self.cursor = next_start + column.min(next_end - next_start);
        self.preferred_column = Some(column);
        true
    }

    /// Deletes from the start of the current line up to the cursor.
    pub fn kill_line(&mut self) {
        let cursor = self.cursor.min(self.buffer.len());
        let start = self.line_start(cursor);
        if start == cursor {
            return;
        }
        self.buffer.drain(start..cursor);
        self.cursor = start;
        self.after_edit();
    }

    pub fn kill_to_end(&mut self) {
        self.buffer.truncate(self.cursor.min(self.buffer.len()));
        self.after_edit();
    }

    pub fn delete_word_back(&mut self) {
        let start = self.cursor;
        while self.cursor > 0 && self.buffer[self.cursor - 1].is_whitespace() {
            self.cursor -= 1;
        }
        while self.cursor > 0 && !self.buffer[self.cursor - 1].is_whitespace() {
            self.cursor -= 1;
        }
        if self.cursor == start {
            return;
        }
        self.buffer.drain(self.cursor..start);
        self.after_edit();
    }

    pub fn record_history(&mut self, value: &str) {
        if value.trim().is_empty() {
            return;
        }
        if self.history.last().is_some_and(|last| last == value) {
            return;
        }
        self.history.push(value.to_string());
    }

    pub fn history_up(&mut self) -> bool {
        if self.history.is_empty() {
            return false;
        }
        let next_index = match self.history_index {
            None => {
                self.history_saved = Some(self.current());
                self.history.len() - 1
            }
            Some(index) => index.saturating_sub(1),
        };
        self.history_index = Some(next_index);
        let value = self.history[next_index].clone();
        self.set_from(&value);
        true
    }

    pub fn history_down(&mut self) -> bool {
        let Some(index) = self.history_index else {
            return false;
        };
        if index + 1 < self.history.len() {
            self.history_index = Some(index + 1);
            let value = self.history[index + 1].clone();
            self.set_from(&value);
            return true;
        }
        self.history_index = None;
        let saved = self.history_saved.take().unwrap_or_default();
        self.set_from(&saved);
        true
    }

    fn after_edit(&mut self) {
        self.preferred_column = None;
        if self.history_index.is_some() {
            self.history_index = None;
            self.history_saved = None;
        }
    }

    fn line_start(&self, pos: usize) -> usize {
        self.buffer[..pos]
            .iter()
            .rposition(|ch| *ch == '\n')
            .map(|idx| idx + 1)
            .unwrap_or(0)
    }

    fn find_next_newline(&self, start: usize) -> Option<usize> {
        self.buffer[start..]
            .iter()
            .position(|ch| *ch == '\n')
            .map(|offset| start + offset)
    }
}

#[cfg(test)]
mod tests {
    use super::InputState;

    #[test]
    fn move_up_down_preserves_desired_column() {
        let mut input = InputState::default();
        input.set_from("12345\n12\n1234");

        assert!(input.move_up());
        assert_eq!(input.cursor, 8);
        assert!(input.move_up());
        assert_eq!(input.cursor, 4);

        assert!(input.move_down());
        assert_eq!(input.cursor, 8);
        assert!(input.move_down());
        assert_eq!(input.cursor, 13);
    }

    #[test]
    fn vertical_moves_stop_at_boundaries() {
        let mut input = InputState::default();
        input.set_from("line1\nline2");
        input.cursor = 0;
        assert!(!input.move_up());

        input.cursor = input.buffer.len();
        assert!(!input.move_down());
    }

    #[test]
    fn append_ignores_cursor_position() {
        let mut input = InputState::default();
        input.set_from("hello");
        input.cursor = 0;
        input.append_str("world ");
        assert_eq!(input.current(), "helloworld ");
        assert_eq!(input.cursor, 11);
    }

    #[test]
    fn delete_word_back_removes_trailing_word_and_spaces() {
        let mut input = InputState::default();
        input.set_from("summarize this  ");
        input.delete_word_back();
        assert_eq!(input.current(), "summarize ");
        assert_eq!(input.cursor, 10);
    }

    #[test]
    fn history_round_trip_restores_draft() {
        let mut input = InputState::default();
        input.record_history("first");
        input.record_history("second");
        input.record_history("second");
        input.set_from("draft");

        assert!(input.history_up());
        assert_eq!(input.current(), "second");
        assert!(input.history_up());
        assert_eq!(input.current(), "first");
        assert!(input.history_down());
        assert_eq!(input.current(), "second");
        assert!(input.history_down());
        assert_eq!(input.current(), "draft");
        assert!(!input.history_down());
    }

    #[test]
    fn kill_line_only_touches_the_current_line() {
        let mut input = InputState::default();
        input.set_from("keep\ndrop this");
        input.cursor = 9;
        input.kill_line();
        assert_eq!(input.current(), "keep\n this");
        assert_eq!(input.cursor, 5);
    }

    #[test]
    fn home_and_end_stay_on_the_current_line() {
        let mut input = InputState::default();
        input.set_from("ab\ncdef");
        input.cursor = 4;
        input.move_home();
        assert_eq!(input.cursor, 3);
        input.move_end();
        assert_eq!(input.cursor, 7);
    }
}
