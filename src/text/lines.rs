//! Textual and visual line model of editable text
//!
//! Textual lines are the author's lines, split on `\n`. Visual lines are
//! what a wrapper made of them. Every textual line owns a contiguous,
//! non-empty run of visual lines, and with hanging spaces those visual
//! lines concatenate back to the textual line. Columns count chars.

use std::cmp::Ordering;
use std::ops::Range;

/// A caret position, either in textual or in visual coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinePosition {
    pub line: usize,
    pub column: usize,
    pub visual: bool,
}

impl LinePosition {
    pub fn visual(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            visual: true,
        }
    }

    pub fn textual(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            visual: false,
        }
    }

    pub fn with_column(self, column: usize) -> Self {
        Self { column, ..self }
    }
}

/// Direction of a word-boundary search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Characters that separate words
pub fn is_breaking_char(ch: char) -> bool {
    !ch.is_alphanumeric() && ch != '_'
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

pub(crate) fn byte_index(text: &str, column: usize) -> usize {
    text.char_indices()
        .nth(column)
        .map_or(text.len(), |(index, _)| index)
}

/// Substring between two char columns, clamped to the text
pub(crate) fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let start = byte_index(text, start);
    let end = byte_index(text, end).max(start);
    &text[start..end]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextualLine {
    text: String,
    visual: Range<usize>,
}

impl TextualLine {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visual: 0..1,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Indices of the visual lines this line wrapped into
    pub fn visual_range(&self) -> Range<usize> {
        self.visual.clone()
    }

    pub fn len(&self) -> usize {
        char_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualLine {
    text: String,
    textual: usize,
}

impl VisualLine {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Index of the textual line this came from
    pub fn textual_index(&self) -> usize {
        self.textual
    }

    pub fn len(&self) -> usize {
        char_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Both line representations of one text buffer
#[derive(Debug, Clone)]
pub struct LineLayout {
    textual: Vec<TextualLine>,
    visual: Vec<VisualLine>,
}

impl Default for LineLayout {
    fn default() -> Self {
        Self {
            textual: vec![TextualLine::new("")],
            visual: vec![VisualLine {
                text: String::new(),
                textual: 0,
            }],
        }
    }
}

impl LineLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `text` on `\n` and lay each line out with `wrap`
    pub fn from_text(text: &str, wrap: impl FnMut(&str) -> Vec<String>) -> Self {
        let mut layout = Self {
            textual: text.split('\n').map(TextualLine::new).collect(),
            visual: Vec::new(),
        };
        layout.relayout(wrap);
        layout
    }

    pub fn textual_lines(&self) -> &[TextualLine] {
        &self.textual
    }

    pub fn visual_lines(&self) -> &[VisualLine] {
        &self.visual
    }

    /// Full text with `\n` between textual lines
    pub fn text(&self) -> String {
        self.textual
            .iter()
            .map(TextualLine::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn has_text(&self) -> bool {
        self.textual.len() > 1 || !self.textual[0].text.is_empty()
    }

    /// Rebuild every visual line. `wrap` must return lines that concatenate
    /// to its input; an empty result counts as one empty line.
    pub fn relayout(&mut self, mut wrap: impl FnMut(&str) -> Vec<String>) {
        self.visual.clear();
        for (index, line) in self.textual.iter_mut().enumerate() {
            let mut pieces = wrap(&line.text);
            if pieces.is_empty() {
                pieces.push(String::new());
            }
            let start = self.visual.len();
            self.visual.extend(pieces.into_iter().map(|text| VisualLine {
                text,
                textual: index,
            }));
            line.visual = start..self.visual.len();
        }
    }

    // ------------------------------------------------------------------------
    // Position queries
    // ------------------------------------------------------------------------

    fn line_count(&self, visual: bool) -> usize {
        if visual {
            self.visual.len()
        } else {
            self.textual.len()
        }
    }

    /// Length of the line `pos` is on, in its own representation
    pub fn line_len(&self, pos: LinePosition) -> usize {
        if pos.visual {
            self.visual.get(pos.line).map_or(0, VisualLine::len)
        } else {
            self.textual.get(pos.line).map_or(0, TextualLine::len)
        }
    }

    pub fn is_at_line_start(&self, pos: LinePosition) -> bool {
        pos.column == 0
    }

    pub fn is_at_line_end(&self, pos: LinePosition) -> bool {
        pos.column == self.line_len(pos)
    }

    pub fn is_in_first_line(&self, pos: LinePosition) -> bool {
        pos.line == 0
    }

    pub fn is_in_last_line(&self, pos: LinePosition) -> bool {
        pos.line + 1 == self.line_count(pos.visual)
    }

    pub fn is_at_absolute_start(&self, pos: LinePosition) -> bool {
        self.is_in_first_line(pos) && self.is_at_line_start(pos)
    }

    pub fn is_at_absolute_end(&self, pos: LinePosition) -> bool {
        self.is_in_last_line(pos) && self.is_at_line_end(pos)
    }

    pub fn start(&self) -> LinePosition {
        LinePosition::visual(0, 0)
    }

    pub fn end(&self) -> LinePosition {
        let line = self.visual.len() - 1;
        LinePosition::visual(line, self.visual[line].len())
    }

    // ------------------------------------------------------------------------
    // Conversions
    // ------------------------------------------------------------------------

    /// A column at a soft wrap maps to the end of the earlier visual line
    pub fn to_visual(&self, pos: LinePosition) -> LinePosition {
        if pos.visual {
            return pos;
        }
        let Some(line) = self.textual.get(pos.line) else {
            return self.end();
        };

        let mut remaining = pos.column;
        for index in line.visual.clone() {
            let len = self.visual[index].len();
            if len >= remaining {
                return LinePosition::visual(index, remaining);
            }
            remaining -= len;
        }
        let last = line.visual.end - 1;
        LinePosition::visual(last, self.visual[last].len())
    }

    pub fn to_textual(&self, pos: LinePosition) -> LinePosition {
        if !pos.visual {
            return pos;
        }
        let Some(visual) = self.visual.get(pos.line) else {
            let last = self.textual.len() - 1;
            return LinePosition::textual(last, self.textual[last].len());
        };
        let textual = &self.textual[visual.textual];
        let before: usize = (textual.visual.start..pos.line)
            .map(|index| self.visual[index].len())
            .sum();
        LinePosition::textual(visual.textual, before + pos.column)
    }

    /// Order two positions by where they appear on screen
    pub fn compare(&self, a: LinePosition, b: LinePosition) -> Ordering {
        let a = self.to_visual(a);
        let b = self.to_visual(b);
        (a.line, a.column).cmp(&(b.line, b.column))
    }

    // ------------------------------------------------------------------------
    // Movement
    // ------------------------------------------------------------------------

    /// Move `amount` columns, crossing line ends. At a soft wrap the end of
    /// one visual line and the start of the next are one caret stop, so
    /// every visual step changes the textual column.
    pub fn offset_column(&self, pos: LinePosition, amount: isize) -> LinePosition {
        let mut pos = pos;
        match amount.cmp(&0) {
            Ordering::Greater => {
                for _ in 0..amount {
                    if self.is_at_absolute_end(pos) {
                        break;
                    }
                    pos = self.step_forward(pos);
                }
            }
            Ordering::Less => {
                for _ in 0..amount.unsigned_abs() {
                    if self.is_at_absolute_start(pos) {
                        break;
                    }
                    pos = self.step_back(pos);
                }
            }
            Ordering::Equal => {}
        }
        pos
    }

    fn step_back(&self, pos: LinePosition) -> LinePosition {
        if pos.visual && pos.column == 0 && pos.line > 0 {
            let current = &self.visual[pos.line];
            let previous = &self.visual[pos.line - 1];
            if current.textual == previous.textual && !previous.is_empty() {
                return LinePosition::visual(pos.line - 1, previous.len() - 1);
            }
        }
        self.simple_step_back(pos)
    }

    fn simple_step_back(&self, pos: LinePosition) -> LinePosition {
        if pos.column == 0 {
            let previous = LinePosition { line: pos.line - 1, ..pos };
            previous.with_column(self.line_len(previous))
        } else {
            pos.with_column(pos.column - 1)
        }
    }

    fn step_forward(&self, pos: LinePosition) -> LinePosition {
        if !pos.visual {
            return self.simple_step_forward(pos);
        }
        let current = &self.visual[pos.line];
        let len = current.len();
        if pos.column + 1 < len {
            return self.simple_step_forward(pos);
        }
        if pos.line + 1 == self.visual.len() {
            return LinePosition::visual(pos.line, len);
        }
        let soft_wrap = self.visual[pos.line + 1].textual == current.textual;
        if soft_wrap && pos.column >= len {
            // (line, len) and (line + 1, 0) are the same textual column
            return self.simple_step_forward(LinePosition::visual(pos.line + 1, 0));
        }
        if pos.column + 1 == len && !current.text.ends_with(' ') {
            return self.simple_step_forward(pos);
        }
        if soft_wrap {
            return LinePosition::visual(pos.line + 1, 0);
        }
        self.simple_step_forward(pos)
    }

    fn simple_step_forward(&self, pos: LinePosition) -> LinePosition {
        if pos.column >= self.line_len(pos) {
            if self.is_in_last_line(pos) {
                pos.with_column(self.line_len(pos))
            } else {
                LinePosition {
                    line: pos.line + 1,
                    column: 0,
                    visual: pos.visual,
                }
            }
        } else {
            pos.with_column(pos.column + 1)
        }
    }

    /// Character before the caret; `\n` at the start of a textual line
    pub fn char_before(&self, pos: LinePosition) -> Option<char> {
        let pos = self.to_textual(pos);
        if self.is_at_absolute_start(pos) {
            None
        } else if pos.column == 0 {
            Some('\n')
        } else {
            self.textual[pos.line].text.chars().nth(pos.column - 1)
        }
    }

    /// Character after the caret; `\n` at the end of a textual line
    pub fn char_after(&self, pos: LinePosition) -> Option<char> {
        let pos = self.to_textual(pos);
        if self.is_at_absolute_end(pos) {
            None
        } else if self.is_at_line_end(pos) {
            Some('\n')
        } else {
            self.textual[pos.line].text.chars().nth(pos.column)
        }
    }

    /// Skip breaking characters, then consume word characters, stopping at
    /// a line break. The result may be textual or visual: at a soft wrap the
    /// visual form is needed to tell the end of one visual line from the
    /// start of the next.
    pub fn nearest_word_boundary(&self, pos: LinePosition, direction: Direction) -> LinePosition {
        let at_end = match direction {
            Direction::Left => self.is_at_absolute_start(pos),
            Direction::Right => self.is_at_absolute_end(pos),
        };
        if at_end {
            return pos;
        }

        let mut textual = self.to_textual(pos);
        match direction {
            Direction::Left if textual.column == 0 => {
                let previous = textual.line - 1;
                return LinePosition::textual(previous, self.textual[previous].len());
            }
            Direction::Right if self.is_at_line_end(textual) => {
                return LinePosition::textual(textual.line + 1, 0);
            }
            _ => {}
        }

        let (offset, next): (isize, fn(&Self, LinePosition) -> Option<char>) = match direction {
            Direction::Left => (-1, Self::char_before),
            Direction::Right => (1, Self::char_after),
        };

        let mut ch = next(self, textual);
        for breaking in [true, false] {
            while ch.is_some_and(|c| is_breaking_char(c) == breaking) {
                textual = self.offset_column(textual, offset);
                ch = next(self, textual);
                if ch == Some('\n') {
                    return textual;
                }
            }
        }

        let visual = self.to_visual(textual);
        if direction == Direction::Left && self.is_at_line_end(visual) && !self.is_in_last_line(visual) {
            LinePosition::visual(visual.line + 1, 0)
        } else if direction == Direction::Right && visual.column == 0 && visual.line > 0 {
            LinePosition::visual(visual.line - 1, self.visual[visual.line - 1].len())
        } else {
            textual
        }
    }

    // ------------------------------------------------------------------------
    // Edits
    // ------------------------------------------------------------------------

    /// Insert `lines` at `at`: the first joins the caret's line, the rest
    /// become new textual lines with the old tail appended to the last.
    pub fn insert(&mut self, at: LinePosition, lines: &[String], wrap: impl FnMut(&str) -> Vec<String>) {
        let at = self.to_textual(at);
        let Some((first, rest)) = lines.split_first() else {
            return;
        };
        let Some(line) = self.textual.get_mut(at.line) else {
            return;
        };

        let split = byte_index(&line.text, at.column);
        let tail = line.text.split_off(split);
        line.text.push_str(first);
        if rest.is_empty() {
            line.text.push_str(&tail);
        } else {
            let mut added: Vec<TextualLine> = rest.iter().map(TextualLine::new).collect();
            if let Some(last) = added.last_mut() {
                last.text.push_str(&tail);
            }
            self.textual.splice(at.line + 1..at.line + 1, added);
        }
        self.relayout(wrap);
    }

    /// Remove the text between two positions, in either order
    pub fn remove(&mut self, start: LinePosition, end: LinePosition, wrap: impl FnMut(&str) -> Vec<String>) {
        let (start, end) = self.ordered(start, end);
        let tail = {
            let line = &self.textual[end.line].text;
            line[byte_index(line, end.column)..].to_string()
        };
        let line = &mut self.textual[start.line].text;
        let cut = byte_index(line, start.column);
        line.truncate(cut);
        line.push_str(&tail);
        self.textual.drain(start.line + 1..=end.line);
        self.relayout(wrap);
    }

    /// Text between two positions, lines joined with `\n`
    pub fn text_between(&self, start: LinePosition, end: LinePosition) -> String {
        let (start, end) = self.ordered(start, end);
        if start.line == end.line {
            return char_slice(&self.textual[start.line].text, start.column, end.column).to_string();
        }

        let mut parts = Vec::with_capacity(end.line - start.line + 1);
        let first = &self.textual[start.line].text;
        parts.push(&first[byte_index(first, start.column)..]);
        for line in &self.textual[start.line + 1..end.line] {
            parts.push(line.text.as_str());
        }
        let last = &self.textual[end.line].text;
        parts.push(&last[..byte_index(last, end.column)]);
        parts.join("\n")
    }

    /// Both positions as textual, clamped to the buffer and in order
    fn ordered(&self, a: LinePosition, b: LinePosition) -> (LinePosition, LinePosition) {
        let clamp = |pos: LinePosition| {
            let pos = self.to_textual(pos);
            let line = pos.line.min(self.textual.len() - 1);
            LinePosition::textual(line, pos.column.min(self.textual[line].len()))
        };
        let (a, b) = (clamp(a), clamp(b));
        if (a.line, a.column) <= (b.line, b.column) {
            (a, b)
        } else {
            (b, a)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Wrap after every space, keeping the space
    fn split_words(text: &str) -> Vec<String> {
        let mut out: Vec<String> = text.split_inclusive(' ').map(str::to_string).collect();
        if out.is_empty() {
            out.push(String::new());
        }
        out
    }

    fn no_wrap(text: &str) -> Vec<String> {
        vec![text.to_string()]
    }

    #[test]
    fn test_visual_ranges() {
        let layout = LineLayout::from_text("ab cd\nef", split_words);
        let texts: Vec<&str> = layout.visual_lines().iter().map(VisualLine::text).collect();
        assert_eq!(texts, vec!["ab ", "cd", "ef"]);
        assert_eq!(layout.textual_lines()[0].visual_range(), 0..2);
        assert_eq!(layout.textual_lines()[1].visual_range(), 2..3);
    }

    #[test]
    fn test_conversions() {
        let layout = LineLayout::from_text("ab cd\nef", split_words);
        assert_eq!(layout.to_visual(LinePosition::textual(0, 4)), LinePosition::visual(1, 1));
        assert_eq!(layout.to_visual(LinePosition::textual(0, 3)), LinePosition::visual(0, 3));
        assert_eq!(layout.to_textual(LinePosition::visual(1, 0)), LinePosition::textual(0, 3));
        assert_eq!(layout.to_textual(LinePosition::visual(2, 1)), LinePosition::textual(1, 1));
    }

    #[test]
    fn test_word_boundaries() {
        let layout = LineLayout::from_text("hello world", no_wrap);
        assert_eq!(
            layout.nearest_word_boundary(LinePosition::textual(0, 5), Direction::Right),
            LinePosition::textual(0, 11)
        );
        assert_eq!(
            layout.nearest_word_boundary(LinePosition::textual(0, 6), Direction::Left),
            LinePosition::textual(0, 0)
        );
    }

    #[test]
    fn test_word_boundary_stops_at_line_break() {
        let layout = LineLayout::from_text("ab\ncd", no_wrap);
        assert_eq!(
            layout.nearest_word_boundary(LinePosition::textual(1, 0), Direction::Left),
            LinePosition::textual(0, 2)
        );
        assert_eq!(
            layout.nearest_word_boundary(LinePosition::textual(0, 0), Direction::Right),
            LinePosition::textual(0, 2)
        );
    }

    #[test]
    fn test_offset_skips_soft_wrap_stop() {
        let layout = LineLayout::from_text("ab cd", split_words);
        let before_space = layout.offset_column(LinePosition::visual(1, 0), -1);
        assert_eq!(before_space, LinePosition::visual(0, 2));
        let after_space = layout.offset_column(LinePosition::visual(0, 2), 1);
        assert_eq!(after_space, LinePosition::visual(1, 0));
    }

    #[test]
    fn test_offset_from_soft_wrap_end_moves_past_next_char() {
        let layout = LineLayout::from_text("ab cd", split_words);
        let next = layout.offset_column(LinePosition::visual(0, 3), 1);
        assert_eq!(next, LinePosition::visual(1, 1));
        assert_eq!(layout.to_textual(next), LinePosition::textual(0, 4));
    }

    #[test]
    fn test_offset_across_broken_word() {
        let split_three = |text: &str| -> Vec<String> {
            let chars: Vec<char> = text.chars().collect();
            chars.chunks(3).map(|c| c.iter().collect()).collect()
        };
        let layout = LineLayout::from_text("abcdef", split_three);
        let forward = layout.offset_column(LinePosition::visual(0, 3), 1);
        assert_eq!(layout.to_textual(forward), LinePosition::textual(0, 4));
        let back = layout.offset_column(LinePosition::visual(1, 0), -1);
        assert_eq!(layout.to_textual(back), LinePosition::textual(0, 2));
    }

    #[test]
    fn test_insert_and_remove() {
        let mut layout = LineLayout::from_text("hello world", no_wrap);
        layout.insert(
            LinePosition::textual(0, 5),
            &[",".to_string(), "big".to_string()],
            no_wrap,
        );
        assert_eq!(layout.text(), "hello,\nbig world");

        layout.remove(LinePosition::textual(1, 3), LinePosition::textual(0, 5), no_wrap);
        assert_eq!(layout.text(), "hello world");
    }

    #[test]
    fn test_text_between_lines() {
        let layout = LineLayout::from_text("one\ntwo\nthree", no_wrap);
        let text = layout.text_between(LinePosition::textual(0, 1), LinePosition::textual(2, 2));
        assert_eq!(text, "ne\ntwo\nth");
    }
}
