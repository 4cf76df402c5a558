//! Greedy word wrapping

use super::font::{FontProvider, DEFAULT_LINE_HEIGHT};

/// What happens to the space that ends a wrapped line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrailingSpace {
    /// The space stays at the end of the line it follows, so the lines
    /// concatenate back to the input. Required by the text input engine.
    #[default]
    Hang,
    /// Trailing spaces are dropped from every line but the last
    Trim,
}

/// Splits text into lines no wider than a maximum.
///
/// Words are packed greedily. A space after a word always stays on that
/// word's line and is measured against the next word. A word wider than a
/// whole line is broken between characters. `\n` forces a break.
#[derive(Debug, Clone, Copy)]
pub struct WordWrap<'f> {
    font: &'f dyn FontProvider,
    point_size: f32,
    trailing_space: TrailingSpace,
}

impl<'f> WordWrap<'f> {
    pub fn new(font: &'f dyn FontProvider) -> Self {
        Self {
            font,
            point_size: DEFAULT_LINE_HEIGHT,
            trailing_space: TrailingSpace::default(),
        }
    }

    pub fn with_point_size(mut self, point_size: f32) -> Self {
        self.point_size = point_size;
        self
    }

    pub fn with_trailing_space(mut self, policy: TrailingSpace) -> Self {
        self.trailing_space = policy;
        self
    }

    fn width(&self, text: &str) -> f32 {
        self.font.string_width(text, self.point_size)
    }

    /// Wrap `text` to `max_width`. Always yields at least one line.
    pub fn split(&self, text: &str, max_width: f32) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let space = self.font.char_width(' ', self.point_size);

        let mut lines = Vec::new();
        let mut line = String::new();
        let mut line_width = 0.0f32;
        let mut pos = 0;

        while pos < chars.len() {
            let start = pos;
            while pos < chars.len() && chars[pos] != ' ' && chars[pos] != '\n' {
                pos += 1;
            }
            let word: String = chars[start..pos].iter().collect();
            let word_width = self.width(&word);

            if line_width + word_width > max_width {
                if word_width > max_width {
                    if line_width > 0.0 {
                        lines.push(std::mem::take(&mut line));
                        line_width = 0.0;
                    }
                    for ch in word.chars() {
                        let ch_width = self.font.char_width(ch, self.point_size);
                        line_width += ch_width;
                        if line_width > max_width && !line.is_empty() {
                            lines.push(std::mem::take(&mut line));
                            line_width = ch_width;
                        }
                        line.push(ch);
                    }
                } else {
                    lines.push(std::mem::take(&mut line));
                    line.push_str(&word);
                    line_width = word_width;
                }
            } else {
                line.push_str(&word);
                line_width += word_width;
            }

            match chars.get(pos) {
                Some(' ') => {
                    line.push(' ');
                    line_width += space;
                    pos += 1;
                }
                Some('\n') => {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0.0;
                    pos += 1;
                }
                _ => {}
            }
        }
        lines.push(line);

        if self.trailing_space == TrailingSpace::Trim {
            let last = lines.len() - 1;
            for line in &mut lines[..last] {
                let trimmed = line.trim_end_matches(' ').len();
                line.truncate(trimmed);
            }
        }
        lines
    }

    /// Wrap and keep at most `max_lines`, ending the last kept line with an
    /// ellipsis when text was dropped
    pub fn split_truncated(&self, text: &str, max_width: f32, max_lines: usize) -> Vec<String> {
        let mut lines = self.split(text, max_width);
        if lines.len() <= max_lines {
            return lines;
        }
        lines.truncate(max_lines);

        let ellipsis = self.width("...");
        if let Some(last) = lines.last_mut() {
            let mut kept: Vec<char> = last.chars().collect();
            kept.pop();
            while !kept.is_empty() && self.width(&kept.iter().collect::<String>()) + ellipsis > max_width {
                kept.pop();
            }
            *last = kept.into_iter().chain("...".chars()).collect();
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::FixedWidthFont;
    use pretty_assertions::assert_eq;

    fn font() -> FixedWidthFont {
        FixedWidthFont::default()
    }

    #[test]
    fn test_two_lines_with_hanging_space() {
        let font = font();
        let wrap = WordWrap::new(&font);
        let max = font.string_width("aaa bbb", DEFAULT_LINE_HEIGHT);
        assert_eq!(wrap.split("aaa bbb ccc", max), vec!["aaa bbb ", "ccc"]);
    }

    #[test]
    fn test_two_lines_with_trimmed_space() {
        let font = font();
        let wrap = WordWrap::new(&font).with_trailing_space(TrailingSpace::Trim);
        let max = font.string_width("aaa bbb", DEFAULT_LINE_HEIGHT);
        assert_eq!(wrap.split("aaa bbb ccc", max), vec!["aaa bbb", "ccc"]);
    }

    #[test]
    fn test_overlong_word_breaks_between_chars() {
        let font = font();
        let wrap = WordWrap::new(&font);
        assert_eq!(wrap.split("ab abcdefg", 24.0), vec!["ab ", "abcd", "efg"]);
    }

    #[test]
    fn test_newline_forces_break() {
        let font = font();
        let wrap = WordWrap::new(&font);
        assert_eq!(wrap.split("a\nb", 100.0), vec!["a", "b"]);
        assert_eq!(wrap.split("", 100.0), vec![""]);
    }

    #[test]
    fn test_hanging_lines_concatenate_to_input() {
        let font = font();
        let wrap = WordWrap::new(&font);
        let text = "the quick  brown fox jumps over the lazy dog";
        assert_eq!(wrap.split(text, 40.0).concat(), text);
    }

    #[test]
    fn test_truncated_adds_ellipsis() {
        let font = font();
        let wrap = WordWrap::new(&font);
        let lines = wrap.split_truncated("aaa bbb ccc", 42.0, 1);
        assert_eq!(lines, vec!["aaa ..."]);
    }
}
