//! Editable text field
//!
//! [`TextInput`] keeps a [`LineLayout`] and a caret/selection pair, both
//! stored as visual positions. Input arrives as discrete key and mouse
//! events with coordinates relative to the field's top-left corner; the
//! owner calls [`TextInput::animation_frame`] once per tick and
//! [`TextInput::draw`] to paint.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use super::clipboard::{Clipboard, MemoryClipboard};
use super::font::{FontProvider, DEFAULT_LINE_HEIGHT};
use super::lines::{char_len, char_slice, Direction, LineLayout, LinePosition};
use super::wrap::WordWrap;
use crate::animation::{AnimationComponent, Animations};
use crate::constraints::Rgba;
use crate::render::{Rect, Renderer};

const ROW: f32 = DEFAULT_LINE_HEIGHT;

/// Line behavior of a [`TextInput`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInputMode {
    /// Newlines become spaces; scrolls horizontally
    SingleLine,
    /// Wraps to the field width; scrolls vertically. With `max_lines` the
    /// height follows the content up to that many rows.
    MultiLine { max_lines: Option<usize> },
}

/// Granularity of a mouse selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    #[default]
    None,
    Character,
    Word,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Backspace,
    Delete,
    Enter,
    Escape,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
    };
}

/// Colors for selected text, while active and while inactive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionColors {
    pub background: Rgba,
    pub foreground: Rgba,
    pub inactive_background: Rgba,
    pub inactive_foreground: Rgba,
}

impl Default for SelectionColors {
    fn default() -> Self {
        Self {
            background: Rgba::WHITE,
            foreground: Rgba::rgb(64, 139, 229),
            inactive_background: Rgba::rgb(176, 176, 176),
            inactive_foreground: Rgba::WHITE,
        }
    }
}

type TextCallback = Box<dyn FnMut(&str)>;

pub struct TextInput {
    mode: TextInputMode,
    font: Rc<dyn FontProvider>,
    layout: LineLayout,
    width: f32,
    height: f32,
    width_bounds: Option<(f32, f32)>,
    placeholder: String,
    password_char: Option<char>,
    colors: SelectionColors,
    allow_inactive_selection: bool,
    active: bool,

    cursor: LinePosition,
    other_end: LinePosition,
    selection_mode: SelectionMode,
    initial_line: usize,
    initial_word: (LinePosition, LinePosition),

    vertical_offset: f32,
    target_vertical_offset: f32,
    horizontal_offset: f32,
    needs_refocus: bool,
    drag_scroll_ready: bool,

    fps: u32,
    blink: AnimationComponent<f32>,

    clipboard: Box<dyn Clipboard>,
    on_update: Option<TextCallback>,
    on_activate: Option<TextCallback>,
}

impl fmt::Debug for TextInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextInput")
            .field("mode", &self.mode)
            .field("text", &self.text())
            .field("active", &self.active)
            .field("cursor", &self.cursor)
            .field("other_end", &self.other_end)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl TextInput {
    pub fn new(mode: TextInputMode, font: Rc<dyn FontProvider>) -> Self {
        let fps = 244;
        Self {
            mode,
            font,
            layout: LineLayout::new(),
            width: 0.0,
            height: ROW,
            width_bounds: None,
            placeholder: String::new(),
            password_char: None,
            colors: SelectionColors::default(),
            allow_inactive_selection: false,
            active: false,
            cursor: LinePosition::visual(0, 0),
            other_end: LinePosition::visual(0, 0),
            selection_mode: SelectionMode::None,
            initial_line: 0,
            initial_word: (LinePosition::visual(0, 0), LinePosition::visual(0, 0)),
            vertical_offset: 0.0,
            target_vertical_offset: 0.0,
            horizontal_offset: 0.0,
            needs_refocus: false,
            drag_scroll_ready: true,
            fps,
            blink: Self::blink_towards(fps, 0.0, 1.0),
            clipboard: Box::new(MemoryClipboard::new()),
            on_update: None,
            on_activate: None,
        }
    }

    pub fn single_line(font: Rc<dyn FontProvider>) -> Self {
        Self::new(TextInputMode::SingleLine, font)
    }

    pub fn multi_line(font: Rc<dyn FontProvider>) -> Self {
        Self::new(TextInputMode::MultiLine { max_lines: None }, font)
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.set_width(width);
        self
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Size a single-line field to its text, clamped to `min..=max`
    pub fn with_width_bounds(mut self, min: f32, max: f32) -> Self {
        self.width_bounds = Some((min, max));
        self.recalculate_dimensions();
        self
    }

    pub fn with_max_lines(mut self, max_lines: usize) -> Self {
        if let TextInputMode::MultiLine { max_lines: slot } = &mut self.mode {
            *slot = Some(max_lines);
        }
        self.recalculate_dimensions();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self.recalculate_dimensions();
        self
    }

    /// Draw every character as `ch`
    pub fn with_password_char(mut self, ch: char) -> Self {
        self.password_char = Some(ch);
        self
    }

    pub fn with_selection_colors(mut self, colors: SelectionColors) -> Self {
        self.colors = colors;
        self
    }

    /// Keep and draw the selection while inactive
    pub fn with_inactive_selection(mut self, allow: bool) -> Self {
        self.allow_inactive_selection = allow;
        self
    }

    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    pub fn with_animation_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self.blink = Self::blink_towards(fps, 0.0, 1.0);
        self
    }

    /// Called with the full text after every edit
    pub fn on_update(&mut self, listener: impl FnMut(&str) + 'static) {
        self.on_update = Some(Box::new(listener));
    }

    /// Called with the full text when Enter activates the field
    pub fn on_activate(&mut self, listener: impl FnMut(&str) + 'static) {
        self.on_activate = Some(Box::new(listener));
    }

    // ------------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------------

    pub fn mode(&self) -> TextInputMode {
        self.mode
    }

    pub fn text(&self) -> String {
        self.layout.text()
    }

    pub fn has_text(&self) -> bool {
        self.layout.has_text()
    }

    pub fn layout(&self) -> &LineLayout {
        &self.layout
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn cursor(&self) -> LinePosition {
        self.cursor
    }

    pub fn other_selection_end(&self) -> LinePosition {
        self.other_end
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.selection_mode
    }

    pub fn vertical_offset(&self) -> f32 {
        self.vertical_offset
    }

    pub fn target_vertical_offset(&self) -> f32 {
        self.target_vertical_offset
    }

    pub fn horizontal_offset(&self) -> f32 {
        self.horizontal_offset
    }

    pub fn has_selection(&self) -> bool {
        self.cursor != self.other_end
    }

    pub fn selection_start(&self) -> LinePosition {
        match self.layout.compare(self.cursor, self.other_end) {
            Ordering::Greater => self.other_end,
            _ => self.cursor,
        }
    }

    pub fn selection_end(&self) -> LinePosition {
        match self.layout.compare(self.cursor, self.other_end) {
            Ordering::Greater => self.cursor,
            _ => self.other_end,
        }
    }

    pub fn selection(&self) -> (LinePosition, LinePosition) {
        (self.selection_start(), self.selection_end())
    }

    pub fn selected_text(&self) -> String {
        self.layout.text_between(self.selection_start(), self.selection_end())
    }

    pub fn set_width(&mut self, width: f32) {
        if self.width != width {
            self.width = width;
            self.relayout();
        }
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = height;
    }

    /// Replace all text, leaving the caret at the end
    pub fn set_text(&mut self, text: &str) {
        self.set_cursor_position(self.layout.start());
        let end = self.layout.end();
        self.remove_text(self.layout.start(), end);
        self.add_text(text);
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        if active {
            self.blink = Self::blink_towards(self.fps, 0.0, 1.0);
        } else if self.has_text() && (!self.allow_inactive_selection || !self.has_selection()) {
            self.set_cursor_position(self.layout.end());
        }
        self.recalculate_dimensions();
    }

    /// Opacity of the caret in the blink cycle
    pub fn cursor_alpha(&self) -> f32 {
        let from = *self.blink.old_value();
        let to = *self.blink.new_value();
        from + (to - from) * self.blink.percent_complete()
    }

    // ------------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------------

    pub fn key_typed(&mut self, key: Key, modifiers: Modifiers) {
        if !self.active {
            return;
        }

        match key {
            Key::Escape => self.set_active(false),
            Key::Char(ch) if modifiers.ctrl => match ch.to_ascii_lowercase() {
                'a' => self.select_all(),
                'c' => self.copy_selection(),
                'x' if self.has_selection() => {
                    self.copy_selection();
                    self.delete_selection();
                }
                'v' => {
                    if let Some(text) = self.clipboard.get() {
                        self.add_text(&text);
                    }
                }
                _ => {}
            },
            Key::Char(ch) if !ch.is_control() => {
                let mut buf = [0u8; 4];
                self.add_text(ch.encode_utf8(&mut buf));
            }
            Key::Char(_) => {}
            Key::Left | Key::Right => {
                let (direction, offset) = if key == Key::Left {
                    (Direction::Left, -1)
                } else {
                    (Direction::Right, 1)
                };
                let target = if modifiers.ctrl {
                    self.layout.nearest_word_boundary(self.cursor, direction)
                } else if self.has_selection() && !modifiers.shift {
                    if key == Key::Left {
                        self.selection_start()
                    } else {
                        self.selection_end()
                    }
                } else {
                    self.layout.offset_column(self.cursor, offset)
                };
                self.move_cursor(target, modifiers.shift);
            }
            Key::Up => {
                let target = if self.cursor.line == 0 {
                    self.layout.start()
                } else {
                    let (x, _) = self.cursor_screen_pos();
                    self.position_in_row(self.cursor.line - 1, x)
                };
                self.move_cursor(target, modifiers.shift);
            }
            Key::Down => {
                let last = self.layout.visual_lines().len() - 1;
                let target = if self.cursor.line == last {
                    self.layout.end()
                } else {
                    let (x, _) = self.cursor_screen_pos();
                    self.position_in_row(self.cursor.line + 1, x)
                };
                self.move_cursor(target, modifiers.shift);
            }
            Key::Backspace => {
                if self.has_selection() {
                    self.delete_selection();
                } else if !self.layout.is_at_absolute_start(self.cursor) {
                    let end = self.layout.to_textual(self.cursor);
                    let start = self.layout.offset_column(end, -1);
                    self.remove_text(start, end);
                    self.set_cursor_position(start);
                }
            }
            Key::Delete => {
                if self.has_selection() {
                    self.delete_selection();
                } else if !self.layout.is_at_absolute_end(self.cursor) {
                    let start = self.layout.to_textual(self.cursor);
                    let end = self.layout.offset_column(start, 1);
                    self.remove_text(start, end);
                    self.set_cursor_position(start);
                }
            }
            Key::Home => self.move_cursor(self.cursor.with_column(0), modifiers.shift),
            Key::End => {
                let end = self.cursor.with_column(self.layout.line_len(self.cursor));
                self.move_cursor(end, modifiers.shift);
            }
            Key::Enter => match self.mode {
                TextInputMode::MultiLine { .. } if modifiers.shift => self.add_text("\n"),
                _ => self.activate(),
            },
        }
    }

    /// Left-button clicks select by character, word or line on the first,
    /// second and third click
    pub fn mouse_click(&mut self, x: f32, y: f32, button: u8, click_count: u32) {
        if !self.active || button != 0 {
            return;
        }

        let clicked = self.screen_pos_to_visual(x, y);
        let mut count = click_count % 3;
        if (count == 0 && clicked.line != self.cursor.line) || (count == 2 && self.cursor != clicked) {
            count = 1;
        }

        match count {
            0 => {
                self.selection_mode = SelectionMode::Line;
                self.initial_line = clicked.line;
                self.cursor = clicked.with_column(0);
                self.other_end = clicked.with_column(self.layout.line_len(clicked));
                self.needs_refocus = true;
            }
            1 => {
                self.selection_mode = SelectionMode::Character;
                self.set_cursor_position(clicked);
            }
            _ => {
                self.selection_mode = SelectionMode::Word;
                self.cursor = self
                    .layout
                    .to_visual(self.layout.nearest_word_boundary(clicked, Direction::Left));
                self.other_end = self
                    .layout
                    .to_visual(self.layout.nearest_word_boundary(clicked, Direction::Right));
                self.initial_word = (self.cursor, self.other_end);
                self.needs_refocus = true;
            }
        }
    }

    /// Extend the selection; dragging past an edge scrolls, at most once
    /// per tick
    pub fn mouse_drag(&mut self, x: f32, y: f32, button: u8) {
        if button != 0 || self.selection_mode == SelectionMode::None {
            return;
        }

        let dragged = self.screen_pos_to_visual(x, y);
        match self.selection_mode {
            SelectionMode::Character => self.other_end = dragged,
            SelectionMode::Line => {
                if self.initial_line < dragged.line {
                    self.cursor = LinePosition::visual(self.initial_line, 0);
                    self.other_end = dragged.with_column(self.layout.line_len(dragged));
                } else {
                    let initial = LinePosition::visual(self.initial_line, 0);
                    self.cursor = dragged.with_column(0);
                    self.other_end = initial.with_column(self.layout.line_len(initial));
                }
            }
            SelectionMode::Word => {
                let (first, second) = self.initial_word;
                if self.layout.compare(dragged, first) == Ordering::Less {
                    self.cursor = self
                        .layout
                        .to_visual(self.layout.nearest_word_boundary(dragged, Direction::Left));
                    self.other_end = second;
                } else if self.layout.compare(dragged, second) == Ordering::Greater {
                    self.cursor = first;
                    self.other_end = self
                        .layout
                        .to_visual(self.layout.nearest_word_boundary(dragged, Direction::Right));
                } else {
                    self.cursor = first;
                    self.other_end = second;
                }
            }
            SelectionMode::None => {}
        }

        if !self.drag_scroll_ready {
            return;
        }
        let scrolled = if y <= 0.0 {
            self.target_vertical_offset = (self.target_vertical_offset + ROW).min(0.0);
            true
        } else if y >= self.height {
            let overflow = self.overflow();
            self.target_vertical_offset = (self.target_vertical_offset - ROW).clamp(overflow.min(0.0), 0.0);
            true
        } else if x <= 0.0 {
            self.scroll_into_view(self.layout.offset_column(dragged, -1));
            true
        } else if x >= self.width {
            self.scroll_into_view(self.layout.offset_column(dragged, 1));
            true
        } else {
            false
        };
        if scrolled {
            self.drag_scroll_ready = false;
        }
    }

    pub fn mouse_release(&mut self) {
        self.selection_mode = SelectionMode::None;
    }

    /// Scroll by `delta` rows when the content overflows
    pub fn mouse_scroll(&mut self, delta: f32) {
        let overflow = self.overflow();
        if overflow > 0.0 {
            return;
        }
        self.target_vertical_offset = (self.target_vertical_offset + delta * ROW).clamp(overflow, 0.0);
    }

    /// Per-tick update: smooth scrolling, sizing, refocus and caret blink
    pub fn animation_frame(&mut self) {
        let diff = (self.target_vertical_offset - self.vertical_offset) * 0.1;
        if diff.abs() < 0.25 {
            self.vertical_offset = self.target_vertical_offset;
        } else {
            self.vertical_offset += diff;
        }

        self.recalculate_dimensions();

        if self.needs_refocus {
            self.scroll_into_view(self.cursor);
            self.needs_refocus = false;
        }
        self.drag_scroll_ready = true;

        if self.active {
            self.blink.advance();
            if self.blink.is_complete() {
                let from = *self.blink.new_value();
                self.blink = Self::blink_towards(self.fps, from, 1.0 - from);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------------

    /// Rows are packed one space narrower than the field so the hanging
    /// space of a full row still fits
    fn line_wrapper(&self) -> impl Fn(&str) -> Vec<String> + 'static {
        let font = Rc::clone(&self.font);
        let width = self.width - self.font.char_width(' ', DEFAULT_LINE_HEIGHT);
        let wraps = matches!(self.mode, TextInputMode::MultiLine { .. });
        move |text: &str| {
            if wraps {
                WordWrap::new(font.as_ref()).split(text, width)
            } else {
                vec![text.to_string()]
            }
        }
    }

    fn relayout(&mut self) {
        let cursor = self.layout.to_textual(self.cursor);
        let other_end = self.layout.to_textual(self.other_end);
        let wrap = self.line_wrapper();
        self.layout.relayout(wrap);
        self.cursor = self.layout.to_visual(cursor);
        self.other_end = self.layout.to_visual(other_end);
    }

    fn text_to_lines(&self, text: &str) -> Vec<String> {
        match self.mode {
            TextInputMode::SingleLine => vec![text.replace('\n', " ")],
            TextInputMode::MultiLine { .. } => text.split('\n').map(str::to_string).collect(),
        }
    }

    /// Insert at the caret, replacing any selection
    pub fn add_text(&mut self, text: &str) {
        if self.has_selection() {
            self.delete_selection();
        }
        if text.is_empty() {
            return;
        }

        let at = self.layout.to_textual(self.cursor);
        let lines = self.text_to_lines(text);
        let wrap = self.line_wrapper();
        self.layout.insert(at, &lines, wrap);

        let after = self.layout.offset_column(at, char_len(text) as isize);
        self.set_cursor_position(after);
        self.recalculate_dimensions();
        self.notify_update();
    }

    fn remove_text(&mut self, start: LinePosition, end: LinePosition) {
        let wrap = self.line_wrapper();
        self.layout.remove(start, end, wrap);

        let overflow = self.overflow();
        if self.vertical_offset < overflow {
            self.target_vertical_offset = overflow.min(0.0);
        }
        self.recalculate_dimensions();
        self.notify_update();
    }

    pub fn delete_selection(&mut self) {
        if !self.has_selection() {
            return;
        }
        let (start, end) = self.selection();
        let anchor = self.layout.to_textual(start);
        self.remove_text(start, end);
        self.set_cursor_position(anchor);
    }

    pub fn select_all(&mut self) {
        self.cursor = self.layout.start();
        self.other_end = self.layout.end();
    }

    pub fn copy_selection(&mut self) {
        if !self.has_selection() {
            return;
        }
        let text = self.selected_text();
        self.clipboard.set(&text);
    }

    fn activate(&mut self) {
        let text = self.text();
        if let Some(listener) = self.on_activate.as_mut() {
            listener(&text);
        }
    }

    fn notify_update(&mut self) {
        let text = self.text();
        if let Some(listener) = self.on_update.as_mut() {
            listener(&text);
        }
    }

    /// Collapse the selection onto `pos`
    pub fn set_cursor_position(&mut self, pos: LinePosition) {
        let pos = self.layout.to_visual(pos);
        self.cursor = pos;
        self.other_end = pos;
        self.needs_refocus = true;
    }

    fn move_cursor(&mut self, target: LinePosition, extend: bool) {
        if extend {
            self.cursor = self.layout.to_visual(target);
            self.needs_refocus = true;
        } else {
            self.set_cursor_position(target);
        }
    }

    fn blink_towards(fps: u32, from: f32, to: f32) -> AnimationComponent<f32> {
        let strategy = if to > from {
            Animations::OutCircular
        } else {
            Animations::InCircular
        };
        AnimationComponent::new(strategy, fps / 2, from, to, 0)
    }

    // ------------------------------------------------------------------------
    // Geometry
    // ------------------------------------------------------------------------

    fn display<'t>(&self, text: &'t str) -> Cow<'t, str> {
        match self.password_char {
            Some(mask) => Cow::Owned(std::iter::repeat(mask).take(char_len(text)).collect()),
            None => Cow::Borrowed(text),
        }
    }

    fn text_width(&self, text: &str) -> f32 {
        self.font.string_width(&self.display(text), DEFAULT_LINE_HEIGHT)
    }

    /// Height left over after all rows; negative when content overflows
    fn overflow(&self) -> f32 {
        self.height - self.layout.visual_lines().len() as f32 * ROW
    }

    fn recalculate_dimensions(&mut self) {
        match self.mode {
            TextInputMode::SingleLine => {
                if let Some((min, max)) = self.width_bounds {
                    let natural = if !self.has_text() && !self.active {
                        self.font.string_width(&self.placeholder, DEFAULT_LINE_HEIGHT)
                    } else {
                        self.text_width(&self.text())
                    };
                    self.width = natural.clamp(min, max.max(min));
                }
            }
            TextInputMode::MultiLine { max_lines: Some(max_lines) } => {
                let rows = self.layout.visual_lines().len().min(max_lines.max(1));
                self.height = rows as f32 * ROW;
            }
            TextInputMode::MultiLine { max_lines: None } => {}
        }
    }

    /// Caret offset from the field origin, after scrolling
    pub fn cursor_screen_pos(&self) -> (f32, f32) {
        self.screen_pos(self.cursor)
    }

    fn screen_pos(&self, pos: LinePosition) -> (f32, f32) {
        let pos = self.layout.to_visual(pos);
        let line = self.layout.visual_lines()[pos.line].text();
        let x = self.text_width(char_slice(line, 0, pos.column)) - self.horizontal_offset;
        let y = ROW * pos.line as f32 + self.vertical_offset;
        (x, y)
    }

    /// Column in visual row `row` nearest to content x `x`
    fn position_in_row(&self, row: usize, x: f32) -> LinePosition {
        let line = self.layout.visual_lines()[row].text();
        let target = x + self.horizontal_offset;
        let mut current = 0.0;
        for (column, ch) in line.chars().enumerate() {
            let width = self.text_width(ch.encode_utf8(&mut [0u8; 4]));
            if current + width / 2.0 >= target {
                return LinePosition::visual(row, column);
            }
            current += width;
        }
        LinePosition::visual(row, char_len(line))
    }

    fn screen_pos_to_visual(&self, x: f32, y: f32) -> LinePosition {
        match self.mode {
            TextInputMode::SingleLine => self.position_in_row(0, x),
            TextInputMode::MultiLine { .. } => {
                let y = y - self.vertical_offset;
                if y <= 0.0 {
                    return self.layout.start();
                }
                let row = (y / ROW) as usize;
                let last = self.layout.visual_lines().len() - 1;
                if row > last {
                    return self.layout.end();
                }
                if x <= 0.0 {
                    return LinePosition::visual(row, 0);
                }
                if x >= self.width {
                    return LinePosition::visual(row, self.layout.visual_lines()[row].len());
                }
                self.position_in_row(row, x)
            }
        }
    }

    fn scroll_into_view(&mut self, pos: LinePosition) {
        let pos = self.layout.to_visual(pos);
        match self.mode {
            TextInputMode::SingleLine => {
                let line = self.layout.visual_lines()[0].text();
                if pos.column > char_len(line) {
                    return;
                }
                let before = self.text_width(char_slice(line, 0, pos.column));
                if self.text_width(line) < self.width {
                    self.horizontal_offset = 0.0;
                } else if self.horizontal_offset > before {
                    self.horizontal_offset = before;
                } else if before - self.horizontal_offset > self.width {
                    self.horizontal_offset = before - self.width;
                }
            }
            TextInputMode::MultiLine { .. } => {
                let line_offset = pos.line as f32 * -ROW;
                if self.target_vertical_offset < line_offset {
                    self.target_vertical_offset = line_offset;
                } else if line_offset - ROW < self.target_vertical_offset - self.height {
                    self.target_vertical_offset += line_offset - ROW - (self.target_vertical_offset - self.height);
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------------

    /// Paint the field with its top-left corner at (`left`, `top`). Rows
    /// scrolled fully outside the field are skipped.
    pub fn draw(&self, renderer: &mut dyn Renderer, left: f32, top: f32, color: Rgba) {
        if !self.active && !self.has_text() {
            renderer.draw_text(&self.placeholder, left, top, DEFAULT_LINE_HEIGHT, color);
            return;
        }

        let (start, end) = self.selection();
        let show_selection = self.has_selection() && (self.active || self.allow_inactive_selection);
        let (background, foreground) = if self.active {
            (self.colors.background, self.colors.foreground)
        } else {
            (self.colors.inactive_background, self.colors.inactive_foreground)
        };
        let x = left - self.horizontal_offset;

        for (row, line) in self.layout.visual_lines().iter().enumerate() {
            let y = top + row as f32 * ROW + self.vertical_offset;
            if y + ROW <= top || y >= top + self.height {
                continue;
            }
            let text = self.display(line.text());

            if !show_selection || row < start.line || row > end.line {
                renderer.draw_text(&text, x, y, DEFAULT_LINE_HEIGHT, color);
                continue;
            }

            let from = if row == start.line { start.column } else { 0 };
            let to = if row == end.line { end.column } else { char_len(&text) };
            let before = char_slice(&text, 0, from);
            let selected = char_slice(&text, from, to);
            let after = char_slice(&text, to, usize::MAX);

            let selected_x = x + self.font.string_width(before, DEFAULT_LINE_HEIGHT);
            let selected_width = self.font.string_width(selected, DEFAULT_LINE_HEIGHT);
            if !before.is_empty() {
                renderer.draw_text(before, x, y, DEFAULT_LINE_HEIGHT, color);
            }
            renderer.draw_rect(Rect::new(selected_x, y, selected_width, ROW), 0.0, background);
            if !selected.is_empty() {
                renderer.draw_text(selected, selected_x, y, DEFAULT_LINE_HEIGHT, foreground);
            }
            if !after.is_empty() {
                renderer.draw_text(after, selected_x + selected_width, y, DEFAULT_LINE_HEIGHT, color);
            }
        }

        if self.active && !self.has_selection() {
            let (cursor_x, cursor_y) = self.cursor_screen_pos();
            let alpha = (self.cursor_alpha().clamp(0.0, 1.0) * 255.0).round() as u8;
            renderer.draw_rect(
                Rect::new(left + cursor_x, top + cursor_y, 1.0, ROW),
                0.0,
                Rgba::WHITE.with_alpha(alpha),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::FixedWidthFont;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    fn font() -> Rc<dyn FontProvider> {
        Rc::new(FixedWidthFont::default())
    }

    fn typed(input: &mut TextInput, text: &str) {
        for ch in text.chars() {
            input.key_typed(Key::Char(ch), Modifiers::NONE);
        }
    }

    fn active_single() -> TextInput {
        let mut input = TextInput::single_line(font()).with_width(100.0);
        input.set_active(true);
        input
    }

    #[test]
    fn test_typing_inserts_at_cursor() {
        let mut input = active_single();
        typed(&mut input, "helo");
        input.key_typed(Key::Left, Modifiers::NONE);
        typed(&mut input, "l");
        assert_eq!(input.text(), "hello");
        assert_eq!(input.cursor(), LinePosition::visual(0, 4));
    }

    #[test]
    fn test_inactive_ignores_keys() {
        let mut input = TextInput::single_line(font());
        typed(&mut input, "abc");
        assert_eq!(input.text(), "");
    }

    #[test]
    fn test_shift_extends_selection() {
        let mut input = active_single();
        typed(&mut input, "hello world");
        input.key_typed(Key::Left, Modifiers { shift: true, ctrl: true });
        assert_eq!(input.selected_text(), "world");

        input.key_typed(Key::Backspace, Modifiers::NONE);
        assert_eq!(input.text(), "hello ");
        assert!(!input.has_selection());
    }

    #[test]
    fn test_clipboard_round_trip() {
        let clipboard = MemoryClipboard::new();
        let mut input = TextInput::single_line(font()).with_clipboard(clipboard.clone());
        input.set_active(true);
        typed(&mut input, "copy me");
        input.key_typed(Key::Char('a'), Modifiers::CTRL);
        input.key_typed(Key::Char('x'), Modifiers::CTRL);
        assert_eq!(input.text(), "");
        assert_eq!(clipboard.get().as_deref(), Some("copy me"));

        input.key_typed(Key::Char('v'), Modifiers::CTRL);
        input.key_typed(Key::Char('v'), Modifiers::CTRL);
        assert_eq!(input.text(), "copy mecopy me");
    }

    #[test]
    fn test_single_line_flattens_newlines() {
        let mut input = active_single();
        input.add_text("a\nb");
        assert_eq!(input.text(), "a b");
    }

    #[test]
    fn test_enter_activates_single_line() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut input = active_single();
        let sink = Rc::clone(&seen);
        input.on_activate(move |text| sink.borrow_mut().push(text.to_string()));
        typed(&mut input, "go");
        input.key_typed(Key::Enter, Modifiers::NONE);
        assert_eq!(*seen.borrow(), vec!["go".to_string()]);
    }

    #[test]
    fn test_shift_enter_breaks_multi_line() {
        let mut input = TextInput::multi_line(font()).with_width(100.0);
        input.set_active(true);
        typed(&mut input, "ab");
        input.key_typed(Key::Left, Modifiers::NONE);
        input.key_typed(Key::Enter, Modifiers::SHIFT);
        assert_eq!(input.text(), "a\nb");
        assert_eq!(input.cursor(), LinePosition::visual(1, 0));
    }

    #[test]
    fn test_multi_line_wraps_and_grows_to_max_lines() {
        let mut input = TextInput::multi_line(font()).with_width(48.0).with_max_lines(2);
        input.set_active(true);
        typed(&mut input, "aaa bbb ccc ddd eee");
        let rows: Vec<&str> = input.layout().visual_lines().iter().map(|l| l.text()).collect();
        assert_eq!(rows, vec!["aaa bbb ", "ccc ddd ", "eee"]);
        assert_eq!(input.height(), 18.0);
    }

    #[test]
    fn test_wrap_leaves_one_space_of_slack() {
        let mut input = TextInput::multi_line(font()).with_width(42.0);
        input.set_active(true);
        input.add_text("aaa bbb ccc");
        let rows: Vec<&str> = input.layout().visual_lines().iter().map(|l| l.text()).collect();
        assert_eq!(rows, vec!["aaa ", "bbb ", "ccc"]);
    }

    /// "ab cd" in a 20px field wraps to "ab " / "cd"
    fn wrapped_ab_cd() -> TextInput {
        let mut input = TextInput::multi_line(font()).with_width(20.0);
        input.set_active(true);
        input.add_text("ab cd");
        let rows: Vec<&str> = input.layout().visual_lines().iter().map(|l| l.text()).collect();
        assert_eq!(rows, vec!["ab ", "cd"]);
        input
    }

    #[test]
    fn test_delete_at_end_of_wrapped_row() {
        let mut input = wrapped_ab_cd();
        input.set_cursor_position(LinePosition::textual(0, 3));
        assert_eq!(input.cursor(), LinePosition::visual(0, 3));
        input.key_typed(Key::Delete, Modifiers::NONE);
        assert_eq!(input.text(), "ab d");
        input.key_typed(Key::Delete, Modifiers::NONE);
        assert_eq!(input.text(), "ab ");
    }

    #[test]
    fn test_delete_at_start_of_continuation_row() {
        let mut input = wrapped_ab_cd();
        input.set_cursor_position(LinePosition::visual(1, 0));
        input.key_typed(Key::Delete, Modifiers::NONE);
        assert_eq!(input.text(), "ab d");
    }

    #[test]
    fn test_backspace_on_either_side_of_hanging_space() {
        let mut input = wrapped_ab_cd();
        input.set_cursor_position(LinePosition::visual(0, 3));
        input.key_typed(Key::Backspace, Modifiers::NONE);
        assert_eq!(input.text(), "abcd");

        let mut input = wrapped_ab_cd();
        input.set_cursor_position(LinePosition::visual(1, 0));
        input.key_typed(Key::Backspace, Modifiers::NONE);
        assert_eq!(input.text(), "abcd");
    }

    #[test]
    fn test_right_from_end_of_wrapped_row() {
        let mut input = wrapped_ab_cd();
        input.set_cursor_position(LinePosition::textual(0, 3));
        input.key_typed(Key::Right, Modifiers::NONE);
        assert_eq!(input.cursor(), LinePosition::visual(1, 1));
    }

    #[test]
    fn test_double_click_selects_word() {
        let mut input = active_single();
        typed(&mut input, "hello world");
        input.mouse_click(50.0, 4.0, 0, 1);
        input.mouse_click(50.0, 4.0, 0, 2);
        assert_eq!(input.selection_mode(), SelectionMode::Word);
        assert_eq!(input.selected_text(), "world");
    }

    #[test]
    fn test_deactivating_moves_cursor_to_end() {
        let mut input = active_single();
        typed(&mut input, "abc");
        input.key_typed(Key::Home, Modifiers::NONE);
        input.key_typed(Key::Escape, Modifiers::NONE);
        assert!(!input.is_active());
        assert_eq!(input.cursor(), LinePosition::visual(0, 3));
    }

    #[test]
    fn test_width_bounds_follow_text() {
        let mut input = TextInput::single_line(font())
            .with_placeholder("type")
            .with_width_bounds(10.0, 40.0);
        assert_eq!(input.width(), 24.0);
        input.set_active(true);
        typed(&mut input, "abcdefghij");
        assert_eq!(input.width(), 40.0);
    }
}
