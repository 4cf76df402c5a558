//! Line layout round trips and text input rendering

use std::rc::Rc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use trellis::constraints::Rgba;
use trellis::render::{Image, Rect, Renderer};
use trellis::text::{
    Direction, FixedWidthFont, FontProvider, Key, LineLayout, LinePosition, Modifiers, TextInput,
    WordWrap,
};

fn layout(text: &str, width: f32) -> LineLayout {
    let font = FixedWidthFont::default();
    let wrap = WordWrap::new(&font);
    LineLayout::from_text(text, |line| wrap.split(line, width))
}

#[derive(Debug, PartialEq)]
enum Call {
    Rect(Rect),
    Text(String, f32),
}

#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
}

impl Renderer for Recorder {
    fn draw_rect(&mut self, rect: Rect, _radius: f32, _color: Rgba) {
        self.calls.push(Call::Rect(rect));
    }

    fn draw_text(&mut self, text: &str, x: f32, _y: f32, _size: f32, _color: Rgba) {
        self.calls.push(Call::Text(text.to_string(), x));
    }

    fn draw_image(&mut self, _rect: Rect, _image: &Image, _tint: Rgba) {}
}

#[test]
fn test_word_boundaries_in_hello_world() {
    let layout = layout("hello world", 1000.0);
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
fn test_wrapped_lines_keep_text() {
    let layout = layout("the quick brown fox\njumps", 60.0);
    let visual: Vec<_> = layout.visual_lines().iter().map(|l| l.text()).collect();
    assert_eq!(visual, vec!["the quick ", "brown fox", "jumps"]);
    assert_eq!(layout.text(), "the quick brown fox\njumps");
}

#[test]
fn test_selection_drawn_between_plain_runs() {
    let font: Rc<dyn FontProvider> = Rc::new(FixedWidthFont::default());
    let mut input = TextInput::single_line(font).with_width(100.0);
    input.set_active(true);
    for ch in "hello world".chars() {
        input.key_typed(Key::Char(ch), Modifiers::NONE);
    }
    input.key_typed(Key::Left, Modifiers { shift: true, ctrl: true });

    let mut recorder = Recorder::default();
    input.draw(&mut recorder, 0.0, 0.0, Rgba::WHITE);
    assert_eq!(recorder.calls[0], Call::Text("hello ".to_string(), 0.0));
    assert!(matches!(recorder.calls[1], Call::Rect(rect) if rect.x == 36.0 && rect.width == 30.0));
    assert_eq!(recorder.calls[2], Call::Text("world".to_string(), 36.0));
    assert_eq!(recorder.calls.len(), 3);
}

proptest! {
    #[test]
    fn prop_textual_visual_round_trip(
        text in "[a-z ]{0,40}(\n[a-z ]{0,20}){0,3}",
        width in 6.0f32..120.0,
        line in any::<prop::sample::Index>(),
        column in any::<prop::sample::Index>(),
    ) {
        let layout = layout(&text, width);
        let lines = layout.textual_lines();
        let line = line.index(lines.len());
        let column = column.index(lines[line].len() + 1);
        let pos = LinePosition::textual(line, column);

        prop_assert_eq!(layout.to_textual(layout.to_visual(pos)), pos);
    }

    #[test]
    fn prop_hanging_wrap_concatenates(text in "[a-z ]{0,60}", width in 6.0f32..90.0) {
        let font = FixedWidthFont::default();
        let lines = WordWrap::new(&font).split(&text, width);
        prop_assert_eq!(lines.concat(), text);
    }
}
