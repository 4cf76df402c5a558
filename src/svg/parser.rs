//! Recursive-descent parser for SVG path data (the `d` attribute)

use super::element::{Arc, PathElement, Point};
use crate::error::PathParseError;

type Result<T> = std::result::Result<T, PathParseError>;

fn is_whitespace(c: char) -> bool {
    matches!(c, '\u{9}' | '\u{20}' | '\u{a}' | '\u{c}' | '\u{d}')
}

/// Which kind of curve the smooth commands may reflect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CurveKind {
    Quadratic,
    Cubic,
}

/// Parser state for one path string.
///
/// Tracks the cursor, the current point and the start of the current
/// subpath (the target of `Z`).
#[derive(Debug)]
pub struct PathParser<'a> {
    source: &'a str,
    cursor: usize,
    current: Point,
    subpath_start: Option<Point>,
    elements: Vec<PathElement>,
}

impl<'a> PathParser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            cursor: 0,
            current: Point::default(),
            subpath_start: None,
            elements: Vec::new(),
        }
    }

    /// Parse the whole string into segments
    pub fn parse(mut self) -> Result<Vec<PathElement>> {
        self.skip_whitespace();
        loop {
            let command_at = self.cursor;
            let Some(command) = self.consume() else {
                break;
            };
            let absolute = command.is_ascii_uppercase();
            self.skip_whitespace();
            match command.to_ascii_uppercase() {
                'M' => self.parse_moveto(absolute)?,
                'L' => {
                    for p in self.coordinate_pair_sequence()? {
                        let to = self.resolve(p, absolute);
                        self.line_to(to);
                    }
                }
                'H' | 'V' => {
                    let horizontal = command.eq_ignore_ascii_case(&'h');
                    for value in self.coordinate_sequence()? {
                        let mut to = self.current;
                        let axis = if horizontal { &mut to.x } else { &mut to.y };
                        *axis = if absolute { value } else { *axis + value };
                        self.line_to(to);
                    }
                }
                'Z' => {
                    let Some(start) = self.subpath_start else {
                        return Err(self.error(format!(
                            "{command} instruction encountered with no previous position data"
                        )));
                    };
                    self.elements.push(PathElement::line(self.current, start));
                    self.current = start;
                }
                'A' => loop {
                    self.begin_segment();
                    let element = self.parse_arc(absolute)?;
                    self.elements.push(element);
                    if !self.at_coordinate() {
                        break;
                    }
                },
                'C' => {
                    for points in self.curve_sequence(Self::coordinate_pair_triple)? {
                        let start = self.begin_segment();
                        let [control1, control2, end] = points.map(|p| self.resolve(p, absolute));
                        self.current = end;
                        self.elements.push(PathElement::Cubic {
                            start,
                            control1,
                            control2,
                            end,
                        });
                    }
                }
                'S' => {
                    for points in self.curve_sequence(Self::coordinate_pair_double)? {
                        let start = self.begin_segment();
                        let [control2, end] = points.map(|p| self.resolve(p, absolute));
                        self.current = end;
                        let control1 = self.reflected_control(CurveKind::Cubic, start);
                        self.elements.push(PathElement::Cubic {
                            start,
                            control1,
                            control2,
                            end,
                        });
                    }
                }
                'Q' => {
                    for points in self.curve_sequence(Self::coordinate_pair_double)? {
                        let start = self.begin_segment();
                        let [control, end] = points.map(|p| self.resolve(p, absolute));
                        self.current = end;
                        self.elements.push(PathElement::Quadratic { start, control, end });
                    }
                }
                'T' => {
                    for p in self.curve_sequence(Self::coordinate_pair)? {
                        let start = self.begin_segment();
                        let end = self.resolve(p, absolute);
                        self.current = end;
                        let control = self.reflected_control(CurveKind::Quadratic, start);
                        self.elements.push(PathElement::Quadratic { start, control, end });
                    }
                }
                _ => {
                    self.cursor = command_at;
                    return Err(self.error(format!("Invalid instruction: {command}")));
                }
            }
            self.skip_whitespace();
        }
        Ok(self.elements)
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// The first pair moves; any further pairs draw lines
    fn parse_moveto(&mut self, absolute: bool) -> Result<()> {
        let pairs = self.coordinate_pair_sequence()?;
        let mut pairs = pairs.into_iter();
        if let Some(first) = pairs.next() {
            self.current = self.resolve(first, absolute);
            self.subpath_start = Some(self.current);
        }
        for p in pairs {
            let to = self.resolve(p, absolute);
            self.line_to(to);
        }
        Ok(())
    }

    fn parse_arc(&mut self, absolute: bool) -> Result<PathElement> {
        let rx = self.number()?;
        self.optional_comma_whitespace();
        let ry = self.number()?;
        self.optional_comma_whitespace();
        let rotation = self.number()?;
        self.comma_whitespace()?;
        let large_arc = self.flag()?;
        self.optional_comma_whitespace();
        let sweep = self.flag()?;
        self.optional_comma_whitespace();
        let x = self.coordinate()?;
        self.optional_comma_whitespace();
        let y = self.coordinate()?;
        self.optional_comma_whitespace();

        let start = self.current;
        let end = self.resolve(Point::new(x, y), absolute);
        if end == start {
            return Err(self.error("Arc x and y position is the same as the previous position"));
        }
        self.current = end;

        if rx == 0.0 || ry == 0.0 {
            return Ok(PathElement::line(start, end));
        }
        Ok(PathElement::Arc(Arc::new(
            start,
            rx,
            ry,
            rotation as i32,
            large_arc,
            sweep,
            end,
        )))
    }

    fn line_to(&mut self, to: Point) {
        let from = self.begin_segment();
        self.current = to;
        self.elements.push(PathElement::line(from, to));
    }

    /// Current point, opening a subpath there if none is open
    fn begin_segment(&mut self) -> Point {
        self.subpath_start.get_or_insert(self.current);
        self.current
    }

    fn resolve(&self, p: Point, absolute: bool) -> Point {
        if absolute {
            p
        } else {
            self.current + p
        }
    }

    /// First control point of a smooth curve: the previous curve's last
    /// control point mirrored through `start`, or `start` itself
    fn reflected_control(&self, kind: CurveKind, start: Point) -> Point {
        let previous = match (kind, self.elements.last()) {
            (CurveKind::Cubic, Some(PathElement::Cubic { control2, .. })) => Some(*control2),
            (CurveKind::Quadratic, Some(PathElement::Quadratic { control, .. })) => Some(*control),
            _ => None,
        };
        previous.map_or(start, |control| control.reflected_around(start))
    }

    // ========================================================================
    // Argument grammar
    // ========================================================================

    /// One or more argument groups separated by optional comma-whitespace
    fn curve_sequence<T>(&mut self, item: fn(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        let mut items = vec![item(self)?];
        loop {
            let before = self.cursor;
            self.optional_comma_whitespace();
            if !self.at_coordinate() {
                self.cursor = before;
                return Ok(items);
            }
            items.push(item(self)?);
        }
    }

    fn coordinate_pair_triple(&mut self) -> Result<[Point; 3]> {
        let a = self.coordinate_pair()?;
        self.optional_comma_whitespace();
        let b = self.coordinate_pair()?;
        self.optional_comma_whitespace();
        let c = self.coordinate_pair()?;
        Ok([a, b, c])
    }

    fn coordinate_pair_double(&mut self) -> Result<[Point; 2]> {
        let a = self.coordinate_pair()?;
        self.optional_comma_whitespace();
        let b = self.coordinate_pair()?;
        Ok([a, b])
    }

    fn coordinate_pair(&mut self) -> Result<Point> {
        let x = self.coordinate()?;
        self.optional_comma_whitespace();
        let y = self.coordinate()?;
        Ok(Point::new(x, y))
    }

    fn coordinate_pair_sequence(&mut self) -> Result<Vec<Point>> {
        let mut pairs = Vec::new();
        loop {
            pairs.push(self.coordinate_pair()?);
            self.optional_comma_whitespace();
            if !self.at_coordinate() {
                return Ok(pairs);
            }
        }
    }

    fn coordinate_sequence(&mut self) -> Result<Vec<f32>> {
        let mut values = Vec::new();
        loop {
            values.push(self.coordinate()?);
            self.optional_comma_whitespace();
            if !self.at_coordinate() {
                return Ok(values);
            }
        }
    }

    fn coordinate(&mut self) -> Result<f32> {
        let sign = match self.peek() {
            Some('-') => {
                self.cursor += 1;
                -1.0
            }
            Some('+') => {
                self.cursor += 1;
                1.0
            }
            _ => 1.0,
        };
        Ok(sign * self.number()?)
    }

    /// Unsigned `digits[.digits]` or `.digits`
    fn number(&mut self) -> Result<f32> {
        let start = self.cursor;
        self.skip_digits();
        if self.peek() == Some('.') {
            self.cursor += 1;
            self.skip_digits();
        }
        let source = self.source;
        let text = &source[start..self.cursor];
        if text.is_empty() || text == "." {
            self.cursor = start;
            return Err(self.error(format!(
                "Expected number at position {start}, got {}",
                self.char_for_printing()
            )));
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            return Err(self.error("Numeric 'e' format is not supported"));
        }
        text.parse()
            .map_err(|_| self.error(format!("Expected number at position {start}, got {text}")))
    }

    fn flag(&mut self) -> Result<bool> {
        match self.peek() {
            Some(c @ ('0' | '1')) => {
                self.cursor += 1;
                Ok(c == '1')
            }
            _ => Err(self.error(format!(
                "Expected 0 or 1 at position {}, got {}",
                self.cursor,
                self.char_for_printing()
            ))),
        }
    }

    // ========================================================================
    // Lexical helpers
    // ========================================================================

    fn peek(&self) -> Option<char> {
        self.source[self.cursor..].chars().next()
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.cursor += 1;
        }
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.cursor;
        while self.peek().is_some_and(is_whitespace) {
            self.cursor += 1;
        }
        self.cursor > start
    }

    fn at_comma_whitespace(&self) -> bool {
        self.peek().is_some_and(|c| c == ',' || is_whitespace(c))
    }

    fn at_coordinate(&self) -> bool {
        self.peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | ','))
    }

    /// `comma-wsp`: a comma with optional whitespace around it, or
    /// whitespace alone
    fn comma_whitespace(&mut self) -> Result<()> {
        if self.peek() == Some(',') {
            self.cursor += 1;
            self.skip_whitespace();
            return Ok(());
        }
        if !self.skip_whitespace() {
            return Err(self.error(format!(
                "Expected whitespace at position {}, got {}",
                self.cursor,
                self.char_for_printing()
            )));
        }
        if self.peek() == Some(',') {
            self.cursor += 1;
        }
        self.skip_whitespace();
        Ok(())
    }

    fn optional_comma_whitespace(&mut self) {
        if self.at_comma_whitespace() {
            // Cannot fail: the lookahead guarantees a comma or whitespace
            let _ = self.comma_whitespace();
        }
    }

    fn char_for_printing(&self) -> String {
        self.peek().map_or_else(|| "<end>".to_string(), String::from)
    }

    fn error(&self, message: impl Into<String>) -> PathParseError {
        PathParseError::new(message, self.cursor)
    }
}

/// Parse one path data string
pub fn parse_path(data: &str) -> Result<Vec<PathElement>> {
    PathParser::new(data.trim()).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_triangle_with_close() {
        let elements = parse_path("M0,0 L10,10 L20,0 Z").unwrap();
        assert_eq!(
            elements,
            vec![
                PathElement::line(p(0.0, 0.0), p(10.0, 10.0)),
                PathElement::line(p(10.0, 10.0), p(20.0, 0.0)),
                PathElement::line(p(20.0, 0.0), p(0.0, 0.0)),
            ]
        );
    }

    #[test]
    fn test_relative_and_axis_lines() {
        let elements = parse_path("m5 5 h10 v-5 H0").unwrap();
        assert_eq!(
            elements,
            vec![
                PathElement::line(p(5.0, 5.0), p(15.0, 5.0)),
                PathElement::line(p(15.0, 5.0), p(15.0, 0.0)),
                PathElement::line(p(15.0, 0.0), p(0.0, 0.0)),
            ]
        );
    }

    #[test]
    fn test_implicit_lineto_after_moveto() {
        let elements = parse_path("M0 0 10 0 10 10z").unwrap();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[2], PathElement::line(p(10.0, 10.0), p(0.0, 0.0)));
    }

    #[test]
    fn test_compact_numbers() {
        let elements = parse_path("M0-5L.5.5-1,2").unwrap();
        assert_eq!(
            elements,
            vec![
                PathElement::line(p(0.0, -5.0), p(0.5, 0.5)),
                PathElement::line(p(0.5, 0.5), p(-1.0, 2.0)),
            ]
        );
    }

    #[test]
    fn test_smooth_cubic_reflects_control() {
        let elements = parse_path("M0 0 C0 10 10 10 10 0 S20 -10 20 0").unwrap();
        let PathElement::Cubic { control1, .. } = &elements[1] else {
            panic!("expected cubic, got {:?}", elements[1]);
        };
        assert_eq!(*control1, p(10.0, -10.0));
    }

    #[test]
    fn test_relative_control_points_share_segment_start() {
        let elements = parse_path("M5 5 c0 10 10 10 10 0").unwrap();
        assert_eq!(
            elements,
            vec![PathElement::Cubic {
                start: p(5.0, 5.0),
                control1: p(5.0, 15.0),
                control2: p(15.0, 15.0),
                end: p(15.0, 5.0),
            }]
        );
    }

    #[test]
    fn test_smooth_quadratic_without_previous_uses_current_point() {
        let elements = parse_path("M0 0 L5 5 T10 0").unwrap();
        assert_eq!(
            elements[1],
            PathElement::Quadratic {
                start: p(5.0, 5.0),
                control: p(5.0, 5.0),
                end: p(10.0, 0.0),
            }
        );
    }

    #[test]
    fn test_multiple_quadratics() {
        let elements = parse_path("M0 0 Q5 5 10 0 15 -5 20 0").unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[1].start(), p(10.0, 0.0));
        assert_eq!(elements[1].end(), p(20.0, 0.0));
    }

    #[test]
    fn test_arc_and_degenerate_arc() {
        let elements = parse_path("M0 0 A5 5 0 0 1 10 0 A0 5 0 0,1 20,0").unwrap();
        assert!(matches!(elements[0], PathElement::Arc(_)));
        assert_eq!(elements[1], PathElement::line(p(10.0, 0.0), p(20.0, 0.0)));
    }

    #[test]
    fn test_errors_carry_position() {
        let err = parse_path("M0 0 X5").unwrap_err();
        assert_eq!(err.message, "Invalid instruction: X");
        assert_eq!(err.position, 5);

        let err = parse_path("Z").unwrap_err();
        assert_eq!(err.message, "Z instruction encountered with no previous position data");

        let err = parse_path("M0 0 L1e5 0").unwrap_err();
        assert_eq!(err.message, "Numeric 'e' format is not supported");

        let err = parse_path("M0 0 A5 5 0 2 1 10 0").unwrap_err();
        assert_eq!(err.message, "Expected 0 or 1 at position 12, got 2");

        let err = parse_path("M0 0 A5 5 0 0 1 0 0").unwrap_err();
        assert!(err.message.starts_with("Arc x and y position"));
    }

    #[test]
    fn test_error_renders_with_ariadne() {
        let source = "M0 0 L5 ?";
        let err = parse_path(source).unwrap_err();
        let rendered = err.format(source, "icon.svg");
        assert!(rendered.contains("Expected number"));
    }
}
