//! Error types shared across the crate

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::component::ComponentId;
use crate::constraints::ConstraintType;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Misuse of the constraint API.
///
/// These are programmer errors: they are reported eagerly when the offending
/// constraint is built or attached, never during per-frame evaluation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConstraintError {
    /// `to(component)` on a constraint whose target is fixed by its operands
    #[error("{constraint} cannot be bound to another component; bind its operands instead")]
    UnsupportedRebind { constraint: &'static str },

    /// A constraint attached to a property it has no formula for
    #[error("{constraint} cannot be used as a {ty} constraint")]
    UnsupportedType {
        constraint: &'static str,
        ty: ConstraintType,
    },

    /// Reference to a component that was never created or has been dropped
    #[error("component #{} does not exist", .0.index())]
    UnknownComponent(ComponentId),

    /// Attaching a component that already has a parent
    #[error("component '{child}' is already attached to '{parent}'")]
    AlreadyAttached { child: String, parent: String },

    /// Attaching a component below one of its own descendants
    #[error("attaching '{child}' under '{parent}' would make the component tree cyclic")]
    TreeCycle { child: String, parent: String },
}

impl ConstraintError {
    /// Create a rebinding error for the named constraint kind
    pub fn rebind(constraint: &'static str) -> Self {
        Self::UnsupportedRebind { constraint }
    }

    /// Create an unsupported property error
    pub fn unsupported(constraint: &'static str, ty: ConstraintType) -> Self {
        Self::UnsupportedType { constraint, ty }
    }
}

/// Errors produced while parsing constraint expressions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DslError {
    #[error("Parse error at {span:?}: {message}")]
    Syntax {
        span: Span,
        message: String,
        expected: Vec<String>,
    },

    /// Well-formed expression that does not describe a valid constraint
    #[error("Invalid expression at {span:?}: {message}")]
    Invalid { span: Span, message: String },
}

impl DslError {
    pub fn invalid(span: Span, message: impl Into<String>) -> Self {
        Self::Invalid {
            span,
            message: message.into(),
        }
    }

    /// Byte range the error points at
    pub fn span(&self) -> Span {
        match self {
            DslError::Syntax { span, .. } | DslError::Invalid { span, .. } => span.clone(),
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let (span, message, label) = match self {
            DslError::Syntax {
                span,
                message,
                expected,
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };
                (span, message, format!("{}{}", message, expected_str))
            }
            DslError::Invalid { span, message } => (span, message, message.clone()),
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(message)
            .with_label(
                Label::new((filename, span.clone()))
                    .with_message(label)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        if written.is_err() {
            return self.to_string();
        }
        String::from_utf8(buf).unwrap_or_else(|_| self.to_string())
    }
}

/// Malformed SVG path data
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message} (at offset {position})")]
pub struct PathParseError {
    pub message: String,
    /// Byte offset of the parser cursor when it gave up
    pub position: usize,
}

impl PathParseError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let start = self.position.min(source.len());
        let end = source[start..]
            .chars()
            .next()
            .map_or(start, |c| start + c.len_utf8());
        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, start)
            .with_message(&self.message)
            .with_label(
                Label::new((filename, start..end))
                    .with_message(&self.message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);
        if written.is_err() {
            return self.to_string();
        }
        String::from_utf8(buf).unwrap_or_else(|_| self.to_string())
    }
}

impl<'a> From<chumsky::error::Rich<'a, crate::dsl::lexer::Token>> for DslError {
    fn from(err: chumsky::error::Rich<'a, crate::dsl::lexer::Token>) -> Self {
        use chumsky::error::{RichPattern, RichReason};

        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => {
                let found_str = match found {
                    Some(tok) => format_token(tok),
                    None => "end of input".to_string(),
                };
                format!("Unexpected {}", found_str)
            }
            RichReason::Custom(msg) => msg.to_string(),
        };

        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| match e {
                RichPattern::Token(tok) => Some(format_token(tok)),
                RichPattern::Label(label) => Some(label.to_string()),
                RichPattern::EndOfInput => Some("end of input".to_string()),
                RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                RichPattern::Any => Some("any token".to_string()),
                RichPattern::SomethingElse => None,
            })
            .collect();

        DslError::Syntax {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &crate::dsl::lexer::Token) -> String {
    use crate::dsl::lexer::Token;
    match tok {
        Token::Ident(s) => format!("identifier '{}'", s),
        Token::Number(n) => format!("number {}", n),
        Token::HexColor(c) => format!("color {}", c),
        Token::Percent => "'%'".to_string(),
        Token::Px => "unit 'px'".to_string(),
        Token::Plus => "'+'".to_string(),
        Token::Minus => "'-'".to_string(),
        Token::Star => "'*'".to_string(),
        Token::ParenOpen => "'('".to_string(),
        Token::ParenClose => "')'".to_string(),
        Token::Comma => "','".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_error_messages() {
        let err = ConstraintError::rebind("AdditiveConstraint");
        assert_eq!(
            err.to_string(),
            "AdditiveConstraint cannot be bound to another component; bind its operands instead"
        );

        let err = ConstraintError::unsupported("CenterConstraint", ConstraintType::Width);
        assert_eq!(
            err.to_string(),
            "CenterConstraint cannot be used as a Width constraint"
        );
    }

    #[test]
    fn test_dsl_error_format_mentions_message() {
        let err = DslError::Syntax {
            span: 3..4,
            message: "Unexpected ')'".to_string(),
            expected: vec!["number".to_string()],
        };
        let rendered = err.format("10 )", "width");
        assert!(rendered.contains("Unexpected ')'"));
        assert_eq!(err.span(), 3..4);
    }
}
