//! Constraint expression language.
//!
//! Numeric expressions mirror how constraints display themselves:
//!
//! ```text
//! 50% - 10px        center          sibling(4)       max(20px, 10%)
//! 8px opposite      aspect(2)       children(2)      clamp(50%, 40px, 200px)
//! to(center, header)                window(25%)      (100% - 8px) * 0.5
//! ```
//!
//! Color expressions are hex literals, `white`, `black`, `transparent`,
//! `inherit`, `alpha(#rrggbb, 0.5)` and `rainbow(alpha, speed)`.

pub mod ast;
mod grammar;
pub mod lexer;

pub use ast::{BinOp, Expr, Spanned};
pub use grammar::parse_expr;

use crate::component::ComponentId;
use crate::constraints::{ColorConstraint, Constraint, RoundingMode, Rgba};
use crate::error::{DslError, Span};

/// Resolves component names used in `to(expr, name)`
pub trait NameResolver {
    fn resolve(&self, name: &str) -> Option<ComponentId>;
}

impl<F: Fn(&str) -> Option<ComponentId>> NameResolver for F {
    fn resolve(&self, name: &str) -> Option<ComponentId> {
        self(name)
    }
}

/// Resolver for expressions that never name components
struct NoNames;

impl NameResolver for NoNames {
    fn resolve(&self, _name: &str) -> Option<ComponentId> {
        None
    }
}

/// Parse a numeric constraint expression
pub fn parse_constraint(source: &str) -> Result<Constraint, DslError> {
    parse_constraint_with(source, &NoNames)
}

/// Parse a numeric constraint expression, resolving component names
pub fn parse_constraint_with(source: &str, names: &dyn NameResolver) -> Result<Constraint, DslError> {
    let expr = parse_first(source)?;
    Lowering { names }.constraint(&expr)
}

/// Parse a color constraint expression
pub fn parse_color(source: &str) -> Result<ColorConstraint, DslError> {
    parse_color_with(source, &NoNames)
}

pub fn parse_color_with(source: &str, names: &dyn NameResolver) -> Result<ColorConstraint, DslError> {
    let expr = parse_first(source)?;
    Lowering { names }.color(&expr)
}

fn parse_first(source: &str) -> Result<Spanned<Expr>, DslError> {
    parse_expr(source).map_err(|errors| {
        errors.into_iter().next().unwrap_or_else(|| DslError::invalid(0..source.len(), "empty expression"))
    })
}

// ============================================================================
// Lowering
// ============================================================================

struct Lowering<'n> {
    names: &'n dyn NameResolver,
}

impl Lowering<'_> {
    fn constraint(&self, expr: &Spanned<Expr>) -> Result<Constraint, DslError> {
        let span = expr.span.clone();
        match &expr.node {
            Expr::Number(value) => Ok(Constraint::pixels(*value as f32)),
            Expr::Pixels {
                value,
                opposite,
                outside,
            } => Ok(Constraint::pixels_aligned(*value as f32, *opposite, *outside)),
            Expr::Percent(value) => Ok(Constraint::relative(*value as f32 / 100.0)),
            Expr::Color(_) => Err(DslError::invalid(span, "expected a size or position, found a color")),
            Expr::Name(name) => self.keyword(name, span),
            Expr::Call { name, args } => self.call(name, args, span),
            Expr::Neg(inner) => match &inner.node {
                Expr::Number(value) => Ok(Constraint::pixels(-*value as f32)),
                Expr::Pixels {
                    value,
                    opposite,
                    outside,
                } => Ok(Constraint::pixels_aligned(-*value as f32, *opposite, *outside)),
                _ => Ok(self.constraint(inner)?.scaled(-1.0)),
            },
            Expr::Binary { op, left, right } => {
                let left = self.constraint(left)?;
                let right = self.constraint(right)?;
                Ok(match op {
                    BinOp::Add => left + right,
                    BinOp::Sub => left - right,
                })
            }
            Expr::Scale { inner, factor } => Ok(self.constraint(inner)?.scaled(*factor as f32)),
        }
    }

    fn keyword(&self, name: &str, span: Span) -> Result<Constraint, DslError> {
        Ok(match name {
            "center" => Constraint::center(),
            "fill" => Constraint::fill(),
            "fill_remaining" => Constraint::fill_remaining(),
            "sibling" => Constraint::sibling(0.0),
            "sibling_opposite" => Constraint::sibling_opposite(0.0),
            "cram" => Constraint::cram_sibling(0.0),
            "children" => Constraint::child_based_size(0.0),
            "children_max" => Constraint::child_based_max_size(),
            "children_range" => Constraint::child_based_range(),
            "text_aspect" => Constraint::text_aspect(),
            "text" => Constraint::scaled_text(1.0),
            other => return Err(DslError::invalid(span, format!("unknown constraint '{other}'"))),
        })
    }

    fn call(&self, name: &Spanned<String>, args: &[Spanned<Expr>], span: Span) -> Result<Constraint, DslError> {
        let arity = |n: usize| -> Result<(), DslError> {
            if args.len() == n {
                Ok(())
            } else {
                Err(DslError::invalid(
                    span.clone(),
                    format!("{} expects {} argument(s), got {}", name.node, n, args.len()),
                ))
            }
        };

        match name.node.as_str() {
            "sibling" | "sibling_opposite" | "cram" | "aspect" | "children" | "text" | "window" => {
                arity(1)?;
                let value = number_arg(&args[0])?;
                Ok(match name.node.as_str() {
                    "sibling" => Constraint::sibling(value),
                    "sibling_opposite" => Constraint::sibling_opposite(value),
                    "cram" => Constraint::cram_sibling(value),
                    "aspect" => Constraint::aspect(value),
                    "children" => Constraint::child_based_size(value),
                    "text" => Constraint::scaled_text(value),
                    _ => Constraint::relative_window(value),
                })
            }
            "max" | "min" | "at_most" | "at_least" => {
                arity(2)?;
                let a = self.constraint(&args[0])?;
                let b = self.constraint(&args[1])?;
                Ok(match name.node.as_str() {
                    "max" => a.max(b),
                    "min" => a.min(b),
                    "at_most" => a.coerce_at_most(b),
                    _ => a.coerce_at_least(b),
                })
            }
            "clamp" => {
                arity(3)?;
                let value = self.constraint(&args[0])?;
                Ok(value.coerce_in(self.constraint(&args[1])?, self.constraint(&args[2])?))
            }
            "floor" | "ceil" | "round" => {
                arity(1)?;
                let mode = match name.node.as_str() {
                    "floor" => RoundingMode::Floor,
                    "ceil" => RoundingMode::Ceil,
                    _ => RoundingMode::Round,
                };
                Ok(self.constraint(&args[0])?.rounded(mode))
            }
            "to" => {
                arity(2)?;
                let target = self.component_arg(&args[1])?;
                self.constraint(&args[0])?
                    .to(target)
                    .map_err(|err| DslError::invalid(args[0].span.clone(), err.to_string()))
            }
            other => Err(DslError::invalid(
                name.span.clone(),
                format!("unknown constraint '{other}'"),
            )),
        }
    }

    fn color(&self, expr: &Spanned<Expr>) -> Result<ColorConstraint, DslError> {
        let span = expr.span.clone();
        match &expr.node {
            Expr::Name(name) if name == "inherit" => Ok(ColorConstraint::inherited()),
            Expr::Name(name) if name == "rainbow" => Ok(ColorConstraint::rainbow(255, 50.0)),
            Expr::Color(_) | Expr::Name(_) => Ok(ColorConstraint::constant(rgba_arg(expr)?)),
            Expr::Call { name, args } => match name.node.as_str() {
                "alpha" if args.len() == 2 => {
                    let color = rgba_arg(&args[0])?;
                    Ok(ColorConstraint::alpha_aspect(color, number_arg(&args[1])?))
                }
                "rainbow" if args.len() <= 2 => {
                    let alpha = args.first().map(number_arg).transpose()?.unwrap_or(255.0);
                    let speed = args.get(1).map(number_arg).transpose()?.unwrap_or(50.0);
                    Ok(ColorConstraint::rainbow(alpha.clamp(0.0, 255.0) as u8, speed))
                }
                "to" if args.len() == 2 => {
                    let target = self.component_arg(&args[1])?;
                    self.color(&args[0])?
                        .to(target)
                        .map_err(|err| DslError::invalid(args[0].span.clone(), err.to_string()))
                }
                other => Err(DslError::invalid(span, format!("unknown color function '{other}'"))),
            },
            _ => Err(DslError::invalid(span, "expected a color")),
        }
    }

    fn component_arg(&self, arg: &Spanned<Expr>) -> Result<ComponentId, DslError> {
        let Expr::Name(name) = &arg.node else {
            return Err(DslError::invalid(arg.span.clone(), "expected a component name"));
        };
        self.names
            .resolve(name)
            .ok_or_else(|| DslError::invalid(arg.span.clone(), format!("unknown component '{name}'")))
    }
}

/// Plain number argument; percentages become fractions
fn number_arg(arg: &Spanned<Expr>) -> Result<f32, DslError> {
    match &arg.node {
        Expr::Number(value) | Expr::Pixels { value, .. } => Ok(*value as f32),
        Expr::Percent(value) => Ok(*value as f32 / 100.0),
        Expr::Neg(inner) => number_arg(inner).map(|v| -v),
        _ => Err(DslError::invalid(arg.span.clone(), "expected a number")),
    }
}

fn rgba_arg(arg: &Spanned<Expr>) -> Result<Rgba, DslError> {
    let color = match &arg.node {
        Expr::Color(hex) => Rgba::from_hex(hex),
        Expr::Name(name) => match name.as_str() {
            "white" => Some(Rgba::WHITE),
            "black" => Some(Rgba::BLACK),
            "transparent" => Some(Rgba::TRANSPARENT),
            _ => None,
        },
        _ => None,
    };
    color.ok_or_else(|| DslError::invalid(arg.span.clone(), "expected a color"))
}
