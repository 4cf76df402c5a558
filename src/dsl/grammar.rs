//! Parser implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use super::ast::{BinOp, Expr, Spanned};
use super::lexer::Token;
use crate::error::DslError;

/// Parse an expression into its syntax tree
pub fn parse_expr(input: &str) -> Result<Spanned<Expr>, Vec<DslError>> {
    let len = input.len();

    let mut tokens = Vec::new();
    for item in super::lexer::lex(input) {
        match item {
            Ok((tok, span)) => tokens.push((tok, SimpleSpan::from(span))),
            Err(span) => {
                let found = input[span.clone()].to_string();
                return Err(vec![DslError::Syntax {
                    span,
                    message: format!("Unexpected character '{found}'"),
                    expected: Vec::new(),
                }]);
            }
        }
    }

    let token_stream = Stream::from_iter(tokens).map((len..len).into(), |(t, s): (_, _)| (t, s));

    expr_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn expr_parser<'a, I>() -> impl Parser<'a, I, Spanned<Expr>, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    recursive(|expr| {
        let number = select! {
            Token::Number(n) => n,
        };

        let alignment = select! {
            Token::Ident(s) if s == "opposite" => (true, false),
            Token::Ident(s) if s == "outside" => (false, true),
        };

        let pixels = number
            .clone()
            .then_ignore(just(Token::Px))
            .then(alignment.repeated().collect::<Vec<_>>())
            .map(|(value, flags)| Expr::Pixels {
                value,
                opposite: flags.iter().any(|f| f.0),
                outside: flags.iter().any(|f| f.1),
            });

        let percent = number.clone().then_ignore(just(Token::Percent)).map(Expr::Percent);

        let color = select! {
            Token::HexColor(c) => Expr::Color(c),
        };

        let name = select! {
            Token::Ident(s) => s,
        }
        .map_with(|s, e| Spanned::new(s, span_range(&e.span())));

        let args = expr
            .clone()
            .separated_by(just(Token::Comma))
            .allow_trailing()
            .collect::<Vec<_>>()
            .delimited_by(just(Token::ParenOpen), just(Token::ParenClose));

        let call = name.then(args.or_not()).map(|(name, args)| match args {
            Some(args) => Expr::Call { name, args },
            None => Expr::Name(name.node),
        });

        let parens = expr
            .clone()
            .delimited_by(just(Token::ParenOpen), just(Token::ParenClose))
            .map(|inner: Spanned<Expr>| inner.node);

        let atom = choice((pixels, percent, number.clone().map(Expr::Number), color, call, parens))
            .map_with(|node, e| Spanned::new(node, span_range(&e.span())));

        let unary = just(Token::Minus)
            .or_not()
            .then(atom)
            .map_with(|(neg, atom), e| match neg {
                Some(_) => Spanned::new(Expr::Neg(Box::new(atom)), span_range(&e.span())),
                None => atom,
            });

        let factor = just(Token::Star)
            .ignore_then(number)
            .map_with(|n, e| Spanned::new(n, span_range(&e.span())));

        let scaled = unary.foldl(factor.repeated(), |inner: Spanned<Expr>, factor| {
            let span = inner.span.start..factor.span.end;
            Spanned::new(
                Expr::Scale {
                    inner: Box::new(inner),
                    factor: factor.node,
                },
                span,
            )
        });

        let op = choice((just(Token::Plus).to(BinOp::Add), just(Token::Minus).to(BinOp::Sub)));

        scaled
            .clone()
            .foldl(op.then(scaled).repeated(), |left: Spanned<Expr>, (op, right)| {
                let span = left.span.start..right.span.end;
                Spanned::new(
                    Expr::Binary {
                        op,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    span,
                )
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn node(input: &str) -> Expr {
        parse_expr(input).unwrap().node
    }

    #[test]
    fn test_literals() {
        assert_eq!(node("42"), Expr::Number(42.0));
        assert_eq!(node("50%"), Expr::Percent(50.0));
        assert_eq!(
            node("10px opposite"),
            Expr::Pixels {
                value: 10.0,
                opposite: true,
                outside: false
            }
        );
    }

    #[test]
    fn test_left_associative_sum() {
        let expr = parse_expr("50% - 10px + 2px").unwrap();
        assert_eq!(expr.span, 0..16);
        let Expr::Binary { op, left, .. } = expr.node else {
            panic!("expected binary expression");
        };
        assert_eq!(op, BinOp::Add);
        assert!(matches!(left.node, Expr::Binary { op: BinOp::Sub, .. }));
    }

    #[test]
    fn test_scale_binds_tighter_than_sum() {
        let Expr::Binary { right, .. } = node("10px + 50% * 2") else {
            panic!("expected binary expression");
        };
        assert!(matches!(right.node, Expr::Scale { factor, .. } if factor == 2.0));
    }

    #[test]
    fn test_calls() {
        let Expr::Call { name, args } = node("max(20px, 10%)") else {
            panic!("expected call");
        };
        assert_eq!(name.node, "max");
        assert_eq!(name.span, 0..3);
        assert_eq!(args.len(), 2);
        assert_eq!(args[1].span, 10..13);
        assert_eq!(node("center"), Expr::Name("center".to_string()));
    }

    #[test]
    fn test_negation_and_parens() {
        assert!(matches!(node("-(50% + 4px)"), Expr::Neg(_)));
    }

    #[test]
    fn test_errors() {
        let errors = parse_expr("10px +").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].span(), 6..6);

        let errors = parse_expr("10 ^ 2").unwrap_err();
        assert_eq!(errors[0].span(), 3..4);
    }
}
