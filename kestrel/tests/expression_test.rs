/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

extern crate kestrel;
use kestrel::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ExpressionContext {
        ExpressionContext::default()
    }

    fn x_is(value: f64) -> Solution {
        Solution::new().with("x", Node::double(value))
    }

    fn sample_expressions() -> Vec<Expression> {
        let x = || Expression::variable("x");
        vec![
            Expression::binary(Function::Add, x(), Expression::constant(Node::integer(1))).unwrap(),
            Expression::binary(Function::Equal, x(), x()).unwrap(),
            Expression::call(Function::Not, vec![x()]).unwrap(),
            Expression::call(Function::Str, vec![x()]).unwrap(),
            Expression::call(Function::Regex, vec![x(), Expression::constant(Node::literal("a")), Expression::constant(Node::literal("i"))]).unwrap(),
            Expression::call(Function::Pow, vec![x(), Expression::constant(Node::integer(2))]).unwrap(),
            Expression::call(Function::Now, vec![]).unwrap(),
            Expression::trigonometric(TrigKind::Sine, false, x()),
            Expression::trigonometric(TrigKind::Cosine, true, x()),
            Expression::unknown(Iri::parse("http://example.org/fn#custom").unwrap(), vec![x(), x(), x()]),
        ]
    }

    #[test]
    fn test_copy_keeps_functor_for_every_variant() {
        for expression in sample_expressions() {
            let copied = expression.copy(expression.arguments().to_vec()).unwrap();
            assert_eq!(copied.functor(), expression.functor());
            assert_eq!(copied, expression);
        }
    }

    #[test]
    fn test_copy_with_wrong_child_count_fails() {
        for expression in sample_expressions() {
            let mut children = expression.arguments().to_vec();
            children.push(Expression::variable("extra"));
            match expression.copy(children) {
                Err(EvalError::ArityMismatch { functor, actual, .. }) => {
                    assert_eq!(functor, expression.functor());
                    assert_eq!(actual, expression.arguments().len() + 1);
                }
                other => panic!("expected arity mismatch, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_forward_and_inverse_are_distinct_functors() {
        for kind in [TrigKind::Sine, TrigKind::Cosine, TrigKind::Tangent] {
            let forward = Expression::trigonometric(kind, false, Expression::variable("x"));
            let inverse = Expression::trigonometric(kind, true, Expression::variable("x"));
            assert_ne!(forward.functor(), inverse.functor());
            let copied = inverse.copy(vec![Expression::variable("y")]).unwrap();
            assert_eq!(copied.functor(), inverse.functor());
        }
    }

    #[test]
    fn test_inverse_recovers_input() {
        let cases = [
            (TrigKind::Sine, 0.5),
            (TrigKind::Cosine, 1.2),
            (TrigKind::Tangent, -0.7),
        ];
        for (kind, input) in cases {
            let composed = Expression::trigonometric(
                kind,
                true,
                Expression::trigonometric(kind, false, Expression::variable("x")),
            );
            let value = composed.evaluate(&x_is(input), &ctx()).unwrap();
            let output = value.as_f64().unwrap();
            assert!((output - input).abs() < 1e-9, "{:?}: {} != {}", kind, output, input);
        }
    }

    #[test]
    fn test_out_of_domain_input_is_an_error() {
        let asin = Expression::trigonometric(TrigKind::Sine, true, Expression::variable("x"));
        assert!(matches!(
            asin.evaluate(&x_is(2.0), &ctx()),
            Err(EvalError::Domain { .. })
        ));
        let sqrt = Expression::call(Function::Sqrt, vec![Expression::variable("x")]).unwrap();
        assert!(matches!(
            sqrt.evaluate(&x_is(-1.0), &ctx()),
            Err(EvalError::Domain { .. })
        ));
    }

    #[test]
    fn test_unknown_function_never_evaluates() {
        let iri = Iri::parse("http://example.org/fn#mystery").unwrap();
        let argument_lists = vec![
            vec![],
            vec![Expression::constant(Node::integer(1))],
            vec![Expression::variable("unbound"), Expression::constant(Node::literal("a"))],
        ];
        for args in argument_lists {
            let unknown = Expression::unknown(iri.clone(), args);
            assert_eq!(unknown.functor(), iri.as_str());
            let error = unknown.evaluate(&Solution::new(), &ctx()).unwrap_err();
            assert!(!error.is_recoverable());
            assert!(error.to_string().contains(iri.as_str()));
        }
    }

    #[test]
    fn test_unknown_function_is_not_absorbed_by_or() {
        let unknown = Expression::unknown(Iri::parse("http://example.org/fn#mystery").unwrap(), vec![]);
        let either = Expression::binary(
            Function::Or,
            unknown,
            Expression::constant(Node::boolean(true)),
        )
        .unwrap();
        assert!(either.evaluate(&Solution::new(), &ctx()).is_err());

        let unbound_or_true = Expression::binary(
            Function::Or,
            Expression::variable("missing"),
            Expression::constant(Node::boolean(true)),
        )
        .unwrap();
        assert_eq!(
            unbound_or_true.evaluate(&Solution::new(), &ctx()).unwrap(),
            Value::Boolean(true)
        );
    }

    #[test]
    fn test_display_is_sparql_like() {
        let sum = Expression::binary(
            Function::Add,
            Expression::variable("x"),
            Expression::constant(Node::integer(1)),
        )
        .unwrap();
        assert!(sum.to_string().starts_with("(?x + "));
        let unknown = Expression::unknown(
            Iri::parse("http://example.org/fn#f").unwrap(),
            vec![Expression::variable("a"), Expression::variable("b")],
        );
        assert_eq!(unknown.to_string(), "<http://example.org/fn#f>(?a, ?b)");
    }
}
