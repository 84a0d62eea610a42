/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

mod builtins;
pub mod function;
mod math;

pub use function::{Arity, Function, TrigKind, EXTENSION_NAMESPACE};

use crate::context::ExpressionContext;
use crate::error::EvalError;
use crate::solution::Solution;
use crate::value::Value;
use shared::node::{Iri, Node};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub function: Function,
    pub args: Vec<Expression>,
}

/// An expression tree evaluated once per candidate solution.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Constant(Node),
    Variable(String),
    Call(FunctionCall),
}

impl Expression {
    pub fn constant(node: Node) -> Self {
        Expression::Constant(node)
    }

    pub fn variable(name: &str) -> Self {
        Expression::Variable(name.trim_start_matches(['?', '$']).to_string())
    }

    /// Builds a call, checking the argument count against the function's arity.
    pub fn call(function: Function, args: Vec<Expression>) -> Result<Self, EvalError> {
        if let Some(arity) = function.arity() {
            if !arity.accepts(args.len()) {
                return Err(EvalError::ArityMismatch {
                    functor: function.functor(),
                    expected: arity.to_string(),
                    actual: args.len(),
                });
            }
        }
        Ok(Expression::Call(FunctionCall { function, args }))
    }

    /// A trigonometric function, or its inverse when `inverse` is set.
    pub fn trigonometric(kind: TrigKind, inverse: bool, arg: Expression) -> Self {
        Expression::Call(FunctionCall {
            function: Function::Trigonometric { kind, inverse },
            args: vec![arg],
        })
    }

    /// A call to a function without an implementation. It can be built, copied
    /// and displayed, but evaluating it always fails.
    pub fn unknown(iri: Iri, args: Vec<Expression>) -> Self {
        Expression::Call(FunctionCall {
            function: Function::Unknown(iri),
            args,
        })
    }

    pub fn binary(function: Function, left: Expression, right: Expression) -> Result<Self, EvalError> {
        Self::call(function, vec![left, right])
    }

    pub fn evaluate(&self, solution: &Solution, context: &ExpressionContext) -> Result<Value, EvalError> {
        match self {
            Expression::Constant(node) => Ok(Value::from_node(node)),
            Expression::Variable(name) => solution
                .get(name)
                .map(Value::from_node)
                .ok_or_else(|| EvalError::UnboundVariable(name.clone())),
            Expression::Call(call) => builtins::evaluate_call(&call.function, &call.args, solution, context),
        }
    }

    /// Convenience for filters: the effective boolean value of the result.
    pub fn evaluate_boolean(&self, solution: &Solution, context: &ExpressionContext) -> Result<bool, EvalError> {
        self.evaluate(solution, context)?.effective_boolean_value()
    }

    pub fn functor(&self) -> String {
        match self {
            Expression::Constant(node) => node.to_string(),
            Expression::Variable(name) => format!("?{}", name),
            Expression::Call(call) => call.function.functor(),
        }
    }

    pub fn arguments(&self) -> &[Expression] {
        match self {
            Expression::Call(call) => &call.args,
            _ => &[],
        }
    }

    /// Same variant and configuration with the children replaced.
    pub fn copy(&self, children: Vec<Expression>) -> Result<Expression, EvalError> {
        let expected = self.arguments().len();
        if children.len() != expected {
            return Err(EvalError::ArityMismatch {
                functor: self.functor(),
                expected: expected.to_string(),
                actual: children.len(),
            });
        }
        Ok(match self {
            Expression::Call(call) => Expression::Call(FunctionCall {
                function: call.function.clone(),
                args: children,
            }),
            leaf => leaf.clone(),
        })
    }

    /// Variables mentioned anywhere in the tree.
    pub fn variables(&self) -> BTreeSet<String> {
        let mut variables = BTreeSet::new();
        self.collect_variables(&mut variables);
        variables
    }

    fn collect_variables(&self, variables: &mut BTreeSet<String>) {
        match self {
            Expression::Constant(_) => {}
            Expression::Variable(name) => {
                variables.insert(name.clone());
            }
            Expression::Call(call) => call.args.iter().for_each(|a| a.collect_variables(variables)),
        }
    }
}

impl From<Node> for Expression {
    fn from(node: Node) -> Self {
        Expression::Constant(node)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(node) => write!(f, "{}", node),
            Expression::Variable(name) => write!(f, "?{}", name),
            Expression::Call(call) if call.function.infix_operator() && call.args.len() == 2 => {
                write!(f, "({} {} {})", call.args[0], call.function.functor(), call.args[1])
            }
            Expression::Call(call) => {
                let args = call
                    .args
                    .iter()
                    .map(|a| a.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                match &call.function {
                    Function::Not => write!(f, "!{}", args),
                    function if function.is_extension() => write!(f, "<{}>({})", function.functor(), args),
                    function => write!(f, "{}({})", function.functor(), args),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ExpressionContext {
        ExpressionContext::default()
    }

    #[test]
    fn test_copy_preserves_functor() {
        let expressions = vec![
            Expression::binary(Function::Add, Expression::variable("x"), Node::integer(1).into()).unwrap(),
            Expression::trigonometric(TrigKind::Sine, true, Expression::variable("x")),
            Expression::unknown(
                Iri::parse("http://example.org/fn#f").unwrap(),
                vec![Expression::variable("a"), Expression::variable("b")],
            ),
            Expression::variable("x"),
            Expression::constant(Node::literal("c")),
        ];
        for expression in expressions {
            let copy = expression.copy(expression.arguments().to_vec()).unwrap();
            assert_eq!(copy.functor(), expression.functor());
            assert_eq!(copy, expression);
        }
    }

    #[test]
    fn test_copy_checks_arity() {
        let tan = Expression::trigonometric(TrigKind::Tangent, false, Expression::variable("x"));
        let err = tan.copy(vec![]).unwrap_err();
        assert!(matches!(err, EvalError::ArityMismatch { actual: 0, .. }));
        assert!(Expression::variable("x").copy(vec![Expression::variable("y")]).is_err());
    }

    #[test]
    fn test_call_checks_arity() {
        assert!(Expression::call(Function::Str, vec![]).is_err());
        assert!(Expression::call(Function::Concat, vec![]).is_ok());
    }

    #[test]
    fn test_copy_keeps_inverse_flag() {
        let atan = Expression::trigonometric(TrigKind::Tangent, true, Expression::variable("x"));
        let copy = atan.copy(vec![Node::double(1.0).into()]).unwrap();
        assert_eq!(copy.functor(), "urn:kestrel:fn:tan-1");
        let value = copy.evaluate(&Solution::new(), &context()).unwrap();
        assert!((value.as_f64().unwrap() - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn test_display() {
        let sum = Expression::binary(Function::Add, Expression::variable("x"), Node::integer(1).into()).unwrap();
        assert_eq!(
            sum.to_string(),
            "(?x + \"1\"^^<http://www.w3.org/2001/XMLSchema#integer>)"
        );
        let unknown = Expression::unknown(
            Iri::parse("urn:example:f").unwrap(),
            vec![Expression::variable("a"), Expression::variable("b")],
        );
        assert_eq!(unknown.to_string(), "<urn:example:f>(?a, ?b)");
        let str_call = Expression::call(Function::Str, vec![Expression::variable("s")]).unwrap();
        assert_eq!(str_call.to_string(), "STR(?s)");
    }

    #[test]
    fn test_variables() {
        let expression = Expression::binary(
            Function::And,
            Expression::call(Function::Bound, vec![Expression::variable("x")]).unwrap(),
            Expression::binary(Function::Less, Expression::variable("y"), Expression::variable("x")).unwrap(),
        )
        .unwrap();
        assert_eq!(
            expression.variables().into_iter().collect::<Vec<_>>(),
            vec!["x".to_string(), "y".to_string()]
        );
    }
}
