/*
 * Copyright © 2026 Volodymyr Kadzhaia
 * Copyright © 2026 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::function::Function;
use crate::error::EvalError;
use crate::value::Value;

fn numeric(function: &Function, value: &Value) -> Result<f64, EvalError> {
    value
        .as_f64()
        .ok_or_else(|| EvalError::type_error(&function.functor(), value.type_name()))
}

fn finite(function: &Function, input: f64, result: f64) -> Result<Value, EvalError> {
    if result.is_finite() {
        Ok(Value::Double(result))
    } else {
        Err(EvalError::Domain {
            functor: function.functor(),
            input,
        })
    }
}

/// Functions of one real argument: the trigonometric family, sqrt and ln.
pub(super) fn unary_real(function: &Function, value: &Value) -> Result<Value, EvalError> {
    let x = numeric(function, value)?;
    let result = match function {
        Function::Trigonometric { kind, inverse } => kind.apply(*inverse, x),
        Function::Sqrt => x.sqrt(),
        Function::Ln => x.ln(),
        other => return Err(EvalError::type_error(&other.functor(), "a real-valued function")),
    };
    finite(function, x, result)
}

pub(super) fn pow(function: &Function, base: &Value, exponent: &Value) -> Result<Value, EvalError> {
    if let (Value::Integer(b), Value::Integer(e)) = (base, exponent) {
        if let Ok(e) = u32::try_from(*e) {
            return b
                .checked_pow(e)
                .map(Value::Integer)
                .ok_or_else(|| EvalError::Overflow(function.functor()));
        }
    }
    let b = numeric(function, base)?;
    let e = numeric(function, exponent)?;
    finite(function, b, b.powf(e))
}

pub(super) fn abs(function: &Function, value: &Value) -> Result<Value, EvalError> {
    match value {
        Value::Integer(i) => i
            .checked_abs()
            .map(Value::Integer)
            .ok_or_else(|| EvalError::Overflow(function.functor())),
        Value::Double(d) => Ok(Value::Double(d.abs())),
        other => Err(EvalError::type_error(&function.functor(), other.type_name())),
    }
}

/// CEIL, FLOOR and ROUND. Integers are returned unchanged; ROUND rounds halves up.
pub(super) fn rounding(function: &Function, value: &Value) -> Result<Value, EvalError> {
    match value {
        Value::Integer(i) => Ok(Value::Integer(*i)),
        Value::Double(d) => Ok(Value::Double(match function {
            Function::Ceil => d.ceil(),
            Function::Floor => d.floor(),
            _ => (d + 0.5).floor(),
        })),
        other => Err(EvalError::type_error(&function.functor(), other.type_name())),
    }
}
