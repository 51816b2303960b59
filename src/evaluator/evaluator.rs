use std::rc::Rc;

use crate::{
    ast::{
        expressions::{
            CallExpression, Expression, IncrementExpression, InfixExpression,
            MemberAccessExpression, PrefixExpression,
        },
        statements::{BlockStatement, Program, Statement},
    },
    errors::errors::{RuntimeError, RuntimeErrorKind},
    lexer::tokens::{Token, TokenKind},
};

use super::{
    environment::Environment,
    object::{values_equal, FunctionKind, FunctionValue, Value},
};

/// A non-local signal: a `return` travelling to its call boundary, or a
/// runtime error travelling to the top level. Both propagate identically;
/// only call expressions intercept returns.
#[derive(Debug)]
pub enum Interrupt {
    Return(Value),
    Error(RuntimeError),
}

impl From<RuntimeError> for Interrupt {
    fn from(error: RuntimeError) -> Self {
        Interrupt::Error(error)
    }
}

pub type EvalResult<T> = Result<T, Interrupt>;

fn error_at(kind: RuntimeErrorKind, token: &Token) -> Interrupt {
    Interrupt::Error(RuntimeError::from_token(kind, token))
}

/// Evaluates a checked program statement by statement, yielding the value
/// of its last expression statement (if any). An error stops evaluation at
/// the point of propagation.
pub fn eval_program(program: &Program, environment: &Environment) -> Result<Option<Value>, RuntimeError> {
    let mut result = None;
    for statement in &program.statements {
        match eval_statement(statement, environment) {
            Ok(value) => result = value,
            Err(Interrupt::Return(value)) => return Ok(Some(value)),
            Err(Interrupt::Error(error)) => return Err(error),
        }
    }
    Ok(result)
}

pub fn eval_statement(statement: &Statement, environment: &Environment) -> EvalResult<Option<Value>> {
    match statement {
        Statement::Expression(expression_statement) => {
            Ok(Some(eval_expression(&expression_statement.expression, environment)?))
        }
        Statement::Let(let_statement) => {
            let value = eval_expression(&let_statement.value, environment)?;
            environment.define(&let_statement.name.value, value);
            Ok(None)
        }
        Statement::Return(return_statement) => {
            let value = eval_expression(&return_statement.value, environment)?;
            Err(Interrupt::Return(value))
        }
        Statement::Block(block) => eval_block(block, environment),
        Statement::If(if_statement) => {
            let condition = eval_expression(&if_statement.condition, environment)?;
            if condition.is_truthy() {
                let child = Environment::extend(environment, environment.context());
                eval_statement(&if_statement.consequence, &child)
            } else if let Some(alternative) = &if_statement.alternative {
                let child = Environment::extend(environment, environment.context());
                eval_statement(alternative, &child)
            } else {
                Ok(None)
            }
        }
        Statement::While(while_statement) => {
            loop {
                let condition = eval_expression(&while_statement.condition, environment)?;
                if !condition.is_truthy() {
                    return Ok(None);
                }
                let child = Environment::extend(environment, environment.context());
                eval_statement(&while_statement.body, &child)?;
            }
        }
        Statement::FunctionDefinition(definition) => {
            let name = &definition.name.value;
            if definition.this_type.is_none() && environment.get_in_this_scope(name).is_some() {
                return Err(error_at(
                    RuntimeErrorKind::FunctionRedeclaration { name: name.clone() },
                    &definition.name.token,
                ));
            }

            let value = Value::Function(Rc::new(FunctionValue {
                fn_type: definition.fn_type.clone(),
                this: None,
                kind: FunctionKind::User {
                    definition: Rc::clone(definition),
                    environment: environment.clone(),
                },
            }));

            match &definition.this_type {
                Some(owner) => environment.define_type_member(owner.clone(), name, value),
                None => {
                    environment.define(name, value);
                }
            }
            Ok(None)
        }
        // Types are erased at runtime
        Statement::TypeDefinition(_) => Ok(None),
    }
}

/// Executes a block's statements in a freshly extended environment; a
/// return or error short-circuits the rest of the block.
pub fn eval_block(block: &BlockStatement, environment: &Environment) -> EvalResult<Option<Value>> {
    let child = Environment::extend(environment, environment.context());
    for statement in &block.statements {
        eval_statement(statement, &child)?;
    }
    Ok(None)
}

pub fn eval_expression(expression: &Expression, environment: &Environment) -> EvalResult<Value> {
    match expression {
        // Only reachable when a program with diagnostics is evaluated
        // anyway; behaves as a missing value
        Expression::Invalid(_) => Ok(Value::Null),
        Expression::Identifier(identifier) => match environment.get(&identifier.value) {
            Some(value) => Ok(value),
            None => Err(error_at(
                RuntimeErrorKind::UnresolvedIdentifier {
                    name: identifier.value.clone(),
                },
                &identifier.token,
            )),
        },
        Expression::IntegerLiteral(literal) => Ok(Value::int(literal.value)),
        Expression::FloatLiteral(literal) => Ok(Value::Float(literal.value)),
        Expression::StringLiteral(literal) => Ok(Value::string(literal.value.clone())),
        Expression::BooleanLiteral(literal) => Ok(Value::Bool(literal.value)),
        Expression::NullLiteral(_) => Ok(Value::Null),
        Expression::VoidLiteral(_) => Ok(Value::Void),
        Expression::Prefix(prefix) => eval_prefix_expression(prefix, environment),
        Expression::Infix(infix) => eval_infix_expression(infix, environment),
        Expression::Assignment(assignment) => {
            let value = eval_expression(&assignment.value, environment)?;
            if environment.assign(&assignment.name.value, value.clone()) {
                Ok(value)
            } else {
                Err(error_at(
                    RuntimeErrorKind::UnresolvedAssignTarget {
                        name: assignment.name.value.clone(),
                    },
                    &assignment.name.token,
                ))
            }
        }
        Expression::Call(call) => eval_call_expression(call, environment),
        Expression::Increment(increment) => eval_increment_expression(increment, environment),
        Expression::MemberAccess(member) => eval_member_access_expression(member, environment),
    }
}

fn eval_prefix_expression(prefix: &PrefixExpression, environment: &Environment) -> EvalResult<Value> {
    let operand = eval_expression(&prefix.operand, environment)?;

    match prefix.operator {
        TokenKind::Not => Ok(Value::Bool(!operand.is_truthy())),
        TokenKind::Dash => match operand.as_int() {
            Some(value) => Ok(Value::int(-value)),
            None => Err(error_at(RuntimeErrorKind::UnknownPrefixOperator, &prefix.prefix_token)),
        },
        _ => Err(error_at(RuntimeErrorKind::UnknownPrefixOperator, &prefix.prefix_token)),
    }
}

fn eval_infix_expression(infix: &InfixExpression, environment: &Environment) -> EvalResult<Value> {
    let left = eval_expression(&infix.left, environment)?;
    let right = eval_expression(&infix.right, environment)?;
    let token = &infix.operator_token;

    match infix.operator {
        TokenKind::Equals => Ok(Value::Bool(values_equal(&left, &right))),
        TokenKind::NotEquals => Ok(Value::Bool(!values_equal(&left, &right))),
        TokenKind::Or => Ok(Value::Bool(left.is_truthy() || right.is_truthy())),
        TokenKind::And => Ok(Value::Bool(left.is_truthy() && right.is_truthy())),
        TokenKind::Less => eval_integer_infix(&left, &right, token, |left, right| {
            Value::Bool(left < right)
        }),
        TokenKind::Greater => eval_integer_infix(&left, &right, token, |left, right| {
            Value::Bool(left > right)
        }),
        TokenKind::LessEquals => eval_integer_infix(&left, &right, token, |left, right| {
            Value::Bool(left <= right)
        }),
        TokenKind::GreaterEquals => eval_integer_infix(&left, &right, token, |left, right| {
            Value::Bool(left >= right)
        }),
        TokenKind::Plus => {
            // String concatenation wins when either side is a string
            if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) {
                Ok(Value::string(format!("{}{}", left, right)))
            } else {
                eval_integer_infix(&left, &right, token, |left, right| Value::int(left + right))
            }
        }
        TokenKind::Dash => {
            eval_integer_infix(&left, &right, token, |left, right| Value::int(left - right))
        }
        TokenKind::Star => {
            eval_integer_infix(&left, &right, token, |left, right| Value::int(left * right))
        }
        TokenKind::Slash => {
            let (Some(left), Some(right)) = (left.as_int(), right.as_int()) else {
                return Err(error_at(RuntimeErrorKind::IntConversion, token));
            };
            if right == 0 {
                return Err(error_at(RuntimeErrorKind::DivisionByZero, token));
            }
            Ok(Value::int(left / right))
        }
        _ => Err(error_at(RuntimeErrorKind::UnknownInfixOperator, token)),
    }
}

fn eval_integer_infix(
    left: &Value,
    right: &Value,
    token: &Token,
    constructor: fn(i64, i64) -> Value,
) -> EvalResult<Value> {
    match (left.as_int(), right.as_int()) {
        (Some(left), Some(right)) => Ok(constructor(left, right)),
        _ => Err(error_at(RuntimeErrorKind::IntConversion, token)),
    }
}

fn eval_call_expression(call: &CallExpression, environment: &Environment) -> EvalResult<Value> {
    let callee = eval_expression(&call.callee, environment)?;

    let function = match callee {
        Value::Function(function) => function,
        _ => return Err(error_at(RuntimeErrorKind::NotCallable, &call.paren_token)),
    };

    if let FunctionKind::User { definition, .. } = &function.kind {
        if call.arguments.len() != definition.parameters.len() {
            return Err(error_at(RuntimeErrorKind::MismatchingArguments, &call.paren_token));
        }
    }

    let mut arguments = Vec::with_capacity(call.arguments.len());
    for argument in &call.arguments {
        arguments.push(eval_expression(argument, environment)?);
    }

    // A return inside the called function must not continue past this
    // boundary
    match invoke(&function, &arguments, &call.paren_token) {
        Err(Interrupt::Return(value)) => Ok(value),
        other => other,
    }
}

/// Invokes a function value: builtins run directly; closures get one fresh
/// frame per call holding `this` and the parameters, then evaluate their
/// body block.
pub fn invoke(function: &FunctionValue, arguments: &[Value], call_token: &Token) -> EvalResult<Value> {
    match &function.kind {
        FunctionKind::Builtin(builtin) => builtin(function.this.as_ref(), arguments)
            .map_err(|kind| error_at(kind, call_token)),
        FunctionKind::User { definition, environment } => {
            let frame = Environment::extend(environment, definition.context.clone());
            if let Some(this) = &function.this {
                frame.define("this", this.clone());
            }
            for (parameter, argument) in definition.parameters.iter().zip(arguments) {
                if !frame.define(&parameter.name, argument.clone()) {
                    return Err(error_at(
                        RuntimeErrorKind::DuplicateParameter {
                            name: parameter.name.clone(),
                        },
                        &parameter.token,
                    ));
                }
            }
            eval_block(&definition.body, &frame)?;
            Ok(Value::Void)
        }
    }
}

fn eval_increment_expression(
    increment: &IncrementExpression,
    environment: &Environment,
) -> EvalResult<Value> {
    let value = match environment.get(&increment.name.value) {
        Some(value) => value,
        None => {
            return Err(error_at(
                RuntimeErrorKind::UnresolvedIdentifier {
                    name: increment.name.value.clone(),
                },
                &increment.name.token,
            ));
        }
    };

    match value {
        Value::Int(cell) => {
            let old_value = cell.get();
            if increment.operator == TokenKind::PlusPlus {
                cell.set(old_value + 1);
            } else {
                cell.set(old_value - 1);
            }
            if increment.pre {
                Ok(Value::Int(cell))
            } else {
                Ok(Value::int(old_value))
            }
        }
        _ => Err(error_at(RuntimeErrorKind::IncrementNonInt, &increment.operator_token)),
    }
}

fn eval_member_access_expression(
    member: &MemberAccessExpression,
    environment: &Environment,
) -> EvalResult<Value> {
    let object = eval_expression(&member.object, environment)?;
    let dynamic_type = object.type_of();

    match environment.get_member(&member.member.value, &dynamic_type) {
        Some(Value::Function(function)) => {
            Ok(Value::Function(Rc::new(function.with_this(object))))
        }
        Some(value) => Ok(value),
        None => Err(error_at(
            RuntimeErrorKind::UnresolvedMember {
                name: member.member.value.clone(),
            },
            &member.dot_token,
        )),
    }
}
