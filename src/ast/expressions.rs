use std::fmt::Display;

use crate::{
    lexer::tokens::{Token, TokenKind},
    types::types::Type,
};

#[derive(Debug, Clone)]
pub enum Expression {
    Invalid(InvalidExpression),
    Identifier(Identifier),
    IntegerLiteral(IntegerLiteral),
    FloatLiteral(FloatLiteral),
    StringLiteral(StringLiteral),
    BooleanLiteral(BooleanLiteral),
    NullLiteral(NullLiteral),
    VoidLiteral(VoidLiteral),
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    Assignment(AssignmentExpression),
    Call(CallExpression),
    Increment(IncrementExpression),
    MemberAccess(MemberAccessExpression),
}

/// Placeholder node substituted where no expression could be parsed. Its
/// type is `never` with an empty message, so it produces no diagnostic of
/// its own.
#[derive(Debug, Clone)]
pub struct InvalidExpression {
    pub token: Option<Token>,
}

#[derive(Debug, Clone)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
    pub resolved_type: Type,
}

#[derive(Debug, Clone)]
pub struct IntegerLiteral {
    pub token: Token,
    pub value: i64,
}

#[derive(Debug, Clone)]
pub struct FloatLiteral {
    pub token: Token,
    pub value: f64,
}

#[derive(Debug, Clone)]
pub struct StringLiteral {
    pub token: Token,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct BooleanLiteral {
    pub token: Token,
    pub value: bool,
}

#[derive(Debug, Clone)]
pub struct NullLiteral {
    pub token: Option<Token>,
}

#[derive(Debug, Clone)]
pub struct VoidLiteral {
    pub token: Option<Token>,
}

#[derive(Debug, Clone)]
pub struct PrefixExpression {
    pub prefix_token: Token,
    pub operator: TokenKind,
    pub operand: Box<Expression>,
    pub resolved_type: Type,
}

#[derive(Debug, Clone)]
pub struct InfixExpression {
    pub operator_token: Token,
    pub operator: TokenKind,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
    pub resolved_type: Type,
}

#[derive(Debug, Clone)]
pub struct AssignmentExpression {
    pub assign_token: Token,
    pub name: Identifier,
    pub value: Box<Expression>,
    pub resolved_type: Type,
}

#[derive(Debug, Clone)]
pub struct CallExpression {
    pub paren_token: Token,
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
    pub resolved_type: Type,
}

#[derive(Debug, Clone)]
pub struct IncrementExpression {
    pub operator_token: Token,
    pub operator: TokenKind,
    pub name: Identifier,
    pub pre: bool,
    pub resolved_type: Type,
}

/// Member access carries both the resolved type of its left-hand side (the
/// parent type, used for runtime dispatch) and the resolved member type.
#[derive(Debug, Clone)]
pub struct MemberAccessExpression {
    pub dot_token: Token,
    pub object: Box<Expression>,
    pub member: Identifier,
    pub parent_type: Type,
    pub resolved_type: Type,
}

impl Expression {
    /// The token the expression is anchored at for diagnostics.
    pub fn token(&self) -> Option<&Token> {
        match self {
            Expression::Invalid(invalid) => invalid.token.as_ref(),
            Expression::Identifier(identifier) => Some(&identifier.token),
            Expression::IntegerLiteral(literal) => Some(&literal.token),
            Expression::FloatLiteral(literal) => Some(&literal.token),
            Expression::StringLiteral(literal) => Some(&literal.token),
            Expression::BooleanLiteral(literal) => Some(&literal.token),
            Expression::NullLiteral(literal) => literal.token.as_ref(),
            Expression::VoidLiteral(literal) => literal.token.as_ref(),
            Expression::Prefix(prefix) => Some(&prefix.prefix_token),
            Expression::Infix(infix) => infix.left.token().or(Some(&infix.operator_token)),
            Expression::Assignment(assignment) => Some(&assignment.name.token),
            Expression::Call(call) => Some(&call.paren_token),
            Expression::Increment(increment) => Some(&increment.operator_token),
            Expression::MemberAccess(member) => Some(&member.dot_token),
        }
    }

    /// The resolved type computed when the node was built.
    pub fn ty(&self) -> Type {
        match self {
            Expression::Invalid(_) => Type::never(),
            Expression::Identifier(identifier) => identifier.resolved_type.clone(),
            Expression::IntegerLiteral(_) => Type::Int,
            Expression::FloatLiteral(_) => Type::Float,
            Expression::StringLiteral(_) => Type::String,
            Expression::BooleanLiteral(_) => Type::Bool,
            Expression::NullLiteral(_) => Type::Null,
            Expression::VoidLiteral(_) => Type::Void,
            Expression::Prefix(prefix) => prefix.resolved_type.clone(),
            Expression::Infix(infix) => infix.resolved_type.clone(),
            Expression::Assignment(assignment) => assignment.resolved_type.clone(),
            Expression::Call(call) => call.resolved_type.clone(),
            Expression::Increment(increment) => increment.resolved_type.clone(),
            Expression::MemberAccess(member) => member.resolved_type.clone(),
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Expression::Invalid(_))
    }
}

fn escape_string(value: &str) -> String {
    let mut result = String::new();
    for ch in value.chars() {
        match ch {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            '\r' => result.push_str("\\r"),
            '\0' => result.push_str("\\0"),
            _ => result.push(ch),
        }
    }
    result
}

impl Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Invalid(_) => Ok(()),
            Expression::Identifier(identifier) => write!(f, "{}", identifier.value),
            Expression::IntegerLiteral(literal) => write!(f, "{}", literal.value),
            Expression::FloatLiteral(literal) => {
                if literal.value.fract() == 0.0 {
                    write!(f, "{:.1}", literal.value)
                } else {
                    write!(f, "{}", literal.value)
                }
            }
            Expression::StringLiteral(literal) => write!(f, "\"{}\"", escape_string(&literal.value)),
            Expression::BooleanLiteral(literal) => write!(f, "{}", literal.value),
            Expression::NullLiteral(_) => write!(f, "null"),
            Expression::VoidLiteral(_) => write!(f, "void"),
            Expression::Prefix(prefix) => {
                write!(f, "({}{})", prefix.operator.symbol(), prefix.operand)
            }
            Expression::Infix(infix) => {
                write!(f, "({} {} {})", infix.left, infix.operator.symbol(), infix.right)
            }
            Expression::Assignment(assignment) => {
                write!(f, "({} = {})", assignment.name.value, assignment.value)
            }
            Expression::Call(call) => {
                write!(f, "({}(", call.callee)?;
                for (i, argument) in call.arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, "))")
            }
            Expression::Increment(increment) => {
                if increment.pre {
                    write!(f, "{}{}", increment.operator.symbol(), increment.name.value)
                } else {
                    write!(f, "{}{}", increment.name.value, increment.operator.symbol())
                }
            }
            Expression::MemberAccess(member) => {
                write!(f, "{}.{}", member.object, member.member.value)
            }
        }
    }
}
