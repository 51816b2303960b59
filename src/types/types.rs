use std::collections::BTreeMap;
use std::fmt::Display;

use super::context::Context;

/// A type in the lattice.
///
/// The set is closed: new types enter the language only through `type`
/// definitions, which alias structures built from these variants.
/// `Never` is the bottom type produced by failed inference; it carries a
/// diagnostic message which is reported once at the node where inference
/// failed and suppressed when empty.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Never(String),
    Null,
    Void,
    Int,
    Float,
    Bool,
    String,
    Function {
        parameter_types: Vec<Type>,
        return_type: Box<Type>,
    },
    Optional(Box<Type>),
    Iface(BTreeMap<String, Type>),
}

impl Type {
    pub fn never() -> Type {
        Type::Never(String::new())
    }

    pub fn is_never(&self) -> bool {
        matches!(self, Type::Never(_))
    }

    /// Wraps `base` into an optional, normalizing degenerate cases:
    /// optionality is idempotent and meaningless for `never`, `null` and
    /// `void`, which are returned unchanged.
    pub fn optional_of(base: Type) -> Type {
        match base {
            Type::Never(_) | Type::Null | Type::Void | Type::Optional(_) => base,
            _ => Type::Optional(Box::new(base)),
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Never(_) => write!(f, "never"),
            Type::Null => write!(f, "null"),
            Type::Void => write!(f, "void"),
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Bool => write!(f, "bool"),
            Type::String => write!(f, "string"),
            Type::Function { parameter_types, return_type } => {
                write!(f, "fn(")?;
                for (i, parameter) in parameter_types.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", parameter)?;
                }
                write!(f, ") {}", return_type)
            }
            Type::Optional(base) => write!(f, "{}?", base),
            Type::Iface(members) => {
                write!(f, "iface {{")?;
                for (name, member_type) in members {
                    write!(f, " {}: {};", name, member_type)?;
                }
                write!(f, " }}")
            }
        }
    }
}

/// Whether a value of type `candidate` may be used where `target` is
/// expected.
///
/// The interface rule needs the context's type-member registry, which is
/// why the relation takes a `Context`: a type satisfies an interface iff
/// every interface member resolves on it to an assignable type.
pub fn is_assignable(candidate: &Type, target: &Type, context: &Context) -> bool {
    // Structural equality short-circuits; this also keeps interface
    // self-assignability from re-entering member resolution
    if candidate == target {
        return true;
    }

    match target {
        Type::Never(_) => candidate.is_never(),
        Type::Null => matches!(candidate, Type::Null),
        Type::Void => matches!(candidate, Type::Void),
        Type::Int => matches!(candidate, Type::Int),
        Type::Float => matches!(candidate, Type::Float),
        Type::Bool => matches!(candidate, Type::Bool),
        Type::String => matches!(candidate, Type::String),
        Type::Function { parameter_types, .. } => {
            // Parameters are checked positionally in declared order; return
            // types do not participate.
            match candidate {
                Type::Function { parameter_types: candidate_parameters, .. } => {
                    candidate_parameters.len() == parameter_types.len()
                        && candidate_parameters
                            .iter()
                            .zip(parameter_types.iter())
                            .all(|(candidate_parameter, target_parameter)| {
                                is_assignable(candidate_parameter, target_parameter, context)
                            })
                }
                _ => false,
            }
        }
        Type::Optional(base) => match candidate {
            Type::Null => true,
            Type::Optional(candidate_base) => is_assignable(candidate_base, base, context),
            _ => is_assignable(candidate, base, context),
        },
        Type::Iface(members) => {
            if candidate.is_never() {
                return false;
            }
            members.iter().all(|(name, required)| {
                match context.get(name, Some(candidate)) {
                    Some(resolved) => is_assignable(&resolved, required, context),
                    None => false,
                }
            })
        }
    }
}
