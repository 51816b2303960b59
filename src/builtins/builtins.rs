use std::io::{BufRead, Write};
use std::rc::Rc;

use crate::{
    errors::errors::RuntimeErrorKind,
    evaluator::{
        environment::Environment,
        object::{BuiltinFunction, FunctionKind, FunctionValue, Value},
    },
    types::{context::Context, types::Type},
};

struct Builtin {
    owner: Option<Type>,
    name: &'static str,
    declared_type: Type,
    function: BuiltinFunction,
}

fn fn_type(parameter_types: Vec<Type>, return_type: Type) -> Type {
    Type::Function {
        parameter_types,
        return_type: Box::new(return_type),
    }
}

fn builtin_println(_this: Option<&Value>, arguments: &[Value]) -> Result<Value, RuntimeErrorKind> {
    println!("{}", arguments[0]);
    Ok(Value::Void)
}

fn builtin_print(_this: Option<&Value>, arguments: &[Value]) -> Result<Value, RuntimeErrorKind> {
    print!("{}", arguments[0]);
    let _ = std::io::stdout().flush();
    Ok(Value::Void)
}

fn builtin_prompt(_this: Option<&Value>, arguments: &[Value]) -> Result<Value, RuntimeErrorKind> {
    print!("{}", arguments[0]);
    let _ = std::io::stdout().flush();

    let mut input = String::new();
    match std::io::stdin().lock().read_line(&mut input) {
        Ok(_) => Ok(Value::string(input.trim_end_matches(['\n', '\r']))),
        Err(_) => Err(RuntimeErrorKind::InputFailed),
    }
}

fn builtin_min(_this: Option<&Value>, arguments: &[Value]) -> Result<Value, RuntimeErrorKind> {
    let (Some(a), Some(b)) = (arguments[0].as_int(), arguments[1].as_int()) else {
        return Err(RuntimeErrorKind::IntConversion);
    };
    Ok(Value::int(a.min(b)))
}

fn builtin_max(_this: Option<&Value>, arguments: &[Value]) -> Result<Value, RuntimeErrorKind> {
    let (Some(a), Some(b)) = (arguments[0].as_int(), arguments[1].as_int()) else {
        return Err(RuntimeErrorKind::IntConversion);
    };
    Ok(Value::int(a.max(b)))
}

fn builtin_to_string(this: Option<&Value>, _arguments: &[Value]) -> Result<Value, RuntimeErrorKind> {
    let Some(this) = this else {
        return Err(RuntimeErrorKind::MissingReceiver);
    };
    Ok(Value::string(this.to_string()))
}

fn builtin_abs(this: Option<&Value>, _arguments: &[Value]) -> Result<Value, RuntimeErrorKind> {
    let Some(value) = this.and_then(Value::as_int) else {
        return Err(RuntimeErrorKind::MissingReceiver);
    };
    Ok(Value::int(value.abs()))
}

fn builtin_length(this: Option<&Value>, _arguments: &[Value]) -> Result<Value, RuntimeErrorKind> {
    let Some(this) = this else {
        return Err(RuntimeErrorKind::MissingReceiver);
    };
    Ok(Value::int(this.to_string().chars().count() as i64))
}

fn builtin_uppercase(this: Option<&Value>, _arguments: &[Value]) -> Result<Value, RuntimeErrorKind> {
    let Some(this) = this else {
        return Err(RuntimeErrorKind::MissingReceiver);
    };
    Ok(Value::string(this.to_string().to_uppercase()))
}

fn builtin_lowercase(this: Option<&Value>, _arguments: &[Value]) -> Result<Value, RuntimeErrorKind> {
    let Some(this) = this else {
        return Err(RuntimeErrorKind::MissingReceiver);
    };
    Ok(Value::string(this.to_string().to_lowercase()))
}

fn builtin_parse_int(this: Option<&Value>, _arguments: &[Value]) -> Result<Value, RuntimeErrorKind> {
    let Some(this) = this else {
        return Err(RuntimeErrorKind::MissingReceiver);
    };
    // TODO report an error for invalid input instead of defaulting to 0
    Ok(Value::int(this.to_string().parse::<i64>().unwrap_or(0)))
}

fn builtin_table() -> Vec<Builtin> {
    vec![
        Builtin {
            owner: None,
            name: "println",
            declared_type: fn_type(vec![Type::String], Type::Void),
            function: builtin_println,
        },
        Builtin {
            owner: None,
            name: "print",
            declared_type: fn_type(vec![Type::String], Type::Void),
            function: builtin_print,
        },
        Builtin {
            owner: None,
            name: "prompt",
            declared_type: fn_type(vec![Type::String], Type::String),
            function: builtin_prompt,
        },
        Builtin {
            owner: None,
            name: "min",
            declared_type: fn_type(vec![Type::Int, Type::Int], Type::Int),
            function: builtin_min,
        },
        Builtin {
            owner: None,
            name: "max",
            declared_type: fn_type(vec![Type::Int, Type::Int], Type::Int),
            function: builtin_max,
        },
        Builtin {
            owner: Some(Type::Int),
            name: "toString",
            declared_type: fn_type(vec![], Type::String),
            function: builtin_to_string,
        },
        Builtin {
            owner: Some(Type::Int),
            name: "abs",
            declared_type: fn_type(vec![], Type::Int),
            function: builtin_abs,
        },
        Builtin {
            owner: Some(Type::Bool),
            name: "toString",
            declared_type: fn_type(vec![], Type::String),
            function: builtin_to_string,
        },
        Builtin {
            owner: Some(Type::String),
            name: "toString",
            declared_type: fn_type(vec![], Type::String),
            function: builtin_to_string,
        },
        Builtin {
            owner: Some(Type::String),
            name: "length",
            declared_type: fn_type(vec![], Type::Int),
            function: builtin_length,
        },
        Builtin {
            owner: Some(Type::String),
            name: "uppercase",
            declared_type: fn_type(vec![], Type::String),
            function: builtin_uppercase,
        },
        Builtin {
            owner: Some(Type::String),
            name: "lowercase",
            declared_type: fn_type(vec![], Type::String),
            function: builtin_lowercase,
        },
        Builtin {
            owner: Some(Type::String),
            name: "parseInt",
            declared_type: fn_type(vec![], Type::Int),
            function: builtin_parse_int,
        },
    ]
}

/// Builds a context/environment pair with every builtin registered, then
/// returns extended child frames so user code shadows builtins instead of
/// colliding with them.
pub fn new_context_and_environment() -> (Context, Environment) {
    let context = Context::new();
    let environment = Environment::new(context.clone());

    for builtin in builtin_table() {
        context.define(builtin.name, builtin.declared_type.clone(), builtin.owner.as_ref());
        let value = Value::Function(Rc::new(FunctionValue {
            fn_type: builtin.declared_type,
            this: None,
            kind: FunctionKind::Builtin(builtin.function),
        }));
        match builtin.owner {
            Some(owner) => environment.define_type_member(owner, builtin.name, value),
            None => {
                environment.define(builtin.name, value);
            }
        }
    }

    let extended_context = Context::extend(&context);
    let extended_environment = Environment::extend(&environment, extended_context.clone());
    (extended_context, extended_environment)
}
