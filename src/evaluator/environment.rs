use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::types::{
    context::Context,
    types::{is_assignable, Type},
};

use super::object::Value;

struct EnvironmentInner {
    parent: Option<Environment>,
    context: Context,
    store: RefCell<HashMap<String, Value>>,
    type_members: RefCell<Vec<(Type, HashMap<String, Value>)>>,
}

/// One frame of the runtime scope chain.
///
/// Structurally mirrors the compile-time `Context`: plain bindings plus
/// type-member bindings keyed by owner type, matched with the same
/// assignability test used at check time. Each frame keeps the context it
/// was checked against, so member dispatch can resolve interface owners.
#[derive(Clone)]
pub struct Environment(Rc<EnvironmentInner>);

impl Environment {
    pub fn new(context: Context) -> Environment {
        Environment(Rc::new(EnvironmentInner {
            parent: None,
            context,
            store: RefCell::new(HashMap::new()),
            type_members: RefCell::new(Vec::new()),
        }))
    }

    pub fn extend(parent: &Environment, context: Context) -> Environment {
        Environment(Rc::new(EnvironmentInner {
            parent: Some(parent.clone()),
            context,
            store: RefCell::new(HashMap::new()),
            type_members: RefCell::new(Vec::new()),
        }))
    }

    pub fn context(&self) -> Context {
        self.0.context.clone()
    }

    pub fn get_in_this_scope(&self, name: &str) -> Option<Value> {
        self.0.store.borrow().get(name).cloned()
    }

    /// Resolves `name` through this frame and its ancestors.
    pub fn get(&self, name: &str) -> Option<Value> {
        let mut current = Some(self.clone());
        while let Some(environment) = current {
            let found = environment.get_in_this_scope(name);
            if found.is_some() {
                return found;
            }
            current = environment.0.parent.clone();
        }
        None
    }

    /// Binds `name` in this frame, overwriting any previous binding here.
    /// Returns false when the name was already bound in this frame, which
    /// callers binding call parameters treat as an error.
    pub fn define(&self, name: &str, value: Value) -> bool {
        self.0.store.borrow_mut().insert(name.to_string(), value).is_none()
    }

    pub fn define_type_member(&self, owner: Type, name: &str, value: Value) {
        let mut type_members = self.0.type_members.borrow_mut();
        let entry = type_members.iter_mut().find(|(registered, _)| *registered == owner);
        match entry {
            Some((_, members)) => {
                members.insert(name.to_string(), value);
            }
            None => {
                let mut members = HashMap::new();
                members.insert(name.to_string(), value);
                type_members.push((owner, members));
            }
        }
    }

    /// Lexical assignment: walks outward to the nearest frame that already
    /// owns the name and rebinds it there. Never creates a binding.
    pub fn assign(&self, name: &str, value: Value) -> bool {
        let mut current = Some(self.clone());
        while let Some(environment) = current {
            if environment.get_in_this_scope(name).is_some() {
                environment.0.store.borrow_mut().insert(name.to_string(), value);
                return true;
            }
            current = environment.0.parent.clone();
        }
        false
    }

    /// Resolves a type member for a value of dynamic type `owner_type`,
    /// matching registered owners via assignability so members declared on
    /// an interface dispatch structurally.
    pub fn get_member(&self, name: &str, owner_type: &Type) -> Option<Value> {
        let mut current = Some(self.clone());
        while let Some(environment) = current {
            let context = environment.context();
            for (registered, members) in environment.0.type_members.borrow().iter() {
                if is_assignable(owner_type, registered, &context) {
                    if let Some(member) = members.get(name) {
                        return Some(member.clone());
                    }
                }
            }
            current = environment.0.parent.clone();
        }
        None
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("bindings", &self.0.store.borrow().keys())
            .field("has_parent", &self.0.parent.is_some())
            .finish()
    }
}
