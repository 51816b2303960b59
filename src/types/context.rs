use std::{cell::RefCell, collections::HashMap, rc::Rc};

use super::types::{is_assignable, Type};

struct ContextInner {
    parent: Option<Context>,
    parent_type: Option<Type>,
    return_type: Option<Type>,
    bindings: RefCell<HashMap<String, Type>>,
    type_members: RefCell<Vec<(Type, HashMap<String, Type>)>>,
    named_types: RefCell<HashMap<String, Type>>,
}

/// One frame of the compile-time scope chain.
///
/// A `Context` value is a cheap handle; frames are shared by reference
/// through the parent chain. Lookups read through to ancestors, definitions
/// always land in the frame they are issued against, and redefinition is
/// rejected per frame only (shadowing in a child frame is legal).
#[derive(Clone)]
pub struct Context(Rc<ContextInner>);

impl Context {
    pub fn new() -> Context {
        Context(Rc::new(ContextInner {
            parent: None,
            parent_type: None,
            return_type: None,
            bindings: RefCell::new(HashMap::new()),
            type_members: RefCell::new(Vec::new()),
            named_types: RefCell::new(HashMap::new()),
        }))
    }

    /// Creates a child frame inheriting the parent's declared return type.
    pub fn extend(parent: &Context) -> Context {
        Context(Rc::new(ContextInner {
            parent: Some(parent.clone()),
            parent_type: None,
            return_type: parent.0.return_type.clone(),
            bindings: RefCell::new(HashMap::new()),
            type_members: RefCell::new(Vec::new()),
            named_types: RefCell::new(HashMap::new()),
        }))
    }

    /// Creates a child frame for a function body, carrying the function's
    /// declared return type for `return` checking.
    pub fn extend_with_return(parent: &Context, return_type: Type) -> Context {
        Context(Rc::new(ContextInner {
            parent: Some(parent.clone()),
            parent_type: None,
            return_type: Some(return_type),
            bindings: RefCell::new(HashMap::new()),
            type_members: RefCell::new(Vec::new()),
            named_types: RefCell::new(HashMap::new()),
        }))
    }

    /// Deep-copies this frame's own tables; the parent chain is shared by
    /// reference. Used to snapshot a function's parameter scope into its
    /// definition node without later bindings leaking into the snapshot.
    pub fn deep_clone(&self) -> Context {
        Context(Rc::new(ContextInner {
            parent: self.0.parent.clone(),
            parent_type: self.0.parent_type.clone(),
            return_type: self.0.return_type.clone(),
            bindings: RefCell::new(self.0.bindings.borrow().clone()),
            type_members: RefCell::new(self.0.type_members.borrow().clone()),
            named_types: RefCell::new(self.0.named_types.borrow().clone()),
        }))
    }

    /// Builds a fresh, detached context whose top frame contains exactly the
    /// members resolvable on `parent_type` through the full ancestor chain,
    /// with interface members synthesized for interface-typed receivers.
    ///
    /// Member-access expressions parse their right-hand identifier inside
    /// such a context, so only members of the left-hand type resolve.
    pub fn sub_context(&self, parent_type: &Type) -> Context {
        let sub = Context(Rc::new(ContextInner {
            parent: None,
            parent_type: Some(parent_type.clone()),
            return_type: None,
            bindings: RefCell::new(HashMap::new()),
            type_members: RefCell::new(Vec::new()),
            named_types: RefCell::new(HashMap::new()),
        }));

        {
            let mut bindings = sub.0.bindings.borrow_mut();
            let mut current = Some(self.clone());
            while let Some(context) = current {
                for (registered, members) in context.0.type_members.borrow().iter() {
                    if is_assignable(parent_type, registered, self) {
                        for (name, member_type) in members {
                            if !bindings.contains_key(name) {
                                bindings.insert(name.clone(), member_type.clone());
                            }
                        }
                    }
                }
                current = context.0.parent.clone();
            }

            if let Type::Iface(members) = parent_type {
                for (name, member_type) in members {
                    if !bindings.contains_key(name) {
                        bindings.insert(name.clone(), member_type.clone());
                    }
                }
            }
        }

        sub
    }

    pub fn return_type(&self) -> Option<Type> {
        self.0.return_type.clone()
    }

    /// The receiver type of a member-access sub-context, if any. Used to
    /// phrase unresolved references as "not a member of" diagnostics.
    pub fn parent_type(&self) -> Option<Type> {
        self.0.parent_type.clone()
    }

    fn get_in_this_scope(&self, name: &str, owner: Option<&Type>) -> Option<Type> {
        match owner {
            None => self.0.bindings.borrow().get(name).cloned(),
            Some(owner_type) => {
                for (registered, members) in self.0.type_members.borrow().iter() {
                    if is_assignable(owner_type, registered, self) {
                        if let Some(member_type) = members.get(name) {
                            return Some(member_type.clone());
                        }
                    }
                }
                None
            }
        }
    }

    /// Resolves `name` through this frame and its ancestors.
    ///
    /// With an owning type, registered owners are matched via assignability,
    /// so members declared on a supertype or interface are visible through a
    /// subtype reference; an interface receiver additionally resolves its
    /// own declared members.
    pub fn get(&self, name: &str, owner: Option<&Type>) -> Option<Type> {
        let mut current = Some(self.clone());
        while let Some(context) = current {
            if let Some(found) = context.get_in_this_scope(name, owner) {
                return Some(found);
            }
            current = context.0.parent.clone();
        }

        if let Some(Type::Iface(members)) = owner {
            return members.get(name).cloned();
        }
        None
    }

    /// Defines `name` in this frame; fails if the name already exists for
    /// that owning type in this frame.
    pub fn define(&self, name: &str, member_type: Type, owner: Option<&Type>) -> bool {
        if self.get_in_this_scope(name, owner).is_some() {
            return false;
        }

        match owner {
            None => {
                self.0.bindings.borrow_mut().insert(name.to_string(), member_type);
            }
            Some(owner_type) => {
                let mut type_members = self.0.type_members.borrow_mut();
                let entry = type_members.iter_mut().find(|(registered, _)| registered == owner_type);
                match entry {
                    Some((_, members)) => {
                        members.insert(name.to_string(), member_type);
                    }
                    None => {
                        let mut members = HashMap::new();
                        members.insert(name.to_string(), member_type);
                        type_members.push((owner_type.clone(), members));
                    }
                }
            }
        }
        true
    }

    pub fn get_type(&self, name: &str) -> Option<Type> {
        let mut current = Some(self.clone());
        while let Some(context) = current {
            let found = context.0.named_types.borrow().get(name).cloned();
            if found.is_some() {
                return found;
            }
            current = context.0.parent.clone();
        }
        None
    }

    /// Registers a named type definition; fails on redefinition in this
    /// frame.
    pub fn define_type(&self, name: &str, named_type: Type) -> bool {
        if self.0.named_types.borrow().contains_key(name) {
            return false;
        }
        self.0.named_types.borrow_mut().insert(name.to_string(), named_type);
        true
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new()
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("bindings", &self.0.bindings.borrow())
            .field("has_parent", &self.0.parent.is_some())
            .finish()
    }
}
