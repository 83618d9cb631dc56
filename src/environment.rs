use crate::error::PyrustError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A binding slot: a value plus whether it may be reassigned. Mutability is
/// fixed at declaration and never changes afterward.
struct Binding {
    value: Value,
    mutable: bool,
}

struct Scope {
    bindings: HashMap<String, Binding>,
    parent: Option<Env>,
}

/// A lexical scope, shared by reference. Closures hold a clone of the `Env`
/// active at declaration time; the `Rc` keeps that scope alive for as long
/// as any closure (or a still-executing block) needs it, regardless of
/// whether the scope that introduced it has otherwise gone out of scope.
#[derive(Clone)]
pub struct Env(Rc<RefCell<Scope>>);

impl Env {
    /// Creates the global scope. It has no parent and lives for the
    /// lifetime of the program.
    pub fn global() -> Env {
        Env(Rc::new(RefCell::new(Scope {
            bindings: HashMap::new(),
            parent: None,
        })))
    }

    /// Creates a child scope: used for a function call (child of the
    /// function's *captured* environment) or for entering an `if`/`while`
    /// body (child of the surrounding scope).
    pub fn child(parent: &Env) -> Env {
        Env(Rc::new(RefCell::new(Scope {
            bindings: HashMap::new(),
            parent: Some(parent.clone()),
        })))
    }

    /// Declares `name` in this scope, shadowing any existing binding of the
    /// same name in this scope (redeclaration replaces the slot) or in an
    /// outer scope (the inner binding merely hides the outer one).
    pub fn declare(&self, name: &str, value: Value, mutable: bool) {
        self.0
            .borrow_mut()
            .bindings
            .insert(name.to_string(), Binding { value, mutable });
    }

    /// Looks up `name`, walking outward through parent scopes.
    pub fn get(&self, name: &str) -> Result<Value, PyrustError> {
        let scope = self.0.borrow();
        if let Some(binding) = scope.bindings.get(name) {
            return Ok(binding.value.clone());
        }
        match &scope.parent {
            Some(parent) => parent.get(name),
            None => Err(PyrustError::NameError { name: name.to_string() }),
        }
    }

    /// Reassigns the nearest binding of `name`, walking outward. Fails with
    /// `NameError` if no binding exists, or `ImmutabilityError` if the
    /// nearest binding is not `mut`. The new value's tag is not checked
    /// against the original: annotations bind only at declaration.
    pub fn assign(&self, name: &str, value: Value) -> Result<(), PyrustError> {
        let mut scope = self.0.borrow_mut();
        if let Some(binding) = scope.bindings.get_mut(name) {
            if !binding.mutable {
                return Err(PyrustError::ImmutabilityError { name: name.to_string() });
            }
            binding.value = value;
            return Ok(());
        }
        match &scope.parent {
            Some(parent) => {
                let parent = parent.clone();
                drop(scope);
                parent.assign(name, value)
            }
            None => Err(PyrustError::NameError { name: name.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_outward() {
        let global = Env::global();
        global.declare("x", Value::Int(1), false);
        let inner = Env::child(&global);
        assert!(matches!(inner.get("x"), Ok(Value::Int(1))));
    }

    #[test]
    fn shadowing_hides_outer_binding_without_mutating_it() {
        let outer = Env::global();
        outer.declare("x", Value::Int(1), false);
        let inner = Env::child(&outer);
        inner.declare("x", Value::Int(2), false);
        assert!(matches!(inner.get("x"), Ok(Value::Int(2))));
        assert!(matches!(outer.get("x"), Ok(Value::Int(1))));
    }

    #[test]
    fn assign_to_immutable_binding_fails() {
        let env = Env::global();
        env.declare("x", Value::Int(1), false);
        assert!(matches!(
            env.assign("x", Value::Int(2)),
            Err(PyrustError::ImmutabilityError { .. })
        ));
    }

    #[test]
    fn assign_to_mutable_binding_in_outer_scope_is_visible_there() {
        let outer = Env::global();
        outer.declare("x", Value::Int(1), true);
        let inner = Env::child(&outer);
        inner.assign("x", Value::Int(42)).unwrap();
        assert!(matches!(outer.get("x"), Ok(Value::Int(42))));
    }

    #[test]
    fn assign_to_unbound_name_is_name_error() {
        let env = Env::global();
        assert!(matches!(
            env.assign("missing", Value::Int(1)),
            Err(PyrustError::NameError { .. })
        ));
    }
}
