use crate::error::{LoxError, Result};
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One link in the parent-pointer chain of scopes.  The chain only ever
/// points upward, so no cycle can form through `enclosing`.
#[derive(Debug)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Defining an already-present name overwrites its slot.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str, line: usize) -> Result<Value> {
        if let Some(value) = self.values.get(name) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name, line)
        } else {
            Err(LoxError::runtime(
                line,
                format!("Undefined variable '{}'.", name),
            ))
        }
    }

    pub fn assign(&mut self, name: &str, value: Value, line: usize) -> Result<()> {
        if self.values.contains_key(name) {
            self.values.insert(name.to_string(), value);
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value, line)
        } else {
            Err(LoxError::runtime(
                line,
                format!("Undefined variable '{}'.", name),
            ))
        }
    }

    /// Read the slot exactly `distance` links up the chain.  The resolver
    /// guarantees the slot exists there; a miss is a runtime error rather
    /// than a silent fallback.
    pub fn get_at(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &str,
        line: usize,
    ) -> Result<Value> {
        let target: Rc<RefCell<Environment>> = Environment::ancestor(env, distance, name, line)?;

        let value: Option<Value> = target.borrow().values.get(name).cloned();

        value.ok_or_else(|| LoxError::runtime(line, format!("Undefined variable '{}'.", name)))
    }

    /// Write the slot exactly `distance` links up the chain.
    pub fn assign_at(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &str,
        value: Value,
        line: usize,
    ) -> Result<()> {
        let target: Rc<RefCell<Environment>> = Environment::ancestor(env, distance, name, line)?;

        if !target.borrow().values.contains_key(name) {
            return Err(LoxError::runtime(
                line,
                format!("Undefined variable '{}'.", name),
            ));
        }

        target.borrow_mut().values.insert(name.to_string(), value);

        Ok(())
    }

    fn ancestor(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &str,
        line: usize,
    ) -> Result<Rc<RefCell<Environment>>> {
        let mut current: Rc<RefCell<Environment>> = env.clone();

        for _ in 0..distance {
            let next: Rc<RefCell<Environment>> = match &current.borrow().enclosing {
                Some(enclosing) => enclosing.clone(),

                None => {
                    return Err(LoxError::runtime(
                        line,
                        format!("No enclosing scope for variable '{}'.", name),
                    ));
                }
            };

            current = next;
        }

        Ok(current)
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}
