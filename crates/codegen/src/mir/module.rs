//! MIR modules.

use super::{ExternId, Function, FunctionId, MirType};
use std::fmt;
use toroid_data_structures::index::IndexVec;

/// A declaration of a function provided by the C runtime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExternFunction {
    /// The symbol name.
    pub name: String,
    /// Parameter types.
    pub params: Vec<MirType>,
    /// Return type.
    pub returns: MirType,
}

impl ExternFunction {
    /// Creates a new external declaration.
    pub fn new(name: impl Into<String>, params: Vec<MirType>, returns: MirType) -> Self {
        Self { name: name.into(), params, returns }
    }
}

/// A module in the MIR.
#[derive(Clone, Debug)]
pub struct Module {
    /// The module name.
    pub name: String,
    /// External function declarations.
    pub externs: IndexVec<ExternId, ExternFunction>,
    /// All functions in this module.
    pub functions: IndexVec<FunctionId, Function>,
}

impl Module {
    /// Creates a new empty module.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), externs: IndexVec::new(), functions: IndexVec::new() }
    }

    /// Declares an external function, returning the existing declaration if the name is taken.
    pub fn declare(&mut self, decl: ExternFunction) -> ExternId {
        match self.externs.iter_enumerated().find(|(_, d)| d.name == decl.name) {
            Some((id, _)) => id,
            None => self.externs.push(decl),
        }
    }

    /// Returns the external declaration with the given ID.
    pub fn extern_fn(&self, id: ExternId) -> &ExternFunction {
        &self.externs[id]
    }

    /// Adds a function to the module.
    pub fn add_function(&mut self, func: Function) -> FunctionId {
        self.functions.push(func)
    }

    /// Returns the function with the given ID.
    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id]
    }

    /// Returns a mutable reference to the function with the given ID.
    pub fn function_mut(&mut self, id: FunctionId) -> &mut Function {
        &mut self.functions[id]
    }

    /// Looks up a function by name.
    pub fn function_by_name(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Returns an iterator over all functions.
    pub fn iter_functions(&self) -> impl Iterator<Item = (FunctionId, &Function)> {
        self.functions.iter_enumerated()
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "module {} {{", self.name)?;
        for decl in &self.externs {
            write!(f, "    declare {} @{}(", decl.returns, decl.name)?;
            for (i, param) in decl.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{param}")?;
            }
            writeln!(f, ")")?;
        }
        for func in &self.functions {
            writeln!(f)?;
            super::display::fmt_function(f, self, func, "    ")?;
        }
        writeln!(f, "}}")
    }
}
