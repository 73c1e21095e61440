//! Detection of function-local variables.
//!
//! A local rename only needs references inside the enclosing function, so
//! callers first check whether the definition they landed on is a variable
//! or parameter owned by a function body.

use crate::ast::{AncestorPath, NodeKind, Role};

/// Whether the path leads to a variable or parameter declared inside a function.
///
/// The walk goes outward from the occurrence. A `Var`/`ParmVar` declaration
/// marks that a variable was seen; the first function-like declaration ends
/// the walk. Reaching the end without a function means the variable is global.
pub fn is_function_local_variable(path: &AncestorPath<'_>) -> bool {
    let mut is_var = false;
    for node in path.iter() {
        if !node.has_role(&Role::Declaration) {
            continue;
        }
        if node.kind().is_function_like() {
            return is_var;
        }
        if matches!(node.kind(), NodeKind::Var | NodeKind::ParmVar) {
            is_var = true;
        }
    }
    false
}
