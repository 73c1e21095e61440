//! Usage classification over an ancestor path.
//!
//! The walk starts at the occurrence and moves outward. At every node the
//! rules below are tried in a fixed order and the first decisive one wins;
//! reordering them changes results. Only implicit conversions let the walk
//! continue after matching.
//!
//! An unevaluated operand (`decltype`, `sizeof`) anywhere on the path
//! means no judgement at all.
//!
//! # Rule order at each node
//! 1. `delete`, `new`, `switch`/`if` condition, call, member call
//! 2. Lvalue references record whether the symbol is a function or may be written
//! 3. Declarations (with or without initializer)
//! 4. Member-initializer entries, `++`/`--`, assignment-like operators
//! 5. Implicit conversions

use crate::ast::{AncestorPath, NodeKind, Role, SyntaxNode};
use crate::usage::TagSet;

/// Flags accumulated while walking outward.
#[derive(Debug, Default)]
struct WalkState {
    potential_write: bool,
    is_function: bool,
}

impl WalkState {
    fn is_potential_write(&self) -> bool {
        self.potential_write && !self.is_function
    }

    fn read_or_writable_ref(&self) -> TagSet {
        if self.is_potential_write() {
            TagSet::WRITABLE_REF
        } else {
            TagSet::READ
        }
    }
}

/// Facts about the occurrence itself, computed before the walk.
struct Occurrence<'a> {
    node: &'a SyntaxNode,
    is_data_type: bool,
    invokes_own_constructor: bool,
}

impl<'a> Occurrence<'a> {
    fn new(node: &'a SyntaxNode, symbol_name: &str) -> Self {
        let is_data_type = node.has_role(&Role::Type) && *node.kind() == NodeKind::Record;
        let invokes_own_constructor = node.has_role(&Role::Expression)
            && *node.kind() == NodeKind::Construct
            && node
                .detail()
                .is_some_and(|ctor| !ctor.is_empty() && ctor == symbol_name);
        Self {
            node,
            is_data_type,
            invokes_own_constructor,
        }
    }

    fn is_inside_child(&self, parent: &SyntaxNode, index: usize) -> bool {
        self.node
            .range()
            .is_some_and(|range| parent.child_contains_range(index, range))
    }
}

/// Classify how the symbol at `path.occurrence()` is used.
///
/// `symbol_name` is the spelling of the searched symbol; it is only compared
/// against the name of an invoked constructor. Returns the empty set when no
/// rule applies.
pub fn classify(path: &AncestorPath<'_>, symbol_name: &str) -> TagSet {
    let tags = walk(path, symbol_name);
    log::trace!(
        "'{}' at {:?} classified as [{}]",
        symbol_name,
        path.occurrence().range(),
        tags
    );
    tags
}

fn walk(path: &AncestorPath<'_>, symbol_name: &str) -> TagSet {
    // An unevaluated operand anywhere on the path overrides every other rule.
    if path.iter().any(|node| node.facts().unevaluated) {
        return TagSet::empty();
    }

    let occurrence = Occurrence::new(path.occurrence(), symbol_name);
    let mut state = WalkState::default();

    for (index, node) in path.iter().enumerate() {
        let facts = node.facts();

        match node.kind() {
            NodeKind::Delete => return TagSet::WRITE,
            NodeKind::New => return TagSet::empty(),
            NodeKind::Switch | NodeKind::If => return TagSet::READ,
            NodeKind::Call => {
                return if state.is_function {
                    TagSet::empty()
                } else if state.potential_write {
                    TagSet::WRITABLE_REF
                } else {
                    TagSet::READ
                };
            }
            NodeKind::MemberCall => {
                if state.is_function || is_bound_member_call(node, occurrence.node) {
                    return TagSet::empty();
                }
                return state.read_or_writable_ref();
            }
            _ => {}
        }

        if matches!(node.kind(), NodeKind::DeclRef | NodeKind::Member) && facts.lvalue {
            if facts.function_entity {
                state.is_function = true;
            } else {
                state.potential_write = true;
            }
        }

        if node.has_role(&Role::Declaration) {
            return classify_declaration(path, index, &occurrence, &state);
        }

        match node.kind() {
            NodeKind::MemberInitializer => {
                return if index == 0 {
                    TagSet::WRITE
                } else {
                    TagSet::READ
                };
            }
            NodeKind::UnaryOperator if node.detail_is("++") || node.detail_is("--") => {
                return TagSet::WRITE;
            }
            NodeKind::BinaryOperator | NodeKind::OperatorCall => {
                return classify_operator(node, &occurrence, &state);
            }
            NodeKind::ImplicitCast => {
                if facts.function_to_pointer_decay {
                    return TagSet::empty();
                }
                if node.has_const_type() {
                    return TagSet::READ;
                }
                state.potential_write = true;
            }
            _ => {}
        }
    }

    TagSet::empty()
}

/// `obj.method` where the member call's only child is the occurrence itself.
fn is_bound_member_call(call: &SyntaxNode, occurrence: &SyntaxNode) -> bool {
    match call.children() {
        [only] => only == occurrence && only.facts().bound_member_function,
        _ => false,
    }
}

fn classify_declaration(
    path: &AncestorPath<'_>,
    index: usize,
    occurrence: &Occurrence<'_>,
    state: &WalkState,
) -> TagSet {
    if occurrence.is_data_type || occurrence.invokes_own_constructor {
        return TagSet::empty();
    }

    let decl = path.nodes()[index];
    if decl.facts().has_initializer {
        // Child 0 of an initialized variable is its initializer.
        if index == 0 || occurrence.is_inside_child(decl, 0) {
            return TagSet::DECLARATION | TagSet::WRITE;
        }
        if state.is_function {
            return TagSet::READ;
        }
        if !decl.has_const_type() {
            return TagSet::WRITABLE_REF;
        }
        return TagSet::READ;
    }

    let mut tags = TagSet::DECLARATION;
    for attribute in decl
        .children()
        .iter()
        .filter(|child| child.has_role(&Role::Attribute))
    {
        match attribute.kind() {
            NodeKind::Override | NodeKind::Final => tags |= TagSet::OVERRIDE,
            NodeKind::Annotate if attribute.facts().reflection_marker => {
                tags |= TagSet::MOC_INVOKABLE
            }
            _ => {}
        }
    }
    if is_template_context(decl, path.outward_from(index)) {
        tags |= TagSet::TEMPLATE;
    }
    tags
}

fn classify_operator(
    node: &SyntaxNode,
    occurrence: &Occurrence<'_>,
    state: &WalkState,
) -> TagSet {
    let is_operator_call = *node.kind() == NodeKind::OperatorCall;
    // A class type named by an overloaded operator call is a constructor invocation.
    if is_operator_call && occurrence.is_data_type {
        return TagSet::empty();
    }

    if !node.operator_spelling().is_some_and(is_assignment_operator) {
        return TagSet::READ;
    }

    // The overloaded call's callee occupies child 0.
    let lhs_index = if is_operator_call { 1 } else { 0 };
    if occurrence.is_inside_child(node, lhs_index) {
        return TagSet::WRITE;
    }
    state.read_or_writable_ref()
}

/// Any operator spelled with a trailing `=` except `==`.
fn is_assignment_operator(op: &str) -> bool {
    op.ends_with('=') && op != "=="
}

/// Whether a declaration is templated or sits inside a template.
///
/// `outer` is the declaration's own position in the path and everything
/// further out. A function declaration that is a template specialization is
/// recognized by a `template argument` child.
pub fn is_template_context(decl: &SyntaxNode, outer: &[&SyntaxNode]) -> bool {
    if *decl.kind() == NodeKind::Function
        && decl
            .children()
            .iter()
            .any(|child| child.has_role(&Role::TemplateArgument))
    {
        return true;
    }
    outer.iter().any(|node| node.kind().is_template())
}
