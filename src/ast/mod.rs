//! Syntax nodes as delivered by the C++ front end.
//!
//! Nodes follow the shape of the clangd `textDocument/ast` response:
//! a `kind`, an optional `role`, an optional `detail`, the raw clang dump
//! line (`arcana`, called the descriptor here), a range and children.
//!
//! The descriptor is only ever inspected once, when a node is built: the
//! substrings the classifier cares about are translated into [`NodeFacts`]
//! so that nothing downstream performs string containment tests.

pub mod path;

use crate::error::{Result, UsageError};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use path::{ancestor_path, AncestorPath};

/// A zero-based line/character position.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    /// Line number (0-based).
    pub line: u32,
    /// Character offset in the line (0-based).
    pub character: u32,
}

impl Position {
    /// Create a position.
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A source span, inclusive of both ends for containment purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    /// Start position.
    pub start: Position,
    /// End position.
    pub end: Position,
}

impl Range {
    /// Create a range from two positions.
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A range of `length` characters on a single line.
    pub const fn on_line(line: u32, character: u32, length: u32) -> Self {
        Self {
            start: Position::new(line, character),
            end: Position::new(line, character.saturating_add(length)),
        }
    }

    /// Whether `other` lies entirely within this range.
    pub fn contains(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Node kinds the classifier and its adapters recognize.
///
/// Spellings follow the clangd AST dump. Anything else is kept verbatim
/// in [`NodeKind::Other`] and is skipped over by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Reference to a named declaration.
    DeclRef,
    /// Member access `a.b` / `a->b`.
    Member,
    /// Free function call.
    Call,
    /// Member function call.
    MemberCall,
    /// Overloaded operator call; operand 0 is the callee.
    OperatorCall,
    /// Built-in binary operator.
    BinaryOperator,
    /// Built-in unary operator.
    UnaryOperator,
    /// Implicit conversion.
    ImplicitCast,
    /// Constructor invocation expression.
    Construct,
    /// `delete` expression.
    Delete,
    /// `new` expression.
    New,
    /// `switch` statement.
    Switch,
    /// `if` statement.
    If,
    /// Entry of a constructor's member-initializer list.
    MemberInitializer,
    /// Class, struct or union.
    Record,
    /// Variable declaration.
    Var,
    /// Function parameter declaration.
    ParmVar,
    /// Data member declaration.
    Field,
    /// Free function declaration.
    Function,
    /// Member function declaration.
    Method,
    /// Constructor declaration.
    Constructor,
    /// Destructor declaration.
    Destructor,
    /// Lambda expression.
    Lambda,
    /// Function template declaration.
    FunctionTemplate,
    /// Class template declaration.
    ClassTemplate,
    /// Partial specialization of a class template.
    ClassTemplatePartialSpecialization,
    /// `override` attribute.
    Override,
    /// `final` attribute.
    Final,
    /// `__attribute__((annotate(...)))`.
    Annotate,
    /// Any other node kind.
    Other(String),
}

impl NodeKind {
    /// Parse a clangd kind spelling.
    pub fn from_clangd(kind: &str) -> Self {
        match kind {
            "DeclRef" => NodeKind::DeclRef,
            "Member" => NodeKind::Member,
            "Call" => NodeKind::Call,
            "CXXMemberCall" => NodeKind::MemberCall,
            "CXXOperatorCall" => NodeKind::OperatorCall,
            "BinaryOperator" => NodeKind::BinaryOperator,
            "UnaryOperator" => NodeKind::UnaryOperator,
            "ImplicitCast" => NodeKind::ImplicitCast,
            "CXXConstruct" => NodeKind::Construct,
            "CXXDelete" => NodeKind::Delete,
            "CXXNew" => NodeKind::New,
            "Switch" => NodeKind::Switch,
            "If" => NodeKind::If,
            "MemberInitializer" => NodeKind::MemberInitializer,
            "Record" => NodeKind::Record,
            "Var" => NodeKind::Var,
            "ParmVar" => NodeKind::ParmVar,
            "Field" => NodeKind::Field,
            "Function" => NodeKind::Function,
            "CXXMethod" => NodeKind::Method,
            "CXXConstructor" => NodeKind::Constructor,
            "CXXDestructor" => NodeKind::Destructor,
            "Lambda" => NodeKind::Lambda,
            "FunctionTemplate" => NodeKind::FunctionTemplate,
            "ClassTemplate" => NodeKind::ClassTemplate,
            "ClassTemplatePartialSpecialization" => NodeKind::ClassTemplatePartialSpecialization,
            "Override" => NodeKind::Override,
            "Final" => NodeKind::Final,
            "Annotate" => NodeKind::Annotate,
            other => NodeKind::Other(other.to_string()),
        }
    }

    /// The clangd spelling of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::DeclRef => "DeclRef",
            NodeKind::Member => "Member",
            NodeKind::Call => "Call",
            NodeKind::MemberCall => "CXXMemberCall",
            NodeKind::OperatorCall => "CXXOperatorCall",
            NodeKind::BinaryOperator => "BinaryOperator",
            NodeKind::UnaryOperator => "UnaryOperator",
            NodeKind::ImplicitCast => "ImplicitCast",
            NodeKind::Construct => "CXXConstruct",
            NodeKind::Delete => "CXXDelete",
            NodeKind::New => "CXXNew",
            NodeKind::Switch => "Switch",
            NodeKind::If => "If",
            NodeKind::MemberInitializer => "MemberInitializer",
            NodeKind::Record => "Record",
            NodeKind::Var => "Var",
            NodeKind::ParmVar => "ParmVar",
            NodeKind::Field => "Field",
            NodeKind::Function => "Function",
            NodeKind::Method => "CXXMethod",
            NodeKind::Constructor => "CXXConstructor",
            NodeKind::Destructor => "CXXDestructor",
            NodeKind::Lambda => "Lambda",
            NodeKind::FunctionTemplate => "FunctionTemplate",
            NodeKind::ClassTemplate => "ClassTemplate",
            NodeKind::ClassTemplatePartialSpecialization => "ClassTemplatePartialSpecialization",
            NodeKind::Override => "Override",
            NodeKind::Final => "Final",
            NodeKind::Annotate => "Annotate",
            NodeKind::Other(kind) => kind,
        }
    }

    /// Declarations that own a function body.
    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            NodeKind::Function
                | NodeKind::Method
                | NodeKind::Constructor
                | NodeKind::Destructor
                | NodeKind::Lambda
        )
    }

    /// Template declarations that make everything inside them templated.
    pub fn is_template(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionTemplate
                | NodeKind::ClassTemplate
                | NodeKind::ClassTemplatePartialSpecialization
        )
    }
}

/// The syntactic role a node plays in its parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// A declaration.
    Declaration,
    /// A value-producing expression.
    Expression,
    /// A statement.
    Statement,
    /// A type spelling.
    Type,
    /// An attribute attached to a declaration.
    Attribute,
    /// An argument of a template specialization.
    TemplateArgument,
    /// A declaration specifier.
    Specifier,
    /// Any other role.
    Other(String),
}

impl Role {
    /// Parse a clangd role spelling.
    pub fn from_clangd(role: &str) -> Self {
        match role {
            "declaration" => Role::Declaration,
            "expression" => Role::Expression,
            "statement" => Role::Statement,
            "type" => Role::Type,
            "attribute" => Role::Attribute,
            "template argument" => Role::TemplateArgument,
            "specifier" => Role::Specifier,
            other => Role::Other(other.to_string()),
        }
    }

    /// The clangd spelling of this role.
    pub fn as_str(&self) -> &str {
        match self {
            Role::Declaration => "declaration",
            Role::Expression => "expression",
            Role::Statement => "statement",
            Role::Type => "type",
            Role::Attribute => "attribute",
            Role::TemplateArgument => "template argument",
            Role::Specifier => "specifier",
            Role::Other(role) => role,
        }
    }
}

/// Typed facts extracted from a node's descriptor and detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeFacts {
    /// Inside an unevaluated operand such as `decltype` or `sizeof`.
    pub unevaluated: bool,
    /// The expression is an lvalue.
    pub lvalue: bool,
    /// The referenced entity is a function.
    pub function_entity: bool,
    /// A variable declaration with a copy-initializer.
    pub has_initializer: bool,
    /// A reference to a member function bound to an object.
    pub bound_member_function: bool,
    /// A compound statement, i.e. a function body or block.
    pub compound_statement: bool,
    /// Carries a Qt meta-object marker (`qt_invokable`, `qt_signal`, ...).
    pub reflection_marker: bool,
    /// An implicit function-to-pointer decay.
    pub function_to_pointer_decay: bool,
}

impl NodeFacts {
    /// Derive the facts from a node's descriptor and detail.
    pub fn derive(descriptor: &str, detail: Option<&str>) -> Self {
        Self {
            unevaluated: descriptor.contains("non_odr_use_unevaluated")
                || descriptor.contains("non-odr-use-unevaluated"),
            lvalue: descriptor.contains("lvalue"),
            function_entity: descriptor.contains(" Function "),
            has_initializer: descriptor.contains("cinit"),
            bound_member_function: descriptor.contains("bound member function"),
            compound_statement: descriptor.contains("CompoundStmt"),
            reflection_marker: descriptor.contains("qt_")
                || detail.is_some_and(|d| d.contains("qt_")),
            function_to_pointer_decay: detail == Some("FunctionToPointerDecay"),
        }
    }
}

/// One node of the syntax tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNode", into = "RawNode")]
pub struct SyntaxNode {
    kind: NodeKind,
    role: Option<Role>,
    detail: Option<String>,
    descriptor: String,
    has_const_type: bool,
    range: Option<Range>,
    children: Option<Vec<SyntaxNode>>,
    facts: NodeFacts,
}

impl SyntaxNode {
    /// Create a node of the given kind with no role, detail or range.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            role: None,
            detail: None,
            descriptor: String::new(),
            has_const_type: false,
            range: None,
            children: None,
            facts: NodeFacts::default(),
        }
    }

    /// Set the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Set the detail label and refresh the derived facts.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self.facts = NodeFacts::derive(&self.descriptor, self.detail.as_deref());
        self
    }

    /// Set the descriptor, re-deriving the facts and the const-type flag.
    ///
    /// Call [`SyntaxNode::with_const_type`] afterwards to override the flag.
    pub fn with_descriptor(mut self, descriptor: impl Into<String>) -> Self {
        self.descriptor = descriptor.into();
        self.facts = NodeFacts::derive(&self.descriptor, self.detail.as_deref());
        self.has_const_type = descriptor_has_const_type(&self.descriptor);
        self
    }

    /// Override the const-qualification of the node's type.
    pub fn with_const_type(mut self, has_const_type: bool) -> Self {
        self.has_const_type = has_const_type;
        self
    }

    /// Set the source range.
    pub fn with_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }

    /// Set the children.
    pub fn with_children(mut self, children: Vec<SyntaxNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// The node kind.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// The role, if the front end reported one.
    pub fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    /// Whether the node has the given role.
    pub fn has_role(&self, role: &Role) -> bool {
        self.role.as_ref() == Some(role)
    }

    /// The detail label.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Whether the detail label is exactly `detail`.
    pub fn detail_is(&self, detail: &str) -> bool {
        self.detail.as_deref() == Some(detail)
    }

    /// The raw descriptor text.
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    /// Whether the node's static type is const-qualified.
    pub fn has_const_type(&self) -> bool {
        self.has_const_type
    }

    /// The source range, if any.
    pub fn range(&self) -> Option<&Range> {
        self.range.as_ref()
    }

    /// Whether this node's range contains `range`. Nodes without a range contain nothing.
    pub fn contains_range(&self, range: &Range) -> bool {
        self.range.as_ref().is_some_and(|r| r.contains(range))
    }

    /// The children, empty if the front end did not report any.
    pub fn children(&self) -> &[SyntaxNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Whether the child at `index` exists and contains `range`.
    pub fn child_contains_range(&self, index: usize, range: &Range) -> bool {
        self.children()
            .get(index)
            .is_some_and(|child| child.contains_range(range))
    }

    /// Facts derived from the descriptor and detail.
    pub fn facts(&self) -> &NodeFacts {
        &self.facts
    }

    /// Whether this is a declaration of something with a function body.
    pub fn is_function_declaration(&self) -> bool {
        self.has_role(&Role::Declaration)
            && (self.kind.is_function_like() || self.kind == NodeKind::FunctionTemplate)
    }

    /// The operator spelling of a binary operator or overloaded operator call.
    pub fn operator_spelling(&self) -> Option<&str> {
        match self.kind {
            NodeKind::BinaryOperator => self.detail.as_deref(),
            NodeKind::OperatorCall => self
                .detail
                .as_deref()
                .map(|d| d.strip_prefix("operator").unwrap_or(d).trim())
                .filter(|op| !op.is_empty())
                .or_else(|| last_quoted(&self.descriptor)),
            _ => None,
        }
    }
}

/// Read a syntax tree dumped as clangd AST JSON.
pub fn load_tree(path: &Path) -> Result<SyntaxNode> {
    let text = std::fs::read_to_string(path).map_err(|e| UsageError::io(path, e))?;
    serde_json::from_str(&text).map_err(|source| UsageError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Wire shape of a clangd AST node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    arcana: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    range: Option<Range>,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<Vec<SyntaxNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    has_const_type: Option<bool>,
}

impl From<RawNode> for SyntaxNode {
    fn from(raw: RawNode) -> Self {
        let descriptor = raw.arcana.unwrap_or_default();
        let facts = NodeFacts::derive(&descriptor, raw.detail.as_deref());
        let has_const_type = raw
            .has_const_type
            .unwrap_or_else(|| descriptor_has_const_type(&descriptor));
        SyntaxNode {
            kind: NodeKind::from_clangd(&raw.kind),
            role: raw.role.as_deref().map(Role::from_clangd),
            detail: raw.detail,
            descriptor,
            has_const_type,
            range: raw.range,
            children: raw.children,
            facts,
        }
    }
}

impl From<SyntaxNode> for RawNode {
    fn from(node: SyntaxNode) -> Self {
        RawNode {
            role: node.role.map(|r| r.as_str().to_string()),
            kind: node.kind.as_str().to_string(),
            detail: node.detail,
            arcana: (!node.descriptor.is_empty()).then_some(node.descriptor),
            range: node.range,
            children: node.children,
            has_const_type: Some(node.has_const_type),
        }
    }
}

/// Whether the first quoted type in a clang dump line is const-qualified.
fn descriptor_has_const_type(descriptor: &str) -> bool {
    first_quoted(descriptor).is_some_and(type_is_const_qualified)
}

/// Whether a C++ type spelling is const at its outermost level.
///
/// A trailing reference is looked through, so `const T &` counts as const,
/// while `const T *` does not (the pointer itself is mutable).
pub fn type_is_const_qualified(ty: &str) -> bool {
    let ty = ty.trim_end().trim_end_matches('&').trim_end();
    let outermost = match ty.rfind('*') {
        Some(idx) => &ty[idx + 1..],
        None => ty,
    };
    outermost.split_whitespace().any(|token| token == "const")
}

fn first_quoted(text: &str) -> Option<&str> {
    let start = text.find('\'')? + 1;
    let len = text[start..].find('\'')?;
    Some(&text[start..start + len])
}

fn last_quoted(text: &str) -> Option<&str> {
    let end = text.rfind('\'')?;
    let start = text[..end].rfind('\'')? + 1;
    Some(&text[start..end]).filter(|s| !s.is_empty())
}
