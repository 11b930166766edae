//! Declaration records produced by the [`parser`](super::parser).
//!
//! The records mirror the surface syntax one-to-one and carry no resolved
//! references. Names and literals keep their raw source text; string
//! literals keep their surrounding quotes.

use std::fmt;

use crate::span::{Span, Spanned};

/// A parsed metamodel document: a flat list of declarations in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metamodel {
    pub declarations: Vec<Declaration>,
}

impl Metamodel {
    pub fn enums(&self) -> impl Iterator<Item = &EnumDeclaration> {
        self.declarations.iter().filter_map(|decl| match decl {
            Declaration::Enum(decl) => Some(decl),
            Declaration::Class(_) => None,
        })
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDeclaration> {
        self.declarations.iter().filter_map(|decl| match decl {
            Declaration::Class(decl) => Some(decl),
            Declaration::Enum(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    Enum(EnumDeclaration),
    Class(ClassDeclaration),
}

/// A reference to a classifier, either bare (`Car`) or dotted (`fleet.Car`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Name {
    Identifier(Spanned<String>),
    Qualified(Spanned<String>),
}

impl Name {
    /// The name as written, used as the fully-qualified lookup key.
    pub fn as_str(&self) -> &str {
        match self {
            Name::Identifier(name) | Name::Qualified(name) => name.inner(),
        }
    }

    pub fn is_qualified(&self) -> bool {
        matches!(self, Name::Qualified(_))
    }

    pub fn span(&self) -> Span {
        match self {
            Name::Identifier(name) | Name::Qualified(name) => name.span(),
        }
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDeclaration {
    pub name: Name,
    pub literals: Vec<Spanned<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDeclaration {
    pub name: Name,
    pub parents: Vec<Name>,
    pub attributes: Vec<AttributeDecl>,
    pub relations: Vec<RelationDecl>,
}

/// The declared type of an attribute: a name with an optional `[]` suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeType {
    pub name: Name,
    pub array: bool,
}

impl AttributeType {
    /// The raw type text, including the `[]` suffix for arrays.
    pub fn raw_text(&self) -> String {
        if self.array {
            format!("{}[]", self.name)
        } else {
            self.name.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDecl {
    pub name: Spanned<String>,
    pub ty: AttributeType,
    pub annotations: Vec<Annotation>,
    pub semantics: Option<SemanticBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDecl {
    pub name: Spanned<String>,
    pub target: Name,
    pub annotations: Vec<Annotation>,
    pub semantics: Option<SemanticBlock>,
}

/// An `@name` marker in front of a member, stored without the `@`.
pub type Annotation = Spanned<String>;

/// A raw string literal, quotes included.
pub type StringLiteral = Spanned<String>;

/// The `{ ... }` block of `from`, `using` and `with` clauses after a member.
///
/// Clauses of each kind keep their relative source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SemanticBlock {
    pub from: Vec<StringLiteral>,
    pub using: Vec<StringLiteral>,
    pub with: Vec<WithClause>,
}

/// `with name = value`; the value may be omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithClause {
    pub name: Spanned<String>,
    pub value: Option<Literal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Numeric text exactly as written.
    Number(Spanned<String>),
    /// String text with its quotes.
    String(StringLiteral),
}
