//! Target AST node types, plus the factory functions that stand in for the
//! "concrete target-AST builder library" the design treats as an external
//! collaborator (§6: "the exact factory names are not prescribed"). We still
//! need *something* implementing that surface for the crate to produce
//! output, so this module is a minimal, JSON-serializable builder: every
//! function here just wraps the matching [`TargetNode`] variant.

use serde::{Deserialize, Serialize};

pub type Name = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TargetLiteral {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TargetNode {
    Program {
        body: Vec<TargetNode>,
    },
    Identifier {
        name: Name,
    },
    Literal(TargetLiteral),
    ArrayExpression {
        elements: Vec<TargetNode>,
    },
    /// Preserves source order: maps in the source language are ordered.
    ObjectExpression {
        properties: Vec<(TargetNode, TargetNode)>,
    },
    CallExpression {
        callee: Box<TargetNode>,
        arguments: Vec<TargetNode>,
    },
    MemberExpression {
        object: Box<TargetNode>,
        property: Box<TargetNode>,
        computed: bool,
    },
    AssignmentExpression {
        left: Box<TargetNode>,
        right: Box<TargetNode>,
    },
    ArrowFunctionExpression {
        params: Vec<TargetNode>,
        body: Box<TargetNode>,
    },
    FunctionDeclaration {
        id: Name,
        params: Vec<TargetNode>,
        body: Box<TargetNode>,
    },
    VariableDeclaration {
        kind: VariableKind,
        name: Name,
        init: Option<Box<TargetNode>>,
    },
    BlockStatement {
        body: Vec<TargetNode>,
    },
    ReturnStatement {
        argument: Option<Box<TargetNode>>,
    },
    IfStatement {
        test: Box<TargetNode>,
        consequent: Box<TargetNode>,
        alternate: Option<Box<TargetNode>>,
    },
    ImportDeclaration {
        /// `None` is a bare/default import; `Some` entries are named
        /// bindings, one per imported identifier.
        specifiers: Vec<ImportSpecifier>,
        source: String,
    },
    ExportDeclaration {
        names: Vec<Name>,
    },
    /// A leading comment attached to the next declaration (`@doc`/`@moduledoc`).
    Comment {
        text: String,
        target: Box<TargetNode>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableKind {
    Const,
    Let,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSpecifier {
    pub imported: Name,
    pub local: Name,
}

pub fn identifier(name: impl Into<String>) -> TargetNode {
    TargetNode::Identifier { name: name.into() }
}

pub fn number_literal(n: f64) -> TargetNode {
    TargetNode::Literal(TargetLiteral::Number(n))
}

pub fn string_literal(s: impl Into<String>) -> TargetNode {
    TargetNode::Literal(TargetLiteral::Str(s.into()))
}

pub fn bool_literal(b: bool) -> TargetNode {
    TargetNode::Literal(TargetLiteral::Bool(b))
}

pub fn null_literal() -> TargetNode {
    TargetNode::Literal(TargetLiteral::Null)
}

pub fn array_expression(elements: Vec<TargetNode>) -> TargetNode {
    TargetNode::ArrayExpression { elements }
}

pub fn object_expression(properties: Vec<(TargetNode, TargetNode)>) -> TargetNode {
    TargetNode::ObjectExpression { properties }
}

pub fn call_expression(callee: TargetNode, arguments: Vec<TargetNode>) -> TargetNode {
    TargetNode::CallExpression {
        callee: Box::new(callee),
        arguments,
    }
}

pub fn member_expression(object: TargetNode, property: TargetNode, computed: bool) -> TargetNode {
    TargetNode::MemberExpression {
        object: Box::new(object),
        property: Box::new(property),
        computed,
    }
}

pub fn assignment_expression(left: TargetNode, right: TargetNode) -> TargetNode {
    TargetNode::AssignmentExpression {
        left: Box::new(left),
        right: Box::new(right),
    }
}

pub fn arrow_function(params: Vec<TargetNode>, body: TargetNode) -> TargetNode {
    TargetNode::ArrowFunctionExpression {
        params,
        body: Box::new(body),
    }
}

pub fn function_declaration(id: impl Into<String>, params: Vec<TargetNode>, body: TargetNode) -> TargetNode {
    TargetNode::FunctionDeclaration {
        id: id.into(),
        params,
        body: Box::new(body),
    }
}

pub fn variable_declaration(
    kind: VariableKind,
    name: impl Into<String>,
    init: Option<TargetNode>,
) -> TargetNode {
    TargetNode::VariableDeclaration {
        kind,
        name: name.into(),
        init: init.map(Box::new),
    }
}

pub fn block_statement(body: Vec<TargetNode>) -> TargetNode {
    TargetNode::BlockStatement { body }
}

pub fn return_statement(argument: Option<TargetNode>) -> TargetNode {
    TargetNode::ReturnStatement {
        argument: argument.map(Box::new),
    }
}

pub fn if_statement(test: TargetNode, consequent: TargetNode, alternate: Option<TargetNode>) -> TargetNode {
    TargetNode::IfStatement {
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: alternate.map(Box::new),
    }
}

pub fn import_declaration(specifiers: Vec<ImportSpecifier>, source: impl Into<String>) -> TargetNode {
    TargetNode::ImportDeclaration {
        specifiers,
        source: source.into(),
    }
}

pub fn export_declaration(names: Vec<Name>) -> TargetNode {
    TargetNode::ExportDeclaration { names }
}

pub fn program(body: Vec<TargetNode>) -> TargetNode {
    TargetNode::Program { body }
}

pub fn comment(text: impl Into<String>, target: TargetNode) -> TargetNode {
    TargetNode::Comment {
        text: text.into(),
        target: Box::new(target),
    }
}

