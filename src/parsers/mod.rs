//! Python source parsing
//!
//! Parses one file's text into a [`SyntaxTree`]: a small, closed set of node
//! kinds that the detectors and metrics match on exhaustively. Everything the
//! quality rules don't care about is flattened into its parent node.

mod lines;
pub mod python;

pub use lines::{normalize_newlines, physical_lines, PhysicalLines};

use crate::models::{Issue, IssueKind, Severity};
use std::path::Path;
use thiserror::Error;

/// Why a file could not be turned into a syntax tree.
///
/// Always per-file and non-fatal: the file gets exactly one issue and zero
/// metrics, and the run continues.
#[derive(Error, Debug)]
pub enum ParseFailure {
    #[error("Syntax error: {message}")]
    Syntax { line: u32, message: String },

    #[error("Failed to parse file: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("Failed to parse file: {0}")]
    Io(#[from] std::io::Error),
}

impl ParseFailure {
    /// The single error issue recorded for the file
    pub fn into_issue(self, path: &Path) -> Issue {
        match self {
            ParseFailure::Syntax { line, message } => Issue::new(
                path,
                line,
                IssueKind::SyntaxError,
                Severity::Error,
                format!("Syntax error: {message}"),
            )
            .with_suggestion("Fix the syntax error to make the code valid Python"),
            other => Issue::new(
                path,
                0,
                IssueKind::ParsingError,
                Severity::Error,
                other.to_string(),
            )
            .with_suggestion("Check file encoding and content"),
        }
    }
}

/// Decode raw file content, dropping a leading byte-order mark
pub fn decode_source(bytes: &[u8]) -> Result<&str, ParseFailure> {
    let text = std::str::from_utf8(bytes)?;
    Ok(text.strip_prefix('\u{feff}').unwrap_or(text))
}

/// Parsed module: top-level nodes plus the physical line count
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    pub body: Vec<Node>,
    pub line_count: u32,
}

/// Loop flavours counted by complexity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopKind {
    For,
    AsyncFor,
    While,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub line: u32,
    pub is_async: bool,
    pub body: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub name: String,
    pub line: u32,
    pub body: Vec<Node>,
}

/// A branch (`if`/`elif`) or an `except` clause
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub line: u32,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoopBlock {
    pub kind: LoopKind,
    pub line: u32,
    pub children: Vec<Node>,
}

/// `a and b and c`: `operands` is 3
#[derive(Debug, Clone, PartialEq)]
pub struct BoolChain {
    pub line: u32,
    pub operands: usize,
    pub children: Vec<Node>,
}

/// A name being assigned to (assignment targets, loop targets, walrus...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub line: u32,
}

/// Closed set of structural node kinds
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Function(FunctionDef),
    Class(ClassDef),
    Branch(Block),
    Loop(LoopBlock),
    Handler(Block),
    BoolOp(BoolChain),
    Binding(Binding),
}

impl Node {
    pub fn line(&self) -> u32 {
        match self {
            Node::Function(f) => f.line,
            Node::Class(c) => c.line,
            Node::Branch(b) | Node::Handler(b) => b.line,
            Node::Loop(l) => l.line,
            Node::BoolOp(b) => b.line,
            Node::Binding(b) => b.line,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Function(f) => &f.body,
            Node::Class(c) => &c.body,
            Node::Branch(b) | Node::Handler(b) => &b.children,
            Node::Loop(l) => &l.children,
            Node::BoolOp(b) => &b.children,
            Node::Binding(_) => &[],
        }
    }
}

impl SyntaxTree {
    /// Pre-order traversal of every node, nested definitions included
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(&self.body)
    }

    /// Every function definition anywhere in the tree
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDef> {
        self.walk().filter_map(|node| match node {
            Node::Function(f) => Some(f),
            _ => None,
        })
    }

    /// Every class definition anywhere in the tree
    pub fn classes(&self) -> impl Iterator<Item = &ClassDef> {
        self.walk().filter_map(|node| match node {
            Node::Class(c) => Some(c),
            _ => None,
        })
    }
}

/// Stack-based pre-order iterator (no recursion, so deep trees are fine)
pub struct Walk<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Walk<'a> {
    pub fn new(nodes: &'a [Node]) -> Self {
        Self {
            stack: nodes.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}
