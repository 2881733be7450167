//! Cyclomatic complexity
//!
//! Base 1, plus one per `if`/`elif`, loop (`for`, `async for`, `while`) and
//! `except` clause, plus `operands - 1` per boolean chain. Nested function
//! and class definitions are not descended into; they are scored on their own.

use crate::parsers::{ClassDef, FunctionDef, Node};

/// Complexity of one function or method
pub fn function_complexity(function: &FunctionDef) -> u32 {
    1 + nodes_complexity(&function.body)
}

/// Sum of [`function_complexity`] over methods defined directly in the class.
///
/// A class with no methods scores 0.
pub fn class_complexity(class: &ClassDef) -> u32 {
    class
        .body
        .iter()
        .map(|node| match node {
            Node::Function(method) => function_complexity(method),
            _ => 0,
        })
        .sum()
}

fn nodes_complexity(nodes: &[Node]) -> u32 {
    let mut total = 0u32;
    let mut stack: Vec<&Node> = nodes.iter().collect();

    while let Some(node) = stack.pop() {
        let increment = match node {
            // scored independently
            Node::Function(_) | Node::Class(_) => continue,
            Node::Branch(_) | Node::Loop(_) | Node::Handler(_) => 1,
            Node::BoolOp(chain) => chain.operands.saturating_sub(1) as u32,
            Node::Binding(_) => 0,
        };
        total = total.saturating_add(increment);
        stack.extend(node.children());
    }

    total
}
