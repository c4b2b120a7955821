//! Selector implementations for query traversal
//!
//! Each selector maps the current node list to the next one, carrying the
//! location of every selected node so results can be traced back to their
//! position in the document.
//!
//! Copyright (c) 2025 Docmorph Team
//! Licensed under the Apache-2.0 license

use super::ast::{self, ArrayIndex, Selector};
use crate::types::MatchedNode;
use serde_json::Value;

/// Ordered list of nodes produced by a selector
pub type NodeList<'a> = Vec<MatchedNode<'a>>;

/// Trait for selector execution
pub trait SelectorExecutor {
    /// Execute this selector on the given input nodes
    fn execute<'a>(&self, inputs: NodeList<'a>) -> NodeList<'a>;
}

/// Root selector implementation
pub struct RootSelector;

impl SelectorExecutor for RootSelector {
    fn execute<'a>(&self, inputs: NodeList<'a>) -> NodeList<'a> {
        inputs
    }
}

/// Member name selector implementation
pub struct PropertySelector {
    pub key: String,
}

impl PropertySelector {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn select_into<'a>(&self, node: &MatchedNode<'a>, results: &mut NodeList<'a>) {
        if let Some((key, child)) = node
            .value
            .as_object()
            .and_then(|obj| obj.get_key_value(self.key.as_str()))
        {
            results.push(node.member(key, child));
        }
    }
}

impl SelectorExecutor for PropertySelector {
    fn execute<'a>(&self, inputs: NodeList<'a>) -> NodeList<'a> {
        let mut results = Vec::with_capacity(inputs.len());
        for node in &inputs {
            self.select_into(node, &mut results);
        }
        results
    }
}

/// Array index selector implementation
pub struct IndexSelector {
    pub index: ArrayIndex,
}

impl IndexSelector {
    pub fn new(index: ArrayIndex) -> Self {
        Self { index }
    }

    fn select_into<'a>(&self, node: &MatchedNode<'a>, results: &mut NodeList<'a>) {
        if let Some(array) = node.value.as_array() {
            if let Some(position) = self.index.resolve(array.len()) {
                results.push(node.element(position, &array[position]));
            }
        }
    }
}

impl SelectorExecutor for IndexSelector {
    fn execute<'a>(&self, inputs: NodeList<'a>) -> NodeList<'a> {
        let mut results = Vec::with_capacity(inputs.len());
        for node in &inputs {
            self.select_into(node, &mut results);
        }
        results
    }
}

/// Array slice selector implementation
pub struct SliceSelector {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub step: i64,
}

impl SliceSelector {
    pub fn new(start: Option<i64>, end: Option<i64>, step: Option<i64>) -> Self {
        Self {
            start,
            end,
            step: step.unwrap_or(1),
        }
    }

    /// Positions selected from an array of the given length, in selection order
    pub fn positions(&self, length: usize) -> Vec<usize> {
        let len = length as i64;
        let normalize = |i: i64| if i >= 0 { i } else { len + i };
        let mut positions = Vec::new();

        if self.step > 0 {
            let lower = normalize(self.start.unwrap_or(0)).clamp(0, len);
            let upper = normalize(self.end.unwrap_or(len)).clamp(0, len);
            let mut i = lower;
            while i < upper {
                positions.push(i as usize);
                match i.checked_add(self.step) {
                    Some(next) => i = next,
                    None => break,
                }
            }
        } else if self.step < 0 {
            let upper = self
                .start
                .map(normalize)
                .unwrap_or(len - 1)
                .clamp(-1, len - 1);
            let lower = self.end.map(normalize).unwrap_or(-1).clamp(-1, len - 1);
            let mut i = upper;
            while lower < i {
                positions.push(i as usize);
                match i.checked_add(self.step) {
                    Some(next) => i = next,
                    None => break,
                }
            }
        }

        positions
    }

    fn select_into<'a>(&self, node: &MatchedNode<'a>, results: &mut NodeList<'a>) {
        if let Some(array) = node.value.as_array() {
            for position in self.positions(array.len()) {
                results.push(node.element(position, &array[position]));
            }
        }
    }
}

impl SelectorExecutor for SliceSelector {
    fn execute<'a>(&self, inputs: NodeList<'a>) -> NodeList<'a> {
        let mut results = Vec::new();
        for node in &inputs {
            self.select_into(node, &mut results);
        }
        results
    }
}

/// Wildcard selector implementation
pub struct WildcardSelector;

impl WildcardSelector {
    fn select_into<'a>(node: &MatchedNode<'a>, results: &mut NodeList<'a>) {
        match node.value {
            Value::Object(obj) => {
                for (key, child) in obj {
                    results.push(node.member(key, child));
                }
            }
            Value::Array(arr) => {
                for (position, child) in arr.iter().enumerate() {
                    results.push(node.element(position, child));
                }
            }
            _ => {}
        }
    }
}

impl SelectorExecutor for WildcardSelector {
    fn execute<'a>(&self, inputs: NodeList<'a>) -> NodeList<'a> {
        let mut results = Vec::new();
        for node in &inputs {
            Self::select_into(node, &mut results);
        }
        results
    }
}

/// Recursive descent selector implementation
///
/// Produces each input node followed by all of its descendants in document
/// order. The selector that follows `..` is then applied to every one of them.
pub struct RecursiveDescentSelector;

impl RecursiveDescentSelector {
    fn collect_recursive<'a>(node: MatchedNode<'a>, results: &mut NodeList<'a>) {
        let mut children = Vec::new();
        WildcardSelector::select_into(&node, &mut children);
        results.push(node);

        for child in children {
            Self::collect_recursive(child, results);
        }
    }
}

impl SelectorExecutor for RecursiveDescentSelector {
    fn execute<'a>(&self, inputs: NodeList<'a>) -> NodeList<'a> {
        let mut results = Vec::new();
        for node in inputs {
            Self::collect_recursive(node, &mut results);
        }
        results
    }
}

/// Union selector implementation
///
/// Applies every member selector to each input node in turn, keeping
/// duplicates.
pub struct UnionSelector {
    pub selectors: Vec<Box<dyn SelectorExecutor>>,
}

impl UnionSelector {
    pub fn new(selectors: Vec<Box<dyn SelectorExecutor>>) -> Self {
        Self { selectors }
    }
}

impl SelectorExecutor for UnionSelector {
    fn execute<'a>(&self, inputs: NodeList<'a>) -> NodeList<'a> {
        let mut results = Vec::new();
        for node in inputs {
            for selector in &self.selectors {
                results.extend(selector.execute(vec![node.clone()]));
            }
        }
        results
    }
}

/// Create a selector executor from an AST selector
pub fn create_selector_executor(selector: &Selector) -> Box<dyn SelectorExecutor> {
    match selector {
        Selector::Root => Box::new(RootSelector),
        Selector::Child(child) => Box::new(PropertySelector::new(child.name())),
        Selector::Index(ast::IndexSelector { index }) => Box::new(IndexSelector::new(*index)),
        Selector::Slice(slice) => Box::new(SliceSelector::new(slice.start, slice.end, slice.step)),
        Selector::Wildcard => Box::new(WildcardSelector),
        Selector::RecursiveDescent => Box::new(RecursiveDescentSelector),
        Selector::Union(union) => Box::new(UnionSelector::new(
            union.selectors.iter().map(create_selector_executor).collect(),
        )),
    }
}
