//! Abstract syntax tree definitions for query expressions
//!
//! Copyright (c) 2025 Docmorph Team
//! Licensed under the Apache-2.0 license

use std::fmt;

/// A parsed query expression represented as an AST
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    /// The root selector (always Root)
    pub root: Selector,
    /// Chain of subsequent selectors
    pub selectors: Vec<Selector>,
}

/// Individual selector in a query expression
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Root selector ($)
    Root,
    /// Child member selector (.name or ['name'])
    Child(ChildSelector),
    /// Array index selector ([index])
    Index(IndexSelector),
    /// Array slice selector ([start:end:step])
    Slice(SliceSelector),
    /// Wildcard selector (* or [*])
    Wildcard,
    /// Recursive descent (..), visiting the node and all its descendants
    RecursiveDescent,
    /// Union selector ([a, b, ...])
    Union(UnionSelector),
}

/// Member selection by name
#[derive(Debug, Clone, PartialEq)]
pub enum ChildSelector {
    /// Shorthand member name (.name)
    Property(String),
    /// Quoted member name (['name'] or ["name"])
    QuotedProperty(String),
}

impl ChildSelector {
    pub fn name(&self) -> &str {
        match self {
            ChildSelector::Property(name) | ChildSelector::QuotedProperty(name) => name,
        }
    }
}

/// Array index selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSelector {
    pub index: ArrayIndex,
}

/// Array index, counted from the front or from the back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayIndex {
    /// Zero based position from the start
    Positive(usize),
    /// Position from the end, where 1 is the last element
    Negative(usize),
}

impl ArrayIndex {
    /// Resolve against an array of the given length
    pub fn resolve(&self, length: usize) -> Option<usize> {
        match *self {
            ArrayIndex::Positive(index) if index < length => Some(index),
            ArrayIndex::Negative(offset) if offset > 0 && offset <= length => Some(length - offset),
            _ => None,
        }
    }
}

/// Array slice selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceSelector {
    pub start: Option<i64>,
    pub end: Option<i64>,
    pub step: Option<i64>,
}

/// Union of several selectors inside one bracket
#[derive(Debug, Clone, PartialEq)]
pub struct UnionSelector {
    pub selectors: Vec<Selector>,
}

impl Expression {
    /// Create a new expression
    pub fn new(root: Selector, selectors: Vec<Selector>) -> Self {
        Self { root, selectors }
    }

    /// Whether the expression can select at most one node
    pub fn is_singular(&self) -> bool {
        self.selectors
            .iter()
            .all(|s| matches!(s, Selector::Child(_) | Selector::Index(_)))
    }

    /// Check if expression contains wildcards or recursive descent
    pub fn has_wildcards(&self) -> bool {
        self.selectors.iter().any(|s| s.has_wildcards())
    }
}

impl Selector {
    fn has_wildcards(&self) -> bool {
        match self {
            Selector::Wildcard | Selector::RecursiveDescent => true,
            Selector::Union(union) => union.selectors.iter().any(|s| s.has_wildcards()),
            _ => false,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        let mut after_descent = false;
        for selector in &self.selectors {
            match selector {
                Selector::Child(ChildSelector::Property(name)) if after_descent => {
                    write!(f, "{}", name)?
                }
                Selector::Wildcard if after_descent => write!(f, "*")?,
                _ => write!(f, "{}", selector)?,
            }
            after_descent = matches!(selector, Selector::RecursiveDescent);
        }
        Ok(())
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Root => write!(f, "$"),
            Selector::Child(child) => write!(f, "{}", child),
            Selector::Index(index) => write!(f, "{}", index),
            Selector::Slice(slice) => write!(f, "{}", slice),
            Selector::Wildcard => write!(f, ".*"),
            Selector::RecursiveDescent => write!(f, ".."),
            Selector::Union(union) => write!(f, "{}", union),
        }
    }
}

impl fmt::Display for ChildSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildSelector::Property(name) => write!(f, ".{}", name),
            ChildSelector::QuotedProperty(name) => write!(f, "['{}']", escape_quoted(name)),
        }
    }
}

impl fmt::Display for IndexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.index)
    }
}

impl fmt::Display for ArrayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayIndex::Positive(index) => write!(f, "{}", index),
            ArrayIndex::Negative(offset) => write!(f, "-{}", offset),
        }
    }
}

impl fmt::Display for SliceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        if let Some(start) = self.start {
            write!(f, "{}", start)?;
        }
        write!(f, ":")?;
        if let Some(end) = self.end {
            write!(f, "{}", end)?;
        }
        if let Some(step) = self.step {
            write!(f, ":{}", step)?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for UnionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .selectors
            .iter()
            .map(|selector| match selector {
                Selector::Child(child) => format!("'{}'", escape_quoted(child.name())),
                Selector::Index(index) => index.index.to_string(),
                Selector::Slice(slice) => {
                    let rendered = slice.to_string();
                    rendered[1..rendered.len() - 1].to_string()
                }
                Selector::Wildcard => "*".to_string(),
                other => other.to_string(),
            })
            .collect();
        write!(f, "[{}]", parts.join(","))
    }
}

fn escape_quoted(name: &str) -> String {
    name.replace('\\', "\\\\").replace('\'', "\\'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_display() {
        let expr = Expression::new(
            Selector::Root,
            vec![
                Selector::Child(ChildSelector::Property("store".to_string())),
                Selector::Child(ChildSelector::QuotedProperty("book list".to_string())),
                Selector::Index(IndexSelector { index: ArrayIndex::Negative(1) }),
                Selector::RecursiveDescent,
                Selector::Child(ChildSelector::Property("price".to_string())),
            ],
        );

        assert_eq!(expr.to_string(), "$.store['book list'][-1]..price");
    }

    #[test]
    fn test_union_display() {
        let union = UnionSelector {
            selectors: vec![
                Selector::Child(ChildSelector::QuotedProperty("a".to_string())),
                Selector::Index(IndexSelector { index: ArrayIndex::Positive(2) }),
                Selector::Slice(SliceSelector { start: Some(1), end: None, step: Some(2) }),
            ],
        };
        assert_eq!(union.to_string(), "['a',2,1::2]");
    }

    #[test]
    fn test_array_index_resolve() {
        assert_eq!(ArrayIndex::Positive(1).resolve(3), Some(1));
        assert_eq!(ArrayIndex::Positive(3).resolve(3), None);
        assert_eq!(ArrayIndex::Negative(1).resolve(3), Some(2));
        assert_eq!(ArrayIndex::Negative(4).resolve(3), None);
    }

    #[test]
    fn test_singular_detection() {
        let singular = Expression::new(
            Selector::Root,
            vec![
                Selector::Child(ChildSelector::Property("users".to_string())),
                Selector::Index(IndexSelector { index: ArrayIndex::Positive(0) }),
            ],
        );
        assert!(singular.is_singular());
        assert!(!singular.has_wildcards());

        let plural = Expression::new(Selector::Root, vec![Selector::RecursiveDescent, Selector::Wildcard]);
        assert!(!plural.is_singular());
        assert!(plural.has_wildcards());
    }
}
