//! Query expression executor
//!
//! Copyright (c) 2025 Docmorph Team
//! Licensed under the Apache-2.0 license

use super::ast::Expression;
use super::selector::{create_selector_executor, NodeList};
use crate::types::MatchedNode;
use serde_json::Value;

/// Query expression executor
#[derive(Debug, Clone, Default)]
pub struct Executor {
    context: ExecutionContext,
}

/// Execution context for controlling execution behavior
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    /// Maximum number of results to return (0 = unlimited)
    pub max_results: usize,
}

impl Executor {
    /// Create a new executor with default context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new executor with custom context
    pub fn with_context(context: ExecutionContext) -> Self {
        Self { context }
    }

    /// Execute a parsed expression against data
    ///
    /// Selecting into a value of the wrong kind yields no nodes rather than
    /// an error, so evaluation itself cannot fail.
    pub fn execute<'a>(&self, expression: &Expression, data: &'a Value) -> NodeList<'a> {
        let mut current = vec![MatchedNode::root(data)];

        for selector in &expression.selectors {
            if current.is_empty() {
                break;
            }
            current = create_selector_executor(selector).execute(current);
        }

        let max = self.context.max_results;
        if max > 0 && current.len() > max {
            log::debug!(
                "Query {} produced {} nodes, truncating to {}",
                expression,
                current.len(),
                max
            );
            current.truncate(max);
        }

        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::parser::Parser;
    use serde_json::json;

    fn run<'a>(path: &str, data: &'a Value) -> NodeList<'a> {
        let expression = Parser::new(path).unwrap().parse().unwrap();
        Executor::new().execute(&expression, data)
    }

    #[test]
    fn test_executor_simple_property() {
        let data = json!({"name": "John", "age": 30});
        let results = run("$.name", &data);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].value, &json!("John"));
        assert_eq!(results[0].normalized_path(), "$['name']");
    }

    #[test]
    fn test_executor_root() {
        let data = json!({"a": 1});
        let results = run("$", &data);
        assert_eq!(results.len(), 1);
        assert!(results[0].location.is_empty());
    }

    #[test]
    fn test_executor_wildcard_chain() {
        let data = json!({"a": {"b": {"sub": {"val": 0}}, "c": {"sub": {"val": 1}}}});
        let results = run("$.a.*.sub.*", &data);

        let paths: Vec<String> = results.iter().map(|n| n.normalized_path()).collect();
        assert_eq!(
            paths,
            vec!["$['a']['b']['sub']['val']", "$['a']['c']['sub']['val']"]
        );
    }

    #[test]
    fn test_executor_recursive_descent() {
        let data = json!({
            "store": {
                "book": [{"author": "A"}, {"author": "B"}],
                "author": "C"
            }
        });
        let results = run("$..author", &data);
        let values: Vec<&Value> = results.iter().map(|n| n.value).collect();
        assert_eq!(values, vec![&json!("C"), &json!("A"), &json!("B")]);
    }

    #[test]
    fn test_executor_missing_path() {
        let data = json!({"a": 5});
        assert!(run("$.a.b.c", &data).is_empty());
        assert!(run("$.a[0]", &data).is_empty());
        assert!(run("$.missing", &data).is_empty());
    }

    #[test]
    fn test_execution_context_limits() {
        let data = json!([1, 2, 3, 4]);
        let expression = Parser::new("$[*]").unwrap().parse().unwrap();
        let executor = Executor::with_context(ExecutionContext { max_results: 2 });

        let results = executor.execute(&expression, &data);
        assert_eq!(results.len(), 2);
    }
}
