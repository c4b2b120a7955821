//! Docmorph Service - rule group management and input processing
//!
//! [`DataProcessingService`] keeps rule groups in a [`RuleGroupStore`],
//! converts raw bytes with the registered converters and runs an extractor
//! over the result.
//!
//! ```
//! use docmorph_core::{Rule, RuleGroup};
//! use docmorph_service::{DataProcessingService, ExtractOptions};
//!
//! let service = DataProcessingService::with_defaults();
//! service
//!     .rule_group_set(RuleGroup::new("names", "Names", vec![Rule::new("$.name", "who")]))
//!     .unwrap();
//!
//! let out = service
//!     .extract("names", br#"{"name": "Ada"}"#, &ExtractOptions::default())
//!     .unwrap();
//! assert_eq!(out, serde_json::json!({"who": "Ada"}));
//! ```

pub mod error;
pub mod service;
pub mod store;

pub use error::{Result, ServiceError};
pub use service::{DataProcessingService, ExtractOptions, ServiceBuilder};
pub use store::{MemoryRuleGroupStore, RuleGroupStore};
