//! Processing service: rule group management plus convert and extract
//!
//! Copyright (c) 2025 Docmorph Team
//! Licensed under the Apache-2.0 license

use crate::error::{Result, ServiceError};
use crate::store::{MemoryRuleGroupStore, RuleGroupStore};
use docmorph_converters::{default_converters, detect_mime_type};
use docmorph_core::{Converter, Extractor, JsonPathExtractor, RuleGroup, StructuredData};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// Per-call overrides for [`DataProcessingService::extract`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractOptions {
    /// Skip MIME detection and use this type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Use this extractor instead of the default one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extractor: Option<String>,
}

impl ExtractOptions {
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_extractor(mut self, extractor: impl Into<String>) -> Self {
        self.extractor = Some(extractor.into());
        self
    }
}

/// Converts raw input and extracts data from it using stored rule groups
///
/// Collaborators are injected through [`ServiceBuilder`]: the rule group
/// store, the converters tried in registration order, and the extractors.
pub struct DataProcessingService {
    store: Box<dyn RuleGroupStore>,
    converters: Vec<Box<dyn Converter>>,
    extractors: Vec<Box<dyn Extractor>>,
    default_extractor: usize,
}

impl std::fmt::Debug for DataProcessingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataProcessingService")
            .field(
                "converters",
                &self.converters.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field(
                "extractors",
                &self.extractors.iter().map(|e| e.name()).collect::<Vec<_>>(),
            )
            .field("default_extractor", &self.default_extractor().name())
            .finish()
    }
}

impl DataProcessingService {
    /// Start building a service
    pub fn builder() -> ServiceBuilder {
        ServiceBuilder::new()
    }

    /// A service with an in-memory store, the bundled converters and the
    /// JSONPath extractor
    pub fn with_defaults() -> Self {
        Self {
            store: Box::new(MemoryRuleGroupStore::new()),
            converters: default_converters(),
            extractors: vec![Box::new(JsonPathExtractor::new())],
            default_extractor: 0,
        }
    }

    /// Store a rule group, replacing any group with the same id
    pub fn rule_group_set(&self, group: RuleGroup) -> Result<()> {
        validate_rule_group(&group)?;
        info!(id = %group.id, rules = group.rules.len(), "Storing rule group");
        self.store.set(group)
    }

    /// Fetch a stored rule group
    pub fn rule_group_get(&self, id: &str) -> Result<RuleGroup> {
        require_id(id)?;
        self.store
            .get(id)?
            .ok_or_else(|| ServiceError::rule_group_not_found(id))
    }

    /// Remove a stored rule group
    pub fn rule_group_remove(&self, id: &str) -> Result<()> {
        require_id(id)?;
        match self.store.remove(id)? {
            Some(_) => {
                info!(id, "Removed rule group");
                Ok(())
            }
            None => Err(ServiceError::rule_group_not_found(id)),
        }
    }

    /// All stored rule groups
    pub fn rule_group_list(&self) -> Result<Vec<RuleGroup>> {
        self.store.list()
    }

    /// Convert raw bytes into a document
    ///
    /// The MIME type is detected from the content unless `mime_type` is given.
    pub fn convert(&self, data: &[u8], mime_type: Option<&str>) -> Result<StructuredData> {
        let mime_type = match mime_type {
            Some(mime) if !mime.trim().is_empty() => mime.trim().to_string(),
            _ => detect_mime_type(data)
                .ok_or(ServiceError::MimeTypeNotFound)?
                .to_string(),
        };

        let converter = self
            .converters
            .iter()
            .find(|c| c.supports(&mime_type))
            .ok_or_else(|| ServiceError::converter_not_found(&mime_type))?;

        debug!(converter = converter.name(), mime_type = %mime_type, bytes = data.len(), "Converting input");
        let object = converter.convert(data)?;
        Ok(StructuredData::new(mime_type, object))
    }

    /// Convert raw bytes and extract data using a stored rule group
    ///
    /// Coerced values that JSON cannot represent natively come back as
    /// `{"@ext": type, "value": repr}` envelopes.
    pub fn extract(&self, rule_group_id: &str, data: &[u8], options: &ExtractOptions) -> Result<Value> {
        let group = self.rule_group_get(rule_group_id)?;
        let converted = self.convert(data, options.mime_type.as_deref())?;

        let extractor = match options.extractor.as_deref() {
            Some(name) => self.find_extractor(name)?,
            None => self.default_extractor(),
        };

        debug!(
            rule_group = %group.id,
            extractor = extractor.name(),
            rules = group.rules.len(),
            "Extracting"
        );
        let extracted = extractor.extract(&converted, &group.rules)?;
        Ok(extracted.object)
    }

    /// Names of the registered extractors, default first
    pub fn extractor_names(&self) -> Vec<&str> {
        let default = self.default_extractor().name();
        std::iter::once(default)
            .chain(
                self.extractors
                    .iter()
                    .map(|e| e.name())
                    .filter(|name| *name != default),
            )
            .collect()
    }

    fn default_extractor(&self) -> &dyn Extractor {
        self.extractors[self.default_extractor].as_ref()
    }

    fn find_extractor(&self, name: &str) -> Result<&dyn Extractor> {
        self.extractors
            .iter()
            .find(|e| e.name().eq_ignore_ascii_case(name))
            .map(|e| e.as_ref())
            .ok_or_else(|| ServiceError::extractor_not_found(name))
    }
}

fn require_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(ServiceError::validation("id", "must not be empty"));
    }
    Ok(())
}

fn validate_rule_group(group: &RuleGroup) -> Result<()> {
    require_id(&group.id)?;
    if group.label.trim().is_empty() {
        return Err(ServiceError::validation("label", "must not be empty"));
    }

    for (index, rule) in group.rules.iter().enumerate() {
        if rule.source.trim().is_empty() {
            return Err(ServiceError::validation(
                format!("rules[{}].source", index),
                "must not be empty",
            ));
        }
        if rule.target.trim().is_empty() {
            return Err(ServiceError::validation(
                format!("rules[{}].target", index),
                "must not be empty",
            ));
        }
    }
    Ok(())
}

/// Builder for [`DataProcessingService`]
#[derive(Default)]
pub struct ServiceBuilder {
    store: Option<Box<dyn RuleGroupStore>>,
    converters: Vec<Box<dyn Converter>>,
    extractors: Vec<Box<dyn Extractor>>,
    default_extractor: Option<String>,
}

impl ServiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this rule group store; defaults to [`MemoryRuleGroupStore`]
    pub fn store(mut self, store: impl RuleGroupStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Register a converter, tried after those registered before it
    pub fn converter(mut self, converter: impl Converter + 'static) -> Self {
        self.converters.push(Box::new(converter));
        self
    }

    /// Register several converters at once
    pub fn converters(mut self, converters: impl IntoIterator<Item = Box<dyn Converter>>) -> Self {
        self.converters.extend(converters);
        self
    }

    /// Register an extractor
    pub fn extractor(mut self, extractor: impl Extractor + 'static) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Name of the extractor used when a call does not choose one;
    /// defaults to the first registered extractor
    pub fn default_extractor(mut self, name: impl Into<String>) -> Self {
        self.default_extractor = Some(name.into());
        self
    }

    pub fn build(self) -> Result<DataProcessingService> {
        if self.extractors.is_empty() {
            return Err(ServiceError::NoExtractorRegistered);
        }

        let default_extractor = match &self.default_extractor {
            Some(name) => self
                .extractors
                .iter()
                .position(|e| e.name().eq_ignore_ascii_case(name))
                .ok_or_else(|| ServiceError::extractor_not_found(name))?,
            None => 0,
        };

        Ok(DataProcessingService {
            store: self
                .store
                .unwrap_or_else(|| Box::new(MemoryRuleGroupStore::new())),
            converters: self.converters,
            extractors: self.extractors,
            default_extractor,
        })
    }
}
