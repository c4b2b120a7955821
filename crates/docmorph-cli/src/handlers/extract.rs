//! Extract command handler

use super::build_service;
use super::utils::{find_rule_file, load_rule_groups, read_input, save_document};
use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use docmorph_core::RuleGroup;
use docmorph_service::ExtractOptions;
use tracing::{debug, info, instrument};

/// Handle the extract command
#[instrument(skip(config, output), fields(input = %args.input.display()))]
pub fn handle_extract(args: ExtractArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let _timer = Timer::with_details("extract_command", &format!("input: {}", args.input.display()));

    let groups = load_groups(&args, config)?;
    let group_id = select_group(&groups, args.group.as_deref())?;
    debug!(group = %group_id, available = groups.len(), "Selected rule group");

    let service = build_service(config)?;
    for group in groups {
        service.rule_group_set(group)?;
    }

    let data = read_input(&args.input)?;
    let options = ExtractOptions {
        mime_type: args.mime.clone(),
        extractor: args.extractor.clone(),
    };

    let document = {
        let _extract_timer = Timer::new("extraction");
        service.extract(&group_id, &data, &options)?
    };
    info!(group = %group_id, "Extraction completed");

    if let Some(path) = &args.save_to {
        save_document(path, &document, config.output.pretty)?;
        output.success(&format!("Saved extracted document to {}", path.display()))?;
    }

    output.document(&document)
}

/// Rule groups named by `--rules`, or the group file from the rules directory
fn load_groups(args: &ExtractArgs, config: &Config) -> Result<Vec<RuleGroup>> {
    match (&args.rules, &args.group) {
        (Some(path), _) => load_rule_groups(path),
        (None, Some(group)) => {
            let path = find_rule_file(group, config)?;
            load_rule_groups(&path)
        }
        (None, None) => Err(Error::invalid_args("either --rules or --group is required")),
    }
}

/// Pick the group to run: the one named, or the only one available
fn select_group(groups: &[RuleGroup], requested: Option<&str>) -> Result<String> {
    match (requested, groups) {
        (Some(id), _) => groups
            .iter()
            .find(|g| g.id == id)
            .map(|g| g.id.clone())
            .ok_or_else(|| {
                let available: Vec<&str> = groups.iter().map(|g| g.id.as_str()).collect();
                Error::invalid_args(format!(
                    "rule group '{}' is not in the rule file (available: {})",
                    id,
                    available.join(", ")
                ))
            }),
        (None, [only]) => Ok(only.id.clone()),
        (None, []) => Err(Error::invalid_args("the rule file contains no rule groups")),
        (None, _) => Err(Error::invalid_args(format!(
            "the rule file contains {} rule groups; choose one with --group",
            groups.len()
        ))),
    }
}
