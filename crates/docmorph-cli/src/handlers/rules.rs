//! Rule file command handlers

use super::utils::load_rule_groups;
use crate::cli::{RulesAction, RulesArgs, RulesValidateArgs};
use crate::error::{Error, Result};
use crate::output::{GroupReport, OutputWriter, RuleProblem, RuleReport};
use docmorph_core::{query, Rule, RuleGroup};
use tracing::{info, instrument, warn};

/// Handle the rules command
pub fn handle_rules(args: RulesArgs, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        RulesAction::Validate(args) => handle_validate(args, output),
    }
}

#[instrument(skip(output), fields(file = %args.file.display()))]
fn handle_validate(args: RulesValidateArgs, output: &mut OutputWriter) -> Result<()> {
    let groups = load_rule_groups(&args.file)?;

    let report = RuleReport {
        file: args.file.display().to_string(),
        groups: groups.iter().map(check_group).collect(),
    };
    output.rule_report(&report)?;

    match report.problem_count() {
        0 => {
            info!(groups = groups.len(), "Rule file is valid");
            Ok(())
        }
        count => {
            warn!(count, "Rule file has invalid rules");
            Err(Error::InvalidRules {
                path: args.file,
                count,
            })
        }
    }
}

fn check_group(group: &RuleGroup) -> GroupReport {
    let problems = group
        .rules
        .iter()
        .enumerate()
        .filter_map(|(index, rule)| {
            check_rule(rule).map(|message| RuleProblem {
                index,
                source: rule.source.clone(),
                message,
            })
        })
        .collect();

    GroupReport {
        id: group.id.clone(),
        label: group.label.clone(),
        rules: group.rules.len(),
        problems,
    }
}

/// Problem with a rule, if any
fn check_rule(rule: &Rule) -> Option<String> {
    if let Err(e) = query::validate(&rule.source) {
        return Some(e.detailed_message());
    }
    if rule.target.trim().is_empty() {
        return Some("Target path must not be empty".to_string());
    }
    None
}
