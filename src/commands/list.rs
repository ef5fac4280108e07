//! Implementation of the `playrun list` command.

use crate::config::SuiteConfig;
use crate::error::Result;
use crate::exit_codes;
use crate::subject::{Classifier, SubjectDescriptor, discover};

/// Execute the `playrun list` command.
///
/// Prints every discovered subject in discovery order with its category.
pub fn cmd_list(config: &SuiteConfig) -> Result<i32> {
    let classifier = Classifier::from_config(config);
    let subjects = discover(&config.root, &classifier)?;

    println!("Discovered {} subjects:", subjects.len());
    for subject in &subjects {
        println!("{}", format_entry(subject));
    }

    Ok(exit_codes::SUCCESS)
}

pub(super) fn format_entry(subject: &SubjectDescriptor) -> String {
    let mut line = format!("  [{:8}] {}", subject.category, subject.name);
    if !subject.mechanics.is_empty() {
        line.push_str(&format!(" ({})", subject.mechanics.join(", ")));
    }
    line
}
