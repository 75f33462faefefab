use std::path::PathBuf;

use crate::error::GenerationError;

/// One usable line of the prompt file, with its 1-based position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptEntry {
    pub index: usize,
    pub text: String,
}

/// Result of a single prompt. The loop driver decides what to do next.
#[derive(Debug)]
pub enum PromptOutcome {
    Saved { path: PathBuf },
    NoImage { feedback: Option<String> },
    Failed { error: GenerationError },
}

impl PromptOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, PromptOutcome::Saved { .. })
    }
}

#[derive(Debug)]
pub struct PromptReport {
    pub prompt: PromptEntry,
    pub final_prompt: String,
    pub outcome: PromptOutcome,
}

#[derive(Debug)]
pub struct BatchSummary {
    pub output_dir: PathBuf,
    pub reports: Vec<PromptReport>,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    pub fn saved(&self) -> usize {
        self.count(|outcome| matches!(outcome, PromptOutcome::Saved { .. }))
    }

    pub fn no_image(&self) -> usize {
        self.count(|outcome| matches!(outcome, PromptOutcome::NoImage { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, PromptOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&PromptOutcome) -> bool) -> usize {
        self.reports
            .iter()
            .filter(|report| predicate(&report.outcome))
            .count()
    }
}
