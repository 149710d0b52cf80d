//! Input classification
//!
//! A lone run of ASCII letters and digits is treated as a probable typo and
//! answered with a canned clarification instead of a generated reply. Plain
//! one-word messages such as "hello" fall into this bucket too; that is the
//! current product behavior.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static SUSPECT_INPUT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("suspect-input pattern is valid"));

/// Result of classifying raw user input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputClass {
    Meaningful,
    Suspect,
}

/// Classify raw input. Only text made entirely of `[A-Za-z0-9]` is suspect.
pub fn classify(text: &str) -> InputClass {
    if SUSPECT_INPUT.is_match(text) {
        InputClass::Suspect
    } else {
        InputClass::Meaningful
    }
}
