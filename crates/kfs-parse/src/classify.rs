//! Priority-ordered classification of trimmed log lines.
//!
//! [`RULES`] is scanned top to bottom and the first prefix that matches decides
//! the kind of the line. The short `cov` prefix stays last so it cannot shadow
//! a longer prefix.

use std::borrow::Cow;

/// Step feature names as they appear in the report header.
pub mod feature {
    pub const POS: &str = "Pos";
    pub const DIR: &str = "Dir";
    pub const MOMENTUM: &str = "Momentum";
    pub const CHARGE: &str = "Charge";
    pub const TRIALS: &str = "Trials";
}

/// Annotation name for the smoothed estimate of a surface.
pub const SMOOTHED_VALUE: &str = "smoothed_val";

/// Hierarchy level announced by an identifier line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Track,
    Surface,
    Step,
}

/// Result of classifying a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `track id N`, `surface id N` or `step id N`; `token` is the unparsed last word.
    Identifier { level: Level, token: &'a str },
    /// A step-scoped measurement.
    Feature {
        name: &'static str,
        value: Cow<'a, str>,
    },
    /// A surface-scoped value (smoothed estimate or covariance entry).
    Annotation { name: Cow<'a, str>, value: &'a str },
    Ignored,
}

/// One entry of the dispatch table.
pub struct Rule {
    pub prefix: &'static str,
    pub extract: for<'a> fn(&'a str) -> LineKind<'a>,
}

pub const RULES: &[Rule] = &[
    Rule {
        prefix: "track id",
        extract: track_id,
    },
    Rule {
        prefix: "surface id",
        extract: surface_id,
    },
    Rule {
        prefix: "step id",
        extract: step_id,
    },
    Rule {
        prefix: "state pos",
        extract: position,
    },
    Rule {
        prefix: "state dir",
        extract: direction,
    },
    Rule {
        prefix: "state momentum",
        extract: momentum,
    },
    Rule {
        prefix: "state charge",
        extract: charge,
    },
    Rule {
        prefix: "state num of stepTrails",
        extract: trials,
    },
    Rule {
        prefix: "smoothed value",
        extract: smoothed_value,
    },
    Rule {
        prefix: "cov",
        extract: covariance,
    },
];

/// Classifies a line from the data region. Surrounding whitespace is ignored.
pub fn classify(line: &str) -> LineKind<'_> {
    let line = line.trim();
    if line.is_empty() {
        return LineKind::Ignored;
    }
    RULES
        .iter()
        .find(|rule| line.starts_with(rule.prefix))
        .map_or(LineKind::Ignored, |rule| (rule.extract)(line))
}

fn track_id(line: &str) -> LineKind<'_> {
    identifier(Level::Track, line)
}

fn surface_id(line: &str) -> LineKind<'_> {
    identifier(Level::Surface, line)
}

fn step_id(line: &str) -> LineKind<'_> {
    identifier(Level::Step, line)
}

fn position(line: &str) -> LineKind<'_> {
    vector_feature(feature::POS, line)
}

fn direction(line: &str) -> LineKind<'_> {
    vector_feature(feature::DIR, line)
}

fn momentum(line: &str) -> LineKind<'_> {
    scalar_feature(feature::MOMENTUM, line)
}

fn charge(line: &str) -> LineKind<'_> {
    scalar_feature(feature::CHARGE, line)
}

fn trials(line: &str) -> LineKind<'_> {
    scalar_feature(feature::TRIALS, line)
}

fn smoothed_value(line: &str) -> LineKind<'_> {
    LineKind::Annotation {
        name: Cow::Borrowed(SMOOTHED_VALUE),
        value: after_last(line, ": "),
    }
}

fn covariance(line: &str) -> LineKind<'_> {
    LineKind::Annotation {
        name: Cow::Owned(covariance_key(line)),
        value: after_last(line, ": "),
    }
}

fn identifier(level: Level, line: &str) -> LineKind<'_> {
    let token = line.rsplit(' ').next().unwrap_or(line);
    LineKind::Identifier { level, token }
}

fn vector_feature<'a>(name: &'static str, line: &'a str) -> LineKind<'a> {
    let tail = after_last(line, ": (");
    let value = if tail.contains(')') {
        Cow::Owned(tail.replace(')', ""))
    } else {
        Cow::Borrowed(tail)
    };
    LineKind::Feature { name, value }
}

fn scalar_feature<'a>(name: &'static str, line: &'a str) -> LineKind<'a> {
    LineKind::Feature {
        name,
        value: Cow::Borrowed(after_last(line, ": ")),
    }
}

/// Text after the last occurrence of `separator`, or the whole line when absent.
fn after_last<'a>(line: &'a str, separator: &str) -> &'a str {
    line.rsplit_once(separator).map_or(line, |(_, tail)| tail)
}

/// `cov [0, 1] : 0.25` becomes `cov -0_1`: the text before `"] "` with the
/// opening bracket turned into `-` and the index separator into `_`.
pub fn covariance_key(line: &str) -> String {
    let head = line.split_once("] ").map_or(line, |(head, _)| head);
    head.replace('[', "-").replace(", ", "_")
}

/// Case- and whitespace-insensitive matcher for the start sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinel {
    phrase: String,
}

impl Sentinel {
    pub fn new(phrase: &str) -> Self {
        Self {
            phrase: normalize(phrase),
        }
    }

    /// True when the normalized line starts with the normalized phrase.
    pub fn matches(&self, line: &str) -> bool {
        !self.phrase.is_empty() && normalize(line).starts_with(&self.phrase)
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
