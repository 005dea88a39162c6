// src/data/rules.rs

//! The [`PatternTable`], the read-only table of keyword and category
//! patterns used to classify log lines.
//!
//! A `PatternTable` is created once at program start and shared by
//! reference (or [`Arc`]) by all classifying threads.
//!
//! Classification of a line happens in three steps:
//! 1. the line's leading datetime is found by the [`TimestampParser`]; a line
//!    without one will inherit a datetime
//! 2. the line must match the keyword prefilter of its [`LogKind`]
//! 3. the [`PatternRule`]s are tried in [`Category`] priority order, first
//!    match wins
//!
//! All category patterns are case-insensitive.
//!
//! [`Arc`]: std::sync::Arc

use crate::common::{Dialect, LogKind};
use crate::data::datetime::{TimestampParser, Year};
use crate::data::event::Category;

use ::regex::Regex;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// patterns
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Prefilter for Pacemaker daemon logs. A line must contain one of these.
const KEYWORDS_PACEMAKER: &str = concat!(
    r"LogAction|LogNodeActions|stonith-ng|pacemaker-fenced|crit:|check_migration_threshold",
    r"|corosync|Result of|reboot|cannot run anywhere|attrd_peer_update|High CPU load detected",
    r"|cli-ban|cli-prefer|cib-bootstrap-options-maintenance-mode|-is-managed|-maintenance|-standby",
    r"|cib_perform_op|remote_op_done|Forcing|Timer expired",
);

/// Prefilter for system logs. A line must contain one of these.
const KEYWORDS_SYSLOG: &str = concat!(
    r"SAPHana\(|SAPInstance\(|gcp-vpc-move-vip:|gcp:alias:|gcp:stonith|fence_gce:|corosync\[",
    r"|Result of|reboot",
);

/// Removes the first `[pid]`, e.g. `crmd[1234]:` becomes `crmd:`.
const REGEX_PID: &str = r"\[\d*\]";

/// Category rules in priority order as
/// `(category, component, require all, exclude)`.
///
/// Patterns are compiled case-insensitive.
const RULES: &[(Category, Option<&str>, &[&str], Option<&str>)] = &[
    (
        Category::Fencing,
        None,
        &[r"\*.*fence|remote_op_done.*operation|monitor.*timer.*expired"],
        None,
    ),
    (
        Category::ResourceAction,
        None,
        &[r"notice.*logaction|\(logaction\)|cannot.*run.*anywhere"],
        None,
    ),
    (
        Category::FailedOperation,
        None,
        &[r"result.*of.*operation"],
        Some(r"ok|cancelled|probe"),
    ),
    (
        Category::CorosyncCommunication,
        None,
        &[r"totem", r"failed|membership|retransmit"],
        None,
    ),
    (
        Category::MaintenanceModeChange,
        None,
        &[concat!(
            r"cib-bootstrap-options-maintenance-mode.*value",
            r"|cib_perform_op.*nodes-.*-maintenance",
            r"|cib_perform_op.*nodes-.*-standby",
            r"|cib_perform_op.*meta_attributes-",
        )],
        None,
    ),
    (
        Category::ResourceAgentAlert,
        Some(r"^(?:sapinstance.*|stonith-ng:|gcp:stonith:|gcp:alias:|gcp-vpc-move-vip:|fence_gce:)$"),
        &[r"error|failed"],
        None,
    ),
    (
        Category::ResourceAgentAlert,
        Some(r"^saphana"),
        &[r"error:|warning:|act.*sfail"],
        None,
    ),
    (
        Category::HighLoadOrCritical,
        None,
        &[r"crit:|cpu.*detected"],
        None,
    ),
    (
        Category::MigrationThreshold,
        None,
        &[r"check_migration_threshold|forcing.*away|attrd_peer_update.*infinity"],
        None,
    ),
    (
        Category::LocationConstraintChange,
        None,
        &[r"cli-ban|cli-prefer"],
        None,
    ),
];

/// compile a constant pattern, case-insensitive
fn regex_i(pattern: &str) -> Regex {
    // patterns are constant and tested, so compiling cannot fail
    Regex::new(&format!("(?i){}", pattern)).unwrap()
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PatternRule
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One rule for one [`Category`].
///
/// Matches when the component matches `component` (if set), the payload
/// matches every pattern of `require`, and the payload does not match
/// `exclude` (if set).
#[derive(Debug)]
pub struct PatternRule {
    category: Category,
    component: Option<Regex>,
    require: Vec<Regex>,
    exclude: Option<Regex>,
}

impl PatternRule {
    pub const fn category(&self) -> Category {
        self.category
    }

    pub fn is_match(&self, component: &str, payload: &str) -> bool {
        if let Some(regex) = &self.component {
            if !regex.is_match(component) {
                return false;
            }
        }
        if !self.require.iter().all(|regex| regex.is_match(payload)) {
            return false;
        }
        match &self.exclude {
            Some(regex) => !regex.is_match(payload),
            None => true,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PatternTable
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The rule-set for one [`LogKind`]: a keyword prefilter over the whole
/// line, the datetime extraction rule, and the category rules.
#[derive(Debug)]
pub struct DialectRules<'a> {
    pub prefilter: &'a Regex,
    pub timestamps: &'a TimestampParser,
    pub rules: &'a [PatternRule],
}

impl DialectRules<'_> {
    /// First rule to match, in priority order.
    pub fn categorize(&self, component: &str, payload: &str) -> Option<Category> {
        self.rules
            .iter()
            .find(|rule| rule.is_match(component, payload))
            .map(|rule| rule.category())
    }
}

/// All compiled patterns. Immutable after [`PatternTable::new`].
#[derive(Debug)]
pub struct PatternTable {
    keywords_pacemaker: Regex,
    keywords_syslog: Regex,
    regex_pid: Regex,
    timestamps: TimestampParser,
    rules: Vec<PatternRule>,
}

impl PatternTable {
    /// Compile all patterns. `year` is the filler year for syslog datetimes
    /// that lack one.
    pub fn new(year: Year) -> PatternTable {
        defn!("({})", year);
        let rules: Vec<PatternRule> = RULES
            .iter()
            .map(|(category, component, require, exclude)| PatternRule {
                category: *category,
                component: component.map(regex_i),
                require: require.iter().map(|pattern| regex_i(pattern)).collect(),
                exclude: exclude.map(regex_i),
            })
            .collect();
        defx!("{} rules", rules.len());

        PatternTable {
            keywords_pacemaker: Regex::new(KEYWORDS_PACEMAKER).unwrap(),
            keywords_syslog: Regex::new(KEYWORDS_SYSLOG).unwrap(),
            regex_pid: Regex::new(REGEX_PID).unwrap(),
            timestamps: TimestampParser::new(year),
            rules,
        }
    }

    /// The rule-set for `dialect`.
    pub fn rules_for(&self, dialect: Dialect) -> DialectRules<'_> {
        let prefilter: &Regex = match dialect.log_kind() {
            LogKind::Pacemaker => &self.keywords_pacemaker,
            LogKind::Syslog => &self.keywords_syslog,
        };

        DialectRules {
            prefilter,
            timestamps: &self.timestamps,
            rules: self.rules.as_slice(),
        }
    }

    /// The pattern matching a `[pid]`.
    pub fn regex_pid(&self) -> &Regex {
        &self.regex_pid
    }
}
