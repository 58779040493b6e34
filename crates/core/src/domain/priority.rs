// Priority Pattern Domain Model

use crate::domain::glob::GlobPattern;
use crate::domain::identifier::QueueIdentifier;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Pattern list marking where the catch-all bucket goes
pub const DEFAULT_SENTINEL: &str = "default";

/// Wire shape of one priority entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityPattern {
    pub pattern: Vec<String>,
    #[serde(default)]
    pub fairly: bool,
}

impl PriorityPattern {
    pub fn new<I, S>(pattern: I, fairly: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pattern: pattern.into_iter().map(Into::into).collect(),
            fairly,
        }
    }

    /// Exactly the single literal `default`
    pub fn is_default_sentinel(&self) -> bool {
        matches!(self.pattern.as_slice(), [only] if only == DEFAULT_SENTINEL)
    }
}

/// One sub-pattern of a bucket, applied in declared order
#[derive(Debug, Clone)]
pub enum BucketRule {
    /// Claim matching identifiers from the remaining pool
    Include(GlobPattern),
    /// Drop matching identifiers already claimed by this bucket
    Exclude(GlobPattern),
}

/// Compiled non-sentinel priority entry
#[derive(Debug, Clone)]
pub struct BucketSpec {
    pub rules: Vec<BucketRule>,
    pub fairly: bool,
}

/// Where the catch-all bucket is inserted among the compiled buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultPlacement {
    pub position: usize,
    pub fairly: bool,
}

/// Priority patterns compiled once per cache refresh
#[derive(Debug, Clone, Default)]
pub struct PriorityPlan {
    pub buckets: Vec<BucketSpec>,
    pub default: Option<DefaultPlacement>,
}

impl PriorityPlan {
    /// Compile wire patterns into buckets plus the default placement
    ///
    /// Only the first default sentinel counts; later ones are skipped.
    pub fn compile(patterns: &[PriorityPattern]) -> Result<Self> {
        let mut plan = PriorityPlan::default();

        for entry in patterns {
            if entry.is_default_sentinel() {
                if plan.default.is_some() {
                    warn!(
                        position = plan.buckets.len(),
                        "Ignoring duplicate default priority sentinel"
                    );
                    continue;
                }
                plan.default = Some(DefaultPlacement {
                    position: plan.buckets.len(),
                    fairly: entry.fairly,
                });
                continue;
            }

            let rules = entry
                .pattern
                .iter()
                .map(|sub| {
                    let parsed = QueueIdentifier::parse(sub.as_str());
                    let glob = GlobPattern::compile(parsed.pattern_body())?;
                    Ok(if parsed.is_negated() {
                        BucketRule::Exclude(glob)
                    } else {
                        BucketRule::Include(glob)
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            plan.buckets.push(BucketSpec {
                rules,
                fairly: entry.fairly,
            });
        }

        Ok(plan)
    }

    /// Index the default bucket occupies (end of list if no sentinel)
    pub fn default_position(&self) -> usize {
        self.default
            .map(|d| d.position)
            .unwrap_or(self.buckets.len())
    }

    pub fn default_fairly(&self) -> bool {
        self.default.map(|d| d.fairly).unwrap_or(false)
    }
}
