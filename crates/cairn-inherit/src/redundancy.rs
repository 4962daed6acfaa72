use std::collections::BTreeSet;
use std::fmt;

use cairn_signature::ActionPrototype;
use cairn_types::{TypeDescriptor, TypeOracle};
use serde::Serialize;

use crate::context::push_warning;
use crate::walk::Walk;
use crate::{ResolutionAborted, ResolutionWarning};

/// Where the redundant entry sits relative to the entry that subsumes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedundancyMode {
    /// The redundant capability comes after the capability that provides it, or the
    /// supertype provides it. Remove it together with the preceding separator.
    Pre,
    /// The redundant capability comes before a later capability that provides it.
    /// Remove it together with the following separator.
    Post,
}

impl RedundancyMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RedundancyMode::Pre => "pre",
            RedundancyMode::Post => "post",
        }
    }
}

impl fmt::Display for RedundancyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RedundantCapability {
    /// The declared capability that can be removed.
    pub capability: String,
    /// The supertype or declared capability that already provides it.
    pub subsumed_by: String,
    pub mode: RedundancyMode,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RedundancyReport {
    pub redundant: Vec<RedundantCapability>,
    pub warnings: Vec<ResolutionWarning>,
}

impl RedundancyReport {
    pub fn is_empty(&self) -> bool {
        self.redundant.is_empty()
    }
}

/// Everything reachable from one root: type names and prototypes.
#[derive(Default)]
struct Closure {
    types: BTreeSet<String>,
    prototypes: BTreeSet<ActionPrototype>,
}

impl Closure {
    /// Whether `name` is this root or one of its transitive supertypes.
    fn extends(&self, name: &str) -> bool {
        self.types.contains(name)
    }

    /// Whether every prototype of `other` is already reachable here.
    ///
    /// A capability without any operation is never covered; it is only subsumed by
    /// type identity.
    fn covers_operations_of(&self, other: &Closure) -> bool {
        !other.prototypes.is_empty() && other.prototypes.is_subset(&self.prototypes)
    }
}

/// Flags declared capabilities that the supertype or another declared capability
/// already provides.
pub struct RedundancyDetector<'o, O: TypeOracle + ?Sized> {
    oracle: &'o O,
}

impl<'o, O: TypeOracle + ?Sized> RedundancyDetector<'o, O> {
    pub fn new(oracle: &'o O) -> Self {
        Self { oracle }
    }

    /// Each capability is reported at most once, and each pair of capabilities yields at
    /// most one entry. Entries are ordered by detection: capabilities are processed in
    /// declaration order, each checked against the supertype first and then against
    /// the earlier capabilities.
    pub fn find_redundant<S: AsRef<str>>(
        &self,
        supertype: Option<&str>,
        capabilities: &[S],
    ) -> Result<RedundancyReport, ResolutionAborted> {
        let mut report = RedundancyReport::default();

        let super_closure = match supertype {
            Some(name) => Some(self.closure(name, &mut report.warnings)?),
            None => None,
        };
        let closures = capabilities
            .iter()
            .map(|cap| self.closure(cap.as_ref(), &mut report.warnings))
            .collect::<Result<Vec<_>, _>>()?;

        let names: Vec<&str> = capabilities.iter().map(|cap| cap.as_ref()).collect();
        let mut redundant = vec![false; names.len()];

        for current in 0..names.len() {
            if redundant[current] {
                continue;
            }

            if let (Some(super_name), Some(super_closure)) = (supertype, &super_closure) {
                let candidate = &closures[current];
                if super_closure.extends(names[current])
                    || super_closure.covers_operations_of(candidate)
                {
                    redundant[current] = true;
                    report.redundant.push(RedundantCapability {
                        capability: names[current].to_owned(),
                        subsumed_by: super_name.to_owned(),
                        mode: RedundancyMode::Pre,
                    });
                    continue;
                }
            }

            for previous in 0..current {
                if redundant[previous] {
                    continue;
                }
                match pair_relation(
                    (names[previous], &closures[previous]),
                    (names[current], &closures[current]),
                ) {
                    Some(RedundancyMode::Pre) => {
                        redundant[current] = true;
                        report.redundant.push(RedundantCapability {
                            capability: names[current].to_owned(),
                            subsumed_by: names[previous].to_owned(),
                            mode: RedundancyMode::Pre,
                        });
                        break;
                    }
                    Some(RedundancyMode::Post) => {
                        redundant[previous] = true;
                        report.redundant.push(RedundantCapability {
                            capability: names[previous].to_owned(),
                            subsumed_by: names[current].to_owned(),
                            mode: RedundancyMode::Post,
                        });
                    }
                    None => {}
                }
            }
        }

        if !report.redundant.is_empty() {
            tracing::debug!(
                target: "cairn.inherit",
                redundant = report.redundant.len(),
                "found redundant capabilities"
            );
        }
        Ok(report)
    }

    fn closure(
        &self,
        root: &str,
        warnings: &mut Vec<ResolutionWarning>,
    ) -> Result<Closure, ResolutionAborted> {
        let mut closure = Closure::default();
        let mut walk = Walk::new(self.oracle);
        walk.depth_first(root, None, |ty: &TypeDescriptor| {
            for op in &ty.operations {
                // Malformed operations are reported by the context builder.
                if let Ok(prototypes) = op.prototypes() {
                    closure.prototypes.extend(prototypes);
                }
            }
        })?;
        closure.types = walk.visited().clone();
        for warning in walk.warnings {
            push_warning(warnings, warning);
        }
        Ok(closure)
    }
}

/// Decide which entry of an (earlier, later) pair is redundant, if any.
///
/// Type relations take precedence over operation coverage, so a capability is never
/// dropped in favour of one of its own supertypes.
fn pair_relation(earlier: (&str, &Closure), later: (&str, &Closure)) -> Option<RedundancyMode> {
    let (earlier_name, earlier_closure) = earlier;
    let (later_name, later_closure) = later;
    if earlier_closure.extends(later_name) {
        Some(RedundancyMode::Pre)
    } else if later_closure.extends(earlier_name) {
        Some(RedundancyMode::Post)
    } else if earlier_closure.covers_operations_of(later_closure) {
        Some(RedundancyMode::Pre)
    } else if later_closure.covers_operations_of(earlier_closure) {
        Some(RedundancyMode::Post)
    } else {
        None
    }
}
