//! Building-block categories and the dependency graph between them.
//!
//! The graph is fixed: `hobbies` needs `occupations`, `descriptions` needs
//! `hobbies`, and `names`/`occupations` stand alone. [`resolve_plan`] turns a
//! requested category into an ordered list of procedures to run, walking the
//! graph explicitly so that a cycle is reported instead of recursing forever.

use crate::error::{BlockError, Result};
use std::fmt;
use std::str::FromStr;

/// A named category of generated strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Names,
    Occupations,
    Hobbies,
    Descriptions,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Names,
        Category::Occupations,
        Category::Hobbies,
        Category::Descriptions,
    ];

    /// Key used for display and in persisted snapshots.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Names => "names",
            Category::Occupations => "occupations",
            Category::Hobbies => "hobbies",
            Category::Descriptions => "descriptions",
        }
    }

    /// Categories that must exist in the store before this one can be generated.
    pub fn prerequisites(&self) -> &'static [Category] {
        match self {
            Category::Names | Category::Occupations => &[],
            Category::Hobbies => &[Category::Occupations],
            Category::Descriptions => &[Category::Hobbies],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = BlockError;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| BlockError::UnknownCategory(s.to_string()))
    }
}

/// Orders the procedures needed to generate `target` using the fixed graph.
///
/// Prerequisites already present (according to `is_present`) are skipped.
/// The target itself is always last in the plan, even when present.
pub fn resolve_plan(
    target: Category,
    is_present: impl Fn(Category) -> bool,
) -> Result<Vec<Category>> {
    resolve_plan_with(target, |c| c.prerequisites().to_vec(), is_present)
}

/// Same as [`resolve_plan`] with an arbitrary prerequisite graph.
///
/// Iterative depth-first post-order walk; a category reached again while it is
/// still on the walk stack is a cycle.
pub fn resolve_plan_with<G, P>(target: Category, graph: G, is_present: P) -> Result<Vec<Category>>
where
    G: Fn(Category) -> Vec<Category>,
    P: Fn(Category) -> bool,
{
    let mut plan: Vec<Category> = Vec::new();
    let pending_for = |c: Category| {
        let mut prerequisites = graph(c);
        prerequisites.reverse();
        prerequisites
    };
    // (category, prerequisites still to visit)
    let mut stack: Vec<(Category, Vec<Category>)> = vec![(target, pending_for(target))];

    while let Some((current, pending)) = stack.last_mut() {
        let current = *current;
        match pending.pop() {
            Some(next) => {
                if let Some(pos) = stack.iter().position(|(c, _)| *c == next) {
                    let mut cycle: Vec<Category> = stack[pos..].iter().map(|(c, _)| *c).collect();
                    cycle.push(next);
                    return Err(BlockError::DependencyCycle(cycle));
                }
                if is_present(next) || plan.contains(&next) {
                    continue;
                }
                stack.push((next, pending_for(next)));
            }
            None => {
                stack.pop();
                plan.push(current);
            }
        }
    }

    Ok(plan)
}
