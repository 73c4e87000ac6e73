use super::Condition;

/// An ordered condition list with `Or` separators.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pub conditions: Vec<Condition>,
}

impl Filter {
    pub fn new() -> Filter {
        Filter::default()
    }

    pub fn push(&mut self, condition: impl Into<Condition>) {
        self.conditions.push(condition.into());
    }

    /// Starts a new disjunctive group.
    pub fn or(&mut self) {
        self.conditions.push(Condition::Or);
    }

    /// Returns `true` when the list holds no comparison or raw condition.
    pub fn is_empty(&self) -> bool {
        self.conditions.iter().all(Condition::is_or)
    }

    /// Splits the list into its AND-groups. Groups left empty by leading,
    /// trailing, or doubled `Or` markers are dropped.
    pub fn groups(&self) -> Vec<&[Condition]> {
        self.conditions
            .split(Condition::is_or)
            .filter(|group| !group.is_empty())
            .collect()
    }

    /// Inserts `condition` at the head of every group, so it constrains
    /// each disjunct. An empty filter gains a single group.
    pub fn prepend_to_groups(&mut self, condition: Condition) {
        if self.is_empty() {
            self.conditions = vec![condition];
            return;
        }

        let mut conditions = Vec::with_capacity(self.conditions.len() + 2);
        let mut at_group_start = true;

        for entry in self.conditions.drain(..) {
            if entry.is_or() {
                at_group_start = true;
                conditions.push(entry);
                continue;
            }

            if at_group_start {
                conditions.push(condition.clone());
                at_group_start = false;
            }
            conditions.push(entry);
        }

        self.conditions = conditions;
    }
}

impl From<Vec<Condition>> for Filter {
    fn from(conditions: Vec<Condition>) -> Self {
        Filter { conditions }
    }
}
