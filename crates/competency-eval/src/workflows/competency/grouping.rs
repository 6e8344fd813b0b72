use super::domain::EvaluationAssignment;
use super::filter::push_unique;
use serde::Serialize;

/// Unique workers and competencies evaluated for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleGroup {
    pub role: String,
    pub workers: Vec<String>,
    pub competencies: Vec<String>,
}

impl RoleGroup {
    fn new(role: &str) -> Self {
        Self {
            role: role.to_string(),
            workers: Vec::new(),
            competencies: Vec::new(),
        }
    }

    pub fn cell_count(&self) -> usize {
        self.workers.len() * self.competencies.len()
    }
}

/// Role buckets in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RoleGroups {
    groups: Vec<RoleGroup>,
}

impl RoleGroups {
    /// Groups every visible assignment of `sub_unit` by role. Nothing is
    /// grouped until a sub-unit is chosen.
    pub fn derive(visible: &[&EvaluationAssignment], sub_unit: Option<&str>) -> Self {
        let mut groups: Vec<RoleGroup> = Vec::new();
        let Some(sub_unit) = sub_unit else {
            return Self { groups };
        };

        for assignment in visible.iter().filter(|a| a.sub_unit == sub_unit) {
            let index = match groups.iter().position(|group| group.role == assignment.role) {
                Some(index) => index,
                None => {
                    groups.push(RoleGroup::new(&assignment.role));
                    groups.len() - 1
                }
            };
            let group = &mut groups[index];
            push_unique(&mut group.workers, &assignment.worker);
            push_unique(&mut group.competencies, &assignment.competency);
        }

        Self { groups }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoleGroup> {
        self.groups.iter()
    }

    pub fn get(&self, role: &str) -> Option<&RoleGroup> {
        self.groups.iter().find(|group| group.role == role)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Every (role, worker, competency) triple: role order, then worker,
    /// then competency.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.groups.iter().flat_map(|group| {
            group.workers.iter().flat_map(move |worker| {
                group.competencies.iter().map(move |competency| {
                    (group.role.as_str(), worker.as_str(), competency.as_str())
                })
            })
        })
    }

    pub fn cell_count(&self) -> usize {
        self.groups.iter().map(RoleGroup::cell_count).sum()
    }

    pub fn contains_cell(&self, worker: &str, competency: &str) -> bool {
        self.groups.iter().any(|group| {
            group.workers.iter().any(|w| w == worker)
                && group.competencies.iter().any(|c| c == competency)
        })
    }
}
