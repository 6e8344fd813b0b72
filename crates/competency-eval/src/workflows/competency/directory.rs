use super::domain::{EvaluationAssignment, Identity};
use super::seed;

/// Immutable source of truth for a session: the assignment list and the
/// identities allowed to evaluate it.
#[derive(Debug, Clone)]
pub struct Directory {
    assignments: Vec<EvaluationAssignment>,
    identities: Vec<Identity>,
}

impl Directory {
    pub fn new(assignments: Vec<EvaluationAssignment>, identities: Vec<Identity>) -> Self {
        Self {
            assignments,
            identities,
        }
    }

    /// Built-in assignments and identities.
    pub fn standard() -> Self {
        Self::new(seed::standard_assignments(), seed::standard_identities())
    }

    pub fn with_assignments(mut self, assignments: Vec<EvaluationAssignment>) -> Self {
        self.assignments = assignments;
        self
    }

    pub fn assignments(&self) -> &[EvaluationAssignment] {
        &self.assignments
    }

    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }

    /// Exact match on login id and secret.
    pub fn authenticate(&self, login_id: &str, secret: &str) -> Option<&Identity> {
        self.identities
            .iter()
            .find(|identity| identity.login_id == login_id && identity.secret == secret)
    }

    pub fn visible_assignments(&self, identity: &Identity) -> Vec<&EvaluationAssignment> {
        self.assignments
            .iter()
            .filter(|assignment| identity.can_see(assignment))
            .collect()
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluators_only_see_their_sub_unit() {
        let directory = Directory::standard();
        let identity = directory
            .authenticate("juan@empresa.com", "123")
            .expect("seeded evaluator");

        let visible = directory.visible_assignments(identity);
        assert_eq!(visible.len(), 4);
        assert!(visible
            .iter()
            .all(|assignment| assignment.sub_unit == "Refractarios"));
    }

    #[test]
    fn administrator_sees_every_assignment() {
        let directory = Directory::standard();
        let admin = directory
            .authenticate("admin@empresa.com", "admin")
            .expect("seeded administrator");

        assert_eq!(
            directory.visible_assignments(admin).len(),
            directory.assignments().len()
        );
    }

    #[test]
    fn authentication_requires_exact_secret() {
        let directory = Directory::standard();
        assert!(directory.authenticate("juan@empresa.com", "1234").is_none());
        assert!(directory.authenticate("JUAN@empresa.com", "123").is_none());
        assert!(directory.authenticate("nobody@empresa.com", "123").is_none());
    }

    #[test]
    fn replacing_assignments_keeps_identities() {
        let directory = Directory::standard().with_assignments(vec![EvaluationAssignment::new(
            "G", "Refractarios", "R", "W", "C",
        )]);
        assert_eq!(directory.assignments().len(), 1);
        assert_eq!(directory.identities().len(), 3);
    }
}
