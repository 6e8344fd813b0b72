use super::domain::{EvaluationAssignment, Identity};
use serde::{Deserialize, Serialize};

/// Drill-down state: organizational unit, then sub-unit, then role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    pub organizational_unit: Option<String>,
    pub sub_unit: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionField {
    OrganizationalUnit,
    SubUnit,
    Role,
}

impl SelectionField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::OrganizationalUnit => "organizational unit",
            Self::SubUnit => "sub-unit",
            Self::Role => "role",
        }
    }
}

impl FilterSelection {
    /// Selection applied right after login: the first visible assignment in
    /// the identity's own sub-unit. Administrators start empty.
    pub fn initial_for(identity: &Identity, visible: &[&EvaluationAssignment]) -> Self {
        if identity.is_administrator() {
            return Self::default();
        }

        visible
            .iter()
            .find(|assignment| assignment.sub_unit == identity.assigned_sub_unit)
            .map(|assignment| Self {
                organizational_unit: Some(assignment.organizational_unit.clone()),
                sub_unit: Some(assignment.sub_unit.clone()),
                role: Some(assignment.role.clone()),
            })
            .unwrap_or_default()
    }

    /// Sets one field and clears every field below it.
    pub fn select(&mut self, field: SelectionField, value: Option<String>) {
        match field {
            SelectionField::OrganizationalUnit => {
                self.organizational_unit = value;
                self.sub_unit = None;
                self.role = None;
            }
            SelectionField::SubUnit => {
                self.sub_unit = value;
                self.role = None;
            }
            SelectionField::Role => self.role = value,
        }
    }

    pub fn get(&self, field: SelectionField) -> Option<&str> {
        match field {
            SelectionField::OrganizationalUnit => self.organizational_unit.as_deref(),
            SelectionField::SubUnit => self.sub_unit.as_deref(),
            SelectionField::Role => self.role.as_deref(),
        }
    }
}

/// Choices offered at each level of the drill-down, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub organizational_units: Vec<String>,
    pub sub_units: Vec<String>,
    pub roles: Vec<String>,
}

impl FilterOptions {
    pub fn derive(visible: &[&EvaluationAssignment], selection: &FilterSelection) -> Self {
        let mut options = Self::default();
        let unit = selection.organizational_unit.as_deref();
        let sub_unit = selection.sub_unit.as_deref();

        for assignment in visible {
            push_unique(
                &mut options.organizational_units,
                &assignment.organizational_unit,
            );

            if unit != Some(assignment.organizational_unit.as_str()) {
                continue;
            }
            push_unique(&mut options.sub_units, &assignment.sub_unit);

            if sub_unit == Some(assignment.sub_unit.as_str()) {
                push_unique(&mut options.roles, &assignment.role);
            }
        }

        options
    }

    pub fn for_field(&self, field: SelectionField) -> &[String] {
        match field {
            SelectionField::OrganizationalUnit => &self.organizational_units,
            SelectionField::SubUnit => &self.sub_units,
            SelectionField::Role => &self.roles,
        }
    }
}

pub(crate) fn push_unique(values: &mut Vec<String>, candidate: &str) {
    if !values.iter().any(|value| value == candidate) {
        values.push(candidate.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::competency::Directory;

    fn assignment(unit: &str, sub_unit: &str, role: &str) -> EvaluationAssignment {
        EvaluationAssignment::new(unit, sub_unit, role, "W", "C")
    }

    #[test]
    fn options_cascade_from_higher_selections() {
        let rows = [
            assignment("U1", "S1", "R1"),
            assignment("U1", "S1", "R2"),
            assignment("U1", "S2", "R3"),
            assignment("U2", "S3", "R4"),
            assignment("U1", "S1", "R1"),
        ];
        let visible: Vec<&EvaluationAssignment> = rows.iter().collect();

        let empty = FilterOptions::derive(&visible, &FilterSelection::default());
        assert_eq!(empty.organizational_units, vec!["U1", "U2"]);
        assert!(empty.sub_units.is_empty());
        assert!(empty.roles.is_empty());

        let mut selection = FilterSelection::default();
        selection.select(SelectionField::OrganizationalUnit, Some("U1".into()));
        let by_unit = FilterOptions::derive(&visible, &selection);
        assert_eq!(by_unit.sub_units, vec!["S1", "S2"]);
        assert!(by_unit.roles.is_empty());

        selection.select(SelectionField::SubUnit, Some("S1".into()));
        let by_sub_unit = FilterOptions::derive(&visible, &selection);
        assert_eq!(by_sub_unit.roles, vec!["R1", "R2"]);
    }

    #[test]
    fn selecting_a_higher_field_clears_lower_fields() {
        let mut selection = FilterSelection {
            organizational_unit: Some("U1".into()),
            sub_unit: Some("S1".into()),
            role: Some("R1".into()),
        };

        selection.select(SelectionField::SubUnit, Some("S2".into()));
        assert_eq!(selection.role, None);
        assert_eq!(selection.organizational_unit.as_deref(), Some("U1"));

        selection.select(SelectionField::Role, Some("R3".into()));
        selection.select(SelectionField::OrganizationalUnit, Some("U2".into()));
        assert_eq!(selection.sub_unit, None);
        assert_eq!(selection.role, None);
    }

    #[test]
    fn login_selects_first_assignment_of_assigned_sub_unit() {
        let directory = Directory::standard();
        let identity = directory
            .authenticate("marlon@empresa.com", "123")
            .expect("seeded evaluator");
        let visible = directory.visible_assignments(identity);

        let selection = FilterSelection::initial_for(identity, &visible);
        assert_eq!(
            selection.organizational_unit.as_deref(),
            Some("GERENCIA DE PRODUCCION")
        );
        assert_eq!(selection.sub_unit.as_deref(), Some("Hornos eléctricos"));
        assert_eq!(selection.role.as_deref(), Some("OPERADOR DE HORNO"));
    }

    #[test]
    fn administrators_start_without_a_selection() {
        let directory = Directory::standard();
        let admin = directory
            .authenticate("admin@empresa.com", "admin")
            .expect("seeded administrator");
        let visible = directory.visible_assignments(admin);

        assert_eq!(
            FilterSelection::initial_for(admin, &visible),
            FilterSelection::default()
        );
    }
}
