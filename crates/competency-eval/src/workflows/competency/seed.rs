use super::domain::{EvaluationAssignment, Identity};

const PRODUCTION: &str = "GERENCIA DE PRODUCCION";
const HUMAN_CAPITAL: &str = "GESTION DE CAPITAL HUMANO";
const ELECTRIC_FURNACES: &str = "Hornos eléctricos";
const REFRACTORIES: &str = "Refractarios";
const TALENT: &str = "TALENTO Y DESARROLLO HUMANO";

/// (organizational unit, sub-unit, role, worker, competency)
const STANDARD_ASSIGNMENTS: &[(&str, &str, &str, &str, &str)] = &[
    (PRODUCTION, ELECTRIC_FURNACES, "OPERADOR DE HORNO", "JUAN VALDEZ", "OPERACIÓN DE PANEL"),
    (PRODUCTION, ELECTRIC_FURNACES, "OPERADOR DE HORNO", "JUAN VALDEZ", "SEGURIDAD EN FUNDICIÓN"),
    (PRODUCTION, ELECTRIC_FURNACES, "OPERADOR DE HORNO", "JUAN VALDEZ", "CONTROL DE TEMPERATURA"),
    (PRODUCTION, ELECTRIC_FURNACES, "OPERADOR DE HORNO", "PEDRO PICAPIEDRA", "OPERACIÓN DE PANEL"),
    (PRODUCTION, ELECTRIC_FURNACES, "OPERADOR DE HORNO", "PEDRO PICAPIEDRA", "SEGURIDAD EN FUNDICIÓN"),
    (PRODUCTION, ELECTRIC_FURNACES, "OPERADOR DE HORNO", "PEDRO PICAPIEDRA", "CONTROL DE TEMPERATURA"),
    (PRODUCTION, ELECTRIC_FURNACES, "TECNICO DE MANTENIMIENTO", "CARLOS RUIZ", "MANTENIMIENTO PREVENTIVO"),
    (PRODUCTION, ELECTRIC_FURNACES, "TECNICO DE MANTENIMIENTO", "CARLOS RUIZ", "DIAGNOSTICO DE FALLAS"),
    (PRODUCTION, ELECTRIC_FURNACES, "AYUDANTE GENERAL", "JOSE LOPEZ", "LIMPIEZA DE AREA"),
    (PRODUCTION, ELECTRIC_FURNACES, "AYUDANTE GENERAL", "JOSE LOPEZ", "APOYO EN CARGA"),
    (PRODUCTION, REFRACTORIES, "TECNICO REFRACTARIO", "LUIS LINO", "MEZCLA DE MATERIAL"),
    (PRODUCTION, REFRACTORIES, "TECNICO REFRACTARIO", "LUIS LINO", "APLICACIÓN DE MORTERO"),
    (PRODUCTION, REFRACTORIES, "TECNICO REFRACTARIO", "MARIO NAVARRETE", "MEZCLA DE MATERIAL"),
    (PRODUCTION, REFRACTORIES, "TECNICO REFRACTARIO", "MARIO NAVARRETE", "APLICACIÓN DE MORTERO"),
    (HUMAN_CAPITAL, TALENT, "ANALISTA DE TALENTO HUMANO", "MARLON RUIZ", "COMPETENCIA 1"),
    (HUMAN_CAPITAL, TALENT, "ANALISTA DE TALENTO HUMANO", "MARLON RUIZ", "COMPETENCIA 2"),
    (HUMAN_CAPITAL, TALENT, "ANALISTA DE TALENTO HUMANO", "DANIEL DAVILA", "COMPETENCIA 1"),
    (HUMAN_CAPITAL, TALENT, "ANALISTA DE TALENTO HUMANO", "DANIEL DAVILA", "COMPETENCIA 2"),
];

pub(crate) fn standard_assignments() -> Vec<EvaluationAssignment> {
    STANDARD_ASSIGNMENTS
        .iter()
        .map(|(unit, sub_unit, role, worker, competency)| {
            EvaluationAssignment::new(*unit, *sub_unit, *role, *worker, *competency)
        })
        .collect()
}

pub(crate) fn standard_identities() -> Vec<Identity> {
    vec![
        Identity::evaluator("marlon@empresa.com", "123", "Marlon Ruiz", ELECTRIC_FURNACES),
        Identity::evaluator("juan@empresa.com", "123", "Juan Perez", REFRACTORIES),
        Identity::administrator("admin@empresa.com", "admin", "Administrador", TALENT),
    ]
}
