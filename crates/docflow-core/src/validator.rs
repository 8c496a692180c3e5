//! Validación de un contrato contra su template.

use crate::errors::ValidationError;
use crate::model::{RoleMapping, WorkflowIO};

/// Comprueba que cada actor del template tenga participante asignado.
///
/// Falla en el primer rol ausente (orden del template). No lee ni escribe
/// estado. Roles extra en el mapeo se aceptan.
pub fn validate(template: &WorkflowIO, mapping: &RoleMapping) -> Result<(), ValidationError> {
    match template.actor_names().find(|role| !mapping.contains_role(role)) {
        Some(missing) => Err(ValidationError::MissingRole(missing.to_string())),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Actor;

    fn template(roles: &[&str]) -> WorkflowIO {
        WorkflowIO { id: "WF1".into(),
                     actor_list: roles.iter()
                                      .enumerate()
                                      .map(|(i, r)| Actor { id: format!("a{i}"), name: r.to_string() })
                                      .collect(),
                     ..Default::default() }
    }

    fn mapping(roles: &[&str]) -> RoleMapping {
        roles.iter().map(|r| (r.to_string(), format!("{r}-1"))).collect()
    }

    #[test]
    fn complete_mapping_is_valid() {
        assert_eq!(validate(&template(&["Exporter", "Importer"]), &mapping(&["Importer", "Exporter"])), Ok(()));
    }

    #[test]
    fn extra_roles_are_tolerated() {
        assert_eq!(validate(&template(&["Exporter"]), &mapping(&["Exporter", "Bank"])), Ok(()));
    }

    #[test]
    fn empty_template_accepts_anything() {
        assert_eq!(validate(&template(&[]), &RoleMapping::new()), Ok(()));
    }

    #[test]
    fn reports_first_missing_role_in_template_order() {
        let t = template(&["Exporter", "Importer", "Customs"]);
        assert_eq!(validate(&t, &mapping(&["Exporter"])), Err(ValidationError::MissingRole("Importer".into())));
        assert_eq!(validate(&t, &RoleMapping::new()), Err(ValidationError::MissingRole("Exporter".into())));
    }

    #[test]
    fn succeeds_iff_every_actor_is_mapped() {
        let roles = ["Exporter", "Importer", "Customs", "Bank"];
        let t = template(&roles);
        // Todas las combinaciones de subconjuntos del mapeo.
        for mask in 0u32..(1 << roles.len()) {
            let chosen: Vec<&str> = roles.iter().enumerate().filter(|(i, _)| mask & (1 << i) != 0).map(|(_, r)| *r).collect();
            let ok = validate(&t, &mapping(&chosen)).is_ok();
            assert_eq!(ok, chosen.len() == roles.len(), "mask={mask:b}");
        }
    }
}
