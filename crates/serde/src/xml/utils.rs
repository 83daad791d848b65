//! Constants and small helpers shared by the XML encoder and decoder.

/// FHIR namespace URI.
///
/// Declared on the root element; every element of a document must resolve to it.
pub const FHIR_NAMESPACE: &str = "http://hl7.org/fhir";

/// Checks if an element name can name a FHIR resource.
///
/// FHIR resources are identified by having an uppercase first letter.
pub fn is_resource_name(name: &str) -> bool {
    name.chars()
        .next()
        .map(|c| c.is_ascii_uppercase())
        .unwrap_or(false)
}

/// Element name of a choice field populated with the type named by `suffix`.
pub fn choice_element_name(base: &str, suffix: &str) -> String {
    format!("{}{}", base, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_resource_name() {
        assert!(is_resource_name("Patient"));
        assert!(is_resource_name("Observation"));
        assert!(is_resource_name("Bundle"));
        assert!(!is_resource_name("active"));
        assert!(!is_resource_name("birthDate"));
        assert!(!is_resource_name(""));
    }

    #[test]
    fn test_choice_element_name() {
        assert_eq!(choice_element_name("value", "Quantity"), "valueQuantity");
        assert_eq!(choice_element_name("deceased", "DateTime"), "deceasedDateTime");
    }
}
