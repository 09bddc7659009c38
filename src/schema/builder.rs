//! Schema construction from label names

use super::attribute::{Attribute, AttributeSchema, NominalDomain};
use crate::error::{KolosalError, Result};

/// Build the attribute schema for a label set.
///
/// With no class domain every attribute is numeric (regression). With a
/// domain the last label becomes a nominal target over it (classification).
pub fn build_schema<S: AsRef<str>>(
    labels: &[S],
    class_domain: Option<&NominalDomain>,
) -> Result<AttributeSchema> {
    if labels.is_empty() {
        return Err(KolosalError::ConfigError("label set is empty".to_string()));
    }

    for (i, label) in labels.iter().enumerate() {
        let label = label.as_ref();
        if labels[..i].iter().any(|other| other.as_ref() == label) {
            return Err(KolosalError::ConfigError(format!(
                "duplicate label '{}'",
                label
            )));
        }
    }

    if let Some(domain) = class_domain {
        if domain.is_empty() {
            return Err(KolosalError::ConfigError(
                "nominal target has an empty domain".to_string(),
            ));
        }
    }

    let last = labels.len() - 1;
    let attributes = labels
        .iter()
        .enumerate()
        .map(|(i, label)| match class_domain {
            Some(domain) if i == last => Attribute::nominal(label.as_ref(), domain.clone()),
            _ => Attribute::numeric(label.as_ref()),
        })
        .collect();

    AttributeSchema::new(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regression_schema_is_all_numeric() {
        let schema = build_schema(&["a", "b", "y"], None).unwrap();

        assert_eq!(schema.len(), 3);
        assert_eq!(schema.class_index(), 2);
        assert!(schema.attributes().iter().all(Attribute::is_numeric));
        let names: Vec<&str> = schema.attributes().iter().map(Attribute::name).collect();
        assert_eq!(names, vec!["a", "b", "y"]);
    }

    #[test]
    fn test_classification_schema_has_nominal_target() {
        let nominal = ["low", "low", "high", "mid", "high"];
        let domain = NominalDomain::from_values(&nominal);
        let schema = build_schema(&["x1", "x2", "cls"], Some(&domain)).unwrap();

        assert!(schema.features().iter().all(Attribute::is_numeric));
        assert!(schema.class_attribute().is_nominal());
        assert_eq!(
            schema.class_domain().unwrap().values(),
            &["low", "high", "mid"]
        );
    }

    #[test]
    fn test_single_label_schema() {
        let schema = build_schema(&["y"], None).unwrap();
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.class_index(), 0);
        assert!(schema.features().is_empty());
    }

    #[test]
    fn test_empty_labels_rejected() {
        let labels: [&str; 0] = [];
        let err = build_schema(&labels, None).unwrap_err();
        assert!(matches!(err, KolosalError::ConfigError(_)));
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        let err = build_schema(&["x", "x"], None).unwrap_err();
        assert!(matches!(err, KolosalError::ConfigError(_)));
    }

    #[test]
    fn test_empty_domain_rejected() {
        let domain = NominalDomain::from_values::<&str>(&[]);
        let err = build_schema(&["x", "cls"], Some(&domain)).unwrap_err();
        assert!(matches!(err, KolosalError::ConfigError(_)));
    }
}
