pub mod aliases;
mod convert;
pub mod slug;

pub use aliases::CanonicalField;
pub use convert::{parse_timestamp, DraftConversion};
pub use slug::slugify;

use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// A raw input record: arbitrary labels mapped to JSON values.
pub type RawRecord = Map<String, Value>;

/// Values of a raw record keyed by canonical field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalRecord {
    values: BTreeMap<CanonicalField, Value>,
}

impl CanonicalRecord {
    pub fn get(&self, field: CanonicalField) -> Option<&Value> {
        self.values.get(&field)
    }

    pub fn insert(&mut self, field: CanonicalField, value: Value) {
        self.values.insert(field, value);
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.values.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &Value)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }
}

/// Maps raw labels onto canonical fields.
///
/// Raw keys are slugified once; each canonical field then takes the value of
/// its first alias present with a non-null value. When two raw keys slugify
/// to the same token the one that sorts first as written (byte order) is
/// kept; `RawRecord` does not remember input order.
pub fn map_fields(raw: &RawRecord) -> CanonicalRecord {
    let mut slugged: HashMap<String, &Value> = HashMap::with_capacity(raw.len());
    for (key, value) in raw {
        if value.is_null() {
            continue;
        }
        slugged.entry(slugify(key)).or_insert(value);
    }

    let mut record = CanonicalRecord::default();
    for field in CanonicalField::ALL {
        if let Some(value) = field
            .aliases()
            .iter()
            .find_map(|alias| slugged.get(*alias))
        {
            record.insert(field, (*value).clone());
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::{map_fields, CanonicalField, RawRecord};
    use serde_json::{json, Value};

    fn raw(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn map_fields_reads_spreadsheet_labels() {
        let record = map_fields(&raw(json!({
            "Horodateur": "2024/05/01 10:00:00",
            "Nom complet": "Marie Kabila",
            "Email": "Marie@Example.com",
            "Contact Number": "0991234567",
            "Veuillez sélectionner votre domaine d'expertise": "Finance",
            "Colonne inconnue": "ignored"
        })));

        assert_eq!(record.get(CanonicalField::FullName), Some(&json!("Marie Kabila")));
        assert_eq!(record.get(CanonicalField::Email), Some(&json!("Marie@Example.com")));
        assert_eq!(record.get(CanonicalField::Phone), Some(&json!("0991234567")));
        assert_eq!(record.get(CanonicalField::ExpertiseDomain), Some(&json!("Finance")));
        assert_eq!(
            record.get(CanonicalField::SubmittedAt),
            Some(&json!("2024/05/01 10:00:00"))
        );
        assert_eq!(record.len(), 5);
    }

    #[test]
    fn map_fields_reads_form_keys() {
        let record = map_fields(&raw(json!({
            "nom": "Mbala",
            "postNom": "Kasongo",
            "prenom": "Jean",
            "dateNaissance": "1990-01-01",
            "anneeObtention": 2012,
            "accepteTermes": true
        })));

        assert_eq!(record.get(CanonicalField::LastName), Some(&json!("Mbala")));
        assert_eq!(record.get(CanonicalField::MiddleName), Some(&json!("Kasongo")));
        assert_eq!(record.get(CanonicalField::FirstName), Some(&json!("Jean")));
        assert_eq!(record.get(CanonicalField::DateOfBirth), Some(&json!("1990-01-01")));
        assert_eq!(record.get(CanonicalField::GraduationYear), Some(&json!(2012)));
        assert_eq!(record.get(CanonicalField::TermsAccepted), Some(&json!(true)));
    }

    #[test]
    fn map_fields_prefers_earlier_alias() {
        let record = map_fields(&raw(json!({
            "phone": "+46 70 123 45 67",
            "contact_number": "0811111111"
        })));
        assert_eq!(record.get(CanonicalField::Phone), Some(&json!("0811111111")));
    }

    #[test]
    fn map_fields_colliding_keys_keep_smallest_raw_key() {
        let record = map_fields(&raw(json!({
            "e mail": "second@example.com",
            "E-mail": "first@example.com"
        })));
        assert_eq!(
            record.get(CanonicalField::Email),
            Some(&json!("first@example.com"))
        );
    }

    #[test]
    fn map_fields_skips_null_values() {
        let record = map_fields(&raw(json!({
            "genre": null,
            "sexe": "F"
        })));
        assert_eq!(record.get(CanonicalField::Gender), Some(&json!("F")));
    }

    #[test]
    fn map_fields_leaves_unmapped_fields_absent() {
        let record = map_fields(&raw(json!({ "whatever": 1 })));
        assert!(record.is_empty());
        assert!(!record.contains(CanonicalField::Email));
    }
}
