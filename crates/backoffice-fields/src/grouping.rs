//! Stable partition of field definitions by category.

use crate::definition::FieldDefinition;
use crate::field_type::FieldCategory;

/// Field definitions bucketed by category.
///
/// Buckets appear in the order their category is first encountered and
/// each bucket keeps the input order of its fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryGroups<'a> {
    groups: Vec<(FieldCategory, Vec<&'a FieldDefinition>)>,
}

impl<'a> CategoryGroups<'a> {
    /// Returns the fields of one category, if any were present.
    pub fn get(&self, category: FieldCategory) -> Option<&[&'a FieldDefinition]> {
        self.groups
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, fields)| fields.as_slice())
    }

    /// The categories present, in first-encounter order.
    pub fn categories(&self) -> impl Iterator<Item = FieldCategory> + '_ {
        self.groups.iter().map(|(c, _)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldCategory, &[&'a FieldDefinition])> {
        self.groups.iter().map(|(c, fields)| (*c, fields.as_slice()))
    }

    /// Number of non-empty buckets.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Every field across all buckets, bucket by bucket.
    pub fn fields(&self) -> impl Iterator<Item = &'a FieldDefinition> + '_ {
        self.groups.iter().flat_map(|(_, fields)| fields.iter().copied())
    }
}

impl<'a> IntoIterator for CategoryGroups<'a> {
    type Item = (FieldCategory, Vec<&'a FieldDefinition>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Partitions an ordered field list by `field_category`.
pub fn group_by_category(fields: &[FieldDefinition]) -> CategoryGroups<'_> {
    let mut groups: Vec<(FieldCategory, Vec<&FieldDefinition>)> = Vec::new();
    for field in fields {
        match groups.iter_mut().find(|(c, _)| *c == field.field_category) {
            Some((_, bucket)) => bucket.push(field),
            None => groups.push((field.field_category, vec![field])),
        }
    }
    CategoryGroups { groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_type::FieldType;

    fn field(name: &str, category: FieldCategory) -> FieldDefinition {
        FieldDefinition::new(name, FieldType::Text).category(category)
    }

    #[test]
    fn test_first_encounter_order() {
        let fields = vec![
            field("a", FieldCategory::Legal),
            field("b", FieldCategory::General),
            field("c", FieldCategory::Legal),
            field("d", FieldCategory::Sales),
        ];
        let groups = group_by_category(&fields);
        assert_eq!(
            groups.categories().collect::<Vec<_>>(),
            vec![FieldCategory::Legal, FieldCategory::General, FieldCategory::Sales]
        );
        let legal: Vec<&str> = groups
            .get(FieldCategory::Legal)
            .unwrap()
            .iter()
            .map(|f| f.field_name.as_str())
            .collect();
        assert_eq!(legal, vec!["a", "c"]);
        assert!(groups.get(FieldCategory::Marketing).is_none());
    }

    #[test]
    fn test_union_equals_input() {
        let fields = vec![
            field("a", FieldCategory::Technical),
            field("b", FieldCategory::Financial),
            field("c", FieldCategory::Technical),
        ];
        let groups = group_by_category(&fields);
        assert_eq!(groups.fields().count(), fields.len());
        for f in &fields {
            assert!(groups.fields().any(|g| g.field_name == f.field_name));
        }
    }

    #[test]
    fn test_empty_input() {
        let groups = group_by_category(&[]);
        assert!(groups.is_empty());
        assert_eq!(groups.len(), 0);
    }
}
