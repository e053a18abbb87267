//! Attribute token resolution for the bulk import.
//!
//! The nine reference tables are loaded once per upload into one
//! case-insensitive map per kind, keyed by both slug and display name.
//! Unresolved tokens never fail a row; they surface as report warnings.

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::catalog::{AttributeKind, AttributeRef};

/// Case-insensitive lookup from attribute tokens to ids.
#[derive(Debug, Default)]
pub struct AttributeIndex {
    maps: HashMap<AttributeKind, HashMap<String, Uuid>>,
}

impl AttributeIndex {
    /// Build the index from a full dump of the reference tables.
    pub fn from_refs(refs: &[AttributeRef]) -> Self {
        let mut maps: HashMap<AttributeKind, HashMap<String, Uuid>> = HashMap::new();
        for attribute in refs {
            let map = maps.entry(attribute.kind).or_default();
            map.insert(attribute.slug.to_lowercase(), attribute.id);
            map.insert(attribute.name.to_lowercase(), attribute.id);
        }
        Self { maps }
    }

    /// Resolve one token against one kind.
    pub fn resolve(&self, kind: AttributeKind, token: &str) -> Option<Uuid> {
        self.maps
            .get(&kind)
            .and_then(|map| map.get(&token.trim().to_lowercase()))
            .copied()
    }

    /// Resolve every token, splitting hits from misses.
    pub fn resolve_all(
        &self,
        tokens: &[(AttributeKind, Vec<String>)],
    ) -> (Vec<(AttributeKind, Uuid)>, Vec<(AttributeKind, String)>) {
        let mut resolved = Vec::new();
        let mut unresolved = Vec::new();
        for (kind, values) in tokens {
            for token in values {
                match self.resolve(*kind, token) {
                    Some(id) if !resolved.contains(&(*kind, id)) => resolved.push((*kind, id)),
                    Some(_) => {}
                    None => unresolved.push((*kind, token.clone())),
                }
            }
        }
        (resolved, unresolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs() -> Vec<AttributeRef> {
        vec![
            AttributeRef {
                kind: AttributeKind::Category,
                id: Uuid::new_v4(),
                slug: "living-room".into(),
                name: "Living Room".into(),
            },
            AttributeRef {
                kind: AttributeKind::Color,
                id: Uuid::new_v4(),
                slug: "deep-red".into(),
                name: "Deep Red".into(),
            },
        ]
    }

    #[test]
    fn resolves_by_slug_and_by_name_case_insensitively() {
        let refs = refs();
        let index = AttributeIndex::from_refs(&refs);
        let expected = refs[0].id;
        assert_eq!(
            index.resolve(AttributeKind::Category, "living-room"),
            Some(expected)
        );
        assert_eq!(
            index.resolve(AttributeKind::Category, "LIVING ROOM"),
            Some(expected)
        );
    }

    #[test]
    fn kinds_do_not_leak_into_each_other() {
        let refs = refs();
        let index = AttributeIndex::from_refs(&refs);
        assert_eq!(index.resolve(AttributeKind::Shape, "living-room"), None);
    }

    #[test]
    fn resolve_all_separates_hits_and_misses_and_dedupes() {
        let refs = refs();
        let index = AttributeIndex::from_refs(&refs);
        let tokens = vec![
            (
                AttributeKind::Category,
                vec![
                    "Living Room".to_owned(),
                    "living-room".to_owned(),
                    "study".to_owned(),
                ],
            ),
            (AttributeKind::Color, vec!["Deep Red".to_owned()]),
        ];
        let (resolved, unresolved) = index.resolve_all(&tokens);
        assert_eq!(
            resolved,
            vec![
                (AttributeKind::Category, refs[0].id),
                (AttributeKind::Color, refs[1].id),
            ]
        );
        assert_eq!(
            unresolved,
            vec![(AttributeKind::Category, "study".to_owned())]
        );
    }
}
