//! Category domain entity and the business display order.
//!
//! Display order is a fixed priority list matched on normalized names;
//! it is derived on every sort and never stored.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};
use utoipa::ToSchema;
use uuid::Uuid;

/// Business priority, highest first. Entries are already normalized.
pub const CATEGORY_PRIORITY: &[&str] = &[
    "FUNDACIONES",
    "OBRA GRUESA",
    "IMPERMEABILIZANTES",
    "EIFS ENVOLVENTE TERMICO",
    "TERMINACIONES",
    "FERRETERIA",
    "HERRAMIENTAS",
    "SEGURIDAD",
];

/// Category domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub active: bool,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn rank(&self) -> CategoryRank {
        CategoryRank::of(&self.name)
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Fields accepted when creating or replacing a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub active: bool,
    pub parent_id: Option<Uuid>,
}

/// Anything that can be ordered by category popularity.
pub trait NamedCategory {
    fn category_name(&self) -> &str;
}

impl NamedCategory for Category {
    fn category_name(&self) -> &str {
        &self.name
    }
}

impl NamedCategory for String {
    fn category_name(&self) -> &str {
        self
    }
}

impl NamedCategory for &str {
    fn category_name(&self) -> &str {
        self
    }
}

/// Popularity rank of a category name. Unranked sorts after every ranked value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CategoryRank {
    Ranked(usize),
    Unranked,
}

impl CategoryRank {
    pub fn of(name: &str) -> Self {
        match category_rank(name) {
            Some(index) => CategoryRank::Ranked(index),
            None => CategoryRank::Unranked,
        }
    }

    pub fn position(&self) -> Option<usize> {
        match self {
            CategoryRank::Ranked(index) => Some(*index),
            CategoryRank::Unranked => None,
        }
    }
}

/// Index of `name` in the priority list after normalization.
pub fn category_rank(name: &str) -> Option<usize> {
    let normalized = normalize_category_name(name);
    if normalized.is_empty() {
        return None;
    }
    CATEGORY_PRIORITY.iter().position(|entry| *entry == normalized)
}

/// Strip diacritics, unify dashes and punctuation, collapse whitespace, uppercase.
pub fn normalize_category_name(name: &str) -> String {
    let folded: String = strip_accents(name)
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    folded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// NFD-decompose and drop combining marks ("Térmico" -> "Termico").
pub fn strip_accents(value: &str) -> String {
    value.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Accent- and case-insensitive key used for alphabetical tie breaks.
fn collation_key(name: &str) -> String {
    strip_accents(name).to_lowercase()
}

/// Rank first, then alphabetical (accent/case-insensitive, raw string last).
pub fn compare_category_names(a: &str, b: &str) -> Ordering {
    CategoryRank::of(a)
        .cmp(&CategoryRank::of(b))
        .then_with(|| collation_key(a).cmp(&collation_key(b)))
        .then_with(|| a.cmp(b))
}

/// Sort in place by business display order. Stable for equal names.
pub fn sort_categories<T: NamedCategory>(items: &mut [T]) {
    items.sort_by(|a, b| compare_category_names(a.category_name(), b.category_name()));
}

/// URL slug: accents stripped, lowercase, non-alphanumeric runs become one hyphen.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in strip_accents(name).chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Category with its children, as served to the storefront
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Obra Gruesa")]
    pub name: String,
    #[schema(example = "obra-gruesa")]
    pub slug: String,
    pub description: Option<String>,
    pub active: bool,
    pub parent_id: Option<Uuid>,
    /// Position in the business priority list (absent when unranked)
    pub rank: Option<usize>,
    pub subcategories: Vec<CategoryResponse>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        let rank = category.rank().position();
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            description: category.description,
            active: category.active,
            parent_id: category.parent_id,
            rank,
            subcategories: Vec::new(),
        }
    }
}

impl NamedCategory for CategoryResponse {
    fn category_name(&self) -> &str {
        &self.name
    }
}

/// Nest subcategories under their parents and order every level.
///
/// Children whose parent is not in `categories` are promoted to the root.
pub fn build_category_tree(categories: Vec<Category>) -> Vec<CategoryResponse> {
    let known: std::collections::HashSet<Uuid> = categories.iter().map(|c| c.id).collect();
    let (roots, children): (Vec<_>, Vec<_>) = categories
        .into_iter()
        .partition(|c| c.parent_id.map_or(true, |parent| !known.contains(&parent)));

    let mut tree: Vec<CategoryResponse> = roots.into_iter().map(CategoryResponse::from).collect();
    for child in children {
        let parent_id = child.parent_id;
        if let Some(parent) = tree.iter_mut().find(|node| Some(node.id) == parent_id) {
            parent.subcategories.push(CategoryResponse::from(child));
        } else {
            // grandchildren are flattened onto the root level
            tree.push(CategoryResponse::from(child));
        }
    }

    sort_categories(&mut tree);
    for node in &mut tree {
        sort_categories(&mut node.subcategories);
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str, parent_id: Option<Uuid>) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            slug: slugify(name),
            description: None,
            active: true,
            parent_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_rank_increases_along_priority_list() {
        let ranks: Vec<usize> = CATEGORY_PRIORITY
            .iter()
            .map(|name| category_rank(name).unwrap())
            .collect();
        assert!(ranks.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_accent_case_and_dash_variants_rank_equal() {
        assert_eq!(
            category_rank("EIFS – ENVOLVENTE TÉRMICO"),
            category_rank("eifs - envolvente termico")
        );
        assert_eq!(category_rank("eifs - envolvente termico"), Some(3));
        assert_eq!(category_rank("  Ferretería "), Some(5));
    }

    #[test]
    fn test_unknown_and_empty_names_are_unranked() {
        assert_eq!(category_rank("Jardinería"), None);
        assert_eq!(category_rank(""), None);
        assert_eq!(CategoryRank::of("---"), CategoryRank::Unranked);
        assert!(CategoryRank::Ranked(usize::MAX) < CategoryRank::Unranked);
    }

    #[test]
    fn test_unranked_names_fall_back_to_alphabetical() {
        assert_eq!(compare_category_names("Alfa", "Zeta"), Ordering::Less);
        assert_eq!(compare_category_names("Zeta", "Alfa"), Ordering::Greater);
        assert_eq!(compare_category_names("álamo", "Balsa"), Ordering::Less);
    }

    #[test]
    fn test_ranked_sorts_before_unranked() {
        assert_eq!(compare_category_names("SEGURIDAD", "Aaa"), Ordering::Less);
    }

    #[test]
    fn test_sort_matches_business_order() {
        let mut names = vec![
            "TERMINACIONES",
            "FERRETERIA",
            "FUNDACIONES",
            "OBRA GRUESA",
            "IMPERMEABILIZANTES",
            "EIFS ENVOLVENTE TERMICO",
        ];
        sort_categories(&mut names);
        assert_eq!(
            names,
            vec![
                "FUNDACIONES",
                "OBRA GRUESA",
                "IMPERMEABILIZANTES",
                "EIFS ENVOLVENTE TERMICO",
                "TERMINACIONES",
                "FERRETERIA",
            ]
        );
    }

    #[test]
    fn test_normalize_collapses_punctuation_and_whitespace() {
        assert_eq!(
            normalize_category_name("  eifs—envolvente   térmico!"),
            "EIFS ENVOLVENTE TERMICO"
        );
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("EIFS – Envolvente Térmico"), "eifs-envolvente-termico");
        assert_eq!(slugify("  Obra  Gruesa  "), "obra-gruesa");
        assert_eq!(slugify("Ñandú & Cía."), "nandu-cia");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_build_category_tree_nests_and_orders() {
        let obra = category("Obra Gruesa", None);
        let fundaciones = category("Fundaciones", None);
        let jardin = category("Jardín", None);
        let cemento = category("Cemento", Some(obra.id));
        let aridos = category("Áridos", Some(obra.id));

        let tree = build_category_tree(vec![jardin, cemento, obra, aridos, fundaciones]);

        let names: Vec<&str> = tree.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Fundaciones", "Obra Gruesa", "Jardín"]);

        let children: Vec<&str> = tree[1].subcategories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(children, vec!["Áridos", "Cemento"]);
        assert_eq!(tree[0].rank, Some(0));
        assert_eq!(tree[2].rank, None);
    }
}
