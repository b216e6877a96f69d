use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::models::CategoryRecord;

pub const PATH_SEPARATOR: &str = " > ";

/// Deepest level the category tree allows (root = 1).
pub const MAX_CATEGORY_DEPTH: u8 = 3;

/// Build the "Root > Child > Leaf" path for every category, keyed by id.
///
/// A parent id that doesn't resolve ends the walk, so a category orphaned by a
/// half-finished edit still gets a partial path. A cycle also ends the walk at
/// the first repeated id.
pub fn resolve_all(categories: &[CategoryRecord]) -> BTreeMap<i64, String> {
    let by_id: HashMap<i64, &CategoryRecord> = categories.iter().map(|c| (c.id, c)).collect();
    categories
        .iter()
        .map(|c| (c.id, path_for(c, &by_id)))
        .collect()
}

/// Unique category paths in lexicographic order, as shown in the dropdown.
pub fn resolve_dropdown_list(categories: &[CategoryRecord]) -> Vec<String> {
    resolve_all(categories)
        .into_values()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn path_for(leaf: &CategoryRecord, by_id: &HashMap<i64, &CategoryRecord>) -> String {
    let mut names = vec![leaf.name.as_str()];
    let mut seen = HashSet::from([leaf.id]);
    let mut parent = leaf.parent_id;

    while let Some(id) = parent {
        let Some(cat) = by_id.get(&id) else {
            tracing::debug!(category = leaf.id, missing_parent = id, "category parent not found");
            break;
        };
        if !seen.insert(cat.id) {
            tracing::warn!(category = leaf.id, "cycle in category tree");
            break;
        }
        names.push(cat.name.as_str());
        parent = cat.parent_id;
    }

    if names.len() > MAX_CATEGORY_DEPTH as usize {
        tracing::warn!(
            category = leaf.id,
            depth = names.len(),
            "category deeper than {MAX_CATEGORY_DEPTH} levels"
        );
    }

    names.reverse();
    names.join(PATH_SEPARATOR)
}
