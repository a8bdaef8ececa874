//! Input method and table search by name.

use serde::Serialize;

use crate::method::InputMethod;
use crate::registry::{Registry, TableInfo, CUSTOM_TABLE_ID, WELL_KNOWN_TABLES};

/// One hit of a method search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSearchResult {
    /// Built-in method index, or `InputMethod::COUNT + table position`
    pub index: usize,
    pub name: &'static str,
    /// Table filename; empty for built-in methods
    pub filename: &'static str,
    pub method: InputMethod,
    pub table_id: u32,
    pub score: u32,
}

/// One hit of a table search, with details when the table is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableSearchResult {
    pub info: TableInfo,
    pub key_count: Option<u32>,
    pub max_press: Option<u32>,
    pub selection_keys: Option<String>,
    pub score: u32,
}

/// Score how well `query` matches `name`; 0 means no match.
///
/// An empty query matches everything with 100. Otherwise the query must
/// occur in the name (ASCII case-insensitive, other characters exact); the
/// score is `100 - byte offset of the match`, plus 50 for a prefix match,
/// and never below 1.
pub fn match_score(name: &str, query: &str) -> u32 {
    if query.is_empty() {
        return 100;
    }
    let query_chars = query.chars().count();
    for (start, _) in name.char_indices() {
        let rest = &name[start..];
        if rest.chars().count() < query_chars {
            break;
        }
        let matched = rest
            .chars()
            .zip(query.chars())
            .all(|(n, q)| n.eq_ignore_ascii_case(&q));
        if matched {
            let mut score = 100 - start as i64;
            if start == 0 {
                score += 50;
            }
            return score.max(1) as u32;
        }
    }
    0
}

/// Search built-in methods and well-known tables.
///
/// `filter` limits results to one method kind; tables are included only
/// without a filter or with `InputMethod::Table`. Results are ordered by
/// descending score, ties in registry order.
pub fn search_methods(query: &str, filter: Option<InputMethod>) -> Vec<MethodSearchResult> {
    let mut results = Vec::new();
    for method in InputMethod::ALL {
        if filter.is_some_and(|f| f != method) {
            continue;
        }
        let score = match_score(method.name(), query);
        if score > 0 {
            results.push(MethodSearchResult {
                index: method.index(),
                name: method.name(),
                filename: "",
                method,
                table_id: CUSTOM_TABLE_ID,
                score,
            });
        }
    }
    if filter.map_or(true, |f| f == InputMethod::Table) {
        for (i, table) in WELL_KNOWN_TABLES.iter().enumerate() {
            let score = match_score(table.name, query);
            if score > 0 {
                results.push(MethodSearchResult {
                    index: InputMethod::COUNT + i,
                    name: table.name,
                    filename: table.filename,
                    method: InputMethod::Table,
                    table_id: table.id,
                    score,
                });
            }
        }
    }
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results
}

/// Every built-in method and well-known table.
pub fn all_methods() -> Vec<MethodSearchResult> {
    search_methods("", None)
}

/// Search the well-known tables, reporting whether each hit is loaded.
/// Results stay in registry order.
pub fn search_tables(registry: &Registry, query: &str) -> Vec<TableSearchResult> {
    registry
        .tables()
        .into_iter()
        .filter_map(|info| {
            let score = match_score(info.name, query);
            if score == 0 {
                return None;
            }
            let loaded = registry.gtab(info.filename);
            Some(TableSearchResult {
                key_count: loaded.as_ref().map(|t| t.key_count),
                max_press: loaded.as_ref().map(|t| t.max_press),
                selection_keys: loaded.as_ref().map(|t| t.selection_keys.clone()),
                info,
                score,
            })
        })
        .collect()
}

/// Exact name lookup: built-in methods first, then tables offset by
/// `InputMethod::COUNT`.
pub fn find_method_by_name(name: &str) -> Option<usize> {
    InputMethod::ALL
        .iter()
        .position(|m| m.name() == name)
        .or_else(|| {
            WELL_KNOWN_TABLES
                .iter()
                .position(|t| t.name == name)
                .map(|i| InputMethod::COUNT + i)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::GtabTable;

    #[test]
    fn scores() {
        assert_eq!(match_score("anything", ""), 100);
        assert_eq!(match_score("注音 (Phonetic)", "注音"), 150);
        // "P" sits at byte 8
        assert_eq!(match_score("注音 (Phonetic)", "phonetic"), 92);
        assert_eq!(match_score("注音 (Phonetic)", "PHON"), 92);
        assert_eq!(match_score("注音 (Phonetic)", "zzz"), 0);
        assert_eq!(match_score("ab", "abc"), 0);
    }

    #[test]
    fn score_never_drops_below_one() {
        let name = format!("{}x", "a".repeat(150));
        assert_eq!(match_score(&name, "x"), 1);
    }

    #[test]
    fn empty_query_lists_everything() {
        let all = all_methods();
        assert_eq!(all.len(), InputMethod::COUNT + WELL_KNOWN_TABLES.len());
        assert_eq!(all[0].method, InputMethod::Phonetic);
        assert_eq!(all[InputMethod::COUNT].name, "倉頡");
    }

    #[test]
    fn search_sorts_by_score() {
        let results = search_methods("倉", None);
        assert!(results.len() >= 3);
        assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(results.iter().any(|r| r.filename == "cj.gtab"));
    }

    #[test]
    fn filter_limits_kinds() {
        let results = search_methods("", Some(InputMethod::Intcode));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].method, InputMethod::Intcode);

        let tables = search_methods("", Some(InputMethod::Table));
        assert_eq!(tables.len(), 1 + WELL_KNOWN_TABLES.len());
    }

    #[test]
    fn find_by_name() {
        assert_eq!(find_method_by_name("內碼 (Intcode)"), Some(5));
        assert_eq!(find_method_by_name("倉頡"), Some(InputMethod::COUNT));
        assert_eq!(find_method_by_name("大易"), Some(InputMethod::COUNT + 6));
        assert_eq!(find_method_by_name("nope"), None);
    }

    #[test]
    fn table_search_reports_loaded_details() {
        let mut registry = Registry::default();
        let mut table = GtabTable::new("大易", "abcdefghij", 4).unwrap();
        table.selection_keys = "1234".into();
        registry.insert_gtab("dayi3.gtab", table);

        let hits = search_tables(&registry, "大易");
        assert_eq!(hits.len(), 1);
        assert!(hits[0].info.loaded);
        assert_eq!(hits[0].key_count, Some(10));
        assert_eq!(hits[0].max_press, Some(4));
        assert_eq!(hits[0].selection_keys.as_deref(), Some("1234"));

        let unloaded = search_tables(&registry, "倉頡");
        assert!(unloaded.iter().all(|h| !h.info.loaded && h.key_count.is_none()));
    }
}
