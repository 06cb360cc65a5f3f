//! Structural checks for definitions.
//!
//! [`validate`] inspects a [`Definition`] and reports every structural problem
//! it finds as a [`Diagnostic`]. The graph builder copes with all of them
//! (dangling sources lose their edge, repeated ids keep their first node).
//! Hosts deciding whether to show a definition use [`ensure_valid`], which
//! refuses errors and honours the strict flag from [`ValidationConfig`].

use std::collections::{HashMap, HashSet};

use petgraph::{algo, graph::DiGraph};

use etymon_core::{
    definition::Definition,
    diagnostic::{Diagnostic, DiagnosticCode},
    identifier::Id,
};

use super::INPUT_NODE_ID;
use crate::{config::ValidationConfig, error::EtymonError};

/// Runs every structural check on `definition`.
///
/// When `word` is given, the final combination is also compared against it.
/// Diagnostics are returned in check order; an empty list means the
/// definition is clean.
///
/// # Examples
///
/// ```
/// # use etymon::structure::validate::validate;
/// # use etymon_core::definition::Definition;
/// let diagnostics = validate(&Definition::placeholder(), Some("Deconstructor"));
/// assert!(diagnostics.is_empty());
/// ```
pub fn validate(definition: &Definition, word: Option<&str>) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    check_duplicate_ids(definition, &mut diagnostics);
    check_sources(definition, &mut diagnostics);
    check_cycles(definition, &mut diagnostics);
    check_final_layer(definition, word, &mut diagnostics);

    if definition.parts().is_empty() {
        diagnostics.push(
            Diagnostic::warning(DiagnosticCode::D007, "definition has no parts")
                .with_help("an analysis should split the word into at least one part"),
        );
    }

    diagnostics
}

/// Validates `definition` and decides whether it may be shown.
///
/// Error diagnostics always reject the definition. Warnings are returned for
/// reporting, unless strict mode is on, in which case they reject it too.
///
/// # Errors
///
/// Returns [`EtymonError::Invalid`] carrying every diagnostic when the
/// definition is rejected.
pub fn ensure_valid(
    definition: &Definition,
    word: Option<&str>,
    config: &ValidationConfig,
) -> Result<Vec<Diagnostic>, EtymonError> {
    let diagnostics = validate(definition, word);

    let rejected = if config.is_strict() {
        !diagnostics.is_empty()
    } else {
        diagnostics.iter().any(|d| d.severity().is_error())
    };

    if rejected {
        Err(EtymonError::new_invalid(diagnostics))
    } else {
        Ok(diagnostics)
    }
}

fn check_duplicate_ids(definition: &Definition, diagnostics: &mut Vec<Diagnostic>) {
    let mut seen: HashSet<String> = HashSet::from([INPUT_NODE_ID.to_string()]);
    let mut reported = HashSet::new();

    let part_ids = definition.parts().iter().flat_map(|part| {
        let origin = Id::origin_of(Id::new(part.id())).to_string();
        [part.id().to_string(), origin]
    });
    let combination_ids = definition
        .combinations()
        .map(|(_, combination)| combination.id().to_string());

    for id in part_ids.chain(combination_ids) {
        if !seen.insert(id.clone()) && reported.insert(id.clone()) {
            diagnostics.push(
                Diagnostic::error(DiagnosticCode::D001, format!("id `{id}` is used more than once"))
                    .with_help("every part, origin and combination needs its own id"),
            );
        }
    }
}

fn check_sources(definition: &Definition, diagnostics: &mut Vec<Diagnostic>) {
    let layer_of: HashMap<&str, usize> = definition
        .combinations()
        .map(|(layer_idx, combination)| (combination.id(), layer_idx))
        .collect();

    for (layer_idx, combination) in definition.combinations() {
        for source in combination.source_ids() {
            if definition.part(source).is_some() {
                continue;
            }

            match layer_of.get(source.as_str()) {
                None => diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticCode::D002,
                        format!(
                            "combination `{}` refers to `{source}`, which is not defined",
                            combination.id()
                        ),
                    )
                    .with_help("the edge from this source is left out of the graph"),
                ),
                Some(&source_layer) if source_layer >= layer_idx => diagnostics.push(
                    Diagnostic::error(
                        DiagnosticCode::D003,
                        format!(
                            "combination `{}` in layer {} draws on `{source}` from layer {}",
                            combination.id(),
                            layer_idx + 1,
                            source_layer + 1
                        ),
                    )
                    .with_help("sources must come from parts or strictly earlier layers"),
                ),
                Some(_) => {}
            }
        }
    }
}

fn check_cycles(definition: &Definition, diagnostics: &mut Vec<Diagnostic>) {
    let mut graph = DiGraph::<&str, ()>::new();
    let mut indices = HashMap::new();

    for (_, combination) in definition.combinations() {
        indices
            .entry(combination.id())
            .or_insert_with(|| graph.add_node(combination.id()));
    }

    for (_, combination) in definition.combinations() {
        let target = indices[combination.id()];
        for source in combination.source_ids() {
            if definition.part(source).is_some() {
                continue;
            }
            if let Some(&source_idx) = indices.get(source.as_str()) {
                graph.add_edge(source_idx, target, ());
            }
        }
    }

    if let Err(cycle) = algo::toposort(&graph, None) {
        let id = graph[cycle.node_id()];
        diagnostics.push(
            Diagnostic::error(
                DiagnosticCode::D004,
                format!("combination `{id}` depends on itself through its sources"),
            )
            .with_help("combination references must form a directed acyclic graph"),
        );
    }
}

fn check_final_layer(definition: &Definition, word: Option<&str>, diagnostics: &mut Vec<Diagnostic>) {
    let Some(last) = definition.final_combination() else {
        let count = definition.layers().last().map_or(0, Vec::len);
        diagnostics.push(
            Diagnostic::warning(
                DiagnosticCode::D005,
                format!("final layer holds {count} combinations instead of one"),
            )
            .with_help("the last layer should contain only the analyzed word"),
        );
        return;
    };

    let mismatch = word.filter(|word| last.text().to_lowercase() != word.trim().to_lowercase());
    if let Some(word) = mismatch {
        diagnostics.push(Diagnostic::warning(
            DiagnosticCode::D006,
            format!(
                "final combination `{}` does not spell `{}`",
                last.text(),
                word.trim()
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use etymon_core::definition::{Combination, MorphemePart};

    use super::*;

    fn part(id: &str) -> MorphemePart {
        MorphemePart::new(id, id, id, "Latin", "gloss")
    }

    fn combination(id: &str, sources: &[&str]) -> Combination {
        Combination::new(id, id, "", sources.iter().copied())
    }

    fn codes(diagnostics: &[Diagnostic]) -> Vec<DiagnosticCode> {
        diagnostics.iter().map(Diagnostic::code).collect()
    }

    #[test]
    fn test_placeholder_is_clean() {
        assert!(validate(&Definition::placeholder(), None).is_empty());
    }

    #[test]
    fn test_duplicate_id_reported_once() {
        let definition = Definition::new(
            "",
            vec![part("a"), part("a")],
            vec![vec![combination("a", &["a"])]],
        );
        let diagnostics = validate(&definition, None);

        let duplicates: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.code() == DiagnosticCode::D001)
            .collect();
        // `a` and `origin-a`
        assert_eq!(duplicates.len(), 2);
        assert!(duplicates.iter().all(|d| d.severity().is_error()));
    }

    #[test]
    fn test_dangling_source_is_warning() {
        let definition = Definition::new(
            "",
            vec![part("a")],
            vec![vec![combination("ab", &["a", "b"])]],
        );
        let diagnostics = validate(&definition, None);

        assert_eq!(codes(&diagnostics), [DiagnosticCode::D002]);
        assert!(diagnostics[0].severity().is_warning());
        assert!(diagnostics[0].message().contains("`b`"));
    }

    #[test]
    fn test_same_layer_source_is_error() {
        let definition = Definition::new(
            "",
            vec![part("a")],
            vec![
                vec![combination("x", &["a"]), combination("y", &["x"])],
                vec![combination("z", &["y"])],
            ],
        );
        let diagnostics = validate(&definition, None);
        assert_eq!(codes(&diagnostics), [DiagnosticCode::D003]);
    }

    #[test]
    fn test_cycle_is_detected() {
        let definition = Definition::new(
            "",
            vec![part("a")],
            vec![
                vec![combination("x", &["a", "y"])],
                vec![combination("y", &["x"])],
            ],
        );
        let diagnostics = validate(&definition, None);

        assert!(codes(&diagnostics).contains(&DiagnosticCode::D003));
        assert!(codes(&diagnostics).contains(&DiagnosticCode::D004));
    }

    #[test]
    fn test_final_layer_must_be_single() {
        let definition = Definition::new(
            "",
            vec![part("a"), part("b")],
            vec![vec![combination("x", &["a"]), combination("y", &["b"])]],
        );
        let diagnostics = validate(&definition, None);
        assert_eq!(codes(&diagnostics), [DiagnosticCode::D005]);
    }

    #[test]
    fn test_final_text_compared_case_insensitively() {
        let definition = Definition::placeholder();

        assert!(validate(&definition, Some(" DECONSTRUCTOR ")).is_empty());

        let diagnostics = validate(&definition, Some("constructor"));
        assert_eq!(codes(&diagnostics), [DiagnosticCode::D006]);
    }

    #[test]
    fn test_empty_definition() {
        let diagnostics = validate(&Definition::new("", vec![], vec![]), None);
        assert_eq!(
            codes(&diagnostics),
            [DiagnosticCode::D005, DiagnosticCode::D007]
        );
    }

    #[test]
    fn test_ensure_valid_lenient_accepts_warnings() {
        let definition = Definition::new(
            "",
            vec![part("a")],
            vec![vec![combination("ab", &["a", "b"])]],
        );

        let warnings = ensure_valid(&definition, None, &ValidationConfig::default())
            .expect("warnings are accepted");
        assert_eq!(warnings.len(), 1);

        let strict = ensure_valid(&definition, None, &ValidationConfig::new(true));
        assert!(matches!(strict, Err(EtymonError::Invalid { .. })));
    }

    #[test]
    fn test_ensure_valid_rejects_errors_in_every_mode() {
        let definition = Definition::new(
            "",
            vec![part("a")],
            vec![vec![combination("x", &["x"])]],
        );

        for config in [ValidationConfig::default(), ValidationConfig::new(true)] {
            match ensure_valid(&definition, None, &config) {
                Err(EtymonError::Invalid { diagnostics }) => {
                    assert!(codes(&diagnostics).contains(&DiagnosticCode::D003));
                    assert!(codes(&diagnostics).contains(&DiagnosticCode::D004));
                }
                other => panic!("expected invalid definition, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_ensure_valid_rejects_duplicate_ids() {
        let definition = Definition::new(
            "",
            vec![part("read"), part("er")],
            vec![vec![combination("read", &["read", "er"])]],
        );

        match ensure_valid(&definition, Some("read"), &ValidationConfig::default()) {
            Err(EtymonError::Invalid { diagnostics }) => {
                assert_eq!(codes(&diagnostics), [DiagnosticCode::D001]);
            }
            other => panic!("expected invalid definition, got {other:?}"),
        }
    }
}
