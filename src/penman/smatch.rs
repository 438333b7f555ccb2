//! Structural-similarity scoring over parsed graph pairs. This is a compact
//! approximation of the reference SMATCH matcher: greedy variable-mapping
//! seeded by concept identity, refined by hill-climbing remap/swap moves,
//! with match statistics accumulated globally across the corpus.

use std::collections::HashMap;

use crate::error::EvalError;
use crate::types::SmatchScore;

use super::{parse, triples, Triple};

const MAX_CLIMB_STEPS: usize = 50;

pub fn compute_smatch(test: &[String], gold: &[String]) -> Result<SmatchScore, EvalError> {
    if test.len() != gold.len() {
        return Err(EvalError::scoring(format!(
            "entry count mismatch: {} test vs {} gold",
            test.len(),
            gold.len()
        )));
    }
    if test.is_empty() {
        return Err(EvalError::scoring("no entries to score"));
    }
    let mut matched = 0usize;
    let mut test_total = 0usize;
    let mut gold_total = 0usize;
    for (idx, (t, g)) in test.iter().zip(gold.iter()).enumerate() {
        let t_node = parse(t)
            .map_err(|e| EvalError::scoring(format!("test entry {idx} unparsable: {e}")))?;
        let g_node = parse(g)
            .map_err(|e| EvalError::scoring(format!("gold entry {idx} unparsable: {e}")))?;
        let t_triples = triples(&t_node);
        let g_triples = triples(&g_node);
        matched += best_match_count(&t_triples, &g_triples);
        test_total += t_triples.len();
        gold_total += g_triples.len();
    }
    Ok(SmatchScore::from_counts(matched, test_total, gold_total))
}

/// Largest number of test triples that map onto gold triples under the best
/// variable mapping the climber finds.
fn best_match_count(test: &[Triple], gold: &[Triple]) -> usize {
    let test_vars = collect_variables(test);
    let gold_vars = collect_variables(gold);
    let gold_index = triple_multiset(gold, None);

    // Seed: pair up variables whose instance concepts agree.
    let mut used = vec![false; gold_vars.len()];
    let mut mapping: Vec<Option<usize>> = Vec::with_capacity(test_vars.len());
    for (_, concept) in &test_vars {
        let slot = gold_vars
            .iter()
            .enumerate()
            .find(|(j, (_, gc))| !used[*j] && gc == concept)
            .map(|(j, _)| j);
        if let Some(j) = slot {
            used[j] = true;
        }
        mapping.push(slot);
    }

    let score = |mapping: &[Option<usize>]| -> usize {
        mapped_match_count(test, mapping, &test_vars, &gold_vars, &gold_index)
    };
    let mut best = score(&mapping);

    for _ in 0..MAX_CLIMB_STEPS {
        let mut best_gain = 0isize;
        let mut best_move: Option<Vec<Option<usize>>> = None;
        // Remap one test variable to any free gold slot (or to nothing).
        for i in 0..mapping.len() {
            let mut candidates: Vec<Option<usize>> = (0..gold_vars.len())
                .filter(|j| !mapping.contains(&Some(*j)))
                .map(Some)
                .collect();
            candidates.push(None);
            for cand in candidates {
                if mapping[i] == cand {
                    continue;
                }
                let mut trial = mapping.clone();
                trial[i] = cand;
                let gain = score(&trial) as isize - best as isize;
                if gain > best_gain {
                    best_gain = gain;
                    best_move = Some(trial);
                }
            }
        }
        // Swap the images of two test variables.
        for i in 0..mapping.len() {
            for k in (i + 1)..mapping.len() {
                let mut trial = mapping.clone();
                trial.swap(i, k);
                let gain = score(&trial) as isize - best as isize;
                if gain > best_gain {
                    best_gain = gain;
                    best_move = Some(trial);
                }
            }
        }
        match best_move {
            Some(next) => {
                best += best_gain as usize;
                mapping = next;
            }
            None => break,
        }
    }
    best
}

/// (variable, instance concept) pairs in first-appearance order.
fn collect_variables(triples: &[Triple]) -> Vec<(String, String)> {
    triples
        .iter()
        .filter_map(|t| match t {
            Triple::Instance { var, concept } => Some((var.clone(), concept.clone())),
            _ => None,
        })
        .collect()
}

type TripleKey = (u8, String, String, String);

/// Multiset of triples with variables substituted through `mapping` when
/// given. Unmapped variables yield no key (the triple cannot match).
fn triple_multiset(
    triples: &[Triple],
    mapping: Option<(&[Option<usize>], &[(String, String)], &[(String, String)])>,
) -> HashMap<TripleKey, usize> {
    let mut out: HashMap<TripleKey, usize> = HashMap::new();
    for t in triples {
        if let Some(key) = triple_key(t, mapping) {
            *out.entry(key).or_insert(0) += 1;
        }
    }
    out
}

fn substitute(
    var: &str,
    mapping: Option<(&[Option<usize>], &[(String, String)], &[(String, String)])>,
) -> Option<String> {
    match mapping {
        None => Some(var.to_string()),
        Some((map, test_vars, gold_vars)) => {
            let idx = test_vars.iter().position(|(v, _)| v == var)?;
            let gold_idx = map[idx]?;
            Some(gold_vars[gold_idx].0.clone())
        }
    }
}

fn triple_key(
    triple: &Triple,
    mapping: Option<(&[Option<usize>], &[(String, String)], &[(String, String)])>,
) -> Option<TripleKey> {
    match triple {
        Triple::Instance { var, concept } => Some((
            b'I',
            substitute(var, mapping)?,
            concept.clone(),
            String::new(),
        )),
        Triple::Relation {
            role,
            source,
            target,
        } => Some((
            b'R',
            role.clone(),
            substitute(source, mapping)?,
            substitute(target, mapping)?,
        )),
        Triple::Attribute { role, var, value } => Some((
            b'A',
            role.clone(),
            substitute(var, mapping)?,
            value.clone(),
        )),
    }
}

fn mapped_match_count(
    test: &[Triple],
    mapping: &[Option<usize>],
    test_vars: &[(String, String)],
    gold_vars: &[(String, String)],
    gold_index: &HashMap<TripleKey, usize>,
) -> usize {
    let mut remaining = gold_index.clone();
    let mut matched = 0usize;
    for t in test {
        let Some(key) = triple_key(t, Some((mapping, test_vars, gold_vars))) else {
            continue;
        };
        if let Some(count) = remaining.get_mut(&key) {
            if *count > 0 {
                *count -= 1;
                matched += 1;
            }
        }
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_graphs_score_one() {
        let entries = vec![
            "(w / want-01 :ARG0 (b / boy) :ARG1 (g / go-02 :ARG0 b))".to_string(),
            "(a / alpha :mod (c / beta))".to_string(),
        ];
        let score = compute_smatch(&entries, &entries.clone()).unwrap();
        assert!((score.precision - 1.0).abs() < 1e-12);
        assert!((score.recall - 1.0).abs() < 1e-12);
        assert!((score.f_score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn identical_up_to_variable_names_scores_one() {
        let test = vec!["(x1 / want-01 :ARG0 (x2 / boy))".to_string()];
        let gold = vec!["(w / want-01 :ARG0 (b / boy))".to_string()];
        let score = compute_smatch(&test, &gold).unwrap();
        assert!((score.f_score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn disjoint_graphs_score_low() {
        let test = vec!["(d / deserialization-failure)".to_string()];
        let gold = vec!["(w / want-01 :ARG0 (b / boy))".to_string()];
        let score = compute_smatch(&test, &gold).unwrap();
        assert!(score.f_score < 0.5);
    }

    #[test]
    fn partial_overlap_scores_between() {
        let test = vec!["(w / want-01 :ARG0 (b / boy))".to_string()];
        let gold = vec!["(w / want-01 :ARG0 (b / boy) :ARG1 (g / go-02))".to_string()];
        let score = compute_smatch(&test, &gold).unwrap();
        assert!((score.precision - 1.0).abs() < 1e-12);
        assert!(score.recall < 1.0);
        assert!(score.f_score > 0.0 && score.f_score < 1.0);
    }

    #[test]
    fn duplicate_concepts_resolved_by_climbing() {
        // Greedy seeding can pair the wrong `thing` variables; the swap move
        // must recover the full match.
        let test = vec!["(a / and :op1 (t1 / thing :mod (x / big)) :op2 (t2 / thing))".to_string()];
        let gold = vec!["(a / and :op1 (p / thing) :op2 (q / thing :mod (y / big)))".to_string()];
        let score = compute_smatch(&test, &gold).unwrap();
        // Everything matches except which `thing` carries :mod big; the
        // climber must not do worse than the obvious alignment.
        assert!(score.f_score >= 6.0 / 7.0 - 1e-12);
    }

    #[test]
    fn length_mismatch_is_error() {
        let test = vec!["(a / alpha)".to_string()];
        let gold = vec!["(a / alpha)".to_string(), "(b / beta)".to_string()];
        assert!(matches!(
            compute_smatch(&test, &gold),
            Err(EvalError::Scoring { .. })
        ));
    }

    #[test]
    fn empty_input_is_error() {
        assert!(matches!(
            compute_smatch(&[], &[]),
            Err(EvalError::Scoring { .. })
        ));
    }

    #[test]
    fn metadata_lines_are_ignored_for_scoring() {
        let test = vec!["# ::snt the boy wants\n(w / want-01)".to_string()];
        let gold = vec!["(w / want-01)".to_string()];
        let score = compute_smatch(&test, &gold).unwrap();
        assert!((score.f_score - 1.0).abs() < 1e-12);
    }
}
