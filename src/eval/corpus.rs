use std::path::Path;

use crate::error::EvalError;
use crate::pipeline::traits::CorpusFormat;
use crate::types::CorpusEntry;

/// Load the reference corpus through a format collaborator and zip the three
/// parallel arrays into entries.
///
/// `max_entries` truncates all three arrays identically; truncating one and
/// not another would corrupt alignment for every downstream stage, so the
/// length invariant is checked before the cap is applied.
pub fn load_corpus(
    format: &dyn CorpusFormat,
    path: &Path,
    max_entries: Option<usize>,
) -> Result<Vec<CorpusEntry>, EvalError> {
    let raw = format.load(path)?;
    if raw.graphs.len() != raw.serials.len() || raw.graphs.len() != raw.sentences.len() {
        return Err(EvalError::corpus(format!(
            "parallel arrays disagree: {} graphs, {} serials, {} sentences",
            raw.graphs.len(),
            raw.serials.len(),
            raw.sentences.len()
        )));
    }
    let cap = max_entries.unwrap_or(raw.graphs.len()).min(raw.graphs.len());
    let entries = raw
        .graphs
        .into_iter()
        .zip(raw.serials)
        .zip(raw.sentences)
        .take(cap)
        .map(|((graph, serial), sentence)| CorpusEntry {
            graph,
            serial,
            sentence,
        })
        .collect();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawCorpus;

    struct FixedCorpus(RawCorpus);

    impl CorpusFormat for FixedCorpus {
        fn load(&self, _path: &Path) -> Result<RawCorpus, EvalError> {
            Ok(self.0.clone())
        }
    }

    fn raw(n: usize) -> RawCorpus {
        RawCorpus {
            graphs: (0..n).map(|i| format!("(g{i} / graph)")).collect(),
            serials: (0..n).map(|i| format!("(g{i} / graph)")).collect(),
            sentences: (0..n).map(|i| format!("sentence {i}")).collect(),
        }
    }

    #[test]
    fn load_preserves_parallel_lengths() {
        let format = FixedCorpus(raw(4));
        let entries = load_corpus(&format, Path::new("unused"), None).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[2].sentence, "sentence 2");
        assert_eq!(entries[2].graph, "(g2 / graph)");
    }

    #[test]
    fn max_entries_truncates_all_fields_identically() {
        let format = FixedCorpus(raw(5));
        let entries = load_corpus(&format, Path::new("unused"), Some(2)).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].graph, "(g1 / graph)");
        assert_eq!(entries[1].serial, "(g1 / graph)");
        assert_eq!(entries[1].sentence, "sentence 1");
    }

    #[test]
    fn max_entries_beyond_corpus_is_harmless() {
        let format = FixedCorpus(raw(3));
        let entries = load_corpus(&format, Path::new("unused"), Some(10)).unwrap();
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn mismatched_parallel_arrays_are_fatal() {
        let mut bad = raw(3);
        bad.sentences.pop();
        let format = FixedCorpus(bad);
        let result = load_corpus(&format, Path::new("unused"), None);
        assert!(matches!(result, Err(EvalError::Corpus { .. })));
    }

    #[test]
    fn empty_corpus_loads_empty() {
        let format = FixedCorpus(raw(0));
        let entries = load_corpus(&format, Path::new("unused"), None).unwrap();
        assert!(entries.is_empty());
    }
}
