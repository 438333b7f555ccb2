use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{DeserializeError, EvalError};
use crate::penman;
use crate::pipeline::traits::{CorpusFormat, GraphCodec, GraphModel, SmatchBackend};
use crate::types::{RawCorpus, SmatchScore};

/// Standard AMR corpus file: blank-line-separated blocks, each with `# ::`
/// metadata lines (the `::snt` line carries the sentence) followed by the
/// graph. The serial form is the flattened single-line graph.
pub struct AmrBlockCorpus;

impl CorpusFormat for AmrBlockCorpus {
    fn load(&self, path: &Path) -> Result<RawCorpus, EvalError> {
        let data =
            std::fs::read_to_string(path).map_err(|e| EvalError::io("read corpus file", e))?;
        let mut raw = RawCorpus::default();
        for (block_idx, block) in split_blocks(&data).into_iter().enumerate() {
            let sentence = block
                .lines()
                .find_map(|line| line.trim().strip_prefix("# ::snt "))
                .ok_or_else(|| {
                    EvalError::corpus(format!("corpus block {block_idx} has no ::snt line"))
                })?
                .trim()
                .to_string();
            let node = penman::parse(&block).map_err(|e| {
                EvalError::corpus(format!("corpus block {block_idx} is not a valid graph: {e}"))
            })?;
            raw.graphs.push(block);
            raw.serials.push(penman::linearize(&node));
            raw.sentences.push(sentence);
        }
        Ok(raw)
    }
}

fn split_blocks(data: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current = String::new();
    for line in data.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

/// Default codec: a candidate deserializes if it parses as a PENMAN
/// expression; the canonical re-rendering is what gets persisted.
pub struct PenmanCodec;

impl GraphCodec for PenmanCodec {
    fn deserialize(&self, text: &str) -> Result<String, DeserializeError> {
        let node = penman::parse(text)?;
        Ok(penman::to_graph_string(&node))
    }
}

/// Default scoring backend over parsed triples. See [`crate::penman::smatch`].
pub struct TripleSmatch;

impl SmatchBackend for TripleSmatch {
    fn compute(
        &self,
        test_entries: &[String],
        gold_entries: &[String],
    ) -> Result<SmatchScore, EvalError> {
        penman::smatch::compute_smatch(test_entries, gold_entries)
    }
}

#[derive(Debug, Deserialize)]
struct CandidateRecord {
    sentence: String,
    candidates: Vec<String>,
}

/// Offline model backend: serves pre-generated beam candidates from a
/// JSON-lines file keyed by sentence. Lets the report binary run the full
/// pipeline without an accelerator; a sentence missing from the file simply
/// has no candidates and falls through to the placeholder path.
pub struct CandidateFileModel {
    by_sentence: HashMap<String, Vec<String>>,
}

impl CandidateFileModel {
    pub fn load(path: &Path) -> Result<Self, EvalError> {
        let data =
            std::fs::read_to_string(path).map_err(|e| EvalError::io("read candidates file", e))?;
        let mut by_sentence = HashMap::new();
        for line in data.lines().filter(|l| !l.trim().is_empty()) {
            let record: CandidateRecord = serde_json::from_str(line)
                .map_err(|e| EvalError::json("parse candidates line", e))?;
            by_sentence.insert(record.sentence, record.candidates);
        }
        Ok(Self { by_sentence })
    }
}

impl GraphModel for CandidateFileModel {
    fn generate_batch(
        &self,
        sentences: &[String],
        num_beams: usize,
    ) -> Result<Vec<Vec<String>>, EvalError> {
        Ok(sentences
            .iter()
            .map(|sentence| {
                let mut beams = self
                    .by_sentence
                    .get(sentence)
                    .cloned()
                    .unwrap_or_default();
                beams.truncate(num_beams);
                beams
            })
            .collect())
    }

    fn device_label(&self) -> String {
        "candidate-file".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const CORPUS: &str = "\
# ::id 1
# ::snt The boy wants to go.
(w / want-01
      :ARG0 (b / boy)
      :ARG1 (g / go-02
            :ARG0 b))

# ::id 2
# ::snt It rains.
(r / rain-01)
";

    #[test]
    fn amr_block_corpus_parses_parallel_arrays() {
        let temp_dir = std::env::temp_dir();
        let path = temp_dir.join("amr_eval_defaults_corpus.txt");
        fs::write(&path, CORPUS).expect("write corpus");
        let raw = AmrBlockCorpus.load(&path).expect("load");
        assert_eq!(raw.graphs.len(), 2);
        assert_eq!(raw.serials.len(), 2);
        assert_eq!(raw.sentences.len(), 2);
        assert_eq!(raw.sentences[0], "The boy wants to go.");
        assert_eq!(raw.sentences[1], "It rains.");
        assert!(raw.graphs[0].starts_with("# ::id 1"));
        assert_eq!(
            raw.serials[0],
            "(w / want-01 :ARG0 (b / boy) :ARG1 (g / go-02 :ARG0 b))"
        );
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn amr_block_corpus_rejects_block_without_sentence() {
        let temp_dir = std::env::temp_dir();
        let path = temp_dir.join("amr_eval_defaults_corpus_nosnt.txt");
        fs::write(&path, "# ::id 1\n(r / rain-01)\n").expect("write corpus");
        let result = AmrBlockCorpus.load(&path);
        assert!(matches!(result, Err(EvalError::Corpus { .. })));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn penman_codec_accepts_valid_and_rejects_invalid() {
        let codec = PenmanCodec;
        let graph = codec
            .deserialize("(w / want-01 :ARG0 (b / boy))")
            .expect("valid candidate");
        assert!(graph.starts_with("(w / want-01"));
        assert!(codec.deserialize("(w / want-01 :ARG0").is_err());
        assert!(codec.deserialize("not a graph at all").is_err());
    }

    #[test]
    fn candidate_file_model_serves_beams_in_order() {
        let temp_dir = std::env::temp_dir();
        let path = temp_dir.join("amr_eval_defaults_candidates.jsonl");
        let jsonl = concat!(
            "{\"sentence\": \"It rains.\", \"candidates\": [\"(r / rain-01)\", \"(r / rain-01 :mod (h / heavy))\"]}\n",
            "{\"sentence\": \"Unused.\", \"candidates\": [\"(u / unused)\"]}\n",
        );
        fs::write(&path, jsonl).expect("write candidates");
        let model = CandidateFileModel::load(&path).expect("load");
        let batch = vec!["It rains.".to_string(), "Unknown sentence.".to_string()];
        let beams = model.generate_batch(&batch, 1).expect("generate");
        assert_eq!(beams.len(), 2);
        assert_eq!(beams[0], vec!["(r / rain-01)".to_string()]);
        assert!(beams[1].is_empty());
        let _ = fs::remove_file(&path);
    }
}
