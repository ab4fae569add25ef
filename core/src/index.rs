use crate::error::{Error, Result};
use crate::score;
use crate::tokenizer::count_terms;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub type TermId = u32;
pub type DocId = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub name: String,
    /// Last computed idf; 0 until the first recompute.
    pub idf: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub path: PathBuf,
    /// Occurrences per term, indexed by `TermId`.
    pub counts: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub path: PathBuf,
    pub score: f64,
}

/// Vocabulary, corpus and the last ranked result.
///
/// Terms can only be added while the corpus is empty; once the first file is
/// registered every document carries exactly one count per term.
#[derive(Debug, Default)]
pub struct TfIdfIndex {
    dictionary: HashMap<String, TermId>,
    terms: Vec<Term>,
    doc_id_map: HashMap<PathBuf, DocId>,
    docs: Vec<Document>,
    results: Vec<ScoredDocument>,
}

impl TfIdfIndex {
    pub fn new() -> Self { Self::default() }

    /// Register a vocabulary term.
    ///
    /// Re-adding a known term keeps its position and resets its idf.
    pub fn add_term(&mut self, name: &str) -> Result<()> {
        if !self.docs.is_empty() {
            tracing::error!(term = name, documents = self.docs.len(), "unable to add terms once files are registered");
            return Err(Error::VocabularyFrozen { documents: self.docs.len() });
        }

        match self.dictionary.get(name) {
            Some(&tid) => self.terms[tid as usize].idf = 0.0,
            None => {
                let tid = self.terms.len() as TermId;
                self.dictionary.insert(name.to_string(), tid);
                self.terms.push(Term { name: name.to_string(), idf: 0.0 });
            }
        }
        tracing::trace!(term = name, "term registered");
        Ok(())
    }

    /// Register a file and count the vocabulary terms in it.
    ///
    /// The file is read exactly once. A file that cannot be read is still
    /// registered, with a zero count for every term.
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        if self.terms.is_empty() {
            tracing::error!(path = %path.display(), "unable to add files with no terms defined");
            return Err(Error::EmptyVocabulary);
        }
        if self.doc_id_map.contains_key(path) {
            tracing::debug!(path = %path.display(), "file already registered");
            return Ok(());
        }

        tracing::debug!(path = %path.display(), "new text file found");
        let counts = match fs::read_to_string(path) {
            Ok(text) => {
                let names: Vec<&str> = self.terms.iter().map(|t| t.name.as_str()).collect();
                count_terms(&text, &names)
            }
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "error reading file, registering without occurrences");
                vec![0; self.terms.len()]
            }
        };
        for (term, count) in self.terms.iter().zip(&counts) {
            tracing::debug!(path = %path.display(), term = %term.name, count, "term occurrences");
        }

        let doc_id = self.docs.len() as DocId;
        self.doc_id_map.insert(path.to_path_buf(), doc_id);
        self.docs.push(Document { path: path.to_path_buf(), counts });
        Ok(())
    }

    pub fn terms(&self) -> &[Term] { &self.terms }

    pub fn documents(&self) -> &[Document] { &self.docs }

    pub fn num_docs(&self) -> usize { self.docs.len() }

    /// Ranked top-`k` documents.
    ///
    /// With `recompute == false` the previous ranking is returned untouched,
    /// whatever `k` is. Otherwise idfs and scores are recomputed from the
    /// current corpus before ranking.
    pub fn compute_results(&mut self, recompute: bool, k: usize) -> &[ScoredDocument] {
        if recompute {
            self.update_all_idfs();
            self.results = self.rank_documents(k);
        }
        &self.results
    }

    /// Raw occurrence count of `term` in the document at `path`, or 0 when
    /// either is unknown.
    pub fn term_frequency<P: AsRef<Path>>(&self, path: P, term: &str) -> u64 {
        let path = path.as_ref();
        let Some(&doc_id) = self.doc_id_map.get(path) else {
            tracing::error!(path = %path.display(), "file not registered");
            return 0;
        };
        let Some(&tid) = self.dictionary.get(term) else {
            tracing::error!(term, "term not registered");
            return 0;
        };
        self.docs[doc_id as usize].counts[tid as usize]
    }

    /// Last computed idf of `term`, or 0 when it is unknown.
    pub fn idf(&self, term: &str) -> f64 {
        match self.dictionary.get(term) {
            Some(&tid) => self.terms[tid as usize].idf,
            None => {
                tracing::error!(term, "term not registered");
                0.0
            }
        }
    }

    /// Rounded weight of `term` in the document at `path`.
    pub fn tf_idf<P: AsRef<Path>>(&self, path: P, term: &str) -> f64 {
        score::term_weight(self.term_frequency(path, term), self.idf(term))
    }

    fn update_all_idfs(&mut self) {
        tracing::debug!(terms = self.terms.len(), "updating idf");
        let total = self.docs.len();
        for (tid, term) in self.terms.iter_mut().enumerate() {
            let containing = self.docs.iter().filter(|d| d.counts[tid] > 0).count();
            tracing::debug!(term = %term.name, containing, total, "document frequency");
            term.idf = match score::inverse_document_frequency(total, containing) {
                Some(idf) => idf,
                None => {
                    tracing::warn!(term = %term.name, "term has no occurrences, considering idf=0");
                    0.0
                }
            };
            tracing::debug!(term = %term.name, idf = term.idf, "idf updated");
        }
    }

    fn rank_documents(&self, k: usize) -> Vec<ScoredDocument> {
        let idfs: Vec<f64> = self.terms.iter().map(|t| t.idf).collect();
        let scored: Vec<(&Path, f64)> = self
            .docs
            .iter()
            .map(|doc| {
                let score = score::document_score(&doc.counts, &idfs);
                tracing::debug!(path = %doc.path.display(), score, "total tf-idf");
                (doc.path.as_path(), score)
            })
            .collect();

        score::rank(scored, k)
            .into_iter()
            .map(|(path, score)| ScoredDocument { path: path.to_path_buf(), score })
            .collect()
    }
}
