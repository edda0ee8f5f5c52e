use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use thiserror::Error;

static TEXTS_DIR: Dir = include_dir!("src/texts");

/// Immutable named set of candidate target sentences.
#[derive(Deserialize, Clone, Debug)]
pub struct Corpus {
    pub name: String,
    pub texts: Vec<String>,
}

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("unknown corpus `{0}`")]
    Unknown(String),
    #[error("corpus `{0}` contains no texts")]
    Empty(String),
    #[error("malformed corpus file: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl Corpus {
    /// Load one of the embedded corpora by name.
    pub fn load(name: &str) -> Result<Self, CorpusError> {
        let file = TEXTS_DIR
            .get_file(format!("{name}.json"))
            .ok_or_else(|| CorpusError::Unknown(name.to_string()))?;
        let raw = file
            .contents_utf8()
            .ok_or_else(|| CorpusError::Unknown(name.to_string()))?;
        let corpus: Corpus = serde_json::from_str(raw)?;
        if corpus.texts.is_empty() {
            return Err(CorpusError::Empty(name.to_string()));
        }
        Ok(corpus)
    }

    /// Single fixed sentence, used for the `--text` override.
    pub fn from_text(text: String) -> Self {
        Self {
            name: "custom".to_string(),
            texts: vec![text],
        }
    }

    /// Names of all embedded corpora.
    pub fn embedded_names() -> Vec<String> {
        TEXTS_DIR
            .files()
            .filter_map(|f| f.path().file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .collect()
    }

    /// Pick one sentence uniformly at random.
    pub fn pick<R: Rng>(&self, rng: &mut R) -> &str {
        self.texts
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_default()
    }
}
