use std::path::Path;

use anyhow::{Context, Result, anyhow};
use rand::Rng;

/// Passages served when no corpus file is configured.
pub const DEFAULT_PASSAGES: [&str; 5] = [
    "The quick brown fox jumps over the lazy dog.",
    "To be or not to be, that is the question.",
    "All that glitters is not gold.",
    "A journey of a thousand miles begins with a single step.",
    "Practice makes perfect, but nobody's perfect, so why practice?",
];

/// Fixed pool of practice passages. Never empty.
#[derive(Debug, Clone)]
pub struct PassageProvider {
    passages: Vec<String>,
}

impl PassageProvider {
    /// Parse a corpus with one passage per line. Blank lines and lines
    /// starting with `#` are skipped.
    pub fn new(corpus: &str) -> Result<Self> {
        let passages: Vec<String> = corpus
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();

        if passages.is_empty() {
            return Err(anyhow!("Passage corpus contains no passages"));
        }

        Ok(Self { passages })
    }

    pub fn builtin() -> Self {
        Self {
            passages: DEFAULT_PASSAGES.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let corpus = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read passages from {}", path.display()))?;
        let provider = Self::new(&corpus)?;
        tracing::info!("Loaded {} passages from {}", provider.len(), path.display());
        Ok(provider)
    }

    /// Pick a passage uniformly at random.
    pub fn random_passage(&self) -> &str {
        self.choose(&mut rand::thread_rng())
    }

    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        let index = rng.gen_range(0..self.passages.len());
        &self.passages[index]
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    pub fn contains(&self, passage: &str) -> bool {
        self.passages.iter().any(|p| p == passage)
    }
}

impl Default for PassageProvider {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_builtin_corpus() {
        let provider = PassageProvider::builtin();
        assert_eq!(provider.len(), 5);
        assert!(provider.contains("All that glitters is not gold."));
    }

    #[test]
    fn test_random_passage_comes_from_corpus() {
        let provider = PassageProvider::builtin();
        for _ in 0..50 {
            assert!(provider.contains(provider.random_passage()));
        }
    }

    #[test]
    fn test_choose_covers_whole_corpus() {
        let provider = PassageProvider::builtin();
        let mut rng = StdRng::seed_from_u64(7);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(provider.choose(&mut rng).to_string());
        }
        assert_eq!(seen.len(), provider.len());
    }

    #[test]
    fn test_corpus_parsing() {
        let corpus = "# warmups\nFirst passage.\n\n   Second passage.   \n# done";
        let provider = PassageProvider::new(corpus).unwrap();
        assert_eq!(provider.len(), 2);
        assert!(provider.contains("Second passage."));
    }

    #[test]
    fn test_empty_corpus_is_rejected() {
        assert!(PassageProvider::new("# only comments\n\n").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(PassageProvider::from_file("/nonexistent/passages.txt").is_err());
    }
}
