use async_trait::async_trait;

use super::interface::{Entity, EntityRecognizer};
use crate::inference_service::InferenceError;

const MOCK_LABEL: &str = "MISC";

/// Capitalisation heuristic standing in for the real pipeline.
///
/// Runs of capitalised words are reported as `MISC` entities, except for the word
/// opening a sentence. Punctuation closes a run.
#[derive(Debug, Default)]
pub struct MockEntityRecognizer;

impl MockEntityRecognizer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EntityRecognizer for MockEntityRecognizer {
    async fn recognize(&self, text: &str) -> Result<Vec<Entity>, InferenceError> {
        Ok(capitalised_runs(text))
    }

    fn name(&self) -> &str {
        "mock-ner"
    }
}

fn capitalised_runs(text: &str) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut run: Vec<&str> = Vec::new();
    let mut sentence_start = true;

    for raw in text.split_whitespace() {
        let word = raw.trim_matches(|c: char| !c.is_alphanumeric());
        let capitalised = word.chars().next().is_some_and(char::is_uppercase);

        if capitalised && !sentence_start {
            run.push(word);
        } else {
            flush(&mut run, &mut entities);
        }

        if raw.ends_with(['.', '!', '?', ',', ';', ':']) {
            flush(&mut run, &mut entities);
        }
        sentence_start = raw.ends_with(['.', '!', '?']);
    }
    flush(&mut run, &mut entities);

    entities
}

fn flush(run: &mut Vec<&str>, entities: &mut Vec<Entity>) {
    if !run.is_empty() {
        entities.push(Entity::new(run.join(" "), MOCK_LABEL));
        run.clear();
    }
}
