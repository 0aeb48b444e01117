use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, trace};

use super::formatting::sentence_case;
use crate::registry::{Registry, Segment, SentenceTemplate};

pub const MIN_SENTENCES: usize = 3;
pub const MAX_SENTENCES: usize = 5;
pub const TARGET_CHAR_LENGTH: usize = 120;
/// Total builds allowed when trying to avoid the previous paragraph
pub const MAX_ATTEMPTS: usize = 5;

const SEED_SEPARATOR: &str = "|";

/// A rendered paragraph plus the seed recording every choice made to build it.
///
/// Two paragraphs are the same paragraph exactly when their seeds are equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedParagraph {
    pub text: String,
    pub seed: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SeedToken {
    Template(usize),
    Slot { slot: String, index: usize },
}

impl SeedToken {
    fn parse(token: &str) -> Option<Self> {
        if let Some((slot, index)) = token.rsplit_once(':') {
            return Some(SeedToken::Slot {
                slot: slot.to_string(),
                index: index.parse().ok()?,
            });
        }
        token
            .strip_prefix('t')
            .and_then(|index| index.parse().ok())
            .map(SeedToken::Template)
    }
}

impl fmt::Display for SeedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedToken::Template(index) => write!(f, "t{index}"),
            SeedToken::Slot { slot, index } => write!(f, "{slot}:{index}"),
        }
    }
}

/// Builds paragraphs from the registry's templates and word pools
pub struct ParagraphGenerator<'a, R> {
    registry: &'a Registry,
    rng: R,
}

impl<'a, R: Rng> ParagraphGenerator<'a, R> {
    pub fn new(registry: &'a Registry, rng: R) -> Self {
        Self { registry, rng }
    }

    /// Generate a paragraph, rebuilding while it repeats `previous_seed`.
    ///
    /// Gives up after [`MAX_ATTEMPTS`] builds and returns the last one, even if
    /// it is the previous paragraph again.
    pub fn generate(&mut self, previous_seed: Option<&str>) -> GeneratedParagraph {
        let mut paragraph = self.build();
        let mut attempts = 1;

        while previous_seed == Some(paragraph.seed.as_str()) && attempts < MAX_ATTEMPTS {
            debug!(attempts, "paragraph repeats the previous seed, rebuilding");
            paragraph = self.build();
            attempts += 1;
        }

        trace!(seed = %paragraph.seed, attempts, "generated paragraph");
        paragraph
    }

    fn build(&mut self) -> GeneratedParagraph {
        let registry = self.registry;
        let mut sentences: Vec<String> = Vec::new();
        let mut tokens: Vec<SeedToken> = Vec::new();
        let mut previous_words: HashMap<&'a str, &'a str> = HashMap::new();
        // length of `sentences.join(" ")`, in chars
        let mut joined_len = 0;

        while (sentences.len() < MIN_SENTENCES || joined_len < TARGET_CHAR_LENGTH)
            && sentences.len() < MAX_SENTENCES
        {
            let template_index = self.rng.gen_range(0..registry.templates().len());
            tokens.push(SeedToken::Template(template_index));

            let sentence = self.fill(
                &registry.templates()[template_index],
                &mut previous_words,
                &mut tokens,
            );

            if !sentences.is_empty() {
                joined_len += 1;
            }
            joined_len += sentence.chars().count();
            sentences.push(sentence);
        }

        GeneratedParagraph {
            text: sentences.join(" "),
            seed: tokens.iter().join(SEED_SEPARATOR),
        }
    }

    fn fill(
        &mut self,
        template: &'a SentenceTemplate,
        previous_words: &mut HashMap<&'a str, &'a str>,
        tokens: &mut Vec<SeedToken>,
    ) -> String {
        let registry = self.registry;
        let mut rendered = String::new();

        for segment in template.segments() {
            match segment {
                Segment::Text(text) => rendered.push_str(text),
                Segment::Slot(slot) => {
                    let pool = registry.pool(slot);
                    let index = self.pick(pool, previous_words.get(slot.as_str()).copied());

                    previous_words.insert(slot.as_str(), pool[index].as_str());
                    tokens.push(SeedToken::Slot {
                        slot: slot.clone(),
                        index,
                    });
                    rendered.push_str(&pool[index]);
                }
            }
        }

        sentence_case(&rendered)
    }

    /// Uniform pick from `pool` that differs from the slot's last value when the
    /// pool offers an alternative.
    fn pick(&mut self, pool: &[String], previous: Option<&str>) -> usize {
        let candidates: Vec<usize> = (0..pool.len())
            .filter(|&i| pool.len() < 2 || Some(pool[i].as_str()) != previous)
            .collect();

        match candidates.choose(&mut self.rng) {
            Some(&index) => index,
            // every candidate equals the previous value
            None => self.rng.gen_range(0..pool.len()),
        }
    }
}

/// Rebuild the paragraph a seed describes.
///
/// Returns `None` when the seed does not decode against `registry`: an unknown
/// template or pool index, or slot tokens that do not line up with the template.
pub fn replay(registry: &Registry, seed: &str) -> Option<GeneratedParagraph> {
    let mut tokens = seed.split(SEED_SEPARATOR).map(SeedToken::parse);
    let mut sentences = Vec::new();

    while let Some(token) = tokens.next() {
        let SeedToken::Template(template_index) = token? else {
            return None;
        };
        let template = registry.templates().get(template_index)?;
        let mut rendered = String::new();

        for segment in template.segments() {
            match segment {
                Segment::Text(text) => rendered.push_str(text),
                Segment::Slot(name) => match tokens.next()?? {
                    SeedToken::Slot { slot, index } if slot == *name => {
                        rendered.push_str(registry.pool(name).get(index)?)
                    }
                    _ => return None,
                },
            }
        }

        sentences.push(sentence_case(&rendered));
    }

    if sentences.is_empty() {
        return None;
    }

    Some(GeneratedParagraph {
        text: sentences.join(" "),
        seed: seed.to_string(),
    })
}
