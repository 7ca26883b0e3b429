//! Training datasets
//!
//! Either an external JSON dataset supplied by the operator, or the
//! bundled demonstration dataset. The bundled data exists to keep the
//! pipeline runnable end-to-end without external downloads; it is far too
//! small to produce a production-quality model.

use std::path::Path;

use serde::{Deserialize, Serialize};

use commentguard_core::{Result, LABEL_COUNT};

/// One labeled training row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledComment {
    pub text: String,
    /// Category flags in label order: toxic, severe_toxic, obscene,
    /// threat, insult, identity_hate
    pub labels: [u8; LABEL_COUNT],
}

/// Load a dataset from a JSON file: an array of `{text, labels}` rows.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<Vec<LabeledComment>> {
    let file = std::fs::File::open(path.as_ref())?;
    let rows: Vec<LabeledComment> = serde_json::from_reader(std::io::BufReader::new(file))?;
    Ok(rows)
}

/// The bundled demonstration dataset: hand-labeled comments bucketed by
/// category, duplicated tenfold for a workable sample count.
pub fn sample_dataset() -> Vec<LabeledComment> {
    let base: Vec<LabeledComment> = SAMPLE_COMMENTS
        .iter()
        .map(|(text, labels)| LabeledComment {
            text: (*text).to_string(),
            labels: *labels,
        })
        .collect();

    let mut rows = Vec::with_capacity(base.len() * 10);
    for _ in 0..10 {
        rows.extend(base.iter().cloned());
    }
    rows
}

/// Labels: [toxic, severe_toxic, obscene, threat, insult, identity_hate]
#[rustfmt::skip]
static SAMPLE_COMMENTS: &[(&str, [u8; LABEL_COUNT])] = &[
    // Non-toxic comments
    ("This is a great article, thank you for sharing!", [0, 0, 0, 0, 0, 0]),
    ("I completely agree with your point of view.", [0, 0, 0, 0, 0, 0]),
    ("Very informative and well written.", [0, 0, 0, 0, 0, 0]),
    ("Thanks for the clarification, this helps a lot.", [0, 0, 0, 0, 0, 0]),
    ("Interesting perspective, I learned something new.", [0, 0, 0, 0, 0, 0]),
    ("Great discussion, everyone makes valid points.", [0, 0, 0, 0, 0, 0]),
    ("I appreciate the detailed explanation.", [0, 0, 0, 0, 0, 0]),
    ("This is exactly what I was looking for.", [0, 0, 0, 0, 0, 0]),
    ("Well researched and presented.", [0, 0, 0, 0, 0, 0]),
    ("Thank you for contributing to this topic.", [0, 0, 0, 0, 0, 0]),
    ("I enjoyed reading this, very insightful.", [0, 0, 0, 0, 0, 0]),
    ("Good points made throughout the article.", [0, 0, 0, 0, 0, 0]),
    ("Appreciate the effort put into this research.", [0, 0, 0, 0, 0, 0]),
    ("Helpful and well-structured content.", [0, 0, 0, 0, 0, 0]),
    ("This adds valuable insights to the topic.", [0, 0, 0, 0, 0, 0]),
    ("Constructive criticism is welcome here.", [0, 0, 0, 0, 0, 0]),
    ("Looking forward to more articles like this.", [0, 0, 0, 0, 0, 0]),
    ("The methodology used here is sound.", [0, 0, 0, 0, 0, 0]),
    ("Evidence-based approach is commendable.", [0, 0, 0, 0, 0, 0]),
    ("Respectful discourse is important in this community.", [0, 0, 0, 0, 0, 0]),

    // Mildly negative but clean comments
    ("I don't really agree with this.", [0, 0, 0, 0, 0, 0]),
    ("This is not very helpful.", [0, 0, 0, 0, 0, 0]),
    ("I have some concerns about this approach.", [0, 0, 0, 0, 0, 0]),
    ("Perhaps there's a better way to do this.", [0, 0, 0, 0, 0, 0]),
    ("I'm skeptical about these claims.", [0, 0, 0, 0, 0, 0]),
    ("This doesn't seem entirely accurate.", [0, 0, 0, 0, 0, 0]),
    ("There might be some issues here.", [0, 0, 0, 0, 0, 0]),
    ("I think there are better alternatives.", [0, 0, 0, 0, 0, 0]),
    ("Not convinced by this argument.", [0, 0, 0, 0, 0, 0]),
    ("This could be improved in several ways.", [0, 0, 0, 0, 0, 0]),

    // Toxic comments
    ("You are such an idiot, this is completely wrong!", [1, 0, 0, 0, 1, 0]),
    ("This is the stupidest thing I've ever read.", [1, 0, 0, 0, 1, 0]),
    ("What a terrible article, you should be ashamed.", [1, 0, 0, 0, 1, 0]),
    ("You're a fool if you believe this nonsense.", [1, 0, 0, 0, 1, 0]),
    ("This is absolute garbage and a waste of time.", [1, 0, 0, 0, 0, 0]),
    ("I hate people who think like this.", [1, 0, 0, 0, 0, 1]),
    ("You're completely worthless and your opinion doesn't matter.", [1, 0, 0, 0, 1, 0]),
    ("This is the dumbest argument ever made.", [1, 0, 0, 0, 1, 0]),
    ("Shut up, you don't know what you're talking about.", [1, 0, 0, 0, 0, 0]),
    ("You're an absolute moron for saying this.", [1, 0, 0, 0, 1, 0]),
    ("You are so incredibly stupid and wrong.", [1, 0, 0, 0, 1, 0]),
    ("This is pathetic and embarrassing to read.", [1, 0, 0, 0, 1, 0]),
    ("Complete trash, waste of bandwidth.", [1, 0, 0, 0, 1, 0]),
    ("You have no clue what you're doing.", [1, 0, 0, 0, 1, 0]),
    ("Absolutely ridiculous and offensive content.", [1, 0, 0, 0, 1, 0]),

    // Severely toxic comments
    ("I hope you die for posting this garbage.", [1, 1, 0, 0, 0, 0]),
    ("Someone should kill you for being this stupid.", [1, 1, 0, 0, 0, 0]),
    ("You deserve to suffer for this idiocy.", [1, 1, 0, 0, 0, 0]),
    ("Die in a fire, nobody wants your garbage.", [1, 1, 0, 0, 0, 0]),
    ("You should be eliminated from society.", [1, 1, 0, 0, 0, 0]),
    ("Hope something terrible happens to you.", [1, 1, 0, 0, 0, 0]),

    // Obscene comments
    ("This damn post is complete bullshit.", [1, 0, 1, 0, 0, 0]),
    ("What the hell is wrong with you?", [1, 0, 1, 0, 0, 0]),
    ("This shit is fucking ridiculous.", [1, 0, 1, 0, 0, 0]),
    ("Damn it, this crap is annoying.", [1, 0, 1, 0, 0, 0]),
    ("You fucking moron, learn to write.", [1, 0, 1, 0, 0, 0]),
    ("Go to hell with your stupid opinions.", [1, 0, 1, 0, 0, 0]),
    ("This is fucking stupid and worthless.", [1, 0, 1, 0, 0, 0]),
    ("You piece of shit, learn something.", [1, 0, 1, 0, 0, 0]),

    // Threatening comments
    ("I'm going to find you and hurt you.", [1, 0, 0, 1, 1, 0]),
    ("Watch your back, you'll regret this.", [1, 0, 0, 1, 1, 0]),
    ("I will hunt you down and destroy you.", [1, 0, 0, 1, 1, 0]),
    ("You better watch out or else something bad will happen.", [1, 0, 0, 1, 1, 0]),
    ("You'll pay for saying these things.", [1, 0, 0, 1, 1, 0]),
    ("I know where you live, be careful.", [1, 0, 0, 1, 1, 0]),
    ("This won't go unpunished, I promise.", [1, 0, 0, 1, 1, 0]),
    ("Mark my words, you'll face consequences.", [1, 0, 0, 1, 1, 0]),

    // Insulting comments
    ("You're a complete and total failure.", [1, 0, 0, 0, 1, 0]),
    ("What an incompetent fool you are.", [1, 0, 0, 0, 1, 0]),
    ("You are absolutely useless.", [1, 0, 0, 0, 1, 0]),
    ("You're nothing but a pathetic loser.", [1, 0, 0, 0, 1, 0]),
    ("You're the worst person I've ever seen.", [1, 0, 0, 0, 1, 0]),
    ("Completely incompetent and clueless.", [1, 0, 0, 0, 1, 0]),
    ("Total waste of space and oxygen.", [1, 0, 0, 0, 1, 0]),
    ("Incredibly dense and unintelligent.", [1, 0, 0, 0, 1, 0]),

    // Identity hate comments
    ("I hate your entire group of people.", [1, 0, 0, 0, 0, 1]),
    ("People like you are ruining everything.", [1, 0, 0, 0, 0, 1]),
    ("Your race is inferior and should be eliminated.", [1, 0, 0, 0, 0, 1]),
    ("I despise everyone from your community.", [1, 0, 0, 0, 0, 1]),
    ("People of your kind are a plague.", [1, 0, 0, 0, 0, 1]),
    ("Your entire demographic is problematic.", [1, 0, 0, 0, 0, 1]),
    ("You represent everything wrong with society.", [1, 0, 0, 0, 0, 1]),
    ("Your group has caused nothing but trouble.", [1, 0, 0, 0, 0, 1]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_dataset_is_duplicated_tenfold() {
        let rows = sample_dataset();
        assert_eq!(rows.len(), SAMPLE_COMMENTS.len() * 10);
    }

    #[test]
    fn test_every_category_has_positive_samples() {
        let rows = sample_dataset();
        for label_idx in 0..LABEL_COUNT {
            let count = rows.iter().filter(|r| r.labels[label_idx] == 1).count();
            assert!(count > 0, "category {label_idx} has no positive samples");
        }
    }

    #[test]
    fn test_dataset_round_trips_through_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.json");
        let rows = sample_dataset();
        std::fs::write(&path, serde_json::to_vec(&rows).unwrap()).unwrap();

        let loaded = load_dataset(&path).unwrap();
        assert_eq!(loaded.len(), rows.len());
        assert_eq!(loaded[0].text, rows[0].text);
        assert_eq!(loaded[0].labels, rows[0].labels);
    }
}
