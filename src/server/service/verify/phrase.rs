//! Challenge phrase generation for description verification.
//!
//! Phrases are assembled from fixed word lists into a short human-readable
//! sentence ("subject verb object adverbial.") that is easy to paste into a
//! profile description and unlikely to occur there by accident.

use rand::Rng;

const SUBJECTS: &[&str] = &["I", "We", "They", "Someone", "A friend", "My cat"];
const VERBS: &[&str] = &[
    "enjoy",
    "like",
    "love",
    "prefer",
    "sometimes eat",
    "dream about",
];
const OBJECTS: &[&str] = &[
    "apples",
    "dancing in the rain",
    "purple cats",
    "flying cars",
    "building sandcastles",
    "watching the stars",
];
const ADVERBIALS: &[&str] = &[
    "every morning",
    "at night",
    "when it rains",
    "on Sundays",
    "while coding",
];

/// Generates a random challenge phrase, e.g. `I love apples every morning.`
///
/// # Returns
/// - `String` - The generated phrase, terminated with a period
pub fn generate_phrase() -> String {
    let mut rng = rand::rng();
    let mut pick = |list: &[&str]| list[rng.random_range(0..list.len())].to_string();

    format!(
        "{} {} {} {}.",
        pick(SUBJECTS),
        pick(VERBS),
        pick(OBJECTS),
        pick(ADVERBIALS)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that generated phrases are assembled from the word lists.
    ///
    /// Strips the trailing period and checks each part against its list.
    ///
    /// Expected: subject, verb, object and adverbial all come from the lists
    #[test]
    fn phrase_is_built_from_word_lists() {
        for _ in 0..50 {
            let phrase = generate_phrase();
            assert!(phrase.ends_with('.'));

            let body = phrase.trim_end_matches('.');
            assert!(SUBJECTS.iter().any(|s| body.starts_with(s)));
            assert!(ADVERBIALS.iter().any(|a| body.ends_with(a)));
            assert!(VERBS.iter().any(|v| body.contains(v)));
            assert!(OBJECTS.iter().any(|o| body.contains(o)));
        }
    }
}
