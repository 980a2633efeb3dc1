use serde_json::{json, Value};

use scenario_trainer::corpus::Corpus;

/// Choice ids with grades A=bad, B=best, C=good, D=worst.
pub const BEST_CHOICE: &str = "B";
pub const GOOD_CHOICE: &str = "C";
pub const WORST_CHOICE: &str = "D";

pub fn item_json(id: u32, difficulty: i32, format: &str, street: &str, position: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Fixture puzzle {id}"),
        "difficultyRating": difficulty,
        "attributes": {
            "format": format,
            "stakes": "low",
            "street": street,
            "position": position,
            "opponent": "unknown",
            "scenario": "opening"
        },
        "scenario": {
            "position": position,
            "stackSize": "100 BB",
            "blinds": "$1/$2",
            "action": "Folded to you",
            "hand": "A♠ K♠",
            "context": "Fixture"
        },
        "choices": [
            { "id": "A", "text": "Fold", "quality": "bad", "explanation": "Too tight." },
            { "id": "B", "text": "Raise", "quality": "best", "explanation": "Standard." },
            { "id": "C", "text": "Call", "quality": "good", "explanation": "Playable." },
            { "id": "D", "text": "Shove", "quality": "worst", "explanation": "Reckless." }
        ],
        "tags": ["fixture"]
    })
}

pub fn small_corpus_json() -> Value {
    json!([
        item_json(1, 1200, "cash", "flop", "btn"),
        item_json(2, 1250, "cash", "river", "bb"),
        item_json(3, 900, "tournament", "preflop", "sb"),
        item_json(4, 1900, "cash", "turn", "co"),
    ])
}

pub fn small_corpus() -> Corpus {
    let (corpus, rejections) =
        Corpus::from_json(&small_corpus_json().to_string()).expect("fixture corpus");
    assert!(rejections.is_empty(), "fixture corpus has rejections: {rejections:?}");
    corpus
}
