use text_flow_core::edits::{edits1, edits2};
use text_flow_core::model::correction_scorer::CorrectionScorer;
use text_flow_core::model::corrector::CorrectionConfig;
use text_flow_core::model::count_table::CountTable;
use text_flow_core::model::ngram_model::NGramModel;
use text_flow_core::model::prediction_input::{Mode, PredictionInput};
use text_flow_core::model::vocabulary::Vocabulary;
use text_flow_core::tokenizer::tokenize;
use text_flow_core::TextFlow;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Tokenization lower-cases, strips links and splits punctuation
    println!("Tokens: {:?}", tokenize("Check https://example.com, I am SO happy!"));

    // Candidate strings one and two edits away from a typo
    println!("'teh' has {} edits at distance 1, {} at distance 2", edits1("teh").len(), edits2("teh").len());

    // Tables are usually loaded from a model directory,
    // here they are built in memory
    let vocab: Vocabulary = ["i", "am", "happy", "sad", "today", "the", "cat"].into_iter().collect();
    let ngrams = CountTable::from_entries([
        (vec!["i", "am"], 10),
        (vec!["am", "happy"], 6),
        (vec!["am", "sad"], 2),
    ])?;
    let nplus1grams = CountTable::from_entries([
        (vec!["i", "am", "happy"], 8),
        (vec!["i", "am", "sad"], 2),
        (vec!["am", "happy", "today"], 5),
    ])?;
    let unigrams = CountTable::from_entries([
        (vec!["i"], 40),
        (vec!["am"], 30),
        (vec!["happy"], 12),
        (vec!["sad"], 3),
        (vec!["today"], 6),
        (vec!["the"], 100),
        (vec!["cat"], 9),
    ])?;
    let bigrams = CountTable::from_entries([
        (vec!["i", "am"], 10),
        (vec!["am", "happy"], 6),
        (vec!["happy", "today"], 5),
        (vec!["the", "cat"], 4),
    ])?;

    let model = NGramModel::new(ngrams, nplus1grams)?;
    let scorer = CorrectionScorer::new(unigrams)?.with_bigrams(bigrams)?;
    let app = TextFlow::from_parts(vocab, model).with_scorer(scorer);

    // Every candidate score is available, not only the best one
    let prediction = app.ngram_model().predict_next(&tokenize("I am"), app.vocabulary(), None)?;
    for (word, log_p) in &prediction.probabilities {
        println!("log p({word} | i am) = {log_p:.4}");
    }

    // Single word correction with its neighbours as context
    let correction = app.correct_word("hapy", Some("am"), Some("today"), &CorrectionConfig::default())?;
    println!("hapy -> {} ({:.4})", correction.word, correction.score);

    // Whole text correction, known words are never touched
    println!("Corrected: {}", app.correct_text("I ma hapy tody", &CorrectionConfig::new(1)?)?);

    // Completion of one or several words
    let mut input = PredictionInput::new(Mode::Complete);
    println!("Completed: {}", app.predict("I am", &input)?);
    input.set_num_words(2)?;
    println!("Completed: {}", app.predict("I am", &input)?);

    // Interactive typing: only words starting with the prefix are proposed first
    input.set_prefix(Some("s"));
    println!("Completed with prefix 's': {}", app.predict("I am", &input)?);

    // Invalid settings are rejected
    match input.set_num_words(0) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("{e}"),
    }
    input.set_prefix(Some("zz"));
    match app.predict("I am", &input) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("{e}"),
    }

    // Correction then completion from the corrected text
    let mut input = PredictionInput::new(Mode::CompleteAndCorrect);
    input.set_max_edit_distance(1)?;
    input.set_num_words(2)?;
    println!("Corrected and completed: {}", app.predict("I ma", &input)?);

    // Load a model directory if one is available
    match TextFlow::new("./data") {
        Ok(app) => println!("Loaded ./data: {}", app.predict("the", &PredictionInput::default())?),
        Err(e) => println!("No model directory loaded: {e}"),
    }

    Ok(())
}
