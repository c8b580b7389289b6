use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use serde::Deserialize;

use text_flow_core::cache::{CacheKey, PredictionCache};
use text_flow_core::model::corrector::CorrectionConfig;
use text_flow_core::model::prediction_input::{Mode, ModelType, PredictionInput};
use text_flow_core::tokenizer::tokenize;
use text_flow_core::{Error, TextFlow};

/// HTTP front-end for the autocomplete / autocorrect engine.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
	/// Model directory (vocabulary.txt, ngram.dat, nplus1gram.dat, ...)
	#[arg(long, default_value = "./data")]
	data: String,

	/// Address to bind
	#[arg(long, default_value = "127.0.0.1")]
	host: String,

	/// Port to listen on
	#[arg(long, default_value_t = 5000)]
	port: u16,

	/// Maximum number of cached predictions (0 disables the cache)
	#[arg(long, default_value_t = 1024)]
	cache_capacity: usize,
}

/// Query parameters for the `/v1/predict` endpoint
#[derive(Deserialize)]
struct PredictParams {
	text: Option<String>,
	num_words: Option<usize>,
	mode: Option<String>, // complete, correct or complete_and_correct
	model: Option<String>, // ngram or sequence
	prefix: Option<String>,
	distance: Option<usize>,
}

/// Query parameters for the `/v1/correct` and `/v1/tokenize` endpoints
#[derive(Deserialize)]
struct TextParams {
	text: Option<String>,
	distance: Option<usize>,
}

#[derive(Deserialize)]
struct WordParams {
	word: Option<String>,
	prev: Option<String>,
	next: Option<String>,
	distance: Option<usize>,
}

#[derive(Deserialize)]
struct VocabularyParams {
	prefix: Option<String>,
}

struct SharedData {
	text_flow: TextFlow,
	cache: Mutex<PredictionCache>,
}

impl PredictParams {
	/// Builds the engine input, validating every parameter.
	fn prediction_input(&self) -> Result<PredictionInput, Error> {
		let mode = match &self.mode {
			Some(s) => s.parse::<Mode>()?,
			None => Mode::Complete,
		};

		let mut input = PredictionInput::new(mode);
		if let Some(model) = &self.model {
			input.model = model.parse::<ModelType>()?;
		}
		input.set_num_words(self.num_words.unwrap_or(1))?;
		input.set_max_edit_distance(self.distance.unwrap_or(2))?;
		input.set_prefix(self.prefix.as_deref());
		Ok(input)
	}
}

/// Maps engine errors to HTTP responses.
fn error_response(e: Error) -> HttpResponse {
	match e {
		Error::InvalidArgument(_) | Error::NoCandidates { .. } => HttpResponse::BadRequest().body(e.to_string()),
		Error::ModelUnavailable(_) => HttpResponse::NotImplemented().body(e.to_string()),
		_ => {
			log::error!("Request failed: {e}");
			HttpResponse::InternalServerError().body(e.to_string())
		}
	}
}

fn correction_config(distance: Option<usize>) -> Result<CorrectionConfig, Error> {
	CorrectionConfig::new(distance.unwrap_or(2))
}

/// Non-empty optional query value.
fn non_empty(value: &Option<String>) -> Option<&str> {
	value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// HTTP GET endpoint `/v1/tokenize`
///
/// Returns the tokens of `text`, one per line.
#[get("/v1/tokenize")]
async fn get_tokens(query: web::Query<TextParams>) -> impl Responder {
	let text = query.text.as_deref().unwrap_or_default();
	HttpResponse::Ok().body(tokenize(text).join("\n"))
}

/// HTTP GET endpoint `/v1/predict`
///
/// Completes and/or corrects `text` according to the query parameters.
/// Results are memoized in the shared cache.
#[get("/v1/predict")]
async fn get_prediction(data: web::Data<SharedData>, query: web::Query<PredictParams>) -> impl Responder {
	let input = match query.prediction_input() {
		Ok(input) => input,
		Err(e) => return error_response(e),
	};
	let text = query.text.as_deref().unwrap_or_default();
	let key = CacheKey::new(text, &input);

	{
		let mut cache = match data.cache.lock() {
			Ok(c) => c,
			Err(_) => return HttpResponse::InternalServerError().body("Cache lock failed"),
		};
		if let Some(result) = cache.get(&key) {
			return HttpResponse::Ok().body(result.clone());
		}
	}

	match data.text_flow.predict(text, &input) {
		Ok(result) => {
			if let Ok(mut cache) = data.cache.lock() {
				cache.insert(key, result.clone());
			}
			HttpResponse::Ok().body(result)
		}
		Err(e) => error_response(e),
	}
}

/// HTTP GET endpoint `/v1/correct`
///
/// Returns `text` with every unknown word corrected.
#[get("/v1/correct")]
async fn get_correction(data: web::Data<SharedData>, query: web::Query<TextParams>) -> impl Responder {
	let config = match correction_config(query.distance) {
		Ok(config) => config,
		Err(e) => return error_response(e),
	};
	let text = query.text.as_deref().unwrap_or_default();

	match data.text_flow.correct_text(text, &config) {
		Ok(result) => HttpResponse::Ok().body(result),
		Err(e) => error_response(e),
	}
}

/// HTTP GET endpoint `/v1/correct_word`
///
/// Returns the best replacement and its score, tab separated.
#[get("/v1/correct_word")]
async fn get_word_correction(data: web::Data<SharedData>, query: web::Query<WordParams>) -> impl Responder {
	let word = match non_empty(&query.word) {
		Some(word) => word,
		None => return HttpResponse::BadRequest().body("Missing or empty word"),
	};
	let config = match correction_config(query.distance) {
		Ok(config) => config,
		Err(e) => return error_response(e),
	};

	match data.text_flow.correct_word(word, non_empty(&query.prev), non_empty(&query.next), &config) {
		Ok(correction) => HttpResponse::Ok().body(format!("{}\t{}", correction.word, correction.score)),
		Err(e) => error_response(e),
	}
}

/// HTTP GET endpoint `/v1/vocabulary`
///
/// Lists known words, optionally filtered by prefix.
#[get("/v1/vocabulary")]
async fn get_vocabulary(data: web::Data<SharedData>, query: web::Query<VocabularyParams>) -> impl Responder {
	let words = data.text_flow.vocabulary().with_prefix(non_empty(&query.prefix));
	HttpResponse::Ok().body(words.join("\n"))
}

/// Main entry point for the server.
///
/// Loads the model directory once, shares it read-only between workers
/// and starts an Actix-web HTTP server.
///
/// # Notes
/// - Logging is configured through `RUST_LOG` (default `info`).
/// - Only the prediction cache is behind a `Mutex`; the tables are immutable.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	let text_flow = TextFlow::new(&args.data)
		.map_err(|e| std::io::Error::other(format!("Failed to load model from {}: {e}", args.data)))?;

	let shared_data = web::Data::new(SharedData {
		text_flow,
		cache: Mutex::new(PredictionCache::new(args.cache_capacity)),
	});

	log::info!("Listening on {}:{}", args.host, args.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_data.clone())
			.service(get_tokens)
			.service(get_prediction)
			.service(get_correction)
			.service(get_word_correction)
			.service(get_vocabulary)
	})
		.bind((args.host.as_str(), args.port))?
		.run()
		.await
}
