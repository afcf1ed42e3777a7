// vocabmaster - main.rs
// Console front end: shows cards, reads answers, saves progress.

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::Utc;
use log::warn;
use rand::rngs::StdRng;

use vocabmaster::deck::loader;
use vocabmaster::scheduler::MAX_PASSES;
use vocabmaster::{
    end_session, load_progress, Config, DatabaseManager, DrillSession, Outcome, Quality, ReviewLogger, Scheduler,
    SpacedSession, UserProgress, WaterfallSession, WordRecord,
};

struct App {
    config: Config,
    words: Vec<WordRecord>,
    db: DatabaseManager,
    logger: ReviewLogger,
    progress: UserProgress,
    rng: StdRng,
}

pub fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // --- Get mode and paths from command-line arguments ---
    let args: Vec<String> = env::args().collect();
    let program = args.first().cloned().unwrap_or_else(|| "vocabmaster".to_string());
    let usage = format!("Usage: {} [--config FILE] <waterfall|review|drill|stats> [WORDS.json]", program);

    let mut rest = args.iter().skip(1);
    let mut config_path: Option<PathBuf> = None;
    let mut positional = Vec::new();
    while let Some(arg) = rest.next() {
        if arg == "--config" {
            let path = rest.next().ok_or_else(|| usage.clone())?;
            config_path = Some(PathBuf::from(path));
        } else {
            positional.push(arg.clone());
        }
    }
    let Some(mode) = positional.first().cloned() else {
        eprintln!("{}", usage);
        return Err(usage);
    };

    let mut config = match &config_path {
        Some(path) => Config::load_or_default(path),
        None => Config::new(),
    };
    if let Some(words_path) = positional.get(1) {
        config.words_path = PathBuf::from(words_path);
    }

    let word_list = loader::load_or_fallback(&config.words_path);
    if word_list.used_fallback {
        println!("Warning: could not load {:?}, studying the built-in words.", config.words_path);
    }

    let db = DatabaseManager::open(&config.database_path()).map_err(|e| e.to_string())?;
    let logger = ReviewLogger::new(&config.data_directory).map_err(|e| e.to_string())?;
    let progress = load_progress(&db).map_err(|e| e.to_string())?;
    let rng = config.rng();

    let mut app = App { config, words: word_list.words, db, logger, progress, rng };
    let stdin = io::stdin();
    let mut input = stdin.lock();

    match mode.as_str() {
        "waterfall" => run_waterfall(&mut app, &mut input),
        "review" => run_review(&mut app, &mut input),
        "drill" => run_drill(&mut app, &mut input),
        "stats" => {
            print_stats(&app.progress);
            Ok(())
        }
        _ => {
            eprintln!("{}", usage);
            Err(format!("unknown mode '{}'", mode))
        }
    }
}

/// Prints `text` and reads one answer. `None` on end of input.
fn prompt<R: BufRead>(input: &mut R, text: &str) -> Option<String> {
    print!("{} ", text);
    io::stdout().flush().ok();
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_lowercase()),
    }
}

fn show_front(card: &WordRecord) {
    println!();
    println!("  {}  ({}, {:?})", card.word, card.part_of_speech, card.difficulty);
}

fn show_back(card: &WordRecord) {
    println!("  Definition: {}", card.definition);
    println!("  Example:    {}", card.example);
    if !card.synonyms.is_empty() {
        println!("  Synonyms:   {}", card.synonyms.join(", "));
    }
    println!("  Memory aid: {}", card.memory_aid);
}

fn finish<S: Scheduler>(app: &mut App, session: &mut S) -> Result<(), String> {
    let session_type = session.session_type();
    end_session(&app.db, &mut app.progress, session.stats_mut(), session_type, Utc::now())
        .map_err(|e| e.to_string())?;
    let stats = session.stats();
    println!();
    println!("Session complete: {}/{} correct.", stats.correct, stats.words_studied);
    print_stats(&app.progress);
    Ok(())
}

fn run_waterfall<R: BufRead>(app: &mut App, input: &mut R) -> Result<(), String> {
    let mut session = WaterfallSession::start_batch(
        &app.words,
        app.config.batch_size,
        app.config.difficulty_filter,
        &mut app.rng,
        Utc::now(),
    );
    if session.batch_len() == 0 {
        println!("No words match the {:?} filter.", app.config.difficulty_filter);
        return Ok(());
    }

    while let Some(card) = session.current_card().cloned() {
        println!(
            "\n[pass {}/{} | stack {} {:?} | card {}/{}]",
            session.pass(),
            MAX_PASSES,
            session.active_stack().number(),
            session.active_stack(),
            session.current_index() + 1,
            session.stack(session.active_stack()).len()
        );
        show_front(&card);
        if prompt(input, "Press Enter to flip...").is_none() {
            break;
        }
        show_back(&card);

        let Some(answer) = prompt(input, "[k]now / [s]truggled / [u]nknown / [q]uit:") else {
            break;
        };
        let outcome = match answer.as_str() {
            "k" => Outcome::Know,
            "s" => Outcome::Struggled,
            "u" => Outcome::Unknown,
            "q" => break,
            _ => {
                println!("Please answer k, s or u.");
                continue;
            }
        };
        if let Some(landed) = session.respond(&card.word, outcome, &mut app.progress) {
            if let Err(e) = app.logger.log_waterfall(Utc::now(), &card.word, outcome, landed) {
                warn!("Could not write review log: {}", e);
            }
        }
        session.advance();
    }
    finish(app, &mut session)
}

fn run_review<R: BufRead>(app: &mut App, input: &mut R) -> Result<(), String> {
    let mut states = app.db.load_review_states().map_err(|e| e.to_string())?;
    let mut session = SpacedSession::start(&app.words, &mut states, Utc::now(), &mut app.rng);
    if session.is_empty() {
        println!("Nothing to review right now. Come back later!");
        return Ok(());
    }

    while let Some(card) = session.current_card().cloned() {
        println!("\n[review {}/{}]", session.current_index() + 1, session.len());
        show_front(&card);
        if prompt(input, "Press Enter to flip...").is_none() {
            break;
        }
        show_back(&card);

        let Some(answer) = prompt(input, "How well did you recall it? [0-5] / [q]uit:") else {
            break;
        };
        if answer == "q" {
            break;
        }
        let grade = match answer.parse::<u8>() {
            Ok(g) if g <= 5 => g,
            _ => {
                println!("Please answer with a grade from 0 to 5.");
                continue;
            }
        };
        let quality = Quality::new(grade);
        let now = Utc::now();
        if let Some(state) = session.respond(&card.word, quality, now, &mut states, &mut app.progress) {
            println!("  Next review in {} day(s).", state.interval);
            if let Err(e) = app.logger.log_review(now, &card.word, quality, &state) {
                warn!("Could not write review log: {}", e);
            }
        }
        session.advance();
    }

    app.db.save_review_states(&states).map_err(|e| e.to_string())?;
    finish(app, &mut session)
}

fn run_drill<R: BufRead>(app: &mut App, input: &mut R) -> Result<(), String> {
    let mut session = DrillSession::start(
        &app.words,
        app.config.drill_pool,
        app.config.drill_cards,
        &mut app.rng,
        Utc::now(),
    );

    loop {
        while let Some(card) = session.current_card().cloned() {
            println!("\n[card {} of {} | score {}]", session.current_index() + 1, session.total(), session.score());
            show_front(&card);
            if prompt(input, "Press Enter to flip...").is_none() {
                return finish(app, &mut session);
            }
            show_back(&card);
            match prompt(input, "Did you know it? [y/n]:").as_deref() {
                Some("y") => {
                    session.mark(true);
                }
                Some("n") => {
                    session.mark(false);
                }
                Some(_) => {
                    println!("Please answer y or n.");
                    continue;
                }
                None => return finish(app, &mut session),
            }
            session.advance();
        }

        let result = session.result();
        println!("\nYou scored {} out of {} ({}%).", result.score, result.total, result.percentage);
        println!("{}", result.feedback.message());
        finish(app, &mut session)?;

        match prompt(input, "[t]ry again / [n]ew round / [q]uit:").as_deref() {
            Some("t") => session.try_again(Utc::now()),
            Some("n") => session.new_round(&mut app.rng, Utc::now()),
            _ => return Ok(()),
        }
    }
}

fn print_stats(progress: &UserProgress) {
    println!("Study streak:     {} day(s)", progress.study_streak);
    println!("Words mastered:   {}", progress.total_words_learned);
    println!("Overall accuracy: {:.0}%", progress.accuracy_rate() * 100.0);
    println!("Sessions logged:  {}", progress.accuracy_history.len());
}
