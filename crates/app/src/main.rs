use std::fmt;
use std::io;
use std::sync::Arc;

use quiz_content::{ContentSource, ContentfulSource, InMemoryContentSource};
use quiz_core::model::{Question, QuestionKind, QuestionRef, Step, StepId};
use quiz_services::{Clock, LoadState, QuizLoopService, QuizStatus};
use tracing_subscriber::EnvFilter;

mod console;

#[derive(Debug)]
enum ArgsError {
    UnknownArg(String),
    NotConfigured,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::NotConfigured => {
                write!(f, "QUIZ_SPACE_ID and QUIZ_ACCESS_TOKEN must be set (or pass --demo)")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--demo]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_SPACE_ID, QUIZ_ACCESS_TOKEN, QUIZ_ENVIRONMENT, QUIZ_CDN_URL, RUST_LOG");
}

struct Args {
    demo: bool,
}

impl Args {
    fn parse(args: impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut demo = false;
        for arg in args {
            match arg.as_str() {
                "--demo" => demo = true,
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(Some(Self { demo }))
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn demo_source() -> Result<InMemoryContentSource, Box<dyn std::error::Error>> {
    let source = InMemoryContentSource::new();
    let questions = [
        ("Which keyword declares an immutable binding?", "let, mut, var", "let"),
        ("Which type owns a heap-allocated string?", "&str, String, char", "String"),
        ("Which macro prints with a newline?", "print!, println!, write!", "println!"),
    ];
    for (idx, (text, answers, correct)) in questions.into_iter().enumerate() {
        let step = Step::new(
            StepId::new(format!("demo-step-{idx}")),
            QuestionRef::new(format!("demo-question-{idx}")),
        );
        let question =
            Question::from_answer_list(text, QuestionKind::MultipleChoice, answers, correct);
        source.push_step(step, question)?;
    }
    Ok(source)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let Some(args) = Args::parse(std::env::args().skip(1)).inspect_err(|_| print_usage())? else {
        print_usage();
        return Ok(());
    };

    let source: Arc<dyn ContentSource> = if args.demo {
        Arc::new(demo_source()?)
    } else {
        let contentful = ContentfulSource::from_env();
        if !contentful.enabled() {
            return Err(ArgsError::NotConfigured.into());
        }
        Arc::new(contentful)
    };

    let service = QuizLoopService::new(Clock::default(), source);
    println!("Loading quiz...");
    let mut state = service.load_state().await;

    match (state.status(), &mut state) {
        (QuizStatus::Empty, _) => println!("This quiz has no questions yet."),
        (_, LoadState::Failed(err)) => {
            tracing::error!(error = %err, "quiz could not be loaded");
            println!("The quiz could not be loaded.");
        }
        (_, LoadState::Ready(session)) => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            console::run_session(&service, session, stdin.lock(), &mut stdout)?;
        }
        (_, LoadState::Loading) => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
