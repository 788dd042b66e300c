//! oxspell entrypoint: run the highlight engine over a text file and report
//! every misspelled word with its position and suggestions.
use anyhow::{Context, Result, bail};
use clap::Parser;
use core_config::{Config, load_from};
use core_events::{CHANNEL_SEND_FAILURES, ChannelObserver, EVENTS_DISPATCHED, HighlightEvent};
use core_highlight::{EngineOptions, HighlightEngine};
use core_speller::{DEFAULT_SUGGESTIONS, WordListSpeller};
use core_text::Document;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Once;
use std::sync::atomic::Ordering;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "oxspell.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "oxspell", version, about = "Spell-check a text file")]
struct Args {
    /// UTF-8 text file to check. Standard input is read when omitted.
    pub path: Option<PathBuf>,
    /// Configuration file path (overrides discovery of `oxspell.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Directory of `<language>.dic` word lists.
    #[arg(long = "dict-dir")]
    pub dict_dir: Option<PathBuf>,
    /// Checking language, e.g. `en_US`.
    #[arg(long)]
    pub language: Option<String>,
    /// Suggestions printed per misspelled word (0 disables them).
    #[arg(long, default_value_t = DEFAULT_SUGGESTIONS)]
    pub suggest: usize,
    /// Let the engine switch checking off when the error density is too high.
    #[arg(long)]
    pub automatic: bool,
}

struct AppStartup {
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self { log_guard: None }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .with_ansi(false)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

fn load_document(args: &Args) -> Result<Document> {
    match args.path.as_ref() {
        Some(path) => {
            let doc = Document::from_path(path)?;
            tracing::debug!(target: "io", file = %path.display(), chars = core_text::TextSource::len_chars(&doc), "file_read_ok");
            Ok(doc)
        }
        None => {
            let content = std::io::read_to_string(std::io::stdin()).context("reading stdin")?;
            Ok(Document::from_str("stdin", &content))
        }
    }
}

fn build_speller(config: &Config, args: &Args) -> Result<WordListSpeller> {
    let settings = &config.file.speller;
    let Some(dir) = args.dict_dir.clone().or_else(|| settings.dictionary_dir.clone()) else {
        bail!("no dictionary directory: pass --dict-dir or set speller.dictionary_dir");
    };
    let mut speller = WordListSpeller::load_dir(&dir)?;
    if let Some(path) = &settings.personal_dictionary {
        speller = speller.with_personal_dictionary(path.clone())?;
    }
    speller.set_skip_run_together(settings.skip_run_together);
    speller.set_preferred_languages(settings.preferred_languages.clone());
    Ok(speller)
}

fn engine_options(config: &Config, args: &Args) -> EngineOptions {
    let mut options = EngineOptions::from_config(config);
    if let Some(language) = &args.language {
        options.language = language.clone();
    }
    options.automatic |= args.automatic;
    options
}

/// One printed line per misspelled range, in document order.
fn report<W: Write>(
    out: &mut W,
    engine: &HighlightEngine<WordListSpeller>,
    doc: &Document,
    suggest: usize,
) -> Result<usize> {
    let ranges = engine.misspelled_ranges();
    for range in ranges {
        let (line, col) = doc.line_col(range.start);
        write!(out, "{}:{} {}", line + 1, col + 1, range.word)?;
        if suggest > 0 {
            let candidates = engine.suggestions(doc, range.start, Some(suggest));
            if !candidates.is_empty() {
                write!(out, ": {}", candidates.join(", "))?;
            }
        }
        writeln!(out)?;
    }
    Ok(ranges.len())
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = load_from(args.config.clone())?;
    let doc = load_document(&args)?;
    let speller = build_speller(&config, &args)?;
    let options = engine_options(&config, &args);

    let (tx, mut rx) = mpsc::unbounded_channel::<HighlightEvent>();
    let mut engine = HighlightEngine::new(speller, options);
    engine.register_observer(ChannelObserver::new(tx));
    if !engine.spell_checker_found() {
        warn!(target: "runtime", language = engine.current_language(), "no_dictionary_for_language");
        bail!("no dictionary for language `{}`", engine.current_language());
    }

    engine.slot_rehighlight(&doc);
    let found = {
        let mut stdout = std::io::stdout().lock();
        let found = report(&mut stdout, &engine, &doc, args.suggest)?;
        stdout.flush()?;
        found
    };
    drop(engine);

    // engine dropped: the channel drains and then closes
    let mut markup_events = 0usize;
    while let Some(event) = rx.recv().await {
        match event {
            HighlightEvent::ActiveChanged { description, .. } => eprintln!("{description}"),
            HighlightEvent::LanguageChanged(language) => eprintln!("language: {language}"),
            other if other.is_markup() => markup_events += 1,
            _ => {}
        }
    }
    info!(
        target: "runtime",
        found,
        markup_events,
        dispatched = EVENTS_DISPATCHED.load(Ordering::Relaxed),
        send_failures = CHANNEL_SEND_FAILURES.load(Ordering::Relaxed),
        "shutdown"
    );
    Ok(if found == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let mut startup = AppStartup::new();
    if let Err(e) = startup.configure_logging() {
        eprintln!("oxspell: logging disabled: {e:#}");
    }
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            error!(target: "runtime", error = %e, "run_failed");
            eprintln!("oxspell: {e:#}");
            ExitCode::from(2)
        }
    }
}
