//! Keyboard Emulator - command line front end
//!
//! Types key events on a layout, shows how to type a string, and analyzes
//! text corpora.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use keyboard_emulator::{
    analytics::{Analyzer, Corpus, ResultStatus},
    config::{config_path, Config},
    keyboard::{
        display_label, key_cap_labels, FingerMap, Geometry, KeyChord, KeyEvent, KeyEventType,
        KeySequenceEntry, Layout, PlaybackStep, Platform, Session,
    },
    report::AnalysisReport,
};

/// Sleep between two playback polls
const POLL_TICK: Duration = Duration::from_millis(10);

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// AltGr convention: win, mac, linux or other (overrides the config file)
    #[arg(global = true, short, long)]
    platform: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the key presses typing a string
    Hint {
        layout: PathBuf,
        text: String,
        /// Play the chords back one per configured interval
        #[arg(long)]
        play: bool,
    },
    /// Feed key events through a session: +Code (down), -Code (up), Code (tap)
    Type {
        layout: PathBuf,
        #[arg(required = true, allow_hyphen_values = true)]
        events: Vec<String>,
    },
    /// Print the key-cap labels of every key
    Keys { layout: PathBuf },
    /// Finger load and same-finger usage of a corpus on a layout
    Analyze {
        layout: PathBuf,
        corpus: PathBuf,
        /// Finger assignment JSON (finger id -> key ids)
        #[arg(short, long)]
        fingers: Option<PathBuf>,
        /// Geometry override for the standard finger assignment
        #[arg(short, long)]
        geometry: Option<String>,
        /// Write a JSON report
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Build a corpus dictionary from a text file
    Corpus {
        text: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Average several corpus dictionaries
    Merge {
        #[arg(required = true, num_args = 2..)]
        corpora: Vec<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the active configuration
    Config,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::load().unwrap_or_else(|e| {
        log::warn!("could not load config ({}), using defaults", e);
        Config::default()
    });
    let platform = cli
        .platform
        .as_deref()
        .map(Platform::parse)
        .unwrap_or(config.emulation.platform);

    match cli.command {
        Commands::Hint { layout, text, play } => {
            let layout = load_layout(&layout)?;
            if play {
                play_keys(layout, platform, &text, config.playback_interval())
            } else {
                hint(&layout, &text)
            }
        }
        Commands::Type { layout, events } => type_events(load_layout(&layout)?, platform, &events),
        Commands::Keys { layout } => keys(&load_layout(&layout)?),
        Commands::Analyze {
            layout,
            corpus,
            fingers,
            geometry,
            output,
        } => analyze(
            &config,
            &layout,
            &corpus,
            fingers.as_deref(),
            geometry.as_deref(),
            output.as_deref(),
        ),
        Commands::Corpus { text, output } => {
            let corpus = Corpus::from_text_file(&text)
                .with_context(|| format!("reading {}", text.display()))?;
            write_output(&corpus.to_json()?, output.as_deref())
        }
        Commands::Merge { corpora, output } => {
            let loaded = corpora
                .iter()
                .map(|path| Corpus::load(path).with_context(|| format!("loading {}", path.display())))
                .collect::<Result<Vec<_>>>()?;
            write_output(&Corpus::merge(&loaded).to_json()?, output.as_deref())
        }
        Commands::Config => {
            match config_path() {
                Ok(path) => println!("# {}", path.display()),
                Err(e) => println!("# {}", e),
            }
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn load_layout(path: &Path) -> Result<Layout> {
    Layout::load(path).with_context(|| format!("loading layout {}", path.display()))
}

fn write_output(json: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn hint(layout: &Layout, text: &str) -> Result<()> {
    let geometry = layout.geometry();
    let mut unresolved = 0;
    for entry in layout.key_sequence(text).iter() {
        match entry {
            KeySequenceEntry::Press(press) => {
                let chord = KeyChord::for_press(&press, geometry);
                println!("{:<14} level {}  {}", press.key_id, press.level, chord);
            }
            KeySequenceEntry::Unresolved(c) => {
                println!("{:<14} {:?} cannot be typed", "-", c);
                unresolved += 1;
            }
        }
    }
    if unresolved > 0 {
        bail!("{} character(s) cannot be typed on this layout", unresolved);
    }
    Ok(())
}

fn play_keys(layout: Layout, platform: Platform, text: &str, interval: Duration) -> Result<()> {
    let mut session = Session::new(layout, platform);
    let handle = session.press_keys(text, interval, Instant::now());
    log::info!("playing {:?} as playback {}", text, handle.id());

    loop {
        match session.poll_playback(Instant::now()) {
            PlaybackStep::Press(chord) if chord.keys.is_empty() => println!("(skipped)"),
            PlaybackStep::Press(chord) => println!("{}", chord),
            PlaybackStep::Finished => break,
            PlaybackStep::Idle => thread::sleep(POLL_TICK),
        }
    }
    Ok(())
}

fn type_events(layout: Layout, platform: Platform, tokens: &[String]) -> Result<()> {
    let events = KeyEvent::parse_all(tokens.iter().map(String::as_str))?;
    let mut session = Session::new(layout, platform);
    let mut typed = String::new();

    for event in &events {
        match event.event_type {
            KeyEventType::Press => {
                let outcome = session.key_down_event(&event.code);
                log::debug!("{} -> {:?}", event, outcome);
                typed.push_str(outcome.input_text());
            }
            KeyEventType::Release => session.key_up(&event.code),
        }
    }

    println!("{}", typed);
    if let Some(tag) = session.pending_dead_key() {
        eprintln!("dead key {} still pending", tag);
    }
    Ok(())
}

fn keys(layout: &Layout) -> Result<()> {
    for (key_id, values) in layout.keymap() {
        let labels = key_cap_labels(values);
        println!(
            "{:<14} {:>2} {:>2}   {:>2} {:>2}",
            key_id,
            display_label(&labels.shift),
            display_label(&labels.base),
            display_label(&labels.altgr_shift),
            display_label(&labels.altgr)
        );
    }
    Ok(())
}

fn analyze(
    config: &Config,
    layout_path: &Path,
    corpus_path: &Path,
    fingers: Option<&Path>,
    geometry: Option<&str>,
    output: Option<&Path>,
) -> Result<()> {
    let layout = load_layout(layout_path)?;
    let corpus = Corpus::load(corpus_path)
        .with_context(|| format!("loading corpus {}", corpus_path.display()))?;

    let explicit = match geometry {
        Some(tag) => match Geometry::parse(tag) {
            Some(geometry) => Some(geometry),
            None => bail!("unknown geometry {:?}", tag),
        },
        None => None,
    };
    let geometry = layout.table().geometry_or(explicit);
    let fingers = match fingers {
        Some(path) => FingerMap::load(path)
            .with_context(|| format!("loading finger map {}", path.display()))?,
        None => FingerMap::standard(geometry),
    };

    let analysis = Analyzer::new(&layout, fingers)
        .map_enter_key(config.analytics.map_enter_key)
        .precision(config.analytics.precision)
        .analyze(&corpus);

    for result in analysis.results() {
        let marker = match result.status {
            ResultStatus::Ok => " ",
            ResultStatus::Warning => "!",
            ResultStatus::Info => " ",
        };
        println!("{} {:<24} {}", marker, result.label, result.value);
    }

    if let Some(path) = output {
        let report = AnalysisReport::new(
            &analysis,
            &layout_path.display().to_string(),
            &corpus_path.display().to_string(),
            geometry,
        );
        report
            .export_json(path)
            .with_context(|| format!("writing report {}", path.display()))?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}
