//! `annotate-replay`: replay a recorded input session and print the overlay as SVG.
//!
//! ```text
//! annotate-replay <session.json> [--config <config.json>] [--no-handles] [--save-config]
//! ```
//!
//! The session file is a JSON array of input events. `RUST_LOG` overrides the
//! log level from the configuration.

#[cfg(not(target_arch = "wasm32"))]
use mermaid_annotate::{AnnotationEditor, AppConfig, Effect, InputEvent};

#[cfg(not(target_arch = "wasm32"))]
struct Args {
    session: std::path::PathBuf,
    config: Option<std::path::PathBuf>,
    include_handles: bool,
    save_config: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_args() -> Result<Args, String> {
    let mut session = None;
    let mut config = None;
    let mut include_handles = true;
    let mut save_config = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or("--config needs a path")?;
                config = Some(path.into());
            }
            "--no-handles" => include_handles = false,
            "--save-config" => save_config = true,
            other if other.starts_with("--") => return Err(format!("Unknown option: {}", other)),
            other if session.is_none() => session = Some(other.into()),
            other => return Err(format!("Unexpected argument: {}", other)),
        }
    }

    Ok(Args {
        session: session.ok_or("Missing session file")?,
        config,
        include_handles,
        save_config,
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load_or_default(),
    };

    env_logger::Builder::new()
        .filter_level(config.preferences.log_level.to_level_filter())
        .parse_default_env()
        .init();

    let json = std::fs::read_to_string(&args.session)?;
    let events: Vec<InputEvent> = serde_json::from_str(&json)?;
    log::info!("Replaying {} events from {:?}", events.len(), args.session);

    let mut editor = AnnotationEditor::new(&config);
    let mut effect_count = 0;
    for event in events {
        let effects = editor.handle_event(event);
        for effect in &effects {
            if !matches!(effect, Effect::Redraw) {
                log::debug!("{:?}", effect);
            }
        }
        effect_count += effects.len();
    }

    log::info!(
        "{} annotations, {} effects, {} undo steps, tool {}",
        editor.annotation_count(),
        effect_count,
        editor.history().undo_count(),
        editor.tool().name()
    );

    println!("{}", editor.render_svg(args.include_handles));

    if args.save_config {
        config.save_to_default_path()?;
    }
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!(
                "Usage: annotate-replay <session.json> [--config <config.json>] [--no-handles] [--save-config]"
            );
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&args) {
        eprintln!("Replay failed: {}", e);
        std::process::exit(1);
    }
}

// WASM doesn't use main(), it uses wasm_bindgen's start function
#[cfg(target_arch = "wasm32")]
fn main() {}
