mod core;
mod output;
mod repl;

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::core::chatbot::{Chatbot, Reply};
use crate::core::definitions;
use crate::core::journal::Journal;
use crate::core::store::Store;
use crate::output::Printer;
use crate::repl::Repl;

fn main() -> io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let data_dir = match resolve_data_dir(&args) {
        Ok(dir) => dir,
        Err(e) => {
            let printer = Printer::new();
            printer.error(&e);
            printer.info("Usage: ligabot [--data <dir>]");
            std::process::exit(1);
        }
    };

    if let Err(e) = fs::create_dir_all(&data_dir) {
        Printer::new().error(&format!(
            "Cannot create data directory {}: {}",
            data_dir.display(),
            e
        ));
        std::process::exit(1);
    }

    interactive_mode(&data_dir)
}

/// Data directory resolution: `--data <dir>` beats `LIGABOT_HOME` beats
/// `~/.ligabot`. User-supplied paths go through shell expansion.
fn resolve_data_dir(args: &[String]) -> Result<PathBuf, String> {
    let raw = if let Some(position) = args.iter().position(|a| a == "--data") {
        match args.get(position + 1) {
            Some(dir) => dir.clone(),
            None => return Err("--data requires a directory argument".to_string()),
        }
    } else if let Ok(home) = env::var("LIGABOT_HOME") {
        home
    } else {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        return Ok(home.join(".ligabot"));
    };

    let expanded = shellexpand::full(&raw)
        .map_err(|e| format!("Invalid data directory '{}': {}", raw, e))?;
    Ok(PathBuf::from(expanded.into_owned()))
}

struct Session {
    chatbot: Chatbot,
    definitions_digest: String,
    store: Store,
    journal: Journal,
}

fn boot_session(data_dir: &Path, printer: &Printer) -> Session {
    let intents_path = data_dir.join("intents.json");

    match definitions::materialize_defaults(&intents_path) {
        Ok(true) => printer.info(&format!("Created default intents at {}", intents_path.display())),
        Ok(false) => {}
        Err(e) => printer.warning(&e),
    }

    let (defs, digest) = match definitions::load(&intents_path) {
        Ok(loaded) => {
            printer.info(&format!("Loaded {} intent definitions", loaded.definitions.len()));
            (loaded.definitions, loaded.digest)
        }
        Err(e) => {
            printer.warning(&format!("{} - commands will not be recognized", e));
            (Vec::new(), String::new())
        }
    };

    let mut store = Store::new(data_dir);
    match store.load() {
        Ok(_) => {
            if store.is_dirty() {
                // first run: persist the seeded registry right away
                match store.save() {
                    Ok(_) => printer.info("Seeded league registry with starter clubs"),
                    Err(e) => printer.warning(&e),
                }
            }
        }
        Err(e) => printer.warning(&e),
    }

    let mut journal = Journal::new(data_dir);
    if let Err(e) = journal.load() {
        printer.warning(&e);
    }

    Session {
        chatbot: Chatbot::new(defs),
        definitions_digest: digest,
        store,
        journal,
    }
}

fn interactive_mode(data_dir: &Path) -> io::Result<()> {
    ctrlc::set_handler(|| {
        // Allows Ctrl+C to interrupt at process level without killing the
        // line editor state mid-write.
    })
    .expect("Error setting Ctrl-C handler");

    let mut repl = match Repl::new(data_dir) {
        Ok(repl) => repl,
        Err(e) => {
            let printer = Printer::new();
            printer.error(&e);
            printer.warning("Falling back to basic input mode...");
            return interactive_mode_fallback(data_dir);
        }
    };

    show_logo(repl.printer());
    println!("Напишете 'помощ' за команди.");

    let intents_path = data_dir.join("intents.json");
    let mut session = boot_session(data_dir, repl.printer());
    println!();

    loop {
        match repl.read_line(">> ") {
            Ok(Some(line)) => {
                if line.is_empty() {
                    continue;
                }
                if !process_line(&mut session, &line, repl.printer(), &intents_path) {
                    break;
                }
            }
            Ok(None) => {
                println!();
                repl.printer().success("До скоро!");
                break;
            }
            Err(e) => {
                repl.printer().error(&format!("Input error: {}", e));
                break;
            }
        }
    }

    shutdown(&mut session, repl.printer());
    if let Err(e) = repl.save_history() {
        repl.printer().warning(&e);
    }
    Ok(())
}

fn interactive_mode_fallback(data_dir: &Path) -> io::Result<()> {
    let printer = Printer::new();

    printer.header("ligabot");
    println!("Football League Chatbot");
    println!("Напишете 'помощ' за команди.");

    let intents_path = data_dir.join("intents.json");
    let mut session = boot_session(data_dir, &printer);
    println!();

    loop {
        print!(">> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            println!();
            printer.success("До скоро!");
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if !process_line(&mut session, input, &printer, &intents_path) {
            break;
        }
    }

    shutdown(&mut session, &printer);
    Ok(())
}

/// Handle one input line. Returns false when the shell should terminate.
fn process_line(session: &mut Session, input: &str, printer: &Printer, intents_path: &Path) -> bool {
    match input {
        "clear" => {
            if cfg!(windows) {
                let _ = std::process::Command::new("cmd").args(["/C", "cls"]).status();
            } else {
                print!("\x1B[2J\x1B[1;1H");
                let _ = io::stdout().flush();
            }
            true
        }
        "log" => {
            show_log(&session.journal, printer);
            println!();
            true
        }
        "reload" => {
            reload_definitions(session, printer, intents_path);
            println!();
            true
        }
        _ => match session.chatbot.handle(input, &mut session.store) {
            Reply::Exit => {
                printer.success("До скоро!");
                false
            }
            Reply::Text(text) => {
                println!("{}", text);
                println!();
                session.journal.record(input, &text);
                if session.store.is_dirty() {
                    if let Err(e) = session.store.save() {
                        printer.warning(&e);
                    }
                }
                true
            }
        },
    }
}

/// Re-read intents.json; rebuild the matcher only when the file changed.
fn reload_definitions(session: &mut Session, printer: &Printer, intents_path: &Path) {
    match definitions::load(intents_path) {
        Ok(loaded) => {
            if loaded.digest == session.definitions_digest {
                printer.info("Intent definitions unchanged");
            } else {
                let count = loaded.definitions.len();
                session.definitions_digest = loaded.digest;
                session.chatbot.rebuild(loaded.definitions);
                printer.success(&format!("Reloaded {} intent definitions", count));
            }
        }
        Err(e) => printer.warning(&e),
    }
}

fn show_log(journal: &Journal, printer: &Printer) {
    if journal.is_empty() {
        printer.info("No commands journaled yet");
        return;
    }

    printer.header(&format!("Last commands ({} journaled)", journal.len()));
    for entry in journal.last_n(10) {
        println!(
            "  {}  >> {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.input
        );
        println!("      << {}", entry.response.lines().next().unwrap_or(""));
    }
}

fn shutdown(session: &mut Session, printer: &Printer) {
    if session.store.is_dirty() {
        if let Err(e) = session.store.save() {
            printer.warning(&e);
        }
    }
    if let Err(e) = session.journal.save() {
        printer.warning(&e);
    }
}

fn show_logo(printer: &Printer) {
    print!("\x1B[2J\x1B[1;1H");

    if printer.use_color {
        println!("\x1b[1;38;5;34m"); // pitch green
    }

    println!(
        r"
        ╔══════════════════════════════════════════╗
        ║                                          ║
        ║            L I G A B O T                 ║
        ║                                          ║
        ║       Football League Chatbot            ║
        ║       клубове • играчи • мачове          ║
        ║                                          ║
        ╚══════════════════════════════════════════╝
    "
    );

    if printer.use_color {
        println!("\x1b[0m");
    }
}
