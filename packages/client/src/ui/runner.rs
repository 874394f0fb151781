//! Interactive REPL loop.

use std::{io::Write, sync::mpsc as std_mpsc};

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use crate::{config::ClientConfig, domain::Route};

use super::app::{App, Step};

/// Prompt reflecting the current screen
pub fn prompt_for(route: Route) -> String {
    format!("sportify {}> ", route.path())
}

/// Run the client until `quit`, Ctrl+C or Ctrl+D
pub async fn run_client(config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Using backend {} (session file {})",
        config.api_base_url,
        config.storage_path.display()
    );
    let app = App::new(&config)?;
    print_output(&app.start().await);

    // Prompts go to the readline thread, lines come back
    let (prompt_tx, prompt_rx) = std_mpsc::channel::<String>();
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        while let Ok(prompt) = prompt_rx.recv() {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                    }
                    if input_tx.send(line.to_string()).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    loop {
        if prompt_tx.send(prompt_for(app.route())).is_err() {
            break;
        }
        let Some(line) = input_rx.recv().await else {
            break;
        };

        match app.handle_line(&line).await {
            Step::Continue(output) => print_output(&output),
            Step::Quit(output) => {
                print_output(&output);
                break;
            }
        }
    }

    drop(prompt_tx);
    if readline_handle.join().is_err() {
        tracing::warn!("Readline thread panicked");
    }
    tracing::info!("Client session ended");
    Ok(())
}

fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    print!("{}", output);
    std::io::stdout().flush().ok();
}
