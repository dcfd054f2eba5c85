//! Interactive chat loop.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;
use vokasi_rag::{ChatSession, ErrorKind, RagError, Role};

use crate::bootstrap::Assistant;

const PROMPT: &str = "you> ";

/// One line of user input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Question(String),
    Reset,
    History,
    Quit,
    /// A `/command` we do not know.
    Unknown(String),
    Blank,
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line {
        "" => Input::Blank,
        "/reset" => Input::Reset,
        "/history" => Input::History,
        "/quit" => Input::Quit,
        _ if line.starts_with('/') && !line.contains(char::is_whitespace) => {
            Input::Unknown(line.to_string())
        }
        _ => Input::Question(line.to_string()),
    }
}

pub fn banner(assistant: &Assistant) -> String {
    format!(
        "Vokasi Assistant\n\
         Ask anything about your knowledge documents ({} chunks in '{}').\n\
         Commands: /history shows the conversation, /reset clears it, /quit exits.\n",
        assistant.index.chunk_count, assistant.index.collection
    )
}

/// Role-tagged transcript, oldest turn first. Empty for an empty session.
pub fn render_transcript(session: &ChatSession) -> String {
    session
        .turns()
        .iter()
        .map(|turn| {
            let label = match turn.role() {
                Role::User => "You",
                Role::Assistant => "Assistant",
            };
            format!("{label}: {}\n", turn.content())
        })
        .collect()
}

/// Message shown in place of an answer when a question fails.
pub fn render_error(error: &RagError) -> String {
    match error.kind() {
        ErrorKind::Retrieval => format!("Could not search the documents: {error}"),
        ErrorKind::Completion => format!("The model could not answer: {error}"),
        ErrorKind::Configuration => format!("Configuration problem: {error}"),
    }
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Searching for an answer...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Read questions until `/quit`, Ctrl-C, or Ctrl-D.
pub async fn run(assistant: &Assistant) -> anyhow::Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut session = ChatSession::new();

    println!("{}", banner(assistant));

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => match parse_input(&line) {
                Input::Blank => continue,
                Input::Quit => break,
                Input::Reset => {
                    session.reset();
                    // Clear the screen and redraw the now empty view.
                    print!("\x1B[2J\x1B[H");
                    println!("{}", banner(assistant));
                    print!("{}", render_transcript(&session));
                }
                Input::History => {
                    if session.is_empty() {
                        println!("No questions yet.\n");
                    } else {
                        println!("{}", render_transcript(&session));
                    }
                }
                Input::Unknown(command) => {
                    println!("Unknown command '{command}'. Use /history, /reset or /quit.");
                }
                Input::Question(question) => {
                    rl.add_history_entry(question.as_str())?;

                    let pb = spinner();
                    let result = session.submit(&assistant.pipeline, &question).await;
                    pb.finish_and_clear();

                    match result {
                        Ok(answer) => println!("{answer}\n"),
                        Err(e) => eprintln!("{}\n", render_error(&e)),
                    }
                    debug!(turns = session.len(), "question handled");
                }
            },
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    println!("Goodbye!");
    Ok(())
}
