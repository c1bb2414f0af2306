//! Interactive chat loop
//!
//! # Readline behavior
//!
//! - `Ctrl+C` clears the current line
//! - `Ctrl+D` or `/bye` exits

use anyhow::Result;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use jaervice_core::{Chatbot, ThreadId};

const PROMPT: &str = "You: ";
const EXIT_COMMAND: &str = "/bye";

/// What to do with one line of input
#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    Empty,
    Exit,
    Message(&'a str),
}

pub fn classify(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Input::Empty
    } else if trimmed == EXIT_COMMAND {
        Input::Exit
    } else {
        Input::Message(trimmed)
    }
}

pub async fn run(chatbot: &Chatbot, thread_id: &ThreadId) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!("{}", "Jaervice is ready. Type /bye to leave.".bold());
    println!("{}", format!("thread: {thread_id}").dimmed());
    println!();

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                let text = match classify(&line) {
                    Input::Empty => continue,
                    Input::Exit => {
                        println!("{}", "Goodbye! 👋".dimmed());
                        break;
                    }
                    Input::Message(text) => text,
                };
                let _ = rl.add_history_entry(text);

                match chatbot.send(thread_id, text).await {
                    Ok(reply) => {
                        println!("{} {}", "AI:".cyan().bold(), reply.response);
                    }
                    Err(e) => {
                        eprintln!("{} {}", "error:".red().bold(), e.user_message());
                        eprintln!("{}", e.to_string().dimmed());
                    }
                }
                println!();
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".dimmed());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye! 👋".dimmed());
                break;
            }
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                break;
            }
        }
    }

    Ok(())
}
