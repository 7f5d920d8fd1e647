//! Chat command handler.
//!
//! Reads questions from stdin until `/exit` or end of input. History lives
//! for the session only.

use super::{ask::with_max_results, print_sources};
use clap::Args;
use policyguide_core::config::AppConfig;
use policyguide_core::AppResult;
use policyguide_knowledge::{Assistant, Backends};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Interactive chat session
#[derive(Args, Debug)]
pub struct ChatCommand {
    /// Customer whose policy grounds the answers
    #[arg(short = 'u', long)]
    pub customer: Option<String>,

    /// Passages to retrieve per question (1-100)
    #[arg(short = 'k', long)]
    pub max_results: Option<u32>,
}

/// A line typed at the chat prompt.
#[derive(Debug, PartialEq, Eq)]
enum ChatInput<'a> {
    Question(&'a str),
    History,
    Clear,
    Customer(&'a str),
    Help,
    Exit,
    Empty,
    Unknown(&'a str),
}

impl<'a> ChatInput<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        if !line.starts_with('/') {
            return Self::Question(line);
        }

        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
        match command {
            "/history" => Self::History,
            "/clear" => Self::Clear,
            "/customer" if !arg.trim().is_empty() => Self::Customer(arg.trim()),
            "/help" => Self::Help,
            "/exit" | "/quit" => Self::Exit,
            _ => Self::Unknown(command),
        }
    }
}

const HELP: &str = "Commands: /history, /clear, /customer <id>, /help, /exit";

impl ChatCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let config = with_max_results(config, self.max_results)?;
        let mut customer = self
            .customer
            .clone()
            .unwrap_or_else(|| config.default_customer.clone());

        let backends = Backends::from_config(&config).await?;
        let mut assistant = backends.assistant()?;

        println!("Insurance policy assistant ({} backend)", config.provider);
        println!("Customer: {}. {}", customer, HELP);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("> ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match ChatInput::parse(&line) {
                ChatInput::Empty => continue,
                ChatInput::Exit => break,
                ChatInput::Help => println!("{}", HELP),
                ChatInput::History => print_history(&assistant),
                ChatInput::Clear => {
                    assistant.clear_history();
                    println!("Conversation history cleared.");
                }
                ChatInput::Customer(id) => {
                    customer = id.to_string();
                    println!("Now answering for customer {}.", customer);
                }
                ChatInput::Unknown(command) => {
                    println!("Unknown command {}. {}", command, HELP);
                }
                ChatInput::Question(question) => {
                    let answer = assistant.chat(question, &customer).await?;
                    println!();
                    println!("{}", answer.response);
                    println!();
                    print_sources(&answer.sources);
                    println!();
                }
            }
        }

        tracing::info!("Chat ended after {} turns", assistant.history().len());
        Ok(())
    }
}

fn print_history(assistant: &Assistant) {
    let history = assistant.history();
    if history.is_empty() {
        println!("No conversation history yet.");
        return;
    }

    for (i, turn) in history.turns().iter().enumerate() {
        println!(
            "[{}] {} ({})",
            i + 1,
            turn.timestamp.format("%Y-%m-%d %H:%M:%S"),
            turn.customer_id
        );
        println!("  Q: {}", turn.query);
        println!("  A: {}", turn.response);
        if !turn.sources.is_empty() {
            let titles: Vec<&str> = turn.sources.iter().map(|s| s.title.as_str()).collect();
            println!("  Sources: {}", titles.join(", "));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_input() {
        assert_eq!(ChatInput::parse("  "), ChatInput::Empty);
        assert_eq!(
            ChatInput::parse("Is hail covered?"),
            ChatInput::Question("Is hail covered?")
        );
        assert_eq!(ChatInput::parse("/history"), ChatInput::History);
        assert_eq!(ChatInput::parse("/clear"), ChatInput::Clear);
        assert_eq!(ChatInput::parse("/quit"), ChatInput::Exit);
        assert_eq!(
            ChatInput::parse("/customer jane_smith"),
            ChatInput::Customer("jane_smith")
        );
        assert_eq!(ChatInput::parse("/customer"), ChatInput::Unknown("/customer"));
        assert_eq!(ChatInput::parse("/bogus"), ChatInput::Unknown("/bogus"));
    }
}
