//! Line-oriented form editor over stdin.

use anyhow::Result;
use client_core::SubmissionController;
use shared::domain::Field;
use tokio::io::{self, AsyncBufReadExt, BufReader};

use crate::render_outcome;

const HELP: &str = "commands: set <field> <value> | show | fields | submit | help | quit";

#[derive(Debug, PartialEq, Eq)]
enum Line {
    Set(Field, String),
    Show,
    Fields,
    Submit,
    Help,
    Quit,
    Empty,
}

fn parse_line(line: &str) -> Result<Line, String> {
    let line = line.trim();
    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    match command {
        "" => Ok(Line::Empty),
        "set" => {
            let rest = rest.trim_start();
            let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            if name.is_empty() {
                return Err("usage: set <field> <value>".to_string());
            }
            let field = name.parse::<Field>().map_err(|err| err.to_string())?;
            Ok(Line::Set(field, value.trim().to_string()))
        }
        "show" => Ok(Line::Show),
        "fields" => Ok(Line::Fields),
        "submit" => Ok(Line::Submit),
        "help" | "?" => Ok(Line::Help),
        "quit" | "exit" => Ok(Line::Quit),
        other => Err(format!("unknown command '{other}'; {HELP}")),
    }
}

pub async fn run(controller: &SubmissionController) -> Result<()> {
    println!("Prediction server: {}", controller.endpoint());
    println!("{HELP}");

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(Line::Set(field, value)) => controller.set_field(field, value).await,
            Ok(Line::Show) => {
                for (field, raw) in controller.fields().await.iter() {
                    let shown = if raw.is_empty() { "-" } else { raw };
                    println!("{:<26} {shown}", field.label());
                }
            }
            Ok(Line::Fields) => {
                for field in Field::ALL {
                    println!("{:<26} {}", field.name(), field.placeholder());
                }
            }
            Ok(Line::Submit) => {
                println!("Processing...");
                let state = controller.submit().await;
                render_outcome(&state);
            }
            Ok(Line::Help) => println!("{HELP}"),
            Ok(Line::Quit) => break,
            Ok(Line::Empty) => {}
            Err(message) => eprintln!("{message}"),
        }
    }
    Ok(())
}
