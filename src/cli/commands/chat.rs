//! Interactive chat client for a running slugline server.
//!
//! Keeps an append-only transcript of the session and dispatches each user
//! turn to the consult or scene endpoint depending on the selected mode.
//! Server errors are shown inline; the transcript is never rolled back.

use crate::cli::Output;
use crate::error::Result;
use console::style;
use serde::Deserialize;
use std::io::{self, BufRead, Write};

/// Which endpoint a user turn is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChatMode {
    /// Craft questions, answered from the library.
    Consult,
    /// Scene drafting from a plot outline.
    Scene,
}

impl ChatMode {
    fn label(&self) -> &'static str {
        match self {
            ChatMode::Consult => "consult",
            ChatMode::Scene => "scene",
        }
    }
}

/// One transcript turn.
struct Turn {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ConsultResponse {
    response: String,
    context_used: bool,
}

#[derive(Deserialize)]
struct SceneResponse {
    scene_script: String,
}

/// Run the interactive chat command.
pub async fn run_chat(server: &str) -> Result<()> {
    let client = reqwest::Client::new();
    let server = server.trim_end_matches('/').to_string();

    let mut mode = ChatMode::Consult;
    let mut transcript: Vec<Turn> = Vec::new();

    println!("\n{}", style("Slugline Chat").bold().cyan());
    println!(
        "{}",
        style("Ask craft questions, or switch with '/mode scene' to draft scenes.").dim()
    );
    println!(
        "{}\n",
        style("Commands: /mode consult, /mode scene, /history, exit").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style(format!("You ({}):", mode.label())).green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if let Some(requested) = input.strip_prefix("/mode") {
            match requested.trim() {
                "consult" => {
                    mode = ChatMode::Consult;
                    Output::info("Mode: consultation (RAG).");
                }
                "scene" => {
                    mode = ChatMode::Scene;
                    Output::info("Mode: scene drafting.");
                }
                other => {
                    Output::warning(&format!("Unknown mode: '{}'. Use consult or scene.", other));
                }
            }
            continue;
        }

        if input == "/history" {
            render_transcript(&transcript);
            continue;
        }

        // The user turn stays in the transcript whether or not the request succeeds
        transcript.push(Turn {
            role: "user",
            content: input.to_string(),
        });

        match send_turn(&client, &server, mode, input).await {
            Ok(answer) => {
                println!("\n{} {}\n", style("Slugline:").cyan().bold(), answer);
                transcript.push(Turn {
                    role: "assistant",
                    content: answer,
                });
            }
            Err(e) => {
                Output::error(&format!("Could not reach the server: {}", e));
            }
        }
    }

    Ok(())
}

/// Dispatch one user turn to the server and return the rendered reply.
async fn send_turn(
    client: &reqwest::Client,
    server: &str,
    mode: ChatMode,
    input: &str,
) -> Result<String> {
    match mode {
        ChatMode::Consult => {
            let response = client
                .post(format!("{}/consult", server))
                .json(&serde_json::json!({ "question": input }))
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(crate::error::SluglineError::Api(format!(
                    "Server error: {}",
                    response.status()
                )));
            }

            let reply: ConsultResponse = response.json().await?;
            let marker = if reply.context_used {
                "\n\n(grounded in your library)"
            } else {
                ""
            };
            Ok(format!("{}{}", reply.response, marker))
        }
        ChatMode::Scene => {
            let response = client
                .post(format!("{}/generate/scene", server))
                .json(&serde_json::json!({
                    "genre": "Drama",
                    "characters": "Hero, Antagonist",
                    "plot_outline": input,
                    "tone": "Serious",
                }))
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(crate::error::SluglineError::Api(format!(
                    "Server error: {}",
                    response.status()
                )));
            }

            let reply: SceneResponse = response.json().await?;
            Ok(reply.scene_script)
        }
    }
}

/// Render the full transcript so far.
fn render_transcript(transcript: &[Turn]) {
    if transcript.is_empty() {
        Output::info("No turns yet.");
        return;
    }

    println!();
    for turn in transcript {
        let label = match turn.role {
            "user" => style("You:").green().bold(),
            _ => style("Slugline:").cyan().bold(),
        };
        println!("{} {}\n", label, turn.content);
    }
}
