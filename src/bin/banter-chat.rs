//! Interactive chat application for conversing with a locally hosted
//! model runtime.
//!
//! This binary provides a streaming REPL interface over an
//! Ollama-compatible endpoint.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage with default settings
//! banter-chat
//!
//! # Specify a model
//! banter-chat --model qwen2.5-coder:7b
//!
//! # Point at a remote runtime
//! banter-chat --endpoint http://10.0.0.5:11434
//!
//! # Disable colors (useful for piping output)
//! banter-chat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/new`, `/sessions`, `/switch`, `/rename`, `/delete` - Manage sessions
//! - `/model <name>` - Change the model
//! - `/export [file]` - Export the transcript
//! - `/quit` - Exit the application

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use banter::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PRESETS, PlainTextRenderer, Renderer,
    help_text, parse_command, preset,
};
use banter::{KnownModel, Model};

/// Main entry point for the banter-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("banter-chat [OPTIONS]");
    let config = ChatConfig::from(args);
    let use_color = config.use_color;

    let mut session = ChatSession::new(config);
    let mut renderer = PlainTextRenderer::with_color(use_color);
    let mut rl = DefaultEditor::new()?;

    // Flag so Ctrl+C during streaming does not kill the process. The
    // in-flight turn is not cancelled; it runs to its terminal state.
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    println!(
        "banter-chat (model: {}, endpoint: {})",
        session.config().model,
        session.config().base_url
    );
    println!("Type /help for commands, /quit to exit\n");

    // Text queued to prefill the next prompt, from /preset.
    let mut prefill: Option<&'static str> = None;

    loop {
        interrupted.store(false, Ordering::Relaxed);

        let readline = match prefill.take() {
            Some(initial) => rl.readline_with_initial("You: ", (initial, "")),
            None => rl.readline("You: "),
        };

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::NewSession => {
                            let id = session.new_session();
                            renderer.print_info(&format!("Created and switched to session {id}."));
                        }
                        ChatCommand::Sessions => {
                            print_sessions(&session);
                        }
                        ChatCommand::Switch(id) => match session.switch_session(id) {
                            Ok(()) => renderer.print_info(&format!("Switched to session {id}.")),
                            Err(err) => renderer.print_error(&err.to_string()),
                        },
                        ChatCommand::Rename(id, name) => {
                            match session.rename_session(id, name.clone()) {
                                Ok(()) => renderer
                                    .print_info(&format!("Session {id} renamed to \"{name}\".")),
                                Err(err) => renderer.print_error(&err.to_string()),
                            }
                        }
                        ChatCommand::Delete(id) => match session.delete_session(id) {
                            Ok(()) => {
                                let active = session.store().active_id();
                                renderer.print_info(&format!(
                                    "Deleted session {id}; session {active} is active."
                                ));
                            }
                            Err(err) => renderer.print_error(&err.to_string()),
                        },
                        ChatCommand::Model(model_name) => {
                            session.set_model(Model::parse(&model_name));
                            renderer.print_info(&format!("Model changed to: {model_name}"));
                        }
                        ChatCommand::Models => {
                            print_models();
                        }
                        ChatCommand::Temperature(value) => {
                            session.config_mut().temperature = value;
                            renderer.print_info(&format!("temperature set to {value:.2}"));
                        }
                        ChatCommand::Style(style) => {
                            session.config_mut().style = style;
                            renderer.print_info(&format!("style set to {style}"));
                        }
                        ChatCommand::Length(length) => {
                            session.config_mut().length = length;
                            renderer.print_info(&format!("length set to {length}"));
                        }
                        ChatCommand::Persona(persona) => {
                            session.config_mut().persona = persona;
                            renderer.print_info(&format!("persona set to {persona}"));
                        }
                        ChatCommand::System(prompt) => match prompt {
                            Some(p) => {
                                session.config_mut().system_prompt = p.clone();
                                renderer.print_info(&format!("System prompt set to: {p}"));
                            }
                            None => {
                                session.config_mut().reset_system_prompt();
                                renderer.print_info("System prompt restored to default.");
                            }
                        },
                        ChatCommand::Preset(name) => match preset(&name) {
                            Some(snippet) => {
                                prefill = Some(snippet);
                            }
                            None => {
                                renderer.print_error(&format!("Unknown preset: {name}"));
                            }
                        },
                        ChatCommand::Presets => {
                            println!("    Quick prompts:");
                            for (name, snippet) in PRESETS {
                                println!("      /preset {name:<12} {snippet}");
                            }
                        }
                        ChatCommand::Rate(feedback) => {
                            session.rate(feedback);
                            renderer.print_info(&format!("Recorded rating: {feedback}"));
                        }
                        ChatCommand::Export(path) => {
                            let path = path.as_deref().map(Path::new);
                            match session.export_active(path) {
                                Ok(written) => renderer.print_info(&format!(
                                    "Transcript exported to {}",
                                    written.display()
                                )),
                                Err(err) => renderer.print_error(&err.to_string()),
                            }
                        }
                        ChatCommand::Stats => {
                            print_stats(&session);
                        }
                        ChatCommand::ShowConfig => {
                            print_config(&session);
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send to the runtime
                println!("Assistant:");
                match session.send_streaming(line, &mut renderer).await {
                    Ok(()) => {
                        renderer.print_info(&format!(
                            "Response Time: {:.2} seconds",
                            session.last_response_time()
                        ));
                    }
                    Err(e) => {
                        renderer.print_error(&e.to_string());
                    }
                }
                if interrupted.load(Ordering::Relaxed) {
                    renderer.print_info("[interrupt noted; the response above ran to completion]");
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn print_sessions(session: &ChatSession) {
    println!("    Sessions:");
    for overview in session.sessions_overview() {
        let marker = if overview.active { "*" } else { " " };
        println!(
            "      {} [{}] {} ({} messages)",
            marker, overview.id, overview.name, overview.message_count
        );
    }
}

fn print_models() {
    println!("    Model catalog:");
    for model in KnownModel::CATALOG {
        let info = model.info();
        println!("      {:<18} {}", info.id, info.specialty);
    }
}

fn print_stats(session: &ChatSession) {
    let config = session.config();
    let active = session.store().active();
    println!("    Session Statistics:");
    println!("      Active session: [{}] {}", active.id, active.name);
    println!("      Sessions: {}", session.store().len());
    println!("      Messages in session: {}", active.messages.len());
    println!("      Ratings recorded: {}", active.feedback.len());
    println!("      Model: {}", config.model);
    println!(
        "      Last response time: {:.2} seconds",
        session.last_response_time()
    );
}

fn print_config(session: &ChatSession) {
    let config = session.config();
    println!("    Current Configuration:");
    println!("      Model: {}", config.model);
    println!("      Endpoint: {}", config.base_url);
    println!("      Temperature: {:.2}", config.temperature);
    println!("      Style: {}", config.style);
    println!("      Length: {}", config.length);
    println!("      Persona: {}", config.persona);
    println!("      System prompt: {}", config.system_prompt);
}
