use std::fs;

use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::ai::chat::{Chat, Role, Session};
use crate::ai::context::RagSource;
use crate::core::{AppConfig, init_tracing};
use crate::documents::DocumentKind;

const HELP: &str = "\
/new            start a new conversation
/threads        list conversations
/select N       switch to conversation N
/delete N       delete conversation N
/file PATH      use a PDF, TXT or CSV file as context
/text TEXT      use pasted text as context
/rag on|off     toggle context
/logout         log out
/login          log back in
/quit           exit";

#[derive(Debug, PartialEq)]
enum Input {
    Message(String),
    New,
    Threads,
    Select(usize),
    Delete(usize),
    File(String),
    Text(String),
    Rag(bool),
    Logout,
    Login,
    Help,
    Quit,
    Invalid(String),
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    let Some(command) = line.strip_prefix('/') else {
        return Input::Message(line.to_string());
    };
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    match (name, arg) {
        ("new", _) => Input::New,
        ("threads", _) => Input::Threads,
        ("select", n) => n
            .parse()
            .map(Input::Select)
            .unwrap_or_else(|_| Input::Invalid(format!("Invalid thread number: {}", n))),
        ("delete", n) => n
            .parse()
            .map(Input::Delete)
            .unwrap_or_else(|_| Input::Invalid(format!("Invalid thread number: {}", n))),
        ("file", "") => Input::Invalid("Usage: /file PATH".to_string()),
        ("file", path) => Input::File(path.to_string()),
        ("text", text) => Input::Text(text.to_string()),
        ("rag", "on") => Input::Rag(true),
        ("rag", "off") => Input::Rag(false),
        ("rag", _) => Input::Invalid("Usage: /rag on|off".to_string()),
        ("logout", _) => Input::Logout,
        ("login", _) => Input::Login,
        ("help", _) => Input::Help,
        ("quit", _) | ("exit", _) => Input::Quit,
        (other, _) => Input::Invalid(format!("Unknown command /{}. Try /help", other)),
    }
}

fn print_threads(session: &Session) {
    for (idx, thread) in session.threads().iter().enumerate() {
        let marker = if idx == session.active_index() { "*" } else { " " };
        println!(
            "{} {} 📝 {} ({} mensagens)",
            marker,
            idx,
            thread.title,
            thread.messages.len()
        );
    }
}

fn print_transcript(session: &Session) {
    let thread = session.active_thread();
    println!("== {} ==", thread.title);
    for msg in &thread.messages {
        match msg.role {
            Role::User => println!("[{}] Você: {}", msg.time, msg.content),
            Role::Assistant => println!("[{}] {}", msg.time, msg.content),
        }
    }
}

fn load_file(path: &str) -> Result<RagSource, String> {
    let kind = DocumentKind::from_file_name(path)
        .ok_or_else(|| format!("Unsupported file type: {}", path))?;
    let bytes = fs::read(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    let name = std::path::Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
        .to_string();
    Ok(RagSource::File { kind, name, bytes })
}

fn login(rl: &mut DefaultEditor, session: &mut Session, password: &str) -> Result<bool> {
    loop {
        match rl.readline("Senha: ") {
            Ok(line) => {
                if session.authenticate(line.trim(), password) {
                    return Ok(true);
                }
                println!("Senha incorreta");
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(false),
            Err(err) => return Err(err.into()),
        }
    }
}

/// Handles one line of input. Returns false when the shell should exit.
async fn handle(input: Input, session: &mut Session, chat: &Chat) -> bool {
    match input {
        Input::Message(text) => {
            if let Some(reply) = session.submit(&text, chat).await {
                println!("[{}] {}", reply.time, reply.content);
            }
        }
        Input::New => {
            session.create_thread();
            print_transcript(session);
        }
        Input::Threads => print_threads(session),
        Input::Select(idx) => {
            if session.select_thread(idx) {
                print_transcript(session);
            } else {
                println!("No conversation {}", idx);
            }
        }
        Input::Delete(idx) => {
            if session.delete_thread(idx) {
                print_threads(session);
            } else {
                println!("No conversation {}", idx);
            }
        }
        Input::File(path) => match load_file(&path) {
            Ok(source) => {
                session.set_rag_source(source);
                println!("Context file set (RAG is {})", on_off(session.rag().enabled));
            }
            Err(e) => println!("{}", e),
        },
        Input::Text(text) => {
            session.set_rag_source(RagSource::Text(text));
            println!("Context text set (RAG is {})", on_off(session.rag().enabled));
        }
        Input::Rag(enabled) => {
            session.set_rag_enabled(enabled);
            println!("RAG is {}", on_off(enabled));
        }
        Input::Logout => {
            session.logout();
            println!("Sessão encerrada");
        }
        // The shell asks for the password whenever the session is logged out
        Input::Login => println!("Already logged in"),
        Input::Help => println!("{}", HELP),
        Input::Quit => return false,
        Input::Invalid(msg) => println!("{}", msg),
    }
    true
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

pub async fn run() -> Result<()> {
    init_tracing(&format!("{}=warn", env!("CARGO_CRATE_NAME")));

    let config = AppConfig::default();
    let chat = Chat::from_config(&config)?;
    let mut session = Session::new(config.decoding_params);
    let mut rl = DefaultEditor::new()?;

    loop {
        if !session.is_authenticated() && !login(&mut rl, &mut session, &config.password)? {
            break;
        }

        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());
                if !handle(parse_input(&line), &mut session, &chat).await {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
