//! The interactive loop: rustyline editor, completion helper, dispatch
//! rendering, and session persistence after every command.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tracing::{error, info, warn};

use stint_core::command::dispatcher::{dispatch, Dispatched};
use stint_core::command::registry::CommandRegistry;
use stint_core::session::Session;
use stint_core::time_entry::format_seconds;
use stint_core::AppContext;
use stint_infrastructure::SessionStateRepository;

const BUILTINS: [(&str, &str); 3] = [
    ("/help", "/help [command] - show this help"),
    ("/exit", "/exit - leave stint"),
    ("/quit", "/quit - leave stint"),
];

/// CLI helper for rustyline that provides completion, highlighting, and
/// hints over the registered command names.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new(registry: &CommandRegistry) -> Self {
        let mut commands: Vec<String> = registry
            .names()
            .into_iter()
            .map(|name| format!("/{}", name))
            .collect();
        commands.extend(BUILTINS.iter().map(|(name, _)| name.to_string()));
        commands.sort();
        Self { commands }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Prompt reflecting the session state, so the active task and its elapsed
/// time are always visible.
fn prompt_for(session: &Session) -> String {
    match &session.active_task_id {
        Some(task) => {
            let elapsed = format_seconds(session.elapsed());
            if session.is_running() {
                format!("stint [{} {}]> ", task, elapsed)
            } else {
                format!("stint [{} {} paused]> ", task, elapsed)
            }
        }
        None => "stint> ".to_string(),
    }
}

fn render_help(registry: &CommandRegistry, topic: Option<&str>) {
    if let Some(topic) = topic {
        if let Some((_, help)) = BUILTINS.iter().find(|(name, _)| name[1..] == *topic) {
            println!("{}", help);
            return;
        }
        match registry.lookup(topic) {
            Some(entry) => println!("{}", entry.help_text),
            None => println!(
                "{}",
                format!("No such command '/{}'. Type /help for the list.", topic).yellow()
            ),
        }
        return;
    }

    println!("{}", "Commands".bold());
    for entry in registry.entries() {
        println!("  {}", entry.help_text);
    }
    for (_, help) in BUILTINS.iter().take(2) {
        println!("  {}", help);
    }
    println!();
    println!(
        "{}",
        "Plain text (no leading '/') is recorded as a note on the active task.".bright_black()
    );
}

/// Runs the interactive loop until `/exit` or end of input. The session is
/// persisted after every dispatched line so a crash never loses the timer.
pub async fn run(
    registry: CommandRegistry,
    mut ctx: AppContext,
    state: SessionStateRepository,
    history_path: PathBuf,
) -> Result<()> {
    let helper = CliHelper::new(&registry);
    let mut rl: Editor<CliHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(helper));
    // Missing history just means a first run.
    let _ = rl.load_history(&history_path);

    println!("{}", "=== stint ===".bright_magenta().bold());
    println!(
        "{}",
        "Type /help for commands, /exit to leave. Plain text becomes a note.".bright_black()
    );
    println!();

    loop {
        let readline = rl.readline(&prompt_for(&ctx.session));

        match readline {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(&line);
                }

                let result = dispatch(&line, &registry, &mut ctx).await;
                persist_session(&state, &ctx.session);

                match result {
                    Dispatched::Continue => {}
                    Dispatched::Exit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Dispatched::Help { topic } => render_help(&registry, topic.as_deref()),
                    Dispatched::Unknown { name } => {
                        println!(
                            "{}",
                            format!("Unknown command '/{}'. Type /help for the list.", name)
                                .yellow()
                        );
                    }
                    Dispatched::NoActiveTask => {
                        println!(
                            "{}",
                            "No active task to attach this note to. /start <KEY> first."
                                .yellow()
                        );
                    }
                    Dispatched::Failed(err) => {
                        error!("command failed: {}", err);
                        println!("{}", format!("Error: {}", err).red());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "Interrupted. Type /exit to leave.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            Err(err) => {
                error!("readline failed: {}", err);
                return Err(err.into());
            }
        }
    }

    persist_session(&state, &ctx.session);
    if let Err(err) = rl.save_history(&history_path) {
        warn!("failed to save history: {}", err);
    }
    info!("session ended");
    Ok(())
}

fn persist_session(state: &SessionStateRepository, session: &Session) {
    if let Err(err) = state.save(session) {
        warn!("failed to persist session: {}", err);
        println!(
            "{}",
            format!("Warning: session state not saved ({})", err).yellow()
        );
    }
}
