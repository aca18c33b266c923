// crates/skillswap-cli/src/commands/shell.rs
//
// `skillswap shell` — interactive session over one controller.
//
// A background task prints transaction status changes and activity entries
// as the controller broadcasts them. With `auto_approve` set, writes run in
// the background too, so the prompt stays usable while one is pending and
// a second write of the same kind is refused. Without it, writes run in the
// foreground because the signing prompt needs stdin.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use skillswap_client::{AppEvent, CategoryFilter, SkillRegistryController};
use skillswap_core::record::{SkillCategory, SkillDraft};

use crate::context::Context;
use crate::output::{format_banner, format_table, stat_rows, ActivityRow, RecordRow};

const HELP: &str = "\
Commands:
  list [search]                 show skills, optionally matching a search term
  filter <type|all>             restrict list to one skill type
  stats                         per-type counts
  submit <type> [description]   share a skill
  rate <id> <1-5>               rate a skill
  learn <id>                    ask to learn a skill
  reload                        reload from the store
  activity                      recent activity
  status                        wallet and transaction status
  connect | disconnect          wallet session
  help | quit";

/// One parsed shell line.
#[derive(Debug, PartialEq)]
enum ShellCommand {
    List(Option<String>),
    Filter(String),
    Stats,
    Submit { category: String, description: String },
    Rate { id: String, stars: String },
    Learn(String),
    Reload,
    Activity,
    Status,
    Connect,
    Disconnect,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_line(line: &str) -> ShellCommand {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((h, r)) => (h, r.trim()),
        None => (line, ""),
    };
    let mut args = rest.split_whitespace();

    match head.to_lowercase().as_str() {
        "" => ShellCommand::Empty,
        "list" | "ls" => ShellCommand::List((!rest.is_empty()).then(|| rest.to_string())),
        "filter" => ShellCommand::Filter(rest.to_string()),
        "stats" => ShellCommand::Stats,
        "submit" => {
            let category = args.next().unwrap_or_default().to_string();
            let description = rest[category.len()..].trim().to_string();
            ShellCommand::Submit { category, description }
        }
        "rate" => ShellCommand::Rate {
            id: args.next().unwrap_or_default().to_string(),
            stars: args.next().unwrap_or_default().to_string(),
        },
        "learn" => ShellCommand::Learn(rest.to_string()),
        "reload" => ShellCommand::Reload,
        "activity" => ShellCommand::Activity,
        "status" => ShellCommand::Status,
        "connect" => ShellCommand::Connect,
        "disconnect" => ShellCommand::Disconnect,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => ShellCommand::Unknown(other.to_string()),
    }
}

fn print_event(event: &AppEvent) {
    match event {
        AppEvent::TransactionChanged(state) => {
            if let Some(line) = format_banner(state) {
                println!("{}", line);
            }
        }
        AppEvent::ActivityRecorded(entry) => println!("  {}  {}", entry.timestamp, entry.text),
        AppEvent::LoadFailed { message } => println!("[error] {}", message),
        AppEvent::SubmissionFormReset => println!("  (submission form cleared)"),
        AppEvent::RecordsReloaded { .. } | AppEvent::SessionChanged { .. } => {}
    }
}

/// Run the interactive shell.
pub async fn run(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let controller = Arc::new(ctx.controller()?);

    let mut events = controller.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => print_event(&event),
                Err(RecvError::Lagged(n)) => tracing::warn!("Shell missed {} events", n),
                Err(RecvError::Closed) => break,
            }
        }
    });

    println!("SkillSwap shell. Type `help` for commands.");
    connect(ctx, &controller).await;
    let _ = controller.load_all().await;

    let background_writes = ctx.config.auto_approve;
    let mut filter = CategoryFilter::All;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("skillswap> ");
        let _ = std::io::stdout().flush();
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_line(&line) {
            ShellCommand::Empty => {}
            ShellCommand::Help => println!("{}", HELP),
            ShellCommand::Quit => break,
            ShellCommand::Unknown(cmd) => println!("Unknown command '{}'. Type `help`.", cmd),
            ShellCommand::List(search) => {
                let records = controller.view(search.as_deref().unwrap_or(""), filter);
                if records.is_empty() {
                    println!("No matching skills.");
                } else {
                    let rows: Vec<RecordRow> = records.iter().map(RecordRow::from).collect();
                    println!("{}", format_table(&rows));
                }
            }
            ShellCommand::Filter(arg) => match arg.parse::<CategoryFilter>() {
                Ok(f) => {
                    filter = f;
                    println!("Filter: {}", filter);
                }
                Err(e) => println!("{}", e),
            },
            ShellCommand::Stats => {
                let stats = controller.stats();
                println!("Total skills shared: {}", stats.total);
                println!("{}", format_table(&stat_rows(&stats)));
            }
            ShellCommand::Submit { category, description } => {
                let category = match category.parse::<SkillCategory>() {
                    Ok(c) => c,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                };
                let draft = SkillDraft::new(category).with_description(description);
                let ctl = controller.clone();
                let task = async move {
                    if let Ok(id) = ctl.submit(draft).await {
                        println!("  Skill ID: {}", id);
                    }
                };
                dispatch(background_writes, task).await;
            }
            ShellCommand::Rate { id, stars } => {
                let Ok(stars) = stars.parse::<u8>() else {
                    println!("Usage: rate <id> <1-5>");
                    continue;
                };
                let ctl = controller.clone();
                dispatch(background_writes, async move {
                    let _ = ctl.rate(&id, stars).await;
                })
                .await;
            }
            ShellCommand::Learn(id) => {
                if let Err(e) = controller.request_learn(&id) {
                    println!("{}", e);
                }
            }
            ShellCommand::Reload => {
                let _ = controller.load_all().await;
            }
            ShellCommand::Activity => {
                let rows: Vec<ActivityRow> =
                    controller.activity().iter().map(ActivityRow::from).collect();
                println!("{}", format_table(&rows));
            }
            ShellCommand::Status => print_status(&controller),
            ShellCommand::Connect => connect(ctx, &controller).await,
            ShellCommand::Disconnect => controller.disconnect_wallet(),
        }
    }

    printer.abort();
    Ok(())
}

async fn connect(ctx: &Context, controller: &SkillRegistryController) {
    match ctx.load_wallet() {
        Ok(wallet) => {
            if let Err(e) = controller.connect_wallet(Arc::new(wallet)).await {
                println!("Could not connect wallet: {}", e);
            }
        }
        Err(e) => println!("No wallet connected: {}", e),
    }
}

/// Run a write either in the background or to completion.
async fn dispatch<F>(background: bool, task: F)
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    if background {
        tokio::spawn(task);
    } else {
        task.await;
    }
}

fn print_status(controller: &SkillRegistryController) {
    match controller.session() {
        Some(session) => println!("Wallet:      {}", session.address),
        None => println!("Wallet:      not connected"),
    }
    match format_banner(&controller.transaction()) {
        Some(line) => println!("Transaction: {}", line),
        None => println!("Transaction: idle"),
    }
    println!("Skills:      {}", controller.records().len());
    if let Some(e) = controller.last_load_error() {
        println!("Last load:   failed ({})", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_submit_keeps_description_spacing() {
        assert_eq!(
            parse_line("submit cooking  Thai  curries"),
            ShellCommand::Submit {
                category: "cooking".into(),
                description: "Thai  curries".into()
            }
        );
        assert_eq!(
            parse_line("submit"),
            ShellCommand::Submit {
                category: String::new(),
                description: String::new()
            }
        );
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse_line("   "), ShellCommand::Empty);
        assert_eq!(parse_line("LIST"), ShellCommand::List(None));
        assert_eq!(parse_line("list 0xab"), ShellCommand::List(Some("0xab".into())));
        assert_eq!(
            parse_line("rate abc 4"),
            ShellCommand::Rate {
                id: "abc".into(),
                stars: "4".into()
            }
        );
        assert_eq!(parse_line("exit"), ShellCommand::Quit);
        assert_eq!(parse_line("dance"), ShellCommand::Unknown("dance".into()));
    }
}
