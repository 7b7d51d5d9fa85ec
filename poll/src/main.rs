use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use banpick_poll::{spawn_poller, Board, HttpStatusSource, Visibility};

#[derive(Parser, Debug)]
#[command(name = "banpick-poll")]
#[command(about = "Terminal ban/pick board kept in sync with the shared lock sheet")]
struct Args {
    /// Character status endpoint to poll
    #[arg(long, default_value = "http://localhost:3000/api/character-status")]
    url: String,

    /// Seconds between refreshes while the board is shown
    #[arg(long, default_value_t = 5)]
    interval_secs: u64,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Show,
    Hide,
    Select(u8),
    Back,
    Board,
    Quit,
    Help,
}

impl Command {
    fn parse(line: &str) -> Option<Command> {
        let mut words = line.split_whitespace();
        let command = match words.next()? {
            "show" => Command::Show,
            "hide" => Command::Hide,
            "select" => Command::Select(words.next()?.parse().ok()?),
            "back" => Command::Back,
            "board" => Command::Board,
            "quit" | "exit" => Command::Quit,
            "help" => Command::Help,
            _ => return None,
        };
        Some(command)
    }
}

const USAGE: &str = "commands: show | hide | select <id> | back | board | quit";

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let period = Duration::from_secs(args.interval_secs.max(1));
    info!(url = %args.url, ?period, "Polling character status");

    let poller = spawn_poller(HttpStatusSource::new(args.url)?, Visibility::Visible, period);
    let mut disabled = poller.disabled();
    let mut board = Board::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{USAGE}");
    print!("{}", board.render());

    loop {
        tokio::select! {
            changed = disabled.changed() => {
                if changed.is_err() {
                    break;
                }
                let ids = disabled.borrow_and_update().clone();
                board.set_disabled(ids);
                print!("{}", board.render());
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match Command::parse(&line) {
                    Some(Command::Show) => poller.set_visibility(Visibility::Visible),
                    Some(Command::Hide) => poller.set_visibility(Visibility::Hidden),
                    Some(Command::Select(id)) => match board.select(id) {
                        Ok(_) => print!("{}", board.render()),
                        Err(err) => println!("{err}"),
                    },
                    Some(Command::Back) => {
                        board.back();
                        print!("{}", board.render());
                    }
                    Some(Command::Board) => print!("{}", board.render()),
                    Some(Command::Quit) => break,
                    Some(Command::Help) | None => println!("{USAGE}"),
                }
            }
        }
    }

    poller.unmount();
    Ok(())
}

#[test]
fn test_command_parsing() {
    assert_eq!(Command::parse("select 12"), Some(Command::Select(12)));
    assert_eq!(Command::parse("  hide "), Some(Command::Hide));
    assert_eq!(Command::parse("exit"), Some(Command::Quit));
    assert_eq!(Command::parse("select"), None);
    assert_eq!(Command::parse("select twelve"), None);
    assert_eq!(Command::parse(""), None);
    assert_eq!(Command::parse("dance"), None);
}

#[test]
fn test_default_args() {
    let args = Args::parse_from(["banpick-poll"]);
    assert_eq!(args.url, "http://localhost:3000/api/character-status");
    assert_eq!(args.interval_secs, 5);
}
