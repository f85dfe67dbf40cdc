//! SMS Launcher command-line client

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use smslaunch_core::{ComposeAction, ComposeSession, ContactId, Launcher, Step};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use smslaunch_client::{
    ApiClient, ClientConfig, ClientSession, CommandLauncher, ComposeDriver, ContactList,
    PrintLauncher,
};

#[derive(Parser, Debug)]
#[command(name = "smslaunch")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server URL (overrides SMSLAUNCH_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// File holding the bearer token (overrides SMSLAUNCH_TOKEN_FILE)
    #[arg(long, global = true)]
    token_file: Option<PathBuf>,

    /// Pause after each hand-off, in milliseconds
    #[arg(long, global = true)]
    delay_ms: Option<u64>,

    /// Program used to open sms: URIs
    #[arg(long, global = true)]
    opener: Option<String>,

    /// Print sms: URIs instead of opening them
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and sign in
    Register {
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign in to an existing account
    Login {
        email: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign out and forget the stored token
    Logout,
    /// Show the signed-in account
    Me,
    /// Set your own phone number; pass "" to clear it
    SetPhone { number: String },
    /// List contacts, newest first
    List,
    /// Add a contact
    Add { name: String, number: String },
    /// Change a contact's name or number
    Edit {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        number: Option<String>,
    },
    /// Delete a contact
    Rm { id: u64 },
    /// Open the messaging app for the selected contacts
    Send {
        /// Contact ids, in any order; sent in list order
        ids: Vec<u64>,
        /// Select the first contacts up to the selection cap
        #[arg(long, conflicts_with = "ids")]
        all: bool,
        /// Message body
        #[arg(short, long, default_value = "")]
        message: String,
        /// One message addressed to everyone instead of one per contact
        #[arg(long)]
        group: bool,
        /// Send to everyone without prompting
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smslaunch_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    // Load configuration, flags win over the environment
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = args.url {
        config.base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(path) = args.token_file {
        config.token_file = Some(path);
    }
    if let Some(ms) = args.delay_ms {
        config.handoff_delay = Duration::from_millis(ms);
    }
    if let Some(opener) = args.opener {
        config.opener = opener;
    }
    tracing::debug!(?config, "Loaded configuration");

    let api = ApiClient::new();
    let mut session = ClientSession::new(config.base_url.clone());
    if let Some(path) = &config.token_file {
        session = session.with_token_file(path);
    }

    match args.command {
        Command::Register { email, password } => {
            let password = password_or_prompt(password).await?;
            let user = session.register(&api, &email, &password).await?;
            println!("Registered and signed in as {}", user.email);
        }
        Command::Login { email, password } => {
            let password = password_or_prompt(password).await?;
            let user = session.login(&api, &email, &password).await?;
            println!("Signed in as {}", user.email);
        }
        Command::Logout => {
            session.restore_token()?;
            session.logout(&api).await?;
            println!("Signed out");
        }
        Command::Me => {
            let user = require_user(&mut session, &api).await?;
            println!("{}", user.email);
            match &user.phone_number {
                Some(number) => println!("Phone: {}", number),
                None => println!("Phone: not set"),
            }
        }
        Command::SetPhone { number } => {
            require_user(&mut session, &api).await?;
            let user = session.update_phone(&api, &number).await?;
            match &user.phone_number {
                Some(number) => println!("Phone set to {}", number),
                None => println!("Phone cleared"),
            }
        }
        Command::List => {
            let list = load_list(&mut session, &api, &config).await?;
            if list.contacts().is_empty() {
                println!("No contacts yet. Add one with `smslaunch add <name> <number>`.");
            }
            for contact in list.contacts() {
                println!("{:>6}  {:<30}  {}", contact.id.0, contact.name, contact.number);
            }
        }
        Command::Add { name, number } => {
            let mut list = load_list(&mut session, &api, &config).await?;
            let contact = list.add(&api, &mut session, &name, &number).await?;
            println!("Added {} ({}) as #{}", contact.name, contact.number, contact.id);
        }
        Command::Edit { id, name, number } => {
            let mut list = load_list(&mut session, &api, &config).await?;
            let id = ContactId(id);
            let current = list
                .get(id)
                .cloned()
                .with_context(|| format!("No contact with id {}", id))?;
            let name = name.unwrap_or(current.name);
            let number = number.unwrap_or(current.number);
            let contact = list.update(&api, &mut session, id, &name, &number).await?;
            println!("Updated #{}: {} ({})", contact.id, contact.name, contact.number);
        }
        Command::Rm { id } => {
            let mut list = load_list(&mut session, &api, &config).await?;
            list.delete(&api, &mut session, ContactId(id)).await?;
            println!("Deleted #{}", id);
        }
        Command::Send {
            ids,
            all,
            message,
            group,
            yes,
        } => {
            let mut list = load_list(&mut session, &api, &config).await?;
            select(&mut list, &ids, all)?;
            list.set_message(message);

            let launcher: Box<dyn Launcher + Send + Sync> = if args.dry_run {
                Box::new(PrintLauncher)
            } else {
                Box::new(CommandLauncher::new(config.opener.clone()))
            };

            if group {
                let uri = list.send_group(&launcher)?;
                println!("Opened group message: {}", uri);
            } else {
                let compose = list.start_compose()?;
                let mut driver = ComposeDriver::new(compose, launcher, config.handoff_delay);
                if yes {
                    let summary = driver.send_all().await?;
                    println!("Opened {} of {} messages", summary.sent, summary.total);
                } else {
                    step_interactively(&mut driver).await?;
                }
                list.finish_compose();
            }
        }
    }

    Ok(())
}

/// Restore the stored session, failing when nobody is signed in
async fn require_user<'a>(
    session: &'a mut ClientSession,
    api: &ApiClient,
) -> Result<&'a smslaunch_client::User> {
    match session.init_on_load(api).await? {
        Some(user) => Ok(user),
        None => bail!("Not signed in. Run `smslaunch login <email>` first."),
    }
}

async fn load_list(
    session: &mut ClientSession,
    api: &ApiClient,
    config: &ClientConfig,
) -> Result<ContactList> {
    require_user(session, api).await?;
    let mut list = ContactList::new(config.max_selected);
    list.refresh(api, session).await?;
    Ok(list)
}

fn select(list: &mut ContactList, ids: &[u64], all: bool) -> Result<()> {
    if all {
        list.toggle_all();
        if list.contacts().len() > list.selection().max() {
            println!(
                "Selected the first {} of {} contacts",
                list.selection().max(),
                list.contacts().len()
            );
        }
        return Ok(());
    }

    for &id in ids {
        let id = ContactId(id);
        if list.get(id).is_none() {
            bail!("No contact with id {}", id);
        }
        if !list.selection().contains(id) {
            list.toggle(id)?;
        }
    }
    Ok(())
}

/// Prompt for each contact until the session is done
async fn step_interactively<L: Launcher>(driver: &mut ComposeDriver<L>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let (prompt, actions) = describe(driver.session());
        print_flush(&prompt).await?;

        let Some(line) = lines.next_line().await? else {
            // Input closed, treat as cancel
            finish(driver, ComposeAction::Cancel).await?;
            return Ok(());
        };

        let action = match parse_action(line.trim(), &actions) {
            Some(action) => action,
            None => {
                println!("Please choose one of the listed actions");
                continue;
            }
        };

        if let Some(summary) = finish(driver, action).await? {
            println!(
                "Done: {} sent, {} skipped of {}{}",
                summary.sent,
                summary.skipped,
                summary.total,
                if summary.cancelled { " (cancelled)" } else { "" }
            );
            return Ok(());
        }
    }
}

/// Apply an action, reporting how to resume when cancelling early
async fn finish<L: Launcher>(
    driver: &mut ComposeDriver<L>,
    action: ComposeAction,
) -> Result<Option<smslaunch_core::ComposeSummary>> {
    let remaining: Vec<String> = driver
        .session()
        .remaining()
        .iter()
        .map(|c| c.id.to_string())
        .collect();

    let transition = driver.apply(action).await?;
    if let Some(uri) = &transition.handoff {
        tracing::debug!(uri = %uri, "Handed off");
    }

    match transition.step {
        Step::Presenting { .. } => Ok(None),
        Step::Done(summary) => {
            if summary.cancelled && !remaining.is_empty() {
                println!("Resume with: smslaunch send {}", remaining.join(" "));
            }
            Ok(Some(summary))
        }
    }
}

fn describe(session: &ComposeSession) -> (String, Vec<ComposeAction>) {
    let actions = session.available_actions();
    let contact = match session.current() {
        Some(contact) => format!("{} <{}>", contact.name, contact.number),
        None => String::new(),
    };
    let choices: Vec<String> = actions
        .iter()
        .map(|a| format!("[{}] {}", action_key(*a), a))
        .collect();

    let prompt = format!(
        "({}/{}, {}%) {}\n{} > ",
        session.index() + 1,
        session.total(),
        session.progress_percent(),
        contact,
        choices.join("  ")
    );
    (prompt, actions)
}

fn action_key(action: ComposeAction) -> char {
    match action {
        ComposeAction::SendAndNext => 'n',
        ComposeAction::SendAndFinish => 'f',
        ComposeAction::Skip => 's',
        ComposeAction::Cancel => 'c',
    }
}

fn parse_action(input: &str, actions: &[ComposeAction]) -> Option<ComposeAction> {
    let key = input.chars().next()?.to_ascii_lowercase();
    actions.iter().copied().find(|a| action_key(*a) == key)
}

async fn print_flush(text: &str) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

/// Read a password from stdin when it was not passed as a flag
async fn password_or_prompt(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    print_flush("Password: ").await?;
    let mut lines: Lines<BufReader<Stdin>> = BufReader::new(tokio::io::stdin()).lines();
    let line = lines
        .next_line()
        .await?
        .context("No password given")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
