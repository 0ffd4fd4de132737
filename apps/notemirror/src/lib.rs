use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nm_config::{Config, Environment};
use nm_service::{ListItem, Mirror};

#[derive(Debug, Parser)]
#[command(
	version = nm_cli::VERSION,
	about = nm_cli::ABOUT,
	rename_all = "kebab",
	styles = nm_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Overrides `mirror.dest_dir`.
	#[arg(long, value_name = "DIR")]
	pub dest_dir: Option<PathBuf>,
	/// Talks to the sandbox service instead of the configured environment.
	#[arg(long)]
	pub sandbox: bool,
	#[command(subcommand)]
	pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Bring the local mirror up to date (the default).
	Sync,
	/// Print `<id>: <title>` for the given notes, or for every note.
	List { ids: Vec<String> },
	/// Download the given notes, or every note, ignoring the index.
	Duplicate { ids: Vec<String> },
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = load_config(&args)?;

	init_tracing(&config)?;

	let session = nm_remote::connect(&config.remote).await?;
	let username = session.username;
	let mirror = Mirror::new(session.note_store, &config.mirror.dest_dir)
		.with_page_size(config.mirror.page_size);

	tracing::info!(%username, dest_dir = %mirror.base_dir().display(), "Mirror ready.");

	match args.command.unwrap_or(Command::Sync) {
		Command::Sync => {
			mirror.sync().await?;
		},
		Command::List { ids } => {
			let items =
				if ids.is_empty() { mirror.list_all().await? } else { mirror.list(&ids).await };

			print_items(&items);
		},
		Command::Duplicate { ids } => {
			let report = if ids.is_empty() {
				mirror.duplicate_all().await?
			} else {
				mirror.duplicate(&ids).await?
			};

			tracing::info!(
				written = report.written.len(),
				failed = report.failed.len(),
				"Duplicate finished."
			);
		},
	}

	Ok(())
}

/// Loads the file, applies the command-line overrides, and validates the result again.
pub fn load_config(args: &Args) -> color_eyre::Result<Config> {
	let mut config = nm_config::load(&args.config)?;

	if let Some(dest_dir) = &args.dest_dir {
		config.mirror.dest_dir = dest_dir.clone();
	}
	if args.sandbox {
		config.remote.environment = Environment::Sandbox;
	}

	nm_config::validate(&config)?;

	Ok(config)
}

fn print_items(items: &[ListItem]) {
	for item in items {
		println!("{}: {}", item.guid, item.title);
	}
}

fn init_tracing(config: &Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	Ok(())
}
