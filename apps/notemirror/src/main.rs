use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = notemirror::Args::parse();

	notemirror::run(args).await
}
