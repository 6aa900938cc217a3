use anyhow::Result;
use tradestudy::cli::{self, Commands};
use tradestudy::commands::{self, BuildConfig};

fn main() -> Result<()> {
    env_logger::init();
    let cli = cli::parse_args();

    match cli.command {
        Commands::Build {
            input,
            format,
            output,
            fallback_pdf,
            config,
        } => {
            let build_config = BuildConfig {
                input,
                formats: format.formats(),
                output,
                fallback_pdf,
                config_path: config,
            };
            commands::build_documents(&build_config)
        }
        Commands::Formats => {
            commands::list_formats();
            Ok(())
        }
    }
}
