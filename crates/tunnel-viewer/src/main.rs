//! Helix Tunnel - Native entry point

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use anyhow::{Context, Result};
    use clap::Parser;
    use std::path::PathBuf;
    use tracing::{info, Level};
    use tracing_subscriber::FmtSubscriber;

    #[derive(Parser, Debug)]
    #[command(name = "helix-tunnel")]
    #[command(about = "Fly through a glass helix tunnel with the mouse wheel")]
    #[command(version)]
    pub struct Args {
        /// Path to configuration file
        #[arg(short, long, default_value = "tunnel.toml")]
        pub config: PathBuf,

        /// Log level (trace, debug, info, warn, error)
        #[arg(short, long, default_value = "info")]
        pub log_level: String,

        /// glTF model to place in the scene, relative to the asset root
        #[arg(short, long)]
        pub model: Option<String>,

        /// Disable the cursor trail
        #[arg(long)]
        pub no_trail: bool,

        /// Write the default configuration to the config path and exit
        #[arg(long)]
        pub write_config: bool,
    }

    fn parse_level(level: &str) -> Level {
        match level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    pub fn main() -> Result<()> {
        let args = Args::parse();

        let subscriber = FmtSubscriber::builder()
            .with_max_level(parse_level(&args.log_level))
            .with_target(true)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;

        info!("Helix Tunnel v{}", env!("CARGO_PKG_VERSION"));

        if args.write_config {
            tunnel_core::config::save_default_config(&args.config)
                .with_context(|| format!("writing {}", args.config.display()))?;
            info!("Wrote default configuration to {:?}", args.config);
            return Ok(());
        }

        let mut config = tunnel_core::load_config(&args.config)
            .with_context(|| format!("loading {}", args.config.display()))?;

        if let Some(model) = args.model {
            config.model.path = Some(model);
        }
        if args.no_trail {
            config.trail.enabled = false;
        }

        tunnel_viewer::run(config);
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::main()
}

// The browser build starts from `tunnel_viewer::start`
#[cfg(target_arch = "wasm32")]
fn main() {}
