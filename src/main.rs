mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use filepanel::kernel::services::adapters::{
    ensure_config_file, get_config_path, load_config, FileProviders, LocalFileProvider,
};
use filepanel::kernel::services::ports::{FileProvider, PanelConfig, ProviderKind};
use filepanel::kernel::services::PanelContext;
use filepanel::kernel::{BootstrapOutcome, BootstrapSignals, DaemonHandle, FilePanel};

const USAGE: &str =
    "usage: filepanel <storage-dir> [--localhost <dir>] [--code <base64>] [--snippet <id>]";

#[derive(Debug, PartialEq, Eq)]
struct CliArgs {
    storage: PathBuf,
    localhost: Option<PathBuf>,
    signals: BootstrapSignals,
}

fn parse_args<I>(args: I) -> Result<CliArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let mut storage = None;
    let mut localhost = None;
    let mut pairs = Vec::new();

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let flag = match arg.as_str() {
            "--code" | "--snippet" | "--gist" | "--localhost" => arg,
            other if other.starts_with("--") => return Err(format!("unknown option: {other}")),
            _ => {
                if storage.replace(PathBuf::from(&arg)).is_some() {
                    return Err(format!("unexpected argument: {arg}"));
                }
                continue;
            }
        };
        let Some(value) = args.next() else {
            return Err(format!("{flag} needs a value"));
        };
        match flag.as_str() {
            "--localhost" => localhost = Some(PathBuf::from(value)),
            _ => pairs.push((flag.trim_start_matches("--").to_string(), value)),
        }
    }

    let storage = storage.ok_or_else(|| USAGE.to_string())?;
    Ok(CliArgs {
        storage,
        localhost,
        signals: BootstrapSignals::from_pairs(pairs),
    })
}

/// Config errors are returned rather than logged; logging is configured from the result.
fn read_config() -> (PanelConfig, Option<std::io::Error>) {
    let created = ensure_config_file().err();
    (load_config().unwrap_or_default(), created)
}

async fn run(args: CliArgs, config: PanelConfig) -> std::io::Result<()> {
    tokio::fs::create_dir_all(&args.storage).await?;
    let browser: Arc<dyn FileProvider> =
        Arc::new(LocalFileProvider::new(ProviderKind::Browser, &args.storage));
    let mut providers = FileProviders::new(browser);
    if let Some(dir) = &args.localhost {
        tokio::fs::create_dir_all(dir).await?;
        providers.register(Arc::new(LocalFileProvider::new(ProviderKind::Localhost, dir)));
    }

    let daemon = Arc::new(DaemonHandle::new(config.daemon.clone()));
    let panel = FilePanel::new(PanelContext::new(providers, config), daemon);

    match panel.bootstrap(args.signals).await {
        BootstrapOutcome::CodeSample { path } => println!("opened {path}"),
        BootstrapOutcome::CodeSampleFailed => eprintln!("failed to load code sample, see log"),
        BootstrapOutcome::Snippet { imported } => println!("snippet imported: {imported}"),
        BootstrapOutcome::DefaultCreated | BootstrapOutcome::Existing => {}
    }

    match panel.get_workspaces().await {
        Ok(workspaces) => {
            for name in workspaces {
                println!("{name}");
            }
        }
        Err(e) => eprintln!("{e}"),
    }
    Ok(())
}

fn main() -> std::io::Result<()> {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
    };
    let (config, config_error) = read_config();
    let logging = logging::init(&config.log);
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "failed to create default config");
    }
    if let Some(guard) = &logging {
        tracing::info!(
            storage = %args.storage.display(),
            config = ?get_config_path(),
            log_dir = %guard.log_dir().display(),
            "starting"
        );
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .or_else(|e| {
            tracing::error!(
                error = %e,
                "Failed to create multi-thread tokio runtime, falling back to current-thread"
            );
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
        })?;
    runtime.block_on(run(args, config))
}

#[cfg(test)]
#[path = "../tests/unit/cli_args.rs"]
mod tests;
