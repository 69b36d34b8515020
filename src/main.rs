use clap::Parser;
use dialoguer::Input;
use medsupport::{cli, client, config, error, loader, notify, runner};
use cli::{Cli, Commands, OrderingArg, OutputArgs, TaskArgs};
use client::BackendClient;
use config::Config;
use error::{MedSupportError, Result};
use medsupport_common::{api, BoxPolicy, Notifier, ResponseOrdering, Task, Toast};
use notify::ConsoleNotifier;
use runner::TaskInput;
use std::io::IsTerminal;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "medsupport=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load()?;
    let api_url = cli.api_url.as_deref();

    let interactive_terminal = std::io::stderr().is_terminal();
    let mut notifier = ConsoleNotifier::new(interactive_terminal);

    if let Some(task) = cli.command.task() {
        tracing::debug!(task = task.slug(), base_url = %config.base_url(api_url), "starting task");
    }

    match cli.command {
        Commands::Scribe(args) => {
            run_text_task(Task::ClinicalNote, args, &config, api_url, &mut notifier, interactive_terminal)
                .await?;
        }

        Commands::Explain(args) => {
            run_text_task(Task::ReportSimplification, args, &config, api_url, &mut notifier, interactive_terminal)
                .await?;
        }

        Commands::Diagnose { image, prompt, clamp_boxes, output } => {
            let client = backend(&config, api_url)?;
            let text = prompt.or_else(|| config.diagnostic_prompt.clone());
            let input = TaskInput { text, image: Some(image.as_path()) };
            let session = runner::run_task(
                &client,
                Task::ImageDiagnostics,
                input,
                config.response_ordering,
                &mut notifier,
                interactive_terminal,
            )
            .await?;

            let policy = if clamp_boxes { BoxPolicy::Clamp } else { config.box_policy };
            write_output(&runner::render_output(&session, output.format, policy), &output, &mut notifier)?;
        }

        Commands::Health => {
            let client = backend(&config, api_url)?;
            let health = client.health().await?;
            println!("{}: {}", client.base_url(), health.status);
        }

        Commands::Config { set_api_url, set_ordering, show } => {
            if let Some(url) = set_api_url {
                config.set_api_url(url)?;
                println!("✔ ベースURLを設定しました");
            }

            if let Some(ordering) = set_ordering {
                config.response_ordering = match ordering {
                    OrderingArg::LatestRequest => ResponseOrdering::LatestRequest,
                    OrderingArg::LastSettled => ResponseOrdering::LastSettled,
                };
                config.save()?;
                println!("✔ レスポンス順序の扱いを設定しました");
            }

            if show {
                println!("設定:");
                println!(
                    "  ベースURL（保存値）: {}",
                    config.api_url.as_deref().unwrap_or(api::DEFAULT_API_URL)
                );
                if let Some(url) = api_url {
                    println!("  今回の上書き: {}", url);
                }
                println!(
                    "  環境変数 {}: {}",
                    api::API_URL_ENV,
                    if std::env::var(api::API_URL_ENV).is_ok() { "設定済み" } else { "未設定" }
                );
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  レスポンス順序: {:?}", config.response_ordering);
                println!("  座標の扱い: {:?}", config.box_policy);
                println!(
                    "  画像診断プロンプト: {}",
                    config.diagnostic_prompt.as_deref().unwrap_or("(既定)")
                );
            }
        }
    }

    Ok(())
}

fn backend(config: &Config, api_url: Option<&str>) -> Result<BackendClient> {
    BackendClient::new(config.base_url(api_url), Duration::from_secs(config.timeout_seconds))
}

async fn run_text_task(
    task: Task,
    args: TaskArgs,
    config: &Config,
    api_url: Option<&str>,
    notifier: &mut ConsoleNotifier,
    show_spinner: bool,
) -> Result<()> {
    let text = if let Some(text) = args.text {
        Some(text)
    } else if let Some(path) = &args.text_file {
        Some(loader::load_text(path)?)
    } else if args.interactive {
        let text: String = Input::new()
            .with_prompt(task.title())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| MedSupportError::Prompt(e.to_string()))?;
        Some(text)
    } else {
        None
    };

    let client = backend(config, api_url)?;
    let input = TaskInput { text, image: args.image.as_deref() };
    let session =
        runner::run_task(&client, task, input, config.response_ordering, notifier, show_spinner).await?;

    write_output(
        &runner::render_output(&session, args.output.format, config.box_policy),
        &args.output,
        notifier,
    )
}

fn write_output(rendered: &str, output: &OutputArgs, notifier: &mut dyn Notifier) -> Result<()> {
    match &output.output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            notifier.notify(Toast::info("Saved result").description(path.display().to_string()));
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
