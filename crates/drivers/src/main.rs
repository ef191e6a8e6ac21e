mod config;
mod logging;
mod ui;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use config::AppConfig;
use polaroid_studio_adapters::{
    present_metrics, present_plan, present_poll_report, present_presentation_type,
    present_upload_report, present_view, DataUrlDecoder, InlineDecodePipeline, LogNotifier,
    ThreadedDecodePipeline, WalkdirFileScanner,
};
use polaroid_studio_application::view::WizardView;
use polaroid_studio_application::{
    ClearImagesCommand, DecodeMetricsQuery, DecodePipeline, ImageDecoder, Notifier,
    PollDecodesCommand,
    PollReport, RenderViewQuery, SelectColorThemeCommand, SelectPresentationTypeCommand,
    SubmissionPlan, SubmitCommand, UploadFolderCommand, WizardConfig, WizardService,
};
use polaroid_studio_domain::{ColorTheme, PresentationType};
use serde::Serialize;
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Polaroid Studio: pick photos, a frame style and a color theme.
#[derive(Parser, Debug)]
#[command(name = "polaroid-studio", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the wizard window (default)
    Ui,
    /// Walk a folder through the wizard without a window and print the result
    Run(RunArgs),
    /// List the available presentation types
    Types,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Folder whose files are uploaded as one batch
    folder: PathBuf,

    /// Presentation type code (F, H, Q, IS, FC, HC, QC, ISC)
    #[arg(long = "type")]
    kind: PresentationType,

    /// Color theme (light or dark)
    #[arg(long)]
    color: ColorTheme,

    /// Print the final view and plan as JSON
    #[arg(long)]
    json: bool,

    /// Upload, clear the gallery, then upload again before choosing
    #[arg(long)]
    clear_first: bool,

    /// Give up waiting for decodes after this many seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Decode on the calling thread so images keep the folder order
    #[arg(long)]
    deterministic: bool,
}

#[derive(Debug)]
enum CommandError {
    Usage(String),
    Runtime(String),
}

#[derive(Debug, Serialize)]
struct RunOutput {
    view: WizardView,
    plan: SubmissionPlan,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::from(2);
        }
    };
    logging::init(&config.logging, cli.verbose, cli.json_logs);

    match run_command(cli.command.unwrap_or(Commands::Ui), &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError::Usage(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(2)
        }
        Err(CommandError::Runtime(msg)) => {
            eprintln!("{msg}");
            ExitCode::from(1)
        }
    }
}

fn build_wizard_service(
    config: &AppConfig,
    wizard: WizardConfig,
    notifier: Box<dyn Notifier>,
    deterministic: bool,
) -> Result<WizardService, CommandError> {
    let labels = config
        .label_catalog()
        .map_err(|error| CommandError::Usage(error.to_string()))?;
    let decoder: Arc<dyn ImageDecoder> = Arc::new(DataUrlDecoder);
    let pipeline: Box<dyn DecodePipeline> = if deterministic {
        Box::new(InlineDecodePipeline::new(decoder))
    } else {
        Box::new(ThreadedDecodePipeline::new(decoder, config.decode.workers))
    };

    Ok(WizardService::new(
        wizard,
        pipeline,
        notifier,
        Box::new(labels),
        Box::new(WalkdirFileScanner),
    ))
}

fn run_command(command: Commands, config: &AppConfig) -> Result<(), CommandError> {
    match command {
        Commands::Ui => {
            let service = build_wizard_service(
                config,
                config.wizard.clone(),
                Box::new(ui::DialogNotifier),
                false,
            )?;
            ui::launch_window(service).map_err(CommandError::Runtime)
        }
        Commands::Run(args) => {
            let json = args.json;
            let output = run_headless(&args, config)?;
            if json {
                let text = serde_json::to_string_pretty(&output)
                    .map_err(|error| CommandError::Runtime(format!("json output failed: {error}")))?;
                println!("{text}");
            } else {
                println!("{}", present_view(&output.view));
                println!("{}", present_plan(&output.plan));
            }
            Ok(())
        }
        Commands::Types => {
            for kind in PresentationType::ALL {
                println!("{}", present_presentation_type(kind));
            }
            Ok(())
        }
    }
}

fn run_headless(args: &RunArgs, config: &AppConfig) -> Result<RunOutput, CommandError> {
    let wizard = WizardConfig {
        staged_reveals: false,
        ..config.wizard.clone()
    };
    let mut service = build_wizard_service(
        config,
        wizard,
        Box::new(LogNotifier::new(true)),
        args.deterministic,
    )?;
    let timeout = Duration::from_secs(args.timeout_secs);

    upload_and_settle(&mut service, &args.folder, timeout)?;
    if args.clear_first {
        let cleared = service
            .clear_images(ClearImagesCommand)
            .map_err(|error| CommandError::Runtime(format!("clear failed: {error}")))?;
        debug!(cleared, "gallery cleared before second upload");
        upload_and_settle(&mut service, &args.folder, timeout)?;
    }

    service
        .select_presentation_type(SelectPresentationTypeCommand { kind: args.kind })
        .map_err(|error| CommandError::Runtime(format!("type selection failed: {error}")))?;
    service
        .select_color_theme(SelectColorThemeCommand {
            theme: args.color,
            origin: None,
        })
        .map_err(|error| CommandError::Runtime(format!("color selection failed: {error}")))?;

    let view = service
        .render(RenderViewQuery)
        .map_err(|error| CommandError::Runtime(format!("render failed: {error}")))?;
    let plan = service
        .submit(SubmitCommand)
        .map_err(|error| CommandError::Runtime(format!("submit failed: {error}")))?;

    if let Ok(metrics) = service.decode_metrics(DecodeMetricsQuery) {
        info!("{}", present_metrics(&metrics));
    }
    Ok(RunOutput { view, plan })
}

fn upload_and_settle(
    service: &mut WizardService,
    folder: &Path,
    timeout: Duration,
) -> Result<PollReport, CommandError> {
    let report = service
        .upload_folder(UploadFolderCommand {
            folder: folder.to_string_lossy().to_string(),
        })
        .map_err(|error| CommandError::Runtime(format!("upload failed: {error}")))?;
    info!("{}", present_upload_report(&report));

    let deadline = Instant::now() + timeout;
    let mut total = PollReport::default();
    loop {
        let polled = service
            .poll_decodes(PollDecodesCommand)
            .map_err(|error| CommandError::Runtime(format!("decode failed: {error}")))?;
        total.appended += polled.appended;
        total.failed += polled.failed;
        total.stale += polled.stale;

        if service.is_settled() {
            break;
        }
        if Instant::now() >= deadline {
            return Err(CommandError::Runtime(format!(
                "timed out after {}s waiting for decodes",
                timeout.as_secs()
            )));
        }
        thread::sleep(POLL_INTERVAL);
    }

    info!("{}", present_poll_report(&total));
    Ok(total)
}
