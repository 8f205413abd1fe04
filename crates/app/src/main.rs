use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, Clock, Microphone};
use tracing_subscriber::EnvFilter;
use tutor_core::model::AppSettingsDraft;
use ui::{App, UiApp, WebviewMicrophone, build_app_context};

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    EmptyValue { flag: &'static str },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::EmptyValue { flag } => write!(f, "{flag} must not be empty"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    let value = args.next().ok_or(ArgsError::MissingValue { flag })?;
    if value.trim().is_empty() {
        return Err(ArgsError::EmptyValue { flag });
    }
    Ok(value)
}

struct DesktopApp {
    services: AppServices,
    microphone: Arc<WebviewMicrophone>,
}

impl UiApp for DesktopApp {
    fn services(&self) -> &AppServices {
        &self.services
    }

    fn microphone(&self) -> Arc<dyn Microphone + Send + Sync> {
        self.microphone.clone()
    }
}

/// Command-line overrides; anything unset falls back to `TUTOR_*` variables.
#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    model: Option<String>,
    student: Option<String>,
    report_to: Option<String>,
    help: bool,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--model <name>] [--student <name>] [--report-to <email>]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TUTOR_API_KEY       Gemini API key (exercises and chat are disabled without it)");
    eprintln!("  TUTOR_MODEL         model name (default gemini-2.5-flash)");
    eprintln!("  TUTOR_BASE_URL      API base URL");
    eprintln!("  TUTOR_STUDENT       student name shown in greetings and reports");
    eprintln!("  TUTOR_REPORT_TO     parent email for progress reports");
    eprintln!("  TUTOR_TIMEOUT_SECS  request timeout in seconds (default 60)");
    eprintln!("  TUTOR_LOG           log filter (default info)");
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--model" => parsed.model = Some(require_value(&mut args, "--model")?),
                "--student" => parsed.student = Some(require_value(&mut args, "--student")?),
                "--report-to" => {
                    parsed.report_to = Some(require_value(&mut args, "--report-to")?);
                }
                "--help" | "-h" => parsed.help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(parsed)
    }

    fn into_draft(self) -> AppSettingsDraft {
        AppSettingsDraft {
            api_model: self.model,
            student_name: self.student,
            report_recipient: self.report_to,
            ..AppSettingsDraft::new()
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("TUTOR_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    if args.help {
        print_usage();
        return Ok(());
    }

    init_logging();

    // CLI flags win; the environment fills whatever is left.
    let settings = args.into_draft().with_env().validate()?;
    let services = AppServices::from_settings(settings, Clock::default_clock());
    if services.generation_enabled() {
        tracing::info!(student = services.student_name(), "starting tutor");
    } else {
        tracing::warn!("TUTOR_API_KEY is not set; exercises and chat are disabled");
    }

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        services,
        microphone: Arc::new(WebviewMicrophone),
    });
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("English Tutor")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
