//! Setup health check for pdfqa.
//!
//! Provides the `doctor` command:
//! - Configuration (credential present, timeout and default model valid)
//! - Groq API reachability and availability of each supported model
//! - PDF backend round trip

use anyhow::Result;

use crate::config::Config;
use crate::extractor::{PdfTextExtractor, TextExtractor, single_page_pdf};
use crate::groq::{GroqClient, GroqClientBuilder, SUPPORTED_MODELS};

// ANSI color codes for terminal output
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

const PDF_PROBE_TEXT: &str = "pdfqa backend check";

/// Health status for a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Component is healthy
    Ok,
    /// Component has a warning but is functional
    Warning(String),
    /// Component is not functional
    Error(String),
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, HealthStatus::Ok)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, HealthStatus::Error(_))
    }
}

/// Configuration check result.
#[derive(Debug)]
pub struct ConfigHealth {
    pub status: HealthStatus,
    /// Present only when configuration loaded
    pub config: Option<Config>,
}

/// Groq API connectivity information.
#[derive(Debug)]
pub struct ApiHealth {
    pub status: HealthStatus,
    pub base_url: String,
    pub models: Vec<String>,
}

/// Whether one supported model is offered to the configured credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAvailability {
    pub model: &'static str,
    pub available: bool,
}

// ============================================================================
// Health Check Functions
// ============================================================================

/// Performs all health checks and prints results.
///
/// Returns `true` when no check reported an error.
pub fn run_health_checks() -> Result<bool> {
    let config = check_config(Config::from_env());

    let api = config.config.as_ref().map(check_api);
    let models = api
        .as_ref()
        .filter(|api| !api.status.is_error())
        .map(|api| model_availability(&api.models))
        .unwrap_or_default();
    let pdf = check_pdf_backend(&PdfTextExtractor);

    print_health_report(&config, api.as_ref(), &models, &pdf);

    let healthy = !config.status.is_error()
        && api.as_ref().is_none_or(|api| !api.status.is_error())
        && !pdf.is_error();
    Ok(healthy)
}

fn check_config(loaded: Result<Config, crate::config::ConfigError>) -> ConfigHealth {
    match loaded {
        Ok(config) => ConfigHealth {
            status: HealthStatus::Ok,
            config: Some(config),
        },
        Err(e) => ConfigHealth {
            status: HealthStatus::Error(e.to_string()),
            config: None,
        },
    }
}

fn check_api(config: &Config) -> ApiHealth {
    match GroqClientBuilder::from_config(config).build() {
        Ok(client) => check_api_with(&client),
        Err(e) => ApiHealth {
            status: HealthStatus::Error(format!("Failed to build client: {}", e)),
            base_url: config.base_url().to_string(),
            models: Vec::new(),
        },
    }
}

fn check_api_with(client: &GroqClient) -> ApiHealth {
    let base_url = client.base_url().to_string();

    match client.list_models() {
        Ok(models) => ApiHealth {
            status: if models.is_empty() {
                HealthStatus::Warning("No models offered to this key".to_string())
            } else {
                HealthStatus::Ok
            },
            base_url,
            models,
        },
        Err(e) => ApiHealth {
            status: HealthStatus::Error(format!("Connection failed: {}", e)),
            base_url,
            models: Vec::new(),
        },
    }
}

/// Marks each supported model as available if `offered` lists it.
fn model_availability(offered: &[String]) -> Vec<ModelAvailability> {
    SUPPORTED_MODELS
        .iter()
        .map(|&model| ModelAvailability {
            model,
            available: offered.iter().any(|m| m == model),
        })
        .collect()
}

/// Builds a one-page PDF and checks the extractor reads its text back.
fn check_pdf_backend(extractor: &dyn TextExtractor) -> HealthStatus {
    let bytes = match single_page_pdf(PDF_PROBE_TEXT) {
        Ok(bytes) => bytes,
        Err(e) => return HealthStatus::Error(format!("Failed to build sample PDF: {}", e)),
    };

    match extractor.extract(&bytes) {
        Ok(extracted) if extracted.text.contains(PDF_PROBE_TEXT) => HealthStatus::Ok,
        Ok(_) => HealthStatus::Warning("Sample text was not recovered exactly".to_string()),
        Err(e) => HealthStatus::Error(format!("Extraction failed: {}", e)),
    }
}

// ============================================================================
// Pretty Printing
// ============================================================================

fn status_symbol(status: &HealthStatus) -> &'static str {
    match status {
        HealthStatus::Ok => "\u{2713}",
        HealthStatus::Warning(_) => "!",
        HealthStatus::Error(_) => "\u{2717}",
    }
}

fn status_color(status: &HealthStatus) -> &'static str {
    match status {
        HealthStatus::Ok => GREEN,
        HealthStatus::Warning(_) => YELLOW,
        HealthStatus::Error(_) => RED,
    }
}

fn status_text(status: &HealthStatus, ok_text: &str) -> String {
    match status {
        HealthStatus::Ok => ok_text.to_string(),
        HealthStatus::Warning(w) => w.clone(),
        HealthStatus::Error(e) => e.clone(),
    }
}

fn print_health_report(
    config: &ConfigHealth,
    api: Option<&ApiHealth>,
    models: &[ModelAvailability],
    pdf: &HealthStatus,
) {
    println!("{}pdfqa doctor{}", BOLD, RESET);
    println!();

    // Configuration section
    println!("{}Configuration{}", BOLD, RESET);
    println!(
        "  {}{}{} Status: {}",
        status_color(&config.status),
        status_symbol(&config.status),
        RESET,
        status_text(&config.status, "OK")
    );
    if let Some(cfg) = &config.config {
        println!("    {}API key: set{}", DIM, RESET);
        println!("    {}Timeout: {}s{}", DIM, cfg.timeout().as_secs(), RESET);
        println!("    {}Default model: {}{}", DIM, cfg.default_model(), RESET);
    }
    println!();

    // Groq API section
    println!("{}Groq API{}", BOLD, RESET);
    match api {
        Some(api) => {
            println!(
                "  {}{}{} Status: {}",
                status_color(&api.status),
                status_symbol(&api.status),
                RESET,
                status_text(&api.status, "Connected")
            );
            println!("    {}URL: {}{}", DIM, api.base_url, RESET);
            for m in models {
                let status = if m.available {
                    HealthStatus::Ok
                } else {
                    HealthStatus::Warning(String::new())
                };
                println!(
                    "  {}{}{} {}{}",
                    status_color(&status),
                    status_symbol(&status),
                    RESET,
                    m.model,
                    if m.available { "" } else { " (not offered)" }
                );
            }
        }
        None => println!("  {}Skipped: configuration is invalid{}", YELLOW, RESET),
    }
    println!();

    // PDF backend section
    println!("{}PDF backend{}", BOLD, RESET);
    println!(
        "  {}{}{} Text extraction: {}",
        status_color(pdf),
        status_symbol(pdf),
        RESET,
        status_text(pdf, "OK")
    );
}
