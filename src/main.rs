use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, builder::PossibleValuesParser};
use pdfqa::groq::{GroqClientBuilder, SUPPORTED_MODELS};
use pdfqa::{
    Config, DisplayPreferences, Document, ExtractionError, Interaction, PdfTextExtractor,
    QuestionAnswerer, Session, SessionError, doctor, load_document, logging, tui,
};

/// pdfqa - ask questions about a PDF with confidence and source tagging
#[derive(Parser)]
#[command(name = "pdfqa")]
#[command(about = "Ask questions about PDF documents using Groq-hosted LLMs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Ask one question about a PDF
    Ask(AskCommand),
    /// Show the text extracted from a PDF
    Extract(ExtractCommand),
    /// Start the interactive terminal UI
    Tui(TuiCommand),
    /// Check configuration, API access and the PDF backend
    Doctor,
}

/// Ask one question about a PDF
#[derive(Parser)]
struct AskCommand {
    /// Path to the PDF
    #[arg(value_name = "PDF")]
    pdf: PathBuf,

    /// The question to ask
    #[arg(value_name = "QUESTION")]
    question: String,

    /// Model to use (defaults to GROQ_MODEL or llama3-8b-8192)
    #[arg(short, long, value_parser = PossibleValuesParser::new(SUPPORTED_MODELS))]
    model: Option<String>,

    /// Do not request or show a confidence level
    #[arg(long)]
    no_confidence: bool,

    /// Do not request or show source quotes
    #[arg(long)]
    no_sources: bool,

    /// Print the full interaction as JSON
    #[arg(long)]
    json: bool,
}

/// Show the text extracted from a PDF
#[derive(Parser)]
struct ExtractCommand {
    /// Path to the PDF
    #[arg(value_name = "PDF")]
    pdf: PathBuf,

    /// Number of characters to preview
    #[arg(long, value_name = "CHARS", default_value_t = tui::PREVIEW_CHARS)]
    preview: usize,
}

/// Start the interactive terminal UI
#[derive(Parser)]
struct TuiCommand {
    /// PDF to open on start
    #[arg(value_name = "PDF")]
    pdf: Option<PathBuf>,

    /// Initial model (F2 cycles models inside the UI)
    #[arg(short, long, value_parser = PossibleValuesParser::new(SUPPORTED_MODELS))]
    model: Option<String>,
}

/// Raised by `doctor` when any check reports an error.
#[derive(Debug, thiserror::Error)]
#[error("one or more health checks failed")]
struct ChecksFailed;

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    logging::init(match cli.command {
        Commands::Tui(_) => logging::TUI_DEFAULT,
        _ => logging::CLI_DEFAULT,
    });

    let result = match &cli.command {
        Commands::Ask(cmd) => handle_ask(cmd),
        Commands::Extract(cmd) => handle_extract(cmd),
        Commands::Tui(cmd) => handle_tui(cmd),
        Commands::Doctor => handle_doctor(),
    };

    if let Err(e) = result {
        let exit_code = if is_user_error(&e) { 1 } else { 2 };
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

/// Determines if an error is a user error (vs configuration or internal error).
///
/// User errors are bad input: a blank question, a PDF that cannot be read,
/// or failed health checks. Everything else exits with 2.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.downcast_ref::<SessionError>().is_some()
        || error.downcast_ref::<ExtractionError>().is_some()
        || error.downcast_ref::<ChecksFailed>().is_some()
}

/// Handles the ask command.
fn handle_ask(cmd: &AskCommand) -> Result<()> {
    if cmd.question.trim().is_empty() {
        return Err(SessionError::EmptyQuestion.into());
    }

    let config = Config::from_env()?;
    let model = cmd
        .model
        .clone()
        .unwrap_or_else(|| config.default_model().to_string());

    let document = read_pdf(&cmd.pdf)?;

    let client = GroqClientBuilder::from_config(&config)
        .build()
        .context("Failed to create Groq client")?;
    let answerer = QuestionAnswerer::new(Arc::new(client));

    let preferences = DisplayPreferences::new(!cmd.no_confidence, !cmd.no_sources);
    let interaction = execute_ask(document, &answerer, &cmd.question, &model, preferences)?;

    if cmd.json {
        let json =
            serde_json::to_string_pretty(&interaction).context("Failed to serialize answer")?;
        println!("{json}");
    } else {
        print!("{}", render_interaction(&interaction));
    }

    Ok(())
}

/// Executes the ask command logic with a provided answerer.
///
/// Separated from `handle_ask` so tests can use a mock model client.
fn execute_ask(
    document: Document,
    answerer: &QuestionAnswerer,
    question: &str,
    model: &str,
    preferences: DisplayPreferences,
) -> Result<Interaction> {
    let mut session = Session::new();
    session.load_document(document);
    let interaction = session.ask(answerer, question, model, preferences)?;
    Ok(interaction.clone())
}

/// Formats an interaction for the terminal, honoring its display toggles.
fn render_interaction(interaction: &Interaction) -> String {
    let result = &interaction.result;
    let mut out = format!("{}\n", result.answer());

    if interaction.shows_confidence()
        && let Some(confidence) = result.confidence()
    {
        out.push_str(&format!("\nConfidence: {confidence}\n"));
    }
    if interaction.shows_sources()
        && let Some(sources) = result.displayed_sources()
    {
        out.push_str(&format!("Sources: {sources}\n"));
    }
    if let Some(reasoning) = result.reasoning() {
        out.push_str(&format!("Reasoning: {reasoning}\n"));
    }

    out
}

/// Handles the extract command. No credential is needed.
fn handle_extract(cmd: &ExtractCommand) -> Result<()> {
    let document = read_pdf(&cmd.pdf)?;
    print!("{}", render_extract(&document, cmd.preview));
    Ok(())
}

fn render_extract(document: &Document, preview_chars: usize) -> String {
    format!(
        "Document: {}\nPages: {}\nCharacters: {}\n\n{}\n",
        document.name(),
        document.page_count(),
        document.char_count(),
        document.preview(preview_chars)
    )
}

/// Handles the tui command.
fn handle_tui(cmd: &TuiCommand) -> Result<()> {
    let config = Config::from_env()?;
    let model = cmd
        .model
        .clone()
        .unwrap_or_else(|| config.default_model().to_string());

    let client = GroqClientBuilder::from_config(&config)
        .build()
        .context("Failed to create Groq client")?;
    let answerer = QuestionAnswerer::new(Arc::new(client));

    tui::run(&answerer, &PdfTextExtractor, &model, cmd.pdf.as_deref())
}

/// Handles the doctor command.
fn handle_doctor() -> Result<()> {
    if doctor::run_health_checks()? {
        Ok(())
    } else {
        Err(ChecksFailed.into())
    }
}

fn read_pdf(path: &Path) -> Result<Document> {
    load_document(path, &PdfTextExtractor)
        .with_context(|| format!("Failed to load {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pdfqa::groq::{ModelClient, ProviderError, SamplingParams};
    use pdfqa::{Confidence, Variant};

    struct MockModelClient(&'static str);

    impl ModelClient for MockModelClient {
        fn complete(
            &self,
            _model: &str,
            _prompt: &str,
            _sampling: SamplingParams,
        ) -> Result<String, ProviderError> {
            Ok(self.0.to_string())
        }
    }

    struct RateLimitedClient;

    impl ModelClient for RateLimitedClient {
        fn complete(
            &self,
            _model: &str,
            _prompt: &str,
            _sampling: SamplingParams,
        ) -> Result<String, ProviderError> {
            Err(ProviderError::RateLimited {
                message: "try again later".to_string(),
            })
        }
    }

    fn doc() -> Document {
        Document::new("climate.pdf", "Temperatures rose by 1.1C.", 1)
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn unsupported_model_is_rejected_by_parser() {
        let result = Cli::try_parse_from(["pdfqa", "ask", "a.pdf", "q", "--model", "gpt-4"]);
        assert!(result.is_err());
    }

    #[test]
    fn ask_flags_parse() {
        let cli = Cli::try_parse_from([
            "pdfqa",
            "ask",
            "a.pdf",
            "What?",
            "--model",
            "gemma2-9b-it",
            "--no-sources",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Ask(cmd) => {
                assert_eq!(cmd.model.as_deref(), Some("gemma2-9b-it"));
                assert!(!cmd.no_confidence);
                assert!(cmd.no_sources);
                assert!(cmd.json);
            }
            _ => panic!("Expected ask command"),
        }
    }

    #[test]
    fn extract_preview_defaults_to_500() {
        let cli = Cli::try_parse_from(["pdfqa", "extract", "a.pdf"]).unwrap();
        match cli.command {
            Commands::Extract(cmd) => assert_eq!(cmd.preview, 500),
            _ => panic!("Expected extract command"),
        }
    }

    #[test]
    fn blank_question_is_a_user_error() {
        let cmd = AskCommand {
            pdf: PathBuf::from("unused.pdf"),
            question: "   \n\t  ".to_string(),
            model: None,
            no_confidence: false,
            no_sources: false,
            json: false,
        };
        let err = handle_ask(&cmd).unwrap_err();
        assert!(is_user_error(&err));
        assert!(err.to_string().contains("blank"));
    }

    #[test]
    fn unreadable_pdf_is_a_user_error() {
        let err = read_pdf(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(is_user_error(&err));
        assert!(format!("{err:#}").contains("here.pdf"));
    }

    #[test]
    fn config_errors_are_fatal() {
        let err: anyhow::Error = pdfqa::ConfigError::MissingApiKey.into();
        assert!(!is_user_error(&err));
    }

    #[test]
    fn execute_ask_uses_selected_variant() {
        let answerer = QuestionAnswerer::new(Arc::new(MockModelClient(
            "ANSWER: 1.1C\nCONFIDENCE: HIGH\nREASONING: Stated in the text",
        )));

        let interaction = execute_ask(
            doc(),
            &answerer,
            "How much?",
            "llama3-8b-8192",
            DisplayPreferences::new(true, false),
        )
        .unwrap();

        assert_eq!(interaction.variant, Variant::Confidence);
        assert_eq!(interaction.result.confidence(), Some(Confidence::High));

        let rendered = render_interaction(&interaction);
        assert!(rendered.starts_with("1.1C\n"));
        assert!(rendered.contains("Confidence: HIGH"));
        assert!(rendered.contains("Reasoning: Stated in the text"));
        assert!(!rendered.contains("Sources:"));
    }

    #[test]
    fn sources_only_output_hides_confidence() {
        let answerer = QuestionAnswerer::new(Arc::new(MockModelClient(
            "ANSWER: 1.1C\nSOURCES: \"rose by 1.1C\"\nCONFIDENCE: HIGH",
        )));

        let interaction = execute_ask(
            doc(),
            &answerer,
            "How much?",
            "llama3-8b-8192",
            DisplayPreferences::new(false, true),
        )
        .unwrap();

        let rendered = render_interaction(&interaction);
        assert!(rendered.contains("Sources: \"rose by 1.1C\""));
        assert!(!rendered.contains("Confidence:"));
    }

    #[test]
    fn uncited_answer_prints_citation_notice() {
        let answerer = QuestionAnswerer::new(Arc::new(MockModelClient(
            "ANSWER: Not in the report.\nSOURCES: None\nCONFIDENCE: NONE",
        )));

        let interaction = execute_ask(
            doc(),
            &answerer,
            "Who wrote it?",
            "llama3-8b-8192",
            DisplayPreferences::new(true, true),
        )
        .unwrap();

        let rendered = render_interaction(&interaction);
        assert!(rendered.contains("Sources: No specific citations available"));
        assert!(!rendered.contains("Sources: None"));
    }

    #[test]
    fn provider_failure_is_rendered_not_raised() {
        let answerer = QuestionAnswerer::new(Arc::new(RateLimitedClient));

        let interaction = execute_ask(
            doc(),
            &answerer,
            "How much?",
            "llama3-8b-8192",
            DisplayPreferences::new(false, false),
        )
        .unwrap();

        let rendered = render_interaction(&interaction);
        assert!(rendered.starts_with("Error: Rate limit exceeded"));
        assert!(rendered.contains("Confidence: ERROR"));
    }

    #[test]
    fn interaction_json_has_expected_fields() {
        let answerer = QuestionAnswerer::new(Arc::new(MockModelClient("Plain answer")));
        let interaction = execute_ask(
            doc(),
            &answerer,
            "How much?",
            "llama3-8b-8192",
            DisplayPreferences::new(false, false),
        )
        .unwrap();

        let json = serde_json::to_value(&interaction).unwrap();
        assert_eq!(json["question"], "How much?");
        assert_eq!(json["result"]["answer"], "Plain answer");
        assert_eq!(json["variant"], "plain");
        assert_eq!(json["document_name"], "climate.pdf");
        assert!(json["result"].get("confidence").is_none());
    }

    #[test]
    fn extract_output_lists_counts_and_preview() {
        let rendered = render_extract(&doc(), 12);
        assert!(rendered.contains("Document: climate.pdf"));
        assert!(rendered.contains("Pages: 1"));
        assert!(rendered.contains("Characters: 26"));
        assert!(rendered.contains("Temperatures..."));
    }
}
