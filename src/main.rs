use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exam_grader::cleaner::TextCleaner;
use exam_grader::config::Config;
use exam_grader::grader::{self, Grader, Outcome, SheetReport};
use exam_grader::recognizer::HandwritingRecognizer;
use exam_grader::scoring::minilm::MiniLmEncoder;
use exam_grader::scoring::SimilarityScorer;
use exam_grader::spell::FrequencyDictChecker;

#[derive(Parser, Debug)]
#[command(name = "exam-grader")]
#[command(about = "Grade a scanned handwritten answer sheet against a reference answer")]
#[command(version)]
pub struct Args {
    /// Path to the scanned answer sheet (JPEG/PNG)
    pub sheet: PathBuf,

    /// Reference answer every segmented answer is scored against
    #[arg(long, env = "GRADER_REFERENCE")]
    pub reference: String,

    /// Directory receiving the segmented answer crops
    #[arg(long, env = "GRADER_OUTPUT_DIR", default_value = "processed")]
    pub output_dir: PathBuf,

    /// Answer regions must be strictly wider than this many pixels
    #[arg(long, env = "GRADER_MIN_REGION_WIDTH", default_value = "50")]
    pub min_region_width: u32,

    /// Answer regions must be strictly taller than this many pixels
    #[arg(long, env = "GRADER_MIN_REGION_HEIGHT", default_value = "30")]
    pub min_region_height: u32,

    /// Grade crops already present in the output directory instead of
    /// re-segmenting the sheet
    #[arg(long)]
    pub reuse_segments: bool,

    /// Print the report as JSON instead of text blocks
    #[arg(long)]
    pub json: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            sheet_path: args.sheet.clone(),
            output_dir: args.output_dir.clone(),
            reference_answer: args.reference.clone(),
            min_region_width: args.min_region_width,
            min_region_height: args.min_region_height,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from(&args);

    tracing::info!("Starting exam-grader v{}", env!("CARGO_PKG_VERSION"));

    let recognizer = build_recognizer()?;
    tracing::info!("Using {} recognizer", recognizer.name());

    let spell = Arc::new(FrequencyDictChecker::new()?);
    let cleaner = TextCleaner::new(spell);
    let encoder = Arc::new(MiniLmEncoder::new()?);
    let scorer = SimilarityScorer::new(encoder);

    let grader = Grader::new(recognizer, cleaner, scorer, &config);

    let report = if args.reuse_segments {
        let base = grader::base_name(&config.sheet_path)?;
        grader.grade_existing(&config.output_dir, &base, &config.reference_answer)?
    } else {
        grader.grade_sheet(&config.sheet_path, &config.output_dir, &config.reference_answer)?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

#[cfg(feature = "recognizer-ocrs")]
fn build_recognizer() -> anyhow::Result<Arc<dyn HandwritingRecognizer>> {
    Ok(Arc::new(
        exam_grader::recognizers::ocrs::OcrsRecognizer::new()?,
    ))
}

#[cfg(not(feature = "recognizer-ocrs"))]
fn build_recognizer() -> anyhow::Result<Arc<dyn HandwritingRecognizer>> {
    anyhow::bail!(
        "No handwriting recognizer available. Build with --features recognizer-ocrs"
    )
}

fn print_report(report: &SheetReport) {
    for answer in &report.answers {
        match &answer.outcome {
            Outcome::Scored { score, text } => {
                println!("[{}] | Score: {:.2}", answer.file_name, score);
                println!("Student Text: {}", text);
                println!();
            }
            Outcome::Failed { reason } => {
                println!("[{}] | Error: {}", answer.file_name, reason);
                println!();
            }
        }
    }
}
