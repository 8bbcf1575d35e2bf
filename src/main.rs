use clap::Parser;
use std::path::PathBuf;
use sukashi::config::{store, ConfigLayer, WatermarkConfig};
use sukashi::locale::{self, Locale};
use sukashi::pipeline::{batch_output_path, Pipeline};
use sukashi::watermark::{font, load_font, FONT_OPTIONS};

/// Sukashi - Tiled text watermarks for images and PDF documents, no server
/// round-trip
#[derive(Parser, Debug)]
#[command(name = "sukashi")]
#[command(version, about, long_about = None)]
struct Args {
    /// Image and PDF files to watermark
    inputs: Vec<PathBuf>,

    /// Output file (single input) or directory (batch)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to watermark configuration YAML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Watermark text override; use \n for multi-line tiles
    #[arg(long)]
    words: Option<String>,

    /// Font file to use, skipping family discovery
    #[arg(long)]
    font: Option<PathBuf>,

    /// Preview fidelity: 1x PDF scale, faster filters
    #[arg(long)]
    preview: bool,

    /// Display pixel ratio for final PDF export
    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f32,

    /// Override language detection
    #[arg(long, value_enum)]
    locale: Option<Locale>,

    /// Persist the merged configuration for reuse
    #[arg(long)]
    save_config: bool,

    /// Print the known font families and their resolution status
    #[arg(long)]
    list_fonts: bool,
}

fn main() {
    // Initialize logging subsystem
    sukashi::logging::init_subscriber().expect("Failed to initialize logging subsystem");

    // Parse command-line arguments
    let args = Args::parse();

    // Resolve the locale once; the bundle is injected from here on
    let locale = args.locale.unwrap_or_else(locale::detect);
    let translations = locale::bundle(locale);

    if args.list_fonts {
        list_fonts();
        return;
    }

    if args.inputs.is_empty() {
        eprintln!("{}", translations.batch_empty_hint());
        std::process::exit(1);
    }

    // Layer the configuration: defaults -> persisted blob -> YAML file ->
    // CLI overrides
    let mut config = load_persisted_config();

    if let Some(path) = &args.config {
        let layer = ConfigLayer::from_file(path).unwrap_or_else(|e| {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        });
        // Fields the file leaves unset fall through to the persisted blob
        config = layer.apply(config);
    }

    if let Some(words) = args.words {
        config.words = words.replace("\\n", "\n");
    }
    if args.save_config {
        config.save_config = true;
    }

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    tracing::info!(
        words = %config.words,
        font_family = %config.font_family,
        grid = format!("{}x{}", config.row, config.col),
        rotate = config.rotate,
        preview = args.preview,
        inputs = args.inputs.len(),
        "Configuration loaded successfully"
    );

    // Resolve the font once for the whole run
    let font_request = match &args.font {
        Some(path) => path.to_string_lossy().into_owned(),
        None => config.font_family.clone(),
    };
    let font = load_font(&font_request).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });

    let pipeline = Pipeline::new(&config, &font, translations, args.preview, args.pixel_ratio);

    let result = if args.inputs.len() == 1 {
        run_single(&pipeline, &args.inputs[0], args.output.as_deref())
    } else {
        pipeline.process_batch(&args.inputs, args.output.as_deref())
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if config.save_config {
        let path = store::default_path();
        if let Err(e) = store::save(&config, &path) {
            eprintln!("Failed to persist configuration: {}", e);
            std::process::exit(1);
        }
        tracing::info!(path = %path.display(), "Persisted configuration");
    }
}

fn run_single(
    pipeline: &Pipeline,
    input: &std::path::Path,
    output: Option<&std::path::Path>,
) -> Result<(), sukashi::error::AppError> {
    let is_pdf = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => batch_output_path(input, None),
    };

    if is_pdf {
        pipeline.process_pdf(input, &output)
    } else {
        pipeline.process_image(input, &output)
    }
}

/// The persisted blob is the base layer; a corrupt blob is reported and
/// skipped rather than aborting the run.
fn load_persisted_config() -> WatermarkConfig {
    let path = store::default_path();
    match store::load(&path) {
        Ok(Some(config)) => {
            tracing::info!(path = %path.display(), "Loaded persisted configuration");
            config
        }
        Ok(None) => WatermarkConfig::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable persisted configuration");
            WatermarkConfig::default()
        }
    }
}

fn list_fonts() {
    let installed = font::find_any_font().is_some();

    for (family, label) in FONT_OPTIONS {
        let status = if !installed {
            "no fonts installed"
        } else if load_font(family).is_ok() {
            "ok"
        } else {
            "unresolved"
        };
        println!("{:<24} {:<12} [{}]", family, label, status);
    }
}
