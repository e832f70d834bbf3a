use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info};
use std::path::PathBuf;

/// Swagger-from-metadata - Generate a Swagger 2.0 document from compiled-handler metadata descriptors
#[derive(Parser, Debug)]
#[command(name = "swagger-from-metadata")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the descriptor snapshot (JSON)
    #[arg(value_name = "DESCRIPTORS_JSON")]
    pub descriptors_path: PathBuf,

    /// Path to a generator settings file (JSON); defaults apply when omitted
    #[arg(short = 's', long = "settings", value_name = "FILE")]
    pub settings_path: Option<PathBuf>,

    /// Output format (json or yaml)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Deliver the document to a remote endpoint with an HTTP PUT
    #[arg(short = 'u', long = "url", value_name = "URL", conflicts_with = "output_path")]
    pub output_url: Option<String>,

    /// Custom header for the HTTP delivery, as name=value (repeatable)
    #[arg(long = "header", value_name = "NAME=VALUE", requires = "output_url")]
    pub headers: Vec<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if !args.descriptors_path.exists() {
        anyhow::bail!(
            "Descriptor snapshot does not exist: {}",
            args.descriptors_path.display()
        );
    }

    if let Some(ref settings) = args.settings_path {
        if !settings.exists() {
            anyhow::bail!("Settings file does not exist: {}", settings.display());
        }
    }

    info!("Descriptor snapshot: {}", args.descriptors_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else if let Some(ref url) = args.output_url {
        info!("Output endpoint: {}", url);
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    use crate::descriptor::DescriptorSet;
    use crate::generator::SwaggerGenerator;
    use crate::output::{FileSink, HttpSink, OutputSink, StdoutSink};
    use crate::schema::BasicSchemaRegistrar;
    use crate::serializer::{serialize_json, serialize_yaml};
    use crate::settings::GeneratorSettings;

    info!("Starting Swagger document generation...");

    // Step 1: Load generator settings
    let settings = match &args.settings_path {
        Some(path) => {
            info!("Loading settings from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str::<GeneratorSettings>(&content)?
        }
        None => GeneratorSettings::default(),
    };

    // Step 2: Load the descriptor snapshot
    info!("Loading descriptor snapshot...");
    let set = DescriptorSet::from_path(&args.descriptors_path)?;
    info!("Loaded {} type descriptors", set.types.len());

    if set.types.is_empty() {
        anyhow::bail!("The descriptor snapshot contains no types");
    }

    // Step 3: Run the derivation engine
    info!("Deriving operations...");
    let generator = SwaggerGenerator::new(settings);
    let mut registrar = BasicSchemaRegistrar::new();
    let document = generator.generate_from_set(&set, &mut registrar)?;

    let operation_count: usize = document.paths.values().map(|item| item.len()).sum();
    info!(
        "Derived {} operation(s) across {} path(s)",
        operation_count,
        document.paths.len()
    );

    // Step 4: Serialize to the requested format
    info!("Serializing to {:?} format...", args.output_format);
    let content = match args.output_format {
        OutputFormat::Json => serialize_json(&document)?,
        OutputFormat::Yaml => serialize_yaml(&document)?,
    };

    // Step 5: Deliver to the selected sink
    let sink: Box<dyn OutputSink> = if let Some(path) = &args.output_path {
        Box::new(FileSink::new(path.clone()))
    } else if let Some(url) = &args.output_url {
        Box::new(HttpSink::new(url.clone(), &args.headers)?)
    } else {
        Box::new(StdoutSink)
    };
    sink.deliver(&content)?;

    info!("Generation complete!");
    Ok(())
}
