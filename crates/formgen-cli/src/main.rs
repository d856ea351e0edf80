//! Formgen CLI tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use formgen_codegen::defaults::derive_model_defaults;
use formgen_codegen::emit::SchemaModulePass;
use formgen_codegen::{generate_form_code, GenerateOptions, PassManager, SchemaLibrary};
use formgen_model::{is_generatable, validate, FormModel, Severity};

#[derive(Parser)]
#[command(name = "formgen")]
#[command(author, version, about = "Generates typed form components from builder form definitions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate form code from a form definition
    Generate {
        /// Input form definition (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Schema library to target (zod, valibot, arktype)
        #[arg(short, long, default_value = "zod")]
        library: SchemaLibrary,

        /// Skip the invalid-submit handler that focuses the first errored input
        #[arg(long)]
        no_focus_on_error: bool,
    },

    /// Validate a form definition without generating code
    Check {
        /// Input form definition (JSON)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the derived default values as JSON
    Defaults {
        /// Input form definition (JSON)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print only the generated schema module
    Schema {
        /// Input form definition (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Schema library to target (zod, valibot, arktype)
        #[arg(short, long, default_value = "zod")]
        library: SchemaLibrary,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            input,
            output,
            library,
            no_focus_on_error,
        } => run_generate(&input, &output, library, !no_focus_on_error),
        Commands::Check { input } => run_check(&input),
        Commands::Defaults { input } => run_defaults(&input),
        Commands::Schema { input, library } => run_schema(&input, library),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_model(input: &PathBuf) -> Result<FormModel, Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(input)?;
    let model: FormModel = serde_json::from_str(&source)
        .map_err(|e| format!("{}: not a valid form definition: {}", input.display(), e))?;
    Ok(model)
}

fn run_generate(
    input: &PathBuf,
    output: &PathBuf,
    library: SchemaLibrary,
    focus_on_error: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let model = load_model(input)?;

    let issues = validate(&model);
    for issue in &issues {
        match issue.severity() {
            Severity::Error => eprintln!("error: {}", issue),
            Severity::Warning => eprintln!("warning: {}", issue),
        }
    }
    if !is_generatable(&issues) {
        return Err("form definition has errors".into());
    }

    let options = GenerateOptions {
        schema_library: library,
        focus_on_error,
    };
    let files = generate_form_code(&model, &options)?;
    files.write_to(output)?;

    println!("Generated {} files to {}", files.files.len(), output.display());
    for file in &files.files {
        println!("  - {}", file.path.display());
    }

    Ok(())
}

fn run_check(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let model = load_model(input)?;
    let issues = validate(&model);

    if issues.is_empty() {
        println!("✓ {} is valid", input.display());
        println!("  {} fields", model.descriptors().len());
        if model.is_multi_step() {
            println!("  {} steps", model.step_slices().len());
        }
        return Ok(());
    }

    for issue in &issues {
        match issue.severity() {
            Severity::Error => println!("error: {}", issue),
            Severity::Warning => println!("warning: {}", issue),
        }
    }

    if is_generatable(&issues) {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

fn run_defaults(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let model = load_model(input)?;
    let defaults = derive_model_defaults(&model);
    println!("{}", serde_json::to_string_pretty(&defaults.to_json())?);
    Ok(())
}

fn run_schema(input: &PathBuf, library: SchemaLibrary) -> Result<(), Box<dyn std::error::Error>> {
    let model = load_model(input)?;

    let options = GenerateOptions {
        schema_library: library,
        ..GenerateOptions::default()
    };
    let mut pm = PassManager::new();
    pm.add(SchemaModulePass::new(options));
    let files = pm.run(&model)?;

    match files.get("schema.ts") {
        Some(content) => print!("{}", content),
        None => return Err("schema generation produced no output".into()),
    }

    Ok(())
}
