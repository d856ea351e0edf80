//! Code generation core for formgen.
//!
//! The pipeline is pass-based:
//! 1. Field rules are lowered from the form model into a library-agnostic
//!    constraint IR (one rule per field, see [`ir`]).
//! 2. A schema pass translates the IR into one of the supported schema
//!    libraries and emits the schema module.
//! 3. The component pass emits the form component, reading the schema
//!    pass's metadata and registering its imports on the context.
//!
//! Everything is a pure function over an immutable model snapshot; no
//! pass mutates the model and generation never fails for a structurally
//! valid model; unrecognized field kinds degrade to the generic path in
//! every pass.
//!
//! # Example
//!
//! ```ignore
//! use formgen_codegen::{generate_form_code, GenerateOptions};
//!
//! let files = generate_form_code(&model, &GenerateOptions::default())?;
//! ```

use std::path::PathBuf;

use formgen_model::FormModel;
use thiserror::Error;

pub mod defaults;
pub mod emit;
pub mod imports;
pub mod ir;
pub mod pass;
pub mod schema;
pub mod validate;

pub use pass::{GenerationContext, Pass, PassManager};

/// Errors that can occur during code generation.
#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Custom(String),
}

/// The validation-schema libraries the generator can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaLibrary {
    #[default]
    Zod,
    Valibot,
    Arktype,
}

impl std::str::FromStr for SchemaLibrary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zod" => Ok(SchemaLibrary::Zod),
            "valibot" => Ok(SchemaLibrary::Valibot),
            "arktype" => Ok(SchemaLibrary::Arktype),
            _ => Err(format!("unknown schema library: {s}")),
        }
    }
}

impl std::fmt::Display for SchemaLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaLibrary::Zod => write!(f, "zod"),
            SchemaLibrary::Valibot => write!(f, "valibot"),
            SchemaLibrary::Arktype => write!(f, "arktype"),
        }
    }
}

/// Options threaded explicitly into every generator entry point. There is
/// no ambient settings state anywhere in the core.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Which schema library the generated code validates with.
    pub schema_library: SchemaLibrary,
    /// Emit the invalid-submit handler that focuses the first errored
    /// input in DOM order.
    pub focus_on_error: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            schema_library: SchemaLibrary::Zod,
            focus_on_error: true,
        }
    }
}

/// A generated file with its path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// Relative path for the generated file.
    pub path: PathBuf,
    /// Content of the generated file.
    pub content: String,
}

impl GeneratedFile {
    /// Creates a new generated file.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Result of code generation.
#[derive(Debug, Clone, Default)]
pub struct GeneratedFiles {
    /// The generated files.
    pub files: Vec<GeneratedFile>,
}

impl GeneratedFiles {
    /// Creates a new empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file to the result.
    pub fn add(&mut self, file: GeneratedFile) {
        self.files.push(file);
    }

    /// Looks up a file's content by path.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.path.to_str() == Some(path))
            .map(|f| f.content.as_str())
    }

    /// Writes all files to the given output directory.
    pub fn write_to(&self, output_dir: &std::path::Path) -> Result<(), std::io::Error> {
        for file in &self.files {
            validate_relative_path(&file.path)?;
            let path = output_dir.join(&file.path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, &file.content)?;
        }
        Ok(())
    }
}

fn validate_relative_path(path: &std::path::Path) -> Result<(), std::io::Error> {
    use std::path::Component;

    if path.is_absolute() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("generated file path must be relative: {}", path.display()),
        ));
    }

    for component in path.components() {
        match component {
            Component::Normal(_) => {}
            // Disallow `..`, `.`, prefixes, and root dirs to prevent escaping `output_dir`.
            Component::ParentDir | Component::CurDir | Component::Prefix(_) | Component::RootDir => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("generated file path must be a normal relative path: {}", path.display()),
                ));
            }
        }
    }

    Ok(())
}

/// Generates the schema module and form component(s) for a model.
///
/// Convenience wrapper that wires up the standard pass pipeline. Whether
/// the multi-step emitter runs follows from the model's shape.
pub fn generate_form_code(
    model: &FormModel,
    options: &GenerateOptions,
) -> Result<GeneratedFiles, CodegenError> {
    let mut pm = PassManager::new();
    pm.add(emit::SchemaModulePass::new(options.clone()));
    pm.add(emit::FormComponentPass::new(options.clone()));
    pm.run(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_library_parsing() {
        assert_eq!("zod".parse::<SchemaLibrary>().unwrap(), SchemaLibrary::Zod);
        assert_eq!(
            "Valibot".parse::<SchemaLibrary>().unwrap(),
            SchemaLibrary::Valibot
        );
        assert_eq!(
            "arktype".parse::<SchemaLibrary>().unwrap(),
            SchemaLibrary::Arktype
        );
        assert!("joi".parse::<SchemaLibrary>().is_err());
        assert_eq!(SchemaLibrary::default(), SchemaLibrary::Zod);
    }

    #[test]
    fn rejects_escaping_paths() {
        let mut files = GeneratedFiles::new();
        files.add(GeneratedFile::new("../evil.ts", ""));
        let dir = std::env::temp_dir().join("formgen-path-test");
        assert!(files.write_to(&dir).is_err());
    }

    #[test]
    fn default_options() {
        let options = GenerateOptions::default();
        assert_eq!(options.schema_library, SchemaLibrary::Zod);
        assert!(options.focus_on_error);
    }
}
