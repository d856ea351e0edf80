//! Pass-based code generation pipeline.
//!
//! Passes emit files into a shared [`GenerationContext`] and communicate
//! through its metadata map. The [`PassManager`] runs passes in dependency
//! order and finalizes the context by injecting each file's deduplicated
//! import block after its leading comments.

use std::collections::HashMap;

use crate::{CodegenError, GeneratedFile, GeneratedFiles};
use formgen_model::FormModel;

/// Mutable state passed through the pipeline.
///
/// This context accumulates generated files, import statements, and
/// metadata as passes execute. Each pass can read and modify this context.
#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    /// Generated files, keyed by relative path.
    pub files: HashMap<String, GeneratedFile>,

    /// Import statements to inject into specific files.
    /// Key is the file path, value is a list of import statements.
    pub imports: HashMap<String, Vec<String>>,

    /// Arbitrary metadata for pass communication.
    pub metadata: HashMap<String, String>,
}

impl GenerationContext {
    /// Creates a new empty generation context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file.
    pub fn set_file(&mut self, path: impl Into<String>, content: impl Into<String>) {
        let path = path.into();
        self.files
            .insert(path.clone(), GeneratedFile::new(path, content.into()));
    }

    /// Get a file's content for reading.
    pub fn get_file(&self, path: &str) -> Option<&str> {
        self.files.get(path).map(|f| f.content.as_str())
    }

    /// Check if a file exists.
    pub fn has_file(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    /// Add an import statement to a file.
    pub fn add_import(&mut self, file: impl Into<String>, import: impl Into<String>) {
        self.imports
            .entry(file.into())
            .or_default()
            .push(import.into());
    }

    /// Get imports registered for a file.
    pub fn get_imports(&self, file: &str) -> Option<&[String]> {
        self.imports.get(file).map(|v| v.as_slice())
    }

    /// Set a metadata value.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Get a metadata value.
    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(|s| s.as_str())
    }

    /// Check if a metadata key exists.
    pub fn has_metadata(&self, key: &str) -> bool {
        self.metadata.contains_key(key)
    }

    /// Finalize into GeneratedFiles.
    ///
    /// Injects each file's import block at the top of the file (after any
    /// leading comments and pragmas). Imports are set-semantic: duplicates
    /// collapse, first occurrence wins the position.
    pub fn finalize(mut self) -> GeneratedFiles {
        for (file_path, imports) in &self.imports {
            let Some(file) = self.files.get_mut(file_path) else {
                continue;
            };

            let mut deduped: Vec<&str> = vec![];
            for import in imports {
                if !deduped.contains(&import.as_str()) {
                    deduped.push(import);
                }
            }
            if deduped.is_empty() {
                continue;
            }

            let mut lines: Vec<&str> = file.content.lines().collect();
            let mut insert_pos = 0;

            // Skip leading comments, directives ("use client") and blanks.
            for (i, line) in lines.iter().enumerate() {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with("//") || trimmed.starts_with("\"use ") {
                    insert_pos = i + 1;
                } else {
                    break;
                }
            }

            for (i, import_line) in deduped.iter().enumerate() {
                lines.insert(insert_pos + i, import_line);
            }
            lines.insert(insert_pos + deduped.len(), "");

            file.content = lines.join("\n");
        }

        let mut result = GeneratedFiles::new();
        let mut files: Vec<GeneratedFile> = self.files.into_values().collect();
        files.sort_by(|a, b| a.path.cmp(&b.path));
        for file in files {
            result.add(file);
        }
        result
    }
}

/// A pass that transforms the generation context.
///
/// Passes are the building blocks of the code generation pipeline. Each
/// pass reads the form model and modifies the generation context to
/// produce or enhance generated files.
pub trait Pass: Send + Sync {
    /// Unique identifier for this pass.
    fn name(&self) -> &'static str;

    /// Execute the pass, mutating the context.
    fn run(&self, model: &FormModel, ctx: &mut GenerationContext) -> Result<(), CodegenError>;

    /// Dependencies: passes that must run before this one.
    fn depends_on(&self) -> &[&'static str] {
        &[]
    }
}

/// Manages pass execution order and dependencies.
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PassManager {
    /// Creates a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the pipeline.
    ///
    /// Returns `&mut Self` for method chaining.
    pub fn add<P: Pass + 'static>(&mut self, pass: P) -> &mut Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Run all passes in dependency order.
    pub fn run(&self, model: &FormModel) -> Result<GeneratedFiles, CodegenError> {
        let mut ctx = GenerationContext::new();

        let sorted = self.topological_sort()?;

        for pass_idx in sorted {
            let pass = &self.passes[pass_idx];
            pass.run(model, &mut ctx)?;
            ctx.set_metadata(format!("pass:{}:completed", pass.name()), "true");
        }

        Ok(ctx.finalize())
    }

    /// Topologically sort passes by dependencies.
    fn topological_sort(&self) -> Result<Vec<usize>, CodegenError> {
        let name_to_idx: HashMap<&str, usize> = self
            .passes
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name(), i))
            .collect();

        let mut in_degree = vec![0usize; self.passes.len()];
        let mut dependents: Vec<Vec<usize>> = vec![vec![]; self.passes.len()];

        for (i, pass) in self.passes.iter().enumerate() {
            for dep_name in pass.depends_on() {
                if let Some(&dep_idx) = name_to_idx.get(dep_name) {
                    dependents[dep_idx].push(i);
                    in_degree[i] += 1;
                }
                // Missing dependencies are not an error; a run configuration
                // may legitimately omit optional passes.
            }
        }

        // Kahn's algorithm
        let mut queue: Vec<usize> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, &d)| d == 0)
            .map(|(i, _)| i)
            .collect();

        let mut result = Vec::with_capacity(self.passes.len());

        while let Some(idx) = queue.pop() {
            result.push(idx);
            for &dependent in &dependents[idx] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    queue.push(dependent);
                }
            }
        }

        if result.len() != self.passes.len() {
            return Err(CodegenError::Custom(
                "Circular dependency detected in passes".to_string(),
            ));
        }

        Ok(result)
    }

    /// Get the number of passes in the manager.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestPass {
        name: &'static str,
        deps: &'static [&'static str],
    }

    impl Pass for TestPass {
        fn name(&self) -> &'static str {
            self.name
        }

        fn run(&self, _model: &FormModel, ctx: &mut GenerationContext) -> Result<(), CodegenError> {
            ctx.set_file(format!("{}.ts", self.name), format!("// from {}", self.name));
            Ok(())
        }

        fn depends_on(&self) -> &[&'static str] {
            self.deps
        }
    }

    fn empty_model() -> FormModel {
        FormModel::Single(vec![])
    }

    #[test]
    fn context_files_and_metadata() {
        let mut ctx = GenerationContext::new();

        ctx.set_file("form.tsx", "const x = 1;");
        assert_eq!(ctx.get_file("form.tsx"), Some("const x = 1;"));
        assert!(ctx.has_file("form.tsx"));
        assert!(!ctx.has_file("other.tsx"));

        ctx.set_metadata("schema:library", "zod");
        assert_eq!(ctx.get_metadata("schema:library"), Some("zod"));
        assert!(ctx.has_metadata("schema:library"));
    }

    #[test]
    fn finalize_dedupes_imports() {
        let mut ctx = GenerationContext::new();
        ctx.set_file("form.tsx", "\"use client\";\n\nexport function F() {}");
        ctx.add_import("form.tsx", "import { z } from \"zod\";");
        ctx.add_import("form.tsx", "import { Input } from \"@/components/ui/input\";");
        ctx.add_import("form.tsx", "import { z } from \"zod\";");

        let files = ctx.finalize();
        let content = files.get("form.tsx").unwrap();
        assert_eq!(content.matches("from \"zod\"").count(), 1);
        // Imports land after the "use client" directive.
        let directive = content.find("\"use client\"").unwrap();
        let import = content.find("import { z }").unwrap();
        assert!(import > directive);
    }

    #[test]
    fn pass_manager_simple() {
        let mut pm = PassManager::new();
        pm.add(TestPass { name: "schema", deps: &[] });

        let files = pm.run(&empty_model()).unwrap();
        assert_eq!(files.files.len(), 1);
        assert!(files.get("schema.ts").is_some());
    }

    #[test]
    fn pass_manager_respects_dependencies() {
        let mut pm = PassManager::new();
        pm.add(TestPass { name: "component", deps: &["schema"] });
        pm.add(TestPass { name: "schema", deps: &[] });

        let files = pm.run(&empty_model()).unwrap();
        assert_eq!(files.files.len(), 2);
    }

    #[test]
    fn pass_manager_detects_cycles() {
        let mut pm = PassManager::new();
        pm.add(TestPass { name: "a", deps: &["b"] });
        pm.add(TestPass { name: "b", deps: &["a"] });

        assert!(pm.run(&empty_model()).is_err());
    }
}
