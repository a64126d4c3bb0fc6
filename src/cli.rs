// ============================================================================
// RetouchFE CLI — headless batch editing via command-line arguments
// ============================================================================
//
// Usage examples:
//   retouchfe --input photo.png --apply gaussian-blur --output result.png
//   retouchfe -i *.jpg --apply resize:x=800 --apply saturation:level=1.2 --output-dir small/
//   retouchfe -i scan.png --apply equalize --apply invert --output fixed.png
//
// No window is opened in CLI mode. Every file runs through the same
// document pipeline the GUI uses: load, execute each operation in order,
// save.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Parser;

use crate::command::{CommandKind, EditCommand, ParamMap};
use crate::document::Document;

/// RetouchFE headless image editor.
///
/// Apply edit operations to image files and convert between formats — no
/// GUI required.
#[derive(Parser, Debug)]
#[command(
    name = "retouchfe",
    about = "RetouchFE headless batch image editor",
    long_about = "Apply edit operations to image files without opening the GUI.\n\
                  Operations run in the order given and accept the same\n\
                  parameters as the corresponding menu sections.\n\n\
                  Example:\n  \
                  retouchfe --input photo.png --apply gaussian-blur --output result.png\n  \
                  retouchfe -i *.jpg --apply resize:x=800 --output-dir small/"
)]
pub struct CliArgs {
    /// Input file(s). Glob patterns accepted (e.g. "*.png", "shots/*.jpg").
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<String>,

    /// Edit operation, repeatable and applied in order.
    /// Form: NAME or NAME:KEY=VALUE[,KEY=VALUE...] — e.g. "invert",
    /// "resize:x=800", "color-balance:r=0.5,b=1.2", "saturation:level=1.5".
    #[arg(short, long = "apply", value_name = "OP")]
    pub apply: Vec<String>,

    /// Output file path. Only valid for single-file input.
    /// For batch input use --output-dir instead.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output directory for batch processing. Files keep their names.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print per-file timing information.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// True when any CLI-mode flag is present in the real process
    /// arguments. Used by `main()` to route before creating a window.
    pub fn is_cli_mode() -> bool {
        std::env::args().any(|a| a == "--input" || a == "-i")
    }
}

/// Run all CLI processing and return an OS exit code.
/// `0` = all files succeeded, `1` = one or more files failed.
pub fn run(args: CliArgs) -> i32 {
    let inputs = resolve_inputs(&args.input);
    if inputs.is_empty() {
        eprintln!("error: no input files matched the given pattern(s).");
        return 1;
    }

    if inputs.len() > 1 && args.output.is_some() && args.output_dir.is_none() {
        eprintln!(
            "error: {} input files given but --output only accepts a single file path.\n\
             Use --output-dir to specify a destination directory for batch processing.",
            inputs.len()
        );
        return 1;
    }

    // Parse every --apply spec up front so a typo fails before any work.
    let mut commands: Vec<EditCommand> = Vec::with_capacity(args.apply.len());
    for spec in &args.apply {
        match parse_op(spec) {
            Ok(command) => commands.push(command),
            Err(e) => {
                eprintln!("error: {}", e);
                return 1;
            }
        }
    }

    if let Some(dir) = &args.output_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!(
                "error: could not create output directory '{}': {}",
                dir.display(),
                e
            );
            return 1;
        }
    }

    let total = inputs.len();
    let multi = total > 1;
    let mut any_failure = false;

    for (idx, input_path) in inputs.iter().enumerate() {
        if multi || args.verbose {
            println!("[{}/{}] {}", idx + 1, total, input_path.display());
        }

        let file_start = Instant::now();

        let output_path = match build_output_path(
            input_path,
            args.output.as_deref(),
            args.output_dir.as_deref(),
        ) {
            Some(p) => p,
            None => {
                eprintln!(
                    "  error: cannot determine output path for '{}'.",
                    input_path.display()
                );
                any_failure = true;
                continue;
            }
        };

        match run_one(input_path, &output_path, &commands) {
            Ok(()) => {
                if args.verbose || multi {
                    println!(
                        "  → {} ({:.0}ms)",
                        output_path.display(),
                        file_start.elapsed().as_secs_f64() * 1000.0
                    );
                }
            }
            Err(e) => {
                eprintln!("  error: {}", e);
                any_failure = true;
            }
        }
    }

    if any_failure { 1 } else { 0 }
}

/// Process one file through the document pipeline.
fn run_one(input: &Path, output: &Path, commands: &[EditCommand]) -> Result<(), String> {
    let mut document = Document::new();
    document
        .load(input)
        .map_err(|e| format!("load failed: {}", e))?;

    for command in commands {
        document
            .execute(command)
            .map_err(|e| format!("{} failed: {}", command.kind.label(), e))?;
    }

    document
        .save(output)
        .map_err(|e| format!("save failed: {}", e))
}

/// Parse one `--apply` spec into a command.
fn parse_op(spec: &str) -> Result<EditCommand, String> {
    let (name, params_str) = match spec.split_once(':') {
        Some((n, p)) => (n, Some(p)),
        None => (spec, None),
    };
    let name = name.trim().to_lowercase();
    let kind = CommandKind::all()
        .iter()
        .copied()
        .find(|k| k.name() == name)
        .ok_or_else(|| format!("unknown operation '{}'", name))?;

    let mut command = EditCommand::new(kind);
    match params_str {
        Some(pairs) => {
            if !kind.takes_params() {
                return Err(format!("operation '{}' takes no parameters", name));
            }
            let mut map = ParamMap::new();
            for pair in pairs.split(',') {
                let (key, value) = pair
                    .split_once('=')
                    .ok_or_else(|| format!("bad parameter '{}', expected KEY=VALUE", pair))?;
                let value: f64 = value
                    .trim()
                    .parse()
                    .map_err(|_| format!("'{}' is not a number", value.trim()))?;
                map.insert(key.trim().to_string(), value);
            }
            command.assign_data(map);
        }
        None => {
            if kind.takes_params() {
                return Err(format!(
                    "operation '{}' requires parameters, e.g. '{}:key=value'",
                    name, name
                ));
            }
        }
    }
    Ok(command)
}

/// Expand glob patterns and literal paths into a deduplicated, ordered list.
fn resolve_inputs(patterns: &[String]) -> Vec<PathBuf> {
    let mut result: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        let as_path = Path::new(pattern);

        if as_path.exists() {
            if !result.iter().any(|p| p.as_path() == as_path) {
                result.push(as_path.to_path_buf());
            }
            continue;
        }

        match glob::glob(pattern) {
            Ok(entries) => {
                let mut matched = false;
                for entry in entries.flatten() {
                    if !result.contains(&entry) {
                        result.push(entry);
                    }
                    matched = true;
                }
                if !matched {
                    eprintln!("warning: pattern '{}' matched no files.", pattern);
                }
            }
            Err(e) => {
                eprintln!("warning: invalid glob '{}': {}", pattern, e);
            }
        }
    }

    result
}

/// Compute the output path for a single input file.
///
/// Priority:
/// 1. `--output` (explicit path, single-file input)
/// 2. `--output-dir` (batch directory, original file name)
/// 3. Fallback: same directory, `<stem>_out.<ext>` so the input is never
///    silently overwritten
fn build_output_path(
    input: &Path,
    output: Option<&Path>,
    output_dir: Option<&Path>,
) -> Option<PathBuf> {
    if let Some(out) = output {
        return Some(out.to_path_buf());
    }

    if let Some(dir) = output_dir {
        return Some(dir.join(input.file_name()?));
    }

    let stem = input.file_stem()?.to_string_lossy().into_owned();
    let ext = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());
    let parent = input.parent().unwrap_or(Path::new("."));
    Some(parent.join(format!("{}_out.{}", stem, ext)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bare_operation() {
        let command = parse_op("invert").unwrap();
        assert_eq!(command.kind, CommandKind::Invert);
    }

    #[test]
    fn parse_operation_with_params() {
        let command = parse_op("resize:x=800,y=600").unwrap();
        assert_eq!(command.kind, CommandKind::Resize);
        let img = image::RgbaImage::new(10, 10);
        let out = command.execute(&img).unwrap();
        assert_eq!(out.dimensions(), (800, 600));
    }

    #[test]
    fn parse_is_case_insensitive_on_name() {
        let command = parse_op("Gaussian-Blur").unwrap();
        assert_eq!(command.kind, CommandKind::GaussianBlur);
    }

    #[test]
    fn unknown_operation_is_rejected() {
        assert!(parse_op("mosaic").is_err());
    }

    #[test]
    fn missing_params_on_numeric_op_is_rejected() {
        assert!(parse_op("saturation").is_err());
    }

    #[test]
    fn params_on_parameterless_op_are_rejected() {
        assert!(parse_op("invert:x=1").is_err());
    }

    #[test]
    fn malformed_pair_is_rejected() {
        assert!(parse_op("resize:x").is_err());
        assert!(parse_op("resize:x=abc").is_err());
    }

    #[test]
    fn output_path_fallback_never_overwrites_input() {
        let out = build_output_path(Path::new("/tmp/photo.png"), None, None).unwrap();
        assert_eq!(out, PathBuf::from("/tmp/photo_out.png"));
    }

    #[test]
    fn output_dir_keeps_file_name() {
        let out = build_output_path(
            Path::new("shots/photo.jpg"),
            None,
            Some(Path::new("processed")),
        )
        .unwrap();
        assert_eq!(out, PathBuf::from("processed/photo.jpg"));
    }
}
