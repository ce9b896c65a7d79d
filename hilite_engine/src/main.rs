use hilite_engine::{logging, pipeline};
use std::env;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize global logging system
    logging::init_global_logging()?;

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <source-file> [--language <name>]", args[0]);
        eprintln!("       {} --help", args[0]);
        std::process::exit(1);
    }

    if args[1] == "--help" {
        print_help(&args[0]);
        return Ok(());
    }

    let file_path = &args[1];
    let language_name = match parse_language_option(&args[2..]) {
        Some(name) => name,
        None => match language_from_extension(file_path) {
            Some(name) => name.to_string(),
            None => {
                eprintln!(
                    "Error: cannot infer language from '{}'; pass --language <name>",
                    file_path
                );
                std::process::exit(1);
            }
        },
    };

    let source = std::fs::read_to_string(file_path)
        .map_err(|e| format!("Cannot read {}: {}", file_path, e))?;

    match pipeline::run_named(&source, &language_name) {
        Ok(output) => {
            println!("{}", output.to_json()?);
        }
        Err(error) => {
            eprintln!("FAILED: {}", error);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn print_help(program_name: &str) {
    println!("Hilite Engine v{}", env!("CARGO_PKG_VERSION"));
    println!("Multi-language lexing, parsing, and syntax highlight resolution");
    println!();
    println!("USAGE:");
    println!("    {} <source-file>                     # Infer language from extension", program_name);
    println!("    {} <source-file> --language <name>   # Explicit language", program_name);
    println!();
    println!("LANGUAGES:");
    println!("    clojure    (.clj, .cljs, .edn)");
    println!("    fortran    (.f, .f77, .f90, .f95, .for)");
    println!("    csharp     (.cs)");
    println!();
    println!("OUTPUT:");
    println!("    The annotated token stream as JSON on stdout: one entry per");
    println!("    input token with category, position, color, and emphasis.");
}

fn parse_language_option(args: &[String]) -> Option<String> {
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--language" => {
                if i + 1 < args.len() {
                    return Some(args[i + 1].clone());
                }
                eprintln!("Warning: --language requires a name");
                return None;
            }
            other => {
                eprintln!("Warning: Unknown option '{}'", other);
            }
        }
        i += 1;
    }
    None
}

fn language_from_extension(file_path: &str) -> Option<&'static str> {
    let extension = Path::new(file_path).extension()?.to_str()?;
    match extension.to_ascii_lowercase().as_str() {
        "clj" | "cljs" | "edn" => Some("clojure"),
        "f" | "f77" | "f90" | "f95" | "for" => Some("fortran"),
        "cs" => Some("csharp"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_extension() {
        assert_eq!(language_from_extension("core.clj"), Some("clojure"));
        assert_eq!(language_from_extension("solver.f90"), Some("fortran"));
        assert_eq!(language_from_extension("Program.cs"), Some("csharp"));
        assert_eq!(language_from_extension("notes.txt"), None);
        assert_eq!(language_from_extension("noextension"), None);
    }

    #[test]
    fn test_parse_language_option() {
        let args = vec!["--language".to_string(), "fortran".to_string()];
        assert_eq!(parse_language_option(&args), Some("fortran".to_string()));
        assert_eq!(parse_language_option(&[]), None);
    }
}
