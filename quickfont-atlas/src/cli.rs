use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::{Report, eyre::eyre};

use crate::pipeline::OutputPaths;

#[derive(Parser, Debug)]
#[command(
    name = "quickfont-atlas",
    about = "Bitmap font atlas generator for quickfont",
    long_about = "Converts a BDF bitmap font into a 6x11 printable-ASCII glyph atlas, written as \
                  ASCII art, 32-bit bitmap images and embeddable C headers"
)]
pub struct Cli {
    /// BDF font to convert
    #[arg(
        short,
        long,
        default_value = "generate/tewi-medium-11.bdf",
        value_name = "PATH",
        value_parser = validate_file_exists
    )]
    pub input: PathBuf,

    /// Directory receiving the generated files
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub output_dir: PathBuf,
}

impl Cli {
    /// Validates the CLI arguments
    pub fn validate(&self) -> Result<(), Report> {
        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(eyre!(
                "Output path is not a directory: {}",
                self.output_dir.display()
            ));
        }

        Ok(())
    }

    /// Paths of every file the generator writes
    pub fn output_paths(&self) -> OutputPaths {
        OutputPaths::in_dir(&self.output_dir)
    }

    /// Prints a summary of the configuration
    pub fn print_summary(&self) {
        println!("\nGenerating glyph atlas:");
        println!("  Font: {}", self.input.display());
        println!("  Output directory: {}", display_dir(&self.output_dir));
    }
}

fn display_dir(dir: &Path) -> String {
    if dir == Path::new(".") {
        "current directory".to_string()
    } else {
        dir.display().to_string()
    }
}

fn validate_file_exists(s: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(s);

    match () {
        _ if !path.exists() => Err(format!("Input file does not exist: {s}")),
        _ if !path.is_file() => Err(format!("Path is not a file: {s}")),
        _ => Ok(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_validation() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            input: PathBuf::from("font.bdf"),
            output_dir: dir.path().to_path_buf(),
        };

        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_missing_output_dir_is_created_later() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli {
            input: PathBuf::from("font.bdf"),
            output_dir: dir.path().join("not-yet"),
        };

        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_output_dir_must_be_a_directory() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let cli = Cli {
            input: PathBuf::from("font.bdf"),
            output_dir: file.path().to_path_buf(),
        };

        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_input_must_exist() {
        assert!(validate_file_exists("/definitely/not/here.bdf").is_err());

        let dir = tempfile::tempdir().unwrap();
        assert!(validate_file_exists(dir.path().to_str().unwrap()).is_err());

        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(validate_file_exists(file.path().to_str().unwrap()).is_ok());
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["quickfont-atlas", "--input", "Cargo.toml"]).unwrap();
        assert_eq!(cli.output_dir, PathBuf::from("."));
        assert_eq!(
            cli.output_paths().ascii_art,
            PathBuf::from("./quickfont.txt")
        );
    }
}
