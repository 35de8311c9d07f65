use std::path::PathBuf;

use clap::Parser;

/// Find Kangxi radicals, mojibake and oversized images in PDF documents.
///
/// For every PDF with findings, writes `<name>_problems.json` and an annotated
/// `<name>_problems.pdf` holding only the offending pages next to the input.
#[derive(Debug, Parser)]
#[command(name = "mojicheck", about, version)]
pub struct Cli {
    /// A PDF file, or a directory whose PDF files are all checked
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_single_path() {
        let cli = Cli::try_parse_from(["mojicheck", "book.pdf"]).unwrap();
        assert_eq!(cli.path, PathBuf::from("book.pdf"));
    }

    #[test]
    fn path_is_required() {
        assert!(Cli::try_parse_from(["mojicheck"]).is_err());
    }

    #[test]
    fn extra_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["mojicheck", "a.pdf", "b.pdf"]).is_err());
    }
}
