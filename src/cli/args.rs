use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cle-processor")]
#[command(about = "Per-station temperature statistics from a block-compressed measurements file")]
#[command(version)]
pub struct Cli {
    /// Input container file [default: measurements-1.cle]
    pub input: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments() {
        let cli = Cli::try_parse_from(["cle-processor"]).unwrap();
        assert_eq!(cli.input, None);
    }

    #[test]
    fn test_positional_input() {
        let cli = Cli::try_parse_from(["cle-processor", "measurements-5.cle"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("measurements-5.cle")));
    }

    #[test]
    fn test_extra_arguments_rejected() {
        assert!(Cli::try_parse_from(["cle-processor", "a.cle", "b.cle"]).is_err());
        assert!(Cli::try_parse_from(["cle-processor", "--verbose"]).is_err());
    }
}
