use crate::conversion::ConversionRequest;
use crate::types::FilePath;
use crate::version::UM_ENV_VERSION;
use clap::Parser;

/// Convert a um_env.py configuration file to yaml
#[derive(Parser, Debug, PartialEq)]
#[command(name = "um-env-to-yaml", version = UM_ENV_VERSION)]
pub struct Arguments {
    /// Path to the um_env.py file to convert
    pub input_filepath: FilePath,

    /// Output file path (defaults to um_env.yaml next to the input file)
    #[arg(short = 'o', long)]
    pub ofile: Option<FilePath>,
}

impl From<Arguments> for ConversionRequest {
    fn from(arguments: Arguments) -> Self {
        ConversionRequest {
            input_path: arguments.input_filepath,
            output_path: arguments.ofile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<ConversionRequest, ErrorKind> {
        Arguments::try_parse_from(std::iter::once("um-env-to-yaml").chain(args.iter().copied()))
            .map(ConversionRequest::from)
            .map_err(|error| error.kind())
    }

    #[test]
    fn command_is_well_formed() {
        Arguments::command().debug_assert();
    }

    #[test]
    fn input_only() {
        assert_eq!(
            parse(&["run/um_env.py"]),
            Ok(ConversionRequest {
                input_path: FilePath::from("run/um_env.py"),
                output_path: None,
            })
        );
    }

    #[test]
    fn short_and_long_output_flag() {
        let expected = Ok(ConversionRequest {
            input_path: FilePath::from("um_env.py"),
            output_path: Some(FilePath::from("out.yaml")),
        });
        assert_eq!(parse(&["um_env.py", "-o", "out.yaml"]), expected);
        assert_eq!(parse(&["--ofile", "out.yaml", "um_env.py"]), expected);
        assert_eq!(parse(&["um_env.py", "--ofile=out.yaml"]), expected);
    }

    #[test]
    fn input_is_required() {
        assert_eq!(parse(&[]), Err(ErrorKind::MissingRequiredArgument));
    }

    #[test]
    fn unknown_flag() {
        assert_eq!(
            parse(&["um_env.py", "--sorted"]),
            Err(ErrorKind::UnknownArgument)
        );
    }

    #[test]
    fn help_and_version() {
        assert_eq!(parse(&["--help"]), Err(ErrorKind::DisplayHelp));
        assert_eq!(parse(&["--version"]), Err(ErrorKind::DisplayVersion));
    }
}
