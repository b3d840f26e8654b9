use crate::CliError;
use shared::{
    Algorithm, Locale, ModelSelection, PipelineResult, PredictionRequest, Seed, ValidatedFile,
};
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_CONFIG_PATH: &str = "config/client.yaml";

pub fn print_usage() {
    eprintln!(
        r#"
lfme-cli - Classify an image with the LFME prediction service

USAGE:
    lfme-cli <IMAGE> [OPTIONS]

ARGS:
    <IMAGE>    Path to a JPG, PNG, GIF, WEBP or BMP image (max 10 MB)

OPTIONS:
    -a, --algorithm <NAME>   LFME, ERM, CORAL or Mixup; repeat or comma-separate
                             to compare several models (default: LFME)
    --compare                Use the multi-model endpoint even for one model
    -s, --seed <SEED>        Test-excluded environment forwarded to the service (default: 0)
    -c, --config <PATH>      Client config file (default: config/client.yaml)
    -l, --locale <en|zh>     Output language (default: en)
    --top <N>                Only print the N most likely categories
    -h, --help               Print this help message

ENVIRONMENT:
    LFME_API_BASE_URL        Overrides base_url from the config file
    RUST_LOG                 Log filter (default: info)
"#
    );
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub image: PathBuf,
    pub algorithms: Vec<Algorithm>,
    pub compare: bool,
    pub seed: Seed,
    pub config: PathBuf,
    pub locale: Locale,
    pub top: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Run(CliArgs),
}

impl CliArgs {
    /// Single-model requests go to `/api/predict`; everything else is a comparison.
    pub fn build_request<'a, B>(
        &self,
        file: &'a ValidatedFile<B>,
    ) -> PipelineResult<PredictionRequest<'a, B>> {
        if self.compare || self.algorithms.len() > 1 {
            let models = ModelSelection::new(self.algorithms.iter().copied())?;
            Ok(PredictionRequest::multi(file, &self.seed, &models))
        } else {
            let algorithm = self.algorithms.first().copied().unwrap_or_default();
            Ok(PredictionRequest::single(file, algorithm, &self.seed))
        }
    }
}

fn take_value(args: &[String], i: &mut usize, flag: &str) -> Result<String, CliError> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| CliError::Usage(format!("{} needs a value", flag)))
}

pub fn parse_args<I>(raw: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = raw.into_iter().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        return Ok(Command::Help);
    }

    let mut image: Option<PathBuf> = None;
    let mut algorithms: Vec<Algorithm> = Vec::new();
    let mut compare = false;
    let mut seed = Seed::default();
    let mut config = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut locale = Locale::default();
    let mut top: Option<usize> = None;

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--algorithm" | "-a" => {
                let value = take_value(&args, &mut i, arg)?;
                for name in value.split(',').map(str::trim).filter(|n| !n.is_empty()) {
                    let algorithm = Algorithm::from_str(name)
                        .map_err(|_| CliError::Usage(format!("unknown algorithm: {}", name)))?;
                    if !algorithms.contains(&algorithm) {
                        algorithms.push(algorithm);
                    }
                }
            }
            "--compare" => {
                compare = true;
            }
            "--seed" | "-s" => {
                seed = Seed::from(take_value(&args, &mut i, arg)?.as_str());
            }
            "--config" | "-c" => {
                config = PathBuf::from(take_value(&args, &mut i, arg)?);
            }
            "--locale" | "-l" => {
                let value = take_value(&args, &mut i, arg)?;
                locale = Locale::from_str(&value)
                    .map_err(|_| CliError::Usage(format!("unsupported locale: {}", value)))?;
            }
            "--top" => {
                let value = take_value(&args, &mut i, arg)?;
                let count = value
                    .parse::<usize>()
                    .map_err(|_| CliError::Usage(format!("--top expects a number, got {}", value)))?;
                top = Some(count);
            }
            flag if flag.starts_with('-') => {
                return Err(CliError::Usage(format!("unknown option: {}", flag)));
            }
            path => {
                if image.is_some() {
                    return Err(CliError::Usage(format!("unexpected argument: {}", path)));
                }
                image = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    let image = image.ok_or_else(|| CliError::Usage("missing <IMAGE> argument".into()))?;
    if algorithms.is_empty() {
        algorithms.push(Algorithm::default());
    }

    Ok(Command::Run(CliArgs {
        image,
        algorithms,
        compare,
        seed,
        config,
        locale,
        top,
    }))
}
