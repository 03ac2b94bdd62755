use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;

use binclass_classifiers::{ModelConfig, ModelType};
use binclass_cli::playground::{
    hint_for, load_model_config, render, run, PlaygroundRequest, TrainingSource,
    DEFAULT_RANDOM_SAMPLES,
};

fn main() {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("BINCLASS_LOG", "error"))
        .init();

    if let Err(err) = dispatch(build_cli().get_matches()) {
        eprintln!("Error: {:#}", err);
        if let Some(hint) = hint_for(&err) {
            eprintln!("Hint: {}", hint);
        }
        std::process::exit(1);
    }
}

fn build_cli() -> Command {
    Command::new("binclass")
        .version(clap::crate_version!())
        .about("Binary classifier playground: train a model and classify a feature vector")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("predict")
                .about("Train the selected model and predict the class of one feature vector")
                .arg(
                    Arg::new("features")
                        .help("Feature values of the observation to classify")
                        .required(true)
                        .num_args(1..)
                        .allow_negative_numbers(true)
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("model")
                        .short('m')
                        .long("model")
                        .help("Model to use: logistic_regression or random_forest")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .default_value("logistic_regression"),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("JSON model configuration. Overrides --model.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("train")
                        .short('t')
                        .long("train")
                        .help(
                            "CSV training data with a header row; feature columns first, \
                             0/1 label last. Without it the model is trained on random data.",
                        )
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("samples")
                        .short('n')
                        .long("samples")
                        .help("Number of random training samples when --train is not given")
                        .value_parser(clap::value_parser!(usize))
                        .conflicts_with("train"),
                )
                .arg(
                    Arg::new("seed")
                        .short('s')
                        .long("seed")
                        .help("Seed for random training data and the random forest")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the result as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("models").about("List the available models"))
}

fn dispatch(matches: ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("predict", predict_matches)) => handle_predict(predict_matches),
        Some(("models", _)) => {
            for name in ModelType::NAMES {
                let model_type = ModelType::from_str(name).map_err(anyhow::Error::msg)?;
                println!("{:<22}{}", name, model_type.display_name());
            }
            Ok(())
        }
        _ => unreachable!(),
    }
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    let model = match matches.get_one::<PathBuf>("config") {
        Some(config_path) => {
            log::info!("Using model config: {:?}", config_path);
            load_model_config(config_path)?
        }
        None => {
            let name: &String = matches.get_one("model").unwrap();
            ModelConfig::new(ModelType::from_str(name).map_err(anyhow::Error::msg)?)
        }
    };

    let training = match matches.get_one::<PathBuf>("train") {
        Some(path) => TrainingSource::Csv(path.clone()),
        None => TrainingSource::Random {
            samples: matches
                .get_one::<usize>("samples")
                .copied()
                .unwrap_or(DEFAULT_RANDOM_SAMPLES),
        },
    };

    let request = PlaygroundRequest {
        model,
        training,
        features: matches.get_many::<f64>("features").unwrap().copied().collect(),
        seed: matches.get_one::<u64>("seed").copied(),
    };

    let result = run(&request)?;
    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", render(&result));
    }
    Ok(())
}
