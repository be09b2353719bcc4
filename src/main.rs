use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use cogbias::category::Category;
use cogbias::completion::backend_from_config;
use cogbias::config::Config;
use cogbias::experiment::{ConjunctionFallacy, Experiment};
use cogbias::operator_ui::ConsoleOperator;
use cogbias::pipeline::GenerationPipeline;
use cogbias::store::BuildingBlockStore;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = Command::new("cogbias")
        .about("Generate building blocks for cognitive-bias experiments")
        .long_about(
            "Generates names, occupations, hobbies and descriptions with a text-completion \
             service. Every batch is shown for review; answer 'y' to resample it. Accepted \
             categories are saved to the store file so they are not generated twice.",
        )
        .arg(Arg::new("categories")
            .help("Categories to generate: names, occupations, hobbies, descriptions")
            .num_args(1..))
        .arg(Arg::new("store")
            .long("store")
            .help("Building-block store file (default from config)")
            .value_name("PATH")
            .value_parser(clap::value_parser!(PathBuf)))
        .arg(Arg::new("show")
            .long("show")
            .help("Print the stored building blocks and exit")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("render")
            .long("render")
            .help("Render conjunction-fallacy items from the store and exit")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("template")
            .long("template")
            .help("Template file used by --render (default from config)")
            .value_name("PATH")
            .value_parser(clap::value_parser!(PathBuf)))
        .arg(Arg::new("mock")
            .long("mock")
            .help("Use canned completions instead of the completion service")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .help("Show batch sizes while reviewing")
            .action(ArgAction::SetTrue))
        .arg(Arg::new("set-api-key")
            .long("set-api-key")
            .help("Set the completion service API key")
            .value_name("API_KEY")
            .num_args(1))
        .arg(Arg::new("config")
            .long("config")
            .help("Show configuration information")
            .action(ArgAction::SetTrue))
        .get_matches();

    // Handle configuration commands
    if let Some(api_key) = matches.get_one::<String>("set-api-key") {
        let mut config = Config::load()?;
        config.set_api_key(api_key.clone())?;
        println!("✅ API key saved successfully");
        return Ok(());
    }

    if matches.get_flag("config") {
        Config::show_config_info()?;
        return Ok(());
    }

    let mut config = Config::load()?;
    if matches.get_flag("mock") {
        config.use_mock = true;
    }

    let store_path = matches
        .get_one::<PathBuf>("store")
        .cloned()
        .unwrap_or_else(|| config.store_path.clone());
    let store = open_store(&store_path)?;

    if matches.get_flag("show") {
        print_store(&store);
        return Ok(());
    }

    if matches.get_flag("render") {
        let template_path = matches
            .get_one::<PathBuf>("template")
            .cloned()
            .unwrap_or_else(|| config.template_path.clone());
        let experiment = ConjunctionFallacy::from_template_file(&template_path, store)?;
        experiment
            .check_alignment()
            .with_context(|| format!("Cannot render items from {}", store_path.display()))?;
        for index in 0..experiment.len() {
            match experiment.item_at(index) {
                Some(item) => println!("{}\n", item),
                None => eprintln!("Item {} is missing building blocks", index),
            }
        }
        return Ok(());
    }

    let categories: Vec<Category> = matches
        .get_many::<String>("categories")
        .unwrap_or_default()
        .map(|s| s.parse::<Category>())
        .collect::<Result<_, _>>()?;

    if categories.is_empty() {
        eprintln!("No category provided. Use 'cogbias --help' for usage information.");
        return Ok(());
    }

    let backend = backend_from_config(&config)?;
    let operator = ConsoleOperator::new(matches.get_flag("verbose"));
    let mut pipeline = GenerationPipeline::new(store, backend, Box::new(operator))
        .with_default_max_tokens(config.default_max_tokens)
        .with_checkpoint(&store_path);

    for category in categories {
        info!("Processing category: {}", category);
        let count = pipeline.generate(category).await?.len();
        println!("✅ Stored {} {} in {}", count, category, store_path.display());
    }

    Ok(())
}

/// Opens the store at `path`, starting empty when the file does not exist yet.
fn open_store(path: &Path) -> anyhow::Result<BuildingBlockStore> {
    if !path.exists() {
        info!("No store at {}, starting empty", path.display());
        return Ok(BuildingBlockStore::new());
    }
    BuildingBlockStore::from_file(path)
        .with_context(|| format!("Could not open store {}", path.display()))
}

fn print_store(store: &BuildingBlockStore) {
    if store.is_empty() {
        println!("Store is empty.");
        return;
    }
    for category in store.categories() {
        let items = store.get(category).unwrap_or_default();
        println!("{} ({}):", category, items.len());
        for item in items {
            println!("  - {}", item);
        }
    }
}
