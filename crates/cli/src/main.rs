use anyhow::Result;
use batch_renamer_core::{
    app_paths, apply_plan, generate_plan, load_config, save_config, AppConfig, PlanOptions,
    RenamePlan, Strategy,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "batch-renamer-cli")]
#[command(about = "ファイル名の連番やテンプレートを一括で書き換えます")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// (1) (2) ... (10) を (01) (02) ... (10) に揃えます
    Ordinal(CommonArgs),
    /// 旧テンプレートに一致するファイル名を新テンプレートに書き換えます
    Template(TemplateArgs),
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
struct ConfigArgs {
    #[command(subcommand)]
    action: ConfigAction,
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    Show,
    /// 既定値で設定ファイルを作成します
    Init {
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

#[derive(Debug, Args)]
struct CommonArgs {
    #[arg(long)]
    input: String,
    /// 省略時は設定ファイルの recursive_default
    #[arg(long, overrides_with = "no_recursive")]
    recursive: bool,
    #[arg(long, overrides_with = "recursive")]
    no_recursive: bool,
    /// 省略時は設定ファイルの include_hidden_default
    #[arg(long, overrides_with = "no_include_hidden")]
    include_hidden: bool,
    #[arg(long, overrides_with = "include_hidden")]
    no_include_hidden: bool,
    #[arg(long, default_value_t = false)]
    apply: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Debug, Args)]
struct TemplateArgs {
    #[command(flatten)]
    common: CommonArgs,
    /// 例: IMG_\YYYY\MM\DD_\hh\mm\ss (省略時は設定ファイルの値)
    #[arg(long)]
    old_template: Option<String>,
    /// 例: \YYYY-\MM-\DD (\i) (省略時は設定ファイルの値)
    #[arg(long)]
    new_template: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ordinal(args) => cmd_ordinal(args),
        Commands::Template(args) => cmd_template(args),
        Commands::Config(config) => match config.action {
            ConfigAction::Show => cmd_config_show(),
            ConfigAction::Init { force } => cmd_config_init(force),
        },
    }
}

fn cmd_ordinal(args: CommonArgs) -> Result<()> {
    let config = load_config()?;
    run(args, Strategy::Ordinal, &config)
}

fn cmd_template(args: TemplateArgs) -> Result<()> {
    let config = load_config()?;
    let old_template = args
        .old_template
        .unwrap_or_else(|| config.old_template.clone());
    let new_template = args
        .new_template
        .unwrap_or_else(|| config.new_template.clone());

    run(
        args.common,
        Strategy::Template {
            old_template,
            new_template,
        },
        &config,
    )
}

fn run(args: CommonArgs, strategy: Strategy, config: &AppConfig) -> Result<()> {
    let options = PlanOptions {
        input: args.input.into(),
        recursive: resolve_flag(args.recursive, args.no_recursive, config.recursive_default),
        include_hidden: resolve_flag(
            args.include_hidden,
            args.no_include_hidden,
            config.include_hidden_default,
        ),
        strategy,
    };

    let plan = generate_plan(&options)?;

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        OutputFormat::Table => {
            print_table(&plan);
        }
    }

    if args.apply {
        let result = apply_plan(&plan)?;
        eprintln!("適用完了: {}件", result.applied);
    } else {
        eprintln!("dry-runモード: 実ファイルは変更していません。適用するには --apply を指定してください。");
    }

    Ok(())
}

fn resolve_flag(on: bool, off: bool, default: bool) -> bool {
    if on {
        true
    } else if off {
        false
    } else {
        default
    }
}

fn cmd_config_show() -> Result<()> {
    let config = load_config()?;
    let paths = app_paths()?;
    println!("設定ファイル: {}", paths.config_path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

fn cmd_config_init(force: bool) -> Result<()> {
    let paths = app_paths()?;
    if paths.config_path.exists() && !force {
        anyhow::bail!(
            "設定ファイルは既に存在します: {} (上書きするには --force を指定してください)",
            paths.config_path.display()
        );
    }
    save_config(&AppConfig::default())?;
    println!("設定ファイルを作成しました: {}", paths.config_path.display());
    Ok(())
}

fn print_table(plan: &RenamePlan) {
    println!("元ファイル -> 新ファイル");
    for candidate in &plan.candidates {
        println!(
            "{} -> {}",
            candidate.original_path.display(),
            candidate.target_path.display()
        );
    }

    println!(
        "\n集計: scanned={} hidden_skip={} planned={} untouched={}",
        plan.stats.scanned_files,
        plan.stats.skipped_hidden,
        plan.stats.planned,
        plan.stats.untouched
    );
}
