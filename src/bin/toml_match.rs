use clap::Parser;
use skillmatch::adapters::pool;
use skillmatch::config::settings::MatchSettings;
use skillmatch::utils::{logger, validation::Validate};
use skillmatch::{CandidateSource, InMemoryRegistry, MatchEngine, Scorer, SkillGraph};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "toml-match")]
#[command(about = "Team matching driven by a TOML settings file")]
struct Args {
    /// Path to TOML settings file
    #[arg(short, long, default_value = "match-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override max_path_weight from the settings file
    #[arg(long)]
    max_path_weight: Option<f64>,

    /// Dry run - show what would be matched without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based team matching");
    tracing::info!("📁 Loading settings from: {}", args.config);

    // 載入 TOML 配置
    let mut settings = match MatchSettings::from_file(&args.config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ Failed to load settings file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 應用命令列覆蓋設定
    if let Some(weight) = args.max_path_weight {
        settings.scoring = Some(skillmatch::config::settings::ScoringConfig {
            max_path_weight: Some(weight),
        });
        tracing::info!("🔧 max_path_weight overridden to: {}", weight);
    }

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Settings validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Settings loaded and validated successfully");

    display_settings_summary(&settings, &args);

    // 載入技能圖；失敗時降級為僅精確匹配
    let graph = match SkillGraph::load(settings.graph_file()) {
        Ok(graph) => Some(Arc::new(graph)),
        Err(e) => {
            tracing::warn!("⚠️ {}", e);
            tracing::warn!("Falling back to exact-match scoring");
            None
        }
    };

    let project = pool::load_project(settings.project_file()?)?;

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No matching will occur");
        perform_dry_run(&settings, graph.as_deref(), &project)?;
        return Ok(());
    }

    let registry = InMemoryRegistry::new();
    if let Some(candidates_file) = settings.candidates_file() {
        let candidates = if candidates_file.ends_with(".csv") {
            pool::load_pool_csv(candidates_file)?
        } else {
            pool::load_pool(candidates_file)?
        };
        tracing::info!("👥 Loaded {} candidates into the pool", candidates.len());
        registry.insert_candidates(candidates);
    }

    let scorer = Scorer::from_config(&settings, graph);
    let engine = MatchEngine::new(registry.clone(), registry, scorer);

    match engine.match_project(&project, CandidateSource::Pool).await {
        Ok(outcome) => {
            tracing::info!("✅ Match completed successfully!");
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Err(e) => {
            tracing::error!(
                "❌ Match failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                skillmatch::utils::error::ErrorSeverity::Low => 0,
                skillmatch::utils::error::ErrorSeverity::Medium => 2,
                skillmatch::utils::error::ErrorSeverity::High => 1,
                skillmatch::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_settings_summary(settings: &MatchSettings, args: &Args) {
    println!("📋 Settings Summary:");
    println!(
        "  Engine: {} v{}",
        settings.engine.name, settings.engine.version
    );
    println!("  Graph: {}", settings.graph_file());
    println!("  Max path weight: {}", settings.max_path_weight());

    if let Ok(project_file) = settings.project_file() {
        println!("  Project: {}", project_file);
    }
    if let Some(candidates_file) = settings.candidates_file() {
        println!("  Candidates: {}", candidates_file);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(
    settings: &MatchSettings,
    graph: Option<&SkillGraph>,
    project: &skillmatch::core::ProjectSnapshot,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("🕸️ Skill Graph:");
    match graph {
        Some(graph) => {
            println!("  Nodes: {}", graph.node_count());
            println!("  Edges: {}", graph.edge_count());
        }
        None => {
            println!("  ⚠️ Unavailable - matching would run in exact-match-only mode");
        }
    }

    println!();
    println!("⚙️ Project {}:", project.id);
    println!(
        "  Team size: {}..{}",
        project.min_participants, project.max_participants
    );
    println!("  Requirements:");
    for requirement in &project.requirements {
        let marker = match graph {
            Some(g) if g.contains(&requirement.graph_name()) => "✅",
            Some(_) => "⚠️ not in graph",
            None => "•",
        };
        println!(
            "    {} {} (level {})",
            marker, requirement.skill_name, requirement.level
        );
    }

    if let Some(candidates_file) = settings.candidates_file() {
        println!();
        println!("👥 Candidate pool: {}", candidates_file);
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
