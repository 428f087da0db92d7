use clap::Parser;
use skillmatch::adapters::pool;
use skillmatch::utils::{logger, validation::Validate};
use skillmatch::{CandidateSource, CliConfig, InMemoryRegistry, MatchEngine, Scorer, SkillGraph};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting skillmatch CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 載入技能圖；失敗時降級為僅精確匹配，不中止
    let graph = match SkillGraph::load(&config.graph_file) {
        Ok(graph) => Some(Arc::new(graph)),
        Err(e) => {
            tracing::warn!("⚠️ {}", e);
            tracing::warn!("Falling back to exact-match scoring");
            None
        }
    };

    let project = pool::load_project(&config.project_file)?;
    tracing::info!(
        "📋 Project {} with {} requirements (team size {}..{})",
        project.id,
        project.requirements.len(),
        project.min_participants,
        project.max_participants
    );

    // 建立儲存與引擎
    let registry = InMemoryRegistry::new();
    let scorer = Scorer::from_config(&config, graph);
    let engine = MatchEngine::new(registry.clone(), registry.clone(), scorer);

    let source = if config.virtual_match {
        let batch = pool::load_external(&config.candidates_file)?;
        tracing::info!("👥 Loaded {} external candidates", batch.len());
        CandidateSource::Provided(batch)
    } else {
        let candidates = if config.candidates_file.ends_with(".csv") {
            pool::load_pool_csv(&config.candidates_file)?
        } else {
            pool::load_pool(&config.candidates_file)?
        };
        tracing::info!("👥 Loaded {} candidates into the pool", candidates.len());
        registry.insert_candidates(candidates);
        CandidateSource::Pool
    };

    match engine.match_project(&project, source).await {
        Ok(outcome) => {
            tracing::info!("✅ Match completed successfully!");
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Match failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                skillmatch::utils::error::ErrorSeverity::Low => 0, // 警告，但成功
                skillmatch::utils::error::ErrorSeverity::Medium => 2, // 資料不足
                skillmatch::utils::error::ErrorSeverity::High => 1, // 處理錯誤
                skillmatch::utils::error::ErrorSeverity::Critical => 3, // 系統錯誤
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
