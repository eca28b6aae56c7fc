use clap::Parser;
use grafana_gridder::utils::error::{ErrorSeverity, GridderError};
use grafana_gridder::utils::{logger, validation::Validate};
use grafana_gridder::{
    CliConfig, DashboardConfig, DashboardPanel, GrafanaApiSink, GridPos, GridderEngine,
    LocalFileSink, StdoutSink,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting grafana-gridder");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = cli.validate() {
        fail(&e);
    }

    tracing::info!("📁 Loading configuration from: {}", cli.config);
    let mut config = match DashboardConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", cli.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };
    cli.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        fail(&e);
    }
    tracing::info!("✅ Configuration loaded and validated successfully");

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        if let Err(e) = perform_dry_run(&config) {
            fail(&e);
        }
        return Ok(());
    }

    let result = if cli.publish {
        let sink = match config.grafana_target().and_then(GrafanaApiSink::from_config) {
            Ok(sink) => sink,
            Err(e) => fail(&e),
        };
        tracing::info!("🌐 Publishing to Grafana at {}", sink.base_url());
        GridderEngine::new(sink).run(&config).await
    } else if let Some(output) = &cli.output {
        GridderEngine::new(LocalFileSink::new(output, cli.pretty()))
            .run(&config)
            .await
    } else {
        GridderEngine::new(StdoutSink::new(cli.pretty()))
            .run(&config)
            .await
    };

    match result {
        Ok(location) => {
            tracing::info!("✅ Dashboard '{}' done: {}", config.dashboard.title, location);
            if location != "stdout" {
                println!("✅ Dashboard written to: {}", location);
            }
        }
        Err(e) => fail(&e),
    }

    Ok(())
}

fn fail(e: &GridderError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn perform_dry_run(config: &DashboardConfig) -> grafana_gridder::Result<()> {
    let dashboard = config.build_dashboard()?;

    println!("🔍 Dry Run Analysis:");
    println!("  Dashboard: {}", dashboard.title);
    if let Some(uid) = &dashboard.uid {
        println!("  UID: {}", uid);
    }
    println!("  Groups: {}", config.groups.len());
    println!("  Panels: {}", config.panel_count());
    if let Some(grafana) = &config.grafana {
        println!("  Grafana: {}", grafana.url);
    }

    println!();
    println!("📐 Layout:");
    println!("  {:>4} {:>12} {:>4} {:>4} {:>4} {:>4}  title", "id", "type", "x", "y", "w", "h");
    for panel in &dashboard.panels {
        if let Some(pos) = panel.grid_pos() {
            print_layout_line(panel.id(), panel.kind(), pos, panel.title());
        }
        // 收合的 row 內含面板
        if let DashboardPanel::Row(row) = panel {
            for child in &row.panels {
                if let Some(pos) = child.grid_pos {
                    print_layout_line(child.id, &child.kind, pos, &format!("└ {}", child.title));
                }
            }
        }
    }

    println!();
    println!("✅ Dry run analysis complete.");
    Ok(())
}

fn print_layout_line(id: Option<u32>, kind: &str, pos: GridPos, title: &str) {
    println!(
        "  {:>4} {:>12} {:>4} {:>4} {:>4} {:>4}  {}",
        id.unwrap_or_default(),
        kind,
        pos.x,
        pos.y,
        pos.w,
        pos.h,
        title
    );
}
