use bridge_geo::{batch, cli, config, error, export, overpass, progress, reader, resolver};
use bridge_geo::cancel::CancelFlag;
use bridge_geo_common::{AreaId, BatchReport};
use clap::Parser;
use cli::{Cli, Commands, FetchArgs};
use config::Config;
use error::{BridgeGeoError, Result};
use overpass::{Fetcher, ReqwestTransport};
use resolver::FeatureResolver;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run { input, output, format, sheet, fetch } => {
            println!("🌉 bridge-geo - 一括変換\n");
            let config = Config::load()?;

            // 1. 橋リスト読み込み
            let sheet = sheet.unwrap_or_else(|| config.sheet_name.clone());
            println!("[1/3] 橋リストを読み込み中... (シート: {})", sheet);
            let records = reader::read_bridge_list(&input, &sheet)?;
            println!("✔ {}件の橋を検出\n", records.len());

            if records.is_empty() {
                return Err(BridgeGeoError::EmptyInput(input.display().to_string()));
            }

            // 2. Overpass照会
            let effective = effective_config(&config, &fetch)?;
            let resolver = build_resolver(&effective, install_ctrl_c())?;
            println!(
                "[2/3] Overpass照会中... (ミラー{}件, 最大{}ラウンド)",
                resolver.fetcher().mirrors().len(),
                effective.retries
            );
            let mut observer = progress::BarProgress::new();
            let report = batch::process_batch(&records, &resolver, &mut observer).await;
            print_summary(&report);

            // 3. 出力
            println!("[3/3] 結果を出力中... (形式: {})", format);
            let output = output.unwrap_or_else(|| PathBuf::from("."));
            for path in export::export_report(&report, &format, &output)? {
                println!("✔ 出力: {}", path.display());
            }

            if report.cancelled {
                println!("\n⚠ 中断されたため途中までの結果を出力しました");
            } else {
                println!("\n✅ 完了");
            }
        }

        Commands::Lookup { name, area_id, fetch } => {
            let area = parse_area(area_id)?;
            let resolver = build_resolver(&effective_config(&Config::load()?, &fetch)?, install_ctrl_c())?;

            println!("🔍 {} (AreaID: {}) を検索中...", name, area);
            match resolver.resolve_exact(&name, area).await {
                Ok(feature) => {
                    let (start_lat, start_lon) = feature.start.to_dms();
                    let (end_lat, end_lon) = feature.end.to_dms();
                    println!("✔ way {} ({})", feature.feature_id, feature.osm_url());
                    println!("  起点: {}, {} ({} {})", feature.start.latitude, feature.start.longitude, start_lat, start_lon);
                    println!("  終点: {}, {} ({} {})", feature.end.latitude, feature.end.longitude, end_lat, end_lon);
                }
                Err(reason) => println!("✘ {} ({})", reason.label(), reason.code()),
            }
        }

        Commands::Candidates { area_id, fetch } => {
            let area = parse_area(area_id)?;
            let resolver = build_resolver(&effective_config(&Config::load()?, &fetch)?, install_ctrl_c())?;

            println!("🔍 AreaID {} の名称なし橋を検索中...", area);
            match resolver.resolve_candidates(area).await {
                Ok(candidates) if candidates.is_empty() => println!("候補はありません"),
                Ok(candidates) => {
                    println!("✔ {}件の候補", candidates.len());
                    for feature in candidates {
                        println!(
                            "  way {}: ({}, {}) → ({}, {})  {}",
                            feature.feature_id,
                            feature.start.latitude,
                            feature.start.longitude,
                            feature.end.latitude,
                            feature.end.longitude,
                            feature.osm_url()
                        );
                    }
                }
                Err(reason) => println!("✘ {}", reason.label()),
            }
        }

        Commands::Export { input, output } => {
            println!("📄 bridge-geo - レポート再生成\n");
            let report = BatchReport::load_json(&input)?;
            let output = output.unwrap_or_else(|| input.with_extension("xlsx"));
            export::excel::generate_excel(&report, &output)?;
            println!("✔ Excel出力: {}", output.display());
        }

        Commands::Config { show, add_mirror, clear_mirrors, retries, wait, reset } => {
            let mut config = Config::load_for_edit(reset)?;
            let changed = reset || clear_mirrors || add_mirror.is_some() || retries.is_some() || wait.is_some();

            if clear_mirrors {
                config.mirrors.clear();
            }
            if let Some(url) = add_mirror {
                config.add_mirror(url);
            }
            if let Some(retries) = retries {
                config.retries = retries;
            }
            if let Some(wait) = wait {
                config.wait_seconds = wait;
            }

            if changed {
                config.validate()?;
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  ミラー:");
                for mirror in &config.mirrors {
                    println!("    - {}", mirror);
                }
                println!("  リトライ回数: {}", config.retries);
                println!("  待機秒数: {}", config.wait_seconds);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  シート名: {}", config.sheet_name);
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "bridge_geo=debug" } else { "bridge_geo=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Ctrl-C で中断フラグを立てる
fn install_ctrl_c() -> CancelFlag {
    let cancel = CancelFlag::new();
    let flag = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\n中断要求を受け付けました。処理中の行で停止します...");
            flag.cancel();
        }
    });
    cancel
}

/// 設定ファイル + コマンドライン指定
fn effective_config(config: &Config, fetch: &FetchArgs) -> Result<Config> {
    let config = config.with_fetch_overrides(&fetch.mirrors, fetch.retries, fetch.wait);
    config.validate()?;
    Ok(config)
}

fn build_resolver(config: &Config, cancel: CancelFlag) -> Result<FeatureResolver<ReqwestTransport>> {
    let transport = ReqwestTransport::new(config.timeout(), &config.user_agent)?;
    let fetcher = Fetcher::new(transport, config.mirror_list(), config.fetch_policy()).with_cancel(cancel);
    Ok(FeatureResolver::new(fetcher))
}

fn parse_area(area_id: u64) -> Result<AreaId> {
    AreaId::new(area_id)
        .ok_or_else(|| BridgeGeoError::InvalidAreaId(format!("{}（正の整数を指定してください）", area_id)))
}

fn print_summary(report: &BatchReport) {
    println!(
        "✔ 照会完了: 成功 {}件 / 未解決 {}件 / 名称なし候補 {}件\n",
        report.successes.len(),
        report.failures.len(),
        report.candidates.len()
    );
}
