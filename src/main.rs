// ==========================================
// 工作簿数据映射系统 - 命令行入口
// ==========================================
// 用法:
//   workbook-mapper [--merge soft|hard] [--config <path>] [--json-log] <files...>
//
// .xls/.xlsx 每个文件为一个文档; 全部 .txt 文件组成一个文档
// --config 仅使用其中的 reader 段（分隔符、类型推断、锁文件前缀）
// 输出: 各文档的 JSON 概要（工作表、表头、行数）写入 stdout
// ==========================================

use anyhow::{bail, Context};
use std::path::PathBuf;
use workbook_mapper::config::{ConfigManager, ImportConfigReader};
use workbook_mapper::importer::{DelimitedTextReader, SourceKind, WorkbookReader};
use workbook_mapper::{logging, Document, MergeMode, SheetMerger};

const USAGE: &str = "usage: workbook-mapper [--merge soft|hard] [--config <path>] [--json-log] <files...>
  --config <path>  JSON config; only its \"reader\" section applies here, \"mappings\" is ignored";

struct CliArgs {
    merge: Option<MergeMode>,
    config: Option<PathBuf>,
    json_log: bool,
    files: Vec<PathBuf>,
}

fn parse_args() -> anyhow::Result<CliArgs> {
    let mut args = std::env::args().skip(1);
    let mut parsed = CliArgs {
        merge: None,
        config: None,
        json_log: false,
        files: Vec::new(),
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--merge" => {
                let mode = args.next().context("--merge requires soft|hard")?;
                parsed.merge = Some(match mode.to_ascii_lowercase().as_str() {
                    "soft" => MergeMode::Soft,
                    "hard" => MergeMode::Hard,
                    other => bail!("unknown merge mode: {}", other),
                });
            }
            "--config" => {
                let path = args.next().context("--config requires a path")?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--json-log" => parsed.json_log = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            _ => parsed.files.push(PathBuf::from(arg)),
        }
    }

    if parsed.files.is_empty() {
        bail!(USAGE);
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = parse_args()?;
    if args.json_log {
        logging::init_json();
    } else {
        logging::init();
    }
    tracing::info!("{} v{}", workbook_mapper::APP_NAME, workbook_mapper::VERSION);

    let config = match &args.config {
        Some(path) => ConfigManager::load(path)?,
        None => ConfigManager::default(),
    };
    let options = config.reader_options();
    if !config.class_mappings().is_empty() {
        tracing::debug!("config mappings are not used by the command line");
    }

    let workbook_reader = WorkbookReader::new(options.clone());
    let text_reader = DelimitedTextReader::new(options.clone());

    let mut documents: Vec<Document> = Vec::new();
    let mut text_files: Vec<PathBuf> = Vec::new();
    for path in &args.files {
        match SourceKind::from_path(path) {
            Some(SourceKind::Workbook) => documents.push(
                workbook_reader
                    .read(path)
                    .await
                    .with_context(|| format!("failed to read {}", path.display()))?,
            ),
            Some(SourceKind::DelimitedText) => text_files.push(path.clone()),
            None => bail!("unsupported file: {}", path.display()),
        }
    }

    if !text_files.is_empty() {
        let name = text_files[0]
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "text".to_string());
        documents.push(text_reader.read(&name, &text_files).await?);
    }

    if let Some(mode) = args.merge {
        let merger = SheetMerger::new();
        let mut iter = documents.into_iter();
        let mut merged = match iter.next() {
            Some(first) => first,
            None => bail!("no documents to merge"),
        };
        for other in iter {
            merged = merger.merge_documents(&merged, &other, mode)?;
        }
        documents = vec![merged];
    }

    let summaries = documents.iter().map(Document::summary).collect::<Vec<_>>();
    println!("{}", serde_json::to_string_pretty(&summaries)?);
    Ok(())
}
