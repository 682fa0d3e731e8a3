use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use contracts::enums::{NormalizerPreset, SchemaId, TaskListKind};
use contracts::usecases::u501_upload_task::UploadRequest;
use contracts::usecases::u502_download_report::{DownloadDataResponse, DownloadRequest};
use contracts::usecases::u504_custom_report::{CustomReportRequest, ReportConfig, ReportSource};

use packer::shared::config::{load_config, Config};
use packer::shared::error::PackerError;
use packer::shared::format::{format_duration, format_number};
use packer::shared::logger;
use packer::shared::packer_api::PackerApiClient;
use packer::shared::shutdown::cancel_on_ctrl_c;
use packer::usecases::u501_upload_task::{ProgressTracker, UploadExecutor};
use packer::usecases::u502_download_report::DownloadExecutor;
use packer::usecases::u503_task_lists::TaskListsExecutor;
use packer::usecases::u504_custom_report::CustomReportExecutor;

/// Выгрузка заданий на склад и отчёты по ним
#[derive(Parser)]
#[command(name = "packer")]
#[command(about = "Upload packing tasks and download Excel reports", long_about = None)]
#[command(version)]
struct Cli {
    /// Каталог логов
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Список складов
    Warehouses,

    /// Список заданий
    Tasks {
        #[arg(value_enum, default_value = "in-progress")]
        kind: ListArg,
    },

    /// Построчная выгрузка Excel-файла
    Upload {
        file: PathBuf,

        /// basic, extended, task, vps
        #[arg(long, default_value = "basic", value_parser = parse_schema)]
        schema: SchemaId,

        /// Код склада (для basic и extended)
        #[arg(long)]
        warehouse: Option<String>,

        /// passthrough, legacy, web, strict_marker
        #[arg(long, value_parser = parse_preset)]
        preset: Option<NormalizerPreset>,
    },

    /// Выгрузка задания ВПС
    Vps { file: PathBuf },

    /// Удалить с сервера строки, выгруженные из файла
    Cancel {
        /// Имя выгруженного файла, например "1001 задание.xlsx"
        file_name: String,
    },

    /// Скачать отчёт по заданию
    Download {
        task: String,

        /// Каталог сохранения
        #[arg(long)]
        out: Option<String>,

        /// Задание ВПС
        #[arg(long)]
        vps: bool,
    },

    /// Собрать отчёт из сохранённого ответа /download
    Report {
        json: PathBuf,

        #[arg(long)]
        task: String,

        #[arg(long)]
        out: Option<String>,
    },

    /// Пользовательский отчёт по JSON-шаблону (поля, фильтры, сортировка, группировка)
    Custom {
        task: String,

        /// Файл шаблона
        #[arg(long)]
        template: PathBuf,

        /// Сохранённый ответ /download вместо запроса к серверу
        #[arg(long)]
        json: Option<PathBuf>,

        /// Брать сводный набор вместо детального
        #[arg(long)]
        summary: bool,

        #[arg(long)]
        out: Option<String>,
    },

    /// Скрыть задание из списков
    Hide { task: String },

    /// Сроки годности по артикулу
    Expiry { artikul: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum ListArg {
    InProgress,
    Completed,
    Uploaded,
    Distinct,
}

impl From<ListArg> for TaskListKind {
    fn from(arg: ListArg) -> Self {
        match arg {
            ListArg::InProgress => TaskListKind::InProgress,
            ListArg::Completed => TaskListKind::Completed,
            ListArg::Uploaded => TaskListKind::Uploaded,
            ListArg::Distinct => TaskListKind::Distinct,
        }
    }
}

fn parse_schema(s: &str) -> Result<SchemaId, String> {
    SchemaId::from_code(s).ok_or_else(|| format!("unknown schema: {}", s))
}

fn parse_preset(s: &str) -> Result<NormalizerPreset, String> {
    NormalizerPreset::from_code(s).ok_or_else(|| format!("unknown preset: {}", s))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init(&cli.log_dir)?;

    let config = load_config()?;
    tracing::info!("Server: {}", config.server.base_url);

    if let Err(e) = run(cli.command, &config) {
        match e.downcast_ref::<PackerError>() {
            Some(packer_error) => {
                tracing::error!("{}", packer_error);
                eprintln!("{}", packer_error.user_message());
            }
            None => {
                tracing::error!("{:#}", e);
                eprintln!("{:#}", e);
            }
        }
        std::process::exit(1);
    }
    Ok(())
}

fn run(command: Commands, config: &Config) -> anyhow::Result<()> {
    let api = Arc::new(PackerApiClient::new(&config.server)?);

    match command {
        Commands::Warehouses => {
            for sklad in TaskListsExecutor::new(api).warehouses()? {
                println!("{}", sklad);
            }
        }
        Commands::Tasks { kind } => {
            let exec = TaskListsExecutor::new(api);
            match TaskListKind::from(kind) {
                TaskListKind::InProgress => {
                    for task in exec.tasks_in_progress()? {
                        println!(
                            "{}\t{:.0}%\t{}/{}",
                            task.name, task.progress, task.completed_tasks, task.total_tasks
                        );
                    }
                }
                other => {
                    for name in exec.task_names(other)? {
                        println!("{}", name);
                    }
                }
            }
        }
        Commands::Upload {
            file,
            schema,
            warehouse,
            preset,
        } => upload(api, config, file, schema, warehouse, preset)?,
        Commands::Vps { file } => upload(api, config, file, SchemaId::VpsUpload, None, None)?,
        Commands::Cancel { file_name } => {
            let exec = UploadExecutor::new(
                api,
                config.upload.clone(),
                Arc::new(ProgressTracker::new()),
            );
            exec.delete_uploaded(&file_name)?;
            println!("Данные задания {} удалены с сервера", file_name);
        }
        Commands::Download { task, out, vps } => {
            let exec = DownloadExecutor::new(api, config.download.clone());
            let result = exec.execute(&DownloadRequest {
                task_name: task,
                output_dir: out,
                vps,
            })?;
            print_report(&result);
        }
        Commands::Report { json, task, out } => {
            let response: DownloadDataResponse = read_json(&json)?;
            let exec = DownloadExecutor::new(api, config.download.clone());
            let result = exec.render(&task, response, out.as_deref())?;
            print_report(&result);
        }
        Commands::Custom {
            task,
            template,
            json,
            summary,
            out,
        } => {
            let report_config: ReportConfig = read_json(&template)?;
            let source = if summary {
                ReportSource::Summary
            } else {
                ReportSource::Detail
            };
            let exec = CustomReportExecutor::new(api, config.download.clone());
            let result = match json {
                Some(json) => {
                    let response: DownloadDataResponse = read_json(&json)?;
                    exec.render(&task, response, source, &report_config, out.as_deref())?
                }
                None => exec.execute(&CustomReportRequest {
                    task_name: task,
                    config: report_config,
                    source,
                    output_dir: out,
                })?,
            };
            println!("Отчёт сохранён: {}", result.path);
            println!(
                "Строк: {} из {}, колонки: {}",
                format_number(result.rows),
                format_number(result.source_rows),
                result.columns.join(", ")
            );
        }
        Commands::Hide { task } => {
            TaskListsExecutor::new(api).hide_task(&task)?;
            println!("Задание {} скрыто", task);
        }
        Commands::Expiry { artikul } => {
            for item in TaskListsExecutor::new(api).expiry_data(&artikul)? {
                println!("{}\t{}", item.artikul, item.expiry_date);
            }
        }
    }
    Ok(())
}

fn upload(
    api: Arc<PackerApiClient>,
    config: &Config,
    file: PathBuf,
    schema: SchemaId,
    warehouse: Option<String>,
    preset: Option<NormalizerPreset>,
) -> anyhow::Result<()> {
    let exec = UploadExecutor::new(api, config.upload.clone(), Arc::new(ProgressTracker::new()));
    if let Err(e) = cancel_on_ctrl_c(exec.cancel_handle()) {
        tracing::warn!("Ctrl+C handler not installed, upload cannot be cancelled: {}", e);
    }
    let response = exec.execute(&UploadRequest {
        file_path: file.to_string_lossy().into_owned(),
        schema,
        warehouse,
        preset,
    })?;

    println!(
        "Задание {} выгружено: {} строк, повторов {}",
        response.task_name,
        format_number(response.rows_uploaded),
        response.retries
    );
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_report(result: &contracts::usecases::u502_download_report::DownloadResult) {
    println!("Отчёт сохранён: {}", result.path);
    println!(
        "Строк: {} (сводных {})",
        format_number(result.detail_rows),
        format_number(result.summary_rows)
    );
    if let Some(secs) = result.time_info.duration_secs {
        println!("Время работы: {}", format_duration(secs));
    }
    if !result.unmapped_columns.is_empty() {
        println!("Колонки без заголовка: {}", result.unmapped_columns.join(", "));
    }
}
