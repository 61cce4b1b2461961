//! menugrid command-line front end
//!
//! 週メニュー表を読み込み、1日ごとのメニューを標準出力またはファイルに書き出す。

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{ArgGroup, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use menugrid::allergen::AllergenHeaderLayout;
use menugrid::{
    DayMenus, DaySelector, InputFormat, MenuGenerator, MenuGeneratorBuilder, MenuGridError,
    OutputFormat,
};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Standard, Vegan and Allergens sections in one Markdown document
    Markdown,
    /// Header, both views and the allergen rows as one JSON object
    Json,
    /// Allergen table only
    Csv,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Markdown => OutputFormat::Markdown,
            Format::Json => OutputFormat::Json,
            Format::Csv => OutputFormat::Csv,
        }
    }
}

#[derive(Parser)]
#[command(name = "menugrid")]
#[command(about = "Generate Standard, Vegan and Allergens menus from a weekly menu grid")]
#[command(group(ArgGroup::new("day").args(["date", "day", "weekday", "all_days"])))]
struct Args {
    /// Weekly menu grid (.docx or .xlsx)
    #[arg(long)]
    weekly: PathBuf,

    /// Generate the day with this date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Generate the day at this column index (0 = first day)
    #[arg(long)]
    day: Option<usize>,

    /// Generate the day with this weekday name
    #[arg(long)]
    weekday: Option<String>,

    /// Generate all seven days (default)
    #[arg(long)]
    all_days: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Markdown)]
    format: Format,

    /// Write one file per day into this directory instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Allergen sheet whose header row sets the allergen column order
    #[arg(long)]
    allergen_template: Option<PathBuf>,
}

impl Args {
    fn day_selector(&self) -> DaySelector {
        if let Some(date) = self.date {
            DaySelector::Date(date)
        } else if let Some(idx) = self.day {
            DaySelector::Index(idx)
        } else if let Some(name) = &self.weekday {
            DaySelector::Weekday(name.clone())
        } else {
            DaySelector::All
        }
    }
}

fn main() -> ExitCode {
    // Initialize tracing with WARN level by default, respecting RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), MenuGridError> {
    let mut builder = MenuGeneratorBuilder::new()
        .with_day_selector(args.day_selector())
        .with_output_format(args.format.into());

    if let Some(path) = &args.allergen_template {
        builder = builder.with_allergen_columns(template_columns(path)?);
    }

    let generator = builder.build()?;
    let days = generator.generate(File::open(&args.weekly)?)?;

    match &args.out {
        Some(dir) => write_files(&generator, &days, dir),
        None => write_stdout(&generator, &days),
    }
}

/// テンプレートの見出し行からアレルゲン列の順序を読み取る
///
/// 見出し行は先頭の表にあるとは限らないので、文書内の表を順に探す。
fn template_columns(path: &Path) -> Result<Vec<menugrid::AllergenCategory>, MenuGridError> {
    let tables = menugrid::parser::read_tables(File::open(path)?, InputFormat::Auto)?;
    let layout = AllergenHeaderLayout::locate_in_tables(&tables).ok_or_else(|| {
        MenuGridError::StructuralParse {
            message: format!("no allergen header row found in {}", path.display()),
        }
    })?;

    let categories = layout.categories();
    tracing::debug!(
        table = layout.table(),
        header_row = layout.header_row(),
        columns = categories.len(),
        "allergen template header located"
    );
    Ok(categories)
}

fn write_files(
    generator: &MenuGenerator,
    days: &[DayMenus],
    dir: &Path,
) -> Result<(), MenuGridError> {
    fs::create_dir_all(dir)?;
    let extension = generator.output_format().extension();

    for day in days {
        let path = dir.join(format!(
            "{}-{}.{}",
            day.header.weekday.trim(),
            day.header.file_slug(),
            extension
        ));
        generator.render(day, File::create(&path)?)?;
        println!("{}", path.display());
    }
    Ok(())
}

fn write_stdout(generator: &MenuGenerator, days: &[DayMenus]) -> Result<(), MenuGridError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for (idx, day) in days.iter().enumerate() {
        // 日と日の区切り（Markdown形式の場合のみ）
        if idx > 0 && generator.output_format() == OutputFormat::Markdown {
            writeln!(out, "\n---\n")?;
        } else if idx > 0 {
            writeln!(out)?;
        }
        generator.render(day, &mut out)?;
    }
    Ok(())
}
