//! bloodline-report CLI - donor search result export tool

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use unicode_width::UnicodeWidthStr;

use bloodline_report::{
    normalize_records, read_records_file, render, CollisionPolicy, DateLocale, DonorRecord,
    DonorReportExporter, ExportOptions, FilterCriteria, JsonFormat, ReportHeader, COLUMN_HEADERS,
};

#[derive(Parser)]
#[command(name = "bloodline-report")]
#[command(author = "BloodLine")]
#[command(version)]
#[command(about = "Export BloodLine donor search results to PDF", long_about = None)]
struct Cli {
    /// Donor records JSON file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export donor records to bloodline-donor-results.pdf
    Export {
        /// Donor records JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", env = "BLOODLINE_OUTPUT_DIR")]
        output: Option<PathBuf>,

        #[command(flatten)]
        criteria: CriteriaArgs,

        /// Date format
        #[arg(long, value_enum, default_value = "us", env = "BLOODLINE_LOCALE")]
        locale: LocaleArg,

        /// Keep earlier reports by numbering the new file instead of overwriting
        #[arg(long)]
        numbered: bool,

        /// Deflate page content
        #[arg(long)]
        compress: bool,
    },

    /// Print the report header and rows as text
    Preview {
        /// Donor records JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        criteria: CriteriaArgs,

        /// Date format
        #[arg(long, value_enum, default_value = "us", env = "BLOODLINE_LOCALE")]
        locale: LocaleArg,

        /// Print the paginated report text instead of a table
        #[arg(long)]
        pages: bool,
    },

    /// Dump the laid-out report as JSON
    Layout {
        /// Donor records JSON file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        criteria: CriteriaArgs,

        /// Date format
        #[arg(long, value_enum, default_value = "us", env = "BLOODLINE_LOCALE")]
        locale: LocaleArg,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone, Default)]
struct CriteriaArgs {
    /// Blood group filter (e.g. "O+")
    #[arg(long, value_name = "GROUP")]
    blood_group: Option<String>,

    /// District filter
    #[arg(long, value_name = "NAME")]
    district: Option<String>,

    /// Upazila filter
    #[arg(long, value_name = "NAME")]
    upazila: Option<String>,

    /// Report every record; the criteria only appear in the header
    #[arg(long)]
    no_filter: bool,
}

impl CriteriaArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            blood_group: self.blood_group.clone(),
            district: self.district.clone(),
            upazila: self.upazila.clone(),
        }
    }

    /// Load records and apply the criteria unless filtering is disabled.
    fn load(&self, input: &Path) -> Result<(Vec<DonorRecord>, FilterCriteria), Box<dyn std::error::Error>> {
        let records = read_records_file(input)?;
        let criteria = self.criteria();
        if self.no_filter {
            return Ok((records, criteria));
        }

        let total = records.len();
        let matching: Vec<_> = records.into_iter().filter(|r| criteria.matches(r)).collect();
        log::info!("{} of {} records match the criteria", matching.len(), total);
        Ok((matching, criteria))
    }
}

#[derive(Copy, Clone, Default, PartialEq, Eq, ValueEnum)]
enum LocaleArg {
    /// 10/17/2026, 3:04:05 PM
    #[default]
    Us,
    /// 17/10/2026, 15:04:05
    Gb,
    /// 2026-10-17, 15:04:05
    Iso,
}

impl From<LocaleArg> for DateLocale {
    fn from(arg: LocaleArg) -> Self {
        match arg {
            LocaleArg::Us => DateLocale::EnUs,
            LocaleArg::Gb => DateLocale::EnGb,
            LocaleArg::Iso => DateLocale::Iso,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Export {
            input,
            output,
            criteria,
            locale,
            numbered,
            compress,
        }) => cmd_export(
            &input,
            output.as_deref(),
            &criteria,
            locale,
            numbered,
            compress,
        ),
        Some(Commands::Preview {
            input,
            criteria,
            locale,
            pages,
        }) => {
            if pages {
                cmd_preview_pages(&input, &criteria, locale)
            } else {
                cmd_preview(&input, &criteria, locale)
            }
        }
        Some(Commands::Layout {
            input,
            output,
            criteria,
            locale,
            compact,
        }) => cmd_layout(&input, output.as_deref(), &criteria, locale, compact),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: export if input is provided
            if let Some(input) = cli.input {
                cmd_export(
                    &input,
                    cli.output.as_deref(),
                    &CriteriaArgs::default(),
                    LocaleArg::default(),
                    false,
                    false,
                )
            } else {
                println!("{}", "Usage: bloodline-report <FILE> [OUTPUT]".yellow());
                println!("       bloodline-report --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_export(
    input: &Path,
    output: Option<&Path>,
    criteria: &CriteriaArgs,
    locale: LocaleArg,
    numbered: bool,
    compress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Reading records...");
    let (records, filter) = criteria.load(input)?;

    let mut options = ExportOptions::new()
        .with_locale(locale.into())
        .with_compression(compress);
    if let Some(dir) = output {
        options = options.with_output_dir(dir);
    }
    if numbered {
        options = options.with_collision_policy(CollisionPolicy::Numbered);
    }

    pb.set_message("Generating PDF...");
    let artifact = DonorReportExporter::new(options).export(&records, &filter)?;
    pb.finish_and_clear();

    println!("{} {}", "Saved to".green(), artifact.path.display());
    println!("  {} {} rows", "├─".dimmed(), artifact.rows);
    println!("  {} {} pages", "├─".dimmed(), artifact.pages);
    println!("  {} {} bytes", "└─".dimmed(), artifact.size);

    Ok(())
}

fn cmd_preview(
    input: &Path,
    criteria: &CriteriaArgs,
    locale: LocaleArg,
) -> Result<(), Box<dyn std::error::Error>> {
    let (records, filter) = criteria.load(input)?;
    let header = ReportHeader::compose(&Local::now().naive_local(), &filter, locale.into());

    println!("{}", header.title.cyan().bold());
    println!("{}", header.generated.dimmed());
    for line in &header.criteria_lines {
        println!("{}", line);
    }
    println!();

    let rows = normalize_records(&records, locale.into());
    let widths: Vec<usize> = (0..COLUMN_HEADERS.len())
        .map(|col| {
            rows.iter()
                .map(|r| r[col].width())
                .chain(std::iter::once(COLUMN_HEADERS[col].width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header_line = format_row(COLUMN_HEADERS.iter().copied(), &widths);
    println!("{}", header_line.bold());
    println!("{}", "─".repeat(header_line.width()).dimmed());
    for row in &rows {
        println!("{}", format_row(row.iter().map(String::as_str), &widths));
    }

    println!();
    println!("{} {}", "Rows:".bold(), rows.len());

    Ok(())
}

/// Join cells padded to their column's display width.
fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.width());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn cmd_preview_pages(
    input: &Path,
    criteria: &CriteriaArgs,
    locale: LocaleArg,
) -> Result<(), Box<dyn std::error::Error>> {
    let (records, filter) = criteria.load(input)?;

    let options = ExportOptions::new().with_locale(locale.into());
    let doc = DonorReportExporter::new(options).build(&records, &filter)?;
    print!("{}", render::to_text(&doc));

    Ok(())
}

fn cmd_layout(
    input: &Path,
    output: Option<&Path>,
    criteria: &CriteriaArgs,
    locale: LocaleArg,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (records, filter) = criteria.load(input)?;

    let options = ExportOptions::new().with_locale(locale.into());
    let doc = DonorReportExporter::new(options).build(&records, &filter)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = render::to_json(&doc, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_version() {
    println!(
        "{} {}",
        "bloodline-report".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("Donor search result export tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RECORDS: &str = r#"[
        {"name": "Rahim", "bloodGroup": "O+", "status": "active", "district": "Dhaka", "upazila": "Savar"},
        {"name": "Karim", "bloodGroup": "A-", "status": "inactive", "district": "Dhaka", "upazila": "Dhamrai"},
        {"name": "Salma", "bloodGroup": "O+", "district": "Sylhet", "upazila": "Beanibazar"}
    ]"#;

    fn write_records(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("donors.json");
        fs::write(&path, RECORDS).unwrap();
        path
    }

    #[test]
    fn test_parse_export_command() {
        let cli = Cli::try_parse_from([
            "bloodline-report",
            "export",
            "donors.json",
            "--blood-group",
            "O+",
            "--locale",
            "gb",
            "--numbered",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Export {
                criteria,
                locale,
                numbered,
                ..
            }) => {
                assert_eq!(criteria.blood_group.as_deref(), Some("O+"));
                assert!(locale == LocaleArg::Gb);
                assert!(numbered);
            }
            _ => panic!("expected export command"),
        }
    }

    #[test]
    fn test_load_applies_criteria() {
        let dir = TempDir::new().unwrap();
        let input = write_records(&dir);

        let args = CriteriaArgs {
            blood_group: Some("O+".into()),
            ..CriteriaArgs::default()
        };
        let (records, criteria) = args.load(&input).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(criteria.blood_group(), Some("O+"));

        let args = CriteriaArgs {
            blood_group: Some("O+".into()),
            no_filter: true,
            ..CriteriaArgs::default()
        };
        let (records, _) = args.load(&input).unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_cmd_export_writes_pdf() {
        let dir = TempDir::new().unwrap();
        let input = write_records(&dir);
        let out = dir.path().join("out");

        cmd_export(
            &input,
            Some(&out),
            &CriteriaArgs::default(),
            LocaleArg::Iso,
            false,
            true,
        )
        .unwrap();

        let bytes = fs::read(out.join(bloodline_report::REPORT_FILE_NAME)).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[test]
    fn test_cmd_layout_writes_json() {
        let dir = TempDir::new().unwrap();
        let input = write_records(&dir);
        let out = dir.path().join("layout.json");

        cmd_layout(&input, Some(&out), &CriteriaArgs::default(), LocaleArg::Us, true).unwrap();

        let json = fs::read_to_string(out).unwrap();
        assert!(json.contains("\"body_rows\":3"));
    }

    #[test]
    fn test_format_row_pads_columns() {
        let line = format_row(["a", "bb"].into_iter(), &[3, 2]);
        assert_eq!(line, "a    bb");
    }

    #[test]
    fn test_format_row_aligns_by_display_width() {
        let names = ["Jose\u{301}", "Jose", "\u{674E}\u{660E}"];
        let widths = [names.iter().map(|n| n.width()).max().unwrap(), 2];

        let columns: Vec<usize> = names
            .iter()
            .map(|name| {
                let line = format_row([*name, "O+"].into_iter(), &widths);
                let group = line.rfind("O+").unwrap();
                line[..group].width()
            })
            .collect();
        assert_eq!(columns[0], columns[1]);
        assert_eq!(columns[1], columns[2]);
    }

    #[test]
    fn test_parse_preview_pages_flag() {
        let cli = Cli::try_parse_from(["bloodline-report", "preview", "donors.json", "--pages"])
            .unwrap();
        assert!(matches!(cli.command, Some(Commands::Preview { pages: true, .. })));
    }
}
