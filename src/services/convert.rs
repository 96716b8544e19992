// src/services/convert.rs

//! E-book conversion via calibre's `ebook-convert`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tokio::process::Command;

use crate::error::{AppError, Result};
use crate::models::EbookConfig;

/// Builds and runs the converter command.
pub struct EbookConverter<'a> {
    config: &'a EbookConfig,
}

impl<'a> EbookConverter<'a> {
    pub fn new(config: &'a EbookConfig) -> Self {
        Self { config }
    }

    /// Output file name for a given date, e.g. `smarttravellerOct2026.mobi`.
    pub fn output_file_name(&self, today: NaiveDate) -> String {
        format!(
            "{}{}.{}",
            self.config.output_stem,
            today.format("%b%Y"),
            self.config.output_ext
        )
    }

    /// Converter arguments for `input` -> `output`.
    pub fn arguments(&self, input: &Path, output: &Path, today: NaiveDate) -> Vec<OsString> {
        let c = self.config;
        let mut args: Vec<OsString> = vec![input.into(), output.into()];
        args.extend(
            [
                "-v",
                "-v",
                "--max-toc-links=0",
                "--no-chapters-in-toc",
                "--output-profile=kindle",
                "--change-justification=justify",
                "--chapter-mark=both",
                "--pretty-print",
                "--toc-filter=r*",
            ]
            .into_iter()
            .map(OsString::from),
        );
        args.push(format!("--authors={}", c.authors).into());
        args.push(format!("--book-producer={}", c.producer).into());
        args.push(format!("--language={}", c.language).into());
        args.push(format!("--title={} ({})", c.title_prefix, today.format("%b, %Y")).into());
        args.push(format!("--pubdate={}", today.format("%d %b %Y")).into());
        args.push(format!("--comments={}", c.comments).into());

        if let Some(cover) = c.cover.as_ref().filter(|p| p.exists()) {
            let mut arg = OsString::from("--cover=");
            arg.push(cover.as_os_str());
            args.push(arg);
        }
        args
    }

    /// Run the converter and return the output path.
    pub async fn convert(&self, input: &Path, out_dir: &Path, today: NaiveDate) -> Result<PathBuf> {
        if !input.exists() {
            return Err(AppError::convert(format!(
                "{} not found (run 'build' first)",
                input.display()
            )));
        }
        let input = std::path::absolute(input)?;
        let output = std::path::absolute(out_dir.join(self.output_file_name(today)))?;
        let args = self.arguments(&input, &output, today);

        log::info!(
            "Executing: {} {}",
            self.config.convert_bin.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let status = Command::new(&self.config.convert_bin)
            .args(&args)
            .status()
            .await
            .map_err(|e| {
                AppError::convert(format!(
                    "could not start {}: {e}",
                    self.config.convert_bin.display()
                ))
            })?;

        if !status.success() {
            return Err(AppError::convert(format!(
                "{} exited with {status}",
                self.config.convert_bin.display()
            )));
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_output_file_name() {
        let config = EbookConfig::default();
        let converter = EbookConverter::new(&config);
        assert_eq!(converter.output_file_name(date()), "smarttravellerOct2026.mobi");
    }

    #[test]
    fn test_arguments_carry_metadata() {
        let config = EbookConfig::default();
        let converter = EbookConverter::new(&config);
        let args = strings(&converter.arguments(
            Path::new("/work/_main.html"),
            Path::new("/work/book.mobi"),
            date(),
        ));

        assert_eq!(args[0], "/work/_main.html");
        assert_eq!(args[1], "/work/book.mobi");
        assert!(args.contains(&"--chapter-mark=both".to_string()));
        assert!(args.contains(&"--authors=Australian Government".to_string()));
        assert!(args.contains(&"--title=Smart Traveller (Oct, 2026)".to_string()));
        assert!(args.contains(&"--pubdate=18 Oct 2026".to_string()));
        assert!(!args.iter().any(|a| a.starts_with("--cover=")));
    }

    #[test]
    fn test_cover_only_when_present() {
        let tmp = TempDir::new().unwrap();
        let cover = tmp.path().join("cover.jpg");
        let mut config = EbookConfig {
            cover: Some(cover.clone()),
            ..EbookConfig::default()
        };

        let args = strings(&EbookConverter::new(&config).arguments(
            Path::new("in.html"),
            Path::new("out.mobi"),
            date(),
        ));
        assert!(!args.iter().any(|a| a.starts_with("--cover=")));

        std::fs::write(&cover, b"jpg").unwrap();
        config.cover = Some(cover.clone());
        let args = strings(&EbookConverter::new(&config).arguments(
            Path::new("in.html"),
            Path::new("out.mobi"),
            date(),
        ));
        assert!(args.contains(&format!("--cover={}", cover.display())));
    }

    #[tokio::test]
    async fn test_convert_requires_input() {
        let tmp = TempDir::new().unwrap();
        let config = EbookConfig::default();
        let result = EbookConverter::new(&config)
            .convert(&tmp.path().join("_main.html"), tmp.path(), date())
            .await;
        assert!(matches!(result, Err(AppError::Convert(_))));
    }

    #[tokio::test]
    async fn test_convert_reports_missing_binary() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("_main.html");
        std::fs::write(&input, "<html></html>").unwrap();
        let config = EbookConfig {
            convert_bin: tmp.path().join("no-such-ebook-convert"),
            ..EbookConfig::default()
        };

        let result = EbookConverter::new(&config)
            .convert(&input, tmp.path(), date())
            .await;
        assert!(matches!(result, Err(AppError::Convert(_))));
    }
}
