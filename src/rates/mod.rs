//! SELIC daily rate table: cache file parsing and the cache → download →
//! manual-download fallback chain.

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::error::SatstackError;
use crate::http::TextFetcher;
use crate::ui::progress::ProgressEvent;

/// BCB SGS series 11 (SELIC daily rate), CSV output
pub const DEFAULT_SERIES_URL: &str = "https://api.bcb.gov.br/dados/serie/bcdata.sgs.11/dados";

/// Series start used when the ledger has no purchases
pub const DEFAULT_SERIES_START: (i32, u32, u32) = (2020, 1, 1);

/// Days of history requested before the first purchase
const SERIES_LOOKBACK_DAYS: i64 = 10;

const BR_DATE: &str = "%d/%m/%Y";

/// Daily rates outside `(-100, 100]` percent are not SELIC values
const MAX_DAILY_RATE: i64 = 100;

/// Daily percentage rate per business day (`0.016199` means 0.016199 %).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: HashMap<NaiveDate, Decimal>,
}

impl RateTable {
    pub fn get(&self, date: NaiveDate) -> Option<Decimal> {
        self.rates.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl FromIterator<(NaiveDate, Decimal)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, Decimal)>>(iter: I) -> Self {
        Self {
            rates: iter.into_iter().collect(),
        }
    }
}

/// Where a loaded table came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    Cache,
    Downloaded,
}

/// Result of [`RateLoader::load`].
#[derive(Debug, Clone, PartialEq)]
pub enum RateOutcome {
    Loaded { table: RateTable, source: RateSource },
    /// Automatic download failed: a human must fetch `url` in a browser and
    /// save it as `target`.
    NeedsManualDownload { url: String, target: PathBuf },
}

/// Parse the BCB CSV export (`dd/mm/yyyy;rate`).
///
/// Tolerates `,` as field separator, quoted fields, decimal commas and a
/// header row. Lines that do not parse are skipped.
pub fn parse_rate_table(content: &str) -> RateTable {
    content.lines().filter_map(parse_rate_line).collect()
}

fn parse_rate_line(raw: &str) -> Option<(NaiveDate, Decimal)> {
    let line = raw.trim().replace('"', "");
    if line.is_empty() {
        return None;
    }
    let lower = line.to_lowercase();
    if lower.contains("data") || lower.contains("date") {
        return None;
    }

    let mut parts: Vec<&str> = line.split(';').collect();
    if parts.len() < 2 {
        parts = line.split(',').collect();
    }
    if parts.len() < 2 {
        return None;
    }

    let date = NaiveDate::parse_from_str(parts[0].trim(), BR_DATE).ok()?;
    let rate = parse_rate(parts[1])?;
    Some((date, rate))
}

fn parse_rate(field: &str) -> Option<Decimal> {
    let cleaned = field.trim().replace(',', ".");
    let rate = Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()?;
    let limit = Decimal::from(MAX_DAILY_RATE);
    (rate > -limit && rate <= limit).then_some(rate)
}

/// Date range requested from the series API: ten days before the first
/// purchase (or 2020-01-01 for an empty ledger) through `today`.
pub fn series_range(first_purchase: Option<NaiveDate>, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let (y, m, d) = DEFAULT_SERIES_START;
    let start = first_purchase
        .map(|date| date - Duration::days(SERIES_LOOKBACK_DAYS))
        .or_else(|| NaiveDate::from_ymd_opt(y, m, d))
        .unwrap_or(today);
    (start, today)
}

/// Loads the rate table from the local cache, downloading it when needed.
pub struct RateLoader {
    cache_path: PathBuf,
    series_url: String,
    fetcher: Option<Box<dyn TextFetcher>>,
}

impl RateLoader {
    /// `fetcher = None` disables the download step (offline mode).
    pub fn new(
        cache_path: impl Into<PathBuf>,
        series_url: impl Into<String>,
        fetcher: Option<Box<dyn TextFetcher>>,
    ) -> Self {
        Self {
            cache_path: cache_path.into(),
            series_url: series_url.into(),
            fetcher,
        }
    }

    /// Full CSV download URL for the given range
    pub fn series_url(&self, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}?formato=csv&dataInicial={}&dataFinal={}",
            self.series_url,
            start.format(BR_DATE),
            end.format(BR_DATE)
        )
    }

    /// Parse the cache file. `Ok(None)` when there is no cache file.
    pub fn read_cache(&self) -> Result<Option<RateTable>> {
        if !self.cache_path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&self.cache_path)
            .context(format!("Failed to read rate cache {:?}", self.cache_path))?;
        let (content, _, had_errors) = encoding_rs::UTF_8.decode(&bytes);
        if had_errors {
            debug!("Rate cache {:?} contains invalid UTF-8", self.cache_path);
        }
        Ok(Some(parse_rate_table(&content)))
    }

    /// Resolve the rate table: cache file first, then the series API, then
    /// ask for a manual download.
    ///
    /// An empty cache parse falls through to the download step.
    pub fn load<F>(
        &self,
        first_purchase: Option<NaiveDate>,
        today: NaiveDate,
        mut progress: F,
    ) -> RateOutcome
    where
        F: FnMut(ProgressEvent),
    {
        if let Some(table) = self.load_cached(&mut progress) {
            return RateOutcome::Loaded {
                table,
                source: RateSource::Cache,
            };
        }
        debug!("No usable rate cache at {:?}", self.cache_path);

        let (start, end) = series_range(first_purchase, today);
        let url = self.series_url(start, end);

        if let Some(fetcher) = &self.fetcher {
            progress(ProgressEvent::transient("Tentando baixar histórico online..."));
            match self.download(fetcher.as_ref(), &url) {
                Ok(table) => {
                    progress(ProgressEvent::persist(format!(
                        "Download concluído e salvo em {}",
                        self.cache_path.display()
                    )));
                    progress(ProgressEvent::persist(format!(
                        "{} registros carregados do arquivo",
                        table.len()
                    )));
                    return RateOutcome::Loaded {
                        table,
                        source: RateSource::Downloaded,
                    };
                }
                Err(e) => {
                    warn!("SELIC download failed: {:#}", e);
                    progress(ProgressEvent::warning(format!("Falha no download: {:#}", e)));
                }
            }
        } else {
            info!("Offline mode: skipping SELIC download");
        }

        RateOutcome::NeedsManualDownload {
            url,
            target: self.cache_path.clone(),
        }
    }

    fn load_cached<F>(&self, progress: &mut F) -> Option<RateTable>
    where
        F: FnMut(ProgressEvent),
    {
        if self.cache_path.exists() {
            progress(ProgressEvent::transient(format!(
                "Lendo arquivo local '{}'...",
                self.cache_path.display()
            )));
        }
        match self.read_cache() {
            Ok(Some(table)) => {
                progress(ProgressEvent::persist(format!(
                    "{} registros carregados do arquivo",
                    table.len()
                )));
                if table.is_empty() {
                    None
                } else {
                    Some(table)
                }
            }
            Ok(None) => None,
            Err(e) => {
                warn!("{:#}", e);
                progress(ProgressEvent::warning(format!(
                    "Erro ao ler arquivo: {:#}",
                    e
                )));
                None
            }
        }
    }

    /// Fetch the series, store the raw body as the cache file and parse it
    /// back from disk.
    fn download(&self, fetcher: &dyn TextFetcher, url: &str) -> Result<RateTable> {
        let body = fetcher
            .fetch_text(url)
            .context("Failed to download SELIC series")?;

        if let Some(parent) = self
            .cache_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
        {
            fs::create_dir_all(parent).context("Failed to create rate cache directory")?;
        }
        fs::write(&self.cache_path, body.as_bytes())
            .context(format!("Failed to write rate cache {:?}", self.cache_path))?;
        info!("Saved SELIC series to {:?}", self.cache_path);

        let table = self.read_cache()?.unwrap_or_default();
        if table.is_empty() {
            return Err(SatstackError::RatesError(
                "downloaded series has no usable rows".to_string(),
            )
            .into());
        }
        Ok(table)
    }
}
