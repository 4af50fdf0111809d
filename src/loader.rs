use std::collections::{HashMap, HashSet};
use std::path::Path;

use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;

use crate::dataset::{Dataset, Respondent};
use crate::error::LoadError;

/// Public location of the 2018 GSS extract.
pub const DEFAULT_DATA_URL: &str =
    "https://github.com/jkropko/DS-6001/raw/master/localdata/gss2018.csv";

lazy_static! {
    /// Placeholder answers treated as missing, lower-cased.
    static ref MISSING_TOKENS: HashSet<&'static str> = [
        "",
        "iap",
        "iap,dk,na,uncodeable",
        "iap, dk, na, uncodeable",
        "not sure",
        "dk",
        ".a",
        "can't choose",
        "not applicable",
        "don't know",
        "no answer",
        "na",
        "n/a",
        "nan",
        "null",
        "none",
        "#n/a",
        "<na>",
    ]
    .into_iter()
    .collect();

    static ref OR_OLDER_REGEX: Regex =
        Regex::new(r"^(?i)([0-9]+(?:\.[0-9]+)?)\s+or\s+older$").unwrap();
}

/// Windows-1252 code points for bytes 0x80..=0x9F. Unassigned bytes map to
/// their Latin-1 control characters.
const CP1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

/// Decode Windows-1252 bytes into a string.
///
/// The five bytes Windows-1252 leaves undefined (0x81, 0x8D, 0x8F, 0x90,
/// 0x9D) decode to the C1 control of the same value instead of failing,
/// matching the WHATWG `windows-1252` decoder browsers use.
pub fn decode_cp1252(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x80..=0x9F => CP1252_HIGH[(b - 0x80) as usize],
            _ => b as char,
        })
        .collect()
}

/// Whether a raw cell is one of the survey's missing-value placeholders.
pub fn is_missing(raw: &str) -> bool {
    MISSING_TOKENS.contains(raw.trim().to_lowercase().as_str())
}

/// Raw header names and the record fields they land in, in load order.
const RAW_COLUMNS: [(&str, &str); 17] = [
    ("id", "id"),
    ("wtss", "weight"),
    ("sex", "sex"),
    ("educ", "education"),
    ("region", "region"),
    ("age", "age"),
    ("coninc", "income"),
    ("prestg10", "job_prestige"),
    ("mapres10", "mother_job_prestige"),
    ("papres10", "father_job_prestige"),
    ("sei10", "socioeconomic_index"),
    ("satjob", "satjob"),
    ("fechld", "relationship"),
    ("fefam", "male_breadwinner"),
    ("fepol", "men_bettersuited"),
    ("fepresch", "child_suffer"),
    ("meovrwrk", "men_overwork"),
];

/// One CSV record with the used columns resolved by position.
struct RawRow<'a> {
    record: &'a csv::StringRecord,
    positions: &'a [usize; 17],
    row: usize,
}

impl RawRow<'_> {
    fn raw(&self, slot: usize) -> Option<&str> {
        let value = self.record.get(self.positions[slot])?.trim();
        if is_missing(value) { None } else { Some(value) }
    }

    fn text(&self, slot: usize) -> Option<String> {
        self.raw(slot).map(str::to_string)
    }

    fn number(&self, slot: usize) -> Result<Option<f64>, LoadError> {
        let Some(value) = self.raw(slot) else {
            return Ok(None);
        };
        let value = match OR_OLDER_REGEX.captures(value) {
            Some(caps) => caps.get(1).map_or(value, |m| m.as_str()),
            None => value,
        };
        value
            .parse::<f64>()
            .map(Some)
            .map_err(|_| LoadError::InvalidNumber {
                row: self.row,
                column: RAW_COLUMNS[slot].1,
                value: value.to_string(),
            })
    }
}

/// Parse the survey table from decoded CSV text
///
/// Selects and renames the used columns, maps missing-value placeholders to
/// `None` and converts numeric columns, coercing `"89 or older"` to 89.
///
/// # Arguments
/// * `text` - CSV content with a header row
///
/// # Returns
/// * `Result<Dataset, LoadError>` - The loaded dataset or the first problem found
///
/// # Examples
/// ```
/// use gss_dashboard::loader::parse_csv;
///
/// let csv = "id,wtss,sex,educ,region,age,coninc,prestg10,mapres10,papres10,sei10,\
/// satjob,fechld,fefam,fepol,fepresch,meovrwrk\n\
/// 1,1.0,male,12,new england,89 or older,30000,45,,,50.1,\
/// very satisfied,agree,disagree,IAP,agree,agree\n";
/// let dataset = parse_csv(csv).unwrap();
/// assert_eq!(dataset.respondents()[0].age, Some(89.0));
/// assert_eq!(dataset.respondents()[0].men_bettersuited, None);
/// ```
pub fn parse_csv(text: &str) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim(), i))
        .collect();

    let mut positions = [0usize; 17];
    for (slot, (raw, _)) in RAW_COLUMNS.iter().enumerate() {
        positions[slot] = *index.get(raw).ok_or_else(|| LoadError::MissingColumn {
            name: raw.to_string(),
        })?;
    }

    let mut respondents = Vec::new();
    let mut seen = HashSet::new();
    let mut record = csv::StringRecord::new();
    let mut row = 0;

    while reader.read_record(&mut record)? {
        row += 1;
        let raw = RawRow {
            record: &record,
            positions: &positions,
            row,
        };

        let id = match raw.number(0)? {
            Some(id) if id >= 0.0 && id.fract() == 0.0 => id as u64,
            Some(_) => {
                return Err(LoadError::InvalidNumber {
                    row,
                    column: "id",
                    value: raw.raw(0).unwrap_or_default().to_string(),
                });
            }
            None => return Err(LoadError::MissingId { row }),
        };
        if !seen.insert(id) {
            return Err(LoadError::DuplicateId { row, id });
        }

        respondents.push(Respondent {
            id,
            weight: raw.number(1)?,
            sex: raw.text(2),
            education: raw.number(3)?,
            region: raw.text(4),
            age: raw.number(5)?,
            income: raw.number(6)?,
            job_prestige: raw.number(7)?,
            mother_job_prestige: raw.number(8)?,
            father_job_prestige: raw.number(9)?,
            socioeconomic_index: raw.number(10)?,
            satjob: raw.text(11),
            relationship: raw.text(12),
            male_breadwinner: raw.text(13),
            men_bettersuited: raw.text(14),
            child_suffer: raw.text(15),
            men_overwork: raw.text(16),
        });
    }

    debug!("parsed {} respondents from {} columns", respondents.len(), headers.len());
    Ok(Dataset::new(respondents))
}

/// Load the survey from raw Windows-1252 bytes.
pub fn from_bytes(bytes: &[u8]) -> Result<Dataset, LoadError> {
    parse_csv(&decode_cp1252(bytes))
}

/// Load the survey from a local copy of the file
///
/// # Arguments
/// * `filepath` - Path to the CSV file to load
///
/// # Examples
/// ```no_run
/// use gss_dashboard::loader::from_path;
///
/// match from_path("gss2018.csv") {
///     Ok(dataset) => println!("Loaded {} respondents", dataset.len()),
///     Err(e) => eprintln!("Error loading CSV: {}", e),
/// }
/// ```
pub fn from_path(filepath: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    let path = filepath.as_ref();
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: Some(path.to_path_buf()),
        source,
    })?;
    let dataset = from_bytes(&bytes)?;
    info!("loaded {} respondents from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Download the survey over HTTP(S).
#[cfg(feature = "web")]
pub async fn fetch(url: &str) -> Result<Dataset, LoadError> {
    let fetch_err = |source: reqwest::Error| LoadError::Fetch {
        url: url.to_string(),
        source,
    };

    info!("fetching dataset from {}", url);
    let bytes = reqwest::get(url)
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(fetch_err)?
        .bytes()
        .await
        .map_err(fetch_err)?;

    let dataset = from_bytes(&bytes)?;
    info!("loaded {} respondents ({} bytes)", dataset.len(), bytes.len());
    Ok(dataset)
}
