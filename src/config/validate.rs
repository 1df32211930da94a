// src/config/validate.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::config::model::{
    RawConfigFile, WatcherConfig, DEFAULT_BUILD_COMMAND, DEFAULT_INTERVAL, DEFAULT_RUN_COMMAND,
};
use crate::errors::{PolywatchError, Result};

impl TryFrom<RawConfigFile> for WatcherConfig {
    type Error = PolywatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let interval = match raw.interval.as_deref() {
            Some(s) => parse_duration(s)
                .map_err(|e| PolywatchError::ConfigError(format!("invalid interval: {e}")))?,
            None => DEFAULT_INTERVAL,
        };
        if interval.is_zero() {
            return Err(PolywatchError::ConfigError(
                "interval must be greater than zero".to_string(),
            ));
        }

        let root = raw
            .root
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| ".".to_string());

        let dep_file = raw
            .dep_file
            .filter(|f| !f.trim().is_empty())
            .map(PathBuf::from);
        let dep_command = raw.dep_command.filter(|c| !c.trim().is_empty());

        if dep_command.is_some() && dep_file.is_none() {
            return Err(PolywatchError::ConfigError(
                "a dependency command requires a dependency file (--depfile)".to_string(),
            ));
        }

        Ok(WatcherConfig {
            root: PathBuf::from(root),
            interval,
            build_command: raw
                .build
                .unwrap_or_else(|| DEFAULT_BUILD_COMMAND.to_string()),
            run_command: raw.run.unwrap_or_else(|| DEFAULT_RUN_COMMAND.to_string()),
            dep_file,
            dep_command,
            include: normalize_rules(raw.include.unwrap_or_default()),
            exclude: normalize_rules(raw.exclude.unwrap_or_default()),
        })
    }
}

/// Trim rules and drop empty ones.
///
/// An empty rule would be a prefix of every path, so `--exclude=a,,b` would
/// otherwise silently exclude the whole tree.
pub fn normalize_rules(rules: Vec<String>) -> Vec<String> {
    rules
        .into_iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect()
}

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Digits of a fraction beyond this are ignored; they are below nanosecond
/// precision for every unit.
const MAX_FRACTION_DIGITS: u32 = 18;

/// Parse a duration string such as `"500ms"`, `"1.5s"`, `"1m30s"` or `"1h"`.
///
/// A duration is one or more `<number><unit>` pairs. Numbers may carry a
/// decimal fraction; units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`.
/// Signs and unit-less numbers are rejected.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return Err(PolywatchError::ConfigError(
            "empty duration string".to_string(),
        ));
    }

    let mut rest = s;
    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (nanos, tail) = parse_component(s, rest)?;
        total = total.checked_add(nanos).ok_or_else(too_large)?;
        rest = tail;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).map_err(|_| too_large())?;
    // The remainder is below one second, so it always fits.
    let subsec = (total % NANOS_PER_SEC) as u32;
    Ok(Duration::new(secs, subsec))
}

/// Parse the leading `<number><unit>` pair of `rest`, returning its length
/// in nanoseconds and the unparsed tail.
fn parse_component<'a>(full: &str, rest: &'a str) -> Result<(u128, &'a str)> {
    let is_number_char = |c: char| c.is_ascii_digit() || c == '.';

    let number_len = rest.find(|c: char| !is_number_char(c)).unwrap_or(rest.len());
    let (number, after_number) = rest.split_at(number_len);
    let unit_len = after_number.find(is_number_char).unwrap_or(after_number.len());
    let (unit, tail) = after_number.split_at(unit_len);

    if number.is_empty() || number == "." {
        return Err(PolywatchError::ConfigError(format!(
            "invalid duration '{full}': expected a number before '{unit}'"
        )));
    }
    if unit.is_empty() {
        return Err(PolywatchError::ConfigError(format!(
            "duration '{full}' is missing a unit suffix"
        )));
    }

    let scale = unit_nanos(unit)?;
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if fraction.contains('.') {
        return Err(PolywatchError::ConfigError(format!(
            "invalid duration number '{number}'"
        )));
    }

    // `whole` is all digits, so a parse failure can only be an overflow.
    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| too_large())?
    };
    let mut nanos = whole.checked_mul(scale).ok_or_else(too_large)?;

    let mut numerator: u128 = 0;
    let mut denominator: u128 = 1;
    for digit in fraction.bytes().take(MAX_FRACTION_DIGITS as usize) {
        numerator = numerator * 10 + u128::from(digit - b'0');
        denominator *= 10;
    }
    nanos = nanos
        .checked_add(numerator * scale / denominator)
        .ok_or_else(too_large)?;

    Ok((nanos, tail))
}

fn unit_nanos(unit: &str) -> Result<u128> {
    match unit.to_lowercase().as_str() {
        "ns" => Ok(1),
        "us" | "µs" | "μs" => Ok(1_000),
        "ms" => Ok(1_000_000),
        "s" => Ok(NANOS_PER_SEC),
        "m" => Ok(60 * NANOS_PER_SEC),
        "h" => Ok(60 * 60 * NANOS_PER_SEC),
        other => Err(PolywatchError::ConfigError(format!(
            "unsupported duration unit '{other}'; expected ns, us, ms, s, m, or h"
        ))),
    }
}

fn too_large() -> PolywatchError {
    PolywatchError::ConfigError("duration too large".to_string())
}
