use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Num(u64),
    Text(String),
}

impl Part {
    fn cmp_part(&self, other: &Part) -> Ordering {
        match (self, other) {
            (Part::Num(a), Part::Num(b)) => a.cmp(b),
            (Part::Text(a), Part::Text(b)) => a.cmp(b),
            // a release component outranks a textual pre-release marker
            (Part::Num(_), Part::Text(_)) => Ordering::Greater,
            (Part::Text(_), Part::Num(_)) => Ordering::Less,
        }
    }
}

/// Version string compared the way the QGIS plugin manager compares them:
/// components split on `.`, `-`, `_` or whitespace, digits against digits,
/// text against text, and missing components counted as zero.
#[derive(Debug, Clone)]
pub struct LooseVersion {
    raw: String,
    parts: Vec<Part>,
}

impl LooseVersion {
    pub fn parse(input: &str) -> Result<Self, String> {
        let raw = input.trim();
        let body = raw
            .strip_prefix(['v', 'V'])
            .filter(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
            .unwrap_or(raw);

        let mut parts = Vec::new();
        for chunk in body.split(['.', '-', '_', ' ', '\t']).filter(|c| !c.is_empty()) {
            split_runs(chunk, &mut parts);
        }

        match parts.first() {
            Some(Part::Num(_)) => Ok(LooseVersion {
                raw: raw.to_string(),
                parts,
            }),
            Some(Part::Text(_)) => Err(format!("Version '{}' must start with a number", raw)),
            None => Err("Version string is empty".to_string()),
        }
    }

    pub fn major(&self) -> u64 {
        match self.parts.first() {
            Some(Part::Num(n)) => *n,
            _ => 0,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

fn split_runs(chunk: &str, out: &mut Vec<Part>) {
    let mut current = String::new();
    let mut digits = false;
    for c in chunk.chars() {
        let is_digit = c.is_ascii_digit();
        if !current.is_empty() && is_digit != digits {
            out.push(to_part(&current, digits));
            current.clear();
        }
        digits = is_digit;
        current.push(c);
    }
    if !current.is_empty() {
        out.push(to_part(&current, digits));
    }
}

fn to_part(run: &str, digits: bool) -> Part {
    if digits {
        if let Ok(n) = run.parse::<u64>() {
            return Part::Num(n);
        }
    }
    Part::Text(run.to_ascii_lowercase())
}

impl Ord for LooseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let zero = Part::Num(0);
        let len = self.parts.len().max(other.parts.len());
        for i in 0..len {
            let a = self.parts.get(i).unwrap_or(&zero);
            let b = other.parts.get(i).unwrap_or(&zero);
            match a.cmp_part(b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for LooseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for LooseVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LooseVersion {}

impl fmt::Display for LooseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Upper bound the host assumes when `qgisMaximumVersion` is absent.
pub fn default_maximum(min: &LooseVersion) -> LooseVersion {
    let raw = format!("{}.99", min.major());
    LooseVersion {
        parts: vec![Part::Num(min.major()), Part::Num(99)],
        raw,
    }
}

pub fn is_compatible(min: &LooseVersion, max: Option<&LooseVersion>, host: &LooseVersion) -> bool {
    let fallback;
    let max = match max {
        Some(m) => m,
        None => {
            fallback = default_maximum(min);
            &fallback
        }
    };
    host >= min && host <= max
}

/// Leading numeric components of a version, stopping at the first
/// pre-release marker (`1.2b`, `1.2_rc1` and `1.2 beta` all give `[1, 2]`).
fn release_numbers(version: &str) -> Result<Vec<u64>, String> {
    let trimmed = version.trim();
    let body = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);

    let mut numbers = Vec::new();
    for chunk in body.split(['.', '-', '_', ' ', '\t']).filter(|c| !c.is_empty()) {
        let end = chunk
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(chunk.len());
        let digits = &chunk[..end];
        if digits.is_empty() {
            break;
        }
        let n = digits
            .parse::<u64>()
            .map_err(|_| format!("Version component '{}' is too large", digits))?;
        numbers.push(n);
        if digits.len() < chunk.len() {
            break;
        }
    }

    if numbers.is_empty() {
        return Err(format!("Version '{}' must start with a number", trimmed));
    }
    Ok(numbers)
}

/// Bumps a dotted version. Pre-release suffixes are dropped and the number of
/// components is kept, padded only as far as the bump requires.
pub fn compute_bump(current: &str, bump: &str) -> Result<String, String> {
    let mut parts = release_numbers(current)?;

    let index = match bump.to_ascii_lowercase().as_str() {
        "major" => 0,
        "minor" => 1,
        "patch" => 2,
        other => {
            return Err(format!(
                "Unknown bump type: {} (expected: major|minor|patch)",
                other
            ));
        }
    };

    while parts.len() <= index {
        parts.push(0);
    }
    parts[index] = parts[index].saturating_add(1);
    for p in parts.iter_mut().skip(index + 1) {
        *p = 0;
    }

    Ok(parts
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join("."))
}
