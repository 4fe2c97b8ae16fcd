use std::fmt;

use tracing::warn;

use crate::types::KeyRecord;

/// Keyring statistics: keys tallied by validity and owner trust.
///
/// Rows are validity levels, columns owner-trust levels, both 0-5. Keys
/// reporting a level above 5 are not counted; they produce a diagnostic
/// instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyStatistics {
    by_level: [[u32; 6]; 6],
    revoked: usize,
    expired: usize,
    out_of_range: usize,
}

impl KeyStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: &KeyRecord) {
        if key.validity > 5 || key.owner_trust > 5 {
            warn!(
                key_id = %key.key_id,
                validity = key.validity,
                owner_trust = key.owner_trust,
                "key has validity or trust bigger than 5"
            );
            self.out_of_range += 1;
        } else {
            self.by_level[key.validity as usize][key.owner_trust as usize] += 1;
        }
        if key.revoked {
            self.revoked += 1;
        }
        if key.expired {
            self.expired += 1;
        }
    }

    pub fn revoked(&self) -> usize {
        self.revoked
    }

    pub fn expired(&self) -> usize {
        self.expired
    }

    /// Keys whose reported levels were outside 0-5 and went uncounted.
    pub fn out_of_range(&self) -> usize {
        self.out_of_range
    }

    /// Number of keys counted in the validity/trust table.
    pub fn total(&self) -> u32 {
        self.by_level.iter().flatten().sum()
    }

    fn row_sum(&self, validity: usize) -> u32 {
        self.by_level[validity].iter().sum()
    }

    fn column_sum(&self, trust: usize) -> u32 {
        self.by_level.iter().map(|row| row[trust]).sum()
    }
}

impl fmt::Display for KeyStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Statistics:")?;
        writeln!(f, "Left-to-right: trust")?;
        writeln!(f, "Top-to-bottom: validity")?;

        write!(f, "{:>5}", "#")?;
        for trust in 0..6 {
            write!(f, "{trust:>5}")?;
        }
        writeln!(f, "{:>7}", "Sum")?;

        for validity in 0..6 {
            write!(f, "{validity:>5}")?;
            for trust in 0..6 {
                write!(f, "{:>5}", self.by_level[validity][trust])?;
            }
            writeln!(f, "{:>7}", self.row_sum(validity))?;
        }

        write!(f, "{:>5}", "Sum")?;
        for trust in 0..6 {
            write!(f, "{:>5}", self.column_sum(trust))?;
        }
        writeln!(f, "{:>7}", self.total())?;

        writeln!(f)?;
        writeln!(f, "Number of revoked keys: {}", self.revoked)?;
        writeln!(f, "Number of expired keys: {}", self.expired)?;
        writeln!(f, "Number of keys: {}", self.total())
    }
}
