use chrono::NaiveDate;
use tracing::debug;

use crate::error::Result;
use crate::types::{KeyRecord, TrustLevel};

/// Parses `gpg --list-keys --with-colons` output into key records.
///
/// A `pub` record opens a key; following `fpr` and `uid` records complete
/// it. Records the scan has no use for are skipped. Malformed lines are
/// never fatal: a key missing required fields is dropped with a debug
/// diagnostic.
pub fn parse_keys(output: &str) -> Result<Vec<KeyRecord>> {
    let mut keys = Vec::new();
    let mut current_key: Option<KeyBuilder> = None;

    for line in output.lines() {
        let fields: Vec<&str> = line.split(':').collect();
        if fields.is_empty() {
            continue;
        }

        match fields[0] {
            "pub" => {
                if let Some(builder) = current_key.take() {
                    match builder.build() {
                        Some(key) => keys.push(key),
                        None => debug!("skipping key: missing key ID or fingerprint"),
                    }
                }
                current_key = Some(KeyBuilder::from_pub_fields(&fields));
            }
            "fpr" => {
                if let Some(ref mut builder) = current_key {
                    if builder.fingerprint.is_none() && fields.len() > 9 {
                        builder.fingerprint = Some(fields[9].to_string());
                    }
                }
            }
            "uid" => {
                if let Some(ref mut builder) = current_key {
                    if builder.uid.is_none() && fields.len() > 9 {
                        builder.uid = Some(fields[9].to_string());
                    }
                }
            }
            "sub" | "ssb" | "uat" | "rev" | "tru" => {
                debug!(
                    record_type = fields[0],
                    "skipping unhandled GPG record type"
                );
            }
            _ if !fields[0].is_empty() => {
                debug!(record_type = fields[0], "skipping unknown GPG record type");
            }
            _ => {}
        }
    }

    if let Some(builder) = current_key {
        match builder.build() {
            Some(key) => keys.push(key),
            None => debug!("skipping final key: missing key ID or fingerprint"),
        }
    }

    Ok(keys)
}

fn parse_timestamp(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    s.parse::<i64>()
        .ok()
        .and_then(|ts| chrono::DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.date_naive())
}

#[derive(Default)]
struct KeyBuilder {
    key_id: Option<String>,
    fingerprint: Option<String>,
    uid: Option<String>,
    created: Option<NaiveDate>,
    expires: Option<NaiveDate>,
    revoked: bool,
    expired: bool,
    validity: u8,
    owner_trust: u8,
}

impl KeyBuilder {
    fn from_pub_fields(fields: &[&str]) -> Self {
        let mut builder = Self::default();

        if let Some(c) = fields.get(1).and_then(|s| s.chars().next()) {
            let level = TrustLevel::from_gpg_char(c);
            builder.revoked = level == TrustLevel::Revoked;
            builder.expired = level == TrustLevel::Expired;
            builder.validity = level.level();
        }

        if let Some(id) = fields.get(4) {
            if !id.is_empty() {
                builder.key_id = Some(id.to_string());
            }
        }

        if let Some(s) = fields.get(5) {
            builder.created = parse_timestamp(s);
        }

        if let Some(s) = fields.get(6) {
            builder.expires = parse_timestamp(s);
        }

        if let Some(c) = fields.get(8).and_then(|s| s.chars().next()) {
            builder.owner_trust = TrustLevel::from_gpg_char(c).level();
        }

        builder
    }

    fn build(self) -> Option<KeyRecord> {
        Some(KeyRecord {
            key_id: self.key_id?,
            fingerprint: self.fingerprint?,
            uid: self.uid.unwrap_or_default(),
            created: self.created,
            expires: self.expires,
            revoked: self.revoked,
            expired: self.expired,
            validity: self.validity,
            owner_trust: self.owner_trust,
        })
    }
}
