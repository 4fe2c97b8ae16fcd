use tracing::warn;

use crate::keyid::short_key_id;
use crate::list::KeyIdList;
use crate::types::KeyRecord;

/// How multiple active criteria combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuditMode {
    /// All active criteria must hold for a key to be deleted.
    #[default]
    AllCriteria,
    /// Any single active criterion suffices.
    AnyCriterion,
}

/// The set of deletion criteria for one run.
///
/// Built once from the parsed command line and never mutated afterwards.
/// A `None` threshold or list means that criterion is inactive; an
/// inactive criterion vacuously passes in [`AuditMode::AllCriteria`] and
/// is skipped in [`AuditMode::AnyCriterion`].
#[derive(Debug, Clone, Default)]
pub struct AuditCriteria {
    pub mode: AuditMode,
    /// Delete revoked keys.
    pub revoked: bool,
    /// Delete expired keys.
    pub expired: bool,
    /// Delete keys with validity at or below this level.
    pub max_validity: Option<u8>,
    /// Delete keys with owner trust at or below this level.
    pub max_trust: Option<u8>,
    /// Delete keys listed in this file.
    pub allow_list: Option<KeyIdList>,
    /// Delete keys NOT listed in this file.
    pub deny_list: Option<KeyIdList>,
}

impl AuditCriteria {
    /// True if no criterion is active. The caller must not start a
    /// deletion scan with an empty criteria set.
    pub fn is_empty(&self) -> bool {
        !self.revoked
            && !self.expired
            && self.max_validity.is_none()
            && self.max_trust.is_none()
            && self.allow_list.is_none()
            && self.deny_list.is_none()
    }
}

/// Decides, key by key, what the scan should delete.
///
/// A pure decision function over the configured criteria; performs no I/O
/// and never fails. The enumeration driver calls
/// [`should_delete`](Auditor::should_delete) once per key.
#[derive(Debug, Clone)]
pub struct Auditor {
    criteria: AuditCriteria,
}

impl Auditor {
    pub fn new(criteria: AuditCriteria) -> Self {
        Self { criteria }
    }

    pub fn criteria(&self) -> &AuditCriteria {
        &self.criteria
    }

    /// Tests a key against the active criteria.
    ///
    /// Returns false when no criterion is active; the caller is expected
    /// to guard against that before scanning.
    pub fn should_delete(&self, key: &KeyRecord) -> bool {
        let c = &self.criteria;
        if c.is_empty() {
            return false;
        }

        // List predicates need the short ID; a key whose ID cannot be
        // normalized never matches a list either way.
        let short_id = match short_key_id(&key.key_id) {
            Some(id) => Some(id.to_uppercase()),
            None => {
                if c.allow_list.is_some() || c.deny_list.is_some() {
                    warn!(key_id = %key.key_id, "key ID in wrong format, skipping list test");
                }
                None
            }
        };
        // Both list predicates require a normalized ID; neither is
        // satisfied when normalization failed.
        let listed = |list: &KeyIdList| {
            short_id
                .as_deref()
                .map(|id| list.contains(id))
                .unwrap_or(false)
        };
        let unlisted = |list: &KeyIdList| {
            short_id
                .as_deref()
                .map(|id| !list.contains(id))
                .unwrap_or(false)
        };

        match c.mode {
            AuditMode::AnyCriterion => {
                (c.revoked && key.revoked)
                    || (c.expired && key.expired)
                    || c.max_validity.is_some_and(|max| key.validity <= max)
                    || c.max_trust.is_some_and(|max| key.owner_trust <= max)
                    || c.allow_list.as_ref().is_some_and(&listed)
                    || c.deny_list.as_ref().is_some_and(&unlisted)
            }
            AuditMode::AllCriteria => {
                (!c.revoked || key.revoked)
                    && (!c.expired || key.expired)
                    && c.max_validity.map_or(true, |max| key.validity <= max)
                    && c.max_trust.map_or(true, |max| key.owner_trust <= max)
                    && c.allow_list.as_ref().map_or(true, &listed)
                    && c.deny_list.as_ref().map_or(true, &unlisted)
            }
        }
    }

    /// Renders the interactive confirmation question enumerating the
    /// active criteria.
    pub fn confirmation_question(&self) -> String {
        let c = &self.criteria;
        let joiner = match c.mode {
            AuditMode::AnyCriterion => " or ",
            AuditMode::AllCriteria => " and ",
        };

        let mut items: Vec<String> = Vec::new();
        if c.revoked {
            items.push("revoked".to_string());
        }
        if c.expired {
            items.push("expired".to_string());
        }
        if let Some(max) = c.max_validity {
            items.push(format!("not valid (<={max})"));
        }
        if let Some(max) = c.max_trust {
            items.push(format!("not trusted (<={max})"));
        }
        if c.allow_list.is_some() {
            items.push("listed in file".to_string());
        }
        if c.deny_list.is_some() {
            items.push("not listed in exclusion file".to_string());
        }

        format!(
            "Do you really want to delete all keys which are {}?",
            items.join(joiner)
        )
    }
}
