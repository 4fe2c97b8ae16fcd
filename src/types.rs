use chrono::NaiveDate;

/// A public key from the GPG keyring.
///
/// One record per `pub` entry in `gpg --list-keys --with-colons` output.
/// Records are transient: the scan builds one, tests it against the active
/// criteria and discards it before fetching the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRecord {
    /// 16-character long key ID.
    pub key_id: String,
    pub fingerprint: String,
    pub uid: String,
    pub created: Option<NaiveDate>,
    pub expires: Option<NaiveDate>,
    pub revoked: bool,
    pub expired: bool,
    /// Validity of the key's identity claim, ordinal 0-5.
    pub validity: u8,
    /// How much the local user trusts the holder, ordinal 0-5.
    pub owner_trust: u8,
}

impl KeyRecord {
    /// One-line summary in the report format `SHORTID: uid [validity|trust]`.
    pub fn summary(&self) -> String {
        let short = crate::keyid::short_key_id(&self.key_id).unwrap_or(&self.key_id);
        let mut line = format!("{short}: {}", self.uid);
        if self.revoked {
            line.push_str(" revoked");
        }
        if self.expired {
            line.push_str(" expired");
        }
        line.push_str(&format!(" [{}|{}]", self.validity, self.owner_trust));
        line
    }
}

/// GPG trust-of-identity / owner-trust level.
///
/// Both the validity field and the ownertrust field of `--with-colons`
/// output use the same letter scheme. The ordinal values match GPGME's
/// validity constants (unknown through ultimate, 0-5); the `e` and `r`
/// letters flag expired and revoked keys and carry no level of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[non_exhaustive]
pub enum TrustLevel {
    /// Level unknown (new key or insufficient data)
    #[default]
    Unknown,
    /// Not yet computed
    Undefined,
    /// Explicitly distrusted
    Never,
    /// Marginally trusted
    Marginal,
    /// Fully trusted
    Full,
    /// Ultimately trusted (usually the user's own key)
    Ultimate,
    /// Key has expired
    Expired,
    /// Key has been revoked
    Revoked,
}

impl TrustLevel {
    pub fn from_gpg_char(c: char) -> Self {
        match c {
            'o' | '-' => Self::Unknown,
            'q' => Self::Undefined,
            'n' => Self::Never,
            'm' => Self::Marginal,
            'f' => Self::Full,
            'u' => Self::Ultimate,
            'e' => Self::Expired,
            'r' => Self::Revoked,
            _ => Self::Unknown,
        }
    }

    /// Ordinal level 0-5. Expired and revoked are status flags, not
    /// levels; they map to 0.
    pub fn level(self) -> u8 {
        match self {
            Self::Unknown | Self::Expired | Self::Revoked => 0,
            Self::Undefined => 1,
            Self::Never => 2,
            Self::Marginal => 3,
            Self::Full => 4,
            Self::Ultimate => 5,
        }
    }
}
