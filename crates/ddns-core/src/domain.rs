//! Apex (registrable) domain derivation
//!
//! Zones are delegated at the registrable domain level, so the reconciler
//! needs `example.com` for `home.example.com` and `example.co.uk` for
//! `sub.example.co.uk`. This is a pure string operation.

/// Public suffixes that span two labels
///
/// Anything not listed here is treated as a single-label suffix.
const MULTI_LABEL_SUFFIXES: &[&str] = &[
    "ac.uk", "co.uk", "gov.uk", "ltd.uk", "me.uk", "net.uk", "org.uk", "plc.uk",
    "com.au", "net.au", "org.au", "edu.au", "gov.au", "id.au", "asn.au",
    "co.nz", "net.nz", "org.nz", "geek.nz",
    "co.jp", "ne.jp", "or.jp", "ac.jp", "go.jp",
    "co.kr", "or.kr", "ne.kr",
    "com.br", "net.br", "org.br",
    "com.cn", "net.cn", "org.cn",
    "com.hk", "net.hk", "org.hk",
    "com.tw", "net.tw", "org.tw",
    "com.sg", "net.sg", "org.sg",
    "com.mx", "org.mx",
    "com.ar", "com.tr", "com.ua", "com.pl",
    "co.za", "org.za",
    "co.in", "net.in", "org.in", "firm.in",
    "co.il", "org.il",
    "co.id", "or.id",
    "com.my", "com.ph", "com.vn",
];

/// Derive the registrable domain of an FQDN
///
/// Keeps the public suffix plus one label. A trailing root dot is ignored
/// and case is preserved.
///
/// Returns `None` when the name has empty labels or too few labels to have
/// a registrable part (e.g. `com`, `co.uk`).
///
/// # Examples
///
/// ```
/// use ddns_core::domain::apex_domain;
///
/// assert_eq!(apex_domain("home.example.com").as_deref(), Some("example.com"));
/// assert_eq!(apex_domain("sub.example.co.uk").as_deref(), Some("example.co.uk"));
/// assert_eq!(apex_domain("localhost"), None);
/// ```
pub fn apex_domain(fqdn: &str) -> Option<String> {
    let name = fqdn.trim().trim_end_matches('.');
    let labels: Vec<&str> = name.split('.').collect();

    if labels.iter().any(|l| l.is_empty()) {
        return None;
    }

    let suffix_len = if labels.len() >= 2 {
        let tail = format!(
            "{}.{}",
            labels[labels.len() - 2],
            labels[labels.len() - 1]
        )
        .to_ascii_lowercase();
        if MULTI_LABEL_SUFFIXES.contains(&tail.as_str()) {
            2
        } else {
            1
        }
    } else {
        1
    };

    let keep = suffix_len + 1;
    if labels.len() < keep {
        return None;
    }

    Some(labels[labels.len() - keep..].join("."))
}
