//! SBOM document helpers shared by the CycloneDX and SPDX writers.

use bomgate_core::types::Ecosystem;

/// Split a lockfile checksum into algorithm name and hash value.
///
/// # Arguments
///
/// - `checksum`: raw checksum string (e.g. "sha512-base64...", "sha256:hex",
///   or a bare Cargo hex digest)
/// - `ecosystem`: package ecosystem
///
/// # Returns
///
/// `(algorithm, hash_value)` tuple. NPM integrity uses the "sha512-" prefix,
/// pip hashes use "sha256:", Cargo digests are bare SHA-256 hex.
pub fn parse_checksum_algorithm<'a>(
    checksum: &'a str,
    ecosystem: &Ecosystem,
) -> (&'static str, &'a str) {
    match ecosystem {
        Ecosystem::Npm => {
            // NPM integrity: "sha512-base64hash"
            if let Some(dash_idx) = checksum.find('-') {
                let (alg_part, hash_part) = checksum.split_at(dash_idx);
                let hash_value = &hash_part[1..]; // skip '-'
                (algorithm_name(alg_part), hash_value)
            } else {
                ("SHA-256", checksum)
            }
        }
        Ecosystem::Pip => {
            // pip hash: "sha256:hexdigest"
            if let Some(colon_idx) = checksum.find(':') {
                let (alg_part, hash_part) = checksum.split_at(colon_idx);
                let hash_value = &hash_part[1..]; // skip ':'
                (algorithm_name(alg_part), hash_value)
            } else {
                ("SHA-256", checksum)
            }
        }
        Ecosystem::Cargo => ("SHA-256", checksum),
    }
}

fn algorithm_name(raw: &str) -> &'static str {
    match raw {
        "sha512" => "SHA-512",
        "sha384" => "SHA-384",
        "sha256" => "SHA-256",
        "sha1" => "SHA-1",
        _ => "SHA-256",
    }
}

/// Current Unix time formatted as RFC3339.
///
/// Falls back to the epoch (1970-01-01T00:00:00Z) when the system clock is
/// unavailable.
pub fn current_timestamp() -> String {
    match std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH) {
        Ok(duration) => unix_to_rfc3339(duration.as_secs()),
        Err(_) => "1970-01-01T00:00:00Z".to_owned(),
    }
}

/// Convert a Unix timestamp to RFC3339 (YYYY-MM-DDTHH:MM:SSZ).
pub fn unix_to_rfc3339(secs: u64) -> String {
    const SECONDS_PER_DAY: u64 = 86400;
    const SECONDS_PER_HOUR: u64 = 3600;
    const SECONDS_PER_MINUTE: u64 = 60;

    let days_since_epoch = secs / SECONDS_PER_DAY;
    let remaining_secs = secs % SECONDS_PER_DAY;

    let hours = remaining_secs / SECONDS_PER_HOUR;
    let minutes = (remaining_secs % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = remaining_secs % SECONDS_PER_MINUTE;

    let mut year = 1970;
    let mut days = days_since_epoch;

    loop {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if days >= days_in_year {
            days -= days_in_year;
            year += 1;
        } else {
            break;
        }
    }

    let days_in_months: [u64; 12] = if is_leap_year(year) {
        [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    } else {
        [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
    };

    let mut month = 1;
    let mut day = days + 1;

    for &days_in_month in &days_in_months {
        if day <= days_in_month {
            break;
        }
        day -= days_in_month;
        month += 1;
    }

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        year, month, day, hours, minutes, seconds
    )
}

fn is_leap_year(year: u64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
