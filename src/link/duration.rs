use crate::error::{Error, Result};

/// Render whole seconds as a compact token such as `45s`, `5m21s` or `1h2m3s`.
///
/// The seconds group is always present, so a token never ends in a bare digit.
pub fn encode_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{seconds}s")
    } else if seconds < 3600 {
        format!("{}m{}s", seconds / 60, seconds % 60)
    } else {
        format!(
            "{}h{}m{}s",
            seconds / 3600,
            (seconds % 3600) / 60,
            seconds % 60
        )
    }
}

/// Parse a token made of `<digits><unit>` groups with units `h`, `m` and `s`.
///
/// Missing units count as zero, so `5m` is 300. Each unit may appear once.
pub fn decode_duration(token: &str) -> Result<u64> {
    let malformed = || Error::MalformedDuration(token.to_string());

    let mut total: u64 = 0;
    let mut seen = [false; 3];
    let mut digits = String::new();
    let mut groups = 0;

    for c in token.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        let (slot, scale) = match c {
            'h' => (0, 3600),
            'm' => (1, 60),
            's' => (2, 1),
            _ => return Err(malformed()),
        };
        if digits.is_empty() || seen[slot] {
            return Err(malformed());
        }
        seen[slot] = true;

        let n: u64 = digits.parse().map_err(|_| malformed())?;
        total = n
            .checked_mul(scale)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(malformed)?;
        digits.clear();
        groups += 1;
    }

    // Trailing digits without a unit letter, or no group at all.
    if !digits.is_empty() || groups == 0 {
        return Err(malformed());
    }
    Ok(total)
}
