use anyhow::{Result, bail};
use std::collections::HashSet;

pub const DEFAULT_SEED: u64 = 1337;

/// Parse `--seeds` tokens into a deduplicated list, keeping first-seen order.
///
/// Accepts decimal (negative values use their magnitude) and `0x` hex.
pub fn resolve_seed_inputs(raw: &[String]) -> Result<Vec<u64>> {
    let mut seen = HashSet::new();
    let mut seeds = Vec::with_capacity(raw.len());

    for token in raw {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let seed = parse_seed(token)?;
        if seen.insert(seed) {
            seeds.push(seed);
        }
    }

    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }
    Ok(seeds)
}

fn parse_seed(token: &str) -> Result<u64> {
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        if let Ok(value) = u64::from_str_radix(hex, 16) {
            return Ok(value);
        }
    } else if let Ok(value) = token.parse::<i64>() {
        return Ok(value.unsigned_abs());
    } else if let Ok(value) = token.parse::<u64>() {
        return Ok(value);
    }
    bail!("Unrecognized seed token: {token}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_decimal_hex_and_negative_seeds() {
        let raw = vec![
            "42".to_string(),
            "-7".to_string(),
            "0xFF".to_string(),
            "42".to_string(),
        ];
        let seeds = resolve_seed_inputs(&raw).unwrap();
        assert_eq!(seeds, vec![42, 7, 255]);
    }

    #[test]
    fn empty_input_falls_back_to_default() {
        assert_eq!(resolve_seed_inputs(&[]).unwrap(), vec![DEFAULT_SEED]);
    }

    #[test]
    fn rejects_words() {
        let err = resolve_seed_inputs(&["ORANGE".to_string()]).unwrap_err();
        assert!(err.to_string().contains("ORANGE"));
    }
}
