use anyhow::{Context, Result, bail};
use lemonstand_game::room::WORD_LIST;
use lemonstand_game::{parse_room_code, room_code_for_seed};
use std::collections::HashMap;

/// Seed metadata for a scripted run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    pub code: Option<String>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self { seed, code: None }
    }

    #[must_use]
    pub const fn from_room_code(seed: u64, code: String) -> Self {
        Self {
            seed,
            code: Some(code),
        }
    }

    /// Code to show in reports, derived if the seed was given as a number.
    #[must_use]
    pub fn display_code(&self) -> String {
        self.code
            .clone()
            .unwrap_or_else(|| room_code_for_seed(self.seed))
    }
}

/// Resolve a list of CLI seed arguments into canonical seed metadata.
///
/// Supports literal integers, room codes, and the special keyword `all`
/// which expands to every room code.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut pending: Vec<SeedInfo> = Vec::new();
    let mut request_all = false;

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if token.eq_ignore_ascii_case("all") {
            request_all = true;
            continue;
        }

        if let Ok(value) = token.parse::<i64>() {
            pending.push(SeedInfo::from_numeric(value.unsigned_abs()));
            continue;
        }

        if let Ok(value) = token.parse::<u64>() {
            pending.push(SeedInfo::from_numeric(value));
            continue;
        }

        if let Some(seed) = parse_room_code(token) {
            pending.push(SeedInfo::from_room_code(seed, token.trim().to_uppercase()));
            continue;
        }

        bail!("Unrecognized seed token: {token}");
    }

    if request_all {
        pending.extend(generate_all_room_seeds()?);
    }

    let mut deduped: Vec<SeedInfo> = Vec::new();
    let mut index: HashMap<u64, usize> = HashMap::new();

    for info in pending {
        if let Some(&existing) = index.get(&info.seed) {
            if let Some(entry) = deduped.get_mut(existing)
                && entry.code.is_none()
                && info.code.is_some()
            {
                *entry = info;
            }
        } else {
            index.insert(info.seed, deduped.len());
            deduped.push(info);
        }
    }

    if deduped.is_empty() {
        deduped.push(SeedInfo::from_numeric(1337));
    }

    Ok(deduped)
}

fn generate_all_room_seeds() -> Result<Vec<SeedInfo>> {
    let mut seeds = Vec::with_capacity(WORD_LIST.len() * 100);
    for word in WORD_LIST {
        for suffix in 0..100 {
            let code = format!("LS-{word}{suffix:02}");
            let seed = parse_room_code(&code)
                .with_context(|| format!("failed to parse room code: {code}"))?;
            seeds.push(SeedInfo::from_room_code(seed, code));
        }
    }
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_numeric_and_room_code() {
        let raw = vec![
            "42".to_string(),
            "-7".to_string(),
            "ls-lemon42".to_string(),
        ];
        let seeds = resolve_seed_inputs(&raw).unwrap();
        assert!(seeds.iter().any(|s| s.seed == 42 && s.code.is_none()));
        assert!(seeds.iter().any(|s| s.seed == 7 && s.code.is_none()));
        assert!(
            seeds
                .iter()
                .any(|s| s.code.as_deref() == Some("LS-LEMON42"))
        );
    }

    #[test]
    fn rejects_garbage_tokens() {
        assert!(resolve_seed_inputs(&["lemonade".to_string()]).is_err());
    }

    #[test]
    fn defaults_and_dedupes() {
        let seeds = resolve_seed_inputs(&[]).unwrap();
        assert_eq!(seeds, vec![SeedInfo::from_numeric(1337)]);
        let twice = resolve_seed_inputs(&["9".to_string(), "9".to_string()]).unwrap();
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn expands_all_room_codes() {
        let seeds = resolve_seed_inputs(&["all".to_string()]).unwrap();
        assert_eq!(seeds.len(), WORD_LIST.len() * 100);
        assert!(seeds.iter().all(|s| s.code.is_some()));
    }

    #[test]
    fn display_code_falls_back_to_the_seed() {
        assert_eq!(SeedInfo::from_numeric(0).display_code(), "LS-LEMON00");
    }
}
