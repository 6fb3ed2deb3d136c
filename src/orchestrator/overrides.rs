use regex::Regex;
use std::sync::LazyLock;

use crate::api::StepUpdate;
use crate::error::{Result, ScanerrError};

static STEP_UPDATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^step-(\d+):(.*)$").expect("valid step update pattern"));

/// Parse one `step-<n>:<value>` override into a 0-based update.
pub fn parse_step_update(input: &str) -> Result<StepUpdate> {
    let invalid = || ScanerrError::InvalidStepUpdate {
        input: input.to_string(),
    };

    let caps = STEP_UPDATE_PATTERN.captures(input).ok_or_else(invalid)?;
    let step: usize = caps[1].parse().map_err(|_| invalid())?;
    if step == 0 {
        return Err(invalid());
    }

    Ok(StepUpdate {
        index: step - 1,
        value: caps[2].to_string(),
    })
}

/// Parse every override, keeping input order. The first malformed entry
/// aborts the whole batch.
pub fn parse_step_updates<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<StepUpdate>> {
    inputs.iter().map(|s| parse_step_update(s.as_ref())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(index: usize, value: &str) -> StepUpdate {
        StepUpdate {
            index,
            value: value.to_string(),
        }
    }

    #[test]
    fn test_order_preserved_and_zero_based() {
        let parsed = parse_step_updates(&["step-2:Hello", "step-1:42"]).unwrap();
        assert_eq!(parsed, vec![update(1, "Hello"), update(0, "42")]);
    }

    #[test]
    fn test_value_keeps_later_colons() {
        let parsed = parse_step_update("step-3:https://example.com:8080/login").unwrap();
        assert_eq!(parsed, update(2, "https://example.com:8080/login"));
    }

    #[test]
    fn test_empty_value_allowed() {
        assert_eq!(parse_step_update("step-1:").unwrap(), update(0, ""));
    }

    #[test]
    fn test_malformed_inputs_rejected() {
        for bad in ["bad-format", "step1:x", "step-:x", "step-2", "step-0:x", "Step-1:x", "step-a:x"] {
            let err = parse_step_update(bad).unwrap_err();
            assert!(
                matches!(err, ScanerrError::InvalidStepUpdate { ref input } if input == bad),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_one_bad_entry_fails_batch() {
        assert!(parse_step_updates(&["step-1:ok", "oops"]).is_err());
        assert!(parse_step_updates::<&str>(&[]).unwrap().is_empty());
    }
}
