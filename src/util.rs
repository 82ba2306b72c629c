use std::{env::VarError, str::FromStr, fmt::Display};

use anyhow::{Result, anyhow, bail};

/// Get an env var as a String; decoding failures are reported as
/// errors. If the var is not set and no fallback was given, an error
/// is reported as well.
pub fn getenv_or(name: &str, fallbackvalue: Option<&str>) -> Result<String> {
    match std::env::var(name) {
        Ok(s) => Ok(s),
        Err(e) => match e {
            VarError::NotPresent =>
                match fallbackvalue {
                    Some(v) => Ok(v.to_string()),
                    None => bail!("{name:?} env var is missing and \
                                   no default provided"),
                },
            VarError::NotUnicode(_) => bail!("{name:?} env var is not unicode"),
        }
    }
}

/// Get an env var as a String; decoding failures are reported as
/// errors.
pub fn getenv(name: &str) -> Result<Option<String>> {
    match std::env::var(name) {
        Ok(s) => Ok(Some(s)),
        Err(e) => match e {
            VarError::NotPresent => Ok(None),
            VarError::NotUnicode(_) => bail!("{name:?} env var is not unicode"),
        }
    }
}

/// Like getenv but reports an error mentioning the variable name if
/// it isn't set.
pub fn xgetenv(name: &str) -> Result<String> {
    getenv(name)?.ok_or_else(
        || anyhow!("missing env var {name:?}"))
}

/// Parse an env var if it is set.
pub fn getenv_parse<T>(name: &str) -> Result<Option<T>>
where T: FromStr,
      T::Err: Display
{
    getenv(name)?.map(|s| {
        s.trim().parse::<T>().map_err(
            |e| anyhow!("{name:?} env var: can't parse {s:?}: {e}"))
    }).transpose()
}

/// Boolean env vars: "1", "true", "yes", "on" and "0", "false", "no",
/// "off" (case insensitive).
pub fn getenv_bool(name: &str) -> Result<Option<bool>> {
    getenv(name)?.map(|s| parse_bool(&s).ok_or_else(
        || anyhow!("{name:?} env var: expecting a boolean, got {s:?}")))
        .transpose()
}

pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names, tests run in parallel.

    #[test]
    fn t_getenv() {
        std::env::set_var("SPASS_T_GETENV", "x");
        assert_eq!(getenv("SPASS_T_GETENV").unwrap(), Some("x".into()));
        assert_eq!(getenv("SPASS_T_GETENV_UNSET").unwrap(), None);
        assert_eq!(getenv_or("SPASS_T_GETENV_UNSET", Some("d")).unwrap(), "d");
        assert!(getenv_or("SPASS_T_GETENV_UNSET", None).is_err());
        let e = xgetenv("SPASS_T_GETENV_UNSET").err().unwrap();
        assert!(e.to_string().contains("SPASS_T_GETENV_UNSET"));
    }

    #[test]
    fn t_getenv_parse() {
        std::env::set_var("SPASS_T_PARSE_OK", " 12 ");
        std::env::set_var("SPASS_T_PARSE_BAD", "twelve");
        assert_eq!(getenv_parse::<usize>("SPASS_T_PARSE_OK").unwrap(), Some(12));
        assert_eq!(getenv_parse::<usize>("SPASS_T_PARSE_UNSET").unwrap(), None);
        assert!(getenv_parse::<usize>("SPASS_T_PARSE_BAD").is_err());
    }

    #[test]
    fn t_parse_bool() {
        assert_eq!(parse_bool("Yes"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        std::env::set_var("SPASS_T_BOOL", "off");
        assert_eq!(getenv_bool("SPASS_T_BOOL").unwrap(), Some(false));
    }
}
