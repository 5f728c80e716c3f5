pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;
use std::error::Error;

/// Resolve a calculator input: `--input` file first, then piped stdin,
/// then whatever the command's flags describe.
pub fn load<T, F>(path: Option<&str>, from_flags: F) -> Result<T, Box<dyn Error>>
where
    T: DeserializeOwned,
    F: FnOnce() -> Result<T, Box<dyn Error>>,
{
    if let Some(path) = path {
        return file::read_input(path);
    }
    if let Some(value) = stdin::read_stdin::<T>()? {
        log::debug!("input read from stdin");
        return Ok(value);
    }
    from_flags()
}

/// Shorthand for a required flag.
pub fn required<T>(value: Option<T>, flag: &str) -> Result<T, Box<dyn Error>> {
    value.ok_or_else(|| format!("--{flag} is required (or provide --input)").into())
}
