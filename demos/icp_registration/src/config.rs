use std::path::Path;

use scanalign_icp::{IcpParams, StoppingPolicy};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown stopping policy: {0}")]
    UnknownPolicy(String),

    #[error("Stride must be at least 1")]
    InvalidStride,
}

/// Load ICP parameters from a JSON file. Missing fields keep their defaults.
pub fn load_params(path: &Path) -> Result<IcpParams, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let params: IcpParams = serde_json::from_str(&contents)?;
    if params.stride == 0 {
        return Err(ConfigError::InvalidStride);
    }
    Ok(params)
}

pub fn parse_policy(name: &str) -> Result<StoppingPolicy, ConfigError> {
    match name {
        "plateau" | "plateau_then_small" => Ok(StoppingPolicy::PlateauThenSmall),
        "small" | "small_or_worsening" => Ok(StoppingPolicy::SmallOrWorsening),
        _ => Err(ConfigError::UnknownPolicy(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_params() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(
            file,
            r#"{{"stride": 3, "max_iterations": 40, "stopping_policy": "small_or_worsening"}}"#
        )?;

        let params = load_params(file.path())?;
        assert_eq!(params.stride, 3);
        assert_eq!(params.max_iterations, 40);
        assert_eq!(params.stopping_policy, StoppingPolicy::SmallOrWorsening);
        assert_eq!(params.tolerance, IcpParams::default().tolerance);
        Ok(())
    }

    #[test]
    fn test_load_params_rejects_zero_stride() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, r#"{{"stride": 0}}"#)?;
        assert!(matches!(
            load_params(file.path()),
            Err(ConfigError::InvalidStride)
        ));
        Ok(())
    }

    #[test]
    fn test_load_params_bad_json() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = tempfile::NamedTempFile::new()?;
        write!(file, "not json")?;
        assert!(matches!(load_params(file.path()), Err(ConfigError::Parse(_))));
        Ok(())
    }

    #[test]
    fn test_parse_policy() {
        assert!(matches!(
            parse_policy("plateau"),
            Ok(StoppingPolicy::PlateauThenSmall)
        ));
        assert!(matches!(
            parse_policy("small_or_worsening"),
            Ok(StoppingPolicy::SmallOrWorsening)
        ));
        assert!(matches!(
            parse_policy("never"),
            Err(ConfigError::UnknownPolicy(_))
        ));
    }
}
