//! Error types

/// Everything that can go wrong outside the per-frame hot path
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// A sprite could not be read or decoded
    #[error("failed to load asset '{name}': {reason}")]
    AssetLoad { name: String, reason: String },

    /// Tunables that would make the simulation meaningless
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl GameError {
    pub fn asset(name: impl Into<String>, reason: impl ToString) -> Self {
        GameError::AssetLoad {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_keeps_source() {
        let io = GameError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "arena.json missing"));
        assert_eq!(io.to_string(), "IO error: arena.json missing");

        let parse = GameError::from(serde_json::from_str::<u32>("nope").unwrap_err());
        let msg = parse.to_string();
        assert!(msg.starts_with("config parse error: "), "{}", msg);
        assert!(msg.len() > "config parse error: ".len());
    }
}
