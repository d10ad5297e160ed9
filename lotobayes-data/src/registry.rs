use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A supported game and the upper bound of its number range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub id: String,
    pub max_number: u32,
    /// Remote CSV with the draw history.
    #[serde(default)]
    pub url: Option<String>,
}

impl GameConfig {
    pub fn new(id: &str, max_number: u32) -> Self {
        Self {
            id: id.to_string(),
            max_number,
            url: None,
        }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("loterie non supportée : {0}")]
    UnsupportedGame(String),
    #[error("impossible de lire le registre {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("registre invalide {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("registre invalide : {0}")]
    Invalid(String),
}

/// Ordered set of games analysed by a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRegistry {
    pub games: Vec<GameConfig>,
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self {
            games: vec![
                GameConfig::new("newyork", 50),
                GameConfig::new("florida", 50),
                GameConfig::new("ganamas", 50),
                GameConfig::new("dominicana", 50),
                GameConfig::new("powerball", 69),
                GameConfig::new("megamillion", 70),
            ],
        }
    }
}

impl GameRegistry {
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let json = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let registry: GameRegistry =
            serde_json::from_str(&json).map_err(|source| RegistryError::Json {
                path: path.display().to_string(),
                source,
            })?;
        registry.validate()?;
        Ok(registry)
    }

    pub fn validate(&self) -> Result<(), RegistryError> {
        for (i, game) in self.games.iter().enumerate() {
            if game.id.is_empty()
                || game.id.contains(['/', '\\'])
                || game.id.contains("..")
            {
                return Err(RegistryError::Invalid(format!(
                    "identifiant de loterie invalide : '{}'",
                    game.id
                )));
            }
            if game.max_number == 0 {
                return Err(RegistryError::Invalid(format!(
                    "{} : max_number doit être ≥ 1",
                    game.id
                )));
            }
            if self.games[..i].iter().any(|g| g.id == game.id) {
                return Err(RegistryError::Invalid(format!("loterie en double : {}", game.id)));
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&GameConfig, RegistryError> {
        self.games
            .iter()
            .find(|g| g.id == id)
            .ok_or_else(|| RegistryError::UnsupportedGame(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.games.iter().map(|g| g.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let registry = GameRegistry::default();
        assert_eq!(registry.games.len(), 6);
        assert_eq!(registry.get("powerball").unwrap().max_number, 69);
        assert_eq!(registry.get("megamillion").unwrap().max_number, 70);
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn test_unsupported_game() {
        let registry = GameRegistry::default();
        assert!(matches!(
            registry.get("euromillions"),
            Err(RegistryError::UnsupportedGame(id)) if id == "euromillions"
        ));
    }

    #[test]
    fn test_load_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("games.json");
        std::fs::write(
            &path,
            r#"{"games":[{"id":"loto","max_number":49,"url":"https://example.org/loto.csv"}]}"#,
        )
        .unwrap();
        let registry = GameRegistry::load(&path).unwrap();
        let game = registry.get("loto").unwrap();
        assert_eq!(game.max_number, 49);
        assert_eq!(game.url.as_deref(), Some("https://example.org/loto.csv"));
    }

    #[test]
    fn test_validate_rejects_zero_range_and_duplicates() {
        let zero = GameRegistry {
            games: vec![GameConfig::new("x", 0)],
        };
        assert!(zero.validate().is_err());

        let dup = GameRegistry {
            games: vec![GameConfig::new("x", 10), GameConfig::new("x", 20)],
        };
        assert!(dup.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_path_like_ids() {
        for id in ["", "../x", "a/b", "a\\b", ".."] {
            let registry = GameRegistry {
                games: vec![GameConfig::new(id, 50)],
            };
            assert!(
                matches!(registry.validate(), Err(RegistryError::Invalid(_))),
                "{id:?} accepté"
            );
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("games.json");
        std::fs::write(&path, r#"{"games":[{"id":"../../etc/x","max_number":49}]}"#).unwrap();
        assert!(GameRegistry::load(&path).is_err());
    }
}
