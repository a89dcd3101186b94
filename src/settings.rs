//! Runtime settings.
//!
//! Read from an optional `kopeck.toml` (or the file given on the command line)
//! and overridden by `KOPECK_*` environment variables, e.g. `KOPECK_LISTEN`.

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::token::DictionaryTagger;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Address the HTTP surface binds to.
    pub listen: String,
    /// Extra `form<TAB>lemma<TAB>tags` file merged over the embedded dictionary.
    pub dictionary: Option<String>,
    /// Log directive used when `RUST_LOG` is not set.
    pub log: String,
    /// Threads used for batch extraction.
    pub workers: usize,
}

impl Settings {
    pub fn load(path: Option<&str>) -> Result<Self> {
        let file = match path {
            Some(path) => File::with_name(path),
            None => File::with_name("kopeck").required(false),
        };
        let settings = Config::builder()
            .set_default("listen", "127.0.0.1:8080")?
            .set_default("log", "info")?
            .set_default("workers", 4_i64)?
            .add_source(file)
            .add_source(Environment::with_prefix("KOPECK"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// The embedded dictionary plus the configured one, if any.
    pub fn tagger(&self) -> Result<DictionaryTagger> {
        let mut tagger = DictionaryTagger::builtin()?;
        if let Some(path) = &self.dictionary {
            tagger.merge_file(path)?;
        }
        Ok(tagger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KopeckError;
    use crate::token::{Tagger, TokenKind};
    use std::fs;

    #[test]
    fn file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("kopeck-settings-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let dictionary = dir.join("extra.tsv");
        fs::write(&dictionary, "баксов\tбакс\tNOUN\n").unwrap();
        let path = dir.join("kopeck.toml");
        fs::write(
            &path,
            format!("listen = \"0.0.0.0:9000\"\nworkers = 2\ndictionary = {:?}\n", dictionary.display().to_string()),
        )
        .unwrap();

        let settings = Settings::load(path.to_str()).unwrap();
        assert_eq!(settings.listen, "0.0.0.0:9000");
        assert_eq!(settings.workers, 2);
        assert_eq!(settings.log, "info");
        let tagger = settings.tagger().unwrap();
        assert_eq!(tagger.analyze("баксов", TokenKind::Word).lemma, "бакс");
        assert_eq!(tagger.analyze("рублей", TokenKind::Word).lemma, "рубль");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = Settings::load(Some("/nonexistent/kopeck-settings")).unwrap_err();
        assert!(matches!(err, KopeckError::Config(_)));
    }
}
