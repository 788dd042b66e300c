use core_config::{Config, FALLBACK_LANGUAGE};

/// Construction-time settings for a `HighlightEngine`.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    pub language: String,
    /// Checking starts switched on.
    pub active: bool,
    /// The engine manages `active` itself from error density.
    pub automatic: bool,
    pub auto_detect_disabled: bool,
    /// Skip words written entirely in upper case.
    pub skip_uppercase: bool,
    /// Advisory only, surfaced to hosts deciding whether to attach the engine.
    pub checker_enabled_by_default: bool,
    /// Words checked before the density policy may judge.
    pub min_sample_words: u32,
    /// Error share above which automatic mode switches checking off.
    pub max_error_ratio: f64,
    /// Words ignored for the whole session from the start.
    pub session_ignore: Vec<String>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            language: FALLBACK_LANGUAGE.to_string(),
            active: true,
            automatic: false,
            auto_detect_disabled: false,
            skip_uppercase: false,
            checker_enabled_by_default: false,
            min_sample_words: 10,
            max_error_ratio: 0.4,
            session_ignore: Vec::new(),
        }
    }
}

impl EngineOptions {
    pub fn from_config(config: &Config) -> Self {
        let speller = &config.file.speller;
        let auto = &config.file.auto_disable;
        Self {
            language: speller.default_language.clone(),
            active: true,
            automatic: auto.automatic,
            auto_detect_disabled: !speller.autodetect_language,
            skip_uppercase: speller.skip_uppercase,
            checker_enabled_by_default: speller.checker_enabled_by_default,
            min_sample_words: auto.min_words.max(1),
            max_error_ratio: config.effective_error_ratio(),
            session_ignore: speller.ignore.clone(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_automatic(mut self, automatic: bool) -> Self {
        self.automatic = automatic;
        self
    }

    pub fn with_auto_detect_disabled(mut self, disabled: bool) -> Self {
        self.auto_detect_disabled = disabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_maps_onto_options() {
        let mut cfg = Config::default();
        cfg.file.speller.default_language = "de_DE".into();
        cfg.file.speller.autodetect_language = false;
        cfg.file.speller.skip_uppercase = true;
        cfg.file.speller.ignore = vec!["KDE".into()];
        cfg.file.auto_disable.automatic = true;
        cfg.file.auto_disable.min_words = 0;
        cfg.file.auto_disable.max_error_ratio = 7.0;
        let opts = EngineOptions::from_config(&cfg);
        assert_eq!(opts.language, "de_DE");
        assert!(opts.auto_detect_disabled);
        assert!(opts.skip_uppercase);
        assert!(opts.automatic);
        assert_eq!(opts.min_sample_words, 1);
        assert_eq!(opts.max_error_ratio, 0.4);
        assert_eq!(opts.session_ignore, vec!["KDE".to_string()]);
    }
}
