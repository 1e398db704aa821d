//! Configuração da VM
//!
//! Valores padrão embutidos, com sobrescrita opcional via `.env` ou
//! variáveis de ambiente:
//!
//! - `FRYER_MAX_STEPS`: limite de passos (padrão 100000)
//! - `FRYER_LOCALE`: idioma das palavras booleanas (`pt` ou `en`)
//!
//! Valores ausentes ou inválidos caem no padrão.

use std::env;
use std::str::FromStr;

use once_cell::sync::Lazy;

/// Limite padrão de passos antes de abortar a execução
pub const DEFAULT_MAX_STEPS: u64 = 100_000;

// .env é lido uma única vez, na primeira consulta ao ambiente
static DOTENV_INIT: Lazy<()> = Lazy::new(|| {
    let _ = dotenv::dotenv();
});

#[inline]
fn ensure_loaded() {
    let _ = &*DOTENV_INIT;
}

/// Idioma usado por PRINTB
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// verdadeiro / falso
    #[default]
    Pt,
    /// true / false
    En,
}

impl Locale {
    /// Palavra booleana no idioma
    pub fn bool_word(self, value: bool) -> &'static str {
        match (self, value) {
            (Self::Pt, true) => "verdadeiro",
            (Self::Pt, false) => "falso",
            (Self::En, true) => "true",
            (Self::En, false) => "false",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pt" | "pt-br" | "pt_br" => Ok(Self::Pt),
            "en" | "en-us" | "en_us" => Ok(Self::En),
            other => Err(format!("unknown locale '{}'", other)),
        }
    }
}

/// Load step limit through `get`
/// Default: 100000
fn max_steps_from(get: &impl Fn(&str) -> Option<String>) -> u64 {
    get("FRYER_MAX_STEPS")
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_MAX_STEPS)
}

/// Load PRINTB locale through `get`
/// Default: pt
fn locale_from(get: &impl Fn(&str) -> Option<String>) -> Locale {
    get("FRYER_LOCALE")
        .and_then(|v| v.parse().ok())
        .unwrap_or_default()
}

/// Configuração da VM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmConfig {
    /// Máximo de instruções executadas antes de `StepLimitExceeded`
    pub max_steps: u64,
    /// Escreve cada saída de PRINT* em stdout assim que produzida
    pub echo_output: bool,
    /// Idioma de PRINTB
    pub locale: Locale,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
            echo_output: false,
            locale: Locale::Pt,
        }
    }
}

impl VmConfig {
    /// Configuração lida do ambiente (`.env` incluso)
    pub fn from_env() -> Self {
        ensure_loaded();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Configuração a partir de uma fonte qualquer de variáveis
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            max_steps: max_steps_from(&get),
            locale: locale_from(&get),
            ..Self::default()
        }
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo_output = echo;
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = VmConfig::default();
        assert_eq!(config.max_steps, 100_000);
        assert!(!config.echo_output);
        assert_eq!(config.locale, Locale::Pt);
    }

    #[test]
    fn test_locale_parse() {
        assert_eq!("EN".parse::<Locale>(), Ok(Locale::En));
        assert_eq!("pt-BR".parse::<Locale>(), Ok(Locale::Pt));
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_bool_words() {
        assert_eq!(Locale::Pt.bool_word(true), "verdadeiro");
        assert_eq!(Locale::Pt.bool_word(false), "falso");
        assert_eq!(Locale::En.bool_word(true), "true");
    }

    #[test]
    fn test_builder() {
        let config = VmConfig::default()
            .with_max_steps(10)
            .with_echo(true)
            .with_locale(Locale::En);
        assert_eq!(config.max_steps, 10);
        assert!(config.echo_output);
        assert_eq!(config.locale, Locale::En);
    }

    #[test]
    fn test_from_lookup_valid_values() {
        let config = VmConfig::from_lookup(lookup(&[
            ("FRYER_MAX_STEPS", "250"),
            ("FRYER_LOCALE", "en"),
        ]));
        assert_eq!(config.max_steps, 250);
        assert_eq!(config.locale, Locale::En);
        assert!(!config.echo_output);
    }

    #[test]
    fn test_from_lookup_missing_values() {
        assert_eq!(VmConfig::from_lookup(lookup(&[])), VmConfig::default());
    }

    #[test]
    fn test_from_lookup_garbage_falls_back() {
        for (steps, locale) in [("abc", "fr"), ("-5", ""), ("", "english"), ("1e3", "pt en")] {
            let config = VmConfig::from_lookup(lookup(&[
                ("FRYER_MAX_STEPS", steps),
                ("FRYER_LOCALE", locale),
            ]));
            assert_eq!(config, VmConfig::default(), "{:?} / {:?}", steps, locale);
        }

        let config = VmConfig::from_lookup(lookup(&[("FRYER_MAX_STEPS", " 42 ")]));
        assert_eq!(config.max_steps, 42);
    }
}
