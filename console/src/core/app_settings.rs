use std::time::Duration;

use interaction::{DEFAULT_TOP_K, Settings};
use rag_gateway::{
    GatewayConfig,
    config::default_config::config_from_env,
    error_handler::{env_opt, env_opt_u32, env_opt_u64},
};
use rag_render::ScoreStyle;
use tracing::debug;

use crate::cli::GlobalArgs;
use crate::error_handler::AppError;

/// Everything the console needs to run a session.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    /// Where the backend lives.
    pub gateway: GatewayConfig,
    /// `top_k` sent with each question.
    pub top_k: u32,
    pub score_style: ScoreStyle,
    /// Print HTML fragments instead of styled text.
    pub html: bool,
    /// Periodic status poll in the shell; `None` polls only on demand.
    pub status_poll: Option<Duration>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            top_k: DEFAULT_TOP_K,
            score_style: ScoreStyle::default(),
            html: false,
            status_poll: None,
        }
    }
}

impl AppSettings {
    /// Loads settings from `RAG_*` environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        let gateway = config_from_env()?;

        let top_k = env_opt_u32("RAG_TOP_K")?.unwrap_or(DEFAULT_TOP_K);
        if top_k == 0 {
            return Err(AppError::InvalidSetting {
                name: "RAG_TOP_K",
                reason: "must be at least 1".into(),
            });
        }

        let score_style = match env_opt("RAG_SCORE_STYLE") {
            Some(v) => v.parse::<ScoreStyle>()?,
            None => ScoreStyle::default(),
        };

        let status_poll = env_opt_u64("RAG_STATUS_POLL_SECS")?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            gateway,
            top_k,
            score_style,
            html: false,
            status_poll,
        })
    }

    /// Applies command-line overrides and re-validates the gateway config.
    pub fn with_overrides(mut self, args: &GlobalArgs) -> Result<Self, AppError> {
        if let Some(url) = &args.base_url {
            self.gateway.base_url = url.clone();
        }
        if let Some(prefix) = &args.api_prefix {
            self.gateway.api_prefix = prefix.clone();
        }
        if let Some(top_k) = args.top_k {
            self.top_k = top_k;
        }
        if let Some(style) = args.score_style {
            self.score_style = style;
        }
        self.html |= args.html;
        self.gateway.validate()?;

        debug!(
            base_url = %self.gateway.base_url,
            api_prefix = %self.gateway.api_prefix,
            top_k = self.top_k,
            score_style = %self.score_style,
            html = self.html,
            "settings resolved"
        );
        Ok(self)
    }

    /// Controller options.
    pub fn controller(&self) -> Settings {
        Settings {
            top_k: self.top_k,
            score_style: self.score_style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = GlobalArgs {
            base_url: Some("https://rag.example.org".into()),
            api_prefix: Some("/".into()),
            top_k: Some(20),
            score_style: Some(ScoreStyle::Fraction),
            html: true,
            verbose: 0,
        };

        let s = AppSettings::default().with_overrides(&args).unwrap();

        assert_eq!(s.gateway.endpoint("chat"), "https://rag.example.org/chat");
        assert_eq!(s.controller().top_k, 20);
        assert_eq!(s.controller().score_style, ScoreStyle::Fraction);
        assert!(s.html);
    }

    #[test]
    fn bad_base_url_flag_fails() {
        let args = GlobalArgs {
            base_url: Some("localhost:8000".into()),
            ..GlobalArgs::default()
        };
        let err = AppSettings::default().with_overrides(&args).unwrap_err();
        assert!(matches!(err, AppError::Gateway(_)));
    }

    #[test]
    fn no_flags_keep_everything() {
        let s = AppSettings::default()
            .with_overrides(&GlobalArgs::default())
            .unwrap();
        assert_eq!(s, AppSettings::default());
    }
}
